//! Content tooling for Bramble
//!
//! Usage:
//!   cargo run -p xtask -- validate-rooms content/rooms   # Check every room image
//!   cargo run -p xtask -- new-room content/rooms 2 0     # Write an empty bordered room

use anyhow::{Context, Result};
use bramble::content::{parse_room_name, RoomImage};
use bramble::game::SpawnCode;
use bramble::GameConfig;
use clap::{Parser, Subcommand};
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};

/// Pixels left black are empty space
const EMPTY: u32 = 0x000000;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Content tooling for Bramble")]
struct Cli {
    /// Game configuration used for room dimensions
    #[arg(long, default_value = "config.ron")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check every <x>x<y>.png room for size and unknown spawn colours
    ValidateRooms {
        /// Directory holding the room images
        dir: PathBuf,
    },
    /// Write an empty room with a solid border
    NewRoom {
        dir: PathBuf,
        #[arg(allow_negative_numbers = true)]
        x: i32,
        #[arg(allow_negative_numbers = true)]
        y: i32,
        /// Overwrite an existing room
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = GameConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;

    match cli.command {
        Commands::ValidateRooms { dir } => {
            let problems = validate_rooms(&dir, &config)?;
            for problem in &problems {
                println!("{}", problem);
            }
            if !problems.is_empty() {
                anyhow::bail!("{} problem(s) found", problems.len());
            }
            println!("All rooms OK");
            Ok(())
        }
        Commands::NewRoom { dir, x, y, force } => {
            let path = new_room(&dir, x, y, force, &config)?;
            println!("Wrote {}", path.display());
            Ok(())
        }
    }
}

/// Collect a human-readable line for every problem in `dir`.
fn validate_rooms(dir: &Path, config: &GameConfig) -> Result<Vec<String>> {
    let expected = (config.columns() as u32, config.rows() as u32);
    let mut problems = Vec::new();

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read {}", dir.display()))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().map(|ext| ext == "png").unwrap_or(false))
        .collect();
    paths.sort();

    for path in paths {
        let name = path.display();
        let stem = path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
        if parse_room_name(&stem).is_none() {
            problems.push(format!("{}: name is not <x>x<y>", name));
            continue;
        }

        let image = image::open(&path)
            .with_context(|| format!("Failed to decode {}", name))?
            .to_rgba8();
        let room = RoomImage::from_rgba(&image);
        if (room.width, room.height) != expected {
            problems.push(format!(
                "{}: {}x{} pixels, expected {}x{}",
                name, room.width, room.height, expected.0, expected.1
            ));
        }

        for y in 0..room.height {
            for x in 0..room.width {
                let rgb = room.pixel(x, y);
                if rgb != EMPTY && SpawnCode::from_rgb(rgb).is_none() {
                    problems.push(format!("{}: unknown colour #{:06X} at ({}, {})", name, rgb, x, y));
                }
            }
        }
    }
    Ok(problems)
}

fn new_room(dir: &Path, x: i32, y: i32, force: bool, config: &GameConfig) -> Result<PathBuf> {
    let path = dir.join(format!("{}x{}.png", x, y));
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    std::fs::create_dir_all(dir)?;

    let (w, h) = (config.columns() as u32, config.rows() as u32);
    let solid = SpawnCode::Solid.rgb();
    let border = Rgba([(solid >> 16) as u8, (solid >> 8) as u8, solid as u8, 255]);
    let mut image = RgbaImage::from_pixel(w, h, Rgba([0, 0, 0, 255]));
    for px in 0..w {
        image.put_pixel(px, 0, border);
        image.put_pixel(px, h - 1, border);
    }
    for py in 0..h {
        image.put_pixel(0, py, border);
        image.put_pixel(w - 1, py, border);
    }

    image.save(&path).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

//! Asset types held by the content registry
//!
//! Pixel data stays in the registry; gameplay code only ever handles
//! `Subtexture` references (texture id + source rectangle), which the host
//! resolves to GPU textures when drawing.

use image::RgbaImage;
use macroquad::math::Vec2;
use rand::Rng;
use serde::Deserialize;

use crate::game::geom::RectI;

/// Index into `Content::textures()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextureId(pub u32);

/// A rectangular region of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Subtexture {
    pub texture: TextureId,
    pub source: RectI,
}

/// Decoded texture pixels, uploaded by the host.
pub struct TextureData {
    pub name: String,
    pub image: RgbaImage,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub image: Subtexture,
    pub duration: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub name: String,
    pub frames: Vec<Frame>,
}

impl Animation {
    /// Total length of one loop in seconds.
    pub fn duration(&self) -> f32 {
        self.frames.iter().map(|f| f.duration).sum()
    }
}

/// A named set of animations sharing an origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub name: String,
    /// Pivot inside each frame, in pixels
    pub origin: Vec2,
    pub animations: Vec<Animation>,
}

impl Sprite {
    pub fn get_animation(&self, name: &str) -> Option<&Animation> {
        self.animations.iter().find(|a| a.name == name)
    }
}

/// Equally sized tiles cut from one texture.
#[derive(Debug, Clone, PartialEq)]
pub struct Tileset {
    pub name: String,
    pub columns: i32,
    pub rows: i32,
    pub tiles: Vec<Subtexture>,
}

impl Tileset {
    /// Slice a texture into `tile_size` squares, row-major.
    pub fn slice(name: &str, texture: TextureId, width: u32, height: u32, tile_size: i32) -> Self {
        let columns = (width as i32 / tile_size.max(1)).max(0);
        let rows = (height as i32 / tile_size.max(1)).max(0);
        let mut tiles = Vec::with_capacity((columns * rows) as usize);
        for y in 0..rows {
            for x in 0..columns {
                tiles.push(Subtexture {
                    texture,
                    source: RectI::new(x * tile_size, y * tile_size, tile_size, tile_size),
                });
            }
        }
        Self { name: name.to_string(), columns, rows, tiles }
    }

    pub fn random_tile<R: Rng>(&self, rng: &mut R) -> Option<Subtexture> {
        if self.tiles.is_empty() {
            return None;
        }
        Some(self.tiles[rng.gen_range(0..self.tiles.len())])
    }
}

/// A room's spawn-code image. Each pixel is a 0xRRGGBB colour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomImage {
    pub width: u32,
    pub height: u32,
    pixels: Vec<u32>,
}

impl RoomImage {
    /// An all-black (empty) room.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, pixels: vec![0; (width * height) as usize] }
    }

    pub fn from_rgba(image: &RgbaImage) -> Self {
        let pixels = image
            .pixels()
            .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
            .collect();
        Self { width: image.width(), height: image.height(), pixels }
    }

    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        self.pixels[(x + y * self.width) as usize]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgb: u32) {
        let index = (x + y * self.width) as usize;
        self.pixels[index] = rgb & 0x00FF_FFFF;
    }

    /// Build from rows of text, one character per pixel, using a legend.
    /// Characters missing from the legend are left black.
    pub fn from_rows(rows: &[&str], legend: &[(char, u32)]) -> Self {
        let height = rows.len() as u32;
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u32;
        let mut room = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if let Some((_, rgb)) = legend.iter().find(|(k, _)| *k == c) {
                    room.set_pixel(x as u32, y as u32, *rgb);
                }
            }
        }
        room
    }
}

// On-disk sprite descriptor

#[derive(Debug, Clone, Deserialize)]
pub struct SpriteDef {
    /// Atlas PNG, relative to the descriptor
    pub texture: String,
    #[serde(default)]
    pub origin: (f32, f32),
    pub animations: Vec<AnimationDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnimationDef {
    pub name: String,
    pub frames: Vec<FrameDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FrameDef {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    #[serde(default = "default_frame_duration")]
    pub duration: f32,
}

fn default_frame_duration() -> f32 {
    0.1
}

impl SpriteDef {
    pub fn build(&self, name: &str, texture: TextureId) -> Sprite {
        Sprite {
            name: name.to_string(),
            origin: Vec2::new(self.origin.0, self.origin.1),
            animations: self
                .animations
                .iter()
                .map(|a| Animation {
                    name: a.name.clone(),
                    frames: a
                        .frames
                        .iter()
                        .map(|f| Frame {
                            image: Subtexture { texture, source: RectI::new(f.x, f.y, f.w, f.h) },
                            duration: f.duration,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

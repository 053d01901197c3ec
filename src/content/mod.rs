//! Content registry
//!
//! One process-scoped object holding every sprite, tileset and room image.
//! It is built once (`Content::load`) and shared read-only with the World
//! and the room runtime; nothing reaches for it through global state.
//!
//! Directory layout under the content root:
//! - `rooms/<x>x<y>.png`: spawn-code image of the room at cell (x, y)
//! - `tilesets/<name>.png`: sliced into `tile_size` squares
//! - `sprites/<name>.ron`: sprite descriptor pointing at a PNG atlas

mod assets;

pub use assets::*;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use macroquad::math::IVec2;

use crate::error::ContentError;

#[derive(Default)]
pub struct Content {
    textures: Vec<TextureData>,
    sprites: HashMap<String, Sprite>,
    tilesets: HashMap<String, Tileset>,
    rooms: HashMap<(i32, i32), RoomImage>,
}

impl Content {
    /// An empty registry; fill it with the `insert_*` methods.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load everything under `root`. Missing sub-directories are treated as
    /// empty.
    pub fn load(root: &Path, tile_size: i32) -> Result<Self, ContentError> {
        let mut content = Self::new();

        for path in list_files(&root.join("tilesets"), "png")? {
            let name = file_stem(&path);
            let image = read_image(&path)?;
            let (width, height) = image.dimensions();
            let texture = content.add_texture(&name, image);
            content.insert_tileset(Tileset::slice(&name, texture, width, height, tile_size));
        }

        let mut atlas_ids: HashMap<PathBuf, TextureId> = HashMap::new();
        for path in list_files(&root.join("sprites"), "ron")? {
            let name = file_stem(&path);
            let text = read_text(&path)?;
            let def: SpriteDef = ron::from_str(&text).map_err(|source| ContentError::Parse {
                path: path.display().to_string(),
                source,
            })?;

            let atlas = path.with_file_name(&def.texture);
            let texture = match atlas_ids.get(&atlas) {
                Some(id) => *id,
                None => {
                    if !atlas.is_file() {
                        return Err(ContentError::MissingTexture {
                            sprite: name,
                            path: atlas.display().to_string(),
                        });
                    }
                    let image = read_image(&atlas)?;
                    let id = content.add_texture(&file_stem(&atlas), image);
                    atlas_ids.insert(atlas, id);
                    id
                }
            };
            content.insert_sprite(def.build(&name, texture));
        }

        for path in list_files(&root.join("rooms"), "png")? {
            let stem = file_stem(&path);
            let cell = parse_room_name(&stem).ok_or_else(|| ContentError::RoomName(stem.clone()))?;
            let image = read_image(&path)?;
            content.insert_room(cell, RoomImage::from_rgba(&image));
        }

        log::info!(
            "Loaded content from {}: {} textures, {} sprites, {} tilesets, {} rooms",
            root.display(),
            content.textures.len(),
            content.sprites.len(),
            content.tilesets.len(),
            content.rooms.len()
        );
        Ok(content)
    }

    /// Drop every asset.
    pub fn unload(&mut self) {
        self.textures.clear();
        self.sprites.clear();
        self.tilesets.clear();
        self.rooms.clear();
    }

    pub fn add_texture(&mut self, name: &str, image: RgbaImage) -> TextureId {
        let id = TextureId(self.textures.len() as u32);
        self.textures.push(TextureData { name: name.to_string(), image });
        id
    }

    pub fn textures(&self) -> &[TextureData] {
        &self.textures
    }

    pub fn insert_sprite(&mut self, sprite: Sprite) {
        self.sprites.insert(sprite.name.clone(), sprite);
    }

    pub fn insert_tileset(&mut self, tileset: Tileset) {
        self.tilesets.insert(tileset.name.clone(), tileset);
    }

    pub fn insert_room(&mut self, cell: IVec2, room: RoomImage) {
        self.rooms.insert((cell.x, cell.y), room);
    }

    pub fn find_sprite(&self, name: &str) -> Option<&Sprite> {
        self.sprites.get(name)
    }

    pub fn find_tileset(&self, name: &str) -> Option<&Tileset> {
        self.tilesets.get(name)
    }

    pub fn find_room(&self, cell: IVec2) -> Option<&RoomImage> {
        self.rooms.get(&(cell.x, cell.y))
    }

    pub fn has_room(&self, cell: IVec2) -> bool {
        self.rooms.contains_key(&(cell.x, cell.y))
    }

    /// Every room cell, sorted row by row.
    pub fn room_cells(&self) -> Vec<IVec2> {
        let mut cells: Vec<_> = self.rooms.keys().map(|(x, y)| IVec2::new(*x, *y)).collect();
        cells.sort_by_key(|c| (c.y, c.x));
        cells
    }
}

/// Parse "<x>x<y>" (either may be negative).
pub fn parse_room_name(stem: &str) -> Option<IVec2> {
    let (x, y) = stem.split_once('x')?;
    Some(IVec2::new(x.parse().ok()?, y.parse().ok()?))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn list_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, ContentError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let entries = fs::read_dir(dir).map_err(|source| ContentError::Io {
        path: dir.display().to_string(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.extension()
                .map(|ext| ext.to_ascii_lowercase() == extension)
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

fn read_text(path: &Path) -> Result<String, ContentError> {
    fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn read_image(path: &Path) -> Result<RgbaImage, ContentError> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|source| ContentError::Image {
            path: path.display().to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_parse_room_name() {
        assert_eq!(parse_room_name("0x0"), Some(IVec2::new(0, 0)));
        assert_eq!(parse_room_name("-1x12"), Some(IVec2::new(-1, 12)));
        assert_eq!(parse_room_name("start"), None);
        assert_eq!(parse_room_name("1xa"), None);
    }

    #[test]
    fn test_in_memory_registry() {
        let mut content = Content::new();
        content.insert_room(IVec2::new(1, 0), RoomImage::new(4, 4));
        assert!(content.has_room(IVec2::new(1, 0)));
        assert!(!content.has_room(IVec2::new(0, 0)));
        assert!(content.find_room(IVec2::new(1, 0)).is_some());

        content.insert_room(IVec2::new(0, 1), RoomImage::new(4, 4));
        content.insert_room(IVec2::new(-2, 0), RoomImage::new(4, 4));
        assert_eq!(content.room_cells(), vec![IVec2::new(-2, 0), IVec2::new(1, 0), IVec2::new(0, 1)]);

        content.unload();
        assert!(!content.has_room(IVec2::new(1, 0)));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("rooms")).unwrap();
        fs::create_dir_all(root.join("tilesets")).unwrap();
        fs::create_dir_all(root.join("sprites")).unwrap();

        let mut room = RgbaImage::new(4, 3);
        room.put_pixel(1, 2, Rgba([0xFF, 0xFF, 0xFF, 0xFF]));
        room.save(root.join("rooms/2x-1.png")).unwrap();

        RgbaImage::new(16, 16).save(root.join("tilesets/castle.png")).unwrap();
        RgbaImage::new(32, 8).save(root.join("sprites/player.png")).unwrap();
        fs::write(
            root.join("sprites/player.ron"),
            r#"(texture: "player.png", origin: (4.0, 8.0), animations: [(name: "idle", frames: [(x: 0, y: 0, w: 8, h: 8)])])"#,
        )
        .unwrap();

        let content = Content::load(root, 8).unwrap();

        let room = content.find_room(IVec2::new(2, -1)).unwrap();
        assert_eq!((room.width, room.height), (4, 3));
        assert_eq!(room.pixel(1, 2), 0xFFFFFF);
        assert_eq!(room.pixel(0, 0), 0);

        assert_eq!(content.find_tileset("castle").unwrap().tiles.len(), 4);
        assert!(content.find_sprite("player").unwrap().get_animation("idle").is_some());
        assert_eq!(content.textures().len(), 2);
    }

    #[test]
    fn test_bad_room_name_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("rooms")).unwrap();
        RgbaImage::new(2, 2).save(dir.path().join("rooms/start.png")).unwrap();

        let err = Content::load(dir.path(), 8).err().unwrap();
        assert!(matches!(err, ContentError::RoomName(ref name) if name == "start"));
    }

    #[test]
    fn test_missing_atlas_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sprites")).unwrap();
        fs::write(dir.path().join("sprites/pop.ron"), r#"(texture: "gone.png", animations: [])"#).unwrap();

        let err = Content::load(dir.path(), 8).err().unwrap();
        assert!(matches!(err, ContentError::MissingTexture { ref sprite, .. } if sprite == "pop"));
    }
}

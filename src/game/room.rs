//! Room decoding
//!
//! A room is an image with one pixel per tile. Each pixel colour is a spawn
//! code: terrain goes into the room's grid collider and tilemap, everything
//! else becomes an entity. Colours not in the table are ignored.

use std::collections::HashSet;

use macroquad::math::IVec2;

use super::collider::Collider;
use super::entity::Entity;
use super::factory;
use super::geom::RectI;
use super::masks::Mask;
use super::player::Player;
use super::tilemap::Tilemap;
use super::world::World;
use crate::config::GameConfig;
use crate::content::{Content, Subtexture};
use crate::error::GameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpawnCode {
    Solid,
    Background,
    Jumpthru,
    Grass,
    Plant,
    Door,
    Player,
    Bramble,
    Spitter,
    Mosquito,
}

impl SpawnCode {
    pub const ALL: [SpawnCode; 10] = [
        SpawnCode::Solid,
        SpawnCode::Background,
        SpawnCode::Jumpthru,
        SpawnCode::Grass,
        SpawnCode::Plant,
        SpawnCode::Door,
        SpawnCode::Player,
        SpawnCode::Bramble,
        SpawnCode::Spitter,
        SpawnCode::Mosquito,
    ];

    /// 0xRRGGBB colour of this code in room images.
    pub fn rgb(self) -> u32 {
        match self {
            SpawnCode::Solid => 0xFFFFFF,
            SpawnCode::Background => 0x646464,
            SpawnCode::Jumpthru => 0xCBDBFC,
            SpawnCode::Grass => 0x6ABE30,
            SpawnCode::Plant => 0x37946E,
            SpawnCode::Door => 0x847E87,
            SpawnCode::Player => 0xDF7126,
            SpawnCode::Bramble => 0xAC3232,
            SpawnCode::Spitter => 0xD77BBA,
            SpawnCode::Mosquito => 0x5B6EE1,
        }
    }

    pub fn from_rgb(rgb: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|code| code.rgb() == rgb)
    }

    /// Tileset drawn under this code, if any.
    pub fn tileset(self) -> Option<&'static str> {
        match self {
            SpawnCode::Solid => Some("castle"),
            SpawnCode::Background => Some("back"),
            SpawnCode::Jumpthru => Some("jumpthru"),
            SpawnCode::Grass => Some("grass"),
            SpawnCode::Plant => Some("plants"),
            _ => None,
        }
    }

    pub fn is_solid(self) -> bool {
        matches!(self, SpawnCode::Solid | SpawnCode::Grass)
    }
}

/// World-space origin of a room cell.
pub fn room_origin(cell: IVec2, config: &GameConfig) -> IVec2 {
    IVec2::new(cell.x * config.width, cell.y * config.height)
}

/// World-space bounds of a room cell.
pub fn room_bounds(cell: IVec2, config: &GameConfig) -> RectI {
    let origin = room_origin(cell, config);
    RectI::new(origin.x, origin.y, config.width, config.height)
}

/// Spawn the room at `cell` into the world. Returns the room entity, which
/// carries the solid grid and the tilemap.
///
/// Player codes are skipped when a player already exists, so a player
/// carried over from the previous room keeps its identity.
pub fn decode_room(world: &mut World, config: &GameConfig, cell: IVec2) -> Result<Entity, GameError> {
    let content = world.content.clone();
    let image = content
        .find_room(cell)
        .ok_or(GameError::MissingRoom { x: cell.x, y: cell.y })?;

    let columns = config.columns();
    let rows = config.rows();
    if image.width != columns as u32 || image.height != rows as u32 {
        return Err(GameError::RoomSize {
            x: cell.x,
            y: cell.y,
            expected_w: columns as u32,
            expected_h: rows as u32,
            found_w: image.width,
            found_h: image.height,
        });
    }

    let ts = config.tile_size;
    let origin = room_origin(cell, config);
    let bounds = room_bounds(cell, config);
    let room = world.add_entity(origin);

    let mut solids = Collider::make_grid(ts, columns, rows).with_mask(Mask::SOLID);
    let mut tiles = Tilemap::new(ts, columns, rows);
    let mut missing_tilesets = HashSet::new();

    for y in 0..rows {
        for x in 0..columns {
            let Some(code) = SpawnCode::from_rgb(image.pixel(x as u32, y as u32)) else { continue };
            let tile_pos = origin + IVec2::new(x * ts, y * ts);
            // Actors stand on the bottom-centre of their tile
            let actor_pos = tile_pos + IVec2::new(ts / 2, ts);

            if code.is_solid() {
                solids.set_cell(x, y, true)?;
            }
            if let Some(name) = code.tileset() {
                let tile = random_tile(world, &content, name);
                if tile.is_none() {
                    missing_tilesets.insert(name);
                }
                tiles.set_cell(x, y, tile)?;
            }

            match code {
                SpawnCode::Jumpthru => {
                    factory::jumpthru(world, tile_pos, ts);
                }
                SpawnCode::Door => {
                    factory::door(world, tile_pos, bounds, ts);
                }
                SpawnCode::Player => {
                    if world.first::<Player>().is_none() {
                        factory::player(world, actor_pos, config);
                    }
                }
                SpawnCode::Bramble => {
                    factory::bramble(world, actor_pos, config);
                }
                SpawnCode::Spitter => {
                    factory::spitter(world, actor_pos, config);
                }
                SpawnCode::Mosquito => {
                    factory::mosquito(world, actor_pos, config);
                }
                SpawnCode::Solid | SpawnCode::Background | SpawnCode::Grass | SpawnCode::Plant => {}
            }
        }
    }

    for name in missing_tilesets {
        log::warn!("Room ({}, {}) uses missing tileset '{}'", cell.x, cell.y, name);
    }

    world.add(room, solids);
    world.add(room, tiles);
    Ok(room)
}

fn random_tile(world: &mut World, content: &Content, name: &str) -> Option<Subtexture> {
    content.find_tileset(name)?.random_tile(&mut world.rng)
}

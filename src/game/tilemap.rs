//! Tile layer drawn behind everything else

use macroquad::math::{IVec2, Vec2};

use super::component::{Component, ComponentKind, Pool};
use super::entity::Entity;
use super::world::World;
use crate::content::Subtexture;
use crate::error::ShapeError;
use crate::render::RenderBatch;

#[derive(Debug, Clone)]
pub struct Tilemap {
    tile_size: i32,
    columns: i32,
    rows: i32,
    cells: Vec<Option<Subtexture>>,
    pub depth: i32,
}

impl Tilemap {
    pub fn new(tile_size: i32, columns: i32, rows: i32) -> Self {
        let columns = columns.max(0);
        let rows = rows.max(0);
        Self {
            tile_size,
            columns,
            rows,
            cells: vec![None; (columns * rows) as usize],
            depth: 100,
        }
    }

    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    pub fn columns(&self) -> i32 {
        self.columns
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    fn index(&self, x: i32, y: i32) -> Result<usize, ShapeError> {
        if x < 0 || y < 0 || x >= self.columns || y >= self.rows {
            return Err(ShapeError::CellOutOfBounds { x, y, columns: self.columns, rows: self.rows });
        }
        Ok((x + y * self.columns) as usize)
    }

    pub fn get_cell(&self, x: i32, y: i32) -> Result<Option<Subtexture>, ShapeError> {
        Ok(self.cells[self.index(x, y)?])
    }

    /// `None` clears the cell.
    pub fn set_cell(&mut self, x: i32, y: i32, tile: Option<Subtexture>) -> Result<(), ShapeError> {
        let index = self.index(x, y)?;
        self.cells[index] = tile;
        Ok(())
    }

    pub fn set_cells(&mut self, x: i32, y: i32, w: i32, h: i32, tile: Option<Subtexture>) -> Result<(), ShapeError> {
        if w <= 0 || h <= 0 {
            return Ok(());
        }
        self.index(x, y)?;
        self.index(x + w - 1, y + h - 1)?;
        for iy in y..y + h {
            for ix in x..x + w {
                let index = (ix + iy * self.columns) as usize;
                self.cells[index] = tile;
            }
        }
        Ok(())
    }
}

impl Component for Tilemap {
    const KIND: ComponentKind = ComponentKind::Tilemap;

    fn pool(world: &World) -> &Pool<Self> {
        &world.tilemaps
    }

    fn pool_mut(world: &mut World) -> &mut Pool<Self> {
        &mut world.tilemaps
    }

    fn render(&self, entity: Entity, world: &World, batch: &mut dyn RenderBatch) {
        let Some(position) = world.position(entity) else { return };
        batch.push_matrix(position);
        for y in 0..self.rows {
            for x in 0..self.columns {
                if let Some(tile) = &self.cells[(x + y * self.columns) as usize] {
                    let at = IVec2::new(x, y) * self.tile_size;
                    batch.tex(tile, at.as_vec2(), Vec2::ONE);
                }
            }
        }
        batch.pop_matrix();
    }

    fn depth(&self) -> i32 {
        self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::TextureId;
    use crate::game::geom::RectI;
    use crate::render::{DrawCall, RecordingBatch};

    fn tile(n: i32) -> Subtexture {
        Subtexture { texture: TextureId(0), source: RectI::new(n * 8, 0, 8, 8) }
    }

    #[test]
    fn test_cells_bounds_checked() {
        let mut map = Tilemap::new(8, 3, 2);
        map.set_cell(2, 1, Some(tile(1))).unwrap();
        assert_eq!(map.get_cell(2, 1), Ok(Some(tile(1))));
        assert_eq!(
            map.set_cell(3, 0, Some(tile(1))),
            Err(ShapeError::CellOutOfBounds { x: 3, y: 0, columns: 3, rows: 2 })
        );
        assert!(map.get_cell(0, -1).is_err());
        assert!(map.set_cells(1, 1, 3, 1, None).is_err());
        assert_eq!(map.get_cell(2, 1), Ok(Some(tile(1))));
    }

    #[test]
    fn test_renders_only_set_tiles() {
        let mut world = World::default();
        let e = world.add_entity(IVec2::new(320, 0));
        let mut map = Tilemap::new(8, 4, 4);
        map.set_cells(0, 3, 2, 1, Some(tile(2))).unwrap();
        map.set_cell(0, 3, None).unwrap();
        world.add(e, map);

        let mut batch = RecordingBatch::new();
        world.render(&mut batch);
        assert_eq!(
            batch.calls,
            vec![DrawCall::Tex { image: tile(2), position: Vec2::new(328.0, 24.0), scale: Vec2::ONE }]
        );
    }
}

//! Collider shapes and overlap queries
//!
//! A collider is either an integer rectangle relative to its entity or a
//! boolean tile grid anchored at its entity. Queries scan every live
//! collider in the world; there is no spatial index.
//!
//! Overlap convention: intersections need positive area on both axes, so
//! colliders that only touch along an edge do not overlap. Grid-vs-grid is
//! not supported and panics.

use macroquad::color::RED;
use macroquad::math::IVec2;

use super::component::{Component, ComponentKind, ComponentRef, Pool};
use super::entity::Entity;
use super::geom::RectI;
use super::masks;
use super::world::World;
use crate::error::ShapeError;
use crate::render::RenderBatch;

/// Dense occupancy grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub tile_size: i32,
    pub columns: i32,
    pub rows: i32,
    cells: Vec<bool>,
}

impl Grid {
    fn index(&self, x: i32, y: i32) -> Result<usize, ShapeError> {
        if x < 0 || y < 0 || x >= self.columns || y >= self.rows {
            return Err(ShapeError::CellOutOfBounds { x, y, columns: self.columns, rows: self.rows });
        }
        Ok((x + y * self.columns) as usize)
    }

    fn occupied(&self, x: i32, y: i32) -> bool {
        self.cells[(x + y * self.columns) as usize]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Rect(RectI),
    Grid(Grid),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collider {
    /// What this collider is (see `Mask`)
    pub mask: u32,
    shape: Shape,
}

impl Collider {
    pub fn make_rect(rect: RectI) -> Self {
        Self { mask: 0, shape: Shape::Rect(rect) }
    }

    /// A grid with every cell empty.
    pub fn make_grid(tile_size: i32, columns: i32, rows: i32) -> Self {
        let columns = columns.max(0);
        let rows = rows.max(0);
        Self {
            mask: 0,
            shape: Shape::Grid(Grid {
                tile_size,
                columns,
                rows,
                cells: vec![false; (columns * rows) as usize],
            }),
        }
    }

    pub fn with_mask(mut self, mask: u32) -> Self {
        self.mask = mask;
        self
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn get_rect(&self) -> Result<RectI, ShapeError> {
        match &self.shape {
            Shape::Rect(rect) => Ok(*rect),
            Shape::Grid(_) => Err(ShapeError::WrongShape { expected: "rectangle" }),
        }
    }

    pub fn set_rect(&mut self, value: RectI) -> Result<(), ShapeError> {
        match &mut self.shape {
            Shape::Rect(rect) => {
                *rect = value;
                Ok(())
            }
            Shape::Grid(_) => Err(ShapeError::WrongShape { expected: "rectangle" }),
        }
    }

    fn grid(&self) -> Result<&Grid, ShapeError> {
        match &self.shape {
            Shape::Grid(grid) => Ok(grid),
            Shape::Rect(_) => Err(ShapeError::WrongShape { expected: "grid" }),
        }
    }

    fn grid_mut(&mut self) -> Result<&mut Grid, ShapeError> {
        match &mut self.shape {
            Shape::Grid(grid) => Ok(grid),
            Shape::Rect(_) => Err(ShapeError::WrongShape { expected: "grid" }),
        }
    }

    pub fn get_cell(&self, x: i32, y: i32) -> Result<bool, ShapeError> {
        let grid = self.grid()?;
        let index = grid.index(x, y)?;
        Ok(grid.cells[index])
    }

    pub fn set_cell(&mut self, x: i32, y: i32, value: bool) -> Result<(), ShapeError> {
        let grid = self.grid_mut()?;
        let index = grid.index(x, y)?;
        grid.cells[index] = value;
        Ok(())
    }

    /// Fill a block of cells. Fails without writing anything if any cell of
    /// the block is out of bounds.
    pub fn set_cells(&mut self, x: i32, y: i32, w: i32, h: i32, value: bool) -> Result<(), ShapeError> {
        let grid = self.grid_mut()?;
        if w <= 0 || h <= 0 {
            return Ok(());
        }
        grid.index(x, y)?;
        grid.index(x + w - 1, y + h - 1)?;
        for iy in y..y + h {
            for ix in x..x + w {
                let index = (ix + iy * grid.columns) as usize;
                grid.cells[index] = value;
            }
        }
        Ok(())
    }
}

/// Does `a` at `a_pos` overlap `b` at `b_pos`?
pub fn overlaps(a: &Collider, a_pos: IVec2, b: &Collider, b_pos: IVec2) -> bool {
    match (&a.shape, &b.shape) {
        (Shape::Rect(ra), Shape::Rect(rb)) => rect_to_rect(*ra, a_pos, *rb, b_pos),
        (Shape::Rect(ra), Shape::Grid(gb)) => rect_to_grid(ra.translate(a_pos), gb, b_pos),
        (Shape::Grid(ga), Shape::Rect(rb)) => rect_to_grid(rb.translate(b_pos), ga, a_pos),
        (Shape::Grid(_), Shape::Grid(_)) => panic!("grid to grid overlap checks are not supported"),
    }
}

pub fn rect_to_rect(a: RectI, a_pos: IVec2, b: RectI, b_pos: IVec2) -> bool {
    a.translate(a_pos).overlaps(&b.translate(b_pos))
}

/// `rect` is in world space. Only the cells under the rectangle's bounds,
/// clipped to the grid, are visited.
pub fn rect_to_grid(rect: RectI, grid: &Grid, grid_pos: IVec2) -> bool {
    if rect.is_empty() || grid.tile_size <= 0 {
        return false;
    }
    let local = rect.translate(-grid_pos);
    let ts = grid.tile_size;

    let left = local.x.div_euclid(ts).max(0);
    let top = local.y.div_euclid(ts).max(0);
    let right = ceil_div(local.right(), ts).min(grid.columns);
    let bottom = ceil_div(local.bottom(), ts).min(grid.rows);

    for y in top..bottom {
        for x in left..right {
            if grid.occupied(x, y) {
                return true;
            }
        }
    }
    false
}

fn ceil_div(value: i32, divisor: i32) -> i32 {
    (value + divisor - 1).div_euclid(divisor)
}

impl ComponentRef<Collider> {
    /// Would this collider, moved by `offset`, overlap any other live
    /// collider carrying every bit of `mask`?
    pub fn check(self, world: &World, mask: u32, offset: IVec2) -> bool {
        self.first_overlap(world, mask, offset).is_some()
    }

    /// Like `check`, but returns the first matching collider.
    pub fn first_overlap(self, world: &World, mask: u32, offset: IVec2) -> Option<ComponentRef<Collider>> {
        if mask == 0 {
            return None;
        }
        let this = world.component(self)?;
        let this_pos = world.position(world.owner(self)?)? + offset;

        let mut cursor = world.first::<Collider>();
        while let Some(other) = cursor {
            if other != self {
                if let Some(collider) = world.component(other) {
                    if masks::matches(collider.mask, mask) {
                        let other_pos = world.owner(other).and_then(|e| world.position(e));
                        if let Some(other_pos) = other_pos {
                            if overlaps(this, this_pos, collider, other_pos) {
                                return Some(other);
                            }
                        }
                    }
                }
            }
            cursor = world.next(other);
        }
        None
    }
}

impl Component for Collider {
    const KIND: ComponentKind = ComponentKind::Collider;

    fn pool(world: &World) -> &Pool<Self> {
        &world.colliders
    }

    fn pool_mut(world: &mut World) -> &mut Pool<Self> {
        &mut world.colliders
    }

    /// Debug outlines, drawn on top of everything.
    fn render(&self, entity: Entity, world: &World, batch: &mut dyn RenderBatch) {
        let Some(position) = world.position(entity) else { return };
        batch.push_matrix(position);
        match &self.shape {
            Shape::Rect(rect) => batch.rect_line(*rect, 1.0, RED),
            Shape::Grid(grid) => {
                for y in 0..grid.rows {
                    for x in 0..grid.columns {
                        if !grid.occupied(x, y) {
                            continue;
                        }
                        let ts = grid.tile_size;
                        batch.rect_line(RectI::new(x * ts, y * ts, ts, ts), 1.0, RED);
                    }
                }
            }
        }
        batch.pop_matrix();
    }

    fn depth(&self) -> i32 {
        i32::MIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::masks::Mask;
    use crate::render::{DrawCall, RecordingBatch};

    fn rect_entity(world: &mut World, pos: IVec2, rect: RectI, mask: u32) -> ComponentRef<Collider> {
        let e = world.add_entity(pos);
        world.add(e, Collider::make_rect(rect).with_mask(mask))
    }

    #[test]
    fn test_cells_round_trip_and_bounds() {
        let mut grid = Collider::make_grid(8, 4, 3);
        assert_eq!(grid.get_cell(2, 1), Ok(false));
        grid.set_cell(2, 1, true).unwrap();
        assert_eq!(grid.get_cell(2, 1), Ok(true));

        for (x, y) in [(-1, 0), (0, -1), (4, 0), (0, 3), (4, 3)] {
            assert_eq!(
                grid.get_cell(x, y),
                Err(ShapeError::CellOutOfBounds { x, y, columns: 4, rows: 3 })
            );
            assert!(grid.set_cell(x, y, true).is_err());
        }
    }

    #[test]
    fn test_wrong_shape_errors() {
        let mut rect = Collider::make_rect(RectI::new(0, 0, 4, 4));
        assert_eq!(rect.get_cell(0, 0), Err(ShapeError::WrongShape { expected: "grid" }));
        assert!(rect.set_cell(0, 0, true).is_err());

        let mut grid = Collider::make_grid(8, 2, 2);
        assert_eq!(grid.get_rect(), Err(ShapeError::WrongShape { expected: "rectangle" }));
        assert!(grid.set_rect(RectI::new(0, 0, 1, 1)).is_err());
    }

    #[test]
    fn test_set_cells_block() {
        let mut grid = Collider::make_grid(8, 4, 4);
        grid.set_cells(1, 1, 2, 2, true).unwrap();
        assert_eq!(grid.get_cell(1, 1), Ok(true));
        assert_eq!(grid.get_cell(2, 2), Ok(true));
        assert_eq!(grid.get_cell(3, 3), Ok(false));
        assert!(grid.set_cells(3, 3, 2, 2, true).is_err());
        assert_eq!(grid.get_cell(3, 3), Ok(false));
    }

    #[test]
    fn test_rect_to_grid_only_occupied_cells() {
        let mut collider = Collider::make_grid(8, 4, 4);
        collider.set_cell(1, 1, true).unwrap();
        let Shape::Grid(grid) = collider.shape() else { unreachable!() };

        let origin = IVec2::new(100, 100);
        // Inside cell (1, 1)
        assert!(rect_to_grid(RectI::new(110, 110, 2, 2), grid, origin));
        // Touching the cell's left edge from outside
        assert!(!rect_to_grid(RectI::new(104, 110, 4, 2), grid, origin));
        // Overlapping it by one pixel
        assert!(rect_to_grid(RectI::new(105, 110, 4, 2), grid, origin));
        // Over an empty cell
        assert!(!rect_to_grid(RectI::new(100, 100, 4, 4), grid, origin));
        // Completely outside the grid
        assert!(!rect_to_grid(RectI::new(0, 0, 50, 50), grid, origin));
        // Covering the whole grid and beyond
        assert!(rect_to_grid(RectI::new(90, 90, 100, 100), grid, origin));
    }

    #[test]
    fn test_check_identical_rect_at_zero_offset() {
        let mut world = World::default();
        let rect = RectI::new(-4, -8, 8, 8);
        let a = rect_entity(&mut world, IVec2::new(20, 20), rect, Mask::SOLID);
        let b = rect_entity(&mut world, IVec2::new(20, 20), rect, Mask::SOLID);

        assert!(a.check(&world, Mask::SOLID, IVec2::ZERO));
        assert_eq!(a.first_overlap(&world, Mask::SOLID, IVec2::ZERO), Some(b));
        assert_eq!(b.first_overlap(&world, Mask::SOLID, IVec2::ZERO), Some(a));
    }

    #[test]
    fn test_check_excludes_self() {
        let mut world = World::default();
        let a = rect_entity(&mut world, IVec2::ZERO, RectI::new(0, 0, 8, 8), Mask::SOLID);
        assert!(!a.check(&world, Mask::SOLID, IVec2::ZERO));
    }

    #[test]
    fn test_empty_mask_never_matches() {
        let mut world = World::default();
        let a = rect_entity(&mut world, IVec2::ZERO, RectI::new(0, 0, 8, 8), Mask::SOLID);
        rect_entity(&mut world, IVec2::ZERO, RectI::new(0, 0, 8, 8), u32::MAX);
        for dx in -10..10 {
            for dy in -10..10 {
                assert!(!a.check(&world, 0, IVec2::new(dx, dy)));
            }
        }
    }

    #[test]
    fn test_check_with_offset_and_mask_filter() {
        let mut world = World::default();
        let a = rect_entity(&mut world, IVec2::ZERO, RectI::new(0, 0, 8, 8), 0);
        rect_entity(&mut world, IVec2::new(8, 0), RectI::new(0, 0, 8, 8), Mask::SOLID | Mask::ENEMY);

        assert!(!a.check(&world, Mask::SOLID, IVec2::ZERO));
        assert!(a.check(&world, Mask::SOLID, IVec2::new(1, 0)));
        assert!(a.check(&world, Mask::SOLID | Mask::ENEMY, IVec2::new(1, 0)));
        assert!(!a.check(&world, Mask::JUMPTHRU, IVec2::new(1, 0)));
    }

    #[test]
    fn test_check_against_grid_entity() {
        let mut world = World::default();
        let room = world.add_entity(IVec2::new(0, 0));
        let mut grid = Collider::make_grid(8, 4, 4).with_mask(Mask::SOLID);
        grid.set_cells(0, 3, 4, 1, true).unwrap();
        world.add(room, grid);

        // 8x8 box resting exactly on the floor row (floor top at y = 24)
        let a = rect_entity(&mut world, IVec2::new(8, 16), RectI::new(0, 0, 8, 8), 0);
        assert!(!a.check(&world, Mask::SOLID, IVec2::ZERO));
        assert!(a.check(&world, Mask::SOLID, IVec2::new(0, 1)));
    }

    #[test]
    fn test_destroyed_collider_is_ignored() {
        let mut world = World::default();
        let a = rect_entity(&mut world, IVec2::ZERO, RectI::new(0, 0, 8, 8), 0);
        let b = rect_entity(&mut world, IVec2::ZERO, RectI::new(0, 0, 8, 8), Mask::SOLID);
        world.destroy(b);
        assert!(!a.check(&world, Mask::SOLID, IVec2::ZERO));
    }

    #[test]
    #[should_panic(expected = "grid to grid")]
    fn test_grid_to_grid_panics() {
        let a = Collider::make_grid(8, 2, 2);
        let b = Collider::make_grid(8, 2, 2);
        overlaps(&a, IVec2::ZERO, &b, IVec2::ZERO);
    }

    #[test]
    fn test_debug_render_outlines_occupied_cells() {
        let mut world = World::default();
        world.draw_colliders = true;
        let e = world.add_entity(IVec2::new(16, 0));
        let mut grid = Collider::make_grid(8, 2, 2);
        grid.set_cell(1, 0, true).unwrap();
        world.add(e, grid);

        let mut batch = RecordingBatch::new();
        world.render(&mut batch);
        assert_eq!(batch.calls, vec![DrawCall::RectLine { rect: RectI::new(24, 0, 8, 8) }]);
        assert_eq!(batch.depth(), 0);
    }
}

//! Game Runtime
//!
//! Owns the World and drives the room state machine:
//! - `Steady`: the world simulates; the player leaving the room's bounds
//!   toward an existing room starts a transition
//! - `Transitioning`: the world is frozen while the camera eases from the
//!   old room to the new one; afterwards the old room's entities are
//!   destroyed and the player carries on
//!
//! Fatal falls and player death reload the current room from its spawn
//! codes.

use std::rc::Rc;

use macroquad::math::{IVec2, Vec2};

use super::entity::Entity;
use super::geom::{cube_in_out, lerp};
use super::mover::Mover;
use super::player::Player;
use super::room::{decode_room, room_bounds, room_origin};
use super::world::World;
use crate::config::GameConfig;
use crate::content::Content;
use crate::error::GameError;
use crate::input::{Input, RawInput};
use crate::render::RenderBatch;

#[derive(Debug, Clone, PartialEq)]
pub enum RoomState {
    Steady,
    Transitioning {
        last_room: IVec2,
        next_room: IVec2,
        /// 0 → 1 over the transition
        ease: f32,
        /// Everything alive when the transition began
        previous: Vec<Entity>,
    },
}

pub struct Game {
    pub world: World,
    pub config: GameConfig,
    room: IVec2,
    state: RoomState,
    camera: Vec2,
    /// Where the player entered the current room, for respawning in rooms
    /// without a player spawn code
    checkpoint: Option<IVec2>,
}

impl Game {
    /// Build the world and load the configured start room.
    pub fn new(content: Rc<Content>, config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let mut world = World::new(content, config.seed);
        world.input = Input::new(config.press_buffer);
        world.draw_colliders = config.draw_colliders;

        let room = config.start_room();
        let mut game = Self {
            world,
            config,
            room,
            state: RoomState::Steady,
            camera: Vec2::ZERO,
            checkpoint: None,
        };
        game.load_room(room)?;
        Ok(game)
    }

    pub fn room(&self) -> IVec2 {
        self.room
    }

    pub fn state(&self) -> &RoomState {
        &self.state
    }

    /// Top-left of the view in world pixels
    pub fn camera(&self) -> Vec2 {
        self.camera
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.state, RoomState::Transitioning { .. })
    }

    /// The player entity, if one is alive.
    pub fn player(&self) -> Option<Entity> {
        let handle = self.world.first::<Player>()?;
        self.world.owner(handle)
    }

    pub fn toggle_colliders(&mut self) {
        self.world.draw_colliders = !self.world.draw_colliders;
    }

    /// Spawn the room at `cell` into the current world and snap the camera
    /// to it.
    pub fn load_room(&mut self, cell: IVec2) -> Result<(), GameError> {
        decode_room(&mut self.world, &self.config, cell)?;
        self.room = cell;
        self.camera = room_origin(cell, &self.config).as_vec2();
        log::info!("Loaded room ({}, {})", cell.x, cell.y);
        Ok(())
    }

    /// Throw everything away and respawn the current room.
    pub fn reload(&mut self) -> Result<(), GameError> {
        log::info!("Reloading room ({}, {})", self.room.x, self.room.y);
        self.world.clear();
        self.state = RoomState::Steady;
        self.load_room(self.room)?;

        if self.player().is_none() {
            if let Some(position) = self.checkpoint {
                super::factory::player(&mut self.world, position, &self.config);
            }
        }
        Ok(())
    }

    /// Advance one host frame of `raw_delta` real seconds.
    pub fn update(&mut self, raw: &RawInput, raw_delta: f32) -> Result<(), GameError> {
        self.world.time.advance(raw_delta);
        self.world.input.update(raw, raw_delta);

        if self.is_transitioning() {
            self.update_transition();
            return Ok(());
        }

        // Hit-stop freezes the simulation
        if !self.world.time.is_paused() {
            self.world.update();
        }
        self.update_steady()
    }

    fn update_steady(&mut self) -> Result<(), GameError> {
        let Some(player) = self.player() else { return Ok(()) };
        let Some(position) = self.world.position(player) else { return Ok(()) };
        let dead_for = self.world.get::<Player>(player).and_then(|p| p.dead_for());

        if let Some(dead_for) = dead_for {
            if dead_for >= self.config.respawn_delay {
                return self.reload();
            }
        }

        let bounds = room_bounds(self.room, &self.config);
        if bounds.contains(position) {
            return Ok(());
        }

        let step = IVec2::new(
            if position.x < bounds.x { -1 } else if position.x >= bounds.right() { 1 } else { 0 },
            if position.y < bounds.y { -1 } else if position.y >= bounds.bottom() { 1 } else { 0 },
        );
        // Corner exits prefer the diagonal room, then either straight neighbour
        let candidates = [step, IVec2::new(step.x, 0), IVec2::new(0, step.y)];
        let next = candidates
            .into_iter()
            .filter(|s| *s != IVec2::ZERO)
            .map(|s| self.room + s)
            .find(|next| {
                (!self.config.only_forward || next.x >= self.room.x) && self.world.content.has_room(*next)
            });

        if let (None, Some(next)) = (dead_for, next) {
            return self.begin_transition(next);
        }

        // Nowhere to go: keep the player inside, except for falls
        if position.y >= bounds.bottom() + self.config.fall_margin {
            log::info!("Player fell out of room ({}, {})", self.room.x, self.room.y);
            return self.reload();
        }

        let clamped = IVec2::new(
            position.x.clamp(bounds.x, bounds.right() - 1),
            position.y.max(bounds.y),
        );
        if clamped != position {
            if let Some(record) = self.world.entity_mut(player) {
                record.position = clamped;
            }
            if let Some(mover) = self.world.get_mut::<Mover>(player) {
                if clamped.x != position.x {
                    mover.stop_x();
                }
                if clamped.y != position.y {
                    mover.stop_y();
                }
            }
        }
        Ok(())
    }

    fn begin_transition(&mut self, next: IVec2) -> Result<(), GameError> {
        log::debug!(
            "Transition ({}, {}) -> ({}, {})",
            self.room.x,
            self.room.y,
            next.x,
            next.y
        );
        let previous = self.world.entities();
        let last_room = self.room;
        self.load_room(next)?;
        self.camera = room_origin(last_room, &self.config).as_vec2();
        self.state = RoomState::Transitioning { last_room, next_room: next, ease: 0.0, previous };
        Ok(())
    }

    fn update_transition(&mut self) {
        let duration = self.config.transition_duration;
        let delta = self.world.time.delta;

        let RoomState::Transitioning { last_room, next_room, ease, .. } = &mut self.state else { return };
        *ease = if duration > 0.0 { *ease + delta / duration } else { 1.0 };

        let from = room_origin(*last_room, &self.config).as_vec2();
        let to = room_origin(*next_room, &self.config).as_vec2();
        self.camera = lerp(from, to, cube_in_out(*ease));
        if *ease < 1.0 {
            return;
        }

        let RoomState::Transitioning { last_room, next_room, previous, .. } =
            std::mem::replace(&mut self.state, RoomState::Steady)
        else {
            return;
        };
        self.camera = to;

        let player = self.player();
        for entity in previous {
            if Some(entity) != player {
                self.world.destroy_entity(entity);
            }
        }
        self.world.flush();

        if let Some(player) = player {
            if next_room.y < last_room.y {
                let boost = self.config.up_boost;
                if let Some(mover) = self.world.get_mut::<Mover>(player) {
                    mover.speed.y = -boost;
                }
            }
            self.checkpoint = self.world.position(player);
        }
        log::debug!("Entered room ({}, {})", next_room.x, next_room.y);
    }

    /// Draw the world through the camera.
    pub fn render(&self, batch: &mut dyn RenderBatch) {
        batch.push_matrix(-self.camera.round().as_ivec2());
        self.world.render(batch);
        batch.pop_matrix();
    }
}

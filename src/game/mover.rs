//! Sub-pixel movement
//!
//! Positions are integers. Velocity is integrated into a fractional
//! remainder and only whole pixels are applied, one at a time, so a mover
//! never tunnels through a one-pixel wall. The remainder always stays in
//! (-1, 1) on both axes.

use macroquad::math::{IVec2, Vec2};

use super::collider::Collider;
use super::component::{Component, ComponentKind, ComponentRef, Pool};
use super::entity::Entity;
use super::geom::{approach, sign};
use super::masks::Mask;
use super::world::World;

/// What to do when a pixel step is blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HitResponse {
    /// Zero speed and remainder on the blocked axis
    #[default]
    Stop,
    /// Reverse speed on the blocked axis
    Bounce,
    /// Destroy the owning entity
    Destroy,
}

#[derive(Debug, Clone, Default)]
pub struct Mover {
    remainder: Vec2,
    /// Pixels per second
    pub speed: Vec2,
    /// Added to `speed.y` per second while airborne
    pub gravity: f32,
    /// Deceleration of `speed.x` per second while grounded
    pub friction: f32,
    /// Collider used for blocking; no collider means free movement
    pub collider: Option<ComponentRef<Collider>>,
    pub on_hit_x: HitResponse,
    pub on_hit_y: HitResponse,
}

impl Mover {
    pub fn new(collider: ComponentRef<Collider>) -> Self {
        Self { collider: Some(collider), ..Self::default() }
    }

    pub fn with_speed(mut self, speed: Vec2) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn on_hit(mut self, x: HitResponse, y: HitResponse) -> Self {
        self.on_hit_x = x;
        self.on_hit_y = y;
        self
    }

    pub fn remainder(&self) -> Vec2 {
        self.remainder
    }

    pub fn stop_x(&mut self) {
        self.speed.x = 0.0;
        self.remainder.x = 0.0;
    }

    pub fn stop_y(&mut self) {
        self.speed.y = 0.0;
        self.remainder.y = 0.0;
    }

    pub fn stop(&mut self) {
        self.stop_x();
        self.stop_y();
    }

    /// Standing on something solid, or on top of a jumpthru, `dist` pixels
    /// below.
    pub fn on_ground(&self, world: &World, dist: i32) -> bool {
        let Some(collider) = self.collider else { return false };
        if collider.check(world, Mask::SOLID, IVec2::new(0, dist)) {
            return true;
        }
        !collider.check(world, Mask::JUMPTHRU, IVec2::ZERO)
            && collider.check(world, Mask::JUMPTHRU, IVec2::new(0, dist))
    }

    /// Step `amount` whole pixels horizontally. Returns true if blocked.
    pub fn move_x(&mut self, entity: Entity, world: &mut World, amount: i32) -> bool {
        let step = sign(amount);
        let mut left = amount;
        while left != 0 {
            if let Some(collider) = self.collider {
                if collider.check(world, Mask::SOLID, IVec2::new(step, 0)) {
                    self.hit_x(entity, world);
                    return true;
                }
            }
            let Some(record) = world.entity_mut(entity) else { return false };
            record.position.x += step;
            left -= step;
        }
        false
    }

    /// Step `amount` whole pixels vertically. Returns true if blocked.
    /// Moving down also lands on a jumpthru we are not already inside.
    pub fn move_y(&mut self, entity: Entity, world: &mut World, amount: i32) -> bool {
        let step = sign(amount);
        let mut left = amount;
        while left != 0 {
            if let Some(collider) = self.collider {
                let offset = IVec2::new(0, step);
                let blocked = collider.check(world, Mask::SOLID, offset)
                    || (step > 0
                        && !collider.check(world, Mask::JUMPTHRU, IVec2::ZERO)
                        && collider.check(world, Mask::JUMPTHRU, offset));
                if blocked {
                    self.hit_y(entity, world);
                    return true;
                }
            }
            let Some(record) = world.entity_mut(entity) else { return false };
            record.position.y += step;
            left -= step;
        }
        false
    }

    fn hit_x(&mut self, entity: Entity, world: &mut World) {
        match self.on_hit_x {
            HitResponse::Stop => self.stop_x(),
            HitResponse::Bounce => self.speed.x = -self.speed.x,
            HitResponse::Destroy => world.destroy_entity(entity),
        }
    }

    fn hit_y(&mut self, entity: Entity, world: &mut World) {
        match self.on_hit_y {
            HitResponse::Stop => self.stop_y(),
            HitResponse::Bounce => self.speed.y = -self.speed.y,
            HitResponse::Destroy => world.destroy_entity(entity),
        }
    }
}

impl Component for Mover {
    const KIND: ComponentKind = ComponentKind::Mover;

    fn pool(world: &World) -> &Pool<Self> {
        &world.movers
    }

    fn pool_mut(world: &mut World) -> &mut Pool<Self> {
        &mut world.movers
    }

    fn update(&mut self, entity: Entity, _this: ComponentRef<Self>, world: &mut World) {
        let dt = world.time.delta;

        if self.friction > 0.0 && self.on_ground(world, 1) {
            self.speed.x = approach(self.speed.x, 0.0, self.friction * dt);
        }

        if self.gravity != 0.0 {
            let resting = self
                .collider
                .map(|c| c.check(world, Mask::SOLID, IVec2::new(0, 1)))
                .unwrap_or(false);
            if !resting {
                self.speed.y += self.gravity * dt;
            }
        }

        let total = self.remainder + self.speed * dt;
        let to_move = total.trunc();
        self.remainder = total - to_move;

        self.move_x(entity, world, to_move.x as i32);
        if world.is_alive(entity) {
            self.move_y(entity, world, to_move.y as i32);
        }
    }
}

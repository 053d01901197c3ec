//! Damage intake
//!
//! A hurtable watches one collider for overlaps with anything carrying its
//! `hurt_by` mask. A hit freezes the simulation briefly (hit-stop), stuns
//! the hurtable so it can't be hit again right away, makes the entity
//! flicker, and then applies its reaction.

use macroquad::math::IVec2;

use super::collider::Collider;
use super::component::{Component, ComponentKind, ComponentRef, Pool};
use super::entity::Entity;
use super::factory;
use super::player::Player;
use super::world::World;

const FLICKER_INTERVAL: f32 = 0.05;

/// What a successful hit does to the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HurtReaction {
    /// Forward to the `Player` component (health, knockback, death)
    Player,
    /// Pop and disappear on the first hit
    Die,
    /// Lose one health per hit, pop at zero
    Wound { health: i32 },
}

#[derive(Debug, Clone)]
pub struct Hurtable {
    pub collider: ComponentRef<Collider>,
    pub hurt_by: u32,
    pub reaction: HurtReaction,
    /// Real seconds of hit-stop per hit
    pub hit_stop: f32,
    /// Seconds after a hit during which further hits are ignored
    pub stun: f32,
    /// Seconds the entity flickers after a hit
    pub flicker: f32,
    stun_timer: f32,
    flicker_timer: f32,
}

impl Hurtable {
    pub fn new(collider: ComponentRef<Collider>, hurt_by: u32, reaction: HurtReaction) -> Self {
        Self {
            collider,
            hurt_by,
            reaction,
            hit_stop: 0.1,
            stun: 0.5,
            flicker: 0.5,
            stun_timer: 0.0,
            flicker_timer: 0.0,
        }
    }

    pub fn with_hit_stop(mut self, seconds: f32) -> Self {
        self.hit_stop = seconds;
        self
    }

    pub fn with_stun(mut self, stun: f32, flicker: f32) -> Self {
        self.stun = stun;
        self.flicker = flicker;
        self
    }

    pub fn is_stunned(&self) -> bool {
        self.stun_timer > 0.0
    }

    fn can_be_hurt(&self, entity: Entity, world: &World) -> bool {
        match self.reaction {
            HurtReaction::Player => world.get::<Player>(entity).map(|p| !p.is_dead()).unwrap_or(false),
            HurtReaction::Die | HurtReaction::Wound { .. } => true,
        }
    }

    fn react(&mut self, entity: Entity, from: IVec2, world: &mut World) {
        let died = match &mut self.reaction {
            HurtReaction::Player => {
                Player::hurt(world, entity, from);
                false
            }
            HurtReaction::Die => true,
            HurtReaction::Wound { health } => {
                *health -= 1;
                *health <= 0
            }
        };

        if died {
            if let Some(position) = world.position(entity) {
                factory::pop(world, position);
            }
            world.destroy_entity(entity);
        }
    }
}

impl Component for Hurtable {
    const KIND: ComponentKind = ComponentKind::Hurtable;

    fn pool(world: &World) -> &Pool<Self> {
        &world.hurtables
    }

    fn pool_mut(world: &mut World) -> &mut Pool<Self> {
        &mut world.hurtables
    }

    fn update(&mut self, entity: Entity, _this: ComponentRef<Self>, world: &mut World) {
        if self.stun_timer <= 0.0 && self.can_be_hurt(entity, world) {
            if let Some(attacker) = self.collider.first_overlap(world, self.hurt_by, IVec2::ZERO) {
                let from = world
                    .owner(attacker)
                    .and_then(|e| world.position(e))
                    .unwrap_or_default();

                world.time.pause_for(self.hit_stop);
                self.stun_timer = self.stun;
                self.flicker_timer = self.flicker;
                self.react(entity, from, world);
            }
        }

        let dt = world.time.delta;
        self.stun_timer -= dt;

        if self.flicker_timer > 0.0 {
            self.flicker_timer -= dt;
            let toggle = world.time.on_interval(FLICKER_INTERVAL);
            if let Some(record) = world.entity_mut(entity) {
                if self.flicker_timer <= 0.0 {
                    record.visible = true;
                } else if toggle {
                    record.visible = !record.visible;
                }
            }
        }
    }
}

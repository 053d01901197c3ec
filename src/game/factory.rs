//! Entity constructors
//!
//! Every gameplay object is assembled here from components. Actors are
//! anchored at their bottom-centre; tile-sized objects at their top-left.

use macroquad::math::{IVec2, Vec2};

use super::animator::Animator;
use super::collider::Collider;
use super::enemy::{Behavior, Door, Enemy};
use super::entity::Entity;
use super::geom::RectI;
use super::hurtable::{HurtReaction, Hurtable};
use super::masks::Mask;
use super::mover::{HitResponse, Mover};
use super::player::Player;
use super::timer::{Timer, TimerAction};
use super::world::World;
use crate::config::GameConfig;

const POP_FALLBACK_DURATION: f32 = 0.3;
const BULLET_SPEED: Vec2 = Vec2::new(40.0, -60.0);
const BULLET_GRAVITY: f32 = 130.0;
const BULLET_LIFETIME: f32 = 2.5;

pub fn player(world: &mut World, position: IVec2, config: &GameConfig) -> Entity {
    let settings = &config.player;
    let en = world.add_entity(position);

    let mut animator = Animator::new("player").with_depth(-10);
    animator.play("idle", false);
    world.add(en, animator);

    let hitbox = world.add(en, Collider::make_rect(RectI::new(-4, -8, 8, 8)).with_mask(Mask::PLAYER));
    world.add(en, Mover::new(hitbox).with_gravity(settings.gravity).with_friction(settings.friction));
    world.add(en, Player::new(settings.clone()));
    world.add(
        en,
        Hurtable::new(hitbox, Mask::ENEMY, HurtReaction::Player)
            .with_hit_stop(config.hit_stop)
            .with_stun(settings.invincible_duration, settings.invincible_duration),
    );

    log::debug!("Spawned player at {:?}", position);
    en
}

pub fn bramble(world: &mut World, position: IVec2, config: &GameConfig) -> Entity {
    let en = world.add_entity(position);

    let mut animator = Animator::new("bramble").with_depth(-5);
    animator.play("idle", false);
    world.add(en, animator);

    let hitbox = world.add(en, Collider::make_rect(RectI::new(-4, -8, 8, 8)).with_mask(Mask::ENEMY));
    world.add(
        en,
        Hurtable::new(hitbox, Mask::PLAYER_ATTACK, HurtReaction::Wound { health: 3 }).with_hit_stop(config.hit_stop),
    );
    world.add(en, Enemy::new(Behavior::Bramble));
    en
}

pub fn spitter(world: &mut World, position: IVec2, config: &GameConfig) -> Entity {
    let en = world.add_entity(position);

    let mut animator = Animator::new("spitter").with_depth(-5);
    animator.play("idle", false);
    world.add(en, animator);

    let hitbox = world.add(en, Collider::make_rect(RectI::new(-6, -12, 12, 12)).with_mask(Mask::ENEMY));
    world.add(
        en,
        Hurtable::new(hitbox, Mask::PLAYER_ATTACK, HurtReaction::Wound { health: 3 }).with_hit_stop(config.hit_stop),
    );
    world.add(en, Enemy::new(Behavior::Spitter));
    en
}

pub fn mosquito(world: &mut World, position: IVec2, config: &GameConfig) -> Entity {
    let en = world.add_entity(position);

    let mut animator = Animator::new("mosquito").with_depth(-5);
    animator.play("idle", false);
    world.add(en, animator);

    let hitbox = world.add(en, Collider::make_rect(RectI::new(-4, -8, 8, 8)).with_mask(Mask::ENEMY));
    world.add(en, Mover::new(hitbox));
    world.add(
        en,
        Hurtable::new(hitbox, Mask::PLAYER_ATTACK, HurtReaction::Wound { health: 2 }).with_hit_stop(config.hit_stop),
    );
    world.add(en, Enemy::new(Behavior::Mosquito));
    en
}

/// A spitter projectile heading left (`direction < 0`) or right.
pub fn bullet(world: &mut World, position: IVec2, direction: i32) -> Entity {
    let en = world.add_entity(position);

    let mut animator = Animator::new("bullet").with_depth(-5);
    animator.play("idle", false);
    world.add(en, animator);

    let hitbox = world.add(en, Collider::make_rect(RectI::new(-3, -3, 6, 6)).with_mask(Mask::ENEMY));
    world.add(
        en,
        Mover::new(hitbox)
            .with_speed(Vec2::new(BULLET_SPEED.x * direction.signum() as f32, BULLET_SPEED.y))
            .with_gravity(BULLET_GRAVITY)
            .on_hit(HitResponse::Destroy, HitResponse::Destroy),
    );
    world.add(en, Hurtable::new(hitbox, Mask::PLAYER_ATTACK, HurtReaction::Die));
    world.add(en, Timer::new(BULLET_LIFETIME, TimerAction::DestroyEntity));
    world.add(en, Enemy::new(Behavior::Bullet));
    en
}

/// Short-lived death puff.
pub fn pop(world: &mut World, position: IVec2) -> Entity {
    let en = world.add_entity(position);

    let mut animator = Animator::new("pop").with_depth(-20);
    animator.play("pop", false);
    let duration = animator.animation_duration(&world.content, "pop");
    world.add(en, animator);

    let duration = if duration > 0.0 { duration } else { POP_FALLBACK_DURATION };
    world.add(en, Timer::new(duration, TimerAction::DestroyEntity));
    world.add(en, Enemy::new(Behavior::Pop));
    en
}

/// One tile of a door that opens once `room` is free of enemies.
pub fn door(world: &mut World, position: IVec2, room: RectI, tile_size: i32) -> Entity {
    let en = world.add_entity(position);

    let mut animator = Animator::new("door").with_depth(50);
    animator.play("idle", false);
    world.add(en, animator);

    world.add(en, Collider::make_rect(RectI::new(0, 0, tile_size, tile_size)).with_mask(Mask::SOLID));
    world.add(en, Door::new(room));
    en
}

pub fn jumpthru(world: &mut World, position: IVec2, tile_size: i32) -> Entity {
    let en = world.add_entity(position);
    world.add(en, Collider::make_rect(RectI::new(0, 0, tile_size, 4)).with_mask(Mask::JUMPTHRU));
    en
}

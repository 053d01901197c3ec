//! Player controller
//!
//! Reads the resolved input from the World and drives the entity's Mover
//! and Animator. Damage arrives through the entity's Hurtable, which calls
//! `Player::hurt`.

use macroquad::math::{IVec2, Vec2};

use super::animator::Animator;
use super::collider::Collider;
use super::component::{Component, ComponentKind, ComponentRef, Pool};
use super::entity::Entity;
use super::geom::{approach, sign, RectI};
use super::masks::Mask;
use super::mover::Mover;
use super::timer::{Timer, TimerAction};
use super::world::World;
use crate::config::PlayerSettings;

const KNOCKBACK: Vec2 = Vec2::new(110.0, -80.0);
/// Deceleration back to max speed after being pushed past it
const OVERSPEED_DECEL: f32 = 2000.0;

#[derive(Debug, Clone)]
pub struct Player {
    pub settings: PlayerSettings,
    pub health: i32,
    /// 1 = right, -1 = left
    pub facing: i32,
    jump_timer: f32,
    attack_timer: f32,
    hurt_timer: f32,
    /// Seconds since death, `None` while alive
    dead_for: Option<f32>,
}

impl Player {
    pub fn new(settings: PlayerSettings) -> Self {
        Self {
            health: settings.max_health,
            settings,
            facing: 1,
            jump_timer: 0.0,
            attack_timer: 0.0,
            hurt_timer: 0.0,
            dead_for: None,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.dead_for.is_some()
    }

    pub fn dead_for(&self) -> Option<f32> {
        self.dead_for
    }

    pub fn is_attacking(&self) -> bool {
        self.attack_timer > 0.0
    }

    /// Take one point of damage from something at `from`, knocking the
    /// player away from it.
    pub fn hurt(world: &mut World, entity: Entity, from: IVec2) {
        let Some(position) = world.position(entity) else { return };
        let Some(player) = world.get_mut::<Player>(entity) else { return };
        if player.is_dead() {
            return;
        }

        player.health -= 1;
        player.hurt_timer = player.settings.hurt_duration;
        player.jump_timer = 0.0;
        let direction = match sign(position.x - from.x) {
            0 => -player.facing,
            d => d,
        };
        if player.health <= 0 {
            player.dead_for = Some(0.0);
            log::info!("Player died");
        } else {
            log::debug!("Player hurt, {} health left", player.health);
        }

        if let Some(mover) = world.get_mut::<Mover>(entity) {
            mover.speed = Vec2::new(KNOCKBACK.x * direction as f32, KNOCKBACK.y);
        }
    }

    fn start_attack(&mut self, entity: Entity, world: &mut World) {
        let duration = match world.get::<Animator>(entity) {
            Some(animator) => animator.animation_duration(&world.content, "attack"),
            None => 0.0,
        };
        let duration = if duration > 0.0 { duration } else { self.settings.attack_duration };

        let rect = if self.facing >= 0 {
            RectI::new(4, -12, 12, 12)
        } else {
            RectI::new(-16, -12, 12, 12)
        };
        let hitbox = world.add(entity, Collider::make_rect(rect).with_mask(Mask::PLAYER_ATTACK));
        world.add(entity, Timer::new(duration, TimerAction::DestroyComponent(hitbox.key())));
        self.attack_timer = duration;
    }

    fn animation(&self, on_ground: bool, input: i32) -> &'static str {
        if self.is_dead() || self.hurt_timer > 0.0 {
            "hurt"
        } else if self.is_attacking() {
            "attack"
        } else if !on_ground {
            "jump"
        } else if input != 0 {
            "run"
        } else {
            "idle"
        }
    }
}

impl Component for Player {
    const KIND: ComponentKind = ComponentKind::Player;

    fn pool(world: &World) -> &Pool<Self> {
        &world.players
    }

    fn pool_mut(world: &mut World) -> &mut Pool<Self> {
        &mut world.players
    }

    fn update(&mut self, entity: Entity, _this: ComponentRef<Self>, world: &mut World) {
        let dt = world.time.delta;
        let s = self.settings.clone();
        let on_ground = world.get::<Mover>(entity).map(|m| m.on_ground(world, 1)).unwrap_or(false);
        let controllable = !self.is_dead() && self.hurt_timer <= 0.0;
        let input = if controllable { world.input.movement.int_value().x } else { 0 };

        if let Some(dead_for) = &mut self.dead_for {
            *dead_for += dt;
        }
        self.hurt_timer -= dt;
        self.attack_timer -= dt;

        let wants_jump = controllable && on_ground && world.input.jump.pressed();
        if wants_jump {
            world.input.jump.consume_press();
        }
        let wants_attack = controllable && !self.is_attacking() && world.input.attack.pressed();
        if wants_attack {
            world.input.attack.consume_press();
        }
        let jump_held = world.input.jump.down();

        if let Some(mover) = world.get_mut::<Mover>(entity) {
            mover.gravity = s.gravity;
            mover.friction = if !controllable {
                s.hurt_friction
            } else if input == 0 {
                s.friction
            } else {
                0.0
            };

            if input != 0 {
                let accel = if on_ground { s.ground_accel } else { s.air_accel };
                mover.speed.x += input as f32 * accel * dt;
            }
            let max_speed = if on_ground { s.max_ground_speed } else { s.max_air_speed };
            if controllable && mover.speed.x.abs() > max_speed {
                let capped = max_speed * mover.speed.x.signum();
                mover.speed.x = approach(mover.speed.x, capped, OVERSPEED_DECEL * dt);
            }

            if wants_jump {
                mover.speed.y = -s.jump_force;
                self.jump_timer = s.jump_time;
            }
            // Variable height: holding jump sustains the take-off speed
            if self.jump_timer > 0.0 {
                self.jump_timer -= dt;
                if jump_held && controllable {
                    mover.speed.y = -s.jump_force;
                } else {
                    self.jump_timer = 0.0;
                }
            }

            mover.speed.y = mover.speed.y.min(s.max_fall);
        }

        if input != 0 {
            self.facing = input;
        }
        if wants_attack {
            self.start_attack(entity, world);
        }

        let animation = self.animation(on_ground, input);
        if let Some(animator) = world.get_mut::<Animator>(entity) {
            animator.play(animation, false);
            animator.scale.x = self.facing as f32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::factory;
    use crate::input::RawInput;

    fn floor(world: &mut World) {
        let e = world.add_entity(IVec2::new(-200, 0));
        world.add(e, Collider::make_rect(RectI::new(0, 0, 400, 8)).with_mask(Mask::SOLID));
    }

    fn frame(world: &mut World, raw: RawInput) {
        world.time.advance(1.0 / 60.0);
        world.input.update(&raw, 1.0 / 60.0);
        world.update();
    }

    fn setup() -> (World, Entity) {
        let mut world = World::default();
        floor(&mut world);
        let player = factory::player(&mut world, IVec2::new(0, 0), &GameConfig::default());
        (world, player)
    }

    #[test]
    fn test_runs_right_and_faces() {
        let (mut world, e) = setup();
        let right = RawInput { right: true, ..RawInput::default() };
        for _ in 0..60 {
            frame(&mut world, right);
        }
        assert!(world.position(e).unwrap().x > 20);
        let player = world.get::<Player>(e).unwrap();
        assert_eq!(player.facing, 1);
        let speed = world.get::<Mover>(e).unwrap().speed.x;
        assert!(speed <= player.settings.max_ground_speed + 1e-3);

        let left = RawInput { left: true, ..RawInput::default() };
        for _ in 0..60 {
            frame(&mut world, left);
        }
        assert_eq!(world.get::<Player>(e).unwrap().facing, -1);
    }

    #[test]
    fn test_jump_leaves_ground_and_lands() {
        let (mut world, e) = setup();
        frame(&mut world, RawInput::default());
        assert_eq!(world.position(e).unwrap().y, 0);

        frame(&mut world, RawInput { jump: true, ..RawInput::default() });
        for _ in 0..5 {
            frame(&mut world, RawInput { jump: true, ..RawInput::default() });
        }
        assert!(world.position(e).unwrap().y < -5);

        for _ in 0..120 {
            frame(&mut world, RawInput::default());
        }
        assert_eq!(world.position(e).unwrap().y, 0);
    }

    #[test]
    fn test_held_jump_goes_higher() {
        let apex = |hold: usize| {
            let (mut world, e) = setup();
            frame(&mut world, RawInput::default());
            let mut best = 0;
            for i in 0..90 {
                let raw = RawInput { jump: i < hold, ..RawInput::default() };
                frame(&mut world, raw);
                best = best.min(world.position(e).unwrap().y);
            }
            best
        };
        assert!(apex(30) < apex(1));
    }

    #[test]
    fn test_buffered_jump_fires_on_landing() {
        let mut world = World::default();
        floor(&mut world);
        let e = factory::player(&mut world, IVec2::new(0, -3), &GameConfig::default());

        // Pressed while still airborne, released before landing
        frame(&mut world, RawInput { jump: true, ..RawInput::default() });
        let mut left_ground = false;
        for _ in 0..30 {
            frame(&mut world, RawInput::default());
            left_ground |= world.position(e).unwrap().y < -3;
        }
        assert!(left_ground);
    }

    #[test]
    fn test_attack_hitbox_is_transient() {
        let (mut world, e) = setup();
        frame(&mut world, RawInput { attack: true, ..RawInput::default() });
        assert!(world.get::<Player>(e).unwrap().is_attacking());
        assert_eq!(world.count::<Collider>(), 3);

        for _ in 0..40 {
            frame(&mut world, RawInput::default());
        }
        assert!(!world.get::<Player>(e).unwrap().is_attacking());
        assert_eq!(world.count::<Collider>(), 2);
        assert!(world.is_alive(e));
    }

    #[test]
    fn test_hurt_knocks_back_and_kills() {
        let (mut world, e) = setup();
        frame(&mut world, RawInput::default());

        Player::hurt(&mut world, e, IVec2::new(10, 0));
        assert_eq!(world.get::<Player>(e).unwrap().health, 3);
        let speed = world.get::<Mover>(e).unwrap().speed;
        assert!(speed.x < 0.0 && speed.y < 0.0);

        for _ in 0..3 {
            Player::hurt(&mut world, e, IVec2::new(-10, 0));
        }
        let player = world.get::<Player>(e).unwrap();
        assert!(player.is_dead());
        assert_eq!(player.health, 0);

        Player::hurt(&mut world, e, IVec2::ZERO);
        assert_eq!(world.get::<Player>(e).unwrap().health, 0);

        frame(&mut world, RawInput::default());
        assert!(world.get::<Player>(e).unwrap().dead_for().unwrap() > 0.0);
    }

    #[test]
    fn test_enemy_contact_hurts_player() {
        let (mut world, e) = setup();
        factory::bramble(&mut world, IVec2::new(2, 0), &GameConfig::default());

        frame(&mut world, RawInput::default());
        assert_eq!(world.get::<Player>(e).unwrap().health, 3);
    }
}

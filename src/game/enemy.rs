//! Enemy behaviours and room doors

use macroquad::math::{IVec2, Vec2};

use super::animator::Animator;
use super::collider::Collider;
use super::component::{Component, ComponentKind, ComponentRef, Pool};
use super::entity::Entity;
use super::factory;
use super::geom::{approach, sign, RectI};
use super::masks::Mask;
use super::mover::Mover;
use super::player::Player;
use super::world::World;

const SPIT_INTERVAL: f32 = 1.25;
const MOSQUITO_SPEED: f32 = 24.0;
const MOSQUITO_ACCEL: f32 = 120.0;
const MOSQUITO_BOB: f32 = 18.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Stationary thorn bush, only hurts on contact
    Bramble,
    /// Periodically spits a bullet toward the player's side
    Spitter,
    /// Flies after the player with a sinusoidal bob
    Mosquito,
    /// Spitter projectile, gone after it touches the player
    Bullet,
    /// Death effect; its timer removes it
    Pop,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub behavior: Behavior,
    timer: f32,
    hit: bool,
}

impl Enemy {
    pub fn new(behavior: Behavior) -> Self {
        Self { behavior, timer: SPIT_INTERVAL, hit: false }
    }

    /// Counts toward keeping a room's doors shut.
    pub fn is_hostile(&self) -> bool {
        matches!(self.behavior, Behavior::Bramble | Behavior::Spitter | Behavior::Mosquito)
    }

    fn spit(&mut self, entity: Entity, world: &mut World) {
        self.timer -= world.time.delta;
        if self.timer > 0.0 {
            return;
        }
        self.timer = SPIT_INTERVAL;

        let Some(position) = world.position(entity) else { return };
        let direction = match player_position(world) {
            Some(target) if target.x > position.x => 1,
            _ => -1,
        };
        factory::bullet(world, position + IVec2::new(direction * 4, -4), direction);

        if let Some(animator) = world.get_mut::<Animator>(entity) {
            animator.play("shoot", true);
            animator.scale.x = direction as f32;
        }
    }

    fn fly(&mut self, entity: Entity, world: &mut World) {
        let Some(position) = world.position(entity) else { return };
        let target = player_position(world).unwrap_or(position);
        let dt = world.time.delta;
        let bob = (world.time.elapsed as f32 * 4.0).sin() * MOSQUITO_BOB;

        if let Some(mover) = world.get_mut::<Mover>(entity) {
            let direction = sign(target.x - position.x) as f32;
            mover.speed.x = approach(mover.speed.x, direction * MOSQUITO_SPEED, MOSQUITO_ACCEL * dt);
            mover.speed.y = bob + sign(target.y - position.y) as f32 * MOSQUITO_SPEED * 0.5;
        }
    }

    fn travel(&mut self, entity: Entity, world: &mut World) {
        if self.hit {
            world.destroy_entity(entity);
            return;
        }
        // Stay alive this frame so the player's hurtable still sees us
        let touching = world
            .handle_of::<Collider>(entity)
            .map(|c| c.check(world, Mask::PLAYER, IVec2::ZERO))
            .unwrap_or(false);
        self.hit = touching;
    }
}

/// Position of the first live player, if any.
pub fn player_position(world: &World) -> Option<IVec2> {
    let handle = world.first::<Player>()?;
    world.position(world.owner(handle)?)
}

impl Component for Enemy {
    const KIND: ComponentKind = ComponentKind::Enemy;

    fn pool(world: &World) -> &Pool<Self> {
        &world.enemies
    }

    fn pool_mut(world: &mut World) -> &mut Pool<Self> {
        &mut world.enemies
    }

    fn update(&mut self, entity: Entity, _this: ComponentRef<Self>, world: &mut World) {
        match self.behavior {
            Behavior::Bramble | Behavior::Pop => {}
            Behavior::Spitter => self.spit(entity, world),
            Behavior::Mosquito => self.fly(entity, world),
            Behavior::Bullet => self.travel(entity, world),
        }
    }
}

/// Solid barrier that opens once its room holds no hostile enemies.
#[derive(Debug, Clone)]
pub struct Door {
    /// Room bounds in world pixels
    pub room: RectI,
}

impl Door {
    pub fn new(room: RectI) -> Self {
        Self { room }
    }
}

impl Component for Door {
    const KIND: ComponentKind = ComponentKind::Door;

    fn pool(world: &World) -> &Pool<Self> {
        &world.doors
    }

    fn pool_mut(world: &mut World) -> &mut Pool<Self> {
        &mut world.doors
    }

    fn update(&mut self, entity: Entity, _this: ComponentRef<Self>, world: &mut World) {
        let guarded = world.enemies.iter().any(|(_, owner, enemy)| {
            enemy.is_hostile()
                && world.position(owner).map(|p| self.room.contains(p)).unwrap_or(false)
        });
        if guarded {
            return;
        }

        if let Some(position) = world.position(entity) {
            log::debug!("Door at {:?} opened", position);
            factory::pop(world, position + IVec2::new(4, 8));
        }
        world.destroy_entity(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn step(world: &mut World, dt: f32) {
        world.time.advance(dt);
        world.update();
    }

    fn hostile_count(world: &World) -> usize {
        world.enemies.iter().filter(|(_, _, e)| e.is_hostile()).count()
    }

    #[test]
    fn test_spitter_fires_toward_player() {
        let mut world = World::default();
        let config = GameConfig::default();
        factory::player(&mut world, IVec2::new(100, 50), &config);
        let spitter = factory::spitter(&mut world, IVec2::new(40, 50), &config);

        step(&mut world, SPIT_INTERVAL + 0.01);
        let bullets: Vec<_> = world
            .enemies
            .iter()
            .filter(|(_, _, e)| e.behavior == Behavior::Bullet)
            .map(|(_, owner, _)| owner)
            .collect();
        assert_eq!(bullets.len(), 1);
        assert!(world.position(bullets[0]).unwrap().x > world.position(spitter).unwrap().x);
    }

    #[test]
    fn test_spawned_bullet_waits_for_next_frame() {
        let mut world = World::default();
        let config = GameConfig::default();
        factory::spitter(&mut world, IVec2::new(40, 50), &config);

        step(&mut world, SPIT_INTERVAL + 0.01);
        let (handle, bullet) = world
            .enemies
            .iter()
            .find(|(_, _, e)| e.behavior == Behavior::Bullet)
            .map(|(handle, owner, _)| (handle, owner))
            .unwrap();
        // Neither its behaviour nor its mover ran in the frame it was spawned in
        let mover = world.get::<Mover>(bullet).unwrap();
        assert_eq!(mover.remainder(), Vec2::ZERO);
        assert_eq!(world.position(bullet), Some(IVec2::new(36, 46)));

        step(&mut world, 0.1);
        assert!(world.component(handle).is_some());
        assert_ne!(world.position(bullet), Some(IVec2::new(36, 46)));
    }

    #[test]
    fn test_bullet_destroys_itself_after_touching_player() {
        let mut world = World::default();
        let config = GameConfig::default();
        let player = factory::player(&mut world, IVec2::new(0, 0), &config);
        let bullet = factory::bullet(&mut world, IVec2::new(0, -4), -1);

        step(&mut world, 0.001);
        assert!(world.is_alive(bullet));
        assert_eq!(world.get::<Player>(player).unwrap().health, config.player.max_health - 1);

        step(&mut world, 0.001);
        assert!(!world.is_alive(bullet));
    }

    #[test]
    fn test_mosquito_closes_in() {
        let mut world = World::default();
        let config = GameConfig::default();
        factory::player(&mut world, IVec2::new(200, 0), &config);
        let mosquito = factory::mosquito(&mut world, IVec2::new(0, 0), &config);

        for _ in 0..120 {
            step(&mut world, 1.0 / 60.0);
        }
        assert!(world.position(mosquito).unwrap().x > 10);
    }

    #[test]
    fn test_door_opens_when_room_is_clear() {
        let mut world = World::default();
        let config = GameConfig::default();
        let room = RectI::new(0, 0, 320, 180);
        let door = factory::door(&mut world, IVec2::new(80, 80), room, config.tile_size);
        let bramble = factory::bramble(&mut world, IVec2::new(40, 40), &config);
        // Enemies in other rooms don't count
        factory::bramble(&mut world, IVec2::new(400, 40), &config);

        step(&mut world, 0.016);
        assert!(world.is_alive(door));
        assert_eq!(hostile_count(&world), 2);

        world.destroy_entity(bramble);
        step(&mut world, 0.016);
        assert!(!world.is_alive(door));
    }
}

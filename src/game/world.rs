//! Game World
//!
//! The World is the central container for all game state:
//! - Entity allocation and lifetime tracking
//! - One component pool per component type
//! - Deferred destruction (to keep in-flight traversals valid)
//! - The per-frame update and render passes
//!
//! Component types are fields rather than a HashMap<TypeId, ...> because we
//! know exactly what components the game needs at compile time.

use std::rc::Rc;

use macroquad::math::IVec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::animator::Animator;
use super::arena::Arena;
use super::collider::Collider;
use super::component::{Component, ComponentKey, ComponentKind, ComponentRef, Pool};
use super::enemy::{Door, Enemy};
use super::entity::{Entity, EntityRecord};
use super::hurtable::Hurtable;
use super::mover::Mover;
use super::player::Player;
use super::tilemap::Tilemap;
use super::time::Time;
use super::timer::Timer;
use crate::content::Content;
use crate::input::Input;
use crate::render::RenderBatch;

pub struct World {
    entities: Arena<EntityRecord>,

    // =========================================================================
    // Component pools
    // =========================================================================
    pub(crate) colliders: Pool<Collider>,
    pub(crate) movers: Pool<Mover>,
    pub(crate) players: Pool<Player>,
    pub(crate) hurtables: Pool<Hurtable>,
    pub(crate) timers: Pool<Timer>,
    pub(crate) tilemaps: Pool<Tilemap>,
    pub(crate) animators: Pool<Animator>,
    pub(crate) enemies: Pool<Enemy>,
    pub(crate) doors: Pool<Door>,

    // =========================================================================
    // Shared frame state
    // =========================================================================
    pub time: Time,
    pub input: Input,
    pub rng: StdRng,
    pub content: Rc<Content>,
    /// Draw collider outlines on top of everything
    pub draw_colliders: bool,
}

impl World {
    pub fn new(content: Rc<Content>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            entities: Arena::new(),
            colliders: Pool::new(),
            movers: Pool::new(),
            players: Pool::new(),
            hurtables: Pool::new(),
            timers: Pool::new(),
            tilemaps: Pool::new(),
            animators: Pool::new(),
            enemies: Pool::new(),
            doors: Pool::new(),
            time: Time::new(),
            input: Input::default(),
            rng,
            content,
            draw_colliders: false,
        }
    }

    // =========================================================================
    // Entity Management
    // =========================================================================

    pub fn add_entity(&mut self, position: IVec2) -> Entity {
        let (index, generation) = self.entities.insert(EntityRecord::new(position));
        Entity::new(index, generation)
    }

    /// Flag an entity and all its components for removal at the end of the
    /// frame. It is invisible to every lookup from now on.
    pub fn destroy_entity(&mut self, entity: Entity) {
        let keys = match self.entities.get(entity.index(), entity.generation()) {
            Some(record) => record.components.clone(),
            None => return,
        };
        for key in keys {
            self.destroy_key(key);
        }
        self.entities.destroy(entity.index(), entity.generation());
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity.index(), entity.generation())
    }

    pub fn entity(&self, entity: Entity) -> Option<&EntityRecord> {
        self.entities.get(entity.index(), entity.generation())
    }

    pub fn entity_mut(&mut self, entity: Entity) -> Option<&mut EntityRecord> {
        self.entities.get_mut(entity.index(), entity.generation())
    }

    pub fn position(&self, entity: Entity) -> Option<IVec2> {
        self.entity(entity).map(|r| r.position)
    }

    pub fn first_entity(&self) -> Option<Entity> {
        self.entities.first().map(|(i, g)| Entity::new(i, g))
    }

    pub fn next_entity(&self, entity: Entity) -> Option<Entity> {
        self.entities
            .next(entity.index(), entity.generation())
            .map(|(i, g)| Entity::new(i, g))
    }

    /// Snapshot of every live entity in creation order.
    pub fn entities(&self) -> Vec<Entity> {
        self.entities.iter().map(|(i, g, _)| Entity::new(i, g)).collect()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Attach a component. Adding to a dead entity drops the component and
    /// returns a handle that never resolves.
    pub fn add<T: Component>(&mut self, entity: Entity, component: T) -> ComponentRef<T> {
        if !self.is_alive(entity) {
            log::warn!("Dropping {:?} added to dead entity {:?}", T::KIND, entity);
            return ComponentRef::NULL;
        }
        let handle = T::pool_mut(self).insert(entity, component);
        if let Some(record) = self.entity_mut(entity) {
            record.components.push(handle.key());
        }
        handle
    }

    /// Flag a single component for removal.
    pub fn destroy<T: Component>(&mut self, handle: ComponentRef<T>) {
        let owner = T::pool(self).owner(handle);
        if !T::pool_mut(self).destroy(handle) {
            return;
        }
        if let Some(record) = owner.and_then(|e| self.entity_mut(e)) {
            let key = handle.key();
            record.components.retain(|k| *k != key);
        }
    }

    /// Destroy through a type-erased handle.
    pub fn destroy_key(&mut self, key: ComponentKey) {
        match key.kind {
            ComponentKind::Collider => self.destroy_typed::<Collider>(key),
            ComponentKind::Mover => self.destroy_typed::<Mover>(key),
            ComponentKind::Player => self.destroy_typed::<Player>(key),
            ComponentKind::Hurtable => self.destroy_typed::<Hurtable>(key),
            ComponentKind::Timer => self.destroy_typed::<Timer>(key),
            ComponentKind::Tilemap => self.destroy_typed::<Tilemap>(key),
            ComponentKind::Animator => self.destroy_typed::<Animator>(key),
            ComponentKind::Enemy => self.destroy_typed::<Enemy>(key),
            ComponentKind::Door => self.destroy_typed::<Door>(key),
        }
    }

    fn destroy_typed<T: Component>(&mut self, key: ComponentKey) {
        if let Some(handle) = key.typed::<T>() {
            self.destroy(handle);
        }
    }

    /// Handle of the first component of type T on an entity.
    pub fn handle_of<T: Component>(&self, entity: Entity) -> Option<ComponentRef<T>> {
        self.entity(entity)?
            .components
            .iter()
            .find_map(|k| k.typed::<T>())
    }

    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        let handle = self.handle_of::<T>(entity)?;
        T::pool(self).get(handle)
    }

    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        let handle = self.handle_of::<T>(entity)?;
        T::pool_mut(self).get_mut(handle)
    }

    pub fn component<T: Component>(&self, handle: ComponentRef<T>) -> Option<&T> {
        T::pool(self).get(handle)
    }

    pub fn component_mut<T: Component>(&mut self, handle: ComponentRef<T>) -> Option<&mut T> {
        T::pool_mut(self).get_mut(handle)
    }

    /// Entity a live component belongs to.
    pub fn owner<T: Component>(&self, handle: ComponentRef<T>) -> Option<Entity> {
        T::pool(self).owner(handle)
    }

    /// First live component of type T, in creation order.
    pub fn first<T: Component>(&self) -> Option<ComponentRef<T>> {
        T::pool(self).first()
    }

    /// Next live component of type T after `handle`. Safe to call on a
    /// handle destroyed during the current frame.
    pub fn next<T: Component>(&self, handle: ComponentRef<T>) -> Option<ComponentRef<T>> {
        T::pool(self).next(handle)
    }

    /// Number of live components of type T.
    pub fn count<T: Component>(&self) -> usize {
        T::pool(self).len()
    }

    // =========================================================================
    // Frame passes
    // =========================================================================

    /// Run one update pass over every pool in fixed order, then reclaim
    /// everything destroyed during the frame. Components created during the
    /// frame are not updated until the next one.
    pub fn update(&mut self) {
        let players = self.players.next_seq();
        let enemies = self.enemies.next_seq();
        let doors = self.doors.next_seq();
        let hurtables = self.hurtables.next_seq();
        let timers = self.timers.next_seq();
        let movers = self.movers.next_seq();
        let animators = self.animators.next_seq();

        self.update_pool::<Player>(players);
        self.update_pool::<Enemy>(enemies);
        self.update_pool::<Door>(doors);
        self.update_pool::<Hurtable>(hurtables);
        self.update_pool::<Timer>(timers);
        self.update_pool::<Mover>(movers);
        self.update_pool::<Animator>(animators);
        self.flush();
    }

    /// Update the components of one pool created before `limit`, in
    /// creation order.
    fn update_pool<T: Component>(&mut self, limit: u64) {
        let mut cursor = T::pool(self).first();

        while let Some(handle) = cursor {
            match T::pool(self).seq_of(handle) {
                Some(seq) if seq < limit => {}
                _ => break,
            }
            if let Some((entity, mut component)) = T::pool_mut(self).take(handle) {
                component.update(entity, handle, self);
                T::pool_mut(self).restore(handle, component);
            }
            cursor = T::pool(self).next(handle);
        }
    }

    /// Draw every component of visible entities, back to front by depth.
    pub fn render(&self, batch: &mut dyn RenderBatch) {
        let mut queue: Vec<(i32, ComponentKey)> = Vec::new();
        self.queue_renderables::<Tilemap>(&mut queue);
        self.queue_renderables::<Animator>(&mut queue);
        self.queue_renderables::<Player>(&mut queue);
        self.queue_renderables::<Enemy>(&mut queue);
        self.queue_renderables::<Door>(&mut queue);
        self.queue_renderables::<Hurtable>(&mut queue);
        self.queue_renderables::<Timer>(&mut queue);
        self.queue_renderables::<Mover>(&mut queue);
        if self.draw_colliders {
            self.queue_renderables::<Collider>(&mut queue);
        }

        // Stable: equal depths keep pool and creation order
        queue.sort_by(|a, b| b.0.cmp(&a.0));

        for (_, key) in queue {
            self.render_key(key, batch);
        }
    }

    fn queue_renderables<T: Component>(&self, queue: &mut Vec<(i32, ComponentKey)>) {
        for (handle, entity, component) in T::pool(self).iter() {
            let visible = self.entity(entity).map(|r| r.visible).unwrap_or(false);
            if visible {
                queue.push((component.depth(), handle.key()));
            }
        }
    }

    fn render_key(&self, key: ComponentKey, batch: &mut dyn RenderBatch) {
        match key.kind {
            ComponentKind::Collider => self.render_typed::<Collider>(key, batch),
            ComponentKind::Mover => self.render_typed::<Mover>(key, batch),
            ComponentKind::Player => self.render_typed::<Player>(key, batch),
            ComponentKind::Hurtable => self.render_typed::<Hurtable>(key, batch),
            ComponentKind::Timer => self.render_typed::<Timer>(key, batch),
            ComponentKind::Tilemap => self.render_typed::<Tilemap>(key, batch),
            ComponentKind::Animator => self.render_typed::<Animator>(key, batch),
            ComponentKind::Enemy => self.render_typed::<Enemy>(key, batch),
            ComponentKind::Door => self.render_typed::<Door>(key, batch),
        }
    }

    fn render_typed<T: Component>(&self, key: ComponentKey, batch: &mut dyn RenderBatch) {
        let Some(handle) = key.typed::<T>() else { return };
        let pool = T::pool(self);
        if let (Some(component), Some(entity)) = (pool.get(handle), pool.owner(handle)) {
            component.render(entity, self, batch);
        }
    }

    /// Reclaim everything destroyed so far. Runs at the end of `update`.
    pub fn flush(&mut self) {
        self.colliders.flush();
        self.movers.flush();
        self.players.flush();
        self.hurtables.flush();
        self.timers.flush();
        self.tilemaps.flush();
        self.animators.flush();
        self.enemies.flush();
        self.doors.flush();
        self.entities.flush();
    }

    /// Destroy everything immediately. Only for room boundaries, never
    /// from inside an update pass.
    pub fn clear(&mut self) {
        self.colliders.clear();
        self.movers.clear();
        self.players.clear();
        self.hurtables.clear();
        self.timers.clear();
        self.tilemaps.clear();
        self.animators.clear();
        self.enemies.clear();
        self.doors.clear();
        self.entities.clear();
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(Rc::new(Content::new()), Some(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::timer::TimerAction;

    fn spawn_timers(world: &mut World, n: i32) -> Vec<(Entity, ComponentRef<Timer>)> {
        (0..n)
            .map(|i| {
                let e = world.add_entity(IVec2::new(i, 0));
                let t = world.add(e, Timer::new(100.0, TimerAction::DestroyEntity));
                (e, t)
            })
            .collect()
    }

    #[test]
    fn test_spawn_and_destroy() {
        let mut world = World::default();

        let e1 = world.add_entity(IVec2::ZERO);
        let e2 = world.add_entity(IVec2::new(4, 4));
        assert_eq!(world.entity_count(), 2);

        world.destroy_entity(e1);
        assert_eq!(world.entity_count(), 1);
        assert!(!world.is_alive(e1));
        assert!(world.is_alive(e2));
        assert_eq!(world.position(e2), Some(IVec2::new(4, 4)));
        assert_eq!(world.position(e1), None);
    }

    #[test]
    fn test_destroy_entity_destroys_components() {
        let mut world = World::default();
        let e = world.add_entity(IVec2::ZERO);
        let c = world.add(e, Collider::make_rect(crate::game::geom::RectI::new(0, 0, 4, 4)));
        world.destroy_entity(e);
        assert!(world.component(c).is_none());
        assert!(world.first::<Collider>().is_none());
        world.flush();
        assert_eq!(world.count::<Collider>(), 0);
    }

    #[test]
    fn test_destroy_single_component() {
        let mut world = World::default();
        let e = world.add_entity(IVec2::ZERO);
        let a = world.add(e, Collider::make_rect(crate::game::geom::RectI::new(0, 0, 4, 4)));
        world.add(e, Timer::new(1.0, TimerAction::DestroyEntity));

        world.destroy(a);
        assert!(world.get::<Collider>(e).is_none());
        assert!(world.get::<Timer>(e).is_some());
        assert!(world.is_alive(e));
        assert_eq!(world.entity(e).unwrap().components().len(), 1);
    }

    #[test]
    fn test_add_to_dead_entity() {
        let mut world = World::default();
        let e = world.add_entity(IVec2::ZERO);
        world.destroy_entity(e);
        let handle = world.add(e, Timer::new(1.0, TimerAction::DestroyEntity));
        assert!(handle.is_null());
        assert_eq!(world.count::<Timer>(), 0);
    }

    #[test]
    fn test_typed_iteration_in_creation_order() {
        let mut world = World::default();
        let spawned = spawn_timers(&mut world, 4);

        let mut seen = Vec::new();
        let mut cursor = world.first::<Timer>();
        while let Some(handle) = cursor {
            seen.push(handle);
            cursor = world.next(handle);
        }
        let expected: Vec<_> = spawned.iter().map(|(_, t)| *t).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_destroy_during_scan() {
        let mut world = World::default();
        let n = 6;
        let k = 3;
        let spawned = spawn_timers(&mut world, n);

        let mut visited = Vec::new();
        let mut cursor = world.first::<Timer>();
        while let Some(handle) = cursor {
            visited.push(handle);
            if visited.len() == k {
                // Destroy the current entity mid-scan, then keep going from it
                let owner = world.owner(handle).unwrap();
                world.destroy_entity(owner);
            }
            cursor = world.next(handle);
        }
        assert_eq!(visited.len(), n as usize);

        // A concurrent scan started after the destroy never sees it
        let mut second = 0;
        let mut cursor = world.first::<Timer>();
        while let Some(handle) = cursor {
            assert_ne!(handle, spawned[k - 1].1);
            second += 1;
            cursor = world.next(handle);
        }
        assert_eq!(second, n as usize - 1);

        world.update();
        assert_eq!(world.count::<Timer>(), n as usize - 1);
        assert_eq!(world.entity_count(), n as usize - 1);
    }

    #[test]
    fn test_destroy_ahead_of_cursor_is_skipped() {
        let mut world = World::default();
        let spawned = spawn_timers(&mut world, 4);

        let mut visited = Vec::new();
        let mut cursor = world.first::<Timer>();
        while let Some(handle) = cursor {
            visited.push(handle);
            if visited.len() == 1 {
                world.destroy_entity(spawned[2].0);
            }
            cursor = world.next(handle);
        }
        assert_eq!(visited, vec![spawned[0].1, spawned[1].1, spawned[3].1]);
    }

    #[test]
    fn test_entity_traversal_skips_destroyed() {
        let mut world = World::default();
        let spawned = spawn_timers(&mut world, 3);
        world.destroy_entity(spawned[1].0);

        let mut seen = Vec::new();
        let mut cursor = world.first_entity();
        while let Some(entity) = cursor {
            seen.push(entity);
            cursor = world.next_entity(entity);
        }
        assert_eq!(seen, vec![spawned[0].0, spawned[2].0]);
        assert_eq!(world.next_entity(spawned[1].0), Some(spawned[2].0));
    }

    #[test]
    fn test_clear() {
        let mut world = World::default();
        let spawned = spawn_timers(&mut world, 3);
        world.clear();
        assert_eq!(world.entity_count(), 0);
        assert!(world.first::<Timer>().is_none());
        assert!(!world.is_alive(spawned[0].0));
        let e = world.add_entity(IVec2::ZERO);
        assert!(world.is_alive(e));
    }
}

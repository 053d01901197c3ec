//! Component Storage
//!
//! Components are behaviour-carrying values attached to entities. Each
//! concrete type lives in its own `Pool<T>`, a generational arena threaded
//! in creation order, so "first of type / next of type" traversal is a
//! pointer chase and never reorders.
//!
//! Component types are known at compile time: every type names its pool
//! on the World through the `Component` trait, and `ComponentKind` is the
//! type-erased tag the World uses to dispatch on a `ComponentKey`.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use super::arena::Arena;
use super::entity::Entity;
use super::world::World;
use crate::render::RenderBatch;

/// Every concrete component type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Collider,
    Mover,
    Player,
    Hurtable,
    Timer,
    Tilemap,
    Animator,
    Enemy,
    Door,
}

/// Type-erased component handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentKey {
    pub kind: ComponentKind,
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl ComponentKey {
    /// Recover the typed handle if the kind matches.
    pub fn typed<T: Component>(self) -> Option<ComponentRef<T>> {
        (self.kind == T::KIND).then(|| ComponentRef::new(self.index, self.generation))
    }
}

/// Typed component handle. Stays valid until the component or its entity
/// is destroyed; afterwards every lookup through it returns `None`.
pub struct ComponentRef<T> {
    index: u32,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ComponentRef<T> {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation, _marker: PhantomData }
    }

    /// A handle that never resolves.
    pub const NULL: Self = Self { index: u32::MAX, generation: 0, _marker: PhantomData };

    pub fn is_null(&self) -> bool {
        self.index == u32::MAX
    }
}

impl<T: Component> ComponentRef<T> {
    pub fn key(&self) -> ComponentKey {
        ComponentKey { kind: T::KIND, index: self.index, generation: self.generation }
    }
}

// Manual impls: derives would put bounds on T
impl<T> Clone for ComponentRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ComponentRef<T> {}

impl<T> PartialEq for ComponentRef<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for ComponentRef<T> {}

impl<T> Hash for ComponentRef<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T> fmt::Debug for ComponentRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentRef({}v{})", self.index, self.generation)
    }
}

/// Capability interface every component implements.
///
/// `update` runs once per frame while the component is temporarily moved
/// out of its pool, so it may freely borrow the World mutably. While it
/// runs, looking up the component itself through the World yields `None`.
pub trait Component: Sized + 'static {
    const KIND: ComponentKind;

    fn pool(world: &World) -> &Pool<Self>;
    fn pool_mut(world: &mut World) -> &mut Pool<Self>;

    fn update(&mut self, _entity: Entity, _this: ComponentRef<Self>, _world: &mut World) {}

    fn render(&self, _entity: Entity, _world: &World, _batch: &mut dyn RenderBatch) {}

    /// Higher depth draws first (further back).
    fn depth(&self) -> i32 {
        0
    }
}

struct Attached<T> {
    entity: Entity,
    /// Creation sequence within the pool, used to bound update passes
    seq: u64,
    /// `None` while the component is checked out for its update
    component: Option<T>,
}

/// Storage for a single component type.
pub struct Pool<T> {
    arena: Arena<Attached<T>>,
    next_seq: u64,
}

impl<T> Pool<T> {
    pub fn new() -> Self {
        Self { arena: Arena::new(), next_seq: 0 }
    }

    pub(crate) fn insert(&mut self, entity: Entity, component: T) -> ComponentRef<T> {
        let seq = self.next_seq;
        self.next_seq += 1;
        let (index, generation) = self.arena.insert(Attached { entity, seq, component: Some(component) });
        ComponentRef::new(index, generation)
    }

    pub fn get(&self, handle: ComponentRef<T>) -> Option<&T> {
        self.arena
            .get(handle.index, handle.generation)
            .and_then(|a| a.component.as_ref())
    }

    pub fn get_mut(&mut self, handle: ComponentRef<T>) -> Option<&mut T> {
        self.arena
            .get_mut(handle.index, handle.generation)
            .and_then(|a| a.component.as_mut())
    }

    /// Owning entity of a live component.
    pub fn owner(&self, handle: ComponentRef<T>) -> Option<Entity> {
        self.arena.get(handle.index, handle.generation).map(|a| a.entity)
    }

    pub fn contains(&self, handle: ComponentRef<T>) -> bool {
        self.arena.is_alive(handle.index, handle.generation)
    }

    pub(crate) fn destroy(&mut self, handle: ComponentRef<T>) -> bool {
        self.arena.destroy(handle.index, handle.generation)
    }

    pub fn first(&self) -> Option<ComponentRef<T>> {
        self.arena.first().map(|(i, g)| ComponentRef::new(i, g))
    }

    pub fn next(&self, handle: ComponentRef<T>) -> Option<ComponentRef<T>> {
        self.arena
            .next(handle.index, handle.generation)
            .map(|(i, g)| ComponentRef::new(i, g))
    }

    /// Sequence number the next inserted component will get.
    pub(crate) fn next_seq(&self) -> u64 {
        self.next_seq
    }

    /// Creation sequence of a component, flagged or not.
    pub(crate) fn seq_of(&self, handle: ComponentRef<T>) -> Option<u64> {
        self.arena.get_flagged(handle.index, handle.generation).map(|a| a.seq)
    }

    /// Check a live component out of its slot for its update.
    pub(crate) fn take(&mut self, handle: ComponentRef<T>) -> Option<(Entity, T)> {
        let attached = self.arena.get_mut(handle.index, handle.generation)?;
        let component = attached.component.take()?;
        Some((attached.entity, component))
    }

    /// Return a checked-out component. The slot may have been flagged in the
    /// meantime; it is then dropped by the next flush.
    pub(crate) fn restore(&mut self, handle: ComponentRef<T>, component: T) {
        if let Some(attached) = self.arena.get_mut_flagged(handle.index, handle.generation) {
            attached.component = Some(component);
        }
    }

    /// Live components in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (ComponentRef<T>, Entity, &T)> + '_ {
        self.arena.iter().filter_map(|(i, g, a)| {
            a.component.as_ref().map(|c| (ComponentRef::new(i, g), a.entity, c))
        })
    }

    pub(crate) fn flush(&mut self) {
        self.arena.flush();
    }

    pub(crate) fn clear(&mut self) {
        self.arena.clear();
    }

    /// Number of live components.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

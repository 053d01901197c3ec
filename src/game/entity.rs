//! Entity handles with generational indices
//!
//! An `Entity` names a slot in the World's entity arena plus the slot's
//! generation. Destroyed slots are recycled after the flush with a bumped
//! generation, so stale handles simply stop resolving.
//!
//! A reference to a dead bramble won't accidentally match a bullet that
//! reused its slot.

use macroquad::math::IVec2;

use super::component::ComponentKey;

/// A unique identifier for a game entity.
///
/// Same index with a different generation is a different entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity {
    /// Index into the entity arena
    index: u32,
    /// Bumped each time the slot is recycled
    generation: u32,
}

impl Entity {
    /// Should only be called by the World.
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// A null/invalid entity reference.
    pub const NULL: Entity = Entity { index: u32::MAX, generation: 0 };

    pub fn is_null(&self) -> bool {
        self.index == u32::MAX
    }
}

impl Default for Entity {
    fn default() -> Self {
        Entity::NULL
    }
}

/// Per-entity data owned by the World.
#[derive(Debug, Clone)]
pub struct EntityRecord {
    /// Position in world pixels
    pub position: IVec2,
    /// Hidden entities are skipped by the render pass
    pub visible: bool,
    /// Attached components in attach order
    pub(crate) components: Vec<ComponentKey>,
}

impl EntityRecord {
    pub(crate) fn new(position: IVec2) -> Self {
        Self {
            position,
            visible: true,
            components: Vec::new(),
        }
    }

    /// Type-erased handles of everything attached to this entity.
    pub fn components(&self) -> &[ComponentKey] {
        &self.components
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_entity() {
        assert!(Entity::NULL.is_null());
        assert!(Entity::default().is_null());
        assert!(!Entity::new(0, 0).is_null());
    }

    #[test]
    fn test_generation_distinguishes_entities() {
        let a = Entity::new(3, 0);
        let b = Entity::new(3, 1);
        assert_ne!(a, b);
        assert_eq!(a.index(), b.index());
    }
}

//! Game Foundation Module
//!
//! A small entity/component framework for a tile-based platformer, plus the
//! gameplay built on top of it.
//!
//! Key concepts:
//! - Entity: generational handle to an integer position and its components
//! - Component: behaviour-carrying values, one pool per concrete type
//! - World: container for all entities and pools, with deferred destruction
//! - Game: the room state machine driving the World
//!
//! Design philosophy:
//! - Simple over flexible (we know what game we're making)
//! - Integer positions, sub-pixel movement through remainders
//! - No runtime type registration (compile-time known components)

pub mod arena;
pub mod entity;
pub mod component;
pub mod world;
pub mod geom;
pub mod masks;
pub mod time;
pub mod collider;
pub mod mover;
pub mod timer;
pub mod tilemap;
pub mod animator;
pub mod hurtable;
pub mod player;
pub mod enemy;
pub mod factory;
pub mod room;
pub mod runtime;

// Re-export main types
pub use collider::Collider;
pub use component::{Component, ComponentKey, ComponentKind, ComponentRef};
pub use entity::Entity;
pub use geom::RectI;
pub use masks::Mask;
pub use mover::Mover;
pub use room::SpawnCode;
pub use runtime::{Game, RoomState};
pub use world::World;

//! Countdown component

use super::component::{Component, ComponentKey, ComponentKind, ComponentRef, Pool};
use super::entity::Entity;
use super::world::World;

/// What happens when a timer runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Destroy the entity carrying the timer
    DestroyEntity,
    /// Destroy one component (e.g. an attack hitbox)
    DestroyComponent(ComponentKey),
}

#[derive(Debug, Clone)]
pub struct Timer {
    remaining: f32,
    pub action: TimerAction,
}

impl Timer {
    pub fn new(duration: f32, action: TimerAction) -> Self {
        Self { remaining: duration, action }
    }

    /// Restart the countdown.
    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

impl Component for Timer {
    const KIND: ComponentKind = ComponentKind::Timer;

    fn pool(world: &World) -> &Pool<Self> {
        &world.timers
    }

    fn pool_mut(world: &mut World) -> &mut Pool<Self> {
        &mut world.timers
    }

    fn update(&mut self, entity: Entity, this: ComponentRef<Self>, world: &mut World) {
        self.remaining -= world.time.delta;
        if self.remaining > 0.0 {
            return;
        }

        // Fires once; the timer removes itself afterwards
        match self.action {
            TimerAction::DestroyEntity => world.destroy_entity(entity),
            TimerAction::DestroyComponent(key) => {
                world.destroy_key(key);
                world.destroy(this);
            }
        }
    }
}

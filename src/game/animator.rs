//! Sprite animation playback
//!
//! The animator stores names, not references, and resolves its sprite
//! through the World's content registry every time it needs frames.

use macroquad::math::Vec2;

use super::component::{Component, ComponentKind, ComponentRef, Pool};
use super::entity::Entity;
use super::world::World;
use crate::content::{Animation, Content, Frame, Sprite};
use crate::render::RenderBatch;

#[derive(Debug, Clone)]
pub struct Animator {
    sprite: String,
    animation: String,
    frame_index: usize,
    frame_counter: f32,
    /// Negative x mirrors the sprite around its origin
    pub scale: Vec2,
    pub depth: i32,
}

impl Animator {
    pub fn new(sprite: &str) -> Self {
        Self {
            sprite: sprite.to_string(),
            animation: String::new(),
            frame_index: 0,
            frame_counter: 0.0,
            scale: Vec2::ONE,
            depth: 0,
        }
    }

    pub fn with_depth(mut self, depth: i32) -> Self {
        self.depth = depth;
        self
    }

    /// Switch animation. Playing the current one again is a no-op unless
    /// `restart` is set.
    pub fn play(&mut self, animation: &str, restart: bool) {
        if self.animation == animation && !restart {
            return;
        }
        self.animation = animation.to_string();
        self.frame_index = 0;
        self.frame_counter = 0.0;
    }

    pub fn sprite_name(&self) -> &str {
        &self.sprite
    }

    pub fn animation(&self) -> &str {
        &self.animation
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn sprite<'a>(&self, content: &'a Content) -> Option<&'a Sprite> {
        content.find_sprite(&self.sprite)
    }

    fn current_animation<'a>(&self, content: &'a Content) -> Option<&'a Animation> {
        self.sprite(content)?.get_animation(&self.animation)
    }

    pub fn current_frame<'a>(&self, content: &'a Content) -> Option<&'a Frame> {
        self.current_animation(content)?.frames.get(self.frame_index)
    }

    /// Length of one loop of a named animation of this sprite, or zero.
    pub fn animation_duration(&self, content: &Content, animation: &str) -> f32 {
        self.sprite(content)
            .and_then(|s| s.get_animation(animation))
            .map(|a| a.duration())
            .unwrap_or(0.0)
    }

    /// Advance the frame clock by `delta` seconds, looping.
    pub fn advance(&mut self, content: &Content, delta: f32) {
        let Some(animation) = self.current_animation(content) else { return };
        let count = animation.frames.len();
        if count == 0 {
            return;
        }

        self.frame_counter += delta;
        // Bounded so a zero-length frame can't spin forever
        for _ in 0..count {
            let duration = animation.frames[self.frame_index % count].duration;
            if self.frame_counter < duration {
                break;
            }
            self.frame_counter -= duration;
            self.frame_index = (self.frame_index + 1) % count;
        }
    }
}

impl Component for Animator {
    const KIND: ComponentKind = ComponentKind::Animator;

    fn pool(world: &World) -> &Pool<Self> {
        &world.animators
    }

    fn pool_mut(world: &mut World) -> &mut Pool<Self> {
        &mut world.animators
    }

    fn update(&mut self, _entity: Entity, _this: ComponentRef<Self>, world: &mut World) {
        let content = world.content.clone();
        self.advance(&content, world.time.delta);
    }

    fn render(&self, entity: Entity, world: &World, batch: &mut dyn RenderBatch) {
        let Some(sprite) = self.sprite(&world.content) else { return };
        let Some(frame) = self.current_frame(&world.content) else { return };
        let Some(position) = world.position(entity) else { return };

        batch.push_matrix(position);
        batch.tex(&frame.image, -sprite.origin * self.scale, self.scale);
        batch.pop_matrix();
    }

    fn depth(&self) -> i32 {
        self.depth
    }
}

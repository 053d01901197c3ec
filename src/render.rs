//! Render batch interface
//!
//! The simulation never talks to the GPU. It issues draw calls against this
//! trait; the host binary implements it on top of macroquad, and tests use
//! `RecordingBatch` to assert on what would have been drawn.

use macroquad::color::Color;
use macroquad::math::{IVec2, Vec2};

use crate::content::Subtexture;
use crate::game::geom::RectI;

pub trait RenderBatch {
    /// Push a translation that applies to every draw until the matching pop.
    fn push_matrix(&mut self, offset: IVec2);
    fn pop_matrix(&mut self);

    /// Draw a sub-image at `position`. Negative scale components mirror it.
    fn tex(&mut self, image: &Subtexture, position: Vec2, scale: Vec2);
    fn rect_line(&mut self, rect: RectI, thickness: f32, color: Color);
    fn text(&mut self, text: &str, position: Vec2, color: Color);
}

/// One recorded draw call, already translated by the matrix stack.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Tex { image: Subtexture, position: Vec2, scale: Vec2 },
    RectLine { rect: RectI },
    Text { text: String, position: Vec2 },
}

/// A batch that records draws instead of rendering them.
#[derive(Debug, Default)]
pub struct RecordingBatch {
    stack: Vec<IVec2>,
    pub calls: Vec<DrawCall>,
}

impl RecordingBatch {
    pub fn new() -> Self {
        Self::default()
    }

    fn offset(&self) -> IVec2 {
        self.stack.iter().fold(IVec2::ZERO, |acc, o| acc + *o)
    }

    /// Depth of the matrix stack; zero after balanced push/pop pairs.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

impl RenderBatch for RecordingBatch {
    fn push_matrix(&mut self, offset: IVec2) {
        self.stack.push(offset);
    }

    fn pop_matrix(&mut self) {
        self.stack.pop();
    }

    fn tex(&mut self, image: &Subtexture, position: Vec2, scale: Vec2) {
        let position = position + self.offset().as_vec2();
        self.calls.push(DrawCall::Tex { image: *image, position, scale });
    }

    fn rect_line(&mut self, rect: RectI, _thickness: f32, _color: Color) {
        let rect = rect.translate(self.offset());
        self.calls.push(DrawCall::RectLine { rect });
    }

    fn text(&mut self, text: &str, position: Vec2, _color: Color) {
        let position = position + self.offset().as_vec2();
        self.calls.push(DrawCall::Text { text: text.to_string(), position });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::color::RED;

    #[test]
    fn test_matrix_stack_translates_draws() {
        let mut batch = RecordingBatch::new();
        batch.push_matrix(IVec2::new(10, 0));
        batch.push_matrix(IVec2::new(0, 5));
        batch.rect_line(RectI::new(1, 1, 2, 2), 1.0, RED);
        batch.pop_matrix();
        batch.rect_line(RectI::new(1, 1, 2, 2), 1.0, RED);
        batch.pop_matrix();

        assert_eq!(batch.depth(), 0);
        assert_eq!(
            batch.calls,
            vec![
                DrawCall::RectLine { rect: RectI::new(11, 6, 2, 2) },
                DrawCall::RectLine { rect: RectI::new(11, 1, 2, 2) },
            ]
        );
    }
}

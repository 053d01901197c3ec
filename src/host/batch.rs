//! RenderBatch on top of macroquad's immediate-mode drawing

use bramble::content::{Content, Subtexture};
use bramble::game::RectI;
use bramble::render::RenderBatch;
use macroquad::prelude::*;

pub struct MacroquadBatch {
    /// GPU copies of `Content::textures()`, same order
    textures: Vec<Texture2D>,
    stack: Vec<IVec2>,
    offset: IVec2,
}

impl MacroquadBatch {
    /// Upload every content texture with nearest filtering.
    pub fn new(content: &Content) -> Self {
        let textures = content
            .textures()
            .iter()
            .map(|data| {
                let (w, h) = data.image.dimensions();
                let texture = Texture2D::from_rgba8(w as u16, h as u16, data.image.as_raw());
                texture.set_filter(FilterMode::Nearest);
                texture
            })
            .collect();
        Self { textures, stack: Vec::new(), offset: IVec2::ZERO }
    }
}

impl RenderBatch for MacroquadBatch {
    fn push_matrix(&mut self, offset: IVec2) {
        self.stack.push(offset);
        self.offset += offset;
    }

    fn pop_matrix(&mut self) {
        if let Some(offset) = self.stack.pop() {
            self.offset -= offset;
        }
    }

    fn tex(&mut self, image: &Subtexture, position: Vec2, scale: Vec2) {
        let Some(texture) = self.textures.get(image.texture.0 as usize) else { return };
        let source = image.source;
        let size = vec2(source.w as f32 * scale.x.abs(), source.h as f32 * scale.y.abs());

        // Mirrored images extend back from the anchor
        let mut at = position + self.offset.as_vec2();
        if scale.x < 0.0 {
            at.x -= size.x;
        }
        if scale.y < 0.0 {
            at.y -= size.y;
        }

        draw_texture_ex(
            texture,
            at.x,
            at.y,
            WHITE,
            DrawTextureParams {
                source: Some(Rect::new(source.x as f32, source.y as f32, source.w as f32, source.h as f32)),
                dest_size: Some(size),
                flip_x: scale.x < 0.0,
                flip_y: scale.y < 0.0,
                ..Default::default()
            },
        );
    }

    fn rect_line(&mut self, rect: RectI, thickness: f32, color: Color) {
        let rect = rect.translate(self.offset);
        draw_rectangle_lines(rect.x as f32, rect.y as f32, rect.w as f32, rect.h as f32, thickness, color);
    }

    fn text(&mut self, text: &str, position: Vec2, color: Color) {
        let at = position + self.offset.as_vec2();
        draw_text(text, at.x, at.y, 8.0, color);
    }
}

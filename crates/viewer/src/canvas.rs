//! Drawing surface abstraction and its macroquad implementation.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use macroquad::color::Color;
use macroquad::math::{Rect, Vec2};
use macroquad::text::{draw_text, measure_text};
use macroquad::texture::{draw_texture_ex, DrawTextureParams, Image, Texture2D};
use shakmaty::{Piece, Role};
use tracing::info;

use crate::error::ViewerError;

/// Primitive operations the renderer needs. Text is positioned by its
/// top-left corner.
pub trait Canvas {
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color);
    fn triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Color);
    fn text(&mut self, text: &str, at: Vec2, size: f32, color: Color);
    fn text_width(&self, text: &str, size: f32) -> f32;
    fn piece(&mut self, piece: Piece, rect: Rect);
}

/// File name of the glyph for `piece`, e.g. `wN.png`.
pub fn glyph_file_name(piece: Piece) -> String {
    let side = if piece.color.is_white() { 'w' } else { 'b' };
    format!("{side}{}.png", piece.role.upper_char())
}

/// Every piece that needs a glyph.
pub fn all_pieces() -> impl Iterator<Item = Piece> {
    [shakmaty::Color::White, shakmaty::Color::Black]
        .into_iter()
        .flat_map(|color| Role::ALL.into_iter().map(move |role| Piece { color, role }))
}

/// Canvas drawing into the macroquad window.
pub struct MacroquadCanvas {
    glyphs: HashMap<char, Texture2D>,
}

impl MacroquadCanvas {
    /// Load all twelve piece images from `dir`. Must run inside the
    /// macroquad main loop.
    pub fn load(dir: &Path) -> Result<Self, ViewerError> {
        let mut glyphs = HashMap::new();
        for piece in all_pieces() {
            let path = dir.join(glyph_file_name(piece));
            let bytes = fs::read(&path)
                .map_err(|e| ViewerError::Glyph(format!("{}: {e}", path.display())))?;
            let image = Image::from_file_with_format(&bytes, None)
                .map_err(|e| ViewerError::Glyph(format!("{}: {e}", path.display())))?;
            glyphs.insert(piece.char(), Texture2D::from_image(&image));
        }
        info!(dir = %dir.display(), "Piece glyphs loaded");
        Ok(Self { glyphs })
    }
}

impl Canvas for MacroquadCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        macroquad::shapes::draw_rectangle(rect.x, rect.y, rect.w, rect.h, color);
    }

    fn line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color) {
        macroquad::shapes::draw_line(from.x, from.y, to.x, to.y, thickness, color);
    }

    fn triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Color) {
        macroquad::shapes::draw_triangle(a, b, c, color);
    }

    fn text(&mut self, text: &str, at: Vec2, size: f32, color: Color) {
        let dims = measure_text(text, None, size as u16, 1.0);
        draw_text(text, at.x, at.y + dims.offset_y, size, color);
    }

    fn text_width(&self, text: &str, size: f32) -> f32 {
        measure_text(text, None, size as u16, 1.0).width
    }

    fn piece(&mut self, piece: Piece, rect: Rect) {
        if let Some(texture) = self.glyphs.get(&piece.char()) {
            draw_texture_ex(
                texture,
                rect.x,
                rect.y,
                macroquad::color::WHITE,
                DrawTextureParams {
                    dest_size: Some(rect.size()),
                    ..Default::default()
                },
            );
        }
    }
}

//! Pixel geometry of the board window.

use macroquad::math::{Rect, Vec2};
use shakmaty::{Color, File, Rank, Square};

/// Side length of the board area, in pixels.
pub const BOARD_SIZE: f32 = 800.0;

/// Height of the info band above the board.
pub const HEADER_HEIGHT: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardLayout {
    pub square_size: f32,
    pub header_height: f32,
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self {
            square_size: BOARD_SIZE / 8.0,
            header_height: HEADER_HEIGHT,
        }
    }
}

impl BoardLayout {
    pub fn width(&self) -> f32 {
        self.square_size * 8.0
    }

    pub fn height(&self) -> f32 {
        self.header_height + self.width()
    }

    /// Screen column and row (row 0 at the top) of `square` with `bottom`
    /// pieces drawn at the bottom.
    pub fn cell(&self, square: Square, bottom: Color) -> (u32, u32) {
        let file = square.file() as u32;
        let rank = square.rank() as u32;
        match bottom {
            Color::White => (file, 7 - rank),
            Color::Black => (7 - file, rank),
        }
    }

    /// Inverse of [`BoardLayout::cell`].
    pub fn square_at(&self, col: u32, row: u32, bottom: Color) -> Square {
        match bottom {
            Color::White => Square::from_coords(File::new(col), Rank::new(7 - row)),
            Color::Black => Square::from_coords(File::new(7 - col), Rank::new(row)),
        }
    }

    pub fn cell_rect(&self, col: u32, row: u32) -> Rect {
        Rect::new(
            col as f32 * self.square_size,
            row as f32 * self.square_size + self.header_height,
            self.square_size,
            self.square_size,
        )
    }

    pub fn square_rect(&self, square: Square, bottom: Color) -> Rect {
        let (col, row) = self.cell(square, bottom);
        self.cell_rect(col, row)
    }

    pub fn square_center(&self, square: Square, bottom: Color) -> Vec2 {
        self.square_rect(square, bottom).center()
    }
}

/// Light squares are the ones whose screen coordinates sum to an even number.
pub fn is_light(col: u32, row: u32) -> bool {
    (col + row) % 2 == 0
}

/// Resolved geometry of a move arrow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowShape {
    pub shaft_start: Vec2,
    pub shaft_end: Vec2,
    pub width: f32,
    /// Tip followed by the two base corners.
    pub head: [Vec2; 3],
}

/// Arrow from `start` to `end` with a shaft of `width` pixels. The head is
/// `3 * width` long; `None` for a zero-length arrow.
pub fn arrow_shape(start: Vec2, end: Vec2, width: f32) -> Option<ArrowShape> {
    let direction = end - start;
    if direction.length_squared() == 0.0 {
        return None;
    }

    let unit = direction.normalize();
    let perpendicular = Vec2::new(-unit.y, unit.x);
    let head_size = width * 3.0;
    let base_center = end - unit * head_size;
    let half_base = head_size / 1.5;

    Some(ArrowShape {
        shaft_start: start,
        shaft_end: end - unit * (head_size * 0.5),
        width,
        head: [
            end,
            base_center + perpendicular * half_base,
            base_center - perpendicular * half_base,
        ],
    })
}

//! Board, header and arrow drawing.

use macroquad::color::Color;
use macroquad::math::{Rect, Vec2};
use shakmaty::{uci::UciMove, CastlingMode, Chess, Color as Side, Move, Position};

use crate::canvas::Canvas;
use crate::layout::{arrow_shape, is_light, BoardLayout};
use crate::session::HeaderStats;

pub const LIGHT_SQUARE: [u8; 3] = [238, 238, 210];
pub const DARK_SQUARE: [u8; 3] = [118, 150, 86];
pub const ARROW_COLOR: [u8; 3] = [255, 165, 0];
const HEADER_BACKGROUND: [u8; 3] = [44, 44, 44];
const HEADER_SEPARATOR: [u8; 3] = [100, 100, 100];
const RESULT_COLOR: [u8; 3] = [255, 215, 0];
const HELP_COLOR: [u8; 3] = [180, 180, 180];
const TEXT_COLOR: [u8; 3] = [255, 255, 255];

const FONT_SIZE: f32 = 24.0;
const SMALL_FONT_SIZE: f32 = 18.0;

/// Default shaft width of the suggested-move arrow.
pub const ARROW_WIDTH: f32 = 10.0;

pub fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::from_rgba(r, g, b, 255)
}

#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    pub layout: BoardLayout,
    pub arrow_width: f32,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            layout: BoardLayout::default(),
            arrow_width: ARROW_WIDTH,
        }
    }
}

impl Renderer {
    pub fn draw_header<C: Canvas>(&self, canvas: &mut C, stats: &HeaderStats) {
        let width = self.layout.width();
        let height = self.layout.header_height;

        canvas.fill_rect(Rect::new(0.0, 0.0, width, height), rgb(HEADER_BACKGROUND));
        canvas.line(
            Vec2::new(0.0, height - 2.0),
            Vec2::new(width, height - 2.0),
            2.0,
            rgb(HEADER_SEPARATOR),
        );

        let white = format!("White : {} ({})", stats.white, stats.white_elo);
        canvas.text(&white, Vec2::new(20.0, 20.0), FONT_SIZE, rgb(TEXT_COLOR));
        let black = format!("Black : {} ({})", stats.black, stats.black_elo);
        canvas.text(&black, Vec2::new(20.0, 55.0), FONT_SIZE, rgb(TEXT_COLOR));

        let result_width = canvas.text_width(&stats.result, FONT_SIZE);
        canvas.text(
            &stats.result,
            Vec2::new(width / 2.0 - result_width / 2.0, height / 2.0 - FONT_SIZE / 2.0),
            FONT_SIZE,
            rgb(RESULT_COLOR),
        );

        let eval = format!("Eval = {:.2}", stats.evaluation);
        canvas.text(&eval, Vec2::new(width / 2.0, 80.0), SMALL_FONT_SIZE, rgb(TEXT_COLOR));

        canvas.text(
            "<- : previous | next : ->",
            Vec2::new(500.0, 10.0),
            SMALL_FONT_SIZE,
            rgb(HELP_COLOR),
        );
        canvas.text(
            "f : flip board | q : quit",
            Vec2::new(500.0, 40.0),
            SMALL_FONT_SIZE,
            rgb(HELP_COLOR),
        );
    }

    /// Squares and pieces with `bottom` pieces at the bottom, then the
    /// highlighted move on top.
    pub fn draw_board<C: Canvas>(
        &self,
        canvas: &mut C,
        bottom: Side,
        position: &Chess,
        highlight: Option<&Move>,
    ) {
        let board = position.board();
        for row in 0..8 {
            for col in 0..8 {
                let rect = self.layout.cell_rect(col, row);
                let color = if is_light(col, row) { LIGHT_SQUARE } else { DARK_SQUARE };
                canvas.fill_rect(rect, rgb(color));

                let square = self.layout.square_at(col, row, bottom);
                if let Some(piece) = board.piece_at(square) {
                    canvas.piece(piece, rect);
                }
            }
        }

        if let Some(mv) = highlight {
            self.draw_move_arrow(canvas, mv, bottom);
        }
    }

    /// Arrow from the origin to the destination square of `mv`. Castling
    /// points at the king's destination.
    pub fn draw_move_arrow<C: Canvas>(&self, canvas: &mut C, mv: &Move, bottom: Side) {
        let UciMove::Normal { from, to, .. } = mv.to_uci(CastlingMode::Standard) else {
            return;
        };
        self.draw_arrow(
            canvas,
            self.layout.square_center(from, bottom),
            self.layout.square_center(to, bottom),
        );
    }

    pub fn draw_arrow<C: Canvas>(&self, canvas: &mut C, start: Vec2, end: Vec2) {
        let Some(arrow) = arrow_shape(start, end, self.arrow_width) else {
            return;
        };
        let color = rgb(ARROW_COLOR);
        canvas.line(arrow.shaft_start, arrow.shaft_end, arrow.width, color);
        canvas.triangle(arrow.head[0], arrow.head[1], arrow.head[2], color);
    }
}

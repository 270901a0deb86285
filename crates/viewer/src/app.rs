//! macroquad frame loop shared by the viewer binaries.

use chess_core::Engine;
use macroquad::color::BLACK;
use macroquad::window::{clear_background, next_frame, Conf};

use crate::canvas::MacroquadCanvas;
use crate::error::ViewerError;
use crate::input;
use crate::layout::BoardLayout;
use crate::render::Renderer;
use crate::session::{Flow, Session};

pub fn window_conf() -> Conf {
    let layout = BoardLayout::default();
    Conf {
        window_title: "PGN Replay".to_owned(),
        window_width: layout.width() as i32,
        window_height: layout.height() as i32,
        window_resizable: false,
        ..Default::default()
    }
}

/// Run frames until the user quits the game or closes the window.
pub async fn run<E: Engine>(
    session: &mut Session<E>,
    renderer: &Renderer,
    canvas: &mut MacroquadCanvas,
) -> Result<Flow, ViewerError> {
    loop {
        let events = input::poll_events();
        clear_background(BLACK);
        let flow = session.frame(&events, renderer, canvas)?;
        // Consume this frame's key presses before the caller opens the next game.
        next_frame().await;
        if flow != Flow::Continue {
            return Ok(flow);
        }
    }
}

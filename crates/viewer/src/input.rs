//! Keyboard and window events.

use macroquad::input::{is_key_pressed, is_quit_requested, KeyCode};

use crate::session::InputEvent;

const BINDINGS: [KeyCode; 4] = [KeyCode::Right, KeyCode::Left, KeyCode::F, KeyCode::Q];

pub fn map_key(key: KeyCode) -> Option<InputEvent> {
    match key {
        KeyCode::Right => Some(InputEvent::StepForward),
        KeyCode::Left => Some(InputEvent::StepBackward),
        KeyCode::F => Some(InputEvent::FlipBoard),
        KeyCode::Q => Some(InputEvent::Quit),
        _ => None,
    }
}

/// Events observed since the previous frame.
pub fn poll_events() -> Vec<InputEvent> {
    let mut events: Vec<InputEvent> = BINDINGS
        .into_iter()
        .filter(|key| is_key_pressed(*key))
        .filter_map(map_key)
        .collect();
    if is_quit_requested() {
        events.push(InputEvent::Close);
    }
    events
}

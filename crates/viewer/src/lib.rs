//! Interactive PGN replay viewer
//!
//! Steps through a game with the arrow keys while an external engine
//! evaluates each position and suggests a move, drawn as an arrow.

pub mod app;
pub mod canvas;
pub mod config;
pub mod error;
pub mod input;
pub mod layout;
pub mod render;
pub mod session;

pub use config::ViewerConfig;
pub use error::ViewerError;
pub use render::Renderer;
pub use session::{Flow, HeaderStats, InputEvent, Session};

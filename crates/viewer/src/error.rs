//! Viewer error types

use chess_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Piece glyph error: {0}")]
    Glyph(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

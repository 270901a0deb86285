//! Scanner error types

use chess_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScannerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Archive pattern error: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

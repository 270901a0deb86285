//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Setup error: {0}")]
    Setup(String),

    #[error("Missing header field: {0}")]
    MissingHeader(&'static str),

    #[error("Engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("Engine protocol error: {0}")]
    Protocol(String),

    #[error("Engine returned no score for position {fen}")]
    EvaluationAnomaly { fen: String },

    #[error("Illegal move {mv} at ply {ply}")]
    IllegalMove { mv: String, ply: usize },

    #[error("PGN error: {0}")]
    Pgn(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

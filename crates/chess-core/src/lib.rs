pub mod engine;
pub mod error;
pub mod failed_openings;
pub mod game_data;
pub mod pgn;
pub mod stockfish;

pub use engine::{Engine, Score};
pub use error::CoreError;
pub use failed_openings::{FailedOpening, FailedOpeningStore};
pub use game_data::{GameHeader, GameRecord};

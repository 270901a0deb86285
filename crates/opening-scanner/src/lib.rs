//! Opening-failure scanner
//!
//! Replays the first plies of every game in a PGN archive, asks the engine
//! for an evaluation after each one, and records the lines where the
//! configured player ended up clearly worse.

pub mod config;
pub mod error;
pub mod scanner;

pub use config::ScannerConfig;
pub use error::ScannerError;
pub use scanner::{ScanReport, ScanSettings, Scanner};

//! Viewer configuration from environment variables and command-line flags

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use chess_core::failed_openings::DEFAULT_STORE_PATH;

use crate::error::ViewerError;
use crate::session::DEFAULT_MOVETIME;

#[derive(Clone, Debug)]
pub struct ViewerConfig {
    /// PGN archive to open
    pub archive: Option<PathBuf>,

    /// 1-based index of the game to show
    pub game_index: usize,

    /// Failed-opening store replayed by `replay-failed`
    pub store_path: PathBuf,

    /// Path to Stockfish binary
    pub stockfish_path: String,

    /// Player whose side is drawn at the bottom
    pub user: Option<String>,

    /// Directory holding wP.png .. bK.png
    pub pieces_dir: PathBuf,

    /// Engine time per call
    pub movetime: Duration,
}

impl ViewerConfig {
    /// Load configuration from the process environment and arguments.
    pub fn load() -> Result<Self, ViewerError> {
        Self::from_sources(env::args().skip(1), |key| env::var(key).ok())
    }

    /// Build the config from explicit arguments and a variable lookup.
    /// Flags take precedence over variables.
    pub fn from_sources<A, F>(args: A, var: F) -> Result<Self, ViewerError>
    where
        A: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut archive = var("PGN_PATH");
        let mut game_index = var("GAME_INDEX");
        let mut store_path = var("FAILED_OPENINGS_PATH");
        let mut user = var("CHESS_USER");
        let mut pieces_dir = var("PIECES_DIR");

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let slot = match arg.as_str() {
                "--game" => &mut game_index,
                "--store" => &mut store_path,
                "--user" => &mut user,
                "--pieces" => &mut pieces_dir,
                flag if flag.starts_with("--") => {
                    return Err(ViewerError::Config(format!("unknown flag {flag}")));
                }
                _ => {
                    archive = Some(arg.clone());
                    continue;
                }
            };
            *slot = Some(
                args.next()
                    .ok_or_else(|| ViewerError::Config(format!("{arg} needs a value")))?,
            );
        }

        let game_index = match game_index {
            Some(v) => v
                .parse()
                .ok()
                .filter(|&n: &usize| n >= 1)
                .ok_or_else(|| ViewerError::Config(format!("invalid game index {v:?}")))?,
            None => 1,
        };

        let stockfish_path = var("STOCKFISH_PATH")
            .ok_or_else(|| ViewerError::Config("STOCKFISH_PATH not set".into()))?;

        let movetime = var("ENGINE_MOVETIME_MS")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_MOVETIME);

        Ok(Self {
            archive: archive.map(PathBuf::from),
            game_index,
            store_path: store_path
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH)),
            stockfish_path,
            user,
            pieces_dir: pieces_dir
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("assets/pieces")),
            movetime,
        })
    }
}

//! Scanner configuration from environment variables and command-line flags

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use chess_core::failed_openings::DEFAULT_STORE_PATH;

use crate::error::ScannerError;
use crate::scanner::{ScanSettings, DEFAULT_LOSS_THRESHOLD, DEFAULT_OPENING_DEPTH};

#[derive(Clone, Debug)]
pub struct ScannerConfig {
    /// PGN file, or directory of PGN files
    pub archive: PathBuf,

    /// JSON store receiving failed lines
    pub store_path: PathBuf,

    /// Path to Stockfish binary
    pub stockfish_path: String,

    /// Player whose openings are checked
    pub user: String,

    /// Plies replayed per game
    pub opening_depth: usize,

    /// Losing evaluation in pawns
    pub loss_threshold: f64,

    /// Engine time per position
    pub movetime: Duration,
}

impl ScannerConfig {
    /// Load configuration from the process environment and arguments.
    pub fn load() -> Result<Self, ScannerError> {
        Self::from_sources(env::args().skip(1), |key| env::var(key).ok())
    }

    /// Build the config from explicit arguments and a variable lookup.
    /// Flags take precedence over variables.
    pub fn from_sources<A, F>(args: A, var: F) -> Result<Self, ScannerError>
    where
        A: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut archive = var("PGN_PATH");
        let mut store_path = var("FAILED_OPENINGS_PATH");
        let mut user = var("CHESS_USER");
        let mut opening_depth = var("OPENING_DEPTH");
        let mut loss_threshold = var("LOSS_THRESHOLD");

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let slot = match arg.as_str() {
                "--out" => &mut store_path,
                "--user" => &mut user,
                "--depth" => &mut opening_depth,
                "--threshold" => &mut loss_threshold,
                flag if flag.starts_with("--") => {
                    return Err(ScannerError::Config(format!("unknown flag {flag}")));
                }
                _ => {
                    archive = Some(arg.clone());
                    continue;
                }
            };
            *slot = Some(
                args.next()
                    .ok_or_else(|| ScannerError::Config(format!("{arg} needs a value")))?,
            );
        }

        let archive = archive
            .map(PathBuf::from)
            .ok_or_else(|| ScannerError::Config("no PGN archive given (argument or PGN_PATH)".into()))?;

        let stockfish_path = var("STOCKFISH_PATH")
            .ok_or_else(|| ScannerError::Config("STOCKFISH_PATH not set".into()))?;

        let user = user.ok_or_else(|| ScannerError::Config("CHESS_USER not set".into()))?;

        let opening_depth = opening_depth
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_OPENING_DEPTH);

        let loss_threshold = loss_threshold
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_LOSS_THRESHOLD);

        let movetime = var("ENGINE_MOVETIME_MS")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(crate::scanner::DEFAULT_MOVETIME);

        Ok(Self {
            archive,
            store_path: store_path
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH)),
            stockfish_path,
            user,
            opening_depth,
            loss_threshold,
            movetime,
        })
    }

    pub fn settings(&self) -> ScanSettings {
        ScanSettings {
            user: self.user.clone(),
            depth: self.opening_depth,
            threshold: self.loss_threshold,
            budget: self.movetime,
        }
    }

    /// PGN files to scan, in a stable order.
    pub fn archive_paths(&self) -> Result<Vec<PathBuf>, ScannerError> {
        if !self.archive.is_dir() {
            return Ok(vec![self.archive.clone()]);
        }

        let pattern = format!("{}/*.pgn", self.archive.display());
        let mut paths: Vec<PathBuf> = glob::glob(&pattern)?.filter_map(|p| p.ok()).collect();
        paths.sort();

        if paths.is_empty() {
            return Err(ScannerError::Config(format!(
                "no PGN files found in {}",
                self.archive.display()
            )));
        }
        Ok(paths)
    }
}

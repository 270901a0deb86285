//! Persisted list of opening lines the user lost.
//!
//! The store is a JSON array of `{ "header": {...}, "moves": ["e2e4", ...] }`
//! objects. Every append rewrites the whole file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::game_data::{GameHeader, GameRecord};

/// Default location of the store, relative to the working directory.
pub const DEFAULT_STORE_PATH: &str = "data/opening_failed.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedOpening {
    pub header: GameHeader,
    /// Moves in UCI notation from the standard start position
    pub moves: Vec<String>,
}

impl FailedOpening {
    /// Entry holding the header and the first `plies` moves of `game`.
    pub fn from_game(game: &GameRecord, plies: usize) -> Self {
        Self {
            header: game.header.clone(),
            moves: game.uci_moves(plies),
        }
    }

    /// Replayable game for this line.
    pub fn to_game(&self) -> Result<GameRecord, CoreError> {
        GameRecord::from_uci_line(self.header.clone(), &self.moves)
    }
}

pub struct FailedOpeningStore {
    path: PathBuf,
}

impl FailedOpeningStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw array elements. A missing, unreadable or non-array file reads as empty.
    fn read_all(&self) -> Vec<JsonValue> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No store yet, starting empty");
                return Vec::new();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Store unreadable, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<JsonValue>(&text) {
            Ok(JsonValue::Array(items)) => items,
            Ok(_) => {
                warn!(path = %self.path.display(), "Store is not a JSON array, starting empty");
                Vec::new()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Store is not valid JSON, starting empty");
                Vec::new()
            }
        }
    }

    /// All stored lines, oldest first.
    pub fn load(&self) -> Result<Vec<FailedOpening>, CoreError> {
        self.read_all()
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(CoreError::from))
            .collect()
    }

    /// Append one entry and rewrite the file.
    pub fn append(&self, entry: &FailedOpening) -> Result<(), CoreError> {
        let mut items = self.read_all();
        items.push(serde_json::to_value(entry)?);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        items.serialize(&mut ser)?;
        fs::write(&self.path, buf)?;

        debug!(path = %self.path.display(), total = items.len(), "Store updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_path(name: &str) -> PathBuf {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("failed-openings-{name}-{}.json", ts % 1_000_000_000))
    }

    fn entry(white: &str) -> FailedOpening {
        FailedOpening {
            header: [("White", white), ("Black", "x")].into_iter().collect(),
            moves: vec!["e2e4".into(), "e7e5".into()],
        }
    }

    #[test]
    fn test_non_array_store_is_treated_as_empty() {
        let path = scratch_path("object");
        fs::write(&path, r#"{"not": "a list"}"#).unwrap();
        let store = FailedOpeningStore::new(&path);

        assert!(store.load().unwrap().is_empty());
        store.append(&entry("a")).unwrap();
        assert_eq!(store.load().unwrap(), vec![entry("a")]);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_malformed_store_is_treated_as_empty() {
        let path = scratch_path("garbage");
        fs::write(&path, "[{ truncated").unwrap();
        let store = FailedOpeningStore::new(&path);

        store.append(&entry("b")).unwrap();
        assert_eq!(store.load().unwrap(), vec![entry("b")]);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_written_with_four_space_indent() {
        let path = scratch_path("indent");
        let store = FailedOpeningStore::new(&path);
        store.append(&entry("c")).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n    {"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_entry_replays_from_standard_start() {
        let game = entry("d").to_game().unwrap();
        assert_eq!(game.len(), 2);
        assert_eq!(FailedOpening::from_game(&game, 1).moves, vec!["e2e4"]);
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use shakmaty::{uci::UciMove, CastlingMode, Chess, Color, Move, Position};

use crate::error::CoreError;

pub const STANDARD_START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// PGN tag pairs of a game, keyed by tag name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameHeader(BTreeMap<String, String>);

impl GameHeader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Look up a tag that must be present for the game to be usable.
    pub fn require(&self, name: &'static str) -> Result<&str, CoreError> {
        self.get(name).ok_or(CoreError::MissingHeader(name))
    }

    /// Which side `user` played in this game.
    pub fn side_of(&self, user: &str) -> Result<Color, CoreError> {
        if self.require("White")? == user {
            return Ok(Color::White);
        }
        if self.require("Black")? == user {
            return Ok(Color::Black);
        }
        Err(CoreError::Setup(format!("{user} is neither White nor Black in this game")))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for GameHeader {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A game loaded from an archive or rebuilt from a stored move list.
#[derive(Debug, Clone)]
pub struct GameRecord {
    pub header: GameHeader,
    pub start: Chess,
    pub moves: Vec<Move>,
}

impl GameRecord {
    /// Rebuild a game from UCI move strings played from the standard start position.
    pub fn from_uci_line<S: AsRef<str>>(header: GameHeader, moves: &[S]) -> Result<Self, CoreError> {
        let start = Chess::default();
        let mut pos = start.clone();
        let mut resolved = Vec::with_capacity(moves.len());

        for (ply, text) in moves.iter().enumerate() {
            let text = text.as_ref();
            let illegal = || CoreError::IllegalMove {
                mv: text.to_string(),
                ply,
            };
            let uci: UciMove = text.parse().map_err(|_| illegal())?;
            let mv = uci.to_move(&pos).map_err(|_| illegal())?;
            pos.play_unchecked(mv);
            resolved.push(mv);
        }

        Ok(Self {
            header,
            start,
            moves: resolved,
        })
    }

    /// Whether the game starts from the usual initial position.
    pub fn has_standard_start(&self) -> bool {
        self.header
            .get("FEN")
            .map_or(true, |fen| fen == STANDARD_START_FEN)
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Position after the first `ply` moves (clamped to the game length).
    pub fn position_at(&self, ply: usize) -> Chess {
        let mut pos = self.start.clone();
        for mv in self.moves.iter().take(ply) {
            pos.play_unchecked(*mv);
        }
        pos
    }

    /// The first `ply` moves in UCI notation.
    pub fn uci_moves(&self, ply: usize) -> Vec<String> {
        self.moves
            .iter()
            .take(ply)
            .map(|mv| mv.to_uci(CastlingMode::Standard).to_string())
            .collect()
    }
}

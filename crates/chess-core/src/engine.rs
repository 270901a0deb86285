//! Narrow interface to a move-analysis engine.

use std::time::Duration;

use shakmaty::{Chess, Color, Move};

use crate::error::CoreError;

/// Score reported for saturated (forced mate) evaluations, in pawns.
pub const MATE_SCORE: f64 = 99.0;

/// Engine evaluation from White's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    Centipawns(i32),
    /// Forced mate in `moves` for `winner`.
    Mate { moves: u32, winner: Color },
}

impl Score {
    /// Convert a UCI `score cp` value, which is relative to the side to move.
    pub fn from_cp(cp: i32, turn: Color) -> Self {
        match turn {
            Color::White => Score::Centipawns(cp),
            Color::Black => Score::Centipawns(-cp),
        }
    }

    /// Convert a UCI `score mate` value. `mate 0` and negative values mean the
    /// side to move is the one getting mated.
    pub fn from_mate(mate: i32, turn: Color) -> Self {
        let winner = if mate > 0 { turn } else { !turn };
        Score::Mate {
            moves: mate.unsigned_abs(),
            winner,
        }
    }

    /// Evaluation in pawns, mate saturating at +/- `MATE_SCORE`.
    pub fn pawns(&self) -> f64 {
        match *self {
            Score::Centipawns(cp) => f64::from(cp) / 100.0,
            Score::Mate {
                winner: Color::White,
                ..
            } => MATE_SCORE,
            Score::Mate {
                winner: Color::Black,
                ..
            } => -MATE_SCORE,
        }
    }
}

/// A long-lived analysis engine. Calls block for up to `budget`.
pub trait Engine {
    /// Evaluate `position`; `None` when the engine reported no score.
    fn evaluate(&mut self, position: &Chess, budget: Duration) -> Result<Option<Score>, CoreError>;

    /// Best move in `position`; `None` when there is no legal move.
    fn suggest_move(&mut self, position: &Chess, budget: Duration) -> Result<Option<Move>, CoreError>;

    /// Stop the engine. Calling it more than once has no further effect.
    fn shutdown(&mut self);
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn evaluate(&mut self, position: &Chess, budget: Duration) -> Result<Option<Score>, CoreError> {
        (**self).evaluate(position, budget)
    }

    fn suggest_move(&mut self, position: &Chess, budget: Duration) -> Result<Option<Move>, CoreError> {
        (**self).suggest_move(position, budget)
    }

    fn shutdown(&mut self) {
        (**self).shutdown()
    }
}

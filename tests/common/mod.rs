#![allow(dead_code)]

use std::cell::Cell;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chess_core::pgn::ArchiveReader;
use chess_core::{CoreError, Engine, GameRecord, Score};
use macroquad::color::Color;
use macroquad::math::{Rect, Vec2};
use shakmaty::fen::Fen;
use shakmaty::{Chess, EnPassantMode, Move, Piece, Position};
use viewer::canvas::Canvas;

/// Morphy's opera game, 33 plies.
pub const OPERA_MOVES: &str = "1. e4 e5 2. Nf3 d6 3. d4 Bg4 4. dxe5 Bxf3 5. Qxf3 dxe5 \
6. Bc4 Nf6 7. Qb3 Qe7 8. Nc3 c6 9. Bg5 b5 10. Nxb5 cxb5 11. Bxb5+ Nbd7 \
12. O-O-O Rd8 13. Rxd7 Rxd7 14. Rd1 Qe6 15. Bxd7+ Nxd7 16. Qb8+ Nxb8 17. Rd8# 1-0";

pub const OPERA_PLIES: usize = 33;

/// PGN text of the opera game with the given players.
pub fn opera_pgn(white: &str, black: &str) -> String {
    format!(
        "[Event \"Paris\"]\n[White \"{white}\"]\n[Black \"{black}\"]\n\
         [WhiteElo \"2600\"]\n[BlackElo \"2100\"]\n[Result \"1-0\"]\n\n{OPERA_MOVES}\n\n"
    )
}

pub fn opera_game(white: &str, black: &str) -> GameRecord {
    ArchiveReader::new(opera_pgn(white, black).as_bytes())
        .next_game()
        .unwrap()
        .unwrap()
}

pub fn fen(pos: &Chess) -> String {
    Fen::from_position(pos, EnPassantMode::Legal).to_string()
}

/// Generate a unique suffix based on timestamp to avoid collisions.
pub fn unique_suffix() -> String {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}", ts % 1_000_000_000)
}

/// Path in the temp dir that does not exist yet.
pub fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{name}-{}.json", unique_suffix()))
}

/// Call counters shared between a test and its `MockEngine`.
#[derive(Clone, Default)]
pub struct EngineLog {
    pub evaluations: Rc<Cell<usize>>,
    pub suggestions: Rc<Cell<usize>>,
    pub shutdowns: Rc<Cell<usize>>,
    pub budgets: Rc<Cell<Option<Duration>>>,
}

/// Engine answering from a script of scores, then 0.00. Suggests the first
/// legal move.
pub struct MockEngine {
    scores: VecDeque<Option<Score>>,
    log: EngineLog,
}

impl MockEngine {
    pub fn new() -> (Self, EngineLog) {
        Self::with_scores(Vec::new())
    }

    pub fn with_scores(scores: Vec<Option<Score>>) -> (Self, EngineLog) {
        let log = EngineLog::default();
        let engine = Self {
            scores: scores.into(),
            log: log.clone(),
        };
        (engine, log)
    }
}

impl Engine for MockEngine {
    fn evaluate(&mut self, _: &Chess, budget: Duration) -> Result<Option<Score>, CoreError> {
        self.log.evaluations.set(self.log.evaluations.get() + 1);
        self.log.budgets.set(Some(budget));
        Ok(self
            .scores
            .pop_front()
            .unwrap_or(Some(Score::Centipawns(0))))
    }

    fn suggest_move(&mut self, position: &Chess, _: Duration) -> Result<Option<Move>, CoreError> {
        self.log.suggestions.set(self.log.suggestions.get() + 1);
        Ok(position.legal_moves().first().cloned())
    }

    fn shutdown(&mut self) {
        self.log.shutdowns.set(self.log.shutdowns.get() + 1);
    }
}

/// Canvas that only counts draw calls.
#[derive(Default)]
pub struct CountingCanvas {
    pub calls: usize,
    pub triangles: usize,
}

impl Canvas for CountingCanvas {
    fn fill_rect(&mut self, _: Rect, _: Color) {
        self.calls += 1;
    }

    fn line(&mut self, _: Vec2, _: Vec2, _: f32, _: Color) {
        self.calls += 1;
    }

    fn triangle(&mut self, _: Vec2, _: Vec2, _: Vec2, _: Color) {
        self.calls += 1;
        self.triangles += 1;
    }

    fn text(&mut self, _: &str, _: Vec2, _: f32, _: Color) {
        self.calls += 1;
    }

    fn text_width(&self, text: &str, size: f32) -> f32 {
        text.len() as f32 * size / 2.0
    }

    fn piece(&mut self, _: Piece, _: Rect) {
        self.calls += 1;
    }
}

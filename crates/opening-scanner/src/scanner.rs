use std::time::Duration;

use chess_core::{CoreError, Engine, FailedOpening, FailedOpeningStore, GameRecord};
use shakmaty::{fen::Fen, Color, EnPassantMode, Position};
use tracing::{debug, info, warn};

use crate::error::ScannerError;

/// Plies replayed per game
pub const DEFAULT_OPENING_DEPTH: usize = 20;

/// Evaluation swing (in pawns) that counts as a lost opening
pub const DEFAULT_LOSS_THRESHOLD: f64 = 1.2;

/// Engine time per evaluated position
pub const DEFAULT_MOVETIME: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct ScanSettings {
    /// Player whose openings are checked
    pub user: String,
    pub depth: usize,
    pub threshold: f64,
    pub budget: Duration,
}

impl ScanSettings {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            depth: DEFAULT_OPENING_DEPTH,
            threshold: DEFAULT_LOSS_THRESHOLD,
            budget: DEFAULT_MOVETIME,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanReport {
    pub games: usize,
    pub skipped: usize,
    pub recorded: usize,
}

pub struct Scanner {
    settings: ScanSettings,
    report: ScanReport,
}

impl Scanner {
    pub fn new(settings: ScanSettings) -> Self {
        Self {
            settings,
            report: ScanReport::default(),
        }
    }

    pub fn report(&self) -> ScanReport {
        self.report
    }

    /// Number of plies after which `user` was losing, if that happened
    /// within the opening depth.
    pub fn find_failure<E: Engine>(
        &self,
        engine: &mut E,
        game: &GameRecord,
    ) -> Result<Option<usize>, CoreError> {
        let side = game.header.side_of(&self.settings.user)?;
        let threshold = self.settings.threshold;
        let mut pos = game.start.clone();

        for (i, mv) in game.moves.iter().take(self.settings.depth).enumerate() {
            pos.play_unchecked(*mv);

            let score = engine
                .evaluate(&pos, self.settings.budget)?
                .ok_or_else(|| CoreError::EvaluationAnomaly {
                    fen: Fen::from_position(&pos, EnPassantMode::Legal).to_string(),
                })?;
            let eval = score.pawns();
            debug!(ply = i + 1, eval, "Evaluated");

            let lost = match side {
                Color::White => eval <= -threshold,
                Color::Black => eval >= threshold,
            };
            if lost {
                info!(ply = i + 1, eval, side = ?side, "Opening lost");
                return Ok(Some(i + 1));
            }
        }

        Ok(None)
    }

    /// Failed-opening entry for `game`, if any.
    pub fn scan_game<E: Engine>(
        &self,
        engine: &mut E,
        game: &GameRecord,
    ) -> Result<Option<FailedOpening>, CoreError> {
        Ok(self
            .find_failure(engine, game)?
            .map(|plies| FailedOpening::from_game(game, plies)))
    }

    /// Scan every game from `games`, appending failures to `store`.
    /// The first error aborts the scan.
    pub fn scan<E, I>(
        &mut self,
        engine: &mut E,
        games: I,
        store: &FailedOpeningStore,
    ) -> Result<(), ScannerError>
    where
        E: Engine,
        I: IntoIterator<Item = Result<GameRecord, CoreError>>,
    {
        for game in games {
            let game = game?;
            self.report.games += 1;
            info!(game = self.report.games, "Scanning game");

            if !game.has_standard_start() {
                warn!(game = self.report.games, "Non-standard start position, skipping");
                self.report.skipped += 1;
                continue;
            }

            if let Some(entry) = self.scan_game(engine, &game)? {
                info!(moves = ?entry.moves, "Recording failed opening");
                store.append(&entry)?;
                self.report.recorded += 1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{GameHeader, Score};
    use shakmaty::{Chess, Move};
    use std::collections::VecDeque;

    /// Engine answering from a fixed list of scores.
    struct ScriptedEngine {
        scores: VecDeque<Option<Score>>,
        evaluated: usize,
    }

    impl ScriptedEngine {
        fn new(scores: Vec<Option<Score>>) -> Self {
            Self {
                scores: scores.into(),
                evaluated: 0,
            }
        }
    }

    impl Engine for ScriptedEngine {
        fn evaluate(&mut self, _: &Chess, _: Duration) -> Result<Option<Score>, CoreError> {
            self.evaluated += 1;
            Ok(self.scores.pop_front().unwrap_or(Some(Score::Centipawns(0))))
        }

        fn suggest_move(&mut self, _: &Chess, _: Duration) -> Result<Option<Move>, CoreError> {
            Ok(None)
        }

        fn shutdown(&mut self) {}
    }

    fn game(white: &str, black: &str) -> GameRecord {
        let header: GameHeader = [("White", white), ("Black", black)].into_iter().collect();
        GameRecord::from_uci_line(header, &["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "g8f6"]).unwrap()
    }

    #[test]
    fn test_black_user_fails_on_positive_eval() {
        let scanner = Scanner::new(ScanSettings::new("me"));
        let mut engine = ScriptedEngine::new(vec![
            Some(Score::Centipawns(30)),
            Some(Score::Centipawns(119)),
            Some(Score::Centipawns(120)),
        ]);

        assert_eq!(scanner.find_failure(&mut engine, &game("them", "me")).unwrap(), Some(3));
        assert_eq!(engine.evaluated, 3);
    }

    #[test]
    fn test_black_user_ignores_negative_eval() {
        let scanner = Scanner::new(ScanSettings::new("me"));
        let mut engine = ScriptedEngine::new(vec![Some(Score::Centipawns(-500)); 6]);

        assert_eq!(scanner.find_failure(&mut engine, &game("them", "me")).unwrap(), None);
    }

    #[test]
    fn test_depth_limits_evaluations() {
        let mut settings = ScanSettings::new("me");
        settings.depth = 2;
        let scanner = Scanner::new(settings);
        let mut engine = ScriptedEngine::new(vec![]);

        assert_eq!(scanner.find_failure(&mut engine, &game("me", "them")).unwrap(), None);
        assert_eq!(engine.evaluated, 2);
    }

    #[test]
    fn test_mate_counts_as_lost() {
        let scanner = Scanner::new(ScanSettings::new("me"));
        let mut engine = ScriptedEngine::new(vec![Some(Score::Mate {
            moves: 1,
            winner: Color::Black,
        })]);

        assert_eq!(scanner.find_failure(&mut engine, &game("me", "them")).unwrap(), Some(1));
    }

    #[test]
    fn test_missing_score_is_fatal() {
        let scanner = Scanner::new(ScanSettings::new("me"));
        let mut engine = ScriptedEngine::new(vec![Some(Score::Centipawns(0)), None]);

        let err = scanner.find_failure(&mut engine, &game("me", "them")).unwrap_err();
        assert!(matches!(err, CoreError::EvaluationAnomaly { .. }));
    }

    #[test]
    fn test_unknown_player_is_setup_error() {
        let scanner = Scanner::new(ScanSettings::new("me"));
        let mut engine = ScriptedEngine::new(vec![]);

        let err = scanner.find_failure(&mut engine, &game("a", "b")).unwrap_err();
        assert!(matches!(err, CoreError::Setup(_)));
        assert_eq!(engine.evaluated, 0);
    }
}

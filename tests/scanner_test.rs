//! Opening-failure scan over a small archive, end to end through the store.

mod common;

use chess_core::pgn::ArchiveReader;
use chess_core::{CoreError, FailedOpeningStore, Score};
use common::{opera_pgn, scratch_path, MockEngine};
use opening_scanner::{ScanReport, ScanSettings, Scanner, ScannerError};

fn archive() -> String {
    format!("{}{}", opera_pgn("Morphy", "Duke"), opera_pgn("Count", "Morphy"))
}

#[test]
fn test_scan_records_first_losing_line() {
    let path = scratch_path("scan");
    let store = FailedOpeningStore::new(&path);

    let mut scores = vec![Some(Score::Centipawns(10)); 6];
    scores.push(Some(Score::Centipawns(-120)));
    let (mut engine, log) = MockEngine::with_scores(scores);

    let mut scanner = Scanner::new(ScanSettings::new("Morphy"));
    scanner
        .scan(&mut engine, ArchiveReader::new(archive().as_bytes()), &store)
        .unwrap();

    // 7 plies for the first game, the full opening depth for the second
    assert_eq!(log.evaluations.get(), 7 + 20);
    assert_eq!(
        scanner.report(),
        ScanReport {
            games: 2,
            skipped: 0,
            recorded: 1,
        }
    );

    let entries = store.load().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries[0].moves,
        vec!["e2e4", "e7e5", "g1f3", "d7d6", "d2d4", "c8g4", "d4e5"]
    );
    assert_eq!(entries[0].header.get("White"), Some("Morphy"));
    assert_eq!(entries[0].header.get("Black"), Some("Duke"));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_scan_respects_custom_depth_and_threshold() {
    let path = scratch_path("scan-depth");
    let store = FailedOpeningStore::new(&path);

    // Morphy is Black in the second game: +0.60 is a loss at threshold 0.5
    let mut scores = vec![Some(Score::Centipawns(900)); 4];
    scores.extend([Some(Score::Centipawns(20)), Some(Score::Centipawns(60))]);
    let (mut engine, log) = MockEngine::with_scores(scores);

    let settings = ScanSettings {
        depth: 4,
        threshold: 0.5,
        ..ScanSettings::new("Morphy")
    };
    let mut scanner = Scanner::new(settings);
    scanner
        .scan(&mut engine, ArchiveReader::new(archive().as_bytes()), &store)
        .unwrap();

    assert_eq!(log.evaluations.get(), 4 + 2);
    let entries = store.load().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].moves, vec!["e2e4", "e7e5"]);
    assert_eq!(entries[0].header.get("Black"), Some("Morphy"));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_non_standard_starts_are_skipped() {
    let path = scratch_path("scan-setup");
    let store = FailedOpeningStore::new(&path);
    let chess960 = "[White \"Morphy\"]\n[Black \"Duke\"]\n[Variant \"Chess960\"]\n[SetUp \"1\"]\n\
        [FEN \"bbqnnrkr/pppppppp/8/8/8/8/PPPPPPPP/BBQNNRKR w HFhf - 0 1\"]\n\n1. f4 f5 *\n\n";
    let endgame = "[White \"Duke\"]\n[Black \"Morphy\"]\n[SetUp \"1\"]\n\
        [FEN \"4k3/8/8/8/8/8/4P3/4K3 w - - 0 1\"]\n\n1. e4 Kd7 *\n\n";
    let pgn = format!("{chess960}{endgame}{}", opera_pgn("Morphy", "Duke"));

    let mut scores = vec![Some(Score::Centipawns(0)); 2];
    scores.push(Some(Score::Centipawns(-150)));
    let (mut engine, log) = MockEngine::with_scores(scores);

    let mut scanner = Scanner::new(ScanSettings::new("Morphy"));
    scanner
        .scan(&mut engine, ArchiveReader::new(pgn.as_bytes()), &store)
        .unwrap();

    assert_eq!(
        scanner.report(),
        ScanReport {
            games: 3,
            skipped: 2,
            recorded: 1,
        }
    );
    // only the standard game reached the engine
    assert_eq!(log.evaluations.get(), 3);
    let entries = store.load().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].moves, vec!["e2e4", "e7e5", "g1f3"]);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_missing_score_aborts_scan() {
    let path = scratch_path("scan-anomaly");
    let store = FailedOpeningStore::new(&path);
    let (mut engine, _) =
        MockEngine::with_scores(vec![Some(Score::Centipawns(0)), Some(Score::Centipawns(0)), None]);

    let mut scanner = Scanner::new(ScanSettings::new("Morphy"));
    let err = scanner
        .scan(&mut engine, ArchiveReader::new(archive().as_bytes()), &store)
        .unwrap_err();

    assert!(matches!(
        err,
        ScannerError::Core(CoreError::EvaluationAnomaly { .. })
    ));
    assert_eq!(scanner.report().games, 1);
    assert!(!path.exists());
}

#[test]
fn test_user_not_in_game_is_fatal() {
    let store = FailedOpeningStore::new(scratch_path("scan-stranger"));
    let (mut engine, log) = MockEngine::new();

    let mut scanner = Scanner::new(ScanSettings::new("Anderssen"));
    let err = scanner
        .scan(&mut engine, ArchiveReader::new(archive().as_bytes()), &store)
        .unwrap_err();

    assert!(matches!(err, ScannerError::Core(CoreError::Setup(_))));
    assert_eq!(log.evaluations.get(), 0);
}

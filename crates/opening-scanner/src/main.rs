//! Opening-failure scanner
//!
//! Usage: opening-scanner <pgn file or directory> [--user NAME] [--out PATH]
//!        [--depth N] [--threshold X]
//!
//! STOCKFISH_PATH must point at a UCI engine binary.

use chess_core::pgn::ArchiveReader;
use chess_core::stockfish::StockfishEngine;
use chess_core::{Engine, FailedOpeningStore};
use opening_scanner::{ScannerConfig, ScannerError, Scanner};
use tracing::info;

fn run(
    config: &ScannerConfig,
    engine: &mut StockfishEngine,
    scanner: &mut Scanner,
) -> Result<(), ScannerError> {
    let store = FailedOpeningStore::new(&config.store_path);

    for path in config.archive_paths()? {
        info!(path = %path.display(), "Processing archive");
        let archive = ArchiveReader::open(&path)?;
        scanner.scan(engine, archive, &store)?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let _ = dotenvy::dotenv();

    let config = ScannerConfig::load()?;
    info!(
        archive = %config.archive.display(),
        user = %config.user,
        depth = config.opening_depth,
        threshold = config.loss_threshold,
        "Scanner config loaded"
    );

    let mut engine = StockfishEngine::new(&config.stockfish_path)?;
    let mut scanner = Scanner::new(config.settings());

    let result = run(&config, &mut engine, &mut scanner);
    engine.shutdown();
    result?;

    let report = scanner.report();
    info!(
        games = report.games,
        skipped = report.skipped,
        recorded = report.recorded,
        store = %config.store_path.display(),
        "Scan complete"
    );
    Ok(())
}

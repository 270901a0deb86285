//! Replay one game from a PGN archive.
//!
//! Usage: pgn-viewer <pgn file> [--game N] [--user NAME] [--pieces DIR]
//!
//! Keys: Right = next move, Left = previous move, f = flip board, q = quit.

use chess_core::pgn::ArchiveReader;
use chess_core::stockfish::StockfishEngine;
use tracing::{error, info};
use viewer::app::{self, window_conf};
use viewer::canvas::MacroquadCanvas;
use viewer::{Renderer, Session, ViewerConfig, ViewerError};

async fn run() -> anyhow::Result<()> {
    let config = ViewerConfig::load()?;
    let archive = config
        .archive
        .clone()
        .ok_or_else(|| ViewerError::Config("no PGN archive given (argument or PGN_PATH)".into()))?;

    let game = ArchiveReader::open(&archive)?.nth_game(config.game_index)?;
    info!(
        archive = %archive.display(),
        game = config.game_index,
        plies = game.len(),
        "Game loaded"
    );

    let mut canvas = MacroquadCanvas::load(&config.pieces_dir)?;
    let engine = StockfishEngine::new(&config.stockfish_path)?;
    let mut session = Session::new(engine, config.user.clone(), config.movetime, game)?;

    let flow = app::run(&mut session, &Renderer::default(), &mut canvas).await?;
    info!(?flow, ply = session.ply(), "Viewer finished");
    session.close();
    Ok(())
}

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let _ = dotenvy::dotenv();
    macroquad::input::prevent_quit();

    if let Err(e) = run().await {
        error!(error = %e, "Viewer failed");
        std::process::exit(1);
    }
}

//! Replay every recorded failed opening, one after another.
//!
//! Usage: replay-failed [--store PATH] [--user NAME] [--pieces DIR]
//!
//! `q` moves on to the next line; closing the window stops.

use chess_core::stockfish::StockfishEngine;
use chess_core::{FailedOpening, FailedOpeningStore, GameRecord};
use tracing::{error, info};
use viewer::app::{self, window_conf};
use viewer::canvas::MacroquadCanvas;
use viewer::{Flow, Renderer, Session, ViewerConfig};

async fn run() -> anyhow::Result<()> {
    let config = ViewerConfig::load()?;
    let store = FailedOpeningStore::new(&config.store_path);

    let lines: Vec<GameRecord> = store
        .load()?
        .iter()
        .map(FailedOpening::to_game)
        .collect::<Result<_, _>>()?;
    let total = lines.len();
    info!(store = %store.path().display(), total, "Failed openings loaded");

    let mut lines = lines.into_iter();
    let Some(first) = lines.next() else {
        info!("Nothing to replay");
        return Ok(());
    };

    let mut canvas = MacroquadCanvas::load(&config.pieces_dir)?;
    let engine = StockfishEngine::new(&config.stockfish_path)?;
    let mut session = Session::new(engine, config.user.clone(), config.movetime, first)?;
    let renderer = Renderer::default();

    for index in 1..=total {
        info!(
            line = index,
            total,
            white = session.game().header.get("White").unwrap_or("?"),
            black = session.game().header.get("Black").unwrap_or("?"),
            plies = session.game().len(),
            "Replaying failed opening"
        );

        if app::run(&mut session, &renderer, &mut canvas).await? == Flow::Closed {
            break;
        }
        match lines.next() {
            Some(game) => session.load(game)?,
            None => break,
        }
    }

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
        error!(error = %e, "Replay failed");
        std::process::exit(1);
    }
}

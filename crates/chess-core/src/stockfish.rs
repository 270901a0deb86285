//! Stockfish engine wrapper using the UCI protocol (blocking I/O)

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::Duration;

use shakmaty::{fen::Fen, uci::UciMove, Chess, EnPassantMode, Move, Position};
use tracing::{debug, info};

use crate::engine::{Engine, Score};
use crate::error::CoreError;

/// Outcome of a single `go movetime` search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Last reported score, from White's perspective
    pub score: Option<Score>,
    /// Best move, `None` for `bestmove (none)`
    pub best_move: Option<Move>,
}

/// Stockfish engine instance
pub struct StockfishEngine {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    closed: bool,
}

impl StockfishEngine {
    /// Spawn a new Stockfish process and initialize UCI
    pub fn new(path: &str) -> Result<Self, CoreError> {
        let mut process = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| CoreError::EngineUnavailable(format!("Failed to spawn {path}: {e}")))?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| CoreError::EngineUnavailable("engine stdin not captured".into()))?;
        let stdout = process
            .stdout
            .take()
            .map(BufReader::new)
            .ok_or_else(|| CoreError::EngineUnavailable("engine stdout not captured".into()))?;

        let mut engine = Self {
            process,
            stdin,
            stdout,
            closed: false,
        };

        engine.send("uci")?;
        engine.wait_for("uciok")?;
        engine.send("setoption name Threads value 1")?;
        engine.send("setoption name Hash value 64")?;
        engine.send("isready")?;
        engine.wait_for("readyok")?;

        info!(path, "Engine ready");
        Ok(engine)
    }

    /// Send a command to Stockfish
    fn send(&mut self, cmd: &str) -> Result<(), CoreError> {
        debug!(cmd, "SF <");
        writeln!(self.stdin, "{cmd}")
            .and_then(|_| self.stdin.flush())
            .map_err(|e| CoreError::EngineUnavailable(format!("Failed to write to engine: {e}")))
    }

    /// Read one line, treating EOF as a dead engine
    fn read_line(&mut self, line: &mut String) -> Result<(), CoreError> {
        line.clear();
        let bytes = self
            .stdout
            .read_line(line)
            .map_err(|e| CoreError::EngineUnavailable(format!("Failed to read from engine: {e}")))?;
        if bytes == 0 {
            return Err(CoreError::EngineUnavailable("engine closed its output".into()));
        }
        debug!(line = line.trim(), "SF >");
        Ok(())
    }

    /// Wait for a specific response line
    fn wait_for(&mut self, expected: &str) -> Result<(), CoreError> {
        let mut line = String::new();
        loop {
            self.read_line(&mut line)?;
            if line.trim() == expected {
                return Ok(());
            }
        }
    }

    /// Search `position` for `budget` and collect the final score and best move
    pub fn search(&mut self, position: &Chess, budget: Duration) -> Result<SearchResult, CoreError> {
        let fen = Fen::from_position(position, EnPassantMode::Legal).to_string();
        let movetime = budget.as_millis().max(1);

        self.send("isready")?;
        self.wait_for("readyok")?;
        self.send(&format!("position fen {fen}"))?;
        self.send(&format!("go movetime {movetime}"))?;

        let turn = position.turn();
        let mut score = None;
        let mut line = String::new();

        loop {
            self.read_line(&mut line)?;
            let trimmed = line.trim();

            if is_score_line(trimmed) {
                if let Some(cp) = parse_cp(trimmed) {
                    score = Some(Score::from_cp(cp, turn));
                } else if let Some(mate) = parse_mate(trimmed) {
                    score = Some(Score::from_mate(mate, turn));
                }
            } else if let Some(best) = parse_bestmove(trimmed) {
                let best_move = match best {
                    "(none)" | "0000" => None,
                    uci => Some(resolve_move(position, uci)?),
                };
                return Ok(SearchResult { score, best_move });
            }
        }
    }
}

impl Engine for StockfishEngine {
    fn evaluate(&mut self, position: &Chess, budget: Duration) -> Result<Option<Score>, CoreError> {
        Ok(self.search(position, budget)?.score)
    }

    fn suggest_move(&mut self, position: &Chess, budget: Duration) -> Result<Option<Move>, CoreError> {
        Ok(self.search(position, budget)?.best_move)
    }

    /// Send quit command and wait for process to exit
    fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        let _ = self.send("quit");
        let _ = self.process.wait();
        info!("Engine stopped");
    }
}

impl Drop for StockfishEngine {
    fn drop(&mut self) {
        if !self.closed {
            let _ = self.process.kill();
            let _ = self.process.wait();
        }
    }
}

fn resolve_move(position: &Chess, uci: &str) -> Result<Move, CoreError> {
    let parsed: UciMove = uci
        .parse()
        .map_err(|_| CoreError::Protocol(format!("unparseable bestmove {uci}")))?;
    parsed
        .to_move(position)
        .map_err(|_| CoreError::Protocol(format!("engine suggested illegal move {uci}")))
}

/// `info` line carrying a score; skips `info string`, `currmove` and the like
fn is_score_line(line: &str) -> bool {
    line.starts_with("info") && !line.starts_with("info string") && line.contains(" score ")
}

/// Value following `key` in a whitespace separated line
fn token_after<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let mut parts = line.split_whitespace();
    parts.by_ref().find(|part| *part == key)?;
    parts.next()
}

/// Parse centipawn score from info line
fn parse_cp(line: &str) -> Option<i32> {
    if token_after(line, "score")? != "cp" {
        return None;
    }
    token_after(line, "cp")?.parse().ok()
}

/// Parse mate score from info line
fn parse_mate(line: &str) -> Option<i32> {
    if token_after(line, "score")? != "mate" {
        return None;
    }
    token_after(line, "mate")?.parse().ok()
}

/// Parse the move from a `bestmove` line
fn parse_bestmove(line: &str) -> Option<&str> {
    if !line.starts_with("bestmove") {
        return None;
    }
    token_after(line, "bestmove")
}

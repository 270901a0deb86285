//! Replay session controller.
//!
//! Owns the engine handle, the current position and the navigation state of
//! one game at a time. Each frame applies pending input, refreshes the
//! engine output if the position changed, and draws.

use std::time::Duration;

use chess_core::{CoreError, Engine, GameHeader, GameRecord};
use shakmaty::{Chess, Color, Move, Position};
use tracing::{debug, info, warn};

use crate::canvas::Canvas;
use crate::render::Renderer;

/// Engine time per evaluation and per suggested move.
pub const DEFAULT_MOVETIME: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    StepForward,
    StepBackward,
    FlipBoard,
    Quit,
    /// Window closed by the user
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
    Closed,
}

/// What the header panel shows. Rebuilt from session state for every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderStats {
    pub white: String,
    pub white_elo: String,
    pub black: String,
    pub black_elo: String,
    pub result: String,
    pub evaluation: f64,
}

impl HeaderStats {
    pub fn from_header(header: &GameHeader, evaluation: f64) -> Result<Self, CoreError> {
        Ok(Self {
            white: header.require("White")?.to_string(),
            white_elo: header.require("WhiteElo")?.to_string(),
            black: header.require("Black")?.to_string(),
            black_elo: header.require("BlackElo")?.to_string(),
            result: header.require("Result")?.to_string(),
            evaluation,
        })
    }
}

pub struct Session<E: Engine> {
    engine: E,
    released: bool,
    user: Option<String>,
    budget: Duration,
    game: GameRecord,
    header: HeaderStats,
    /// Positions before each applied move; its length is the ply index.
    history: Vec<Chess>,
    position: Chess,
    bottom: Color,
    evaluation: f64,
    best_move: Option<Move>,
    stale: bool,
}

impl<E: Engine> Session<E> {
    /// Start a session on `game`. The engine is shut down if the game
    /// cannot be shown.
    pub fn new(
        mut engine: E,
        user: Option<String>,
        budget: Duration,
        game: GameRecord,
    ) -> Result<Self, CoreError> {
        let header = match HeaderStats::from_header(&game.header, 0.0) {
            Ok(header) => header,
            Err(e) => {
                engine.shutdown();
                return Err(e);
            }
        };

        let mut session = Self {
            engine,
            released: false,
            user,
            budget,
            position: game.start.clone(),
            game,
            header,
            history: Vec::new(),
            bottom: Color::White,
            evaluation: 0.0,
            best_move: None,
            stale: false,
        };
        session.bottom = session.initial_bottom();
        Ok(session)
    }

    /// Switch to another game, keeping the engine.
    pub fn load(&mut self, game: GameRecord) -> Result<(), CoreError> {
        self.header = HeaderStats::from_header(&game.header, 0.0)?;
        self.position = game.start.clone();
        self.game = game;
        self.history.clear();
        self.bottom = self.initial_bottom();
        self.evaluation = 0.0;
        self.best_move = None;
        self.stale = false;
        Ok(())
    }

    fn initial_bottom(&self) -> Color {
        match &self.user {
            Some(user) if self.header.white != *user => Color::Black,
            _ => Color::White,
        }
    }

    pub fn ply(&self) -> usize {
        self.history.len()
    }

    pub fn game(&self) -> &GameRecord {
        &self.game
    }

    pub fn position(&self) -> &Chess {
        &self.position
    }

    /// Side drawn at the bottom of the board.
    pub fn bottom(&self) -> Color {
        self.bottom
    }

    pub fn evaluation(&self) -> f64 {
        self.evaluation
    }

    pub fn best_move(&self) -> Option<&Move> {
        self.best_move.as_ref()
    }

    /// Whether the engine output no longer matches the position.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn step_forward(&mut self) -> bool {
        let Some(mv) = self.game.moves.get(self.ply()) else {
            return false;
        };
        let mut next = self.position.clone();
        next.play_unchecked(*mv);
        self.history.push(std::mem::replace(&mut self.position, next));
        self.stale = true;
        true
    }

    pub fn step_backward(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.position = previous;
                self.stale = true;
                true
            }
            None => false,
        }
    }

    pub fn flip(&mut self) {
        self.bottom = !self.bottom;
    }

    pub fn handle(&mut self, event: InputEvent) -> Flow {
        match event {
            InputEvent::StepForward => {
                self.step_forward();
            }
            InputEvent::StepBackward => {
                self.step_backward();
            }
            InputEvent::FlipBoard => self.flip(),
            InputEvent::Quit => return Flow::Quit,
            InputEvent::Close => return Flow::Closed,
        }
        debug!(ply = self.ply(), ?event, "Input handled");
        Flow::Continue
    }

    /// Ask the engine about the current position if it changed.
    pub fn refresh(&mut self) -> Result<(), CoreError> {
        if !self.stale {
            return Ok(());
        }

        match self.engine.evaluate(&self.position, self.budget)? {
            Some(score) => self.evaluation = score.pawns(),
            None => warn!(ply = self.ply(), "Engine returned no score, keeping previous evaluation"),
        }
        self.best_move = self.engine.suggest_move(&self.position, self.budget)?;
        self.stale = false;
        Ok(())
    }

    pub fn stats(&self) -> HeaderStats {
        HeaderStats {
            evaluation: self.evaluation,
            ..self.header.clone()
        }
    }

    pub fn render<C: Canvas>(&self, renderer: &Renderer, canvas: &mut C) {
        renderer.draw_header(canvas, &self.stats());
        renderer.draw_board(canvas, self.bottom, &self.position, self.best_move.as_ref());
    }

    /// One loop iteration: input, engine refresh, drawing.
    pub fn frame<C: Canvas>(
        &mut self,
        events: &[InputEvent],
        renderer: &Renderer,
        canvas: &mut C,
    ) -> Result<Flow, CoreError> {
        for &event in events {
            let flow = self.handle(event);
            if flow != Flow::Continue {
                return Ok(flow);
            }
        }

        self.refresh()?;
        self.render(renderer, canvas);
        Ok(Flow::Continue)
    }

    /// Stop the engine and end the session.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.engine.shutdown();
            info!("Session closed");
        }
    }
}

impl<E: Engine> Drop for Session<E> {
    fn drop(&mut self) {
        self.release();
    }
}

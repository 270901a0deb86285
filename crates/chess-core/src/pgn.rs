//! Sequential PGN archive reading on top of `pgn-reader`.

use std::fs::File;
use std::io::Read;
use std::ops::ControlFlow;
use std::path::Path;

use pgn_reader::{RawTag, Reader, SanPlus, Skip, Visitor};
use shakmaty::{fen::Fen, CastlingMode, Chess, Move, Position};

use crate::error::CoreError;
use crate::game_data::{GameHeader, GameRecord};

/// Reads one game at a time from a PGN archive.
pub struct ArchiveReader<R> {
    reader: Reader<R>,
}

impl ArchiveReader<File> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CoreError> {
        Ok(Self::new(File::open(path)?))
    }
}

impl<R: Read> ArchiveReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            reader: Reader::new(inner),
        }
    }

    /// Next game in the archive, or `None` at end of file.
    pub fn next_game(&mut self) -> Result<Option<GameRecord>, CoreError> {
        match self.reader.read_game(&mut GameCollector)? {
            Some(game) => game.map(Some),
            None => Ok(None),
        }
    }
}

impl<R: Read> ArchiveReader<R> {
    /// The `index`-th game (1-based), skipping over earlier ones.
    pub fn nth_game(&mut self, index: usize) -> Result<GameRecord, CoreError> {
        if index == 0 {
            return Err(CoreError::Setup("game numbers start at 1".into()));
        }
        for seen in 1..index {
            if self.next_game()?.is_none() {
                return Err(CoreError::Setup(format!(
                    "archive has {} games, game {index} requested",
                    seen - 1
                )));
            }
        }
        self.next_game()?.ok_or_else(|| {
            CoreError::Setup(format!("archive has {} games, game {index} requested", index - 1))
        })
    }
}

impl<R: Read> Iterator for ArchiveReader<R> {
    type Item = Result<GameRecord, CoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_game().transpose()
    }
}

/// Visitor that turns the mainline of each game into a `GameRecord`.
struct GameCollector;

/// State during movetext parsing.
struct Movetext {
    header: GameHeader,
    start: Chess,
    pos: Chess,
    moves: Vec<Move>,
}

/// Starting position from the `FEN` tag, or the standard one. Chess960
/// castling rights are accepted so such games can be read and skipped.
fn start_position(header: &GameHeader) -> Result<Chess, CoreError> {
    let Some(fen) = header.get("FEN") else {
        return Ok(Chess::default());
    };
    let fen: Fen = fen
        .parse()
        .map_err(|e| CoreError::Pgn(format!("invalid FEN tag {fen:?}: {e}")))?;
    fen.into_position(CastlingMode::Chess960)
        .map_err(|e| CoreError::Pgn(format!("illegal FEN position: {e}")))
}

impl Visitor for GameCollector {
    type Tags = GameHeader;
    type Movetext = Movetext;
    type Output = Result<GameRecord, CoreError>;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, GameHeader> {
        ControlFlow::Continue(GameHeader::new())
    }

    fn tag(
        &mut self,
        tags: &mut GameHeader,
        name: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<Self::Output> {
        tags.insert(String::from_utf8_lossy(name), value.decode_utf8_lossy());
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, header: GameHeader) -> ControlFlow<Self::Output, Movetext> {
        match start_position(&header) {
            Ok(start) => ControlFlow::Continue(Movetext {
                header,
                pos: start.clone(),
                start,
                moves: Vec::new(),
            }),
            Err(e) => ControlFlow::Break(Err(e)),
        }
    }

    fn san(&mut self, movetext: &mut Movetext, san_plus: SanPlus) -> ControlFlow<Self::Output> {
        match san_plus.san.to_move(&movetext.pos) {
            Ok(mv) => {
                movetext.pos.play_unchecked(mv);
                movetext.moves.push(mv);
                ControlFlow::Continue(())
            }
            Err(_) => ControlFlow::Break(Err(CoreError::IllegalMove {
                mv: san_plus.to_string(),
                ply: movetext.moves.len(),
            })),
        }
    }

    fn begin_variation(&mut self, _: &mut Movetext) -> ControlFlow<Self::Output, Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn end_game(&mut self, movetext: Movetext) -> Self::Output {
        Ok(GameRecord {
            header: movetext.header,
            start: movetext.start,
            moves: movetext.moves,
        })
    }
}

//! Immutable move records.
//!
//! A [`Move`] is built for every move attempt and appended to a game's
//! history only if the game accepts it. The acting player is held by
//! `Arc` so that the game can check the actor by identity, not by value.

use std::sync::Arc;

use crate::board::{Board, Piece, Position};
use crate::player::Player;

/// File letters used by [`Move::notation`].
const FILES: &[u8] = b"abcdefgh";

/// A from/to coordinate pair, the acting player, and the piece moved.
#[derive(Debug, Clone)]
pub struct Move {
    /// Source square.
    pub from: Position,
    /// Destination square.
    pub to: Position,
    /// The player making the move.
    pub player: Arc<Player>,
    /// The piece on the source square when the move was made.
    pub piece: Piece,
}

impl Move {
    /// Create a move record.
    pub const fn new(from: Position, to: Position, player: Arc<Player>, piece: Piece) -> Self {
        Self {
            from,
            to,
            player,
            piece,
        }
    }

    /// Whether both endpoints lie on `board`.
    pub fn is_valid(&self, board: &Board) -> bool {
        board.is_valid_position(self.from) && board.is_valid_position(self.to)
    }

    /// Coordinate notation such as `e2-e3`.
    ///
    /// Returns `None` when a square has no file letter (columns past `h`)
    /// or a negative coordinate.
    pub fn notation(&self) -> Option<String> {
        Some(format!("{}-{}", square_name(self.from)?, square_name(self.to)?))
    }
}

fn square_name(pos: Position) -> Option<String> {
    let col = usize::try_from(pos.col).ok()?;
    let file = char::from(*FILES.get(col)?);
    let rank = pos.row.checked_add(1).filter(|r| *r > 0)?;
    Some(format!("{file}{rank}"))
}

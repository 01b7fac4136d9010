//! Positions, pieces and the square board grid.
//!
//! Coordinates are signed so that a move can name a square off the board;
//! such moves are representable and rejected by validation rather than by
//! the type system. Every accessor is bounds-checked: reads outside the
//! grid return `None`, writes outside the grid are ignored.

use serde::{Deserialize, Serialize};

use crate::enums::{Color, PieceKind};

/// Back-rank layout, file by file, for the standard setup.
const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Smallest board that gets pieces from [`Board::with_standard_setup`].
pub const MIN_SETUP_SIZE: usize = 4;

/// A square on the board, addressed by row and column (both 0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Row index; row 0 is the black home row.
    pub row: i32,
    /// Column index; column 0 is file `a`.
    pub col: i32,
}

impl Position {
    /// Create a position.
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The square one step forward for `color`, or `None` on overflow.
    pub fn forward(self, color: Color) -> Option<Self> {
        let row = self.row.checked_add(color.forward_step())?;
        Some(Self { row, col: self.col })
    }
}

/// A piece marker occupying a board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    /// What kind of piece this is.
    pub kind: PieceKind,
    /// Which side owns it.
    pub color: Color,
}

impl Piece {
    /// Create a piece.
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Self { kind, color }
    }

    /// Unicode chess glyph for this piece.
    pub const fn symbol(self) -> &'static str {
        match (self.color, self.kind) {
            (Color::White, PieceKind::King) => "\u{2654}",
            (Color::White, PieceKind::Queen) => "\u{2655}",
            (Color::White, PieceKind::Rook) => "\u{2656}",
            (Color::White, PieceKind::Bishop) => "\u{2657}",
            (Color::White, PieceKind::Knight) => "\u{2658}",
            (Color::White, PieceKind::Pawn) => "\u{2659}",
            (Color::Black, PieceKind::King) => "\u{265A}",
            (Color::Black, PieceKind::Queen) => "\u{265B}",
            (Color::Black, PieceKind::Rook) => "\u{265C}",
            (Color::Black, PieceKind::Bishop) => "\u{265D}",
            (Color::Black, PieceKind::Knight) => "\u{265E}",
            (Color::Black, PieceKind::Pawn) => "\u{265F}",
        }
    }
}

impl core::fmt::Display for Piece {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A square grid of cells, each empty or holding exactly one piece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    /// Row-major cells, `size * size` long.
    cells: Vec<Option<Piece>>,
}

impl Board {
    /// Create an empty `size` x `size` board.
    pub fn new(size: usize) -> Self {
        let len = size.saturating_mul(size);
        Self {
            size,
            cells: vec![None; len],
        }
    }

    /// Create a board with both sides set up.
    ///
    /// Black's back rank fills row 0 and its pawns row 1; white's pawns
    /// fill row `size - 2` and its back rank row `size - 1`. Files past
    /// `h` repeat the back-rank pattern. Boards smaller than
    /// [`MIN_SETUP_SIZE`] are left empty.
    pub fn with_standard_setup(size: usize) -> Self {
        let mut board = Self::new(size);
        if size < MIN_SETUP_SIZE {
            return board;
        }
        let Ok(last) = i32::try_from(size.saturating_sub(1)) else {
            return board;
        };
        for (file, col) in (0..=last).enumerate() {
            let kind = BACK_RANK
                .get(file.checked_rem(BACK_RANK.len()).unwrap_or(0))
                .copied()
                .unwrap_or(PieceKind::Rook);
            board.set(Position::new(0, col), Some(Piece::new(kind, Color::Black)));
            board.set(Position::new(1, col), Some(Piece::new(PieceKind::Pawn, Color::Black)));
            board.set(
                Position::new(last.saturating_sub(1), col),
                Some(Piece::new(PieceKind::Pawn, Color::White)),
            );
            board.set(Position::new(last, col), Some(Piece::new(kind, Color::White)));
        }
        board
    }

    /// Side length of the board.
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Whether `pos` lies on the board.
    pub fn is_valid_position(&self, pos: Position) -> bool {
        self.index(pos).is_some()
    }

    /// The piece at `pos`, or `None` if the cell is empty or off the board.
    pub fn get(&self, pos: Position) -> Option<Piece> {
        self.index(pos)
            .and_then(|idx| self.cells.get(idx))
            .copied()
            .flatten()
    }

    /// Put `piece` at `pos` (or clear it with `None`). Ignored off the board.
    pub fn set(&mut self, pos: Position, piece: Option<Piece>) {
        if let Some(cell) = self.index(pos).and_then(|idx| self.cells.get_mut(idx)) {
            *cell = piece;
        }
    }

    /// Every position on the board in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let n = i32::try_from(self.size).unwrap_or(0);
        (0..n).flat_map(move |row| (0..n).map(move |col| Position::new(row, col)))
    }

    /// Number of pieces `color` still has on the board.
    pub fn piece_count(&self, color: Color) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|piece| piece.color == color)
            .count()
    }

    fn index(&self, pos: Position) -> Option<usize> {
        let row = usize::try_from(pos.row).ok().filter(|r| *r < self.size)?;
        let col = usize::try_from(pos.col).ok().filter(|c| *c < self.size)?;
        row.checked_mul(self.size)?.checked_add(col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_reads_are_empty() {
        let board = Board::with_standard_setup(8);
        assert_eq!(board.get(Position::new(-1, 0)), None);
        assert_eq!(board.get(Position::new(0, 8)), None);
        assert_eq!(board.get(Position::new(8, 8)), None);
    }

    #[test]
    fn out_of_range_writes_are_ignored() {
        let mut board = Board::new(3);
        let before = board.clone();
        board.set(Position::new(3, 0), Some(Piece::new(PieceKind::Pawn, Color::White)));
        board.set(Position::new(0, -1), Some(Piece::new(PieceKind::Pawn, Color::White)));
        assert_eq!(board, before);
    }

    #[test]
    fn set_replaces_existing_piece() {
        let mut board = Board::new(2);
        let pos = Position::new(1, 1);
        board.set(pos, Some(Piece::new(PieceKind::Pawn, Color::White)));
        board.set(pos, Some(Piece::new(PieceKind::Queen, Color::Black)));
        assert_eq!(board.get(pos), Some(Piece::new(PieceKind::Queen, Color::Black)));
        board.set(pos, None);
        assert_eq!(board.get(pos), None);
    }

    #[test]
    fn standard_setup_places_both_sides() {
        let board = Board::with_standard_setup(8);
        assert_eq!(board.piece_count(Color::White), 16);
        assert_eq!(board.piece_count(Color::Black), 16);
        assert_eq!(
            board.get(Position::new(0, 4)),
            Some(Piece::new(PieceKind::King, Color::Black))
        );
        assert_eq!(
            board.get(Position::new(6, 0)),
            Some(Piece::new(PieceKind::Pawn, Color::White))
        );
        assert_eq!(
            board.get(Position::new(7, 3)),
            Some(Piece::new(PieceKind::Queen, Color::White))
        );
        assert_eq!(board.get(Position::new(4, 4)), None);
    }

    #[test]
    fn tiny_boards_stay_empty() {
        let board = Board::with_standard_setup(3);
        assert_eq!(board.piece_count(Color::White), 0);
        assert_eq!(board.piece_count(Color::Black), 0);
    }

    #[test]
    fn positions_are_row_major() {
        let board = Board::new(2);
        let all: Vec<Position> = board.positions().collect();
        assert_eq!(
            all,
            vec![
                Position::new(0, 0),
                Position::new(0, 1),
                Position::new(1, 0),
                Position::new(1, 1),
            ]
        );
    }

    #[test]
    fn piece_symbols_match_color() {
        assert_eq!(Piece::new(PieceKind::Pawn, Color::White).to_string(), "\u{2659}");
        assert_eq!(Piece::new(PieceKind::Pawn, Color::Black).to_string(), "\u{265F}");
    }
}

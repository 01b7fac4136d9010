//! Enumeration types for the Gambit arena.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Sides and pieces
// ---------------------------------------------------------------------------

/// One of the two sides in a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    /// Moves first and advances toward row 0.
    White,
    /// Moves second and advances toward the last row.
    Black,
}

impl Color {
    /// Return the other side.
    pub const fn opposite(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Row delta of a single forward step for this side.
    pub const fn forward_step(self) -> i32 {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }

    /// Lowercase name, as used in logs and rendered output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

impl core::fmt::Display for Color {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of a chess piece. Only used for display; the auto-move rule
/// treats every kind the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceKind {
    /// Pawn.
    Pawn,
    /// Rook.
    Rook,
    /// Knight.
    Knight,
    /// Bishop.
    Bishop,
    /// Queen.
    Queen,
    /// King.
    King,
}

// ---------------------------------------------------------------------------
// Game lifecycle
// ---------------------------------------------------------------------------

/// Lifecycle of a game. Transitions only ever move forward:
/// `NotStarted -> InProgress -> Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Created but not yet started; moves are rejected.
    NotStarted,
    /// Accepting moves.
    InProgress,
    /// Terminal; moves are rejected.
    Finished,
}

impl GameStatus {
    /// Snake-case name, as used in logs and rendered output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Finished => "finished",
        }
    }
}

impl core::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Registry tags
// ---------------------------------------------------------------------------

/// One of the registry's independently locked collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// Stand-alone boards.
    Boards,
    /// Games.
    Games,
    /// Move records.
    Moves,
    /// Players.
    Players,
}

impl Collection {
    /// Lowercase collection name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Boards => "boards",
            Self::Games => "games",
            Self::Moves => "moves",
            Self::Players => "players",
        }
    }
}

impl core::fmt::Display for Collection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A mutation applied to a registry collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// An element was appended.
    Store,
    /// An element was removed.
    Remove,
}

impl Operation {
    /// Lowercase operation name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Store => "store",
            Self::Remove => "remove",
        }
    }
}

impl core::fmt::Display for Operation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_are_opposites() {
        assert_eq!(Color::White.opposite(), Color::Black);
        assert_eq!(Color::Black.opposite(), Color::White);
    }

    #[test]
    fn sides_advance_in_opposite_directions() {
        assert_eq!(Color::White.forward_step(), -1);
        assert_eq!(Color::Black.forward_step(), 1);
    }

    #[test]
    fn status_order_matches_lifecycle() {
        assert!(GameStatus::NotStarted < GameStatus::InProgress);
        assert!(GameStatus::InProgress < GameStatus::Finished);
        assert_eq!(GameStatus::InProgress.to_string(), "in_progress");
    }

    #[test]
    fn registry_tags_display() {
        assert_eq!(Collection::Games.to_string(), "games");
        assert_eq!(Operation::Remove.to_string(), "remove");
    }
}

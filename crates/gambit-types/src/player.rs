//! Immutable player identity.
//!
//! A player is created once at game setup and then shared by `Arc` between
//! the game, its move records and the registry. Nothing mutates it.

use serde::{Deserialize, Serialize};

use crate::enums::Color;

/// Display symbol for the white side (white king).
pub const WHITE_SYMBOL: &str = "\u{2654}";

/// Display symbol for the black side (black king).
pub const BLACK_SYMBOL: &str = "\u{265A}";

/// A participant in a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Human-readable name.
    pub name: String,
    /// The side this player controls.
    pub color: Color,
    /// King glyph matching the color.
    pub symbol: String,
}

impl Player {
    /// Create a player for the given side; the symbol follows the color.
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        let symbol = match color {
            Color::White => WHITE_SYMBOL,
            Color::Black => BLACK_SYMBOL,
        };
        Self {
            name: name.into(),
            color,
            symbol: symbol.to_owned(),
        }
    }

    /// Whether this player controls the white side.
    pub fn is_white(&self) -> bool {
        self.color == Color::White
    }

    /// Whether this player controls the black side.
    pub fn is_black(&self) -> bool {
        self.color == Color::Black
    }

    /// Name with color and symbol, e.g. `Anna (white ♔)`.
    pub fn display_name(&self) -> String {
        format!("{} ({} {})", self.name, self.color, self.symbol)
    }
}

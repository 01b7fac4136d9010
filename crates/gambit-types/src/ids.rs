//! Type-safe identifier wrapper around [`Uuid`].
//!
//! Game ids are UUID v7 (time-ordered), so sorting by id sorts by
//! creation time. They label games in logs and change events; they are
//! never used for identity when removing a game from the registry.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GameId(pub Uuid);

impl GameId {
    /// Create a new identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }

    /// Return the first eight hex digits, enough to tell games apart on screen.
    pub fn short(&self) -> String {
        self.0.simple().to_string().chars().take(8).collect()
    }
}

impl Default for GameId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for GameId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for GameId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

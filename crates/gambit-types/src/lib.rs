//! Shared type definitions for the Gambit arena.
//!
//! Plain data only: nothing in this crate locks, spawns or awaits. The
//! concurrent pieces (games behind locks, the registry, the simulator
//! tasks) live in `gambit-core` and are built from these types.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for game identifiers
//! - [`enums`] -- Colors, piece kinds, game status, registry tags
//! - [`player`] -- Immutable player identity
//! - [`board`] -- Positions, pieces and the square board grid
//! - [`moves`] -- Immutable move records and their notation
//! - [`event`] -- Registry change-event record

pub mod board;
pub mod enums;
pub mod event;
pub mod ids;
pub mod moves;
pub mod player;

// Re-export all public types at crate root for convenience.
pub use board::{Board, Piece, Position};
pub use enums::{Collection, Color, GameStatus, Operation, PieceKind};
pub use event::ChangeEvent;
pub use ids::GameId;
pub use moves::Move;
pub use player::Player;

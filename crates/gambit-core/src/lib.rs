//! Concurrent core of the Gambit arena.
//!
//! Many games advance themselves at once, one simulator task each, while
//! a single aggregator renders snapshots of all of them and a registry
//! reports every structural change through a bounded, drop-on-full queue.
//!
//! # Modules
//!
//! - [`config`] -- YAML configuration with serde defaults and validation
//! - [`signal`] -- One-shot run-wide cancellation
//! - [`game`] -- A game and its lock-guarded state machine
//! - [`registry`] -- Shared store of boards, games, moves and players
//! - [`manager`] -- The live-game list and its compaction
//! - [`automove`] -- Forward-shift move heuristic
//! - [`simulator`] -- Per-game task loop
//! - [`render`] -- Text rendering of boards and games
//! - [`aggregator`] -- Snapshot consumer and frame sinks
//! - [`generator`] -- Random entity workload
//! - [`change_log`] -- Change-event consumer
//! - [`runner`] -- Wires one run together and reports totals
//!
//! # Lock order
//!
//! Manager, then game, then registry. A game lock is never held while the
//! manager or the registry is locked by the same task.

pub mod aggregator;
pub mod automove;
pub mod change_log;
pub mod config;
pub mod game;
pub mod generator;
pub mod manager;
pub mod registry;
pub mod render;
pub mod runner;
pub mod signal;
pub mod simulator;

pub use aggregator::{FrameSink, MemorySink, StdoutSink};
pub use config::{ArenaConfig, ConfigError};
pub use game::{Game, GameState, MoveTiming};
pub use manager::{GameManager, Snapshot};
pub use registry::{Entity, Registry, RegistryStats};
pub use runner::{ArenaSummary, RunnerError, run_arena};
pub use signal::DoneSignal;

//! Configuration loading and typed config structures for the Gambit arena.
//!
//! The canonical configuration lives in `gambit-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads and validates the file.
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

/// Largest board side the renderer can label with a single file letter.
pub const MAX_BOARD_SIZE: usize = 26;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but describes an impossible run.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level arena configuration.
///
/// Mirrors the structure of `gambit-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ArenaConfig {
    /// World-level settings.
    #[serde(default)]
    pub world: WorldConfig,

    /// Game count, board size and simulator pacing.
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Snapshot renderer pacing.
    #[serde(default)]
    pub render: RenderConfig,

    /// Background entity generator.
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Capacities of the best-effort channels.
    #[serde(default)]
    pub channels: ChannelConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ArenaConfig {
    /// Load and validate configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first violated rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;
        if sim.game_count == 0 {
            return Err(invalid("simulation.game_count must be at least 1"));
        }
        if sim.board_size == 0 || sim.board_size > MAX_BOARD_SIZE {
            return Err(invalid(&format!(
                "simulation.board_size must be between 1 and {MAX_BOARD_SIZE}, got {}",
                sim.board_size
            )));
        }
        if sim.think_delay_min_ms > sim.think_delay_max_ms {
            return Err(invalid(&format!(
                "simulation.think_delay_min_ms ({}) exceeds think_delay_max_ms ({})",
                sim.think_delay_min_ms, sim.think_delay_max_ms
            )));
        }
        if sim.poll_interval_ms == 0 {
            return Err(invalid("simulation.poll_interval_ms must be at least 1"));
        }
        if self.render.interval_ms == 0 {
            return Err(invalid("render.interval_ms must be at least 1"));
        }
        if self.generator.interval_ms == 0 {
            return Err(invalid("generator.interval_ms must be at least 1"));
        }
        if self.channels.snapshot_capacity == 0 || self.channels.event_capacity == 0 {
            return Err(invalid("channel capacities must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.to_owned(),
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Seed for the entity generator's RNG.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
        }
    }
}

/// Simulation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Number of games played concurrently.
    #[serde(default = "default_game_count")]
    pub game_count: usize,

    /// Side length of every simulated board.
    #[serde(default = "default_board_size")]
    pub board_size: usize,

    /// Lower bound of the random think delay before each auto-move.
    #[serde(default = "default_think_delay_min_ms")]
    pub think_delay_min_ms: u64,

    /// Upper bound of the random think delay before each auto-move.
    #[serde(default = "default_think_delay_max_ms")]
    pub think_delay_max_ms: u64,

    /// How often the coordinator checks whether any game is still live.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl SimulationConfig {
    /// The coordinator's poll interval as a [`Duration`].
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            game_count: default_game_count(),
            board_size: default_board_size(),
            think_delay_min_ms: default_think_delay_min_ms(),
            think_delay_max_ms: default_think_delay_max_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// Renderer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RenderConfig {
    /// Milliseconds between rendered frames.
    #[serde(default = "default_render_interval_ms")]
    pub interval_ms: u64,
}

impl RenderConfig {
    /// The render interval as a [`Duration`].
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_render_interval_ms(),
        }
    }
}

/// Entity generator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeneratorConfig {
    /// Whether the generator runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Milliseconds between generated entities.
    #[serde(default = "default_generator_interval_ms")]
    pub interval_ms: u64,
}

impl GeneratorConfig {
    /// The generator interval as a [`Duration`].
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: default_generator_interval_ms(),
        }
    }
}

/// Capacities of the best-effort channels. Both drop on overflow.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChannelConfig {
    /// Snapshot delivery slot between simulators and the renderer.
    #[serde(default = "default_snapshot_capacity")]
    pub snapshot_capacity: usize,

    /// Registry change-event queue.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            snapshot_capacity: default_snapshot_capacity(),
            event_capacity: default_event_capacity(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default `tracing` filter when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_seed() -> u64 {
    42
}

const fn default_game_count() -> usize {
    5
}

const fn default_board_size() -> usize {
    8
}

const fn default_think_delay_min_ms() -> u64 {
    50
}

const fn default_think_delay_max_ms() -> u64 {
    250
}

const fn default_poll_interval_ms() -> u64 {
    500
}

const fn default_render_interval_ms() -> u64 {
    1_000
}

const fn default_generator_interval_ms() -> u64 {
    200
}

const fn default_snapshot_capacity() -> usize {
    1
}

const fn default_event_capacity() -> usize {
    128
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_true() -> bool {
    true
}

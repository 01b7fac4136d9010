//! Error types for the arena binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup and the run itself.

/// Top-level error for the arena binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: gambit_core::ConfigError,
    },

    /// The arena run failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: gambit_core::RunnerError,
    },
}

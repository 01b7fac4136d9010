//! Gambit arena binary.
//!
//! Runs a fixed set of self-playing games concurrently, renders snapshots
//! of all of them to stdout at a fixed interval and logs every registry
//! change, then prints the registry totals once the last game ends.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from the path given as the first argument, or
//!    `gambit-config.yaml` in the working directory, or defaults
//! 2. Initialize structured logging (tracing)
//! 3. Build the registry and the game manager
//! 4. Create the configured number of games and register them
//! 5. Run the arena until every game has finished
//! 6. Log the totals and print the registry stats

mod error;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use gambit_core::runner::log_arena_end;
use gambit_core::{ArenaConfig, Game, GameManager, Registry, StdoutSink, run_arena};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Config file looked up in the working directory when no path is given.
const DEFAULT_CONFIG_PATH: &str = "gambit-config.yaml";

#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration. Logging is not up yet, so whether a file was
    //    found is reported right after the subscriber is installed.
    let config_path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let (config, loaded_from_file) = load_config(&config_path)?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("gambit-engine starting");
    if loaded_from_file {
        info!(path = %config_path.display(), "Configuration loaded");
    } else {
        info!(path = %config_path.display(), "Config file not found, using defaults");
    }
    info!(
        seed = config.world.seed,
        game_count = config.simulation.game_count,
        board_size = config.simulation.board_size,
        render_interval_ms = config.render.interval_ms,
        generator_enabled = config.generator.enabled,
        "Arena configuration"
    );

    // 3. Build the shared registry and the manager.
    let (registry, events) = Registry::new(config.channels.event_capacity);
    let registry = Arc::new(registry);
    let manager = Arc::new(GameManager::new(Arc::clone(&registry)));

    // 4. Create and register games.
    populate(&config, &registry, &manager).await;
    info!(games = manager.count().await, "Games registered");

    // 5. Run.
    let (summary, _sink) = run_arena(
        &config,
        Arc::clone(&registry),
        Arc::clone(&manager),
        events,
        StdoutSink,
    )
    .await?;

    // 6. Report.
    log_arena_end(&summary);
    println!("{}", registry.stats().await);

    info!("gambit-engine shutdown complete");
    Ok(())
}

/// Load the arena configuration, falling back to defaults when the file
/// does not exist. The flag tells whether a file was read.
fn load_config(path: &Path) -> Result<(ArenaConfig, bool), EngineError> {
    if path.exists() {
        Ok((ArenaConfig::from_file(path)?, true))
    } else {
        Ok((ArenaConfig::default(), false))
    }
}

/// Create `game_count` games and store each game and both its players.
async fn populate(config: &ArenaConfig, registry: &Registry, manager: &GameManager) {
    for i in 1..=config.simulation.game_count {
        let game = Arc::new(Game::new(
            &format!("White-{i}"),
            &format!("Black-{i}"),
            config.simulation.board_size,
        ));
        registry.store(Arc::clone(game.white())).await;
        registry.store(Arc::clone(game.black())).await;
        registry.store(Arc::clone(&game)).await;
        manager.add(game).await;
    }
}

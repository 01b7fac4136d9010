//! Arena run coordinator.
//!
//! [`run_arena`] wires one run together: it starts every game held by the
//! manager and spawns one simulator task per game, plus the aggregator,
//! the entity generator (when enabled) and the change logger. Then it
//! polls the manager's live count until no game is left, raises the
//! shared [`DoneSignal`] and joins every task.
//!
//! There is no central scheduler. The tasks coordinate only through the
//! manager, the registry, the two best-effort channels and the signal.

use std::sync::Arc;
use std::time::Duration;

use gambit_types::ChangeEvent;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{info, warn};

use crate::aggregator::{FrameSink, run_aggregator};
use crate::change_log::run_change_logger;
use crate::config::ArenaConfig;
use crate::generator::run_generator;
use crate::manager::GameManager;
use crate::registry::Registry;
use crate::signal::DoneSignal;
use crate::simulator::{SimulatorContext, SimulatorExit, SimulatorReport, run_simulator};

/// Errors that can end an arena run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A spawned task panicked or was aborted.
    #[error("{task} task failed: {message}")]
    TaskFailed {
        /// Which task failed.
        task: String,
        /// The join error, as text.
        message: String,
    },
}

/// Totals for one arena run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaSummary {
    /// Games whose simulator saw them finish.
    pub games_finished: usize,
    /// Auto-moves applied across all games.
    pub total_moves: usize,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
    /// Snapshots accepted by the delivery slot.
    pub snapshots_sent: usize,
    /// Snapshots dropped because the slot was full.
    pub snapshots_dropped: usize,
    /// Frames the aggregator rendered.
    pub frames_rendered: usize,
    /// Entities the background generator stored.
    pub entities_generated: usize,
    /// Change events the logger received.
    pub events_logged: usize,
    /// Change events the registry dropped on a full queue.
    pub events_dropped: u64,
}

/// Run every game in `manager` to completion.
///
/// `events` is the receiving half returned by [`Registry::new`]. Frames go
/// to `sink`, which is handed back alongside the summary.
///
/// # Errors
///
/// Returns [`RunnerError::TaskFailed`] if any spawned task panics.
pub async fn run_arena<S: FrameSink + 'static>(
    config: &ArenaConfig,
    registry: Arc<Registry>,
    manager: Arc<GameManager>,
    events: mpsc::Receiver<ChangeEvent>,
    sink: S,
) -> Result<(ArenaSummary, S), RunnerError> {
    let started = Instant::now();
    let done = Arc::new(DoneSignal::new());

    let games = manager.snapshot().await;
    for game in &games {
        game.start().await;
    }
    info!(
        games = games.len(),
        board_size = config.simulation.board_size,
        think_delay_min_ms = config.simulation.think_delay_min_ms,
        think_delay_max_ms = config.simulation.think_delay_max_ms,
        "Arena starting"
    );

    let (snapshot_tx, snapshot_rx) = mpsc::channel(config.channels.snapshot_capacity.max(1));
    let ctx = SimulatorContext {
        manager: Arc::clone(&manager),
        registry: Arc::clone(&registry),
        snapshots: snapshot_tx,
        done: Arc::clone(&done),
        think_delay_ms: config.simulation.think_delay_min_ms..=config.simulation.think_delay_max_ms,
    };
    let simulators: Vec<JoinHandle<SimulatorReport>> = games
        .into_iter()
        .map(|game| tokio::spawn(run_simulator(game, ctx.clone())))
        .collect();
    // Only the simulators hold senders from here on.
    drop(ctx);

    let aggregator = tokio::spawn(run_aggregator(
        Arc::clone(&manager),
        snapshot_rx,
        Arc::clone(&done),
        config.render.interval(),
        sink,
    ));
    let generator = config.generator.enabled.then(|| {
        tokio::spawn(run_generator(
            Arc::clone(&registry),
            Arc::clone(&done),
            config.generator.interval(),
            config.world.seed,
        ))
    });
    let logger = tokio::spawn(run_change_logger(events, Arc::clone(&done)));

    wait_for_last_game(&manager, &simulators, config.simulation.poll_interval()).await;
    done.raise();
    info!("All games finished, stopping tasks");

    let mut summary = ArenaSummary {
        games_finished: 0,
        total_moves: 0,
        elapsed: Duration::ZERO,
        snapshots_sent: 0,
        snapshots_dropped: 0,
        frames_rendered: 0,
        entities_generated: 0,
        events_logged: 0,
        events_dropped: 0,
    };

    for handle in simulators {
        let report = handle.await.map_err(|e| task_failed("simulator", &e))?;
        if report.exit != SimulatorExit::Cancelled {
            summary.games_finished = summary.games_finished.saturating_add(1);
        }
        summary.total_moves = summary.total_moves.saturating_add(report.moves_made);
        summary.snapshots_sent = summary.snapshots_sent.saturating_add(report.snapshots_sent);
        summary.snapshots_dropped = summary
            .snapshots_dropped
            .saturating_add(report.snapshots_dropped);
    }

    let (sink, aggregator_report) = aggregator
        .await
        .map_err(|e| task_failed("aggregator", &e))?;
    summary.frames_rendered = aggregator_report.frames_rendered;

    if let Some(handle) = generator {
        summary.entities_generated = handle.await.map_err(|e| task_failed("generator", &e))?;
    }
    summary.events_logged = logger.await.map_err(|e| task_failed("change logger", &e))?;
    summary.events_dropped = registry.events_dropped();
    summary.elapsed = started.elapsed();

    Ok((summary, sink))
}

/// Poll the live count until it reaches zero.
///
/// Also returns once every simulator has exited, so a task that died
/// without compacting its game cannot keep the run alive forever.
async fn wait_for_last_game(
    manager: &GameManager,
    simulators: &[JoinHandle<SimulatorReport>],
    poll_interval: Duration,
) {
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        let live = manager.count().await;
        if live == 0 {
            return;
        }
        if simulators.iter().all(JoinHandle::is_finished) {
            warn!(live, "every simulator exited with games still live");
            return;
        }
    }
}

fn task_failed(task: &str, err: &JoinError) -> RunnerError {
    RunnerError::TaskFailed {
        task: task.to_owned(),
        message: err.to_string(),
    }
}

/// Log the end-of-run totals.
pub fn log_arena_end(summary: &ArenaSummary) {
    info!(
        games_finished = summary.games_finished,
        total_moves = summary.total_moves,
        elapsed_ms = u64::try_from(summary.elapsed.as_millis()).unwrap_or(u64::MAX),
        frames_rendered = summary.frames_rendered,
        entities_generated = summary.entities_generated,
        "Arena finished"
    );
    info!(
        snapshots_sent = summary.snapshots_sent,
        snapshots_dropped = summary.snapshots_dropped,
        events_logged = summary.events_logged,
        events_dropped = summary.events_dropped,
        "Best-effort delivery totals"
    );
    if summary.total_moves == 0 {
        warn!("Arena ended without a single move");
    }
}

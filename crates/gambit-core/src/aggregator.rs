//! Snapshot aggregator: the single consumer of simulator snapshots.
//!
//! Simulators offer [`Snapshot`]s into a bounded slot with `try_send`. The
//! aggregator keeps the newest one it has received and, on its own fixed
//! interval, renders every game in it to a [`FrameSink`]. Until the first
//! delivery arrives it pulls a snapshot straight from the manager on each
//! tick instead.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::manager::{GameManager, Snapshot};
use crate::render::render_snapshot;
use crate::signal::DoneSignal;

/// Destination for rendered frames.
///
/// The engine prints to stdout; tests collect frames in memory.
pub trait FrameSink: Send {
    /// Called once per rendered frame.
    fn emit(&mut self, frame: &str);
}

/// Writes each frame to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl FrameSink for StdoutSink {
    fn emit(&mut self, frame: &str) {
        println!("{frame}");
    }
}

/// Keeps every frame in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    /// Frames in the order they were emitted.
    pub frames: Vec<String>,
}

impl FrameSink for MemorySink {
    fn emit(&mut self, frame: &str) {
        self.frames.push(frame.to_owned());
    }
}

/// What the aggregator did before it stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregatorReport {
    /// Frames handed to the sink.
    pub frames_rendered: usize,
    /// Snapshots taken out of the slot.
    pub snapshots_received: usize,
}

/// Render the freshest known snapshot every `interval` until `done` is raised.
///
/// Returns the sink so callers can inspect what was emitted.
pub async fn run_aggregator<S: FrameSink>(
    manager: Arc<GameManager>,
    mut snapshots: mpsc::Receiver<Snapshot>,
    done: Arc<DoneSignal>,
    interval: Duration,
    mut sink: S,
) -> (S, AggregatorReport) {
    let mut report = AggregatorReport::default();
    let mut latest: Option<Snapshot> = None;
    let mut slot_open = true;

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            () = done.wait() => break,
            received = snapshots.recv(), if slot_open => {
                if let Some(snapshot) = received {
                    report.snapshots_received = report.snapshots_received.saturating_add(1);
                    latest = Some(snapshot);
                } else {
                    debug!("snapshot slot closed");
                    slot_open = false;
                }
            }
            _ = ticker.tick() => {
                while let Ok(snapshot) = snapshots.try_recv() {
                    report.snapshots_received = report.snapshots_received.saturating_add(1);
                    latest = Some(snapshot);
                }
                let games = match &latest {
                    Some(snapshot) => snapshot.clone(),
                    None => manager.snapshot().await,
                };
                let frame = render_snapshot(&games).await;
                sink.emit(&frame);
                report.frames_rendered = report.frames_rendered.saturating_add(1);
            }
        }
    }

    info!(
        frames = report.frames_rendered,
        snapshots = report.snapshots_received,
        "aggregator stopped"
    );
    (sink, report)
}

//! Per-game simulator task.
//!
//! One task drives one game to completion. Each iteration:
//!
//! 1. Stop if the run-wide [`DoneSignal`] is raised.
//! 2. If the game is no longer in progress, compact the manager and stop.
//! 3. Think for a random delay, then take the game's write lock and play
//!    one auto-move (move, board shift and timing under one lock).
//! 4. If nothing could move, the game is already finished; compact the
//!    manager and stop.
//! 5. Otherwise record the move in the registry and offer the manager's
//!    current snapshot to the renderer with a non-blocking send.
//!
//! The game lock is always released before the manager or registry is
//! touched, which keeps the lock order acyclic.

use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

use gambit_types::GameId;
use rand::Rng as _;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::automove::{AutoMoveOutcome, play_auto_move};
use crate::game::Game;
use crate::manager::{GameManager, Snapshot};
use crate::registry::Registry;
use crate::signal::DoneSignal;

/// Everything a simulator task shares with the rest of the run.
#[derive(Debug, Clone)]
pub struct SimulatorContext {
    /// The live-game list, compacted when this game ends.
    pub manager: Arc<GameManager>,
    /// Where accepted moves are recorded.
    pub registry: Arc<Registry>,
    /// Best-effort snapshot slot read by the renderer.
    pub snapshots: mpsc::Sender<Snapshot>,
    /// Run-wide cancellation.
    pub done: Arc<DoneSignal>,
    /// Think delay bounds in milliseconds, inclusive.
    pub think_delay_ms: RangeInclusive<u64>,
}

/// Why a simulator task stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatorExit {
    /// The done signal was raised first.
    Cancelled,
    /// The game was found finished (e.g. resigned) at the top of the loop.
    Finished,
    /// The side to move had nothing to push; this task finished the game.
    NoLegalMove,
}

/// Summary of one simulator task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatorReport {
    /// The game this task drove.
    pub game_id: GameId,
    /// Why it stopped.
    pub exit: SimulatorExit,
    /// Auto-moves this task applied.
    pub moves_made: usize,
    /// Snapshots accepted by the slot.
    pub snapshots_sent: usize,
    /// Snapshots dropped because the slot was full or closed.
    pub snapshots_dropped: usize,
}

/// Drive `game` until it ends or the run is cancelled.
pub async fn run_simulator(game: Arc<Game>, ctx: SimulatorContext) -> SimulatorReport {
    let mut report = SimulatorReport {
        game_id: game.id(),
        exit: SimulatorExit::Cancelled,
        moves_made: 0,
        snapshots_sent: 0,
        snapshots_dropped: 0,
    };
    debug!(game = %report.game_id, "simulator started");

    loop {
        if ctx.done.is_raised() {
            report.exit = SimulatorExit::Cancelled;
            break;
        }

        if !game.is_in_progress().await {
            ctx.manager.remove_finished().await;
            report.exit = SimulatorExit::Finished;
            break;
        }

        let started = Instant::now();
        let delay = think_delay(&ctx.think_delay_ms);
        if !delay.is_zero() {
            tokio::select! {
                () = ctx.done.wait() => {
                    report.exit = SimulatorExit::Cancelled;
                    break;
                }
                () = tokio::time::sleep(delay) => {}
            }
        }

        let outcome = {
            let mut state = game.write().await;
            play_auto_move(&mut state, started.elapsed())
        };

        match outcome {
            AutoMoveOutcome::Moved(mv) => {
                report.moves_made = report.moves_made.saturating_add(1);
                ctx.registry.store(mv).await;

                let snapshot = ctx.manager.snapshot().await;
                match ctx.snapshots.try_send(snapshot) {
                    Ok(()) => report.snapshots_sent = report.snapshots_sent.saturating_add(1),
                    Err(TrySendError::Full(_) | TrySendError::Closed(_)) => {
                        report.snapshots_dropped = report.snapshots_dropped.saturating_add(1);
                    }
                }
            }
            AutoMoveOutcome::NoLegalMove => {
                ctx.manager.remove_finished().await;
                report.exit = SimulatorExit::NoLegalMove;
                break;
            }
            // Finished by someone else between the check and the lock; the
            // next iteration takes the finished path.
            AutoMoveOutcome::NotInProgress => {}
        }
    }

    info!(
        game = %report.game_id,
        exit = ?report.exit,
        moves = report.moves_made,
        snapshots_sent = report.snapshots_sent,
        snapshots_dropped = report.snapshots_dropped,
        "simulator stopped"
    );
    report
}

/// Uniform random delay within `range_ms`; an empty range yields its start.
fn think_delay(range_ms: &RangeInclusive<u64>) -> Duration {
    let (min, max) = (*range_ms.start(), *range_ms.end());
    if max <= min {
        return Duration::from_millis(min);
    }
    Duration::from_millis(rand::rng().random_range(min..=max))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gambit_types::{Board, Color, Piece, PieceKind, Position};

    use super::*;

    struct Fixture {
        manager: Arc<GameManager>,
        registry: Arc<Registry>,
        done: Arc<DoneSignal>,
        snapshots_rx: mpsc::Receiver<Snapshot>,
        ctx: SimulatorContext,
    }

    async fn fixture(games: &[Arc<Game>], slot: usize) -> Fixture {
        let (registry, _events) = Registry::new(1024);
        let registry = Arc::new(registry);
        let manager = Arc::new(GameManager::new(Arc::clone(&registry)));
        for game in games {
            game.start().await;
            registry.store(Arc::clone(game)).await;
            manager.add(Arc::clone(game)).await;
        }
        let (tx, snapshots_rx) = mpsc::channel(slot);
        let done = Arc::new(DoneSignal::new());
        let ctx = SimulatorContext {
            manager: Arc::clone(&manager),
            registry: Arc::clone(&registry),
            snapshots: tx,
            done: Arc::clone(&done),
            think_delay_ms: 0..=0,
        };
        Fixture {
            manager,
            registry,
            done,
            snapshots_rx,
            ctx,
        }
    }

    fn lone_white_pawn(row: i32) -> Arc<Game> {
        let mut board = Board::new(8);
        board.set(Position::new(row, 3), Some(Piece::new(PieceKind::Pawn, Color::White)));
        Arc::new(Game::with_board("w", "b", board))
    }

    #[tokio::test]
    async fn lone_pawn_game_ends_with_no_legal_move() {
        let game = lone_white_pawn(6);
        let mut fx = fixture(&[Arc::clone(&game)], 4).await;

        let report = run_simulator(Arc::clone(&game), fx.ctx.clone()).await;

        // White pushes once, then black has nothing to move.
        assert_eq!(report.exit, SimulatorExit::NoLegalMove);
        assert_eq!(report.moves_made, 1);
        assert!(game.is_finished().await);
        assert!(game.winner().await.is_none());
        assert_eq!(fx.manager.count().await, 0);
        assert_eq!(fx.registry.games().await.len(), 0);
        assert_eq!(fx.registry.moves().await.len(), 1);
        assert!(fx.snapshots_rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn raised_signal_stops_before_any_move() {
        let game = Arc::new(Game::new("w", "b", 8));
        let fx = fixture(&[Arc::clone(&game)], 1).await;
        fx.done.raise();

        let report = run_simulator(Arc::clone(&game), fx.ctx.clone()).await;

        assert_eq!(report.exit, SimulatorExit::Cancelled);
        assert_eq!(report.moves_made, 0);
        assert_eq!(game.move_count().await, 0);
        assert_eq!(fx.manager.count().await, 1);
    }

    #[tokio::test]
    async fn resigned_game_is_compacted_without_moving() {
        let game = Arc::new(Game::new("w", "b", 8));
        let fx = fixture(&[Arc::clone(&game)], 1).await;
        game.resign().await;

        let report = run_simulator(Arc::clone(&game), fx.ctx.clone()).await;

        assert_eq!(report.exit, SimulatorExit::Finished);
        assert_eq!(report.moves_made, 0);
        assert_eq!(fx.manager.count().await, 0);
    }

    #[tokio::test]
    async fn full_slot_drops_snapshots() {
        let game = Arc::new(Game::new("w", "b", 8));
        let fx = fixture(&[Arc::clone(&game)], 1).await;

        let report = run_simulator(Arc::clone(&game), fx.ctx.clone()).await;

        // Nobody reads the slot, so only the first snapshot fits.
        assert!(report.moves_made > 1);
        assert_eq!(report.snapshots_sent, 1);
        assert_eq!(
            report.snapshots_dropped,
            report.moves_made.saturating_sub(1)
        );
        assert_eq!(game.move_count().await, report.moves_made);
    }

    #[tokio::test]
    async fn history_matches_turn_switches() {
        let game = Arc::new(Game::new("w", "b", 8));
        let fx = fixture(&[Arc::clone(&game)], 1).await;

        let report = run_simulator(Arc::clone(&game), fx.ctx.clone()).await;
        assert_eq!(report.exit, SimulatorExit::NoLegalMove);

        let history = game.move_history().await;
        assert_eq!(history.len(), report.moves_made);
        for pair in history.windows(2) {
            let (a, b) = (pair.first().unwrap(), pair.get(1).unwrap());
            assert_ne!(a.player.color, b.player.color);
        }
        // Turn flipped once per accepted move, starting from white.
        let expected_turn = if history.len() % 2 == 0 {
            Color::White
        } else {
            Color::Black
        };
        assert_eq!(game.read().await.turn(), expected_turn);
    }

    #[tokio::test(start_paused = true)]
    async fn signal_interrupts_think_delay() {
        let game = Arc::new(Game::new("w", "b", 8));
        let mut fx = fixture(&[Arc::clone(&game)], 1).await;
        fx.ctx.think_delay_ms = 60_000..=60_000;

        let handle = tokio::spawn(run_simulator(Arc::clone(&game), fx.ctx.clone()));
        tokio::task::yield_now().await;
        fx.done.raise();

        let report = handle.await.unwrap();
        assert_eq!(report.exit, SimulatorExit::Cancelled);
        assert_eq!(game.move_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn move_timing_follows_the_runtime_clock() {
        let game = lone_white_pawn(6);
        let mut fx = fixture(&[Arc::clone(&game)], 4).await;
        fx.ctx.think_delay_ms = 30..=30;

        let report = run_simulator(Arc::clone(&game), fx.ctx.clone()).await;

        assert_eq!(report.moves_made, 1);
        let timing = game.timing().await;
        assert!(timing.last_white >= Duration::from_millis(30));
        assert!(timing.last_white < Duration::from_secs(1));
        assert_eq!(timing.last_move, timing.last_white);
    }

    #[test]
    fn think_delay_stays_in_range() {
        for _ in 0..100 {
            let d = think_delay(&(5..=9));
            assert!(d >= Duration::from_millis(5) && d <= Duration::from_millis(9));
        }
        assert_eq!(think_delay(&(7..=7)), Duration::from_millis(7));
    }
}

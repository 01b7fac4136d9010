//! Change-event logger.
//!
//! Sole consumer of the registry's event queue. Producers enqueue with
//! `try_send` and never wait on this task, so a slow logger only costs
//! dropped events, never stalled writers.

use std::sync::Arc;

use gambit_types::ChangeEvent;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::signal::DoneSignal;

/// Log every change event until `done` is raised or the queue closes.
///
/// Returns how many events were logged.
pub async fn run_change_logger(
    mut events: mpsc::Receiver<ChangeEvent>,
    done: Arc<DoneSignal>,
) -> usize {
    let mut logged: usize = 0;

    loop {
        tokio::select! {
            biased;
            () = done.wait() => break,
            received = events.recv() => {
                let Some(event) = received else {
                    debug!("change-event queue closed");
                    break;
                };
                info!(
                    collection = %event.collection,
                    operation = %event.operation,
                    timestamp = %event.timestamp,
                    detail = %event.detail,
                    "registry changed"
                );
                logged = logged.saturating_add(1);
            }
        }
    }

    debug!(logged, "change logger stopped");
    logged
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gambit_types::{Board, Collection, Operation};

    use super::*;
    use crate::registry::Registry;

    #[tokio::test]
    async fn logs_until_queue_closes() {
        let (registry, rx) = Registry::new(16);
        registry.store(Board::new(2)).await;
        registry.store(Board::new(3)).await;
        drop(registry);

        let logged = run_change_logger(rx, Arc::new(DoneSignal::new())).await;
        assert_eq!(logged, 2);
    }

    #[tokio::test]
    async fn stops_on_signal_while_producer_lives() {
        let (tx, rx) = mpsc::channel(4);
        let done = Arc::new(DoneSignal::new());
        let handle = tokio::spawn(run_change_logger(rx, Arc::clone(&done)));

        tx.send(ChangeEvent::now(Collection::Games, Operation::Remove, "gone"))
            .await
            .unwrap();
        tokio::task::yield_now().await;
        done.raise();

        let logged = handle.await.unwrap();
        assert!(logged <= 1);
        assert!(tx.is_closed());
    }
}

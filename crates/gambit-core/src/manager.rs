//! Authoritative list of live games for one run.
//!
//! [`GameManager`] is what the coordinator polls to decide when the run is
//! over and what simulators hand to the renderer as a snapshot. Compaction
//! ([`remove_finished`](GameManager::remove_finished)) builds the list of
//! survivors while holding the exclusive lock and swaps it in at once, so
//! no reader ever sees a list with a game half removed.
//!
//! Lock order is manager, then game, then registry. Nothing acquires the
//! manager lock while holding a game lock.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::game::Game;
use crate::registry::Registry;

/// A point-in-time copy of the manager's live games.
pub type Snapshot = Vec<Arc<Game>>;

/// Owner of the live-game list.
#[derive(Debug)]
pub struct GameManager {
    games: RwLock<Vec<Arc<Game>>>,
    registry: Arc<Registry>,
}

impl GameManager {
    /// Create an empty manager that reports removals to `registry`.
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            games: RwLock::new(Vec::new()),
            registry,
        }
    }

    /// Append a game to the live list.
    pub async fn add(&self, game: Arc<Game>) {
        self.games.write().await.push(game);
    }

    /// An independent copy of the live list.
    pub async fn snapshot(&self) -> Snapshot {
        self.games.read().await.clone()
    }

    /// Number of live games.
    pub async fn count(&self) -> usize {
        self.games.read().await.len()
    }

    /// Drop every finished game from the live list and the registry.
    ///
    /// In-progress and not-yet-started games are kept. Calling this again
    /// with no intervening state change removes nothing. Returns how many
    /// games were removed.
    pub async fn remove_finished(&self) -> usize {
        let mut games = self.games.write().await;
        let mut remaining = Vec::with_capacity(games.len());
        let mut removed: usize = 0;

        for game in games.iter() {
            if game.is_finished().await {
                self.registry.remove_game(game).await;
                removed = removed.saturating_add(1);
                debug!(game = %game.id(), "finished game compacted");
            } else {
                remaining.push(Arc::clone(game));
            }
        }

        *games = remaining;
        removed
    }
}

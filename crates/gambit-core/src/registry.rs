//! Shared repository of every entity the arena has seen.
//!
//! The [`Registry`] holds four insert-ordered collections (boards, games,
//! moves, players), each behind its own reader/writer lock so a writer to
//! one never blocks readers of another. Reads hand out independent copies
//! of the collection; later mutations never show through a copy.
//!
//! Every mutation produces a [`ChangeEvent`] that is offered to a bounded
//! queue with a single non-blocking `try_send`. When the queue is full the
//! event is dropped and counted. Delivery is not guaranteed and nothing in
//! this API promises otherwise.
//!
//! The registry is constructed explicitly and passed by `Arc`; there is no
//! process-wide instance.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use gambit_types::{Board, ChangeEvent, Collection, Move, Operation, Player};
use tokio::sync::RwLock;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::trace;

use crate::game::Game;

/// Anything the registry can store, tagged by collection.
#[derive(Debug, Clone)]
pub enum Entity {
    /// A stand-alone board.
    Board(Board),
    /// A game, shared with whoever else plays or renders it.
    Game(Arc<Game>),
    /// A move record.
    Move(Move),
    /// A player.
    Player(Arc<Player>),
}

impl Entity {
    /// The collection this entity belongs to.
    pub const fn collection(&self) -> Collection {
        match self {
            Self::Board(_) => Collection::Boards,
            Self::Game(_) => Collection::Games,
            Self::Move(_) => Collection::Moves,
            Self::Player(_) => Collection::Players,
        }
    }
}

impl From<Board> for Entity {
    fn from(board: Board) -> Self {
        Self::Board(board)
    }
}

impl From<Arc<Game>> for Entity {
    fn from(game: Arc<Game>) -> Self {
        Self::Game(game)
    }
}

impl From<Move> for Entity {
    fn from(mv: Move) -> Self {
        Self::Move(mv)
    }
}

impl From<Arc<Player>> for Entity {
    fn from(player: Arc<Player>) -> Self {
        Self::Player(player)
    }
}

/// Collection sizes at one instant (each read under its own lock).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Stored boards.
    pub boards: usize,
    /// Stored games.
    pub games: usize,
    /// Stored moves.
    pub moves: usize,
    /// Stored players.
    pub players: usize,
}

impl core::fmt::Display for RegistryStats {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "=== Registry Stats ===")?;
        writeln!(f, "Boards:  {}", self.boards)?;
        writeln!(f, "Games:   {}", self.games)?;
        writeln!(f, "Moves:   {}", self.moves)?;
        write!(f, "Players: {}", self.players)
    }
}

/// Thread-safe store of boards, games, moves and players.
#[derive(Debug)]
pub struct Registry {
    boards: RwLock<Vec<Arc<Board>>>,
    games: RwLock<Vec<Arc<Game>>>,
    moves: RwLock<Vec<Arc<Move>>>,
    players: RwLock<Vec<Arc<Player>>>,
    events: mpsc::Sender<ChangeEvent>,
    events_dropped: AtomicU64,
}

impl Registry {
    /// Create an empty registry whose change-event queue holds at most
    /// `event_capacity` undelivered events (minimum 1).
    ///
    /// Returns the registry and the receiving end of its event queue.
    pub fn new(event_capacity: usize) -> (Self, mpsc::Receiver<ChangeEvent>) {
        let (events, rx) = mpsc::channel(event_capacity.max(1));
        let registry = Self {
            boards: RwLock::new(Vec::new()),
            games: RwLock::new(Vec::new()),
            moves: RwLock::new(Vec::new()),
            players: RwLock::new(Vec::new()),
            events,
            events_dropped: AtomicU64::new(0),
        };
        (registry, rx)
    }

    /// Append `entity` to its collection, then offer a change event.
    pub async fn store(&self, entity: impl Into<Entity>) {
        let entity = entity.into();
        let collection = entity.collection();
        let detail = match entity {
            Entity::Board(board) => {
                let detail = format!("stored {0}x{0} board", board.size());
                self.boards.write().await.push(Arc::new(board));
                detail
            }
            Entity::Game(game) => {
                let detail = format!("stored game {}", game.id());
                self.games.write().await.push(game);
                detail
            }
            Entity::Move(mv) => {
                let detail = format!(
                    "stored move {} by {}",
                    mv.notation().unwrap_or_else(|| "?".to_owned()),
                    mv.player.display_name()
                );
                self.moves.write().await.push(Arc::new(mv));
                detail
            }
            Entity::Player(player) => {
                let detail = format!("stored player {}", player.display_name());
                self.players.write().await.push(player);
                detail
            }
        };
        self.notify(ChangeEvent::now(collection, Operation::Store, detail));
    }

    /// Remove exactly the game instance `game` points to.
    ///
    /// Matching is by pointer identity, so a different instance that
    /// happens to look the same stays. Returns `false` (and emits nothing)
    /// when the instance is not stored.
    pub async fn remove_game(&self, game: &Arc<Game>) -> bool {
        let mut games = self.games.write().await;
        let Some(idx) = games.iter().position(|g| Arc::ptr_eq(g, game)) else {
            return false;
        };
        games.remove(idx);
        self.notify(ChangeEvent::now(
            Collection::Games,
            Operation::Remove,
            format!("removed game {}", game.id()),
        ));
        true
    }

    /// Copy of the boards collection.
    pub async fn boards(&self) -> Vec<Arc<Board>> {
        self.boards.read().await.clone()
    }

    /// Copy of the games collection.
    pub async fn games(&self) -> Vec<Arc<Game>> {
        self.games.read().await.clone()
    }

    /// Copy of the moves collection.
    pub async fn moves(&self) -> Vec<Arc<Move>> {
        self.moves.read().await.clone()
    }

    /// Copy of the players collection.
    pub async fn players(&self) -> Vec<Arc<Player>> {
        self.players.read().await.clone()
    }

    /// Current size of every collection.
    pub async fn stats(&self) -> RegistryStats {
        RegistryStats {
            boards: self.boards.read().await.len(),
            games: self.games.read().await.len(),
            moves: self.moves.read().await.len(),
            players: self.players.read().await.len(),
        }
    }

    /// Number of change events dropped because the queue was full or gone.
    pub fn events_dropped(&self) -> u64 {
        self.events_dropped.load(Ordering::Relaxed)
    }

    fn notify(&self, event: ChangeEvent) {
        match self.events.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event) | TrySendError::Closed(event)) => {
                self.events_dropped.fetch_add(1, Ordering::Relaxed);
                trace!(
                    collection = %event.collection,
                    operation = %event.operation,
                    "change event dropped"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use gambit_types::{Color, Piece, PieceKind, Position};

    use super::*;

    fn sample_move() -> Move {
        Move::new(
            Position::new(6, 4),
            Position::new(5, 4),
            Arc::new(Player::new("w", Color::White)),
            Piece::new(PieceKind::Pawn, Color::White),
        )
    }

    #[tokio::test]
    async fn store_routes_by_kind() {
        let (registry, _rx) = Registry::new(16);
        registry.store(Board::new(3)).await;
        registry.store(Arc::new(Game::new("w", "b", 8))).await;
        registry.store(sample_move()).await;
        registry.store(Arc::new(Player::new("p", Color::Black))).await;

        let stats = registry.stats().await;
        assert_eq!(
            stats,
            RegistryStats {
                boards: 1,
                games: 1,
                moves: 1,
                players: 1,
            }
        );
    }

    #[tokio::test]
    async fn store_emits_change_events_in_order() {
        let (registry, mut rx) = Registry::new(16);
        registry.store(Board::new(2)).await;
        registry.store(Arc::new(Player::new("p", Color::White))).await;

        let first = rx.try_recv().ok();
        let second = rx.try_recv().ok();
        assert_eq!(
            first.map(|e| (e.collection, e.operation)),
            Some((Collection::Boards, Operation::Store))
        );
        assert_eq!(
            second.map(|e| (e.collection, e.operation)),
            Some((Collection::Players, Operation::Store))
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn snapshots_do_not_alias() {
        let (registry, _rx) = Registry::new(16);
        let game = Arc::new(Game::new("w", "b", 8));
        registry.store(Arc::clone(&game)).await;
        registry.store(Board::new(4)).await;

        let games_before = registry.games().await;
        let boards_before = registry.boards().await;

        registry.store(Arc::new(Game::new("w2", "b2", 8))).await;
        registry.store(Board::new(5)).await;
        assert!(registry.remove_game(&game).await);

        assert_eq!(games_before.len(), 1);
        assert!(games_before.first().is_some_and(|g| Arc::ptr_eq(g, &game)));
        assert_eq!(boards_before.len(), 1);
        assert_eq!(boards_before.first().map(|b| b.size()), Some(4));
        assert_eq!(registry.games().await.len(), 1);
        assert_eq!(registry.boards().await.len(), 2);
    }

    #[tokio::test]
    async fn remove_matches_identity_not_value() {
        let (registry, _rx) = Registry::new(16);
        let white = Arc::new(Player::new("w", Color::White));
        let black = Arc::new(Player::new("b", Color::Black));
        let first = Arc::new(Game::with_players(
            Arc::clone(&white),
            Arc::clone(&black),
            Board::new(8),
        ));
        let twin = Arc::new(Game::with_players(white, black, Board::new(8)));
        registry.store(Arc::clone(&first)).await;
        registry.store(Arc::clone(&twin)).await;

        assert!(registry.remove_game(&twin).await);
        let remaining = registry.games().await;
        assert_eq!(remaining.len(), 1);
        assert!(remaining.first().is_some_and(|g| Arc::ptr_eq(g, &first)));
    }

    #[tokio::test]
    async fn remove_missing_is_a_silent_no_op() {
        let (registry, mut rx) = Registry::new(16);
        let stranger = Arc::new(Game::new("w", "b", 8));
        assert!(!registry.remove_game(&stranger).await);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn remove_emits_one_event() {
        let (registry, mut rx) = Registry::new(16);
        let game = Arc::new(Game::new("w", "b", 8));
        registry.store(Arc::clone(&game)).await;
        assert!(registry.remove_game(&game).await);
        assert!(!registry.remove_game(&game).await);

        let events: Vec<ChangeEvent> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        let removes = events
            .iter()
            .filter(|e| e.operation == Operation::Remove)
            .count();
        assert_eq!(events.len(), 2);
        assert_eq!(removes, 1);
        assert!(events.iter().any(|e| e.detail.contains(&game.id().to_string())));
    }

    #[tokio::test]
    async fn full_queue_drops_without_blocking() {
        let (registry, mut rx) = Registry::new(2);
        for size in 1..=5 {
            registry.store(Board::new(size)).await;
        }
        assert_eq!(registry.stats().await.boards, 5);
        assert_eq!(registry.events_dropped(), 3);

        let delivered: Vec<ChangeEvent> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        assert_eq!(delivered.len(), 2);
        assert!(delivered.first().is_some_and(|e| e.detail.contains("1x1")));
    }

    #[tokio::test]
    async fn closed_queue_is_not_an_error() {
        let (registry, rx) = Registry::new(4);
        drop(rx);
        registry.store(Board::new(2)).await;
        assert_eq!(registry.stats().await.boards, 1);
        assert_eq!(registry.events_dropped(), 1);
    }
}

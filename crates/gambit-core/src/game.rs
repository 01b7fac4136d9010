//! A single match and its lock.
//!
//! [`Game`] is the aggregate root: two immutable players plus a
//! [`GameState`] behind one reader/writer lock. Every read or write of the
//! turn, status, board, history and timing fields goes through that lock,
//! so all transitions of one game are totally ordered while different
//! games never contend with each other.
//!
//! The state machine itself lives on [`GameState`] and is synchronous.
//! Callers that need several steps to be atomic (the simulator applies a
//! move, shifts the board and records timing in one go) take the write
//! guard once and call the [`GameState`] methods directly; the async
//! methods on [`Game`] are single-step conveniences that lock internally.

use std::sync::Arc;
use std::time::Duration;

use gambit_types::{Board, Color, GameId, GameStatus, Move, Player};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Duration of the most recent move, overall and per side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveTiming {
    /// Duration of the last move made by either side.
    pub last_move: Duration,
    /// Duration of white's last move.
    pub last_white: Duration,
    /// Duration of black's last move.
    pub last_black: Duration,
}

/// Mutable state of one game. Only reachable through the owning
/// [`Game`]'s lock.
#[derive(Debug)]
pub struct GameState {
    white: Arc<Player>,
    black: Arc<Player>,
    board: Board,
    history: Vec<Move>,
    turn: Color,
    status: GameStatus,
    winner: Option<Color>,
    timing: MoveTiming,
}

impl GameState {
    fn new(white: Arc<Player>, black: Arc<Player>, board: Board) -> Self {
        Self {
            white,
            black,
            board,
            history: Vec::new(),
            turn: Color::White,
            status: GameStatus::NotStarted,
            winner: None,
            timing: MoveTiming::default(),
        }
    }

    /// Move from `NotStarted` to `InProgress`.
    ///
    /// A no-op when already in progress. A finished game stays finished.
    pub fn start(&mut self) {
        if self.status == GameStatus::NotStarted {
            self.status = GameStatus::InProgress;
        }
    }

    /// Try to append `mv` to the history and pass the turn.
    ///
    /// Rejected, with no mutation at all, unless the game is in progress,
    /// the mover is the turn-holder (by identity) and both squares are on
    /// the board. The board itself is not touched here.
    pub fn make_move(&mut self, mv: Move) -> bool {
        if self.status != GameStatus::InProgress {
            return false;
        }
        if !Arc::ptr_eq(&mv.player, self.current_player()) {
            return false;
        }
        if !mv.is_valid(&self.board) {
            return false;
        }
        self.history.push(mv);
        self.turn = self.turn.opposite();
        true
    }

    /// Concede on behalf of the turn-holder: the other side wins and the
    /// game finishes. A no-op on a game that has already finished.
    pub fn resign(&mut self) {
        if self.status == GameStatus::Finished {
            return;
        }
        self.winner = Some(self.turn.opposite());
        self.finish();
    }

    /// Finish the game, leaving the winner as it is.
    pub fn finish(&mut self) {
        self.status = GameStatus::Finished;
    }

    /// Record how long `color`'s move took.
    pub fn record_timing(&mut self, color: Color, elapsed: Duration) {
        self.timing.last_move = elapsed;
        match color {
            Color::White => self.timing.last_white = elapsed,
            Color::Black => self.timing.last_black = elapsed,
        }
    }

    /// Whether moves are currently accepted.
    pub fn is_in_progress(&self) -> bool {
        self.status == GameStatus::InProgress
    }

    /// Whether the game has reached its terminal state.
    pub fn is_finished(&self) -> bool {
        self.status == GameStatus::Finished
    }

    /// Current lifecycle status.
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    /// Side whose move is accepted next.
    pub const fn turn(&self) -> Color {
        self.turn
    }

    /// The turn-holder.
    pub const fn current_player(&self) -> &Arc<Player> {
        self.player(self.turn)
    }

    /// The player controlling `color`.
    pub const fn player(&self, color: Color) -> &Arc<Player> {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    /// The winner, if the game ended by resignation.
    pub fn winner(&self) -> Option<&Arc<Player>> {
        self.winner.map(|color| self.player(color))
    }

    /// The board.
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The board, for callers that shift pieces after an accepted move.
    pub const fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Accepted moves, oldest first.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Timing of the most recent moves.
    pub const fn timing(&self) -> MoveTiming {
        self.timing
    }
}

/// One match between two players, safe to share across tasks.
#[derive(Debug)]
pub struct Game {
    id: GameId,
    white: Arc<Player>,
    black: Arc<Player>,
    state: RwLock<GameState>,
}

impl Game {
    /// Create a game on a board with both sides set up.
    pub fn new(white_name: &str, black_name: &str, board_size: usize) -> Self {
        Self::with_board(white_name, black_name, Board::with_standard_setup(board_size))
    }

    /// Create a game on the given board.
    pub fn with_board(white_name: &str, black_name: &str, board: Board) -> Self {
        let white = Arc::new(Player::new(white_name, Color::White));
        let black = Arc::new(Player::new(black_name, Color::Black));
        Self::with_players(white, black, board)
    }

    /// Create a game between existing players.
    pub fn with_players(white: Arc<Player>, black: Arc<Player>, board: Board) -> Self {
        let state = GameState::new(Arc::clone(&white), Arc::clone(&black), board);
        Self {
            id: GameId::new(),
            white,
            black,
            state: RwLock::new(state),
        }
    }

    /// This game's identifier (for display; removal uses identity).
    pub const fn id(&self) -> GameId {
        self.id
    }

    /// The white player. Immutable, so no lock is needed.
    pub const fn white(&self) -> &Arc<Player> {
        &self.white
    }

    /// The black player. Immutable, so no lock is needed.
    pub const fn black(&self) -> &Arc<Player> {
        &self.black
    }

    /// Acquire the shared lock.
    pub async fn read(&self) -> RwLockReadGuard<'_, GameState> {
        self.state.read().await
    }

    /// Acquire the exclusive lock.
    pub async fn write(&self) -> RwLockWriteGuard<'_, GameState> {
        self.state.write().await
    }

    /// See [`GameState::start`].
    pub async fn start(&self) {
        self.write().await.start();
    }

    /// See [`GameState::make_move`].
    pub async fn make_move(&self, mv: Move) -> bool {
        self.write().await.make_move(mv)
    }

    /// See [`GameState::resign`].
    pub async fn resign(&self) {
        self.write().await.resign();
    }

    /// See [`GameState::finish`].
    pub async fn finish(&self) {
        self.write().await.finish();
    }

    /// Whether moves are currently accepted.
    pub async fn is_in_progress(&self) -> bool {
        self.read().await.is_in_progress()
    }

    /// Whether the game has reached its terminal state.
    pub async fn is_finished(&self) -> bool {
        self.read().await.is_finished()
    }

    /// Current lifecycle status.
    pub async fn status(&self) -> GameStatus {
        self.read().await.status()
    }

    /// The turn-holder.
    pub async fn current_player(&self) -> Arc<Player> {
        Arc::clone(self.read().await.current_player())
    }

    /// The winner, if any.
    pub async fn winner(&self) -> Option<Arc<Player>> {
        self.read().await.winner().cloned()
    }

    /// Number of accepted moves.
    pub async fn move_count(&self) -> usize {
        self.read().await.history().len()
    }

    /// An independent copy of the move history.
    pub async fn move_history(&self) -> Vec<Move> {
        self.read().await.history().to_vec()
    }

    /// Timing of the most recent moves.
    pub async fn timing(&self) -> MoveTiming {
        self.read().await.timing()
    }
}

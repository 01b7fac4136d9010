//! Forward-shift auto-move heuristic.
//!
//! Not chess. The side to move scans the board in row-major order and
//! pushes the first of its pieces whose square one step forward is on the
//! board and not held by one of its own pieces. An enemy piece on that
//! square is overwritten without any capture notification. The scan order
//! is the only tie-break, so the chosen move is fully deterministic.

use std::sync::Arc;
use std::time::Duration;

use gambit_types::{Board, Color, Move, Piece, Position};

use crate::game::GameState;

/// A single forward step chosen by [`find_auto_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoMove {
    /// Square the piece leaves.
    pub from: Position,
    /// Square the piece lands on.
    pub to: Position,
    /// The piece being moved.
    pub piece: Piece,
}

/// What happened when the simulator asked for an auto-move.
#[derive(Debug, Clone)]
pub enum AutoMoveOutcome {
    /// A move was applied; carries the accepted record.
    Moved(Move),
    /// The side to move had nothing to push; the game is now finished
    /// with no winner.
    NoLegalMove,
    /// The game was not in progress, so nothing was attempted.
    NotInProgress,
}

/// First movable piece of `color` in row-major order, if any.
pub fn find_auto_move(board: &Board, color: Color) -> Option<AutoMove> {
    board.positions().find_map(|from| {
        let piece = board.get(from).filter(|p| p.color == color)?;
        let to = from.forward(color).filter(|to| board.is_valid_position(*to))?;
        if board.get(to).is_some_and(|occupant| occupant.color == color) {
            return None;
        }
        Some(AutoMove { from, to, piece })
    })
}

/// Choose and apply one auto-move for the side to move.
///
/// The caller holds the game's write lock for the whole call, so the
/// history entry, the board shift and the timing update land together.
/// `elapsed` is recorded as the mover's last-move duration.
pub fn play_auto_move(state: &mut GameState, elapsed: Duration) -> AutoMoveOutcome {
    if !state.is_in_progress() {
        return AutoMoveOutcome::NotInProgress;
    }
    let color = state.turn();
    let Some(step) = find_auto_move(state.board(), color) else {
        state.finish();
        return AutoMoveOutcome::NoLegalMove;
    };

    let mv = Move::new(
        step.from,
        step.to,
        Arc::clone(state.current_player()),
        step.piece,
    );
    if !state.make_move(mv.clone()) {
        // Unreachable with a move built from the current state, but the
        // board must not shift for a move the game refused.
        return AutoMoveOutcome::NotInProgress;
    }

    let board = state.board_mut();
    board.set(step.to, Some(step.piece));
    board.set(step.from, None);
    state.record_timing(color, elapsed);
    AutoMoveOutcome::Moved(mv)
}

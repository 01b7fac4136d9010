//! Text rendering of games for the console renderer.
//!
//! Rendering is read-only: each game is formatted under its own read lock,
//! taken for that one game and released before the next.

use std::sync::Arc;
use std::time::Duration;

use gambit_types::{Board, Position};

use crate::game::{Game, GameState};

/// Glyph for an empty cell.
const EMPTY_CELL: &str = "\u{00B7}";

/// Render every game in `games`, separated by blank lines.
pub async fn render_snapshot(games: &[Arc<Game>]) -> String {
    let mut frame = format!("=== {} live game(s) ===\n", games.len());
    for game in games {
        frame.push('\n');
        frame.push_str(&render_game(game).await);
    }
    frame
}

/// Render one game under its read lock.
pub async fn render_game(game: &Game) -> String {
    let state = game.read().await;
    format_game(game, &state)
}

/// Format a game from state the caller has already locked.
pub fn format_game(game: &Game, state: &GameState) -> String {
    let timing = state.timing();
    let mut out = format!(
        "Game {} [{}] moves: {} turn: {}\n",
        game.id().short(),
        state.status(),
        state.history().len(),
        state.turn()
    );
    out.push_str(&format!(
        "  {}  last move: {}\n",
        game.white().display_name(),
        format_ms(timing.last_white)
    ));
    out.push_str(&format!(
        "  {}  last move: {}\n",
        game.black().display_name(),
        format_ms(timing.last_black)
    ));
    out.push_str(&format_board(state.board()));
    if let Some(last) = state.history().last() {
        let notation = last.notation().unwrap_or_else(|| "?".to_owned());
        out.push_str(&format!("  last: {notation} {}\n", last.piece));
    }
    if let Some(winner) = state.winner() {
        out.push_str(&format!("  winner: {}\n", winner.display_name()));
    }
    out
}

/// Board grid with file letters across the top and 1-based ranks down the side.
pub fn format_board(board: &Board) -> String {
    let files: String = (0..board.size())
        .map(|col| {
            let file = u8::try_from(col)
                .ok()
                .and_then(|c| b'a'.checked_add(c))
                .map_or('?', char::from);
            format!(" {file}")
        })
        .collect();
    let mut out = format!("    {files}\n");

    let mut current_row = None;
    for pos in board.positions() {
        if current_row != Some(pos.row) {
            if current_row.is_some() {
                out.push('\n');
            }
            current_row = Some(pos.row);
            out.push_str(&format!("  {:>2}", pos.row.saturating_add(1)));
        }
        out.push(' ');
        out.push_str(cell_symbol(board, pos));
    }
    if current_row.is_some() {
        out.push('\n');
    }
    out
}

fn format_ms(d: Duration) -> String {
    format!("{} ms", d.as_millis())
}

fn cell_symbol(board: &Board, pos: Position) -> &'static str {
    board.get(pos).map_or(EMPTY_CELL, |piece| piece.symbol())
}

#[cfg(test)]
mod tests {
    use gambit_types::{Color, Piece, PieceKind};

    use super::*;
    use crate::automove::play_auto_move;

    #[test]
    fn board_has_labels_and_glyphs() {
        let mut board = Board::new(3);
        board.set(Position::new(0, 0), Some(Piece::new(PieceKind::King, Color::Black)));
        board.set(Position::new(2, 2), Some(Piece::new(PieceKind::Pawn, Color::White)));
        let text = format_board(&board);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines.first().map(|l| l.trim()), Some("a b c"));
        assert!(lines.get(1).is_some_and(|l| l.contains('\u{265A}')));
        assert!(lines.get(3).is_some_and(|l| l.trim_end().ends_with('\u{2659}')));
        assert_eq!(cell_symbol(&board, Position::new(1, 1)), EMPTY_CELL);
    }

    #[tokio::test]
    async fn game_rendering_includes_players_and_timing() {
        let game = Game::new("Anna", "Boris", 8);
        game.start().await;
        {
            let mut state = game.write().await;
            state.record_timing(Color::White, Duration::from_millis(42));
        }
        let text = render_game(&game).await;
        assert!(text.contains(&game.id().short()));
        assert!(text.contains("[in_progress]"));
        assert!(text.contains("Anna (white"));
        assert!(text.contains("Boris (black"));
        assert!(text.contains("42 ms"));
    }

    #[tokio::test]
    async fn played_move_shows_notation_and_turn() {
        let game = Game::new("Anna", "Boris", 8);
        game.start().await;
        {
            let mut state = game.write().await;
            play_auto_move(&mut state, Duration::from_millis(5));
        }
        let text = render_game(&game).await;
        assert!(text.contains("moves: 1 turn: black"));
        assert!(text.contains("last: a7-a6 \u{2659}"));
        assert!(text.lines().all(|line| !line.is_empty()));
    }

    #[tokio::test]
    async fn resigned_game_shows_winner() {
        let game = Game::new("Anna", "Boris", 4);
        game.start().await;
        game.resign().await;
        let text = render_game(&game).await;
        assert!(text.contains("winner: Boris"));
    }

    #[tokio::test]
    async fn snapshot_renders_every_game() {
        let games = vec![
            Arc::new(Game::new("a", "b", 4)),
            Arc::new(Game::new("c", "d", 4)),
        ];
        let frame = render_snapshot(&games).await;
        assert!(frame.starts_with("=== 2 live game(s) ==="));
        for game in &games {
            assert!(frame.contains(&game.id().short()));
        }
    }
}

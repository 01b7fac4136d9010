//! Background entity generator.
//!
//! A filler workload that stores one random entity in the registry per
//! interval. It never reads game state and nothing in the simulation
//! depends on what it produces.

use std::sync::Arc;
use std::time::Duration;

use gambit_types::{Board, Color, Move, Piece, PieceKind, Player, Position};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng as _};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::game::Game;
use crate::registry::{Entity, Registry};
use crate::signal::DoneSignal;

/// Largest generated board side.
const MAX_GENERATED_SIZE: usize = 8;

/// Exclusive upper bound of generated move coordinates.
const MOVE_COORD_BOUND: i32 = 8;

/// Build one random board, game, move or player.
pub fn generate_entity<R: Rng + ?Sized>(rng: &mut R) -> Entity {
    match rng.random_range(0..4_u8) {
        0 => Board::new(rng.random_range(1..=MAX_GENERATED_SIZE)).into(),
        1 => {
            let size = rng.random_range(1..=MAX_GENERATED_SIZE);
            Arc::new(Game::new("RandomWhite", "RandomBlack", size)).into()
        }
        2 => {
            let from = random_position(rng);
            let to = random_position(rng);
            let player = Arc::new(Player::new("RandomPlayer", Color::White));
            Move::new(from, to, player, Piece::new(PieceKind::Pawn, Color::White)).into()
        }
        _ => {
            let color = if rng.random_bool(0.5) {
                Color::White
            } else {
                Color::Black
            };
            Arc::new(Player::new("RandomPlayer", color)).into()
        }
    }
}

fn random_position<R: Rng + ?Sized>(rng: &mut R) -> Position {
    Position::new(
        rng.random_range(0..MOVE_COORD_BOUND),
        rng.random_range(0..MOVE_COORD_BOUND),
    )
}

/// Store a generated entity every `interval` until `done` is raised.
///
/// The RNG is seeded from `seed`, so the sequence of entities is the same
/// on every run. Returns how many entities were stored.
pub async fn run_generator(
    registry: Arc<Registry>,
    done: Arc<DoneSignal>,
    interval: Duration,
    seed: u64,
) -> usize {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut generated: usize = 0;

    loop {
        tokio::select! {
            biased;
            () = done.wait() => break,
            _ = ticker.tick() => {
                let entity = generate_entity(&mut rng);
                debug!(collection = %entity.collection(), "generated entity");
                registry.store(entity).await;
                generated = generated.saturating_add(1);
            }
        }
    }

    info!(generated, "entity generator stopped");
    generated
}

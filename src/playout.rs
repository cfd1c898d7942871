//! Monte Carlo playouts (random game simulation).
//!
//! A playout finishes a game from some position as quickly as possible and
//! reports who won. The default policy picks uniformly among the legal moves.

use fastrand::Rng;

use crate::error::{MctsError, Result};
use crate::game::{GameState, Player};

/// A move-selection strategy used to finish simulations.
pub trait PlayoutPolicy<G: GameState> {
    /// Choose a move for the player to move at `state`.
    ///
    /// # Errors
    /// Returns [`MctsError::NoLegalMoves`] if a live state offers no moves.
    fn select_move(&mut self, state: &G, rng: &mut Rng) -> Result<G::Move>;
}

/// Uniformly random choice over the legal moves.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomPlayout;

impl<G: GameState> PlayoutPolicy<G> for RandomPlayout {
    fn select_move(&mut self, state: &G, rng: &mut Rng) -> Result<G::Move> {
        let mut moves = state.legal_moves();
        if moves.is_empty() {
            return Err(MctsError::NoLegalMoves);
        }
        let idx = rng.usize(..moves.len());
        Ok(moves.swap_remove(idx))
    }
}

/// Play `state` out to the end with `policy` and return the winner
/// (`None` for a draw).
///
/// Both players use the same policy, alternating as the game dictates.
/// The input state is left untouched.
pub fn simulate<G, P>(state: &G, policy: &mut P, rng: &mut Rng) -> Result<Option<Player>>
where
    G: GameState,
    P: PlayoutPolicy<G> + ?Sized,
{
    let mut game = state.clone();
    while !game.is_over() {
        let mv = policy.select_move(&game, rng)?;
        game = game.apply_move(&mv)?;
    }
    Ok(game.winner())
}

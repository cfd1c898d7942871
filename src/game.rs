//! The game-state contract consumed by the search.
//!
//! The search never looks inside a game. Anything that can list its legal
//! moves, produce successor states, detect the end of the game and name a
//! winner can be searched.

use std::fmt;

use crate::error::Result;

/// One of the two players of a game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    Black,
    White,
}

impl Player {
    /// The opponent of this player.
    #[inline]
    pub fn other(self) -> Player {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Black => write!(f, "black"),
            Player::White => write!(f, "white"),
        }
    }
}

/// A two-player, perfect-information, zero-sum game position.
///
/// States are treated as immutable values: [`GameState::apply_move`] returns
/// a new state and never mutates `self`.
pub trait GameState: Clone {
    /// A move. Pass and resign variants, if any, are the game's business.
    type Move: Clone + PartialEq + fmt::Debug;

    /// All moves applicable at this state. Empty at a terminal state.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// The successor state after playing `mv`.
    ///
    /// # Errors
    /// Returns [`crate::MctsError::IllegalMove`] if `mv` is not one of
    /// [`GameState::legal_moves`]. A game may also accept a resignation
    /// here without listing it, as long as the result is over.
    fn apply_move(&self, mv: &Self::Move) -> Result<Self>;

    /// True if the game has ended.
    fn is_over(&self) -> bool;

    /// The player to move. Not meaningful once the game is over.
    fn next_player(&self) -> Player;

    /// The winner of a finished game, or `None` for a draw.
    fn winner(&self) -> Option<Player>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_player() {
        assert_eq!(Player::Black.other(), Player::White);
        assert_eq!(Player::White.other(), Player::Black);
        assert_eq!(Player::Black.other().other(), Player::Black);
    }

    #[test]
    fn test_player_display() {
        assert_eq!(Player::Black.to_string(), "black");
        assert_eq!(Player::White.to_string(), "white");
    }
}

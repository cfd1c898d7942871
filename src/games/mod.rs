//! Game implementations that plug into the search.
//!
//! The search core depends on none of these; each one only implements
//! [`crate::GameState`].

pub mod go;
pub mod tictactoe;

pub use go::{Board, GoMove, GoPlayout, GoState, Point};
pub use tictactoe::TicTacToe;

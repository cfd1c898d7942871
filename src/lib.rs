//! dlgo-mcts: a generic Monte Carlo Tree Search engine for two-player games.
//!
//! The search builds a partial game tree by repeated random simulation and
//! picks the move with the best observed win fraction. It only talks to a
//! game through the [`GameState`] trait, so any two-player,
//! perfect-information, zero-sum game can be plugged in.
//!
//! ## Modules
//!
//! - [`game`] - The game-state contract and [`Player`]
//! - [`node`] - Search tree nodes and their statistics
//! - [`tree`] - Arena holding all nodes of one search
//! - [`uct`] - UCT selection score
//! - [`playout`] - Playout policies and random simulation
//! - [`config`] - Search configuration
//! - [`mcts`] - The search driver, [`MctsAgent`]
//! - [`games`] - Go and tic-tac-toe implementations
//! - [`gtp`] - Go Text Protocol front-end
//!
//! ## Example
//!
//! ```
//! use dlgo_mcts::games::TicTacToe;
//! use dlgo_mcts::{MctsAgent, SearchConfig};
//!
//! let state = TicTacToe::from_moves(&[0, 3, 1, 4]).unwrap();
//! let mut agent = MctsAgent::new(SearchConfig::new(2000).with_seed(17)).unwrap();
//! let best = agent.select_move(&state).unwrap();
//! assert_eq!(best, Some(2));
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod game;
pub mod games;
pub mod gtp;
pub mod mcts;
pub mod node;
pub mod playout;
pub mod tree;
pub mod uct;

pub use config::SearchConfig;
pub use error::{MctsError, Result};
pub use game::{GameState, Player};
pub use mcts::MctsAgent;
pub use node::{Node, NodeId, WinCounts};
pub use playout::{PlayoutPolicy, RandomPlayout};
pub use tree::Tree;

//! Search tree nodes.
//!
//! Nodes live in the arena owned by [`crate::tree::Tree`] and refer to each
//! other by [`NodeId`]. The parent link is a plain handle and never decides
//! when a node is dropped; the whole arena goes away with the tree.

use crate::error::{MctsError, Result};
use crate::game::{GameState, Player};

/// Index into the node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);

    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Outcome counts accumulated at a node.
///
/// Draws get their own bucket so they never inflate either player's win
/// fraction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WinCounts {
    pub black: u64,
    pub white: u64,
    pub draws: u64,
}

impl WinCounts {
    /// Wins recorded for `player`.
    #[inline]
    pub fn wins(&self, player: Player) -> u64 {
        match player {
            Player::Black => self.black,
            Player::White => self.white,
        }
    }

    /// Total outcomes recorded, draws included.
    #[inline]
    pub fn total(&self) -> u64 {
        self.black + self.white + self.draws
    }
}

/// A single explored position.
#[derive(Clone, Debug)]
pub struct Node<G: GameState> {
    state: G,
    parent: Option<NodeId>,
    incoming_move: Option<G::Move>,
    win_counts: WinCounts,
    rollout_count: u64,
    pub(crate) children: Vec<NodeId>,
    pub(crate) untried_moves: Vec<G::Move>,
}

impl<G: GameState> Node<G> {
    /// Create a node wrapping `state` with zeroed statistics.
    ///
    /// The untried moves are the full legal-move set of `state`.
    ///
    /// # Errors
    /// Returns [`MctsError::NoLegalMoves`] if `state` is not terminal but
    /// offers no moves.
    pub(crate) fn new(state: G, parent: Option<NodeId>, incoming_move: Option<G::Move>) -> Result<Self> {
        let untried_moves = state.legal_moves();
        if untried_moves.is_empty() && !state.is_over() {
            return Err(MctsError::NoLegalMoves);
        }
        Ok(Self {
            state,
            parent,
            incoming_move,
            win_counts: WinCounts::default(),
            rollout_count: 0,
            children: Vec::new(),
            untried_moves,
        })
    }

    /// The game state at this node.
    pub fn state(&self) -> &G {
        &self.state
    }

    /// The node this one was expanded from (`None` for the root).
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The move that produced this node from its parent (`None` for the root).
    pub fn incoming_move(&self) -> Option<&G::Move> {
        self.incoming_move.as_ref()
    }

    pub fn win_counts(&self) -> WinCounts {
        self.win_counts
    }

    /// Number of simulations that passed through this node.
    pub fn rollout_count(&self) -> u64 {
        self.rollout_count
    }

    /// Handles of the expanded children, in expansion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Legal moves not yet expanded into a child.
    pub fn untried_moves(&self) -> &[G::Move] {
        &self.untried_moves
    }

    /// Record one simulation result. `None` records a draw.
    pub fn record_outcome(&mut self, winner: Option<Player>) {
        match winner {
            Some(Player::Black) => self.win_counts.black += 1,
            Some(Player::White) => self.win_counts.white += 1,
            None => self.win_counts.draws += 1,
        }
        self.rollout_count += 1;
    }

    /// True while some legal move has not been expanded.
    #[inline]
    pub fn is_expandable(&self) -> bool {
        !self.untried_moves.is_empty()
    }

    /// True if the wrapped state is a finished game.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.state.is_over()
    }

    /// Fraction of simulations through this node won by `player`.
    ///
    /// # Panics
    /// Panics if the node has no rollouts; callers must only ask about
    /// sampled nodes.
    pub fn win_fraction(&self, player: Player) -> f64 {
        assert!(
            self.rollout_count > 0,
            "win_fraction requested for a node with zero rollouts"
        );
        self.win_counts.wins(player) as f64 / self.rollout_count as f64
    }
}

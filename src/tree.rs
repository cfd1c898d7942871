//! Arena-allocated search tree.
//!
//! All nodes of one search live in a single `Vec` and are addressed by
//! [`NodeId`]. The tree is built fresh for every move request and dropped
//! as a whole afterwards.

use fastrand::Rng;

use crate::error::Result;
use crate::game::{GameState, Player};
use crate::node::{Node, NodeId};

#[derive(Clone, Debug)]
pub struct Tree<G: GameState> {
    nodes: Vec<Node<G>>,
}

impl<G: GameState> Tree<G> {
    /// Create a tree whose root wraps `state`.
    ///
    /// # Errors
    /// Propagates [`crate::MctsError::NoLegalMoves`] if `state` breaks the
    /// game-state contract.
    pub fn new(state: G) -> Result<Self> {
        let root = Node::new(state, None, None)?;
        Ok(Self { nodes: vec![root] })
    }

    /// Get a node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId does not belong to this tree.
    pub fn get(&self, id: NodeId) -> &Node<G> {
        &self.nodes[id.0]
    }

    /// Get a mutable node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId does not belong to this tree.
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<G> {
        &mut self.nodes[id.0]
    }

    pub fn root(&self) -> &Node<G> {
        self.get(NodeId::ROOT)
    }

    /// Number of nodes in the tree (the root included).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over every node with its ID.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node<G>)> + '_ {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Expand one untried move of `id` into a new child and return its ID.
    ///
    /// The move is drawn uniformly at random from the untried moves. If the
    /// game rejects the move, the node is left untouched and the error is
    /// returned.
    ///
    /// # Panics
    /// Panics if the node has no untried moves.
    pub fn expand_one(&mut self, id: NodeId, rng: &mut Rng) -> Result<NodeId> {
        let child_id = NodeId(self.nodes.len());
        let node = &mut self.nodes[id.0];
        assert!(node.is_expandable(), "expand_one called on a fully expanded node");

        let idx = rng.usize(..node.untried_moves.len());
        let mv = node.untried_moves[idx].clone();
        let child_state = node.state().apply_move(&mv)?;
        let child = Node::new(child_state, Some(id), Some(mv))?;

        node.untried_moves.remove(idx);
        node.children.push(child_id);
        self.nodes.push(child);
        Ok(child_id)
    }

    /// Record `winner` on every node of `path`.
    pub fn backpropagate(&mut self, path: &[NodeId], winner: Option<Player>) {
        for &id in path {
            self.nodes[id.0].record_outcome(winner);
        }
    }

    /// Handles from the root down to `id`, following parent links.
    pub fn path_from_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![id];
        let mut current = id;
        while let Some(parent) = self.get(current).parent() {
            path.push(parent);
            current = parent;
        }
        path.reverse();
        path
    }

    /// The child of `id` with the highest win fraction for `player`.
    ///
    /// Children without rollouts are skipped; on equal fractions the earliest
    /// child wins. Returns `None` if no child has been sampled.
    pub fn best_child(&self, id: NodeId, player: Player) -> Option<NodeId> {
        let mut best: Option<(NodeId, f64)> = None;
        for &child_id in self.get(id).children() {
            let child = self.get(child_id);
            if child.rollout_count() == 0 {
                continue;
            }
            let pct = child.win_fraction(player);
            if best.is_none_or(|(_, best_pct)| pct > best_pct) {
                best = Some((child_id, pct));
            }
        }
        best.map(|(id, _)| id)
    }
}

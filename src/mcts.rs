//! Monte Carlo Tree Search with UCT selection.
//!
//! Each round of the search:
//! 1. descends from the root by UCT score while the node is fully expanded
//!    and not terminal,
//! 2. expands one untried move of the node it stopped at,
//! 3. plays the new position out with the playout policy,
//! 4. records the winner on every node of the path it took.
//!
//! A fresh tree is built for every move request; nothing is reused between
//! calls.

use std::time::Instant;

use fastrand::Rng;
use log::{debug, log_enabled, trace, Level};

use crate::config::SearchConfig;
use crate::error::Result;
use crate::game::GameState;
use crate::node::NodeId;
use crate::playout::{simulate, PlayoutPolicy, RandomPlayout};
use crate::tree::Tree;
use crate::uct::uct_score;

/// A move-choosing agent backed by MCTS.
pub struct MctsAgent<P = RandomPlayout> {
    config: SearchConfig,
    policy: P,
    rng: Rng,
}

impl MctsAgent<RandomPlayout> {
    /// Create an agent using uniformly random playouts.
    ///
    /// # Errors
    /// Returns [`crate::MctsError::InvalidConfig`] if the configuration does
    /// not validate.
    pub fn new(config: SearchConfig) -> Result<Self> {
        Self::with_policy(config, RandomPlayout)
    }
}

impl<P> MctsAgent<P> {
    /// Create an agent with a custom playout policy.
    ///
    /// # Errors
    /// Returns [`crate::MctsError::InvalidConfig`] if the configuration does
    /// not validate.
    pub fn with_policy(config: SearchConfig, policy: P) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => Rng::with_seed(seed),
            None => Rng::new(),
        };
        Ok(Self { config, policy, rng })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Pick a move for the player to move at `state`.
    ///
    /// Runs the full search, then returns the root child with the highest
    /// win fraction for that player. Returns `Ok(None)` when there is no
    /// move to recommend: the game is already over, the root has no legal
    /// moves, or the budget allowed no simulation.
    ///
    /// # Errors
    /// Any failure of the game-state contract aborts the search and is
    /// returned unchanged.
    pub fn select_move<G>(&mut self, state: &G) -> Result<Option<G::Move>>
    where
        G: GameState,
        P: PlayoutPolicy<G>,
    {
        let tree = self.search(state)?;
        if tree.root().is_terminal() {
            return Ok(None);
        }
        let best = tree
            .best_child(NodeId::ROOT, state.next_player())
            .and_then(|id| tree.get(id).incoming_move().cloned());
        Ok(best)
    }

    /// Build a search tree for `state` using the configured budget.
    ///
    /// Stops after `num_rounds` simulations or, if a time limit is set, at
    /// the first round boundary past the deadline.
    ///
    /// # Errors
    /// Any failure of the game-state contract aborts the search and is
    /// returned unchanged.
    pub fn search<G>(&mut self, state: &G) -> Result<Tree<G>>
    where
        G: GameState,
        P: PlayoutPolicy<G>,
    {
        let start = Instant::now();
        let deadline = self.config.time_limit.map(|limit| start + limit);
        let mut tree = Tree::new(state.clone())?;

        let mut rounds = 0;
        while rounds < self.config.num_rounds {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                debug!("time limit reached after {rounds} rounds");
                break;
            }
            self.run_round(&mut tree)?;
            rounds += 1;
        }

        debug!(
            "search: {rounds} rounds, {} nodes, {:.1?}",
            tree.len(),
            start.elapsed()
        );
        if log_enabled!(Level::Debug) {
            dump_children(&tree);
        }
        Ok(tree)
    }

    /// One select / expand / simulate / backpropagate round.
    fn run_round<G>(&mut self, tree: &mut Tree<G>) -> Result<()>
    where
        G: GameState,
        P: PlayoutPolicy<G>,
    {
        let mut path = vec![NodeId::ROOT];
        let mut node = NodeId::ROOT;

        while !tree.get(node).is_expandable() && !tree.get(node).is_terminal() {
            node = self.select_child(tree, node);
            path.push(node);
        }

        if tree.get(node).is_expandable() {
            node = tree.expand_one(node, &mut self.rng)?;
            path.push(node);
        }

        let winner = simulate(tree.get(node).state(), &mut self.policy, &mut self.rng)?;
        trace!("round: depth {}, winner {winner:?}", path.len() - 1);

        tree.backpropagate(&path, winner);
        Ok(())
    }

    /// Choose the child of `id` to descend into.
    ///
    /// An unsampled child is taken immediately. Otherwise the child with the
    /// strictly highest UCT score wins, the earliest one on ties. Scores use
    /// the win fraction of the player to move at `id`.
    ///
    /// # Panics
    /// Panics if `id` has no children. A fully expanded, non-terminal node
    /// always has at least one.
    pub fn select_child<G: GameState>(&self, tree: &Tree<G>, id: NodeId) -> NodeId {
        let node = tree.get(id);
        let player = node.state().next_player();
        let children = node.children();
        let total_rollouts: u64 = children.iter().map(|&c| tree.get(c).rollout_count()).sum();

        let mut best = children[0];
        let mut best_score = f64::NEG_INFINITY;
        for &child_id in children {
            let child = tree.get(child_id);
            if child.rollout_count() == 0 {
                return child_id;
            }
            let score = uct_score(
                total_rollouts,
                child.rollout_count(),
                child.win_fraction(player),
                self.config.exploration_weight,
            );
            if score > best_score {
                best_score = score;
                best = child_id;
            }
        }
        best
    }
}

/// Log statistics for the root's children.
fn dump_children<G: GameState>(tree: &Tree<G>) {
    let root = tree.root();
    if root.is_terminal() {
        return;
    }
    let player = root.state().next_player();
    for &id in root.children() {
        let child = tree.get(id);
        if child.rollout_count() == 0 {
            continue;
        }
        debug!(
            "move {:?} n={} wins={:?} pct={:.3}",
            child.incoming_move(),
            child.rollout_count(),
            child.win_counts(),
            child.win_fraction(player)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Player;
    use crate::games::tictactoe::TicTacToe;

    fn agent(rounds: usize, seed: u64) -> MctsAgent {
        MctsAgent::new(SearchConfig::new(rounds).with_seed(seed)).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = SearchConfig::new(10).with_exploration_weight(-1.0);
        assert!(MctsAgent::new(config).is_err());
    }

    #[test]
    fn test_search_runs_full_budget() {
        let mut agent = agent(200, 1);
        let tree = agent.search(&TicTacToe::new()).unwrap();
        assert_eq!(tree.root().rollout_count(), 200);
        // At most one expansion per round.
        assert!(tree.len() <= 201);
        assert_eq!(tree.root().children().len(), 9);
    }

    #[test]
    fn test_zero_budget_gives_no_move() {
        let mut agent = agent(0, 1);
        assert_eq!(agent.select_move(&TicTacToe::new()).unwrap(), None);
    }

    #[test]
    fn test_takes_immediate_win() {
        // X: 0 1, O: 3 4, X to move; 2 wins on the spot.
        let state = TicTacToe::from_moves(&[0, 3, 1, 4]).unwrap();
        let mut agent = agent(2000, 17);
        assert_eq!(agent.select_move(&state).unwrap(), Some(2));
    }

    #[test]
    fn test_blocks_immediate_loss() {
        // X: 0 1, O: 4, O to move; X threatens 2.
        let state = TicTacToe::from_moves(&[0, 4, 1]).unwrap();
        assert_eq!(state.next_player(), Player::White);
        let mut agent = agent(3000, 23);
        assert_eq!(agent.select_move(&state).unwrap(), Some(2));
    }

    #[test]
    fn test_select_child_prefers_unsampled() {
        let mut tree = Tree::new(TicTacToe::new()).unwrap();
        let mut rng = Rng::with_seed(2);
        let a = tree.expand_one(NodeId::ROOT, &mut rng).unwrap();
        let b = tree.expand_one(NodeId::ROOT, &mut rng).unwrap();
        for _ in 0..5 {
            tree.get_mut(a).record_outcome(Some(Player::Black));
        }

        let agent = agent(1, 0);
        assert_eq!(agent.select_child(&tree, NodeId::ROOT), b);
    }

    #[test]
    fn test_select_child_tie_keeps_earliest() {
        let mut tree = Tree::new(TicTacToe::new()).unwrap();
        let mut rng = Rng::with_seed(4);
        let a = tree.expand_one(NodeId::ROOT, &mut rng).unwrap();
        let b = tree.expand_one(NodeId::ROOT, &mut rng).unwrap();
        tree.get_mut(a).record_outcome(Some(Player::White));
        tree.get_mut(b).record_outcome(Some(Player::White));

        let agent = agent(1, 0);
        assert_eq!(agent.select_child(&tree, NodeId::ROOT), a);
    }
}

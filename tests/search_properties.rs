//! Properties of the search that must hold for any game.
//!
//! Uses tic-tac-toe and Go from the crate plus a few tiny games defined
//! here to pin down edge cases.

use std::collections::HashSet;
use std::time::Duration;

use dlgo_mcts::games::{GoState, TicTacToe};
use dlgo_mcts::{
    GameState, MctsAgent, MctsError, NodeId, Player, PlayoutPolicy, Result, SearchConfig, Tree,
};
use fastrand::Rng;

// =============================================================================
// Test games
// =============================================================================

/// Take 1 to 3 stones from a pile; whoever takes the last stone wins.
#[derive(Clone, Debug, PartialEq)]
struct Nim {
    remaining: u32,
    next: Player,
}

impl Nim {
    fn new(remaining: u32) -> Self {
        Self {
            remaining,
            next: Player::Black,
        }
    }
}

impl GameState for Nim {
    type Move = u32;

    fn legal_moves(&self) -> Vec<u32> {
        (1..=self.remaining.min(3)).collect()
    }

    fn apply_move(&self, &take: &u32) -> Result<Self> {
        if take == 0 || take > self.remaining.min(3) {
            return Err(MctsError::IllegalMove(format!("take {take}")));
        }
        Ok(Self {
            remaining: self.remaining - take,
            next: self.next.other(),
        })
    }

    fn is_over(&self) -> bool {
        self.remaining == 0
    }

    fn next_player(&self) -> Player {
        self.next
    }

    fn winner(&self) -> Option<Player> {
        self.is_over().then_some(self.next.other())
    }
}

/// A live position that offers no moves at all.
#[derive(Clone, Debug)]
struct Stuck;

impl GameState for Stuck {
    type Move = ();

    fn legal_moves(&self) -> Vec<()> {
        Vec::new()
    }

    fn apply_move(&self, _: &()) -> Result<Self> {
        Err(MctsError::IllegalMove("stuck".to_string()))
    }

    fn is_over(&self) -> bool {
        false
    }

    fn next_player(&self) -> Player {
        Player::Black
    }

    fn winner(&self) -> Option<Player> {
        None
    }
}

/// Offers a move that it then refuses to apply.
#[derive(Clone, Debug)]
struct Liar;

impl GameState for Liar {
    type Move = u8;

    fn legal_moves(&self) -> Vec<u8> {
        vec![1]
    }

    fn apply_move(&self, mv: &u8) -> Result<Self> {
        Err(MctsError::IllegalMove(format!("{mv}")))
    }

    fn is_over(&self) -> bool {
        false
    }

    fn next_player(&self) -> Player {
        Player::White
    }

    fn winner(&self) -> Option<Player> {
        None
    }
}

/// Always plays the first legal move.
struct FirstMove;

impl<G: GameState> PlayoutPolicy<G> for FirstMove {
    fn select_move(&mut self, state: &G, _rng: &mut Rng) -> Result<G::Move> {
        state
            .legal_moves()
            .into_iter()
            .next()
            .ok_or(MctsError::NoLegalMoves)
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn agent(rounds: usize, seed: u64) -> MctsAgent {
    MctsAgent::new(SearchConfig::new(rounds).with_seed(seed)).unwrap()
}

/// Check the structural invariants of every node in `tree`.
fn check_tree<G>(tree: &Tree<G>)
where
    G: GameState,
    G::Move: std::fmt::Debug,
{
    for (id, node) in tree.iter() {
        // Conservation: every rollout is exactly one win, loss or draw.
        assert_eq!(node.rollout_count(), node.win_counts().total());

        let child_rollouts: u64 = node
            .children()
            .iter()
            .map(|&c| tree.get(c).rollout_count())
            .sum();
        for &c in node.children() {
            let child = tree.get(c);
            assert_eq!(child.parent(), Some(id));
            assert!(child.rollout_count() <= node.rollout_count());
        }

        // Rounds either continue into a child or stop here.
        if id == NodeId::ROOT {
            if !node.is_terminal() {
                assert_eq!(node.rollout_count(), child_rollouts);
            }
        } else if !node.is_terminal() {
            assert_eq!(node.rollout_count(), child_rollouts + 1);
        }

        // Move partition.
        let legal = node.state().legal_moves();
        let expanded: Vec<&G::Move> = node
            .children()
            .iter()
            .map(|&c| tree.get(c).incoming_move().unwrap())
            .collect();
        for mv in &expanded {
            assert!(!node.untried_moves().contains(mv), "{mv:?} both tried and untried");
        }
        assert_eq!(expanded.len() + node.untried_moves().len(), legal.len());
        for mv in &legal {
            assert!(expanded.contains(&mv) || node.untried_moves().contains(mv));
        }
    }
}

// =============================================================================
// Tree invariants
// =============================================================================

#[test]
fn test_tictactoe_tree_invariants() {
    let tree = agent(1500, 21).search(&TicTacToe::new()).unwrap();
    assert_eq!(tree.root().rollout_count(), 1500);
    check_tree(&tree);
}

#[test]
fn test_go_tree_invariants() {
    let state = GoState::new_game(4).unwrap().with_komi(0.5);
    let tree = agent(150, 8).search(&state).unwrap();
    assert_eq!(tree.root().rollout_count(), 150);
    check_tree(&tree);
}

#[test]
fn test_nim_tree_invariants() {
    let tree = agent(400, 2).search(&Nim::new(7)).unwrap();
    check_tree(&tree);
}

#[test]
fn test_draws_are_bucketed() {
    let tree = agent(1000, 5).search(&TicTacToe::new()).unwrap();
    let counts = tree.root().win_counts();
    assert!(counts.draws > 0);
    assert_eq!(counts.black + counts.white + counts.draws, 1000);
    let black = tree.root().win_fraction(Player::Black);
    let white = tree.root().win_fraction(Player::White);
    assert!(black + white < 1.0);
}

#[test]
fn test_paths_follow_parent_links() {
    let tree = agent(300, 13).search(&Nim::new(6)).unwrap();
    for (id, _) in tree.iter() {
        let path = tree.path_from_root(id);
        assert_eq!(path.first(), Some(&NodeId::ROOT));
        assert_eq!(path.last(), Some(&id));
        for pair in path.windows(2) {
            assert!(tree.get(pair[0]).children().contains(&pair[1]));
        }
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_single_legal_move_is_returned() {
    for rounds in [1, 2, 50] {
        let mut agent = agent(rounds, 0);
        assert_eq!(agent.select_move(&Nim::new(1)).unwrap(), Some(1));
    }
}

#[test]
fn test_terminal_root_has_no_move() {
    let state = TicTacToe::from_moves(&[0, 3, 1, 4, 2]).unwrap();
    assert!(state.is_over());
    let mut agent = agent(100, 0);
    assert_eq!(agent.select_move(&state).unwrap(), None);
    assert_eq!(agent.select_move(&Nim::new(0)).unwrap(), None);
}

#[test]
fn test_zero_budget_has_no_move() {
    let mut agent = agent(0, 0);
    assert_eq!(agent.select_move(&Nim::new(5)).unwrap(), None);
}

#[test]
fn test_expired_time_limit_has_no_move() {
    let config = SearchConfig::new(1_000_000)
        .with_time_limit(Duration::ZERO)
        .with_seed(1);
    let mut agent = MctsAgent::new(config).unwrap();
    let tree = agent.search(&TicTacToe::new()).unwrap();
    assert_eq!(tree.root().rollout_count(), 0);
    assert_eq!(agent.select_move(&TicTacToe::new()).unwrap(), None);
}

#[test]
fn test_time_limit_stops_large_budget() {
    let config = SearchConfig::new(usize::MAX)
        .with_time_limit(Duration::from_millis(50))
        .with_seed(1);
    let mut agent = MctsAgent::new(config).unwrap();
    let tree = agent.search(&TicTacToe::new()).unwrap();
    assert!(tree.root().rollout_count() > 0);
    check_tree(&tree);
}

#[test]
fn test_same_seed_same_move() {
    let state = TicTacToe::from_moves(&[4]).unwrap();
    let a = agent(500, 77).select_move(&state).unwrap();
    let b = agent(500, 77).select_move(&state).unwrap();
    assert_eq!(a, b);

    let go = GoState::new_game(5).unwrap();
    let a = agent(100, 31).select_move(&go).unwrap();
    let b = agent(100, 31).select_move(&go).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_same_seed_same_statistics() {
    let a = agent(400, 9).search(&TicTacToe::new()).unwrap();
    let b = agent(400, 9).search(&TicTacToe::new()).unwrap();
    assert_eq!(a.len(), b.len());
    for ((_, x), (_, y)) in a.iter().zip(b.iter()) {
        assert_eq!(x.incoming_move(), y.incoming_move());
        assert_eq!(x.win_counts(), y.win_counts());
    }
}

#[test]
fn test_budget_covers_every_root_move() {
    // Branching factor 9, budget 9: each round expands a new root child.
    let tree = agent(9, 4).search(&TicTacToe::new()).unwrap();
    assert!(!tree.root().is_expandable());
    assert_eq!(tree.root().children().len(), 9);

    let moves: HashSet<usize> = tree
        .root()
        .children()
        .iter()
        .map(|&c| *tree.get(c).incoming_move().unwrap())
        .collect();
    assert_eq!(moves.len(), 9);

    for &c in tree.root().children() {
        assert_eq!(tree.get(c).rollout_count(), 1);
    }
}

#[test]
fn test_finds_nim_winning_move() {
    // From 5 stones, taking 1 leaves the opponent a lost pile of 4.
    let mut agent = agent(3000, 6);
    assert_eq!(agent.select_move(&Nim::new(5)).unwrap(), Some(1));
}

#[test]
fn test_custom_playout_policy() {
    let config = SearchConfig::new(200).with_seed(12);
    let mut a = MctsAgent::with_policy(config.clone(), FirstMove).unwrap();
    let mut b = MctsAgent::with_policy(config, FirstMove).unwrap();
    let state = Nim::new(9);
    let mv = a.select_move(&state).unwrap();
    assert!(mv.is_some_and(|m| (1..=3).contains(&m)));
    assert_eq!(mv, b.select_move(&state).unwrap());
}

// =============================================================================
// Contract violations
// =============================================================================

#[test]
fn test_live_state_without_moves_fails() {
    let mut agent = agent(10, 0);
    assert_eq!(agent.select_move(&Stuck), Err(MctsError::NoLegalMoves));
}

#[test]
fn test_rejected_move_aborts_search() {
    let mut agent = agent(10, 0);
    let err = agent.select_move(&Liar).unwrap_err();
    assert!(matches!(err, MctsError::IllegalMove(_)));
}

#[test]
fn test_apply_move_leaves_input_untouched() {
    let state = GoState::new_game(5).unwrap();
    let mv = state.legal_moves()[7];
    let a = state.apply_move(&mv).unwrap();
    let b = state.apply_move(&mv).unwrap();
    assert_eq!(a, b);
    assert_eq!(state, GoState::new_game(5).unwrap());
}

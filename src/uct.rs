//! UCT (Upper Confidence bound applied to Trees) scoring.

/// Score a child for selection.
///
/// `win_fraction + exploration_weight * sqrt(ln(parent_rollouts) / child_rollouts)`
///
/// A child with no rollouts scores `f64::INFINITY`, so it is always visited
/// before any sampled sibling. `parent_rollouts` is clamped to at least 1 so
/// the logarithm never goes negative or undefined.
pub fn uct_score(
    parent_rollouts: u64,
    child_rollouts: u64,
    win_fraction: f64,
    exploration_weight: f64,
) -> f64 {
    if child_rollouts == 0 {
        return f64::INFINITY;
    }
    let parent = parent_rollouts.max(1) as f64;
    let exploration = (parent.ln() / child_rollouts as f64).sqrt();
    win_fraction + exploration_weight * exploration
}

//! Search configuration.

use std::time::Duration;

use crate::constants::{DEFAULT_EXPLORATION_WEIGHT, DEFAULT_NUM_ROUNDS};
use crate::error::{MctsError, Result};

/// Options recognised by [`crate::mcts::MctsAgent`].
#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    /// Number of simulations per move request.
    pub num_rounds: usize,
    /// UCT exploration constant.
    pub exploration_weight: f64,
    /// Optional wall-clock budget, checked between simulations.
    pub time_limit: Option<Duration>,
    /// Seed for expansion order and playouts. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            num_rounds: DEFAULT_NUM_ROUNDS,
            exploration_weight: DEFAULT_EXPLORATION_WEIGHT,
            time_limit: None,
            seed: None,
        }
    }
}

impl SearchConfig {
    pub fn new(num_rounds: usize) -> Self {
        Self {
            num_rounds,
            ..Self::default()
        }
    }

    pub fn with_exploration_weight(mut self, weight: f64) -> Self {
        self.exploration_weight = weight;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the configuration before searching.
    ///
    /// # Errors
    /// Returns [`MctsError::InvalidConfig`] for a negative or non-finite
    /// exploration weight.
    pub fn validate(&self) -> Result<()> {
        if !self.exploration_weight.is_finite() || self.exploration_weight < 0.0 {
            return Err(MctsError::InvalidConfig(format!(
                "exploration weight must be a finite non-negative number, got {}",
                self.exploration_weight
            )));
        }
        Ok(())
    }
}

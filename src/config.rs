//! Search configuration parameters.

use crate::constants::{CUTOFF_DEPTH, GUIDED_EXPLORATION, MCTS_EXPLORATION, N_PLAYOUTS};

/// Configuration for the Monte Carlo engines.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsConfig {
    /// Number of playouts per decision.
    pub playouts: usize,

    /// Exploration constant `c` in the UCB formula.
    /// Higher values spread playouts more evenly across children.
    pub exploration: f64,

    /// Seed for the playout RNG. `None` draws a fresh seed.
    pub seed: Option<u64>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            playouts: N_PLAYOUTS,
            exploration: MCTS_EXPLORATION,
            seed: None,
        }
    }
}

impl MctsConfig {
    /// Defaults for the evaluation-guided engine.
    pub fn guided() -> Self {
        Self {
            exploration: GUIDED_EXPLORATION,
            ..Self::default()
        }
    }

    /// Builder pattern: set number of playouts.
    pub fn with_playouts(mut self, n: usize) -> Self {
        self.playouts = n;
        self
    }

    /// Builder pattern: set exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration = c;
        self
    }

    /// Builder pattern: fix the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Configuration for depth-limited alpha-beta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutoffConfig {
    /// Plies searched before falling back to the evaluation function.
    pub max_depth: u32,
}

impl Default for CutoffConfig {
    fn default() -> Self {
        Self {
            max_depth: CUTOFF_DEPTH,
        }
    }
}

impl CutoffConfig {
    /// Builder pattern: set search depth.
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }
}

//! Constants for search parameters, value bounds and player ids.
//!
//! Defaults used by the engines and the CLI. Runtime overrides live in
//! [`crate::config`].

use crate::game::PlayerId;

// =============================================================================
// Players
// =============================================================================

/// Player who moves first.
pub const FIRST_PLAYER: PlayerId = 1;

/// Player who moves second.
pub const SECOND_PLAYER: PlayerId = 2;

// =============================================================================
// MCTS (Monte Carlo Tree Search) Parameters
// =============================================================================

/// Default number of playouts per decision.
pub const N_PLAYOUTS: usize = 2000;

/// UCB exploration constant for the pure-rollout engine.
pub const MCTS_EXPLORATION: f64 = 0.01;

/// UCB exploration constant for the evaluation-guided engine.
pub const GUIDED_EXPLORATION: f64 = 0.1;

// =============================================================================
// Minimax Parameters
// =============================================================================

/// Unbounded search limit for alpha-beta windows.
///
/// Lies far outside the range of any terminal value or evaluation, so it is
/// only ever used as an initial bound.
pub const SEARCH_INF: f64 = 10_000.0;

/// Magnitude to which cutoff evaluations are clamped.
///
/// Strictly below 1.0 so a heuristic estimate never ties with a real win or
/// loss.
pub const EVAL_BOUND: f64 = 0.99;

/// Default remaining depth for cutoff alpha-beta.
pub const CUTOFF_DEPTH: u32 = 3;

// =============================================================================
// Terminal Values
// =============================================================================

/// Value of a won game.
pub const WIN: f64 = 1.0;

/// Value of a drawn game.
pub const DRAW: f64 = 0.0;

/// Value of a lost game.
pub const LOSS: f64 = -1.0;

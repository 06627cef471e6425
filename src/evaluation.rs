//! Static evaluation functions and their name registry.
//!
//! An evaluation maps a position to a score from the perspective of the
//! player to move, conventionally within `[-1, 1]`. Only the guided Monte
//! Carlo engine and cutoff alpha-beta consume them. Names are resolved once,
//! when an agent is configured, so a typo fails before any search runs.

use crate::error::{Result, SearchError};
use crate::game::GameState;

/// A static position evaluator.
pub trait Evaluator<G> {
    /// Score `state` for its current player.
    fn evaluate(&self, state: &G) -> f64;
}

impl<G, F> Evaluator<G> for F
where
    F: Fn(&G) -> f64,
{
    #[inline]
    fn evaluate(&self, state: &G) -> f64 {
        self(state)
    }
}

/// Plain function pointer form returned by the registry.
pub type EvaluationFn<G> = fn(&G) -> f64;

/// Names accepted by [`evaluation_function`] (full form).
pub const EVALUATION_NAMES: &[&str] = &[
    "dummy_evaluation_func",
    "distance_evaluation_func",
    "detailed_evaluation_func",
];

/// Always 0.
pub fn dummy_evaluation<G: GameState>(_state: &G) -> f64 {
    0.0
}

/// Difference between the opponents' and the mover's distance to a line.
pub fn distance_evaluation<G: GameState>(state: &G) -> f64 {
    let player = state.current_player();
    state
        .features_by_player()
        .iter()
        .map(|(&p, f)| {
            if p == player {
                -f.max_distance
            } else {
                f.max_distance
            }
        })
        .sum()
}

/// Pattern-weighted evaluation.
///
/// Heavily rewards the mover's fours and open threes, penalises the
/// opponent's open fours, and folds in the distance term. Scores outside
/// `[-1, 1]` are pulled back to `±0.99`.
pub fn detailed_evaluation<G: GameState>(state: &G) -> f64 {
    let player = state.current_player();
    let mut score = 0.0;
    for (&p, f) in &state.features_by_player() {
        if p == player {
            if f.live_four > 0 || f.four > 0 {
                score += 10_000.0;
            }
            if f.live_three > 0 {
                score += 100.0;
            }
            score += f.live_two as f64 * 0.02 + f.three as f64 * 0.02;
            score -= f.max_distance;
        } else {
            if f.live_four > 0 {
                score -= 1000.0;
            }
            score -= f.live_two as f64 * 0.02
                + f.three as f64 * 0.02
                + f.four as f64 * 0.05
                + f.live_three as f64 * 0.05;
            score += f.max_distance;
        }
    }
    if score > 1.0 {
        0.99
    } else if score < -1.0 {
        -0.99
    } else {
        score
    }
}

/// Look up an evaluation function by name.
///
/// Accepts the full names in [`EVALUATION_NAMES`] and the short forms
/// `dummy`, `distance` and `detailed`.
pub fn evaluation_function<G: GameState>(name: &str) -> Result<EvaluationFn<G>> {
    let evaluation: EvaluationFn<G> = match name {
        "dummy_evaluation_func" | "dummy" => dummy_evaluation::<G>,
        "distance_evaluation_func" | "distance" => distance_evaluation::<G>,
        "detailed_evaluation_func" | "detailed" => detailed_evaluation::<G>,
        other => return Err(SearchError::UnknownEvaluation(other.to_string())),
    };
    Ok(evaluation)
}

//! Monte Carlo playouts (random game simulation).
//!
//! A playout plays uniformly random legal actions until the game ends, then
//! scores the result for the tree node where descent stopped.

use fastrand::Rng;

use crate::constants::{DRAW, LOSS, WIN};
use crate::game::{GameState, Outcome, PlayerId};

/// Play uniformly random actions on `state` until the game ends.
///
/// Returns the final outcome, or `None` if a non-terminal position offered no
/// legal action.
pub fn random_rollout<G: GameState>(state: &mut G, rng: &mut Rng) -> Option<Outcome> {
    loop {
        if let Some(outcome) = state.terminal_status() {
            return Some(outcome);
        }
        let actions = state.legal_actions();
        if actions.is_empty() {
            return None;
        }
        state.apply(actions[rng.usize(..actions.len())]);
    }
}

/// Value of a finished game for the node whose state had `to_move` on turn.
///
/// The node's utility is read by its parent, so the value is scored for the
/// player who moved into the node: a win for `to_move` is a loss here.
#[inline]
pub fn terminal_leaf_value(outcome: Outcome, to_move: PlayerId) -> f64 {
    match outcome {
        Outcome::Draw => DRAW,
        Outcome::Win(winner) if winner == to_move => LOSS,
        Outcome::Win(_) => WIN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gomoku::Gomoku;

    #[test]
    fn test_terminal_leaf_value() {
        assert_eq!(terminal_leaf_value(Outcome::Draw, 1), 0.0);
        assert_eq!(terminal_leaf_value(Outcome::Win(1), 1), -1.0);
        assert_eq!(terminal_leaf_value(Outcome::Win(2), 1), 1.0);
    }

    #[test]
    fn test_rollout_reaches_terminal() {
        let mut rng = Rng::with_seed(7);
        for _ in 0..20 {
            let mut state = Gomoku::tic_tac_toe();
            let outcome = random_rollout(&mut state, &mut rng);
            assert!(outcome.is_some());
            assert_eq!(state.terminal_status(), outcome);
        }
    }

    #[test]
    fn test_rollout_is_reproducible() {
        let play = |seed| {
            let mut state = Gomoku::tic_tac_toe();
            random_rollout(&mut state, &mut Rng::with_seed(seed));
            state
        };
        assert_eq!(play(42).to_string(), play(42).to_string());
    }
}

//! The game-state contract consumed by every search engine.
//!
//! Engines never look inside a position. They only ask whose turn it is,
//! which actions are legal, apply actions to private clones and check for
//! the end of the game. Positions are mutated in place and cannot be undone,
//! so anything that needs to backtrack clones first.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::constants::{FIRST_PLAYER, SECOND_PLAYER};

/// Identifier of a player.
pub type PlayerId = u8;

/// Return the other player of a two-player game.
#[inline]
pub fn opponent(player: PlayerId) -> PlayerId {
    if player == FIRST_PLAYER {
        SECOND_PLAYER
    } else {
        FIRST_PLAYER
    }
}

/// Final result of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The given player won.
    Win(PlayerId),
    /// Nobody won.
    Draw,
}

impl Outcome {
    /// Winning player, if any.
    pub fn winner(self) -> Option<PlayerId> {
        match self {
            Outcome::Win(p) => Some(p),
            Outcome::Draw => None,
        }
    }
}

/// Pattern counts describing one player's standing in a position.
///
/// Only evaluation functions read these; the engines never do.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Features {
    /// Normalised distance to the nearest completable line (0 = won, 1 = hopeless).
    pub max_distance: f64,
    /// Runs of four with both ends open.
    pub live_four: u32,
    /// Runs of four with one end open.
    pub four: u32,
    /// Runs of three with both ends open.
    pub live_three: u32,
    /// Runs of three with one end open.
    pub three: u32,
    /// Runs of two with both ends open.
    pub live_two: u32,
}

/// A mutable position of a deterministic two-player zero-sum game.
pub trait GameState: Clone {
    /// A move. Must be cheap to copy and usable as a map key.
    type Action: Copy + Eq + Hash + Debug;

    /// Player to move.
    fn current_player(&self) -> PlayerId;

    /// All legal actions, in a stable order for an unmutated state.
    fn legal_actions(&self) -> Vec<Self::Action>;

    /// Apply a legal action in place. Behaviour for illegal actions is up to
    /// the implementation.
    fn apply(&mut self, action: Self::Action);

    /// `None` while the game is running, the outcome once it has ended.
    fn terminal_status(&self) -> Option<Outcome>;

    /// Per-player feature records for evaluation functions.
    fn features_by_player(&self) -> BTreeMap<PlayerId, Features> {
        BTreeMap::new()
    }

    /// Whether the game has ended.
    #[inline]
    fn is_terminal(&self) -> bool {
        self.terminal_status().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent() {
        assert_eq!(opponent(FIRST_PLAYER), SECOND_PLAYER);
        assert_eq!(opponent(SECOND_PLAYER), FIRST_PLAYER);
    }

    #[test]
    fn test_outcome_winner() {
        assert_eq!(Outcome::Win(2).winner(), Some(2));
        assert_eq!(Outcome::Draw.winner(), None);
    }
}

//! Error types shared by the search engines and agents.

use thiserror::Error;

use crate::game::PlayerId;

/// Errors that can occur while configuring or running a search.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SearchError {
    /// A minimax-family search was started on the opponent's turn.
    #[error("search started for player {agent} but player {to_move} is to move")]
    NotAgentTurn { agent: PlayerId, to_move: PlayerId },

    /// Evaluation function name not present in the registry.
    #[error("unknown evaluation function: {0}")]
    UnknownEvaluation(String),

    /// Agent name not recognised.
    #[error("unknown agent: {0}")]
    UnknownAgent(String),

    /// A non-terminal state offered no legal actions.
    #[error("no legal actions available")]
    NoLegalActions,

    /// Depth-limited search asked to look zero plies ahead.
    #[error("cutoff search depth must be at least 1")]
    ZeroDepth,

    /// The game is already over.
    #[error("game is already over")]
    GameOver,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SearchError>;

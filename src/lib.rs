//! Gametree: adversarial search agents for two-player zero-sum games.
//!
//! This crate picks moves in deterministic, perfect-information games using
//! two families of game-tree search:
//!
//! - Monte Carlo Tree Search with random rollouts, or guided by a static
//!   evaluation at newly expanded leaves
//! - Minimax, alpha-beta pruning, and depth-limited alpha-beta with an
//!   evaluation cutoff
//!
//! Games plug in through the [`game::GameState`] trait.
//!
//! ## Modules
//!
//! - [`constants`] - Default search parameters and value bounds
//! - [`game`] - The game-state contract
//! - [`tree`] - Arena search tree with UCB selection and backpropagation
//! - [`playout`] - Random rollouts and terminal scoring
//! - [`mcts`] - Monte Carlo engines
//! - [`minimax`] - Minimax-family engines
//! - [`evaluation`] - Evaluation functions and their name registry
//! - [`config`] - Runtime search configuration
//! - [`player`] - Agents and a match runner
//! - [`gomoku`] - k-in-a-row reference game
//!
//! ## Example
//!
//! ```
//! use gametree::config::MctsConfig;
//! use gametree::game::GameState;
//! use gametree::gomoku::{Gomoku, Point};
//! use gametree::mcts::MonteCarloEngine;
//! use gametree::minimax::AlphaBetaEngine;
//!
//! let mut state = Gomoku::tic_tac_toe();
//! state.apply(Point::new(1, 1));
//!
//! // Exhaustive search for the second player
//! let reply = AlphaBetaEngine::new(state.current_player())
//!     .select_action(&state)
//!     .unwrap();
//! println!("alpha-beta: {reply}");
//!
//! // Monte Carlo search with a fixed playout budget
//! let config = MctsConfig::default().with_playouts(500).with_seed(1);
//! let reply = MonteCarloEngine::new(&state, config).search().unwrap();
//! println!("mcts: {reply}");
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod evaluation;
pub mod game;
pub mod gomoku;
pub mod mcts;
pub mod minimax;
pub mod player;
pub mod playout;
pub mod tree;

pub use error::{Result, SearchError};
pub use game::{GameState, Outcome, PlayerId};

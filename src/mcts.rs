//! Monte Carlo Tree Search (MCTS) implementation.
//!
//! This module implements UCT search with:
//! - UCB1 for child selection once a node is fully expanded
//! - One new node per playout (expand-once rule)
//! - A pluggable leaf evaluator: random rollouts, or a static evaluation
//!
//! Each decision builds a fresh tree. Every playout runs on its own clone of
//! the root state, so the caller's state is never touched.

use fastrand::Rng;
use tracing::{debug, trace};

use crate::config::MctsConfig;
use crate::error::{Result, SearchError};
use crate::evaluation::Evaluator;
use crate::game::GameState;
use crate::playout::{random_rollout, terminal_leaf_value};
use crate::tree::{NodeId, Tree};

/// Scores the state where a playout stopped descending.
///
/// The value is expressed for the player who moved into the stopping node,
/// which is how the tree stores utility.
pub trait LeafEvaluator<G: GameState> {
    /// Value of `state`. May consume the state; it is discarded afterwards.
    fn leaf_value(&mut self, state: &mut G, rng: &mut Rng) -> Result<f64>;
}

/// Leaf value from a uniformly random self-play rollout.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomRollout;

impl<G: GameState> LeafEvaluator<G> for RandomRollout {
    fn leaf_value(&mut self, state: &mut G, rng: &mut Rng) -> Result<f64> {
        let to_move = state.current_player();
        let outcome = random_rollout(state, rng).ok_or(SearchError::NoLegalActions)?;
        Ok(terminal_leaf_value(outcome, to_move))
    }
}

/// Leaf value from a static evaluation of non-terminal states.
#[derive(Debug, Clone)]
pub struct Guided<E> {
    evaluator: E,
}

impl<E> Guided<E> {
    pub fn new(evaluator: E) -> Self {
        Self { evaluator }
    }
}

impl<G: GameState, E: Evaluator<G>> LeafEvaluator<G> for Guided<E> {
    fn leaf_value(&mut self, state: &mut G, _rng: &mut Rng) -> Result<f64> {
        Ok(match state.terminal_status() {
            Some(outcome) => terminal_leaf_value(outcome, state.current_player()),
            // The evaluation speaks for the player to move; the node is
            // scored for the player who just moved.
            None => -self.evaluator.evaluate(state),
        })
    }
}

/// Monte Carlo search over a single decision.
pub struct MonteCarloSearch<G: GameState, L> {
    root_state: G,
    tree: Tree<G::Action>,
    leaf: L,
    config: MctsConfig,
    rng: Rng,
}

/// Pure-rollout MCTS.
pub type MonteCarloEngine<G> = MonteCarloSearch<G, RandomRollout>;

/// MCTS that scores new leaves with an evaluation function.
pub type GuidedMonteCarloEngine<G, E> = MonteCarloSearch<G, Guided<E>>;

impl<G: GameState> MonteCarloSearch<G, RandomRollout> {
    /// Create a pure-rollout search rooted at `state`.
    pub fn new(state: &G, config: MctsConfig) -> Self {
        Self::with_leaf_evaluator(state, RandomRollout, config)
    }
}

impl<G: GameState, E: Evaluator<G>> MonteCarloSearch<G, Guided<E>> {
    /// Create an evaluation-guided search rooted at `state`.
    pub fn new(state: &G, evaluator: E, config: MctsConfig) -> Self {
        Self::with_leaf_evaluator(state, Guided::new(evaluator), config)
    }
}

impl<G: GameState, L: LeafEvaluator<G>> MonteCarloSearch<G, L> {
    /// Create a search rooted at `state` using `leaf` to score playouts.
    pub fn with_leaf_evaluator(state: &G, leaf: L, config: MctsConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => Rng::with_seed(seed),
            None => Rng::new(),
        };
        Self {
            root_state: state.clone(),
            tree: Tree::new(state),
            leaf,
            config,
            rng,
        }
    }

    /// Replace the playout RNG.
    pub fn with_rng(mut self, rng: Rng) -> Self {
        self.rng = rng;
        self
    }

    /// The search tree built so far.
    pub fn tree(&self) -> &Tree<G::Action> {
        &self.tree
    }

    /// Mutable access to the search tree.
    pub fn tree_mut(&mut self) -> &mut Tree<G::Action> {
        &mut self.tree
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Run one playout on `state`, which must be a clone of the root state.
    ///
    /// Descends by UCB through fully expanded nodes, expands at most one new
    /// node, scores the stopping state and backs the value up to the root.
    pub fn playout(&mut self, mut state: G) -> Result<()> {
        let mut node = self.tree.root();
        let mut depth = 0;

        while !state.is_terminal() {
            let unexpanded = self.tree.unexpanded_actions(node);
            if !unexpanded.is_empty() {
                let action = unexpanded[self.rng.usize(..unexpanded.len())];
                state.apply(action);
                node = self.tree.expand(node, action, &state);
                depth += 1;
                break;
            }

            // Every child already carries its first visit, so UCB is defined.
            let (action, child) = self
                .tree
                .select(node, self.config.exploration)
                .ok_or(SearchError::NoLegalActions)?;
            state.apply(action);
            node = child;
            depth += 1;
        }

        let value = self.leaf.leaf_value(&mut state, &mut self.rng)?;
        self.tree.update_recursive(node, value);

        trace!(leaf = node.0, depth, value, "playout complete");
        Ok(())
    }

    /// Run the configured number of playouts, each on a fresh clone.
    pub fn run(&mut self) -> Result<()> {
        if self.root_state.is_terminal() {
            return Err(SearchError::GameOver);
        }
        for _ in 0..self.config.playouts {
            self.playout(self.root_state.clone())?;
        }
        Ok(())
    }

    /// Most visited root action (robust child).
    pub fn best_action(&self) -> Result<G::Action> {
        self.tree.best_action().ok_or(SearchError::NoLegalActions)
    }

    /// Run all playouts and return the most visited root action.
    pub fn search(&mut self) -> Result<G::Action> {
        self.run()?;
        let action = self.best_action()?;

        let stats = self.tree.stats();
        debug!(
            action = ?action,
            nodes = stats.total_nodes,
            root_visits = stats.root_visits,
            max_depth = stats.max_depth,
            "MCTS search complete"
        );
        for child in self.tree.root_children() {
            debug!(
                action = ?child.action,
                visits = child.visits,
                value = child.mean_value,
                "root child"
            );
        }

        Ok(action)
    }

    /// Root node of the tree.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gomoku::{Gomoku, Point};

    fn play(moves: &[(u8, u8)]) -> Gomoku {
        let mut state = Gomoku::tic_tac_toe();
        for &(row, col) in moves {
            state.apply(Point::new(row, col));
        }
        state
    }

    #[test]
    fn test_root_visits_equal_playouts() {
        let state = Gomoku::tic_tac_toe();
        let config = MctsConfig::default().with_playouts(200).with_seed(1);
        let mut engine = MonteCarloEngine::new(&state, config);
        engine.run().unwrap();
        assert_eq!(engine.tree().get(engine.root()).visits, 200);
    }

    #[test]
    fn test_one_node_per_playout() {
        let state = Gomoku::tic_tac_toe();
        let config = MctsConfig::default().with_playouts(50).with_seed(2);
        let mut engine = MonteCarloEngine::new(&state, config);
        engine.run().unwrap();
        // At most one node per playout; the first nine fill in the root.
        assert!(engine.tree().len() <= 51);
        assert!(engine.tree().len() > 9);
    }

    #[test]
    fn test_caller_state_untouched() {
        let state = play(&[(1, 1)]);
        let before = state.to_string();
        let config = MctsConfig::default().with_playouts(100).with_seed(3);
        let mut engine = MonteCarloEngine::new(&state, config);
        engine.search().unwrap();
        assert_eq!(state.to_string(), before);
    }

    #[test]
    fn test_same_seed_same_tree() {
        let state = Gomoku::tic_tac_toe();
        let run = || {
            let config = MctsConfig::default().with_playouts(300).with_seed(11);
            let mut engine = MonteCarloEngine::new(&state, config);
            let action = engine.search().unwrap();
            (action, engine.tree().root_children())
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_finds_immediate_win() {
        // X: a1 b1, O: a2 b2, X to move; c1 wins.
        let state = play(&[(0, 0), (1, 0), (0, 1), (1, 1)]);
        let config = MctsConfig::default()
            .with_playouts(2000)
            .with_exploration(1.0)
            .with_seed(5);
        let mut engine = MonteCarloEngine::new(&state, config);
        assert_eq!(engine.search().unwrap(), Point::new(0, 2));
    }

    #[test]
    fn test_guided_finds_immediate_win() {
        let state = play(&[(0, 0), (1, 0), (0, 1), (1, 1)]);
        let config = MctsConfig::guided().with_playouts(500).with_seed(5);
        let mut engine = GuidedMonteCarloEngine::new(&state, |_: &Gomoku| 0.0, config);
        assert_eq!(engine.search().unwrap(), Point::new(0, 2));
    }

    #[test]
    fn test_guided_leaf_value_negates_evaluation() {
        let mut leaf = Guided::new(|_: &Gomoku| 0.4);
        let mut state = Gomoku::tic_tac_toe();
        let value = leaf.leaf_value(&mut state, &mut Rng::with_seed(0)).unwrap();
        assert!((value + 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_guided_terminal_leaf_ignores_evaluation() {
        let mut leaf = Guided::new(|_: &Gomoku| 0.4);
        // O to move after X completed the top row.
        let mut state = play(&[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);
        let value = leaf.leaf_value(&mut state, &mut Rng::with_seed(0)).unwrap();
        assert_eq!(value, 1.0);
    }

    #[test]
    fn test_every_tree_node_visited() {
        let state = Gomoku::tic_tac_toe();
        let config = MctsConfig::default().with_playouts(500).with_seed(8);
        let mut engine = MonteCarloEngine::new(&state, config);
        engine.run().unwrap();
        let tree = engine.tree();
        for i in 0..tree.len() {
            assert!(tree.get(NodeId(i as u32)).visits >= 1);
        }
    }

    #[test]
    fn test_terminal_root_is_an_error() {
        let state = play(&[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);
        let config = MctsConfig::default().with_playouts(10);
        let mut engine = MonteCarloEngine::new(&state, config);
        assert_eq!(engine.search(), Err(SearchError::GameOver));
    }
}

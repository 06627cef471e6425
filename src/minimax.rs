//! Minimax search: plain, alpha-beta, and depth-limited alpha-beta.
//!
//! All three engines are stateless apart from their configuration and score
//! positions from the agent's point of view: a terminal position is worth
//! +1 if the agent won, -1 if it lost and 0 for a draw, no matter whose turn
//! it is. Nodes where the agent moves maximise; all others minimise.
//!
//! Every branch is searched on its own clone of the state. [`MinimaxEngine`]
//! and [`AlphaBetaEngine`] walk the whole reachable game tree, so they only
//! return in reasonable time (and stack depth) on games whose tree is small
//! and finite. [`CutoffAlphaBetaEngine`] stops at a fixed depth and scores the
//! frontier with an evaluation function.

use tracing::{debug, trace};

use crate::constants::{DRAW, EVAL_BOUND, LOSS, SEARCH_INF, WIN};
use crate::error::{Result, SearchError};
use crate::evaluation::Evaluator;
use crate::game::{GameState, Outcome, PlayerId};

/// Result of a minimax-family search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOutcome<A> {
    /// Value of the root from the agent's perspective.
    pub value: f64,
    /// Best root action (`None` at a terminal root).
    pub action: Option<A>,
    /// Number of positions visited.
    pub nodes: u64,
}

/// Agent-relative value of a finished game.
#[inline]
pub fn terminal_value(outcome: Outcome, agent: PlayerId) -> f64 {
    match outcome {
        Outcome::Draw => DRAW,
        Outcome::Win(winner) if winner == agent => WIN,
        Outcome::Win(_) => LOSS,
    }
}

fn check_turn<G: GameState>(state: &G, agent: PlayerId) -> Result<()> {
    let to_move = state.current_player();
    if to_move == agent {
        Ok(())
    } else {
        Err(SearchError::NotAgentTurn { agent, to_move })
    }
}

fn child<G: GameState>(state: &G, action: G::Action) -> G {
    let mut next = state.clone();
    next.apply(action);
    next
}

fn finish<A>(value: f64, action: Option<A>, nodes: u64, engine: &str) -> SearchOutcome<A> {
    debug!(engine, value, nodes, "search complete");
    SearchOutcome {
        value,
        action,
        nodes,
    }
}

fn chosen<A>(outcome: SearchOutcome<A>) -> Result<A> {
    outcome.action.ok_or(SearchError::NoLegalActions)
}

// =============================================================================
// Plain minimax
// =============================================================================

/// Exhaustive minimax without pruning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimaxEngine {
    agent: PlayerId,
}

impl MinimaxEngine {
    pub fn new(agent: PlayerId) -> Self {
        Self { agent }
    }

    pub fn agent(&self) -> PlayerId {
        self.agent
    }

    /// Search the full tree below `state`, which must have the agent to move.
    pub fn search<G: GameState>(&self, state: &G) -> Result<SearchOutcome<G::Action>> {
        check_turn(state, self.agent)?;
        let mut nodes = 0;
        let (value, action) = self.minimax(state, &mut nodes);
        Ok(finish(value, action, nodes, "minimax"))
    }

    /// Best action for the agent in `state`.
    pub fn select_action<G: GameState>(&self, state: &G) -> Result<G::Action> {
        if state.is_terminal() {
            check_turn(state, self.agent)?;
            return Err(SearchError::GameOver);
        }
        chosen(self.search(state)?)
    }

    fn minimax<G: GameState>(&self, state: &G, nodes: &mut u64) -> (f64, Option<G::Action>) {
        *nodes += 1;
        if let Some(outcome) = state.terminal_status() {
            return (terminal_value(outcome, self.agent), None);
        }

        let maximizing = state.current_player() == self.agent;
        let mut value = if maximizing { -SEARCH_INF } else { SEARCH_INF };
        let mut action = None;
        for a in state.legal_actions() {
            let (v, _) = self.minimax(&child(state, a), nodes);
            if (maximizing && v > value) || (!maximizing && v < value) {
                value = v;
                action = Some(a);
            }
        }
        (value, action)
    }
}

// =============================================================================
// Alpha-beta
// =============================================================================

/// Exhaustive minimax with alpha-beta pruning.
///
/// Returns the same value and action as [`MinimaxEngine`]; only the number of
/// visited positions differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlphaBetaEngine {
    agent: PlayerId,
}

impl AlphaBetaEngine {
    pub fn new(agent: PlayerId) -> Self {
        Self { agent }
    }

    pub fn agent(&self) -> PlayerId {
        self.agent
    }

    /// Search the full tree below `state`, which must have the agent to move.
    pub fn search<G: GameState>(&self, state: &G) -> Result<SearchOutcome<G::Action>> {
        check_turn(state, self.agent)?;
        let mut nodes = 0;
        let (value, action) = self.alpha_beta(state, -SEARCH_INF, SEARCH_INF, &mut nodes);
        Ok(finish(value, action, nodes, "alpha-beta"))
    }

    /// Best action for the agent in `state`.
    pub fn select_action<G: GameState>(&self, state: &G) -> Result<G::Action> {
        if state.is_terminal() {
            check_turn(state, self.agent)?;
            return Err(SearchError::GameOver);
        }
        chosen(self.search(state)?)
    }

    /// `max_value` is what the maximiser can already guarantee, `min_value`
    /// what the minimiser can.
    fn alpha_beta<G: GameState>(
        &self,
        state: &G,
        max_value: f64,
        min_value: f64,
        nodes: &mut u64,
    ) -> (f64, Option<G::Action>) {
        *nodes += 1;
        if let Some(outcome) = state.terminal_status() {
            return (terminal_value(outcome, self.agent), None);
        }

        let mut max_value = max_value;
        let mut min_value = min_value;
        let mut action = None;

        if state.current_player() == self.agent {
            let mut value = -SEARCH_INF;
            for a in state.legal_actions() {
                let (v, _) = self.alpha_beta(&child(state, a), max_value, min_value, nodes);
                if v > value {
                    value = v;
                    action = Some(a);
                }
                if value > max_value {
                    max_value = value;
                }
                if max_value >= min_value {
                    return (value, action);
                }
            }
            (value, action)
        } else {
            let mut value = SEARCH_INF;
            for a in state.legal_actions() {
                let (v, _) = self.alpha_beta(&child(state, a), max_value, min_value, nodes);
                if v < value {
                    value = v;
                    action = Some(a);
                }
                if value < min_value {
                    min_value = value;
                }
                if max_value >= min_value {
                    return (value, action);
                }
            }
            (value, action)
        }
    }
}

// =============================================================================
// Depth-limited alpha-beta with evaluation cutoff
// =============================================================================

/// Alpha-beta limited to `max_depth` plies, scoring the frontier with an
/// evaluation function.
///
/// Each node starts fresh bounds of its own and hands them to its children;
/// a node stops early once its running best passes the bound its parent
/// handed down. This prunes one level at a time and never changes the root
/// decision compared to an unpruned search of the same depth.
#[derive(Debug, Clone)]
pub struct CutoffAlphaBetaEngine<E> {
    agent: PlayerId,
    max_depth: u32,
    evaluator: E,
}

impl<E> CutoffAlphaBetaEngine<E> {
    pub fn new(agent: PlayerId, max_depth: u32, evaluator: E) -> Self {
        Self {
            agent,
            max_depth,
            evaluator,
        }
    }

    pub fn agent(&self) -> PlayerId {
        self.agent
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Search `max_depth` plies below `state`, which must have the agent to
    /// move.
    pub fn search<G>(&self, state: &G) -> Result<SearchOutcome<G::Action>>
    where
        G: GameState,
        E: Evaluator<G>,
    {
        check_turn(state, self.agent)?;
        let mut nodes = 0;
        let (value, action) =
            self.cutoff(state, self.max_depth, -SEARCH_INF, SEARCH_INF, &mut nodes);
        Ok(finish(value, action, nodes, "cutoff alpha-beta"))
    }

    /// Best action for the agent in `state`.
    pub fn select_action<G>(&self, state: &G) -> Result<G::Action>
    where
        G: GameState,
        E: Evaluator<G>,
    {
        if state.is_terminal() {
            check_turn(state, self.agent)?;
            return Err(SearchError::GameOver);
        }
        if self.max_depth == 0 {
            return Err(SearchError::ZeroDepth);
        }
        chosen(self.search(state)?)
    }

    /// Evaluation of `state` from the agent's perspective, clamped to
    /// `[-EVAL_BOUND, EVAL_BOUND]`.
    pub fn evaluation<G>(&self, state: &G) -> f64
    where
        G: GameState,
        E: Evaluator<G>,
    {
        let value = self.evaluator.evaluate(state);
        let value = if state.current_player() == self.agent {
            value
        } else {
            -value
        };
        value.clamp(-EVAL_BOUND, EVAL_BOUND)
    }

    fn cutoff<G>(
        &self,
        state: &G,
        depth: u32,
        alpha: f64,
        beta: f64,
        nodes: &mut u64,
    ) -> (f64, Option<G::Action>)
    where
        G: GameState,
        E: Evaluator<G>,
    {
        *nodes += 1;
        if let Some(outcome) = state.terminal_status() {
            return (terminal_value(outcome, self.agent), None);
        }
        if depth == 0 {
            let value = self.evaluation(state);
            trace!(value, "frontier evaluation");
            return (value, None);
        }

        let mut max_value = -SEARCH_INF;
        let mut min_value = SEARCH_INF;
        let mut action = None;

        if state.current_player() == self.agent {
            let mut value = -SEARCH_INF;
            for a in state.legal_actions() {
                let (v, _) = self.cutoff(&child(state, a), depth - 1, max_value, min_value, nodes);
                if v > max_value {
                    max_value = v;
                    value = v;
                    action = Some(a);
                    if max_value > beta {
                        return (value, action);
                    }
                }
                if v < min_value {
                    min_value = v;
                }
            }
            (value, action)
        } else {
            let mut value = SEARCH_INF;
            for a in state.legal_actions() {
                let (v, _) = self.cutoff(&child(state, a), depth - 1, max_value, min_value, nodes);
                if v < min_value {
                    min_value = v;
                    value = v;
                    action = Some(a);
                    if min_value < alpha {
                        return (value, action);
                    }
                }
                if v > max_value {
                    max_value = v;
                }
            }
            (value, action)
        }
    }
}

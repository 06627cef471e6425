//! Agents that pick moves with one of the search engines, and a match runner.
//!
//! Every decision builds a fresh engine from a snapshot of the position; no
//! tree or other search state survives from one move to the next.

use std::fmt;
use std::str::FromStr;

use fastrand::Rng;
use tracing::{debug, info};

use crate::config::{CutoffConfig, MctsConfig};
use crate::error::{Result, SearchError};
use crate::evaluation::{EvaluationFn, evaluation_function};
use crate::game::{GameState, Outcome, PlayerId};
use crate::mcts::{GuidedMonteCarloEngine, MonteCarloEngine};
use crate::minimax::{AlphaBetaEngine, CutoffAlphaBetaEngine, MinimaxEngine};

/// Something that chooses actions for one seat of a game.
pub trait Player<G: GameState> {
    /// Seat this agent plays.
    fn id(&self) -> PlayerId;

    /// Short label for logs.
    fn name(&self) -> &'static str;

    /// Choose an action in `state`.
    fn select_action(&mut self, state: &G) -> Result<G::Action>;
}

fn rng_from(seed: Option<u64>) -> Rng {
    match seed {
        Some(seed) => Rng::with_seed(seed),
        None => Rng::new(),
    }
}

/// Plays a uniformly random legal action.
pub struct RandomPlayer {
    player: PlayerId,
    rng: Rng,
}

impl RandomPlayer {
    pub fn new(player: PlayerId, seed: Option<u64>) -> Self {
        Self {
            player,
            rng: rng_from(seed),
        }
    }
}

impl<G: GameState> Player<G> for RandomPlayer {
    fn id(&self) -> PlayerId {
        self.player
    }

    fn name(&self) -> &'static str {
        "random"
    }

    fn select_action(&mut self, state: &G) -> Result<G::Action> {
        if state.is_terminal() {
            return Err(SearchError::GameOver);
        }
        let actions = state.legal_actions();
        if actions.is_empty() {
            return Err(SearchError::NoLegalActions);
        }
        Ok(actions[self.rng.usize(..actions.len())])
    }
}

/// Pure-rollout MCTS agent.
pub struct MctsPlayer {
    player: PlayerId,
    config: MctsConfig,
    rng: Rng,
}

impl MctsPlayer {
    pub fn new(player: PlayerId, config: MctsConfig) -> Self {
        let rng = rng_from(config.seed);
        Self {
            player,
            config,
            rng,
        }
    }
}

impl<G: GameState> Player<G> for MctsPlayer {
    fn id(&self) -> PlayerId {
        self.player
    }

    fn name(&self) -> &'static str {
        "mcts"
    }

    fn select_action(&mut self, state: &G) -> Result<G::Action> {
        MonteCarloEngine::new(state, self.config.clone())
            .with_rng(self.rng.fork())
            .search()
    }
}

/// Evaluation-guided MCTS agent.
pub struct GuidedMctsPlayer<G> {
    player: PlayerId,
    config: MctsConfig,
    evaluator: EvaluationFn<G>,
    rng: Rng,
}

impl<G: GameState> GuidedMctsPlayer<G> {
    pub fn new(player: PlayerId, evaluator: EvaluationFn<G>, config: MctsConfig) -> Self {
        let rng = rng_from(config.seed);
        Self {
            player,
            config,
            evaluator,
            rng,
        }
    }
}

impl<G: GameState> Player<G> for GuidedMctsPlayer<G> {
    fn id(&self) -> PlayerId {
        self.player
    }

    fn name(&self) -> &'static str {
        "guided"
    }

    fn select_action(&mut self, state: &G) -> Result<G::Action> {
        GuidedMonteCarloEngine::new(state, self.evaluator, self.config.clone())
            .with_rng(self.rng.fork())
            .search()
    }
}

/// Exhaustive minimax agent. Only practical on very small games.
pub struct MinimaxPlayer {
    engine: MinimaxEngine,
}

impl MinimaxPlayer {
    pub fn new(player: PlayerId) -> Self {
        Self {
            engine: MinimaxEngine::new(player),
        }
    }
}

impl<G: GameState> Player<G> for MinimaxPlayer {
    fn id(&self) -> PlayerId {
        self.engine.agent()
    }

    fn name(&self) -> &'static str {
        "minimax"
    }

    fn select_action(&mut self, state: &G) -> Result<G::Action> {
        self.engine.select_action(state)
    }
}

/// Exhaustive alpha-beta agent. Only practical on small games.
pub struct AlphaBetaPlayer {
    engine: AlphaBetaEngine,
}

impl AlphaBetaPlayer {
    pub fn new(player: PlayerId) -> Self {
        Self {
            engine: AlphaBetaEngine::new(player),
        }
    }
}

impl<G: GameState> Player<G> for AlphaBetaPlayer {
    fn id(&self) -> PlayerId {
        self.engine.agent()
    }

    fn name(&self) -> &'static str {
        "alphabeta"
    }

    fn select_action(&mut self, state: &G) -> Result<G::Action> {
        self.engine.select_action(state)
    }
}

/// Depth-limited alpha-beta agent.
pub struct CutoffAlphaBetaPlayer<G> {
    engine: CutoffAlphaBetaEngine<EvaluationFn<G>>,
}

impl<G: GameState> CutoffAlphaBetaPlayer<G> {
    pub fn new(player: PlayerId, evaluator: EvaluationFn<G>, config: CutoffConfig) -> Self {
        Self {
            engine: CutoffAlphaBetaEngine::new(player, config.max_depth, evaluator),
        }
    }
}

impl<G: GameState> Player<G> for CutoffAlphaBetaPlayer<G> {
    fn id(&self) -> PlayerId {
        self.engine.agent()
    }

    fn name(&self) -> &'static str {
        "cutoff"
    }

    fn select_action(&mut self, state: &G) -> Result<G::Action> {
        self.engine.select_action(state)
    }
}

// =============================================================================
// Agent construction
// =============================================================================

/// Agent families selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    Random,
    Mcts,
    Guided,
    Minimax,
    AlphaBeta,
    Cutoff,
}

impl AgentKind {
    /// Whether this agent consumes an evaluation function.
    pub fn uses_evaluation(self) -> bool {
        matches!(self, AgentKind::Guided | AgentKind::Cutoff)
    }
}

impl FromStr for AgentKind {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "random" => Ok(AgentKind::Random),
            "mcts" => Ok(AgentKind::Mcts),
            "guided" | "alphazero" => Ok(AgentKind::Guided),
            "minimax" => Ok(AgentKind::Minimax),
            "alphabeta" | "alpha-beta" => Ok(AgentKind::AlphaBeta),
            "cutoff" => Ok(AgentKind::Cutoff),
            _ => Err(SearchError::UnknownAgent(s.to_string())),
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AgentKind::Random => "random",
            AgentKind::Mcts => "mcts",
            AgentKind::Guided => "guided",
            AgentKind::Minimax => "minimax",
            AgentKind::AlphaBeta => "alphabeta",
            AgentKind::Cutoff => "cutoff",
        };
        f.write_str(name)
    }
}

/// Tunables shared by every agent kind; each kind reads what it needs.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSettings {
    /// Playouts per decision (Monte Carlo agents).
    pub playouts: Option<usize>,
    /// UCB exploration constant; defaults differ per Monte Carlo agent.
    pub exploration: Option<f64>,
    /// Search depth (cutoff agent).
    pub depth: Option<u32>,
    /// Evaluation function name (guided and cutoff agents).
    pub evaluation: String,
    /// RNG seed (random and Monte Carlo agents).
    pub seed: Option<u64>,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            playouts: None,
            exploration: None,
            depth: None,
            evaluation: "dummy_evaluation_func".to_string(),
            seed: None,
        }
    }
}

impl AgentSettings {
    fn mcts_config(&self, base: MctsConfig) -> MctsConfig {
        let mut config = base;
        if let Some(n) = self.playouts {
            config = config.with_playouts(n);
        }
        if let Some(c) = self.exploration {
            config = config.with_exploration(c);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }

    fn cutoff_config(&self) -> CutoffConfig {
        match self.depth {
            Some(depth) => CutoffConfig::default().with_depth(depth),
            None => CutoffConfig::default(),
        }
    }
}

/// Build an agent of `kind` for seat `player`.
///
/// Evaluation names are resolved here, so an unknown name fails before any
/// search starts.
pub fn build_player<G>(
    kind: AgentKind,
    player: PlayerId,
    settings: &AgentSettings,
) -> Result<Box<dyn Player<G>>>
where
    G: GameState + 'static,
{
    let player: Box<dyn Player<G>> = match kind {
        AgentKind::Random => Box::new(RandomPlayer::new(player, settings.seed)),
        AgentKind::Mcts => Box::new(MctsPlayer::new(
            player,
            settings.mcts_config(MctsConfig::default()),
        )),
        AgentKind::Guided => Box::new(GuidedMctsPlayer::new(
            player,
            evaluation_function::<G>(&settings.evaluation)?,
            settings.mcts_config(MctsConfig::guided()),
        )),
        AgentKind::Minimax => Box::new(MinimaxPlayer::new(player)),
        AgentKind::AlphaBeta => Box::new(AlphaBetaPlayer::new(player)),
        AgentKind::Cutoff => Box::new(CutoffAlphaBetaPlayer::new(
            player,
            evaluation_function::<G>(&settings.evaluation)?,
            settings.cutoff_config(),
        )),
    };
    Ok(player)
}

// =============================================================================
// Matches
// =============================================================================

/// A finished game.
#[derive(Debug, Clone)]
pub struct MatchRecord<G: GameState> {
    /// Moves in order, with the seat that played each.
    pub moves: Vec<(PlayerId, G::Action)>,
    pub outcome: Outcome,
    pub final_state: G,
}

/// Play `state` to the end, asking `first` or `second` for each move
/// depending on whose turn it is.
pub fn play_match<'a, G: GameState>(
    mut state: G,
    first: &'a mut dyn Player<G>,
    second: &'a mut dyn Player<G>,
) -> Result<MatchRecord<G>> {
    let mut moves = Vec::new();

    let outcome = loop {
        if let Some(outcome) = state.terminal_status() {
            break outcome;
        }
        let to_move = state.current_player();
        let player = if to_move == first.id() {
            &mut *first
        } else if to_move == second.id() {
            &mut *second
        } else {
            return Err(SearchError::NotAgentTurn {
                agent: first.id(),
                to_move,
            });
        };

        let action = player.select_action(&state)?;
        debug!(
            ply = moves.len() + 1,
            player = to_move,
            agent = player.name(),
            action = ?action,
            "move"
        );
        state.apply(action);
        moves.push((to_move, action));
    };

    info!(plies = moves.len(), outcome = ?outcome, "match finished");
    Ok(MatchRecord {
        moves,
        outcome,
        final_state: state,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{FIRST_PLAYER, SECOND_PLAYER};
    use crate::gomoku::Gomoku;

    #[test]
    fn test_agent_kind_parse() {
        assert_eq!("mcts".parse::<AgentKind>(), Ok(AgentKind::Mcts));
        assert_eq!("AlphaBeta".parse::<AgentKind>(), Ok(AgentKind::AlphaBeta));
        assert_eq!("cutoff".parse::<AgentKind>(), Ok(AgentKind::Cutoff));
        assert_eq!(
            "expectimax".parse::<AgentKind>(),
            Err(SearchError::UnknownAgent("expectimax".into()))
        );
        for kind in [AgentKind::Random, AgentKind::Guided, AgentKind::Minimax] {
            assert_eq!(kind.to_string().parse::<AgentKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_unknown_evaluation_fails_at_build() {
        let settings = AgentSettings {
            evaluation: "material".into(),
            ..AgentSettings::default()
        };
        for kind in [AgentKind::Guided, AgentKind::Cutoff] {
            let result = build_player::<Gomoku>(kind, FIRST_PLAYER, &settings);
            assert!(matches!(result, Err(SearchError::UnknownEvaluation(_))));
        }
        // Agents without an evaluation ignore the name.
        assert!(build_player::<Gomoku>(AgentKind::Mcts, FIRST_PLAYER, &settings).is_ok());
    }

    #[test]
    fn test_minimax_player_off_turn_fails() {
        let mut player = MinimaxPlayer::new(SECOND_PLAYER);
        let state = Gomoku::tic_tac_toe();
        let result = Player::<Gomoku>::select_action(&mut player, &state);
        assert!(matches!(result, Err(SearchError::NotAgentTurn { .. })));
    }

    #[test]
    fn test_random_match_completes() {
        let mut x = RandomPlayer::new(FIRST_PLAYER, Some(1));
        let mut o = RandomPlayer::new(SECOND_PLAYER, Some(2));
        let record = play_match(Gomoku::tic_tac_toe(), &mut x, &mut o).unwrap();
        assert!(record.moves.len() >= 5 && record.moves.len() <= 9);
        assert_eq!(record.final_state.terminal_status(), Some(record.outcome));
        assert_eq!(record.moves[0].0, FIRST_PLAYER);
    }

    #[test]
    fn test_alpha_beta_never_loses_to_random() {
        for seed in 0..5 {
            let mut x = AlphaBetaPlayer::new(FIRST_PLAYER);
            let mut o = RandomPlayer::new(SECOND_PLAYER, Some(seed));
            let record = play_match(Gomoku::tic_tac_toe(), &mut x, &mut o).unwrap();
            assert_ne!(record.outcome, Outcome::Win(SECOND_PLAYER));
        }
    }

    #[test]
    fn test_boxed_players_play_a_match() {
        let settings = AgentSettings {
            playouts: Some(200),
            seed: Some(4),
            ..AgentSettings::default()
        };
        let mut x = build_player::<Gomoku>(AgentKind::Mcts, FIRST_PLAYER, &settings).unwrap();
        let mut o = build_player::<Gomoku>(AgentKind::Random, SECOND_PLAYER, &settings).unwrap();
        let record = play_match(Gomoku::tic_tac_toe(), x.as_mut(), o.as_mut()).unwrap();
        assert_eq!(record.final_state.terminal_status(), Some(record.outcome));
        assert_eq!(record.moves[0].0, FIRST_PLAYER);
        assert_eq!(record.moves[1].0, SECOND_PLAYER);
    }

    #[test]
    fn test_cutoff_vs_minimax_draws() {
        let settings = AgentSettings {
            depth: Some(9),
            ..AgentSettings::default()
        };
        let mut x = build_player::<Gomoku>(AgentKind::Cutoff, FIRST_PLAYER, &settings).unwrap();
        let mut o = build_player::<Gomoku>(AgentKind::AlphaBeta, SECOND_PLAYER, &settings).unwrap();
        let record = play_match(Gomoku::tic_tac_toe(), x.as_mut(), o.as_mut()).unwrap();
        assert_eq!(record.outcome, Outcome::Draw);
    }
}

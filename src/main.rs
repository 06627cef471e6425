//! Gametree: pit search agents against each other on k-in-a-row boards.
//!
//! ## Usage
//!
//! - `gametree` - Run the demo
//! - `gametree play --first mcts --second cutoff --depth 4` - Play one game
//! - `gametree demo` - MCTS against cutoff alpha-beta on tic-tac-toe

use anyhow::{Context, Result, ensure};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use gametree::constants::{FIRST_PLAYER, SECOND_PLAYER};
use gametree::gomoku::Gomoku;
use gametree::player::{AgentKind, AgentSettings, build_player, play_match};
use gametree::{GameState, Outcome};

/// Gametree: Monte Carlo and minimax agents for two-player games
#[derive(Parser)]
#[command(name = "gametree")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level filter (RUST_LOG takes precedence)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one game between two agents
    Play(PlayArgs),
    /// Run a short demo game
    Demo,
}

#[derive(Args)]
struct PlayArgs {
    /// Agent moving first: random, mcts, guided, minimax, alphabeta, cutoff
    #[arg(long, default_value = "mcts")]
    first: AgentKind,

    /// Agent moving second
    #[arg(long, default_value = "alphabeta")]
    second: AgentKind,

    /// Board width
    #[arg(long, default_value_t = 3)]
    width: u8,

    /// Board height
    #[arg(long, default_value_t = 3)]
    height: u8,

    /// Stones in a row needed to win
    #[arg(short, long, default_value_t = 3)]
    k: u8,

    /// Playouts per move for Monte Carlo agents
    #[arg(long)]
    playouts: Option<usize>,

    /// UCB exploration constant for Monte Carlo agents
    #[arg(long)]
    exploration: Option<f64>,

    /// Search depth for the cutoff agent
    #[arg(long)]
    depth: Option<u32>,

    /// Evaluation function for guided and cutoff agents
    #[arg(long, default_value = "dummy_evaluation_func")]
    evaluation: String,

    /// RNG seed (the second agent uses seed + 1)
    #[arg(long)]
    seed: Option<u64>,
}

fn init_logging(level: &str) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).context("invalid log level")?,
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    match cli.command {
        Some(Commands::Play(args)) => run_play(args),
        Some(Commands::Demo) | None => run_demo(),
    }
}

fn run_play(args: PlayArgs) -> Result<()> {
    ensure!(
        args.width > 0 && args.height > 0 && args.width <= 26,
        "board must be between 1 and 26 columns wide and at least 1 row high"
    );
    ensure!(
        args.k > 0 && args.k <= args.width.max(args.height),
        "k must be between 1 and the longer board side"
    );
    ensure!(args.depth != Some(0), "--depth must be at least 1");

    let state = Gomoku::new(args.width, args.height, args.k);
    let settings = AgentSettings {
        playouts: args.playouts,
        exploration: args.exploration,
        depth: args.depth,
        evaluation: args.evaluation,
        seed: args.seed,
    };
    let second_settings = AgentSettings {
        seed: args.seed.map(|s| s.wrapping_add(1)),
        ..settings.clone()
    };

    for (seat, kind) in [(FIRST_PLAYER, args.first), (SECOND_PLAYER, args.second)] {
        if kind.uses_evaluation() {
            info!(seat, agent = %kind, evaluation = %settings.evaluation, "agent");
        } else {
            info!(seat, agent = %kind, "agent");
        }
    }

    let mut first = build_player::<Gomoku>(args.first, FIRST_PLAYER, &settings)
        .context("configuring first agent")?;
    let mut second = build_player::<Gomoku>(args.second, SECOND_PLAYER, &second_settings)
        .context("configuring second agent")?;

    let record = play_match(state, first.as_mut(), second.as_mut()).context("playing match")?;

    let moves: Vec<String> = record.moves.iter().map(|(_, p)| p.to_string()).collect();
    println!("Moves: {}", moves.join(" "));
    println!("{}", record.final_state);
    print_outcome(record.outcome, args.first, args.second);
    Ok(())
}

fn run_demo() -> Result<()> {
    println!("Gametree: Monte Carlo and minimax search\n");

    let mut state = Gomoku::tic_tac_toe();
    let settings = AgentSettings {
        playouts: Some(2000),
        depth: Some(4),
        evaluation: "distance_evaluation_func".to_string(),
        seed: Some(7),
        ..AgentSettings::default()
    };
    let mut first = build_player::<Gomoku>(AgentKind::Mcts, FIRST_PLAYER, &settings)?;
    let mut second = build_player::<Gomoku>(AgentKind::Cutoff, SECOND_PLAYER, &settings)?;

    println!("=== mcts (X) vs cutoff (O) ===");
    while !state.is_terminal() {
        let player = if state.current_player() == FIRST_PLAYER {
            first.as_mut()
        } else {
            second.as_mut()
        };
        let action = player.select_action(&state)?;
        println!("{} plays {action}", player.name());
        state.apply(action);
    }
    println!("\n{state}");

    let outcome = state
        .terminal_status()
        .context("demo game stopped before the end")?;
    print_outcome(outcome, AgentKind::Mcts, AgentKind::Cutoff);
    Ok(())
}

fn print_outcome(outcome: Outcome, first: AgentKind, second: AgentKind) {
    match outcome {
        Outcome::Win(FIRST_PLAYER) => println!("Result: {first} (X) wins"),
        Outcome::Win(_) => println!("Result: {second} (O) wins"),
        Outcome::Draw => println!("Result: draw"),
    }
}

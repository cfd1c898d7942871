//! dlgo-mcts: a Monte Carlo Tree Search game engine.
//!
//! ## Usage
//!
//! - `dlgo-mcts` - Run the self-play demo on a small Go board
//! - `dlgo-mcts gtp` - Start GTP server for GUI integration
//! - `dlgo-mcts demo --game tictactoe` - Watch the engine play tic-tac-toe

use std::fmt;
use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use flexi_logger::Logger;
use log::info;

use dlgo_mcts::constants::{DEFAULT_BOARD_SIZE, DEFAULT_EXPLORATION_WEIGHT, DEFAULT_KOMI, DEFAULT_NUM_ROUNDS};
use dlgo_mcts::games::{GoPlayout, GoState, TicTacToe};
use dlgo_mcts::gtp::GtpEngine;
use dlgo_mcts::{GameState, MctsAgent, Player, PlayoutPolicy, SearchConfig};

/// dlgo-mcts: a Monte Carlo Tree Search game engine
#[derive(Parser)]
#[command(name = "dlgo-mcts")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    search: SearchArgs,

    /// Log search statistics (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the GTP (Go Text Protocol) server for use with GUI applications
    Gtp {
        /// Board size
        #[arg(long, default_value_t = DEFAULT_BOARD_SIZE)]
        size: usize,
        /// Komi
        #[arg(long, default_value_t = DEFAULT_KOMI)]
        komi: f32,
    },
    /// Let the engine play a game against itself
    Demo {
        #[arg(long, value_enum, default_value_t = DemoGame::Go)]
        game: DemoGame,
        /// Go board size
        #[arg(long, default_value_t = 5)]
        size: usize,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum DemoGame {
    Go,
    Tictactoe,
}

#[derive(Args)]
struct SearchArgs {
    /// Simulations per move
    #[arg(long, global = true, default_value_t = DEFAULT_NUM_ROUNDS)]
    rounds: usize,
    /// UCT exploration weight
    #[arg(long, global = true, default_value_t = DEFAULT_EXPLORATION_WEIGHT)]
    temperature: f64,
    /// Wall-clock limit per move in milliseconds
    #[arg(long, global = true)]
    time_limit_ms: Option<u64>,
    /// Random seed for reproducible searches
    #[arg(long, global = true)]
    seed: Option<u64>,
}

impl SearchArgs {
    fn to_config(&self) -> SearchConfig {
        let mut config = SearchConfig::new(self.rounds).with_exploration_weight(self.temperature);
        if let Some(ms) = self.time_limit_ms {
            config = config.with_time_limit(Duration::from_millis(ms));
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let _logger = Logger::try_with_env_or_str(level)?
        .format(flexi_logger::colored_default_format)
        .start()?;

    let config = cli.search.to_config();
    match cli.command {
        Some(Commands::Gtp { size, komi }) => {
            let mut engine = GtpEngine::with_board(config, size, komi)?;
            engine
                .run(io::stdin().lock(), io::stdout())
                .context("GTP session failed")?;
        }
        Some(Commands::Demo { game, size }) => run_demo(game, size, config)?,
        None => run_demo(DemoGame::Go, 5, config)?,
    }
    Ok(())
}

fn run_demo(game: DemoGame, size: usize, config: SearchConfig) -> Result<()> {
    println!("dlgo-mcts self-play ({} rounds per move)\n", config.num_rounds);
    match game {
        DemoGame::Go => {
            let state = GoState::new_game(size).context("invalid board size")?;
            let agent = MctsAgent::with_policy(config, GoPlayout)?;
            let last = self_play(state, agent)?;
            println!("score (black - white - komi): {:.1}", last.score());
            print_result(last.winner());
        }
        DemoGame::Tictactoe => {
            let last = self_play(TicTacToe::new(), MctsAgent::new(config)?)?;
            print_result(last.winner());
        }
    }
    Ok(())
}

/// Play the engine against itself until the game ends or it has no move.
fn self_play<G, P>(mut state: G, mut agent: MctsAgent<P>) -> Result<G>
where
    G: GameState + fmt::Display,
    G::Move: fmt::Display,
    P: PlayoutPolicy<G>,
{
    while !state.is_over() {
        let player = state.next_player();
        let Some(mv) = agent.select_move(&state)? else {
            info!("{player} has no move");
            break;
        };
        println!("{player} {mv}");
        state = state.apply_move(&mv)?;
        println!("{state}");
    }
    Ok(state)
}

fn print_result(winner: Option<Player>) {
    match winner {
        Some(player) => println!("{player} wins"),
        None => println!("draw"),
    }
}

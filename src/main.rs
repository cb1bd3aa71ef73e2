use std::fs::File;
use std::io::{self, BufWriter, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

use connect_four_search::ai::chance::{resolve_drop, DropResolution};
use connect_four_search::ai::observer::JsonLinesObserver;
use connect_four_search::ai::{
    find_best_move_with, Algorithm, BoardEvaluator, ScoringMode, SearchOutcome,
};
use connect_four_search::config::AppConfig;
use connect_four_search::game::{Board, Player};
use connect_four_search::play::run_matches;

/// Pick Connect Four moves by game-tree search.
#[derive(Parser)]
#[command(name = "c4search", about = "Connect Four move search")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, global = true, default_value = "c4search.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search for the AI's best column on a board
    BestMove {
        /// Board file (six lines of seven cells, top row first), or - for stdin
        #[arg(long)]
        board: String,

        /// NO_PRUNING, ALPHA_BETA or EXPECTIMINIMAX
        #[arg(long)]
        algorithm: Option<Algorithm>,

        /// Search depth in plies
        #[arg(long)]
        depth: Option<u32>,

        /// LITE or FULL leaf evaluation
        #[arg(long)]
        scoring: Option<ScoringMode>,

        /// Write node events as JSON lines to this file
        #[arg(long)]
        trace: Option<PathBuf>,

        /// Deepest tree level written to the trace
        #[arg(long)]
        trace_depth: Option<usize>,

        /// Drop the chosen piece with the slip model and print the result
        #[arg(long)]
        resolve: bool,

        /// Seed for --resolve
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Play the search agent against a random opponent
    Match {
        /// Number of games
        #[arg(long)]
        games: Option<usize>,

        /// Seed for the opponent and the drops
        #[arg(long)]
        seed: Option<u64>,

        /// Let the random opponent move first
        #[arg(long)]
        human_first: bool,

        /// Override the search algorithm
        #[arg(long)]
        algorithm: Option<Algorithm>,

        /// Override the search depth
        #[arg(long)]
        depth: Option<u32>,
    },

    /// Print the default configuration as TOML
    DefaultConfig,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::BestMove {
            board,
            algorithm,
            depth,
            scoring,
            trace,
            trace_depth,
            resolve,
            seed,
        } => {
            let mut app_config = load_config(&cli.config)?;
            let search = &mut app_config.search;
            if let Some(algorithm) = algorithm {
                search.algorithm = algorithm;
            }
            if let Some(depth) = depth {
                search.depth = depth;
            }
            if scoring.is_some() {
                search.scoring = scoring;
            }
            if let Some(trace_depth) = trace_depth {
                search.trace_depth = trace_depth;
            }
            app_config.validate().context("invalid search settings")?;

            let board = read_board(&board)?;
            let outcome = search_board(&board, &app_config, trace.as_ref())?;
            println!("{board}");
            println!("best column: {} (index {})", outcome.column + 1, outcome.column);
            println!("score: {:.1}", outcome.score);
            println!("time: {:.4}s", outcome.elapsed.as_secs_f64());
            println!(
                "nodes: {} ({} chance, {} cutoffs)",
                outcome.stats.nodes, outcome.stats.chance_nodes, outcome.stats.cutoffs
            );

            if resolve {
                let mut rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_os_rng(),
                };
                match resolve_drop(&board, outcome.column, Player::Ai, &mut rng) {
                    DropResolution::Landed { column, board, .. } => {
                        println!("landed in column {}", column + 1);
                        println!("{board}");
                    }
                    DropResolution::Skipped { column, .. } => {
                        println!("slipped into full column {}; turn passes", column + 1);
                    }
                }
            }
        }
        Command::Match {
            games,
            seed,
            human_first,
            algorithm,
            depth,
        } => {
            let mut app_config = load_config(&cli.config)?;
            if let Some(games) = games {
                app_config.matches.games = games;
            }
            if seed.is_some() {
                app_config.matches.seed = seed;
            }
            if human_first {
                app_config.matches.ai_first = false;
            }
            if let Some(algorithm) = algorithm {
                app_config.search.algorithm = algorithm;
            }
            if let Some(depth) = depth {
                app_config.search.depth = depth;
            }
            app_config.validate().context("invalid match settings")?;

            let tally = run_matches(&app_config.search, &app_config.matches)?;
            println!(
                "{} games: {} AI wins, {} human wins, {} draws ({:.0}% AI)",
                tally.total(),
                tally.ai_wins,
                tally.human_wins,
                tally.draws,
                tally.ai_win_rate() * 100.0
            );
            if tally.skips > 0 {
                println!("{} AI moves slipped into full columns", tally.skips);
            }
        }
        Command::DefaultConfig => print!("{}", AppConfig::default_toml()?),
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<AppConfig> {
    AppConfig::load_or_default(path)
        .with_context(|| format!("loading config from {}", path.display()))
}

fn read_board(source: &str) -> Result<Board> {
    let text = if source == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).context("reading board from stdin")?;
        text
    } else {
        std::fs::read_to_string(source).with_context(|| format!("reading board from {source}"))?
    };
    let board = text.parse::<Board>().with_context(|| format!("parsing board from {source}"))?;
    Ok(board)
}

fn search_board(
    board: &Board,
    config: &AppConfig,
    trace: Option<&PathBuf>,
) -> Result<SearchOutcome> {
    let evaluator = BoardEvaluator::new();
    let Some(path) = trace else {
        return Ok(find_best_move_with(board, &config.search, &evaluator, None)?);
    };

    let file =
        File::create(path).with_context(|| format!("creating trace file {}", path.display()))?;
    let mut observer = JsonLinesObserver::new(BufWriter::new(file));
    let outcome = find_best_move_with(board, &config.search, &evaluator, Some(&mut observer))?;
    observer
        .finish()
        .with_context(|| format!("writing trace file {}", path.display()))?;
    log::info!("wrote node trace to {}", path.display());
    Ok(outcome)
}

//! CLI entry point for the water sort solver.
//!
//! Usage:
//!   water-sort-solver solve <puzzle.json> [options]
//!   water-sort-solver solve --stdin [options]
//!   water-sort-solver solve --key "red,blue|blue,red|||"
//!   water-sort-solver replay <puzzle.json> --moves 0>2,1>0
//!   water-sort-solver key <puzzle.json>
//!
//! Options:
//!   --max-depth <n>     Nodes at this depth are not expanded (default: 14)
//!   --node-budget <n>   Maximum expanded nodes (default: 200000)
//!   --verbose           Log search progress to stderr

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use water_sort_solver::{
    canonical_key, solve_with_config, CanonicalKey, Move, PuzzleError, PuzzleFile, PuzzleState,
    SolverConfig, SolverReport,
};

#[derive(Parser)]
#[command(name = "water-sort-solver")]
#[command(about = "Bounded breadth-first solver for water sort puzzles")]
#[command(version)]
struct Cli {
    /// Log search progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct PuzzleInput {
    /// Path to puzzle JSON file (use --stdin to read from stdin)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Read puzzle from stdin instead of file
    #[arg(long)]
    stdin: bool,

    /// Puzzle given inline as a canonical key
    #[arg(long, conflicts_with_all = ["file", "stdin"])]
    key: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Find a shortest sequence of pours that sorts the puzzle
    Solve {
        #[command(flatten)]
        input: PuzzleInput,

        /// Nodes at this depth are not expanded
        #[arg(long, default_value = "14")]
        max_depth: usize,

        /// Maximum number of expanded nodes
        #[arg(long, default_value = "200000")]
        node_budget: usize,
    },
    /// Apply a sequence of pours and report each intermediate state
    Replay {
        #[command(flatten)]
        input: PuzzleInput,

        /// Comma separated pours, e.g. 0>2,1>0
        #[arg(long, value_delimiter = ',', required = true)]
        moves: Vec<Move>,
    },
    /// Print the canonical key of a puzzle
    Key {
        #[command(flatten)]
        input: PuzzleInput,
    },
}

/// Output format for a solve
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    status: &'static str,
    reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_moves: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_move: Option<Move>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<Vec<Move>>,
    nodes_expanded: usize,
    states_discovered: usize,
    time_elapsed_ms: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplayStep {
    #[serde(rename = "move")]
    mv: Move,
    key: CanonicalKey,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplayOutput {
    initial_key: CanonicalKey,
    steps: Vec<ReplayStep>,
    solved: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Run a subcommand; `Ok(false)` means it ran but did not reach a solved state
fn run(command: Commands) -> Result<bool> {
    match command {
        Commands::Solve {
            input,
            max_depth,
            node_budget,
        } => {
            let puzzle = read_puzzle(&input)?;
            let config = SolverConfig {
                max_depth,
                node_budget,
            };
            let report = solve_with_config(&puzzle, &config, None);
            let output = format_report(&report);
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(report.result.is_solved())
        }
        Commands::Replay { input, moves } => {
            let puzzle = read_puzzle(&input)?;
            let output = replay(&puzzle, &moves)?;
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(output.solved)
        }
        Commands::Key { input } => {
            let puzzle = read_puzzle(&input)?;
            println!("{}", canonical_key(&puzzle));
            Ok(true)
        }
    }
}

fn read_puzzle(input: &PuzzleInput) -> Result<PuzzleState> {
    if let Some(key) = &input.key {
        let key: CanonicalKey = key
            .parse()
            .with_context(|| format!("Invalid canonical key {:?}", key))?;
        return Ok(key.decode()?);
    }

    let json_content = if input.stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        buffer
    } else if let Some(path) = &input.file {
        fs::read_to_string(path).with_context(|| format!("Failed to read file {:?}", path))?
    } else {
        bail!("Must provide a file path, --stdin or --key");
    };

    let file: PuzzleFile =
        serde_json::from_str(&json_content).context("Error parsing puzzle JSON")?;
    Ok(file.vials)
}

fn replay(initial: &PuzzleState, moves: &[Move]) -> Result<ReplayOutput> {
    let mut state = initial.clone();
    let mut steps = Vec::with_capacity(moves.len());
    for (index, &mv) in moves.iter().enumerate() {
        if !state.is_legal_move(mv.from, mv.to) {
            let err = PuzzleError::InvalidMove {
                from: mv.from,
                to: mv.to,
            };
            return Err(anyhow::Error::new(err)
                .context(format!("Move #{} ({}) is not legal", index + 1, mv)));
        }
        state = state.apply_move(mv.from, mv.to)?;
        steps.push(ReplayStep {
            mv,
            key: canonical_key(&state),
        });
    }
    Ok(ReplayOutput {
        initial_key: canonical_key(initial),
        steps,
        solved: state.is_goal(),
    })
}

fn format_report(report: &SolverReport) -> SolveOutput {
    let solution = report.result.solution();
    SolveOutput {
        status: report.result.status(),
        reason: report.result.reason(),
        min_moves: solution.map(|s| s.min_moves),
        first_move: solution.and_then(|s| s.first_move),
        path: solution.map(|s| s.path.clone()),
        nodes_expanded: report.stats.nodes_expanded,
        states_discovered: report.stats.states_discovered,
        time_elapsed_ms: report.stats.time_elapsed_ms,
    }
}

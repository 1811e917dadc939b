use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;

use crate::error::Result;
use crate::generate;
use crate::problem::{self, Problem};
use crate::solver::{BeamSolver, SolverConfig};

#[derive(Debug, Parser)]
#[command(
    name = "rotamatch",
    about = "Beam-search solver for pair-rotation board puzzles",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Solve a problem document and emit the rotation sequence.
    Solve {
        /// Path to the problem document.
        problem: PathBuf,
        /// Where to write the answer; stdout when omitted.
        output: Option<PathBuf>,
        /// Seed for the solver PRNG, for reproducible runs.
        #[arg(long)]
        seed: Option<u64>,
        /// Wall-clock budget in milliseconds.
        #[arg(long)]
        time_limit_ms: Option<f64>,
    },
    /// Generate a random problem instance.
    Generate {
        /// Board side length: even, between 4 and 24.
        size: usize,
        /// Where to write the problem document.
        output: PathBuf,
        /// Seed for the generator; drawn from OS entropy when omitted.
        seed: Option<u64>,
    },
    /// Print a problem board, optionally applying an operation sequence.
    Replay {
        /// Path to the problem document.
        problem: PathBuf,
        /// Path to an answer document with the ops to apply.
        ops: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Solve {
            problem,
            output,
            seed,
            time_limit_ms,
        } => run_solve(&problem, output.as_deref(), seed, time_limit_ms),
        Command::Generate { size, output, seed } => run_generate(size, &output, seed),
        Command::Replay { problem, ops } => run_replay(&problem, ops.as_deref()),
    }
}

fn run_solve(
    problem_path: &Path,
    output: Option<&Path>,
    seed: Option<u64>,
    time_limit_ms: Option<f64>,
) -> Result<()> {
    let problem = Problem::load(problem_path)?;
    let board = problem.make_board()?;

    let mut config = SolverConfig {
        seed,
        ..SolverConfig::default()
    };
    if let Some(limit) = time_limit_ms {
        config.time_limit_ms = limit;
    }
    info!(size = problem.size, "solving problem");

    let report = BeamSolver::new(config).solve(&board)?;

    println!("Beam search result:");
    println!("  explored nodes: {}", report.explored_nodes);
    println!("  elapsed ms: {:.1}", report.elapsed_ms);
    println!("  matched pairs: {}", report.summary.matched);
    println!("  unmatched pairs: {}", report.summary.unmatched);
    println!("  operations: {}", report.operations.len());
    println!(
        "  status: {}",
        if report.solved { "SOLVED" } else { "PARTIAL" }
    );

    let answer = problem::serialize_answer(&report.operations);
    match output {
        Some(path) => {
            fs::write(path, format!("{answer}\n"))?;
            println!("Operations written to {}", path.display());
        }
        None => {
            println!("Serialized answer:");
            println!("{answer}");
        }
    }
    Ok(())
}

fn run_generate(size: usize, output: &Path, seed: Option<u64>) -> Result<()> {
    let seed = generate::write_problem(output, size, seed)?;
    println!(
        "Generated problem of size {size} to {} (seed={seed})",
        output.display()
    );
    Ok(())
}

fn run_replay(problem_path: &Path, ops_path: Option<&Path>) -> Result<()> {
    let problem = Problem::load(problem_path)?;
    let mut board = problem.make_board()?;

    println!("Initial board (size={}):", problem.size);
    println!("{}", board.render());
    let initial = board.evaluate_pairs();
    println!(
        "Matched pairs: {}, Unmatched pairs: {}",
        initial.matched, initial.unmatched
    );

    let Some(ops_path) = ops_path else {
        return Ok(());
    };
    let operations = problem::parse_answer(&fs::read_to_string(ops_path)?)?;
    println!("Applying {} operations...", operations.len());
    for rotation in operations {
        board.apply(rotation)?;
    }

    println!("Final board:");
    println!("{}", board.render());
    let summary = board.evaluate_pairs();
    println!(
        "Matched pairs: {}, Unmatched pairs: {}",
        summary.matched, summary.unmatched
    );
    println!(
        "{}",
        if board.is_goal() {
            "All pairs aligned."
        } else {
            "Pairs still unmatched."
        }
    );
    Ok(())
}

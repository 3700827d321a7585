mod input;
mod report;

use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use env_logger::Builder;
use log::LevelFilter;
use pivot_solver::{LpProblem, SolutionStatus, Solver};

use crate::input::InputReader;

#[derive(Parser)]
#[command(name = "pivot")]
#[command(about = "Maximize c·x subject to Ax <= b, x >= 0 with the tableau simplex method", long_about = None)]
struct Cli {
    /// File holding the problem numbers; stdin is read when omitted
    file: Option<PathBuf>,
    /// Do not print the tableau before each iteration
    #[arg(short, long)]
    quiet: bool,
    /// Stop after this many pivots
    #[arg(long)]
    max_iterations: Option<usize>,
    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Pretty)]
    format: Format,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Pretty,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    Builder::new().filter_level(level).parse_default_env().init();

    let problem = match &cli.file {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("Error reading file {}", path.display()))?;
            read_problem(BufReader::new(file), false)?
        }
        None => {
            let stdin = io::stdin();
            let interactive = stdin.is_terminal() && cli.format == Format::Pretty;
            read_problem(stdin.lock(), interactive)?
        }
    };

    let mut solver = Solver::new();
    if let Some(max) = cli.max_iterations {
        solver = solver.with_max_iterations(max);
    }

    let show_tableau = !cli.quiet && cli.format == Format::Pretty;
    let mut out = io::stdout().lock();
    let mut write_error = None;
    let solution = solver
        .solve_with(&problem, |tableau| {
            if show_tableau && write_error.is_none() {
                write_error = report::write_tableau(&mut out, tableau).err();
            }
        })
        .context("Invalid problem")?;
    if let Some(e) = write_error {
        return Err(e).context("Error writing tableau");
    }

    if solution.is_optimal() {
        for i in report::violated_constraints(&problem, &solution.values) {
            log::warn!(
                "reported optimum violates constraint {} (right-hand side {})",
                i + 1,
                problem.constraints[i].rhs
            );
        }
    }

    match cli.format {
        Format::Pretty => {
            report::write_status(&mut out, &solution)?;
            report::write_solution(&mut out, &solution)?;
        }
        Format::Json => {
            report::write_json(&mut out, &solution)?;
        }
    }
    out.flush()?;

    if solution.status != SolutionStatus::Optimal {
        std::process::exit(1);
    }
    Ok(())
}

fn read_problem(reader: impl BufRead, interactive: bool) -> Result<LpProblem> {
    let mut input = InputReader::new(reader, interactive.then(io::stdout));
    input.read_problem().context("Error reading problem")
}

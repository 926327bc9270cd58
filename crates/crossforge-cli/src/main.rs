//! `crossforge` binary: reads a PACE instance, prints an optimal order.
//!
//! The permutation goes to stdout in PACE solution format. Status,
//! objective and progress go to stderr.
//!
//! Exit codes: 0 when a permutation was printed, 1 on input or solver
//! errors, 2 when search ended without a permutation.

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use crossforge::console::{directive_for_verbosity, init_with_directive};
use crossforge::{
    pace, CrossForgeError, ModelConfig, Result, SearchStrategy, SolveStatus, SolverConfig,
};

#[derive(Parser, Debug)]
#[command(name = "crossforge", version)]
#[command(about = "Exact one-sided crossing minimization for PACE instances")]
struct Args {
    /// Instance in PACE `p ocr` format
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Time limit in seconds
    #[arg(short = 't', long = "time", value_name = "SECONDS")]
    time: Option<u64>,

    /// Stop after this many improving solutions
    #[arg(short = 's', long = "solutions", value_name = "N")]
    solutions: Option<u64>,

    /// Value selection: default, median or barycenter
    #[arg(long = "search", value_name = "STRATEGY")]
    search: Option<SearchStrategy>,

    /// Solver configuration file (TOML, or YAML by extension)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Disable the assignment lower bound
    #[arg(long)]
    no_lower_bound: bool,

    /// Disable all three reduction rules
    #[arg(long)]
    no_rules: bool,

    /// Restrict adjacent vertices to their preferred order
    #[arg(long)]
    table: bool,

    /// Enable geometric restarts
    #[arg(long)]
    restarts: bool,

    /// Random seed for tie-breaking
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// More output on stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_with_directive(directive_for_verbosity(args.verbose));

    match run(&args) {
        Ok(status) if status.has_solution() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(2),
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::from(1)
        }
    }
}

fn run(args: &Args) -> Result<SolveStatus> {
    let config = build_config(args)?;
    let graph = pace::read_file(&args.file)?;
    let result = crossforge::solve(&graph, &config)?;

    if let Some(permutation) = &result.solution.permutation {
        let mut out = BufWriter::new(io::stdout().lock());
        pace::write_permutation(&mut out, graph.fixed_count(), permutation)?;
        out.flush()?;
    }
    Ok(result.solution.status)
}

/// Configuration file first, then command-line overrides.
fn build_config(args: &Args) -> Result<SolverConfig> {
    let mut config = match &args.config {
        Some(path) => {
            SolverConfig::load(path).map_err(|e| CrossForgeError::Config(e.to_string()))?
        }
        None => SolverConfig::default(),
    };

    if let Some(seconds) = args.time {
        config = config.with_termination_seconds(seconds);
    }
    if let Some(count) = args.solutions {
        config = config.with_solution_limit(count);
    }
    if let Some(strategy) = args.search {
        config = config.with_search_strategy(strategy);
    }
    if let Some(seed) = args.seed {
        config = config.with_random_seed(seed);
    }

    let model = &mut config.model;
    if args.no_lower_bound {
        model.lower_bound = false;
    }
    if args.no_rules {
        *model = ModelConfig {
            reduction_rule_1: false,
            reduction_rule_2: false,
            reduction_rule_3: false,
            ..model.clone()
        };
    }
    if args.table {
        model.adjacent_pair_table = true;
    }
    if args.restarts {
        config.search.restarts.enabled = true;
    }
    Ok(config)
}

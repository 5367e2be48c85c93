use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use water_sort_solver::{
    Layout, Orientation, SolveOutcome, Solver, SolverConfig, State, generate,
};

#[derive(Parser)]
#[command(name = "water-sort-solver", version, about = "Find the shortest solution to a water sort puzzle")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// More log output (-v debug, -vv trace). RUST_LOG overrides this.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a puzzle read from FILE, or stdin when omitted.
    Solve(SolveArgs),
    /// Print a random puzzle in the text format.
    Generate(GenerateArgs),
}

#[derive(Args)]
struct SolveArgs {
    /// One tube per line: letters for liquid, `.` for free slots.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Tubes are listed top to bottom instead of bottom to top.
    #[arg(long)]
    top_first: bool,

    /// Give up on paths longer than this many moves.
    #[arg(long, value_name = "MOVES")]
    max_depth: Option<usize>,

    /// Give up after expanding this many states.
    #[arg(long, value_name = "STATES")]
    max_states: Option<usize>,

    /// Print the tubes after every move.
    #[arg(long)]
    show_states: bool,
}

#[derive(Args)]
struct GenerateArgs {
    #[arg(long, default_value_t = 4)]
    colors: usize,

    #[arg(long, default_value_t = 2)]
    empty: usize,

    #[arg(long, default_value_t = 4, value_parser = parse_capacity)]
    capacity: usize,

    /// Seed for a reproducible puzzle.
    #[arg(long)]
    seed: Option<u64>,
}

fn parse_capacity(value: &str) -> std::result::Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("capacity must be at least 1".to_string()),
        Ok(capacity) => Ok(capacity),
        Err(error) => Err(error.to_string()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Command::Solve(args) => run_solve(&args),
        Command::Generate(args) => run_generate(&args).map(|()| ExitCode::SUCCESS),
    };
    match result {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(1)
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::ERROR,
        (false, 0) => LevelFilter::WARN,
        (false, 1) => LevelFilter::DEBUG,
        (false, _) => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read puzzle from stdin")?;
            Ok(buffer)
        }
    }
}

fn run_solve(args: &SolveArgs) -> Result<ExitCode> {
    let orientation = if args.top_first {
        Orientation::TopToBottom
    } else {
        Orientation::BottomToTop
    };
    let repr = read_input(args.file.as_ref())?;
    let layout = Layout::new_from_repr(&repr, orientation).context("invalid puzzle")?;
    let root = State::from_layout(&layout).context("invalid puzzle")?;
    let config = SolverConfig {
        max_depth: args.max_depth,
        max_states: args.max_states,
    };

    let mut solver = Solver::new(root.clone(), config);
    let outcome = solver.solve();
    debug!(stats = ?solver.stats(), "search finished");

    match outcome {
        SolveOutcome::Solved(solution) => {
            if args.show_states {
                print!("{root}");
                let mut state = root;
                for action in solution.moves() {
                    state = state
                        .apply_move(action)
                        .context("solver produced an illegal move")?;
                    println!("\n{action}");
                    print!("{state}");
                }
            } else {
                print!("{solution}");
            }
            Ok(ExitCode::SUCCESS)
        }
        SolveOutcome::Unsolvable => {
            println!("no solution exists");
            Ok(ExitCode::from(2))
        }
        SolveOutcome::LimitReached { depth, explored } => {
            println!("search limit reached at depth {depth} after {explored} states");
            Ok(ExitCode::from(3))
        }
    }
}

fn run_generate(args: &GenerateArgs) -> Result<()> {
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let layout = generate(args.colors, args.empty, args.capacity, &mut rng);
    let state = State::from_layout(&layout).context("generated puzzle is invalid")?;
    print!("{state}");
    Ok(())
}

use std::error;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use dominating_set::{
    exact::{ExactConfig, EXACT_MAX_N},
    generate::{generate, GeneratorConfig},
    io::{read_solution, write_instance, write_solution},
    parse_input,
    strategy::{solve_large, MEDIUM_N, SMALL_N},
    Exact, Heuristic, Solution, SolveError, Solver, SolverConfig,
};

/// Power plant placement: approximate minimum dominating sets.
#[derive(Parser, Debug)]
#[command(name = "domset", version, about)]
struct Cli {
    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute a dominating set and write it as a bit string
    Solve(SolveArgs),
    /// Write a synthetic instance
    Generate(GenerateArgs),
    /// Check that a bit string powers every vertex of an instance
    Verify { input: PathBuf, solution: PathBuf },
}

#[derive(Args, Debug)]
struct SolveArgs {
    input: PathBuf,
    /// Defaults to standard output
    output: Option<PathBuf>,

    /// Use the exact branch and bound search
    #[arg(long)]
    exact: bool,
    /// Budget of the exact search in milliseconds
    #[arg(long, default_value_t = 200)]
    time_limit_ms: u64,
    /// Reject exact solutions larger than this
    #[arg(long)]
    max_size: Option<usize>,
    /// Largest graph the exact search accepts
    #[arg(long, default_value_t = EXACT_MAX_N)]
    exact_max_n: u32,
    /// On an exact timeout, write the best set found so far, or the heuristic's if none
    #[arg(long)]
    fallback: bool,

    /// Worker threads for the greedy scan
    #[arg(long)]
    threads: Option<usize>,
    #[arg(long, default_value_t = SMALL_N)]
    small_n: u32,
    #[arg(long, default_value_t = MEDIUM_N)]
    medium_n: u32,
    /// Also prune the results of the linear regimes
    #[arg(long)]
    prune_all: bool,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[arg(short, long)]
    nodes: u32,
    #[arg(short, long)]
    edges: usize,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Instance file
    output: PathBuf,
    /// Also write the single-pass reference solution here
    #[arg(long)]
    reference: Option<PathBuf>,
}

pub fn main() -> Result<(), Box<dyn error::Error>> {
    let cli = Cli::parse();
    let level = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Command::Solve(args) => run_solve(args)?,
        Command::Generate(args) => run_generate(args)?,
        Command::Verify { input, solution } => {
            let graph = parse_input(BufReader::new(File::open(input)?))?;
            let solution = read_solution(
                BufReader::new(File::open(solution)?),
                graph.vertex_count(),
            )?;
            if graph.validate_solution(&solution) {
                println!("valid: {} plants", solution.len());
            } else {
                println!("invalid");
                std::process::exit(1);
            }
        }
    }
    Ok(())
}

fn run_solve(args: SolveArgs) -> Result<(), Box<dyn error::Error>> {
    let graph = parse_input(BufReader::new(File::open(&args.input)?))?;
    let heuristic = Heuristic {
        config: SolverConfig {
            small_n: args.small_n,
            medium_n: args.medium_n,
            threads: args.threads,
            prune_linear: args.prune_all,
        },
    };

    let solution = if args.exact {
        let exact = Exact {
            config: ExactConfig {
                time_limit: Duration::from_millis(args.time_limit_ms),
                max_size: args.max_size,
                max_n: args.exact_max_n,
            },
        };
        match exact.solve(&graph) {
            Err(SolveError::Timeout {
                budget,
                best: Some(best),
            }) if args.fallback => {
                log::warn!(
                    "exact search timed out after {budget:?}, keeping its best set of {} plants",
                    best.len()
                );
                best
            }
            Err(SolveError::Timeout { budget, best: None }) if args.fallback => {
                log::warn!(
                    "exact search timed out after {budget:?}, using the {}",
                    heuristic.name()
                );
                heuristic.solve(&graph)?
            }
            result => result?,
        }
    } else {
        heuristic.solve(&graph)?
    };

    if !graph.validate_solution(&solution) {
        return Err(Box::new(SolveError::InvalidInput(
            "computed selection does not dominate the graph".into(),
        )));
    }
    write_to(args.output.as_deref(), |writer| write_solution(&solution, writer))?;
    Ok(())
}

fn run_generate(args: GenerateArgs) -> Result<(), Box<dyn error::Error>> {
    let graph = generate(&GeneratorConfig {
        nodes: args.nodes,
        edges: args.edges,
        seed: args.seed,
    })?;
    write_to(Some(args.output.as_path()), |writer| write_instance(&graph, writer))?;
    log::info!("instance written to {}", args.output.display());

    if let Some(path) = args.reference {
        let reference = Solution::new(graph.vertex_count(), solve_large(&graph)?)?;
        if !graph.validate_solution(&reference) {
            return Err(Box::new(SolveError::InvalidInput(
                "reference solution does not dominate the graph".into(),
            )));
        }
        write_to(Some(path.as_path()), |writer| write_solution(&reference, writer))?;
        log::info!("reference solution written to {}", path.display());
    }
    Ok(())
}

fn write_to(
    path: Option<&Path>,
    write: impl FnOnce(&mut dyn Write) -> io::Result<()>,
) -> io::Result<()> {
    match path {
        Some(path) => write(&mut BufWriter::new(File::create(path)?)),
        None => write(&mut io::stdout().lock()),
    }
}

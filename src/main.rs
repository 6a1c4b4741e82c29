use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use transynth::problem::{ProblemFile, SynthesisProblem};
use transynth::search::{SynthesisConfig, SynthesisOutcome, SynthesisResult, Uniqueness, synthesize};
use transynth::semantics::{CostMode, DistanceBudget, SolverConfig};
use transynth::SynthResult;

// --- Command Line Arguments ---

#[derive(Parser)]
#[command(name = "transynth")]
#[command(about = "transynth - finite-state transducer synthesis with Z3")]
#[command(version)]
#[command(subcommand_required = true)]
#[command(arg_required_else_help = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// CLI edit-budget mode selection
#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliCostMode {
    /// No edit-distance constraint
    Unconstrained,
    /// Every accepted run costs exactly the budget
    Bounded,
    /// Average edits per symbol stay within the budget
    Mean,
}

impl From<CliCostMode> for CostMode {
    fn from(cli: CliCostMode) -> Self {
        match cli {
            CliCostMode::Unconstrained => CostMode::Unconstrained,
            CliCostMode::Bounded => CostMode::Bounded,
            CliCostMode::Mean => CostMode::Mean,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize a transducer for a JSON problem description
    Synth {
        /// Path to the problem file
        problem: PathBuf,

        // --- Distance budget ---
        /// How the edit budget is enforced
        #[arg(long, value_enum, default_value = "mean")]
        mode: CliCostMode,
        /// Edit budget as m/n (or m)
        #[arg(long, default_value = "1/1")]
        budget: DistanceBudget,

        // --- Bounds ---
        /// Largest number of symbols emitted per transition
        #[arg(long, default_value = "2")]
        max_output_bound: usize,
        /// Largest number of candidate states (default: size of the source automaton)
        #[arg(long)]
        max_states: Option<usize>,
        /// Number of lookahead classifier states (enables lookahead)
        #[arg(long)]
        lookahead: Option<usize>,
        /// Ignore the template given in the problem file
        #[arg(long)]
        no_template: bool,

        // --- Solver ---
        /// Solver timeout per query in seconds (0 = no timeout)
        #[arg(long, default_value = "30")]
        timeout: u64,
        /// Z3 resource limit per query (deterministic alternative to --timeout)
        #[arg(long)]
        rlimit: Option<u32>,

        // --- Uniqueness ---
        /// Check whether another transducer fits the same bounds
        #[arg(long)]
        unique: bool,
        /// Alternatives blocked before the uniqueness check gives up
        #[arg(long, default_value = "8")]
        alternatives: usize,
        /// Random seed for the distinguishing-input search
        #[arg(long)]
        seed: Option<u64>,

        /// Run the result on these inputs
        #[arg(long = "apply")]
        apply: Vec<String>,
        /// Enable verbose output
        #[arg(long, short)]
        verbose: bool,
    },
    /// Check a problem file without invoking the solver
    Validate {
        /// Path to the problem file
        problem: PathBuf,
    },
}

fn load_problem(path: &Path) -> SynthResult<SynthesisProblem> {
    ProblemFile::load(path)?.to_problem()
}

fn cmd_validate(path: &Path) -> SynthResult<()> {
    let problem = load_problem(path)?;
    println!("{}: ok", path.display());
    println!("  minterms: {}", problem.alphabet().len());
    println!(
        "  source: {} states (totalized), target: {} states (totalized)",
        problem.source().num_states(),
        problem.target().num_states()
    );
    println!("  examples: {}", problem.examples().len());
    if let Some(template) = problem.template() {
        println!("  template: {} states", template.num_states());
    }
    Ok(())
}

fn print_result(problem: &SynthesisProblem, result: &SynthesisResult, inputs: &[String]) {
    match &result.outcome {
        SynthesisOutcome::Found(solution) => {
            println!("Transducer found at {}", solution.bounds);
            print!("{}", solution.transducer.display(problem.alphabet()));

            match &solution.uniqueness {
                Uniqueness::NotChecked => {}
                Uniqueness::Unique => println!("Uniqueness: unique at these bounds"),
                Uniqueness::Ambiguous { witness, .. } => {
                    let render = |output: &Option<Vec<usize>>| match output {
                        Some(symbols) => format!("\"{}\"", problem.alphabet().render(symbols)),
                        None => "(no output)".to_string(),
                    };
                    println!(
                        "Uniqueness: ambiguous, input \"{}\" gives {} or {}",
                        problem.alphabet().render(&witness.input),
                        render(&witness.left),
                        render(&witness.right)
                    );
                }
                Uniqueness::Undetermined { reason } => {
                    println!("Uniqueness: undetermined ({})", reason)
                }
            }

            for input in inputs {
                match solution.transducer.translate(problem.alphabet(), input) {
                    Some(output) => println!("{:?} -> {:?}", input, output),
                    None => println!("{:?} -> (rejected)", input),
                }
            }
        }
        SynthesisOutcome::NotFound { last_bounds } => match last_bounds {
            Some(bounds) => println!("No transducer found (last tried {})", bounds),
            None => println!("No transducer found"),
        },
        SynthesisOutcome::Inconclusive { bounds, reason } => {
            println!("Inconclusive at {}: {}", bounds, reason);
        }
    }

    println!();
    println!("Statistics:");
    print!("{}", result.statistics.format_summary());
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let filter = if matches!(&args.command, Commands::Synth { verbose: true, .. }) {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    // Exit codes: 0 found (or valid), 1 error, 2 nothing found or solver gave up
    let result: SynthResult<bool> = match args.command {
        Commands::Validate { problem } => cmd_validate(&problem).map(|_| true),
        Commands::Synth {
            problem,
            mode,
            budget,
            max_output_bound,
            max_states,
            lookahead,
            no_template,
            timeout,
            rlimit,
            unique,
            alternatives,
            seed,
            apply,
            verbose: _,
        } => {
            let mut solver = if timeout == 0 {
                SolverConfig::unlimited()
            } else {
                SolverConfig::default().with_timeout(Duration::from_secs(timeout))
            };
            if let Some(rlimit) = rlimit {
                solver = solver.with_rlimit(rlimit);
            }
            let mut config = SynthesisConfig::default()
                .with_cost_mode(mode.into())
                .with_budget(budget)
                .with_max_output_bound(max_output_bound)
                .with_template(!no_template)
                .with_solver(solver)
                .with_uniqueness_check(unique)
                .with_max_alternatives(alternatives);
            if let Some(states) = max_states {
                config = config.with_max_states(states);
            }
            if let Some(states) = lookahead {
                config = config.with_lookahead_states(states);
            }
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }

            load_problem(&problem).and_then(|p| {
                let result = synthesize(&p, &config)?;
                print_result(&p, &result, &apply);
                Ok(result.is_found())
            })
        }
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

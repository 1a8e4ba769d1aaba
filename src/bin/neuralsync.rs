#![forbid(unsafe_code)]

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use neuralsync::random::StdRandom;
use neuralsync::tasks::{generate_matrix_problem, generate_stroop_task, BartTrial};
use neuralsync::{
    calculate_final_scores, calculate_ranked_score_with, generate_stages_with,
    validate_test_session_with, Catalog, EngineConfig, SequenceOptions, SessionRecord,
};

#[derive(Parser)]
#[command(name = "neuralsync", version, about = "NeuralSync assessment scoring CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the stage program
    Stages {
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Append debug stages repeating the first N scenarios
        #[arg(long, default_value_t = 0)]
        repeat_scenarios: usize,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Compute final trait scores for a stored session
    Score {
        #[arg(long)]
        session: PathBuf,
        #[arg(long)]
        catalog: Option<PathBuf>,
        #[arg(long, default_value_t = 0)]
        repeat_scenarios: usize,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Validate a stored session
    Validate {
        #[arg(long)]
        session: PathBuf,
        #[arg(long)]
        catalog: Option<PathBuf>,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value_t = 0)]
        repeat_scenarios: usize,
        /// Attention-check content ids; defaults to the catalog's attention items
        #[arg(long, value_delimiter = ',')]
        attention_checks: Option<Vec<String>>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Ranked-mode score for a stored session
    Ranked {
        #[arg(long)]
        session: PathBuf,
        #[arg(long)]
        catalog: Option<PathBuf>,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value_t = 0)]
        repeat_scenarios: usize,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Score a session, mark it completed and write it back
    Complete {
        #[arg(long)]
        session: PathBuf,
        #[arg(long)]
        catalog: Option<PathBuf>,
        #[arg(long, default_value_t = 0)]
        repeat_scenarios: usize,
    },
    /// Generate one emotional Stroop task
    Stroop {
        #[arg(long, default_value_t = 5)]
        difficulty: u8,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Generate one matrix-reasoning problem
    Matrix {
        #[arg(long, default_value_t = 5)]
        difficulty: u8,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Simulate a BART trial: pump up to N times, then cash out
    Bart {
        #[arg(long, default_value_t = 5)]
        difficulty: u8,
        #[arg(long)]
        pumps: u32,
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Stages {
            catalog,
            repeat_scenarios,
            out,
        } => {
            let catalog = load_catalog(catalog)?;
            let stages = generate_stages_with(&catalog, &sequence(repeat_scenarios));
            emit(&stages, out)?;
        }
        Commands::Score {
            session,
            catalog,
            repeat_scenarios,
            out,
        } => {
            let catalog = load_catalog(catalog)?;
            let record = SessionRecord::load(&session)?;
            let stages = generate_stages_with(&catalog, &sequence(repeat_scenarios));
            let scores = calculate_final_scores(record.responses(), &stages, &catalog);
            emit(&scores, out)?;
        }
        Commands::Validate {
            session,
            catalog,
            config,
            repeat_scenarios,
            attention_checks,
            out,
        } => {
            let catalog = load_catalog(catalog)?;
            let config = load_config(config)?;
            let record = SessionRecord::load(&session)?;
            let stages = generate_stages_with(&catalog, &sequence(repeat_scenarios));
            let ids = attention_checks.unwrap_or_else(|| catalog.attention_check_ids());
            let result =
                validate_test_session_with(record.responses(), &stages, &ids, &config.validation);
            if !result.is_valid {
                eprintln!(
                    "[validate] session {} flagged: scores may be unreliable",
                    record.session_id
                );
            }
            emit(&result, out)?;
        }
        Commands::Ranked {
            session,
            catalog,
            config,
            repeat_scenarios,
            out,
        } => {
            let catalog = load_catalog(catalog)?;
            let config = load_config(config)?;
            let record = SessionRecord::load(&session)?;
            let stages = generate_stages_with(&catalog, &sequence(repeat_scenarios));
            let ranked = calculate_ranked_score_with(record.responses(), &stages, &config.ranked);
            emit(&ranked, out)?;
        }
        Commands::Complete {
            session,
            catalog,
            repeat_scenarios,
        } => {
            let catalog = load_catalog(catalog)?;
            let mut record = SessionRecord::load(&session)?;
            let stages = generate_stages_with(&catalog, &sequence(repeat_scenarios));
            record.complete(&stages, &catalog);
            record.save(&session)?;
            eprintln!("[complete] session written to {}", session.display());
        }
        Commands::Stroop { difficulty, seed } => {
            let mut rng = StdRandom::from_seed_opt(seed);
            let task = generate_stroop_task(difficulty, &mut rng);
            emit(&task, None)?;
        }
        Commands::Matrix { difficulty, seed } => {
            let mut rng = StdRandom::from_seed_opt(seed);
            let problem = generate_matrix_problem(difficulty, &mut rng);
            emit(&problem, None)?;
        }
        Commands::Bart {
            difficulty,
            pumps,
            seed,
        } => {
            let mut trial = BartTrial::new(difficulty, StdRandom::from_seed_opt(seed));
            for _ in 0..pumps {
                if trial.pump().status.is_terminal() {
                    break;
                }
            }
            let state = trial.cash_out();
            emit(&state, None)?;
        }
    }

    Ok(())
}

fn sequence(repeat_scenarios: usize) -> SequenceOptions {
    SequenceOptions {
        debug_repeats: repeat_scenarios,
    }
}

fn load_catalog(path: Option<PathBuf>) -> Result<Catalog, Box<dyn std::error::Error>> {
    match path {
        Some(p) => Ok(Catalog::load(p)?),
        None => Ok(Catalog::builtin()),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    match path {
        Some(p) => Ok(EngineConfig::load(p)?),
        None => Ok(EngineConfig::default()),
    }
}

/// Pretty JSON to `out`, or stdout when no path is given.
fn emit<T: serde::Serialize>(value: &T, out: Option<PathBuf>) -> Result<(), io::Error> {
    let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    match out {
        Some(path) => std::fs::write(path, json),
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}")
        }
    }
}

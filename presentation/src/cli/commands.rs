//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for run results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Formatted report with the call tree and result log
    #[default]
    Text,
    /// Only the final answer
    Answer,
    /// JSON output
    Json,
}

/// CLI arguments for marshall
#[derive(Parser, Debug)]
#[command(name = "marshall")]
#[command(author, version, about = "Decision agents and answer ensembles over LLMs")]
#[command(long_about = r#"
marshall runs a task through a recursive decision agent, or samples a
query several times and reconciles the answers.

Commands:
  agent      The model answers, writes Python to compute a result, or
             splits the task into sub-tasks handled by sub-agents
  ensemble   Sample N answers and pick the most central one by embedding
             similarity, or let a refiner model choose

Configuration files are loaded from (in priority order):
1. MARSHALL_* environment variables (e.g. MARSHALL_AGENT__MAX_DEPTH=5)
2. --config <path>     Explicit config file
3. ./marshall.toml     Project-level config
4. ~/.config/marshall/config.toml   Global config

Example:
  marshall agent "What is the sum of the first 100 primes?"
  marshall ensemble -n 7 "Name a prime number between 10 and 20"
  marshall --output json ensemble --strategy agent "Summarise TCP slow start"
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and the effective config, then exit
    #[arg(long)]
    pub show_config: bool,

    /// Write diagnostic logs to this file instead of stderr
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Record a JSONL transcript of the run
    #[arg(long, value_name = "PATH", global = true)]
    pub transcript: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a task through the decision agent
    Agent(AgentArgs),
    /// Sample a query several times and reconcile the answers
    Ensemble(EnsembleArgs),
}

#[derive(Args, Debug)]
pub struct AgentArgs {
    /// The task to run
    pub task: String,

    /// Model for the root agent
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Model for sub-agents and code repairs
    #[arg(long, value_name = "MODEL")]
    pub sub_model: Option<String>,

    /// Model that writes the final answer from the result log
    #[arg(long, value_name = "MODEL")]
    pub refiner: Option<String>,

    /// Maximum dispatch depth
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Run without a code executor
    #[arg(long)]
    pub no_exec: bool,

    /// Keep every result in the instructions instead of only the latest
    #[arg(long)]
    pub accumulate: bool,
}

#[derive(Args, Debug)]
pub struct EnsembleArgs {
    /// The query to sample
    pub query: String,

    /// Model to sample
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Number of samples
    #[arg(short = 'n', long, value_name = "N")]
    pub samples: Option<usize>,

    /// Reconciliation strategy (similarity or agent)
    #[arg(short, long, value_name = "STRATEGY")]
    pub strategy: Option<String>,

    /// Sampling temperature
    #[arg(short, long, value_name = "T")]
    pub temperature: Option<f32>,

    /// Samples in flight at once
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Refiner model for the agent strategy
    #[arg(long, value_name = "MODEL")]
    pub refiner: Option<String>,
}

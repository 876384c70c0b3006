//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Content Plan - Schedule content packages into execution plans
#[derive(Parser, Debug)]
#[command(name = "content-plan")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Set log level (error, warn, info, debug, trace)
    ///
    /// `RUST_LOG` takes precedence when it is set.
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Schedule the content packages of a feature into execution plans
    Schedule(commands::schedule::ScheduleArgs),

    /// Merge the content packages of one feature into another
    Merge(commands::merge::MergeArgs),

    /// Show how the content packages of a feature are batched
    Batches(commands::batches::BatchesArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        match self.command {
            Commands::Schedule(args) => commands::schedule::execute(args),
            Commands::Merge(args) => commands::merge::execute(args),
            Commands::Batches(args) => commands::batches::execute(args),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Initialize `env_logger`, logging to stderr.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // A logger may already be installed when running under tests.
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}

//! # Content Plan CLI
//!
//! This is the binary entry point for the `content-plan` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Setting up logging from the global `--log-level` flag.
//! - Executing the appropriate command and reporting its errors.
//!
//! The core logic is defined in the `lib.rs` library crate, so the binary is a
//! thin wrapper around the reusable library functionality.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}

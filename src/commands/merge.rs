//! # Merge Command Implementation
//!
//! Merges the content packages of a source feature into a target feature
//! and prints the merged target as YAML, or writes it to `--output`.
//!
//! Each side's `default.content.startorder` variable is applied to its own
//! artifacts first. An overlapping package keeps the higher version, with
//! ties going to the source.

use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};

use content_plan::feature::{self, Feature};
use content_plan::merge;

/// Merge the content packages of one feature into another
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Feature receiving the merged content packages
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Feature whose content packages are merged in
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Write the merged feature to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Execute the `merge` command.
pub fn execute(args: MergeArgs) -> Result<()> {
    let mut target = load(&args.target)?;
    let mut source = load(&args.source)?;

    merge::merge(&mut target, &mut source)
        .map_err(|e| anyhow::anyhow!("Failed to merge {} into {}: {}", source.id, target.id, e))?;

    let rendered = target.to_yaml()?;
    match &args.output {
        Some(path) => std::fs::write(path, rendered.as_bytes()).map_err(|e| {
            anyhow::anyhow!("Failed to write merged feature to {}: {}", path.display(), e)
        })?,
        None => print!("{}", rendered),
    }
    Ok(())
}

fn load(path: &Path) -> Result<Feature> {
    if !path.exists() {
        anyhow::bail!("Feature file not found: {}", path.display());
    }
    feature::from_file(path)
        .map_err(|e| anyhow::anyhow!("Failed to load feature from {}: {}", path.display(), e))
}

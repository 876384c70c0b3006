//! # Schedule Command Implementation
//!
//! Runs a complete scheduling run for the content packages of a feature and
//! emits the configuration for the repository initializer.
//!
//! ## Process
//!
//! 1.  **Load**: Parse the feature manifest.
//! 2.  **Registry**: Resolve the registry home from `--registry-home` or
//!     `--repository-home` and open the package registry stored there.
//! 3.  **Schedule**: Resolve each content package from the local repository,
//!     register it and build one execution plan per batch.
//! 4.  **Emit**: Write the initializer and registry configuration as JSON or
//!     YAML to stdout, or to `--output`.
//!
//! Status messages go to stderr so stdout carries only the configuration. A
//! failed run writes no configuration.

use anyhow::Result;
use clap::{Args, ValueEnum};
use std::path::{Path, PathBuf};

use content_plan::feature;
use content_plan::initializer::Configurations;
use content_plan::phases::orchestrator;
use content_plan::phases::PlanPolicy;
use content_plan::registry::FsPackageRegistry;
use content_plan::resolver::LocalContentResolver;
use content_plan::settings;

/// Serialization format of the emitted configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// Schedule the content packages of a feature
#[derive(Args, Debug)]
pub struct ScheduleArgs {
    /// Path to the feature manifest
    #[arg(short, long, value_name = "FILE")]
    pub feature: PathBuf,

    /// Directory of the package registry.
    ///
    /// Can also be set with the `PACKAGEREGISTRY_HOME` environment variable.
    #[arg(long, value_name = "DIR", env = "PACKAGEREGISTRY_HOME")]
    pub registry_home: Option<PathBuf>,

    /// Repository home; the registry lives in its `packageregistry` folder
    /// when no registry home is given.
    ///
    /// Can also be set with the `REPOSITORY_HOME` environment variable.
    #[arg(long, value_name = "DIR", env = "REPOSITORY_HOME")]
    pub repository_home: Option<PathBuf>,

    /// Local artifact repository to resolve content packages from.
    ///
    /// Defaults to `~/.m2/repository`. Can also be set with the
    /// `CONTENT_PLAN_LOCAL_REPO` environment variable.
    #[arg(long, value_name = "DIR", env = "CONTENT_PLAN_LOCAL_REPO")]
    pub local_repo: Option<PathBuf>,

    /// Mark every extract task for strict validation
    #[arg(long)]
    pub strict: bool,

    /// Reinstall snapshot packages that are already registered
    #[arg(long)]
    pub reinstall_snapshots: bool,

    /// Output format of the configuration
    #[arg(long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Write the configuration to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Suppress status messages
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the `schedule` command.
pub fn execute(args: ScheduleArgs) -> Result<()> {
    if !args.feature.exists() {
        anyhow::bail!("Feature file not found: {}", args.feature.display());
    }

    let feature = feature::from_file(&args.feature).map_err(|e| {
        anyhow::anyhow!(
            "Failed to load feature from {}: {}",
            args.feature.display(),
            e
        )
    })?;

    let home = settings::resolve_registry_home(
        args.registry_home.as_deref(),
        args.repository_home.as_deref(),
    )?;
    let mut registry = FsPackageRegistry::open(&home)?;

    let repository_root = args
        .local_repo
        .clone()
        .unwrap_or_else(LocalContentResolver::default_repository_root);
    let resolver = LocalContentResolver::new(repository_root, base_dir(&args.feature));

    let policy = PlanPolicy {
        strict: args.strict,
        reinstall_snapshots: args.reinstall_snapshots,
    };

    if !args.quiet {
        eprintln!("📦 Scheduling content packages of {}", feature.id);
    }

    let schedule = match orchestrator::execute_feature(&feature, &policy, &resolver, &mut registry)
    {
        Ok(schedule) => schedule,
        Err(e) => {
            if !args.quiet {
                eprintln!("❌ Scheduling failed");
            }
            return Err(e.into());
        }
    };

    let configurations = Configurations::from_schedule(&schedule, &home, &policy)?;
    let rendered = match args.format {
        OutputFormat::Json => configurations.to_json()?,
        OutputFormat::Yaml => configurations.to_yaml()?,
    };

    match &args.output {
        Some(path) => std::fs::write(path, rendered.as_bytes()).map_err(|e| {
            anyhow::anyhow!("Failed to write configuration to {}: {}", path.display(), e)
        })?,
        None => println!("{}", rendered),
    }

    if !args.quiet {
        eprintln!(
            "✅ Scheduled {} task(s) in {} execution plan(s)",
            schedule.task_count(),
            schedule.batches.len()
        );
        if let Some(path) = &args.output {
            eprintln!("   Configuration written to: {}", path.display());
        }
    }

    Ok(())
}

/// Directory relative content locations resolve against.
fn base_dir(feature_path: &Path) -> PathBuf {
    match feature_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args(feature: PathBuf) -> ScheduleArgs {
        ScheduleArgs {
            feature,
            registry_home: None,
            repository_home: None,
            local_repo: None,
            strict: false,
            reinstall_snapshots: false,
            format: OutputFormat::Json,
            output: None,
            quiet: true,
        }
    }

    #[test]
    fn test_execute_missing_feature() {
        let result = execute(args(PathBuf::from("/nonexistent/feature.yaml")));
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Feature file not found"));
    }

    #[test]
    fn test_execute_without_registry_home() {
        let temp = TempDir::new().unwrap();
        let feature = temp.path().join("feature.yaml");
        fs::write(&feature, "id: g:f:1\n").unwrap();

        let result = execute(args(feature));
        assert!(result.unwrap_err().to_string().contains("Missing configuration"));
    }

    #[test]
    fn test_execute_writes_configuration() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.zip"), "id: my_packages:a:1.0\n").unwrap();
        let feature = temp.path().join("feature.yaml");
        fs::write(
            &feature,
            r#"id: g:f:1
extensions:
  - name: content-packages
    type: artifacts
    artifacts:
      - id: my_packages:a:1.0
        location: a.zip
"#,
        )
        .unwrap();
        let output = temp.path().join("config.yaml");

        let mut schedule_args = args(feature);
        schedule_args.registry_home = Some(temp.path().join("registry"));
        schedule_args.format = OutputFormat::Yaml;
        schedule_args.output = Some(output.clone());
        execute(schedule_args).unwrap();

        let config: Configurations =
            serde_yaml::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(config.initializer.execution_plans.len(), 1);
        assert!(config.initializer.execution_plans[0].contains("my_packages:a:1.0"));
        assert_eq!(config.registry.home_path, temp.path().join("registry"));
    }

    #[test]
    fn test_base_dir() {
        assert_eq!(base_dir(Path::new("feature.yaml")), PathBuf::from("."));
        assert_eq!(
            base_dir(Path::new("/work/feature.yaml")),
            PathBuf::from("/work")
        );
    }
}

//! # Initializer Configuration
//!
//! A completed scheduling run is handed to the repository initializer as
//! configuration: the plan documents in replay order, the file in which the
//! initializer records which plans it has already executed, and whether
//! snapshot packages are reprocessed. The registry home is emitted next to it
//! so the initializer opens the same registry the plans were built against.
//!
//! A configuration is only ever built from a complete `Schedule`; a run that
//! failed produces none.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::phases::orchestrator::Schedule;
use crate::phases::PlanPolicy;
use crate::settings;

/// Configuration consumed by the repository initializer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializerConfig {
    /// Plan documents, replayed in order, each exactly once.
    pub execution_plans: Vec<String>,
    /// Where the initializer records executed plans.
    pub status_file_path: PathBuf,
    pub reinstall_snapshots: bool,
}

/// Configuration of the package registry the plans refer to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryConfig {
    pub home_path: PathBuf,
}

/// Everything a scheduling run emits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configurations {
    pub initializer: InitializerConfig,
    pub registry: RegistryConfig,
}

impl Configurations {
    /// Build the configurations for a finished schedule.
    pub fn from_schedule(
        schedule: &Schedule,
        registry_home: &Path,
        policy: &PlanPolicy,
    ) -> Result<Self> {
        Ok(Self {
            initializer: InitializerConfig {
                execution_plans: schedule.to_xml_documents()?,
                status_file_path: settings::status_file_path(registry_home),
                reinstall_snapshots: policy.reinstall_snapshots,
            },
            registry: RegistryConfig {
                home_path: registry_home.to_path_buf(),
            },
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phases::{BatchPlan, OrderKey};
    use crate::plan::{ExecutionPlanBuilder, ImportOptions};
    use crate::package::PackageId;
    use std::collections::BTreeSet;

    fn schedule() -> Schedule {
        let mut builder = ExecutionPlanBuilder::new(BTreeSet::new());
        builder.add_extract_task(PackageId::new("g", "a", "1.0"), ImportOptions::default());
        let satisfied = builder.preview();
        Schedule {
            batches: vec![BatchPlan {
                key: OrderKey::Last,
                plan: builder.build(),
                satisfied,
                has_snapshot: false,
            }],
            has_snapshot: false,
        }
    }

    #[test]
    fn test_from_schedule() {
        let policy = PlanPolicy {
            strict: false,
            reinstall_snapshots: true,
        };
        let config =
            Configurations::from_schedule(&schedule(), Path::new("/var/registry"), &policy)
                .unwrap();

        assert_eq!(config.initializer.execution_plans.len(), 1);
        assert!(config.initializer.execution_plans[0].contains("packageId=\"g:a:1.0\""));
        assert_eq!(
            config.initializer.status_file_path,
            PathBuf::from("/var/registry/executedplans.file")
        );
        assert!(config.initializer.reinstall_snapshots);
        assert_eq!(config.registry.home_path, PathBuf::from("/var/registry"));
    }

    #[test]
    fn test_json_and_yaml_keys() {
        let config = Configurations::from_schedule(
            &schedule(),
            Path::new("/var/registry"),
            &PlanPolicy::default(),
        )
        .unwrap();

        let json: serde_json::Value = serde_json::from_str(&config.to_json().unwrap()).unwrap();
        assert_eq!(json["initializer"]["reinstallSnapshots"], false);
        assert_eq!(json["registry"]["homePath"], "/var/registry");
        assert!(json["initializer"]["executionPlans"].is_array());

        let back: Configurations = serde_yaml::from_str(&config.to_yaml().unwrap()).unwrap();
        assert_eq!(back, config);
    }
}

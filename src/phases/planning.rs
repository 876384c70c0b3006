//! Phase 2: Planning
//!
//! Builds the execution plan for one batch against the satisfied set that
//! enters it.
//!
//! ## Process
//!
//! 1.  **Resolution**: Each artifact's archive is resolved. An artifact with
//!     no archive is skipped; its content is assumed to be in place already.
//!
//! 2.  **Registration**: The archive is registered under its own declared
//!     identity. A package that is already registered is skipped, unless it
//!     is a snapshot and the policy asks for snapshots to be reinstalled, in
//!     which case it is registered again and planned.
//!
//! 3.  **Sub-packages**: Every package that received a task has its declared
//!     sub-packages walked depth first. Each one that is not ignored, not
//!     already satisfied and not already planned gets its own task right after
//!     its parent's, then its own sub-packages are walked. A visited set makes
//!     the walk terminate on cyclic data.
//!
//! 4.  **Validation**: The session is validated against the registry and its
//!     preview becomes the satisfied set for the next batch.
//!
//! Registrations made here stay pending in the registry until the run as a
//! whole is committed.

use std::collections::{BTreeSet, HashSet};

use log::{debug, info};

use super::{Batch, BatchPlan, PlanPolicy};
use crate::error::Result;
use crate::package::PackageId;
use crate::plan::{ExecutionPlanBuilder, ImportOptions};
use crate::registry::{PackageRegistry, Registration};
use crate::resolver::ContentResolver;

/// Execute Phase 2: Build the execution plan for one batch
///
/// Consumes the satisfied set entering the batch and returns the one leaving
/// it inside the `BatchPlan`.
pub fn execute<C, R>(
    batch: &Batch,
    satisfied: BTreeSet<PackageId>,
    policy: &PlanPolicy,
    resolver: &C,
    registry: &mut R,
) -> Result<BatchPlan>
where
    C: ContentResolver + ?Sized,
    R: PackageRegistry + ?Sized,
{
    let options = ImportOptions::new(policy.strict);
    let mut builder = ExecutionPlanBuilder::new(satisfied);
    let mut visited: HashSet<PackageId> = HashSet::new();
    let mut has_snapshot = false;

    for artifact in &batch.artifacts {
        let Some(archive) = resolver.resolve(artifact)? else {
            debug!("Skipping {}: no archive to install", artifact.id);
            continue;
        };

        let package = match registry.register(&archive, false)? {
            Registration::Registered(id) => id,
            Registration::AlreadyExists(id) => {
                let snapshot = id.is_snapshot();
                has_snapshot |= snapshot;
                if snapshot && policy.reinstall_snapshots {
                    info!("Reinstalling snapshot package {}", id);
                    registry.register(&archive, true)?.package().clone()
                } else {
                    info!("Skipping {}: package is already registered", id);
                    continue;
                }
            }
        };

        if !builder.add_extract_task(package.clone(), options) {
            debug!("Skipping {}: already planned in this batch", package);
            continue;
        }
        visited.insert(package.clone());
        plan_sub_packages(&package, options, &mut builder, &mut visited, &*registry)?;
    }

    builder.validate(&*registry)?;
    let satisfied = builder.preview();
    let plan = builder.build();
    info!(
        "Planned batch {} with {} task(s) for {} artifact(s)",
        batch.key,
        plan.len(),
        batch.len()
    );

    Ok(BatchPlan {
        key: batch.key,
        plan,
        satisfied,
        has_snapshot,
    })
}

/// Walk the sub-packages of `parent` depth first, planning each eligible one
/// directly after its parent.
fn plan_sub_packages<R>(
    parent: &PackageId,
    options: ImportOptions,
    builder: &mut ExecutionPlanBuilder,
    visited: &mut HashSet<PackageId>,
    registry: &R,
) -> Result<()>
where
    R: PackageRegistry + ?Sized,
{
    for sub in registry.sub_packages(parent)? {
        if sub.is_ignored() {
            debug!("Ignoring sub-package {} of {}", sub.id, parent);
            continue;
        }
        if !visited.insert(sub.id.clone()) {
            continue;
        }
        if builder.satisfied().contains(&sub.id) || builder.is_planned(&sub.id) {
            debug!("Skipping sub-package {}: already satisfied", sub.id);
            continue;
        }
        builder.add_extract_task(sub.id.clone(), options);
        plan_sub_packages(&sub.id, options, builder, visited, registry)?;
    }
    Ok(())
}

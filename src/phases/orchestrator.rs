//! Orchestrator for the complete scheduling run
//!
//! This module coordinates all phases to provide a clean API for scheduling a
//! list of artifacts, or the content packages of a feature, into execution
//! plans.

use std::collections::BTreeSet;

use log::{info, warn};

use super::{ordering, planning, Batch, BatchPlan, PlanPolicy};
use crate::artifact::Artifact;
use crate::error::Result;
use crate::feature::Feature;
use crate::package::PackageId;
use crate::plan::ExecutionPlan;
use crate::registry::PackageRegistry;
use crate::resolver::ContentResolver;

/// Result of a complete scheduling run
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    /// One entry per batch, in ascending key order.
    pub batches: Vec<BatchPlan>,
    /// Whether any batch saw an already registered snapshot package.
    pub has_snapshot: bool,
}

impl Schedule {
    /// The execution plans in replay order.
    pub fn plans(&self) -> impl Iterator<Item = &ExecutionPlan> {
        self.batches.iter().map(|b| &b.plan)
    }

    /// Satisfied set after the last batch.
    pub fn satisfied(&self) -> BTreeSet<PackageId> {
        self.batches
            .last()
            .map(|b| b.satisfied.clone())
            .unwrap_or_default()
    }

    /// Total number of tasks across all plans.
    pub fn task_count(&self) -> usize {
        self.plans().map(ExecutionPlan::len).sum()
    }

    /// Render every plan as an XML document, in replay order.
    pub fn to_xml_documents(&self) -> Result<Vec<String>> {
        self.plans().map(ExecutionPlan::to_xml).collect()
    }
}

/// Execute the complete scheduling run
///
/// This orchestrates the pipeline:
/// 1. Group artifacts into batches by start order
/// 2. Plan each batch in ascending key order, threading the satisfied set
///
/// Registrations are committed only once every batch has been planned. Any
/// error rolls them back, aborts the run and nothing is returned.
pub fn execute_schedule<C, R>(
    artifacts: &[Artifact],
    policy: &PlanPolicy,
    resolver: &C,
    registry: &mut R,
) -> Result<Schedule>
where
    C: ContentResolver + ?Sized,
    R: PackageRegistry + ?Sized,
{
    // Phase 1: Ordering
    let batches = ordering::execute(artifacts)?;

    // Phase 2: Planning, one batch at a time
    let schedule = match plan_batches(&batches, policy, resolver, registry) {
        Ok(schedule) => schedule,
        Err(e) => {
            if let Err(rollback) = registry.rollback() {
                warn!("Failed to roll back registrations: {}", rollback);
            }
            return Err(e);
        }
    };
    registry.commit()?;

    if schedule.has_snapshot && !policy.reinstall_snapshots {
        warn!(
            "Snapshot packages are already registered and will not be reinstalled; \
             enable snapshot reinstallation to pick up their changes"
        );
    }
    info!(
        "Scheduled {} task(s) in {} execution plan(s)",
        schedule.task_count(),
        schedule.batches.len()
    );

    Ok(schedule)
}

fn plan_batches<C, R>(
    batches: &[Batch],
    policy: &PlanPolicy,
    resolver: &C,
    registry: &mut R,
) -> Result<Schedule>
where
    C: ContentResolver + ?Sized,
    R: PackageRegistry + ?Sized,
{
    let mut satisfied = BTreeSet::new();
    let mut schedule = Schedule::default();
    for batch in batches {
        let planned = planning::execute(batch, satisfied, policy, resolver, registry)?;
        satisfied = planned.satisfied.clone();
        schedule.has_snapshot |= planned.has_snapshot;
        schedule.batches.push(planned);
    }
    Ok(schedule)
}

/// Schedule the content packages of a feature
///
/// A feature without a content-packages extension yields an empty schedule.
pub fn execute_feature<C, R>(
    feature: &Feature,
    policy: &PlanPolicy,
    resolver: &C,
    registry: &mut R,
) -> Result<Schedule>
where
    C: ContentResolver + ?Sized,
    R: PackageRegistry + ?Sized,
{
    match feature.content_packages() {
        Some(extension) => {
            execute_schedule(extension.artifacts.as_slice(), policy, resolver, registry)
        }
        None => {
            info!("Feature {} declares no content packages", feature.id);
            Ok(Schedule::default())
        }
    }
}

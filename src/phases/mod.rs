//! Implementation of the phases of a scheduling run.
//!
//! ## Overview
//!
//! A scheduling run follows 3 phases:
//! 1. Ordering - Group artifacts into batches by start order
//! 2. Planning - Build one execution plan per batch against the satisfied set
//! 3. Orchestration - Thread the satisfied set through every batch in order and
//!    produce the plan documents and initializer configuration
//!
//! Batches are planned strictly one after the other: the satisfied set leaving
//! one batch is the satisfied set entering the next.

use std::collections::BTreeSet;
use std::fmt;

use crate::artifact::Artifact;
use crate::package::PackageId;
use crate::plan::ExecutionPlan;

// Phase modules
pub mod orchestrator;
pub mod ordering;
pub mod planning;

/// Key a batch is ordered by
///
/// The derived ordering puts every `Explicit` key before `Last`, so artifacts
/// without a start order are scheduled after those with any explicit one,
/// `u32::MAX` included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OrderKey {
    /// An explicit `start-order`.
    Explicit(u32),
    /// No start order was declared.
    Last,
}

impl OrderKey {
    /// Numeric value of the key; `Last` reports `u32::MAX`.
    pub fn value(&self) -> u32 {
        match self {
            OrderKey::Explicit(value) => *value,
            OrderKey::Last => u32::MAX,
        }
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderKey::Explicit(value) => write!(f, "{}", value),
            OrderKey::Last => write!(f, "last"),
        }
    }
}

/// Artifacts sharing one order key, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub key: OrderKey,
    pub artifacts: Vec<Artifact>,
}

impl Batch {
    pub fn new(key: OrderKey) -> Self {
        Self {
            key,
            artifacts: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

/// How duplicates and validation are handled while planning
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanPolicy {
    /// Strict validation flag carried by every extract task.
    pub strict: bool,
    /// Re-register and re-plan snapshot packages that are already registered.
    pub reinstall_snapshots: bool,
}

/// Outcome of planning one batch
#[derive(Debug, Clone)]
pub struct BatchPlan {
    pub key: OrderKey,
    pub plan: ExecutionPlan,
    /// Satisfied set after this batch.
    pub satisfied: BTreeSet<PackageId>,
    /// Whether an already registered snapshot package was seen.
    pub has_snapshot: bool,
}

//! # Content Plan Library
//!
//! This library schedules the installation of content packages into a
//! repository. It groups the content packages of a feature into ordered
//! batches, builds one execution plan per batch against a registry of known
//! packages, and produces the configuration a repository initializer replays
//! at system start. It is designed to be used by the `content-plan`
//! command-line tool but can also be embedded by anything that composes
//! features.
//!
//! ## Quick Example
//!
//! ```
//! use content_plan::artifact::{Artifact, ArtifactId};
//! use content_plan::package::{PackageArchive, PackageId};
//! use content_plan::phases::orchestrator::execute_schedule;
//! use content_plan::phases::PlanPolicy;
//! use content_plan::registry::MemoryRegistry;
//! use content_plan::resolver::MemoryResolver;
//!
//! let site = ArtifactId::parse("org.example:site:1.0").unwrap();
//! let resolver = MemoryResolver::new().with_archive(
//!     site.clone(),
//!     PackageArchive::new(PackageId::parse("org.example:site:1.0").unwrap()),
//! );
//! let mut registry = MemoryRegistry::new();
//!
//! let artifacts = vec![Artifact::new(site).with_start_order(1)];
//! let schedule =
//!     execute_schedule(&artifacts, &PlanPolicy::default(), &resolver, &mut registry).unwrap();
//! assert_eq!(schedule.batches.len(), 1);
//! assert_eq!(schedule.task_count(), 1);
//! ```
//!
//! ## Core Concepts
//!
//! - **Artifacts (`artifact`, `feature`)**: Content packages declared by a
//!   feature manifest, with an optional `start-order`.
//! - **Packages (`package`, `registry`, `resolver`)**: The archives backing
//!   artifacts, resolved from disk and recorded in a package registry.
//! - **Plans (`plan`)**: Ordered extract tasks for one batch and their XML
//!   documents.
//! - **Phases (`phases`)**: Ordering, per-batch planning and the orchestrator
//!   that threads the satisfied-package set through every batch.
//! - **Merging (`merge`)**: Combining the content packages of two features
//!   with a highest-version-wins rule.
//! - **Configuration (`settings`, `initializer`)**: Registry home resolution
//!   and the configuration emitted for the repository initializer.
//!
//! ## Execution Flow
//!
//! 1.  **Merge** (optional): Compose features into one.
//! 2.  **Ordering**: Group the content packages into batches by start order.
//! 3.  **Planning**: Build each batch's plan in ascending order, skipping
//!     packages that are already registered or satisfied.
//! 4.  **Configuration**: Emit the plan documents, status file and registry
//!     home for the initializer.

pub mod artifact;
pub mod error;
pub mod feature;
pub mod initializer;
pub mod merge;
pub mod package;
pub mod phases;
pub mod plan;
pub mod registry;
pub mod resolver;
pub mod settings;
pub mod version;

#[cfg(test)]
mod ordering_proptest;

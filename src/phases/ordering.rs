//! Phase 1: Ordering
//!
//! Groups artifacts into batches by their `start-order`.
//!
//! ## Process
//!
//! 1.  **Key Extraction**: Each artifact's key is its parsed `start-order`, or
//!     `OrderKey::Last` when it declares none. A value that is not a
//!     non-negative integer aborts with `MalformedOrderKey`.
//!
//! 2.  **Grouping**: Artifacts are appended to the batch for their key in
//!     declaration order, so equal keys keep their relative order.
//!
//! 3.  **Sorting**: A `BTreeMap` keyed by `OrderKey` yields the batches in
//!     ascending key order with the `Last` batch at the end.

use std::collections::BTreeMap;

use super::{Batch, OrderKey};
use crate::artifact::Artifact;
use crate::error::Result;

/// Execute Phase 1: Group artifacts into ordered batches
///
/// Returns the batches in ascending key order. An empty input yields no
/// batches.
pub fn execute(artifacts: &[Artifact]) -> Result<Vec<Batch>> {
    let mut batches: BTreeMap<OrderKey, Vec<Artifact>> = BTreeMap::new();

    for artifact in artifacts {
        let key = order_key(artifact)?;
        batches.entry(key).or_default().push(artifact.clone());
    }

    Ok(batches
        .into_iter()
        .map(|(key, artifacts)| Batch { key, artifacts })
        .collect())
}

/// The batch key of one artifact.
pub fn order_key(artifact: &Artifact) -> Result<OrderKey> {
    Ok(match artifact.start_order()? {
        Some(order) => OrderKey::Explicit(order),
        None => OrderKey::Last,
    })
}

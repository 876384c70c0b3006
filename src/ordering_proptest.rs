//! Property-based tests for batch ordering and version precedence.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::artifact::{Artifact, ArtifactId};
    use crate::merge::merge_artifacts;
    use crate::phases::{ordering, OrderKey};
    use crate::version::Version;
    use proptest::prelude::*;

    fn artifacts_from(orders: &[Option<u32>]) -> Vec<Artifact> {
        orders
            .iter()
            .enumerate()
            .map(|(i, order)| {
                let artifact = Artifact::new(ArtifactId::new("g", &format!("p{}", i), "1.0"));
                match order {
                    Some(order) => artifact.with_start_order(*order),
                    None => artifact,
                }
            })
            .collect()
    }

    // ============================================================================
    // ordering::execute property tests
    // ============================================================================

    proptest! {
        /// Property: batch keys are strictly ascending
        #[test]
        fn batches_are_strictly_ascending(
            orders in prop::collection::vec(prop::option::of(0u32..5), 0..40)
        ) {
            let batches = ordering::execute(&artifacts_from(&orders)).unwrap();
            for pair in batches.windows(2) {
                prop_assert!(pair[0].key < pair[1].key);
            }
        }

        /// Property: artifacts without a start order form the last batch
        #[test]
        fn unordered_artifacts_are_last(
            orders in prop::collection::vec(prop::option::of(any::<u32>()), 1..40)
        ) {
            let batches = ordering::execute(&artifacts_from(&orders)).unwrap();
            let has_unordered = orders.iter().any(Option::is_none);
            let last = batches.last().unwrap();
            prop_assert_eq!(last.key == OrderKey::Last, has_unordered);
        }

        /// Property: every artifact lands in exactly one batch, in declaration order
        #[test]
        fn batching_preserves_declaration_order(
            orders in prop::collection::vec(prop::option::of(0u32..3), 0..40)
        ) {
            let artifacts = artifacts_from(&orders);
            let batches = ordering::execute(&artifacts).unwrap();

            let total: usize = batches.iter().map(|b| b.len()).sum();
            prop_assert_eq!(total, artifacts.len());

            for batch in &batches {
                let positions: Vec<usize> = batch
                    .artifacts
                    .iter()
                    .map(|a| artifacts.iter().position(|x| x == a).unwrap())
                    .collect();
                prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }

    // ============================================================================
    // merge precedence property tests
    // ============================================================================

    proptest! {
        /// Property: the merged artifact carries the higher version, ties go to the source
        #[test]
        fn merge_keeps_highest_version(
            target in (0u64..4, 0u64..4, 0u64..4),
            source in (0u64..4, 0u64..4, 0u64..4),
        ) {
            let target_version = format!("{}.{}.{}", target.0, target.1, target.2);
            let source_version = format!("{}.{}.{}", source.0, source.1, source.2);
            let target_list = vec![Artifact::new(ArtifactId::new("g", "a", &target_version))]
                .into_iter()
                .collect();
            let source_list = vec![Artifact::new(ArtifactId::new("g", "a", &source_version))]
                .into_iter()
                .collect();

            let merged = merge_artifacts(Some(target_list), source_list, None, None).unwrap();
            prop_assert_eq!(merged.len(), 1);

            let expected = if Version::parse(&target_version) > Version::parse(&source_version) {
                target_version
            } else {
                source_version
            };
            prop_assert_eq!(&merged.as_slice()[0].id.version, &expected);
        }

        /// Property: version ordering is consistent with equality
        #[test]
        fn version_order_is_total(a in "[0-9]{1,2}(\\.[0-9]{1,2}){0,2}(-[A-Z]{1,4})?",
                                  b in "[0-9]{1,2}(\\.[0-9]{1,2}){0,2}(-[A-Z]{1,4})?") {
            let va = Version::parse(&a);
            let vb = Version::parse(&b);
            prop_assert_eq!(va.cmp(&vb), vb.cmp(&va).reverse());
            prop_assert_eq!(va == vb, va.cmp(&vb) == std::cmp::Ordering::Equal);
        }
    }
}

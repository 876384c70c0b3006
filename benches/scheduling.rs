//! Benchmarks for scheduling large artifact lists.
//!
//! Covers batching alone, a complete run against an in-memory registry and
//! merging two large content-package lists.

use content_plan::artifact::{Artifact, ArtifactId, Artifacts};
use content_plan::merge::merge_artifacts;
use content_plan::package::{PackageArchive, PackageId, SubPackageHandling};
use content_plan::phases::orchestrator::execute_schedule;
use content_plan::phases::{ordering, PlanPolicy};
use content_plan::registry::MemoryRegistry;
use content_plan::resolver::MemoryResolver;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Creates `count` artifacts spread over ten start orders, every seventh unordered.
fn create_artifacts(count: usize) -> Vec<Artifact> {
    (0..count)
        .map(|i| {
            let artifact = Artifact::new(ArtifactId::new("bench", &format!("pkg{}", i), "1.0"));
            if i % 7 == 0 {
                artifact
            } else {
                artifact.with_start_order((i % 10) as u32)
            }
        })
        .collect()
}

/// Creates a resolver for the artifacts, every third archive carrying two sub-packages.
fn create_resolver(artifacts: &[Artifact]) -> MemoryResolver {
    artifacts
        .iter()
        .enumerate()
        .fold(MemoryResolver::new(), |resolver, (i, artifact)| {
            let mut archive =
                PackageArchive::new(PackageId::new("bench", &artifact.id.name, "1.0"));
            if i % 3 == 0 {
                for sub in 0..2 {
                    archive = archive.with_sub_package(
                        PackageId::new("bench", &format!("{}-sub{}", artifact.id.name, sub), "1.0"),
                        SubPackageHandling::Include,
                    );
                }
            }
            resolver.with_archive(artifact.id.clone(), archive)
        })
}

fn bench_ordering(c: &mut Criterion) {
    let mut group = c.benchmark_group("ordering");
    for size in [100, 1_000, 10_000] {
        let artifacts = create_artifacts(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &artifacts, |b, artifacts| {
            b.iter(|| ordering::execute(black_box(artifacts)).unwrap())
        });
    }
    group.finish();
}

fn bench_schedule(c: &mut Criterion) {
    let mut group = c.benchmark_group("schedule");
    for size in [100, 1_000] {
        let artifacts = create_artifacts(size);
        let resolver = create_resolver(&artifacts);
        group.bench_with_input(BenchmarkId::from_parameter(size), &artifacts, |b, artifacts| {
            b.iter(|| {
                let mut registry = MemoryRegistry::new();
                execute_schedule(
                    black_box(artifacts),
                    &PlanPolicy::default(),
                    &resolver,
                    &mut registry,
                )
                .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let target: Artifacts = create_artifacts(500).into_iter().collect();
    let source: Artifacts = create_artifacts(1_000)
        .into_iter()
        .map(|mut artifact| {
            artifact.id.version = "1.1".to_string();
            artifact.metadata.clear();
            artifact
        })
        .collect();

    c.bench_function("merge_1000_into_500", |b| {
        b.iter(|| {
            merge_artifacts(
                Some(black_box(target.clone())),
                black_box(source.clone()),
                None,
                Some("4"),
            )
            .unwrap()
        })
    });
}

criterion_group!(benches, bench_ordering, bench_schedule, bench_merge);
criterion_main!(benches);

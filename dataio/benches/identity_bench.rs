//! Benchmarks for identity derivation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dataio::identity::{derive_entity_uuid, derive_ensemble_uuid, derive_realization_uuid};
use dataio::utils::uuid_from_string;

fn identity_benchmark(c: &mut Criterion) {
    let case_uuid = uuid_from_string("mycase");

    c.bench_function("ensemble_uuid", |b| {
        b.iter(|| derive_ensemble_uuid(black_box(&case_uuid), black_box("iter-0")));
    });

    let ensemble_uuid = derive_ensemble_uuid(&case_uuid, "iter-0");
    c.bench_function("realization_uuids_100", |b| {
        b.iter(|| {
            (0..100)
                .map(|real| derive_realization_uuid(&case_uuid, &ensemble_uuid, black_box(real)))
                .count()
        });
    });

    c.bench_function("entity_uuid", |b| {
        b.iter(|| {
            derive_entity_uuid(
                black_box(&case_uuid),
                black_box("share/results/maps/topvolantis--20200101_20180101.gri"),
            )
        });
    });
}

criterion_group!(benches, identity_benchmark);
criterion_main!(benches);

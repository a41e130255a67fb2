use std::hint::black_box;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dungeon_weave::prelude::{
    BlockTemplate, BoxOracle, Catalog, DungeonGenerator, GenerationConfig, GridTerrain,
    PropSocket, PropTemplate, TAG_BASE, TAG_INFRASTRUCTURE, TAG_PILLAR, TAG_STAIRS,
};
use glam::Vec3;

const TIER_COUNTS: [usize; 4] = [10, 25, 50, 100];

/// Each iteration is a complete generation run (hundreds of collision tests
/// and union folds), so samples are few and the measurement window is wide.
fn full_run_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(10)
        .warm_up_time(Duration::from_secs(2))
        .measurement_time(Duration::from_secs(8))
}

fn bench_catalog() -> Catalog {
    Catalog::new()
        .with_block(
            BlockTemplate::new("room", 2.0, Vec3::ONE)
                .with_tag(TAG_BASE)
                .with_input(Vec3::new(0.0, 0.0, 5.0))
                .with_output(Vec3::new(10.0, 0.0, 5.0))
                .with_output(Vec3::new(5.0, 0.0, 10.0))
                .with_pillar_anchor(Vec3::new(5.0, 0.0, 5.0))
                .with_prop_socket(PropSocket::new("tree", 0.4, Vec3::new(5.0, 10.0, 5.0))),
        )
        .with_block(
            BlockTemplate::new("hall", 1.0, Vec3::new(2.0, 1.0, 1.0))
                .with_tag(TAG_BASE)
                .with_input(Vec3::new(0.0, 0.0, 5.0))
                .with_output(Vec3::new(20.0, 0.0, 5.0)),
        )
        .with_block(
            BlockTemplate::new("walkway", 1.0, Vec3::ONE)
                .with_tag(TAG_INFRASTRUCTURE)
                .with_input(Vec3::new(0.0, 0.0, 5.0))
                .with_output(Vec3::new(10.0, 0.0, 5.0)),
        )
        .with_block(
            BlockTemplate::new("stairs", 1.0, Vec3::ONE)
                .with_tag(TAG_STAIRS)
                .with_input(Vec3::new(0.0, 0.0, 5.0))
                .with_output(Vec3::new(10.0, 5.0, 5.0)),
        )
        .with_prop(PropTemplate::new("pillar", 1.0, Vec3::splat(10.0)).with_tag(TAG_PILLAR))
        .with_prop(PropTemplate::new("oak", 1.0, Vec3::splat(5.0)).with_tag("tree"))
}

fn bench_growth(c: &mut Criterion) {
    let catalog = bench_catalog();
    let terrain = GridTerrain::new(150.0, 10.0, 90.0);
    let oracle = BoxOracle;

    let mut group = c.benchmark_group("growth/full_run");
    for tier_count in TIER_COUNTS {
        // Requested block attachments across both tiers.
        group.throughput(Throughput::Elements((tier_count * 2) as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(tier_count),
            &tier_count,
            |b, &tier_count| {
                b.iter(|| {
                    let config = GenerationConfig::new()
                        .with_tier1_count(tier_count)
                        .with_tier2_count(tier_count)
                        .with_root_factor(10.0)
                        .with_seed("bench");
                    let mut generator =
                        DungeonGenerator::try_new(config, &catalog, &terrain, &oracle)
                            .expect("valid bench setup");
                    black_box(generator.run().expect("bench run succeeds"))
                });
            },
        );
    }
    group.finish();
}

criterion_group! {
    name = growth;
    config = full_run_criterion();
    targets = bench_growth
}
criterion_main!(growth);

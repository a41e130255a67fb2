//! Shared helpers for the example binaries: tracing setup, a catalog all
//! examples build on, and plain-text report output.
use dungeon_weave::prelude::*;
use glam::Vec3;
use tracing_subscriber::EnvFilter;

/// Installs a stderr tracing subscriber honoring `RUST_LOG` (default `info`).
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// A small catalog with every template class the pipeline consumes: base
/// rooms, an infrastructure walkway, a stair piece, and pillar/tree props.
pub fn shared_catalog() -> Catalog {
    Catalog::new()
        .with_block(
            BlockTemplate::new("room", 2.0, Vec3::ONE)
                .with_tag(TAG_BASE)
                .with_input(Vec3::new(0.0, 0.0, 5.0))
                .with_output(Vec3::new(10.0, 0.0, 5.0))
                .with_output(Vec3::new(5.0, 0.0, 10.0))
                .with_pillar_anchor(Vec3::new(5.0, 0.0, 5.0))
                .with_prop_socket(PropSocket::new("tree", 0.35, Vec3::new(5.0, 10.0, 5.0))),
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
        .with_prop(PropTemplate::new("oak", 2.0, Vec3::splat(5.0)).with_tag("tree"))
        .with_prop(PropTemplate::new("birch", 1.0, Vec3::splat(5.0)).with_tag("tree"))
}

/// Prints the per-phase counters and every placed instance.
pub fn print_report(report: &GenerationReport) {
    println!(
        "placed {} blocks ({} roots, {} tier-1, {} tier-2, {} stairs)",
        report.blocks.len(),
        report.roots_placed,
        report.tier1_placed,
        report.tier2_placed,
        report.stairs_placed
    );
    println!(
        "placed {} props ({} pillar segments, {} scattered)",
        report.props.len(),
        report.pillar_segments_placed,
        report.props_placed
    );
    for block in &report.blocks {
        println!(
            "  block {:>3} {:<10} yaw {:>3}°  at ({:>7.1}, {:>6.1}, {:>7.1})",
            block.id.0,
            block.template_id,
            block.yaw.degrees(),
            block.translation.x,
            block.translation.y,
            block.translation.z
        );
    }
    for prop in &report.props {
        println!(
            "  prop      {:<10}           at ({:>7.1}, {:>6.1}, {:>7.1})",
            prop.template_id, prop.position.x, prop.position.y, prop.position.z
        );
    }
}

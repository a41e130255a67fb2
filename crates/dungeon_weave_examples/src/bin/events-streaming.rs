use dungeon_weave::prelude::*;
use dungeon_weave_examples::{init_tracing, shared_catalog};

/// Streams generation events through an [`FnSink`], the hook a host would use
/// to realize accepted instances in a scene as they land.
fn main() -> anyhow::Result<()> {
    init_tracing();

    let terrain = GridTerrain::new(100.0, 10.0, 70.0);
    let catalog = shared_catalog();
    let oracle = BoxOracle;

    let config = GenerationConfig::new()
        .with_tier1_count(8)
        .with_tier2_count(4)
        .with_root_factor(8.0)
        .with_seed("streaming");

    let mut sink = FnSink::new(|event: GenEvent| match event {
        GenEvent::PhaseStarted { phase } => println!("== {phase} =="),
        GenEvent::BlockPlaced {
            template_id,
            yaw,
            translation,
            ..
        } => println!(
            "  + {template_id} yaw {:.0}° at {translation}",
            yaw.degrees()
        ),
        GenEvent::BlockRejected {
            template_id,
            tries_used,
            ..
        } => println!("  - {template_id} rejected after {tries_used} tests"),
        GenEvent::PropPlaced {
            template_id,
            position,
            ..
        } => println!("  + {template_id} at {position}"),
        _ => {}
    });

    let mut generator = DungeonGenerator::try_new(config, &catalog, &terrain, &oracle)?;
    let report = generator.run_with_events(&mut sink)?;

    println!(
        "done: {} blocks, {} props",
        report.blocks.len(),
        report.props.len()
    );
    Ok(())
}

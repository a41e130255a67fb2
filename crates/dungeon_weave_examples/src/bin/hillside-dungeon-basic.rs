use dungeon_weave::prelude::*;
use dungeon_weave_examples::{init_tracing, print_report, shared_catalog};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Noise heights over a 300x300 area; roots prefer the high, central spots.
    let terrain = GridTerrain::new(150.0, 10.0, 90.0);
    let catalog = shared_catalog();
    let oracle = BoxOracle;

    let config = GenerationConfig::new()
        .with_tier1_count(20)
        .with_tier2_count(12)
        .with_root_factor(8.0)
        .with_seed("hillside");

    let mut generator = DungeonGenerator::try_new(config, &catalog, &terrain, &oracle)?;
    let report = generator.run()?;

    print_report(&report);
    Ok(())
}

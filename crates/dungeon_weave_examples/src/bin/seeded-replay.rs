use dungeon_weave::prelude::*;
use dungeon_weave_examples::{init_tracing, shared_catalog};

/// Runs the same configuration twice with the same seed and shows the
/// placements match, then once more with a different seed.
fn main() -> anyhow::Result<()> {
    init_tracing();

    let terrain = GridTerrain::new(120.0, 10.0, 80.0);
    let catalog = shared_catalog();
    let oracle = BoxOracle;

    let run = |seed: &str| -> anyhow::Result<GenerationReport> {
        let config = GenerationConfig::new()
            .with_tier1_count(10)
            .with_tier2_count(6)
            .with_root_factor(8.0)
            .with_seed(seed);
        Ok(DungeonGenerator::try_new(config, &catalog, &terrain, &oracle)?.run()?)
    };

    let first = run("ruins-of-ka")?;
    let second = run("ruins-of-ka")?;
    let other = run("sunken-keep")?;

    let signature = |report: &GenerationReport| -> Vec<(String, f32)> {
        report
            .blocks
            .iter()
            .map(|b| (b.template_id.clone(), b.translation.x))
            .collect()
    };

    println!("seed 'ruins-of-ka' run 1: {} blocks", first.blocks.len());
    println!("seed 'ruins-of-ka' run 2: {} blocks", second.blocks.len());
    println!("seed 'sunken-keep'      : {} blocks", other.blocks.len());
    println!(
        "replay identical: {}",
        signature(&first) == signature(&second)
    );
    Ok(())
}

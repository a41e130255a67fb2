//! Root phase: seeds base blocks onto terrain samples.
use glam::Vec3;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::generate::events::{EventSink, GenEvent, GenEventKind};
use crate::generate::runner::GenerationConfig;
use crate::generate::state::GenState;
use crate::generate::{Phase, GRID_UNIT, MAX_ROOT_PASSES, TAG_BASE};
use crate::geom::{oriented_box, GeometryOracle, Yaw};
use crate::occupancy::OccupancyIndex;

/// Runs full passes over the terrain samples until at least one base block is
/// accepted, then returns how many were placed in that pass.
///
/// Each sample draws exactly one uniform value whether or not it qualifies, so
/// seeded replays stay aligned. Acceptance probability rewards height and
/// closeness to the origin:
/// `(y / 100 * 0.05) * (1 - distance / 500) * root_factor`.
pub(crate) fn generate_roots<O: GeometryOracle>(
    state: &mut GenState,
    catalog: &Catalog,
    occupancy: &mut OccupancyIndex<'_, O>,
    samples: &[Vec3],
    config: &GenerationConfig,
    sink: &mut dyn EventSink,
) -> Result<usize> {
    let candidates = catalog.blocks_tagged(Some(TAG_BASE));
    if candidates.is_empty() {
        return Err(Error::Catalog(format!(
            "no block templates tagged '{TAG_BASE}'"
        )));
    }
    let weights: Vec<f32> = candidates
        .iter()
        .map(|index| catalog.blocks[*index].weight)
        .collect();

    for pass in 0..MAX_ROOT_PASSES {
        let mut accepted = 0usize;
        for sample in samples {
            let distance = sample.x.hypot(sample.z);
            let chance =
                sample.y / 100.0 * 0.05 * (1.0 - distance / 500.0) * config.root_factor;
            let roll = state.rng.rand01();
            if chance <= roll || distance > config.max_distance {
                continue;
            }

            let template = *state.rng.weighted_choice(&candidates, &weights)?;
            let spec = &catalog.blocks[template];
            let translation = Vec3::new(snap(sample.x), snap(sample.y), snap(sample.z));
            let footprint = oriented_box(spec.dims(), Yaw::Deg0, translation);
            if occupancy.intersects(&footprint)? {
                // Two samples snapped into the same cell; keep the first.
                continue;
            }

            occupancy.add_accepted(footprint)?;
            let id = state.commit_block(catalog, template, Yaw::Deg0, translation, None);
            if sink.wants(GenEventKind::BlockPlaced) {
                sink.send(GenEvent::BlockPlaced {
                    phase: Phase::Roots,
                    id,
                    template_id: catalog.blocks[template].id.clone(),
                    yaw: Yaw::Deg0,
                    translation,
                });
            }
            accepted += 1;
        }

        if accepted > 0 {
            info!("Root pass {pass} placed {accepted} base blocks.");
            return Ok(accepted);
        }
        warn!("Root pass {pass} placed nothing; retrying.");
    }

    Err(Error::EmptyRoots {
        passes: MAX_ROOT_PASSES,
    })
}

/// Snaps a coordinate down onto the placement grid.
fn snap(value: f32) -> f32 {
    GRID_UNIT * (value / GRID_UNIT).floor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BlockTemplate;
    use crate::generate::bedrock_slab;
    use crate::geom::BoxOracle;
    use crate::rng::{RandomSequence, Seed};

    fn catalog() -> Catalog {
        Catalog::new().with_block(
            BlockTemplate::new("base_room", 1.0, Vec3::ONE)
                .with_tag(TAG_BASE)
                .with_input(Vec3::new(0.0, 0.0, 5.0))
                .with_output(Vec3::new(10.0, 0.0, 5.0)),
        )
    }

    fn setup(seed: u64) -> GenState {
        GenState::new(RandomSequence::seed(Some(&Seed::from(seed))))
    }

    fn config() -> GenerationConfig {
        GenerationConfig::new()
            .with_root_factor(100.0)
            .with_max_distance(100.0)
    }

    #[test]
    fn empty_height_field_fails_after_bounded_passes() {
        let oracle = BoxOracle;
        let mut occupancy = OccupancyIndex::new(&oracle, bedrock_slab()).unwrap();
        let mut state = setup(1);
        let err = generate_roots(&mut state, &catalog(), &mut occupancy, &[], &config(), &mut ())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::EmptyRoots {
                passes: MAX_ROOT_PASSES
            }
        ));
    }

    #[test]
    fn flat_terrain_never_qualifies() {
        let oracle = BoxOracle;
        let mut occupancy = OccupancyIndex::new(&oracle, bedrock_slab()).unwrap();
        let mut state = setup(2);
        let samples = vec![Vec3::new(10.0, 0.0, 10.0)];
        let err = generate_roots(
            &mut state,
            &catalog(),
            &mut occupancy,
            &samples,
            &config(),
            &mut (),
        )
        .unwrap_err();
        assert!(matches!(err, Error::EmptyRoots { .. }));
    }

    #[test]
    fn accepted_roots_snap_to_grid() {
        let oracle = BoxOracle;
        let mut occupancy = OccupancyIndex::new(&oracle, bedrock_slab()).unwrap();
        let mut state = setup(3);
        let samples = vec![Vec3::new(12.0, 103.0, 7.0)];
        let placed = generate_roots(
            &mut state,
            &catalog(),
            &mut occupancy,
            &samples,
            &config(),
            &mut (),
        )
        .unwrap();
        assert_eq!(placed, 1);
        assert_eq!(state.blocks[0].translation, Vec3::new(10.0, 100.0, 0.0));
    }

    #[test]
    fn samples_beyond_max_distance_are_rejected() {
        let oracle = BoxOracle;
        let mut occupancy = OccupancyIndex::new(&oracle, bedrock_slab()).unwrap();
        let mut state = setup(4);
        // Huge chance, but outside the distance bound.
        let samples = vec![Vec3::new(300.0, 100.0, 0.0)];
        let err = generate_roots(
            &mut state,
            &catalog(),
            &mut occupancy,
            &samples,
            &config(),
            &mut (),
        )
        .unwrap_err();
        assert!(matches!(err, Error::EmptyRoots { .. }));
    }

    #[test]
    fn colliding_root_sites_keep_only_the_first() {
        let oracle = BoxOracle;
        let mut occupancy = OccupancyIndex::new(&oracle, bedrock_slab()).unwrap();
        let mut state = setup(5);
        // Both samples snap into the same 10-unit cell.
        let samples = vec![Vec3::new(11.0, 105.0, 1.0), Vec3::new(14.0, 102.0, 3.0)];
        let placed = generate_roots(
            &mut state,
            &catalog(),
            &mut occupancy,
            &samples,
            &config(),
            &mut (),
        )
        .unwrap();
        assert_eq!(placed, 1);
        assert_eq!(state.blocks.len(), 1);
    }
}

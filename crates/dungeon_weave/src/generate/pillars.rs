//! Vertical extension: grows support-pillar chains downward from pillar
//! anchors until they hit ground, another structure, or the depth floor.
use glam::Vec3;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::error::Result;
use crate::generate::events::{EventSink, GenEvent, GenEventKind};
use crate::generate::state::GenState;
use crate::generate::{Phase, PlacedProp, GRID_UNIT, PILLAR_FLOOR, TAG_PILLAR};
use crate::geom::{Aabb, GeometryOracle};
use crate::occupancy::OccupancyIndex;

/// Walks each pillar anchor downward in [`GRID_UNIT`] steps, placing a
/// weighted `"pillar"` prop per step. The chain ends at the first collision
/// (the colliding prop is discarded) or once the next step would pass
/// [`PILLAR_FLOOR`].
pub(crate) fn extend_pillars<O: GeometryOracle>(
    state: &mut GenState,
    catalog: &Catalog,
    occupancy: &mut OccupancyIndex<'_, O>,
    sink: &mut dyn EventSink,
) -> Result<usize> {
    if state.pillar_anchors.is_empty() {
        return Ok(0);
    }
    let candidates = catalog.props_tagged(Some(TAG_PILLAR));
    if candidates.is_empty() {
        warn!("No prop templates tagged '{TAG_PILLAR}'; skipping pillar extension.");
        if sink.wants(GenEventKind::Warning) {
            sink.send(GenEvent::Warning {
                context: "pillars".into(),
                message: format!("no prop templates tagged '{TAG_PILLAR}'"),
            });
        }
        return Ok(0);
    }
    let weights: Vec<f32> = candidates
        .iter()
        .map(|index| catalog.props[*index].weight)
        .collect();

    let anchors = state.pillar_anchors.clone();
    let mut placed = 0usize;
    for anchor in anchors {
        for step in 1..10 {
            let y = anchor.y - GRID_UNIT * step as f32;
            if y < PILLAR_FLOOR {
                break;
            }
            let template = *state.rng.weighted_choice(&candidates, &weights)?;
            let spec = &catalog.props[template];
            let position = Vec3::new(anchor.x, y, anchor.z);
            let footprint = Aabb::from_corners(position, position + spec.footprint);
            if occupancy.intersects(&footprint)? {
                // Reached bedrock or another structure; the chain is done.
                if sink.wants(GenEventKind::PropRejected) {
                    sink.send(GenEvent::PropRejected {
                        phase: Phase::Pillars,
                        template_id: spec.id.clone(),
                        position,
                    });
                }
                break;
            }
            state.props.push(PlacedProp {
                template_id: spec.id.clone(),
                position,
                footprint: spec.footprint,
            });
            if sink.wants(GenEventKind::PropPlaced) {
                sink.send(GenEvent::PropPlaced {
                    phase: Phase::Pillars,
                    template_id: spec.id.clone(),
                    position,
                });
            }
            placed += 1;
        }
    }

    info!("Pillars: placed {placed} segments.");
    Ok(placed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PropTemplate;
    use crate::generate::bedrock_slab;
    use crate::geom::BoxOracle;
    use crate::rng::{RandomSequence, Seed};

    fn pillar_catalog() -> Catalog {
        Catalog::new().with_prop(
            PropTemplate::new("pillar", 1.0, Vec3::splat(10.0)).with_tag(TAG_PILLAR),
        )
    }

    fn seeded() -> GenState {
        GenState::new(RandomSequence::seed(Some(&Seed::from(13u64))))
    }

    #[test]
    fn chain_stops_at_bedrock_collision() {
        let catalog = pillar_catalog();
        let oracle = BoxOracle;
        let mut occupancy = OccupancyIndex::new(&oracle, bedrock_slab()).unwrap();
        let mut state = seeded();
        state.pillar_anchors.push(Vec3::new(0.0, 15.0, 0.0));

        let placed = extend_pillars(&mut state, &catalog, &mut occupancy, &mut ()).unwrap();

        // Steps land at y = 5 and y = -5; the next segment at y = -15 spans
        // into bedrock and is discarded.
        assert_eq!(placed, 2);
        assert!(state
            .props
            .iter()
            .all(|p| p.position.y >= PILLAR_FLOOR));
    }

    #[test]
    fn chain_respects_depth_floor() {
        let catalog = pillar_catalog();
        let oracle = BoxOracle;
        // No bedrock in the way: sink it far below the chain.
        let deep = Aabb::from_corners(Vec3::splat(-5000.0), Vec3::new(5000.0, -4000.0, 5000.0));
        let mut occupancy = OccupancyIndex::new(&oracle, deep).unwrap();
        let mut state = seeded();
        state.pillar_anchors.push(Vec3::new(0.0, 5.0, 0.0));

        let placed = extend_pillars(&mut state, &catalog, &mut occupancy, &mut ()).unwrap();

        // y = -5 and y = -15 are legal; y = -25 passes the floor.
        assert_eq!(placed, 2);
        assert!(state.props.iter().all(|p| p.position.y >= PILLAR_FLOOR));
    }

    #[test]
    fn chain_stops_at_first_obstacle() {
        let catalog = pillar_catalog();
        let oracle = BoxOracle;
        let deep = Aabb::from_corners(Vec3::splat(-5000.0), Vec3::new(5000.0, -4000.0, 5000.0));
        let mut occupancy = OccupancyIndex::new(&oracle, deep).unwrap();
        // A slab occupying the second step.
        occupancy
            .add_accepted(Aabb::from_corners(
                Vec3::new(-20.0, 60.0, -20.0),
                Vec3::new(20.0, 70.0, 20.0),
            ))
            .unwrap();
        let mut state = seeded();
        state.pillar_anchors.push(Vec3::new(0.0, 85.0, 0.0));

        let placed = extend_pillars(&mut state, &catalog, &mut occupancy, &mut ()).unwrap();

        // First step at y = 75 is clear; the one at 65 hits the slab.
        assert_eq!(placed, 1);
        assert_eq!(state.props[0].position.y, 75.0);
    }

    #[test]
    fn no_anchors_no_props() {
        let catalog = pillar_catalog();
        let oracle = BoxOracle;
        let mut occupancy = OccupancyIndex::new(&oracle, bedrock_slab()).unwrap();
        let mut state = seeded();
        let placed = extend_pillars(&mut state, &catalog, &mut occupancy, &mut ()).unwrap();
        assert_eq!(placed, 0);
        assert!(state.props.is_empty());
    }
}

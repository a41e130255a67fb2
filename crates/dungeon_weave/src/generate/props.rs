//! Prop scatter: probabilistic decoration of surviving prop sockets.
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::error::Result;
use crate::generate::events::{EventSink, GenEvent, GenEventKind};
use crate::generate::state::GenState;
use crate::generate::{Phase, PlacedProp};
use crate::geom::{Aabb, GeometryOracle};
use crate::occupancy::OccupancyIndex;

/// Visits every socket once: draws one uniform value, and when it passes the
/// socket's spawn probability places a weighted prop restricted to the socket
/// sub-tag, discarding it on collision. No retries.
pub(crate) fn scatter_props<O: GeometryOracle>(
    state: &mut GenState,
    catalog: &Catalog,
    occupancy: &mut OccupancyIndex<'_, O>,
    sink: &mut dyn EventSink,
) -> Result<usize> {
    let sockets = state.prop_sockets.clone();
    let mut placed = 0usize;
    for socket in sockets {
        let roll = state.rng.rand01();
        if roll > socket.probability {
            continue;
        }

        let candidates = catalog.props_tagged(Some(&socket.tag));
        if candidates.is_empty() {
            warn!("No prop templates tagged '{}'; socket skipped.", socket.tag);
            if sink.wants(GenEventKind::Warning) {
                sink.send(GenEvent::Warning {
                    context: "props".into(),
                    message: format!("no prop templates tagged '{}'", socket.tag),
                });
            }
            continue;
        }
        let weights: Vec<f32> = candidates
            .iter()
            .map(|index| catalog.props[*index].weight)
            .collect();
        let template = *state.rng.weighted_choice(&candidates, &weights)?;
        let spec = &catalog.props[template];

        let footprint = Aabb::from_corners(socket.world, socket.world + spec.footprint);
        if occupancy.intersects(&footprint)? {
            if sink.wants(GenEventKind::PropRejected) {
                sink.send(GenEvent::PropRejected {
                    phase: Phase::Props,
                    template_id: spec.id.clone(),
                    position: socket.world,
                });
            }
            continue;
        }

        state.props.push(PlacedProp {
            template_id: spec.id.clone(),
            position: socket.world,
            footprint: spec.footprint,
        });
        if sink.wants(GenEventKind::PropPlaced) {
            sink.send(GenEvent::PropPlaced {
                phase: Phase::Props,
                template_id: spec.id.clone(),
                position: socket.world,
            });
        }
        placed += 1;
    }

    info!("Props: placed {placed} of {} sockets.", state.prop_sockets.len());
    Ok(placed)
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::catalog::PropTemplate;
    use crate::generate::bedrock_slab;
    use crate::generate::state::WorldSocket;
    use crate::geom::BoxOracle;
    use crate::rng::{RandomSequence, Seed};

    fn tree_catalog() -> Catalog {
        Catalog::new().with_prop(PropTemplate::new("oak", 1.0, Vec3::splat(5.0)).with_tag("tree"))
    }

    fn seeded() -> GenState {
        GenState::new(RandomSequence::seed(Some(&Seed::from(21u64))))
    }

    fn socket(probability: f32, world: Vec3) -> WorldSocket {
        WorldSocket {
            tag: "tree".into(),
            probability,
            world,
        }
    }

    #[test]
    fn certain_sockets_always_spawn() {
        let catalog = tree_catalog();
        let oracle = BoxOracle;
        let mut occupancy = OccupancyIndex::new(&oracle, bedrock_slab()).unwrap();
        let mut state = seeded();
        for i in 0..8 {
            state
                .prop_sockets
                .push(socket(1.0, Vec3::new(i as f32 * 20.0, 30.0, 0.0)));
        }

        let placed = scatter_props(&mut state, &catalog, &mut occupancy, &mut ()).unwrap();
        assert_eq!(placed, 8);
        assert_eq!(state.props.len(), 8);
    }

    #[test]
    fn colliding_props_are_discarded() {
        let catalog = tree_catalog();
        let oracle = BoxOracle;
        let mut occupancy = OccupancyIndex::new(&oracle, bedrock_slab()).unwrap();
        occupancy
            .add_accepted(Aabb::from_corners(
                Vec3::new(-10.0, 25.0, -10.0),
                Vec3::new(10.0, 45.0, 10.0),
            ))
            .unwrap();
        let mut state = seeded();
        state.prop_sockets.push(socket(1.0, Vec3::new(0.0, 30.0, 0.0)));

        let mut sink = crate::generate::events::VecSink::new();
        let placed = scatter_props(&mut state, &catalog, &mut occupancy, &mut sink).unwrap();

        assert_eq!(placed, 0);
        assert!(state.props.is_empty());
        assert!(sink
            .as_slice()
            .iter()
            .any(|e| matches!(e, GenEvent::PropRejected { .. })));
    }

    #[test]
    fn unknown_socket_tag_is_skipped() {
        let catalog = tree_catalog();
        let oracle = BoxOracle;
        let mut occupancy = OccupancyIndex::new(&oracle, bedrock_slab()).unwrap();
        let mut state = seeded();
        state.prop_sockets.push(WorldSocket {
            tag: "banner".into(),
            probability: 1.0,
            world: Vec3::new(0.0, 30.0, 0.0),
        });

        let placed = scatter_props(&mut state, &catalog, &mut occupancy, &mut ()).unwrap();
        assert_eq!(placed, 0);
    }

    #[test]
    fn one_draw_per_socket_keeps_streams_aligned() {
        // Two states with identical seeds but different probabilities consume
        // the same number of acceptance draws per socket.
        let catalog = tree_catalog();
        let oracle = BoxOracle;
        let mut occupancy = OccupancyIndex::new(&oracle, bedrock_slab()).unwrap();

        let mut never = seeded();
        never.prop_sockets.push(socket(0.0, Vec3::new(0.0, 30.0, 0.0)));
        scatter_props(&mut never, &catalog, &mut occupancy, &mut ()).unwrap();

        let mut always = seeded();
        always.prop_sockets.push(socket(1.0, Vec3::new(0.0, 30.0, 0.0)));
        scatter_props(&mut always, &catalog, &mut occupancy, &mut ()).unwrap();

        // After the socket roll, both streams sit at the same point only if
        // the rejected socket also consumed exactly one draw. The weighted
        // pick for the accepted socket consumes one more.
        let a = never.rng.rand01();
        let b = always.rng.rand01();
        assert_ne!(a, b);

        let mut reference = seeded();
        let _socket_roll = reference.rng.rand01();
        assert_eq!(a, reference.rng.rand01());
    }
}

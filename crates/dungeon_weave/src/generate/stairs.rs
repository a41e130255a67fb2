//! Stair insertion: bridges connector pairs separated by exactly one vertical
//! and one horizontal grid step.
use glam::Vec3;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::error::Result;
use crate::generate::events::{EventSink, GenEvent, GenEventKind};
use crate::generate::state::{GenState, PoolConnector};
use crate::generate::{Phase, CONNECTOR_STEP, TAG_STAIRS};
use crate::geom::{oriented_box, GeometryOracle, Yaw, POSITION_EPS};
use crate::occupancy::OccupancyIndex;

/// Scans unmatched connectors for bridgeable gaps and inserts up to
/// `max_count` stair blocks.
///
/// A pair qualifies when the upper connector (drawn from the unmatched
/// outputs) sits exactly [`CONNECTOR_STEP`] above the lower one (drawn from
/// either pool), offset by exactly one step on exactly one horizontal axis,
/// and the two belong to different blocks. The stair's yaw follows the sign
/// of the horizontal offset; its first input connector lands on the lower
/// connector. Matched connectors stay in the pools.
pub(crate) fn insert_stairs<O: GeometryOracle>(
    state: &mut GenState,
    catalog: &Catalog,
    occupancy: &mut OccupancyIndex<'_, O>,
    max_count: usize,
    sink: &mut dyn EventSink,
) -> Result<usize> {
    if max_count == 0 {
        return Ok(0);
    }
    let candidates = catalog.blocks_tagged(Some(TAG_STAIRS));
    if candidates.is_empty() {
        warn!("No block templates tagged '{TAG_STAIRS}'; skipping stair insertion.");
        if sink.wants(GenEventKind::Warning) {
            sink.send(GenEvent::Warning {
                context: "stairs".into(),
                message: format!("no block templates tagged '{TAG_STAIRS}'"),
            });
        }
        return Ok(0);
    }
    let weights: Vec<f32> = candidates
        .iter()
        .map(|index| catalog.blocks[*index].weight)
        .collect();

    let lowers: Vec<PoolConnector> = state
        .pool
        .inputs()
        .iter()
        .chain(state.pool.outputs())
        .cloned()
        .collect();
    let uppers: Vec<PoolConnector> = state.pool.outputs().to_vec();

    let mut placed = 0usize;
    for lower in &lowers {
        for upper in &uppers {
            if placed >= max_count {
                return Ok(placed);
            }
            if lower.owner == upper.owner {
                continue;
            }
            if !gap_qualifies(lower.world, upper.world) {
                continue;
            }

            let offset = lower.world - upper.world;
            let yaw = yaw_for_offset(offset);
            let template = *state.rng.weighted_choice(&candidates, &weights)?;
            let spec = &catalog.blocks[template];
            let Some(first_input) = spec.inputs.first() else {
                warn!("Stairs template '{}' has no input connector; skipping.", spec.id);
                continue;
            };

            let translation = lower.world - yaw.apply(*first_input);
            let footprint = oriented_box(spec.dims(), yaw, translation);
            if occupancy.intersects(&footprint)? {
                continue;
            }

            occupancy.add_accepted(footprint)?;
            let id = state.commit_block(catalog, template, yaw, translation, None);
            if sink.wants(GenEventKind::BlockPlaced) {
                sink.send(GenEvent::BlockPlaced {
                    phase: Phase::Stairs,
                    id,
                    template_id: catalog.blocks[template].id.clone(),
                    yaw,
                    translation,
                });
            }
            placed += 1;
        }
    }

    info!("Stairs: inserted {placed} of at most {max_count}.");
    Ok(placed)
}

/// Exactly one vertical step up and one horizontal step on exactly one axis.
fn gap_qualifies(lower: Vec3, upper: Vec3) -> bool {
    let rise = upper.y - lower.y;
    if (rise - CONNECTOR_STEP).abs() > POSITION_EPS {
        return false;
    }
    let dx = (upper.x - lower.x).abs();
    let dz = (upper.z - lower.z).abs();
    let x_step = (dx - CONNECTOR_STEP).abs() <= POSITION_EPS && dz <= POSITION_EPS;
    let z_step = (dz - CONNECTOR_STEP).abs() <= POSITION_EPS && dx <= POSITION_EPS;
    x_step != z_step
}

/// Yaw selected purely from the sign of the horizontal offset (lower − upper).
fn yaw_for_offset(offset: Vec3) -> Yaw {
    if offset.z > POSITION_EPS {
        Yaw::Deg180
    } else if offset.z < -POSITION_EPS {
        Yaw::Deg0
    } else if offset.x > POSITION_EPS {
        Yaw::Deg270
    } else {
        Yaw::Deg90
    }
}

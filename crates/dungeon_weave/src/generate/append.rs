//! Attachment phase: grows the connector graph by chaining new blocks onto
//! unmatched output connectors.
use glam::Vec3;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::generate::events::{EventSink, GenEvent, GenEventKind};
use crate::generate::state::GenState;
use crate::generate::{Phase, PLACEMENT_TRIES};
use crate::geom::{oriented_box, GeometryOracle, Yaw};
use crate::occupancy::OccupancyIndex;

/// A placement the search settled on, not yet committed to the state.
struct Attachment {
    yaw: Yaw,
    translation: Vec3,
    input: usize,
    pool_output: usize,
}

/// Attempts `amount` block attachments restricted to `tag`, returning how many
/// were accepted.
///
/// Each attempt instantiates one weighted-selected template with a random
/// starting yaw, then searches shuffled (input connector, pool output) pairs
/// under a shared budget of [`PLACEMENT_TRIES`] collision tests, rotating the
/// block in +90 degree steps at each pair. The first clear placement wins; a
/// budget exhausted without one discards the attempt entirely and the loop
/// moves on to a fresh template.
pub(crate) fn append_blocks<O: GeometryOracle>(
    state: &mut GenState,
    catalog: &Catalog,
    occupancy: &mut OccupancyIndex<'_, O>,
    amount: usize,
    tag: Option<&str>,
    phase: Phase,
    sink: &mut dyn EventSink,
) -> Result<usize> {
    if amount == 0 {
        return Ok(0);
    }
    let candidates = catalog.blocks_tagged(tag);
    if candidates.is_empty() {
        return Err(Error::Catalog(format!(
            "no block templates tagged '{}'",
            tag.unwrap_or("<any>")
        )));
    }
    let weights: Vec<f32> = candidates
        .iter()
        .map(|index| catalog.blocks[*index].weight)
        .collect();

    let mut accepted = 0usize;
    for _ in 0..amount {
        let template = *state.rng.weighted_choice(&candidates, &weights)?;
        let spec = &catalog.blocks[template];
        let base_yaw = state.rng.yaw();

        // Every (local input, foreign output) pairing is a candidate; the
        // shuffle breaks the bias toward connector declaration order while
        // staying seed-reproducible.
        let mut pairs: Vec<(usize, usize)> = Vec::new();
        for input in 0..spec.inputs.len() {
            for output in 0..state.pool.outputs().len() {
                pairs.push((input, output));
            }
        }
        state.rng.shuffle(&mut pairs);

        let mut tries = PLACEMENT_TRIES;
        let mut found: Option<Attachment> = None;
        'search: for (input, pool_output) in pairs {
            let target = state.pool.outputs()[pool_output].world;
            for step in 1..=4u8 {
                if tries == 0 {
                    break 'search;
                }
                let yaw = base_yaw.turned(step);
                let translation = target - yaw.apply(spec.inputs[input]);
                let footprint = oriented_box(spec.dims(), yaw, translation);
                tries -= 1;
                if !occupancy.intersects(&footprint)? {
                    found = Some(Attachment {
                        yaw,
                        translation,
                        input,
                        pool_output,
                    });
                    break 'search;
                }
            }
        }

        match found {
            Some(attachment) => {
                let footprint =
                    oriented_box(spec.dims(), attachment.yaw, attachment.translation);
                occupancy.add_accepted(footprint)?;
                state.pool.remove_output_at(attachment.pool_output);
                let id = state.commit_block(
                    catalog,
                    template,
                    attachment.yaw,
                    attachment.translation,
                    Some(attachment.input),
                );

                // Flush-mounted leftovers around the new block are unusable;
                // drop both sides of every coincident pair.
                let locals: Vec<Vec3> = spec
                    .inputs
                    .iter()
                    .chain(&spec.outputs)
                    .map(|local| attachment.yaw.apply(*local) + attachment.translation)
                    .collect();
                let pruned = state.pool.prune_coincident(id, &locals);
                if pruned > 0 {
                    debug!("Pruned {pruned} coincident connectors around block {id:?}.");
                }

                if sink.wants(GenEventKind::BlockPlaced) {
                    sink.send(GenEvent::BlockPlaced {
                        phase,
                        id,
                        template_id: catalog.blocks[template].id.clone(),
                        yaw: attachment.yaw,
                        translation: attachment.translation,
                    });
                }
                accepted += 1;
            }
            None => {
                warn!(
                    "Placement budget exhausted for template '{}' during {phase}; discarding attempt.",
                    spec.id
                );
                if sink.wants(GenEventKind::BlockRejected) {
                    sink.send(GenEvent::BlockRejected {
                        phase,
                        template_id: spec.id.clone(),
                        tries_used: PLACEMENT_TRIES - tries,
                    });
                }
            }
        }
    }

    info!("{phase}: accepted {accepted} of {amount} requested blocks.");
    Ok(accepted)
}

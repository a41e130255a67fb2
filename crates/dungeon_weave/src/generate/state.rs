//! Mutable session state for one generation run: the block arena, the
//! unmatched-connector pools, and the marker points later phases consume.
use glam::Vec3;

use crate::catalog::{Catalog, Tag};
use crate::generate::{BlockId, PlacedBlock, PlacedProp};
use crate::geom::POSITION_EPS;
use crate::rng::RandomSequence;

/// An unmatched connector waiting in one of the two global pools.
#[derive(Clone, Debug)]
pub struct PoolConnector {
    pub owner: BlockId,
    pub world: Vec3,
}

/// Ordered pools of unmatched input and output connectors across all placed
/// blocks. A connector lives in at most one pool until it is matched, pruned,
/// or the run tears down.
#[derive(Debug, Default)]
pub struct ConnectorPool {
    inputs: Vec<PoolConnector>,
    outputs: Vec<PoolConnector>,
}

impl ConnectorPool {
    pub fn inputs(&self) -> &[PoolConnector] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[PoolConnector] {
        &self.outputs
    }

    pub fn register_input(&mut self, connector: PoolConnector) {
        self.inputs.push(connector);
    }

    pub fn register_output(&mut self, connector: PoolConnector) {
        self.outputs.push(connector);
    }

    /// Removes and returns the output at `index`, preserving pool order.
    pub fn remove_output_at(&mut self, index: usize) -> PoolConnector {
        self.outputs.remove(index)
    }

    /// Coincidence pruning after a block is attached.
    ///
    /// Connectors of other blocks that now sit flush against one of the new
    /// block's connectors (same world position within [`POSITION_EPS`]) are
    /// physically unusable; both members of every such pair leave the pools.
    /// Returns the number of connectors removed.
    pub fn prune_coincident(&mut self, owner: BlockId, local_worlds: &[Vec3]) -> usize {
        let mut matched_locals: Vec<Vec3> = Vec::new();
        let mut removed = 0;

        for pool in [&mut self.inputs, &mut self.outputs] {
            pool.retain(|entry| {
                if entry.owner == owner {
                    return true;
                }
                match local_worlds.iter().find(|l| coincident(**l, entry.world)) {
                    Some(local) => {
                        matched_locals.push(*local);
                        removed += 1;
                        false
                    }
                    None => true,
                }
            });
        }

        if matched_locals.is_empty() {
            return 0;
        }
        for pool in [&mut self.inputs, &mut self.outputs] {
            pool.retain(|entry| {
                let flush = entry.owner == owner
                    && matched_locals.iter().any(|l| coincident(*l, entry.world));
                if flush {
                    removed += 1;
                }
                !flush
            });
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.inputs.len() + self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty() && self.outputs.is_empty()
    }

    pub fn clear(&mut self) {
        self.inputs.clear();
        self.outputs.clear();
    }
}

#[inline]
fn coincident(a: Vec3, b: Vec3) -> bool {
    (a - b).length_squared() <= POSITION_EPS * POSITION_EPS
}

/// A prop socket resolved into world space, waiting for the scatter phase.
#[derive(Clone, Debug)]
pub struct WorldSocket {
    pub tag: Tag,
    pub probability: f32,
    pub world: Vec3,
}

/// Everything one generation run mutates. Exclusively owned by that run.
pub struct GenState {
    pub blocks: Vec<PlacedBlock>,
    pub props: Vec<PlacedProp>,
    pub pool: ConnectorPool,
    pub pillar_anchors: Vec<Vec3>,
    pub prop_sockets: Vec<WorldSocket>,
    pub rng: RandomSequence,
}

impl GenState {
    pub fn new(rng: RandomSequence) -> Self {
        Self {
            blocks: Vec::new(),
            props: Vec::new(),
            pool: ConnectorPool::default(),
            pillar_anchors: Vec::new(),
            prop_sockets: Vec::new(),
            rng,
        }
    }

    /// Commits an accepted block: pushes it into the arena and registers its
    /// connectors, pillar anchors, and prop sockets in world space.
    ///
    /// `skip_input` is the index of the input connector consumed by the
    /// attachment that placed this block; it never enters the pools.
    pub(crate) fn commit_block(
        &mut self,
        catalog: &Catalog,
        template: usize,
        yaw: crate::geom::Yaw,
        translation: Vec3,
        skip_input: Option<usize>,
    ) -> BlockId {
        let spec = &catalog.blocks[template];
        let id = BlockId(self.blocks.len() as u32);
        let block = PlacedBlock {
            id,
            template,
            template_id: spec.id.clone(),
            yaw,
            translation,
            dims: spec.dims(),
        };

        for (index, local) in spec.inputs.iter().enumerate() {
            if skip_input == Some(index) {
                continue;
            }
            self.pool.register_input(PoolConnector {
                owner: id,
                world: block.world_point(*local),
            });
        }
        for local in &spec.outputs {
            self.pool.register_output(PoolConnector {
                owner: id,
                world: block.world_point(*local),
            });
        }
        for local in &spec.pillar_anchors {
            self.pillar_anchors.push(block.world_point(*local));
        }
        for socket in &spec.prop_sockets {
            self.prop_sockets.push(WorldSocket {
                tag: socket.tag.clone(),
                probability: socket.probability,
                world: block.world_point(socket.offset),
            });
        }

        self.blocks.push(block);
        id
    }
}

//! Generation pipeline: root placement, connector-graph growth, stair
//! insertion, pillar extension, and prop scatter, sequenced by the runner.
use std::fmt;

use glam::Vec3;

use crate::geom::{oriented_box, Aabb, Yaw};

pub mod events;
pub mod runner;
pub mod state;

pub(crate) mod append;
pub(crate) mod pillars;
pub(crate) mod props;
pub(crate) mod roots;
pub(crate) mod stairs;

/// World-space grid that root positions snap to, and the pillar step height.
pub const GRID_UNIT: f32 = 10.0;

/// Vertical and horizontal step bridged by a single stair block. Connectors
/// sit on this half-grid.
pub const CONNECTOR_STEP: f32 = 5.0;

/// Shared geometric-test budget for one block attachment attempt.
pub const PLACEMENT_TRIES: u32 = 50;

/// Pillar chains never extend below this world height.
pub const PILLAR_FLOOR: f32 = -20.0;

/// Upper bound on full root passes before generation fails with
/// [`crate::error::Error::EmptyRoots`].
pub const MAX_ROOT_PASSES: usize = 32;

/// Top of the static bedrock slab that blocks underground growth.
pub const BEDROCK_TOP: f32 = -10.0;

pub(crate) const BEDROCK_HALF_EXTENT: f32 = 10_000.0;
pub(crate) const BEDROCK_DEPTH: f32 = 1_000.0;

/// Structural tier tags the orchestrator builds with.
pub const TAG_BASE: &str = "base";
pub const TAG_INFRASTRUCTURE: &str = "infrastructure";
pub const TAG_STAIRS: &str = "stairs";
pub const TAG_PILLAR: &str = "pillar";

/// The generation phases, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    Roots,
    Tier1,
    Tier2,
    Stairs,
    Pillars,
    Props,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Roots => "roots",
            Phase::Tier1 => "tier-1 attachment",
            Phase::Tier2 => "tier-2 attachment",
            Phase::Stairs => "stairs",
            Phase::Pillars => "pillars",
            Phase::Props => "props",
        };
        f.write_str(name)
    }
}

/// Opaque id of a placed block, stable for the lifetime of one run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockId(pub u32);

/// An accepted block instance in final position.
#[non_exhaustive]
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacedBlock {
    pub id: BlockId,
    /// Index into [`crate::catalog::Catalog::blocks`].
    pub template: usize,
    pub template_id: String,
    pub yaw: Yaw,
    pub translation: Vec3,
    /// Footprint extents in world units, local to the block origin.
    pub dims: Vec3,
}

impl PlacedBlock {
    /// World-space footprint of this block.
    pub fn footprint(&self) -> Aabb {
        oriented_box(self.dims, self.yaw, self.translation)
    }

    /// Lifts a block-local point into world space.
    pub fn world_point(&self, local: Vec3) -> Vec3 {
        self.yaw.apply(local) + self.translation
    }
}

/// An accepted prop instance in final position.
#[non_exhaustive]
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacedProp {
    pub template_id: String,
    pub position: Vec3,
    /// Collision extents in world units, rooted at `position`.
    pub footprint: Vec3,
}

impl PlacedProp {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_corners(self.position, self.position + self.footprint)
    }
}

/// The bedrock proxy volume used by every collision query.
pub(crate) fn bedrock_slab() -> Aabb {
    Aabb::from_corners(
        Vec3::new(-BEDROCK_HALF_EXTENT, BEDROCK_TOP - BEDROCK_DEPTH, -BEDROCK_HALF_EXTENT),
        Vec3::new(BEDROCK_HALF_EXTENT, BEDROCK_TOP, BEDROCK_HALF_EXTENT),
    )
}

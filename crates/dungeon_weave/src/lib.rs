#![forbid(unsafe_code)]
//! dungeon_weave: procedural dungeon growth over a connector graph.
//!
//! Modules:
//! - catalog: weighted block and prop templates with connectors, anchors, and sockets
//! - geom: yaw rotations, axis-aligned footprints, and the geometry-oracle seam
//! - occupancy: batched union index answering collision queries
//! - terrain: height-field seam supplying root candidate positions
//! - generate: the phase pipeline (roots, attachment tiers, stairs, pillars, props)
//!
//! For examples and docs, see README and docs.rs.
pub mod catalog;
pub mod error;
pub mod generate;
pub mod geom;
pub mod occupancy;
pub mod rng;
pub mod terrain;

/// Convenient re-exports for common types. Import with `use dungeon_weave::prelude::*;`.
pub mod prelude {
    pub use crate::catalog::{BlockTemplate, Catalog, PropSocket, PropTemplate, Tag};
    pub use crate::error::{Error, Result};
    pub use crate::generate::events::{EventSink, FnSink, GenEvent, GenEventKind, VecSink};
    pub use crate::generate::runner::{DungeonGenerator, GenerationConfig, GenerationReport};
    pub use crate::generate::{
        BlockId, Phase, PlacedBlock, PlacedProp, TAG_BASE, TAG_INFRASTRUCTURE, TAG_PILLAR,
        TAG_STAIRS,
    };
    pub use crate::geom::{oriented_box, Aabb, BoxOracle, BoxSet, GeometryOracle, Yaw};
    pub use crate::occupancy::{OccupancyIndex, UNION_BATCH};
    pub use crate::rng::{RandomSequence, Seed};
    pub use crate::terrain::{FixedTerrain, GridTerrain, TerrainSampler};
}

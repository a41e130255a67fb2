//! Template catalog: the immutable block and prop descriptions that drive
//! weighted selection and placement.
//!
//! Loading the catalog from disk (or any other source) is the host's job; this
//! module only defines the schema and the validation the generator requires
//! before a run may start.
use glam::Vec3;

use crate::error::{Error, Result};
use crate::generate::GRID_UNIT;

/// Classification label restricting weighted selection (structural tier,
/// decoration category).
pub type Tag = String;

/// A decoration point on a block: a sub-tag, a spawn probability, and a local
/// offset.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropSocket {
    pub tag: Tag,
    pub probability: f32,
    pub offset: Vec3,
}

impl PropSocket {
    pub fn new(tag: impl Into<Tag>, probability: f32, offset: Vec3) -> Self {
        Self {
            tag: tag.into(),
            probability,
            offset,
        }
    }
}

/// An immutable room-like structural piece.
///
/// `size` is the footprint in 10-unit grid cells; connector, anchor, and
/// socket offsets are in world units, local to the block origin.
#[non_exhaustive]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockTemplate {
    pub id: String,
    pub tags: Vec<Tag>,
    pub weight: f32,
    pub size: Vec3,
    pub inputs: Vec<Vec3>,
    pub outputs: Vec<Vec3>,
    pub pillar_anchors: Vec<Vec3>,
    pub prop_sockets: Vec<PropSocket>,
}

impl BlockTemplate {
    pub fn new(id: impl Into<String>, weight: f32, size: Vec3) -> Self {
        Self {
            id: id.into(),
            tags: Vec::new(),
            weight,
            size,
            inputs: Vec::new(),
            outputs: Vec::new(),
            pillar_anchors: Vec::new(),
            prop_sockets: Vec::new(),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<Tag>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_input(mut self, offset: Vec3) -> Self {
        self.inputs.push(offset);
        self
    }

    pub fn with_output(mut self, offset: Vec3) -> Self {
        self.outputs.push(offset);
        self
    }

    pub fn with_pillar_anchor(mut self, offset: Vec3) -> Self {
        self.pillar_anchors.push(offset);
        self
    }

    pub fn with_prop_socket(mut self, socket: PropSocket) -> Self {
        self.prop_sockets.push(socket);
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Footprint extents in world units.
    pub fn dims(&self) -> Vec3 {
        self.size * GRID_UNIT
    }
}

/// An immutable decoration piece. `footprint` is its collision extents in
/// world units, rooted at the prop origin.
#[non_exhaustive]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropTemplate {
    pub id: String,
    pub tags: Vec<Tag>,
    pub weight: f32,
    pub footprint: Vec3,
}

impl PropTemplate {
    pub fn new(id: impl Into<String>, weight: f32, footprint: Vec3) -> Self {
        Self {
            id: id.into(),
            tags: Vec::new(),
            weight,
            footprint,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<Tag>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// The loaded template catalog.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Catalog {
    pub blocks: Vec<BlockTemplate>,
    pub props: Vec<PropTemplate>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_block(mut self, block: BlockTemplate) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn with_prop(mut self, prop: PropTemplate) -> Self {
        self.props.push(prop);
        self
    }

    /// Checks every entry, surfacing problems before generation starts.
    pub fn validate(&self) -> Result<()> {
        for block in &self.blocks {
            if block.id.is_empty() {
                return Err(Error::Catalog("block template with empty id".into()));
            }
            if !block.weight.is_finite() || block.weight < 0.0 {
                return Err(Error::Catalog(format!(
                    "block '{}' has invalid weight {}",
                    block.id, block.weight
                )));
            }
            if block.size.cmple(Vec3::ZERO).any() {
                return Err(Error::Catalog(format!(
                    "block '{}' has non-positive footprint {:?}",
                    block.id, block.size
                )));
            }
            for socket in &block.prop_sockets {
                if !(0.0..=1.0).contains(&socket.probability) {
                    return Err(Error::Catalog(format!(
                        "block '{}' socket '{}' probability {} outside [0, 1]",
                        block.id, socket.tag, socket.probability
                    )));
                }
            }
        }
        for prop in &self.props {
            if prop.id.is_empty() {
                return Err(Error::Catalog("prop template with empty id".into()));
            }
            if !prop.weight.is_finite() || prop.weight < 0.0 {
                return Err(Error::Catalog(format!(
                    "prop '{}' has invalid weight {}",
                    prop.id, prop.weight
                )));
            }
            if prop.footprint.cmple(Vec3::ZERO).any() {
                return Err(Error::Catalog(format!(
                    "prop '{}' has non-positive footprint {:?}",
                    prop.id, prop.footprint
                )));
            }
        }
        Ok(())
    }

    /// Indices of blocks carrying `tag`, or all blocks when `tag` is absent.
    pub fn blocks_tagged(&self, tag: Option<&str>) -> Vec<usize> {
        self.blocks
            .iter()
            .enumerate()
            .filter(|(_, block)| tag.map_or(true, |t| block.has_tag(t)))
            .map(|(index, _)| index)
            .collect()
    }

    /// Indices of props carrying `tag`, or all props when `tag` is absent.
    pub fn props_tagged(&self, tag: Option<&str>) -> Vec<usize> {
        self.props
            .iter()
            .enumerate()
            .filter(|(_, prop)| tag.map_or(true, |t| prop.has_tag(t)))
            .map(|(index, _)| index)
            .collect()
    }
}

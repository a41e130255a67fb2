//! Geometric primitives: axis-aligned yaw rotations, boxes, and the
//! collision-oracle seam.
//!
//! Placed blocks carry a single world transform (translation plus one of four
//! yaw rotations) and all rotation/translation is composed algebraically here,
//! so placement never depends on an external scene graph's mutation order.
use glam::Vec3;

use crate::error::{Error, Result};

/// Tolerance for world-position comparisons (connector coincidence, stair gap
/// checks). The connector grid is 5 world units, so 1e-3 is far below any
/// legitimate separation.
pub const POSITION_EPS: f32 = 1e-3;

/// Contact tolerance for overlap tests. Attached blocks sit flush at their
/// connectors; shared faces must not register as collisions.
pub const CONTACT_EPS: f32 = 1e-3;

/// One of the four axis-aligned yaw rotations about +Y.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Yaw {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Yaw {
    pub const ALL: [Yaw; 4] = [Yaw::Deg0, Yaw::Deg90, Yaw::Deg180, Yaw::Deg270];

    pub fn degrees(self) -> f32 {
        match self {
            Yaw::Deg0 => 0.0,
            Yaw::Deg90 => 90.0,
            Yaw::Deg180 => 180.0,
            Yaw::Deg270 => 270.0,
        }
    }

    /// Rotation advanced by the given number of quarter turns.
    pub fn turned(self, quarter_turns: u8) -> Yaw {
        let index = Yaw::ALL.iter().position(|y| *y == self).expect("member of ALL");
        Yaw::ALL[(index + quarter_turns as usize) % 4]
    }

    /// Applies this rotation to a vector (rotation about +Y, right-handed).
    pub fn apply(self, v: Vec3) -> Vec3 {
        match self {
            Yaw::Deg0 => v,
            Yaw::Deg90 => Vec3::new(v.z, v.y, -v.x),
            Yaw::Deg180 => Vec3::new(-v.x, v.y, -v.z),
            Yaw::Deg270 => Vec3::new(-v.z, v.y, v.x),
        }
    }
}

/// Axis-aligned box in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Builds a box from two opposite corners in any order.
    pub fn from_corners(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Strict interior overlap: touching faces within [`CONTACT_EPS`] do not
    /// count as an intersection.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x + CONTACT_EPS < other.max.x
            && other.min.x + CONTACT_EPS < self.max.x
            && self.min.y + CONTACT_EPS < other.max.y
            && other.min.y + CONTACT_EPS < self.max.y
            && self.min.z + CONTACT_EPS < other.max.z
            && other.min.z + CONTACT_EPS < self.max.z
    }
}

/// World-space box spanned by local extents `dims` rooted at the local origin,
/// rotated by `yaw` about that origin and then translated.
pub fn oriented_box(dims: Vec3, yaw: Yaw, translation: Vec3) -> Aabb {
    let a = translation;
    let b = yaw.apply(dims) + translation;
    Aabb::from_corners(a, b)
}

/// Boolean-geometry seam used by the occupancy index.
///
/// `intersects` may be conservative (false positives only cost quality) but
/// must never report two genuinely overlapping solids as disjoint. Failures
/// from either operation are fatal to the running generation.
pub trait GeometryOracle {
    type Volume;

    /// Lifts a world-space box into the oracle's volume representation.
    fn volume(&self, footprint: Aabb) -> Result<Self::Volume>;

    fn intersects(&self, a: &Self::Volume, b: &Self::Volume) -> Result<bool>;

    fn union(&self, a: Self::Volume, b: Self::Volume) -> Result<Self::Volume>;
}

/// A union of axis-aligned boxes.
#[derive(Clone, Debug, Default)]
pub struct BoxSet {
    boxes: Vec<Aabb>,
}

impl BoxSet {
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

/// Exact [`GeometryOracle`] over axis-aligned boxes: unions concatenate,
/// intersection tests every pair.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoxOracle;

impl GeometryOracle for BoxOracle {
    type Volume = BoxSet;

    fn volume(&self, footprint: Aabb) -> Result<BoxSet> {
        if !(footprint.min.cmple(footprint.max).all()) {
            return Err(Error::Oracle("degenerate box volume".into()));
        }
        Ok(BoxSet {
            boxes: vec![footprint],
        })
    }

    fn intersects(&self, a: &BoxSet, b: &BoxSet) -> Result<bool> {
        Ok(a.boxes
            .iter()
            .any(|ba| b.boxes.iter().any(|bb| ba.overlaps(bb))))
    }

    fn union(&self, mut a: BoxSet, mut b: BoxSet) -> Result<BoxSet> {
        a.boxes.append(&mut b.boxes);
        Ok(a)
    }
}

//! Batched spatial-occupancy index over accepted footprints.
//!
//! Collision queries must stay cheap as the accepted set grows into the
//! hundreds. One ever-growing union would make inserts O(n); testing every
//! footprint individually would make queries O(n). Batching up to
//! [`UNION_BATCH`] footprints per union bounds per-union cost and keeps the
//! union count linear in `accepted / UNION_BATCH`.
use crate::error::Result;
use crate::geom::{Aabb, GeometryOracle};

/// Accepted footprints per occupancy union before a new union is started.
pub const UNION_BATCH: usize = 15;

/// Occupancy state for one generation run: the union list plus the static
/// bedrock volume that keeps structures from growing underground.
pub struct OccupancyIndex<'a, O: GeometryOracle> {
    oracle: &'a O,
    unions: Vec<O::Volume>,
    open_members: usize,
    bedrock: O::Volume,
    accepted: usize,
}

impl<'a, O: GeometryOracle> OccupancyIndex<'a, O> {
    pub fn new(oracle: &'a O, bedrock: Aabb) -> Result<Self> {
        Ok(Self {
            oracle,
            unions: Vec::new(),
            open_members: 0,
            bedrock: oracle.volume(bedrock)?,
            accepted: 0,
        })
    }

    /// Folds an accepted footprint into the open union, starting a fresh one
    /// once the batch is full.
    pub fn add_accepted(&mut self, footprint: Aabb) -> Result<()> {
        let volume = self.oracle.volume(footprint)?;
        if self.unions.is_empty() || self.open_members >= UNION_BATCH {
            self.unions.push(volume);
            self.open_members = 1;
        } else {
            let open = self.unions.pop().expect("open union present");
            self.unions.push(self.oracle.union(open, volume)?);
            self.open_members += 1;
        }
        self.accepted += 1;
        Ok(())
    }

    /// Whether the candidate overlaps anything accepted so far or bedrock.
    /// Short-circuits on the first hit.
    pub fn intersects(&self, candidate: &Aabb) -> Result<bool> {
        let volume = self.oracle.volume(*candidate)?;
        for union in &self.unions {
            if self.oracle.intersects(union, &volume)? {
                return Ok(true);
            }
        }
        self.oracle.intersects(&self.bedrock, &volume)
    }

    pub fn union_count(&self) -> usize {
        self.unions.len()
    }

    pub fn accepted_count(&self) -> usize {
        self.accepted
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::geom::BoxOracle;

    fn bedrock() -> Aabb {
        Aabb::from_corners(
            Vec3::new(-1000.0, -1000.0, -1000.0),
            Vec3::new(1000.0, -10.0, 1000.0),
        )
    }

    fn cell(index: usize) -> Aabb {
        let origin = Vec3::new(index as f32 * 20.0, 0.0, 0.0);
        Aabb::from_corners(origin, origin + Vec3::splat(10.0))
    }

    #[test]
    fn unions_roll_over_at_batch_capacity() {
        let oracle = BoxOracle;
        let mut index = OccupancyIndex::new(&oracle, bedrock()).unwrap();
        for i in 0..UNION_BATCH {
            index.add_accepted(cell(i)).unwrap();
        }
        assert_eq!(index.union_count(), 1);

        index.add_accepted(cell(UNION_BATCH)).unwrap();
        assert_eq!(index.union_count(), 2);
        assert_eq!(index.accepted_count(), UNION_BATCH + 1);
    }

    #[test]
    fn query_covers_every_union() {
        let oracle = BoxOracle;
        let mut index = OccupancyIndex::new(&oracle, bedrock()).unwrap();
        for i in 0..(UNION_BATCH * 2) {
            index.add_accepted(cell(i)).unwrap();
        }
        // Hits in the first and the second union, plus a clear miss.
        assert!(index.intersects(&cell(0)).unwrap());
        assert!(index.intersects(&cell(UNION_BATCH + 3)).unwrap());
        let miss = Aabb::from_corners(Vec3::new(0.0, 50.0, 0.0), Vec3::new(5.0, 55.0, 5.0));
        assert!(!index.intersects(&miss).unwrap());
    }

    #[test]
    fn bedrock_blocks_underground_candidates() {
        let oracle = BoxOracle;
        let index = OccupancyIndex::new(&oracle, bedrock()).unwrap();
        let underground = Aabb::from_corners(Vec3::new(0.0, -30.0, 0.0), Vec3::new(10.0, -20.0, 10.0));
        assert!(index.intersects(&underground).unwrap());
    }
}

//! Terrain sampling seam: root anchors are drawn from a height field supplied
//! by the host.
//!
//! The trait boundary uses `mint` vectors so external samplers do not need to
//! depend on this crate's math stack.
use mint::Vector3;

/// Supplies candidate root positions on the terrain surface.
///
/// Implementations must be deterministic for a given `seed_offset` (the
/// ambient offset produced by [`crate::rng::RandomSequence::seed`]) so a
/// seeded run can be replayed.
pub trait TerrainSampler: Send + Sync {
    fn height_field(&self, seed_offset: f32) -> Vec<Vector3<f32>>;
}

/// A fixed list of sample points, ignoring the seed offset. Useful for tests
/// and for hosts that already computed their terrain vertices.
#[derive(Debug, Clone, Default)]
pub struct FixedTerrain {
    pub points: Vec<Vector3<f32>>,
}

impl FixedTerrain {
    pub fn new(points: Vec<Vector3<f32>>) -> Self {
        Self { points }
    }
}

impl TerrainSampler for FixedTerrain {
    fn height_field(&self, _seed_offset: f32) -> Vec<Vector3<f32>> {
        self.points.clone()
    }
}

/// Hash-noise heights over a regular grid centered on the origin.
#[derive(Debug, Clone)]
pub struct GridTerrain {
    /// Half-extent of the sampled square in world units.
    pub half_extent: f32,
    /// Spacing between sample points in world units.
    pub spacing: f32,
    /// Maximum height in world units.
    pub amplitude: f32,
}

impl GridTerrain {
    pub fn new(half_extent: f32, spacing: f32, amplitude: f32) -> Self {
        Self {
            half_extent,
            spacing,
            amplitude,
        }
    }
}

impl TerrainSampler for GridTerrain {
    fn height_field(&self, seed_offset: f32) -> Vec<Vector3<f32>> {
        if self.spacing <= 0.0 || self.half_extent <= 0.0 {
            return Vec::new();
        }
        let steps = (2.0 * self.half_extent / self.spacing).floor() as i32;
        let salt = seed_offset.to_bits() as u64;
        let mut points = Vec::with_capacity((steps.max(0) as usize + 1).pow(2));
        for i in 0..=steps {
            for j in 0..=steps {
                let x = -self.half_extent + i as f32 * self.spacing;
                let z = -self.half_extent + j as f32 * self.spacing;
                let y = self.amplitude * hash01(i as u64, j as u64, salt);
                points.push(Vector3 { x, y, z });
            }
        }
        points
    }
}

#[inline]
fn hash01(i: u64, j: u64, salt: u64) -> f32 {
    let mut x = salt ^ i.wrapping_mul(0x9E3779B97F4A7C15) ^ j.wrapping_mul(0xBF58476D1CE4E5B9);
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58476D1CE4E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D049BB133111EB);
    x ^= x >> 31;
    (x >> 40) as f32 / (1u64 << 24) as f32
}

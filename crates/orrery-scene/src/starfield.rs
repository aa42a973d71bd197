//! Background star positions scattered through a cube around the origin.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Generates a deterministic star cloud from a seed.
pub struct StarfieldGenerator {
    seed: u64,
    star_count: u32,
    extent: f32,
}

impl StarfieldGenerator {
    /// `extent` is the half-width of the cube: every coordinate lies in
    /// `[-extent, extent]`.
    pub fn new(seed: u64, star_count: u32, extent: f32) -> Self {
        Self {
            seed,
            star_count,
            extent,
        }
    }

    /// Star positions, uniform per axis. Deterministic for a given seed.
    pub fn generate(&self) -> Vec<Vec3> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut coordinate = || (rng.random::<f32>() - 0.5) * 2.0 * self.extent;
        (0..self.star_count)
            .map(|_| {
                let x = coordinate();
                let y = coordinate();
                let z = coordinate();
                Vec3::new(x, y, z)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_count() {
        assert_eq!(StarfieldGenerator::new(1, 2000, 1000.0).generate().len(), 2000);
        assert!(StarfieldGenerator::new(1, 0, 1000.0).generate().is_empty());
    }

    #[test]
    fn test_stars_within_cube() {
        for star in StarfieldGenerator::new(5, 2000, 1000.0).generate() {
            assert!(
                star.abs().max_element() <= 1000.0,
                "star outside the cube: {star:?}"
            );
        }
    }

    #[test]
    fn test_deterministic_generation() {
        let a = StarfieldGenerator::new(42, 100, 1000.0).generate();
        let b = StarfieldGenerator::new(42, 100, 1000.0).generate();
        assert_eq!(a, b);
        let c = StarfieldGenerator::new(43, 100, 1000.0).generate();
        assert_ne!(a, c);
    }

    #[test]
    fn test_stars_spread_over_octants() {
        let stars = StarfieldGenerator::new(7, 2000, 1000.0).generate();
        let mut octants = [0u32; 8];
        for s in &stars {
            let index = (s.x > 0.0) as usize | ((s.y > 0.0) as usize) << 1 | ((s.z > 0.0) as usize) << 2;
            octants[index] += 1;
        }
        assert!(octants.iter().all(|&n| n > 150), "uneven spread: {octants:?}");
    }
}

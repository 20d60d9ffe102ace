//! # Noise Field
//!
//! Octave Perlin noise turned into integer column heights.
//!
//! Sampling is a pure function of the world column and the parameters; the
//! only state is the seeded permutation table, which is never mutated. Any
//! number of threads can sample the same field.

use noise::{NoiseFn, Perlin};

use crate::config::NoiseParams;

/// Deterministic 2D height noise.
#[derive(Clone, Copy, Debug)]
pub struct NoiseField {
    perlin: Perlin,
}

impl NoiseField {
    /// Creates a field with a fixed seed.
    pub fn new(seed: u32) -> Self {
        NoiseField {
            perlin: Perlin::new(seed),
        }
    }

    /// Samples the height of world column (`world_x`, `world_y`).
    ///
    /// Octave `i` contributes noise at frequency `scale * 2^i` with amplitude
    /// `persistence^i`. The sum is normalized by the total amplitude, mapped
    /// from [-1, 1] onto [`min`, `max`] and rounded. Zero octaves give the
    /// middle of the range. A reversed range is read as `[max, min]`.
    #[allow(clippy::too_many_arguments)]
    pub fn sample(
        &self,
        world_x: i64,
        world_y: i64,
        persistence: f64,
        octaves: u32,
        scale: f64,
        min: i32,
        max: i32,
    ) -> i32 {
        let (low, high) = if min <= max { (min, max) } else { (max, min) };

        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = scale;
        let mut max_value = 0.0;

        for _ in 0..octaves {
            total += self
                .perlin
                .get([world_x as f64 * frequency, world_y as f64 * frequency])
                * amplitude;
            max_value += amplitude;
            amplitude *= persistence;
            frequency *= 2.0;
        }

        let normalized = if max_value > 0.0 { total / max_value } else { 0.0 };
        let unit = ((normalized + 1.0) * 0.5).clamp(0.0, 1.0);
        let height = low as f64 + unit * (high as f64 - low as f64);

        (height.round() as i32).clamp(low, high)
    }

    /// [`NoiseField::sample`] with the parameters taken from `params`.
    pub fn sample_with(&self, world_x: i64, world_y: i64, params: &NoiseParams) -> i32 {
        self.sample(
            world_x,
            world_y,
            params.persistence,
            params.octaves,
            params.scale,
            params.min_height,
            params.max_height,
        )
    }
}

/// Anything that can report the surface height of a world column.
///
/// The chunk generator is driven through this trait so terrain can come from
/// the noise field or from a fixed height map.
pub trait HeightSource: Send + Sync {
    /// Height of the column at world coordinates (`world_x`, `world_y`).
    fn height_at(&self, world_x: i64, world_y: i64) -> i32;
}

/// The noise field bound to a fixed set of parameters.
#[derive(Clone, Copy, Debug)]
pub struct TerrainNoise {
    field: NoiseField,
    params: NoiseParams,
}

impl TerrainNoise {
    /// Creates the height source described by `params`.
    pub fn new(params: NoiseParams) -> Self {
        TerrainNoise {
            field: NoiseField::new(params.seed),
            params,
        }
    }
}

impl HeightSource for TerrainNoise {
    fn height_at(&self, world_x: i64, world_y: i64) -> i32 {
        self.field.sample_with(world_x, world_y, &self.params)
    }
}

impl<F> HeightSource for F
where
    F: Fn(i64, i64) -> i32 + Send + Sync,
{
    fn height_at(&self, world_x: i64, world_y: i64) -> i32 {
        self(world_x, world_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_arguments_give_identical_heights() {
        let field = NoiseField::new(7);
        let other = NoiseField::new(7);
        for x in -20..20 {
            for y in -20..20 {
                let a = field.sample(x, y, 0.5, 4, 0.05, 0, 15);
                assert_eq!(a, field.sample(x, y, 0.5, 4, 0.05, 0, 15));
                assert_eq!(a, other.sample(x, y, 0.5, 4, 0.05, 0, 15));
            }
        }
    }

    #[test]
    fn heights_stay_in_range() {
        let field = NoiseField::new(3);
        for x in -64..64 {
            for y in -64..64 {
                let height = field.sample(x * 7, y * 13, 0.8, 3, 0.05, 2, 9);
                assert!((2..=9).contains(&height), "{} at ({}, {})", height, x, y);
            }
        }
    }

    #[test]
    fn terrain_is_not_flat() {
        let field = NoiseField::new(0);
        let first = field.sample(0, 0, 0.8, 1, 0.05, 0, 15);
        let varies = (0..64)
            .flat_map(|x| (0..64).map(move |y| (x, y)))
            .any(|(x, y)| field.sample(x, y, 0.8, 1, 0.05, 0, 15) != first);
        assert!(varies);
    }

    #[test]
    fn zero_octaves_is_the_midpoint() {
        let field = NoiseField::new(0);
        assert_eq!(field.sample(5, 9, 0.8, 0, 0.05, 0, 10), 5);
    }

    #[test]
    fn reversed_range_is_tolerated() {
        let field = NoiseField::new(11);
        for x in 0..32 {
            let height = field.sample(x, -x, 0.8, 2, 0.05, 15, 0);
            assert!((0..=15).contains(&height));
        }
    }

    #[test]
    fn closures_are_height_sources() {
        let ramp = |x: i64, y: i64| (x + y) as i32;
        assert_eq!(ramp.height_at(2, 3), 5);

        let terrain = TerrainNoise::new(NoiseParams::default());
        let field = NoiseField::new(0);
        assert_eq!(
            terrain.height_at(12, -4),
            field.sample_with(12, -4, &NoiseParams::default())
        );
    }
}

//! Random number streams and direction sampling.
//!
//! Samplers are explicit objects owned by the code that draws from them.
//! The renderer creates one per scanline from the render seed, so a frame is
//! reproducible regardless of how rayon schedules the rows.

use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use glint_math::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest f32 strictly below 1.0.
pub const ONE_MINUS_EPSILON: f32 = 1.0 - f32::EPSILON / 2.0;

/// A source of sample values in `[0, 1)`.
///
/// The renderer calls `start_pixel` once per pixel and `start_sample` once
/// per pixel sample, then draws as many dimensions as the path needs.
/// Implementations that ignore the structure (plain pseudo-random streams)
/// can treat both as no-ops.
pub trait Sampler: Send {
    /// Begin sampling the pixel at `(x, y)`.
    fn start_pixel(&mut self, x: u32, y: u32);

    /// Begin the `index`-th sample of the current pixel.
    fn start_sample(&mut self, index: u32);

    /// Draw one value in `[0, 1)`.
    fn next_1d(&mut self) -> f32;

    /// Draw two values in `[0, 1)`.
    fn next_2d(&mut self) -> Vec2;
}

/// Pseudo-random sampler backed by a seeded `StdRng`.
pub struct RandomSampler {
    rng: StdRng,
}

impl RandomSampler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Sampler for RandomSampler {
    fn start_pixel(&mut self, _x: u32, _y: u32) {}

    fn start_sample(&mut self, _index: u32) {}

    #[inline]
    fn next_1d(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    #[inline]
    fn next_2d(&mut self) -> Vec2 {
        Vec2::new(self.rng.gen::<f32>(), self.rng.gen::<f32>())
    }
}

// Plastic constant and the R2 sequence increments derived from it.
const R2_G: f64 = 1.324_717_957_244_746;
const R2_A1: f64 = 1.0 / R2_G;
const R2_A2: f64 = 1.0 / (R2_G * R2_G);

/// The `index`-th point of the R2 low-discrepancy sequence.
pub fn r2(index: u32) -> Vec2 {
    let n = index as f64;
    let x = (0.5 + R2_A1 * n).fract() as f32;
    let y = (0.5 + R2_A2 * n).fract() as f32;
    Vec2::new(x.min(ONE_MINUS_EPSILON), y.min(ONE_MINUS_EPSILON))
}

/// Quasi-random sampler over the R2 sequence.
///
/// Each pixel starts at a hashed sequence index, so neighbouring pixels do
/// not alias, and each sample advances the index by one. Every 2D dimension
/// drawn within a sample is shifted by its own hashed rotation (toroidal
/// shift), so the bounce at depth 3 does not reuse the exact point used by
/// the bounce at depth 1.
pub struct QuasiRandomSampler {
    seed: u32,
    base: u32,
    index: u32,
    dimension: u32,
}

impl QuasiRandomSampler {
    pub fn new(seed: u64) -> Self {
        Self {
            seed: (seed ^ (seed >> 32)) as u32,
            base: 0,
            index: 0,
            dimension: 0,
        }
    }

    fn rotation(&self, dimension: u32) -> Vec2 {
        let key = self.seed.wrapping_add(dimension.wrapping_mul(2));
        Vec2::new(
            hash_to_unit(wang_hash(key)),
            hash_to_unit(wang_hash(key.wrapping_add(1))),
        )
    }
}

impl Sampler for QuasiRandomSampler {
    fn start_pixel(&mut self, x: u32, y: u32) {
        self.base = wang_hash(wang_hash(x ^ self.seed).wrapping_add(y));
        self.index = self.base;
        self.dimension = 0;
    }

    fn start_sample(&mut self, index: u32) {
        self.index = self.base.wrapping_add(index);
        self.dimension = 0;
    }

    fn next_1d(&mut self) -> f32 {
        self.next_2d().x
    }

    fn next_2d(&mut self) -> Vec2 {
        let point = r2(self.index) + self.rotation(self.dimension);
        self.dimension += 1;
        Vec2::new(wrap_unit(point.x), wrap_unit(point.y))
    }
}

/// Which sampler the renderer draws bounce directions from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SamplerKind {
    Random,
    #[default]
    QuasiRandom,
}

impl SamplerKind {
    /// Create the sampler for one independent stream of a render.
    ///
    /// The same `(seed, stream)` pair always yields the same sequence.
    pub fn create(self, seed: u64, stream: u64) -> Box<dyn Sampler> {
        let seed = stream_seed(seed, stream);
        match self {
            SamplerKind::Random => Box::new(RandomSampler::new(seed)),
            SamplerKind::QuasiRandom => Box::new(QuasiRandomSampler::new(seed)),
        }
    }
}

impl fmt::Display for SamplerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SamplerKind::Random => f.write_str("random"),
            SamplerKind::QuasiRandom => f.write_str("quasi-random"),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown sampler '{0}', expected 'random' or 'quasi-random'")]
pub struct ParseSamplerKindError(String);

impl FromStr for SamplerKind {
    type Err = ParseSamplerKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(SamplerKind::Random),
            "quasi-random" | "quasi" => Ok(SamplerKind::QuasiRandom),
            _ => Err(ParseSamplerKindError(s.to_string())),
        }
    }
}

/// Derive the seed of an independent stream from a render seed.
pub fn stream_seed(seed: u64, stream: u64) -> u64 {
    seed ^ stream.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Thomas Wang's 32-bit integer hash.
pub fn wang_hash(mut key: u32) -> u32 {
    key = (key ^ 61) ^ (key >> 16);
    key = key.wrapping_mul(9);
    key ^= key >> 4;
    key = key.wrapping_mul(0x27d4_eb2d);
    key ^= key >> 15;
    key
}

/// Map a hash to `[0, 1)` using its top 24 bits.
#[inline]
fn hash_to_unit(hash: u32) -> f32 {
    (hash >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
}

#[inline]
fn wrap_unit(x: f32) -> f32 {
    (x - x.floor()).min(ONE_MINUS_EPSILON)
}

/// How bounce directions are distributed over the hemisphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HemisphereSampling {
    /// Density `cos(theta) / pi`.
    #[default]
    Cosine,
    /// Density `1 / (2 pi)`.
    Uniform,
}

impl HemisphereSampling {
    /// Sample a direction above `normal`, returning it with its density.
    #[inline]
    pub fn sample(self, u: Vec2, normal: Vec3) -> (Vec3, f32) {
        match self {
            HemisphereSampling::Cosine => cosine_hemisphere(u, normal),
            HemisphereSampling::Uniform => uniform_hemisphere(u, normal),
        }
    }
}

impl fmt::Display for HemisphereSampling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HemisphereSampling::Cosine => f.write_str("cosine"),
            HemisphereSampling::Uniform => f.write_str("uniform"),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown hemisphere sampling '{0}', expected 'cosine' or 'uniform'")]
pub struct ParseHemisphereSamplingError(String);

impl FromStr for HemisphereSampling {
    type Err = ParseHemisphereSamplingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cosine" => Ok(HemisphereSampling::Cosine),
            "uniform" => Ok(HemisphereSampling::Uniform),
            _ => Err(ParseHemisphereSamplingError(s.to_string())),
        }
    }
}

/// Map two uniforms to a uniformly distributed point on the unit sphere.
pub fn uniform_sphere(u: Vec2) -> Vec3 {
    let z = 1.0 - 2.0 * u.x;
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * PI * u.y;
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

/// Cosine-weighted direction in the hemisphere above a unit `normal`.
///
/// Uses the tangent sphere construction: a uniform point on the unit sphere
/// offset by the normal and renormalized is distributed as `cos(theta) / pi`.
/// No tangent frame is needed.
pub fn cosine_hemisphere(u: Vec2, normal: Vec3) -> (Vec3, f32) {
    let offset = normal + uniform_sphere(u);

    // The sphere point landed on (or next to) the antipode of the normal.
    let direction = if normal.dot(offset) <= 1e-6 {
        normal
    } else {
        offset.normalize()
    };

    let cos_theta = normal.dot(direction).min(1.0);
    (direction, cos_theta / PI)
}

/// Uniformly distributed direction in the hemisphere above `normal`.
pub fn uniform_hemisphere(u: Vec2, normal: Vec3) -> (Vec3, f32) {
    let point = uniform_sphere(u);
    let cos_theta = point.dot(normal);

    let direction = if cos_theta.abs() <= 1e-6 {
        normal
    } else if cos_theta < 0.0 {
        -point
    } else {
        point
    };

    (direction, 1.0 / (2.0 * PI))
}

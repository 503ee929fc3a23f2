//! Render configuration and errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{HemisphereSampling, SamplerKind};

/// Errors that can occur while setting up or writing a render.
///
/// Numerical outcomes (misses, exhausted depth) are never errors; only a
/// malformed configuration or a failed output is.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid image dimensions {width}x{height}, both must be positive")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Samples per pixel must be at least 1")]
    ZeroSamples,

    #[error("Upscale factor must be at least 1")]
    ZeroScale,

    #[error("Upscaling {width}x{height} by {scale} exceeds the addressable image size")]
    ImageTooLarge { width: u32, height: u32, scale: u32 },

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Radiance estimates averaged per pixel
    pub samples_per_pixel: u32,
    /// Maximum number of path segments; 0 renders black
    pub max_depth: u32,
    /// Seed for every random stream of the render
    pub seed: u64,
    /// Sampler used for bounce directions
    pub sampler: SamplerKind,
    /// Hemisphere distribution for bounce directions
    pub hemisphere: HemisphereSampling,
    /// Worker thread count, `None` for one per core
    pub threads: Option<usize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 240,
            height: 135,
            samples_per_pixel: 16,
            max_depth: 10,
            seed: 0,
            sampler: SamplerKind::default(),
            hemisphere: HemisphereSampling::default(),
            threads: None,
        }
    }
}

impl RenderConfig {
    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self.max_depth = max_depth;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_sampler(mut self, sampler: SamplerKind) -> Self {
        self.sampler = sampler;
        self
    }

    pub fn with_hemisphere(mut self, hemisphere: HemisphereSampling) -> Self {
        self.hemisphere = hemisphere;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Width / height of the image.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Reject configurations that cannot produce an image.
    pub fn validate(&self) -> RenderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::ZeroSamples);
        }
        Ok(())
    }
}

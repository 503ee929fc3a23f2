//! Glint - CPU Monte Carlo path tracing
//!
//! Renders scenes of spheres lit by a sky gradient. Primary rays come from
//! a fixed pinhole camera, diffuse bounces are importance sampled, and rows
//! of the image are rendered in parallel with rayon.
//!
//! # Example
//!
//! ```no_run
//! use glint_renderer::{render, Camera, RenderConfig, Scene, Vec3};
//!
//! let scene = Scene::new()
//!     .with_sphere(Vec3::new(0.0, 0.0, -1.0), 0.5)
//!     .with_sphere(Vec3::new(0.0, -100.5, -1.0), 100.0);
//! let config = RenderConfig::default();
//! let camera = Camera::for_image(config.width, config.height);
//!
//! let image = render(&scene, &camera, &config, &())?;
//! image.save_png("output.png", 4)?;
//! # Ok::<(), glint_renderer::RenderError>(())
//! ```

mod camera;
mod config;
mod hittable;
mod material;
mod output;
mod progress;
mod renderer;
pub mod sampling;
mod sphere;

pub use camera::Camera;
pub use config::{RenderConfig, RenderError, RenderResult};
pub use hittable::{HitRecord, Hittable, Scene};
pub use material::{Color, Lambertian, SkyGradient};
pub use output::ImageBuffer;
pub use progress::{ProgressSink, REPORT_INTERVAL};
pub use renderer::{color_to_rgb, render, render_pixel, render_with, Integrator, RAY_OFFSET};
pub use sampling::{
    HemisphereSampling, QuasiRandomSampler, RandomSampler, Sampler, SamplerKind,
};
pub use sphere::Sphere;

/// Re-export Vec3 and common math types from glint_math
pub use glint_math::{lerp, ColorSpace, Interval, Ray, Vec2, Vec3};

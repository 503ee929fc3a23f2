//! JSON scene description.
//!
//! ```json
//! {
//!   "render": { "width": 320, "height": 180, "samples_per_pixel": 64 },
//!   "scale": 4,
//!   "spheres": [
//!     { "center": [0.0, 0.0, -1.0], "radius": 0.5 },
//!     { "center": [0.0, -100.5, -1.0], "radius": 100.0 }
//!   ]
//! }
//! ```
//!
//! Every field is optional; missing render settings take their defaults.

use std::path::Path;

use glint_renderer::{RenderConfig, Scene, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading a scene file.
#[derive(Error, Debug)]
pub enum SceneFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Sphere {index} has radius {radius}, expected a positive finite value")]
    InvalidRadius { index: usize, radius: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphereDesc {
    pub center: [f32; 3],
    pub radius: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneFile {
    pub render: RenderConfig,
    /// Integer upscale factor applied when saving
    pub scale: Option<u32>,
    pub spheres: Vec<SphereDesc>,
}

impl SceneFile {
    /// Load a scene description from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SceneFileError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, SceneFileError> {
        Ok(serde_json::from_str(text)?)
    }

    /// A small sphere resting on a large ground sphere.
    pub fn demo() -> Self {
        Self {
            render: RenderConfig::default(),
            scale: None,
            spheres: vec![
                SphereDesc {
                    center: [0.0, 0.0, -1.0],
                    radius: 0.5,
                },
                SphereDesc {
                    center: [0.0, -100.5, -1.0],
                    radius: 100.0,
                },
            ],
        }
    }

    /// Build the scene, rejecting spheres without a positive finite radius.
    pub fn build_scene(&self) -> Result<Scene, SceneFileError> {
        let mut scene = Scene::new();
        for (index, sphere) in self.spheres.iter().enumerate() {
            if !(sphere.radius.is_finite() && sphere.radius > 0.0) {
                return Err(SceneFileError::InvalidRadius {
                    index,
                    radius: sphere.radius,
                });
            }
            scene = scene.with_sphere(Vec3::from_array(sphere.center), sphere.radius);
        }
        Ok(scene)
    }
}

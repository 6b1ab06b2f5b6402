//! Per-Frame Scene View
//!
//! The boundary contract with the entity/component layer: each frame the
//! owning render loop hands the pipeline a list of drawables (material +
//! world transform), aggregated light data, and the active camera. Nothing
//! here is retained across frames by the pipeline.

use glam::{Mat4, Vec3};

use crate::resources::lights::LightData;
use crate::resources::material::MaterialConfig;

/// One draw request: a material configuration plus a world transform.
/// Mesh/vertex data is resolved by the backend and is not part of this core.
#[derive(Debug, Clone)]
pub struct Drawable {
    pub material: MaterialConfig,
    pub transform: Mat4,
}

/// Active camera state for the frame.
#[derive(Debug, Clone)]
pub struct Camera {
    pub view: Mat4,
    pub projection: Mat4,
    pub position: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY,
            projection: Mat4::perspective_rh(std::f32::consts::FRAC_PI_3, 16.0 / 9.0, 0.1, 100.0),
            position: Vec3::ZERO,
        }
    }
}

/// Everything the pipeline consumes for one frame.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub drawables: Vec<Drawable>,
    pub lights: LightData,
    pub camera: Camera,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

//! Light Data
//!
//! Bounded per-frame light arrays consumed by the deferred lighting pass.
//! The bounds are capacity limits, not errors: pushes beyond them are
//! silently dropped (with one `warn!` per dropped light so scene authors can
//! see when they exceed the caps).

use glam::Vec3;
use smallvec::SmallVec;

/// Maximum point lights per frame.
pub const MAX_POINT_LIGHTS: usize = 16;
/// Maximum directional lights per frame.
pub const MAX_DIRECTIONAL_LIGHTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    /// Influence radius; contribution falls smoothly to zero at this distance.
    pub range: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Direction the light travels (normalized by the lighting pass).
    pub direction: Vec3,
    pub color: Vec3,
    pub intensity: f32,
}

/// Aggregated per-frame light data.
#[derive(Debug, Clone, Default)]
pub struct LightData {
    point: SmallVec<[PointLight; MAX_POINT_LIGHTS]>,
    directional: SmallVec<[DirectionalLight; MAX_DIRECTIONAL_LIGHTS]>,
}

impl LightData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a point light; drops it silently at the capacity bound.
    pub fn push_point(&mut self, light: PointLight) {
        if self.point.len() < MAX_POINT_LIGHTS {
            self.point.push(light);
        } else {
            log::warn!("point light dropped: frame already holds {MAX_POINT_LIGHTS}");
        }
    }

    /// Adds a directional light; drops it silently at the capacity bound.
    pub fn push_directional(&mut self, light: DirectionalLight) {
        if self.directional.len() < MAX_DIRECTIONAL_LIGHTS {
            self.directional.push(light);
        } else {
            log::warn!("directional light dropped: frame already holds {MAX_DIRECTIONAL_LIGHTS}");
        }
    }

    #[must_use]
    pub fn point_lights(&self) -> &[PointLight] {
        &self.point
    }

    #[must_use]
    pub fn directional_lights(&self) -> &[DirectionalLight] {
        &self.directional
    }
}

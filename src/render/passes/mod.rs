//! Pass Sequence
//!
//! One module per stage of the fixed, hand-ordered deferred pass sequence:
//!
//! ```text
//! Geometry → SSAO → SSR → Lighting → Bloom → TAA → FXAA → Present
//! ```
//!
//! Data flows strictly forward through the sequence once per frame. Each
//! post-geometry pass is a pure function from a subset of the frame targets
//! (plus per-frame uniform data) to an output target; the shared helpers here
//! cover screen/view/world reprojection used by several of them.

pub mod bloom;
pub mod fxaa;
pub mod geometry;
pub mod lighting;
pub mod present;
pub mod ssao;
pub mod ssr;
pub mod taa;

pub use bloom::BloomPass;
pub use fxaa::FxaaPass;
pub use geometry::GeometryPass;
pub use lighting::LightingPass;
pub use present::PresentPass;
pub use ssao::SsaoPass;
pub use ssr::SsrPass;
pub use taa::TaaPass;

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::resources::post::PostProcessSettings;
use crate::scene::Camera;

/// Per-frame uniform data shared by the pass bodies.
#[derive(Debug, Clone)]
pub struct FrameUniforms {
    pub view: Mat4,
    /// Jittered projection for the current frame.
    pub projection: Mat4,
    pub inv_projection: Mat4,
    pub inv_view_projection: Mat4,
    pub camera_position: Vec3,
    pub ambient_color: Vec3,
}

impl FrameUniforms {
    #[must_use]
    pub fn new(camera: &Camera, projection: Mat4, settings: &PostProcessSettings) -> Self {
        let view_projection = projection * camera.view;
        Self {
            view: camera.view,
            projection,
            inv_projection: projection.inverse(),
            inv_view_projection: view_projection.inverse(),
            camera_position: camera.position,
            ambient_color: settings.ambient_color,
        }
    }
}

/// Texel-center UV for integer pixel coordinates.
#[inline]
#[must_use]
pub fn texel_uv(x: usize, y: usize, width: usize, height: usize) -> Vec2 {
    Vec2::new(
        (x as f32 + 0.5) / width as f32,
        (y as f32 + 0.5) / height as f32,
    )
}

/// Reconstructs the view-space position of a pixel from its depth-buffer
/// value (`[0, 1]`, far sentinel at 1).
#[must_use]
pub fn view_position_from_depth(uv: Vec2, depth: f32, inv_projection: &Mat4) -> Vec3 {
    let ndc = Vec4::new(uv.x * 2.0 - 1.0, uv.y * 2.0 - 1.0, depth * 2.0 - 1.0, 1.0);
    let h = *inv_projection * ndc;
    h.truncate() / h.w
}

/// Reconstructs the world-space position of a pixel from its depth.
#[must_use]
pub fn world_position_from_depth(uv: Vec2, depth: f32, inv_view_projection: &Mat4) -> Vec3 {
    let ndc = Vec4::new(uv.x * 2.0 - 1.0, uv.y * 2.0 - 1.0, depth * 2.0 - 1.0, 1.0);
    let h = *inv_view_projection * ndc;
    h.truncate() / h.w
}

/// Projects a view-space position back to screen space.
///
/// Returns `(uv, depth01)`, or `None` when the position is behind the
/// projection plane.
#[must_use]
pub fn project_to_screen(view_position: Vec3, projection: &Mat4) -> Option<(Vec2, f32)> {
    let clip = *projection * view_position.extend(1.0);
    if clip.w <= 1e-6 {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    let uv = Vec2::new(ndc.x * 0.5 + 0.5, ndc.y * 0.5 + 0.5);
    Some((uv, ndc.z * 0.5 + 0.5))
}

/// Rec. 601 luma used by bloom extraction and FXAA edge detection.
#[inline]
#[must_use]
pub fn luminance(color: Vec3) -> f32 {
    color.dot(Vec3::new(0.299, 0.587, 0.114))
}

/// Hermite smoothstep.
#[inline]
#[must_use]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

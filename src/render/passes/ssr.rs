//! Screen-Space Reflections Pass
//!
//! Ray-marches a fixed number of steps along the view-space reflection
//! vector, reprojecting each step into the depth buffer. A hit is declared
//! when the marched sample drops behind the stored surface by less than the
//! thickness threshold; the sampled scene color is returned with a confidence
//! that decreases with march distance and roughness.
//!
//! Skipped (zero confidence) for background pixels and for roughness above
//! the cutoff — reflections are not computed for rough surfaces.

use glam::{Vec3, Vec4};

use super::{FrameUniforms, project_to_screen, texel_uv, view_position_from_depth};
use crate::render::target::{ColorTarget, FAR_DEPTH, GBuffer};
use crate::resources::post::SsrSettings;

pub struct SsrPass;

impl SsrPass {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Reflection color (rgb) + confidence (a) for one pixel.
    #[must_use]
    pub fn reflection_at(
        &self,
        x: usize,
        y: usize,
        gbuffer: &GBuffer,
        scene_color: &ColorTarget,
        frame: &FrameUniforms,
        settings: &SsrSettings,
    ) -> Vec4 {
        if gbuffer.depth.is_background(x, y) {
            return Vec4::ZERO;
        }

        let normal_roughness = gbuffer.normal_roughness.texel(x, y);
        let roughness = normal_roughness.w;
        if roughness > settings.roughness_cutoff {
            return Vec4::ZERO;
        }

        let width = gbuffer.depth.width();
        let height = gbuffer.depth.height();
        let uv = texel_uv(x, y, width, height);

        let depth = gbuffer.depth.texel(x, y);
        let position = view_position_from_depth(uv, depth, &frame.inv_projection);

        let normal = (frame.view * normal_roughness.truncate().extend(0.0))
            .truncate()
            .normalize_or_zero();
        if normal == Vec3::ZERO {
            return Vec4::ZERO;
        }

        let view_dir = position.normalize_or_zero();
        let reflection = (view_dir - 2.0 * view_dir.dot(normal) * normal).normalize_or_zero();
        if reflection == Vec3::ZERO {
            return Vec4::ZERO;
        }

        for step in 1..=settings.max_steps {
            let sample = position + reflection * (step as f32 * settings.step_length);

            let Some((sample_uv, _)) = project_to_screen(sample, &frame.projection) else {
                break;
            };
            if !(0.0..=1.0).contains(&sample_uv.x) || !(0.0..=1.0).contains(&sample_uv.y) {
                break;
            }

            let scene_depth = gbuffer.depth.sample_uv(sample_uv);
            if scene_depth >= FAR_DEPTH {
                continue;
            }
            let surface = view_position_from_depth(sample_uv, scene_depth, &frame.inv_projection);

            // Positive when the stored surface sits in front of the marched
            // sample (right-handed view space, greater z is closer).
            let depth_diff = surface.z - sample.z;
            if depth_diff > 0.0 && depth_diff < settings.thickness {
                let march_fade = 1.0 - step as f32 / settings.max_steps as f32;
                let roughness_fade = 1.0 - roughness / settings.roughness_cutoff;
                let confidence = (march_fade * roughness_fade).clamp(0.0, 1.0);
                let color = scene_color.sample_uv(sample_uv).truncate();
                return color.extend(confidence);
            }
        }

        Vec4::ZERO
    }

    /// Runs the pass over the full target.
    pub fn run(
        &self,
        gbuffer: &GBuffer,
        scene_color: &ColorTarget,
        frame: &FrameUniforms,
        settings: &SsrSettings,
        out: &mut ColorTarget,
    ) {
        for y in 0..out.height() {
            for x in 0..out.width() {
                let r = self.reflection_at(x, y, gbuffer, scene_color, frame, settings);
                out.set_texel(x, y, r);
            }
        }
    }
}

impl Default for SsrPass {
    fn default() -> Self {
        Self::new()
    }
}

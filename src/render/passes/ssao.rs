//! Screen-Space Ambient Occlusion Pass
//!
//! Hemisphere occlusion sampling over depth + normals:
//!
//! 1. Per pixel, a random rotation from a 4×4 tiled noise table orients a
//!    tangent basis around the view-space normal.
//! 2. Up to 64 hemisphere kernel samples reconstruct candidate view-space
//!    positions; each is reprojected to the depth buffer and counted as
//!    occluding when the stored surface sits in front of it by more than the
//!    bias, weighted by a smooth range-check falloff.
//! 3. `1 - occlusion_ratio` is raised to a contrast-control power.
//!
//! Background pixels (depth at the far sentinel) return full visibility, 1.0.

use glam::{Mat3, Vec2, Vec3, Vec4};

use super::{FrameUniforms, project_to_screen, smoothstep, texel_uv, view_position_from_depth};
use crate::render::target::{ColorTarget, GBuffer};
use crate::resources::post::{SsaoSettings, generate_ssao_kernel, generate_ssao_noise};

pub struct SsaoPass {
    kernel: Vec<Vec3>,
    noise: [Vec2; 16],
}

impl SsaoPass {
    #[must_use]
    pub fn new(settings: &SsaoSettings) -> Self {
        Self {
            kernel: generate_ssao_kernel(settings.sample_count),
            noise: generate_ssao_noise(),
        }
    }

    /// Occlusion-weighted visibility for one pixel, in [0, 1].
    #[must_use]
    pub fn visibility_at(
        &self,
        x: usize,
        y: usize,
        gbuffer: &GBuffer,
        frame: &FrameUniforms,
        settings: &SsaoSettings,
    ) -> f32 {
        if gbuffer.depth.is_background(x, y) {
            return 1.0;
        }

        let width = gbuffer.depth.width();
        let height = gbuffer.depth.height();
        let uv = texel_uv(x, y, width, height);

        let depth = gbuffer.depth.texel(x, y);
        let position = view_position_from_depth(uv, depth, &frame.inv_projection);

        let world_normal = gbuffer.normal_roughness.texel(x, y).truncate();
        let normal = (frame.view * world_normal.extend(0.0))
            .truncate()
            .normalize_or_zero();
        if normal == Vec3::ZERO {
            return 1.0;
        }

        // Tiled random rotation breaks banding without a larger noise texture.
        let rot = self.noise[(x % 4) + (y % 4) * 4];
        let rot = Vec3::new(rot.x, rot.y, 0.0);
        let mut tangent = rot - normal * rot.dot(normal);
        if tangent.length_squared() < 1e-8 {
            tangent = Vec3::new(normal.z, normal.x, normal.y).cross(normal);
        }
        let tangent = tangent.normalize();
        let bitangent = normal.cross(tangent);
        let tbn = Mat3::from_cols(tangent, bitangent, normal);

        let sample_count = self.kernel.len().min(settings.sample_count).max(1);
        let mut occlusion = 0.0;

        for kernel_sample in self.kernel.iter().take(sample_count) {
            let sample_pos = position + tbn * *kernel_sample * settings.radius;

            let Some((sample_uv, _)) = project_to_screen(sample_pos, &frame.projection) else {
                continue;
            };
            if !(0.0..=1.0).contains(&sample_uv.x) || !(0.0..=1.0).contains(&sample_uv.y) {
                continue;
            }

            let scene_depth = gbuffer.depth.sample_uv(sample_uv);
            if scene_depth >= crate::render::target::FAR_DEPTH {
                continue;
            }
            let scene_pos = view_position_from_depth(sample_uv, scene_depth, &frame.inv_projection);

            // View space is right-handed: greater z means closer to camera.
            if scene_pos.z >= sample_pos.z + settings.bias {
                let range_check = smoothstep(
                    0.0,
                    1.0,
                    settings.radius / (position.z - scene_pos.z).abs().max(1e-6),
                );
                occlusion += range_check;
            }
        }

        let visibility = 1.0 - occlusion / sample_count as f32;
        visibility.max(0.0).powf(settings.power)
    }

    /// Runs the pass over the full target.
    pub fn run(
        &self,
        gbuffer: &GBuffer,
        frame: &FrameUniforms,
        settings: &SsaoSettings,
        out: &mut ColorTarget,
    ) {
        for y in 0..out.height() {
            for x in 0..out.width() {
                let v = self.visibility_at(x, y, gbuffer, frame, settings);
                out.set_texel(x, y, Vec4::new(v, v, v, 1.0));
            }
        }
    }
}

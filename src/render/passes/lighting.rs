//! Deferred PBR Lighting Pass
//!
//! Resolves the G-Buffer with a Cook-Torrance BRDF (GGX distribution, Smith
//! geometry, Schlick Fresnel). Direct lighting sums every directional and
//! point light; the ambient term is modulated by baked occlusion and the
//! screen-space ambient occlusion target, and screen-space reflections are
//! blended in weighted by their confidence.

use glam::{Vec3, Vec4};

use super::{FrameUniforms, texel_uv, world_position_from_depth};
use crate::render::target::{ColorTarget, GBuffer};
use crate::resources::lights::LightData;

const DIELECTRIC_F0: Vec3 = Vec3::splat(0.04);

fn distribution_ggx(n_dot_h: f32, roughness: f32) -> f32 {
    let a = roughness * roughness;
    let a2 = a * a;
    let denom = n_dot_h * n_dot_h * (a2 - 1.0) + 1.0;
    a2 / (std::f32::consts::PI * denom * denom).max(1e-6)
}

fn geometry_schlick_ggx(n_dot_v: f32, k: f32) -> f32 {
    n_dot_v / (n_dot_v * (1.0 - k) + k).max(1e-6)
}

fn geometry_smith(n_dot_v: f32, n_dot_l: f32, roughness: f32) -> f32 {
    let r = roughness + 1.0;
    let k = r * r / 8.0;
    geometry_schlick_ggx(n_dot_v, k) * geometry_schlick_ggx(n_dot_l, k)
}

fn fresnel_schlick(cos_theta: f32, f0: Vec3) -> Vec3 {
    f0 + (Vec3::ONE - f0) * (1.0 - cos_theta).clamp(0.0, 1.0).powi(5)
}

/// Inverse-square falloff with a smooth window that reaches zero at `range`.
fn point_attenuation(distance: f32, range: f32) -> f32 {
    let window = (1.0 - (distance / range).powi(4)).clamp(0.0, 1.0);
    window * window / distance.mul_add(distance, 0.0).max(1e-4)
}

struct Surface {
    albedo: Vec3,
    normal: Vec3,
    metallic: f32,
    roughness: f32,
    f0: Vec3,
}

impl Surface {
    fn shade(&self, view_dir: Vec3, light_dir: Vec3, radiance: Vec3) -> Vec3 {
        let n_dot_l = self.normal.dot(light_dir).max(0.0);
        if n_dot_l <= 0.0 {
            return Vec3::ZERO;
        }
        let n_dot_v = self.normal.dot(view_dir).max(0.0);
        let halfway = (view_dir + light_dir).normalize_or_zero();
        let n_dot_h = self.normal.dot(halfway).max(0.0);

        let d = distribution_ggx(n_dot_h, self.roughness);
        let g = geometry_smith(n_dot_v, n_dot_l, self.roughness);
        let f = fresnel_schlick(halfway.dot(view_dir).max(0.0), self.f0);

        let specular = d * g * f / (4.0 * n_dot_v * n_dot_l).max(1e-4);
        let kd = (Vec3::ONE - f) * (1.0 - self.metallic);
        let diffuse = kd * self.albedo / std::f32::consts::PI;

        (diffuse + specular) * radiance * n_dot_l
    }
}

pub struct LightingPass;

impl LightingPass {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Resolved HDR radiance for one pixel.
    #[must_use]
    pub fn shade_at(
        &self,
        x: usize,
        y: usize,
        gbuffer: &GBuffer,
        ambient_occlusion: &ColorTarget,
        reflections: &ColorTarget,
        lights: &LightData,
        frame: &FrameUniforms,
    ) -> Vec4 {
        if gbuffer.depth.is_background(x, y) {
            return frame.ambient_color.extend(1.0);
        }

        let albedo_metallic = gbuffer.albedo_metallic.texel(x, y);
        let normal_roughness = gbuffer.normal_roughness.texel(x, y);
        let emissive_occlusion = gbuffer.emissive_occlusion.texel(x, y);

        let albedo = albedo_metallic.truncate();
        let metallic = albedo_metallic.w;
        let roughness = normal_roughness.w.clamp(0.04, 1.0);
        let normal = normal_roughness.truncate().normalize_or_zero();
        if normal == Vec3::ZERO {
            return (frame.ambient_color + emissive_occlusion.truncate()).extend(1.0);
        }

        let surface = Surface {
            albedo,
            normal,
            metallic,
            roughness,
            f0: DIELECTRIC_F0.lerp(albedo, metallic),
        };

        let uv = texel_uv(x, y, gbuffer.depth.width(), gbuffer.depth.height());
        let depth = gbuffer.depth.texel(x, y);
        let world_pos = world_position_from_depth(uv, depth, &frame.inv_view_projection);
        let view_dir = (frame.camera_position - world_pos).normalize_or_zero();

        let mut direct = Vec3::ZERO;
        for light in lights.directional_lights() {
            let light_dir = (-light.direction).normalize_or_zero();
            let radiance = light.color * light.intensity;
            direct += surface.shade(view_dir, light_dir, radiance);
        }
        for light in lights.point_lights() {
            let to_light = light.position - world_pos;
            let distance = to_light.length();
            if distance >= light.range {
                continue;
            }
            let light_dir = to_light / distance.max(1e-4);
            let radiance = light.color * light.intensity * point_attenuation(distance, light.range);
            direct += surface.shade(view_dir, light_dir, radiance);
        }

        let visibility = ambient_occlusion.texel(x, y).x;
        let ambient =
            frame.ambient_color * albedo * emissive_occlusion.w * visibility;

        let ssr = reflections.texel(x, y);
        let n_dot_v = normal.dot(view_dir).max(0.0);
        let specular_ambient = ssr.truncate()
            * ssr.w
            * fresnel_schlick(n_dot_v, surface.f0)
            * (1.0 - roughness);

        let color = ambient + direct + specular_ambient + emissive_occlusion.truncate();
        color.extend(1.0)
    }

    pub fn run(
        &self,
        gbuffer: &GBuffer,
        ambient_occlusion: &ColorTarget,
        reflections: &ColorTarget,
        lights: &LightData,
        frame: &FrameUniforms,
        out: &mut ColorTarget,
    ) {
        for y in 0..out.height() {
            for x in 0..out.width() {
                let c = self.shade_at(x, y, gbuffer, ambient_occlusion, reflections, lights, frame);
                out.set_texel(x, y, c);
            }
        }
    }
}

impl Default for LightingPass {
    fn default() -> Self {
        Self::new()
    }
}

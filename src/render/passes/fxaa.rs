//! Fast Approximate Anti-Aliasing Pass
//!
//! Luminance-based edge detection over the four corner neighbors, followed
//! by a blur along the estimated edge direction. Pixels whose local contrast
//! falls below the threshold are returned untouched.

use glam::{Vec2, Vec4};

use super::{luminance, texel_uv};
use crate::render::target::ColorTarget;
use crate::resources::post::FxaaSettings;

const DIR_REDUCE_MUL: f32 = 1.0 / 8.0;
const DIR_REDUCE_MIN: f32 = 1.0 / 128.0;

pub struct FxaaPass;

impl FxaaPass {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Anti-aliased color for one pixel.
    #[must_use]
    pub fn filter_at(
        &self,
        x: usize,
        y: usize,
        source: &ColorTarget,
        settings: &FxaaSettings,
    ) -> Vec4 {
        let px = x as i64;
        let py = y as i64;
        let center = source.texel(x, y);

        let luma_center = luminance(center.truncate());
        let luma_nw = luminance(source.fetch_clamped(px - 1, py - 1).truncate());
        let luma_ne = luminance(source.fetch_clamped(px + 1, py - 1).truncate());
        let luma_sw = luminance(source.fetch_clamped(px - 1, py + 1).truncate());
        let luma_se = luminance(source.fetch_clamped(px + 1, py + 1).truncate());

        let luma_min = luma_center.min(luma_nw.min(luma_ne).min(luma_sw.min(luma_se)));
        let luma_max = luma_center.max(luma_nw.max(luma_ne).max(luma_sw.max(luma_se)));
        let range = luma_max - luma_min;
        if range < settings.edge_threshold_min.max(luma_max * settings.edge_threshold) {
            return center;
        }

        let mut dir = Vec2::new(
            -((luma_nw + luma_ne) - (luma_sw + luma_se)),
            (luma_nw + luma_sw) - (luma_ne + luma_se),
        );
        let dir_reduce =
            ((luma_nw + luma_ne + luma_sw + luma_se) * 0.25 * DIR_REDUCE_MUL).max(DIR_REDUCE_MIN);
        let rcp_dir_min = 1.0 / (dir.x.abs().min(dir.y.abs()) + dir_reduce);
        dir = (dir * rcp_dir_min).clamp(Vec2::splat(-settings.span_max), Vec2::splat(settings.span_max));

        let texel_size = Vec2::new(
            1.0 / source.width() as f32,
            1.0 / source.height() as f32,
        );
        let offset = dir * texel_size;
        let uv = texel_uv(x, y, source.width(), source.height());

        let rgb_a = 0.5
            * (source.sample_uv(uv + offset * (1.0 / 3.0 - 0.5))
                + source.sample_uv(uv + offset * (2.0 / 3.0 - 0.5)));
        let rgb_b = rgb_a * 0.5
            + 0.25 * (source.sample_uv(uv - offset * 0.5) + source.sample_uv(uv + offset * 0.5));

        let luma_b = luminance(rgb_b.truncate());
        if luma_b < luma_min || luma_b > luma_max {
            rgb_a.truncate().extend(center.w)
        } else {
            rgb_b.truncate().extend(center.w)
        }
    }

    pub fn run(&self, source: &ColorTarget, settings: &FxaaSettings, out: &mut ColorTarget) {
        for y in 0..out.height() {
            for x in 0..out.width() {
                out.set_texel(x, y, self.filter_at(x, y, source, settings));
            }
        }
    }
}

impl Default for FxaaPass {
    fn default() -> Self {
        Self::new()
    }
}

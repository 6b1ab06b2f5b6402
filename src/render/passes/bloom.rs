//! Bloom Pass
//!
//! Bright-pass extraction followed by a separable 5-tap gaussian blur and an
//! additive composite. Running the horizontal and vertical kernels in
//! sequence is equivalent to the full 5x5 gaussian since the 2D kernel is
//! the outer product of the 1D weights.

use glam::Vec4;

use super::luminance;
use crate::render::target::ColorTarget;
use crate::resources::post::{BlurAxis, BloomSettings};

/// Normalized 1D gaussian weights for the center tap and offsets 1 and 2.
pub const BLUR_WEIGHTS: [f32; 3] = [0.402_620, 0.244_201, 0.054_489];

pub struct BloomPass;

impl BloomPass {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Keeps only pixels whose luminance exceeds the threshold.
    pub fn extract_bright(
        &self,
        source: &ColorTarget,
        settings: &BloomSettings,
        out: &mut ColorTarget,
    ) {
        for y in 0..out.height() {
            for x in 0..out.width() {
                let color = source.texel(x, y);
                if luminance(color.truncate()) > settings.threshold {
                    out.set_texel(x, y, color.truncate().extend(1.0));
                } else {
                    out.set_texel(x, y, Vec4::ZERO);
                }
            }
        }
    }

    /// One axis of the separable gaussian. Edge texels clamp.
    pub fn blur(&self, source: &ColorTarget, axis: BlurAxis, out: &mut ColorTarget) {
        let (dx, dy) = match axis {
            BlurAxis::Horizontal => (1i64, 0i64),
            BlurAxis::Vertical => (0i64, 1i64),
        };
        for y in 0..out.height() {
            for x in 0..out.width() {
                let mut acc = source.texel(x, y) * BLUR_WEIGHTS[0];
                for (offset, &weight) in (1..=2i64).zip(&BLUR_WEIGHTS[1..]) {
                    let px = x as i64;
                    let py = y as i64;
                    acc += source.fetch_clamped(px + dx * offset, py + dy * offset) * weight;
                    acc += source.fetch_clamped(px - dx * offset, py - dy * offset) * weight;
                }
                out.set_texel(x, y, acc);
            }
        }
    }

    /// Adds the blurred bright pass back onto the scene color.
    pub fn composite(
        &self,
        scene: &ColorTarget,
        bloom: &ColorTarget,
        settings: &BloomSettings,
        out: &mut ColorTarget,
    ) {
        for y in 0..out.height() {
            for x in 0..out.width() {
                let base = scene.texel(x, y);
                let glow = bloom.texel(x, y).truncate() * settings.intensity;
                out.set_texel(x, y, (base.truncate() + glow).extend(base.w));
            }
        }
    }

    /// Full bright-extract, two-axis blur, composite sequence.
    pub fn run(
        &self,
        scene: &ColorTarget,
        settings: &BloomSettings,
        scratch_a: &mut ColorTarget,
        scratch_b: &mut ColorTarget,
        out: &mut ColorTarget,
    ) {
        self.extract_bright(scene, settings, scratch_a);
        self.blur(scratch_a, BlurAxis::Horizontal, scratch_b);
        self.blur(scratch_b, BlurAxis::Vertical, scratch_a);
        self.composite(scene, scratch_a, settings, out);
    }
}

impl Default for BloomPass {
    fn default() -> Self {
        Self::new()
    }
}

//! Present Pass
//!
//! Maps the HDR frame down to display range with the configured tone mapping
//! operator, then applies gamma encoding. Output channels are clamped to the
//! unit range.

use glam::Vec3;

use crate::render::target::ColorTarget;
use crate::resources::post::{ToneMappingMode, ToneMappingSettings};

/// ACES filmic curve fit (Narkowicz 2015).
fn aces_filmic(c: Vec3) -> Vec3 {
    let num = c * (2.51 * c + Vec3::splat(0.03));
    let den = c * (2.43 * c + Vec3::splat(0.59)) + Vec3::splat(0.14);
    num / den
}

fn reinhard(c: Vec3) -> Vec3 {
    c / (Vec3::ONE + c)
}

pub struct PresentPass;

impl PresentPass {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// HDR to display transform for a single color.
    #[must_use]
    pub fn tone_map(&self, color: Vec3, settings: &ToneMappingSettings) -> Vec3 {
        let mapped = match settings.mode {
            ToneMappingMode::Linear => color,
            ToneMappingMode::Reinhard => reinhard(color),
            ToneMappingMode::AcesFilmic => aces_filmic(color),
        };
        let clamped = mapped.clamp(Vec3::ZERO, Vec3::ONE);
        clamped.powf(1.0 / settings.gamma)
    }

    pub fn run(&self, source: &ColorTarget, settings: &ToneMappingSettings, out: &mut ColorTarget) {
        for y in 0..out.height() {
            for x in 0..out.width() {
                let hdr = source.texel(x, y);
                let ldr = self.tone_map(hdr.truncate(), settings);
                out.set_texel(x, y, ldr.extend(1.0));
            }
        }
    }
}

impl Default for PresentPass {
    fn default() -> Self {
        Self::new()
    }
}

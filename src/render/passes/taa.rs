//! Temporal Anti-Aliasing Pass
//!
//! Blends the current frame against the accumulated history, clamping the
//! history sample to the 3x3 neighborhood bounds of the current frame to
//! reject stale colors after disocclusion. The very first frame has no
//! history and passes through unchanged.

use glam::Vec4;

use crate::render::target::ColorTarget;
use crate::render::temporal::TemporalState;
use crate::resources::post::TaaSettings;

pub struct TaaPass;

impl TaaPass {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// History-clamped blend for one pixel.
    #[must_use]
    pub fn resolve_at(
        &self,
        x: usize,
        y: usize,
        current: &ColorTarget,
        history: &ColorTarget,
        settings: &TaaSettings,
    ) -> Vec4 {
        let center = current.texel(x, y);

        let mut lo = center;
        let mut hi = center;
        for oy in -1..=1i64 {
            for ox in -1..=1i64 {
                let neighbor = current.fetch_clamped(x as i64 + ox, y as i64 + oy);
                lo = lo.min(neighbor);
                hi = hi.max(neighbor);
            }
        }

        let clamped = history.texel(x, y).clamp(lo, hi);
        clamped * settings.feedback + center * (1.0 - settings.feedback)
    }

    /// Resolves the frame and records it as the next history.
    pub fn run(
        &self,
        current: &ColorTarget,
        temporal: &mut TemporalState,
        settings: &TaaSettings,
        out: &mut ColorTarget,
    ) {
        if temporal.is_first_frame() {
            out.copy_from(current);
        } else {
            for y in 0..out.height() {
                for x in 0..out.width() {
                    let c = self.resolve_at(x, y, current, temporal.history(), settings);
                    out.set_texel(x, y, c);
                }
            }
        }
        temporal.record_history(out);
    }
}

impl Default for TaaPass {
    fn default() -> Self {
        Self::new()
    }
}

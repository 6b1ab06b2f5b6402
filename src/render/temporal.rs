//! Temporal State
//!
//! Cross-frame state owned by the pipeline orchestrator: the sub-pixel jitter
//! sequence applied to the camera projection, and the double-buffered TAA
//! history color texture. The two history buffers swap roles (read vs. write)
//! every frame; no external access to the non-current buffer is permitted.

use glam::{Mat4, Vec2};

use super::target::ColorTarget;

/// Length of the jitter sequence; `halton_jitter(i) == halton_jitter(i + 8)`.
pub const JITTER_SEQUENCE_LEN: usize = 8;

/// The 8-entry Halton(2,3) sequence, centered on zero. Values are in the
/// half-texel pixel-space range [-0.5, 0.5).
const JITTER_SEQUENCE: [Vec2; JITTER_SEQUENCE_LEN] = [
    Vec2::new(1.0 / 2.0 - 0.5, 1.0 / 3.0 - 0.5),
    Vec2::new(1.0 / 4.0 - 0.5, 2.0 / 3.0 - 0.5),
    Vec2::new(3.0 / 4.0 - 0.5, 1.0 / 9.0 - 0.5),
    Vec2::new(1.0 / 8.0 - 0.5, 4.0 / 9.0 - 0.5),
    Vec2::new(5.0 / 8.0 - 0.5, 7.0 / 9.0 - 0.5),
    Vec2::new(3.0 / 8.0 - 0.5, 2.0 / 9.0 - 0.5),
    Vec2::new(7.0 / 8.0 - 0.5, 5.0 / 9.0 - 0.5),
    Vec2::new(1.0 / 16.0 - 0.5, 8.0 / 9.0 - 0.5),
];

/// Pixel-space sub-pixel jitter for frame `index` (period 8).
#[must_use]
pub fn halton_jitter(index: u64) -> Vec2 {
    JITTER_SEQUENCE[(index % JITTER_SEQUENCE_LEN as u64) as usize]
}

/// Converts a pixel-space jitter into an NDC offset for the given target
/// size and returns the perturbed projection matrix.
#[must_use]
pub fn jittered_projection(projection: Mat4, jitter: Vec2, width: usize, height: usize) -> Mat4 {
    let ndc = Vec2::new(
        2.0 * jitter.x / width as f32,
        2.0 * jitter.y / height as f32,
    );
    let mut jittered = projection;
    jittered.z_axis.x += ndc.x;
    jittered.z_axis.y += ndc.y;
    jittered
}

/// Double-buffered TAA history plus the frame counter driving the jitter.
#[derive(Debug)]
pub struct TemporalState {
    history: [ColorTarget; 2],
    /// Index of the buffer holding last frame's resolved color.
    read_index: usize,
    frame_index: u64,
    first_frame: bool,
}

impl TemporalState {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            history: [
                ColorTarget::new(width, height),
                ColorTarget::new(width, height),
            ],
            read_index: 0,
            frame_index: 0,
            first_frame: true,
        }
    }

    /// Frames executed since pipeline initialization.
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Whether the upcoming TAA resolve is the first of this pipeline's life
    /// (history bypass — there is no prior frame to blend against).
    #[must_use]
    pub fn is_first_frame(&self) -> bool {
        self.first_frame
    }

    /// Jitter for the current frame.
    #[must_use]
    pub fn current_jitter(&self) -> Vec2 {
        halton_jitter(self.frame_index)
    }

    /// Last frame's resolved color (the "current" history buffer).
    #[must_use]
    pub fn history(&self) -> &ColorTarget {
        &self.history[self.read_index]
    }

    /// Records `resolved` as this frame's history into the write buffer.
    pub fn record_history(&mut self, resolved: &ColorTarget) {
        self.history[1 - self.read_index].copy_from(resolved);
    }

    /// Ends the frame: swaps the history buffers and advances the jitter.
    pub fn advance(&mut self) {
        self.read_index = 1 - self.read_index;
        self.frame_index += 1;
        self.first_frame = false;
    }
}

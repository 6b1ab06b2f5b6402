//! Post-Process Configuration
//!
//! Settings for every post-geometry pass as pure data structures, plus the
//! deterministic SSAO kernel/noise generators. Passes read these at execution
//! time; nothing here touches the backend.

use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ============================================================================
// SSAO
// ============================================================================

/// Hard upper bound on the SSAO hemisphere kernel size.
pub const MAX_SSAO_SAMPLES: usize = 64;

/// Screen-space ambient occlusion configuration.
#[derive(Debug, Clone)]
pub struct SsaoSettings {
    /// Sampling radius in view-space units.
    pub radius: f32,
    /// Depth bias preventing self-occlusion on flat surfaces.
    pub bias: f32,
    /// Contrast-control exponent applied to `1 - occlusion_ratio`.
    pub power: f32,
    /// Hemisphere samples per pixel, clamped to [`MAX_SSAO_SAMPLES`].
    pub sample_count: usize,
}

impl Default for SsaoSettings {
    fn default() -> Self {
        Self {
            radius: 0.5,
            bias: 0.025,
            power: 1.5,
            sample_count: 32,
        }
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Generates a hemisphere sample kernel with importance-weighted distribution.
///
/// Uses a fixed seed for deterministic results across frames and sessions.
/// Samples concentrate near the origin via a quadratic falloff curve.
#[must_use]
pub fn generate_ssao_kernel(samples: usize) -> Vec<Vec3> {
    let samples = samples.clamp(1, MAX_SSAO_SAMPLES);
    let mut rng = StdRng::seed_from_u64(42);
    let mut kernel = Vec::with_capacity(samples);

    for i in 0..samples {
        // Random direction in the upper hemisphere (Z > 0).
        let mut sample = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(0.0..=1.0f32),
        )
        .normalize_or_zero();
        if sample == Vec3::ZERO {
            sample = Vec3::Z;
        }
        sample *= rng.gen_range(0.0..=1.0f32);

        let t = i as f32 / samples as f32;
        kernel.push(sample * lerp(0.1, 1.0, t * t));
    }

    kernel
}

/// Generates the 4×4 tiled rotation noise: random XY vectors about Z.
#[must_use]
pub fn generate_ssao_noise() -> [Vec2; 16] {
    let mut rng = StdRng::seed_from_u64(1337);
    std::array::from_fn(|_| {
        Vec2::new(rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0))
    })
}

// ============================================================================
// SSR
// ============================================================================

/// Screen-space reflection configuration.
#[derive(Debug, Clone)]
pub struct SsrSettings {
    /// Fixed ray-march step count.
    pub max_steps: usize,
    /// View-space step length.
    pub step_length: f32,
    /// Depth-difference window declaring a hit.
    pub thickness: f32,
    /// Reflections are not computed above this roughness.
    pub roughness_cutoff: f32,
}

impl Default for SsrSettings {
    fn default() -> Self {
        Self {
            max_steps: 32,
            step_length: 0.25,
            thickness: 0.3,
            roughness_cutoff: 0.6,
        }
    }
}

// ============================================================================
// Bloom
// ============================================================================

/// Separable-blur axis flag, shared by the horizontal and vertical passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurAxis {
    Horizontal,
    Vertical,
}

/// Bloom extraction and blur configuration.
#[derive(Debug, Clone)]
pub struct BloomSettings {
    /// Luminance threshold for the bright-pass extraction.
    pub threshold: f32,
    /// Blend factor of the blurred result into the scene color.
    pub intensity: f32,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            threshold: 1.0,
            intensity: 0.6,
        }
    }
}

// ============================================================================
// TAA
// ============================================================================

/// Temporal anti-aliasing configuration.
#[derive(Debug, Clone)]
pub struct TaaSettings {
    /// History feedback weight in [0, 1); the current frame contributes
    /// `1 - feedback`.
    pub feedback: f32,
}

impl Default for TaaSettings {
    fn default() -> Self {
        Self { feedback: 0.9 }
    }
}

// ============================================================================
// FXAA
// ============================================================================

/// FXAA edge-detection configuration.
#[derive(Debug, Clone)]
pub struct FxaaSettings {
    /// Relative contrast threshold (fraction of local max luma).
    pub edge_threshold: f32,
    /// Absolute contrast floor below which pixels are never touched.
    pub edge_threshold_min: f32,
    /// Maximum search span in texels along the dominant gradient.
    pub span_max: f32,
}

impl Default for FxaaSettings {
    fn default() -> Self {
        Self {
            edge_threshold: 0.125,
            edge_threshold_min: 0.0312,
            span_max: 8.0,
        }
    }
}

// ============================================================================
// Tone Mapping
// ============================================================================

/// Tone mapping operator selection for the present stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ToneMappingMode {
    /// No tone mapping (debugging / LDR workflows).
    Linear,
    /// Classic Reinhard operator, soft highlight rolloff.
    Reinhard,
    /// ACES filmic rational approximation (industry standard).
    #[default]
    AcesFilmic,
}

/// Present-stage configuration: operator plus output gamma.
#[derive(Debug, Clone)]
pub struct ToneMappingSettings {
    pub mode: ToneMappingMode,
    /// Output gamma; display color is `linear^(1/gamma)`.
    pub gamma: f32,
}

impl Default for ToneMappingSettings {
    fn default() -> Self {
        Self {
            mode: ToneMappingMode::AcesFilmic,
            gamma: 2.2,
        }
    }
}

// ============================================================================
// Aggregate
// ============================================================================

/// All post-process parameters for one pipeline instance.
#[derive(Debug, Clone)]
pub struct PostProcessSettings {
    pub ssao: SsaoSettings,
    pub ssr: SsrSettings,
    pub bloom: BloomSettings,
    pub taa: TaaSettings,
    pub fxaa: FxaaSettings,
    pub tone_mapping: ToneMappingSettings,
    /// Flat ambient color used by the lighting pass (and for background
    /// pixels).
    pub ambient_color: Vec3,
}

impl Default for PostProcessSettings {
    fn default() -> Self {
        Self {
            ssao: SsaoSettings::default(),
            ssr: SsrSettings::default(),
            bloom: BloomSettings::default(),
            taa: TaaSettings::default(),
            fxaa: FxaaSettings::default(),
            tone_mapping: ToneMappingSettings::default(),
            ambient_color: Vec3::splat(0.03),
        }
    }
}

impl PostProcessSettings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

//! Render Targets
//!
//! CPU-resident intermediate textures for the deferred pipeline: the four
//! G-Buffer channels + depth, and the post-process chain targets. The layout
//! is fixed for the lifetime of a pipeline instance; everything here is
//! allocated at pipeline initialization and dropped at shutdown.

use glam::{Vec2, Vec4};

/// Depth value written where no geometry covers a pixel (far clip sentinel).
pub const FAR_DEPTH: f32 = 1.0;

/// A 2D RGBA float texture.
#[derive(Debug, Clone)]
pub struct ColorTarget {
    width: usize,
    height: usize,
    texels: Vec<Vec4>,
}

impl ColorTarget {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            texels: vec![Vec4::ZERO; width * height],
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn fill(&mut self, value: Vec4) {
        self.texels.fill(value);
    }

    #[inline]
    #[must_use]
    pub fn texel(&self, x: usize, y: usize) -> Vec4 {
        self.texels[y * self.width + x]
    }

    #[inline]
    pub fn set_texel(&mut self, x: usize, y: usize, value: Vec4) {
        self.texels[y * self.width + x] = value;
    }

    /// Clamped integer fetch; coordinates outside the target read the edge.
    #[inline]
    #[must_use]
    pub fn fetch_clamped(&self, x: i64, y: i64) -> Vec4 {
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        self.texel(x, y)
    }

    /// Nearest-texel sample at normalized UV (clamped to edge).
    #[must_use]
    pub fn sample_uv(&self, uv: Vec2) -> Vec4 {
        let x = (uv.x * self.width as f32).floor() as i64;
        let y = (uv.y * self.height as f32).floor() as i64;
        self.fetch_clamped(x, y)
    }

    /// Copies the contents of `other`; both targets must share dimensions.
    pub fn copy_from(&mut self, other: &ColorTarget) {
        debug_assert_eq!(self.width, other.width);
        debug_assert_eq!(self.height, other.height);
        self.texels.copy_from_slice(&other.texels);
    }
}

/// A 2D depth texture, cleared to the far sentinel.
#[derive(Debug, Clone)]
pub struct DepthTarget {
    width: usize,
    height: usize,
    texels: Vec<f32>,
}

impl DepthTarget {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            texels: vec![FAR_DEPTH; width * height],
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.texels.fill(FAR_DEPTH);
    }

    #[inline]
    #[must_use]
    pub fn texel(&self, x: usize, y: usize) -> f32 {
        self.texels[y * self.width + x]
    }

    #[inline]
    pub fn set_texel(&mut self, x: usize, y: usize, value: f32) {
        self.texels[y * self.width + x] = value;
    }

    /// Nearest-texel depth at normalized UV (clamped to edge).
    #[must_use]
    pub fn sample_uv(&self, uv: Vec2) -> f32 {
        let x = ((uv.x * self.width as f32).floor() as i64).clamp(0, self.width as i64 - 1);
        let y = ((uv.y * self.height as f32).floor() as i64).clamp(0, self.height as i64 - 1);
        self.texel(x as usize, y as usize)
    }

    /// Whether the pixel holds the far-clip background sentinel.
    #[inline]
    #[must_use]
    pub fn is_background(&self, x: usize, y: usize) -> bool {
        self.texel(x, y) >= FAR_DEPTH
    }
}

/// The four fixed G-Buffer channels plus depth.
///
/// Channel layout (matches the `pbr` fragment template):
/// - `albedo_metallic`: albedo.rgb + metallic
/// - `normal_roughness`: world normal.xyz + roughness
/// - `emissive_occlusion`: emissive.rgb + baked occlusion
/// - `advanced`: clearcoat + subsurface scalars
#[derive(Debug, Clone)]
pub struct GBuffer {
    pub albedo_metallic: ColorTarget,
    pub normal_roughness: ColorTarget,
    pub emissive_occlusion: ColorTarget,
    pub advanced: ColorTarget,
    pub depth: DepthTarget,
}

impl GBuffer {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            albedo_metallic: ColorTarget::new(width, height),
            normal_roughness: ColorTarget::new(width, height),
            emissive_occlusion: ColorTarget::new(width, height),
            advanced: ColorTarget::new(width, height),
            depth: DepthTarget::new(width, height),
        }
    }
}

/// The full intermediate-target set owned by one pipeline instance.
#[derive(Debug)]
pub struct FrameTargets {
    pub gbuffer: GBuffer,
    /// SSAO visibility (r), 1.0 = fully visible.
    pub ambient_occlusion: ColorTarget,
    /// SSR color (rgb) + confidence (a).
    pub reflections: ColorTarget,
    /// HDR lighting result.
    pub hdr: ColorTarget,
    /// Bloom bright-pass / blur scratch.
    pub bloom_a: ColorTarget,
    /// Bloom blur scratch; ends the stage holding the composite.
    pub bloom_b: ColorTarget,
    /// TAA-resolved HDR color.
    pub taa: ColorTarget,
    /// FXAA output.
    pub antialiased: ColorTarget,
    /// Final display color after tone mapping + gamma.
    pub output: ColorTarget,
}

impl FrameTargets {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            gbuffer: GBuffer::new(width, height),
            ambient_occlusion: ColorTarget::new(width, height),
            reflections: ColorTarget::new(width, height),
            hdr: ColorTarget::new(width, height),
            bloom_a: ColorTarget::new(width, height),
            bloom_b: ColorTarget::new(width, height),
            taa: ColorTarget::new(width, height),
            antialiased: ColorTarget::new(width, height),
            output: ColorTarget::new(width, height),
        }
    }
}

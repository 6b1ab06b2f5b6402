//! Material Configuration
//!
//! Pure per-draw material data supplied by the scene layer. The feature
//! extractor maps this configuration to a shader variant key; the geometry
//! pass packs the scalar factors into the per-draw uniform block.

use glam::{Vec3, Vec4};

/// Reference to an externally owned texture. The rendering core only cares
/// about presence (it drives feature extraction); resolution and sampling
/// happen inside the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureRef(pub u32);

/// Per-draw material configuration.
///
/// Optional texture references enable the corresponding map features; scalar
/// fields gate the scalar features (see
/// [`extract_features`](crate::shader::extract_features)).
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialConfig {
    pub base_color: Vec4,
    pub metallic: f32,
    pub roughness: f32,
    pub emissive_factor: Vec3,

    pub albedo_map: Option<TextureRef>,
    pub normal_map: Option<TextureRef>,
    pub metallic_roughness_map: Option<TextureRef>,
    pub occlusion_map: Option<TextureRef>,
    pub emissive_map: Option<TextureRef>,
    pub height_map: Option<TextureRef>,

    /// Opacity below this threshold is discarded. Zero disables the cutoff.
    pub alpha_cutoff: f32,
    /// Clearcoat layer strength. Zero disables the clearcoat channel.
    pub clearcoat: f32,
    /// Parallax depth scale; combined with a height map it enables the
    /// UV-offset path.
    pub parallax_scale: f32,
    /// Subsurface scattering strength. Zero disables the channel.
    pub subsurface: f32,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            base_color: Vec4::ONE,
            metallic: 0.0,
            roughness: 1.0,
            emissive_factor: Vec3::ZERO,
            albedo_map: None,
            normal_map: None,
            metallic_roughness_map: None,
            occlusion_map: None,
            emissive_map: None,
            height_map: None,
            alpha_cutoff: 0.0,
            clearcoat: 0.0,
            parallax_scale: 0.0,
            subsurface: 0.0,
        }
    }
}

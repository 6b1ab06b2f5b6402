//! Geometry Pass
//!
//! First stage of the frame: clears the G-Buffer, then walks the scene's
//! drawables, selects a program variant for each through the shader library
//! (feature extraction → variant cache), and submits the draw to the backend
//! with its packed per-draw uniform block.
//!
//! Parallax UV offsetting and alpha-cutoff discard are feature-gated code
//! paths inside the `pbr` templates; this pass only decides which variants
//! exist and what scalar factors they receive.

use glam::Vec4;

use crate::backend::{DrawUniforms, RenderBackend};
use crate::errors::Result;
use crate::render::target::GBuffer;
use crate::scene::{Drawable, Scene};
use crate::shader::{ShaderLibrary, extract_features};

pub struct GeometryPass;

impl GeometryPass {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Packs the per-draw uniform block the templates expect.
    #[must_use]
    pub fn draw_uniforms(drawable: &Drawable) -> DrawUniforms {
        let m = &drawable.material;
        DrawUniforms {
            model: drawable.transform,
            base_color: m.base_color,
            material_params: Vec4::new(m.metallic, m.roughness, m.alpha_cutoff, m.parallax_scale),
            advanced_params: Vec4::new(m.clearcoat, m.subsurface, 0.0, 0.0),
            emissive_factor: m.emissive_factor.extend(0.0),
        }
    }

    /// Clears the G-Buffer and submits every drawable.
    ///
    /// A compile failure for any drawable's variant aborts the pass and
    /// propagates; nothing is retried.
    pub fn run(
        &self,
        scene: &Scene,
        library: &mut ShaderLibrary,
        backend: &mut dyn RenderBackend,
        gbuffer: &mut GBuffer,
    ) -> Result<()> {
        gbuffer.depth.clear();
        gbuffer.albedo_metallic.fill(Vec4::ZERO);
        gbuffer.normal_roughness.fill(Vec4::ZERO);
        gbuffer.emissive_occlusion.fill(Vec4::new(0.0, 0.0, 0.0, 1.0));
        gbuffer.advanced.fill(Vec4::ZERO);

        for drawable in &scene.drawables {
            let key = extract_features(&drawable.material);
            let program = library.get_or_compile(backend, key)?;
            backend.submit_draw(program.handle, &Self::draw_uniforms(drawable));
        }

        Ok(())
    }
}

impl Default for GeometryPass {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HeadlessBackend;
    use crate::resources::material::{MaterialConfig, TextureRef};
    use glam::{Mat4, Vec4Swizzles};

    fn scene_with(materials: Vec<MaterialConfig>) -> Scene {
        let mut scene = Scene::new();
        scene.drawables = materials
            .into_iter()
            .map(|material| Drawable {
                material,
                transform: Mat4::IDENTITY,
            })
            .collect();
        scene
    }

    #[test]
    fn identical_materials_share_one_variant() {
        let mut backend = HeadlessBackend::new();
        let mut library = ShaderLibrary::new("pbr");
        let mut gbuffer = GBuffer::new(4, 4);

        let scene = scene_with(vec![MaterialConfig::default(); 1000]);
        backend.begin_frame();
        GeometryPass::new()
            .run(&scene, &mut library, &mut backend, &mut gbuffer)
            .unwrap();

        assert_eq!(library.variant_count(), 1);
        assert_eq!(backend.compile_count(), 1);
        assert_eq!(backend.frame_draws().len(), 1000);
    }

    #[test]
    fn distinct_materials_compile_distinct_variants() {
        let mut backend = HeadlessBackend::new();
        let mut library = ShaderLibrary::new("pbr");
        let mut gbuffer = GBuffer::new(4, 4);

        let textured = MaterialConfig {
            albedo_map: Some(TextureRef(1)),
            ..MaterialConfig::default()
        };
        let scene = scene_with(vec![MaterialConfig::default(), textured]);
        backend.begin_frame();
        GeometryPass::new()
            .run(&scene, &mut library, &mut backend, &mut gbuffer)
            .unwrap();

        assert_eq!(library.variant_count(), 2);
    }

    #[test]
    fn uniforms_pack_material_scalars() {
        let drawable = Drawable {
            material: MaterialConfig {
                metallic: 0.9,
                roughness: 0.4,
                alpha_cutoff: 0.5,
                parallax_scale: 0.04,
                clearcoat: 0.7,
                subsurface: 0.2,
                ..MaterialConfig::default()
            },
            transform: Mat4::IDENTITY,
        };

        let uniforms = GeometryPass::draw_uniforms(&drawable);
        assert_eq!(uniforms.material_params, Vec4::new(0.9, 0.4, 0.5, 0.04));
        assert_eq!(uniforms.advanced_params.xy(), glam::Vec2::new(0.7, 0.2));
    }
}

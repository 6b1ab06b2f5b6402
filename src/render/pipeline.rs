//! Deferred Render Pipeline
//!
//! Owns the backend, the shader library, the frame targets and the temporal
//! state, and runs the fixed pass sequence each frame: geometry, ambient
//! occlusion, reflections, lighting, bloom, temporal anti-aliasing, FXAA,
//! present.
//!
//! The pipeline is a small state machine. It starts `Uninitialized`, moves
//! to `Active` on the first `execute` and to `Shutdown` on `shutdown`.
//! `Shutdown` is terminal.

use crate::backend::RenderBackend;
use crate::errors::{RenderError, Result};
use crate::render::passes::{
    BloomPass, FrameUniforms, FxaaPass, GeometryPass, LightingPass, PresentPass, SsaoPass,
    SsrPass, TaaPass,
};
use crate::render::target::{ColorTarget, FrameTargets};
use crate::render::temporal::{TemporalState, jittered_projection};
use crate::resources::post::{BlurAxis, PostProcessSettings};
use crate::scene::Scene;
use crate::shader::features::FeatureSet;
use crate::shader::library::ShaderLibrary;

const SHADER_FAMILY: &str = "pbr";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Uninitialized,
    Active,
    Shutdown,
}

pub struct Pipeline<B: RenderBackend> {
    backend: B,
    library: ShaderLibrary,
    settings: PostProcessSettings,
    targets: FrameTargets,
    temporal: TemporalState,
    geometry: GeometryPass,
    ssao: SsaoPass,
    ssr: SsrPass,
    lighting: LightingPass,
    bloom: BloomPass,
    taa: TaaPass,
    fxaa: FxaaPass,
    present: PresentPass,
    state: PipelineState,
    width: usize,
    height: usize,
}

impl<B: RenderBackend> Pipeline<B> {
    pub fn new(backend: B, width: usize, height: usize, settings: PostProcessSettings) -> Self {
        let ssao = SsaoPass::new(&settings.ssao);
        Self {
            backend,
            library: ShaderLibrary::new(SHADER_FAMILY),
            settings,
            targets: FrameTargets::new(width, height),
            temporal: TemporalState::new(width, height),
            geometry: GeometryPass::new(),
            ssao,
            ssr: SsrPass::new(),
            lighting: LightingPass::new(),
            bloom: BloomPass::new(),
            taa: TaaPass::new(),
            fxaa: FxaaPass::new(),
            present: PresentPass::new(),
            state: PipelineState::Uninitialized,
            width,
            height,
        }
    }

    #[must_use]
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Number of shader variants compiled so far.
    #[must_use]
    pub fn variant_count(&self) -> usize {
        self.library.variant_count()
    }

    /// The presented frame from the most recent `execute`.
    #[must_use]
    pub fn output(&self) -> &ColorTarget {
        &self.targets.output
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub fn settings(&self) -> &PostProcessSettings {
        &self.settings
    }

    fn ensure_active(&mut self) -> Result<()> {
        match self.state {
            PipelineState::Shutdown => Err(RenderError::PipelineShutDown),
            PipelineState::Active => Ok(()),
            PipelineState::Uninitialized => {
                self.backend.initialize()?;
                self.state = PipelineState::Active;
                log::debug!("pipeline initialized at {}x{}", self.width, self.height);
                Ok(())
            }
        }
    }

    /// Compiles the given variant keys ahead of the first frame that needs
    /// them. Initializes the backend if necessary.
    pub fn warm_variants(&mut self, keys: impl IntoIterator<Item = FeatureSet>) -> Result<()> {
        self.ensure_active()?;
        self.library.warm(&mut self.backend, keys)
    }

    /// Renders one frame of `scene` into the output target.
    ///
    /// The first call initializes the backend; later calls reuse it. Calling
    /// after `shutdown` fails with [`RenderError::PipelineShutDown`].
    pub fn execute(&mut self, scene: &Scene) -> Result<()> {
        self.ensure_active()?;
        self.backend.begin_frame();

        let jitter = self.temporal.current_jitter();
        let projection = jittered_projection(scene.camera.projection, jitter, self.width, self.height);
        let frame = FrameUniforms::new(&scene.camera, projection, &self.settings);

        self.geometry.run(
            scene,
            &mut self.library,
            &mut self.backend,
            &mut self.targets.gbuffer,
        )?;

        self.ssao.run(
            &self.targets.gbuffer,
            &frame,
            &self.settings.ssao,
            &mut self.targets.ambient_occlusion,
        );

        // Reflections sample the previous frame's lighting result: `hdr` is
        // not rewritten until the lighting pass below, so at this point it
        // still holds last frame's output (zero on the first frame).
        self.ssr.run(
            &self.targets.gbuffer,
            &self.targets.hdr,
            &frame,
            &self.settings.ssr,
            &mut self.targets.reflections,
        );

        self.lighting.run(
            &self.targets.gbuffer,
            &self.targets.ambient_occlusion,
            &self.targets.reflections,
            &scene.lights,
            &frame,
            &mut self.targets.hdr,
        );

        self.bloom
            .extract_bright(&self.targets.hdr, &self.settings.bloom, &mut self.targets.bloom_a);
        self.bloom
            .blur(&self.targets.bloom_a, BlurAxis::Horizontal, &mut self.targets.bloom_b);
        self.bloom
            .blur(&self.targets.bloom_b, BlurAxis::Vertical, &mut self.targets.bloom_a);
        self.bloom.composite(
            &self.targets.hdr,
            &self.targets.bloom_a,
            &self.settings.bloom,
            &mut self.targets.bloom_b,
        );

        self.taa.run(
            &self.targets.bloom_b,
            &mut self.temporal,
            &self.settings.taa,
            &mut self.targets.taa,
        );

        self.fxaa
            .run(&self.targets.taa, &self.settings.fxaa, &mut self.targets.antialiased);

        self.present.run(
            &self.targets.antialiased,
            &self.settings.tone_mapping,
            &mut self.targets.output,
        );

        self.temporal.advance();
        Ok(())
    }

    /// Releases every compiled variant and the backend. No-op unless the
    /// pipeline is `Active`; after the transition the pipeline cannot be
    /// used again.
    pub fn shutdown(&mut self) {
        if self.state != PipelineState::Active {
            return;
        }
        self.library.destroy(&mut self.backend);
        self.backend.release();
        self.state = PipelineState::Shutdown;
        log::debug!("pipeline shut down");
    }
}

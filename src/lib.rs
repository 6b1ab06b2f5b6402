//! Cinder is a headless deferred rendering core. It turns a scene of
//! drawables, lights and a camera into a presented frame through a fixed
//! pass sequence, compiling exactly one shader program per distinct
//! material feature combination along the way.
//!
//! The two halves of the crate:
//!
//! - [`shader`]: feature extraction, deterministic template-driven source
//!   generation and the per-family variant cache.
//! - [`render`]: CPU frame targets and the pass pipeline (geometry, SSAO,
//!   SSR, PBR lighting, bloom, TAA, FXAA, present).
//!
//! Device access sits behind [`RenderBackend`]; [`HeadlessBackend`] is the
//! bundled implementation used for tests and offline validation.

pub mod backend;
pub mod errors;
pub mod render;
pub mod resources;
pub mod scene;
pub mod shader;

pub use backend::{DrawUniforms, HeadlessBackend, ProgramHandle, RenderBackend};
pub use errors::{RenderError, Result};
pub use render::passes::{
    BloomPass, FrameUniforms, FxaaPass, GeometryPass, LightingPass, PresentPass, SsaoPass, SsrPass,
    TaaPass,
};
pub use render::pipeline::{Pipeline, PipelineState};
pub use render::target::{ColorTarget, DepthTarget, FrameTargets, GBuffer};
pub use render::temporal::{TemporalState, halton_jitter, jittered_projection};
pub use resources::lights::{DirectionalLight, LightData, PointLight};
pub use resources::material::{MaterialConfig, TextureRef};
pub use resources::post::{PostProcessSettings, ToneMappingMode};
pub use scene::{Camera, Drawable, Scene};
pub use shader::features::{Feature, FeatureSet, extract_features};
pub use shader::generator::{ShaderGenerator, ShaderStage};
pub use shader::library::{CompiledProgram, ShaderLibrary};

//! Pure-data resources: material configuration, bounded light data, and
//! post-process settings.

pub mod lights;
pub mod material;
pub mod post;

pub use lights::{
    DirectionalLight, LightData, MAX_DIRECTIONAL_LIGHTS, MAX_POINT_LIGHTS, PointLight,
};
pub use material::{MaterialConfig, TextureRef};
pub use post::{
    BloomSettings, BlurAxis, FxaaSettings, MAX_SSAO_SAMPLES, PostProcessSettings, SsaoSettings,
    SsrSettings, TaaSettings, ToneMappingMode, ToneMappingSettings,
};

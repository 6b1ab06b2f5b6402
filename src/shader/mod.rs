//! Shader variant management: feature extraction, deterministic source
//! generation, and the per-family variant cache.

pub mod features;
pub mod generator;
pub mod library;

pub use features::{Feature, FeatureSet, extract_features};
pub use generator::{ShaderGenerator, ShaderStage};
pub use library::{CompiledProgram, ShaderLibrary};

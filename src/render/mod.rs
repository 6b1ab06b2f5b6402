//! Render Module
//!
//! Frame targets, temporal accumulation state and the deferred pass
//! pipeline.

pub mod passes;
pub mod pipeline;
pub mod target;
pub mod temporal;

pub use pipeline::{Pipeline, PipelineState};
pub use target::{ColorTarget, DepthTarget, FrameTargets, GBuffer};
pub use temporal::{TemporalState, halton_jitter, jittered_projection};

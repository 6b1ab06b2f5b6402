//! Error Types
//!
//! The single error type [`RenderError`] covers every fatal condition in this
//! core. There are no retries anywhere: a compile failure or allocation
//! failure aborts the triggering call and propagates to the owner of the
//! pipeline.
//!
//! Lifecycle misuse (double-initialize, redundant shutdown) is deliberately
//! *not* represented here — both are no-ops. The one exception is calling
//! [`Pipeline::execute`](crate::render::pipeline::Pipeline::execute) on a
//! pipeline that has already been shut down, which is rejected with
//! [`RenderError::PipelineShutDown`].

use thiserror::Error;

/// The error type for the rendering core.
#[derive(Error, Debug)]
pub enum RenderError {
    // ========================================================================
    // Shader Compilation
    // ========================================================================
    /// The backend (or the template engine) rejected generated shader source.
    ///
    /// Fatal for the triggering call: the variant is *not* cached and *not*
    /// retried. Template bugs are programmer errors, not transient conditions.
    #[error("Shader compile failed for family '{family}': {message}")]
    ShaderCompile {
        /// Shader family that owns the offending template pair.
        family: String,
        /// Backend or template engine diagnostic.
        message: String,
    },

    // ========================================================================
    // Resources
    // ========================================================================
    /// Texture or program allocation failed in the backend, including during
    /// backend initialization.
    #[error("Resource allocation failed: {0}")]
    ResourceAllocation(String),

    // ========================================================================
    // Lifecycle
    // ========================================================================
    /// `execute` was called on a pipeline that has been shut down.
    ///
    /// Re-initializing a shut-down pipeline is unsupported by design; create
    /// a fresh pipeline instead.
    #[error("Pipeline has been shut down and cannot execute frames")]
    PipelineShutDown,
}

/// Alias for `Result<T, RenderError>`.
pub type Result<T> = std::result::Result<T, RenderError>;

//! Render Backend Seam
//!
//! Everything device-shaped funnels through the [`RenderBackend`] trait:
//! program compilation, per-draw submission, and lifecycle. The pipeline and
//! the shader library only ever see opaque [`ProgramHandle`]s, so the core
//! stays testable and the set of implementers stays closed (a GPU-API backend
//! and the bundled [`HeadlessBackend`]).
//!
//! All operations are synchronous and run on the calling thread. A compile
//! failure is fatal for the triggering call — it is not cached and not
//! retried.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};

use crate::errors::{RenderError, Result};

/// Opaque handle to a compiled program owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub(crate) u32);

impl ProgramHandle {
    /// Raw index value, for diagnostics.
    #[must_use]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Per-draw uniform block handed to the backend with each geometry-pass
/// submission. `repr(C)` + Pod so a GPU backend can upload it verbatim.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct DrawUniforms {
    pub model: Mat4,
    pub base_color: Vec4,
    /// metallic, roughness, alpha_cutoff, parallax_scale
    pub material_params: Vec4,
    /// clearcoat, subsurface, unused, unused
    pub advanced_params: Vec4,
    pub emissive_factor: Vec4,
}

/// The device-facing boundary of the rendering core.
///
/// Ownership is strict: handles returned by `compile_program` remain valid
/// until `destroy_program` (or `release`, which tears everything down).
pub trait RenderBackend {
    /// One-time device initialization. Called exactly once by the pipeline,
    /// on the first `execute`.
    fn initialize(&mut self) -> Result<()>;

    /// Compiles a vertex/fragment source pair into a program.
    fn compile_program(
        &mut self,
        label: &str,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ProgramHandle>;

    /// Releases one compiled program. The handle is invalid afterwards.
    fn destroy_program(&mut self, handle: ProgramHandle);

    /// Marks the start of a frame; implementations reset per-frame state.
    fn begin_frame(&mut self);

    /// Queues one geometry draw with the given program and uniform block.
    fn submit_draw(&mut self, program: ProgramHandle, uniforms: &DrawUniforms);

    /// Releases the device. Called exactly once, at pipeline shutdown.
    fn release(&mut self);

    /// Number of live compiled programs — diagnostics only.
    fn program_count(&self) -> usize;
}

// ============================================================================
// HeadlessBackend
// ============================================================================

#[derive(Debug)]
struct ProgramRecord {
    label: String,
    alive: bool,
}

/// A device-free backend: validates generated source, allocates handles from
/// a contiguous table, and records draw submissions.
///
/// Used for headless execution and for exercising the pipeline without a GPU.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    programs: Vec<ProgramRecord>,
    draws: Vec<(ProgramHandle, DrawUniforms)>,
    compiles: usize,
    initialized: bool,
}

impl HeadlessBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total compile invocations since creation (distinct-variant counting).
    #[must_use]
    pub fn compile_count(&self) -> usize {
        self.compiles
    }

    /// Draws recorded for the current frame.
    #[must_use]
    pub fn frame_draws(&self) -> &[(ProgramHandle, DrawUniforms)] {
        &self.draws
    }

    /// Whether `initialize` has run.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn validate_stage(label: &str, stage: &str, source: &str) -> Result<()> {
        // A template misfire produces structurally broken source; reject it
        // the way a driver would.
        if source.trim().is_empty() || !source.contains("void main") {
            return Err(RenderError::ShaderCompile {
                family: label.to_string(),
                message: format!("{stage} stage has no entry point"),
            });
        }
        let open = source.matches('{').count();
        let close = source.matches('}').count();
        if open != close {
            return Err(RenderError::ShaderCompile {
                family: label.to_string(),
                message: format!("{stage} stage has unbalanced braces ({open} vs {close})"),
            });
        }
        Ok(())
    }
}

impl RenderBackend for HeadlessBackend {
    fn initialize(&mut self) -> Result<()> {
        self.initialized = true;
        Ok(())
    }

    fn compile_program(
        &mut self,
        label: &str,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ProgramHandle> {
        Self::validate_stage(label, "vertex", vertex_source)?;
        Self::validate_stage(label, "fragment", fragment_source)?;

        self.compiles += 1;
        let handle = ProgramHandle(self.programs.len() as u32);
        self.programs.push(ProgramRecord {
            label: label.to_string(),
            alive: true,
        });
        Ok(handle)
    }

    fn destroy_program(&mut self, handle: ProgramHandle) {
        if let Some(record) = self.programs.get_mut(handle.0 as usize) {
            log::trace!("destroying program '{}'", record.label);
            record.alive = false;
        }
    }

    fn begin_frame(&mut self) {
        self.draws.clear();
    }

    fn submit_draw(&mut self, program: ProgramHandle, uniforms: &DrawUniforms) {
        self.draws.push((program, *uniforms));
    }

    fn release(&mut self) {
        for record in &mut self.programs {
            record.alive = false;
        }
        self.draws.clear();
        self.initialized = false;
    }

    fn program_count(&self) -> usize {
        self.programs.iter().filter(|p| p.alive).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_allocates_distinct_handles() {
        let mut backend = HeadlessBackend::new();
        let a = backend
            .compile_program("pbr", "void main() {}", "void main() {}")
            .unwrap();
        let b = backend
            .compile_program("pbr", "void main() {}", "void main() {}")
            .unwrap();
        assert_ne!(a, b);
        assert_eq!(backend.program_count(), 2);
        assert_eq!(backend.compile_count(), 2);
    }

    #[test]
    fn broken_source_is_rejected() {
        let mut backend = HeadlessBackend::new();
        let err = backend
            .compile_program("pbr", "void main() {", "void main() {}")
            .unwrap_err();
        assert!(matches!(err, RenderError::ShaderCompile { .. }));
        assert_eq!(backend.program_count(), 0);
    }

    #[test]
    fn destroy_and_release_drop_programs() {
        let mut backend = HeadlessBackend::new();
        let handle = backend
            .compile_program("pbr", "void main() {}", "void main() {}")
            .unwrap();
        backend.destroy_program(handle);
        assert_eq!(backend.program_count(), 0);

        backend.compile_program("pbr", "void main() {}", "void main() {}").unwrap();
        backend.release();
        assert_eq!(backend.program_count(), 0);
    }
}

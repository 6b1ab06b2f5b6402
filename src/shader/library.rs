//! Shader Variant Library
//!
//! Central owner of all compiled program variants for one shader family.
//! The library maps [`FeatureSet`] variant keys to compiled programs and
//! compiles lazily on first use: a hit returns the stored program with no
//! side effects, a miss assembles source through [`ShaderGenerator`], submits
//! it to the backend, logs the new variant, and caches the result.
//!
//! Compilation is synchronous on the calling (render) thread and can stall a
//! frame at first use of a variant; callers sensitive to hitches should
//! pre-warm expected variants via [`ShaderLibrary::warm`] before entering the
//! steady-state render loop.

use rustc_hash::FxHashMap;
use xxhash_rust::xxh3::xxh3_64;

use super::features::FeatureSet;
use super::generator::ShaderGenerator;
use crate::backend::{ProgramHandle, RenderBackend};
use crate::errors::Result;

/// One compiled variant: the opaque backend handle plus the xxh3 hash of its
/// generated source (diagnostics / reproducibility checks).
///
/// Owned exclusively by the library entry that created it; released only in
/// [`ShaderLibrary::destroy`].
#[derive(Debug, Clone, Copy)]
pub struct CompiledProgram {
    pub handle: ProgramHandle,
    pub source_hash: u64,
}

/// Owns exactly one vertex/fragment template pair (by family name) and the
/// map of compiled variants.
///
/// Invariant: no two entries share an equal key — compiling the same key
/// twice is a cache hit, never a duplicate compile.
pub struct ShaderLibrary {
    family: String,
    variants: FxHashMap<FeatureSet, CompiledProgram>,
}

impl ShaderLibrary {
    /// Creates an empty library for `family` (template pair
    /// `{family}.vert` / `{family}.frag`).
    #[must_use]
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            variants: FxHashMap::default(),
        }
    }

    /// The family name this library owns.
    #[must_use]
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Returns the compiled program for `key`, compiling it on first use.
    ///
    /// Compile failure is fatal for this call: nothing is cached, nothing is
    /// retried, and the error propagates to the caller.
    pub fn get_or_compile(
        &mut self,
        backend: &mut dyn RenderBackend,
        key: FeatureSet,
    ) -> Result<CompiledProgram> {
        if let Some(program) = self.variants.get(&key) {
            return Ok(*program);
        }

        let (vertex, fragment) = ShaderGenerator::generate_pair(&self.family, key)?;

        let mut source_hash = xxh3_64(vertex.as_bytes());
        source_hash ^= xxh3_64(fragment.as_bytes()).rotate_left(1);

        let label = format!("{}[{}]", self.family, key.describe());
        let handle = backend.compile_program(&label, &vertex, &fragment)?;

        let program = CompiledProgram {
            handle,
            source_hash,
        };
        self.variants.insert(key, program);

        log::info!(
            "compiled shader variant {} ({} variants live, source hash {:016x})",
            label,
            self.variants.len(),
            source_hash
        );

        Ok(program)
    }

    /// Pre-compiles the given variant keys so the steady-state render loop
    /// never pays the first-use compile hitch for them.
    pub fn warm(
        &mut self,
        backend: &mut dyn RenderBackend,
        keys: impl IntoIterator<Item = FeatureSet>,
    ) -> Result<()> {
        for key in keys {
            self.get_or_compile(backend, key)?;
        }
        Ok(())
    }

    /// Releases every compiled program's backend handle and empties the map.
    ///
    /// Call exactly once, at pipeline teardown; cache operations afterwards
    /// recompile from scratch against whatever backend they are handed.
    pub fn destroy(&mut self, backend: &mut dyn RenderBackend) {
        for (_, program) in self.variants.drain() {
            backend.destroy_program(program.handle);
        }
        log::debug!("shader library '{}' destroyed", self.family);
    }

    /// Number of currently compiled variants — a diagnostics hook only.
    #[must_use]
    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HeadlessBackend;
    use crate::shader::features::Feature;

    #[test]
    fn second_lookup_is_a_cache_hit() {
        let mut backend = HeadlessBackend::new();
        let mut library = ShaderLibrary::new("pbr");

        let key: FeatureSet = [Feature::AlbedoMap, Feature::NormalMap].into_iter().collect();
        let first = library.get_or_compile(&mut backend, key).unwrap();
        let second = library.get_or_compile(&mut backend, key).unwrap();

        assert_eq!(first.handle, second.handle);
        assert_eq!(first.source_hash, second.source_hash);
        assert_eq!(backend.compile_count(), 1);
        assert_eq!(library.variant_count(), 1);
    }

    #[test]
    fn insertion_order_does_not_split_the_cache() {
        let mut backend = HeadlessBackend::new();
        let mut library = ShaderLibrary::new("pbr");

        let a: FeatureSet = [Feature::Clearcoat, Feature::EmissiveMap].into_iter().collect();
        let b: FeatureSet = [Feature::EmissiveMap, Feature::Clearcoat].into_iter().collect();

        let pa = library.get_or_compile(&mut backend, a).unwrap();
        let pb = library.get_or_compile(&mut backend, b).unwrap();

        assert_eq!(pa.handle, pb.handle);
        assert_eq!(backend.compile_count(), 1);
    }

    #[test]
    fn distinct_keys_compile_distinct_programs() {
        let mut backend = HeadlessBackend::new();
        let mut library = ShaderLibrary::new("pbr");

        let empty = library.get_or_compile(&mut backend, FeatureSet::empty()).unwrap();
        let mapped = library
            .get_or_compile(&mut backend, Feature::AlbedoMap.into())
            .unwrap();

        assert_ne!(empty.handle, mapped.handle);
        assert_ne!(empty.source_hash, mapped.source_hash);
        assert_eq!(library.variant_count(), 2);
    }

    #[test]
    fn destroy_releases_every_handle() {
        let mut backend = HeadlessBackend::new();
        let mut library = ShaderLibrary::new("pbr");

        library.get_or_compile(&mut backend, FeatureSet::empty()).unwrap();
        library
            .get_or_compile(&mut backend, Feature::NormalMap.into())
            .unwrap();
        assert_eq!(backend.program_count(), 2);

        library.destroy(&mut backend);
        assert_eq!(library.variant_count(), 0);
        assert_eq!(backend.program_count(), 0);
    }

    #[test]
    fn unknown_family_propagates_and_caches_nothing() {
        let mut backend = HeadlessBackend::new();
        let mut library = ShaderLibrary::new("missing_family");

        assert!(library.get_or_compile(&mut backend, FeatureSet::empty()).is_err());
        assert_eq!(library.variant_count(), 0);
        assert_eq!(backend.compile_count(), 0);
    }

    #[test]
    fn warm_precompiles_each_key_once() {
        let mut backend = HeadlessBackend::new();
        let mut library = ShaderLibrary::new("pbr");

        let keys = [
            FeatureSet::empty(),
            Feature::AlbedoMap.into(),
            FeatureSet::empty(),
        ];
        library.warm(&mut backend, keys).unwrap();

        assert_eq!(library.variant_count(), 2);
        assert_eq!(backend.compile_count(), 2);
    }
}

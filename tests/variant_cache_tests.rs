//! Shader Variant Cache Tests
//!
//! Tests for:
//! - extract_features: material configuration to feature set mapping
//! - FeatureSet: order-independent equality and fixed emission order
//! - ShaderGenerator: deterministic, byte-identical source per key
//! - ShaderLibrary: compile-once cache, failure propagation, destroy

use cinder::{
    Feature, FeatureSet, HeadlessBackend, MaterialConfig, RenderBackend, RenderError,
    ShaderGenerator, ShaderLibrary, ShaderStage, TextureRef, extract_features,
};

// ============================================================================
// Feature Extraction Tests
// ============================================================================

#[test]
fn bare_material_extracts_empty_set() {
    let material = MaterialConfig::default();
    assert!(extract_features(&material).is_empty());
}

#[test]
fn texture_maps_toggle_their_features() {
    let material = MaterialConfig {
        albedo_map: Some(TextureRef(1)),
        normal_map: Some(TextureRef(2)),
        ..MaterialConfig::default()
    };
    let features = extract_features(&material);
    assert!(features.has(Feature::AlbedoMap));
    assert!(features.has(Feature::NormalMap));
    assert!(!features.has(Feature::EmissiveMap));
}

#[test]
fn parallax_requires_height_map_and_positive_scale() {
    let no_map = MaterialConfig {
        parallax_scale: 0.05,
        ..MaterialConfig::default()
    };
    assert!(!extract_features(&no_map).has(Feature::ParallaxMapping));

    let no_scale = MaterialConfig {
        height_map: Some(TextureRef(3)),
        parallax_scale: 0.0,
        ..MaterialConfig::default()
    };
    assert!(!extract_features(&no_scale).has(Feature::ParallaxMapping));

    let both = MaterialConfig {
        height_map: Some(TextureRef(3)),
        parallax_scale: 0.05,
        ..MaterialConfig::default()
    };
    assert!(extract_features(&both).has(Feature::ParallaxMapping));
}

#[test]
fn scalar_thresholds_toggle_features() {
    let material = MaterialConfig {
        alpha_cutoff: 0.5,
        clearcoat: 0.3,
        subsurface: 0.2,
        ..MaterialConfig::default()
    };
    let features = extract_features(&material);
    assert!(features.has(Feature::AlphaCutoff));
    assert!(features.has(Feature::Clearcoat));
    assert!(features.has(Feature::SubsurfaceScattering));
}

#[test]
fn feature_sets_compare_independent_of_insertion_order() {
    let forward: FeatureSet = [Feature::AlbedoMap, Feature::NormalMap, Feature::Clearcoat]
        .into_iter()
        .collect();
    let reverse: FeatureSet = [Feature::Clearcoat, Feature::NormalMap, Feature::AlbedoMap]
        .into_iter()
        .collect();
    assert_eq!(forward, reverse);
}

// ============================================================================
// Source Generation Tests
// ============================================================================

#[test]
fn equal_keys_generate_byte_identical_source() {
    let a: FeatureSet = [Feature::NormalMap, Feature::EmissiveMap].into_iter().collect();
    let b: FeatureSet = [Feature::EmissiveMap, Feature::NormalMap].into_iter().collect();

    let (vs_a, fs_a) = ShaderGenerator::generate_pair("pbr", a).unwrap();
    let (vs_b, fs_b) = ShaderGenerator::generate_pair("pbr", b).unwrap();
    assert_eq!(vs_a, vs_b);
    assert_eq!(fs_a, fs_b);
}

#[test]
fn generation_is_deterministic_across_calls() {
    let key: FeatureSet = [Feature::AlbedoMap, Feature::ParallaxMapping]
        .into_iter()
        .collect();
    let first = ShaderGenerator::generate("pbr", ShaderStage::Fragment, key).unwrap();
    let second = ShaderGenerator::generate("pbr", ShaderStage::Fragment, key).unwrap();
    assert_eq!(first, second);
}

#[test]
fn defines_are_emitted_in_fixed_order() {
    let key: FeatureSet = [Feature::SubsurfaceScattering, Feature::AlbedoMap]
        .into_iter()
        .collect();
    let source = ShaderGenerator::generate("pbr", ShaderStage::Vertex, key).unwrap();

    let albedo = source.find("#define USE_ALBEDO_MAP").unwrap();
    let subsurface = source.find("#define USE_SUBSURFACE_SCATTERING").unwrap();
    assert!(albedo < subsurface);
}

// ============================================================================
// Variant Cache Tests
// ============================================================================

#[test]
fn each_distinct_key_compiles_exactly_once() {
    let mut backend = HeadlessBackend::new();
    let mut library = ShaderLibrary::new("pbr");

    let plain = FeatureSet::empty();
    let mapped: FeatureSet = [Feature::AlbedoMap].into_iter().collect();

    for _ in 0..5 {
        library.get_or_compile(&mut backend, plain).unwrap();
        library.get_or_compile(&mut backend, mapped).unwrap();
    }

    assert_eq!(library.variant_count(), 2);
    assert_eq!(backend.compile_count(), 2);
}

#[test]
fn cache_hit_returns_the_original_handle() {
    let mut backend = HeadlessBackend::new();
    let mut library = ShaderLibrary::new("pbr");
    let key: FeatureSet = [Feature::Clearcoat].into_iter().collect();

    let first = library.get_or_compile(&mut backend, key).unwrap();
    let second = library.get_or_compile(&mut backend, key).unwrap();
    assert_eq!(first.handle, second.handle);
    assert_eq!(first.source_hash, second.source_hash);
}

#[test]
fn unknown_family_fails_and_caches_nothing() {
    let mut backend = HeadlessBackend::new();
    let mut library = ShaderLibrary::new("nonexistent");

    let err = library
        .get_or_compile(&mut backend, FeatureSet::empty())
        .unwrap_err();
    assert!(matches!(err, RenderError::ShaderCompile { .. }));
    assert_eq!(library.variant_count(), 0);
    assert_eq!(backend.compile_count(), 0);

    // Still failing on retry, still nothing cached.
    assert!(library.get_or_compile(&mut backend, FeatureSet::empty()).is_err());
    assert_eq!(library.variant_count(), 0);
}

#[test]
fn destroy_empties_the_cache_and_the_backend() {
    let mut backend = HeadlessBackend::new();
    let mut library = ShaderLibrary::new("pbr");
    library
        .warm(
            &mut backend,
            [
                FeatureSet::empty(),
                [Feature::AlbedoMap].into_iter().collect(),
                [Feature::NormalMap, Feature::OcclusionMap].into_iter().collect(),
            ],
        )
        .unwrap();
    assert_eq!(library.variant_count(), 3);
    assert_eq!(backend.program_count(), 3);

    library.destroy(&mut backend);
    assert_eq!(library.variant_count(), 0);
    assert_eq!(backend.program_count(), 0);
}

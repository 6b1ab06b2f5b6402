//! Shader Feature Sets
//!
//! A compiled program variant is identified by its shader family plus a
//! [`FeatureSet`] — the set of optional material features its source was
//! generated with. Feature sets are stored as a bitmask, so equality and
//! hashing are order-independent by construction, and serializing features to
//! define text always walks the same ascending bit order. Two logically equal
//! keys therefore emit byte-identical source, which the variant cache and
//! reproducible-build diagnostics both rely on.

use bitflags::bitflags;

use crate::resources::material::MaterialConfig;

/// One optional material feature toggled per shader variant.
///
/// This is a closed enumeration: the template pair of a shader family has a
/// gated code path for each feature and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Feature {
    AlbedoMap,
    NormalMap,
    MetallicRoughnessMap,
    OcclusionMap,
    EmissiveMap,
    AlphaCutoff,
    Clearcoat,
    ParallaxMapping,
    SubsurfaceScattering,
}

impl Feature {
    /// Every feature, in the fixed emission order (ascending bit value).
    pub const ALL: [Feature; 9] = [
        Feature::AlbedoMap,
        Feature::NormalMap,
        Feature::MetallicRoughnessMap,
        Feature::OcclusionMap,
        Feature::EmissiveMap,
        Feature::AlphaCutoff,
        Feature::Clearcoat,
        Feature::ParallaxMapping,
        Feature::SubsurfaceScattering,
    ];

    /// The preprocessor define emitted into generated source.
    #[must_use]
    pub const fn define(self) -> &'static str {
        match self {
            Feature::AlbedoMap => "USE_ALBEDO_MAP",
            Feature::NormalMap => "USE_NORMAL_MAP",
            Feature::MetallicRoughnessMap => "USE_METALLIC_ROUGHNESS_MAP",
            Feature::OcclusionMap => "USE_OCCLUSION_MAP",
            Feature::EmissiveMap => "USE_EMISSIVE_MAP",
            Feature::AlphaCutoff => "USE_ALPHA_CUTOFF",
            Feature::Clearcoat => "USE_CLEARCOAT",
            Feature::ParallaxMapping => "USE_PARALLAX_MAPPING",
            Feature::SubsurfaceScattering => "USE_SUBSURFACE_SCATTERING",
        }
    }

    /// Single-bit mask for this feature.
    #[must_use]
    pub const fn mask(self) -> FeatureSet {
        FeatureSet::from_bits_truncate(1 << self as u16)
    }
}

bitflags! {
    /// An unordered set of [`Feature`]s — the variant key of a compiled
    /// program within its shader family.
    ///
    /// Equality and hash agree and are independent of construction order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FeatureSet: u16 {
        const ALBEDO_MAP = 1 << 0;
        const NORMAL_MAP = 1 << 1;
        const METALLIC_ROUGHNESS_MAP = 1 << 2;
        const OCCLUSION_MAP = 1 << 3;
        const EMISSIVE_MAP = 1 << 4;
        const ALPHA_CUTOFF = 1 << 5;
        const CLEARCOAT = 1 << 6;
        const PARALLAX_MAPPING = 1 << 7;
        const SUBSURFACE_SCATTERING = 1 << 8;
    }
}

impl FeatureSet {
    /// Adds a single feature to the set.
    pub fn add(&mut self, feature: Feature) {
        self.insert(feature.mask());
    }

    /// Whether the set contains `feature`.
    #[must_use]
    pub fn has(self, feature: Feature) -> bool {
        self.contains(feature.mask())
    }

    /// Features in the set, in the fixed emission order.
    pub fn features(self) -> impl Iterator<Item = Feature> {
        Feature::ALL.into_iter().filter(move |f| self.has(*f))
    }

    /// Human-readable feature list for logs, e.g. `"ALBEDO_MAP|NORMAL_MAP"`.
    #[must_use]
    pub fn describe(self) -> String {
        if self.is_empty() {
            return "none".to_string();
        }
        let names: Vec<&str> = self
            .features()
            .map(|f| f.define().trim_start_matches("USE_"))
            .collect();
        names.join("|")
    }
}

impl From<Feature> for FeatureSet {
    fn from(feature: Feature) -> Self {
        feature.mask()
    }
}

impl FromIterator<Feature> for FeatureSet {
    fn from_iter<T: IntoIterator<Item = Feature>>(iter: T) -> Self {
        let mut set = FeatureSet::empty();
        for f in iter {
            set.add(f);
        }
        set
    }
}

/// Maps a material configuration to the minimal feature set its shader
/// variant needs.
///
/// Pure and deterministic: identical configurations always yield an identical
/// key. Map features require the texture reference to be present; scalar
/// features require the scalar condition to be active. Parallax additionally
/// requires a height map, since the offset is height-map-driven.
#[must_use]
pub fn extract_features(material: &MaterialConfig) -> FeatureSet {
    let mut set = FeatureSet::empty();

    if material.albedo_map.is_some() {
        set.add(Feature::AlbedoMap);
    }
    if material.normal_map.is_some() {
        set.add(Feature::NormalMap);
    }
    if material.metallic_roughness_map.is_some() {
        set.add(Feature::MetallicRoughnessMap);
    }
    if material.occlusion_map.is_some() {
        set.add(Feature::OcclusionMap);
    }
    if material.emissive_map.is_some() {
        set.add(Feature::EmissiveMap);
    }
    if material.alpha_cutoff > 0.0 {
        set.add(Feature::AlphaCutoff);
    }
    if material.clearcoat > 0.0 {
        set.add(Feature::Clearcoat);
    }
    if material.height_map.is_some() && material.parallax_scale > 0.0 {
        set.add(Feature::ParallaxMapping);
    }
    if material.subsurface > 0.0 {
        set.add(Feature::SubsurfaceScattering);
    }

    set
}

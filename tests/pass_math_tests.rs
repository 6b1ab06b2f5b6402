//! Pass Math Tests
//!
//! Tests for:
//! - Halton jitter: period, half-texel bounds, projection column isolation
//! - TAA: convergence on a static scene
//! - SSAO / SSR: background sentinel values, reflection radiance source
//! - Lighting: light range window
//! - Present: tone mapping operator ordering

use glam::{Vec2, Vec3, Vec4};

use cinder::render::passes::{FrameUniforms, project_to_screen};
use cinder::resources::post::{
    BloomSettings, PostProcessSettings, SsaoSettings, SsrSettings, TaaSettings, ToneMappingMode,
    ToneMappingSettings,
};
use cinder::{
    BloomPass, Camera, ColorTarget, GBuffer, LightData, LightingPass, PointLight, PresentPass,
    SsaoPass, SsrPass, TaaPass, TemporalState, halton_jitter, jittered_projection,
};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn frame_uniforms() -> FrameUniforms {
    let camera = Camera::default();
    FrameUniforms::new(&camera, camera.projection, &PostProcessSettings::new())
}

// ============================================================================
// Jitter Sequence Tests
// ============================================================================

#[test]
fn jitter_repeats_with_period_eight() {
    for frame in 0..32u64 {
        let a = halton_jitter(frame);
        let b = halton_jitter(frame + 8);
        assert!(approx(a.x, b.x) && approx(a.y, b.y));
    }
}

#[test]
fn jitter_offsets_are_centered_half_texel() {
    for frame in 0..8u64 {
        let j = halton_jitter(frame);
        assert!(j.x > -0.5 && j.x < 0.5);
        assert!(j.y > -0.5 && j.y < 0.5);
    }
}

#[test]
fn distinct_frames_get_distinct_jitter() {
    for a in 0..8u64 {
        for b in (a + 1)..8 {
            assert_ne!(halton_jitter(a), halton_jitter(b));
        }
    }
}

#[test]
fn jitter_only_translates_the_projection() {
    let base = Camera::default().projection;
    let jittered = jittered_projection(base, Vec2::new(0.25, -0.25), 128, 128);

    assert_eq!(jittered.x_axis, base.x_axis);
    assert_eq!(jittered.y_axis, base.y_axis);
    assert_eq!(jittered.w_axis, base.w_axis);
    assert_ne!(jittered.z_axis.x, base.z_axis.x);
    assert_ne!(jittered.z_axis.y, base.z_axis.y);
    assert_eq!(jittered.z_axis.z, base.z_axis.z);
}

// ============================================================================
// Temporal Accumulation Tests
// ============================================================================

#[test]
fn taa_converges_on_a_static_scene() {
    let pass = TaaPass::new();
    let settings = TaaSettings::default();
    let mut temporal = TemporalState::new(8, 8);

    let mut current = ColorTarget::new(8, 8);
    current.fill(Vec4::new(0.25, 0.5, 0.75, 1.0));
    let mut out = ColorTarget::new(8, 8);

    for _ in 0..6 {
        pass.run(&current, &mut temporal, &settings, &mut out);
        temporal.advance();
    }

    let resolved = out.texel(4, 4);
    assert!(approx(resolved.x, 0.25));
    assert!(approx(resolved.y, 0.5));
    assert!(approx(resolved.z, 0.75));
}

// ============================================================================
// Background Sentinel Tests
// ============================================================================

#[test]
fn ssao_background_is_fully_visible() {
    let settings = SsaoSettings::default();
    let pass = SsaoPass::new(&settings);
    let gbuffer = GBuffer::new(8, 8);
    let frame = frame_uniforms();

    let mut out = ColorTarget::new(8, 8);
    pass.run(&gbuffer, &frame, &settings, &mut out);
    for y in 0..8 {
        for x in 0..8 {
            assert!(approx(out.texel(x, y).x, 1.0));
        }
    }
}

#[test]
fn ssr_background_has_zero_confidence() {
    let settings = SsrSettings::default();
    let pass = SsrPass::new();
    let gbuffer = GBuffer::new(8, 8);
    let frame = frame_uniforms();

    let mut history = ColorTarget::new(8, 8);
    history.fill(Vec4::ONE);
    let mut out = ColorTarget::new(8, 8);
    pass.run(&gbuffer, &history, &frame, &settings, &mut out);
    for y in 0..8 {
        for x in 0..8 {
            assert_eq!(out.texel(x, y).w, 0.0);
        }
    }
}

#[test]
fn bloom_glow_does_not_brighten_reflections() {
    let settings = SsrSettings::default();
    let pass = SsrPass::new();
    let frame = frame_uniforms();

    // A mirror texel at the screen center, tilted 45 degrees so its
    // reflection ray marches straight up the screen, and a wall filling the
    // upper rows just in front of the marched samples.
    let mut gbuffer = GBuffer::new(32, 32);
    let (_, mirror_depth) = project_to_screen(Vec3::new(0.0, 0.0, -5.0), &frame.projection)
        .expect("mirror point projects");
    let (_, wall_depth) = project_to_screen(Vec3::new(0.0, 0.0, -4.85), &frame.projection)
        .expect("wall point projects");
    gbuffer.depth.set_texel(16, 16, mirror_depth);
    let n = Vec3::new(0.0, 1.0, 1.0).normalize();
    gbuffer
        .normal_roughness
        .set_texel(16, 16, Vec4::new(n.x, n.y, n.z, 0.0));
    for y in 17..32 {
        for x in 0..32 {
            gbuffer.depth.set_texel(x, y, wall_depth);
        }
    }

    // Lighting output: a bright emitter where the ray lands, dim elsewhere.
    let mut lighting = ColorTarget::new(32, 32);
    lighting.fill(Vec4::new(0.9, 0.9, 0.9, 1.0));
    lighting.set_texel(16, 17, Vec4::new(5.0, 5.0, 5.0, 1.0));

    // The bloom chain pushes the emitter well past its lit value.
    let bloom = BloomPass::new();
    let bloom_settings = BloomSettings::default();
    let mut scratch_a = ColorTarget::new(32, 32);
    let mut scratch_b = ColorTarget::new(32, 32);
    let mut composited = ColorTarget::new(32, 32);
    bloom.run(
        &lighting,
        &bloom_settings,
        &mut scratch_a,
        &mut scratch_b,
        &mut composited,
    );
    assert!(composited.texel(16, 17).x > lighting.texel(16, 17).x);

    let reflected = pass.reflection_at(16, 16, &gbuffer, &lighting, &frame, &settings);
    assert!(reflected.w > 0.0, "mirror texel must record a hit");
    assert!(approx(reflected.x, 5.0));

    // Feeding the bloom-composited target instead would leak the glow.
    let leaked = pass.reflection_at(16, 16, &gbuffer, &composited, &frame, &settings);
    assert!(leaked.x > reflected.x);
}

// ============================================================================
// Lighting Range Tests
// ============================================================================

#[test]
fn point_light_outside_range_contributes_nothing() {
    let pass = LightingPass::new();
    let frame = frame_uniforms();

    let mut gbuffer = GBuffer::new(4, 4);
    for y in 0..4 {
        for x in 0..4 {
            gbuffer.depth.set_texel(x, y, 0.5);
            gbuffer
                .albedo_metallic
                .set_texel(x, y, Vec4::new(0.8, 0.8, 0.8, 0.0));
            gbuffer
                .normal_roughness
                .set_texel(x, y, Vec4::new(0.0, 0.0, 1.0, 0.5));
            gbuffer
                .emissive_occlusion
                .set_texel(x, y, Vec4::new(0.0, 0.0, 0.0, 1.0));
        }
    }
    let mut ao = ColorTarget::new(4, 4);
    ao.fill(Vec4::ONE);
    let ssr = ColorTarget::new(4, 4);

    let dark = LightData::new();
    let mut far_light = LightData::new();
    far_light.push_point(PointLight {
        position: Vec3::new(500.0, 500.0, 500.0),
        color: Vec3::ONE,
        intensity: 1000.0,
        range: 10.0,
    });

    let a = pass.shade_at(2, 2, &gbuffer, &ao, &ssr, &dark, &frame);
    let b = pass.shade_at(2, 2, &gbuffer, &ao, &ssr, &far_light, &frame);
    assert!(approx(a.x, b.x) && approx(a.y, b.y) && approx(a.z, b.z));
}

// ============================================================================
// Tone Mapping Tests
// ============================================================================

#[test]
fn reinhard_compresses_below_linear() {
    let pass = PresentPass::new();
    let gamma_only = ToneMappingSettings {
        mode: ToneMappingMode::Linear,
        gamma: 2.2,
    };
    let reinhard = ToneMappingSettings {
        mode: ToneMappingMode::Reinhard,
        gamma: 2.2,
    };

    let c = Vec3::splat(0.5);
    assert!(pass.tone_map(c, &reinhard).x < pass.tone_map(c, &gamma_only).x);
}

#[test]
fn aces_saturates_toward_white() {
    let pass = PresentPass::new();
    let settings = ToneMappingSettings::default();
    let bright = pass.tone_map(Vec3::splat(100.0), &settings);
    assert!(bright.min_element() > 0.95);
    assert!(bright.max_element() <= 1.0);
}

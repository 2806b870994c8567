#![allow(clippy::float_cmp)]

use std::cell::Cell;
use std::rc::Rc;

use super::*;

#[test]
fn defaults_match_gallery_presets() {
    let s = Settings::default();
    assert_eq!(s.particle_field.shape, SpriteShape::Circle);
    assert_eq!(s.particle_field.blur, 30.0);
    assert_eq!(s.particle_field.color, "#6366f1");
    assert!(!s.particle_field.glow);
    assert_eq!(s.wave_sphere.shape, MeshShape::Icosahedron);
    assert_eq!(s.wave_sphere.color, "#8b5cf6");
    assert_eq!(s.svg_particles.color, "#facc15");
    assert_eq!(s.svg_particles.angle_y, 20.0);
    assert_eq!(s.svg_particles.particle_count, 5000);
    assert_eq!(s.svg_particles.target_name(), "Circle (default)");
    assert_eq!(s.particle_stream.speed, 0.4);
    assert_eq!(s.particle_stream.particle_count, 1400);
    assert_eq!(s.particle_stream.motion_blur, 100.0);
}

#[test]
fn updates_are_clamped() {
    let mut store = SettingsStore::default();
    store.update_particle_field(|f| {
        f.blur = 400.0;
        f.intensity = -3.0;
        f.color = "not a color".into();
    });
    store.update_svg_particles(|s| {
        s.angle_x = -720.0;
        s.particle_count = 10;
    });
    store.update_particle_stream(|s| {
        s.speed = 9.0;
        s.particle_count = 99_999;
        s.motion_blur = f32::NAN;
        s.color_top = "#ABC".into();
    });

    let s = store.get();
    assert_eq!(s.particle_field.blur, 100.0);
    assert_eq!(s.particle_field.intensity, 0.0);
    assert_eq!(s.particle_field.color, "#6366f1");
    assert_eq!(s.svg_particles.angle_x, -180.0);
    assert_eq!(s.svg_particles.particle_count, 500);
    assert_eq!(s.particle_stream.speed, 2.0);
    assert_eq!(s.particle_stream.particle_count, 5000);
    assert_eq!(s.particle_stream.motion_blur, 100.0);
    assert_eq!(s.particle_stream.color_top, "#aabbcc");
}

#[test]
fn subscribers_see_clamped_values() {
    let seen = Rc::new(Cell::new(0.0_f32));
    let sink = Rc::clone(&seen);
    let mut store = SettingsStore::default();
    store.subscribe(move |s| sink.set(s.particle_field.blur));
    store.update_particle_field(|f| f.blur = 250.0);
    assert_eq!(seen.get(), 100.0);
}

#[test]
fn save_and_unsaved_changes_are_per_animation() {
    let mut store = SettingsStore::default();
    assert!(!store.has_unsaved_changes(AnimationId::ParticleField));

    store.update_particle_field(|f| f.glow = true);
    store.update_particle_stream(|s| s.speed = 1.0);
    assert!(store.has_unsaved_changes(AnimationId::ParticleField));
    assert!(store.has_unsaved_changes(AnimationId::ParticleStream));
    assert!(!store.has_unsaved_changes(AnimationId::WaveSphere));

    store.save(AnimationId::ParticleField);
    assert!(!store.has_unsaved_changes(AnimationId::ParticleField));
    assert!(store.has_unsaved_changes(AnimationId::ParticleStream));
    assert!(store.saved().particle_field.glow);
}

#[test]
fn reset_restores_defaults_in_live_and_saved() {
    let mut store = SettingsStore::default();
    store.update_wave_sphere(|w| w.shape = MeshShape::Torus);
    store.save(AnimationId::WaveSphere);
    store.update_particle_field(|f| f.blur = 80.0);

    store.reset_to_defaults(AnimationId::WaveSphere);
    assert_eq!(store.get().wave_sphere, WaveSphereSettings::default());
    assert_eq!(store.saved().wave_sphere, WaveSphereSettings::default());
    assert_eq!(store.get().particle_field.blur, 80.0);
}

#[test]
fn load_svg_assigns_fresh_revisions() {
    let mut store = SettingsStore::default();
    let a = store.load_svg("logo.svg", "<svg/>");
    let b = store.load_svg("logo.svg", "<svg/>");
    assert_ne!(a, b);
    assert_eq!(store.get().svg_particles.target_name(), "logo.svg");
    assert!(store.has_unsaved_changes(AnimationId::SvgParticles));

    store.clear_svg();
    assert!(store.get().svg_particles.svg.is_none());
}

#[test]
fn json_patch_merges_camel_case_fields() {
    let mut store = SettingsStore::default();
    let result = store.apply_patch(AnimationId::SvgParticles, r##"{"angleX": 45, "particleCount": 1200, "color": "#FF0000"}"##);
    assert!(result.is_ok());
    let svg = &store.get().svg_particles;
    assert_eq!(svg.angle_x, 45.0);
    assert_eq!(svg.particle_count, 1200);
    assert_eq!(svg.color, "#ff0000");
    assert_eq!(svg.blur, 30.0);
}

#[test]
fn json_patch_normalizes_stream_colors() {
    let mut store = SettingsStore::default();
    let patch = r##"{"colorTop": "#ABC", "colorBottom": "#123456"}"##;
    assert!(store.apply_patch(AnimationId::ParticleStream, patch).is_ok());
    let stream = &store.get().particle_stream;
    assert_eq!(stream.color_top, "#aabbcc");
    assert_eq!(stream.color_bottom, "#123456");
    assert!(store.has_unsaved_changes(AnimationId::ParticleStream));
}

#[test]
fn json_patch_keeps_loaded_svg() {
    let mut store = SettingsStore::default();
    store.load_svg("a.svg", "<svg/>");
    assert!(store.apply_patch(AnimationId::SvgParticles, r#"{"blur": 10}"#).is_ok());
    assert_eq!(store.get().svg_particles.target_name(), "a.svg");
}

#[test]
fn json_patch_null_restores_default() {
    let mut store = SettingsStore::default();
    store.update_particle_stream(|s| s.speed = 1.5);
    assert!(store.apply_patch(AnimationId::ParticleStream, r#"{"speed": null}"#).is_ok());
    assert_eq!(store.get().particle_stream.speed, 0.4);
}

#[test]
fn json_patch_rejects_bad_input() {
    let mut store = SettingsStore::default();
    assert!(matches!(store.apply_patch(AnimationId::ParticleField, "[1,2]"), Err(SettingsError::NotAnObject)));
    assert!(matches!(store.apply_patch(AnimationId::ParticleField, "{"), Err(SettingsError::Json(_))));
    assert!(matches!(
        store.apply_patch(AnimationId::ParticleField, r#"{"shape": "hexagon"}"#),
        Err(SettingsError::Json(_))
    ));
    assert_eq!(store.version(), 0);
}

#[test]
fn json_patch_for_wave_sphere_shape() {
    let mut store = SettingsStore::default();
    assert!(store.apply_patch(AnimationId::WaveSphere, r#"{"shape": "octahedron"}"#).is_ok());
    assert_eq!(store.get().wave_sphere.shape, MeshShape::Octahedron);
}

#[test]
fn to_json_uses_camel_case() {
    let settings = Settings::default();
    let json = settings.to_json(AnimationId::ParticleStream).ok().flatten();
    let Some(json) = json else {
        panic!("stream settings should serialize");
    };
    assert_eq!(json["colorTop"], "#c4b5fd");
    assert_eq!(json["motionBlur"], 100.0);
    assert!(matches!(settings.to_json(AnimationId::HandParticles), Ok(None)));
}

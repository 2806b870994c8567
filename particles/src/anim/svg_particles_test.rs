#![allow(clippy::float_cmp)]

use std::sync::Arc;

use super::*;
use crate::gesture::HandSignal;
use crate::settings::{Settings, SvgSource};

const CIRCLE: &str =
    r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100"><circle cx="50" cy="50" r="40"/></svg>"#;

fn anim(settings: &Settings) -> SvgParticles {
    match SvgParticles::new(&settings.svg_particles, 21) {
        Ok(anim) => anim,
        Err(err) => panic!("svg particles setup failed: {err}"),
    }
}

fn step(anim: &mut SvgParticles, settings: &Settings, time: f32) {
    let frame = FrameContext { time, settings, hand: HandSignal::default() };
    if let Err(err) = anim.update(&frame) {
        panic!("update failed: {err}");
    }
}

fn with_svg(revision: u64, count: usize) -> Settings {
    let mut settings = Settings::default();
    settings.svg_particles.particle_count = count;
    settings.svg_particles.svg = Some(SvgSource { name: "circle.svg".into(), raw: Arc::from(CIRCLE), revision });
    settings
}

#[test]
fn ambient_split_is_fifteen_percent() {
    assert_eq!(ambient_start(5000), 4250);
    assert_eq!(ambient_start(1000), 850);
    assert_eq!(ambient_start(501), 425);
}

#[test]
fn depth_brightness_range() {
    assert!((depth_brightness(-2.0) - 0.6).abs() < 1e-6);
    assert!((depth_brightness(2.0) - 1.0).abs() < 1e-6);
    assert!(depth_brightness(-3.0) < depth_brightness(3.0));
}

#[test]
fn default_targets_are_the_ring() {
    let a = anim(&Settings::default());
    assert_eq!(a.targets().capacity(), SVG_MAX_PARTICLES);
    for p in a.targets().iter() {
        let r = p.truncate().length();
        assert!((2.85 - 0.11..=3.15 + 0.11).contains(&r), "radius {r}");
    }
}

#[test]
fn count_change_moves_only_the_active_range() {
    let mut settings = Settings::default();
    let mut a = anim(&settings);
    let targets = a.targets().clone();

    settings.svg_particles.particle_count = 1200;
    step(&mut a, &settings, 0.1);
    assert_eq!(a.positions.capacity(), SVG_MAX_PARTICLES);
    assert_eq!(a.positions.active_count(), 1200);
    assert_eq!(a.view().drawn_count(), 1200);
    assert_eq!(a.targets(), &targets);
}

#[test]
fn loaded_svg_is_sampled_at_the_particle_count() {
    let settings = with_svg(1, 800);
    let a = anim(&settings);
    assert_eq!(a.targets().capacity(), 800);
    let max_extent = a.targets().iter().map(|p| p.truncate().abs().max_element()).fold(0.0, f32::max);
    assert!(max_extent > 2.5 && max_extent < 3.5, "extent {max_extent}");
}

#[test]
fn targets_resample_on_revision_or_count_change_only() {
    let mut settings = with_svg(1, 800);
    let mut a = anim(&settings);
    let first = a.targets().clone();

    step(&mut a, &settings, 0.1);
    settings.svg_particles.blur = 70.0;
    step(&mut a, &settings, 0.2);
    assert_eq!(a.targets(), &first);

    settings.svg_particles.particle_count = 900;
    step(&mut a, &settings, 0.3);
    assert_eq!(a.targets().capacity(), 900);

    let before = a.targets().clone();
    settings = with_svg(2, 900);
    step(&mut a, &settings, 0.4);
    assert_ne!(a.targets(), &before);

    settings.svg_particles.svg = None;
    step(&mut a, &settings, 0.5);
    assert_eq!(a.targets().capacity(), SVG_MAX_PARTICLES);
}

#[test]
fn shape_particles_settle_on_targets_with_drift() {
    let settings = with_svg(1, 1000);
    let mut a = anim(&settings);
    for _ in 0..1000 {
        step(&mut a, &settings, 0.0);
    }
    let n = a.targets().capacity();
    for i in (0..ambient_start(1000)).step_by(41) {
        let [d0, d1] = a.drifts[i];
        let goal = a.targets().get(i % n) + Vec3::new(d0.sin() * DRIFT, d1.cos() * DRIFT, 0.0);
        assert!((a.positions.get(i) - goal).length() < 1e-3, "particle {i}");
    }
}

#[test]
fn ambient_particles_orbit_away_from_the_shape() {
    let settings = with_svg(1, 1000);
    let mut a = anim(&settings);
    for _ in 0..3000 {
        step(&mut a, &settings, 0.0);
    }
    for i in ambient_start(1000)..1000 {
        let p = a.phases[i];
        let radius = 4.0 + p.sin() * 2.0;
        let horizontal = Vec3::new(a.positions.get(i).x, 0.0, a.positions.get(i).z).length();
        assert!((horizontal - radius).abs() < 0.01, "particle {i}");
    }
}

#[test]
fn ambient_particles_are_dimmed() {
    let mut settings = with_svg(1, 1000);
    settings.svg_particles.intensity = 0.0;
    let mut a = anim(&settings);
    step(&mut a, &settings, 0.0);
    for i in [0, 849, 850, 999] {
        let dim = if i >= 850 { AMBIENT_DIM } else { 1.0 };
        let expected = a.base_colors.get(i) * depth_brightness(a.positions.get(i).z) * dim;
        assert!((a.colors.get(i) - expected).length() < 1e-6, "particle {i}");
    }
}

#[test]
fn transform_follows_angles_and_pulse() {
    let mut settings = Settings::default();
    settings.svg_particles.angle_x = 90.0;
    settings.svg_particles.angle_z = -45.0;
    let mut a = anim(&settings);
    step(&mut a, &settings, 2.0);
    let transform = a.view().transform();
    assert!((transform.rotation.x - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    assert!((transform.rotation.y - 20.0_f32.to_radians()).abs() < 1e-6);
    assert!((transform.rotation.z + std::f32::consts::FRAC_PI_4).abs() < 1e-6);
    assert!((transform.scale - (1.0 + (1.6_f32).sin() * 0.02)).abs() < 1e-6);
}

#[test]
fn glow_sprite_regenerates_only_on_blur_change() {
    let mut settings = Settings::default();
    let mut a = anim(&settings);
    let first = a.material.revision();

    settings.svg_particles.color = "#ff00ff".into();
    settings.svg_particles.intensity = 90.0;
    step(&mut a, &settings, 0.1);
    assert_eq!(a.material.revision(), first);

    settings.svg_particles.blur = 80.0;
    step(&mut a, &settings, 0.2);
    assert_eq!(a.material.revision(), first + 1);
    assert_eq!(a.material.blend(), BlendMode::Additive);
}

#[test]
fn size_tracks_blur_at_rest() {
    let settings = Settings::default();
    let mut a = anim(&settings);
    step(&mut a, &settings, 0.0);
    assert!((a.material.size - (0.08 + 0.3 * 0.14)).abs() < 1e-6);
    assert_eq!(a.material.opacity, OPACITY);
}

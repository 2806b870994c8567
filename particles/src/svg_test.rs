use glam::Vec2;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;

fn rng() -> StdRng {
    StdRng::seed_from_u64(11)
}

fn doc(body: &str) -> String {
    format!(r#"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="200" viewBox="0 0 200 200">{body}</svg>"#)
}

fn span(buffer: &PointBuffer) -> Vec2 {
    let (lo, hi) = buffer.iter().fold((Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)), |(lo, hi), p| {
        (lo.min(p.truncate()), hi.max(p.truncate()))
    });
    hi - lo
}

#[test]
fn document_without_geometry_yields_zeros() {
    let buffer = sample(&doc(""), 250, &mut rng());
    assert_eq!(buffer.capacity(), 250);
    assert!(buffer.as_slice().iter().all(|v| *v == 0.0));
}

#[test]
fn unparseable_document_yields_zeros() {
    let buffer = sample("this is not svg", 40, &mut rng());
    assert_eq!(buffer.capacity(), 40);
    assert!(buffer.as_slice().iter().all(|v| *v == 0.0));
    assert!(matches!(try_sample("this is not svg", 40, &mut rng()), Err(SvgError::Parse(_))));
}

#[test]
fn zero_size_geometry_is_skipped() {
    let svg = doc(r#"<rect x="10" y="10" width="0" height="0"/>"#);
    let buffer = sample(&svg, 30, &mut rng());
    assert!(buffer.as_slice().iter().all(|v| *v == 0.0));
}

#[test]
fn circle_fits_target_span_regardless_of_radius() {
    for radius in [5.0, 40.0, 95.0] {
        let svg = doc(&format!(r#"<circle cx="100" cy="100" r="{radius}"/>"#));
        let buffer = sample(&svg, 2000, &mut rng());
        let extent = span(&buffer);
        for axis in [extent.x, extent.y] {
            assert!((axis - 6.0).abs() < 0.2, "r={radius}: span {axis}");
        }
        let mean = buffer.iter().map(|p| p.truncate()).sum::<Vec2>() / 2000.0;
        assert!(mean.length() < 0.05, "r={radius}: off center by {mean}");
    }
}

#[test]
fn depth_spread_stays_within_bounds() {
    let buffer = sample(&doc(r#"<circle cx="100" cy="100" r="50"/>"#), 1000, &mut rng());
    assert!(buffer.iter().all(|p| p.z.abs() < 1.2));
    assert!(buffer.iter().any(|p| p.z.abs() > 0.3));
}

#[test]
fn y_axis_is_flipped() {
    let svg = doc(r#"<path d="M 10 0 L 10 100" stroke="black" fill="none"/>"#);
    let buffer = sample(&svg, 100, &mut rng());
    // The first sample sits at the top of the document, so it ends up at +3.
    let first = buffer.get(0);
    assert!((first.y - 3.0).abs() < 0.1, "first y = {}", first.y);
}

#[test]
fn samples_are_shared_in_proportion_to_length() {
    let svg = doc(concat!(
        r#"<path d="M 0 0 L 0 50" stroke="black" fill="none"/>"#,
        r#"<path d="M 200 0 L 200 150" stroke="black" fill="none"/>"#,
    ));
    let buffer = sample(&svg, 400, &mut rng());
    let left = buffer.iter().filter(|p| p.x < 0.0).count();
    assert_eq!(left, 100);
    assert_eq!(buffer.capacity() - left, 300);
}

#[test]
fn transforms_are_applied_before_fitting() {
    let plain = sample(&doc(r#"<rect x="0" y="0" width="100" height="20"/>"#), 800, &mut rng());
    let rotated = sample(
        &doc(r#"<rect x="0" y="0" width="100" height="20" transform="rotate(90)"/>"#),
        800,
        &mut rng(),
    );
    let a = span(&plain);
    let b = span(&rotated);
    assert!(a.x > a.y * 3.0);
    assert!(b.y > b.x * 3.0);
}

#[test]
fn normalize_cycles_raw_points() {
    let raw = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)];
    let buffer = normalize(&raw, 6, &mut rng());
    for (i, p) in buffer.iter().enumerate() {
        let expected = if i % 2 == 0 { -3.0 } else { 3.0 };
        assert!((p.x - expected).abs() <= 0.075 + 1e-5, "point {i}: {}", p.x);
        assert!(p.y.abs() <= 0.075 + 1e-5);
    }
}

#[test]
fn normalize_treats_zero_range_as_unit() {
    let raw = [Vec2::new(4.0, 4.0)];
    let buffer = normalize(&raw, 3, &mut rng());
    assert!(buffer.iter().all(|p| p.truncate().length() < 0.11));
}

#[test]
fn normalize_of_nothing_is_zero() {
    let buffer = normalize(&[], 5, &mut rng());
    assert_eq!(buffer.as_slice(), &[0.0; 15]);
}

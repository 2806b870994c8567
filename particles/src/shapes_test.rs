use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let t = ((p - a).dot(ab) / ab.length_squared()).clamp(0.0, 1.0);
    (a + ab * t).distance(p)
}

fn polygon_vertices(sides: usize, radius: f32) -> Vec<Vec2> {
    (0..sides)
        .map(|s| {
            let angle = s as f32 / sides as f32 * std::f32::consts::TAU - std::f32::consts::FRAC_PI_2;
            Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

fn on_outline(p: Vec3, vertices: &[Vec2]) -> bool {
    (0..vertices.len()).any(|e| distance_to_segment(p.truncate(), vertices[e], vertices[(e + 1) % vertices.len()]) < 1e-4)
}

#[test]
fn generators_return_exact_count_of_finite_points() {
    let mut rng = rng();
    for count in [0, 1, 7, 3000] {
        for buffer in [
            sphere(count, 1.5, &mut rng),
            expanded(count, &mut rng),
            polygon_edges(count, 3, 3.0, &mut rng),
            polygon_edges(count, 5, 2.5, &mut rng),
            star(count, 3.0, &mut rng),
            ring(count, 3.0, &mut rng),
        ] {
            assert_eq!(buffer.capacity(), count);
            assert_eq!(buffer.as_slice().len(), count * 3);
            assert!(buffer.as_slice().iter().all(|v| v.is_finite()));
        }
    }
}

#[test]
fn sphere_points_stay_inside_radius() {
    let buffer = sphere(5000, 1.5, &mut rng());
    assert!(buffer.iter().all(|p| p.length() <= 1.5 + 1e-5));
}

#[test]
fn sphere_fills_the_volume_uniformly() {
    let count = 20_000;
    let radius = 2.0;
    let buffer = sphere(count, radius, &mut rng());
    // Uniform in volume: the fraction inside radius·k is k³.
    for k in [0.5_f32, 0.75, 0.9] {
        let inside = buffer.iter().filter(|p| p.length() < radius * k).count() as f32 / count as f32;
        let expected = k * k * k;
        assert!((inside - expected).abs() < 0.02, "k={k}: {inside} vs {expected}");
    }
}

#[test]
fn expanded_points_lie_in_shell() {
    let buffer = expanded(4000, &mut rng());
    assert!(buffer.iter().all(|p| {
        let r = p.length();
        (2.0 - 1e-4..6.0 + 1e-4).contains(&r)
    }));
}

#[test]
fn polygon_points_lie_on_edges_with_thin_depth() {
    for (sides, radius) in [(3, 3.0), (5, 2.5), (4, 1.0)] {
        let vertices = polygon_vertices(sides, radius);
        let buffer = polygon_edges(2000, sides, radius, &mut rng());
        for (i, p) in buffer.iter().enumerate() {
            assert!(p.z.abs() <= 0.25, "point {i} z={}", p.z);
            let edge = i % sides;
            let d = distance_to_segment(p.truncate(), vertices[edge], vertices[(edge + 1) % sides]);
            assert!(d < 1e-4, "point {i} is {d} from edge {edge}");
        }
    }
}

#[test]
fn polygon_first_vertex_points_down() {
    let vertices = polygon_vertices(3, 3.0);
    assert!(vertices[0].x.abs() < 1e-5);
    assert!((vertices[0].y + 3.0).abs() < 1e-5);
}

#[test]
fn polygon_with_no_sides_is_all_zero() {
    let buffer = polygon_edges(10, 0, 3.0, &mut rng());
    assert_eq!(buffer.capacity(), 10);
    assert!(buffer.as_slice().iter().all(|v| *v == 0.0));
}

#[test]
fn star_points_lie_on_star_outline() {
    let vertices: Vec<Vec2> = (0..10)
        .map(|s| {
            let angle = s as f32 / 10.0 * std::f32::consts::TAU - std::f32::consts::FRAC_PI_2;
            let r = if s % 2 == 0 { 3.0 } else { 1.2 };
            Vec2::new(angle.cos(), angle.sin()) * r
        })
        .collect();
    let buffer = star(1000, 3.0, &mut rng());
    for p in buffer.iter() {
        assert!(p.z.abs() <= 0.25);
        assert!(on_outline(p, &vertices));
    }
}

#[test]
fn ring_stays_near_radius() {
    let buffer = ring(5000, 3.0, &mut rng());
    for p in buffer.iter() {
        let r = p.truncate().length();
        assert!((r - 3.0).abs() < 0.15 + 0.11, "r={r}");
        assert!(p.z.abs() < 1.2);
    }
}

#[test]
fn target_set_holds_all_five_shapes() {
    let set = TargetShapeSet::generate(300, &mut rng());
    assert_eq!(set.len(), 300);
    assert!(!set.is_empty());
    for shape in TargetShape::ALL {
        assert_eq!(set.get(shape).capacity(), 300);
    }
    assert!(set.get(TargetShape::Sphere).iter().all(|p| p.length() <= 1.5 + 1e-5));
    assert!(set.get(TargetShape::Expanded).iter().all(|p| p.length() >= 2.0 - 1e-4));
}

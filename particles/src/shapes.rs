//! Target shape generators.
//!
//! Every generator returns exactly `count` finite points in a fresh
//! [`PointBuffer`]. They are pure apart from the random source, which callers
//! pass in so tests (and the headless host) can seed it.

#[cfg(test)]
#[path = "shapes_test.rs"]
mod shapes_test;

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{Vec2, Vec3};
use rand::Rng;

use crate::buffer::PointBuffer;
use crate::consts::{EDGE_Z_JITTER, STAR_INNER_RATIO, STAR_POINTS, SVG_XY_JITTER, SVG_Z_SPREAD};

/// Points distributed uniformly through the volume of a ball.
pub fn sphere<R: Rng + ?Sized>(count: usize, radius: f32, rng: &mut R) -> PointBuffer {
    let points: Vec<Vec3> = (0..count)
        .map(|_| {
            let direction = random_direction(rng);
            direction * (radius * rng.random::<f32>().cbrt())
        })
        .collect();
    PointBuffer::from_points(&points)
}

/// Points in a spherical shell with radius in `[2, 6)`.
pub fn expanded<R: Rng + ?Sized>(count: usize, rng: &mut R) -> PointBuffer {
    let points: Vec<Vec3> = (0..count)
        .map(|_| {
            let direction = random_direction(rng);
            direction * (2.0 + rng.random::<f32>() * 4.0)
        })
        .collect();
    PointBuffer::from_points(&points)
}

/// Points on the outline of a regular polygon in the XY plane.
///
/// The first vertex sits straight down (-90°). Point `i` lands on edge
/// `i % sides`.
pub fn polygon_edges<R: Rng + ?Sized>(count: usize, sides: usize, radius: f32, rng: &mut R) -> PointBuffer {
    let vertices: Vec<Vec2> = (0..sides).map(|s| outline_vertex(s, sides, radius)).collect();
    sample_outline(count, &vertices, rng)
}

/// Points on the outline of a five-point star in the XY plane.
pub fn star<R: Rng + ?Sized>(count: usize, radius: f32, rng: &mut R) -> PointBuffer {
    let corners = STAR_POINTS * 2;
    let vertices: Vec<Vec2> = (0..corners)
        .map(|s| {
            let r = if s % 2 == 0 { radius } else { radius * STAR_INNER_RATIO };
            outline_vertex(s, corners, r)
        })
        .collect();
    sample_outline(count, &vertices, rng)
}

/// Jittered ring used as the SVG particle target when no document is loaded.
///
/// Points are spaced evenly by angle, with the same depth spread the SVG
/// sampler applies so the two clouds look alike.
pub fn ring<R: Rng + ?Sized>(count: usize, radius: f32, rng: &mut R) -> PointBuffer {
    let points: Vec<Vec3> = (0..count)
        .map(|i| {
            let angle = i as f32 / count as f32 * TAU;
            let r = radius + (rng.random::<f32>() - 0.5) * 0.3;
            let x = angle.cos() * r + jitter(rng, SVG_XY_JITTER);
            let y = angle.sin() * r + jitter(rng, SVG_XY_JITTER);
            Vec3::new(x, y, triangular(rng) * SVG_Z_SPREAD)
        })
        .collect();
    PointBuffer::from_points(&points)
}

// =============================================================================
// TARGET SETS
// =============================================================================

/// Named targets the hand-gesture animation switches between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetShape {
    Sphere,
    Expanded,
    Triangle,
    Pentagon,
    Star,
}

impl TargetShape {
    pub const ALL: [Self; 5] = [Self::Sphere, Self::Expanded, Self::Triangle, Self::Pentagon, Self::Star];

    fn slot(self) -> usize {
        match self {
            Self::Sphere => 0,
            Self::Expanded => 1,
            Self::Triangle => 2,
            Self::Pentagon => 3,
            Self::Star => 4,
        }
    }
}

/// Immutable target buffers, one per [`TargetShape`], all the same length.
#[derive(Debug, Clone)]
pub struct TargetShapeSet {
    buffers: [PointBuffer; 5],
}

impl TargetShapeSet {
    /// Build every target for `count` particles: sphere r1.5, expanded shell,
    /// triangle r3, pentagon r2.5 and star r3.
    pub fn generate<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        Self {
            buffers: [
                sphere(count, 1.5, rng),
                expanded(count, rng),
                polygon_edges(count, 3, 3.0, rng),
                polygon_edges(count, 5, 2.5, rng),
                star(count, 3.0, rng),
            ],
        }
    }

    #[must_use]
    pub fn get(&self, shape: TargetShape) -> &PointBuffer {
        &self.buffers[shape.slot()]
    }

    /// Points per target.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffers[0].capacity()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── Helpers ─────────────────────────────────────────────────────

fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let theta = rng.random::<f32>() * TAU;
    let phi = (2.0 * rng.random::<f32>() - 1.0).acos();
    Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos())
}

fn outline_vertex(index: usize, corners: usize, radius: f32) -> Vec2 {
    let angle = index as f32 / corners as f32 * TAU - FRAC_PI_2;
    Vec2::new(angle.cos(), angle.sin()) * radius
}

fn sample_outline<R: Rng + ?Sized>(count: usize, vertices: &[Vec2], rng: &mut R) -> PointBuffer {
    if vertices.is_empty() {
        return PointBuffer::zeroed(count);
    }
    let points: Vec<Vec3> = (0..count)
        .map(|i| {
            let edge = i % vertices.len();
            let from = vertices[edge];
            let to = vertices[(edge + 1) % vertices.len()];
            let on_edge = from.lerp(to, rng.random::<f32>());
            on_edge.extend(jitter(rng, EDGE_Z_JITTER))
        })
        .collect();
    PointBuffer::from_points(&points)
}

/// Uniform value in `[-half, half)`.
pub(crate) fn jitter<R: Rng + ?Sized>(rng: &mut R, half: f32) -> f32 {
    (rng.random::<f32>() - 0.5) * half * 2.0
}

/// Triangular distribution on `(-1, 1)`, denser near zero.
pub(crate) fn triangular<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.random::<f32>() + rng.random::<f32>() - 1.0
}

//! Particle Stream: columns of particles that fall, curve along the ground
//! and fan outward, each drawn with a fading trail.
//!
//! Every particle follows its own cubic Bézier from the top of a column to a
//! point on the ground. The buffers hold [`TRAIL_COPIES`] points per particle
//! for the full [`STREAM_MAX_PARTICLES`]; the count setting only changes how
//! many of them are active.

#[cfg(test)]
#[path = "particle_stream_test.rs"]
mod particle_stream_test;

use std::f32::consts::TAU;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Animation, AnimationError, AnimationId, FrameContext};
use crate::buffer::PointBuffer;
use crate::color::Rgb;
use crate::consts::{STREAM_MAX_PARTICLES, TRAIL_COPIES};
use crate::render::{BlendMode, FrameView, PointMaterial, PointsView, Transform};
use crate::sprite;

const TOP_Y: f32 = 7.0;
const GROUND_Y: f32 = -2.0;
const COLUMN_WIDTH: f32 = 1.5;

/// Largest curve parameter a trail point may sit at.
const MAX_T: f32 = 0.999;

/// Trail span in curve parameter units at full motion blur.
const MAX_TRAIL_SPAN: f32 = 0.10;

const POINT_SIZE: f32 = 0.08;
const OPACITY: f32 = 0.9;

const FALLBACK_TOP: Rgb = Rgb::from_u32(0xc4_b5_fd);
const FALLBACK_BOTTOM: Rgb = Rgb::from_u32(0x7c_3a_ed);

/// Random per-particle path data, fixed for the life of the animation.
#[derive(Debug, Clone, Copy)]
pub struct Strand {
    /// Starting offset along the path, `[0, 1)`.
    pub phase: f32,
    /// X of the column the particle falls in.
    pub column: f32,
    pub angle: f32,
    /// Ground distance the path fans out to, `[2, 7)`.
    pub radius: f32,
    pub fall: f32,
    pub wave: f32,
}

impl Strand {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let phase = rng.random();
        let column = (rng.random::<f32>() + rng.random::<f32>() - 1.0) * COLUMN_WIDTH;
        Self {
            phase,
            column,
            angle: rng.random::<f32>() * TAU,
            radius: 2.0 + rng.random::<f32>() * 5.0,
            fall: 0.6 + rng.random::<f32>() * 0.8,
            wave: rng.random::<f32>() * TAU,
        }
    }

    /// Where the path meets the ground.
    #[must_use]
    pub fn end(&self) -> Vec3 {
        Vec3::new(self.angle.cos() * self.radius, GROUND_Y, self.angle.sin() * self.radius * 0.7)
    }

    /// Position at curve parameter `t` (clamped to `[0, 0.999]`) plus a
    /// slow sideways wobble at `time`.
    #[must_use]
    pub fn position(&self, t: f32, time: f32) -> Vec3 {
        let t = t.clamp(0.0, MAX_T);
        let end = self.end();
        let p0 = Vec3::new(self.column, TOP_Y, 0.0);
        let p1 = Vec3::new(self.column * 0.9, GROUND_Y + 1.0, 0.0);
        let p2 = Vec3::new(end.x * 0.4, GROUND_Y, end.z * 0.4);

        let mt = 1.0 - t;
        let mut p = p0 * (mt * mt * mt) + p1 * (3.0 * mt * mt * t) + p2 * (3.0 * mt * t * t) + end * (t * t * t);
        p.x += (time * 0.3 + self.wave * 6.0).sin() * 0.01;
        p
    }

    /// Curve parameter of the trail head at `time`.
    #[must_use]
    pub fn head(&self, time: f32, speed: f32) -> f32 {
        (time * speed * self.fall * 0.2 + self.phase).rem_euclid(1.0)
    }
}

/// Distance in curve parameter between neighboring trail copies.
#[must_use]
pub fn trail_step(motion_blur: f32) -> f32 {
    motion_blur / 100.0 * MAX_TRAIL_SPAN / (TRAIL_COPIES - 1) as f32
}

pub struct ParticleStream {
    strands: Vec<Strand>,
    positions: PointBuffer,
    colors: PointBuffer,
    material: PointMaterial,
    transform: Transform,
}

impl ParticleStream {
    /// Nothing is drawn until the first update sets the active range.
    ///
    /// # Errors
    ///
    /// Returns an error when the particle sprite cannot be rasterized.
    pub fn new(seed: u64) -> Result<Self, AnimationError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let strands = (0..STREAM_MAX_PARTICLES).map(|_| Strand::random(&mut rng)).collect();

        let capacity = STREAM_MAX_PARTICLES * TRAIL_COPIES;
        let mut positions = PointBuffer::zeroed(capacity);
        let mut colors = PointBuffer::zeroed(capacity);
        positions.set_active_count(0);
        colors.set_active_count(0);

        let mut material = PointMaterial::new(POINT_SIZE, OPACITY, BlendMode::Additive);
        material.set_sprite(sprite::soft_circle_sprite()?);

        Ok(Self { strands, positions, colors, material, transform: Transform::default() })
    }

    #[must_use]
    pub fn strands(&self) -> &[Strand] {
        &self.strands
    }
}

impl Animation for ParticleStream {
    fn id(&self) -> AnimationId {
        AnimationId::ParticleStream
    }

    fn update(&mut self, frame: &FrameContext<'_>) -> Result<(), AnimationError> {
        let time = frame.time;
        let settings = &frame.settings.particle_stream;
        let count = settings.particle_count.min(STREAM_MAX_PARTICLES);
        let step = trail_step(settings.motion_blur);

        self.positions.set_active_count(count * TRAIL_COPIES);
        self.colors.set_active_count(count * TRAIL_COPIES);

        let top = Rgb::from_hex_or(&settings.color_top, FALLBACK_TOP).to_vec3();
        let bottom = Rgb::from_hex_or(&settings.color_bottom, FALLBACK_BOTTOM).to_vec3();

        for (i, strand) in self.strands.iter().take(count).enumerate() {
            let head = strand.head(time, settings.speed);
            for j in 0..TRAIL_COPIES {
                let index = i * TRAIL_COPIES + j;
                let mut t = head - j as f32 * step;
                if t < 0.0 {
                    t += 1.0;
                }
                self.positions.set(index, strand.position(t, time));
                let fade = 1.0 - j as f32 / TRAIL_COPIES as f32;
                self.colors.set(index, top.lerp(bottom, t) * fade);
            }
        }
        Ok(())
    }

    fn view(&self) -> FrameView<'_> {
        FrameView::Points(PointsView {
            positions: &self.positions,
            colors: &self.colors,
            material: &self.material,
            transform: self.transform,
        })
    }
}

//! SVG Particles: glowing particles that trace an uploaded drawing.
//!
//! DESIGN
//! ======
//! The buffers are sized for [`SVG_MAX_PARTICLES`] once; the particle count
//! setting only moves the active range. Targets come from the loaded SVG
//! (resampled whenever the document revision or the count changes) or from
//! the default ring when nothing is loaded.
//!
//! The last [`AMBIENT_PERCENT`] percent of the active particles never join
//! the shape. They orbit lazily as dim stardust around it.

#[cfg(test)]
#[path = "svg_particles_test.rs"]
mod svg_particles_test;

use std::f32::consts::TAU;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Animation, AnimationError, AnimationId, FrameContext};
use crate::buffer::PointBuffer;
use crate::color::{Palette, Rgb};
use crate::consts::{AMBIENT_LERP, AMBIENT_PERCENT, COLOR_LERP, POSITION_LERP, SVG_MAX_PARTICLES};
use crate::memo::ChangeGuard;
use crate::render::{BlendMode, FrameView, PointMaterial, PointsView, Transform};
use crate::settings::SvgParticlesSettings;
use crate::{shapes, sprite, svg};

/// Radius of the ring shown when no SVG is loaded.
const DEFAULT_RING_RADIUS: f32 = 3.0;

/// Palette the first frame's colors are picked from.
const INITIAL_COLOR: Rgb = Rgb::from_u32(0x8b_5c_f6);

const OPACITY: f32 = 0.9;

/// Shape-particle drift amplitude around its target.
const DRIFT: f32 = 0.04;

/// Brightness multiplier for ambient stardust.
const AMBIENT_DIM: f32 = 0.35;

/// Document revision and particle count the targets were sampled for.
/// `None` means the default ring.
type TargetKey = Option<(u64, usize)>;

fn target_key(settings: &SvgParticlesSettings) -> TargetKey {
    settings.svg.as_ref().map(|svg| (svg.revision, settings.particle_count))
}

/// Index of the first ambient particle for `count` active particles.
#[must_use]
pub fn ambient_start(count: usize) -> usize {
    count * (100 - AMBIENT_PERCENT) / 100
}

/// Brightness falloff with depth, roughly 0.4 at the back to 1.2 at the front.
#[must_use]
pub fn depth_brightness(z: f32) -> f32 {
    0.6 + 0.4 * ((z + 2.0) / 4.0)
}

pub struct SvgParticles {
    positions: PointBuffer,
    /// Palette-chasing colors before twinkle and depth.
    base_colors: PointBuffer,
    colors: PointBuffer,
    phases: Vec<f32>,
    drifts: Vec<[f32; 2]>,
    targets: PointBuffer,
    target_key: ChangeGuard<TargetKey>,
    blur_key: ChangeGuard<f32>,
    material: PointMaterial,
    transform: Transform,
    rng: StdRng,
}

impl SvgParticles {
    /// # Errors
    ///
    /// Returns an error when the glow sprite cannot be rasterized.
    pub fn new(settings: &SvgParticlesSettings, seed: u64) -> Result<Self, AnimationError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let phases: Vec<f32> = (0..SVG_MAX_PARTICLES).map(|_| rng.random::<f32>() * TAU).collect();
        let drifts = (0..SVG_MAX_PARTICLES).map(|_| [rng.random::<f32>() * TAU, rng.random::<f32>() * TAU]).collect();

        let palette = Palette::from_base(INITIAL_COLOR);
        let mut positions = PointBuffer::zeroed(SVG_MAX_PARTICLES);
        let mut colors = PointBuffer::zeroed(SVG_MAX_PARTICLES);
        for i in 0..SVG_MAX_PARTICLES {
            let theta = rng.random::<f32>() * TAU;
            let r = rng.random::<f32>() * 5.0;
            let y = (rng.random::<f32>() - 0.5) * 2.0;
            positions.set(i, Vec3::new(theta.cos() * r, y, theta.sin() * r));
            colors.set(i, palette.color_for(rng.random_range(0..4)).to_vec3());
        }

        let mut material = PointMaterial::new(0.0, OPACITY, BlendMode::Additive);
        material.set_sprite(sprite::glow_sprite(settings.blur)?);

        let mut anim = Self {
            positions,
            base_colors: PointBuffer::zeroed(SVG_MAX_PARTICLES),
            colors,
            phases,
            drifts,
            targets: PointBuffer::zeroed(0),
            target_key: ChangeGuard::primed(target_key(settings)),
            blur_key: ChangeGuard::primed(settings.blur),
            material,
            transform: Transform::default(),
            rng,
        };
        anim.targets = anim.sample_targets(settings);
        anim.set_count(settings.particle_count);
        Ok(anim)
    }

    /// Points the shape particles currently chase.
    #[must_use]
    pub fn targets(&self) -> &PointBuffer {
        &self.targets
    }

    fn sample_targets(&mut self, settings: &SvgParticlesSettings) -> PointBuffer {
        match &settings.svg {
            Some(source) => {
                log::debug!(
                    "svg-particles: sampling '{}' rev {} for {} particles",
                    source.name,
                    source.revision,
                    settings.particle_count
                );
                svg::sample(&source.raw, settings.particle_count, &mut self.rng)
            }
            None => shapes::ring(SVG_MAX_PARTICLES, DEFAULT_RING_RADIUS, &mut self.rng),
        }
    }

    fn set_count(&mut self, count: usize) -> usize {
        self.colors.set_active_count(count);
        self.positions.set_active_count(count)
    }

    fn move_particles(&mut self, t: f32, count: usize) {
        let split = ambient_start(count);
        let target_count = self.targets.capacity();

        if target_count > 0 {
            for i in 0..split {
                let [d0, d1] = self.drifts[i];
                let drift = Vec3::new((t * 0.8 + d0).sin() * DRIFT, (t * 0.6 + d1).cos() * DRIFT, 0.0);
                self.positions.approach(i, self.targets.get(i % target_count) + drift, POSITION_LERP);
            }
        }

        for i in split..count {
            let p = self.phases[i];
            let speed = 0.15 + p * 0.02;
            let radius = 4.0 + p.sin() * 2.0;
            let angle = t * speed + p;
            let goal = Vec3::new(angle.cos() * radius, (t * 0.3 + self.drifts[i][0]).sin() * 3.0, angle.sin() * radius);
            self.positions.approach(i, goal, AMBIENT_LERP);
        }
    }
}

impl Animation for SvgParticles {
    fn id(&self) -> AnimationId {
        AnimationId::SvgParticles
    }

    fn update(&mut self, frame: &FrameContext<'_>) -> Result<(), AnimationError> {
        let t = frame.time;
        let settings = &frame.settings.svg_particles;

        let count = self.set_count(settings.particle_count);
        if self.target_key.changed(target_key(settings)) {
            self.targets = self.sample_targets(settings);
        }

        self.transform.rotation = Vec3::new(
            settings.angle_x.to_radians(),
            settings.angle_y.to_radians(),
            settings.angle_z.to_radians(),
        );
        self.transform.scale = 1.0 + (t * 0.8).sin() * 0.02;

        self.move_particles(t, count);

        if self.blur_key.changed(settings.blur) {
            self.material.set_sprite(sprite::glow_sprite(settings.blur)?);
            log::debug!("svg-particles: glow sprite regenerated for blur {}", settings.blur);
        }
        let intensity = settings.intensity / 100.0;
        let glow_pulse = 1.0 + (t * 1.2).sin() * 0.08 * intensity;
        self.material.size = (0.08 + settings.blur / 100.0 * 0.14) * glow_pulse;

        let palette = Palette::from_hex(&settings.color, INITIAL_COLOR);
        let twinkle_amp = 0.5 * intensity;
        let split = ambient_start(count);
        for i in 0..count {
            self.base_colors.approach(i, palette.color_for(i).to_vec3(), COLOR_LERP);
            let twinkle = 1.0 + (t * 1.5 + self.phases[i]).sin() * twinkle_amp;
            let dim = if i >= split { AMBIENT_DIM } else { 1.0 };
            let brightness = twinkle * depth_brightness(self.positions.get(i).z) * dim;
            self.colors.set(i, self.base_colors.get(i) * brightness);
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

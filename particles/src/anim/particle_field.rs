//! Particle Field: a slowly turning cube of sprite particles.
//!
//! Positions drift with a tiny per-frame wave and are never pulled back, so
//! over long sessions the field slowly smears vertically. Colors chase a
//! palette derived from the configured base color. With glow on, sprites
//! switch to an additive radial glow and colors twinkle per particle.

#[cfg(test)]
#[path = "particle_field_test.rs"]
mod particle_field_test;

use std::f32::consts::TAU;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Animation, AnimationError, AnimationId, FrameContext};
use crate::buffer::PointBuffer;
use crate::color::{Palette, Rgb};
use crate::consts::{COLOR_LERP, FIELD_PARTICLES};
use crate::memo::ChangeGuard;
use crate::render::{BlendMode, FrameView, PointMaterial, PointsView, Transform};
use crate::settings::ParticleFieldSettings;
use crate::sprite::{self, SpriteShape, SpriteTexture};

/// Edge length of the cube particles start in.
const FIELD_EXTENT: f32 = 10.0;

/// Vertical drift amplitude per frame.
const WAVE_STEP: f32 = 0.001;

/// Color the field starts from before the configured palette takes over.
const INITIAL_COLOR: Rgb = Rgb::from_u32(0x63_66_f1);

/// Key of everything the sprite depends on.
type SpriteKey = (SpriteShape, f32, bool);

pub struct ParticleField {
    positions: PointBuffer,
    /// Palette-chasing colors before twinkle.
    base_colors: PointBuffer,
    colors: PointBuffer,
    phases: Vec<f32>,
    material: PointMaterial,
    transform: Transform,
    sprite_key: ChangeGuard<SpriteKey>,
}

impl ParticleField {
    /// # Errors
    ///
    /// Returns an error when the initial sprite cannot be rasterized.
    pub fn new(settings: &ParticleFieldSettings, seed: u64) -> Result<Self, AnimationError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let palette = Palette::from_base(INITIAL_COLOR);

        let mut positions = PointBuffer::zeroed(FIELD_PARTICLES);
        let mut base_colors = PointBuffer::zeroed(FIELD_PARTICLES);
        for i in 0..FIELD_PARTICLES {
            let p = Vec3::new(rng.random(), rng.random(), rng.random()) - Vec3::splat(0.5);
            positions.set(i, p * FIELD_EXTENT);
            base_colors.set(i, palette.color_for(rng.random_range(0..4)).to_vec3());
        }
        let phases = (0..FIELD_PARTICLES).map(|_| rng.random::<f32>() * TAU).collect();

        let key = (settings.shape, settings.blur, settings.glow);
        let mut material = PointMaterial::new(0.0, 1.0, blend_for(settings.glow));
        material.set_sprite(sprite_for(key)?);

        let mut field = Self {
            positions,
            colors: base_colors.clone(),
            base_colors,
            phases,
            material,
            transform: Transform::default(),
            sprite_key: ChangeGuard::primed(key),
        };
        field.apply_size(settings);
        Ok(field)
    }

    fn apply_size(&mut self, settings: &ParticleFieldSettings) {
        let b = settings.blur / 100.0;
        if settings.glow {
            self.material.size = 0.08 + b * 0.14;
            self.material.opacity = 0.9;
        } else {
            self.material.size = 0.02 + b * 0.13;
            self.material.opacity = 1.0 - b * 0.5;
        }
    }
}

fn blend_for(glow: bool) -> BlendMode {
    if glow { BlendMode::Additive } else { BlendMode::Normal }
}

fn sprite_for((shape, blur, glow): SpriteKey) -> Result<SpriteTexture, AnimationError> {
    let sprite = if glow { sprite::glow_sprite(blur)? } else { sprite::shape_sprite(shape, blur)? };
    Ok(sprite)
}

impl Animation for ParticleField {
    fn id(&self) -> AnimationId {
        AnimationId::ParticleField
    }

    fn update(&mut self, frame: &FrameContext<'_>) -> Result<(), AnimationError> {
        let t = frame.time;
        let settings = &frame.settings.particle_field;

        self.transform.rotation = Vec3::new((t * 0.03).sin() * 0.2, t * 0.05, 0.0);

        for i in 0..self.positions.capacity() {
            let mut p = self.positions.get(i);
            p.y += (t + p.x).sin() * WAVE_STEP;
            self.positions.set(i, p);
        }

        let key = (settings.shape, settings.blur, settings.glow);
        if self.sprite_key.changed(key) {
            self.material.set_sprite(sprite_for(key)?);
            log::debug!("particle-field: sprite regenerated for {key:?}");
        }
        self.material.set_blend(blend_for(settings.glow));
        self.apply_size(settings);

        let palette = Palette::from_hex(&settings.color, INITIAL_COLOR);
        let amplitude = if settings.glow { 0.5 * settings.intensity / 100.0 } else { 0.0 };
        for i in 0..self.base_colors.capacity() {
            self.base_colors.approach(i, palette.color_for(i).to_vec3(), COLOR_LERP);
            let twinkle = 1.0 + (t * 1.5 + self.phases[i]).sin() * amplitude;
            self.colors.set(i, self.base_colors.get(i) * twinkle);
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

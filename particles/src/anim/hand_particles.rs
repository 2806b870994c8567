//! Hand-Gesture Particles: a cloud that morphs between target shapes as the
//! tracked hand changes gesture, and follows the hand while it is visible.

#[cfg(test)]
#[path = "hand_particles_test.rs"]
mod hand_particles_test;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Animation, AnimationError, AnimationId, FrameContext};
use crate::buffer::PointBuffer;
use crate::color::{COOL_PALETTE, Palette, SHAPE_PALETTE, WARM_PALETTE};
use crate::consts::{COLOR_LERP, HAND_PARTICLES, POSITION_LERP};
use crate::gesture::Gesture;
use crate::render::{BlendMode, FrameView, PointMaterial, PointsView, Transform};
use crate::shapes::{self, TargetShape, TargetShapeSet};

const POINT_SIZE: f32 = 0.035;
const OPACITY: f32 = 0.85;

/// How far the cloud follows the hand position.
const HAND_FOLLOW: f32 = 0.3;

/// Per-particle idle wobble amplitude.
const NOISE: f32 = 0.02;

/// Target shape and palette for a gesture.
#[must_use]
pub fn formation(gesture: Gesture) -> (TargetShape, &'static Palette) {
    match gesture {
        Gesture::Open => (TargetShape::Expanded, &WARM_PALETTE),
        Gesture::Two => (TargetShape::Triangle, &SHAPE_PALETTE),
        Gesture::Three => (TargetShape::Pentagon, &SHAPE_PALETTE),
        Gesture::Four => (TargetShape::Star, &SHAPE_PALETTE),
        Gesture::Fist | Gesture::None => (TargetShape::Sphere, &COOL_PALETTE),
    }
}

pub struct HandParticles {
    positions: PointBuffer,
    colors: PointBuffer,
    targets: TargetShapeSet,
    material: PointMaterial,
    transform: Transform,
}

impl HandParticles {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let positions = shapes::sphere(HAND_PARTICLES, 1.5, &mut rng);
        let mut colors = PointBuffer::zeroed(HAND_PARTICLES);
        for i in 0..HAND_PARTICLES {
            colors.set(i, COOL_PALETTE.color_for(rng.random_range(0..4)).to_vec3());
        }
        let targets = TargetShapeSet::generate(HAND_PARTICLES, &mut rng);

        Self {
            positions,
            colors,
            targets,
            material: PointMaterial::new(POINT_SIZE, OPACITY, BlendMode::Normal),
            transform: Transform::default(),
        }
    }
}

/// Small time-varying offset keeping a settled cloud alive.
fn wobble(i: usize, t: f32) -> Vec3 {
    let k = i as f32;
    Vec3::new((k * 0.1 + t).sin() * NOISE, (k * 0.13 + t * 1.2).cos() * NOISE, 0.0)
}

impl Animation for HandParticles {
    fn id(&self) -> AnimationId {
        AnimationId::HandParticles
    }

    fn update(&mut self, frame: &FrameContext<'_>) -> Result<(), AnimationError> {
        let hand = frame.hand;
        let (shape, palette) = formation(hand.gesture);
        let target = self.targets.get(shape);
        let offset = if hand.is_tracking { hand.target * HAND_FOLLOW } else { Vec3::ZERO };

        for i in 0..self.positions.capacity() {
            let goal = target.get(i) + offset + wobble(i, frame.time);
            self.positions.approach(i, goal, POSITION_LERP);
            self.colors.approach(i, palette.color_for(i).to_vec3(), COLOR_LERP);
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

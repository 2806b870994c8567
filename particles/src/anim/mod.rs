//! The gallery animations and their registry.
//!
//! Every animation owns its buffers, materials and per-particle random data.
//! Once per frame the engine builds a [`FrameContext`] (elapsed time plus a
//! single settings/hand snapshot) and calls [`Animation::update`], then hands
//! [`Animation::view`] to the renderer.

pub mod hand_particles;
pub mod particle_field;
pub mod particle_stream;
pub mod svg_particles;
pub mod wave_sphere;


use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::gesture::HandSignal;
use crate::render::FrameView;
use crate::settings::{Settings, SettingsError};
use crate::sprite::SpriteError;

pub use hand_particles::HandParticles;
pub use particle_field::ParticleField;
pub use particle_stream::ParticleStream;
pub use svg_particles::SvgParticles;
pub use wave_sphere::WaveSphere;

#[derive(Debug, thiserror::Error)]
pub enum AnimationError {
    #[error("sprite: {0}")]
    Sprite(#[from] SpriteError),
}

/// Inputs for one frame, captured once before the update runs.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    /// Seconds since the animation was selected.
    pub time: f32,
    pub settings: &'a Settings,
    pub hand: HandSignal,
}

/// A per-frame simulation the renderer can draw.
pub trait Animation {
    fn id(&self) -> AnimationId;

    /// Advance one frame. Mutates live buffers in place.
    ///
    /// # Errors
    ///
    /// Returns an error when a sprite cannot be rasterized; the instance
    /// should be torn down.
    fn update(&mut self, frame: &FrameContext<'_>) -> Result<(), AnimationError>;

    /// What to draw for the frame just computed.
    fn view(&self) -> FrameView<'_>;
}

// =============================================================================
// REGISTRY
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationId {
    ParticleField,
    WaveSphere,
    HandParticles,
    SvgParticles,
    ParticleStream,
}

impl AnimationId {
    /// Gallery order.
    pub const ALL: [Self; 5] =
        [Self::ParticleField, Self::WaveSphere, Self::HandParticles, Self::SvgParticles, Self::ParticleStream];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ParticleField => "particle-field",
            Self::WaveSphere => "wave-sphere",
            Self::HandParticles => "hand-particles",
            Self::SvgParticles => "svg-particles",
            Self::ParticleStream => "particle-stream",
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::ParticleField => "Particle Field",
            Self::WaveSphere => "Wave Sphere",
            Self::HandParticles => "Hand Gesture Particles",
            Self::SvgParticles => "SVG Particles",
            Self::ParticleStream => "Particle Stream",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::ParticleField => "Floating particles with gentle wave motion",
            Self::WaveSphere => "Animated icosahedron with vertex displacement",
            Self::HandParticles => "Webcam hand tracking controls particle shapes and colors",
            Self::SvgParticles => "Glowing particles that trace an uploaded SVG",
            Self::ParticleStream => "Falling streams that curve outward along the ground",
        }
    }

    #[must_use]
    pub fn tags(self) -> &'static [&'static str] {
        match self {
            Self::ParticleField => &["particles", "points"],
            Self::WaveSphere => &["mesh", "wireframe"],
            Self::HandParticles => &["particles", "webcam", "gesture"],
            Self::SvgParticles => &["particles", "svg", "glow"],
            Self::ParticleStream => &["particles", "trails"],
        }
    }

    /// Whether this animation reads the hand tracker.
    #[must_use]
    pub fn uses_hand_tracking(self) -> bool {
        matches!(self, Self::HandParticles)
    }
}

impl fmt::Display for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnimationId {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| SettingsError::UnknownAnimation(s.to_string()))
    }
}

/// Construct the animation `id` with a fresh random seed drawn from `rng`.
///
/// # Errors
///
/// Returns an error when the initial sprite cannot be rasterized.
pub fn create<R: Rng + ?Sized>(
    id: AnimationId,
    settings: &Settings,
    rng: &mut R,
) -> Result<Box<dyn Animation>, AnimationError> {
    let seed = rng.random::<u64>();
    let animation: Box<dyn Animation> = match id {
        AnimationId::ParticleField => Box::new(ParticleField::new(&settings.particle_field, seed)?),
        AnimationId::WaveSphere => Box::new(WaveSphere::new(&settings.wave_sphere)),
        AnimationId::HandParticles => Box::new(HandParticles::new(seed)),
        AnimationId::SvgParticles => Box::new(SvgParticles::new(&settings.svg_particles, seed)?),
        AnimationId::ParticleStream => Box::new(ParticleStream::new(seed)?),
    };
    log::debug!("anim: created {id}");
    Ok(animation)
}

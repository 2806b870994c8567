//! Read-only views handed to the renderer.
//!
//! This module is the boundary between the simulation and whatever draws it
//! (WebGL in the browser, a log line in the headless host). Animations own
//! their buffers and materials; once per frame the engine asks the active
//! animation for a [`FrameView`] borrowing that state. Nothing here mutates
//! simulation state, and the renderer never writes back.
//!
//! Materials carry a revision counter that moves only when something the
//! renderer must re-upload changes (sprite texture or blend mode), so a
//! renderer can skip texture uploads and pipeline switches on quiet frames.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use glam::Vec3;

use crate::buffer::PointBuffer;
use crate::color::Rgb;
use crate::mesh::Mesh;
use crate::sprite::SpriteTexture;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlendMode {
    #[default]
    Normal,
    Additive,
}

/// Object transform applied to a whole point cloud or mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Euler angles in radians, applied X then Y then Z.
    pub rotation: Vec3,
    /// Uniform scale.
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self { rotation: Vec3::ZERO, scale: 1.0 }
    }
}

// =============================================================================
// MATERIALS
// =============================================================================

/// Material for a point cloud drawn with vertex colors.
#[derive(Debug, Clone, PartialEq)]
pub struct PointMaterial {
    /// World-space point size (size attenuation on).
    pub size: f32,
    pub opacity: f32,
    blend: BlendMode,
    sprite: Option<SpriteTexture>,
    revision: u64,
}

impl PointMaterial {
    #[must_use]
    pub fn new(size: f32, opacity: f32, blend: BlendMode) -> Self {
        Self { size, opacity, blend, sprite: None, revision: 0 }
    }

    #[must_use]
    pub fn blend(&self) -> BlendMode {
        self.blend
    }

    #[must_use]
    pub fn sprite(&self) -> Option<&SpriteTexture> {
        self.sprite.as_ref()
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Switch blend mode. Returns `false` (and leaves the revision alone)
    /// when `blend` is already active.
    pub fn set_blend(&mut self, blend: BlendMode) -> bool {
        if self.blend == blend {
            return false;
        }
        self.blend = blend;
        self.revision += 1;
        true
    }

    /// Replace the sprite, dropping the previous one.
    pub fn set_sprite(&mut self, sprite: SpriteTexture) {
        self.sprite = Some(sprite);
        self.revision += 1;
    }

    /// Drop the sprite.
    pub fn clear_sprite(&mut self) {
        if self.sprite.take().is_some() {
            self.revision += 1;
        }
    }
}

/// Lit wireframe material for the wave sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshMaterial {
    pub color: Rgb,
    pub emissive: Rgb,
    pub emissive_intensity: f32,
    pub wireframe: bool,
}

// =============================================================================
// FRAME VIEWS
// =============================================================================

/// A point cloud ready to draw. Only the first `active_count()` points are drawn.
#[derive(Debug, Clone, Copy)]
pub struct PointsView<'a> {
    pub positions: &'a PointBuffer,
    pub colors: &'a PointBuffer,
    pub material: &'a PointMaterial,
    pub transform: Transform,
}

impl PointsView<'_> {
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.positions.active_count()
    }
}

/// A triangle mesh ready to draw.
#[derive(Debug, Clone, Copy)]
pub struct MeshView<'a> {
    pub mesh: &'a Mesh,
    pub material: &'a MeshMaterial,
    pub transform: Transform,
}

/// What the active animation wants drawn this frame.
#[derive(Debug, Clone, Copy)]
pub enum FrameView<'a> {
    Points(PointsView<'a>),
    Mesh(MeshView<'a>),
}

impl FrameView<'_> {
    /// Points (or mesh vertices) the renderer will draw.
    #[must_use]
    pub fn drawn_count(&self) -> usize {
        match self {
            Self::Points(points) => points.active_count(),
            Self::Mesh(mesh) => mesh.mesh.vertex_count(),
        }
    }

    #[must_use]
    pub fn transform(&self) -> Transform {
        match self {
            Self::Points(points) => points.transform,
            Self::Mesh(mesh) => mesh.transform,
        }
    }

    /// Sprite generation in use, if any.
    #[must_use]
    pub fn sprite_generation(&self) -> Option<u64> {
        match self {
            Self::Points(points) => points.material.sprite().map(|s| s.generation),
            Self::Mesh(_) => None,
        }
    }
}

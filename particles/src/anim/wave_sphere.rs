//! Wave Sphere: a wireframe solid whose surface ripples along its normals.
//!
//! The geometry is a shape-tagged value: the tessellation, plus the
//! untouched vertex positions every frame's displacement is computed from.
//! Changing shape goes through [`transition`], which releases the old
//! geometry before building the new one so two full meshes never coexist.

#[cfg(test)]
#[path = "wave_sphere_test.rs"]
mod wave_sphere_test;

use glam::Vec3;

use super::{Animation, AnimationError, AnimationId, FrameContext};
use crate::buffer::PointBuffer;
use crate::color::{Hsl, Rgb};
use crate::consts::MATERIAL_LERP;
use crate::mesh::{Mesh, MeshShape};
use crate::render::{FrameView, MeshMaterial, MeshView, Transform};
use crate::settings::WaveSphereSettings;

const INITIAL_COLOR: Rgb = Rgb::from_u32(0x8b_5c_f6);
const INITIAL_EMISSIVE: Rgb = Rgb::from_u32(0x4c_1d_95);
const EMISSIVE_INTENSITY: f32 = 0.3;

/// Lightness removed from the surface color to get the emissive color.
const EMISSIVE_DARKEN: f32 = 0.2;

/// Radial displacement of a vertex resting at `o` at time `t`.
///
/// Bounded by `0.1 + 0.08 + 0.06 = 0.24`.
#[must_use]
pub fn wave_offset(o: Vec3, t: f32) -> f32 {
    (o.x * 2.0 + t * 2.0).sin() * 0.1 + (o.y * 3.0 + t * 1.5).sin() * 0.08 + (o.z * 2.5 + t * 1.8).sin() * 0.06
}

/// Tessellation for one shape plus its rest positions.
pub struct Geometry {
    pub shape: MeshShape,
    pub mesh: Mesh,
    /// Vertex positions as built, never displaced.
    pub rest: PointBuffer,
}

impl Geometry {
    #[must_use]
    pub fn build(shape: MeshShape) -> Self {
        let mesh = shape.build();
        let rest = mesh.positions.clone();
        Self { shape, mesh, rest }
    }

    /// Placeholder holding no vertices, used while swapping geometries.
    fn empty() -> Self {
        let empty = PointBuffer::zeroed(0);
        Self {
            shape: MeshShape::default(),
            mesh: Mesh { positions: empty.clone(), normals: empty.clone(), indices: None },
            rest: empty,
        }
    }
}

/// Replace `old` with the geometry for `shape`, dropping `old` first.
#[must_use]
pub fn transition(old: Geometry, shape: MeshShape) -> Geometry {
    let from = old.shape;
    drop(old);
    log::debug!("wave-sphere: geometry {from:?} -> {shape:?}");
    Geometry::build(shape)
}

pub struct WaveSphere {
    geometry: Geometry,
    material: MeshMaterial,
    transform: Transform,
}

impl WaveSphere {
    #[must_use]
    pub fn new(settings: &WaveSphereSettings) -> Self {
        Self {
            geometry: Geometry::build(settings.shape),
            material: MeshMaterial {
                color: INITIAL_COLOR,
                emissive: INITIAL_EMISSIVE,
                emissive_intensity: EMISSIVE_INTENSITY,
                wireframe: true,
            },
            transform: Transform::default(),
        }
    }

    #[must_use]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[must_use]
    pub fn material(&self) -> &MeshMaterial {
        &self.material
    }

    fn displace(&mut self, t: f32) {
        let Geometry { mesh, rest, .. } = &mut self.geometry;
        for (i, o) in rest.iter().enumerate() {
            let len = o.length();
            if len == 0.0 {
                continue;
            }
            mesh.positions.set(i, o + o / len * wave_offset(o, t));
        }
        mesh.compute_vertex_normals();
    }
}

impl Animation for WaveSphere {
    fn id(&self) -> AnimationId {
        AnimationId::WaveSphere
    }

    fn update(&mut self, frame: &FrameContext<'_>) -> Result<(), AnimationError> {
        let settings = &frame.settings.wave_sphere;
        if settings.shape != self.geometry.shape {
            let old = std::mem::replace(&mut self.geometry, Geometry::empty());
            self.geometry = transition(old, settings.shape);
        }

        self.transform.rotation = Vec3::new(0.0, frame.time * 0.1, 0.0);
        self.displace(frame.time);

        let target = Rgb::from_hex_or(&settings.color, INITIAL_COLOR);
        let hsl = target.to_hsl();
        let emissive = Rgb::from_hsl(Hsl { l: (hsl.l - EMISSIVE_DARKEN).max(0.0), ..hsl });
        self.material.color = self.material.color.lerp(target, MATERIAL_LERP);
        self.material.emissive = self.material.emissive.lerp(emissive, MATERIAL_LERP);
        Ok(())
    }

    fn view(&self) -> FrameView<'_> {
        FrameView::Mesh(MeshView { mesh: &self.geometry.mesh, material: &self.material, transform: self.transform })
    }
}

//! Triangle meshes for the wave sphere.
//!
//! Polyhedra are built the way subdivided polyhedron geometry usually is:
//! each base face is split into `(detail + 1)²` triangles and every vertex is
//! pushed out to the sphere radius. Those meshes are non-indexed, so shared
//! corners appear once per triangle. The UV sphere and torus are indexed
//! grids.

#[cfg(test)]
#[path = "mesh_test.rs"]
mod mesh_test;

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::buffer::PointBuffer;

/// Geometry choices for the wave sphere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeshShape {
    #[default]
    Icosahedron,
    Sphere,
    Torus,
    Octahedron,
    Dodecahedron,
}

impl MeshShape {
    /// Tessellate this shape at the gallery's fixed size and detail.
    #[must_use]
    pub fn build(self) -> Mesh {
        match self {
            Self::Icosahedron => polyhedron(&icosahedron_faces(), 2.0, 30),
            Self::Sphere => uv_sphere(2.0, 64, 64),
            Self::Torus => torus(1.5, 0.6, 30, 100),
            Self::Octahedron => polyhedron(&octahedron_faces(), 2.0, 6),
            Self::Dodecahedron => polyhedron(&dodecahedron_faces(), 2.0, 6),
        }
    }
}

/// Vertex positions, per-vertex normals and optional triangle indices.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub positions: PointBuffer,
    pub normals: PointBuffer,
    pub indices: Option<Vec<u32>>,
}

impl Mesh {
    fn new(positions: Vec<Vec3>, indices: Option<Vec<u32>>) -> Self {
        let positions = PointBuffer::from_points(&positions);
        let normals = PointBuffer::zeroed(positions.capacity());
        let mut mesh = Self { positions, normals, indices };
        mesh.compute_vertex_normals();
        mesh
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.capacity()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.vertex_count() / 3,
        }
    }

    /// Vertex indices of each triangle.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        (0..self.triangle_count()).map(move |t| match &self.indices {
            Some(indices) => [indices[t * 3] as usize, indices[t * 3 + 1] as usize, indices[t * 3 + 2] as usize],
            None => [t * 3, t * 3 + 1, t * 3 + 2],
        })
    }

    /// Recompute normals from the current positions.
    ///
    /// Indexed meshes average the face normals around each vertex; non-indexed
    /// meshes give each vertex its own face's normal.
    pub fn compute_vertex_normals(&mut self) {
        let mut sums = vec![Vec3::ZERO; self.vertex_count()];
        for [a, b, c] in self.triangles() {
            let (pa, pb, pc) = (self.positions.get(a), self.positions.get(b), self.positions.get(c));
            let face = (pc - pb).cross(pa - pb);
            sums[a] += face;
            sums[b] += face;
            sums[c] += face;
        }
        for (i, n) in sums.into_iter().enumerate() {
            self.normals.set(i, n.normalize_or_zero());
        }
    }
}

// =============================================================================
// POLYHEDRA
// =============================================================================

type Face = [Vec3; 3];

fn polyhedron(faces: &[Face], radius: f32, detail: usize) -> Mesh {
    let mut points = Vec::with_capacity(faces.len() * (detail + 1) * (detail + 1) * 3);
    for face in faces {
        for tri in subdivide(face, detail) {
            let mut tri = tri.map(|v| v.normalize_or_zero() * radius);
            let centroid = (tri[0] + tri[1] + tri[2]) / 3.0;
            if (tri[1] - tri[0]).cross(tri[2] - tri[0]).dot(centroid) < 0.0 {
                tri.swap(1, 2);
            }
            points.extend(tri);
        }
    }
    Mesh::new(points, None)
}

/// Split one triangle into `(detail + 1)²` smaller ones.
fn subdivide(&[a, b, c]: &Face, detail: usize) -> Vec<Face> {
    let cols = detail + 1;
    let grid: Vec<Vec<Vec3>> = (0..=cols)
        .map(|i| {
            let along = i as f32 / cols as f32;
            let aj = a.lerp(c, along);
            let bj = b.lerp(c, along);
            let rows = cols - i;
            (0..=rows)
                .map(|j| if rows == 0 { aj } else { aj.lerp(bj, j as f32 / rows as f32) })
                .collect()
        })
        .collect();

    let mut out = Vec::with_capacity(cols * cols);
    for i in 0..cols {
        for j in 0..2 * (cols - i) - 1 {
            let k = j / 2;
            if j % 2 == 0 {
                out.push([grid[i][k + 1], grid[i + 1][k], grid[i][k]]);
            } else {
                out.push([grid[i][k + 1], grid[i + 1][k + 1], grid[i + 1][k]]);
            }
        }
    }
    out
}

const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

fn icosahedron_vertices() -> [Vec3; 12] {
    let t = f32::midpoint(1.0, 5.0_f32.sqrt());
    [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ]
}

fn icosahedron_faces() -> Vec<Face> {
    let v = icosahedron_vertices();
    ICOSAHEDRON_FACES.iter().map(|f| f.map(|i| v[i])).collect()
}

fn octahedron_faces() -> Vec<Face> {
    let v = [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z];
    let faces: [[usize; 3]; 8] =
        [[0, 2, 4], [0, 4, 3], [0, 3, 5], [0, 5, 2], [1, 2, 5], [1, 5, 3], [1, 3, 4], [1, 4, 2]];
    faces.iter().map(|f| f.map(|i| v[i])).collect()
}

/// Dodecahedron as the dual of the icosahedron: each icosahedron vertex
/// becomes a pentagon through the centroids of its five faces, split into a
/// three-triangle fan.
fn dodecahedron_faces() -> Vec<Face> {
    let v = icosahedron_vertices();
    let centroids: Vec<Vec3> =
        ICOSAHEDRON_FACES.iter().map(|f| ((v[f[0]] + v[f[1]] + v[f[2]]) / 3.0).normalize_or_zero()).collect();

    let mut faces = Vec::with_capacity(36);
    for (vi, vertex) in v.iter().enumerate() {
        let axis = vertex.normalize_or_zero();
        let mut ring: Vec<Vec3> =
            ICOSAHEDRON_FACES.iter().zip(&centroids).filter(|(f, _)| f.contains(&vi)).map(|(_, c)| *c).collect();
        let Some(&first) = ring.first() else {
            continue;
        };
        let u = (first - axis * first.dot(axis)).normalize_or_zero();
        let w = axis.cross(u);
        ring.sort_by(|p, q| p.dot(w).atan2(p.dot(u)).total_cmp(&q.dot(w).atan2(q.dot(u))));
        for k in 1..ring.len().saturating_sub(1) {
            faces.push([ring[0], ring[k], ring[k + 1]]);
        }
    }
    faces
}

// =============================================================================
// PARAMETRIC SURFACES
// =============================================================================

fn uv_sphere(radius: f32, width_segments: usize, height_segments: usize) -> Mesh {
    let stride = width_segments + 1;
    let mut points = Vec::with_capacity(stride * (height_segments + 1));
    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            points.push(Vec3::new(
                -radius * (u * TAU).cos() * (v * PI).sin(),
                radius * (v * PI).cos(),
                radius * (u * TAU).sin() * (v * PI).sin(),
            ));
        }
    }

    let mut indices = Vec::new();
    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = (iy * stride + ix + 1) as u32;
            let b = (iy * stride + ix) as u32;
            let c = ((iy + 1) * stride + ix) as u32;
            let d = ((iy + 1) * stride + ix + 1) as u32;
            if iy != 0 {
                indices.extend([a, b, d]);
            }
            if iy != height_segments - 1 {
                indices.extend([b, c, d]);
            }
        }
    }
    Mesh::new(points, Some(indices))
}

fn torus(radius: f32, tube: f32, radial_segments: usize, tubular_segments: usize) -> Mesh {
    let stride = tubular_segments + 1;
    let mut points = Vec::with_capacity(stride * (radial_segments + 1));
    for j in 0..=radial_segments {
        let v = j as f32 / radial_segments as f32 * TAU;
        for i in 0..=tubular_segments {
            let u = i as f32 / tubular_segments as f32 * TAU;
            let ring = radius + tube * v.cos();
            points.push(Vec3::new(ring * u.cos(), ring * u.sin(), tube * v.sin()));
        }
    }

    let mut indices = Vec::new();
    for j in 1..=radial_segments {
        for i in 1..=tubular_segments {
            let a = (stride * j + i - 1) as u32;
            let b = (stride * (j - 1) + i - 1) as u32;
            let c = (stride * (j - 1) + i) as u32;
            let d = (stride * j + i) as u32;
            indices.extend([a, b, d, b, c, d]);
        }
    }
    Mesh::new(points, Some(indices))
}

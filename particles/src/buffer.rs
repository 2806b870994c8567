//! Fixed-capacity buffers of 3-component float triples.
//!
//! A [`PointBuffer`] stores positions or RGB colors as a flat `Vec<f32>` so it
//! can be handed to a renderer without conversion. The allocation is fixed at
//! construction; the number of points the renderer should draw is tracked
//! separately as the active count and may move anywhere in `0..=capacity`.

#[cfg(test)]
#[path = "buffer_test.rs"]
mod buffer_test;

use glam::Vec3;

/// Flat buffer of `capacity × 3` floats with a separately tracked active count.
#[derive(Debug, Clone, PartialEq)]
pub struct PointBuffer {
    data: Vec<f32>,
    active: usize,
}

impl PointBuffer {
    /// Allocate a zero-filled buffer. All points start active.
    #[must_use]
    pub fn zeroed(capacity: usize) -> Self {
        Self { data: vec![0.0; capacity * 3], active: capacity }
    }

    /// Wrap an existing flat array. Trailing floats that do not form a full
    /// triple are dropped.
    #[must_use]
    pub fn from_vec(mut data: Vec<f32>) -> Self {
        let capacity = data.len() / 3;
        data.truncate(capacity * 3);
        Self { data, active: capacity }
    }

    /// Build a buffer from a list of points.
    #[must_use]
    pub fn from_points(points: &[Vec3]) -> Self {
        let data = points.iter().flat_map(|p| p.to_array()).collect();
        Self { data, active: points.len() }
    }

    /// Number of points the buffer can hold.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len() / 3
    }

    /// Number of points currently meant to be drawn.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active
    }

    /// Set the active count, clamped to capacity. Returns the applied value.
    pub fn set_active_count(&mut self, count: usize) -> usize {
        self.active = count.min(self.capacity());
        self.active
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The whole allocation as flat floats.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Only the active prefix as flat floats.
    #[must_use]
    pub fn active_slice(&self) -> &[f32] {
        &self.data[..self.active * 3]
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Read point `index`. Callers keep `index < capacity()`.
    #[must_use]
    pub fn get(&self, index: usize) -> Vec3 {
        let i = index * 3;
        Vec3::new(self.data[i], self.data[i + 1], self.data[i + 2])
    }

    /// Overwrite point `index`. Callers keep `index < capacity()`.
    pub fn set(&mut self, index: usize, value: Vec3) {
        let i = index * 3;
        self.data[i] = value.x;
        self.data[i + 1] = value.y;
        self.data[i + 2] = value.z;
    }

    /// Close `factor` of the gap between point `index` and `target`.
    pub fn approach(&mut self, index: usize, target: Vec3, factor: f32) {
        let current = self.get(index);
        self.set(index, current.lerp(target, factor));
    }

    /// Iterate over every point in the allocation.
    pub fn iter(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.data.chunks_exact(3).map(|c| Vec3::new(c[0], c[1], c[2]))
    }
}

/// Close `factor` of the gap between `current` and `target`.
#[must_use]
pub fn approach(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}

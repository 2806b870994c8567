//! CPU-rasterized point-sprite textures.
//!
//! Sprites are small white RGBA images whose alpha channel shapes each
//! rendered point; particle color comes from the vertex colors. They are
//! rasterized with `tiny-skia` and handed to the renderer as straight
//! (non-premultiplied) RGBA8 bytes, row-major, top row first.
//!
//! Each texture carries a process-unique generation number so the renderer
//! can tell a regenerated sprite from the one it already uploaded.

#[cfg(test)]
#[path = "sprite_test.rs"]
mod sprite_test;

use std::f32::consts::{FRAC_PI_2, TAU};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tiny_skia::{
    Color, FillRule, GradientStop, Paint, Path, PathBuilder, Pixmap, Point, RadialGradient, Rect, SpreadMode, Transform,
};

use crate::consts::{STAR_INNER_RATIO, STAR_POINTS};

/// Edge length of the shape and stream sprites.
pub const SHAPE_SPRITE_SIZE: u32 = 64;

/// Edge length of the glow sprite.
pub const GLOW_SPRITE_SIZE: u32 = 128;

/// Blur radius in pixels at `blur = 100`.
const MAX_BLUR_PX: f32 = 12.0;

/// Smallest radius a blurred shape shrinks to.
const MIN_SHAPE_RADIUS: f32 = 4.0;

/// Glow falloff: `(offset, alpha)`.
const GLOW_STOPS: [(f32, f32); 5] = [(0.0, 1.0), (0.1, 0.8), (0.4, 0.3), (0.7, 0.08), (1.0, 0.0)];

/// Stream sprite falloff: `(offset, alpha)`.
const SOFT_CIRCLE_STOPS: [(f32, f32); 4] = [(0.0, 1.0), (0.3, 0.7), (0.6, 0.3), (1.0, 0.0)];

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, thiserror::Error)]
pub enum SpriteError {
    #[error("cannot allocate {size}x{size} sprite")]
    Allocation { size: u32 },
    #[error("sprite outline is degenerate")]
    Outline,
    #[error("sprite gradient is invalid")]
    Gradient,
}

/// Silhouette used by the particle field's sprite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpriteShape {
    #[default]
    Circle,
    Triangle,
    Square,
    Pentagon,
    Star,
}

/// A rasterized sprite ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteTexture {
    pub generation: u64,
    pub size: u32,
    /// Straight RGBA8, `size × size × 4` bytes.
    pub pixels: Vec<u8>,
}

impl SpriteTexture {
    fn from_pixmap(pixmap: &Pixmap) -> Self {
        let pixels = pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        Self { generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed), size: pixmap.width(), pixels }
    }

    /// Alpha at pixel `(x, y)`, or 0 outside the texture.
    #[must_use]
    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        if x >= self.size || y >= self.size {
            return 0;
        }
        let i = ((y * self.size + x) * 4 + 3) as usize;
        self.pixels.get(i).copied().unwrap_or(0)
    }
}

// =============================================================================
// SPRITES
// =============================================================================

/// White silhouette of `shape`, softened by `blur` (0–100).
///
/// The blur radius is `blur/100 · 12` px and the silhouette shrinks by the
/// same amount so the softened edge stays inside the texture.
///
/// # Errors
///
/// Returns an error when the pixmap cannot be allocated or the outline is
/// degenerate.
pub fn shape_sprite(shape: SpriteShape, blur: f32) -> Result<SpriteTexture, SpriteError> {
    let size = SHAPE_SPRITE_SIZE;
    let mut pixmap = allocate(size)?;
    let blur_px = blur.clamp(0.0, 100.0) / 100.0 * MAX_BLUR_PX;
    let half = size as f32 / 2.0;
    let radius = (half - 2.0 - blur_px).max(MIN_SHAPE_RADIUS);

    let path = match shape {
        SpriteShape::Circle => PathBuilder::from_circle(half, half, radius),
        SpriteShape::Triangle => outline(half, &polygon_radii(3, radius)),
        SpriteShape::Square => outline(half, &polygon_radii(4, radius)),
        SpriteShape::Pentagon => outline(half, &polygon_radii(5, radius)),
        SpriteShape::Star => outline(half, &star_radii(radius)),
    }
    .ok_or(SpriteError::Outline)?;

    let mut paint = Paint::default();
    paint.set_color_rgba8(255, 255, 255, 255);
    paint.anti_alias = true;
    pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);

    if blur_px > 0.0 {
        gaussian_blur(&mut pixmap, blur_px);
    }
    log::debug!("sprite: rasterized {shape:?} at blur {blur}");
    Ok(SpriteTexture::from_pixmap(&pixmap))
}

/// Radial glow: bright core with a halo that widens with `blur` (0–100).
///
/// # Errors
///
/// Returns an error when the pixmap or its gradient cannot be built.
pub fn glow_sprite(blur: f32) -> Result<SpriteTexture, SpriteError> {
    let half = GLOW_SPRITE_SIZE as f32 / 2.0;
    let outer = half * (0.6 + blur.clamp(0.0, 100.0) / 100.0 * 0.4);
    radial_sprite(GLOW_SPRITE_SIZE, outer, &GLOW_STOPS)
}

/// Soft round dot filling the whole texture, used by the stream.
///
/// # Errors
///
/// Returns an error when the pixmap or its gradient cannot be built.
pub fn soft_circle_sprite() -> Result<SpriteTexture, SpriteError> {
    radial_sprite(SHAPE_SPRITE_SIZE, SHAPE_SPRITE_SIZE as f32 / 2.0, &SOFT_CIRCLE_STOPS)
}

// ── Rasterization helpers ───────────────────────────────────────

fn allocate(size: u32) -> Result<Pixmap, SpriteError> {
    Pixmap::new(size, size).ok_or(SpriteError::Allocation { size })
}

fn radial_sprite(size: u32, radius: f32, stops: &[(f32, f32)]) -> Result<SpriteTexture, SpriteError> {
    let mut pixmap = allocate(size)?;
    let half = size as f32 / 2.0;
    let center = Point::from_xy(half, half);
    let stops = stops
        .iter()
        .map(|&(offset, alpha)| GradientStop::new(offset, Color::from_rgba8(255, 255, 255, (alpha * 255.0).round() as u8)))
        .collect();
    let shader = RadialGradient::new(center, center, radius, stops, SpreadMode::Pad, Transform::identity())
        .ok_or(SpriteError::Gradient)?;

    let paint = Paint { shader, anti_alias: true, ..Paint::default() };
    let rect = Rect::from_xywh(0.0, 0.0, size as f32, size as f32).ok_or(SpriteError::Outline)?;
    pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    Ok(SpriteTexture::from_pixmap(&pixmap))
}

fn polygon_radii(sides: usize, radius: f32) -> Vec<(f32, f32)> {
    (0..sides).map(|i| (i as f32 / sides as f32 * TAU - FRAC_PI_2, radius)).collect()
}

fn star_radii(radius: f32) -> Vec<(f32, f32)> {
    let corners = STAR_POINTS * 2;
    (0..corners)
        .map(|i| {
            let r = if i % 2 == 0 { radius } else { radius * STAR_INNER_RATIO };
            (i as f32 / corners as f32 * TAU - FRAC_PI_2, r)
        })
        .collect()
}

/// Closed outline through `(angle, radius)` corners around `(center, center)`.
fn outline(center: f32, corners: &[(f32, f32)]) -> Option<Path> {
    let mut pb = PathBuilder::new();
    for (i, &(angle, r)) in corners.iter().enumerate() {
        let x = center + angle.cos() * r;
        let y = center + angle.sin() * r;
        if i == 0 {
            pb.move_to(x, y);
        } else {
            pb.line_to(x, y);
        }
    }
    pb.close();
    pb.finish()
}

/// Approximate a Gaussian blur of standard deviation `sigma` px with three
/// box passes in each direction. Pixels outside the texture are transparent.
fn gaussian_blur(pixmap: &mut Pixmap, sigma: f32) {
    let radius = (((4.0 * sigma * sigma + 1.0).sqrt() - 1.0) / 2.0).round() as usize;
    if radius == 0 {
        return;
    }
    let width = pixmap.width() as usize;
    let height = pixmap.height() as usize;
    let data = pixmap.data_mut();
    let mut scratch = vec![0_u8; data.len()];
    for _ in 0..3 {
        box_pass(data, &mut scratch, width, height, radius, true);
        box_pass(&scratch, data, width, height, radius, false);
    }
}

fn box_pass(src: &[u8], dst: &mut [u8], width: usize, height: usize, radius: usize, horizontal: bool) {
    let (lines, len) = if horizontal { (height, width) } else { (width, height) };
    let window = (2 * radius + 1) as u32;
    let index = |line: usize, pos: usize| if horizontal { (line * width + pos) * 4 } else { (pos * width + line) * 4 };

    for line in 0..lines {
        for channel in 0..4 {
            let mut sum: u32 = (0..=radius.min(len - 1)).map(|p| u32::from(src[index(line, p) + channel])).sum();
            for pos in 0..len {
                dst[index(line, pos) + channel] = ((sum + window / 2) / window) as u8;
                let entering = pos + radius + 1;
                if entering < len {
                    sum += u32::from(src[index(line, entering) + channel]);
                }
                if pos >= radius {
                    sum -= u32::from(src[index(line, pos - radius) + channel]);
                }
            }
        }
    }
}

//! SVG document → normalized point cloud.
//!
//! DESIGN
//! ======
//! `usvg` resolves the document (shapes become paths, `use` and nested
//! transforms are flattened) and each resulting path is converted into a
//! `kurbo::BezPath` in document space. Samples are spread across paths in
//! proportion to their arc length and walked at evenly spaced offsets.
//!
//! The sampled outline is then fitted so its longer bounding-box side spans
//! [`SVG_TARGET_SPAN`] units around the origin, thickened with a small XY
//! jitter plus a triangular depth spread, and flipped so SVG "down" becomes
//! world "down".
//!
//! Sampling never fails from the caller's point of view: a document that
//! cannot be parsed or holds no measurable geometry yields an all-zero
//! buffer of the requested size.

#[cfg(test)]
#[path = "svg_test.rs"]
mod svg_test;

use glam::{Vec2, Vec3};
use kurbo::{Affine, BezPath, ParamCurve, ParamCurveArclen, PathSeg, Point};
use rand::Rng;
use usvg::tiny_skia_path::PathSegment;

use crate::buffer::PointBuffer;
use crate::consts::{SVG_TARGET_SPAN, SVG_XY_JITTER, SVG_Z_SPREAD};
use crate::shapes::{jitter, triangular};

/// Arc-length accuracy in document units.
const ARCLEN_ACCURACY: f64 = 1e-3;

#[derive(Debug, thiserror::Error)]
pub enum SvgError {
    #[error("invalid SVG document: {0}")]
    Parse(#[from] usvg::Error),
    #[error("SVG document has no measurable geometry")]
    NoGeometry,
}

/// Sample `count` points from `svg`, degrading to zeros on bad input.
pub fn sample<R: Rng + ?Sized>(svg: &str, count: usize, rng: &mut R) -> PointBuffer {
    match try_sample(svg, count, rng) {
        Ok(buffer) => buffer,
        Err(err) => {
            log::warn!("svg: {err}; using empty target");
            PointBuffer::zeroed(count)
        }
    }
}

/// Sample `count` points from `svg`, reporting why nothing could be sampled.
///
/// # Errors
///
/// Returns [`SvgError::Parse`] for malformed documents and
/// [`SvgError::NoGeometry`] when no path yields any samples.
pub fn try_sample<R: Rng + ?Sized>(svg: &str, count: usize, rng: &mut R) -> Result<PointBuffer, SvgError> {
    let tree = usvg::Tree::from_str(svg, &usvg::Options::default())?;
    let mut outlines = Vec::new();
    collect_outlines(tree.root(), &mut outlines);
    let raw = sample_outlines(&outlines, count);
    if raw.is_empty() {
        return Err(SvgError::NoGeometry);
    }
    log::debug!("svg: sampled {} raw points from {} paths", raw.len(), outlines.len());
    Ok(normalize(&raw, count, rng))
}

/// Fit raw document-space samples into a centered cloud of `count` points.
///
/// Output point `i` reuses raw sample `i % raw.len()`. An empty `raw` yields
/// zeros.
pub fn normalize<R: Rng + ?Sized>(raw: &[Vec2], count: usize, rng: &mut R) -> PointBuffer {
    if raw.is_empty() {
        return PointBuffer::zeroed(count);
    }

    let (min, max) = raw.iter().fold((Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)), |(lo, hi), p| {
        (lo.min(*p), hi.max(*p))
    });
    let center = (min + max) / 2.0;
    let range = max - min;
    let range_x = if range.x > 0.0 { range.x } else { 1.0 };
    let range_y = if range.y > 0.0 { range.y } else { 1.0 };
    let scale = SVG_TARGET_SPAN / range_x.max(range_y);

    let points: Vec<Vec3> = (0..count)
        .map(|i| {
            let p = (raw[i % raw.len()] - center) * scale;
            let x = p.x + jitter(rng, SVG_XY_JITTER);
            let y = -p.y + jitter(rng, SVG_XY_JITTER);
            Vec3::new(x, y, triangular(rng) * SVG_Z_SPREAD)
        })
        .collect();
    PointBuffer::from_points(&points)
}

// =============================================================================
// OUTLINES
// =============================================================================

/// One drawable element flattened to segments with cumulative arc lengths.
struct Outline {
    segments: Vec<PathSeg>,
    /// `ends[k]` is the arc length at the end of `segments[k]`.
    ends: Vec<f64>,
}

impl Outline {
    fn from_path(path: &BezPath) -> Option<Self> {
        let mut segments = Vec::new();
        let mut ends = Vec::new();
        let mut total = 0.0;
        for seg in path.segments() {
            let len = seg.arclen(ARCLEN_ACCURACY);
            if len > 0.0 && len.is_finite() {
                total += len;
                segments.push(seg);
                ends.push(total);
            }
        }
        if segments.is_empty() { None } else { Some(Self { segments, ends }) }
    }

    fn length(&self) -> f64 {
        self.ends.last().copied().unwrap_or(0.0)
    }

    fn point_at_length(&self, distance: f64) -> Point {
        let k = self.ends.partition_point(|end| *end <= distance).min(self.segments.len() - 1);
        let start = if k == 0 { 0.0 } else { self.ends[k - 1] };
        let seg = self.segments[k];
        let t = seg.inv_arclen((distance - start).max(0.0), ARCLEN_ACCURACY);
        seg.eval(t)
    }
}

fn collect_outlines(group: &usvg::Group, out: &mut Vec<Outline>) {
    for node in group.children() {
        match node {
            usvg::Node::Group(child) => collect_outlines(child, out),
            usvg::Node::Path(path) => {
                let mut bez = to_bez_path(path.data());
                bez.apply_affine(to_affine(path.abs_transform()));
                if let Some(outline) = Outline::from_path(&bez) {
                    out.push(outline);
                }
            }
            _ => {}
        }
    }
}

fn to_bez_path(data: &usvg::tiny_skia_path::Path) -> BezPath {
    let pt = |p: usvg::tiny_skia_path::Point| Point::new(f64::from(p.x), f64::from(p.y));
    let mut bez = BezPath::new();
    for segment in data.segments() {
        match segment {
            PathSegment::MoveTo(p) => bez.move_to(pt(p)),
            PathSegment::LineTo(p) => bez.line_to(pt(p)),
            PathSegment::QuadTo(c, p) => bez.quad_to(pt(c), pt(p)),
            PathSegment::CubicTo(c1, c2, p) => bez.curve_to(pt(c1), pt(c2), pt(p)),
            PathSegment::Close => bez.close_path(),
        }
    }
    bez
}

fn to_affine(t: usvg::Transform) -> Affine {
    Affine::new([t.sx, t.ky, t.kx, t.sy, t.tx, t.ty].map(f64::from))
}

/// Evenly spaced samples, `max(1, round(len / total · count))` per outline.
fn sample_outlines(outlines: &[Outline], count: usize) -> Vec<Vec2> {
    let total: f64 = outlines.iter().map(Outline::length).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    let mut raw = Vec::new();
    for outline in outlines {
        let len = outline.length();
        let share = ((len / total) * count as f64).round() as usize;
        let samples = share.max(1);
        for i in 0..samples {
            let p = outline.point_at_length(i as f64 / samples as f64 * len);
            raw.push(Vec2::new(p.x as f32, p.y as f32));
        }
    }
    raw
}

//! Shared numeric constants for the particles crate.

// ── Shapes ──────────────────────────────────────────────────────

/// Inner-to-outer radius ratio for the 5-point star (targets and sprites).
pub const STAR_INNER_RATIO: f32 = 0.4;

/// Number of outer points on the star shape.
pub const STAR_POINTS: usize = 5;

/// Half-thickness of the z jitter applied to flat edge shapes.
pub const EDGE_Z_JITTER: f32 = 0.25;

// ── SVG sampling ────────────────────────────────────────────────

/// Length of the longer bounding-box side after normalization.
pub const SVG_TARGET_SPAN: f32 = 6.0;

/// Half-width of the XY jitter applied to sampled SVG points.
pub const SVG_XY_JITTER: f32 = 0.075;

/// Scale of the triangular z spread applied to sampled SVG points.
pub const SVG_Z_SPREAD: f32 = 1.2;

// ── Smoothing ───────────────────────────────────────────────────

/// Per-frame color blend toward palette colors.
pub const COLOR_LERP: f32 = 0.02;

/// Per-frame position blend toward shape targets.
pub const POSITION_LERP: f32 = 0.03;

/// Per-frame position blend for ambient stardust.
pub const AMBIENT_LERP: f32 = 0.008;

/// Per-frame blend of the wave sphere material colors.
pub const MATERIAL_LERP: f32 = 0.05;

/// Smoothing factor applied to the raw finger count.
pub const FINGER_SMOOTHING: f32 = 0.15;

// ── Particle counts ─────────────────────────────────────────────

/// Particles in the particle field.
pub const FIELD_PARTICLES: usize = 2000;

/// Particles in the hand-gesture animation.
pub const HAND_PARTICLES: usize = 3000;

/// Capacity of the SVG particle buffers.
pub const SVG_MAX_PARTICLES: usize = 5000;

/// Capacity of the stream, in logical particles.
pub const STREAM_MAX_PARTICLES: usize = 5000;

/// Rendered copies per logical stream particle.
pub const TRAIL_COPIES: usize = 40;

/// Lower bound for user-adjustable particle counts.
pub const MIN_PARTICLE_COUNT: usize = 500;

/// Percentage of SVG particles that ignore the target and drift as stardust.
pub const AMBIENT_PERCENT: usize = 15;

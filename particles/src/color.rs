//! Color parsing, HSL conversion and four-step palettes.
//!
//! Colors live in the buffers as `[0, 1]` floats per channel. Settings
//! carry colors as `#rrggbb` strings, parsed once per frame with a fallback so
//! a malformed value never stops an animation.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

use std::num::ParseIntError;

use glam::Vec3;

/// Lightness steps applied to the base color to build a palette.
pub const PALETTE_STEPS: [f32; 4] = [0.0, 0.12, 0.24, 0.36];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("color must start with '#'")]
    MissingHash,
    #[error("color contains non-ASCII characters")]
    NonAscii,
    #[error("expected 3 or 6 hex digits, got {0}")]
    Length(usize),
    #[error("invalid hex digits: {0}")]
    Digits(#[from] ParseIntError),
}

/// Parse `#RGB` or `#RRGGBB` values into RGB channels.
///
/// # Errors
///
/// Returns an error when the `#` prefix is missing, the digit count is not
/// 3 or 6, or a digit is not hexadecimal.
pub fn parse_hex_rgb(raw: &str) -> Result<(u8, u8, u8), ColorError> {
    let hex = raw.trim().strip_prefix('#').ok_or(ColorError::MissingHash)?;
    if !hex.is_ascii() {
        return Err(ColorError::NonAscii);
    }
    match hex.len() {
        3 => Ok((
            u8::from_str_radix(&hex[0..1].repeat(2), 16)?,
            u8::from_str_radix(&hex[1..2].repeat(2), 16)?,
            u8::from_str_radix(&hex[2..3].repeat(2), 16)?,
        )),
        6 => Ok((
            u8::from_str_radix(&hex[0..2], 16)?,
            u8::from_str_radix(&hex[2..4], 16)?,
            u8::from_str_radix(&hex[4..6], 16)?,
        )),
        n => Err(ColorError::Length(n)),
    }
}

/// Normalize a color to canonical lowercase `#rrggbb`.
#[must_use]
pub fn normalize_hex_color(value: &str, fallback: &str) -> String {
    let fallback_rgb = parse_hex_rgb(fallback).unwrap_or((255, 255, 255));
    let (r, g, b) = parse_hex_rgb(value).unwrap_or(fallback_rgb);
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// An RGB color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// Hue, saturation and lightness, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Rgb {
    pub const BLACK: Self = Self { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: Self = Self { r: 1.0, g: 1.0, b: 1.0 };

    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` literal.
    #[must_use]
    pub const fn from_u32(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// # Errors
    ///
    /// Returns an error when `raw` is not a `#RGB` or `#RRGGBB` color.
    pub fn from_hex(raw: &str) -> Result<Self, ColorError> {
        let (r, g, b) = parse_hex_rgb(raw)?;
        Ok(Self::new(f32::from(r) / 255.0, f32::from(g) / 255.0, f32::from(b) / 255.0))
    }

    /// Parse `raw`, falling back to `fallback` when it is not a hex color.
    #[must_use]
    pub fn from_hex_or(raw: &str, fallback: Self) -> Self {
        Self::from_hex(raw).unwrap_or(fallback)
    }

    #[must_use]
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b)
    }

    #[must_use]
    pub fn from_vec3(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }

    /// Close `factor` of the gap toward `target`.
    #[must_use]
    pub fn lerp(self, target: Self, factor: f32) -> Self {
        Self::from_vec3(self.to_vec3().lerp(target.to_vec3(), factor))
    }

    #[must_use]
    pub fn to_hsl(self) -> Hsl {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let l = (min + max) / 2.0;

        if (max - min).abs() <= f32::EPSILON {
            return Hsl { h: 0.0, s: 0.0, l };
        }

        let delta = max - min;
        let s = if l <= 0.5 { delta / (max + min) } else { delta / (2.0 - max - min) };
        let h = if max == self.r {
            (self.g - self.b) / delta + if self.g < self.b { 6.0 } else { 0.0 }
        } else if max == self.g {
            (self.b - self.r) / delta + 2.0
        } else {
            (self.r - self.g) / delta + 4.0
        };

        Hsl { h: h / 6.0, s, l }
    }

    #[must_use]
    pub fn from_hsl(hsl: Hsl) -> Self {
        let h = hsl.h.rem_euclid(1.0);
        let s = hsl.s.clamp(0.0, 1.0);
        let l = hsl.l.clamp(0.0, 1.0);

        if s == 0.0 {
            return Self::new(l, l, l);
        }

        let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        Self::new(hue_to_channel(p, q, h + 1.0 / 3.0), hue_to_channel(p, q, h), hue_to_channel(p, q, h - 1.0 / 3.0))
    }
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

/// Four colors assigned to particles round-robin by index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette(pub [Rgb; 4]);

impl Palette {
    /// Derive a palette from `base` by stepping lightness with hue and
    /// saturation held fixed.
    #[must_use]
    pub fn from_base(base: Rgb) -> Self {
        let steps = Self::lightness_steps(base);
        Self([base, Rgb::from_hsl(steps[1]), Rgb::from_hsl(steps[2]), Rgb::from_hsl(steps[3])])
    }

    /// Derive a palette from a hex string, falling back to `fallback`.
    #[must_use]
    pub fn from_hex(raw: &str, fallback: Rgb) -> Self {
        Self::from_base(Rgb::from_hex_or(raw, fallback))
    }

    /// The HSL triples behind [`Palette::from_base`], lightness clamped to 1.
    #[must_use]
    pub fn lightness_steps(base: Rgb) -> [Hsl; 4] {
        let hsl = base.to_hsl();
        PALETTE_STEPS.map(|step| Hsl { l: (hsl.l + step).min(1.0), ..hsl })
    }

    /// Color for particle `index`.
    #[must_use]
    pub fn color_for(&self, index: usize) -> Rgb {
        self.0[index % self.0.len()]
    }
}

/// Cool violet palette (fist and untracked).
pub const COOL_PALETTE: Palette = Palette([
    Rgb::from_u32(0x63_66_f1),
    Rgb::from_u32(0x8b_5c_f6),
    Rgb::from_u32(0x7c_3a_ed),
    Rgb::from_u32(0xa7_8b_fa),
]);

/// Warm orange palette (open hand).
pub const WARM_PALETTE: Palette = Palette([
    Rgb::from_u32(0xf9_73_16),
    Rgb::from_u32(0xfb_92_3c),
    Rgb::from_u32(0xfb_bf_24),
    Rgb::from_u32(0xf5_9e_0b),
]);

/// Teal/blue palette (counted-finger shapes).
pub const SHAPE_PALETTE: Palette = Palette([
    Rgb::from_u32(0x06_b6_d4),
    Rgb::from_u32(0x22_d3_ee),
    Rgb::from_u32(0x3b_82_f6),
    Rgb::from_u32(0x0e_a5_e9),
]);

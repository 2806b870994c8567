//! Per-animation settings and the settings store.
//!
//! Settings are plain serde structs so the browser can patch them with JSON
//! using the same camelCase keys the controls use. The [`SettingsStore`]
//! keeps a live copy (what the animations read each frame) and a saved copy
//! (what "reset unsaved changes" compares against), and clamps every write
//! into the documented ranges so animations never see out-of-range values.

#[cfg(test)]
#[path = "settings_test.rs"]
mod settings_test;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::anim::AnimationId;
use crate::color::normalize_hex_color;
use crate::consts::{MIN_PARTICLE_COUNT, STREAM_MAX_PARTICLES, SVG_MAX_PARTICLES};
use crate::mesh::MeshShape;
use crate::sprite::SpriteShape;
use crate::store::{Store, SubscriptionId};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("unknown animation id: {0}")]
    UnknownAnimation(String),
    #[error("settings patch must be a JSON object")]
    NotAnObject,
    #[error("invalid settings patch: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// SETTINGS TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParticleFieldSettings {
    pub shape: SpriteShape,
    /// 0–100.
    pub blur: f32,
    pub color: String,
    pub glow: bool,
    /// Twinkle strength 0–100, only used with glow.
    pub intensity: f32,
}

impl Default for ParticleFieldSettings {
    fn default() -> Self {
        Self { shape: SpriteShape::Circle, blur: 30.0, color: "#6366f1".into(), glow: false, intensity: 50.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WaveSphereSettings {
    pub color: String,
    pub shape: MeshShape,
}

impl Default for WaveSphereSettings {
    fn default() -> Self {
        Self { color: "#8b5cf6".into(), shape: MeshShape::Icosahedron }
    }
}

/// A user-loaded SVG document.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgSource {
    pub name: String,
    pub raw: Arc<str>,
    /// Bumped on every load so consumers can tell documents apart cheaply.
    pub revision: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SvgParticlesSettings {
    pub blur: f32,
    pub color: String,
    pub intensity: f32,
    /// Degrees, −180–180.
    pub angle_x: f32,
    pub angle_y: f32,
    pub angle_z: f32,
    pub particle_count: usize,
    /// Loaded document; `None` shows the default ring.
    #[serde(skip)]
    pub svg: Option<SvgSource>,
}

impl Default for SvgParticlesSettings {
    fn default() -> Self {
        Self {
            blur: 30.0,
            color: "#facc15".into(),
            intensity: 50.0,
            angle_x: 0.0,
            angle_y: 20.0,
            angle_z: 0.0,
            particle_count: 5000,
            svg: None,
        }
    }
}

impl SvgParticlesSettings {
    /// Display name of the current target.
    #[must_use]
    pub fn target_name(&self) -> &str {
        self.svg.as_ref().map_or("Circle (default)", |svg| svg.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParticleStreamSettings {
    pub color_top: String,
    pub color_bottom: String,
    /// Fall speed 0.1–2.0.
    pub speed: f32,
    pub particle_count: usize,
    /// Trail length 0–100.
    pub motion_blur: f32,
}

impl Default for ParticleStreamSettings {
    fn default() -> Self {
        Self {
            color_top: "#c4b5fd".into(),
            color_bottom: "#7c3aed".into(),
            speed: 0.4,
            particle_count: 1400,
            motion_blur: 100.0,
        }
    }
}

/// Settings for every animation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub particle_field: ParticleFieldSettings,
    pub wave_sphere: WaveSphereSettings,
    pub svg_particles: SvgParticlesSettings,
    pub particle_stream: ParticleStreamSettings,
}

// ── Clamping ────────────────────────────────────────────────────

fn clamp_or(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_nan() { fallback } else { value.clamp(min, max) }
}

impl Settings {
    /// Force every field into its documented range.
    pub fn clamp(&mut self) {
        let field_defaults = ParticleFieldSettings::default();
        let field = &mut self.particle_field;
        field.blur = clamp_or(field.blur, 0.0, 100.0, field_defaults.blur);
        field.intensity = clamp_or(field.intensity, 0.0, 100.0, field_defaults.intensity);
        field.color = normalize_hex_color(&field.color, &field_defaults.color);

        let sphere = &mut self.wave_sphere;
        sphere.color = normalize_hex_color(&sphere.color, &WaveSphereSettings::default().color);

        let svg_defaults = SvgParticlesSettings::default();
        let svg = &mut self.svg_particles;
        svg.blur = clamp_or(svg.blur, 0.0, 100.0, svg_defaults.blur);
        svg.intensity = clamp_or(svg.intensity, 0.0, 100.0, svg_defaults.intensity);
        svg.angle_x = clamp_or(svg.angle_x, -180.0, 180.0, 0.0);
        svg.angle_y = clamp_or(svg.angle_y, -180.0, 180.0, 0.0);
        svg.angle_z = clamp_or(svg.angle_z, -180.0, 180.0, 0.0);
        svg.particle_count = svg.particle_count.clamp(MIN_PARTICLE_COUNT, SVG_MAX_PARTICLES);
        svg.color = normalize_hex_color(&svg.color, &svg_defaults.color);

        let stream_defaults = ParticleStreamSettings::default();
        let stream = &mut self.particle_stream;
        stream.speed = clamp_or(stream.speed, 0.1, 2.0, stream_defaults.speed);
        stream.motion_blur = clamp_or(stream.motion_blur, 0.0, 100.0, stream_defaults.motion_blur);
        stream.particle_count = stream.particle_count.clamp(MIN_PARTICLE_COUNT, STREAM_MAX_PARTICLES);
        stream.color_top = normalize_hex_color(&stream.color_top, &stream_defaults.color_top);
        stream.color_bottom = normalize_hex_color(&stream.color_bottom, &stream_defaults.color_bottom);
    }

    /// Whether the settings of `id` differ between `self` and `other`.
    #[must_use]
    pub fn differs_for(&self, other: &Self, id: AnimationId) -> bool {
        match id {
            AnimationId::ParticleField => self.particle_field != other.particle_field,
            AnimationId::WaveSphere => self.wave_sphere != other.wave_sphere,
            AnimationId::SvgParticles => self.svg_particles != other.svg_particles,
            AnimationId::ParticleStream => self.particle_stream != other.particle_stream,
            AnimationId::HandParticles => false,
        }
    }

    /// Copy the settings of `id` from `source`.
    pub fn copy_from(&mut self, source: &Self, id: AnimationId) {
        match id {
            AnimationId::ParticleField => self.particle_field = source.particle_field.clone(),
            AnimationId::WaveSphere => self.wave_sphere = source.wave_sphere.clone(),
            AnimationId::SvgParticles => self.svg_particles = source.svg_particles.clone(),
            AnimationId::ParticleStream => self.particle_stream = source.particle_stream.clone(),
            AnimationId::HandParticles => {}
        }
    }

    /// The settings of `id` as JSON, or `None` for animations without settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings fail to serialize.
    pub fn to_json(&self, id: AnimationId) -> Result<Option<serde_json::Value>, SettingsError> {
        let value = match id {
            AnimationId::ParticleField => serde_json::to_value(&self.particle_field)?,
            AnimationId::WaveSphere => serde_json::to_value(&self.wave_sphere)?,
            AnimationId::SvgParticles => serde_json::to_value(&self.svg_particles)?,
            AnimationId::ParticleStream => serde_json::to_value(&self.particle_stream)?,
            AnimationId::HandParticles => return Ok(None),
        };
        Ok(Some(value))
    }
}

/// Merge the keys of `patch` into the serialized form of `current`.
/// `null` values restore the field's default.
fn merge_patch<T>(current: &T, patch: &serde_json::Map<String, serde_json::Value>) -> Result<T, SettingsError>
where
    T: Serialize + serde::de::DeserializeOwned,
{
    let mut value = serde_json::to_value(current)?;
    let Some(fields) = value.as_object_mut() else {
        return Err(SettingsError::NotAnObject);
    };
    for (key, incoming) in patch {
        if incoming.is_null() {
            fields.remove(key);
        } else {
            fields.insert(key.clone(), incoming.clone());
        }
    }
    Ok(serde_json::from_value(value)?)
}

// =============================================================================
// STORE
// =============================================================================

/// Live and saved settings with publish/subscribe on the live copy.
pub struct SettingsStore {
    live: Store<Settings>,
    saved: Settings,
    next_svg_revision: u64,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl SettingsStore {
    #[must_use]
    pub fn new(mut initial: Settings) -> Self {
        initial.clamp();
        Self { saved: initial.clone(), live: Store::new(initial), next_svg_revision: 1 }
    }

    /// Live settings.
    #[must_use]
    pub fn get(&self) -> &Settings {
        self.live.get()
    }

    /// Saved settings.
    #[must_use]
    pub fn saved(&self) -> &Settings {
        &self.saved
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.live.version()
    }

    /// One owned copy for a frame.
    #[must_use]
    pub fn snapshot(&self) -> Settings {
        self.live.snapshot()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Settings) + 'static,
    {
        self.live.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.live.unsubscribe(id)
    }

    /// Mutate the live settings; the result is clamped before subscribers run.
    pub fn update<F>(&mut self, mutate: F)
    where
        F: FnOnce(&mut Settings),
    {
        self.live.update(|settings| {
            mutate(settings);
            settings.clamp();
        });
    }

    pub fn update_particle_field<F: FnOnce(&mut ParticleFieldSettings)>(&mut self, mutate: F) {
        self.update(|s| mutate(&mut s.particle_field));
    }

    pub fn update_wave_sphere<F: FnOnce(&mut WaveSphereSettings)>(&mut self, mutate: F) {
        self.update(|s| mutate(&mut s.wave_sphere));
    }

    pub fn update_svg_particles<F: FnOnce(&mut SvgParticlesSettings)>(&mut self, mutate: F) {
        self.update(|s| mutate(&mut s.svg_particles));
    }

    pub fn update_particle_stream<F: FnOnce(&mut ParticleStreamSettings)>(&mut self, mutate: F) {
        self.update(|s| mutate(&mut s.particle_stream));
    }

    /// Apply a JSON object patch to the settings of `id`.
    ///
    /// # Errors
    ///
    /// Returns an error when `patch` is not a JSON object or a field does not
    /// fit the settings of `id`. The live settings are unchanged on error.
    pub fn apply_patch(&mut self, id: AnimationId, patch: &str) -> Result<(), SettingsError> {
        let parsed: serde_json::Value = serde_json::from_str(patch)?;
        let Some(fields) = parsed.as_object() else {
            return Err(SettingsError::NotAnObject);
        };

        let mut next = self.get().clone();
        match id {
            AnimationId::ParticleField => next.particle_field = merge_patch(&next.particle_field, fields)?,
            AnimationId::WaveSphere => next.wave_sphere = merge_patch(&next.wave_sphere, fields)?,
            AnimationId::SvgParticles => {
                let svg = next.svg_particles.svg.take();
                next.svg_particles = merge_patch(&next.svg_particles, fields)?;
                next.svg_particles.svg = svg;
            }
            AnimationId::ParticleStream => next.particle_stream = merge_patch(&next.particle_stream, fields)?,
            AnimationId::HandParticles => return Ok(()),
        }
        self.update(|settings| *settings = next);
        Ok(())
    }

    /// Store an uploaded SVG document as the SVG particles target.
    pub fn load_svg(&mut self, name: &str, raw: &str) -> u64 {
        let revision = self.next_svg_revision;
        self.next_svg_revision += 1;
        let source = SvgSource { name: name.to_string(), raw: Arc::from(raw), revision };
        self.update_svg_particles(|s| s.svg = Some(source));
        log::debug!("settings: loaded svg {name:?} as revision {revision}");
        revision
    }

    /// Return the SVG particles target to the default ring.
    pub fn clear_svg(&mut self) {
        self.update_svg_particles(|s| s.svg = None);
    }

    /// Make the live settings of `id` the saved ones.
    pub fn save(&mut self, id: AnimationId) {
        self.saved.copy_from(self.live.get(), id);
        self.live.update(|_| {});
    }

    /// Restore defaults for `id` in both the live and saved copies.
    pub fn reset_to_defaults(&mut self, id: AnimationId) {
        let defaults = Settings::default();
        self.saved.copy_from(&defaults, id);
        self.update(|settings| settings.copy_from(&defaults, id));
    }

    #[must_use]
    pub fn has_unsaved_changes(&self, id: AnimationId) -> bool {
        self.live.get().differs_for(&self.saved, id)
    }
}

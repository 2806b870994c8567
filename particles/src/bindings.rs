//! `wasm-bindgen` surface for the browser preview.
//!
//! The page owns the render loop, the webcam detector and the WebGL scene;
//! it calls [`Gallery::tick`] once per animation frame and copies the
//! returned buffers into its geometry. Everything crossing the boundary is a
//! typed array or a JSON string.

use js_sys::{Float32Array, Uint8Array, Uint32Array};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::anim::AnimationId;
use crate::engine::EngineCore;
use crate::render::{BlendMode, FrameView};
use crate::tracking::DetectorEvent;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        log::debug!("logger already installed: {err}");
    }
}

/// Per-frame draw parameters that are not buffers.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FrameInfo {
    kind: &'static str,
    drawn: usize,
    rotation: [f32; 3],
    scale: f32,
    size: Option<f32>,
    opacity: Option<f32>,
    additive: bool,
    sprite_generation: Option<u64>,
    color: Option<[f32; 3]>,
    emissive: Option<[f32; 3]>,
    emissive_intensity: Option<f32>,
    wireframe: bool,
}

#[derive(Serialize)]
struct RegistryEntry {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    tags: &'static [&'static str],
}

fn parse_id(id: &str) -> Result<AnimationId, JsError> {
    Ok(id.parse::<AnimationId>()?)
}

#[wasm_bindgen]
pub struct Gallery {
    core: EngineCore,
}

#[wasm_bindgen]
impl Gallery {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(seed: u32) -> Self {
        Self { core: EngineCore::new(u64::from(seed)) }
    }

    /// JSON list of every animation in gallery order.
    ///
    /// # Errors
    ///
    /// Fails only if serialization fails.
    pub fn animations() -> Result<String, JsError> {
        let entries: Vec<RegistryEntry> = AnimationId::ALL
            .into_iter()
            .map(|id| RegistryEntry { id: id.as_str(), name: id.name(), description: id.description(), tags: id.tags() })
            .collect();
        Ok(serde_json::to_string(&entries)?)
    }

    /// # Errors
    ///
    /// Fails on an unknown id or when the animation cannot be set up.
    pub fn select(&mut self, id: &str) -> Result<(), JsError> {
        self.core.select(parse_id(id)?)?;
        Ok(())
    }

    pub fn teardown(&mut self) {
        self.core.teardown();
    }

    /// Advance to page clock `now` in seconds.
    ///
    /// # Errors
    ///
    /// Fails when the animation update fails; the animation is torn down.
    pub fn tick(&mut self, now: f64) -> Result<bool, JsError> {
        Ok(self.core.tick(now)?)
    }

    // --- Buffers ---

    /// Active positions of the last frame, or mesh vertex positions.
    #[must_use]
    pub fn positions(&self) -> Float32Array {
        match self.core.view() {
            Some(FrameView::Points(points)) => Float32Array::from(points.positions.active_slice()),
            Some(FrameView::Mesh(mesh)) => Float32Array::from(mesh.mesh.positions.as_slice()),
            None => Float32Array::new_with_length(0),
        }
    }

    /// Active colors, or mesh vertex normals.
    #[must_use]
    pub fn colors(&self) -> Float32Array {
        match self.core.view() {
            Some(FrameView::Points(points)) => Float32Array::from(points.colors.active_slice()),
            Some(FrameView::Mesh(mesh)) => Float32Array::from(mesh.mesh.normals.as_slice()),
            None => Float32Array::new_with_length(0),
        }
    }

    #[must_use]
    pub fn indices(&self) -> Option<Uint32Array> {
        match self.core.view() {
            Some(FrameView::Mesh(mesh)) => mesh.mesh.indices.as_deref().map(Uint32Array::from),
            _ => None,
        }
    }

    /// Straight-alpha RGBA pixels of the current sprite.
    #[must_use]
    pub fn sprite(&self) -> Option<Uint8Array> {
        match self.core.view() {
            Some(FrameView::Points(points)) => points.material.sprite().map(|s| Uint8Array::from(s.pixels.as_slice())),
            _ => None,
        }
    }

    #[wasm_bindgen(js_name = spriteSize)]
    #[must_use]
    pub fn sprite_size(&self) -> u32 {
        match self.core.view() {
            Some(FrameView::Points(points)) => points.material.sprite().map_or(0, |s| s.size),
            _ => 0,
        }
    }

    /// JSON [`FrameInfo`] for the last frame.
    ///
    /// # Errors
    ///
    /// Fails only if serialization fails.
    #[wasm_bindgen(js_name = frameInfo)]
    pub fn frame_info(&self) -> Result<Option<String>, JsError> {
        let Some(view) = self.core.view() else {
            return Ok(None);
        };
        let transform = view.transform();
        let base = FrameInfo {
            kind: "points",
            drawn: view.drawn_count(),
            rotation: transform.rotation.to_array(),
            scale: transform.scale,
            size: None,
            opacity: None,
            additive: false,
            sprite_generation: view.sprite_generation(),
            color: None,
            emissive: None,
            emissive_intensity: None,
            wireframe: false,
        };
        let info = match view {
            FrameView::Points(points) => FrameInfo {
                size: Some(points.material.size),
                opacity: Some(points.material.opacity),
                additive: points.material.blend() == BlendMode::Additive,
                ..base
            },
            FrameView::Mesh(mesh) => FrameInfo {
                kind: "mesh",
                color: Some(mesh.material.color.to_vec3().to_array()),
                emissive: Some(mesh.material.emissive.to_vec3().to_array()),
                emissive_intensity: Some(mesh.material.emissive_intensity),
                wireframe: mesh.material.wireframe,
                ..base
            },
        };
        Ok(Some(serde_json::to_string(&info)?))
    }

    // --- Hand tracking ---

    /// Apply one detector event given as JSON, e.g.
    /// `{"type":"hand","finger_count":3,"x":0.1,"y":-0.2}`.
    ///
    /// # Errors
    ///
    /// Fails when the JSON is not a detector event.
    #[wasm_bindgen(js_name = detectorEvent)]
    pub fn detector_event(&mut self, json: &str) -> Result<(), JsError> {
        let event: DetectorEvent = serde_json::from_str(json)?;
        self.core.apply_detector_event(event);
        Ok(())
    }

    /// Current gesture, `"none"` when no hand is tracked.
    #[must_use]
    pub fn gesture(&self) -> String {
        self.core.hand_signal().gesture.as_str().to_string()
    }

    // --- Settings ---

    /// Merge a JSON patch into the settings of animation `id`.
    ///
    /// # Errors
    ///
    /// Fails on an unknown id or a patch that does not fit.
    #[wasm_bindgen(js_name = applySettings)]
    pub fn apply_settings(&mut self, id: &str, patch: &str) -> Result<(), JsError> {
        self.core.apply_settings_patch(parse_id(id)?, patch)?;
        Ok(())
    }

    /// Live settings of animation `id` as JSON, `None` if it has none.
    ///
    /// # Errors
    ///
    /// Fails on an unknown id.
    pub fn settings(&self, id: &str) -> Result<Option<String>, JsError> {
        let value = self.core.settings.get().to_json(parse_id(id)?)?;
        Ok(value.map(|v| v.to_string()))
    }

    /// # Errors
    ///
    /// Fails on an unknown id.
    pub fn save(&mut self, id: &str) -> Result<(), JsError> {
        self.core.settings.save(parse_id(id)?);
        Ok(())
    }

    /// # Errors
    ///
    /// Fails on an unknown id.
    pub fn reset(&mut self, id: &str) -> Result<(), JsError> {
        self.core.settings.reset_to_defaults(parse_id(id)?);
        Ok(())
    }

    /// # Errors
    ///
    /// Fails on an unknown id.
    #[wasm_bindgen(js_name = hasUnsavedChanges)]
    pub fn has_unsaved_changes(&self, id: &str) -> Result<bool, JsError> {
        Ok(self.core.settings.has_unsaved_changes(parse_id(id)?))
    }

    /// Load an SVG document as the SVG Particles target. Returns its revision.
    #[wasm_bindgen(js_name = loadSvg)]
    pub fn load_svg(&mut self, name: &str, raw: &str) -> f64 {
        self.core.load_svg(name, raw) as f64
    }

    #[wasm_bindgen(js_name = clearSvg)]
    pub fn clear_svg(&mut self) {
        self.core.clear_svg();
    }
}

//! Engine facade: stores, the active animation and the frame tick.
//!
//! [`EngineCore`] holds everything that does not depend on a browser, so the
//! headless host and the tests drive the exact same code the wasm binding
//! wraps. It owns the settings store and the hand store, selects at most one
//! live animation at a time and ticks it once per frame.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::anim::{self, Animation, AnimationError, AnimationId, FrameContext};
use crate::gesture::{HandSignal, HandState};
use crate::render::FrameView;
use crate::settings::{Settings, SettingsError, SettingsStore};
use crate::store::Store;
use crate::tracking::{DetectorEvent, DetectorStatus, TrackingSession};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("animation: {0}")]
    Animation(#[from] AnimationError),
    #[error("settings: {0}")]
    Settings(#[from] SettingsError),
}

/// Core engine state, independent of any rendering surface.
pub struct EngineCore {
    pub settings: SettingsStore,
    pub hand: Store<HandState>,
    tracking: TrackingSession,
    active: Option<Box<dyn Animation>>,
    rng: StdRng,
    /// Clock reading of the first tick after selection.
    origin: Option<f64>,
    frames: u64,
}

impl EngineCore {
    /// Engine with default settings and no animation selected.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_settings(seed, Settings::default())
    }

    #[must_use]
    pub fn with_settings(seed: u64, settings: Settings) -> Self {
        Self {
            settings: SettingsStore::new(settings),
            hand: Store::default(),
            tracking: TrackingSession::new(),
            active: None,
            rng: StdRng::seed_from_u64(seed),
            origin: None,
            frames: 0,
        }
    }

    // --- Selection ---

    /// Make `id` the live animation, tearing down the previous one first.
    ///
    /// Entering the hand animation starts a tracking session; leaving it
    /// stops the session and clears the hand.
    ///
    /// # Errors
    ///
    /// Returns an error when the new animation cannot be set up. No animation
    /// is active afterwards.
    pub fn select(&mut self, id: AnimationId) -> Result<(), EngineError> {
        self.teardown();
        let created = anim::create(id, self.settings.get(), &mut self.rng);
        self.install(id, created)
    }

    /// Make a freshly created animation live. Tracking starts only once the
    /// animation exists.
    fn install(
        &mut self,
        id: AnimationId,
        created: Result<Box<dyn Animation>, AnimationError>,
    ) -> Result<(), EngineError> {
        let animation = match created {
            Ok(animation) => animation,
            Err(err) => {
                log::warn!("engine: cannot start {id}: {err}");
                return Err(err.into());
            }
        };
        if id.uses_hand_tracking() {
            self.tracking.start(&mut self.hand);
        }
        self.active = Some(animation);
        log::info!("engine: selected {id}");
        Ok(())
    }

    /// Drop the live animation, if any, and stop hand tracking.
    pub fn teardown(&mut self) {
        if let Some(previous) = self.active.take() {
            log::debug!("engine: tearing down {} after {} frames", previous.id(), self.frames);
        }
        if self.tracking.is_active() {
            self.tracking.stop(&mut self.hand);
        }
        self.origin = None;
        self.frames = 0;
    }

    #[must_use]
    pub fn active_id(&self) -> Option<AnimationId> {
        self.active.as_ref().map(|animation| animation.id())
    }

    // --- Frame ---

    /// Advance the live animation to clock reading `now` (seconds).
    ///
    /// Settings and hand state are read once, before the update runs.
    /// Returns `false` when no animation is selected.
    ///
    /// # Errors
    ///
    /// Returns an error when the update fails; the animation is torn down.
    pub fn tick(&mut self, now: f64) -> Result<bool, EngineError> {
        let Some(animation) = self.active.as_mut() else {
            return Ok(false);
        };
        let origin = *self.origin.get_or_insert(now);
        let frame = FrameContext {
            time: (now - origin) as f32,
            settings: self.settings.get(),
            hand: self.hand.get().signal(),
        };
        if let Err(err) = animation.update(&frame) {
            log::warn!("engine: {} failed: {err}", animation.id());
            self.teardown();
            return Err(err.into());
        }
        self.frames += 1;
        Ok(true)
    }

    /// What to draw for the last tick.
    #[must_use]
    pub fn view(&self) -> Option<FrameView<'_>> {
        self.active.as_ref().map(|animation| animation.view())
    }

    /// Frames ticked since the current animation was selected.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    // --- Hand tracking ---

    /// Fold one detector event into the hand store. Dropped unless the hand
    /// animation is live.
    pub fn apply_detector_event(&mut self, event: DetectorEvent) {
        self.tracking.apply(event, &mut self.hand);
    }

    #[must_use]
    pub fn detector_status(&self) -> Option<DetectorStatus> {
        self.tracking.is_active().then(|| self.tracking.status())
    }

    #[must_use]
    pub fn hand_signal(&self) -> HandSignal {
        self.hand.get().signal()
    }

    // --- Settings ---

    /// Merge a JSON patch into the settings of `id`.
    ///
    /// # Errors
    ///
    /// Returns an error when the patch is not a JSON object or does not fit
    /// the settings of `id`.
    pub fn apply_settings_patch(&mut self, id: AnimationId, patch: &str) -> Result<(), EngineError> {
        self.settings.apply_patch(id, patch)?;
        Ok(())
    }

    /// Load an SVG document as the SVG Particles target. Returns its revision.
    pub fn load_svg(&mut self, name: &str, raw: &str) -> u64 {
        self.settings.load_svg(name, raw)
    }

    pub fn clear_svg(&mut self) {
        self.settings.clear_svg();
    }
}

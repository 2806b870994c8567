//! Hand detector capability states and event application.
//!
//! The detector itself (webcam + landmark model in the browser, a replay
//! file in the headless host) lives outside this crate. It talks to the
//! engine through one outbound stream of [`DetectorEvent`]s; a
//! [`TrackingSession`] folds those events into the shared [`HandState`]
//! store and tracks the detector's capability status.

#[cfg(test)]
#[path = "tracking_test.rs"]
mod tracking_test;

use serde::{Deserialize, Serialize};

use crate::gesture::{HandLandmark, HandObservation, HandState};
use crate::store::Store;

/// Capability of the hand detector as the UI would report it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectorStatus {
    #[default]
    Loading,
    Ready,
    Denied,
    Error,
}

/// One message from the detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DetectorEvent {
    /// Detector changed capability state.
    Status { status: DetectorStatus },
    /// A hand was found; landmarks are raw detector output.
    Landmarks { landmarks: Vec<HandLandmark> },
    /// A hand was found and already reduced.
    Hand { finger_count: u8, x: f32, y: f32 },
    /// A frame was processed and no hand was visible.
    NoHand,
}

/// Applies detector events to the hand state store.
#[derive(Debug, Default)]
pub struct TrackingSession {
    status: DetectorStatus,
    active: bool,
    frames: u64,
}

impl TrackingSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn status(&self) -> DetectorStatus {
        self.status
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Detection frames applied since the session started.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Begin a session: status goes back to loading and the hand is cleared.
    pub fn start(&mut self, hand: &mut Store<HandState>) {
        self.status = DetectorStatus::Loading;
        self.active = true;
        self.frames = 0;
        hand.update(HandState::reset);
        log::debug!("tracking: session started");
    }

    /// End the session and clear the hand.
    pub fn stop(&mut self, hand: &mut Store<HandState>) {
        if self.active {
            log::debug!("tracking: session stopped after {} frames", self.frames);
        }
        self.active = false;
        hand.update(HandState::reset);
    }

    /// Fold one event into `hand`. Events arriving while inactive are dropped.
    pub fn apply(&mut self, event: DetectorEvent, hand: &mut Store<HandState>) {
        if !self.active {
            return;
        }
        match event {
            DetectorEvent::Status { status } => {
                if status != self.status {
                    log::info!("tracking: detector {:?} -> {status:?}", self.status);
                }
                self.status = status;
                if matches!(status, DetectorStatus::Denied | DetectorStatus::Error) {
                    hand.update(HandState::reset);
                }
            }
            DetectorEvent::Landmarks { landmarks } => {
                self.frames += 1;
                match HandObservation::from_landmarks(&landmarks) {
                    Some(observation) => hand.update(|state| state.observe(observation)),
                    None => hand.update(HandState::reset),
                }
            }
            DetectorEvent::Hand { finger_count, x, y } => {
                self.frames += 1;
                hand.update(|state| state.observe(HandObservation { finger_count, x, y }));
            }
            DetectorEvent::NoHand => {
                self.frames += 1;
                hand.update(HandState::reset);
            }
        }
    }
}

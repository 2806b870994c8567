//! Finger counting, gesture classification and the shared hand state.
//!
//! A hand detector reports 21 landmarks per frame in normalized image
//! coordinates (`x`, `y` in `[0, 1]`, `y` growing downward). The detector
//! side reduces them to a finger count plus the wrist position and feeds
//! [`HandState::observe`]; animations only ever see the derived
//! [`HandSignal`].

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::FINGER_SMOOTHING;

// =============================================================================
// LANDMARKS
// =============================================================================

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_PIP: usize = 6;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_TIP: usize = 12;
pub const RING_PIP: usize = 14;
pub const RING_TIP: usize = 16;
pub const PINKY_PIP: usize = 18;
pub const PINKY_TIP: usize = 20;

/// `(tip, pip)` pairs for the four non-thumb fingers.
const FINGER_JOINTS: [(usize, usize); 4] =
    [(INDEX_TIP, INDEX_PIP), (MIDDLE_TIP, MIDDLE_PIP), (RING_TIP, RING_PIP), (PINKY_TIP, PINKY_PIP)];

/// Thumb counts as extended when its tip is this much farther from the wrist
/// than its IP joint.
const THUMB_EXTENSION_RATIO: f32 = 1.1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HandLandmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl HandLandmark {
    fn planar_distance(self, other: Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Count extended fingers. Returns `None` when fewer than 21 landmarks are given.
#[must_use]
pub fn count_fingers(landmarks: &[HandLandmark]) -> Option<u8> {
    if landmarks.len() < LANDMARK_COUNT {
        return None;
    }
    let wrist = landmarks[WRIST];
    let thumb_tip = landmarks[THUMB_TIP].planar_distance(wrist);
    let thumb_ip = landmarks[THUMB_IP].planar_distance(wrist);

    let mut count = u8::from(thumb_tip > thumb_ip * THUMB_EXTENSION_RATIO);
    for (tip, pip) in FINGER_JOINTS {
        if landmarks[tip].y < landmarks[pip].y {
            count += 1;
        }
    }
    Some(count)
}

/// One frame's reduction of a detected hand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandObservation {
    pub finger_count: u8,
    /// Wrist position mapped to `[-1, 1]`.
    pub x: f32,
    pub y: f32,
}

impl HandObservation {
    #[must_use]
    pub fn from_landmarks(landmarks: &[HandLandmark]) -> Option<Self> {
        let finger_count = count_fingers(landmarks)?;
        let wrist = landmarks[WRIST];
        Some(Self { finger_count, x: (wrist.x - 0.5) * 2.0, y: (wrist.y - 0.5) * 2.0 })
    }
}

// =============================================================================
// GESTURES
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gesture {
    Open,
    Fist,
    Two,
    Three,
    Four,
    #[default]
    None,
}

impl Gesture {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Fist => "fist",
            Self::Two => "two",
            Self::Three => "three",
            Self::Four => "four",
            Self::None => "none",
        }
    }
}

/// Map a finger count to a gesture. Total: counts with no gesture map to `None`.
#[must_use]
pub fn classify(finger_count: u8) -> Gesture {
    match finger_count {
        0 => Gesture::Fist,
        2 => Gesture::Two,
        3 => Gesture::Three,
        4 => Gesture::Four,
        5.. => Gesture::Open,
        _ => Gesture::None,
    }
}

// =============================================================================
// HAND STATE
// =============================================================================

/// What animations consume from hand tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HandSignal {
    pub is_tracking: bool,
    pub gesture: Gesture,
    pub target: Vec3,
}

/// The single shared record of the tracked hand.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HandState {
    pub is_tracking: bool,
    pub finger_count: u8,
    pub smooth_finger_count: f32,
    pub hand_x: f32,
    pub hand_y: f32,
    pub target: Vec3,
    pub gesture: Gesture,
}

impl HandState {
    /// Apply one detection. Classification uses the raw count; the smoothed
    /// count trails it by [`FINGER_SMOOTHING`] per call.
    pub fn observe(&mut self, observation: HandObservation) {
        let fingers = observation.finger_count;
        self.is_tracking = true;
        self.finger_count = fingers;
        self.smooth_finger_count += (f32::from(fingers) - self.smooth_finger_count) * FINGER_SMOOTHING;
        self.hand_x = observation.x;
        self.hand_y = observation.y;
        self.target = Vec3::new(observation.x * 5.0, -observation.y * 4.0, 0.0);
        self.gesture = classify(fingers);
    }

    /// Back to untracked with every field zeroed.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn signal(&self) -> HandSignal {
        HandSignal { is_tracking: self.is_tracking, gesture: self.gesture, target: self.target }
    }
}

use super::*;

/// A hand with every joint stacked at the wrist, then fingers raised as asked.
fn hand(thumb_out: bool, raised: [bool; 4]) -> Vec<HandLandmark> {
    let wrist = HandLandmark { x: 0.5, y: 0.8, z: 0.0 };
    let mut lm = vec![wrist; LANDMARK_COUNT];
    lm[THUMB_IP] = HandLandmark { x: 0.4, y: 0.7, z: 0.0 };
    lm[THUMB_TIP] = if thumb_out { HandLandmark { x: 0.3, y: 0.6, z: 0.0 } } else { lm[THUMB_IP] };
    for (finger, (tip, pip)) in FINGER_JOINTS.into_iter().enumerate() {
        lm[pip] = HandLandmark { x: 0.5, y: 0.5, z: 0.0 };
        lm[tip] = HandLandmark { x: 0.5, y: if raised[finger] { 0.3 } else { 0.6 }, z: 0.0 };
    }
    lm
}

#[test]
fn classify_covers_every_count() {
    let table = [
        (0, Gesture::Fist),
        (1, Gesture::None),
        (2, Gesture::Two),
        (3, Gesture::Three),
        (4, Gesture::Four),
        (5, Gesture::Open),
        (6, Gesture::Open),
        (255, Gesture::Open),
    ];
    for (count, expected) in table {
        assert_eq!(classify(count), expected, "count {count}");
    }
}

#[test]
fn gesture_serializes_lowercase() {
    let json = serde_json::to_string(&Gesture::Three).unwrap_or_default();
    assert_eq!(json, "\"three\"");
    assert_eq!(Gesture::None.as_str(), "none");
}

#[test]
fn count_fingers_reads_thumb_by_distance_and_fingers_by_height() {
    assert_eq!(count_fingers(&hand(false, [false; 4])), Some(0));
    assert_eq!(count_fingers(&hand(true, [false; 4])), Some(1));
    assert_eq!(count_fingers(&hand(false, [true, true, false, false])), Some(2));
    assert_eq!(count_fingers(&hand(true, [true, true, true, true])), Some(5));
}

#[test]
fn thumb_needs_ten_percent_margin() {
    let mut lm = hand(false, [false; 4]);
    let wrist = lm[WRIST];
    lm[THUMB_IP] = HandLandmark { x: wrist.x, y: wrist.y - 0.1, z: 0.0 };
    lm[THUMB_TIP] = HandLandmark { x: wrist.x, y: wrist.y - 0.105, z: 0.0 };
    assert_eq!(count_fingers(&lm), Some(0));
    lm[THUMB_TIP] = HandLandmark { x: wrist.x, y: wrist.y - 0.12, z: 0.0 };
    assert_eq!(count_fingers(&lm), Some(1));
}

#[test]
fn short_landmark_list_is_rejected() {
    assert_eq!(count_fingers(&[HandLandmark::default(); 20]), None);
    assert_eq!(HandObservation::from_landmarks(&[]), None);
}

#[test]
fn observation_maps_wrist_to_unit_range() {
    let mut lm = hand(false, [false; 4]);
    lm[WRIST] = HandLandmark { x: 1.0, y: 0.25, z: 0.0 };
    let obs = HandObservation::from_landmarks(&lm);
    assert!(obs.is_some());
    let obs = obs.unwrap_or(HandObservation { finger_count: 9, x: 9.0, y: 9.0 });
    assert!((obs.x - 1.0).abs() < 1e-6);
    assert!((obs.y + 0.5).abs() < 1e-6);
}

#[test]
fn observe_sets_target_and_gesture() {
    let mut state = HandState::default();
    state.observe(HandObservation { finger_count: 4, x: 0.5, y: -0.25 });

    assert!(state.is_tracking);
    assert_eq!(state.gesture, Gesture::Four);
    assert!((state.target - Vec3::new(2.5, 1.0, 0.0)).length() < 1e-6);
    assert!((state.smooth_finger_count - 0.6).abs() < 1e-6);

    let signal = state.signal();
    assert!(signal.is_tracking);
    assert_eq!(signal.gesture, Gesture::Four);
}

#[test]
fn smoothed_count_converges() {
    let mut state = HandState::default();
    for _ in 0..60 {
        state.observe(HandObservation { finger_count: 5, x: 0.0, y: 0.0 });
    }
    assert!((state.smooth_finger_count - 5.0).abs() < 0.01);
}

#[test]
fn reset_returns_to_untracked_none() {
    let mut state = HandState::default();
    state.observe(HandObservation { finger_count: 0, x: 0.3, y: 0.3 });
    state.reset();
    assert_eq!(state, HandState::default());
    assert_eq!(state.signal(), HandSignal::default());
    assert_eq!(state.gesture, Gesture::None);
}

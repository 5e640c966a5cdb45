use centroidtrack::{Detection, TrackState, Tracker, TrackerConfig, WindowLength};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

fn car(x: i32, y: i32, w: i32, h: i32) -> Detection {
    Detection::new((x, y, w, h), 0.01, 0.9, "car")
}

fn default_tracker() -> Tracker {
    Tracker::new(TrackerConfig {
        max_disappeared: 30,
        n_init: 3,
        ..TrackerConfig::default()
    })
    .unwrap()
}

#[test]
fn first_detection_creates_tentative_track() {
    let mut tracker = default_tracker();
    tracker
        .update(&[car(10, 10, 20, 20)], WindowLength::Short)
        .unwrap();

    assert_eq!(tracker.len(), 1);
    let track = tracker.get(0).unwrap();
    assert_eq!(track.id(), 0);
    assert_eq!(track.state(), TrackState::Tentative);
    assert_eq!(track.hits(), 1);
    assert_eq!(track.class_label(), "car");
}

#[test]
fn third_match_confirms_track() {
    let mut tracker = default_tracker();
    tracker
        .update(&[car(10, 10, 20, 20)], WindowLength::Short)
        .unwrap();
    tracker
        .update(&[car(12, 11, 20, 20)], WindowLength::Short)
        .unwrap();
    assert_eq!(tracker.get(0).unwrap().state(), TrackState::Tentative);

    tracker
        .update(&[car(14, 12, 20, 20)], WindowLength::Short)
        .unwrap();
    let track = tracker.get(0).unwrap();
    assert_eq!(track.hits(), 3);
    assert_eq!(track.state(), TrackState::Confirmed);
}

#[test]
fn confirmed_track_deleted_after_31_missed_frames() {
    let mut tracker = default_tracker();
    for i in 0..3 {
        tracker
            .update(&[car(10 + i, 10, 20, 20)], WindowLength::Short)
            .unwrap();
    }
    assert!(tracker.get(0).unwrap().is_confirmed());

    for frame in 1..=30 {
        tracker.update(&[], WindowLength::Short).unwrap();
        let track = tracker.get(0).expect("track survives up to 30 misses");
        assert_eq!(track.time_since_update(), frame);
        assert!(track.is_confirmed());
    }

    let summary = tracker.update(&[], WindowLength::Short).unwrap();
    assert_eq!(summary.removed, vec![0]);
    assert!(tracker.get(0).is_none());
    assert!(tracker.is_empty());
}

#[test]
fn far_detection_becomes_new_track() {
    let mut tracker = default_tracker();
    tracker
        .update(
            &[car(10, 10, 20, 20), car(200, 10, 20, 20)],
            WindowLength::Short,
        )
        .unwrap();

    let summary = tracker
        .update(
            &[
                car(600, 400, 20, 20),
                car(203, 12, 20, 20),
                car(12, 9, 20, 20),
            ],
            WindowLength::Short,
        )
        .unwrap();

    assert_eq!(summary.matched.len(), 2);
    assert!(summary.matched.contains(&(0, 2)));
    assert!(summary.matched.contains(&(1, 1)));
    assert_eq!(summary.registered, vec![2]);
    assert_eq!(tracker.len(), 3);
    assert_eq!(tracker.get(2).unwrap().bbox().x, 600);
}

#[test]
fn initial_ids_follow_input_order() {
    let mut tracker = default_tracker();
    let frame: Vec<Detection> = (0..6).map(|i| car(i * 100, 50, 30, 30)).collect();
    tracker.update(&frame, WindowLength::Long).unwrap();

    let ids: Vec<u32> = tracker.tracks().map(|t| t.id()).collect();
    assert_eq!(ids, (0..6).collect::<Vec<_>>());
    for (track, det) in tracker.tracks().zip(frame.iter()) {
        assert_eq!(track.bbox(), det.bbox());
    }
}

#[test]
fn empty_frames_never_grow_the_track_set() {
    let mut tracker = Tracker::new(TrackerConfig {
        max_disappeared: 3,
        ..TrackerConfig::default()
    })
    .unwrap();
    tracker
        .update(&[car(0, 0, 10, 10), car(100, 0, 10, 10)], WindowLength::Short)
        .unwrap();
    tracker
        .update(&[car(1, 0, 10, 10)], WindowLength::Short)
        .unwrap();

    let mut previous = tracker.len();
    for _ in 0..6 {
        tracker.update(&[], WindowLength::Short).unwrap();
        assert!(tracker.len() <= previous);
        previous = tracker.len();
    }
    assert!(tracker.is_empty());
}

fn state_rank(state: TrackState) -> u8 {
    match state {
        TrackState::Tentative => 0,
        TrackState::Confirmed => 1,
        TrackState::Deleted => 2,
    }
}

/// Drive the tracker with random jittering objects that appear and vanish,
/// and check the lifecycle invariants after every frame.
#[test]
fn random_scenes_respect_invariants() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let config = TrackerConfig {
        max_disappeared: 5,
        n_init: 3,
        ..TrackerConfig::default()
    };
    let mut tracker = Tracker::new(config.clone()).unwrap();

    let mut objects: Vec<(i32, i32, i32)> = (0..5)
        .map(|_| {
            (
                rng.random_range(0..1800),
                rng.random_range(0..1000),
                rng.random_range(20..120),
            )
        })
        .collect();

    let mut last_state: HashMap<u32, TrackState> = HashMap::new();

    for _frame in 0..300 {
        for obj in objects.iter_mut() {
            obj.0 += rng.random_range(-6..=6);
            obj.1 += rng.random_range(-4..=4);
            obj.2 = (obj.2 + rng.random_range(-2..=2)).max(4);
        }
        if rng.random_bool(0.05) && objects.len() < 12 {
            objects.push((
                rng.random_range(0..1800),
                rng.random_range(0..1000),
                rng.random_range(20..120),
            ));
        }
        if rng.random_bool(0.04) && !objects.is_empty() {
            let idx = rng.random_range(0..objects.len());
            objects.remove(idx);
        }

        let detections: Vec<Detection> = objects
            .iter()
            .filter(|_| rng.random_bool(0.85))
            .map(|&(x, y, s)| {
                let area = f64::from(s * s) / (1920.0 * 1080.0);
                Detection::new((x, y, s, s), area, 0.8, "person")
            })
            .collect();

        let next_id_before = tracker.next_id();
        let summary = tracker.update(&detections, WindowLength::Short).unwrap();

        // fresh ids, handed out consecutively
        let expected: Vec<u32> = (next_id_before..tracker.next_id()).collect();
        assert_eq!(summary.registered, expected);

        // no track and no detection matched twice
        let mut ids: Vec<u32> = summary.matched.iter().map(|m| m.0).collect();
        let mut cols: Vec<usize> = summary.matched.iter().map(|m| m.1).collect();
        ids.sort_unstable();
        ids.dedup();
        cols.sort_unstable();
        cols.dedup();
        assert_eq!(ids.len(), summary.matched.len());
        assert_eq!(cols.len(), summary.matched.len());

        for id in &summary.removed {
            last_state.insert(*id, TrackState::Deleted);
        }

        for track in tracker.tracks() {
            assert_ne!(track.state(), TrackState::Deleted);
            assert_eq!(track.is_confirmed(), track.hits() >= config.n_init);
            assert_eq!(track.area_window().len(), 11);

            let previous = last_state.insert(track.id(), track.state());
            if let Some(previous) = previous {
                assert!(state_rank(previous) <= state_rank(track.state()));
                assert_ne!(previous, TrackState::Deleted);
            }
        }

        // ids strictly increasing in iteration order
        let ids: Vec<u32> = tracker.tracks().map(|t| t.id()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }
}

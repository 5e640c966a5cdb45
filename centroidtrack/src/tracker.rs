//! Multi-object centroid tracker with track lifecycle management

use crate::assignment::{centroid_distances, greedy_assign};
use crate::detection::Detection;
use crate::error::Result;
use crate::smoothing::WindowLength;
use crate::track::{TentativePolicy, Track, TrackId, TrackParams};
use crate::trend::TrendClassifier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Configuration for the centroid tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Consecutive missed frames tolerated before a track is deleted
    pub max_disappeared: u32,
    /// Matched frames required before a track is confirmed
    pub n_init: u32,
    /// Whether tentative tracks get the full `max_disappeared` grace period
    pub tentative_policy: TentativePolicy,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_disappeared: 30,
            n_init: 3,
            tentative_policy: TentativePolicy::Patient,
        }
    }
}

/// What one `update` call did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    /// (track id, detection index) pairs that were matched
    pub matched: Vec<(TrackId, usize)>,
    /// Tracks marked missed this frame
    pub missed: Vec<TrackId>,
    /// Tracks registered this frame
    pub registered: Vec<TrackId>,
    /// Tracks purged at the end of the frame
    pub removed: Vec<TrackId>,
}

/// One shared classifier per supported window length
#[derive(Debug, Clone)]
struct Classifiers {
    short: Arc<TrendClassifier>,
    long: Arc<TrendClassifier>,
}

impl Classifiers {
    fn new() -> Result<Self> {
        Ok(Self {
            short: Arc::new(TrendClassifier::new(WindowLength::Short)?),
            long: Arc::new(TrendClassifier::new(WindowLength::Long)?),
        })
    }

    fn get(&self, window: WindowLength) -> Arc<TrendClassifier> {
        match window {
            WindowLength::Short => Arc::clone(&self.short),
            WindowLength::Long => Arc::clone(&self.long),
        }
    }
}

/// Centroid-distance multi-object tracker.
///
/// Tracks are stored by id. Ids are handed out in strictly increasing order
/// and never reused, so iterating the store visits tracks in registration
/// order; renderers rely on that order.
#[derive(Debug, Clone)]
pub struct Tracker {
    config: TrackerConfig,
    tracks: BTreeMap<TrackId, Track>,
    next_id: TrackId,
    classifiers: Classifiers,
    n_steps: u64,
}

impl Tracker {
    /// Create a tracker. Smoothing kernels for every supported window length
    /// are built here so that a bad kernel fails before the first frame.
    pub fn new(config: TrackerConfig) -> Result<Self> {
        log::info!(
            "Creating centroid tracker: max_disappeared={}, n_init={}, tentative_policy={:?}",
            config.max_disappeared,
            config.n_init,
            config.tentative_policy
        );
        Ok(Self {
            config,
            tracks: BTreeMap::new(),
            next_id: 0,
            classifiers: Classifiers::new()?,
            n_steps: 0,
        })
    }

    /// Register a new tentative track for `detection`
    pub fn register(&mut self, detection: &Detection, window: WindowLength) -> TrackId {
        let id = self.next_id;
        let track = Track::new(
            TrackParams {
                id,
                n_init: self.config.n_init,
                max_disappeared: self.config.max_disappeared,
                tentative_policy: self.config.tentative_policy,
            },
            detection,
            self.classifiers.get(window),
        );
        self.tracks.insert(id, track);
        self.next_id += 1;
        log::trace!(
            "Registered track {} ({}) at {}",
            id,
            detection.class_label,
            detection.bbox
        );
        id
    }

    /// Remove every deleted track, returning their ids
    pub fn deregister(&mut self) -> Vec<TrackId> {
        let removed: Vec<TrackId> = self
            .tracks
            .values()
            .filter(|t| t.is_deleted())
            .map(Track::id)
            .collect();
        self.tracks.retain(|_, t| !t.is_deleted());
        removed
    }

    /// Process one frame of detections.
    ///
    /// `window` sets the history length of tracks registered in this call;
    /// existing tracks keep the length they were created with.
    pub fn update(
        &mut self,
        detections: &[Detection],
        window: WindowLength,
    ) -> Result<UpdateSummary> {
        self.n_steps += 1;
        let mut summary = UpdateSummary::default();

        if detections.is_empty() {
            for track in self.tracks.values_mut() {
                track.mark_missed();
                summary.missed.push(track.id());
            }
        } else if self.tracks.is_empty() {
            for detection in detections {
                summary.registered.push(self.register(detection, window));
            }
        } else {
            self.associate(detections, window, &mut summary)?;
        }

        summary.removed = self.deregister();

        log::debug!(
            "Frame {}: {} detections, {} matched, {} missed, {} new, {} removed, {} tracks",
            self.n_steps,
            detections.len(),
            summary.matched.len(),
            summary.missed.len(),
            summary.registered.len(),
            summary.removed.len(),
            self.tracks.len()
        );
        Ok(summary)
    }

    fn associate(
        &mut self,
        detections: &[Detection],
        window: WindowLength,
        summary: &mut UpdateSummary,
    ) -> Result<()> {
        let track_ids: Vec<TrackId> = self.tracks.keys().copied().collect();
        let track_centroids: Vec<(i32, i32)> = self.tracks.values().map(Track::centroid).collect();
        let detection_centroids: Vec<(i32, i32)> =
            detections.iter().map(Detection::centroid).collect();

        let distances = centroid_distances(&track_centroids, &detection_centroids)?;
        let assignment = greedy_assign(distances.view());

        for &(row, col) in &assignment.matches {
            let id = track_ids[row];
            if let Some(track) = self.tracks.get_mut(&id) {
                track.update(&detections[col])?;
                summary.matched.push((id, col));
                log::trace!(
                    "Track {} <- detection {} (distance {:.1}, color {})",
                    id,
                    col,
                    distances[(row, col)],
                    track.color()
                );
            }
        }

        // More tracks than detections: leftovers may have disappeared.
        // Otherwise leftover detections are new objects.
        if track_ids.len() >= detections.len() {
            for &row in &assignment.unmatched_rows {
                let id = track_ids[row];
                if let Some(track) = self.tracks.get_mut(&id) {
                    track.mark_missed();
                    summary.missed.push(id);
                }
            }
        } else {
            for &col in &assignment.unmatched_cols {
                summary
                    .registered
                    .push(self.register(&detections[col], window));
            }
        }
        Ok(())
    }

    /// Tracks in registration order
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    /// Tracks a renderer should draw, in registration order
    pub fn drawable_tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values().filter(|t| t.is_drawable())
    }

    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.tracks.get(&id)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Id the next registered track will receive
    pub fn next_id(&self) -> TrackId {
        self.next_id
    }

    /// Number of `update` calls so far
    pub fn step_count(&self) -> u64 {
        self.n_steps
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Drop all tracks. The id counter keeps running so ids are never reused.
    pub fn clear(&mut self) {
        self.tracks.clear();
    }
}

//! Single-object track: lifecycle state machine and area history

use crate::bbox::BBox;
use crate::detection::Detection;
use crate::error::Result;
use crate::smoothing::WindowLength;
use crate::trend::{TrackColor, TrendClassifier};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;

pub type TrackId = u32;

/// Lifecycle state of a track.
///
/// New tracks are `Tentative` until enough matches have been collected, then
/// `Confirmed`. `Deleted` tracks are purged by the tracker at the end of the
/// frame. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TrackState {
    #[default]
    Tentative,
    Confirmed,
    Deleted,
}

/// What happens to a tentative track that misses a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TentativePolicy {
    /// Tentative tracks survive misses up to `max_disappeared`, like confirmed ones
    #[default]
    Patient,
    /// Tentative tracks are deleted on their first miss
    Strict,
}

#[derive(Debug, Clone)]
pub struct TrackParams {
    pub id: TrackId,
    /// Matches required before the track is confirmed
    pub n_init: u32,
    /// Consecutive misses tolerated before deletion
    pub max_disappeared: u32,
    pub tentative_policy: TentativePolicy,
}

#[derive(Debug, Clone)]
pub struct Track {
    id: TrackId,
    bbox: BBox,
    class_label: String,
    /// Smoothed normalized-area history, always `classifier.window().len()` long
    area_window: VecDeque<f64>,
    /// number of frames with a matching detection, registration included
    hits: u32,
    /// number of consecutive frames without a matching detection
    time_since_update: u32,
    state: TrackState,
    color: TrackColor,
    n_init: u32,
    max_disappeared: u32,
    tentative_policy: TentativePolicy,
    classifier: Arc<TrendClassifier>,
}

impl Track {
    /// Start a track from its first detection.
    ///
    /// The area history is seeded flat with the detection's area, so the
    /// first frames carry no trend signal.
    pub fn new(p: TrackParams, detection: &Detection, classifier: Arc<TrendClassifier>) -> Self {
        let window = classifier.window().len();
        let mut track = Track {
            id: p.id,
            bbox: detection.bbox,
            class_label: detection.class_label.clone(),
            area_window: std::iter::repeat(detection.area).take(window).collect(),
            hits: 1,
            time_since_update: 0,
            state: TrackState::Tentative,
            color: TrackColor::Yellow,
            n_init: p.n_init,
            max_disappeared: p.max_disappeared,
            tentative_policy: p.tentative_policy,
            classifier,
        };
        track.maybe_confirm();
        track
    }

    /// Update the track with its matched detection
    pub fn update(&mut self, detection: &Detection) -> Result<()> {
        self.hits = self.hits.saturating_add(1);
        self.time_since_update = 0;
        self.maybe_confirm();

        self.bbox = detection.bbox;
        self.class_label.clone_from(&detection.class_label);

        self.area_window.pop_front();
        self.area_window.push_back(detection.area);
        self.update_color()
    }

    /// Mark this track as missed (no association in the current frame)
    pub fn mark_missed(&mut self) {
        self.time_since_update = self.time_since_update.saturating_add(1);

        if self.state == TrackState::Tentative && self.tentative_policy == TentativePolicy::Strict
        {
            self.state = TrackState::Deleted;
        }
        if self.time_since_update > self.max_disappeared {
            self.state = TrackState::Deleted;
        }
    }

    fn maybe_confirm(&mut self) {
        if self.state == TrackState::Tentative && self.hits >= self.n_init {
            self.state = TrackState::Confirmed;
        }
    }

    /// Re-classify the motion trend and replace the history with its
    /// smoothed version. Smoothing therefore compounds frame over frame.
    fn update_color(&mut self) -> Result<()> {
        let (color, smoothed) = self.classifier.evaluate(self.area_window.make_contiguous())?;
        self.color = color;
        self.area_window = smoothed.into();
        Ok(())
    }

    pub fn id(&self) -> TrackId {
        self.id
    }

    pub fn bbox(&self) -> BBox {
        self.bbox
    }

    pub fn class_label(&self) -> &str {
        &self.class_label
    }

    pub fn area_window(&self) -> &VecDeque<f64> {
        &self.area_window
    }

    pub fn window_length(&self) -> WindowLength {
        self.classifier.window()
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn time_since_update(&self) -> u32 {
        self.time_since_update
    }

    pub fn state(&self) -> TrackState {
        self.state
    }

    pub fn color(&self) -> TrackColor {
        self.color
    }

    pub fn centroid(&self) -> (i32, i32) {
        self.bbox.centroid()
    }

    pub fn is_tentative(&self) -> bool {
        self.state == TrackState::Tentative
    }

    pub fn is_confirmed(&self) -> bool {
        self.state == TrackState::Confirmed
    }

    pub fn is_deleted(&self) -> bool {
        self.state == TrackState::Deleted
    }

    /// Whether a renderer should draw this track: confirmed and matched in
    /// the current or the previous frame.
    pub fn is_drawable(&self) -> bool {
        self.is_confirmed() && self.time_since_update <= 1
    }
}

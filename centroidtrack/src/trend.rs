//! Approach/recede classification from a smoothed normalized-area history
//!
//! The classifier compares the newest smoothed area against a lagged reference
//! sample a few frames back. Growing apparent size means the object is coming
//! toward the camera; shrinking means it is moving away. Larger objects jitter
//! more in relative terms, so the ratio thresholds loosen with the absolute
//! area.

use crate::error::Result;
use crate::smoothing::{SavgolFilter, WindowLength};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Polynomial order of the smoothing fit
pub const SMOOTHING_POLYORDER: usize = 1;

/// Overlay color of a track, encoding its motion trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TrackColor {
    /// Stable apparent size (also the initial color)
    #[default]
    Yellow,
    /// Shrinking: moving away from the camera
    Green,
    /// Growing: moving toward the camera
    Red,
}

/// Direction of motion relative to the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotionTrend {
    Stable,
    Receding,
    Approaching,
}

impl TrackColor {
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            TrackColor::Yellow => [255, 255, 0],
            TrackColor::Green => [0, 128, 0],
            TrackColor::Red => [255, 0, 0],
        }
    }

    /// Channel order expected by OpenCV-style renderers
    pub fn bgr(&self) -> [u8; 3] {
        let [r, g, b] = self.rgb();
        [b, g, r]
    }

    pub fn trend(&self) -> MotionTrend {
        match self {
            TrackColor::Yellow => MotionTrend::Stable,
            TrackColor::Green => MotionTrend::Receding,
            TrackColor::Red => MotionTrend::Approaching,
        }
    }
}

impl fmt::Display for TrackColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackColor::Yellow => write!(f, "yellow"),
            TrackColor::Green => write!(f, "green"),
            TrackColor::Red => write!(f, "red"),
        }
    }
}

/// Ratio thresholds for one band of absolute normalized area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaBucket {
    /// Inclusive upper bound of the band
    pub max_area: f64,
    /// `ratio <= shrink` classifies as receding
    pub shrink: f64,
    /// `ratio >= grow` classifies as approaching
    pub grow: f64,
}

/// Area bands in ascending order. The last band catches everything else,
/// including NaN areas.
pub const AREA_BUCKETS: [AreaBucket; 3] = [
    AreaBucket {
        max_area: 0.08,
        shrink: 0.992,
        grow: 1.05,
    },
    AreaBucket {
        max_area: 0.2,
        shrink: 0.985,
        grow: 1.10,
    },
    AreaBucket {
        max_area: f64::INFINITY,
        shrink: 0.87,
        grow: 1.19,
    },
];

fn bucket_for(area: f64) -> &'static AreaBucket {
    AREA_BUCKETS
        .iter()
        .find(|bucket| area <= bucket.max_area)
        .unwrap_or(&AREA_BUCKETS[AREA_BUCKETS.len() - 1])
}

/// Classify the trend from the latest and the lagged smoothed area.
///
/// A zero reference yields an infinite or NaN ratio; those classify as
/// approaching and stable respectively.
pub fn classify(latest: f64, reference: f64) -> TrackColor {
    let ratio = latest / reference;
    let bucket = bucket_for(latest);

    if ratio <= bucket.shrink {
        TrackColor::Green
    } else if ratio >= bucket.grow {
        TrackColor::Red
    } else {
        TrackColor::Yellow
    }
}

/// Smoother plus classifier for one window length.
///
/// Immutable once built; a tracker shares one instance per window length
/// across all of its tracks.
#[derive(Debug, Clone)]
pub struct TrendClassifier {
    window: WindowLength,
    filter: SavgolFilter,
}

impl TrendClassifier {
    pub fn new(window: WindowLength) -> Result<Self> {
        let filter = SavgolFilter::new(window.len(), SMOOTHING_POLYORDER)?;
        Ok(Self { window, filter })
    }

    pub fn window(&self) -> WindowLength {
        self.window
    }

    /// Smooth `history` and classify it.
    ///
    /// Returns the color together with the smoothed history, which callers
    /// store back as the new history. The history must hold exactly
    /// `window().len()` samples.
    pub fn evaluate(&self, history: &[f64]) -> Result<(TrackColor, Vec<f64>)> {
        let smoothed = self.filter.apply(history)?;
        let latest = smoothed[self.window.len() - 1];
        let reference = smoothed[self.window.lag_index()];
        Ok((classify(latest, reference), smoothed))
    }
}

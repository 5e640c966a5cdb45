//! Error types for the centroid tracker

use thiserror::Error;

/// Result type alias for the tracking library
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Errors raised while configuring or running a tracker.
///
/// Window and kernel variants are configuration problems and surface from
/// `Tracker::new` or `WindowLength::try_from`. `HistoryLength` only comes from
/// calling the smoother directly with a history of the wrong size.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Unsupported smoothing window length: {0} (supported: 11, 21)")]
    UnsupportedWindowLength(usize),

    #[error("Smoothing window {window} is too short for polynomial order {polyorder}")]
    WindowTooShort { window: usize, polyorder: usize },

    #[error("Smoothing kernel for window {window}, order {polyorder} is singular")]
    SingularKernel { window: usize, polyorder: usize },

    #[error("Area history has {actual} samples, smoothing window expects {expected}")]
    HistoryLength { expected: usize, actual: usize },

    #[error("Distance matrix shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

//! Savitzky-Golay smoothing over a full, fixed-length area history

use crate::error::{Result, TrackerError};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported history lengths.
///
/// Live feeds use the short window so the trend reacts faster; recorded files
/// use the long one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum WindowLength {
    Short,
    Long,
}

impl WindowLength {
    pub const ALL: [WindowLength; 2] = [WindowLength::Short, WindowLength::Long];

    /// Number of samples in the history
    pub const fn len(self) -> usize {
        match self {
            WindowLength::Short => 11,
            WindowLength::Long => 21,
        }
    }

    /// How many samples before the window midpoint the reference sample sits
    pub const fn lag_offset(self) -> usize {
        match self {
            WindowLength::Short => 4,
            WindowLength::Long => 8,
        }
    }

    /// Index of the lagged reference sample inside the history
    pub const fn lag_index(self) -> usize {
        self.len() / 2 - self.lag_offset()
    }
}

impl TryFrom<usize> for WindowLength {
    type Error = TrackerError;

    fn try_from(len: usize) -> Result<Self> {
        match len {
            11 => Ok(WindowLength::Short),
            21 => Ok(WindowLength::Long),
            other => Err(TrackerError::UnsupportedWindowLength(other)),
        }
    }
}

impl From<WindowLength> for usize {
    fn from(window: WindowLength) -> usize {
        window.len()
    }
}

impl fmt::Display for WindowLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.len())
    }
}

/// Savitzky-Golay filter whose window spans the whole input.
///
/// With the window equal to the input length, every output sample comes from
/// the same least-squares polynomial fit, so the filter collapses to a single
/// projection matrix `H = A (AᵀA)⁻¹ Aᵀ` applied to the input.
#[derive(Debug, Clone)]
pub struct SavgolFilter {
    window: usize,
    polyorder: usize,
    projection: DMatrix<f64>,
}

impl SavgolFilter {
    pub fn new(window: usize, polyorder: usize) -> Result<Self> {
        if window < 2 || window <= polyorder {
            return Err(TrackerError::WindowTooShort { window, polyorder });
        }

        // Vandermonde matrix over offsets from the window center
        let center = (window as f64 - 1.0) / 2.0;
        let a = DMatrix::from_fn(window, polyorder + 1, |i, k| {
            (i as f64 - center).powi(k as i32)
        });

        let normal = a.transpose() * &a;
        let normal_inv = normal
            .try_inverse()
            .ok_or(TrackerError::SingularKernel { window, polyorder })?;
        let projection = &a * normal_inv * a.transpose();

        Ok(Self {
            window,
            polyorder,
            projection,
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn polyorder(&self) -> usize {
        self.polyorder
    }

    /// Smooth `samples`, returning a sequence of the same length.
    ///
    /// Fails unless `samples.len()` equals the filter window.
    pub fn apply(&self, samples: &[f64]) -> Result<Vec<f64>> {
        if samples.len() != self.window {
            return Err(TrackerError::HistoryLength {
                expected: self.window,
                actual: samples.len(),
            });
        }
        let y = DVector::from_column_slice(samples);
        Ok((&self.projection * y).iter().copied().collect())
    }
}

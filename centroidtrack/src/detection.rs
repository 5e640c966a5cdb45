//! Per-frame observation produced by an external detector

use crate::bbox::BBox;
use serde::{Deserialize, Serialize};

/// A single bounding-box detection in one frame.
///
/// Constructed by the caller, read-only to the tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Pixel bounding box (x, y, w, h)
    pub bbox: BBox,
    /// Box area divided by frame area, in (0, 1]
    pub area: f64,
    /// Detector confidence score (0-1)
    pub confidence: f32,
    /// Detector class name
    pub class_label: String,
}

impl Detection {
    pub fn new(
        bbox: impl Into<BBox>,
        area: f64,
        confidence: f32,
        class_label: impl Into<String>,
    ) -> Self {
        Self {
            bbox: bbox.into(),
            area,
            confidence,
            class_label: class_label.into(),
        }
    }

    pub fn bbox(&self) -> BBox {
        self.bbox
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn class_label(&self) -> &str {
        &self.class_label
    }

    pub fn centroid(&self) -> (i32, i32) {
        self.bbox.centroid()
    }
}

//! Pixel-space bounding boxes and the geometry the tracker needs from them

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer pixel rectangle in (x, y, w, h) form, origin at the top-left corner.
///
/// The detector may produce boxes that start left of or above the frame, so
/// the origin is signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BBox {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl BBox {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Pixel area. Zero for degenerate boxes.
    pub fn area(&self) -> i64 {
        i64::from(self.w.max(0)) * i64::from(self.h.max(0))
    }

    /// Box center truncated toward zero to whole pixels.
    ///
    /// Zero-sized boxes still have a well defined centroid (their origin).
    pub fn centroid(&self) -> (i32, i32) {
        let cx = f64::from(self.x) + f64::from(self.w) / 2.0;
        let cy = f64::from(self.y) + f64::from(self.h) / 2.0;
        (cx as i32, cy as i32)
    }

    /// Convert to bounds array [xmin, ymin, xmax, ymax]
    pub fn to_bounds(&self) -> [i32; 4] {
        [self.x, self.y, self.right(), self.bottom()]
    }
}

impl From<(i32, i32, i32, i32)> for BBox {
    fn from((x, y, w, h): (i32, i32, i32, i32)) -> Self {
        Self::new(x, y, w, h)
    }
}

impl fmt::Display for BBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BBox({}, {}, {}, {})", self.x, self.y, self.w, self.h)
    }
}

/// Euclidean distance between two integer centroids
#[inline]
pub fn centroid_distance(a: (i32, i32), b: (i32, i32)) -> f64 {
    let dx = f64::from(a.0) - f64::from(b.0);
    let dy = f64::from(a.1) - f64::from(b.1);
    dx.hypot(dy)
}

/// Calculate IoU between two pixel boxes
pub fn calculate_iou(bbox1: &BBox, bbox2: &BBox) -> f32 {
    let x1 = bbox1.x.max(bbox2.x);
    let y1 = bbox1.y.max(bbox2.y);
    let x2 = bbox1.right().min(bbox2.right());
    let y2 = bbox1.bottom().min(bbox2.bottom());

    if x2 <= x1 || y2 <= y1 {
        return 0.0;
    }

    let intersection = i64::from(x2 - x1) * i64::from(y2 - y1);
    let union = bbox1.area() + bbox2.area() - intersection;

    if union > 0 {
        intersection as f32 / union as f32
    } else {
        0.0
    }
}

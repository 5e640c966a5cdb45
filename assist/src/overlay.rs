//! Draw instructions handed to the renderer

use centroidtrack::{BBox, Detection, Track, TrackId};
use serde::{Deserialize, Serialize};

/// One rectangle plus caption to draw on the frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayBox {
    pub bbox: BBox,
    pub label: String,
    /// RGB
    pub color: [u8; 3],
    /// Set when the box comes from a track rather than a raw detection
    pub track_id: Option<TrackId>,
}

impl OverlayBox {
    /// Boxes for every drawable track, colored by motion trend
    pub fn from_tracks<'a, I>(tracks: I) -> Vec<OverlayBox>
    where
        I: IntoIterator<Item = &'a Track>,
    {
        tracks
            .into_iter()
            .filter(|t| t.is_drawable())
            .map(|t| OverlayBox {
                bbox: t.bbox(),
                label: t.class_label().to_string(),
                color: t.color().rgb(),
                track_id: Some(t.id()),
            })
            .collect()
    }

    /// Boxes for plain detections, labeled with class and confidence
    pub fn from_detections(
        detections: &[Detection],
        class_id_of: impl Fn(&str) -> u32,
    ) -> Vec<OverlayBox> {
        detections
            .iter()
            .map(|d| OverlayBox {
                bbox: d.bbox(),
                label: format!("{}: {:.2}", d.class_label(), d.confidence()),
                color: class_color(class_id_of(d.class_label())),
                track_id: None,
            })
            .collect()
    }
}

/// Brightest channel a class color may use. Trend colors all have a channel
/// at 255 or at 0, so capping to [40, 180] keeps the plain-mode palette
/// visually apart from approaching/receding/stable boxes.
const CLASS_CHANNEL_MAX: u16 = 180;
const CLASS_CHANNEL_MIN: u16 = 40;
/// Floor for the dominant channel so every class color stays saturated
const CLASS_DOMINANT_MIN: u16 = 100;

/// Multiplicative hash step (Knuth, 2^32 / golden ratio)
const HASH_STEP: u32 = 2654435761;

/// Deterministic color per class id, so a class keeps its color across runs
pub fn class_color(class_id: u32) -> [u8; 3] {
    // Three successive hash rounds, low byte of each as one channel
    let mut hash = class_id.wrapping_mul(HASH_STEP);
    let r = (hash & 0xFF) as u16;
    hash = hash.wrapping_mul(HASH_STEP);
    let g = (hash & 0xFF) as u16;
    hash = hash.wrapping_mul(HASH_STEP);
    let b = (hash & 0xFF) as u16;

    let clamp = |c: u16, dominant: bool| {
        let floor = if dominant {
            CLASS_DOMINANT_MIN
        } else {
            CLASS_CHANNEL_MIN
        };
        c.min(CLASS_CHANNEL_MAX).max(floor) as u8
    };

    [
        clamp(r, r > g && r > b),
        clamp(g, g > r && g > b),
        clamp(b, b > r && b > g),
    ]
}

//! Postprocessing of raw detector rows into tracker detections

use crate::config::DetectionConfig;
use crate::types::{ClassNames, FrameSize, RawDetection};
use centroidtrack::bbox::calculate_iou;
use centroidtrack::{BBox, Detection};
use std::collections::HashSet;

/// Turns normalized detector output into pixel-space detections
#[derive(Debug, Clone)]
pub struct Postprocessor {
    /// Confidence threshold for filtering detections
    confidence_threshold: f32,
    /// NMS threshold for removing duplicate detections
    nms_threshold: f32,
    class_names: ClassNames,
    /// Lower-cased class names to keep; empty keeps all
    labels: HashSet<String>,
}

/// A candidate that survived the confidence filter
struct Candidate {
    bbox: BBox,
    area: f64,
    confidence: f32,
    class_id: u32,
}

impl Postprocessor {
    pub fn new(config: &DetectionConfig, class_names: ClassNames) -> Self {
        Self {
            confidence_threshold: config.confidence_threshold,
            nms_threshold: config.nms_threshold,
            class_names,
            labels: HashSet::new(),
        }
    }

    /// Restrict output to the given class names (case-insensitive)
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.labels = labels
            .into_iter()
            .map(|l| l.as_ref().trim().to_lowercase())
            .filter(|l| !l.is_empty())
            .collect();
        self
    }

    pub fn class_names(&self) -> &ClassNames {
        &self.class_names
    }

    /// Filter, suppress duplicates and label one frame of raw detections.
    /// Survivors keep the detector's original order.
    pub fn process(&self, raw: &[RawDetection], frame: FrameSize) -> Vec<Detection> {
        let candidates: Vec<Candidate> = raw
            .iter()
            .filter(|det| det.confidence > self.confidence_threshold)
            .map(|det| Candidate {
                bbox: to_pixel_box(det, frame),
                area: det.normalized_area(),
                confidence: det.confidence,
                class_id: det.class_id,
            })
            .collect();

        let keep = self.apply_nms(&candidates);

        candidates
            .iter()
            .zip(keep)
            .filter(|(_, kept)| *kept)
            .filter_map(|(cand, _)| {
                let Some(name) = self.class_names.get(cand.class_id) else {
                    log::debug!("dropping detection with unknown class id {}", cand.class_id);
                    return None;
                };
                if !self.accepts(name) {
                    return None;
                }
                Some(Detection::new(cand.bbox, cand.area, cand.confidence, name))
            })
            .collect()
    }

    fn accepts(&self, name: &str) -> bool {
        self.labels.is_empty() || self.labels.contains(&name.to_lowercase())
    }

    /// Class-agnostic greedy NMS; returns a keep flag per candidate
    fn apply_nms(&self, candidates: &[Candidate]) -> Vec<bool> {
        let mut order: Vec<usize> = (0..candidates.len()).collect();
        // Sort by confidence (descending), ties keep input order
        order.sort_by(|&a, &b| {
            candidates[b]
                .confidence
                .total_cmp(&candidates[a].confidence)
        });

        let mut keep = vec![false; candidates.len()];
        let mut kept: Vec<usize> = Vec::with_capacity(candidates.len());

        for &i in &order {
            let overlaps = kept.iter().any(|&k| {
                calculate_iou(&candidates[k].bbox, &candidates[i].bbox) > self.nms_threshold
            });
            if !overlaps {
                keep[i] = true;
                kept.push(i);
            }
        }

        keep
    }
}

/// Normalized center box to pixel top-left box, truncating like an int cast
fn to_pixel_box(det: &RawDetection, frame: FrameSize) -> BBox {
    let (fw, fh) = (f64::from(frame.width), f64::from(frame.height));
    let cx = (f64::from(det.center_x) * fw) as i32;
    let cy = (f64::from(det.center_y) * fh) as i32;
    let w = (f64::from(det.width) * fw) as i32;
    let h = (f64::from(det.height) * fh) as i32;
    let x = (f64::from(cx) - f64::from(w) / 2.0) as i32;
    let y = (f64::from(cy) - f64::from(h) / 2.0) as i32;
    BBox::new(x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn postprocessor() -> Postprocessor {
        Postprocessor::new(&DetectionConfig::default(), ClassNames::coco())
    }

    #[test]
    fn test_pixel_box_truncates() {
        let det = RawDetection::new(0, 0.9, 0.5, 0.5, 0.1, 0.25);
        let bbox = to_pixel_box(&det, FrameSize::new(641, 480));
        // cx = 320, w = 64, x = 288; cy = 240, h = 120, y = 180
        assert_eq!(bbox, BBox::new(288, 180, 64, 120));

        let odd = RawDetection::new(0, 0.9, 0.015, 0.015, 0.05, 0.05);
        let bbox = to_pixel_box(&odd, FrameSize::new(100, 100));
        // cx = 1, w = 5, x = trunc(-1.5) = -1
        assert_eq!(bbox, BBox::new(-1, -1, 5, 5));
    }

    #[test]
    fn test_confidence_threshold_is_strict() {
        let pp = postprocessor();
        let raw = [
            RawDetection::new(0, 0.5, 0.2, 0.2, 0.1, 0.1),
            RawDetection::new(0, 0.51, 0.7, 0.7, 0.1, 0.1),
        ];
        let out = pp.process(&raw, FrameSize::default());
        assert_eq!(out.len(), 1);
        assert_abs_diff_eq!(out[0].confidence(), 0.51);
        assert_abs_diff_eq!(out[0].area(), 0.01, epsilon = 1e-6);
    }

    #[test]
    fn test_nms_is_class_agnostic_and_keeps_order() {
        let pp = postprocessor();
        let raw = [
            RawDetection::new(7, 0.6, 0.5, 0.5, 0.2, 0.2),  // truck, overlapped
            RawDetection::new(0, 0.9, 0.1, 0.1, 0.1, 0.1),  // person, alone
            RawDetection::new(2, 0.8, 0.51, 0.5, 0.2, 0.2), // car, wins overlap
        ];
        let out = pp.process(&raw, FrameSize::default());
        let labels: Vec<&str> = out.iter().map(|d| d.class_label()).collect();
        assert_eq!(labels, vec!["person", "car"]);
    }

    #[test]
    fn test_label_filter_and_unknown_ids() {
        let pp = postprocessor().with_labels(["Person", "TRUCK"]);
        let raw = [
            RawDetection::new(0, 0.9, 0.1, 0.1, 0.05, 0.05),
            RawDetection::new(2, 0.9, 0.4, 0.4, 0.05, 0.05),
            RawDetection::new(7, 0.9, 0.7, 0.7, 0.05, 0.05),
            RawDetection::new(99, 0.9, 0.9, 0.9, 0.05, 0.05),
        ];
        let out = pp.process(&raw, FrameSize::default());
        let labels: Vec<&str> = out.iter().map(|d| d.class_label()).collect();
        assert_eq!(labels, vec!["person", "truck"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(postprocessor().process(&[], FrameSize::default()).is_empty());
    }
}

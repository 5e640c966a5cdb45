//! Centroid-distance multi-object tracker with approach/recede classification
//!
//! The tracker takes per-frame detections (pixel boxes, class names and
//! frame-normalized areas), keeps identities stable across frames with a
//! greedy nearest-centroid assignment, and manages a
//! tentative → confirmed → deleted lifecycle per track. Each track also keeps
//! a smoothed history of its normalized area and classifies whether the object
//! is approaching the camera (growing), receding (shrinking) or stable.
//!
//! ```rust
//! use centroidtrack::{Detection, Tracker, TrackerConfig, WindowLength};
//!
//! let mut tracker = Tracker::new(TrackerConfig::default())?;
//! let frame = vec![Detection::new((10, 10, 20, 20), 0.02, 0.9, "car")];
//! tracker.update(&frame, WindowLength::Short)?;
//!
//! for track in tracker.drawable_tracks() {
//!     println!("{} {} {}", track.id(), track.class_label(), track.color());
//! }
//! # Ok::<(), centroidtrack::TrackerError>(())
//! ```

pub mod assignment;
pub mod bbox;
pub mod detection;
pub mod error;
pub mod smoothing;
pub mod track;
pub mod tracker;
pub mod trend;

pub use assignment::{greedy_assign, Assignment};
pub use bbox::BBox;
pub use detection::Detection;
pub use error::{Result, TrackerError};
pub use smoothing::{SavgolFilter, WindowLength};
pub use track::{TentativePolicy, Track, TrackId, TrackState};
pub use tracker::{Tracker, TrackerConfig, UpdateSummary};
pub use trend::{MotionTrend, TrackColor, TrendClassifier};

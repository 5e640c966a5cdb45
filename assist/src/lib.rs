//! Safety assist overlay library
//!
//! Glue between an object detector and a frame renderer. Raw detector rows
//! are filtered, deduplicated and labeled, then either drawn as plain class
//! boxes or fed through the centroid tracker so each object is colored by
//! whether it is approaching (red), receding (green) or holding still
//! (yellow). A clip recorder decides which frames go into the output video.

pub mod config;
pub mod error;
pub mod module;
pub mod overlay;
pub mod postprocessing;
pub mod recording;
pub mod types;

pub use config::{AssistConfig, DetectionConfig, ModuleKind, RecordingConfig, VideoSource};
pub use error::{AssistError, Result};
pub use module::{AssistModule, FrameOutput, SafetyAssist};
pub use overlay::{class_color, OverlayBox};
pub use postprocessing::Postprocessor;
pub use recording::ClipRecorder;
pub use types::{ClassNames, FrameSize, RawDetection};

pub use centroidtrack;

/// Get library version information
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

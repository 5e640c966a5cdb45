//! Run configuration
//!
//! One immutable record built at startup and handed to the assist module.
//! Nothing here is mutated while frames are processed.

use crate::error::{AssistError, Result};
use centroidtrack::{TrackerConfig, WindowLength};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Where frames come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoSource {
    /// Live camera by device index
    Camera(u32),
    /// Recorded video file
    File(PathBuf),
}

impl VideoSource {
    /// Parse a command-line style source: a bare integer is a camera index,
    /// anything else a file path
    pub fn parse(input: &str) -> Self {
        match input.trim().parse::<u32>() {
            Ok(index) => VideoSource::Camera(index),
            Err(_) => VideoSource::File(PathBuf::from(input)),
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, VideoSource::Camera(_))
    }

    /// Area-history length for tracks: live feeds react faster with the
    /// short window, files get the smoother long one
    pub fn window_length(&self) -> WindowLength {
        if self.is_live() {
            WindowLength::Short
        } else {
            WindowLength::Long
        }
    }
}

impl Default for VideoSource {
    fn default() -> Self {
        VideoSource::File(PathBuf::from("./videos/Gantry4.mp4"))
    }
}

impl fmt::Display for VideoSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoSource::Camera(index) => write!(f, "camera {}", index),
            VideoSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Available assist modules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    /// Frames pass through untouched
    #[default]
    Passthrough,
    /// Detector output is labeled and optionally tracked
    ObjectDetection,
}

impl FromStr for ModuleKind {
    type Err = AssistError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "passthrough" | "dummy_ai" => Ok(ModuleKind::Passthrough),
            "object_detection" | "yolood" => Ok(ModuleKind::ObjectDetection),
            _ => Err(AssistError::unknown_module(s)),
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleKind::Passthrough => write!(f, "passthrough"),
            ModuleKind::ObjectDetection => write!(f, "object_detection"),
        }
    }
}

/// Filtering applied to raw detector output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Detections must score strictly above this (0-1)
    pub confidence_threshold: f32,
    /// Boxes overlapping a stronger box by more than this IoU are dropped (0-1)
    pub nms_threshold: f32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            nms_threshold: 0.3,
        }
    }
}

/// Output clip recording
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingConfig {
    pub path: PathBuf,
    /// Frames still written after the last frame with detections
    #[serde(default = "default_max_idle_frames")]
    pub max_idle_frames: u32,
}

fn default_max_idle_frames() -> u32 {
    30
}

impl RecordingConfig {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            max_idle_frames: default_max_idle_frames(),
        }
    }
}

/// Complete run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistConfig {
    pub source: VideoSource,
    pub module: ModuleKind,
    /// Class names to keep; empty keeps every class
    pub labels: Vec<String>,
    /// Track objects and color them by motion trend instead of plain labels
    pub safety_assist: bool,
    pub detection: DetectionConfig,
    pub tracker: TrackerConfig,
    pub recording: Option<RecordingConfig>,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            source: VideoSource::default(),
            module: ModuleKind::default(),
            labels: vec!["person".to_string()],
            safety_assist: false,
            detection: DetectionConfig::default(),
            tracker: TrackerConfig::default(),
            recording: None,
        }
    }
}

impl AssistConfig {
    /// Load from a JSON file and validate
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: AssistConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a comma-separated class list, lower-casing each name
    pub fn parse_labels(classes: &str) -> Vec<String> {
        classes
            .split(',')
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .collect()
    }

    pub fn window_length(&self) -> WindowLength {
        self.source.window_length()
    }

    pub fn validate(&self) -> Result<()> {
        let unit = 0.0..=1.0;
        if !unit.contains(&self.detection.confidence_threshold) {
            return Err(AssistError::config(format!(
                "confidence_threshold must be within [0, 1], got {}",
                self.detection.confidence_threshold
            )));
        }
        if !unit.contains(&self.detection.nms_threshold) {
            return Err(AssistError::config(format!(
                "nms_threshold must be within [0, 1], got {}",
                self.detection.nms_threshold
            )));
        }
        Ok(())
    }
}

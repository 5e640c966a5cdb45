//! Assist modules: what happens to a frame between detector and renderer

use crate::config::{AssistConfig, ModuleKind};
use crate::error::Result;
use crate::overlay::OverlayBox;
use crate::postprocessing::Postprocessor;
use crate::types::{ClassNames, FrameSize, RawDetection};
use centroidtrack::{Tracker, WindowLength};
use serde::Serialize;

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrameOutput {
    pub overlays: Vec<OverlayBox>,
    /// Whether any detection survived postprocessing this frame
    pub has_detections: bool,
}

/// Module selected once at startup
pub enum AssistModule {
    /// Frame goes through untouched
    Passthrough,
    ObjectDetection(SafetyAssist),
}

impl AssistModule {
    pub fn from_config(config: &AssistConfig) -> Result<Self> {
        Self::with_class_names(config, ClassNames::default())
    }

    pub fn with_class_names(config: &AssistConfig, class_names: ClassNames) -> Result<Self> {
        config.validate()?;
        let module = match config.module {
            ModuleKind::Passthrough => AssistModule::Passthrough,
            ModuleKind::ObjectDetection => {
                AssistModule::ObjectDetection(SafetyAssist::new(config, class_names)?)
            }
        };
        log::info!("Assist module: {} (source: {})", config.module, config.source);
        Ok(module)
    }

    pub fn kind(&self) -> ModuleKind {
        match self {
            AssistModule::Passthrough => ModuleKind::Passthrough,
            AssistModule::ObjectDetection(_) => ModuleKind::ObjectDetection,
        }
    }

    pub fn process_frame(
        &mut self,
        raw: &[RawDetection],
        frame: FrameSize,
    ) -> Result<FrameOutput> {
        match self {
            AssistModule::Passthrough => Ok(FrameOutput::default()),
            AssistModule::ObjectDetection(assist) => assist.process_frame(raw, frame),
        }
    }
}

/// Object detection overlay, optionally with tracking and trend coloring
pub struct SafetyAssist {
    postprocessor: Postprocessor,
    /// Present only in safety mode
    tracker: Option<Tracker>,
    window: WindowLength,
}

impl SafetyAssist {
    pub fn new(config: &AssistConfig, class_names: ClassNames) -> Result<Self> {
        let postprocessor =
            Postprocessor::new(&config.detection, class_names).with_labels(&config.labels);
        let tracker = if config.safety_assist {
            Some(Tracker::new(config.tracker.clone())?)
        } else {
            None
        };

        Ok(Self {
            postprocessor,
            tracker,
            window: config.window_length(),
        })
    }

    pub fn tracker(&self) -> Option<&Tracker> {
        self.tracker.as_ref()
    }

    pub fn is_safety_mode(&self) -> bool {
        self.tracker.is_some()
    }

    pub fn process_frame(
        &mut self,
        raw: &[RawDetection],
        frame: FrameSize,
    ) -> Result<FrameOutput> {
        let detections = self.postprocessor.process(raw, frame);
        let has_detections = !detections.is_empty();

        let overlays = match self.tracker.as_mut() {
            Some(tracker) => {
                tracker.update(&detections, self.window)?;
                OverlayBox::from_tracks(tracker.tracks())
            }
            None => {
                let names = self.postprocessor.class_names();
                OverlayBox::from_detections(&detections, |label| {
                    names.id_of(label).unwrap_or_default()
                })
            }
        };

        log::trace!(
            "frame: {} raw, {} kept, {} overlays",
            raw.len(),
            detections.len(),
            overlays.len()
        );

        Ok(FrameOutput {
            overlays,
            has_detections,
        })
    }
}

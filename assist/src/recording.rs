//! Output clip gating

use crate::config::RecordingConfig;

/// Decides which frames go into the output clip: everything while objects
/// are seen, plus a tail of idle frames after the last detection.
#[derive(Debug, Clone)]
pub struct ClipRecorder {
    max_idle_frames: u32,
    idle_frames: u32,
    frames_written: u64,
}

impl ClipRecorder {
    pub fn new(max_idle_frames: u32) -> Self {
        Self {
            max_idle_frames,
            idle_frames: 0,
            frames_written: 0,
        }
    }

    pub fn from_config(config: &RecordingConfig) -> Self {
        Self::new(config.max_idle_frames)
    }

    /// Feed one frame; returns whether it should be written
    pub fn should_write(&mut self, has_detections: bool) -> bool {
        if has_detections {
            self.idle_frames = 0;
        } else {
            self.idle_frames = self.idle_frames.saturating_add(1);
        }

        let write = self.idle_frames < self.max_idle_frames;
        if write {
            self.frames_written += 1;
        }
        write
    }

    pub fn idle_frames(&self) -> u32 {
        self.idle_frames
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }
}

/// Replay recorded detector output through the safety assist pipeline
///
/// Reads a JSON file of per-frame raw detections, runs each frame through the
/// configured assist module and logs the overlays a renderer would draw,
/// plus which frames would be written to the output clip.
///
/// Input format:
///   { "frame_size": {"width": 1280, "height": 720},
///     "frames": [[{"class_id": 0, "confidence": 0.9, "center_x": 0.5,
///                  "center_y": 0.5, "width": 0.1, "height": 0.3}], ...] }
///
/// Usage:
///   cargo run --example replay_detections -- [--config cfg.json] [--input 0|video.mp4]
///       [--classes person,truck] [--safety] [--passthrough] <detections.json>
///
/// Examples:
///   RUST_LOG=debug cargo run --example replay_detections -- --safety --input 0 gate.json
///   cargo run --example replay_detections -- --config assist.json gate.json
///   cargo run --example replay_detections -- --classes car,truck gate.json  # labels only, no tracking
use anyhow::{bail, Context, Result};
use safety_assist::{
    AssistConfig, AssistModule, ClipRecorder, FrameSize, ModuleKind, RawDetection,
    RecordingConfig, VideoSource,
};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct Replay {
    #[serde(default)]
    frame_size: FrameSize,
    frames: Vec<Vec<RawDetection>>,
}

struct Args {
    config: Option<PathBuf>,
    input: Option<String>,
    classes: Option<String>,
    safety: bool,
    passthrough: bool,
    detections: PathBuf,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Args> {
    let mut args = args.into_iter();
    let mut config = None;
    let mut input = None;
    let mut classes = None;
    let mut safety = false;
    let mut passthrough = false;
    let mut detections = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                config = Some(PathBuf::from(args.next().context("--config needs a path")?))
            }
            "--input" => input = Some(args.next().context("--input needs a value")?),
            "--classes" => classes = Some(args.next().context("--classes needs a list")?),
            "--safety" => safety = true,
            "--passthrough" => passthrough = true,
            other if other.starts_with("--") => bail!("unknown flag {}", other),
            other => detections = Some(PathBuf::from(other)),
        }
    }

    Ok(Args {
        config,
        input,
        classes,
        safety,
        passthrough,
        detections: detections.context("missing detections file")?,
    })
}

fn build_config(args: &Args) -> Result<AssistConfig> {
    let mut config = match &args.config {
        Some(path) => AssistConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AssistConfig {
            module: ModuleKind::ObjectDetection,
            recording: Some(RecordingConfig::new("result.mp4")),
            ..AssistConfig::default()
        },
    };

    if let Some(input) = &args.input {
        config.source = VideoSource::parse(input);
    }
    if let Some(classes) = &args.classes {
        config.labels = AssistConfig::parse_labels(classes);
    }
    if args.safety {
        config.safety_assist = true;
    }
    if args.passthrough {
        config.module = ModuleKind::Passthrough;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args(env::args().skip(1))?;
    let config = build_config(&args)?;

    let text = std::fs::read_to_string(&args.detections)
        .with_context(|| format!("reading {}", args.detections.display()))?;
    let replay: Replay = serde_json::from_str(&text)?;

    log::info!(
        "Replaying {} frames at {}x{} (safety assist: {}, window: {})",
        replay.frames.len(),
        replay.frame_size.width,
        replay.frame_size.height,
        config.safety_assist,
        config.window_length()
    );

    let mut module = AssistModule::from_config(&config)?;
    let mut recorder = config.recording.as_ref().map(ClipRecorder::from_config);

    for (index, raw) in replay.frames.iter().enumerate() {
        let output = module.process_frame(raw, replay.frame_size)?;

        for overlay in &output.overlays {
            let id = overlay
                .track_id
                .map(|id| format!("#{} ", id))
                .unwrap_or_default();
            log::info!(
                "frame {:>5}: {}{} at {} rgb{:?}",
                index,
                id,
                overlay.label,
                overlay.bbox,
                overlay.color
            );
        }

        if let Some(recorder) = recorder.as_mut() {
            if !recorder.should_write(output.has_detections) {
                log::debug!("frame {:>5}: skipped in clip", index);
            }
        }
    }

    if let Some(recorder) = &recorder {
        log::info!(
            "{} of {} frames would be written to the clip",
            recorder.frames_written(),
            replay.frames.len()
        );
    }
    if let AssistModule::ObjectDetection(assist) = &module {
        if let Some(tracker) = assist.tracker() {
            log::info!(
                "{} live tracks after {} updates",
                tracker.len(),
                tracker.step_count()
            );
        }
    }

    Ok(())
}

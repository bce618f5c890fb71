use anyhow::{Context, Result};
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use pushup_trainer::camera::OpenCvCamera;
use pushup_trainer::config::Config;
use pushup_trainer::pose::{preprocess_for_movenet, Detection, PoseDetector};
use pushup_trainer::recorder::SessionRecorder;
use pushup_trainer::render::{draw_overlay, MinifbRenderer, OverlayOptions};
use pushup_trainer::trainer::{FeedbackKind, FrameReport, Trainer};

const CONFIG_PATH: &str = "config.toml";
const WINDOW_TITLE: &str = "Smart Push-Up Trainer";

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

type LogFile = Arc<Mutex<std::io::BufWriter<std::fs::File>>>;

fn open_log_file() -> Result<LogFile> {
    std::fs::create_dir_all("logs")?;
    let ts = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let path = format!("logs/trainer_{}.log", ts);
    let file = std::fs::File::create(&path)?;
    eprintln!("Log: {}", path);
    Ok(Arc::new(Mutex::new(std::io::BufWriter::new(file))))
}

macro_rules! log {
    ($logfile:expr, $($arg:tt)*) => {{
        let msg = format!("[{}] {}", chrono::Local::now().format("%H:%M:%S%.3f"), format!($($arg)*));
        eprintln!("{}", msg);
        if let Ok(mut f) = $logfile.lock() {
            let _ = writeln!(f, "{}", msg);
            let _ = f.flush();
        }
    }};
}

// ---------------------------------------------------------------------------
// Main loop
// ---------------------------------------------------------------------------

/// Usage: pushup_trainer [video_path]
/// 引数なしならカメラ、動画パスを渡すと録画済みセッションを再生して判定する
fn parse_video_arg() -> Option<String> {
    std::env::args().nth(1)
}

fn log_transition(logfile: &LogFile, report: &FrameReport, frame_index: u64) {
    if report.rep_completed() {
        log!(logfile, "frame {}: rep counted, total {}", frame_index, report.rep_count);
    } else if report.phase_changed() {
        log!(
            logfile,
            "frame {}: {} -> {} ({})",
            frame_index,
            report.previous_phase.label(),
            report.phase.label(),
            report.verdict.text
        );
    }
}

fn main() -> Result<()> {
    let config = Config::load_or_default(CONFIG_PATH)?;
    config.validate().context("Invalid configuration")?;
    let mut trainer = Trainer::new(config.thresholds)?;

    let logfile = open_log_file()?;
    log!(logfile, "Push-Up Trainer {}", env!("GIT_VERSION"));
    log!(logfile, "Thresholds: {:?}", config.thresholds);
    log!(
        logfile,
        "Detection: model={}, min_confidence={}",
        config.model.path,
        config.model.min_detection_confidence
    );

    let mut camera = match parse_video_arg() {
        Some(path) => {
            log!(logfile, "Source: video {}", path);
            OpenCvCamera::open_file(&path)?
        }
        None => {
            log!(logfile, "Source: camera {}", config.camera.index);
            OpenCvCamera::open(&config.camera)?
        }
    };
    let (width, height) = camera.resolution();
    log!(logfile, "Resolution: {}x{} @ {:.1} fps", width, height, camera.fps());

    let mut detector = PoseDetector::new(&config.model.path, config.model.min_detection_confidence)?;
    log!(logfile, "Model loaded");

    let mut renderer = if config.debug.view {
        println!("Press Q or ESC to exit");
        Some(MinifbRenderer::new(WINDOW_TITLE, width as usize, height as usize)?)
    } else {
        None
    };

    let mut recorder = if config.recording.enabled {
        let recorder = SessionRecorder::new(&config.recording, width, height)?;
        log!(logfile, "Recording to {}", recorder.path());
        Some(recorder)
    } else {
        None
    };

    let overlay = OverlayOptions {
        angles: config.debug.angles,
        skeleton: config.debug.skeleton,
        skeleton_min_score: config.debug.skeleton_min_score,
    };

    let session_start = Instant::now();
    let mut frame_index = 0u64;
    let mut frame_count = 0u32;
    let mut fps_timer = Instant::now();
    let mut body_present = false;

    loop {
        if let Some(ref r) = renderer {
            if !r.is_open() {
                log!(logfile, "Window closed");
                break;
            }
        }

        let mut frame = match camera.read_frame() {
            Ok(f) => f,
            Err(e) => {
                log!(logfile, "Capture ended: {}", e);
                break;
            }
        };

        // 推論に失敗しても録画の確定とサマリーは残す
        let detection = match preprocess_for_movenet(&frame).and_then(|input| detector.detect_body(input)) {
            Ok(d) => d,
            Err(e) => {
                log!(logfile, "Inference failed at frame {}: {}", frame_index, e);
                break;
            }
        };
        let report = trainer.process(&detection);

        let detected = matches!(detection, Detection::Detected(_));
        if detected != body_present {
            log!(logfile, "frame {}: body {}", frame_index, if detected { "detected" } else { "lost" });
            body_present = detected;
        }
        if report.verdict.kind != FeedbackKind::NoBodyDetected {
            log_transition(&logfile, &report, frame_index);
        }

        draw_overlay(&mut frame, &report, detection.landmarks(), overlay)?;

        if let Some(ref mut rec) = recorder {
            if let Err(e) = rec.write(&frame) {
                log!(logfile, "Recording failed at frame {}: {}", frame_index, e);
                break;
            }
        }
        if let Some(ref mut r) = renderer {
            r.draw_frame(&frame)?;
            r.update()?;
        }

        frame_index += 1;
        frame_count += 1;
        let elapsed = fps_timer.elapsed().as_secs_f32();
        if elapsed >= 5.0 {
            log!(
                logfile,
                "FPS: {:.1}, reps: {}, phase: {}",
                frame_count as f32 / elapsed,
                report.rep_count,
                report.phase.label()
            );
            frame_count = 0;
            fps_timer = Instant::now();
        }
    }

    if let Some(rec) = recorder {
        let path = rec.path().to_string();
        let written = rec.finish()?;
        log!(logfile, "Saved {} frames to {}", written, path);
    }

    log!(
        logfile,
        "Session finished: {} reps, {} frames, {:.1}s",
        trainer.state().rep_count,
        frame_index,
        session_start.elapsed().as_secs_f32()
    );
    Ok(())
}

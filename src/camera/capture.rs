use anyhow::{Context, Result};
use opencv::{
    core::Mat,
    prelude::*,
    videoio::{self, VideoCapture, VideoCaptureAPIs},
};
use std::path::Path;

use crate::config::CameraConfig;

/// OpenCVを使用したフレーム入力（カメラまたは録画ファイル）
pub struct OpenCvCamera {
    capture: VideoCapture,
    width: u32,
    height: u32,
    fps: f64,
}

impl OpenCvCamera {
    /// 設定に従ってカメラを開く
    pub fn open(config: &CameraConfig) -> Result<Self> {
        Self::open_with_config(config.index, Some(config.width), Some(config.height), Some(config.fps))
    }

    /// 解像度とFPSを指定してカメラを開く
    pub fn open_with_config(index: i32, width: Option<u32>, height: Option<u32>, fps: Option<u32>) -> Result<Self> {
        let mut capture =
            VideoCapture::new(index, VideoCaptureAPIs::CAP_ANY as i32).context("Failed to open camera")?;

        if !capture.is_opened()? {
            anyhow::bail!("Camera {} is not available", index);
        }

        // 解像度を設定
        if let Some(w) = width {
            capture.set(videoio::CAP_PROP_FRAME_WIDTH, w as f64)?;
        }
        if let Some(h) = height {
            capture.set(videoio::CAP_PROP_FRAME_HEIGHT, h as f64)?;
        }
        if let Some(f) = fps {
            capture.set(videoio::CAP_PROP_FPS, f as f64)?;
        }
        capture.set(videoio::CAP_PROP_BUFFERSIZE, 1.0)?;

        Self::from_capture(capture)
    }

    /// 録画済みの動画ファイルを開く（セッションの再生・検証用）
    pub fn open_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .to_str()
            .with_context(|| format!("Non UTF-8 video path: {:?}", path))?;
        let capture = VideoCapture::from_file(name, VideoCaptureAPIs::CAP_ANY as i32)
            .with_context(|| format!("Failed to open video {}", name))?;

        if !capture.is_opened()? {
            anyhow::bail!("Video {} could not be opened", name);
        }

        Self::from_capture(capture)
    }

    fn from_capture(capture: VideoCapture) -> Result<Self> {
        let width = capture.get(videoio::CAP_PROP_FRAME_WIDTH)? as u32;
        let height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT)? as u32;
        let fps = capture.get(videoio::CAP_PROP_FPS)?;

        Ok(Self {
            capture,
            width,
            height,
            fps,
        })
    }

    /// 解像度を取得
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// デバイスが報告するFPS（不明な場合は0）
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// フレームを読み込む（BGR形式）。ファイル終端では空フレームとしてエラー
    pub fn read_frame(&mut self) -> Result<Mat> {
        let mut frame = Mat::default();
        self.capture
            .read(&mut frame)
            .context("Failed to read frame")?;

        if frame.empty() {
            anyhow::bail!("Empty frame received");
        }

        Ok(frame)
    }
}

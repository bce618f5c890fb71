use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::trainer::Thresholds;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub recording: RecordingConfig,
    #[serde(default)]
    pub debug: DebugConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    /// カメラデバイス番号
    #[serde(default)]
    pub index: i32,
    #[serde(default = "default_camera_width")]
    pub width: u32,
    #[serde(default = "default_camera_height")]
    pub height: u32,
    #[serde(default = "default_camera_fps")]
    pub fps: u32,
}

fn default_camera_width() -> u32 { 640 }
fn default_camera_height() -> u32 { 480 }
fn default_camera_fps() -> u32 { 30 }

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            width: default_camera_width(),
            height: default_camera_height(),
            fps: default_camera_fps(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// MoveNet ONNXモデルのパス
    #[serde(default = "default_model_path")]
    pub path: String,
    /// 必須関節の平均スコアがこれ未満なら人物なしとみなす
    #[serde(default = "default_min_detection_confidence")]
    pub min_detection_confidence: f32,
}

fn default_model_path() -> String { "models/movenet_lightning.onnx".to_string() }
fn default_min_detection_confidence() -> f32 { 0.5 }

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            min_detection_confidence: default_min_detection_confidence(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_recording_fps")]
    pub fps: f64,
    /// 4文字のFourCC
    #[serde(default = "default_fourcc")]
    pub fourcc: String,
}

fn default_true() -> bool { true }
fn default_output_path() -> String { "pushup_session_smart.mp4".to_string() }
fn default_recording_fps() -> f64 { 20.0 }
fn default_fourcc() -> String { "mp4v".to_string() }

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            output_path: default_output_path(),
            fps: default_recording_fps(),
            fourcc: default_fourcc(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DebugConfig {
    /// プレビューウィンドウを表示
    #[serde(default = "default_true")]
    pub view: bool,
    /// BACK / ELBOW 角度を画面下に表示
    #[serde(default = "default_true")]
    pub angles: bool,
    /// 骨格を描画
    #[serde(default = "default_true")]
    pub skeleton: bool,
    /// このスコア未満の関節とその骨は描かない
    #[serde(default = "default_skeleton_min_score")]
    pub skeleton_min_score: f32,
}

fn default_skeleton_min_score() -> f32 { 0.5 }

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            view: true,
            angles: true,
            skeleton: true,
            skeleton_min_score: default_skeleton_min_score(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// ファイルがなければデフォルト設定。パースエラーは握りつぶさない
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// フレームループ開始前の検証
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds.validate()?;

        let confidence = self.model.min_detection_confidence;
        if !(0.0..=1.0).contains(&confidence) {
            return Err(ConfigError::ConfidenceOutOfRange {
                name: "min_detection_confidence",
                value: confidence,
            });
        }

        let min_score = self.debug.skeleton_min_score;
        if !(0.0..=1.0).contains(&min_score) {
            return Err(ConfigError::ConfidenceOutOfRange {
                name: "skeleton_min_score",
                value: min_score,
            });
        }

        if self.recording.enabled {
            if !(self.recording.fps.is_finite() && self.recording.fps > 0.0) {
                return Err(ConfigError::Recording(format!(
                    "fps must be positive, got {}",
                    self.recording.fps
                )));
            }
            if self.recording.fourcc.chars().count() != 4 {
                return Err(ConfigError::Recording(format!(
                    "fourcc must be 4 characters, got {:?}",
                    self.recording.fourcc
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.thresholds, Thresholds::default());
        assert_eq!(config.camera.index, 0);
        assert_eq!(config.model.path, "models/movenet_lightning.onnx");
        assert_eq!(config.recording.output_path, "pushup_session_smart.mp4");
        assert_eq!(config.recording.fps, 20.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_thresholds() {
        let config = Config::parse(
            r#"
            [thresholds]
            tuck_angle_max = 70.0
            visibility_threshold = 0.5

            [recording]
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(config.thresholds.tuck_angle_max, 70.0);
        assert_eq!(config.thresholds.visibility_threshold, 0.5);
        assert_eq!(config.thresholds.down_elbow_angle_max, 90.0);
        assert!(!config.recording.enabled);
    }

    #[test]
    fn test_validate_rejects_negative_angle() {
        let config = Config::parse("[thresholds]\nready_back_angle_min = -10.0\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::AngleOutOfRange { name: "ready_back_angle_min", .. })
        ));
    }

    #[test]
    fn test_validate_recording() {
        let mut config = Config::default();
        config.recording.fourcc = "h264x".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Recording(_))));

        // 録画しないなら録画設定は問わない
        config.recording.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_detection_confidence() {
        let mut config = Config::default();
        config.model.min_detection_confidence = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_skeleton_min_score() {
        let config = Config::parse("[debug]\nskeleton_min_score = 0.3\n").unwrap();
        assert_eq!(config.debug.skeleton_min_score, 0.3);
        assert!(config.validate().is_ok());
        assert_eq!(Config::default().debug.skeleton_min_score, 0.5);

        let config = Config::parse("[debug]\nskeleton_min_score = 1.5\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ConfidenceOutOfRange { name: "skeleton_min_score", .. })
        ));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = Config::load_or_default("does/not/exist.toml").unwrap();
        assert_eq!(config.thresholds, Thresholds::default());
        assert!(matches!(Config::load("does/not/exist.toml"), Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_example_config_matches_defaults() {
        let config = Config::parse(include_str!("../config.example.toml")).unwrap();
        assert_eq!(config.thresholds, Thresholds::default());
        assert_eq!(config.recording.fourcc, "mp4v");
        assert!(config.validate().is_ok());
    }
}

//! トレーナーのドメインエラー
//!
//! カメラ・モデル・書き出しなどの周辺処理は `anyhow` で伝播し、
//! 設定と入力データの不備だけをここで型付けする。

use std::path::PathBuf;
use thiserror::Error;

use crate::pose::Joint;

/// 起動時に検出される設定エラー（致命的: フレームループは開始しない）
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 角度の閾値が 0〜180° の範囲外、または非有限値
    #[error("{name} must be a finite angle within 0..=180 degrees, got {value}")]
    AngleOutOfRange { name: &'static str, value: f32 },

    /// 信頼度系の閾値が 0〜1 の範囲外
    #[error("{name} must be within 0.0..=1.0, got {value}")]
    ConfidenceOutOfRange { name: &'static str, value: f32 },

    /// 下降判定と上昇判定の閾値が逆転している（ヒステリシス幅がない）
    #[error("down_elbow_angle_max ({down}) must be below up_elbow_angle_min ({up})")]
    InvertedHysteresis { down: f32, up: f32 },

    /// 録画設定の不備
    #[error("invalid recording setting: {0}")]
    Recording(String),

    /// 設定ファイルの読み込み失敗
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 設定ファイルのパース失敗
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// 必須関節がランドマーク集合に含まれていない
///
/// フレームループには伝播させず、`Detection::NotDetected` として扱う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("missing required landmark: {joint:?}")]
pub struct MissingLandmark {
    pub joint: Joint,
}

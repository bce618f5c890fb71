use serde::Deserialize;

use crate::error::ConfigError;

use super::feedback::{FeedbackKind, FeedbackVerdict};
use super::features::AngleFeatures;

/// レップ判定のフェーズ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// プランク姿勢を待っている
    #[default]
    AwaitingReady,
    /// 腕が伸びた状態で下降を監視中
    Up,
    /// 下降済み、腕が伸び切るのを待っている
    Down,
}

impl Phase {
    /// HUD 表示用ラベル
    pub fn label(self) -> &'static str {
        match self {
            Phase::AwaitingReady => "GET_READY",
            Phase::Up => "UP",
            Phase::Down => "DOWN",
        }
    }
}

/// フレームをまたいで保持される唯一の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrainerState {
    pub phase: Phase,
    pub rep_count: u32,
}

impl TrainerState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// 判定閾値（角度は度数）
///
/// 比較はすべて厳密な不等号で、境界値ちょうどでは遷移しない。
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Thresholds {
    #[serde(default = "default_visibility_threshold")]
    pub visibility_threshold: f32,
    #[serde(default = "default_ready_back_angle_min")]
    pub ready_back_angle_min: f32,
    #[serde(default = "default_ready_elbow_angle_min")]
    pub ready_elbow_angle_min: f32,
    #[serde(default = "default_down_elbow_angle_max")]
    pub down_elbow_angle_max: f32,
    /// Down → AwaitingReady の判定に使う
    #[serde(default = "default_up_elbow_angle_min")]
    pub up_elbow_angle_min: f32,
    #[serde(default = "default_tuck_angle_max")]
    pub tuck_angle_max: f32,
}

fn default_visibility_threshold() -> f32 { 0.8 }
fn default_ready_back_angle_min() -> f32 { 145.0 }
fn default_ready_elbow_angle_min() -> f32 { 155.0 }
fn default_down_elbow_angle_max() -> f32 { 90.0 }
fn default_up_elbow_angle_min() -> f32 { 155.0 }
fn default_tuck_angle_max() -> f32 { 65.0 }

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            visibility_threshold: default_visibility_threshold(),
            ready_back_angle_min: default_ready_back_angle_min(),
            ready_elbow_angle_min: default_ready_elbow_angle_min(),
            down_elbow_angle_max: default_down_elbow_angle_max(),
            up_elbow_angle_min: default_up_elbow_angle_min(),
            tuck_angle_max: default_tuck_angle_max(),
        }
    }
}

impl Thresholds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.visibility_threshold) {
            return Err(ConfigError::ConfidenceOutOfRange {
                name: "visibility_threshold",
                value: self.visibility_threshold,
            });
        }

        for (name, value) in [
            ("ready_back_angle_min", self.ready_back_angle_min),
            ("ready_elbow_angle_min", self.ready_elbow_angle_min),
            ("down_elbow_angle_max", self.down_elbow_angle_max),
            ("up_elbow_angle_min", self.up_elbow_angle_min),
            ("tuck_angle_max", self.tuck_angle_max),
        ] {
            // NaN も範囲外として弾かれる
            if !(0.0..=180.0).contains(&value) {
                return Err(ConfigError::AngleOutOfRange { name, value });
            }
        }

        if self.down_elbow_angle_max >= self.up_elbow_angle_min {
            return Err(ConfigError::InvertedHysteresis {
                down: self.down_elbow_angle_max,
                up: self.up_elbow_angle_min,
            });
        }

        Ok(())
    }

    /// 脇の開きに基づくフォーム判定
    pub fn form_verdict(&self, features: &AngleFeatures) -> FeedbackKind {
        if features.left_tuck_angle > self.tuck_angle_max
            || features.right_tuck_angle > self.tuck_angle_max
        {
            FeedbackKind::TuckElbows
        } else {
            FeedbackKind::GoodForm
        }
    }
}

/// 状態機械への1フレーム分の入力
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Observation {
    Body(AngleFeatures),
    NoBody,
}

/// 1フレーム分の状態遷移
///
/// 人物が検出されなければフェーズに関わらず AwaitingReady に戻す（回数は維持）。
/// 可視度は AwaitingReady からの開始条件でのみ使う。
pub fn step(
    state: TrainerState,
    observation: &Observation,
    thresholds: &Thresholds,
) -> (TrainerState, FeedbackVerdict) {
    let features = match observation {
        Observation::Body(features) => features,
        Observation::NoBody => {
            let next = TrainerState {
                phase: Phase::AwaitingReady,
                ..state
            };
            return (next, FeedbackKind::NoBodyDetected.into());
        }
    };

    let form = thresholds.form_verdict(features);

    let (phase, rep_count, kind) = match state.phase {
        Phase::AwaitingReady => {
            if features.visible
                && features.back_angle > thresholds.ready_back_angle_min
                && features.elbow_angle > thresholds.ready_elbow_angle_min
            {
                (Phase::Up, state.rep_count, form)
            } else {
                (Phase::AwaitingReady, state.rep_count, FeedbackKind::GetIntoPosition)
            }
        }
        Phase::Up => {
            if features.elbow_angle < thresholds.down_elbow_angle_max {
                (Phase::Down, state.rep_count, form)
            } else {
                (Phase::Up, state.rep_count, form)
            }
        }
        Phase::Down => {
            if features.elbow_angle > thresholds.up_elbow_angle_min {
                (Phase::AwaitingReady, state.rep_count.saturating_add(1), FeedbackKind::RepCounted)
            } else {
                (Phase::Down, state.rep_count, form)
            }
        }
    };

    (TrainerState { phase, rep_count }, kind.into())
}

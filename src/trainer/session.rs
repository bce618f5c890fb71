use crate::error::ConfigError;
use crate::pose::Detection;

use super::feedback::FeedbackVerdict;
use super::features::{extract, AngleFeatures};
use super::state::{step, Observation, Phase, Thresholds, TrainerState};

/// 1フレーム処理後にレンダラーへ渡す結果
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub previous_phase: Phase,
    pub phase: Phase,
    pub rep_count: u32,
    pub verdict: FeedbackVerdict,
    /// デバッグ表示用。人物未検出のフレームでは None
    pub features: Option<AngleFeatures>,
}

impl FrameReport {
    /// このフレームでレップが確定したか
    pub fn rep_completed(&self) -> bool {
        self.previous_phase == Phase::Down && self.phase == Phase::AwaitingReady && self.features.is_some()
    }

    pub fn phase_changed(&self) -> bool {
        self.previous_phase != self.phase
    }
}

/// 1セッション分のレップカウンタ
pub struct Trainer {
    thresholds: Thresholds,
    state: TrainerState,
}

impl Trainer {
    /// 閾値を検証して作成。不正な設定ではセッションを開始しない
    pub fn new(thresholds: Thresholds) -> Result<Self, ConfigError> {
        thresholds.validate()?;
        Ok(Self {
            thresholds,
            state: TrainerState::new(),
        })
    }

    pub fn state(&self) -> TrainerState {
        self.state
    }

    /// 検出結果を1フレーム分処理する
    pub fn process(&mut self, detection: &Detection) -> FrameReport {
        let features = detection
            .landmarks()
            .map(|landmarks| extract(landmarks, self.thresholds.visibility_threshold));
        self.observe(features)
    }

    /// 特徴量（None は人物未検出）から1フレーム分処理する
    pub fn observe(&mut self, features: Option<AngleFeatures>) -> FrameReport {
        let observation = match features {
            Some(features) => Observation::Body(features),
            None => Observation::NoBody,
        };

        let previous_phase = self.state.phase;
        let (next, verdict) = step(self.state, &observation, &self.thresholds);
        self.state = next;

        FrameReport {
            previous_phase,
            phase: next.phase,
            rep_count: next.rep_count,
            verdict,
            features,
        }
    }

    pub fn reset(&mut self) {
        self.state = TrainerState::new();
    }
}

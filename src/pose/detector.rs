use anyhow::{Context, Result};
use ndarray::Array4;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;

use super::keypoint::{KeypointIndex, LandmarkPoint, Pose};
use super::landmarks::Detection;

/// MoveNet を使用した姿勢検出器
pub struct PoseDetector {
    session: Session,
    min_detection_confidence: f32,
}

impl PoseDetector {
    /// ONNXモデルを読み込んで初期化
    pub fn new<P: AsRef<Path>>(model_path: P, min_detection_confidence: f32) -> Result<Self> {
        let builder = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?;

        #[cfg(feature = "cuda")]
        let builder = {
            eprintln!("[ort] Attempting CUDA execution provider...");
            builder.with_execution_providers([ort::execution_providers::CUDAExecutionProvider::default().build()])?
        };

        let session = builder
            .commit_from_file(model_path.as_ref())
            .context("Failed to load ONNX model")?;

        Ok(Self {
            session,
            min_detection_confidence,
        })
    }

    /// 前処理済みテンソルから姿勢を検出
    ///
    /// 入力: [1, 192, 192, 3] の f32 テンソル
    /// 出力: Pose (17キーポイント)
    pub fn detect(&mut self, input: Array4<f32>) -> Result<Pose> {
        let input_tensor = Tensor::from_array(input)?;
        let outputs = self
            .session
            .run(ort::inputs!["serving_default_input_0" => input_tensor])
            .context("Inference failed")?;

        // MoveNet の出力は [1, 1, 17, 3] (y, x, score)
        let output: ndarray::ArrayViewD<f32> = outputs["StatefulPartitionedCall_0"]
            .try_extract_array()
            .context("Failed to extract output tensor")?;

        let mut keypoints = [LandmarkPoint::default(); KeypointIndex::COUNT];

        for (i, keypoint) in keypoints.iter_mut().enumerate() {
            let y = output[[0, 0, i, 0]];
            let x = output[[0, 0, i, 1]];
            let score = output[[0, 0, i, 2]];

            *keypoint = LandmarkPoint::new(x, y, score);
        }

        Ok(Pose::new(keypoints))
    }

    /// 姿勢を検出し、人物の有無を判定して返す
    pub fn detect_body(&mut self, input: Array4<f32>) -> Result<Detection> {
        let pose = self.detect(input)?;
        Ok(Detection::from_pose(&pose, self.min_detection_confidence))
    }
}

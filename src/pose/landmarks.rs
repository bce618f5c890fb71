use std::collections::HashMap;

use crate::error::MissingLandmark;

use super::keypoint::{KeypointIndex, LandmarkPoint, Pose};

/// 腕立て伏せ判定に必要な 10 関節
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Joint {
    LeftShoulder = 0,
    RightShoulder = 1,
    LeftElbow = 2,
    RightElbow = 3,
    LeftWrist = 4,
    RightWrist = 5,
    LeftHip = 6,
    RightHip = 7,
    LeftAnkle = 8,
    RightAnkle = 9,
}

impl Joint {
    pub const COUNT: usize = 10;

    pub const ALL: [Joint; Joint::COUNT] = [
        Joint::LeftShoulder,
        Joint::RightShoulder,
        Joint::LeftElbow,
        Joint::RightElbow,
        Joint::LeftWrist,
        Joint::RightWrist,
        Joint::LeftHip,
        Joint::RightHip,
        Joint::LeftAnkle,
        Joint::RightAnkle,
    ];

    /// 可視度ゲートの対象（手首・足首は対象外）
    pub const GATED: [Joint; 6] = [
        Joint::LeftShoulder,
        Joint::RightShoulder,
        Joint::LeftElbow,
        Joint::RightElbow,
        Joint::LeftHip,
        Joint::RightHip,
    ];

    /// MoveNet 上の対応キーポイント
    pub fn keypoint(self) -> KeypointIndex {
        match self {
            Joint::LeftShoulder => KeypointIndex::LeftShoulder,
            Joint::RightShoulder => KeypointIndex::RightShoulder,
            Joint::LeftElbow => KeypointIndex::LeftElbow,
            Joint::RightElbow => KeypointIndex::RightElbow,
            Joint::LeftWrist => KeypointIndex::LeftWrist,
            Joint::RightWrist => KeypointIndex::RightWrist,
            Joint::LeftHip => KeypointIndex::LeftHip,
            Joint::RightHip => KeypointIndex::RightHip,
            Joint::LeftAnkle => KeypointIndex::LeftAnkle,
            Joint::RightAnkle => KeypointIndex::RightAnkle,
        }
    }
}

/// 1フレーム分の必須関節ランドマーク
///
/// 構築時点で 10 関節すべてが揃っていることが保証される。
/// 欠けている関節は省略ではなく `visibility` の低さで表現される。
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSet {
    points: [LandmarkPoint; Joint::COUNT],
}

impl LandmarkSet {
    pub fn new(points: [LandmarkPoint; Joint::COUNT]) -> Self {
        Self { points }
    }

    pub fn get(&self, joint: Joint) -> &LandmarkPoint {
        &self.points[joint as usize]
    }

    /// 推定器の姿勢から必須関節を取り出す
    pub fn from_pose(pose: &Pose) -> Self {
        Self {
            points: Joint::ALL.map(|joint| *pose.get(joint.keypoint())),
        }
    }

    /// 名前付きの関節マップから構築する。1つでも欠けていればエラー
    pub fn from_map(map: &HashMap<Joint, LandmarkPoint>) -> Result<Self, MissingLandmark> {
        let mut points = [LandmarkPoint::default(); Joint::COUNT];
        for joint in Joint::ALL {
            points[joint as usize] = *map.get(&joint).ok_or(MissingLandmark { joint })?;
        }
        Ok(Self { points })
    }

    pub fn iter(&self) -> impl Iterator<Item = (Joint, &LandmarkPoint)> {
        Joint::ALL.into_iter().zip(self.points.iter())
    }

    /// 必須関節の平均可視度
    pub fn mean_visibility(&self) -> f32 {
        let sum: f32 = self.points.iter().map(|p| p.visibility).sum();
        sum / Joint::COUNT as f32
    }
}

/// 推定器からの1フレーム分の入力
///
/// 人物が映っていないことは例外ではなく通常の入力として扱う。
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    Detected(LandmarkSet),
    NotDetected,
}

impl Detection {
    /// 必須関節の平均可視度が `min_confidence` 未満なら未検出とみなす
    pub fn from_pose(pose: &Pose, min_confidence: f32) -> Self {
        let landmarks = LandmarkSet::from_pose(pose);
        if landmarks.mean_visibility() < min_confidence {
            Detection::NotDetected
        } else {
            Detection::Detected(landmarks)
        }
    }

    /// 部分的な関節マップから。欠損は未検出として回復する
    pub fn from_map(map: &HashMap<Joint, LandmarkPoint>) -> Self {
        match LandmarkSet::from_map(map) {
            Ok(landmarks) => Detection::Detected(landmarks),
            Err(_) => Detection::NotDetected,
        }
    }

    pub fn landmarks(&self) -> Option<&LandmarkSet> {
        match self {
            Detection::Detected(landmarks) => Some(landmarks),
            Detection::NotDetected => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_map(visibility: f32) -> HashMap<Joint, LandmarkPoint> {
        Joint::ALL
            .iter()
            .enumerate()
            .map(|(i, &joint)| (joint, LandmarkPoint::new(i as f32 * 0.05, 0.5, visibility)))
            .collect()
    }

    #[test]
    fn test_from_pose_maps_movenet_indices() {
        let mut pose = Pose::default();
        pose.keypoints[KeypointIndex::RightWrist as usize] = LandmarkPoint::new(0.7, 0.8, 0.9);
        pose.keypoints[KeypointIndex::Nose as usize] = LandmarkPoint::new(0.1, 0.1, 1.0);

        let set = LandmarkSet::from_pose(&pose);
        assert_eq!(*set.get(Joint::RightWrist), LandmarkPoint::new(0.7, 0.8, 0.9));
        assert_eq!(*set.get(Joint::LeftWrist), LandmarkPoint::default());
    }

    #[test]
    fn test_from_map_complete() {
        let map = full_map(0.9);
        let set = LandmarkSet::from_map(&map).unwrap();
        assert_eq!(set.get(Joint::LeftHip), &map[&Joint::LeftHip]);
        assert_eq!(set.iter().count(), Joint::COUNT);
    }

    #[test]
    fn test_from_map_missing_joint() {
        let mut map = full_map(0.9);
        map.remove(&Joint::RightAnkle);
        let err = LandmarkSet::from_map(&map).unwrap_err();
        assert_eq!(err.joint, Joint::RightAnkle);
        assert_eq!(Detection::from_map(&map), Detection::NotDetected);
    }

    #[test]
    fn test_detection_from_pose_threshold() {
        let mut pose = Pose::default();
        for joint in Joint::ALL {
            pose.keypoints[joint.keypoint() as usize] = LandmarkPoint::new(0.5, 0.5, 0.6);
        }
        assert!(Detection::from_pose(&pose, 0.5).landmarks().is_some());
        assert_eq!(Detection::from_pose(&pose, 0.7), Detection::NotDetected);
    }

    #[test]
    fn test_gated_joints_exclude_extremities() {
        assert!(!Joint::GATED.contains(&Joint::LeftWrist));
        assert!(!Joint::GATED.contains(&Joint::RightAnkle));
        assert_eq!(Joint::GATED.len(), 6);
    }
}

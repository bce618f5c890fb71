use crate::pose::{Joint, LandmarkSet};

/// 骨格の接続定義 (開始関節, 終了関節)
pub const SKELETON_CONNECTIONS: [(Joint, Joint); 10] = [
    // 上半身
    (Joint::LeftShoulder, Joint::RightShoulder),
    (Joint::LeftShoulder, Joint::LeftElbow),
    (Joint::LeftElbow, Joint::LeftWrist),
    (Joint::RightShoulder, Joint::RightElbow),
    (Joint::RightElbow, Joint::RightWrist),
    // 胴体
    (Joint::LeftShoulder, Joint::LeftHip),
    (Joint::RightShoulder, Joint::RightHip),
    (Joint::LeftHip, Joint::RightHip),
    // 下半身（膝は使わないので腰から足首へ直結）
    (Joint::LeftHip, Joint::LeftAnkle),
    (Joint::RightHip, Joint::RightAnkle),
];

/// 骨格線の色 (B, G, R)
pub const BONE_COLOR: [u8; 3] = [245, 117, 66];

/// 関節点の色 (B, G, R)
pub const JOINT_COLOR: [u8; 3] = [245, 66, 230];

/// 骨格線の太さ / 関節点の半径
pub const BONE_THICKNESS: i32 = 2;
pub const JOINT_RADIUS: i32 = 2;

/// スコアが閾値未満の関節は描かない（位置が当てにならない）
pub fn visible_joints(landmarks: &LandmarkSet, min_score: f32) -> impl Iterator<Item = Joint> + '_ {
    landmarks
        .iter()
        .filter(move |(_, point)| point.visibility >= min_score)
        .map(|(joint, _)| joint)
}

/// 両端の関節が描画対象の骨だけを返す
pub fn visible_bones(landmarks: &LandmarkSet, min_score: f32) -> impl Iterator<Item = (Joint, Joint)> + '_ {
    SKELETON_CONNECTIONS.into_iter().filter(move |&(start, end)| {
        landmarks.get(start).visibility >= min_score && landmarks.get(end).visibility >= min_score
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::LandmarkPoint;

    fn landmarks_with(joint: Joint, score: f32) -> LandmarkSet {
        let mut points = [LandmarkPoint::new(0.5, 0.5, 0.9); Joint::COUNT];
        points[joint as usize].visibility = score;
        LandmarkSet::new(points)
    }

    #[test]
    fn test_every_joint_is_connected() {
        for joint in Joint::ALL {
            assert!(
                SKELETON_CONNECTIONS.iter().any(|&(a, b)| a == joint || b == joint),
                "{:?} is not drawn",
                joint
            );
        }
    }

    #[test]
    fn test_low_score_wrist_is_skipped() {
        let landmarks = landmarks_with(Joint::RightWrist, 0.05);

        let joints: Vec<Joint> = visible_joints(&landmarks, 0.5).collect();
        assert_eq!(joints.len(), Joint::COUNT - 1);
        assert!(!joints.contains(&Joint::RightWrist));

        let bones: Vec<(Joint, Joint)> = visible_bones(&landmarks, 0.5).collect();
        assert_eq!(bones.len(), SKELETON_CONNECTIONS.len() - 1);
        assert!(!bones.contains(&(Joint::RightElbow, Joint::RightWrist)));
    }

    #[test]
    fn test_low_score_shoulder_drops_all_its_bones() {
        let landmarks = landmarks_with(Joint::LeftShoulder, 0.2);
        let bones: Vec<(Joint, Joint)> = visible_bones(&landmarks, 0.5).collect();
        assert!(bones.iter().all(|&(a, b)| a != Joint::LeftShoulder && b != Joint::LeftShoulder));
        assert_eq!(bones.len(), SKELETON_CONNECTIONS.len() - 3);
    }

    #[test]
    fn test_threshold_boundary_is_drawn() {
        let landmarks = landmarks_with(Joint::LeftAnkle, 0.5);
        assert_eq!(visible_joints(&landmarks, 0.5).count(), Joint::COUNT);
        assert_eq!(visible_bones(&landmarks, 0.5).count(), SKELETON_CONNECTIONS.len());
    }
}

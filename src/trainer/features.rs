use crate::pose::{Joint, LandmarkSet};

use super::angle::joint_angle;

/// 1フレーム分の角度特徴量
///
/// 肘と体幹は左右平均（上下判定のノイズ低減）、
/// 脇の開きは左右別に保持する（片側だけの開きも検出するため）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleFeatures {
    /// 肩-肘-手首の角度（左右平均）。180°付近で腕が伸びている
    pub elbow_angle: f32,
    /// 肩-腰-足首の角度（左右平均）。180°付近で体が一直線
    pub back_angle: f32,
    /// 腰-肩-肘の角度（左）
    pub left_tuck_angle: f32,
    /// 腰-肩-肘の角度（右）
    pub right_tuck_angle: f32,
    /// 肩・肘・腰の6点すべてが閾値を超えて見えているか
    pub visible: bool,
}

/// ランドマーク集合から角度特徴量を計算する
pub fn extract(landmarks: &LandmarkSet, visibility_threshold: f32) -> AngleFeatures {
    let lm = move |joint: Joint| landmarks.get(joint);

    let left_elbow = joint_angle(lm(Joint::LeftShoulder), lm(Joint::LeftElbow), lm(Joint::LeftWrist));
    let right_elbow = joint_angle(lm(Joint::RightShoulder), lm(Joint::RightElbow), lm(Joint::RightWrist));

    let left_back = joint_angle(lm(Joint::LeftShoulder), lm(Joint::LeftHip), lm(Joint::LeftAnkle));
    let right_back = joint_angle(lm(Joint::RightShoulder), lm(Joint::RightHip), lm(Joint::RightAnkle));

    let visible = Joint::GATED
        .iter()
        .all(|&joint| lm(joint).is_visible(visibility_threshold));

    AngleFeatures {
        elbow_angle: (left_elbow + right_elbow) / 2.0,
        back_angle: (left_back + right_back) / 2.0,
        left_tuck_angle: joint_angle(lm(Joint::LeftHip), lm(Joint::LeftShoulder), lm(Joint::LeftElbow)),
        right_tuck_angle: joint_angle(lm(Joint::RightHip), lm(Joint::RightShoulder), lm(Joint::RightElbow)),
        visible,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::pose::LandmarkPoint;

    /// 横から見たプランク姿勢: 体は水平、腕は肩から約63°の向きに真っ直ぐ伸びる
    pub(crate) fn plank(visibility: f32) -> [LandmarkPoint; Joint::COUNT] {
        let mut points = [LandmarkPoint::default(); Joint::COUNT];
        for (left, right, x, y) in [
            (Joint::LeftShoulder, Joint::RightShoulder, 0.30, 0.50),
            (Joint::LeftElbow, Joint::RightElbow, 0.35, 0.60),
            (Joint::LeftWrist, Joint::RightWrist, 0.40, 0.70),
            (Joint::LeftHip, Joint::RightHip, 0.60, 0.50),
            (Joint::LeftAnkle, Joint::RightAnkle, 0.90, 0.50),
        ] {
            points[left as usize] = LandmarkPoint::new(x, y, visibility);
            points[right as usize] = LandmarkPoint::new(x, y, visibility);
        }
        points
    }

    #[test]
    fn test_extended_plank() {
        let features = extract(&LandmarkSet::new(plank(0.9)), 0.8);
        assert!((features.elbow_angle - 180.0).abs() < 0.01);
        assert!((features.back_angle - 180.0).abs() < 0.01);
        // atan2(0.1, 0.05) ≈ 63.43°
        assert!((features.left_tuck_angle - 63.43).abs() < 0.01);
        assert!((features.right_tuck_angle - 63.43).abs() < 0.01);
        assert!(features.visible);
    }

    #[test]
    fn test_bent_arm_is_averaged() {
        let mut points = plank(0.9);
        // 左腕だけ肘で90°に曲げる: 上腕(0.05,0.1) ⊥ 前腕(0.1,-0.05)
        points[Joint::LeftWrist as usize] = LandmarkPoint::new(0.45, 0.55, 0.9);
        let features = extract(&LandmarkSet::new(points), 0.8);
        assert!((features.elbow_angle - 135.0).abs() < 0.01);
    }

    #[test]
    fn test_tuck_angle_is_per_side() {
        let mut points = plank(0.9);
        // 右肘を肩の真下へ → 右だけ90°
        points[Joint::RightElbow as usize] = LandmarkPoint::new(0.30, 0.60, 0.9);
        let features = extract(&LandmarkSet::new(points), 0.8);
        assert!((features.left_tuck_angle - 63.43).abs() < 0.01);
        assert!((features.right_tuck_angle - 90.0).abs() < 0.01);
    }

    #[test]
    fn test_visibility_gate() {
        let mut points = plank(0.9);
        points[Joint::RightHip as usize].visibility = 0.79;
        assert!(!extract(&LandmarkSet::new(points), 0.8).visible);

        // 境界値ちょうどは不可視
        let mut points = plank(0.9);
        points[Joint::LeftElbow as usize].visibility = 0.8;
        assert!(!extract(&LandmarkSet::new(points), 0.8).visible);
    }

    #[test]
    fn test_extremities_not_gated() {
        let mut points = plank(0.9);
        points[Joint::LeftWrist as usize].visibility = 0.0;
        points[Joint::RightAnkle as usize].visibility = 0.1;
        assert!(extract(&LandmarkSet::new(points), 0.8).visible);
    }

    #[test]
    fn test_extract_is_pure() {
        let set = LandmarkSet::new(plank(0.85));
        let a = extract(&set, 0.8);
        let b = extract(&set, 0.8);
        assert_eq!(a.elbow_angle.to_bits(), b.elbow_angle.to_bits());
        assert_eq!(a.back_angle.to_bits(), b.back_angle.to_bits());
        assert_eq!(a.left_tuck_angle.to_bits(), b.left_tuck_angle.to_bits());
        assert_eq!(a.right_tuck_angle.to_bits(), b.right_tuck_angle.to_bits());
        assert_eq!(a.visible, b.visible);
    }
}

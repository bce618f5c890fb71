/// MoveNet の 17 キーポイントインデックス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum KeypointIndex {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl KeypointIndex {
    pub const COUNT: usize = 17;
}

/// 単一ランドマーク
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LandmarkPoint {
    /// 正規化されたX座標 (0.0〜1.0)
    pub x: f32,
    /// 正規化されたY座標 (0.0〜1.0)
    pub y: f32,
    /// 可視度 (0.0〜1.0): 点が存在し正しく推定されている確からしさ
    pub visibility: f32,
}

impl LandmarkPoint {
    pub fn new(x: f32, y: f32, visibility: f32) -> Self {
        Self { x, y, visibility }
    }

    /// 可視度が閾値を超えているか（境界値は不可視扱い）
    pub fn is_visible(&self, threshold: f32) -> bool {
        self.visibility > threshold
    }

    /// ピクセル座標に変換
    pub fn to_pixel(&self, width: u32, height: u32) -> (i32, i32) {
        let px = (self.x * width as f32) as i32;
        let py = (self.y * height as f32) as i32;
        (px, py)
    }
}

/// 推定器が出力する 17 キーポイントの姿勢
#[derive(Debug, Clone)]
pub struct Pose {
    pub keypoints: [LandmarkPoint; KeypointIndex::COUNT],
}

impl Pose {
    pub fn new(keypoints: [LandmarkPoint; KeypointIndex::COUNT]) -> Self {
        Self { keypoints }
    }

    /// インデックスでキーポイントを取得
    pub fn get(&self, index: KeypointIndex) -> &LandmarkPoint {
        &self.keypoints[index as usize]
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            keypoints: [LandmarkPoint::default(); KeypointIndex::COUNT],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_visible_is_strict() {
        let lm = LandmarkPoint::new(0.5, 0.5, 0.8);
        assert!(lm.is_visible(0.79));
        assert!(!lm.is_visible(0.8));
    }

    #[test]
    fn test_to_pixel() {
        let lm = LandmarkPoint::new(0.5, 0.25, 1.0);
        assert_eq!(lm.to_pixel(640, 480), (320, 120));
    }

    #[test]
    fn test_pose_get() {
        let mut keypoints = [LandmarkPoint::new(0.0, 0.0, 0.5); KeypointIndex::COUNT];
        keypoints[KeypointIndex::LeftElbow as usize] = LandmarkPoint::new(0.4, 0.6, 0.5);

        let pose = Pose::new(keypoints);
        let elbow = pose.get(KeypointIndex::LeftElbow);
        assert_eq!(elbow.x, 0.4);
        assert_eq!(elbow.y, 0.6);
        assert_eq!(pose.get(KeypointIndex::Nose).visibility, 0.5);
    }
}

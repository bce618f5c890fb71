//! 3点のなす角
//!
//! 全ての角度特徴量はこの関数の呼び出し1〜2回で作られる。

use crate::pose::LandmarkPoint;

/// `b` を頂点とする角 ∠abc を度数で返す (0°〜180°)
///
/// 2本の腕の方位角の差を取り、180°を超える場合は反対側の角を返す。
pub fn joint_angle(a: &LandmarkPoint, b: &LandmarkPoint, c: &LandmarkPoint) -> f32 {
    let radians = f32::atan2(c.y - b.y, c.x - b.x) - f32::atan2(a.y - b.y, a.x - b.x);
    let degrees = radians.to_degrees().abs();
    if degrees > 180.0 {
        // 丸め誤差で 360° をわずかに超えることがある
        (360.0 - degrees).max(0.0)
    } else {
        degrees
    }
}

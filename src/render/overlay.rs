//! フレームへの HUD 描画
//!
//! 描画結果はそのまま録画されるため、表示用バッファではなく BGR Mat に直接描く。

use anyhow::Result;
use opencv::core::{Mat, Point, Rect, Scalar};
use opencv::imgproc;
use opencv::prelude::*;

use crate::pose::{Joint, LandmarkSet};
use crate::render::skeleton::{
    visible_bones, visible_joints, BONE_COLOR, BONE_THICKNESS, JOINT_COLOR, JOINT_RADIUS,
};
use crate::trainer::{categorize, FrameReport};

/// ステータス欄（回数とフェーズ）の幅
const STATUS_BOX_WIDTH: i32 = 250;
/// 上部バーの高さ
const BAR_HEIGHT: i32 = 73;
const STATUS_BOX_COLOR: [u8; 3] = [50, 50, 50];
const TEXT_COLOR: [u8; 3] = [255, 255, 255];
const FONT: i32 = imgproc::FONT_HERSHEY_SIMPLEX;

/// HUD に何を描くか
#[derive(Debug, Clone, Copy)]
pub struct OverlayOptions {
    pub angles: bool,
    pub skeleton: bool,
    /// 骨格描画の関節スコア下限
    pub skeleton_min_score: f32,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            angles: true,
            skeleton: true,
            skeleton_min_score: 0.5,
        }
    }
}

fn scalar(bgr: [u8; 3]) -> Scalar {
    Scalar::new(bgr[0] as f64, bgr[1] as f64, bgr[2] as f64, 0.0)
}

fn put_text(frame: &mut Mat, text: &str, org: Point, scale: f64, thickness: i32) -> Result<()> {
    imgproc::put_text(
        frame,
        text,
        org,
        FONT,
        scale,
        scalar(TEXT_COLOR),
        thickness,
        imgproc::LINE_AA,
        false,
    )?;
    Ok(())
}

/// フィードバック文字列を欄の中央に置くときの x 座標
pub fn centered_text_x(box_left: i32, box_width: i32, text_width: i32) -> i32 {
    box_left + (box_width - text_width) / 2
}

/// 1フレーム分の HUD を描画する
pub fn draw_overlay(
    frame: &mut Mat,
    report: &FrameReport,
    landmarks: Option<&LandmarkSet>,
    options: OverlayOptions,
) -> Result<()> {
    let width = frame.cols();
    let height = frame.rows();

    // ステータス欄
    imgproc::rectangle(
        frame,
        Rect::new(0, 0, STATUS_BOX_WIDTH, BAR_HEIGHT),
        scalar(STATUS_BOX_COLOR),
        imgproc::FILLED,
        imgproc::LINE_8,
        0,
    )?;
    put_text(frame, "REPS", Point::new(15, 20), 0.5, 1)?;
    put_text(frame, &report.rep_count.to_string(), Point::new(10, 60), 1.5, 2)?;
    put_text(frame, "STATUS", Point::new(130, 20), 0.5, 1)?;
    put_text(frame, report.phase.label(), Point::new(120, 60), 1.0, 2)?;

    // フィードバック欄
    let feedback_width = (width - STATUS_BOX_WIDTH).max(0);
    imgproc::rectangle(
        frame,
        Rect::new(STATUS_BOX_WIDTH, 0, feedback_width, BAR_HEIGHT),
        scalar(categorize(&report.verdict).bgr()),
        imgproc::FILLED,
        imgproc::LINE_8,
        0,
    )?;
    let mut baseline = 0;
    let text_size = imgproc::get_text_size(&report.verdict.text, FONT, 1.0, 2, &mut baseline)?;
    let text_x = centered_text_x(STATUS_BOX_WIDTH, feedback_width, text_size.width);
    put_text(frame, &report.verdict.text, Point::new(text_x, 45), 1.0, 2)?;

    // 角度のデバッグ表示（未検出フレームは 0）
    if options.angles {
        let (back, elbow) = report
            .features
            .map(|f| (f.back_angle as i32, f.elbow_angle as i32))
            .unwrap_or((0, 0));
        put_text(frame, &format!("BACK: {}", back), Point::new(15, height - 50), 0.7, 2)?;
        put_text(frame, &format!("ELBOW: {}", elbow), Point::new(15, height - 20), 0.7, 2)?;
    }

    if options.skeleton {
        if let Some(landmarks) = landmarks {
            draw_skeleton(frame, landmarks, options.skeleton_min_score)?;
        }
    }

    Ok(())
}

/// 必須関節の骨格を描画（スコアの低い関節は飛ばす）
pub fn draw_skeleton(frame: &mut Mat, landmarks: &LandmarkSet, min_score: f32) -> Result<()> {
    let w = frame.cols() as u32;
    let h = frame.rows() as u32;
    let to_point = |joint: Joint| {
        let (x, y) = landmarks.get(joint).to_pixel(w, h);
        Point::new(x, y)
    };

    for (start, end) in visible_bones(landmarks, min_score) {
        imgproc::line(
            frame,
            to_point(start),
            to_point(end),
            scalar(BONE_COLOR),
            BONE_THICKNESS,
            imgproc::LINE_AA,
            0,
        )?;
    }

    for joint in visible_joints(landmarks, min_score) {
        imgproc::circle(
            frame,
            to_point(joint),
            JOINT_RADIUS,
            scalar(JOINT_COLOR),
            BONE_THICKNESS,
            imgproc::LINE_AA,
            0,
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_text_x() {
        // 640幅のフレームでは欄は 250..640 (幅390)
        assert_eq!(centered_text_x(250, 390, 190), 350);
        // 文字列が欄より広い場合は左にはみ出す
        assert_eq!(centered_text_x(250, 390, 430), 230);
    }
}

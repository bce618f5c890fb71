//! フォーム判定結果と表示スタイル

/// フィードバックの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedbackKind {
    GoodForm,
    TuckElbows,
    GetIntoPosition,
    RepCounted,
    NoBodyDetected,
}

impl FeedbackKind {
    /// 画面表示用の文字列
    pub fn text(self) -> &'static str {
        match self {
            FeedbackKind::GoodForm => "GOOD FORM",
            FeedbackKind::TuckElbows => "TUCK ELBOWS",
            FeedbackKind::GetIntoPosition => "GET INTO PLANK POSITION",
            FeedbackKind::RepCounted => "REP COUNTED!",
            FeedbackKind::NoBodyDetected => "NO BODY DETECTED",
        }
    }

    /// 表示文字列の部分一致による旧来の分類
    ///
    /// 優先順位: TUCK ELBOWS > GOOD > COUNTED > DETECTED。
    /// どれにも当たらなければ None（既定スタイル）。比較テスト専用。
    pub fn from_legacy_text(text: &str) -> Option<Self> {
        if text.contains("TUCK ELBOWS") {
            Some(FeedbackKind::TuckElbows)
        } else if text.contains("GOOD") {
            Some(FeedbackKind::GoodForm)
        } else if text.contains("COUNTED") {
            Some(FeedbackKind::RepCounted)
        } else if text.contains("DETECTED") {
            Some(FeedbackKind::NoBodyDetected)
        } else {
            None
        }
    }
}

/// 1フレーム分のフィードバック
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackVerdict {
    pub kind: FeedbackKind,
    pub text: String,
}

impl FeedbackVerdict {
    pub fn new(kind: FeedbackKind) -> Self {
        Self {
            kind,
            text: kind.text().to_string(),
        }
    }
}

impl From<FeedbackKind> for FeedbackVerdict {
    fn from(kind: FeedbackKind) -> Self {
        Self::new(kind)
    }
}

/// フィードバック欄の表示スタイル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayStyle {
    /// 要修正（赤）
    Alert,
    /// 良好（緑）
    Positive,
    /// レップ確定（青）
    Success,
    /// 人物なし（橙）
    Warning,
    /// その他（紺）
    Neutral,
}

impl DisplayStyle {
    /// 塗りつぶし色 (B, G, R)
    pub fn bgr(self) -> [u8; 3] {
        match self {
            DisplayStyle::Alert => [0, 0, 255],
            DisplayStyle::Positive => [0, 150, 0],
            DisplayStyle::Success => [200, 100, 0],
            DisplayStyle::Warning => [0, 165, 255],
            DisplayStyle::Neutral => [128, 0, 0],
        }
    }
}

/// 判定結果を表示スタイルに対応付ける
pub fn categorize(verdict: &FeedbackVerdict) -> DisplayStyle {
    style_for(Some(verdict.kind))
}

/// 表示文字列だけから旧来の規則でスタイルを決める
pub fn categorize_legacy_text(text: &str) -> DisplayStyle {
    style_for(FeedbackKind::from_legacy_text(text))
}

fn style_for(kind: Option<FeedbackKind>) -> DisplayStyle {
    match kind {
        Some(FeedbackKind::TuckElbows) => DisplayStyle::Alert,
        Some(FeedbackKind::GoodForm) => DisplayStyle::Positive,
        Some(FeedbackKind::RepCounted) => DisplayStyle::Success,
        Some(FeedbackKind::NoBodyDetected) => DisplayStyle::Warning,
        Some(FeedbackKind::GetIntoPosition) | None => DisplayStyle::Neutral,
    }
}

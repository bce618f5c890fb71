pub mod angle;
pub mod features;
pub mod feedback;
pub mod session;
pub mod state;

pub use angle::joint_angle;
pub use features::{extract, AngleFeatures};
pub use feedback::{categorize, categorize_legacy_text, DisplayStyle, FeedbackKind, FeedbackVerdict};
pub use session::{FrameReport, Trainer};
pub use state::{step, Observation, Phase, Thresholds, TrainerState};

#[cfg(feature = "desktop")]
pub mod detector;
pub mod keypoint;
pub mod landmarks;
#[cfg(feature = "desktop")]
pub mod preprocess;

#[cfg(feature = "desktop")]
pub use detector::PoseDetector;
pub use keypoint::{KeypointIndex, LandmarkPoint, Pose};
pub use landmarks::{Detection, Joint, LandmarkSet};
#[cfg(feature = "desktop")]
pub use preprocess::preprocess_for_movenet;

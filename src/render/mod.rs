#[cfg(feature = "desktop")]
pub mod overlay;
pub mod skeleton;
#[cfg(feature = "desktop")]
pub mod window;

#[cfg(feature = "desktop")]
pub use overlay::{draw_overlay, OverlayOptions};
pub use skeleton::{visible_bones, visible_joints, SKELETON_CONNECTIONS};
#[cfg(feature = "desktop")]
pub use window::MinifbRenderer;

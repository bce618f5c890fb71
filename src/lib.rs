#[cfg(feature = "desktop")]
pub mod camera;
pub mod config;
pub mod error;
pub mod pose;
#[cfg(feature = "desktop")]
pub mod recorder;
pub mod render;
pub mod trainer;

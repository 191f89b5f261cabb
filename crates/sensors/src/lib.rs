//! Threshold comparators on raw device sensor readings.

pub mod light;
pub mod shake;

pub use light::{AmbientLightSwitch, DisplayStyle};
pub use shake::{AccelerometerSample, ShakeDetector};

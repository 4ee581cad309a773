//! Utility Module
//!
//! - [`OrbitControls`]: orbit camera state driven by camera keyframes
//! - [`FrameTimer`]: wall-clock delta measurement for the frame driver

pub mod orbit_control;
pub mod time;

pub use orbit_control::OrbitControls;
pub use time::FrameTimer;

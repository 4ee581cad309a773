//! Viewer Settings
//!
//! Runtime configuration for the [`Viewer`](crate::viewer::Viewer).
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use assembly_viewer::settings::ViewerSettings;
//!
//! // Defaults: 60 Hz ticks, visibility cross-fades, animated camera
//! let settings = ViewerSettings::default();
//!
//! // Hard visibility cuts, camera left to the user
//! let settings = ViewerSettings {
//!     fade_transitions: false,
//!     animate_camera: false,
//!     ..Default::default()
//! };
//!
//! // Or from a JSON file; missing fields take their defaults
//! let settings = ViewerSettings::load("viewer.json")?;
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::animation::{ControllerOptions, FadeMode};
use crate::errors::{Result, ViewerError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    /// Nominal frame-callback rate the host should schedule ticks at.
    pub tick_rate_hz: f32,
    /// Cross-fade opacity when an object's visibility changes between
    /// keyframes. When `false`, visibility switches at the next keyframe.
    pub fade_transitions: bool,
    /// Apply camera keyframes.
    pub animate_camera: bool,
    /// Upper bound for a single measured frame delta, in seconds. `None`
    /// feeds the full wall-clock gap to the playback clock.
    pub max_frame_delta: Option<f32>,
    /// Vertical field of view of the viewing camera, in degrees.
    pub camera_fov: f32,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60.0,
            fade_transitions: true,
            animate_camera: true,
            max_frame_delta: None,
            camera_fov: 45.0,
        }
    }
}

impl ViewerSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ViewerError::AssetNotFound(path.display().to_string()));
        }
        let text = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&text)?;
        log::info!("Loaded viewer settings from {}", path.display());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.tick_rate_hz.is_finite() && self.tick_rate_hz > 0.0) {
            return Err(ViewerError::InvalidSetting {
                field: "tick_rate_hz",
                reason: format!("must be a positive number, got {}", self.tick_rate_hz),
            });
        }
        if let Some(max) = self.max_frame_delta
            && !(max.is_finite() && max > 0.0)
        {
            return Err(ViewerError::InvalidSetting {
                field: "max_frame_delta",
                reason: format!("must be a positive number of seconds, got {max}"),
            });
        }
        if !(self.camera_fov > 0.0 && self.camera_fov < 180.0) {
            return Err(ViewerError::InvalidSetting {
                field: "camera_fov",
                reason: format!("must be within (0, 180) degrees, got {}", self.camera_fov),
            });
        }
        Ok(())
    }

    /// Interval between frame callbacks at the nominal tick rate.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::try_from_secs_f32(1.0 / self.tick_rate_hz)
            .unwrap_or_else(|_| Duration::from_secs_f32(1.0 / 60.0))
    }

    #[must_use]
    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            fade: if self.fade_transitions {
                FadeMode::CrossFade
            } else {
                FadeMode::Cut
            },
            animate_camera: self.animate_camera,
        }
    }
}

//! Error Types
//!
//! This module defines the error types used by the loaders and the viewer.
//!
//! # Overview
//!
//! The main error type [`ViewerError`] covers the fallible edges of the crate:
//! - Model asset loading (glTF import)
//! - Step and animation data parsing (JSON)
//! - Settings validation
//!
//! The animation core itself never fails: unresolvable objects, degenerate
//! keyframe brackets and empty tracks degrade to "no pose change" instead of
//! surfacing an error.
//!
//! # Usage
//!
//! ```rust,ignore
//! use assembly_viewer::errors::Result;
//! use assembly_viewer::animation::StepAnimation;
//!
//! fn load(json: &str) -> Result<StepAnimation> {
//!     StepAnimation::from_json_str(json)
//! }
//! ```

use thiserror::Error;

/// The main error type for the assembly viewer.
#[derive(Error, Debug)]
pub enum ViewerError {
    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// The requested asset was not found.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// The model file is not a format the loader understands.
    #[error("Unsupported model format: {0}")]
    UnsupportedFormat(String),

    /// glTF parsing or import error.
    #[cfg(feature = "gltf")]
    #[error("glTF error: {0}")]
    GltfError(String),

    /// Loaded model contains no scene to display.
    #[error("Model has no scene: {0}")]
    EmptyModel(String),

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    // ========================================================================
    // Format & Parsing Errors
    // ========================================================================
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// A settings value is outside its accepted range.
    #[error("Invalid setting `{field}`: {reason}")]
    InvalidSetting {
        /// Name of the offending field
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

#[cfg(feature = "gltf")]
impl From<gltf::Error> for ViewerError {
    fn from(err: gltf::Error) -> Self {
        ViewerError::GltfError(err.to_string())
    }
}

/// Alias for `Result<T, ViewerError>`.
pub type Result<T> = std::result::Result<T, ViewerError>;

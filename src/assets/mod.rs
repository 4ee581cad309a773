//! Asset Loading
//!
//! Entry points that turn files into the data the animation core consumes:
//!
//! - [`load_model`]: a glTF model into a [`Scene`]
//! - [`load_steps`]: a steps file into [`Step`]s with their animations
//! - [`load_step_animation`]: a single animation document
//!
//! Loading is synchronous; hosts that need it off the frame thread run it on
//! their own executor and hand the result to
//! [`Viewer::on_model_loaded`](crate::viewer::Viewer::on_model_loaded).

pub mod loaders;

use std::path::Path;

use serde::Deserialize;

use crate::animation::{Step, StepAnimation};
use crate::errors::{Result, ViewerError};
use crate::scene::Scene;

/// Loads a model file into a fresh scene.
pub fn load_model(path: impl AsRef<Path>) -> Result<Scene> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ViewerError::AssetNotFound(path.display().to_string()));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        #[cfg(feature = "gltf")]
        "gltf" | "glb" => {
            let mut scene = Scene::new();
            loaders::GltfLoader::load(path, &mut scene)?;
            Ok(scene)
        }
        _ => Err(ViewerError::UnsupportedFormat(path.display().to_string())),
    }
}

/// A steps file is either a bare array or an object with a `steps` array.
#[derive(Deserialize)]
#[serde(untagged)]
enum StepsDocument {
    List(Vec<Step>),
    Wrapped { steps: Vec<Step> },
}

pub fn parse_steps(json: &str) -> Result<Vec<Step>> {
    let steps = match serde_json::from_str::<StepsDocument>(json)? {
        StepsDocument::List(steps) | StepsDocument::Wrapped { steps } => steps,
    };

    for step in &steps {
        if let Some(animation) = &step.animation {
            let issues = animation.validate();
            if !issues.is_empty() {
                log::warn!("Step `{}` has {} animation issue(s)", step.id, issues.len());
            }
        }
    }
    Ok(steps)
}

pub fn load_steps(path: impl AsRef<Path>) -> Result<Vec<Step>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ViewerError::AssetNotFound(path.display().to_string()));
    }
    let text = std::fs::read_to_string(path)?;
    let steps = parse_steps(&text)?;
    log::info!("Loaded {} steps from {}", steps.len(), path.display());
    Ok(steps)
}

pub fn load_step_animation(path: impl AsRef<Path>) -> Result<StepAnimation> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ViewerError::AssetNotFound(path.display().to_string()));
    }
    let text = std::fs::read_to_string(path)?;
    StepAnimation::from_json_str(&text)
}

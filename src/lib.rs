#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod animation;
pub mod assets;
pub mod errors;
pub mod scene;
pub mod settings;
pub mod utils;
pub mod viewer;

pub use animation::{
    CameraKeyframe, ObjectKeyframe, PlaybackEvent, PlaybackState, Step, StepAnimation,
    StepAnimationController, StepId, TickHandle,
};
pub use assets::{load_model, load_step_animation, load_steps, parse_steps};
pub use errors::{Result, ViewerError};
pub use scene::{Camera, Material, Node, NodeHandle, ObjectResolver, Scene};
pub use settings::ViewerSettings;
pub use utils::orbit_control::OrbitControls;
pub use viewer::{FrameReport, ModelState, Viewer};

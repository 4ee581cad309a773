//! Scene graph module
//!
//! Holds the loaded model and the viewing camera:
//! - Node: scene node (hierarchy, transform, visibility, materials)
//! - Transform: TRS component with cached matrices
//! - Material: per-node surface state driven by visibility fades
//! - Scene: node and material arenas of one model
//! - Camera: perspective camera with orbit controls
//! - ObjectResolver: object-id lookup by name path
//! - transform_system: world-matrix propagation

pub mod camera;
pub mod material;
pub mod node;
pub mod resolve;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod transform;
pub mod transform_system;

pub use camera::Camera;
pub use material::Material;
pub use node::Node;
pub use resolve::ObjectResolver;
pub use scene::Scene;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
    pub struct MaterialHandle;
}

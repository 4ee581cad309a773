use std::borrow::Cow;

use glam::Affine3A;
use smallvec::SmallVec;
use uuid::Uuid;

use crate::scene::transform::Transform;
use crate::scene::{MaterialHandle, NodeHandle};

/// A scene-graph node of a loaded model.
///
/// # Hierarchy
///
/// Nodes form a tree through parent-child handles. Children keep their
/// insertion order, which is also the order the object resolver visits them.
///
/// # Identity
///
/// `name` comes from the asset and may be empty or duplicated among siblings.
/// `uuid` is assigned at creation and is the fallback identifier for nodes
/// whose ancestor chain carries no name at all.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: Cow<'static, str>,
    pub uuid: Uuid,

    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    pub transform: Transform,
    pub visible: bool,

    /// Materials rendered by this node (empty for pure group nodes).
    pub materials: SmallVec<[MaterialHandle; 2]>,
    /// Set once the node's materials have been cloned for exclusive use.
    pub(crate) owns_materials: bool,
}

impl Node {
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: Cow::Borrowed(""),
            uuid: Uuid::new_v4(),
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            visible: true,
            materials: SmallVec::new(),
            owns_materials: false,
        }
    }

    #[must_use]
    pub fn with_name(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            ..Self::new()
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// Whether this node's materials are private copies.
    #[inline]
    #[must_use]
    pub fn owns_materials(&self) -> bool {
        self.owns_materials
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

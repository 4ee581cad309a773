//! Object identifiers and path resolution.
//!
//! An object identifier is the slash-joined chain of node names from just
//! below the model root down to the node. Unnamed nodes are skipped in the
//! chain; when no node in the chain has a name at all, the node's uuid string
//! is used instead.
//!
//! ```text
//! root
//! └── Cabinet            "Cabinet"
//!     ├── Door           "Cabinet/Door"
//!     │   └── (unnamed)  "Cabinet/Door"
//!     └── Shelf          "Cabinet/Shelf"
//! ```
//!
//! Sibling names are not unique in general. Lookup returns the first match in
//! pre-order traversal, children in stored order.

use crate::scene::NodeHandle;
use crate::scene::node::Node;
use crate::scene::scene::Scene;

/// Resolves object identifiers against a scene graph. Stateless.
pub struct ObjectResolver;

impl ObjectResolver {
    /// Finds the node whose identifier equals `object_id`.
    ///
    /// `root` is the traversal origin and is never itself matched.
    #[must_use]
    pub fn resolve(scene: &Scene, root: NodeHandle, object_id: &str) -> Option<NodeHandle> {
        if object_id.is_empty() {
            return None;
        }

        let root_node = scene.get_node(root)?;

        // (handle, joined names of the chain so far)
        let mut stack: Vec<(NodeHandle, String)> = root_node
            .children()
            .iter()
            .rev()
            .map(|&child| (child, String::new()))
            .collect();

        while let Some((handle, parent_path)) = stack.pop() {
            let Some(node) = scene.get_node(handle) else {
                continue;
            };

            let path = join_name(&parent_path, node);
            let matches = if path.is_empty() {
                node.uuid.to_string() == object_id
            } else {
                path == object_id
            };
            if matches {
                return Some(handle);
            }

            // Named paths only ever grow, so a subtree whose prefix already
            // diverges from the target cannot match by name. It may still hold
            // an unnamed-chain node matched by uuid, which only happens while
            // the path is empty.
            if !path.is_empty() && !is_path_prefix(&path, object_id) {
                continue;
            }

            for &child in node.children().iter().rev() {
                stack.push((child, path.clone()));
            }
        }

        None
    }

    /// Computes the identifier of `node` relative to `root`.
    ///
    /// Returns `None` when `node` is not a strict descendant of `root`.
    #[must_use]
    pub fn object_path(scene: &Scene, root: NodeHandle, node: NodeHandle) -> Option<String> {
        if node == root {
            return None;
        }

        let mut names = Vec::new();
        let mut current = node;
        loop {
            let n = scene.get_node(current)?;
            if !n.name.is_empty() {
                names.push(n.name.as_ref());
            }
            match n.parent() {
                Some(parent) if parent == root => break,
                Some(parent) => current = parent,
                None => return None,
            }
        }

        if names.is_empty() {
            return scene.get_node(node).map(|n| n.uuid.to_string());
        }
        names.reverse();
        Some(names.join("/"))
    }

    /// Every identifier below `root`, in resolver traversal order.
    #[must_use]
    pub fn collect_object_ids(scene: &Scene, root: NodeHandle) -> Vec<String> {
        let mut ids = Vec::new();
        scene.walk_subtree(root, |handle, _| {
            if let Some(id) = Self::object_path(scene, root, handle) {
                ids.push(id);
            }
        });
        ids
    }
}

fn join_name(parent_path: &str, node: &Node) -> String {
    match (parent_path.is_empty(), node.name.is_empty()) {
        (_, true) => parent_path.to_owned(),
        (true, false) => node.name.to_string(),
        (false, false) => format!("{parent_path}/{}", node.name),
    }
}

fn is_path_prefix(prefix: &str, object_id: &str) -> bool {
    object_id
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

use std::borrow::Cow;
use std::sync::atomic::{AtomicU32, Ordering};

use smallvec::SmallVec;
use slotmap::SlotMap;

use crate::scene::material::Material;
use crate::scene::node::Node;
use crate::scene::transform_system;
use crate::scene::{MaterialHandle, NodeHandle};

static NEXT_SCENE_ID: AtomicU32 = AtomicU32::new(1);

/// Scene graph of one loaded model.
///
/// Nodes and materials live in slot-map arenas and are referenced by handle.
/// Every scene has a single root node that represents the loaded model; asset
/// nodes hang below it. The root never takes part in object identifiers.
#[derive(Debug)]
pub struct Scene {
    pub id: u32,
    pub name: Cow<'static, str>,

    pub nodes: SlotMap<NodeHandle, Node>,
    pub materials: SlotMap<MaterialHandle, Material>,

    root: NodeHandle,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new());
        Self {
            id: NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed),
            name: Cow::Borrowed(""),
            nodes,
            materials: SlotMap::with_key(),
            root,
        }
    }

    /// Handle of the model root (traversal origin for object lookup).
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    // ========================================================================
    // Node construction
    // ========================================================================

    /// Adds a node directly below the model root.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        self.add_to_parent(node, self.root)
    }

    /// Adds a node below `parent`; falls back to the root when `parent` is gone.
    pub fn add_to_parent(&mut self, mut node: Node, parent: NodeHandle) -> NodeHandle {
        let parent = if self.nodes.contains_key(parent) {
            parent
        } else {
            log::warn!("Parent node not found, attaching to model root");
            self.root
        };
        node.parent = Some(parent);
        node.children.clear();
        let handle = self.nodes.insert(node);
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(handle);
        }
        handle
    }

    /// Re-parents `child` under `parent`, keeping both sides in sync.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent || child == self.root {
            log::warn!("Cannot attach node to itself or move the model root");
            return;
        }
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            log::error!("Node not found during attach");
            return;
        }
        if self.is_ancestor(child, parent) {
            log::warn!("Refusing to attach a node below its own descendant");
            return;
        }

        let old_parent = self.nodes.get(child).and_then(Node::parent);
        if let Some(p) = old_parent
            && let Some(n) = self.nodes.get_mut(p)
            && let Some(i) = n.children.iter().position(|&x| x == child)
        {
            n.children.remove(i);
        }

        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
            c.transform.mark_dirty();
        }
    }

    /// Removes a node and its whole subtree. The model root cannot be removed.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        if handle == self.root {
            return;
        }
        let parent = self.nodes.get(handle).and_then(Node::parent);
        if let Some(p) = parent
            && let Some(n) = self.nodes.get_mut(p)
            && let Some(i) = n.children.iter().position(|&x| x == handle)
        {
            n.children.remove(i);
        }

        let mut doomed = Vec::new();
        self.walk_subtree(handle, |h, _| doomed.push(h));
        for h in doomed {
            self.nodes.remove(h);
        }
    }

    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    /// First node (pre-order from the root) with exactly this name.
    #[must_use]
    pub fn find_node_by_name(&self, name: &str) -> Option<NodeHandle> {
        let mut found = None;
        self.walk_subtree(self.root, |h, node| {
            if found.is_none() && node.name == name {
                found = Some(h);
            }
        });
        found
    }

    /// `true` if `ancestor` lies on the parent chain of `node` (or is `node`).
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeHandle, node: NodeHandle) -> bool {
        let mut current = Some(node);
        while let Some(h) = current {
            if h == ancestor {
                return true;
            }
            current = self.nodes.get(h).and_then(Node::parent);
        }
        false
    }

    /// Visits `start` and its descendants in pre-order, children in stored order.
    pub fn walk_subtree(&self, start: NodeHandle, mut visit: impl FnMut(NodeHandle, &Node)) {
        let mut stack = vec![start];
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            visit(handle, node);
            stack.extend(node.children.iter().rev().copied());
        }
    }

    /// Node visibility combined with every ancestor's flag.
    #[must_use]
    pub fn is_visible_in_hierarchy(&self, handle: NodeHandle) -> bool {
        let mut current = Some(handle);
        while let Some(h) = current {
            match self.nodes.get(h) {
                Some(node) if node.visible => current = node.parent,
                _ => return false,
            }
        }
        true
    }

    // ========================================================================
    // Materials
    // ========================================================================

    pub fn add_material(&mut self, material: Material) -> MaterialHandle {
        self.materials.insert(material)
    }

    #[must_use]
    pub fn material(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.get(handle)
    }

    /// Assigns materials to a node. The node shares them until it is faded.
    pub fn set_node_materials(&mut self, node: NodeHandle, materials: &[MaterialHandle]) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.materials = materials.iter().copied().collect();
            n.owns_materials = false;
        }
    }

    /// Replaces the node's material handles with private clones.
    ///
    /// Idempotent: once a node owns its materials, further calls are no-ops.
    /// Returns `true` only when clones were created.
    pub fn make_materials_unique(&mut self, handle: NodeHandle) -> bool {
        let originals = match self.nodes.get(handle) {
            Some(node) if !node.owns_materials => node.materials.clone(),
            _ => return false,
        };

        let mut copies: SmallVec<[MaterialHandle; 2]> = SmallVec::with_capacity(originals.len());
        for original in originals {
            if let Some(material) = self.materials.get(original).cloned() {
                copies.push(self.materials.insert(material));
            }
        }

        if let Some(node) = self.nodes.get_mut(handle) {
            node.materials = copies;
            node.owns_materials = true;
        }
        true
    }

    /// Sets opacity on every material-bearing node of the subtree, cloning
    /// each node's materials on first use.
    pub fn set_subtree_opacity(&mut self, handle: NodeHandle, opacity: f32) {
        let mut targets = Vec::new();
        self.walk_subtree(handle, |h, node| {
            if !node.materials.is_empty() {
                targets.push(h);
            }
        });

        for target in targets {
            self.make_materials_unique(target);
            let Some(node) = self.nodes.get(target) else {
                continue;
            };
            for &m in &node.materials {
                if let Some(material) = self.materials.get_mut(m) {
                    material.set_opacity(opacity);
                }
            }
        }
    }

    // ========================================================================
    // Frame update
    // ========================================================================

    /// Propagates pose changes into world matrices before the frame is drawn.
    pub fn update_world_matrices(&mut self) -> usize {
        transform_system::update_hierarchy(&mut self.nodes, self.root)
    }
}

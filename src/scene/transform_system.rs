//! Transform System
//!
//! Propagates local TRS changes down the hierarchy into world matrices.
//! Kept apart from [`Scene`](crate::scene::Scene) so it only borrows the node
//! arena, which avoids borrow conflicts with the material pool.

use glam::Affine3A;
use slotmap::SlotMap;

use crate::scene::NodeHandle;
use crate::scene::node::Node;

/// Updates world matrices for the subtree rooted at `root`.
///
/// Iterative depth-first walk; a node's world matrix is only recomputed when
/// its own local matrix or an ancestor's world matrix changed this pass.
/// Returns the number of nodes whose world matrix was rewritten.
pub fn update_hierarchy(nodes: &mut SlotMap<NodeHandle, Node>, root: NodeHandle) -> usize {
    let mut updated = 0;
    let mut stack: Vec<(NodeHandle, Affine3A, bool)> = vec![(root, Affine3A::IDENTITY, false)];

    while let Some((handle, parent_world, parent_changed)) = stack.pop() {
        let Some(node) = nodes.get_mut(handle) else {
            continue;
        };

        let local_changed = node.transform.update_local_matrix();
        let changed = local_changed || parent_changed;
        if changed {
            let world = parent_world * node.transform.local_matrix;
            node.transform.set_world_matrix(world);
            updated += 1;
        }

        let world = node.transform.world_matrix;
        // Reverse so children pop in stored order.
        for &child in node.children.iter().rev() {
            stack.push((child, world, changed));
        }
    }

    updated
}

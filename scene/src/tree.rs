use crate::{Node, NodeId, Scene};

/// Trait for implementing tree traversal operations.
///
/// Implementors can be passed to [`walk_tree`] to perform arbitrary work on
/// each node. The visitor is called when entering and when leaving a node.
pub trait TreeVisitor {
    /// Called before the node's children are visited.
    ///
    /// Returns true to continue into the children, false to skip the subtree.
    fn enter_node(&mut self, node: &Node) -> bool;

    /// Called after the node's children have been visited.
    fn exit_node(&mut self, node: &Node);
}

/// Walks the scene tree depth-first starting from a given node, visiting
/// children in insertion order.
pub fn walk_tree<V: TreeVisitor>(scene: &Scene, node_id: NodeId, visitor: &mut V) {
    let Some(node) = scene.get_node(node_id) else {
        return;
    };

    if visitor.enter_node(node) {
        for &child_id in node.children() {
            walk_tree(scene, child_id, visitor);
        }
    }

    visitor.exit_node(node);
}

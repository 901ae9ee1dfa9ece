use bevy::prelude::*;

use crate::scene_graph::SceneGraph;

/// Index of a node inside a [`TransformTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// A standalone arena of named transforms, for driving a mirror without a [`World`].
#[derive(Default, Debug, Clone)]
pub struct TransformTree {
    nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone)]
struct TreeNode {
    name: Option<String>,
    transform: Transform,
    children: Vec<NodeId>,
    removed: bool,
    writes: usize,
}

impl TransformTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_root(&mut self, name: impl Into<String>, transform: Transform) -> NodeId {
        self.push(Some(name.into()), transform)
    }

    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        transform: Transform,
    ) -> NodeId {
        let id = self.push(Some(name.into()), transform);
        if let Some(parent) = self.nodes.get_mut(parent.0) {
            parent.children.push(id);
        }
        id
    }

    pub fn add_unnamed_child(&mut self, parent: NodeId, transform: Transform) -> NodeId {
        let id = self.push(None, transform);
        if let Some(parent) = self.nodes.get_mut(parent.0) {
            parent.children.push(id);
        }
        id
    }

    /// Removes `node` and everything below it.
    pub fn remove(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(node) = stack.pop() {
            if let Some(tree_node) = self.nodes.get_mut(node.0) {
                tree_node.removed = true;
                stack.extend(tree_node.children.iter().copied());
            }
        }
    }

    pub fn transform(&self, node: NodeId) -> Option<&Transform> {
        self.node(node).map(|n| &n.transform)
    }

    pub fn transform_mut(&mut self, node: NodeId) -> Option<&mut Transform> {
        self.node_mut(node).map(|n| &mut n.transform)
    }

    /// Number of times `node` was written through [`SceneGraph::set_local_transform`].
    pub fn writes(&self, node: NodeId) -> usize {
        self.node(node).map_or(0, |n| n.writes)
    }

    fn push(&mut self, name: Option<String>, transform: Transform) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            name,
            transform,
            children: Vec::new(),
            removed: false,
            writes: 0,
        });
        id
    }

    fn node(&self, node: NodeId) -> Option<&TreeNode> {
        self.nodes.get(node.0).filter(|n| n.removed == false)
    }

    fn node_mut(&mut self, node: NodeId) -> Option<&mut TreeNode> {
        self.nodes.get_mut(node.0).filter(|n| n.removed == false)
    }
}

impl SceneGraph for TransformTree {
    type Node = NodeId;

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node)
            .map(|n| {
                n.children
                    .iter()
                    .copied()
                    .filter(|&c| self.node(c).is_some())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn name(&self, node: NodeId) -> Option<&str> {
        self.node(node).and_then(|n| n.name.as_deref())
    }

    fn local_transform(&self, node: NodeId) -> Option<Transform> {
        self.transform(node).copied()
    }

    fn set_local_transform(&mut self, node: NodeId, transform: Transform) -> bool {
        let Some(node) = self.node_mut(node) else {
            return false;
        };
        node.transform = transform;
        node.writes += 1;
        true
    }
}

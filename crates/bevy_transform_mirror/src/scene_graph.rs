use std::fmt::Debug;

use bevy::prelude::*;

/// Read/write access to a hierarchy of named nodes carrying local transforms.
pub trait SceneGraph {
    type Node: Copy + Eq + Debug;

    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    fn name(&self, node: Self::Node) -> Option<&str>;

    /// Local transform of `node`, [`None`] if the node is gone or has no transform.
    fn local_transform(&self, node: Self::Node) -> Option<Transform>;

    /// Returns `false` if the node could not be written.
    fn set_local_transform(&mut self, node: Self::Node, transform: Transform) -> bool;

    /// All nodes below `root` in depth-first pre-order, `root` excluded.
    fn descendants(&self, root: Self::Node) -> Vec<Self::Node> {
        let mut descendants = Vec::new();
        let mut stack = self.children(root);
        stack.reverse();

        while let Some(node) = stack.pop() {
            descendants.push(node);
            let mut children = self.children(node);
            children.reverse();
            stack.extend(children);
        }

        descendants
    }

    /// First descendant of `root` (depth-first) named `name`.
    fn find_descendant_by_name(&self, root: Self::Node, name: &str) -> Option<Self::Node> {
        self.descendants(root)
            .into_iter()
            .find(|&node| self.name(node) == Some(name))
    }
}

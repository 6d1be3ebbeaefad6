//! Resolved dependency trees and their text rendering.

use serde::Serialize;

use pomtree_core::coordinate::Coordinate;

/// A coordinate with its resolved runtime dependencies, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    #[serde(flatten)]
    pub coordinate: Coordinate,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(coordinate: Coordinate, children: Vec<TreeNode>) -> Self {
        Self {
            coordinate,
            children,
        }
    }

    pub fn leaf(coordinate: Coordinate) -> Self {
        Self::new(coordinate, Vec::new())
    }

    pub fn root_name(&self) -> String {
        self.coordinate.root_name()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Root names of every node, depth first.
    pub fn root_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.walk(&mut |node, _| names.push(node.root_name()));
        names
    }

    /// Total number of nodes including this one.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::node_count).sum::<usize>()
    }

    pub fn contains(&self, root_name: &str) -> bool {
        self.find(root_name).is_some()
    }

    /// First node with the given root name, depth first.
    pub fn find(&self, root_name: &str) -> Option<&TreeNode> {
        if self.root_name() == root_name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(root_name))
    }

    /// Depth-first pre-order visit; the root is at depth 0.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a TreeNode, usize)) {
        self.walk_at(0, visit);
    }

    fn walk_at<'a>(&'a self, depth: usize, visit: &mut impl FnMut(&'a TreeNode, usize)) {
        visit(self, depth);
        for child in &self.children {
            child.walk_at(depth + 1, visit);
        }
    }

    /// Render with box-drawing connectors, one coordinate per line.
    ///
    /// `max_depth` limits how many levels below the root are shown.
    pub fn render(&self, max_depth: Option<usize>) -> String {
        let mut output = format!("{}\n", self.coordinate);
        let count = self.children.len();
        for (i, child) in self.children.iter().enumerate() {
            child.render_subtree(&mut output, "", i == count - 1, 1, max_depth);
        }
        output
    }

    fn render_subtree(
        &self,
        output: &mut String,
        prefix: &str,
        is_last: bool,
        depth: usize,
        max_depth: Option<usize>,
    ) {
        if max_depth.is_some_and(|max| depth > max) {
            return;
        }
        let connector = if is_last { "└── " } else { "├── " };
        output.push_str(&format!("{prefix}{connector}{}\n", self.coordinate));

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let count = self.children.len();
        for (i, child) in self.children.iter().enumerate() {
            child.render_subtree(output, &child_prefix, i == count - 1, depth + 1, max_depth);
        }
    }
}

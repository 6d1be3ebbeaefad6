//! Graph view over pruned dependency trees, for "why is this here" and
//! "who pulls this in" queries that a tree alone does not answer.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use pomtree_core::coordinate::Coordinate;

use crate::tree::TreeNode;

/// Pruned trees flattened into a petgraph `DiGraph`, one node per root name.
///
/// When several trees are merged, the first coordinate seen for a root name
/// is the one kept.
pub struct DependencyGraph {
    graph: DiGraph<Coordinate, ()>,
    index: HashMap<String, NodeIndex>,
    roots: Vec<NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
            roots: Vec::new(),
        }
    }

    pub fn from_trees<'a>(trees: impl IntoIterator<Item = &'a TreeNode>) -> Self {
        let mut graph = Self::new();
        for tree in trees {
            graph.add_tree(tree);
        }
        graph
    }

    /// Add a tree, recording its top node as a root.
    pub fn add_tree(&mut self, tree: &TreeNode) -> NodeIndex {
        let root = self.add_subtree(tree);
        if !self.roots.contains(&root) {
            self.roots.push(root);
        }
        root
    }

    fn add_subtree(&mut self, node: &TreeNode) -> NodeIndex {
        let idx = self.add_node(node.coordinate.clone());
        for child in &node.children {
            let child_idx = self.add_subtree(child);
            self.add_edge(idx, child_idx);
        }
        idx
    }

    /// Add or retrieve a node. If the root name already exists, returns the
    /// existing index.
    pub fn add_node(&mut self, coordinate: Coordinate) -> NodeIndex {
        let name = coordinate.root_name();
        if let Some(&idx) = self.index.get(&name) {
            return idx;
        }
        let idx = self.graph.add_node(coordinate);
        self.index.insert(name, idx);
        idx
    }

    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex) {
        if from != to && !self.graph.edges(from).any(|e| e.target() == to) {
            self.graph.add_edge(from, to, ());
        }
    }

    /// Look up a node by root name.
    pub fn find(&self, root_name: &str) -> Option<NodeIndex> {
        self.index.get(root_name).copied()
    }

    pub fn node(&self, idx: NodeIndex) -> &Coordinate {
        &self.graph[idx]
    }

    /// Direct dependencies of a node, sorted by root name.
    pub fn dependencies_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.neighbors_sorted(idx, Direction::Outgoing)
    }

    /// Nodes that directly depend on this one, sorted by root name.
    pub fn dependents_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.neighbors_sorted(idx, Direction::Incoming)
    }

    fn neighbors_sorted(&self, idx: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut nodes: Vec<NodeIndex> = self.graph.neighbors_directed(idx, direction).collect();
        nodes.sort_by_key(|&n| self.graph[n].root_name());
        nodes
    }

    /// Resolve a user-provided name to a node.
    ///
    /// Tries the exact root name, then `group:artifact`, then a bare
    /// artifact name.
    pub fn resolve_key(&self, key: &str) -> Option<NodeIndex> {
        if let Some(idx) = self.find(key) {
            return Some(idx);
        }
        if let Some(idx) = self.find(&key.replacen(':', "/", 1)) {
            return Some(idx);
        }
        self.graph
            .node_indices()
            .find(|&idx| self.graph[idx].artifact == key)
    }

    /// Path from the first root that reaches `target_key` down to it.
    pub fn find_path(&self, target_key: &str) -> Option<Vec<&Coordinate>> {
        let target = self.resolve_key(target_key)?;
        for &root in &self.roots {
            let mut path = Vec::new();
            let mut visited = HashSet::new();
            if self.dfs_path(root, target, &mut path, &mut visited) {
                return Some(path.iter().map(|&idx| &self.graph[idx]).collect());
            }
        }
        None
    }

    fn dfs_path(
        &self,
        current: NodeIndex,
        target: NodeIndex,
        path: &mut Vec<NodeIndex>,
        visited: &mut HashSet<NodeIndex>,
    ) -> bool {
        path.push(current);
        if current == target {
            return true;
        }
        if !visited.insert(current) {
            path.pop();
            return false;
        }
        for next in self.dependencies_of(current) {
            if self.dfs_path(next, target, path, visited) {
                return true;
            }
        }
        path.pop();
        false
    }

    /// Reverse tree for one dependency: everything that pulls it in, up to
    /// the roots. Empty if the name is unknown.
    pub fn print_inverted_tree(&self, target_key: &str) -> String {
        let mut output = String::new();
        let Some(idx) = self.resolve_key(target_key) else {
            return output;
        };

        output.push_str(&format!("{}\n", self.graph[idx]));

        let mut visited = HashSet::new();
        visited.insert(idx);

        let dependents = self.dependents_of(idx);
        let count = dependents.len();
        for (i, dep_idx) in dependents.into_iter().enumerate() {
            self.print_inverted_subtree(&mut output, dep_idx, "", i == count - 1, &mut visited);
        }

        output
    }

    fn print_inverted_subtree(
        &self,
        output: &mut String,
        idx: NodeIndex,
        prefix: &str,
        is_last: bool,
        visited: &mut HashSet<NodeIndex>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        output.push_str(&format!("{prefix}{connector}{}\n", self.graph[idx]));

        if !visited.insert(idx) {
            return;
        }

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let dependents = self.dependents_of(idx);
        let count = dependents.len();
        for (i, dep_idx) in dependents.into_iter().enumerate() {
            self.print_inverted_subtree(output, dep_idx, &child_prefix, i == count - 1, visited);
        }

        visited.remove(&idx);
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TreeNode {
        TreeNode::new(
            Coordinate::new("com.example", "app", "1.0"),
            vec![
                TreeNode::new(
                    Coordinate::new("org.a", "a", "1.0"),
                    vec![TreeNode::leaf(Coordinate::new("org.c", "my-lib", "3.0"))],
                ),
                TreeNode::leaf(Coordinate::new("org.b", "b", "2.0")),
            ],
        )
    }

    #[test]
    fn add_and_find() {
        let mut g = DependencyGraph::new();
        let idx = g.add_node(Coordinate::new("org.example", "lib", "1.0"));
        assert_eq!(g.find("org.example/lib"), Some(idx));
        assert_eq!(g.node(idx).version, "1.0");
        assert_eq!(g.add_node(Coordinate::new("org.example", "lib", "2.0")), idx);
        assert_eq!(g.node_count(), 1);
    }

    #[test]
    fn find_path_by_name_forms() {
        let g = DependencyGraph::from_trees([&sample()]);
        assert_eq!(g.node_count(), 4);

        let path = g.find_path("org.c/my-lib").unwrap();
        let names: Vec<&str> = path.iter().map(|c| c.artifact.as_str()).collect();
        assert_eq!(names, ["app", "a", "my-lib"]);

        assert_eq!(g.find_path("org.c:my-lib").unwrap().len(), 3);
        assert_eq!(g.find_path("my-lib").unwrap().len(), 3);
        assert!(g.find_path("org.missing/lib").is_none());
    }

    #[test]
    fn inverted_tree_walks_to_root() {
        let g = DependencyGraph::from_trees([&sample()]);
        let inv = g.print_inverted_tree("my-lib");
        let expected = "\
[org.c/my-lib \"3.0\"]
└── [org.a/a \"1.0\"]
    └── [com.example/app \"1.0\"]
";
        assert_eq!(inv, expected);
        assert!(g.print_inverted_tree("nothing").is_empty());
    }

    #[test]
    fn shared_dependency_across_roots() {
        let first = sample();
        let second = TreeNode::new(
            Coordinate::new("com.example", "tool", "1.0"),
            vec![TreeNode::leaf(Coordinate::new("org.b", "b", "2.5"))],
        );
        let g = DependencyGraph::from_trees([&first, &second]);
        assert_eq!(g.node_count(), 5);
        assert_eq!(g.find_path("b").unwrap()[0].artifact, "app");

        let b = g.find("org.b/b").unwrap();
        assert_eq!(g.node(b).version, "2.0");
        let dependents: Vec<String> = g
            .dependents_of(b)
            .into_iter()
            .map(|idx| g.node(idx).root_name())
            .collect();
        assert_eq!(dependents, ["com.example/app", "com.example/tool"]);
    }
}

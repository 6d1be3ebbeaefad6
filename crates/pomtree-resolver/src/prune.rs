//! Pruning: reduce a resolved tree so each root name appears at most once
//! (first occurrence in depth-first order wins) and no excluded dependency
//! survives beneath the node that excluded it.

use std::collections::HashMap;

use crate::conflict::{ConflictReport, ExcludedDependency, VersionConflict};
use crate::tree::TreeNode;

/// Prune a resolved tree. The root is always retained.
pub fn prune(tree: &TreeNode) -> TreeNode {
    prune_with_report(tree).0
}

/// Prune a resolved tree and report what was dropped.
pub fn prune_with_report(tree: &TreeNode) -> (TreeNode, ConflictReport) {
    let mut pruner = Pruner::default();
    pruner.mark(tree.root_name(), Seen::Retained(tree.coordinate.version.clone()));
    let pruned = pruner.visit(tree);
    (pruned, pruner.report)
}

/// Why a root name is already taken.
#[derive(Debug)]
enum Seen {
    /// Retained at this version.
    Retained(String),
    /// Excluded by this node.
    Excluded(String),
}

#[derive(Default)]
struct Pruner {
    seen: HashMap<String, Seen>,
    /// Groups excluded wholesale, with the excluding node.
    excluded_groups: HashMap<String, String>,
    report: ConflictReport,
}

impl Pruner {
    /// First mark wins.
    fn mark(&mut self, name: String, seen: Seen) {
        self.seen.entry(name).or_insert(seen);
    }

    fn visit(&mut self, node: &TreeNode) -> TreeNode {
        let name = node.root_name();
        for exclusion in &node.coordinate.exclusions {
            if exclusion.is_wildcard() {
                self.excluded_groups
                    .entry(exclusion.group.clone())
                    .or_insert_with(|| name.clone());
            } else {
                self.mark(exclusion.root_name(), Seen::Excluded(name.clone()));
            }
        }

        let mut survivors = Vec::new();
        for child in &node.children {
            if self.admit(child, &name) {
                survivors.push(child);
            }
        }

        let children = survivors.into_iter().map(|c| self.visit(c)).collect();
        TreeNode::new(node.coordinate.clone(), children)
    }

    /// Decide whether `child` of `parent` survives, marking it seen if so.
    fn admit(&mut self, child: &TreeNode, parent: &str) -> bool {
        let name = child.root_name();
        let version = &child.coordinate.version;

        if let Some(by) = self.excluded_groups.get(&child.coordinate.group) {
            tracing::debug!("Dropping {name}: group excluded by {by}");
            self.report.add_exclusion(ExcludedDependency {
                name,
                version: version.clone(),
                excluded_by: by.clone(),
            });
            return false;
        }

        match self.seen.get(&name) {
            None => {
                self.seen.insert(name, Seen::Retained(version.clone()));
                true
            }
            Some(Seen::Retained(kept)) => {
                if kept != version {
                    self.report.add(VersionConflict {
                        name,
                        requested: version.clone(),
                        resolved: kept.clone(),
                        requested_by: parent.to_string(),
                    });
                }
                false
            }
            Some(Seen::Excluded(by)) => {
                self.report.add_exclusion(ExcludedDependency {
                    name,
                    version: version.clone(),
                    excluded_by: by.clone(),
                });
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pomtree_core::coordinate::Coordinate;

    use super::*;

    fn node(artifact: &str, version: &str, children: Vec<TreeNode>) -> TreeNode {
        TreeNode::new(Coordinate::new("g", artifact, version), children)
    }

    #[test]
    fn root_always_retained() {
        let tree = node("a", "1.0", vec![]);
        assert_eq!(prune(&tree), tree);
    }

    #[test]
    fn first_occurrence_wins_between_siblings() {
        let tree = node(
            "root",
            "1",
            vec![
                node("a", "1", vec![node("x", "1.0", vec![])]),
                node("b", "1", vec![node("x", "2.0", vec![])]),
            ],
        );
        let (pruned, report) = prune_with_report(&tree);
        assert_eq!(pruned.root_names(), ["g/root", "g/a", "g/x", "g/b"]);
        assert_eq!(pruned.find("g/x").unwrap().coordinate.version, "1.0");
        assert_eq!(report.conflicts.len(), 1);
        assert_eq!(report.conflicts[0].requested, "2.0");
        assert_eq!(report.conflicts[0].resolved, "1.0");
        assert_eq!(report.conflicts[0].requested_by, "g/b");
    }

    #[test]
    fn shallower_sibling_marked_before_deeper_cousin() {
        // a's subtree is walked before b, but b is marked seen when the root's
        // children are filtered, so a's nested b is dropped.
        let tree = node(
            "root",
            "1",
            vec![node("a", "1", vec![node("b", "9", vec![])]), node("b", "1", vec![])],
        );
        let pruned = prune(&tree);
        assert_eq!(pruned.root_names(), ["g/root", "g/a", "g/b"]);
        assert_eq!(pruned.children[1].coordinate.version, "1");
        assert!(pruned.children[0].is_leaf());
    }

    #[test]
    fn exclusions_reach_all_descendants() {
        let excluding = TreeNode::new(
            Coordinate::new("g", "a", "1").with_exclusion("g", "x"),
            vec![node("b", "1", vec![node("c", "1", vec![node("x", "1", vec![])])])],
        );
        let tree = node("root", "1", vec![excluding]);
        let (pruned, report) = prune_with_report(&tree);
        assert!(!pruned.contains("g/x"));
        assert_eq!(pruned.root_names(), ["g/root", "g/a", "g/b", "g/c"]);
        assert_eq!(report.exclusions.len(), 1);
        assert_eq!(report.exclusions[0].excluded_by, "g/a");
    }

    #[test]
    fn wildcard_exclusion_drops_whole_group() {
        let excluding = TreeNode::new(
            Coordinate::new("g", "a", "1").with_exclusion("org.slf4j", "*"),
            vec![
                TreeNode::leaf(Coordinate::new("org.slf4j", "slf4j-api", "1.7")),
                TreeNode::leaf(Coordinate::new("org.slf4j", "slf4j-simple", "1.7")),
                node("b", "1", vec![]),
            ],
        );
        let pruned = prune(&node("root", "1", vec![excluding]));
        assert_eq!(pruned.root_names(), ["g/root", "g/a", "g/b"]);
    }

    #[test]
    fn pruning_is_idempotent() {
        let tree = node(
            "root",
            "1",
            vec![
                node("a", "1", vec![node("c", "1", vec![node("a", "2", vec![])])]),
                node("b", "1", vec![node("c", "2", vec![]), node("d", "1", vec![])]),
                node("d", "2", vec![]),
            ],
        );
        let once = prune(&tree);
        let twice = prune(&once);
        assert_eq!(once.root_names(), twice.root_names());
        assert_eq!(once, twice);
    }
}

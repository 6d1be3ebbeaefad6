//! The chain of coordinates from a resolution root down to the node being
//! expanded, used to stop on dependency cycles.

use std::collections::HashSet;

use pomtree_core::coordinate::Coordinate;

/// Root names on the current resolution path.
///
/// Unlike the pruner's global `seen` set this only holds ancestors of the
/// node being expanded, so a dependency shared by two siblings is still
/// expanded under both.
#[derive(Debug, Default)]
pub struct AncestorPath {
    names: Vec<String>,
    index: HashSet<String>,
}

impl AncestorPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a coordinate. Returns `false` if it is already on the path.
    pub fn push(&mut self, coordinate: &Coordinate) -> bool {
        let name = coordinate.root_name();
        if !self.index.insert(name.clone()) {
            return false;
        }
        self.names.push(name);
        true
    }

    /// Leave the most recently entered coordinate.
    pub fn pop(&mut self) {
        if let Some(name) = self.names.pop() {
            self.index.remove(&name);
        }
    }

    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        self.index.contains(&coordinate.root_name())
    }

    /// `a -> b -> a` style rendering of the path closed by `next`.
    pub fn describe(&self, next: &Coordinate) -> String {
        let mut parts: Vec<&str> = self.names.iter().map(String::as_str).collect();
        let closing = next.root_name();
        parts.push(&closing);
        parts.join(" -> ")
    }
}

//! What pruning threw away: duplicates at a different version, and
//! dependencies removed by an exclusion.

use std::fmt;

use serde::Serialize;

/// Everything pruning dropped that a user might want explained.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictReport {
    pub conflicts: Vec<VersionConflict>,
    pub exclusions: Vec<ExcludedDependency>,
}

/// A dependency requested at one version but retained at another because an
/// earlier occurrence won.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionConflict {
    pub name: String,
    pub requested: String,
    pub resolved: String,
    pub requested_by: String,
}

/// A dependency removed because an ancestor excluded it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExcludedDependency {
    pub name: String,
    pub version: String,
    pub excluded_by: String,
}

impl ConflictReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, conflict: VersionConflict) {
        self.conflicts.push(conflict);
    }

    pub fn add_exclusion(&mut self, excluded: ExcludedDependency) {
        self.exclusions.push(excluded);
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty() && self.exclusions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conflicts.len() + self.exclusions.len()
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.conflicts.is_empty() {
            writeln!(f, "No version conflicts.")?;
        } else {
            writeln!(f, "Version conflicts ({}):", self.conflicts.len())?;
            for c in &self.conflicts {
                writeln!(f, "  {c}")?;
            }
        }
        if !self.exclusions.is_empty() {
            writeln!(f, "Excluded ({}):", self.exclusions.len())?;
            for e in &self.exclusions {
                writeln!(f, "  {e}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for VersionConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} requested {} by {} but resolved {} (first occurrence wins)",
            self.name, self.requested, self.requested_by, self.resolved
        )
    }
}

impl fmt::Display for ExcludedDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} excluded by {}", self.name, self.version, self.excluded_by)
    }
}

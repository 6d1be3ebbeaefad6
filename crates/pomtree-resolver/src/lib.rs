//! Dependency resolution engine: parent-chain property inheritance,
//! placeholder substitution, transitive tree expansion, and pruning with
//! "first occurrence wins" semantics and transitive exclusions.

pub mod ancestry;
pub mod api;
pub mod conflict;
pub mod graph;
pub mod properties;
pub mod prune;
pub mod resolver;
pub mod tree;

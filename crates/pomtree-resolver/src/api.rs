//! Entry points for callers: resolve and prune a list of coordinates, or
//! look up the effective properties of one.

use pomtree_core::config::ResolutionMode;
use pomtree_core::coordinate::Coordinate;
use pomtree_maven::store::ManifestSource;
use pomtree_util::errors::PomtreeResult;

use crate::conflict::ConflictReport;
use crate::properties::{PropertyResolver, PropertyTable};
use crate::prune::prune_with_report;
use crate::resolver::GraphResolver;
use crate::tree::TreeNode;

/// The outcome of resolving one root coordinate.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Full tree with duplicates, as expanded.
    pub raw: TreeNode,
    pub pruned: TreeNode,
    pub report: ConflictReport,
}

/// Resolve and prune each coordinate independently, in input order.
pub fn resolve_and_prune<S: ManifestSource + ?Sized>(
    source: &S,
    mode: ResolutionMode,
    coordinates: &[Coordinate],
) -> PomtreeResult<Vec<TreeNode>> {
    Ok(resolve_all(source, mode, coordinates)?
        .into_iter()
        .map(|r| r.pruned)
        .collect())
}

/// Like [`resolve_and_prune`], keeping the raw trees and conflict reports.
pub fn resolve_all<S: ManifestSource + ?Sized>(
    source: &S,
    mode: ResolutionMode,
    coordinates: &[Coordinate],
) -> PomtreeResult<Vec<Resolution>> {
    let resolver = GraphResolver::new(source, mode);
    coordinates
        .iter()
        .map(|coordinate| {
            let raw = resolver.resolve(coordinate)?;
            let (pruned, report) = prune_with_report(&raw);
            tracing::debug!(
                "{coordinate}: {} nodes resolved, {} after pruning",
                raw.node_count(),
                pruned.node_count()
            );
            Ok(Resolution {
                raw,
                pruned,
                report,
            })
        })
        .collect()
}

/// Effective properties of a coordinate's manifest and its parent chain.
pub fn properties_for<S: ManifestSource + ?Sized>(
    source: &S,
    coordinate: &Coordinate,
) -> PropertyTable {
    PropertyResolver::new(source).properties_for(coordinate)
}

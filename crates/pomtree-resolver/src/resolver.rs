//! Transitive expansion of a coordinate into its full, unpruned dependency
//! tree: runtime filtering, per-manifest version substitution, and a cycle
//! guard on the current resolution path.

use pomtree_core::config::ResolutionMode;
use pomtree_core::coordinate::Coordinate;
use pomtree_maven::store::ManifestSource;
use pomtree_util::errors::{PomtreeError, PomtreeResult};

use crate::ancestry::AncestorPath;
use crate::properties::{substitute_version, PropertyResolver};
use crate::tree::TreeNode;

/// Depth-first resolver over a [`ManifestSource`].
///
/// In [`ResolutionMode::Lenient`] an unavailable manifest becomes a leaf and
/// a cycle is cut where it closes. In [`ResolutionMode::Strict`] both abort
/// the resolution.
pub struct GraphResolver<'a, S: ?Sized> {
    source: &'a S,
    properties: PropertyResolver<'a, S>,
    mode: ResolutionMode,
}

impl<'a, S: ManifestSource + ?Sized> GraphResolver<'a, S> {
    pub fn new(source: &'a S, mode: ResolutionMode) -> Self {
        Self {
            source,
            properties: PropertyResolver::new(source),
            mode,
        }
    }

    pub fn mode(&self) -> ResolutionMode {
        self.mode
    }

    /// Resolve `coordinate` and everything it transitively depends on at
    /// runtime. Duplicates are kept; see [`crate::prune`].
    pub fn resolve(&self, coordinate: &Coordinate) -> PomtreeResult<TreeNode> {
        tracing::debug!("Resolving {coordinate}");
        let mut path = AncestorPath::new();
        self.expand(coordinate.clone(), &mut path)
    }

    fn expand(&self, coordinate: Coordinate, path: &mut AncestorPath) -> PomtreeResult<TreeNode> {
        let manifest = match self.source.manifest(&coordinate) {
            Ok(manifest) => manifest,
            Err(e) if self.mode.is_strict() => return Err(e),
            Err(e) => {
                if e.is_absence() {
                    tracing::debug!("No manifest for {coordinate}: {e}");
                } else {
                    tracing::warn!("Treating {coordinate} as a leaf: {e}");
                }
                return Ok(TreeNode::leaf(coordinate));
            }
        };

        let properties = self.properties.properties_for_manifest(&manifest);
        path.push(&coordinate);

        let mut children = Vec::new();
        for declared in manifest.runtime_dependencies() {
            let dependency = declared.with_version(substitute_version(declared, &properties));
            if path.contains(&dependency) {
                let cycle = path.describe(&dependency);
                if self.mode.is_strict() {
                    return Err(PomtreeError::CycleDetected { path: cycle });
                }
                tracing::warn!("Dependency cycle: {cycle}");
                children.push(TreeNode::leaf(dependency));
                continue;
            }
            children.push(self.expand(dependency, path)?);
        }

        path.pop();
        Ok(TreeNode::new(coordinate, children))
    }
}

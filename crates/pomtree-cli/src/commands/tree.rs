//! Handler for `pomtree tree`.

use miette::Result;

use pomtree_core::config::ResolverConfig;
use pomtree_ops::ops_tree::{self, TreeOptions};

#[allow(clippy::too_many_arguments)]
pub fn exec(
    config: &ResolverConfig,
    coordinates: &[String],
    depth: Option<u32>,
    raw: bool,
    json: bool,
    why: Option<String>,
    inverted: bool,
    conflicts: bool,
) -> Result<()> {
    let roots = if coordinates.is_empty() {
        config.root_coordinates()?
    } else {
        pomtree_ops::parse_coordinates(coordinates)?
    };

    let opts = TreeOptions {
        depth: depth.map(|d| d as usize),
        raw,
        json,
        why,
        inverted,
        conflicts,
    };

    ops_tree::tree(config, &roots, &opts)
}

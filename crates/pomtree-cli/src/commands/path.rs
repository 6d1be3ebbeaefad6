use miette::Result;

use pomtree_core::config::ResolverConfig;
use pomtree_ops::ops_path;

pub fn exec(config: &ResolverConfig, coordinate: &str) -> Result<()> {
    let coordinate = pomtree_ops::parse_coordinate(coordinate)?;
    ops_path::path(config, &coordinate)
}

pub mod ops_path;
pub mod ops_properties;
pub mod ops_tree;

use pomtree_core::coordinate::Coordinate;
use pomtree_util::errors::{PomtreeError, PomtreeResult};

/// Parse command-line coordinates (`group:artifact:version`,
/// `group/artifact:version` or `name:version`).
pub fn parse_coordinates(args: &[String]) -> PomtreeResult<Vec<Coordinate>> {
    args.iter().map(|s| parse_coordinate(s)).collect()
}

pub fn parse_coordinate(arg: &str) -> PomtreeResult<Coordinate> {
    let coordinate = Coordinate::parse(arg).ok_or_else(|| PomtreeError::Config {
        message: format!("Invalid coordinate '{arg}': expected group:artifact:version"),
    })?;
    match coordinate.layout_error() {
        Some(problem) => Err(PomtreeError::Config {
            message: format!("Invalid coordinate '{arg}': {problem}"),
        }),
        None => Ok(coordinate),
    }
}

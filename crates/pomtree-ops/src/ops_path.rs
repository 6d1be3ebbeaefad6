//! Operation: show where a coordinate's manifest lives, locally and remotely.

use pomtree_core::config::ResolverConfig;
use pomtree_core::coordinate::Coordinate;
use pomtree_maven::cache::LocalCache;
use pomtree_maven::repository::Repository;

pub fn path(config: &ResolverConfig, coordinate: &Coordinate) -> miette::Result<()> {
    print!("{}", render(config, coordinate));
    Ok(())
}

pub fn render(config: &ResolverConfig, coordinate: &Coordinate) -> String {
    let repository_path = coordinate.repository_path();
    let cache = LocalCache::new(config.cache_root());
    let cached = if cache.contains(&repository_path) {
        "cached"
    } else {
        "not cached"
    };

    let mut output = format!("{repository_path}\n");
    match cache.path_for(&repository_path) {
        Some(local) => output.push_str(&format!("  cache: {} ({cached})\n", local.display())),
        None => output.push_str("  cache: (outside the cache root, never cached)\n"),
    }
    for repo in config.repositories.iter().map(Repository::from_config) {
        output.push_str(&format!("  {}: {}\n", repo.name, repo.url_for(&repository_path)));
    }
    output
}

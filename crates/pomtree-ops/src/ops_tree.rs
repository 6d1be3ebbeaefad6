//! Operation: display the dependency tree.

use pomtree_core::config::{ResolutionMode, ResolverConfig};
use pomtree_core::coordinate::Coordinate;
use pomtree_maven::store::{ManifestSource, ManifestStore};
use pomtree_resolver::api::{resolve_all, Resolution};
use pomtree_resolver::graph::DependencyGraph;
use pomtree_util::errors::{PomtreeError, PomtreeResult};

/// Options for `pomtree tree`.
#[derive(Debug, Default)]
pub struct TreeOptions {
    /// Maximum tree depth to display.
    pub depth: Option<usize>,
    /// Show the tree as resolved, before pruning.
    pub raw: bool,
    /// Emit JSON instead of text.
    pub json: bool,
    /// Show how a specific dependency is reached.
    pub why: Option<String>,
    /// With `why`, show everything that depends on it instead.
    pub inverted: bool,
    /// Show what pruning dropped.
    pub conflicts: bool,
}

/// Resolve each root and print its tree.
pub fn tree(
    config: &ResolverConfig,
    coordinates: &[Coordinate],
    opts: &TreeOptions,
) -> miette::Result<()> {
    use pomtree_util::progress::{spinner, status, status_warn};

    if coordinates.is_empty() {
        return Err(PomtreeError::Config {
            message: "No coordinates given and no roots configured".to_string(),
        }
        .into());
    }

    let store = ManifestStore::from_config(config)?;
    tracing::debug!(
        "Resolving {} root(s) in {:?} mode",
        coordinates.len(),
        config.mode
    );
    if store.repositories().is_empty() {
        let root = store.cache().root();
        if root.is_dir() {
            status("Offline", &format!("using {}", root.display()));
        } else {
            status_warn("Offline", &format!("{} does not exist", root.display()));
        }
    }

    let sp = spinner(&format!("Resolving {} root(s)...", coordinates.len()));
    let rendered = render(&store, config.mode, coordinates, opts);
    sp.finish_and_clear();

    print!("{}", rendered?);
    Ok(())
}

/// Resolve and render to a string; `tree` prints this.
pub fn render<S: ManifestSource + ?Sized>(
    source: &S,
    mode: ResolutionMode,
    coordinates: &[Coordinate],
    opts: &TreeOptions,
) -> PomtreeResult<String> {
    let resolutions = resolve_all(source, mode, coordinates)?;

    if let Some(ref target) = opts.why {
        return Ok(render_why(&resolutions, target, opts.inverted));
    }

    if opts.conflicts {
        let mut output = String::new();
        for r in &resolutions {
            output.push_str(&format!("{}:\n{}", r.pruned.coordinate, r.report));
        }
        return Ok(output);
    }

    let trees: Vec<_> = resolutions
        .iter()
        .map(|r| if opts.raw { &r.raw } else { &r.pruned })
        .collect();

    if opts.json {
        let mut json = serde_json::to_string_pretty(&trees).map_err(|e| PomtreeError::Generic {
            message: format!("Failed to serialize tree: {e}"),
        })?;
        json.push('\n');
        return Ok(json);
    }

    Ok(trees
        .iter()
        .map(|t| t.render(opts.depth))
        .collect::<Vec<_>>()
        .join("\n"))
}

fn render_why(resolutions: &[Resolution], target: &str, inverted: bool) -> String {
    let graph = DependencyGraph::from_trees(resolutions.iter().map(|r| &r.pruned));
    tracing::debug!("Searching {} graph nodes for {target}", graph.node_count());
    let not_found = format!("Dependency '{target}' not found in the graph.\n");

    if inverted {
        let output = graph.print_inverted_tree(target);
        return if output.is_empty() { not_found } else { output };
    }

    match graph.find_path(target) {
        Some(path) => {
            let mut output = format!("Path to {target}:\n");
            for (i, node) in path.iter().enumerate() {
                output.push_str(&format!("{}{node}\n", "  ".repeat(i)));
            }
            output
        }
        None => not_found,
    }
}

//! Inherited property tables and `${...}` version substitution.

use std::collections::{BTreeMap, HashSet};

use pomtree_core::coordinate::Coordinate;
use pomtree_maven::pom::Manifest;
use pomtree_maven::store::ManifestSource;

/// Property name to value, merged across a manifest's parent chain.
pub type PropertyTable = BTreeMap<String, String>;

/// Upper bound on re-expansion of values that themselves hold placeholders.
const MAX_INTERPOLATION_ROUNDS: usize = 20;

/// Builds property tables by walking a manifest's parent chain.
pub struct PropertyResolver<'a, S: ?Sized> {
    source: &'a S,
}

impl<'a, S: ManifestSource + ?Sized> PropertyResolver<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Effective properties for a coordinate. Never fails: an unavailable
    /// manifest yields an empty table.
    pub fn properties_for(&self, coordinate: &Coordinate) -> PropertyTable {
        match self.source.manifest(coordinate) {
            Ok(manifest) => self.properties_for_manifest(&manifest),
            Err(e) => {
                tracing::debug!("No properties for {coordinate}: {e}");
                PropertyTable::new()
            }
        }
    }

    /// Effective properties for an already fetched manifest.
    pub fn properties_for_manifest(&self, manifest: &Manifest) -> PropertyTable {
        merge_properties(&self.ancestors(manifest))
    }

    /// The manifest followed by its parent, grandparent and so on.
    ///
    /// The chain stops at the first manifest without a parent, at a parent
    /// that cannot be fetched, or at a parent already in the chain.
    pub fn ancestors(&self, manifest: &Manifest) -> Vec<Manifest> {
        let mut seen = HashSet::new();
        seen.insert(manifest.coordinate().repository_path());

        let mut chain = vec![manifest.clone()];
        let mut next = parent_of(manifest);

        while let Some(parent) = next {
            if !seen.insert(parent.repository_path()) {
                tracing::warn!("Parent chain of {} loops at {parent}", manifest.coordinate());
                break;
            }
            match self.source.manifest(&parent) {
                Ok(parent_manifest) => {
                    next = parent_of(&parent_manifest);
                    chain.push(parent_manifest);
                }
                Err(e) => {
                    tracing::debug!("Parent {parent} unavailable: {e}");
                    break;
                }
            }
        }
        chain
    }
}

fn parent_of(manifest: &Manifest) -> Option<Coordinate> {
    if manifest.has_parent() {
        manifest.parent.clone()
    } else {
        None
    }
}

/// Merge a chain ordered nearest first. Outer ancestors are applied first so
/// nearer manifests override them; empty values never overwrite.
pub fn merge_properties(chain: &[Manifest]) -> PropertyTable {
    let mut table = PropertyTable::new();
    for manifest in chain.iter().rev() {
        for (key, value) in manifest.own_properties() {
            if !value.is_empty() {
                table.insert(key, value);
            }
        }
    }
    table
}

/// Property consulted for a dependency declared without a version:
/// `tools.reader.version` for `tools-reader`.
pub fn convention_key(artifact: &str) -> String {
    format!("{}.version", artifact.replace('-', "."))
}

/// The concrete version for a declared dependency.
pub fn substitute_version(dependency: &Coordinate, properties: &PropertyTable) -> String {
    let declared = dependency.version.trim();
    if declared.is_empty() {
        return properties
            .get(&convention_key(&dependency.artifact))
            .map(|v| interpolate(v, properties))
            .unwrap_or_default();
    }
    if declared.contains("${") {
        interpolate(declared, properties)
    } else {
        declared.to_string()
    }
}

/// Replace every `${name}` in `input`; unknown names become empty.
pub fn interpolate(input: &str, properties: &PropertyTable) -> String {
    let mut result = input.to_string();
    for _ in 0..MAX_INTERPOLATION_ROUNDS {
        if !result.contains("${") {
            break;
        }
        let next = substitute_once(&result, properties);
        if next == result {
            break;
        }
        result = next;
    }
    result
}

fn substitute_once(input: &str, properties: &PropertyTable) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let key = &rest[start + 2..start + 2 + len];
        out.push_str(properties.get(key).map(String::as_str).unwrap_or(""));
        rest = &rest[start + 2 + len + 1..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(pairs: &[(&str, &str)]) -> PropertyTable {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn placeholder_substitution() {
        let props = table(&[("x.version", "1.2.3")]);
        let dep = Coordinate::new("g", "x", "${x.version}");
        assert_eq!(substitute_version(&dep, &props), "1.2.3");

        let absent = Coordinate::new("g", "y", "${y.version}");
        assert_eq!(substitute_version(&absent, &props), "");
    }

    #[test]
    fn embedded_and_nested_placeholders() {
        let props = table(&[
            ("base", "1.2"),
            ("full", "${base}.3"),
            ("project.version", "4.0"),
        ]);
        assert_eq!(interpolate("${base}-SNAPSHOT", &props), "1.2-SNAPSHOT");
        assert_eq!(interpolate("${full}", &props), "1.2.3");
        assert_eq!(interpolate("v${project.version}/${missing}", &props), "v4.0/");
    }

    #[test]
    fn unterminated_placeholder_left_alone() {
        assert_eq!(interpolate("${oops", &PropertyTable::new()), "${oops");
    }

    #[test]
    fn self_reference_terminates() {
        let props = table(&[("a", "${a}")]);
        assert_eq!(interpolate("${a}", &props), "${a}");
    }

    #[test]
    fn versionless_dependency_uses_convention() {
        let props = table(&[("tools.reader.version", "1.0.0")]);
        let dep = Coordinate::new("org.clojure", "tools-reader", "");
        assert_eq!(convention_key("tools-reader"), "tools.reader.version");
        assert_eq!(substitute_version(&dep, &props), "1.0.0");

        let unknown = Coordinate::new("org.clojure", "data-json", "");
        assert_eq!(substitute_version(&unknown, &props), "");
    }

    #[test]
    fn literal_version_unchanged() {
        let dep = Coordinate::new("g", "a", "2.0");
        assert_eq!(substitute_version(&dep, &PropertyTable::new()), "2.0");
    }

    #[test]
    fn merge_nearest_wins_and_skips_empty() {
        let with = |pairs: &[(&str, &str)]| Manifest {
            properties: table(pairs),
            ..Manifest::default()
        };
        let child = with(&[("a", "child"), ("b", "")]);
        let parent = with(&[("a", "parent"), ("b", "parent"), ("c", "parent")]);
        let grandparent = with(&[("c", "grandparent"), ("d", "grandparent")]);

        let merged = merge_properties(&[child, parent, grandparent]);
        assert_eq!(merged["a"], "child");
        assert_eq!(merged["b"], "parent");
        assert_eq!(merged["c"], "parent");
        assert_eq!(merged["d"], "grandparent");
    }
}

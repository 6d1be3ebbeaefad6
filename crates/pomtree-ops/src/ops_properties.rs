//! Operation: print the effective property table of a manifest.

use pomtree_core::config::ResolverConfig;
use pomtree_core::coordinate::Coordinate;
use pomtree_maven::store::{ManifestSource, ManifestStore};
use pomtree_resolver::api::properties_for;

/// Print `key = value` lines for every inherited and declared property.
pub fn properties(config: &ResolverConfig, coordinate: &Coordinate) -> miette::Result<()> {
    let store = ManifestStore::from_config(config)?;
    print!("{}", render(&store, coordinate));
    Ok(())
}

pub fn render<S: ManifestSource + ?Sized>(source: &S, coordinate: &Coordinate) -> String {
    let table = properties_for(source, coordinate);
    if table.is_empty() {
        return format!("No properties for {coordinate}.\n");
    }
    let width = table.keys().map(String::len).max().unwrap_or(0);
    table
        .iter()
        .map(|(k, v)| format!("{k:<width$} = {v}\n"))
        .collect()
}

#[cfg(test)]
mod tests {
    use pomtree_maven::pom::Manifest;
    use pomtree_util::errors::{PomtreeError, PomtreeResult};

    use super::*;

    struct Single(Manifest);

    impl ManifestSource for Single {
        fn manifest(&self, coordinate: &Coordinate) -> PomtreeResult<Manifest> {
            if coordinate.artifact == self.0.artifact_id {
                Ok(self.0.clone())
            } else {
                Err(PomtreeError::ManifestNotFound {
                    path: coordinate.repository_path(),
                })
            }
        }
    }

    #[test]
    fn aligned_table() {
        let mut manifest = Manifest {
            group_id: "g".to_string(),
            artifact_id: "a".to_string(),
            version: "1.0".to_string(),
            ..Manifest::default()
        };
        manifest
            .properties
            .insert("clojure.version".to_string(), "1.9.0".to_string());

        let output = render(&Single(manifest), &Coordinate::new("g", "a", "1.0"));
        assert!(output.contains("clojure.version    = 1.9.0\n"));
        assert!(output.contains("project.version    = 1.0\n"));
        assert!(output.contains("project.artifactId = a\n"));
    }

    #[test]
    fn missing_manifest() {
        let output = render(&Single(Manifest::default()), &Coordinate::new("g", "zzz", "1"));
        assert_eq!(output, "No properties for [g/zzz \"1\"].\n");
    }
}

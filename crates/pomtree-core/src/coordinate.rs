use std::fmt;

use serde::{Deserialize, Serialize};

/// A dependency coordinate: `group`, `artifact`, `version` plus the
/// declaration metadata that travels with it through resolution.
///
/// `version` may be empty or still contain a `${...}` placeholder until the
/// declaring manifest's properties have been applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub group: String,
    pub artifact: String,
    pub version: String,
    /// Empty means the Maven default, `compile`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub scope: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclusions: Vec<Exclusion>,
}

/// A transitive dependency to exclude, identified by group and artifact.
///
/// An artifact of `*` (or an empty artifact) excludes the whole group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Exclusion {
    pub group: String,
    pub artifact: String,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Root name shared by coordinates and exclusions: the bare group when group
/// and artifact coincide (`clojure` style), `group/artifact` otherwise.
fn root_name(group: &str, artifact: &str) -> String {
    if group == artifact {
        group.to_string()
    } else {
        format!("{group}/{artifact}")
    }
}

impl Coordinate {
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn with_exclusion(mut self, group: impl Into<String>, artifact: impl Into<String>) -> Self {
        self.exclusions.push(Exclusion {
            group: group.into(),
            artifact: artifact.into(),
        });
        self
    }

    /// Copy of this coordinate with its version replaced.
    pub fn with_version(&self, version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..self.clone()
        }
    }

    /// Parse a command-line coordinate.
    ///
    /// Accepts `group:artifact:version`, `group/artifact:version` and the
    /// single-name form `name:version` (group and artifact both `name`).
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        let (group, artifact, version) = match parts.as_slice() {
            [group, artifact, version] => (*group, *artifact, *version),
            [name, version] => match name.split_once('/') {
                Some((group, artifact)) => (group, artifact, *version),
                None => (*name, *name, *version),
            },
            _ => return None,
        };
        if group.is_empty() || artifact.is_empty() || version.is_empty() || artifact.contains('/')
        {
            return None;
        }
        Some(Self::new(group, artifact, version))
    }

    /// `group` if it equals `artifact`, otherwise `group/artifact`.
    pub fn root_name(&self) -> String {
        root_name(&self.group, &self.artifact)
    }

    /// A dependency ends up on the runtime classpath unless it is optional
    /// or scoped `test`, `provided` or `system`.
    pub fn is_runtime(&self) -> bool {
        !self.optional && !matches!(self.scope.as_str(), "test" | "provided" | "system")
    }

    pub fn pom_name(&self) -> String {
        format!("{}-{}.pom", self.artifact, self.version)
    }

    /// Directory of this coordinate in the standard repository layout.
    ///
    /// `org.clojure:core.async:0.2.395` becomes `org/clojure/core.async/0.2.395`.
    pub fn repository_dir(&self) -> String {
        format!(
            "{}/{}/{}",
            self.group.replace('.', "/"),
            self.artifact,
            self.version
        )
    }

    /// Relative path of this coordinate's POM in the repository layout.
    pub fn repository_path(&self) -> String {
        format!("{}/{}", self.repository_dir(), self.pom_name())
    }

    /// Why this coordinate cannot be mapped onto the repository layout, if
    /// it cannot.
    ///
    /// Each dot-separated group segment, the artifact and the version must be
    /// a single non-empty path segment; the version may not contain `..`.
    pub fn layout_error(&self) -> Option<String> {
        fn segment_ok(s: &str) -> bool {
            !s.is_empty() && s != "." && s != ".." && !s.contains(['/', '\\'])
        }
        if !self.group.split('.').all(segment_ok) {
            return Some(format!("invalid group '{}'", self.group));
        }
        if !segment_ok(&self.artifact) {
            return Some(format!("invalid artifact '{}'", self.artifact));
        }
        if !segment_ok(&self.version) || self.version.contains("..") {
            return Some(format!("invalid version '{}'", self.version));
        }
        None
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} \"{}\"]", self.root_name(), self.version)?;
        if !self.exclusions.is_empty() {
            let excludes: Vec<String> = self
                .exclusions
                .iter()
                .map(|e| format!("[{}]", e.root_name()))
                .collect();
            write!(f, " :excludes [{}]", excludes.join(" "))?;
        }
        Ok(())
    }
}

impl Exclusion {
    pub fn new(group: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
        }
    }

    pub fn root_name(&self) -> String {
        root_name(&self.group, &self.artifact)
    }

    /// Whether this exclusion covers every artifact of its group.
    pub fn is_wildcard(&self) -> bool {
        self.artifact.is_empty() || self.artifact == "*"
    }
}

//! POM file parsing: own coordinate, parent reference, dependency
//! declarations with exclusions, and the free-form property list.

use std::borrow::Cow;
use std::collections::BTreeMap;

use encoding_rs::Encoding;
use quick_xml::events::Event;
use quick_xml::Reader;

use pomtree_core::coordinate::{Coordinate, Exclusion};
use pomtree_util::errors::{PomtreeError, PomtreeResult};

/// A parsed POM (Project Object Model) file.
///
/// Fields that the document leaves out are empty strings. `version` is the
/// manifest's own version; when empty it is inherited from the parent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    pub name: String,
    pub group_id: String,
    pub artifact_id: String,
    pub packaging: String,
    pub version: String,

    pub parent: Option<Coordinate>,
    /// Declared dependencies in document order, versions as written.
    pub dependencies: Vec<Coordinate>,
    pub properties: BTreeMap<String, String>,
}

impl Manifest {
    /// Decode raw manifest bytes (honouring the declared charset) and parse them.
    pub fn from_bytes(bytes: &[u8]) -> PomtreeResult<Self> {
        let xml = decode_manifest(bytes)?;
        parse_pom(&xml)
    }

    /// Whether a parent reference with a non-empty group was declared.
    pub fn has_parent(&self) -> bool {
        self.parent.as_ref().is_some_and(|p| !p.group.is_empty())
    }

    /// Effective group ID (falls back to parent).
    pub fn effective_group_id(&self) -> &str {
        match &self.parent {
            Some(p) if self.group_id.is_empty() => &p.group,
            _ => &self.group_id,
        }
    }

    /// Effective version (falls back to parent).
    pub fn effective_version(&self) -> &str {
        match &self.parent {
            Some(p) if self.version.is_empty() => &p.version,
            _ => &self.version,
        }
    }

    /// The coordinate this manifest describes.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(
            self.effective_group_id(),
            self.artifact_id.as_str(),
            self.effective_version(),
        )
    }

    /// Declared dependencies that end up on the runtime classpath.
    pub fn runtime_dependencies(&self) -> impl Iterator<Item = &Coordinate> {
        self.dependencies.iter().filter(|d| d.is_runtime())
    }

    /// This manifest's own contribution to an inherited property table.
    ///
    /// Built-in `project.*` values are seeded from the manifest's own fields
    /// when present; declared properties are applied on top.
    pub fn own_properties(&self) -> BTreeMap<String, String> {
        let mut props = BTreeMap::new();
        if !self.version.is_empty() {
            props.insert("project.version".to_string(), self.version.clone());
        }
        if !self.group_id.is_empty() {
            props.insert("project.groupId".to_string(), self.group_id.clone());
        }
        if !self.artifact_id.is_empty() {
            props.insert("project.artifactId".to_string(), self.artifact_id.clone());
        }
        for (k, v) in &self.properties {
            props.insert(k.clone(), v.clone());
        }
        props
    }
}

/// Decode manifest bytes to UTF-8.
///
/// A byte-order mark wins; otherwise the `encoding` attribute of the XML
/// declaration selects the charset (labels per the WHATWG encoding standard,
/// so `ISO-8859-1` decodes as windows-1252). Without either, UTF-8 is assumed.
pub fn decode_manifest(bytes: &[u8]) -> PomtreeResult<String> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return decode_with(encoding, &bytes[bom_len..]);
    }
    match declared_encoding(bytes)? {
        Some(label) => {
            let encoding = Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| {
                PomtreeError::MalformedManifest {
                    message: format!("Unknown charset: {label}"),
                }
            })?;
            decode_with(encoding, bytes)
        }
        None => decode_with(encoding_rs::UTF_8, bytes),
    }
}

fn decode_with(encoding: &'static Encoding, bytes: &[u8]) -> PomtreeResult<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(Cow::into_owned)
        .ok_or_else(|| PomtreeError::MalformedManifest {
            message: format!("Manifest is not valid {}", encoding.name()),
        })
}

/// Read the `encoding` attribute of a leading XML declaration, if any.
fn declared_encoding(bytes: &[u8]) -> PomtreeResult<Option<String>> {
    let mut reader = Reader::from_reader(bytes);
    loop {
        match reader.read_event() {
            Ok(Event::Decl(decl)) => {
                return match decl.encoding() {
                    Some(Ok(label)) => Ok(Some(String::from_utf8_lossy(&label).into_owned())),
                    Some(Err(e)) => Err(PomtreeError::MalformedManifest {
                        message: format!("Invalid XML declaration: {e}"),
                    }),
                    None => Ok(None),
                };
            }
            // Whitespace ahead of the declaration.
            Ok(Event::Text(_)) => continue,
            Ok(_) => return Ok(None),
            Err(e) => {
                return Err(PomtreeError::MalformedManifest {
                    message: format!("Failed to read XML declaration: {e}"),
                })
            }
        }
    }
}

/// Parse a POM XML string into a `Manifest`.
pub fn parse_pom(xml: &str) -> PomtreeResult<Manifest> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut pom = Manifest::default();
    let mut path: Vec<String> = Vec::new();
    let mut text_buf = String::new();

    // Temporary accumulators for nested elements
    let mut current_dep: Option<Coordinate> = None;
    let mut current_exclusion: Option<Exclusion> = None;
    let mut current_parent: Option<Coordinate> = None;
    let mut saw_project = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let tag = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                path.push(tag);
                text_buf.clear();

                match path_context(&path).as_str() {
                    "project" => saw_project = true,
                    "project>dependencies>dependency" => {
                        current_dep = Some(Coordinate::default());
                    }
                    "project>dependencies>dependency>exclusions>exclusion" => {
                        current_exclusion = Some(Exclusion::default());
                    }
                    "project>parent" => {
                        current_parent = Some(Coordinate::default());
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(ref e)) => {
                if path.is_empty() && e.local_name().as_ref() == b"project" {
                    saw_project = true;
                }
            }
            Ok(Event::Text(ref e)) => {
                text_buf = e
                    .unescape()
                    .map_err(|err| PomtreeError::MalformedManifest {
                        message: format!("Invalid text in POM: {err}"),
                    })?
                    .to_string();
            }
            Ok(Event::CData(e)) => {
                text_buf = String::from_utf8_lossy(&e.into_inner()).to_string();
            }
            Ok(Event::End(_)) => {
                let ctx = path_context(&path);
                let depth = path.len();
                let leaf = path.last().map(|s| s.as_str());

                // Properties: <project><properties><key>value</key></properties>
                if depth == 3 && path[..2] == ["project", "properties"] {
                    if let Some(name) = leaf {
                        pom.properties.insert(name.to_string(), text_buf.clone());
                    }
                }

                if let Some(ref mut excl) = current_exclusion {
                    match ctx.as_str() {
                        "project>dependencies>dependency>exclusions>exclusion>groupId" => {
                            excl.group = text_buf.clone();
                        }
                        "project>dependencies>dependency>exclusions>exclusion>artifactId" => {
                            excl.artifact = text_buf.clone();
                        }
                        "project>dependencies>dependency>exclusions>exclusion" => {
                            if let (Some(excl), Some(dep)) =
                                (current_exclusion.take(), current_dep.as_mut())
                            {
                                dep.exclusions.push(excl);
                            }
                        }
                        _ => {}
                    }
                } else if let Some(ref mut dep) = current_dep {
                    match ctx.as_str() {
                        "project>dependencies>dependency>groupId" => dep.group = text_buf.clone(),
                        "project>dependencies>dependency>artifactId" => {
                            dep.artifact = text_buf.clone();
                        }
                        "project>dependencies>dependency>version" => {
                            dep.version = text_buf.clone();
                        }
                        "project>dependencies>dependency>scope" => dep.scope = text_buf.clone(),
                        "project>dependencies>dependency>optional" => {
                            dep.optional = text_buf.trim() == "true";
                        }
                        "project>dependencies>dependency" => {
                            if let Some(dep) = current_dep.take() {
                                pom.dependencies.push(dep);
                            }
                        }
                        _ => {}
                    }
                }

                if let Some(ref mut parent) = current_parent {
                    match ctx.as_str() {
                        "project>parent>groupId" => parent.group = text_buf.clone(),
                        "project>parent>artifactId" => parent.artifact = text_buf.clone(),
                        "project>parent>version" => parent.version = text_buf.clone(),
                        "project>parent" => pom.parent = current_parent.take(),
                        _ => {}
                    }
                }

                // Top-level project fields
                if depth == 2 {
                    match leaf {
                        Some("groupId") => pom.group_id = text_buf.clone(),
                        Some("artifactId") => pom.artifact_id = text_buf.clone(),
                        Some("version") => pom.version = text_buf.clone(),
                        Some("packaging") => pom.packaging = text_buf.clone(),
                        Some("name") => pom.name = text_buf.clone(),
                        _ => {}
                    }
                }

                path.pop();
                text_buf.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(PomtreeError::MalformedManifest {
                    message: format!("Failed to parse POM XML: {e}"),
                });
            }
            _ => {}
        }
    }

    if !saw_project {
        return Err(PomtreeError::MalformedManifest {
            message: "Document has no <project> element".to_string(),
        });
    }

    Ok(pom)
}

/// Build a context string from the current XML path for matching.
fn path_context(path: &[String]) -> String {
    path.join(">")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
    <modelVersion>4.0.0</modelVersion>
    <groupId>org.example</groupId>
    <artifactId>my-lib</artifactId>
    <version>1.0.0</version>
    <packaging>jar</packaging>
    <name>My Library</name>

    <properties>
        <clojure.version>1.9.0</clojure.version>
        <empty.prop></empty.prop>
    </properties>

    <dependencies>
        <dependency>
            <groupId>org.clojure</groupId>
            <artifactId>clojure</artifactId>
            <version>${clojure.version}</version>
        </dependency>
        <dependency>
            <groupId>junit</groupId>
            <artifactId>junit</artifactId>
            <version>4.13.2</version>
            <scope>test</scope>
        </dependency>
        <dependency>
            <groupId>org.slf4j</groupId>
            <artifactId>slf4j-api</artifactId>
            <version>1.7.22</version>
            <optional>true</optional>
        </dependency>
    </dependencies>
</project>"#;

    #[test]
    fn parse_simple_pom() {
        let pom = parse_pom(SIMPLE_POM).unwrap();
        assert_eq!(pom.group_id, "org.example");
        assert_eq!(pom.artifact_id, "my-lib");
        assert_eq!(pom.version, "1.0.0");
        assert_eq!(pom.packaging, "jar");
        assert_eq!(pom.name, "My Library");
        assert_eq!(pom.dependencies.len(), 3);
        assert_eq!(pom.properties.get("clojure.version").unwrap(), "1.9.0");
        assert!(!pom.has_parent());
    }

    #[test]
    fn versions_kept_as_written() {
        let pom = parse_pom(SIMPLE_POM).unwrap();
        assert_eq!(pom.dependencies[0].version, "${clojure.version}");
    }

    #[test]
    fn scope_and_optional_parsing() {
        let pom = parse_pom(SIMPLE_POM).unwrap();
        assert_eq!(pom.dependencies[0].scope, "");
        assert_eq!(pom.dependencies[1].scope, "test");
        assert!(pom.dependencies[2].optional);

        let runtime: Vec<_> = pom.runtime_dependencies().map(|d| d.artifact.as_str()).collect();
        assert_eq!(runtime, vec!["clojure"]);
    }

    #[test]
    fn own_properties_seed_project_fields() {
        let pom = parse_pom(SIMPLE_POM).unwrap();
        let props = pom.own_properties();
        assert_eq!(props.get("project.version").unwrap(), "1.0.0");
        assert_eq!(props.get("project.groupId").unwrap(), "org.example");
        assert_eq!(props.get("clojure.version").unwrap(), "1.9.0");
        assert_eq!(props.get("empty.prop").unwrap(), "");
    }

    #[test]
    fn dependency_management_is_not_a_dependency() {
        let xml = r#"<?xml version="1.0"?>
<project>
    <groupId>org.example</groupId>
    <artifactId>parent</artifactId>
    <version>1.0.0</version>
    <dependencyManagement>
        <dependencies>
            <dependency>
                <groupId>com.google.guava</groupId>
                <artifactId>guava</artifactId>
                <version>32.0.0-jre</version>
            </dependency>
        </dependencies>
    </dependencyManagement>
    <build>
        <plugins>
            <plugin>
                <artifactId>maven-compiler-plugin</artifactId>
                <dependencies>
                    <dependency>
                        <groupId>org.codehaus</groupId>
                        <artifactId>plexus</artifactId>
                        <version>2.0</version>
                    </dependency>
                </dependencies>
            </plugin>
        </plugins>
    </build>
</project>"#;
        let pom = parse_pom(xml).unwrap();
        assert!(pom.dependencies.is_empty());
        assert_eq!(pom.artifact_id, "parent");
    }

    #[test]
    fn parent_ref_parsing() {
        let xml = r#"<?xml version="1.0"?>
<project>
    <parent>
        <groupId>org.example</groupId>
        <artifactId>parent-pom</artifactId>
        <version>2.0.0</version>
    </parent>
    <artifactId>child</artifactId>
</project>"#;
        let pom = parse_pom(xml).unwrap();
        assert!(pom.has_parent());
        assert_eq!(pom.effective_group_id(), "org.example");
        assert_eq!(pom.effective_version(), "2.0.0");
        assert_eq!(pom.version, "");
        let p = pom.parent.as_ref().unwrap();
        assert_eq!(p.artifact, "parent-pom");
        assert_eq!(
            pom.coordinate(),
            Coordinate::new("org.example", "child", "2.0.0")
        );
        assert!(!pom.own_properties().contains_key("project.version"));
    }

    #[test]
    fn exclusion_parsing() {
        let xml = r#"<?xml version="1.0"?>
<project>
    <groupId>org.example</groupId>
    <artifactId>app</artifactId>
    <version>1.0</version>
    <dependencies>
        <dependency>
            <groupId>com.example</groupId>
            <artifactId>lib</artifactId>
            <version>1.0</version>
            <exclusions>
                <exclusion>
                    <groupId>commons-logging</groupId>
                    <artifactId>commons-logging</artifactId>
                </exclusion>
                <exclusion>
                    <groupId>org.slf4j</groupId>
                    <artifactId>*</artifactId>
                </exclusion>
            </exclusions>
        </dependency>
    </dependencies>
</project>"#;
        let pom = parse_pom(xml).unwrap();
        let dep = &pom.dependencies[0];
        assert_eq!(dep.group, "com.example");
        assert_eq!(dep.artifact, "lib");
        assert_eq!(dep.exclusions.len(), 2);
        assert_eq!(dep.exclusions[0].root_name(), "commons-logging");
        assert!(dep.exclusions[1].is_wildcard());
    }

    #[test]
    fn malformed_xml_is_reported() {
        let err = parse_pom("<project><artifactId>x</groupId></project>").unwrap_err();
        assert!(matches!(err, PomtreeError::MalformedManifest { .. }));
    }

    #[test]
    fn non_pom_document_is_malformed() {
        let err = parse_pom("<html><body>Not Found</body></html>").unwrap_err();
        assert!(matches!(err, PomtreeError::MalformedManifest { .. }));
    }

    #[test]
    fn latin1_manifest_is_transcoded() {
        let mut bytes = br#"<?xml version="1.0" encoding="ISO-8859-1"?>
<project><artifactId>caf"#
            .to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b"</artifactId><name>Caf\xE9 \xA9</name></project>");
        let pom = Manifest::from_bytes(&bytes).unwrap();
        assert_eq!(pom.artifact_id, "caf\u{e9}");
        assert_eq!(pom.name, "Caf\u{e9} \u{a9}");
    }

    #[test]
    fn unknown_charset_is_malformed() {
        let bytes = br#"<?xml version="1.0" encoding="x-klingon"?><project/>"#;
        let err = Manifest::from_bytes(bytes).unwrap_err();
        assert!(err.to_string().contains("Unknown charset"), "got: {err}");
    }

    #[test]
    fn undeclared_charset_defaults_to_utf8() {
        let pom = Manifest::from_bytes("<project><name>Zürich</name></project>".as_bytes()).unwrap();
        assert_eq!(pom.name, "Zürich");
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let err = Manifest::from_bytes(b"<project><name>\xFF\xFE\xFD</name></project>").unwrap_err();
        assert!(matches!(err, PomtreeError::MalformedManifest { .. }));
    }
}

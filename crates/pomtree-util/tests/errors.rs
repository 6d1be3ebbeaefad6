use pomtree_util::errors::PomtreeError;

#[test]
fn test_io_error_display() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
    let err = PomtreeError::from(io_err);
    assert!(err.to_string().contains("I/O error"), "got: {err}");
}

#[test]
fn test_config_error_display() {
    let err = PomtreeError::Config {
        message: "bad coordinate".to_string(),
    };
    assert_eq!(err.to_string(), "Configuration error: bad coordinate");
}

#[test]
fn test_manifest_not_found_display() {
    let err = PomtreeError::ManifestNotFound {
        path: "g/a/1.0/a-1.0.pom".to_string(),
    };
    assert_eq!(err.to_string(), "Manifest not found: g/a/1.0/a-1.0.pom");
}

#[test]
fn test_transport_error_display() {
    let err = PomtreeError::Transport {
        message: "timeout".to_string(),
    };
    assert_eq!(err.to_string(), "Transport error: timeout");
}

#[test]
fn test_malformed_manifest_display() {
    let err = PomtreeError::MalformedManifest {
        message: "unexpected EOF".to_string(),
    };
    assert_eq!(err.to_string(), "Malformed manifest: unexpected EOF");
}

#[test]
fn test_cycle_display() {
    let err = PomtreeError::CycleDetected {
        path: "g/a -> g/b -> g/a".to_string(),
    };
    assert_eq!(err.to_string(), "Dependency cycle detected: g/a -> g/b -> g/a");
}

#[test]
fn test_absence_classification() {
    assert!(PomtreeError::ManifestNotFound { path: "x".into() }.is_absence());
    assert!(PomtreeError::Transport {
        message: "refused".into()
    }
    .is_absence());
    assert!(!PomtreeError::MalformedManifest {
        message: "bad".into()
    }
    .is_absence());
    assert!(!PomtreeError::CycleDetected { path: "x".into() }.is_absence());
}

#[test]
fn test_io_error_from_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: PomtreeError = io_err.into();
    assert!(matches!(err, PomtreeError::Io(_)));
}

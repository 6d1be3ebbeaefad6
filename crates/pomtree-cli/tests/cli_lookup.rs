use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[allow(deprecated)]
fn pomtree_cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pomtree").unwrap();
    cmd.env("HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("POMTREE_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_path_lists_repositories() {
    let tmp = TempDir::new().unwrap();

    pomtree_cmd(tmp.path())
        .args(["--repo", "nexus.example.com/maven/public", "path", "org.clojure:clojure:1.9.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("org/clojure/clojure/1.9.0/clojure-1.9.0.pom"))
        .stdout(predicate::str::contains(
            "https://nexus.example.com/maven/public/org/clojure/clojure/1.9.0/clojure-1.9.0.pom",
        ))
        .stdout(predicate::str::contains("(not cached)"));
}

#[test]
fn test_path_default_cache_under_home() {
    let tmp = TempDir::new().unwrap();

    pomtree_cmd(tmp.path())
        .args(["path", "http-kit:2.3.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".m2/repository/http-kit/http-kit/2.3.0"))
        .stdout(predicate::str::contains("clojars: https://clojars.org/repo/"));
}

#[test]
fn test_properties_from_cache() {
    let tmp = TempDir::new().unwrap();
    let cache = tmp.path().join("m2");
    let dir = cache.join("org/example/app/1.0");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("app-1.0.pom"),
        "<project><groupId>org.example</groupId><artifactId>app</artifactId>\
         <version>1.0</version><properties><clojure.version>1.9.0</clojure.version>\
         </properties></project>",
    )
    .unwrap();

    pomtree_cmd(tmp.path())
        .args(["--offline", "--cache-dir"])
        .arg(&cache)
        .args(["properties", "org.example:app:1.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("clojure.version"))
        .stdout(predicate::str::contains("= 1.9.0"));
}

#[test]
fn test_bad_repository_flag() {
    let tmp = TempDir::new().unwrap();

    pomtree_cmd(tmp.path())
        .args(["--repo", "/nohost", "path", "g:a:1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid repository '/nohost'"));
}

#[test]
fn test_missing_config_file() {
    let tmp = TempDir::new().unwrap();

    pomtree_cmd(tmp.path())
        .arg("--config")
        .arg(tmp.path().join("nope.toml"))
        .args(["path", "g:a:1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

use std::fs;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use rp_core::mode::ResolutionMode;
use rp_ops::ops_resolve::{resolve_packages, ResolveOptions};
use tempfile::TempDir;

const CATALOG: &str = r#"{
  "CATALOG_FORMAT": 2,
  "catalog": {
    "app": {
      "name": "app",
      "versions": [
        { "name": "app", "version": "1.0.0", "dependencies": { "a": "1.0", "b": "1.0" } }
      ]
    },
    "a": {
      "name": "a",
      "versions": [
        { "name": "a", "version": "1.0.0", "dependencies": { "c": "1.0" } }
      ]
    },
    "b": {
      "name": "b",
      "versions": [
        { "name": "b", "version": "1.0.0", "dependencies": { "c": ">= 1.0" } }
      ]
    },
    "c": {
      "name": "c",
      "latest": "1.2.0",
      "versions": [
        { "name": "c", "version": "1.2.0", "engines": { "ringojs": ">= 0.9" } },
        { "name": "c", "version": "1.0.0" }
      ]
    }
  }
}"#;

fn setup(tmp: &TempDir) -> ResolveOptions {
    let catalog = tmp.path().join("catalog.json");
    fs::write(&catalog, CATALOG).unwrap();
    ResolveOptions {
        catalog: Some(catalog),
        config: Some(tmp.path().join("missing-config.toml")),
        ..ResolveOptions::default()
    }
}

fn lines(opts: &ResolveOptions) -> Vec<String> {
    resolve_packages(opts)
        .unwrap()
        .packages
        .iter()
        .map(|d| d.to_string())
        .collect()
}

fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("config.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_resolve_single_package() {
    let tmp = TempDir::new().unwrap();
    let opts = ResolveOptions {
        name: Some("a".to_string()),
        ..setup(&tmp)
    };
    assert_eq!(lines(&opts), vec!["a 1.0.0", "c 1.0.0"]);
}

#[test]
fn test_strict_conflict_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let opts = ResolveOptions {
        name: Some("app".to_string()),
        mode: Some(ResolutionMode::Strict),
        ..setup(&tmp)
    };
    let err = resolve_packages(&opts).err().unwrap();
    assert!(err.to_string().contains("Dependency resolution failed"), "{err}");
    let help = err.help().map(|h| h.to_string()).unwrap_or_default();
    assert!(help.contains("Relax one of the conflicting ranges"), "{help}");
}

#[test]
fn test_latest_compatible_upgrades_shared_dependency() {
    let tmp = TempDir::new().unwrap();
    let opts = ResolveOptions {
        name: Some("app".to_string()),
        mode: Some(ResolutionMode::LatestCompatible),
        ..setup(&tmp)
    };
    let resolution = resolve_packages(&opts).unwrap();
    let packages: Vec<String> = resolution.packages.iter().map(|d| d.to_string()).collect();
    assert_eq!(packages, vec!["a 1.0.0", "app 1.0.0", "b 1.0.0", "c 1.2.0"]);
    assert_eq!(resolution.report.len(), 1);
    assert_eq!(resolution.root, "app");
}

#[test]
fn test_mode_read_from_config() {
    let tmp = TempDir::new().unwrap();
    let config = write_config(tmp.path(), "[resolver]\nmode = \"latest-compatible\"\n");
    let opts = ResolveOptions {
        name: Some("app".to_string()),
        config: Some(config),
        ..setup(&tmp)
    };
    let resolution = resolve_packages(&opts).unwrap();
    assert_eq!(resolution.mode, ResolutionMode::LatestCompatible);
    assert_eq!(resolution.packages.len(), 4);
}

#[test]
fn test_engine_version_rejects_newer_release() {
    let tmp = TempDir::new().unwrap();
    let opts = ResolveOptions {
        name: Some("c".to_string()),
        engine_version: Some("0.8".to_string()),
        ..setup(&tmp)
    };
    let err = resolve_packages(&opts).err().unwrap();
    assert!(err.to_string().contains("Dependency resolution failed"), "{err}");

    let opts = ResolveOptions {
        name: Some("c".to_string()),
        engine_version: Some("0.9".to_string()),
        ..setup(&tmp)
    };
    assert_eq!(lines(&opts), vec!["c 1.2.0"]);
}

#[test]
fn test_resolve_manifest_dependencies() {
    let tmp = TempDir::new().unwrap();
    let manifest = tmp.path().join("package.json");
    fs::write(
        &manifest,
        r#"{ "name": "local", "version": "0.1.0", "dependencies": { "a": "1.0" } }"#,
    )
    .unwrap();
    let opts = ResolveOptions {
        manifest: Some(manifest),
        ..setup(&tmp)
    };
    let resolution = resolve_packages(&opts).unwrap();
    let packages: Vec<String> = resolution.packages.iter().map(|d| d.to_string()).collect();
    assert_eq!(packages, vec!["a 1.0.0", "c 1.0.0"]);
    assert_eq!(resolution.root, "local");
    assert!(resolution.graph.find("local").is_some());
}

#[test]
fn test_unknown_package() {
    let tmp = TempDir::new().unwrap();
    let opts = ResolveOptions {
        name: Some("nope".to_string()),
        ..setup(&tmp)
    };
    let err = resolve_packages(&opts).err().unwrap();
    assert!(err.to_string().contains("nope"), "{err}");
}

#[test]
fn test_missing_root_is_an_error() {
    let tmp = TempDir::new().unwrap();
    assert!(resolve_packages(&setup(&tmp)).is_err());
}

#[test]
fn test_missing_catalog_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let opts = ResolveOptions {
        name: Some("a".to_string()),
        catalog: Some(tmp.path().join("nowhere.json")),
        config: Some(tmp.path().join("missing-config.toml")),
        ..ResolveOptions::default()
    };
    assert!(resolve_packages(&opts).is_err());
}

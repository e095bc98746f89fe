use rp_core::catalog::{CatalogEntry, CatalogFile, CATALOG_FORMAT};
use rp_core::descriptor::PackageDescriptor;
use rp_core::mode::{Compatibility, ResolutionMode};

#[test]
fn catalog_parse_and_latest() {
    let json = r#"{
        "CATALOG_FORMAT": 2,
        "catalog": {
            "a": {
                "name": "a",
                "versions": [
                    {"name": "a", "version": "1.0.0"},
                    {"name": "a", "version": "0.1.0"}
                ]
            }
        }
    }"#;
    let file = CatalogFile::parse(json).unwrap();
    assert_eq!(file.format, CATALOG_FORMAT);
    let entry = &file.catalog["a"];
    assert_eq!(entry.latest_version(), Some("1.0.0"));
}

#[test]
fn catalog_explicit_latest_wins() {
    let mut entry = CatalogEntry::new("a")
        .with_version(PackageDescriptor::new("a", "2.0.0beta1"))
        .with_version(PackageDescriptor::new("a", "1.0.0"));
    entry.latest = Some("1.0.0".to_string());
    assert_eq!(entry.latest_version(), Some("1.0.0"));
}

#[test]
fn catalog_rejects_unknown_format() {
    let err = CatalogFile::parse(r#"{"CATALOG_FORMAT": 1, "catalog": {}}"#).unwrap_err();
    assert!(err.to_string().contains("unsupported catalog format 1"), "got: {err}");
}

#[test]
fn catalog_rejects_malformed_json() {
    assert!(CatalogFile::parse("{not json").is_err());
}

#[test]
fn catalog_serializes_format_key() {
    let s = CatalogFile::default().to_string_pretty().unwrap();
    assert!(s.contains("\"CATALOG_FORMAT\": 2"));
}

#[test]
fn mode_from_str() {
    assert_eq!("strict".parse::<ResolutionMode>(), Ok(ResolutionMode::Strict));
    assert_eq!(
        "latest-compatible".parse::<ResolutionMode>(),
        Ok(ResolutionMode::LatestCompatible)
    );
    assert!("loose".parse::<ResolutionMode>().is_err());
    assert_eq!(ResolutionMode::LatestCompatible.to_string(), "latest-compatible");
}

#[test]
fn compatibility_from_str() {
    assert_eq!("same-major".parse::<Compatibility>(), Ok(Compatibility::SameMajor));
    assert_eq!(
        "leading-non-zero".parse::<Compatibility>(),
        Ok(Compatibility::LeadingNonZero)
    );
    assert!("any".parse::<Compatibility>().is_err());
}

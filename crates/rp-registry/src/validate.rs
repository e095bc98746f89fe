//! Package descriptor validation and normalization.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use miette::Diagnostic;
use regex::Regex;
use thiserror::Error;

use rp_core::descriptor::PackageDescriptor;
use rp_resolver::range::{Range, RangeError};
use rp_resolver::version::{clean_version, Version, VersionError};

static INVALID_NAME_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9._\- ]").expect("valid name pattern"));

#[derive(Debug, Error, Diagnostic)]
pub enum ValidationError {
    #[error("Invalid or missing package name")]
    MissingName,

    #[error("Invalid package name '{0}'")]
    #[diagnostic(help(
        "Package names may only contain lowercase alphanumeric characters, '.', '_', '-' or spaces"
    ))]
    InvalidName(String),

    #[error("Invalid package version '{version}'")]
    InvalidVersion {
        version: String,
        #[source]
        source: VersionError,
    },

    #[error("Invalid {kind} range '{range}' for '{name}'")]
    InvalidRange {
        kind: &'static str,
        name: String,
        range: String,
        #[source]
        source: RangeError,
    },
}

pub fn verify_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::MissingName);
    }
    if INVALID_NAME_CHAR.is_match(name) {
        return Err(ValidationError::InvalidName(name.to_string()));
    }
    Ok(())
}

pub fn verify_version(version: &str) -> Result<(), ValidationError> {
    Version::parse(version)
        .map(|_| ())
        .map_err(|source| ValidationError::InvalidVersion {
            version: version.to_string(),
            source,
        })
}

pub fn verify_dependencies(dependencies: &BTreeMap<String, String>) -> Result<(), ValidationError> {
    verify_ranges("dependency", dependencies).map(|_| ())
}

pub fn verify_engines(engines: &BTreeMap<String, String>) -> Result<(), ValidationError> {
    verify_ranges("engine", engines).map(|_| ())
}

fn verify_ranges(
    kind: &'static str,
    ranges: &BTreeMap<String, String>,
) -> Result<BTreeMap<String, String>, ValidationError> {
    ranges
        .iter()
        .map(|(name, range)| {
            let normalized = Range::parse(range).map_err(|source| ValidationError::InvalidRange {
                kind,
                name: name.clone(),
                range: range.clone(),
                source,
            })?;
            Ok((name.clone(), normalized.to_string()))
        })
        .collect()
}

/// Check every field of a descriptor a registry relies on.
pub fn verify(descriptor: &PackageDescriptor) -> Result<(), ValidationError> {
    verify_name(&descriptor.name)?;
    verify_version(&descriptor.version)?;
    verify_engines(&descriptor.engines)?;
    verify_dependencies(&descriptor.dependencies)
}

/// Normalize a descriptor for storage: trimmed name, canonical version and
/// every range rewritten to its normalized bounds.
pub fn sanitize(mut descriptor: PackageDescriptor) -> Result<PackageDescriptor, ValidationError> {
    descriptor.name = descriptor.name.trim().to_string();
    verify_name(&descriptor.name)?;
    descriptor.version =
        clean_version(&descriptor.version).map_err(|source| ValidationError::InvalidVersion {
            version: descriptor.version.clone(),
            source,
        })?;
    descriptor.engines = verify_ranges("engine", &descriptor.engines)?;
    descriptor.dependencies = verify_ranges("dependency", &descriptor.dependencies)?;
    descriptor.description = descriptor.description.map(|d| d.trim().to_string());
    Ok(descriptor)
}

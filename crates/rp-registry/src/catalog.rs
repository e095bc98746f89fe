//! A package catalog held in memory, loaded from and saved to the catalog file.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use rp_core::catalog::{CatalogEntry, CatalogFile};
use rp_core::descriptor::PackageDescriptor;
use rp_core::mode::Compatibility;
use rp_resolver::range::satisfies;
use rp_resolver::version::{is_greater, Version};
use rp_resolver::{Registry, ResolveError};
use rp_util::errors::RpError;

use crate::validate::{self, ValidationError};

/// Every known package with its published versions, latest first.
#[derive(Debug, Clone, Default)]
pub struct CatalogRegistry {
    entries: BTreeMap<String, CatalogEntry>,
    compatibility: Compatibility,
}

impl CatalogRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from entries whose versions are already latest-first.
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| (entry.name.clone(), entry))
                .collect(),
            compatibility: Compatibility::default(),
        }
    }

    pub fn from_file(file: CatalogFile) -> Self {
        Self::from_entries(file.catalog.into_values())
    }

    /// Read a catalog file from disk.
    pub fn load(path: &Path) -> miette::Result<Self> {
        let file = CatalogFile::from_path(path)?;
        debug!(
            "loaded {} packages from {}",
            file.catalog.len(),
            path.display()
        );
        Ok(Self::from_file(file))
    }

    /// Write the catalog to `path` in the current catalog format.
    pub fn save(&self, path: &Path) -> miette::Result<()> {
        let content = self
            .to_file()
            .to_string_pretty()
            .map_err(|e| RpError::Catalog {
                message: format!("Failed to serialize catalog: {e}"),
            })?;
        std::fs::write(path, content).map_err(RpError::Io)?;
        Ok(())
    }

    pub fn to_file(&self) -> CatalogFile {
        CatalogFile {
            catalog: self.entries.clone(),
            ..CatalogFile::default()
        }
    }

    pub fn with_compatibility(mut self, compatibility: Compatibility) -> Self {
        self.compatibility = compatibility;
        self
    }

    pub fn compatibility(&self) -> Compatibility {
        self.compatibility
    }

    pub fn entry(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.get(name)
    }

    /// Package names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry_or_unknown(&self, name: &str) -> Result<&CatalogEntry, ResolveError> {
        self.entries
            .get(name)
            .ok_or_else(|| ResolveError::UnknownPackage {
                name: name.to_string(),
            })
    }

    pub fn owners(&self, name: &str) -> Option<&[String]> {
        self.entries.get(name).map(|entry| entry.owners.as_slice())
    }

    /// Whether no published version of `name` is greater than `version`.
    pub fn is_latest(&self, name: &str, version: &str) -> Result<bool, ResolveError> {
        let entry = self.entry_or_unknown(name)?;
        let Some(latest) = entry.latest_version() else {
            return Ok(true);
        };
        Ok(!is_greater(latest, version)?)
    }

    /// Validate, normalize and insert a descriptor. A version already
    /// present is replaced.
    pub fn publish(
        &mut self,
        descriptor: PackageDescriptor,
    ) -> Result<PackageDescriptor, ValidationError> {
        let descriptor = validate::sanitize(descriptor)?;
        let version = Version::parse(&descriptor.version).map_err(|source| {
            ValidationError::InvalidVersion {
                version: descriptor.version.clone(),
                source,
            }
        })?;
        let entry = self
            .entries
            .entry(descriptor.name.clone())
            .or_insert_with(|| CatalogEntry::new(descriptor.name.clone()));

        entry
            .versions
            .retain(|d| Version::parse(&d.version).map_or(true, |v| v != version));
        let position = entry
            .versions
            .iter()
            .position(|d| Version::parse(&d.version).is_ok_and(|v| v < version))
            .unwrap_or(entry.versions.len());
        entry.versions.insert(position, descriptor.clone());
        entry.latest = entry.versions.first().map(|d| d.version.clone());
        debug!("published {descriptor}");
        Ok(descriptor)
    }

    /// Remove one version of `name`, or the whole package when `version` is
    /// `None`. Returns whether anything was removed.
    pub fn unpublish(&mut self, name: &str, version: Option<&str>) -> bool {
        let Some(version) = version else {
            return self.entries.remove(name).is_some();
        };
        let Some(entry) = self.entries.get_mut(name) else {
            return false;
        };
        let before = entry.versions.len();
        entry.versions.retain(|d| d.version != version);
        let removed = entry.versions.len() != before;
        if entry.versions.is_empty() {
            self.entries.remove(name);
        } else if removed {
            entry.latest = entry.versions.first().map(|d| d.version.clone());
        }
        removed
    }
}

/// The descriptor whose version equals the entry's `latest`. The version is
/// compared as a version, never parsed as a range, so tags such as `-rc.1`
/// are found.
fn latest_descriptor(entry: &CatalogEntry) -> Result<PackageDescriptor, ResolveError> {
    let no_latest = || ResolveError::NoSatisfyingVersion {
        name: entry.name.clone(),
        range: "latest".to_string(),
    };
    let latest = Version::parse(entry.latest_version().ok_or_else(no_latest)?)?;
    for candidate in &entry.versions {
        if Version::parse(&candidate.version)? == latest {
            debug!("{} latest is {}", entry.name, candidate.version);
            return Ok(candidate.clone());
        }
    }
    Err(no_latest())
}

impl Registry for CatalogRegistry {
    fn get_package_descriptor(
        &self,
        name: &str,
        range: Option<&str>,
    ) -> Result<PackageDescriptor, ResolveError> {
        let entry = self.entry_or_unknown(name)?;
        match range {
            None | Some("latest") => latest_descriptor(entry),
            Some(range) => {
                for candidate in &entry.versions {
                    if satisfies(&candidate.version, Some(range))? {
                        debug!("{name} {range} matched {}", candidate.version);
                        return Ok(candidate.clone());
                    }
                }
                Err(ResolveError::NoSatisfyingVersion {
                    name: name.to_string(),
                    range: range.to_string(),
                })
            }
        }
    }

    fn get_latest_compatible(
        &self,
        name: &str,
        version: &str,
    ) -> Result<PackageDescriptor, ResolveError> {
        let entry = self.entry_or_unknown(name)?;
        let current = Version::parse(version)?;
        for candidate in &entry.versions {
            if self.is_compatible(&current, &Version::parse(&candidate.version)?) {
                return Ok(candidate.clone());
            }
        }
        Err(ResolveError::NoCompatibleVersion {
            name: name.to_string(),
            version: version.to_string(),
        })
    }

    fn exists(&self, name: &str, version: Option<&str>) -> bool {
        self.entries.get(name).is_some_and(|entry| {
            version.map_or(true, |v| entry.versions.iter().any(|d| d.version == v))
        })
    }

    fn is_compatible(&self, current: &Version, candidate: &Version) -> bool {
        current.is_compatible_with(candidate, self.compatibility)
    }
}

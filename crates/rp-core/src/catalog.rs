//! On-disk catalog format: every package known to the registry together
//! with all of its published version descriptors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::descriptor::PackageDescriptor;

/// Catalog format this version of rp reads and writes.
pub const CATALOG_FORMAT: u32 = 2;

/// All published versions of one package.
///
/// `versions` keeps the registry's ordering, latest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owners: Vec<String>,
    #[serde(default)]
    pub versions: Vec<PackageDescriptor>,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            latest: None,
            owners: Vec::new(),
            versions: Vec::new(),
        }
    }

    /// Builder-style helper appending a version descriptor.
    pub fn with_version(mut self, descriptor: PackageDescriptor) -> Self {
        self.versions.push(descriptor);
        self
    }

    /// The version the catalog advertises as latest, falling back to the
    /// first listed version.
    pub fn latest_version(&self) -> Option<&str> {
        self.latest
            .as_deref()
            .or_else(|| self.versions.first().map(|d| d.version.as_str()))
    }
}

/// The catalog file: `{"CATALOG_FORMAT": 2, "catalog": {name: entry}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(rename = "CATALOG_FORMAT")]
    pub format: u32,
    #[serde(default)]
    pub catalog: BTreeMap<String, CatalogEntry>,
}

impl Default for CatalogFile {
    fn default() -> Self {
        Self {
            format: CATALOG_FORMAT,
            catalog: BTreeMap::new(),
        }
    }
}

impl CatalogFile {
    /// Load and parse a catalog file, rejecting unknown formats.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| rp_util::errors::RpError::Catalog {
                message: format!("Failed to read {}: {e}", path.display()),
            })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> miette::Result<Self> {
        let file: Self =
            serde_json::from_str(content).map_err(|e| rp_util::errors::RpError::Catalog {
                message: format!("Failed to parse catalog: {e}"),
            })?;
        if file.format != CATALOG_FORMAT {
            return Err(rp_util::errors::RpError::Catalog {
                message: format!(
                    "unsupported catalog format {} (expected {CATALOG_FORMAT})",
                    file.format
                ),
            }
            .into());
        }
        Ok(file)
    }

    /// Serialize the catalog to pretty-printed JSON.
    pub fn to_string_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

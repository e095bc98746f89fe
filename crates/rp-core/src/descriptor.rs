use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Registry metadata for one specific version of a package.
///
/// `dependencies` and `engines` map a name to a range expression. Both are
/// kept in a `BTreeMap` so that iteration is always name-sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub engines: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PackageDescriptor {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            dependencies: BTreeMap::new(),
            engines: BTreeMap::new(),
            description: None,
        }
    }

    /// Builder-style helper adding a dependency on `name` within `range`.
    pub fn with_dependency(mut self, name: impl Into<String>, range: impl Into<String>) -> Self {
        self.dependencies.insert(name.into(), range.into());
        self
    }

    /// Builder-style helper declaring the runtime `engine` range.
    pub fn with_engine(mut self, engine: impl Into<String>, range: impl Into<String>) -> Self {
        self.engines.insert(engine.into(), range.into());
        self
    }

    /// The range declared for `engine`, if any.
    pub fn engine_range(&self, engine: &str) -> Option<&str> {
        self.engines.get(engine).map(String::as_str)
    }

    /// Load a descriptor from a `package.json` file.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| rp_util::errors::RpError::Generic {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::parse_json(&content).map_err(|e| {
            rp_util::errors::RpError::Generic {
                message: format!("Failed to parse {}: {e}", path.display()),
            }
            .into()
        })
    }

    pub fn parse_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}

impl fmt::Display for PackageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

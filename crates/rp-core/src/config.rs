use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::mode::{Compatibility, ResolutionMode};

/// Global user configuration loaded from `~/.rp/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub engine: EngineConfig,
}

/// Registry settings from `[registry]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default = "default_catalog")]
    pub catalog: String,
    #[serde(default)]
    pub compatibility: Compatibility,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            compatibility: Compatibility::default(),
        }
    }
}

fn default_catalog() -> String {
    "~/.rp/catalog.json".to_string()
}

/// Resolver settings from `[resolver]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(default)]
    pub mode: ResolutionMode,
}

/// Host runtime settings from `[engine]`, checked against descriptor `engines`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_engine_name")]
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: default_engine_name(),
            version: None,
        }
    }
}

fn default_engine_name() -> String {
    crate::DEFAULT_ENGINE_NAME.to_string()
}

impl GlobalConfig {
    /// Load the global configuration from `~/.rp/config.toml`, or return defaults if the file doesn't exist.
    pub fn load() -> miette::Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load the configuration from an explicit path, or return defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> miette::Result<Self> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).map_err(|e| rp_util::errors::RpError::Config {
                message: format!("Failed to read {}: {e}", path.display()),
            })?;
        toml::from_str(&content).map_err(|e| {
            rp_util::errors::RpError::Config {
                message: format!("Failed to parse {}: {e}", path.display()),
            }
            .into()
        })
    }

    /// Returns the default path to the global config file.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// The catalog path with a leading `~/` expanded.
    pub fn catalog_path(&self) -> PathBuf {
        expand_home(&self.registry.catalog)
    }
}

/// Returns the path to the rp data directory (`~/.rp/`).
pub fn dirs_path() -> PathBuf {
    home_dir().join(".rp")
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => home_dir().join(rest),
        None => PathBuf::from(path),
    }
}

fn home_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    Path::new(&home).to_path_buf()
}

//! Host engine compatibility checks.

use rp_core::descriptor::PackageDescriptor;

use crate::error::ResolveError;
use crate::range::satisfies;
use crate::version::{clean_version, VersionError};

/// Decides whether a package can run on the host.
pub trait EngineCheck {
    fn verify(&self, descriptor: &PackageDescriptor) -> Result<(), ResolveError>;
}

/// The engine running on this machine, matched against the `engines` entry of
/// the same name in each descriptor.
#[derive(Debug, Clone)]
pub struct HostEngine {
    name: String,
    version: String,
}

impl HostEngine {
    pub fn new(name: impl Into<String>, version: &str) -> Result<Self, VersionError> {
        Ok(Self {
            name: name.into(),
            version: clean_version(version)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl EngineCheck for HostEngine {
    fn verify(&self, descriptor: &PackageDescriptor) -> Result<(), ResolveError> {
        let Some(range) = descriptor.engine_range(&self.name) else {
            return Ok(());
        };
        if satisfies(&self.version, Some(range))? {
            return Ok(());
        }
        Err(ResolveError::EngineIncompatible {
            name: descriptor.name.clone(),
            version: descriptor.version.clone(),
            engine: self.name.clone(),
            range: range.to_string(),
            host_version: self.version.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_version_is_canonicalized() {
        let engine = HostEngine::new("ringojs", "0.8").unwrap();
        assert_eq!(engine.version(), "0.8.0");
        assert!(HostEngine::new("ringojs", "0.x").is_err());
    }

    #[test]
    fn missing_engine_entry_passes() {
        let engine = HostEngine::new("ringojs", "0.8.0").unwrap();
        let descriptor = PackageDescriptor::new("a", "1.0.0").with_engine("node", ">= 20");
        assert!(engine.verify(&descriptor).is_ok());
    }

    #[test]
    fn engine_range_is_enforced() {
        let engine = HostEngine::new("ringojs", "0.8.0").unwrap();
        let ok = PackageDescriptor::new("a", "1.0.0").with_engine("ringojs", ">= 0.8");
        let too_new = PackageDescriptor::new("b", "2.0.0").with_engine("ringojs", ">= 0.9");
        assert!(engine.verify(&ok).is_ok());
        let err = engine.verify(&too_new).unwrap_err();
        assert!(matches!(err, ResolveError::EngineIncompatible { ref name, .. } if name == "b"));
        assert!(err.to_string().contains("requires ringojs >= 0.9"));
    }
}

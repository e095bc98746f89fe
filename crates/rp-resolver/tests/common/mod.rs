use std::collections::BTreeMap;

use rp_core::descriptor::PackageDescriptor;
use rp_resolver::range::satisfies;
use rp_resolver::{Registry, ResolveError, Version};

/// In-memory registry listing each package's versions latest-first.
#[derive(Default)]
pub struct FixtureRegistry {
    packages: BTreeMap<String, Vec<PackageDescriptor>>,
}

impl FixtureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a version; call in latest-first order.
    pub fn with(mut self, descriptor: PackageDescriptor) -> Self {
        self.packages
            .entry(descriptor.name.clone())
            .or_default()
            .push(descriptor);
        self
    }
}

impl Registry for FixtureRegistry {
    fn get_package_descriptor(
        &self,
        name: &str,
        range: Option<&str>,
    ) -> Result<PackageDescriptor, ResolveError> {
        let versions = self
            .packages
            .get(name)
            .ok_or_else(|| ResolveError::UnknownPackage {
                name: name.to_string(),
            })?;
        match range {
            None | Some("latest") => Ok(versions[0].clone()),
            Some(range) => {
                for descriptor in versions {
                    if satisfies(&descriptor.version, Some(range))? {
                        return Ok(descriptor.clone());
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
        let current = Version::parse(version)?;
        let versions = self
            .packages
            .get(name)
            .ok_or_else(|| ResolveError::UnknownPackage {
                name: name.to_string(),
            })?;
        for descriptor in versions {
            if self.is_compatible(&current, &Version::parse(&descriptor.version)?) {
                return Ok(descriptor.clone());
            }
        }
        Err(ResolveError::NoCompatibleVersion {
            name: name.to_string(),
            version: version.to_string(),
        })
    }

    fn exists(&self, name: &str, version: Option<&str>) -> bool {
        self.packages.get(name).is_some_and(|versions| {
            version.map_or(true, |v| versions.iter().any(|d| d.version == v))
        })
    }
}

pub fn pkg(name: &str, version: &str, dependencies: &[(&str, &str)]) -> PackageDescriptor {
    dependencies
        .iter()
        .fold(PackageDescriptor::new(name, version), |d, (dep, range)| {
            d.with_dependency(*dep, *range)
        })
}

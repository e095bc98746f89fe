use rp_core::descriptor::PackageDescriptor;
use rp_core::mode::Compatibility;

use crate::error::ResolveError;
use crate::version::Version;

/// Source of package descriptors consulted by the resolver.
///
/// Implementations may block on I/O; the resolver calls them synchronously.
pub trait Registry {
    /// The latest version when `range` is `None` or `"latest"`, otherwise the
    /// first version in registry order that satisfies `range`.
    fn get_package_descriptor(
        &self,
        name: &str,
        range: Option<&str>,
    ) -> Result<PackageDescriptor, ResolveError>;

    /// The first version in registry order compatible with `version`.
    fn get_latest_compatible(
        &self,
        name: &str,
        version: &str,
    ) -> Result<PackageDescriptor, ResolveError>;

    /// Whether `name` exists, and with `version` when given.
    fn exists(&self, name: &str, version: Option<&str>) -> bool;

    /// Whether `candidate` can replace `current` without breaking dependants.
    fn is_compatible(&self, current: &Version, candidate: &Version) -> bool {
        current.is_compatible_with(candidate, Compatibility::default())
    }
}

//! Transitive dependency resolution with strict or latest-compatible conflict
//! arbitration.
//!
//! A run walks the dependency graph depth-first, dependencies in name order,
//! and keeps exactly one [`ResolvedPackage`] per package name. When a name is
//! requested again at another version the active [`ResolutionMode`] decides
//! which version stays. Each name remembers the version last arbitrated for
//! it, so cycles and diamonds terminate.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use rp_core::descriptor::PackageDescriptor;
use rp_core::mode::ResolutionMode;
use tracing::debug;

use crate::conflict::{ConflictReport, VersionConflict};
use crate::engine::EngineCheck;
use crate::error::ResolveError;
use crate::range::satisfies;
use crate::registry::Registry;
use crate::resolved::{Dependant, Dependency, ResolvedPackage};
use crate::version::Version;
use crate::visited::VisitedSet;

/// One resolution run. Call [`Resolver::resolve`] once per root requirement,
/// then read the chosen descriptors.
pub struct Resolver<'r> {
    registry: &'r dyn Registry,
    engine: Option<&'r dyn EngineCheck>,
    mode: ResolutionMode,
    resolved: BTreeMap<String, ResolvedPackage>,
    visited: VisitedSet,
    report: ConflictReport,
}

impl<'r> Resolver<'r> {
    pub fn new(registry: &'r dyn Registry, mode: ResolutionMode) -> Self {
        Self {
            registry,
            engine: None,
            mode,
            resolved: BTreeMap::new(),
            visited: VisitedSet::new(),
            report: ConflictReport::new(),
        }
    }

    /// Check every selected descriptor against `engine` before accepting it.
    pub fn with_engine(mut self, engine: &'r dyn EngineCheck) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn mode(&self) -> ResolutionMode {
        self.mode
    }

    /// Resolve a root requirement: `name` within `range` (`None` for latest).
    pub fn resolve(&mut self, name: &str, range: Option<&str>) -> Result<(), ResolveError> {
        self.resolve_required_by(name, range, None)
    }

    /// Resolve the dependencies of `descriptor` without adding the descriptor
    /// itself to the resolved set.
    pub fn resolve_dependencies(
        &mut self,
        descriptor: &PackageDescriptor,
    ) -> Result<(), ResolveError> {
        let dependant = Dependant::from(descriptor);
        for (name, range) in &descriptor.dependencies {
            self.resolve_required_by(name, Some(range), Some(&dependant))?;
        }
        Ok(())
    }

    /// Resolve `name` within `range` as required by `dependant`.
    pub fn resolve_required_by(
        &mut self,
        name: &str,
        range: Option<&str>,
        dependant: Option<&Dependant>,
    ) -> Result<(), ResolveError> {
        debug!(
            "resolving {name} {} (required by {})",
            range.unwrap_or("latest"),
            dependant.map_or("<root>", |d| d.name.as_str())
        );
        let descriptor = self.registry.get_package_descriptor(name, range)?;
        let version = Version::parse(&descriptor.version)?;
        debug!("registry selected {name} {version}");

        if self.visited.contains(name, &version) {
            debug!("{name} {version} already visited");
            if let (Some(dependant), Some(package)) = (dependant, self.resolved.get_mut(name)) {
                package.add_dependant(dependant, range);
            }
            return Ok(());
        }

        if let Some(engine) = self.engine {
            engine.verify(&descriptor)?;
        }

        let (package, arbitrated) = match self.resolved.entry(name.to_string()) {
            Entry::Occupied(entry) => {
                let package = entry.into_mut();
                let arbitrated = match self.mode {
                    ResolutionMode::Strict => {
                        arbitrate_strict(package, descriptor, &version, range, &mut self.report)?;
                        version
                    }
                    ResolutionMode::LatestCompatible => arbitrate_latest_compatible(
                        self.registry,
                        package,
                        descriptor,
                        &version,
                        range,
                        &mut self.report,
                    )?,
                };
                (package, arbitrated)
            }
            Entry::Vacant(entry) => {
                debug!("adding {name} {version}");
                (entry.insert(ResolvedPackage::new(descriptor)), version)
            }
        };

        if let Some(dependant) = dependant {
            debug!("recording edge {} -> {name}", dependant.name);
            package.add_dependant(dependant, range);
        }

        // Mark the arbitrated candidate, not the kept version, so a repeated
        // request for an older compatible release short-circuits.
        let current = package.descriptor().clone();
        self.visited.visit(name, arbitrated);

        let this = Dependant::from(&current);
        for (dependency, dependency_range) in &current.dependencies {
            self.resolve_required_by(dependency, Some(dependency_range), Some(&this))?;
        }
        Ok(())
    }

    /// Number of distinct resolved package names.
    pub fn size(&self) -> usize {
        self.resolved.len()
    }

    /// The chosen descriptors, one per package name, in name order.
    pub fn descriptors(&self) -> Vec<PackageDescriptor> {
        self.resolved
            .values()
            .map(|p| p.descriptor().clone())
            .collect()
    }

    pub fn into_descriptors(self) -> Vec<PackageDescriptor> {
        self.resolved
            .into_values()
            .map(|p| p.descriptor().clone())
            .collect()
    }

    pub fn get_resolved(&self, name: &str) -> Option<&ResolvedPackage> {
        self.resolved.get(name)
    }

    /// Resolved packages in name order.
    pub fn resolved(&self) -> impl Iterator<Item = &ResolvedPackage> {
        self.resolved.values()
    }

    /// Arbitrations made so far in this run.
    pub fn report(&self) -> &ConflictReport {
        &self.report
    }
}

/// Adopt `candidate` only if every recorded dependant accepts it.
fn arbitrate_strict(
    package: &mut ResolvedPackage,
    candidate: PackageDescriptor,
    version: &Version,
    range: Option<&str>,
    report: &mut ConflictReport,
) -> Result<(), ResolveError> {
    let mut conflicts: Vec<Dependency> = Vec::new();
    for edge in package.required_by() {
        if !satisfies(&candidate.version, edge.range.as_deref())? {
            conflicts.push(edge.clone());
        }
    }
    if !conflicts.is_empty() {
        return Err(ResolveError::UnsolvableDependency {
            name: package.name().to_string(),
            candidate: candidate.version,
            requested: range.map(str::to_string),
            conflicts,
        });
    }

    let current = Version::parse(package.version())?;
    if current != *version {
        debug!(
            "strict: switching {} from {} to {}",
            package.name(),
            package.version(),
            candidate.version
        );
        report.add(VersionConflict {
            name: package.name().to_string(),
            requested: range.unwrap_or("latest").to_string(),
            previous: package.version().to_string(),
            resolved: candidate.version.clone(),
            reason: format!("accepted by all {} dependants", package.count_dependants()),
        });
        package.replace_descriptor(candidate);
    }
    Ok(())
}

/// Keep the highest version compatible with what is already resolved.
/// Returns the version that was arbitrated: the candidate, or the latest
/// compatible fallback when the candidate is incompatible.
fn arbitrate_latest_compatible(
    registry: &dyn Registry,
    package: &mut ResolvedPackage,
    candidate: PackageDescriptor,
    version: &Version,
    range: Option<&str>,
    report: &mut ConflictReport,
) -> Result<Version, ResolveError> {
    let current = Version::parse(package.version())?;
    let requested = range.unwrap_or("latest").to_string();

    let (candidate, version, reason) = if registry.is_compatible(&current, version) {
        (candidate, version.clone(), "newer compatible release")
    } else {
        let fallback = registry.get_latest_compatible(package.name(), package.version())?;
        debug!(
            "latest-compatible: {} {} is incompatible with {}, falling back to {}",
            package.name(),
            version,
            current,
            fallback.version
        );
        if !satisfies(&fallback.version, range)? {
            return Err(ResolveError::UnsolvableDependency {
                name: package.name().to_string(),
                candidate: fallback.version,
                requested: range.map(str::to_string),
                conflicts: package.required_by().cloned().collect(),
            });
        }
        let fallback_version = Version::parse(&fallback.version)?;
        (fallback, fallback_version, "latest compatible release")
    };

    if version > current {
        debug!(
            "latest-compatible: upgrading {} from {} to {}",
            package.name(),
            current,
            version
        );
        report.add(VersionConflict {
            name: package.name().to_string(),
            requested,
            previous: package.version().to_string(),
            resolved: candidate.version.clone(),
            reason: reason.to_string(),
        });
        package.replace_descriptor(candidate);
    } else if version != current {
        debug!(
            "latest-compatible: keeping {} {} over {}",
            package.name(),
            current,
            version
        );
        report.add(VersionConflict {
            name: package.name().to_string(),
            requested,
            previous: package.version().to_string(),
            resolved: package.version().to_string(),
            reason: format!("kept over older {}", candidate.version),
        });
    }
    Ok(version)
}

//! Records kept by the resolver: resolved packages and the edges pointing at them.

use std::collections::BTreeMap;
use std::fmt;

use rp_core::descriptor::PackageDescriptor;
use serde::Serialize;

/// A dependency edge as declared by a dependant. Edges reference packages by
/// name only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
    pub from: String,
    pub from_version: String,
    pub to: String,
    pub range: Option<String>,
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} {} -> {} {}]",
            self.from,
            self.from_version,
            self.to,
            self.range.as_deref().unwrap_or("latest")
        )
    }
}

/// The package that declared a dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependant {
    pub name: String,
    pub version: String,
}

impl From<&PackageDescriptor> for Dependant {
    fn from(descriptor: &PackageDescriptor) -> Self {
        Self {
            name: descriptor.name.clone(),
            version: descriptor.version.clone(),
        }
    }
}

/// The version currently chosen for one package name, plus every edge
/// requiring it keyed by dependant name.
#[derive(Debug, Clone)]
pub struct ResolvedPackage {
    name: String,
    descriptor: PackageDescriptor,
    required_by: BTreeMap<String, Dependency>,
}

impl ResolvedPackage {
    pub fn new(descriptor: PackageDescriptor) -> Self {
        Self {
            name: descriptor.name.clone(),
            descriptor,
            required_by: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn descriptor(&self) -> &PackageDescriptor {
        &self.descriptor
    }

    pub fn version(&self) -> &str {
        &self.descriptor.version
    }

    /// Edges pointing at this package, ordered by dependant name.
    pub fn required_by(&self) -> impl Iterator<Item = &Dependency> {
        self.required_by.values()
    }

    pub fn count_dependants(&self) -> usize {
        self.required_by.len()
    }

    /// Record that `dependant` requires this package within `range`,
    /// replacing any earlier edge from the same dependant.
    pub(crate) fn add_dependant(&mut self, dependant: &Dependant, range: Option<&str>) {
        self.required_by.insert(
            dependant.name.clone(),
            Dependency {
                from: dependant.name.clone(),
                from_version: dependant.version.clone(),
                to: self.name.clone(),
                range: range.map(str::to_string),
            },
        );
    }

    pub(crate) fn replace_descriptor(&mut self, descriptor: PackageDescriptor) {
        self.descriptor = descriptor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dependant(name: &str, version: &str) -> Dependant {
        Dependant {
            name: name.to_string(),
            version: version.to_string(),
        }
    }

    #[test]
    fn edges_are_keyed_by_dependant_name() {
        let mut package = ResolvedPackage::new(PackageDescriptor::new("b", "0.1.0"));
        package.add_dependant(&dependant("a", "0.1.0"), Some(">= 0.1"));
        package.add_dependant(&dependant("c", "1.0.0"), Some("0.1"));
        package.add_dependant(&dependant("a", "0.2.0"), Some(">= 0.1.0"));

        assert_eq!(package.count_dependants(), 2);
        let edges: Vec<_> = package.required_by().collect();
        assert_eq!(edges[0].from, "a");
        assert_eq!(edges[0].from_version, "0.2.0");
        assert_eq!(edges[0].range.as_deref(), Some(">= 0.1.0"));
        assert_eq!(edges[1].from, "c");
    }

    #[test]
    fn dependency_display() {
        let edge = Dependency {
            from: "a".into(),
            from_version: "0.1.0".into(),
            to: "b".into(),
            range: Some("==0.1.0".into()),
        };
        assert_eq!(edge.to_string(), "[a 0.1.0 -> b ==0.1.0]");
    }
}

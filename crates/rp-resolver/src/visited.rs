//! Cycle detection bookkeeping for a single resolution run.

use std::collections::HashMap;

use crate::version::Version;

/// Remembers, per package name, the candidate version last arbitrated.
/// Requests for that same version short-circuit, which terminates circular
/// and diamond-shaped dependency chains.
#[derive(Debug, Default)]
pub struct VisitedSet {
    visited: HashMap<String, Version>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `version` of `name` as visited, replacing any earlier version.
    pub fn visit(&mut self, name: &str, version: Version) {
        self.visited.insert(name.to_string(), version);
    }

    /// Whether `version` is the version last visited for `name`.
    pub fn contains(&self, name: &str, version: &Version) -> bool {
        self.visited.get(name).is_some_and(|v| v == version)
    }

    pub fn len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }
}

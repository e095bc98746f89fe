use miette::Diagnostic;
use thiserror::Error;

use crate::range::RangeError;
use crate::resolved::Dependency;
use crate::version::VersionError;

/// Failures of a resolution run. Every variant aborts the run.
#[derive(Debug, Error, Diagnostic)]
pub enum ResolveError {
    #[error("Package '{name}' does not exist in the catalog")]
    #[diagnostic(help("Check the package name or refresh the catalog"))]
    UnknownPackage { name: String },

    #[error("No version of '{name}' satisfies '{range}'")]
    NoSatisfyingVersion { name: String, range: String },

    #[error("No version of '{name}' is compatible with {version}")]
    NoCompatibleVersion { name: String, version: String },

    #[error("{name} {version} requires {engine} {range}, but the host runs {engine} {host_version}")]
    #[diagnostic(help("Upgrade the engine or pick an older release of {name}"))]
    EngineIncompatible {
        name: String,
        version: String,
        engine: String,
        range: String,
        host_version: String,
    },

    #[error("{}", unsolvable_message(.name, .candidate, .requested.as_deref(), .conflicts))]
    #[diagnostic(help("Relax one of the conflicting ranges or resolve with a different mode"))]
    UnsolvableDependency {
        name: String,
        candidate: String,
        requested: Option<String>,
        conflicts: Vec<Dependency>,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Range(#[from] RangeError),
}

fn unsolvable_message(
    name: &str,
    candidate: &str,
    requested: Option<&str>,
    conflicts: &[Dependency],
) -> String {
    let mut message = format!(
        "Unable to resolve '{name}': {candidate} (requested {}) conflicts with",
        requested.unwrap_or("latest")
    );
    if conflicts.is_empty() {
        message.push_str(" the version already resolved");
    }
    for conflict in conflicts {
        message.push(' ');
        message.push_str(&conflict.to_string());
    }
    message
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Conflict strategy applied when a package name is requested at a version
/// different from the one already resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionMode {
    /// Every dependant recorded so far must accept the replacement version.
    #[default]
    Strict,
    /// Prefer the highest version compatible with the one already resolved.
    LatestCompatible,
}

impl FromStr for ResolutionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(Self::Strict),
            "latest-compatible" | "latest" => Ok(Self::LatestCompatible),
            other => Err(format!(
                "unknown resolution mode '{other}' (expected 'strict' or 'latest-compatible')"
            )),
        }
    }
}

impl fmt::Display for ResolutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => f.write_str("strict"),
            Self::LatestCompatible => f.write_str("latest-compatible"),
        }
    }
}

/// Rule deciding whether two versions of a package are interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Compatibility {
    /// Same major component (`0.1.0` ~ `0.3.2`, `1.2.0` ~ `1.9.0`).
    #[default]
    SameMajor,
    /// Equal up to and including the first non-zero component
    /// (`1.2.0` ~ `1.9.0`, `0.1.0` ~ `0.1.7`, but not `0.1.0` ~ `0.2.0`).
    LeadingNonZero,
}

impl FromStr for Compatibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "same-major" => Ok(Self::SameMajor),
            "leading-non-zero" => Ok(Self::LeadingNonZero),
            other => Err(format!(
                "unknown compatibility rule '{other}' (expected 'same-major' or 'leading-non-zero')"
            )),
        }
    }
}

impl fmt::Display for Compatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SameMajor => f.write_str("same-major"),
            Self::LeadingNonZero => f.write_str("leading-non-zero"),
        }
    }
}

//! Operations on bare versions and ranges: `rp satisfies`, `rp sort`, `rp range`.

use rp_resolver::range::{self, Range};
use rp_resolver::version::{self, SortOrder, Version};

/// Whether `version` lies within `range`.
pub fn satisfies(version: &str, range: &str) -> miette::Result<bool> {
    Ok(range::satisfies(version, Some(range))?)
}

/// Sort version strings, keeping the input spelling.
pub fn sort(versions: &[String], order: SortOrder) -> miette::Result<Vec<String>> {
    let mut parsed = versions
        .iter()
        .map(|v| Version::parse(v))
        .collect::<Result<Vec<_>, _>>()?;
    version::sort(&mut parsed, order);
    Ok(parsed.iter().map(|v| v.as_str().to_string()).collect())
}

/// The normalized form of `range`, or of its intersection with `other`.
pub fn normalize_range(range: &str, other: Option<&str>) -> miette::Result<String> {
    let normalized = match other {
        Some(other) => range::intersect(range, other)?,
        None => Range::parse(range)?,
    };
    Ok(normalized.to_string())
}

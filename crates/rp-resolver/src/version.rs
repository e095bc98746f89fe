//! Version parsing, canonicalization and ordering.
//!
//! A version is up to three numeric components followed by a free-form tag:
//! `1.2.3`, `v1.2`, `1.x`, `0.2beta3`. Any component may be the wildcard `x`.
//!
//! Ordering folds the components into a single integer with base-10000
//! positional weights (`major * 10000² + minor * 10000 + patch`) and breaks
//! ties on the tag:
//! - a version without a tag outranks the same version with a tag
//!   (`1.0.0` > `1.0.0beta`),
//! - two tags compare as plain strings (`1.0rc1` > `1.0beta2`).

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use miette::Diagnostic;
use regex::Regex;
use thiserror::Error;

use rp_core::mode::Compatibility;

/// Positional base of the ordering value.
pub const BASE: u64 = 10_000;

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[vV]?([0-9xX]+)(?:\.([0-9xX]+))?(?:\.([0-9xX]+))?(.*)$")
        .expect("valid version pattern")
});

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum VersionError {
    #[error("Unable to parse version '{0}'")]
    #[diagnostic(help("Versions look like 1.2.3, 1.2, 1.x or 0.2beta1"))]
    Parse(String),

    #[error("Version component '{component}' of '{version}' is out of range")]
    Overflow { version: String, component: String },

    #[error("Version '{0}' contains a wildcard and has no canonical form")]
    Wildcard(String),
}

/// One numeric slot of a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    Number(u32),
    Wildcard,
}

impl Component {
    fn parse(token: &str, version: &str) -> Result<Self, VersionError> {
        if token.eq_ignore_ascii_case("x") {
            return Ok(Self::Wildcard);
        }
        if !token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(VersionError::Parse(version.to_string()));
        }
        token
            .parse::<u32>()
            .map(Self::Number)
            .map_err(|_| VersionError::Overflow {
                version: version.to_string(),
                component: token.to_string(),
            })
    }

    /// Numeric value, treating the wildcard as zero.
    pub fn as_number(self) -> u32 {
        match self {
            Self::Number(n) => n,
            Self::Wildcard => 0,
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Wildcard => f.write_str("x"),
        }
    }
}

/// A parsed, immutable version.
///
/// Equality follows the ordering: `1.2` and `1.2.0` are equal.
#[derive(Debug, Clone)]
pub struct Version {
    original: String,
    components: [Option<Component>; 3],
    tag: Option<String>,
}

impl Version {
    pub fn parse(version: &str) -> Result<Self, VersionError> {
        let caps = VERSION_PATTERN
            .captures(version)
            .ok_or_else(|| VersionError::Parse(version.to_string()))?;

        let mut components = [None; 3];
        for (slot, group) in components.iter_mut().zip(1..=3) {
            if let Some(m) = caps.get(group) {
                *slot = Some(Component::parse(m.as_str(), version)?);
            }
        }
        let tag = caps
            .get(4)
            .map(|m| m.as_str())
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        Ok(Self {
            original: version.to_string(),
            components,
            tag,
        })
    }

    /// The string this version was parsed from.
    pub fn as_str(&self) -> &str {
        &self.original
    }

    pub fn major(&self) -> Option<Component> {
        self.components[0]
    }

    pub fn minor(&self) -> Option<Component> {
        self.components[1]
    }

    pub fn patch(&self) -> Option<Component> {
        self.components[2]
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// True when all three components are present and none is a wildcard.
    pub fn is_exact(&self) -> bool {
        self.components
            .iter()
            .all(|c| matches!(c, Some(Component::Number(_))))
    }

    /// Fold the components into the base-10000 ordering value.
    ///
    /// The first missing or wildcard component is replaced by `wildcard`,
    /// any further one by zero.
    pub fn value(&self, wildcard: u64) -> u64 {
        let mut found_wildcard = false;
        self.components.iter().fold(0, |acc, component| {
            let n = match component {
                Some(Component::Number(n)) => u64::from(*n),
                _ if !found_wildcard => {
                    found_wildcard = true;
                    wildcard
                }
                _ => 0,
            };
            acc * BASE + n
        })
    }

    /// Ordering key with wildcards compared as zero.
    pub fn key(&self) -> VersionKey {
        VersionKey {
            value: self.value(0),
            tag: self.tag.clone(),
        }
    }

    /// Canonical `major.minor.patch{tag}` form with missing components set to 0.
    pub fn clean(&self) -> Result<String, VersionError> {
        let mut parts = Vec::with_capacity(3);
        for component in &self.components {
            match component {
                Some(Component::Number(n)) => parts.push(n.to_string()),
                Some(Component::Wildcard) => {
                    return Err(VersionError::Wildcard(self.original.clone()))
                }
                None => parts.push("0".to_string()),
            }
        }
        Ok(format!("{}{}", parts.join("."), self.tag.as_deref().unwrap_or("")))
    }

    /// Whether `other` can stand in for `self` under `rule`. Tags are ignored.
    pub fn is_compatible_with(&self, other: &Version, rule: Compatibility) -> bool {
        let numbers = |v: &Version| v.components.map(|c| c.map_or(0, Component::as_number));
        let (a, b) = (numbers(self), numbers(other));
        match rule {
            Compatibility::SameMajor => a[0] == b[0],
            Compatibility::LeadingNonZero => {
                for (x, y) in a.iter().zip(b.iter()) {
                    if x != y {
                        return false;
                    }
                    if *x != 0 {
                        return true;
                    }
                }
                true
            }
        }
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A folded `(value, tag)` pair: the unit every comparison works on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionKey {
    pub value: u64,
    pub tag: Option<String>,
}

impl VersionKey {
    pub fn new(value: u64, tag: Option<String>) -> Self {
        Self { value, tag }
    }
}

impl Ord for VersionKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value).then_with(|| match (&self.tag, &other.tag) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a.as_bytes().cmp(b.as_bytes()),
        })
    }
}

impl PartialOrd for VersionKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for VersionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            to_version(self.value),
            self.tag.as_deref().unwrap_or("")
        )
    }
}

/// Render an ordering value back into `major.minor.patch`.
pub fn to_version(value: u64) -> String {
    let major = value / (BASE * BASE);
    let minor = (value / BASE) % BASE;
    let patch = value % BASE;
    format!("{major}.{minor}.{patch}")
}

/// Canonicalize a version string, e.g. `0.2beta1` -> `0.2.0beta1`.
pub fn clean_version(version: &str) -> Result<String, VersionError> {
    Version::parse(version)?.clean()
}

/// Compare two version strings.
pub fn compare(a: &str, b: &str) -> Result<Ordering, VersionError> {
    Ok(Version::parse(a)?.cmp(&Version::parse(b)?))
}

pub fn is_greater(a: &str, b: &str) -> Result<bool, VersionError> {
    Ok(compare(a, b)? == Ordering::Greater)
}

pub fn is_greater_or_equal(a: &str, b: &str) -> Result<bool, VersionError> {
    Ok(compare(a, b)? != Ordering::Less)
}

pub fn is_lower(a: &str, b: &str) -> Result<bool, VersionError> {
    is_greater(b, a)
}

pub fn is_lower_or_equal(a: &str, b: &str) -> Result<bool, VersionError> {
    is_greater_or_equal(b, a)
}

pub fn is_equal(a: &str, b: &str) -> Result<bool, VersionError> {
    Ok(compare(a, b)? == Ordering::Equal)
}

/// Direction for [`sort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Stable sort of `versions` in the given direction.
pub fn sort(versions: &mut [Version], order: SortOrder) {
    match order {
        SortOrder::Ascending => versions.sort_by(|a, b| a.cmp(b)),
        SortOrder::Descending => versions.sort_by(|a, b| b.cmp(a)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn parse_full() {
        let version = v("1.2.3");
        assert_eq!(version.major(), Some(Component::Number(1)));
        assert_eq!(version.minor(), Some(Component::Number(2)));
        assert_eq!(version.patch(), Some(Component::Number(3)));
        assert_eq!(version.tag(), None);
        assert!(version.is_exact());
    }

    #[test]
    fn parse_partial_with_tag() {
        let version = v("0.2beta3");
        assert_eq!(version.major(), Some(Component::Number(0)));
        assert_eq!(version.minor(), Some(Component::Number(2)));
        assert_eq!(version.patch(), None);
        assert_eq!(version.tag(), Some("beta3"));
        assert!(!version.is_exact());
    }

    #[test]
    fn parse_prefix_and_wildcards() {
        let version = v("v1.X");
        assert_eq!(version.major(), Some(Component::Number(1)));
        assert_eq!(version.minor(), Some(Component::Wildcard));
        assert_eq!(version.patch(), None);
        assert_eq!(version.to_string(), "v1.X");
    }

    #[test]
    fn parse_keeps_tag_verbatim() {
        assert_eq!(v("1.0.0-rc.1").tag(), Some("-rc.1"));
        assert_eq!(v("1.0.0.4").tag(), Some(".4"));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(
            Version::parse("abc"),
            Err(VersionError::Parse("abc".to_string()))
        );
        assert!(Version::parse("").is_err());
        assert!(Version::parse("1x.0").is_err());
        assert!(matches!(
            Version::parse("99999999999.0.0"),
            Err(VersionError::Overflow { .. })
        ));
    }

    #[test]
    fn value_folding() {
        assert_eq!(v("1.2.3").value(0), 1_0002_0003);
        assert_eq!(v("0.0.1").value(0), 1);
        assert_eq!(v("1.2").value(0), 1_0002_0000);
    }

    #[test]
    fn value_single_wildcard_placeholder() {
        // Only the first open slot takes the placeholder.
        assert_eq!(v("1.2").value(BASE), 1_0003_0000);
        assert_eq!(v("1").value(BASE), 2_0000_0000);
        assert_eq!(v("1.x.x").value(BASE), 2_0000_0000);
    }

    #[test]
    fn clean_version_fills_missing() {
        assert_eq!(clean_version("1").unwrap(), "1.0.0");
        assert_eq!(clean_version("0.2beta1").unwrap(), "0.2.0beta1");
        assert_eq!(clean_version("v1.2.3").unwrap(), "1.2.3");
    }

    #[test]
    fn clean_version_is_idempotent() {
        for s in ["1", "0.1", "1.2.3", "0.2beta3", "v4.5", "1.0.0-rc.1"] {
            let once = clean_version(s).unwrap();
            assert_eq!(clean_version(&once).unwrap(), once, "{s}");
        }
    }

    #[test]
    fn clean_version_rejects_wildcard() {
        assert_eq!(
            clean_version("1.x"),
            Err(VersionError::Wildcard("1.x".to_string()))
        );
    }

    #[test]
    fn release_outranks_tagged() {
        assert!(v("1.0.0") > v("1.0.0beta"));
        assert!(v("1.0.0beta") < v("1.0.0"));
    }

    #[test]
    fn tags_compare_lexicographically() {
        assert!(v("0.1alpha2") > v("0.1alpha1"));
        assert!(v("1.0rc1") > v("1.0beta2"));
        // Raw string comparison, not numeric.
        assert!(v("1.0beta10") < v("1.0beta9"));
    }

    #[test]
    fn numeric_value_beats_tag() {
        assert!(v("0.1.1alpha") > v("0.1.0"));
    }

    #[test]
    fn partial_equals_full() {
        assert_eq!(v("1.2"), v("1.2.0"));
        assert!(is_equal("0.2", "0.2.0").unwrap());
    }

    #[test]
    fn comparators_are_mirrors() {
        assert!(is_greater("1.1", "1.0.9").unwrap());
        assert!(is_lower("1.0.9", "1.1").unwrap());
        assert!(is_greater_or_equal("1.0", "1.0.0").unwrap());
        assert!(is_lower_or_equal("1.0", "1.0.0").unwrap());
        assert!(!is_greater("1.0", "1.0.0").unwrap());
    }

    #[test]
    fn comparator_trichotomy() {
        let samples = ["0.1", "0.1.0", "0.1.0alpha", "0.1.0beta", "1.0", "1.x", "9999.9999.9999"];
        for a in samples {
            for b in samples {
                let holds = [
                    is_greater(a, b).unwrap(),
                    is_greater(b, a).unwrap(),
                    is_equal(a, b).unwrap(),
                ];
                assert_eq!(holds.iter().filter(|h| **h).count(), 1, "{a} vs {b}");
            }
        }
    }

    #[test]
    fn to_version_round_trip() {
        for s in ["0.0.0", "0.0.1", "0.1.0", "0.1.1", "1.0.0", "1.1.0", "1.1.1", "9999.9999.9999"] {
            assert_eq!(to_version(v(s).value(0)), s);
        }
    }

    #[test]
    fn sort_both_directions() {
        let mut versions: Vec<Version> = ["0.2", "1.0.0", "0.10.0", "1.0.0beta", "0.2.0"]
            .iter()
            .map(|s| v(s))
            .collect();
        sort(&mut versions, SortOrder::Ascending);
        let asc: Vec<&str> = versions.iter().map(Version::as_str).collect();
        // Stable: "0.2" stays ahead of the equal "0.2.0".
        assert_eq!(asc, vec!["0.2", "0.2.0", "0.10.0", "1.0.0beta", "1.0.0"]);

        sort(&mut versions, SortOrder::Descending);
        let desc: Vec<&str> = versions.iter().map(Version::as_str).collect();
        assert_eq!(desc, vec!["1.0.0", "1.0.0beta", "0.10.0", "0.2", "0.2.0"]);
    }

    #[test]
    fn compatibility_same_major() {
        let rule = Compatibility::SameMajor;
        assert!(v("0.1.0").is_compatible_with(&v("0.3.0"), rule));
        assert!(v("1.2.0").is_compatible_with(&v("1.9.9"), rule));
        assert!(!v("0.1.0").is_compatible_with(&v("1.0.0"), rule));
    }

    #[test]
    fn compatibility_leading_non_zero() {
        let rule = Compatibility::LeadingNonZero;
        assert!(v("1.2.0").is_compatible_with(&v("1.9.0"), rule));
        assert!(v("0.1.0").is_compatible_with(&v("0.1.7"), rule));
        assert!(!v("0.1.0").is_compatible_with(&v("0.2.0"), rule));
        assert!(!v("0.0.3").is_compatible_with(&v("0.0.4"), rule));
        assert!(v("0.0.3").is_compatible_with(&v("0.0.3beta"), rule));
    }
}

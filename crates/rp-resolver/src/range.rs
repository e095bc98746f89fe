//! Version range parsing, normalization and intersection.
//!
//! Accepted forms:
//! - `1.2.3`, `=1.2`, `==0.1.0`: exactly that version (`1.2` means the whole `1.2.x` line)
//! - `>= 1.0`, `<2`: a single bound
//! - `>= 1.0 < 2.0`, `1.0 - 2.0`, `0.1 0.3`: a lower and an upper bound
//!
//! An inclusive upper bound on an inexact version is widened to the next
//! line: `<= 1.2` becomes `< 1.3.0`, so every `1.2.x` release satisfies it.

use std::fmt;
use std::sync::LazyLock;

use miette::Diagnostic;
use regex::Regex;
use thiserror::Error;

use crate::version::{Version, VersionError, VersionKey, BASE};

static RANGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*([<>=]*)\s*([0-9a-z.]+)[\s-]*(?:([<>=]+)?\s*([0-9a-z.]+)\s*)?$")
        .expect("valid range pattern")
});

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum RangeError {
    #[error("Unable to parse range '{0}'")]
    #[diagnostic(help("Ranges look like 1.2, >= 1.0, < 2, >= 1.0 < 2.0 or 1.0 - 2.0"))]
    Parse(String),

    #[error("Unsupported operator '{op}' in range '{range}'")]
    #[diagnostic(help("Use one of <, <=, >, >=, ="))]
    Operator { op: String, range: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Version(#[from] VersionError),

    #[error("Invalid range: {0} matches no version")]
    Empty(String),
}

/// Comparison operator of a single bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
}

impl Op {
    /// Parse an operator token. `=`/`==` and the empty string carry no bound.
    fn parse(token: &str, range: &str) -> Result<Option<Self>, RangeError> {
        match token {
            "" | "=" | "==" => Ok(None),
            ">" => Ok(Some(Self::Greater)),
            ">=" => Ok(Some(Self::GreaterOrEqual)),
            "<" => Ok(Some(Self::Less)),
            "<=" => Ok(Some(Self::LessOrEqual)),
            other => Err(RangeError::Operator {
                op: other.to_string(),
                range: range.to_string(),
            }),
        }
    }

    /// True for `<` and `<=`.
    pub fn is_upper(self) -> bool {
        matches!(self, Self::Less | Self::LessOrEqual)
    }

    pub fn is_inclusive(self) -> bool {
        matches!(self, Self::GreaterOrEqual | Self::LessOrEqual)
    }

    fn holds(self, candidate: &VersionKey, bound: &VersionKey) -> bool {
        match self {
            Self::Greater => candidate > bound,
            Self::GreaterOrEqual => candidate >= bound,
            Self::Less => candidate < bound,
            Self::LessOrEqual => candidate <= bound,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
        })
    }
}

/// One side of a range: an operator and the folded version it compares against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bound {
    pub op: Op,
    pub key: VersionKey,
}

impl Bound {
    /// Build a bound, widening `<=` on an inexact version to `<` on the next line.
    pub fn new(op: Op, version: &Version) -> Self {
        if op == Op::LessOrEqual && !version.is_exact() {
            return Self {
                op: Op::Less,
                key: VersionKey::new(version.value(BASE), version.tag().map(str::to_string)),
            };
        }
        Self {
            op,
            key: version.key(),
        }
    }

    pub fn parse(op: Op, version: &str) -> Result<Self, VersionError> {
        Ok(Self::new(op, &Version::parse(version)?))
    }

    /// The implicit lower bound `>= 0.0.0`.
    pub fn floor() -> Self {
        Self {
            op: Op::GreaterOrEqual,
            key: VersionKey::new(0, None),
        }
    }

    pub fn matches(&self, key: &VersionKey) -> bool {
        self.op.holds(key, &self.key)
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op, self.key)
    }
}

/// The tighter of two lower bounds; on equal versions the exclusive one wins.
pub fn max_low<'a>(a: &'a Bound, b: &'a Bound) -> &'a Bound {
    if a.key == b.key {
        if a.op == Op::GreaterOrEqual {
            b
        } else {
            a
        }
    } else if a.key > b.key {
        a
    } else {
        b
    }
}

/// The tighter of two upper bounds; on equal versions the exclusive one wins.
pub fn min_high<'a>(a: &'a Bound, b: &'a Bound) -> &'a Bound {
    if a.key == b.key {
        if a.op == Op::LessOrEqual {
            b
        } else {
            a
        }
    } else if a.key < b.key {
        a
    } else {
        b
    }
}

/// Whether the interval `[low, high]` contains at least one version.
pub fn is_valid_interval(low: &Bound, high: &Bound) -> bool {
    low.key < high.key || (low.key == high.key && low.op.is_inclusive() && high.op.is_inclusive())
}

/// A normalized range: at most one lower and one upper bound, never neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range {
    lower: Option<Bound>,
    upper: Option<Bound>,
    exact: bool,
}

impl Range {
    /// Parse and normalize a range expression.
    pub fn parse(range: &str) -> Result<Self, RangeError> {
        let caps = RANGE_PATTERN
            .captures(range)
            .ok_or_else(|| RangeError::Parse(range.to_string()))?;
        let first_op = Op::parse(caps.get(1).map_or("", |m| m.as_str()), range)?;
        let first = Version::parse(&caps[2])?;
        let second_op = Op::parse(caps.get(3).map_or("", |m| m.as_str()), range)?;
        let second = caps.get(4).map(|m| Version::parse(m.as_str())).transpose()?;

        match (first_op, second) {
            (None, None) => Ok(Self {
                lower: Some(Bound::new(Op::GreaterOrEqual, &first)),
                upper: Some(Bound::new(Op::LessOrEqual, &first)),
                exact: true,
            }),
            (Some(op), None) => Ok(Self::from_bound(Bound::new(op, &first))),
            (Some(op), Some(_)) if op.is_upper() && second_op.is_none() => Ok(Self {
                lower: Some(Bound::floor()),
                upper: Some(Bound::new(op, &first)),
                exact: false,
            }),
            (first_op, second) => {
                let a = Bound::new(first_op.unwrap_or(Op::GreaterOrEqual), &first);
                let b = Bound::new(
                    second_op.unwrap_or(Op::LessOrEqual),
                    second.as_ref().unwrap_or(&first),
                );
                Ok(Self::from_pair(a, b))
            }
        }
    }

    fn from_bound(bound: Bound) -> Self {
        if bound.op.is_upper() {
            Self {
                lower: None,
                upper: Some(bound),
                exact: false,
            }
        } else {
            Self {
                lower: Some(bound),
                upper: None,
                exact: false,
            }
        }
    }

    /// Place two bounds by direction; two bounds facing the same way collapse
    /// into the tighter one.
    fn from_pair(a: Bound, b: Bound) -> Self {
        match (a.op.is_upper(), b.op.is_upper()) {
            (false, true) => Self {
                lower: Some(a),
                upper: Some(b),
                exact: false,
            },
            (true, false) => Self {
                lower: Some(b),
                upper: Some(a),
                exact: false,
            },
            (false, false) => Self::from_bound(max_low(&a, &b).clone()),
            (true, true) => Self::from_bound(min_high(&a, &b).clone()),
        }
    }

    pub fn lower(&self) -> Option<&Bound> {
        self.lower.as_ref()
    }

    pub fn upper(&self) -> Option<&Bound> {
        self.upper.as_ref()
    }

    /// The lower bound, or `>= 0.0.0` when the range has none.
    pub fn lower_or_floor(&self) -> Bound {
        self.lower.clone().unwrap_or_else(Bound::floor)
    }

    /// The bounds that must all hold, lower first.
    pub fn bounds(&self) -> impl Iterator<Item = &Bound> {
        self.lower.iter().chain(self.upper.iter())
    }

    /// True when parsed from a bare version without operators.
    pub fn is_exact(&self) -> bool {
        self.exact
    }

    pub fn contains(&self, version: &Version) -> bool {
        let key = version.key();
        self.bounds().all(|bound| bound.matches(&key))
    }

    /// The range both `self` and `other` accept.
    pub fn intersect(&self, other: &Range) -> Result<Range, RangeError> {
        let (low_a, low_b) = (self.lower_or_floor(), other.lower_or_floor());
        let low = max_low(&low_a, &low_b).clone();
        let high = match (&self.upper, &other.upper) {
            (Some(a), Some(b)) => Some(min_high(a, b).clone()),
            (Some(a), None) | (None, Some(a)) => Some(a.clone()),
            (None, None) => None,
        };
        if let Some(high) = &high {
            if !is_valid_interval(&low, high) {
                return Err(RangeError::Empty(format!("{low} {high}")));
            }
        }
        Ok(Range {
            lower: Some(low),
            upper: high,
            exact: false,
        })
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lower_or_floor())?;
        if let Some(upper) = &self.upper {
            write!(f, " {upper}")?;
        }
        Ok(())
    }
}

/// Normalize a range expression into its bounds.
pub fn sanitize_range(range: &str) -> Result<Range, RangeError> {
    Range::parse(range)
}

/// Whether `version` lies within `range`. An absent or empty range accepts everything.
pub fn satisfies(version: &str, range: Option<&str>) -> Result<bool, RangeError> {
    match range {
        None | Some("") => Ok(true),
        Some(range) => {
            let range = Range::parse(range)?;
            Ok(range.contains(&Version::parse(version)?))
        }
    }
}

/// Intersect two range expressions.
pub fn intersect(a: &str, b: &str) -> Result<Range, RangeError> {
    Range::parse(a)?.intersect(&Range::parse(b)?)
}

/// Whether `range` names a single version without operators.
pub fn is_exact(range: &str) -> Result<bool, RangeError> {
    Ok(Range::parse(range)?.is_exact())
}

use super::Version;
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// PEP 440 comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equal,
    NotEqual,
    LessEqual,
    GreaterEqual,
    Less,
    Greater,
    Compatible,
    ArbitraryEqual,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::LessEqual => "<=",
            Operator::GreaterEqual => ">=",
            Operator::Less => "<",
            Operator::Greater => ">",
            Operator::Compatible => "~=",
            Operator::ArbitraryEqual => "===",
        }
    }
}

/// A single version constraint, e.g. `>=2.5` or `==1.8.16`
///
/// The version text is kept as written. Splitting the operator from the text
/// is a syntax concern; whether the text is a valid version is checked
/// separately so an audit can report it with a precise location.
#[derive(Debug, Clone)]
pub struct Specifier {
    op: Operator,
    raw: String,
}

impl FromStr for Specifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        // Longest operators first so `==` is not read as two halves of `===`
        let table = [
            ("===", Operator::ArbitraryEqual),
            ("==", Operator::Equal),
            ("!=", Operator::NotEqual),
            ("<=", Operator::LessEqual),
            (">=", Operator::GreaterEqual),
            ("~=", Operator::Compatible),
            ("<", Operator::Less),
            (">", Operator::Greater),
        ];

        for (symbol, op) in table {
            if let Some(rest) = trimmed.strip_prefix(symbol) {
                let raw = rest.trim();
                if raw.is_empty() {
                    return Err(Error::RequirementParsing(format!(
                        "missing version after '{}' in '{}'",
                        symbol, s
                    )));
                }
                return Ok(Specifier {
                    op,
                    raw: raw.to_string(),
                });
            }
        }

        Err(Error::RequirementParsing(format!(
            "missing comparison operator in '{}'",
            s
        )))
    }
}

impl Specifier {
    pub fn op(&self) -> Operator {
        self.op
    }

    /// The version text as written, including any `.*` wildcard suffix
    pub fn version_text(&self) -> &str {
        &self.raw
    }

    /// Whether this is a `==X.Y.*` / `!=X.Y.*` prefix constraint
    pub fn is_wildcard(&self) -> bool {
        matches!(self.op, Operator::Equal | Operator::NotEqual) && self.raw.ends_with(".*")
    }

    /// Parses the version text (wildcard suffix stripped)
    pub fn version(&self) -> Result<Version> {
        self.raw.trim_end_matches(".*").parse()
    }

    /// Exclusive upper bound of a `.*` wildcard: the written release with its
    /// last segment bumped, so `2.8.*` covers [2.8, 2.9)
    fn wildcard_ceiling(&self) -> Result<Version> {
        let floor = self.version()?;
        Ok(bump_release(&floor, floor.release.len()))
    }

    /// Exclusive upper bound of `~=`: `~=1.4.5` covers [1.4.5, 1.5)
    fn compatible_ceiling(&self) -> Result<Version> {
        let floor = self.version()?;
        if floor.release.len() < 2 {
            return Err(Error::VersionParsing(format!(
                "'~=' requires at least two release segments: '{}'",
                self.raw
            )));
        }
        Ok(bump_release(&floor, floor.release.len() - 1))
    }

    fn wildcard_match(&self, candidate: &Version) -> Result<bool> {
        let floor = self.version()?;
        let ceiling = self.wildcard_ceiling()?;
        Ok(*candidate >= floor && *candidate < ceiling)
    }

    /// Whether a version satisfies this constraint
    #[allow(dead_code)]
    pub fn contains(&self, candidate: &Version) -> Result<bool> {
        Ok(match self.op {
            Operator::ArbitraryEqual => candidate.to_string() == self.raw,
            Operator::Equal if self.is_wildcard() => self.wildcard_match(candidate)?,
            Operator::NotEqual if self.is_wildcard() => !self.wildcard_match(candidate)?,
            Operator::Equal => *candidate == self.version()?,
            Operator::NotEqual => *candidate != self.version()?,
            Operator::Less => *candidate < self.version()?,
            Operator::LessEqual => *candidate <= self.version()?,
            Operator::Greater => *candidate > self.version()?,
            Operator::GreaterEqual => *candidate >= self.version()?,
            Operator::Compatible => {
                *candidate >= self.version()? && *candidate < self.compatible_ceiling()?
            }
        })
    }
}

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op.as_str(), self.raw)
    }
}

fn bump_release(version: &Version, keep: usize) -> Version {
    let mut release = version.release[..keep].to_vec();
    if let Some(last) = release.last_mut() {
        *last += 1;
    }
    Version {
        epoch: version.epoch,
        release,
        pre: None,
        post: None,
        dev: None,
        local: None,
    }
}

/// A comma-separated conjunction of specifiers, e.g. `<2.9,>=2.5`
///
/// An empty set means the requirement is unconstrained.
#[derive(Debug, Clone, Default)]
pub struct SpecifierSet {
    specifiers: Vec<Specifier>,
}

impl FromStr for SpecifierSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut specifiers = Vec::new();
        if !s.trim().is_empty() {
            for part in s.split(',') {
                specifiers.push(part.parse()?);
            }
        }
        Ok(SpecifierSet { specifiers })
    }
}

impl SpecifierSet {
    pub fn is_empty(&self) -> bool {
        self.specifiers.is_empty()
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.specifiers.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Specifier> {
        self.specifiers.iter()
    }

    /// Whether a version satisfies every constraint in the set
    #[allow(dead_code)]
    pub fn contains(&self, version: &Version) -> Result<bool> {
        for spec in &self.specifiers {
            if !spec.contains(version)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Whether the constraints admit at least one version
    ///
    /// Computes the interval intersection of the ordered constraints and
    /// checks pins and exclusions against it. The version order is treated as
    /// dense between distinct bounds, so finitely many `!=` exclusions can
    /// only empty a single-point interval.
    pub fn is_satisfiable(&self) -> Result<bool> {
        let mut lower: Option<(Version, bool)> = None;
        let mut upper: Option<(Version, bool)> = None;
        let mut pins: Vec<Version> = Vec::new();
        let mut literal_pins: Vec<String> = Vec::new();
        let mut exclusions: Vec<Version> = Vec::new();
        let mut excluded_ranges: Vec<(Version, Version)> = Vec::new();

        for spec in &self.specifiers {
            match spec.op {
                Operator::Equal if spec.is_wildcard() => {
                    tighten_lower(&mut lower, spec.version()?, true);
                    tighten_upper(&mut upper, spec.wildcard_ceiling()?, false);
                }
                Operator::NotEqual if spec.is_wildcard() => {
                    excluded_ranges.push((spec.version()?, spec.wildcard_ceiling()?));
                }
                Operator::Equal => pins.push(spec.version()?),
                Operator::ArbitraryEqual => match spec.version() {
                    Ok(version) => pins.push(version),
                    Err(_) => literal_pins.push(spec.version_text().to_string()),
                },
                Operator::NotEqual => exclusions.push(spec.version()?),
                Operator::Greater => tighten_lower(&mut lower, spec.version()?, false),
                Operator::GreaterEqual => tighten_lower(&mut lower, spec.version()?, true),
                Operator::Less => tighten_upper(&mut upper, spec.version()?, false),
                Operator::LessEqual => tighten_upper(&mut upper, spec.version()?, true),
                Operator::Compatible => {
                    tighten_lower(&mut lower, spec.version()?, true);
                    tighten_upper(&mut upper, spec.compatible_ceiling()?, false);
                }
            }
        }

        // Non-PEP 440 `===` pins can only be compared to each other as text
        if let Some(first) = literal_pins.first() {
            if literal_pins.iter().any(|other| other != first) {
                return Ok(false);
            }
            if !pins.is_empty() {
                return Ok(false);
            }
            // Ordered constraints cannot be evaluated against a literal pin;
            // stay conservative and report satisfiable.
            return Ok(true);
        }

        if let Some(pin) = pins.first() {
            if pins.iter().any(|other| other != pin) {
                return Ok(false);
            }
            if exclusions.iter().any(|excluded| excluded == pin) {
                return Ok(false);
            }
            if excluded_ranges
                .iter()
                .any(|(floor, ceiling)| pin >= floor && pin < ceiling)
            {
                return Ok(false);
            }
            if let Some((bound, inclusive)) = &lower {
                if pin < bound || (pin == bound && !inclusive) {
                    return Ok(false);
                }
            }
            if let Some((bound, inclusive)) = &upper {
                if pin > bound || (pin == bound && !inclusive) {
                    return Ok(false);
                }
            }
            return Ok(true);
        }

        if let (Some((low, low_inclusive)), Some((high, high_inclusive))) = (&lower, &upper) {
            if low > high {
                return Ok(false);
            }
            if low == high {
                if !(*low_inclusive && *high_inclusive) {
                    return Ok(false);
                }
                // Single-point interval: the point itself must survive
                if exclusions.iter().any(|excluded| excluded == low) {
                    return Ok(false);
                }
                if excluded_ranges
                    .iter()
                    .any(|(floor, ceiling)| low >= floor && low < ceiling)
                {
                    return Ok(false);
                }
            }
        }

        Ok(true)
    }
}

fn tighten_lower(bound: &mut Option<(Version, bool)>, candidate: Version, inclusive: bool) {
    match bound {
        Some((current, current_inclusive)) => {
            if candidate > *current {
                *current = candidate;
                *current_inclusive = inclusive;
            } else if candidate == *current {
                *current_inclusive = *current_inclusive && inclusive;
            }
        }
        None => *bound = Some((candidate, inclusive)),
    }
}

fn tighten_upper(bound: &mut Option<(Version, bool)>, candidate: Version, inclusive: bool) {
    match bound {
        Some((current, current_inclusive)) => {
            if candidate < *current {
                *current = candidate;
                *current_inclusive = inclusive;
            } else if candidate == *current {
                *current_inclusive = *current_inclusive && inclusive;
            }
        }
        None => *bound = Some((candidate, inclusive)),
    }
}

impl fmt::Display for SpecifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.specifiers.iter().map(Specifier::to_string).collect();
        write!(f, "{}", parts.join(","))
    }
}

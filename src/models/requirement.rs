use crate::version::SpecifierSet;
use std::str::FromStr;

/// Represents a single dependency record from a requirements manifest
#[derive(Debug, Clone)]
pub struct Requirement {
    /// The package name as written in the manifest
    pub name: String,

    /// Version constraints; empty means unconstrained
    pub specifiers: SpecifierSet,

    /// Optional extras (e.g. ["s3", "test"])
    pub extras: Option<Vec<String>>,

    /// Optional environment markers (e.g. "python_version > '3.7'")
    pub environment_markers: Option<String>,

    /// Where the requirement comes from (registry, URL, editable install)
    pub source: RequirementSource,

    /// Group of the requirement (main, dev, or named group)
    pub group: RequirementGroup,

    /// Free-text category from the nearest standalone comment header
    pub section: Option<String>,

    /// 1-based line number in the manifest file
    pub line: usize,
}

/// Represents the group a requirement belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RequirementGroup {
    /// Main project requirement
    Main,

    /// Development requirement
    Dev,

    /// Requirement in a named group (e.g. "docs", "test")
    Group(String),
}

impl FromStr for RequirementGroup {
    type Err = String;

    fn from_str(group: &str) -> Result<Self, Self::Err> {
        Ok(match group {
            "dev" => RequirementGroup::Dev,
            "main" => RequirementGroup::Main,
            other => RequirementGroup::Group(other.to_string()),
        })
    }
}

impl std::fmt::Display for RequirementGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequirementGroup::Main => write!(f, "main"),
            RequirementGroup::Dev => write!(f, "dev"),
            RequirementGroup::Group(name) => write!(f, "{}", name),
        }
    }
}

/// Where a requirement line points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequirementSource {
    /// A regular package index requirement
    Registry,

    /// A direct URL or VCS requirement (git+..., https://...)
    Url(String),

    /// An editable install (-e <path or url>)
    Editable(String),
}

impl Requirement {
    /// Creates a new registry requirement with the given name and group
    pub fn new(name: String, group: RequirementGroup, line: usize) -> Self {
        Self {
            name,
            specifiers: SpecifierSet::default(),
            extras: None,
            environment_markers: None,
            source: RequirementSource::Registry,
            group,
            section: None,
            line,
        }
    }

    /// Sets the version constraints
    pub fn with_specifiers(mut self, specifiers: SpecifierSet) -> Self {
        self.specifiers = specifiers;
        self
    }

    /// Adds environment markers to the requirement
    pub fn with_markers(mut self, markers: String) -> Self {
        self.environment_markers = Some(markers);
        self
    }

    /// Adds extras to the requirement
    pub fn with_extras(mut self, extras: Vec<String>) -> Self {
        self.extras = Some(extras);
        self
    }

    /// The name normalized for comparison (PEP 503)
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }

    /// Whether the requirement carries no version constraint at all
    pub fn is_unconstrained(&self) -> bool {
        self.specifiers.is_empty() && matches!(self.source, RequirementSource::Registry)
    }

    /// Renders the requirement back to PEP 508 text
    pub fn to_pep508(&self) -> String {
        let mut out = self.name.clone();
        if let Some(extras) = &self.extras {
            if !extras.is_empty() {
                out.push_str(&format!("[{}]", extras.join(",")));
            }
        }
        out.push_str(&self.specifiers.to_string());
        if let Some(markers) = &self.environment_markers {
            out.push_str(&format!(" ; {}", markers));
        }
        out
    }
}

/// Normalizes a package name per PEP 503: lowercase with runs of `-`, `_`,
/// and `.` collapsed to a single `-`
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_separator = false;
    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            pending_separator = true;
        } else {
            if pending_separator && !out.is_empty() {
                out.push('-');
            }
            pending_separator = false;
            out.push(c.to_ascii_lowercase());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        let test_cases = vec![
            ("OctoBot-Commons", "octobot-commons"),
            ("typing_extensions", "typing-extensions"),
            ("zope.interface", "zope-interface"),
            ("Flask", "flask"),
            ("a--b__c..d", "a-b-c-d"),
        ];

        for (input, expected) in test_cases {
            assert_eq!(normalize_name(input), expected, "Failed for: {:?}", input);
        }
    }

    #[test]
    fn test_to_pep508() {
        let req = Requirement::new("uvicorn".to_string(), RequirementGroup::Main, 1)
            .with_specifiers(">=0.30.1".parse().unwrap())
            .with_extras(vec!["standard".to_string()])
            .with_markers("python_version >= '3.8'".to_string());
        assert_eq!(
            req.to_pep508(),
            "uvicorn[standard]>=0.30.1 ; python_version >= '3.8'"
        );
    }
}

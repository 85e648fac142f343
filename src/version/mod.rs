mod specifier;

pub use specifier::{Operator, Specifier, SpecifierSet};

use crate::error::{Error, Result};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Pre-release phase of a version (PEP 440 spellings normalize to these)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PreRelease {
    Alpha,
    Beta,
    Rc,
}

/// A PEP 440 version as written in requirements manifests
///
/// Equality and ordering follow the PEP 440 total order, so `1.0` compares
/// equal to `1.0.0` and `1.0.dev1 < 1.0a1 < 1.0 < 1.0.post1`.
#[derive(Debug, Clone)]
pub struct Version {
    pub epoch: u64,
    pub release: Vec<u64>,
    pub pre: Option<(PreRelease, u64)>,
    pub post: Option<u64>,
    pub dev: Option<u64>,
    pub local: Option<String>,
}

fn version_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?ix)^v?
            (?:(?P<epoch>\d+)!)?
            (?P<release>\d+(?:\.\d+)*)
            (?:[-_.]?(?P<pre_l>a|b|c|rc|alpha|beta|pre|preview)[-_.]?(?P<pre_n>\d+)?)?
            (?P<post>-(?P<post_n1>\d+)|[-_.]?(?:post|rev|r)[-_.]?(?P<post_n2>\d+)?)?
            (?P<dev>[-_.]?dev[-_.]?(?P<dev_n>\d+)?)?
            (?:\+(?P<local>[a-z0-9]+(?:[-_.][a-z0-9]+)*))?
            $",
        )
        .unwrap()
    })
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let caps = version_re()
            .captures(s.trim())
            .ok_or_else(|| Error::VersionParsing(format!("invalid version: '{}'", s)))?;

        let epoch = caps
            .name("epoch")
            .map(|m| m.as_str().parse::<u64>())
            .transpose()
            .map_err(|_| Error::VersionParsing(format!("epoch out of range in '{}'", s)))?
            .unwrap_or(0);

        let mut release = Vec::new();
        for part in caps["release"].split('.') {
            release.push(part.parse::<u64>().map_err(|_| {
                Error::VersionParsing(format!("release segment out of range in '{}'", s))
            })?);
        }

        let pre = caps.name("pre_l").map(|label| {
            let phase = match label.as_str().to_ascii_lowercase().as_str() {
                "a" | "alpha" => PreRelease::Alpha,
                "b" | "beta" => PreRelease::Beta,
                _ => PreRelease::Rc,
            };
            let number = caps
                .name("pre_n")
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(0);
            (phase, number)
        });

        // A bare marker ("1.0.post", "1.0.dev") counts as segment number 0.
        let post = caps.name("post").map(|_| {
            caps.name("post_n1")
                .or_else(|| caps.name("post_n2"))
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(0)
        });

        let dev = caps.name("dev").map(|_| {
            caps.name("dev_n")
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(0)
        });

        let local = caps
            .name("local")
            .map(|m| m.as_str().to_ascii_lowercase().replace(['-', '_'], "."));

        Ok(Version {
            epoch,
            release,
            pre,
            post,
            dev,
            local,
        })
    }
}

/// Pre-release rank used by the comparison key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum PreKey {
    /// dev release with no pre segment sorts before everything
    DevOnly,
    Pre(PreRelease, u64),
    /// final and post releases sort after any pre-release
    Final,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum LocalSegment {
    Text(String),
    Number(u64),
}

impl Version {
    /// Release segments with insignificant trailing zeros removed
    fn trimmed_release(&self) -> &[u64] {
        let mut end = self.release.len();
        while end > 1 && self.release[end - 1] == 0 {
            end -= 1;
        }
        &self.release[..end]
    }

    fn pre_key(&self) -> PreKey {
        match self.pre {
            Some((phase, n)) => PreKey::Pre(phase, n),
            None if self.post.is_none() && self.dev.is_some() => PreKey::DevOnly,
            None => PreKey::Final,
        }
    }

    fn local_key(&self) -> Vec<LocalSegment> {
        match &self.local {
            None => Vec::new(),
            Some(local) => local
                .split('.')
                .map(|seg| match seg.parse::<u64>() {
                    Ok(n) => LocalSegment::Number(n),
                    Err(_) => LocalSegment::Text(seg.to_string()),
                })
                .collect(),
        }
    }

    #[allow(dead_code)]
    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some() || self.dev.is_some()
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| self.trimmed_release().cmp(other.trimmed_release()))
            .then_with(|| self.pre_key().cmp(&other.pre_key()))
            // absent post sorts below post 0
            .then_with(|| {
                let post = |v: &Version| v.post.map(|n| (1u8, n)).unwrap_or((0, 0));
                post(self).cmp(&post(other))
            })
            // absent dev sorts above dev N
            .then_with(|| {
                let dev = |v: &Version| v.dev.map(|n| (0u8, n)).unwrap_or((1, 0));
                dev(self).cmp(&dev(other))
            })
            .then_with(|| self.local_key().cmp(&other.local_key()))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch != 0 {
            write!(f, "{}!", self.epoch)?;
        }
        let release: Vec<String> = self.release.iter().map(u64::to_string).collect();
        write!(f, "{}", release.join("."))?;
        if let Some((phase, n)) = self.pre {
            let label = match phase {
                PreRelease::Alpha => "a",
                PreRelease::Beta => "b",
                PreRelease::Rc => "rc",
            };
            write!(f, "{}{}", label, n)?;
        }
        if let Some(n) = self.post {
            write!(f, ".post{}", n)?;
        }
        if let Some(n) = self.dev {
            write!(f, ".dev{}", n)?;
        }
        if let Some(local) = &self.local {
            write!(f, "+{}", local)?;
        }
        Ok(())
    }
}

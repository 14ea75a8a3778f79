//! Dotted-triple version parsing.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static SEMVER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.(\d+)\.(\d+)").expect("static regex"));

/// A `major.minor.patch` version. Pre-release and build suffixes are not kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SemVer {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl SemVer {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

/// Parse the leading `major.minor.patch` triple of `text`.
///
/// Anything after the triple (`-beta.1`, `+build`) is ignored. Returns `None`
/// for input that does not start with three dot-separated integers, including
/// the empty string, and for components too large for `u64`.
pub fn parse(text: &str) -> Option<SemVer> {
    let caps = SEMVER_PREFIX.captures(text)?;
    let major = caps[1].parse().ok()?;
    let minor = caps[2].parse().ok()?;
    let patch = caps[3].parse().ok()?;
    Some(SemVer::new(major, minor, patch))
}

impl fmt::Display for SemVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

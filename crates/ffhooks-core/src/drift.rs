//! Version drift classification.

use std::fmt;

use crate::version::SemVer;

/// Coarsest component at which two versions differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriftKind {
    Major,
    Minor,
    Patch,
    None,
}

impl DriftKind {
    /// Capitalised label used in the upgrade notice. `None` for no drift.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            DriftKind::Major => Some("Major"),
            DriftKind::Minor => Some("Minor"),
            DriftKind::Patch => Some("Patch"),
            DriftKind::None => None,
        }
    }

    pub fn is_drift(&self) -> bool {
        !matches!(self, DriftKind::None)
    }
}

impl fmt::Display for DriftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DriftKind::Major => "major",
            DriftKind::Minor => "minor",
            DriftKind::Patch => "patch",
            DriftKind::None => "none",
        };
        f.write_str(s)
    }
}

/// Compare `stored` against `running`, scanning major, minor, then patch.
pub fn classify(stored: &SemVer, running: &SemVer) -> DriftKind {
    if stored.major != running.major {
        DriftKind::Major
    } else if stored.minor != running.minor {
        DriftKind::Minor
    } else if stored.patch != running.patch {
        DriftKind::Patch
    } else {
        DriftKind::None
    }
}

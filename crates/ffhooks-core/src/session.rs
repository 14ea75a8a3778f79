//! Session-start version check.
//!
//! [`VersionCheck::run`] compares the version stamped in the config document
//! with the version of the running plugin, prints an upgrade notice on drift,
//! and stamps the running version back into the document. Each step can end
//! the check early without error:
//!
//! 1. no plugin root, or its last segment is not a version → nothing happens
//! 2. no config document → nothing happens, no document is created
//! 3. no `plugin_version` field → no notice, but the field is stamped
//! 4. drift → one notice on the advisory writer; if that write fails it is
//!    logged and the check still stamps
//! 5. the document is saved only if stamping changed it
//!
//! [`VersionCheck::run_guarded`] is the advisory-only boundary: any error is
//! logged to the diagnostic channel and swallowed.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{HookConfig, DEFAULT_CHANGELOG, DEFAULT_TAG};
use crate::config_doc::{is_stampable, read_field, stamp_field};
use crate::drift::{classify, DriftKind};
use crate::error::{HookError, Result};
use crate::obs;
use crate::store::ConfigStore;
use crate::version;

const HOOK_NAME: &str = "version-check";

/// How a version check ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The running version could not be determined.
    NoRunningVersion,
    /// There is no config document to check against.
    NoConfig { running: String },
    /// The document was checked, and stamped if needed.
    Checked {
        stored: Option<String>,
        running: String,
        drift: DriftKind,
        stamped: bool,
    },
}

/// Version check for one session.
#[derive(Debug, Clone)]
pub struct VersionCheck {
    plugin_root: Option<PathBuf>,
    changelog: String,
    tag: String,
}

impl VersionCheck {
    pub fn new(plugin_root: Option<PathBuf>) -> Self {
        Self {
            plugin_root,
            changelog: DEFAULT_CHANGELOG.to_string(),
            tag: DEFAULT_TAG.to_string(),
        }
    }

    pub fn from_config(config: &HookConfig) -> Self {
        Self {
            plugin_root: config.plugin_root.clone(),
            changelog: config.changelog.clone(),
            tag: config.tag.clone(),
        }
    }

    /// The running version: the plugin root's last path segment, if it parses
    /// and can be written back as a single field line.
    pub fn running_version(&self) -> Option<String> {
        let root = self.plugin_root.as_deref()?;
        let segment = last_segment(root)?;
        if !is_stampable(segment) {
            return None;
        }
        version::parse(segment).map(|_| segment.to_string())
    }

    pub fn run<S, W>(&self, store: &S, advisory: &mut W) -> Result<SessionOutcome>
    where
        S: ConfigStore + ?Sized,
        W: Write + ?Sized,
    {
        let Some(running) = self.running_version() else {
            obs::emit_hook_skipped(HOOK_NAME, "no running version");
            return Ok(SessionOutcome::NoRunningVersion);
        };

        let Some(content) = store.load()? else {
            obs::emit_hook_skipped(HOOK_NAME, "no config file");
            return Ok(SessionOutcome::NoConfig { running });
        };

        let stored = read_field(&content);
        let drift = match &stored {
            Some(stored) if *stored != running => self.notify_drift(stored, &running, advisory),
            _ => DriftKind::None,
        };

        let updated = stamp_field(&content, &running);
        let stamped = updated != content;
        if stamped {
            store.save(&updated)?;
            obs::emit_config_stamped(&running);
        } else {
            debug!(version = %running, "config already stamped");
        }

        Ok(SessionOutcome::Checked {
            stored,
            running,
            drift,
            stamped,
        })
    }

    /// Run the check, logging and swallowing any error. Never fails.
    pub fn run_guarded<S, W>(&self, store: &S, advisory: &mut W) -> Option<SessionOutcome>
    where
        S: ConfigStore + ?Sized,
        W: Write + ?Sized,
    {
        let _span = obs::HookSpan::enter(HOOK_NAME);
        match self.run(store, advisory) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                obs::emit_hook_error(&self.tag, HOOK_NAME, &e);
                None
            }
        }
    }

    /// Print the upgrade notice. A failed advisory write is logged and does not
    /// stop the check.
    fn notify_drift<W>(&self, stored: &str, running: &str, advisory: &mut W) -> DriftKind
    where
        W: Write + ?Sized,
    {
        let (Some(stored_ver), Some(running_ver)) = (version::parse(stored), version::parse(running))
        else {
            debug!(stored = %stored, "stored version does not parse; no notice");
            return DriftKind::None;
        };

        let drift = classify(&stored_ver, &running_ver);
        if let Some(notice) = upgrade_notice(drift, stored, running, &self.changelog) {
            obs::emit_drift_detected(drift, stored, running);
            if let Err(e) = advisory
                .write_all(notice.as_bytes())
                .and_then(|()| advisory.flush())
            {
                obs::emit_hook_error(&self.tag, HOOK_NAME, &HookError::Advisory(e));
            }
        }
        drift
    }
}

fn last_segment(path: &Path) -> Option<&str> {
    path.file_name()?.to_str()
}

/// Render the upgrade notice for `drift`, or `None` when there is no drift.
///
/// The notice is a blank separator line followed by one line naming the drift
/// magnitude, both versions and the changelog.
pub fn upgrade_notice(drift: DriftKind, stored: &str, running: &str, changelog: &str) -> Option<String> {
    let label = drift.label()?;
    Some(format!(
        "\nUPGRADE NOTICE: {label} version drift detected — \
         config was stamped by v{stored}, now running v{running}. \
         Review {changelog} for what changed.\n"
    ))
}

//! Hook configuration.
//!
//! Defaults match the feature-flow plugin layout. The CLI overrides them from
//! flags and environment variables; the library never reads the environment.

use std::path::PathBuf;

/// Environment variable carrying the running plugin's installation path.
pub const PLUGIN_ROOT_ENV: &str = "CLAUDE_PLUGIN_ROOT";

/// Environment variable holding the log filter. `RUST_LOG` is not consulted:
/// it belongs to the host and must not silence hook diagnostics.
pub const LOG_ENV: &str = "FFHOOKS_LOG";

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "FEATURE_FLOW_CONFIG";

pub const DEFAULT_CONFIG_FILE: &str = ".feature-flow.yml";
pub const DEFAULT_CHANGELOG: &str = "CHANGELOG.md";
pub const DEFAULT_TAG: &str = "feature-flow";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookConfig {
    /// Config document stamped with `plugin_version`.
    pub config_path: PathBuf,
    /// Installation path of the running plugin; its last segment is the version.
    pub plugin_root: Option<PathBuf>,
    /// Changelog the upgrade notice points to.
    pub changelog: String,
    /// Prefix for hook messages.
    pub tag: String,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_FILE),
            plugin_root: None,
            changelog: DEFAULT_CHANGELOG.to_string(),
            tag: DEFAULT_TAG.to_string(),
        }
    }
}

impl HookConfig {
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = path.into();
        self
    }

    pub fn with_plugin_root(mut self, root: Option<PathBuf>) -> Self {
        self.plugin_root = root;
        self
    }
}

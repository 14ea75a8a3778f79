//! feature-flow hook core
//!
//! Advisory session hooks for the feature-flow plugin:
//! - `version-check`: detect drift between the version stamped in
//!   `.feature-flow.yml` and the running plugin, print an upgrade notice,
//!   and stamp the running version
//! - `lint-file`: run the project's JS/TS linter on an edited file
//!
//! Hooks never fail the host session. Unexpected errors are logged to the
//! diagnostic channel (stderr) and swallowed.

pub mod config;
pub mod config_doc;
pub mod drift;
pub mod error;
pub mod lint;
pub mod obs;
pub mod session;
pub mod store;
pub mod telemetry;
pub mod version;

pub use config::{HookConfig, CONFIG_PATH_ENV, LOG_ENV, PLUGIN_ROOT_ENV};
pub use config_doc::{read_field, stamp_field};
pub use drift::{classify, DriftKind};
pub use error::{HookError, Result};
pub use lint::{is_source_file, HookInput, LintHook, LintOutcome, Linter};
pub use session::{upgrade_notice, SessionOutcome, VersionCheck};
pub use store::{ConfigStore, FsConfigStore, MemoryConfigStore};
pub use telemetry::init_tracing;
pub use version::SemVer;

/// Hook crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Structured tracing events for hook outcomes.
//!
//! Normal outcomes are emitted at `debug!`/`info!` and stay silent under the
//! default `warn` filter. Only [`emit_hook_error`] reaches the diagnostic
//! channel in a default run. Set `FFHOOKS_LOG=debug` to see everything.

use tracing::{debug, error, info};

use crate::drift::DriftKind;

/// RAII guard that enters a hook-scoped span for the duration of one hook run.
pub struct HookSpan {
    _span: tracing::span::EnteredSpan,
}

impl HookSpan {
    pub fn enter(hook: &str) -> Self {
        let span = tracing::info_span!("ffhooks.hook", hook = %hook);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: a hook exited early on an expected-absence branch.
pub fn emit_hook_skipped(hook: &str, reason: &str) {
    debug!(event = "hook.skipped", hook = %hook, reason = %reason);
}

/// Emit event: stored and running versions differ.
pub fn emit_drift_detected(drift: DriftKind, stored: &str, running: &str) {
    info!(event = "version.drift", drift = %drift, stored = %stored, running = %running);
}

/// Emit event: the config document was rewritten.
pub fn emit_config_stamped(version: &str) {
    info!(event = "config.stamped", version = %version);
}

/// Emit event: a hook failed unexpectedly. This is the diagnostic channel.
pub fn emit_hook_error(tag: &str, hook: &str, err: &dyn std::fmt::Display) {
    error!("[{tag}] {hook} hook error: {err}");
}

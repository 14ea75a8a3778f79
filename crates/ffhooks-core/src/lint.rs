//! Post-edit lint hook.
//!
//! Reads the host's hook payload, and when the edited file is a JS/TS source
//! file runs the project's linter on it. Lint findings are reported on the
//! advisory writer. A project without a configured linter, or a linter that
//! cannot be started, is skipped silently.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::config::DEFAULT_TAG;
use crate::error::{HookError, Result};
use crate::obs;

const HOOK_NAME: &str = "lint-file";

static SOURCE_EXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(ts|tsx|js|jsx)$").expect("static regex"));
static TEST_OR_DECL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(test|spec|d)\.(ts|tsx|js|jsx)$").expect("static regex"));
static IGNORED_DIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|/)(node_modules|\.next|dist|build|\.git)(/|$)").expect("static regex")
});

/// Hook payload sent by the host after a file-editing tool call.
#[derive(Debug, Default, Deserialize)]
pub struct HookInput {
    #[serde(default)]
    pub tool_input: Option<ToolInput>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ToolInput {
    #[serde(default)]
    pub file_path: Option<String>,
}

impl HookInput {
    pub fn file_path(&self) -> &str {
        self.tool_input
            .as_ref()
            .and_then(|t| t.file_path.as_deref())
            .unwrap_or("")
    }
}

/// Whether `path` is a lintable JS/TS source file.
///
/// Test, spec and declaration files are excluded, as is anything under
/// `node_modules`, `.next`, `dist`, `build` or `.git`.
pub fn is_source_file(path: &str) -> bool {
    SOURCE_EXT.is_match(path) && !TEST_OR_DECL.is_match(path) && !IGNORED_DIR.is_match(path)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Linter {
    Eslint,
    Biome,
}

impl Linter {
    /// Detection order.
    pub const ALL: [Linter; 2] = [Linter::Eslint, Linter::Biome];

    pub fn bin(&self) -> &'static str {
        match self {
            Linter::Eslint => "eslint",
            Linter::Biome => "biome",
        }
    }

    /// Config files, any one of which marks the linter as configured.
    pub fn config_files(&self) -> &'static [&'static str] {
        match self {
            Linter::Eslint => &[
                ".eslintrc",
                ".eslintrc.js",
                ".eslintrc.cjs",
                ".eslintrc.json",
                ".eslintrc.yml",
                ".eslintrc.yaml",
                "eslint.config.js",
                "eslint.config.mjs",
                "eslint.config.cjs",
                "eslint.config.ts",
            ],
            Linter::Biome => &["biome.json", "biome.jsonc"],
        }
    }

    pub fn args<'a>(&self, file_path: &'a str) -> Vec<&'a str> {
        match self {
            Linter::Eslint => vec!["eslint", file_path],
            Linter::Biome => vec!["biome", "check", file_path],
        }
    }
}

/// How a lint hook run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintOutcome {
    NotSourceFile,
    NoLinter,
    Clean(Linter),
    /// The linter could not be started or was killed by a signal.
    Skipped(Linter),
    Errors { linter: Linter, report: String },
}

/// Lint hook bound to a project root.
#[derive(Debug, Clone)]
pub struct LintHook {
    project_root: PathBuf,
    runner: String,
    tag: String,
}

impl LintHook {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            runner: "npx".to_string(),
            tag: DEFAULT_TAG.to_string(),
        }
    }

    /// Program used to launch the linter (default `npx`).
    pub fn with_runner(mut self, runner: impl Into<String>) -> Self {
        self.runner = runner.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// First linter that is both installed locally and configured.
    pub fn detect_linter(&self) -> Option<Linter> {
        Linter::ALL.into_iter().find(|linter| {
            let bin = self.project_root.join("node_modules/.bin").join(linter.bin());
            bin.exists()
                && linter
                    .config_files()
                    .iter()
                    .any(|c| self.project_root.join(c).exists())
        })
    }

    /// Run `linter` on `file_path`.
    pub fn run_linter(&self, linter: Linter, file_path: &str) -> LintOutcome {
        let output = match Command::new(&self.runner)
            .args(linter.args(file_path))
            .current_dir(&self.project_root)
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                debug!(runner = %self.runner, error = %e, "failed to start linter");
                return LintOutcome::Skipped(linter);
            }
        };

        if output.status.success() {
            return LintOutcome::Clean(linter);
        }
        if output.status.code().is_none() {
            return LintOutcome::Skipped(linter);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        LintOutcome::Errors {
            linter,
            report: lint_report(&stdout, &stderr),
        }
    }

    /// Handle one raw hook payload.
    pub fn handle<W>(&self, input: &str, advisory: &mut W) -> Result<LintOutcome>
    where
        W: Write + ?Sized,
    {
        let input: HookInput = serde_json::from_str(input)?;
        let file_path = input.file_path();
        if !is_source_file(file_path) {
            obs::emit_hook_skipped(HOOK_NAME, "not a source file");
            return Ok(LintOutcome::NotSourceFile);
        }

        let Some(linter) = self.detect_linter() else {
            obs::emit_hook_skipped(HOOK_NAME, "no linter configured");
            return Ok(LintOutcome::NoLinter);
        };

        let outcome = self.run_linter(linter, file_path);
        if let LintOutcome::Errors { report, .. } = &outcome {
            let message = format_lint_errors(&self.tag, file_path, report);
            writeln!(advisory, "{message}").map_err(HookError::Advisory)?;
            advisory.flush().map_err(HookError::Advisory)?;
        }
        Ok(outcome)
    }

    /// Handle the payload, logging and swallowing any error. Never fails.
    pub fn handle_guarded<W>(&self, input: &str, advisory: &mut W) -> Option<LintOutcome>
    where
        W: Write + ?Sized,
    {
        let _span = obs::HookSpan::enter(HOOK_NAME);
        match self.handle(input, advisory) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                obs::emit_hook_error(&self.tag, HOOK_NAME, &e);
                None
            }
        }
    }
}

/// First non-blank stream, trimmed, or a generic message.
fn lint_report(stdout: &str, stderr: &str) -> String {
    [stdout, stderr]
        .into_iter()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or("Lint errors found")
        .to_string()
}

pub fn format_lint_errors(tag: &str, file_path: &str, report: &str) -> String {
    let name = Path::new(file_path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_path.to_string());
    format!("[{tag}] LINT ERRORS in {name} — fix these before continuing:\n{report}")
}

//! feature-flow hook runner
//!
//! The `ffhooks` command is invoked by the host tool at lifecycle events.
//!
//! ## Commands
//!
//! - `version-check`: session start; report plugin version drift and stamp
//!   the running version into `.feature-flow.yml`
//! - `lint-file`: after a file edit; lint the edited JS/TS file
//!
//! Every command exits 0. Hook failures are reported on stderr only.

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ffhooks_core::config::{DEFAULT_CHANGELOG, DEFAULT_CONFIG_FILE, DEFAULT_TAG};
use ffhooks_core::{
    FsConfigStore, HookConfig, LintHook, VersionCheck, CONFIG_PATH_ENV, PLUGIN_ROOT_ENV,
};
use tracing::{debug, Level};

#[derive(Parser)]
#[command(name = "ffhooks")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Advisory lifecycle hooks for the feature-flow plugin", long_about = None)]
struct Cli {
    /// Enable verbose diagnostics on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Prefix for hook messages
    #[arg(long, global = true, default_value = DEFAULT_TAG)]
    tag: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report plugin version drift and stamp the running version
    VersionCheck {
        /// Config file holding `plugin_version`
        #[arg(long, env = CONFIG_PATH_ENV, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Installation path of the running plugin; its last segment is the version
        #[arg(long, env = PLUGIN_ROOT_ENV)]
        plugin_root: Option<PathBuf>,

        /// Changelog named in the upgrade notice
        #[arg(long, default_value = DEFAULT_CHANGELOG)]
        changelog: String,
    },

    /// Lint the file named in the hook payload read from stdin
    LintFile {
        /// Project root used for linter detection
        #[arg(long, default_value = ".")]
        project_root: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
    };

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    ffhooks_core::init_tracing(cli.json, level);

    if let Err(e) = run(cli) {
        tracing::error!("{e:#}");
    }
    ExitCode::SUCCESS
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::VersionCheck {
            config,
            plugin_root,
            changelog,
        } => {
            let config = HookConfig {
                changelog,
                tag: cli.tag,
                ..HookConfig::default()
            }
            .with_config_path(config)
            .with_plugin_root(plugin_root);
            cmd_version_check(&config)
        }
        Commands::LintFile { project_root } => cmd_lint_file(project_root, cli.tag),
    }
}

fn cmd_version_check(config: &HookConfig) -> Result<()> {
    let store = FsConfigStore::new(&config.config_path);
    let outcome = VersionCheck::from_config(config).run_guarded(&store, &mut io::stdout().lock());
    debug!(?outcome, "version-check finished");
    Ok(())
}

fn cmd_lint_file(project_root: PathBuf, tag: String) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .with_context(|| format!("[{tag}] lint-file hook error: failed to read stdin"))?;

    let outcome = LintHook::new(project_root)
        .with_tag(tag)
        .handle_guarded(&input, &mut io::stdout().lock());
    debug!(?outcome, "lint-file finished");
    Ok(())
}

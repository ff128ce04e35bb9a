//! CLI entry point for the beian-guard tool.
//!
//! This binary scans source files for bare identifiers, checks them
//! against the `beian.json` registry, and gates host actions on the
//! result.
//!
//! # Usage
//!
//! ```bash
//! beian-guard [OPTIONS] <COMMAND>
//!
//! # Scan and show findings
//! beian-guard scan --path /path/to/project
//!
//! # Register an identifier from a document
//! beian-guard register UserAccount --document src/user.ts
//!
//! # Verify before an action; exits non-zero when blocked
//! beian-guard gate --action debug-launch
//!
//! # Watch for changes and re-scan continuously
//! beian-guard watch
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use beian_core::{Config, DocumentId, ScanTarget};
use beian_registry::{RegistryLocator, RegistryStore};
use beian_scanner::{
    ComplianceGate, FileWalker, GateDecision, InterceptedAction, ScanError, ScanOptions, Verdict,
};
use beian_watcher::{ChangeCoordinator, FileWatcher, GuardEvent, GuardFileFilter, ScanRequest};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Compliance gate for registered identifiers.
///
/// Scans source files for bare identifiers and flags any that are missing
/// from, or tampered in, the `beian.json` registry.
#[derive(Parser)]
#[command(name = "beian-guard", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// Root directory of the workspace to verify.
    ///
    /// Defaults to the current directory if not specified.
    #[arg(short, long, global = true, env = "BEIAN_GUARD_PATH")]
    path: Option<Utf8PathBuf>,

    /// Path to the tool configuration file.
    ///
    /// Defaults to `beian-guard.json` under the root, if present.
    #[arg(short, long, global = true, env = "BEIAN_GUARD_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Relative registry path, overriding the configured one.
    #[arg(short, long, global = true, env = "BEIAN_GUARD_REGISTRY")]
    registry: Option<Utf8PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Scan all source files and display findings.
    Scan {
        /// Also list compliant files.
        #[arg(short, long)]
        detailed: bool,

        /// Emit findings as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Register an identifier in the governing registry.
    Register {
        /// The identifier spelling to register.
        identifier: String,

        /// The document the registration is invoked from.
        ///
        /// Determines which registry file receives the entry.
        #[arg(short, long)]
        document: Utf8PathBuf,
    },

    /// Verify all documents and decide whether an action may proceed.
    Gate {
        /// The intercepted action being gated.
        #[arg(short, long, value_enum, default_value_t = GateAction::DebugLaunch)]
        action: GateAction,
    },

    /// Watch for file changes and re-scan continuously.
    Watch,
}

/// Host action being gated.
#[derive(Clone, Copy, ValueEnum)]
enum GateAction {
    /// Debug-configuration resolution (can be vetoed before launch).
    DebugLaunch,
    /// Task start (terminated when the gate fails).
    TaskStart,
    /// Document save (warn only; the host cannot veto a save).
    Save,
}

impl From<GateAction> for InterceptedAction {
    fn from(action: GateAction) -> Self {
        match action {
            GateAction::DebugLaunch => Self::DebugLaunch,
            GateAction::TaskStart => Self::TaskStart,
            GateAction::Save => Self::Save,
        }
    }
}

// =============================================================================
// INITIALIZATION
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, or `info` level by default.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!("{level},notify=warn,mio=warn"))
    });

    // Check if colors should be disabled (flag or NO_COLOR env var)
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_ansi(use_ansi))
        .with(filter)
        .init();
}

/// Resolves the workspace root from CLI arguments.
fn resolve_root(cli: &Cli) -> anyhow::Result<Utf8PathBuf> {
    let root = match &cli.path {
        Some(path) => path.clone(),
        None => {
            let cwd = std::env::current_dir().context("cannot determine current directory")?;
            Utf8PathBuf::from_path_buf(cwd)
                .map_err(|p| anyhow::anyhow!("current directory is not UTF-8: {}", p.display()))?
        }
    };

    anyhow::ensure!(root.exists(), "path does not exist: {root}");
    anyhow::ensure!(root.is_dir(), "path is not a directory: {root}");
    Ok(root)
}

/// Loads tool configuration.
///
/// An explicit `--config` path must load successfully; otherwise
/// `beian-guard.json` under the root is used when present, and defaults
/// apply when it is not.
fn load_config(cli: &Cli, root: &Utf8Path) -> anyhow::Result<Config> {
    let mut config = if let Some(path) = &cli.config {
        Config::load(path).with_context(|| format!("failed to load config {path}"))?
    } else {
        let default_path = root.join("beian-guard.json");
        if default_path.exists() {
            Config::load(&default_path)
                .with_context(|| format!("failed to load config {default_path}"))?
        } else {
            Config::default()
        }
    };

    if let Some(registry) = &cli.registry {
        config.guard.config_file_path.clone_from(registry);
    }

    Ok(config)
}

// =============================================================================
// DOCUMENT SET
// =============================================================================

/// Builds the document set: every matching source file under the root.
///
/// Unreadable files are logged and skipped; one bad file must not stop
/// verification of the rest.
fn collect_targets(root: &Utf8Path, config: &Config) -> anyhow::Result<Vec<ScanTarget>> {
    let walker = FileWalker::new(root, &config.scan)?;
    let paths = walker.collect_paths()?;

    let mut targets = Vec::with_capacity(paths.len());
    for path in paths {
        match std::fs::read_to_string(&path) {
            Ok(text) => targets.push(make_target(path, text, root, config)),
            Err(source) => {
                // Recoverable: one bad file must not stop the rest.
                let error = ScanError::read(path, source);
                warn!(%error, "skipping unreadable file");
            }
        }
    }
    Ok(targets)
}

/// Builds one scan target with its governing registry resolved.
fn make_target(path: Utf8PathBuf, text: String, root: &Utf8Path, config: &Config) -> ScanTarget {
    let registry_path =
        RegistryLocator::resolve(&path, Some(root), &config.guard.config_file_path);
    ScanTarget::new(path, text, registry_path)
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Runs a one-shot scan and prints findings.
fn run_scan(root: &Utf8Path, config: &Config, detailed: bool, json: bool) -> anyhow::Result<()> {
    info!(%root, "starting scan");

    let targets = collect_targets(root, config)?;
    let options = ScanOptions::from_config(&config.guard);
    let mut gate = ComplianceGate::new();
    let verdict = gate.verify(&targets, &options);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if json {
        let findings: Vec<_> = targets
            .iter()
            .map(|t| (t.id.to_string(), gate.findings(&t.id)))
            .collect();
        let rendered = serde_json::to_string_pretty(&findings)?;
        writeln!(out, "{rendered}")?;
        return Ok(());
    }

    for target in &targets {
        let findings = gate.findings(&target.id);
        if findings.is_empty() {
            if detailed {
                writeln!(out, "{}: ok", target.id)?;
            }
            continue;
        }
        for finding in findings {
            writeln!(
                out,
                "{}:{}..{}: [{}] {}",
                target.id,
                finding.span.start,
                finding.span.end,
                finding.code(),
                finding.message
            )?;
        }
    }

    writeln!(out)?;
    writeln!(
        out,
        "{} file(s) scanned, {} finding(s) in {} file(s)",
        verdict.per_document.len(),
        verdict.total_findings(),
        verdict.failing_documents()
    )?;

    Ok(())
}

/// Registers an identifier and re-scans the document set.
fn run_register(
    root: &Utf8Path,
    config: &Config,
    identifier: &str,
    document: &Utf8Path,
) -> anyhow::Result<()> {
    let document_id = DocumentId::File(document.to_owned());
    let (entry, registry_path) = RegistryStore::register_for_document(
        &document_id,
        Some(root),
        &config.guard,
        identifier,
    )?;

    info!(name = %entry.name, registry = %registry_path, "identifier registered");

    // Re-scan everything so findings reflect the new registry state.
    let targets = collect_targets(root, config)?;
    let options = ScanOptions::from_config(&config.guard);
    let mut gate = ComplianceGate::new();
    let verdict = gate.verify(&targets, &options);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "registered '{}' in {registry_path}", entry.name)?;
    writeln!(out, "{} finding(s) remain", verdict.total_findings())?;

    Ok(())
}

/// Verifies all documents and renders the gate decision.
///
/// Returns a failure exit code when the action is blocked, so callers
/// wiring this into pre-launch or pre-task hooks can cancel on non-zero.
fn run_gate(root: &Utf8Path, config: &Config, action: GateAction) -> anyhow::Result<ExitCode> {
    let targets = collect_targets(root, config)?;
    let options = ScanOptions::from_config(&config.guard);
    let mut gate = ComplianceGate::new();
    let verdict = gate.verify(&targets, &options);

    match ComplianceGate::decide(action.into(), &verdict, &config.guard) {
        GateDecision::Proceed => {
            info!("compliance gate passed");
            Ok(ExitCode::SUCCESS)
        }
        GateDecision::Block { message } => {
            print_verdict(&verdict)?;
            tracing::error!("{message}");
            Ok(ExitCode::FAILURE)
        }
        GateDecision::Warn { message } => {
            print_verdict(&verdict)?;
            warn!("{message}");
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Prints the failing documents of a verdict.
fn print_verdict(verdict: &Verdict) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for (id, count) in &verdict.per_document {
        if *count > 0 {
            writeln!(out, "{id}: {count} finding(s)")?;
        }
    }
    Ok(())
}

/// Watch-mode filter: source files, the registry, and the config file.
#[derive(Debug, Clone)]
struct WatchFilter {
    inner: GuardFileFilter,
    config_path: Utf8PathBuf,
}

impl WatchFilter {
    fn for_config(config: &Config, config_path: &Utf8Path) -> Self {
        Self {
            inner: GuardFileFilter::new(
                &config.scan.file_extensions,
                config.guard.config_file_path.as_str(),
            ),
            config_path: config_path.to_owned(),
        }
    }

    fn is_config_path(&self, path: &Utf8Path) -> bool {
        path.ends_with(&self.config_path)
    }

    fn is_registry_path(&self, path: &Utf8Path) -> bool {
        self.inner.is_registry_path(path)
    }
}

impl beian_watcher::FileFilter for WatchFilter {
    fn should_process(&self, path: &Utf8Path) -> bool {
        self.inner.should_process(path) || self.is_config_path(path)
    }
}

/// Reloads configuration after a settings-file edit.
///
/// A missing or unreadable file keeps the current settings; the edit may
/// be transient (save-in-progress, deleted file) and a re-scan on the old
/// settings beats dropping the event. The `--registry` override outlives
/// any reload.
fn reload_config(
    config_path: &Utf8Path,
    registry_override: Option<&Utf8Path>,
    current: Config,
) -> Config {
    match Config::load(config_path) {
        Ok(mut loaded) => {
            if let Some(registry) = registry_override {
                loaded.guard.config_file_path = registry.to_owned();
            }
            info!(%config_path, "configuration reloaded");
            loaded
        }
        Err(error) => {
            warn!(%config_path, %error, "config not reloadable, keeping current settings");
            current
        }
    }
}

/// Watches the root and re-scans on changes until interrupted.
///
/// A config-file edit reloads the configuration and rebuilds the scan
/// options and the watch filter before the full re-scan, so no scan ever
/// runs on stale settings.
async fn run_watch(
    root: &Utf8Path,
    mut config: Config,
    config_path: &Utf8Path,
    registry_override: Option<&Utf8Path>,
) -> anyhow::Result<()> {
    info!(%root, "starting watch mode");

    let mut options = ScanOptions::from_config(&config.guard);
    let mut gate = ComplianceGate::new();

    // Initial pass over everything.
    let targets = collect_targets(root, &config)?;
    let verdict = gate.verify(&targets, &options);
    info!(
        files = verdict.per_document.len(),
        findings = verdict.total_findings(),
        "initial scan complete"
    );

    let filter = WatchFilter::for_config(&config, config_path);
    let mut settings_filter = filter.clone();
    let mut watcher = FileWatcher::new(root, &config.watch, filter).await?;
    let (mut coordinator, mut requests) = ChangeCoordinator::new(&config.watch);

    loop {
        tokio::select! {
            Some(event) = watcher.recv() => {
                if settings_filter.is_config_path(&event.path) {
                    // Reload settings first; the flushed re-scan must run
                    // on the new configuration, not the one it replaced.
                    config = reload_config(config_path, registry_override, config);
                    options = ScanOptions::from_config(&config.guard);

                    let filter = WatchFilter::for_config(&config, config_path);
                    settings_filter = filter.clone();
                    let fresh = FileWatcher::new(root, &config.watch, filter).await?;
                    std::mem::replace(&mut watcher, fresh).shutdown().await?;

                    coordinator.handle(GuardEvent::ConfigChanged).await;
                } else if settings_filter.is_registry_path(&event.path) {
                    // Registry edits invalidate every document's findings.
                    coordinator.handle(GuardEvent::ConfigChanged).await;
                } else {
                    coordinator
                        .handle(GuardEvent::DocumentChanged(DocumentId::File(event.path)))
                        .await;
                }
            }
            Some(request) = requests.recv() => {
                execute_request(request, root, &config, &options, &mut gate)?;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                break;
            }
        }
    }

    watcher.shutdown().await?;
    Ok(())
}

/// Executes one coordinator scan request.
fn execute_request(
    request: ScanRequest,
    root: &Utf8Path,
    config: &Config,
    options: &ScanOptions,
    gate: &mut ComplianceGate,
) -> anyhow::Result<()> {
    match request {
        ScanRequest::Document(id) => {
            let Some(path) = id.path() else {
                return Ok(());
            };
            match std::fs::read_to_string(path) {
                Ok(text) => {
                    let target = make_target(path.to_owned(), text, root, config);
                    let count = gate.scan_document(&target, options);
                    info!(document = %target.id, findings = count, "re-scanned");
                }
                Err(_) => {
                    // Deleted or unreadable; its findings are obsolete.
                    gate.remove(&id);
                }
            }
        }
        ScanRequest::AllDocuments => {
            let targets = collect_targets(root, config)?;
            let verdict = gate.verify(&targets, options);
            info!(
                files = verdict.per_document.len(),
                findings = verdict.total_findings(),
                "full re-scan complete"
            );
        }
    }
    Ok(())
}

// =============================================================================
// ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.no_color);

    let root = resolve_root(&cli)?;
    let config = load_config(&cli, &root)?;

    match cli.command {
        Commands::Scan { detailed, json } => {
            run_scan(&root, &config, detailed, json)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Register {
            identifier,
            document,
        } => {
            run_register(&root, &config, &identifier, &document)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Gate { action } => run_gate(&root, &config, action),
        Commands::Watch => {
            let config_path = cli
                .config
                .clone()
                .unwrap_or_else(|| root.join("beian-guard.json"));
            run_watch(&root, config, &config_path, cli.registry.as_deref()).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

//! Pass/fail aggregation across documents and action interception.
//!
//! [`ComplianceGate`] owns the per-document findings table. Each scan
//! replaces a document's finding set wholesale; there is no incremental
//! patching of findings, which avoids an entire class of stale-marker
//! bugs.
//!
//! Interception points (debug launch, task start, save) are external
//! collaborators. The gate only renders a [`GateDecision`] for them: a
//! pre-action hook gets a veto, an already-started action gets a
//! terminate, and save gets a warning only, since the host environment may
//! not allow a save to be vetoed.

use tracing::debug;

use beian_core::{DocumentId, Finding, FxHashMap, GuardConfig, ScanTarget};
use beian_registry::RegistryStore;

use crate::engine::{ScanEngine, ScanOptions};

/// An action a host collaborator asks the gate about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum InterceptedAction {
    /// Debug-configuration resolution; can be vetoed before launch.
    DebugLaunch,

    /// Task start; the task is terminated if the gate fails.
    TaskStart,

    /// Document save; cannot be blocked, only warned about.
    Save,
}

impl InterceptedAction {
    /// Human-readable action name for `{actionName}` substitution.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::DebugLaunch => "Debug Launch",
            Self::TaskStart => "Task Start",
            Self::Save => "Save",
        }
    }

    /// Returns `true` if the action can be stopped by the gate.
    ///
    /// Save happens after the host has already committed to the write, so
    /// the gate can only warn about it.
    #[inline]
    #[must_use]
    pub const fn can_block(self) -> bool {
        !matches!(self, Self::Save)
    }
}

/// What an interception point should do with its action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// All documents compliant; proceed.
    Proceed,

    /// Stop or cancel the action before/as its side effects occur.
    Block {
        /// Rendered stop message naming the blocked action.
        message: String,
    },

    /// The action cannot be stopped; surface a warning instead.
    Warn {
        /// Rendered warning message naming the action.
        message: String,
    },
}

/// Aggregated verdict of one verification pass.
///
/// # Examples
///
/// ```
/// use beian_scanner::Verdict;
///
/// let verdict = Verdict::default();
/// assert!(verdict.passed());
/// assert_eq!(verdict.total_findings(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Verdict {
    /// Finding count per scanned document, in scan order.
    pub per_document: Vec<(DocumentId, usize)>,
}

impl Verdict {
    /// Returns `true` if no scanned document had findings.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.per_document.iter().all(|(_, count)| *count == 0)
    }

    /// Total findings across all scanned documents.
    #[must_use]
    pub fn total_findings(&self) -> usize {
        self.per_document.iter().map(|(_, count)| count).sum()
    }

    /// Number of documents with at least one finding.
    #[must_use]
    pub fn failing_documents(&self) -> usize {
        self.per_document
            .iter()
            .filter(|(_, count)| *count > 0)
            .count()
    }
}

/// Orchestrates scanning across a set of documents and owns the findings
/// table.
///
/// # Examples
///
/// ```
/// use beian_core::{GuardConfig, ScanTarget};
/// use beian_scanner::{ComplianceGate, ScanOptions};
/// use camino::Utf8PathBuf;
///
/// let mut gate = ComplianceGate::new();
/// let target = ScanTarget::new(
///     Utf8PathBuf::from("/ws/src/user.ts"),
///     "class UserAccount {}",
///     Utf8PathBuf::from("/no/such/registry.json"),
/// );
///
/// let verdict = gate.verify(&[target], &ScanOptions::default());
/// assert!(!verdict.passed());
/// ```
#[derive(Debug, Default)]
pub struct ComplianceGate {
    /// Per-document finding sets, replaced wholesale per scan.
    findings: FxHashMap<DocumentId, Vec<Finding>>,
}

impl ComplianceGate {
    /// Creates an empty gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans one document and replaces its finding set.
    ///
    /// The registry is re-read from disk on every call; it is the single
    /// source of truth and may have been edited externally since the last
    /// scan. Returns the new finding count for the document.
    pub fn scan_document(&mut self, target: &ScanTarget, options: &ScanOptions) -> usize {
        let registry = RegistryStore::load(&target.registry_path);
        let findings = ScanEngine::scan_to_vec(target, &registry, options);
        let count = findings.len();
        debug!(document = %target.id, count, "scan complete");
        self.findings.insert(target.id.clone(), findings);
        count
    }

    /// Runs the scan for every target and aggregates a verdict.
    ///
    /// Fails overall if any document has at least one finding. Pure
    /// aggregation; no independent logic beyond the per-document scans.
    pub fn verify(&mut self, targets: &[ScanTarget], options: &ScanOptions) -> Verdict {
        let per_document = targets
            .iter()
            .map(|target| {
                let count = self.scan_document(target, options);
                (target.id.clone(), count)
            })
            .collect();
        Verdict { per_document }
    }

    /// Maps a verdict to the decision an interception point must take.
    ///
    /// A failing verdict blocks actions that offer a pre-action hook and
    /// downgrades to a warning for actions that have already started.
    #[must_use]
    pub fn decide(
        action: InterceptedAction,
        verdict: &Verdict,
        config: &GuardConfig,
    ) -> GateDecision {
        if verdict.passed() {
            return GateDecision::Proceed;
        }

        let message = config.stop_message(action.name());
        if action.can_block() {
            GateDecision::Block { message }
        } else {
            GateDecision::Warn { message }
        }
    }

    /// Returns the current findings for a document.
    #[must_use]
    pub fn findings(&self, id: &DocumentId) -> &[Finding] {
        self.findings.get(id).map_or(&[], Vec::as_slice)
    }

    /// Removes the finding set for a closed document.
    pub fn remove(&mut self, id: &DocumentId) {
        self.findings.remove(id);
    }

    /// Total findings currently held across all documents.
    #[must_use]
    pub fn total_findings(&self) -> usize {
        self.findings.values().map(Vec::len).sum()
    }
}

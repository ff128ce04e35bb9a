//! Identifier scan engine and compliance gate.
//!
//! This crate is the classification core of beian-guard. It tokenizes
//! document text for candidate identifiers, classifies each against the
//! loaded registry, and aggregates per-document findings into a pass/fail
//! verdict for interception points.
//!
//! # Overview
//!
//! - [`ScanEngine`]: single-pass tokenize-and-classify scan producing an
//!   ordered, lazy sequence of [`Finding`](beian_core::Finding)s
//! - [`ComplianceGate`]: owns the per-document findings table and the
//!   verdict for intercepted actions
//! - [`FileWalker`]: directory traversal that builds the document set for
//!   whole-tree verification
//!
//! # Example
//!
//! ```
//! use beian_core::{GuardConfig, Registry, ScanTarget};
//! use beian_scanner::{ScanEngine, ScanOptions};
//! use camino::Utf8PathBuf;
//!
//! let options = ScanOptions::from_config(&GuardConfig::default());
//! let target = ScanTarget::new(
//!     Utf8PathBuf::from("/ws/src/user.ts"),
//!     "class UserAccount { Array x; }",
//!     Utf8PathBuf::from("/ws/.vscode/beian.json"),
//! );
//!
//! let findings = ScanEngine::scan_to_vec(&target, &Registry::default(), &options);
//! assert_eq!(findings.len(), 2); // UserAccount and Array, both unregistered
//! ```
//!
//! # Scanning Never Fails
//!
//! The engine has no failure mode by design: it runs on arbitrary text
//! without erroring. [`ScanError`] exists only for the walker's directory
//! traversal and file reads, which feed the document set, not the scan
//! itself.

#![deny(clippy::all)]
#![warn(missing_docs)]

mod engine;
mod error;
mod gate;
mod walker;

pub use engine::{Findings, ScanEngine, ScanOptions};
pub use error::ScanError;
pub use gate::{ComplianceGate, GateDecision, InterceptedAction, Verdict};
pub use walker::FileWalker;

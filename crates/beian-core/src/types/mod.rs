//! Domain types for the beian-guard tool.
//!
//! This module contains the core domain types used throughout the
//! application for representing registries, findings, and documents.
//!
//! # Module Organization
//!
//! - [`document`] - Document identity and scan targets
//! - [`entry`] - Registry entries and the registry collection
//! - [`finding`] - Compliance findings and source spans
//!
//! All public types are re-exported at this module level and at the crate
//! root:
//!
//! ```
//! use beian_core::{Finding, FindingKind, Registry, RegistryEntry};
//! ```

mod document;
mod entry;
mod finding;

pub use document::{DocumentId, ScanTarget};
pub use entry::{Registry, RegistryEntry};
pub use finding::{Finding, FindingKind, SourceSpan};

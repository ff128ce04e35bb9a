//! Core types, errors, and utilities for the beian-guard tool.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - Error types for consistent error handling
//! - Configuration structures with serde defaults
//! - Domain types (`Registry`, `RegistryEntry`, `Finding`, `DocumentId`)
//! - Content fingerprinting for tamper detection
//! - Type aliases for `FxHashMap`/`FxHashSet` (faster than std)

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod fingerprint;
pub mod hash;
pub mod types;

pub use config::{Config, GuardConfig, IdentifierPattern, ScanConfig, WatchConfig};
pub use error::ConfigError;
pub use fingerprint::fingerprint;
pub use hash::{FxHashMap, FxHashSet};
pub use types::{DocumentId, Finding, FindingKind, Registry, RegistryEntry, ScanTarget, SourceSpan};

//! Registry location, tolerant loading, and registration.
//!
//! This crate owns everything about the on-disk registry file:
//!
//! - [`RegistryLocator`]: resolves which registry file governs a document,
//!   using a workspace-root-first / sibling-fallback rule
//! - [`RegistryStore`]: loads registry state tolerating corruption, and
//!   performs the read-modify-write cycle for registration
//! - [`RegistryError`]: the surfaced failure taxonomy (write failures and
//!   invalid invocations; read corruption is swallowed by design)
//!
//! # Error Asymmetry
//!
//! Loading and writing deliberately handle errors differently. Loads happen
//! continuously as a side effect of passive scanning, so a missing, empty,
//! or corrupt registry degrades to an empty one and never interrupts
//! editing. Writes happen only on the user-initiated registration action,
//! so their failures are surfaced as [`RegistryError`].
//!
//! # Source of Truth
//!
//! Registry content is re-read from disk on every scan; nothing is cached
//! between operations. The file may be edited externally (another process,
//! a version-control revert) and a stale cache would mis-classify
//! identifiers, so the re-read cost is accepted.

#![deny(clippy::all)]
#![warn(missing_docs)]

mod error;
mod locator;
mod store;

pub use error::RegistryError;
pub use locator::RegistryLocator;
pub use store::RegistryStore;

//! Debounced re-scan coordination and file watching.
//!
//! This crate keeps findings consistent as documents, the registry, and
//! configuration change asynchronously. It has two halves:
//!
//! - [`ChangeCoordinator`]: the per-document debounce state machine. Text
//!   edits schedule a re-scan after a debounce window, with
//!   cancel-and-replace semantics; saves, opens, activations, and config
//!   changes bypass the debounce entirely.
//! - [`FileWatcher`]: bridges the synchronous `notify` debouncer to the
//!   tokio runtime, feeding filesystem changes into the coordinator for
//!   watch mode.
//!
//! # Event Flow
//!
//! ```text
//! host events ──► GuardEvent ──► ChangeCoordinator ──► ScanRequest ──► scan loop
//!                                      │
//! filesystem ──► notify ──► FileEvent ─┘
//! ```
//!
//! All scan requests funnel through one mpsc channel consumed
//! sequentially, so no two scans for the same document ever run
//! concurrently.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod coordinator;
pub mod error;
pub mod events;
pub mod filter;
pub mod watcher;

pub use coordinator::ChangeCoordinator;
pub use error::WatchError;
pub use events::{FileEvent, GuardEvent, ScanRequest};
pub use filter::{AcceptAllFilter, FileFilter, GuardFileFilter};
pub use watcher::FileWatcher;

//! The per-document debounce state machine.
//!
//! Each open document is either `Idle` or `PendingScan`. A text change
//! moves it to `PendingScan` by spawning a timer task; a second change
//! while pending aborts the old task and spawns a fresh one
//! (cancel-and-replace, never queue both). Saves, opens, activations, and
//! config changes bypass the debounce and emit immediately, cancelling any
//! pending timer so a stale debounced scan cannot fire afterwards.
//!
//! The coordinator only ever emits [`ScanRequest`]s; executing them is the
//! consumer's job. Because the consumer drains the channel sequentially,
//! at most one scan runs at a time, which trivially satisfies the
//! per-document exclusivity requirement.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use beian_core::{DocumentId, FxHashMap, WatchConfig};

use crate::events::{GuardEvent, ScanRequest};

/// Default capacity of the scan-request channel.
const REQUEST_CHANNEL_CAPACITY: usize = 64;

/// Debounces and schedules re-scans in response to document, registry, and
/// configuration changes.
///
/// # Examples
///
/// ```
/// use beian_core::{DocumentId, WatchConfig};
/// use beian_watcher::{ChangeCoordinator, GuardEvent, ScanRequest};
/// use camino::Utf8PathBuf;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let (mut coordinator, mut requests) = ChangeCoordinator::new(&WatchConfig::default());
///
/// let doc = DocumentId::File(Utf8PathBuf::from("src/user.ts"));
/// coordinator.handle(GuardEvent::DocumentSaved(doc.clone())).await;
///
/// assert_eq!(requests.recv().await, Some(ScanRequest::Document(doc)));
/// # }
/// ```
#[derive(Debug)]
pub struct ChangeCoordinator {
    /// Debounce window for text changes.
    debounce: Duration,

    /// Pending debounce timers, one at most per document.
    ///
    /// Presence in this map is the `PendingScan` state.
    pending: FxHashMap<DocumentId, JoinHandle<()>>,

    /// Where emitted scan requests go.
    request_tx: mpsc::Sender<ScanRequest>,
}

impl ChangeCoordinator {
    /// Creates a coordinator and the request channel its consumer reads.
    #[must_use]
    pub fn new(config: &WatchConfig) -> (Self, mpsc::Receiver<ScanRequest>) {
        let (request_tx, request_rx) = mpsc::channel(REQUEST_CHANNEL_CAPACITY);
        (
            Self {
                debounce: Duration::from_millis(config.debounce_ms),
                pending: FxHashMap::default(),
                request_tx,
            },
            request_rx,
        )
    }

    /// Routes one guard event through the state machine.
    pub async fn handle(&mut self, event: GuardEvent) {
        match event {
            GuardEvent::DocumentChanged(id) => self.schedule_debounced(id),
            GuardEvent::DocumentSaved(id)
            | GuardEvent::DocumentOpened(id)
            | GuardEvent::DocumentActivated(id) => self.scan_now(id).await,
            GuardEvent::ConfigChanged => self.flush_all().await,
            GuardEvent::ActionIntercepted(action) => {
                debug!(action, "action intercepted, requesting full verification");
                self.flush_all().await;
            }
        }
    }

    /// Schedules a debounced scan for a document, superseding any pending
    /// one.
    pub fn schedule_debounced(&mut self, id: DocumentId) {
        // Cancel-and-replace: a new edit always supersedes, never queues.
        if let Some(handle) = self.pending.remove(&id) {
            handle.abort();
        }

        let tx = self.request_tx.clone();
        let delay = self.debounce;
        let request_id = id.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(ScanRequest::Document(request_id)).await.is_err() {
                warn!("scan-request channel closed, dropping debounced scan");
            }
        });

        self.pending.insert(id, handle);
    }

    /// Requests an immediate scan for a document, bypassing the debounce.
    ///
    /// Any pending debounced scan for the document is cancelled first so
    /// it cannot fire after the immediate one.
    pub async fn scan_now(&mut self, id: DocumentId) {
        if let Some(handle) = self.pending.remove(&id) {
            handle.abort();
        }
        if self.request_tx.send(ScanRequest::Document(id)).await.is_err() {
            warn!("scan-request channel closed, dropping immediate scan");
        }
    }

    /// Cancels every pending timer and requests a full re-scan.
    ///
    /// Used on configuration and registry changes: cancelling first
    /// guarantees no scan scheduled under the old settings can still fire.
    pub async fn flush_all(&mut self) {
        for (_, handle) in self.pending.drain() {
            handle.abort();
        }
        if self.request_tx.send(ScanRequest::AllDocuments).await.is_err() {
            warn!("scan-request channel closed, dropping full re-scan");
        }
    }

    /// Returns `true` if the document is in the `PendingScan` state.
    #[must_use]
    pub fn is_pending(&self, id: &DocumentId) -> bool {
        self.pending.get(id).is_some_and(|handle| !handle.is_finished())
    }
}

//! Bridging the synchronous notify debouncer to the tokio runtime.
//!
//! The `notify` debouncer runs on a blocking thread via `spawn_blocking`;
//! filtered events cross into async land over a bounded mpsc channel.
//!
//! ```text
//! blocking thread: notify -> debouncer -> filter -> blocking_send
//!                                                        │
//! async runtime:   FileWatcher::recv() <── mpsc channel ──┘
//! ```

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use notify::RecursiveMode;
use notify_debouncer_mini::{DebounceEventResult, Debouncer, new_debouncer};
use smallvec::SmallVec;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use beian_core::WatchConfig;

use crate::error::WatchError;
use crate::events::FileEvent;
use crate::filter::FileFilter;

/// Default channel capacity for file events.
const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// A file watcher that streams debounced change events to an async context.
///
/// # Lifecycle
///
/// 1. [`FileWatcher::new`] validates the path and spawns the blocking
///    notify task.
/// 2. [`recv`](Self::recv) yields filtered events.
/// 3. [`shutdown`](Self::shutdown) stops the task gracefully; dropping the
///    watcher sends the shutdown signal without awaiting.
///
/// # Examples
///
/// ```no_run
/// use beian_core::WatchConfig;
/// use beian_watcher::{AcceptAllFilter, FileWatcher};
/// use camino::Utf8Path;
///
/// # async fn example() -> Result<(), beian_watcher::WatchError> {
/// let mut watcher = FileWatcher::new(
///     Utf8Path::new("./src"),
///     &WatchConfig::default(),
///     AcceptAllFilter,
/// ).await?;
///
/// while let Some(event) = watcher.recv().await {
///     println!("changed: {}", event.path);
/// }
/// # Ok(())
/// # }
/// ```
pub struct FileWatcher {
    /// Shutdown signal sender; `None` once shutdown has been initiated.
    shutdown_tx: Option<oneshot::Sender<()>>,

    /// Handle to the blocking watcher task.
    task_handle: Option<JoinHandle<Result<(), WatchError>>>,

    /// Event receiver for async consumption.
    event_rx: mpsc::Receiver<FileEvent>,

    /// The path being watched.
    watch_path: Utf8PathBuf,
}

impl std::fmt::Debug for FileWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWatcher")
            .field("watch_path", &self.watch_path)
            .field("is_running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl FileWatcher {
    /// Creates a new file watcher for the specified path.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::PathNotFound`] if the path doesn't exist and
    /// [`WatchError::Notify`] if the watcher fails to initialize.
    #[allow(clippy::unused_async)] // Async for API consistency with shutdown()
    pub async fn new<F: FileFilter>(
        path: &Utf8Path,
        config: &WatchConfig,
        filter: F,
    ) -> Result<Self, WatchError> {
        if !path.exists() {
            return Err(WatchError::path_not_found(path));
        }

        let watch_path = path.canonicalize_utf8().map_err(WatchError::Io)?;

        let (event_tx, event_rx) = mpsc::channel(DEFAULT_CHANNEL_CAPACITY);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let task_path = watch_path.clone();
        let debounce_ms = config.debounce_ms;
        let recursive = config.recursive;

        let task_handle = tokio::task::spawn_blocking(move || {
            run_watcher_loop(
                task_path,
                debounce_ms,
                recursive,
                event_tx,
                shutdown_rx,
                filter,
            )
        });

        Ok(Self {
            shutdown_tx: Some(shutdown_tx),
            task_handle: Some(task_handle),
            event_rx,
            watch_path,
        })
    }

    /// Receives the next file event asynchronously.
    ///
    /// Returns `None` when the watcher has been shut down.
    pub async fn recv(&mut self) -> Option<FileEvent> {
        self.event_rx.recv().await
    }

    /// Tries to receive a file event without blocking.
    pub fn try_recv(&mut self) -> Result<FileEvent, mpsc::error::TryRecvError> {
        self.event_rx.try_recv()
    }

    /// Returns the path being watched.
    #[must_use]
    pub fn watch_path(&self) -> &Utf8Path {
        &self.watch_path
    }

    /// Returns `true` if the watcher is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.shutdown_tx.is_some() && self.task_handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Gracefully shuts down the watcher and awaits the blocking task.
    ///
    /// # Errors
    ///
    /// Returns any error the watcher thread ended with.
    pub async fn shutdown(mut self) -> Result<(), WatchError> {
        if let Some(tx) = self.shutdown_tx.take() {
            // Ignore error if receiver is already dropped
            let _ = tx.send(());
        }

        if let Some(handle) = self.task_handle.take() {
            match handle.await {
                Ok(result) => result?,
                Err(_join_error) => return Err(WatchError::ChannelClosed),
            }
        }

        Ok(())
    }
}

impl Drop for FileWatcher {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        // Drop is sync; the task stops when it sees the signal.
    }
}

/// Runs the notify debouncer loop in a blocking context.
#[allow(clippy::needless_pass_by_value)] // Path must be owned for the blocking task lifetime
fn run_watcher_loop<F: FileFilter>(
    path: Utf8PathBuf,
    debounce_ms: u64,
    recursive: bool,
    event_tx: mpsc::Sender<FileEvent>,
    shutdown_rx: oneshot::Receiver<()>,
    filter: F,
) -> Result<(), WatchError> {
    let timeout = Duration::from_millis(debounce_ms);

    let tx = event_tx;
    let debouncer_result: Result<Debouncer<notify::RecommendedWatcher>, notify::Error> =
        new_debouncer(timeout, move |res: DebounceEventResult| {
            match res {
                Ok(events) => {
                    // Collect the filtered batch first; small batches stay
                    // on the stack.
                    let batch: SmallVec<[FileEvent; 8]> = events
                        .into_iter()
                        .filter_map(|event| match Utf8PathBuf::try_from(event.path) {
                            Ok(path) if filter.should_process(&path) => {
                                Some(FileEvent::new(path))
                            }
                            Ok(path) => {
                                tracing::trace!(%path, "filtered out file event");
                                None
                            }
                            Err(e) => {
                                tracing::warn!(
                                    path = %e.as_path().display(),
                                    "skipping non-UTF-8 path in file event"
                                );
                                None
                            }
                        })
                        .collect();

                    for file_event in batch {
                        if tx.blocking_send(file_event).is_err() {
                            tracing::debug!("event channel closed, stopping watcher");
                            break;
                        }
                    }
                }
                Err(error) => {
                    tracing::warn!(%error, "debouncer error");
                }
            }
        });

    let mut debouncer = debouncer_result?;

    let mode = if recursive {
        RecursiveMode::Recursive
    } else {
        RecursiveMode::NonRecursive
    };
    debouncer.watcher().watch(path.as_std_path(), mode)?;

    tracing::info!(%path, recursive, "file watcher started");

    // Block until the shutdown signal arrives.
    let _ = shutdown_rx.blocking_recv();

    tracing::info!(%path, "file watcher stopped");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::AcceptAllFilter;

    #[tokio::test]
    async fn test_watcher_creation_and_shutdown() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = Utf8Path::from_path(temp_dir.path()).unwrap();

        let watcher = FileWatcher::new(path, &WatchConfig::default(), AcceptAllFilter)
            .await
            .unwrap();
        assert!(watcher.is_running());
        watcher.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_watcher_path_not_found() {
        let result = FileWatcher::new(
            Utf8Path::new("/nonexistent/path/that/does/not/exist"),
            &WatchConfig::default(),
            AcceptAllFilter,
        )
        .await;
        assert!(matches!(result, Err(WatchError::PathNotFound(_))));
    }

    #[tokio::test]
    async fn test_watcher_receives_events() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = Utf8Path::from_path(temp_dir.path()).unwrap();

        let config = WatchConfig {
            debounce_ms: 50,
            recursive: true,
        };
        let mut watcher = FileWatcher::new(path, &config, AcceptAllFilter)
            .await
            .unwrap();

        std::fs::write(temp_dir.path().join("test.ts"), "class A {}").unwrap();

        let event = tokio::time::timeout(Duration::from_secs(2), watcher.recv()).await;
        watcher.shutdown().await.unwrap();

        // Timing-dependent in CI; only assert on the path when we got one.
        if let Ok(Some(event)) = event {
            assert!(event.path.as_str().contains("test.ts"));
        }
    }
}

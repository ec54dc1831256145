//! Periodic refresh of the thread directory.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::api::ChatApi;
use crate::events::{ChatEvent, ChatOp};
use crate::poll::PollTimer;
use crate::state::{ChatStore, lock};

#[derive(Debug, Clone)]
struct DirectoryWorker {
    api: ChatApi,
    store: Arc<ChatStore>,
    page_size: u32,
}

impl DirectoryWorker {
    async fn refresh(&self, silent: bool) {
        let seq = self.store.begin_directory_fetch(silent);
        match self.api.list_threads(self.page_size).await {
            Ok(response) => self.store.apply_directory(seq, response),
            Err(err) => {
                tracing::warn!(error = %err, "thread directory refresh failed");
                self.store.directory_fetch_failed();
                self.store.emit(ChatEvent::OperationFailed {
                    op: ChatOp::DirectoryRefresh,
                    message: err.to_string(),
                });
            }
        }
    }
}

/// Keeps the thread directory current: one eager refresh on start, then a
/// fixed-interval background loop until shutdown. On failure the last-known
/// good list is retained and the next tick retries.
#[derive(Debug)]
pub struct DirectoryPoller {
    worker: DirectoryWorker,
    interval: Duration,
    timer: Mutex<Option<PollTimer>>,
}

impl DirectoryPoller {
    #[must_use]
    pub fn new(api: ChatApi, store: Arc<ChatStore>, interval: Duration, page_size: u32) -> Self {
        Self {
            worker: DirectoryWorker {
                api,
                store,
                page_size,
            },
            interval,
            timer: Mutex::new(None),
        }
    }

    /// Starts the polling loop. Idempotent: a second call while the loop is
    /// running does nothing, so two directory timers can never coexist.
    pub fn start(&self) {
        let mut guard = lock(&self.timer);
        if guard.is_some() {
            return;
        }

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let worker = self.worker.clone();
        let interval = self.interval;
        let handle = tokio::spawn(async move {
            worker.refresh(false).await;
            loop {
                tokio::select! {
                    () = cancelled.cancelled() => break,
                    () = tokio::time::sleep(interval) => worker.refresh(true).await,
                }
            }
        });
        *guard = Some(PollTimer::new(token, handle));
    }

    /// Cancels the polling loop. Safe to call repeatedly.
    pub fn shutdown(&self) {
        if let Some(timer) = lock(&self.timer).take() {
            timer.cancel();
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        lock(&self.timer).is_some()
    }

    /// One immediate refresh. `silent` suppresses the loading indicator so
    /// background refreshes do not flicker the UI. Because each loop tick
    /// awaits its refresh before sleeping, a tick never overlaps its own
    /// in-flight request; overlap across callers is resolved by sequence
    /// fencing in the store.
    pub async fn refresh(&self, silent: bool) {
        self.worker.refresh(silent).await;
    }
}

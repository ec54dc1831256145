//! Polling of the currently open room.
//!
//! The poller is a small state machine: Idle (no room, no timer), Loading
//! (room just selected, indicator shown), Polling (background refreshes on a
//! fixed interval). Selecting a room always cancels the previous timer
//! before the new room's initial fetch, and switches are serialized, so two
//! room timers can never run concurrently.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::api::{ChatApi, TransportError};
use crate::events::{ChatEvent, ChatOp};
use crate::poll::PollTimer;
use crate::state::{ChatStore, lock};

#[derive(Debug, Clone)]
struct RoomWorker {
    api: ChatApi,
    store: Arc<ChatStore>,
    page_size: u32,
}

impl RoomWorker {
    async fn fetch(&self, room: &str, epoch: u64, silent: bool) -> Result<(), TransportError> {
        let seq = self.store.begin_room_fetch(epoch, silent);
        match self.api.fetch_thread(room, self.page_size).await {
            Ok(response) => {
                self.store.apply_room(epoch, seq, response);
                Ok(())
            }
            Err(err) => {
                self.store.room_fetch_failed(epoch);
                Err(err)
            }
        }
    }
}

/// Drives the message list of the open room.
#[derive(Debug)]
pub struct RoomPoller {
    worker: RoomWorker,
    interval: Duration,
    timer: Mutex<Option<PollTimer>>,
    switch: tokio::sync::Mutex<()>,
}

impl RoomPoller {
    #[must_use]
    pub fn new(api: ChatApi, store: Arc<ChatStore>, interval: Duration, page_size: u32) -> Self {
        Self {
            worker: RoomWorker {
                api,
                store,
                page_size,
            },
            interval,
            timer: Mutex::new(None),
            switch: tokio::sync::Mutex::new(()),
        }
    }

    /// Selects `room` (or deselects with `None`).
    ///
    /// The previous timer is cancelled before anything else happens. For a
    /// new room the initial fetch runs with the loading indicator shown; on
    /// success the background loop starts, on failure the poller returns to
    /// Idle with the error surfaced. Fetches that were already in flight for
    /// the previous room resolve against a stale epoch and are discarded.
    ///
    /// # Errors
    /// Returns the transport error of a failed initial fetch. Deselecting
    /// never fails.
    pub async fn set_active_room(&self, room: Option<String>) -> Result<(), TransportError> {
        let _switching = self.switch.lock().await;

        self.stop_timer();
        let store = &self.worker.store;
        let Some(room) = room else {
            if store.active_room().is_some() {
                store.close_room();
                store.emit(ChatEvent::RoomClosed);
            }
            return Ok(());
        };

        let epoch = store.open_room(&room);
        match self.worker.fetch(&room, epoch, false).await {
            Ok(()) => {
                self.spawn_timer(room.clone(), epoch);
                store.emit(ChatEvent::RoomOpened { room });
                Ok(())
            }
            Err(err) => {
                store.close_room_if_epoch(epoch);
                store.emit(ChatEvent::OperationFailed {
                    op: ChatOp::RoomRefresh,
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// One immediate refresh of the open room; a no-op while Idle. Errors are
    /// surfaced as events and the last-known-good list is retained.
    pub async fn refresh(&self, silent: bool) {
        let Some((room, epoch)) = self.worker.store.active_room_epoch() else {
            return;
        };
        if let Err(err) = self.worker.fetch(&room, epoch, silent).await {
            tracing::warn!(error = %err, room = %room, "room refresh failed");
            self.worker.store.emit(ChatEvent::OperationFailed {
                op: ChatOp::RoomRefresh,
                message: err.to_string(),
            });
        }
    }

    /// Cancels the timer and drops room state without any network traffic.
    /// Used on console teardown.
    pub fn shutdown(&self) {
        self.stop_timer();
        self.worker.store.close_room();
    }

    #[must_use]
    pub fn is_polling(&self) -> bool {
        lock(&self.timer).is_some()
    }

    fn spawn_timer(&self, room: String, epoch: u64) {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let worker = self.worker.clone();
        let interval = self.interval;
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    () = cancelled.cancelled() => break,
                    () = tokio::time::sleep(interval) => {
                        if let Err(err) = worker.fetch(&room, epoch, true).await {
                            tracing::warn!(error = %err, room = %room, "background room refresh failed");
                            worker.store.emit(ChatEvent::OperationFailed {
                                op: ChatOp::RoomRefresh,
                                message: err.to_string(),
                            });
                        }
                    }
                }
            }
        });
        *lock(&self.timer) = Some(PollTimer::new(token, handle));
    }

    fn stop_timer(&self) {
        if let Some(timer) = lock(&self.timer).take() {
            timer.cancel();
        }
    }
}

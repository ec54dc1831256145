//! In-memory chat state shared between the pollers, the composer, and the
//! moderation surface.
//!
//! The thread list and the active-room message list are each owned by their
//! poller and replaced wholesale on refresh. Every fetch carries a dispatch
//! sequence number and the active room additionally an epoch; a response is
//! discarded when either guard says fresher data has already been applied,
//! so late arrivals can never overwrite newer state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use shared::models::{
    ChatMessage, DirectorySummary, Participant, ThreadListResponse, ThreadResponse, ThreadStats,
    ThreadSummary,
};
use tokio::sync::broadcast;

use crate::events::ChatEvent;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Locks without poison propagation: state writes are short, synchronous,
/// and never panic mid-update.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
struct DirectoryState {
    threads: Vec<ThreadSummary>,
    summary: Option<DirectorySummary>,
    loading: bool,
    last_refreshed: Option<DateTime<Utc>>,
    applied_seq: u64,
}

#[derive(Debug)]
struct RoomState {
    room: String,
    epoch: u64,
    messages: Vec<ChatMessage>,
    participants: Vec<Participant>,
    stats: Option<ThreadStats>,
    loading: bool,
    applied_seq: u64,
}

/// Shared console state plus the event fan-out channel.
#[derive(Debug)]
pub struct ChatStore {
    directory: Mutex<DirectoryState>,
    room: Mutex<Option<RoomState>>,
    directory_seq: AtomicU64,
    room_seq: AtomicU64,
    epoch: AtomicU64,
    events: broadcast::Sender<ChatEvent>,
}

impl Default for ChatStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatStore {
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            directory: Mutex::new(DirectoryState::default()),
            room: Mutex::new(None),
            directory_seq: AtomicU64::new(0),
            room_seq: AtomicU64::new(0),
            epoch: AtomicU64::new(0),
            events,
        }
    }

    /// Subscribes to state-change notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.events.subscribe()
    }

    pub(crate) fn emit(&self, event: ChatEvent) {
        // Send errs only when nobody is subscribed.
        let _ = self.events.send(event);
    }

    // --- thread directory ---

    pub(crate) fn begin_directory_fetch(&self, silent: bool) -> u64 {
        if !silent {
            lock(&self.directory).loading = true;
        }
        self.directory_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn apply_directory(&self, seq: u64, response: ThreadListResponse) {
        let mut directory = lock(&self.directory);
        directory.loading = false;
        if seq < directory.applied_seq {
            tracing::debug!(seq, applied = directory.applied_seq, "stale directory response discarded");
            return;
        }
        directory.applied_seq = seq;
        let changed =
            directory.threads != response.data || directory.summary != response.summary;
        directory.threads = response.data;
        directory.summary = response.summary;
        directory.last_refreshed = Some(Utc::now());
        let total = directory.threads.len();
        drop(directory);
        // An identical replace is invisible: no notification goes out.
        if changed {
            self.emit(ChatEvent::ThreadsRefreshed { total });
        }
    }

    pub(crate) fn directory_fetch_failed(&self) {
        lock(&self.directory).loading = false;
    }

    // --- active room ---

    /// Installs a fresh room state and returns its epoch. Any state of a
    /// previously open room is dropped.
    pub(crate) fn open_room(&self, room: &str) -> u64 {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        *lock(&self.room) = Some(RoomState {
            room: room.to_string(),
            epoch,
            messages: Vec::new(),
            participants: Vec::new(),
            stats: None,
            loading: true,
            applied_seq: 0,
        });
        epoch
    }

    pub(crate) fn close_room(&self) {
        *lock(&self.room) = None;
    }

    /// Clears the room state only if it still belongs to `epoch`, so a failed
    /// initial fetch cannot tear down a room the user has since re-opened.
    pub(crate) fn close_room_if_epoch(&self, epoch: u64) {
        let mut guard = lock(&self.room);
        if guard.as_ref().is_some_and(|state| state.epoch == epoch) {
            *guard = None;
        }
    }

    pub(crate) fn begin_room_fetch(&self, epoch: u64, silent: bool) -> u64 {
        if !silent
            && let Some(state) = lock(&self.room).as_mut()
            && state.epoch == epoch
        {
            state.loading = true;
        }
        self.room_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Applies one room fetch. The server sends most-recent-first; the list
    /// is re-ordered ascending by id before the wholesale replace.
    pub(crate) fn apply_room(&self, epoch: u64, seq: u64, mut response: ThreadResponse) {
        let mut guard = lock(&self.room);
        let Some(state) = guard.as_mut() else {
            return;
        };
        if state.epoch != epoch {
            tracing::debug!(epoch, current = state.epoch, "response for inactive room discarded");
            return;
        }
        state.loading = false;
        if seq < state.applied_seq {
            tracing::debug!(seq, applied = state.applied_seq, "stale room response discarded");
            return;
        }
        state.applied_seq = seq;
        response.data.sort_by_key(|message| message.id);
        let changed = state.messages != response.data
            || state.participants != response.participants
            || state.stats != response.summary;
        state.messages = response.data;
        state.participants = response.participants;
        state.stats = response.summary;
        let event = ChatEvent::MessagesRefreshed {
            room: state.room.clone(),
            total: state.messages.len(),
        };
        drop(guard);
        if changed {
            self.emit(event);
        }
    }

    pub(crate) fn room_fetch_failed(&self, epoch: u64) {
        if let Some(state) = lock(&self.room).as_mut()
            && state.epoch == epoch
        {
            state.loading = false;
        }
    }

    // --- optimistic moderation support ---

    /// Removes a message from the open room ahead of server confirmation.
    /// Returns what is needed to roll the removal back.
    pub(crate) fn remove_message(&self, id: i64) -> Option<(u64, usize, ChatMessage)> {
        let mut guard = lock(&self.room);
        let state = guard.as_mut()?;
        let index = state.messages.iter().position(|message| message.id == id)?;
        let message = state.messages.remove(index);
        Some((state.epoch, index, message))
    }

    /// Rolls back an optimistic removal, provided the same room is still open.
    pub(crate) fn restore_message(&self, epoch: u64, index: usize, message: ChatMessage) {
        if let Some(state) = lock(&self.room).as_mut()
            && state.epoch == epoch
        {
            let at = index.min(state.messages.len());
            state.messages.insert(at, message);
        }
    }

    // --- snapshots ---

    #[must_use]
    pub fn threads(&self) -> Vec<ThreadSummary> {
        lock(&self.directory).threads.clone()
    }

    #[must_use]
    pub fn directory_summary(&self) -> Option<DirectorySummary> {
        lock(&self.directory).summary
    }

    #[must_use]
    pub fn directory_loading(&self) -> bool {
        lock(&self.directory).loading
    }

    /// When the directory was last replaced. Diagnostics only.
    #[must_use]
    pub fn last_directory_refresh(&self) -> Option<DateTime<Utc>> {
        lock(&self.directory).last_refreshed
    }

    #[must_use]
    pub fn active_room(&self) -> Option<String> {
        lock(&self.room).as_ref().map(|state| state.room.clone())
    }

    pub(crate) fn active_room_epoch(&self) -> Option<(String, u64)> {
        lock(&self.room)
            .as_ref()
            .map(|state| (state.room.clone(), state.epoch))
    }

    #[must_use]
    pub fn messages(&self) -> Vec<ChatMessage> {
        lock(&self.room)
            .as_ref()
            .map(|state| state.messages.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn participants(&self) -> Vec<Participant> {
        lock(&self.room)
            .as_ref()
            .map(|state| state.participants.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn thread_stats(&self) -> Option<ThreadStats> {
        lock(&self.room).as_ref().and_then(|state| state.stats)
    }

    #[must_use]
    pub fn room_loading(&self) -> bool {
        lock(&self.room).as_ref().is_some_and(|state| state.loading)
    }
}

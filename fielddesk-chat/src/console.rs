//! Wiring of the chat module: pollers, composer, moderation, and state
//! behind one owned handle.

use std::sync::Arc;
use std::time::Duration;

use shared::config::{ChatConfig, Config};
use shared::models::{
    Capabilities, ChatMessage, DirectorySummary, OperatorSession, Participant, ThreadStats,
    ThreadSummary,
};
use tokio::sync::broadcast;

use crate::api::{ChatApi, TransportError};
use crate::composer::MessageComposer;
use crate::directory::DirectoryPoller;
use crate::events::ChatEvent;
use crate::moderation::Moderator;
use crate::room::RoomPoller;
use crate::state::ChatStore;
use crate::view::{self, RenderedMessage};

/// Poll cadence and page limits, decoupled from the config file so tests and
/// embedders can use sub-second intervals.
#[derive(Debug, Clone, Copy)]
pub struct ChatSettings {
    pub directory_interval: Duration,
    pub room_interval: Duration,
    pub directory_page_size: u32,
    pub room_page_size: u32,
}

impl From<&ChatConfig> for ChatSettings {
    fn from(config: &ChatConfig) -> Self {
        Self {
            directory_interval: Duration::from_secs(config.directory_poll_secs),
            room_interval: Duration::from_secs(config.thread_poll_secs),
            directory_page_size: config.directory_page_size,
            room_page_size: config.thread_page_size,
        }
    }
}

/// The administrator chat module.
///
/// Construction injects everything the module depends on (transport,
/// cadence, operator identity, capabilities), so there is no hidden global
/// lookup anywhere below this point.
#[derive(Debug)]
pub struct ChatConsole {
    api: ChatApi,
    store: Arc<ChatStore>,
    directory: Arc<DirectoryPoller>,
    room: Arc<RoomPoller>,
    composer: MessageComposer,
    moderator: Moderator,
    session: OperatorSession,
}

impl ChatConsole {
    #[must_use]
    pub fn new(
        api: ChatApi,
        settings: ChatSettings,
        session: OperatorSession,
        capabilities: Capabilities,
    ) -> Self {
        let store = Arc::new(ChatStore::new());
        let directory = Arc::new(DirectoryPoller::new(
            api.clone(),
            Arc::clone(&store),
            settings.directory_interval,
            settings.directory_page_size,
        ));
        let room = Arc::new(RoomPoller::new(
            api.clone(),
            Arc::clone(&store),
            settings.room_interval,
            settings.room_page_size,
        ));
        let composer = MessageComposer::new(
            api.clone(),
            Arc::clone(&store),
            session.clone(),
            Arc::clone(&directory),
            Arc::clone(&room),
        );
        let moderator = Moderator::new(
            api.clone(),
            Arc::clone(&store),
            capabilities,
            Arc::clone(&directory),
            Arc::clone(&room),
        );

        Self {
            api,
            store,
            directory,
            room,
            composer,
            moderator,
            session,
        }
    }

    /// Builds the module from a resolved configuration.
    ///
    /// # Errors
    /// Returns an error when the configured API base URL does not parse.
    pub fn from_config(config: &Config) -> Result<Self, url::ParseError> {
        let api = ChatApi::from_config(&config.api)?;
        Ok(Self::new(
            api,
            ChatSettings::from(&config.chat),
            config.operator_session(),
            config.capabilities(),
        ))
    }

    /// Starts the directory poller: one eager refresh, then the background
    /// loop. Idempotent.
    pub fn mount(&self) {
        self.directory.start();
    }

    /// Cancels every timer and drops room state. Deterministic teardown for
    /// view unmount and process shutdown.
    pub fn unmount(&self) {
        self.room.shutdown();
        self.directory.shutdown();
    }

    /// Opens `room`: the previous room's timer stops first, then the initial
    /// fetch runs and polling starts.
    ///
    /// # Errors
    /// Returns the transport error of a failed initial fetch; the module is
    /// back at Idle in that case.
    pub async fn open_room(&self, room: &str) -> Result<(), TransportError> {
        self.room.set_active_room(Some(room.to_string())).await
    }

    /// Closes the open room, cancelling its timer.
    pub async fn close_room(&self) {
        // Deselecting issues no fetch and cannot fail.
        let _ = self.room.set_active_room(None).await;
    }

    /// One immediate directory refresh outside the timer cadence.
    pub async fn refresh_threads(&self, silent: bool) {
        self.directory.refresh(silent).await;
    }

    /// One immediate refresh of the open room outside the timer cadence.
    pub async fn refresh_room(&self, silent: bool) {
        self.room.refresh(silent).await;
    }

    /// Subscribes to state-change notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.store.subscribe()
    }

    #[must_use]
    pub fn threads(&self) -> Vec<ThreadSummary> {
        self.store.threads()
    }

    #[must_use]
    pub fn directory_summary(&self) -> Option<DirectorySummary> {
        self.store.directory_summary()
    }

    /// When the directory was last replaced. Diagnostics only.
    #[must_use]
    pub fn last_directory_refresh(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.store.last_directory_refresh()
    }

    #[must_use]
    pub fn active_room(&self) -> Option<String> {
        self.store.active_room()
    }

    #[must_use]
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.store.messages()
    }

    #[must_use]
    pub fn participants(&self) -> Vec<Participant> {
        self.store.participants()
    }

    #[must_use]
    pub fn thread_stats(&self) -> Option<ThreadStats> {
        self.store.thread_stats()
    }

    /// The open room's messages projected into display records.
    #[must_use]
    pub fn rendered_messages(&self) -> Vec<RenderedMessage> {
        view::render_messages(&self.store.messages(), &self.session)
    }

    #[must_use]
    pub fn composer(&self) -> &MessageComposer {
        &self.composer
    }

    #[must_use]
    pub fn moderator(&self) -> &Moderator {
        &self.moderator
    }

    #[must_use]
    pub fn session(&self) -> &OperatorSession {
        &self.session
    }

    /// Resolves an attachment path against the storage prefix.
    #[must_use]
    pub fn attachment_url(&self, path: &str) -> String {
        self.api.attachment_url(path)
    }

    /// Whether the directory poll loop is running.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.directory.is_running()
    }

    /// Whether a room poll loop is running.
    #[must_use]
    pub fn is_polling_room(&self) -> bool {
        self.room.is_polling()
    }
}

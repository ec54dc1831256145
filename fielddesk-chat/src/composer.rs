//! Outgoing message assembly.

use std::sync::{Arc, Mutex};

use shared::models::OperatorSession;

use crate::api::{AttachmentUpload, ChatApi, OutgoingMessage, TransportError};
use crate::directory::DirectoryPoller;
use crate::events::{ChatEvent, ChatOp};
use crate::room::RoomPoller;
use crate::state::{ChatStore, lock};

/// Result of a send attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The message was posted and both pollers were refreshed.
    Sent,
    /// Nothing to send (no room open, or neither text nor attachment staged);
    /// no network request was issued.
    Skipped,
}

#[derive(Debug, Clone, Default)]
struct Draft {
    text: String,
    attachment: Option<AttachmentUpload>,
}

/// Builds and posts messages on behalf of the injected operator identity.
///
/// Text and at most one attachment are staged first; [`send`](Self::send)
/// posts whatever is staged into the open room. The draft is only cleared
/// once the server accepts the message, so a failed send loses nothing.
#[derive(Debug)]
pub struct MessageComposer {
    api: ChatApi,
    store: Arc<ChatStore>,
    session: OperatorSession,
    directory: Arc<DirectoryPoller>,
    room: Arc<RoomPoller>,
    draft: Mutex<Draft>,
}

impl MessageComposer {
    pub(crate) fn new(
        api: ChatApi,
        store: Arc<ChatStore>,
        session: OperatorSession,
        directory: Arc<DirectoryPoller>,
        room: Arc<RoomPoller>,
    ) -> Self {
        Self {
            api,
            store,
            session,
            directory,
            room,
            draft: Mutex::new(Draft::default()),
        }
    }

    pub fn stage_text(&self, text: impl Into<String>) {
        lock(&self.draft).text = text.into();
    }

    #[must_use]
    pub fn staged_text(&self) -> String {
        lock(&self.draft).text.clone()
    }

    /// Stages one attachment, replacing any previously staged one.
    pub fn stage_attachment(&self, upload: AttachmentUpload) {
        lock(&self.draft).attachment = Some(upload);
    }

    #[must_use]
    pub fn staged_attachment(&self) -> Option<AttachmentUpload> {
        lock(&self.draft).attachment.clone()
    }

    pub fn clear(&self) {
        *lock(&self.draft) = Draft::default();
    }

    /// Posts the staged draft into the open room.
    ///
    /// Empty drafts (after trimming) are skipped without a network call. On
    /// success the draft is cleared and both pollers refresh silently, so
    /// the new message and the updated preview appear without waiting for
    /// the next tick. On failure the draft stays staged and the error is
    /// also surfaced as an [`ChatEvent::OperationFailed`] event.
    ///
    /// # Errors
    /// Returns the transport error of a failed post.
    pub async fn send(&self) -> Result<SendOutcome, TransportError> {
        let Some(room) = self.store.active_room() else {
            return Ok(SendOutcome::Skipped);
        };

        let draft = lock(&self.draft).clone();
        let text = draft.text.trim();
        if text.is_empty() && draft.attachment.is_none() {
            return Ok(SendOutcome::Skipped);
        }

        let outgoing = OutgoingMessage {
            room: room.clone(),
            text: (!text.is_empty()).then(|| text.to_string()),
            attachment: draft.attachment,
            sender_id: self.session.id.clone(),
            sender_name: self.session.name.clone(),
            role: self.session.role.clone(),
        };

        match self.api.send_message(outgoing).await {
            Ok(_ack) => {
                self.clear();
                self.store.emit(ChatEvent::MessageSent { room });
                tokio::join!(self.room.refresh(true), self.directory.refresh(true));
                Ok(SendOutcome::Sent)
            }
            Err(err) => {
                tracing::warn!(error = %err, room = %room, "send failed, draft retained");
                self.store.emit(ChatEvent::OperationFailed {
                    op: ChatOp::Send,
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }
}

//! Capability-gated moderation: deleting one message or wiping a thread.
//!
//! Interactive confirmation belongs to the presentation layer; the methods
//! here assume the operator has already confirmed.

use std::sync::Arc;

use shared::models::Capabilities;
use thiserror::Error;

use crate::api::{ChatApi, TransportError};
use crate::directory::DirectoryPoller;
use crate::events::{ChatEvent, ChatOp};
use crate::room::RoomPoller;
use crate::state::ChatStore;

/// Failure of a moderation operation.
#[derive(Debug, Error)]
pub enum ModerationError {
    /// The session's capability set does not allow the operation.
    #[error("operation not permitted for this session")]
    Forbidden,
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Moderation surface bound to one session's capability set.
#[derive(Debug)]
pub struct Moderator {
    api: ChatApi,
    store: Arc<ChatStore>,
    capabilities: Capabilities,
    directory: Arc<DirectoryPoller>,
    room: Arc<RoomPoller>,
}

impl Moderator {
    pub(crate) fn new(
        api: ChatApi,
        store: Arc<ChatStore>,
        capabilities: Capabilities,
        directory: Arc<DirectoryPoller>,
        room: Arc<RoomPoller>,
    ) -> Self {
        Self {
            api,
            store,
            capabilities,
            directory,
            room,
        }
    }

    /// Hard-deletes one message.
    ///
    /// The message is removed from the open room's list ahead of server
    /// confirmation; a failed delete call rolls the removal back at its
    /// original position. A successful delete triggers a silent directory
    /// refresh, since the deleted message may have been a thread preview.
    ///
    /// # Errors
    /// `Forbidden` without the delete capability, otherwise the transport
    /// error of a failed delete call.
    pub async fn delete_message(&self, id: i64) -> Result<(), ModerationError> {
        if !self.capabilities.can_delete {
            return Err(ModerationError::Forbidden);
        }

        let removed = self.store.remove_message(id);
        match self.api.delete_message(id).await {
            Ok(_ack) => {
                self.store.emit(ChatEvent::MessageDeleted { id });
                self.directory.refresh(true).await;
                Ok(())
            }
            Err(err) => {
                if let Some((epoch, index, message)) = removed {
                    self.store.restore_message(epoch, index, message);
                }
                tracing::warn!(error = %err, id, "message delete failed, local removal rolled back");
                self.store.emit(ChatEvent::OperationFailed {
                    op: ChatOp::DeleteMessage,
                    message: err.to_string(),
                });
                Err(err.into())
            }
        }
    }

    /// Deletes every message in `room`.
    ///
    /// On success the active selection is cleared (if it was this room) and
    /// the directory fully refreshes. The room key stays usable afterwards:
    /// a new first message simply recreates the projection.
    ///
    /// # Errors
    /// `Forbidden` without the thread-moderation capability, otherwise the
    /// transport error of a failed delete call.
    pub async fn delete_thread(&self, room: &str) -> Result<(), ModerationError> {
        if !self.capabilities.can_moderate_thread {
            return Err(ModerationError::Forbidden);
        }

        if let Err(err) = self.api.delete_thread(room).await {
            tracing::warn!(error = %err, room = %room, "thread delete failed");
            self.store.emit(ChatEvent::OperationFailed {
                op: ChatOp::DeleteThread,
                message: err.to_string(),
            });
            return Err(err.into());
        }

        self.store.emit(ChatEvent::ThreadWiped {
            room: room.to_string(),
        });
        if self.store.active_room().as_deref() == Some(room) {
            // Deselecting never issues a fetch, so this cannot fail.
            self.room.set_active_room(None).await?;
        }
        self.directory.refresh(false).await;
        Ok(())
    }
}

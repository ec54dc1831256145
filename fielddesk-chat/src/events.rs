//! Notifications fanned out to console subscribers after every state change.

use std::fmt;

/// Operations that can surface a user-facing failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatOp {
    DirectoryRefresh,
    RoomRefresh,
    Send,
    DeleteMessage,
    DeleteThread,
}

impl fmt::Display for ChatOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::DirectoryRefresh => "directory refresh",
            Self::RoomRefresh => "room refresh",
            Self::Send => "send",
            Self::DeleteMessage => "delete message",
            Self::DeleteThread => "delete thread",
        };
        f.write_str(label)
    }
}

/// State-change notification. Network failures never propagate past the chat
/// module boundary; they arrive here as [`ChatEvent::OperationFailed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    ThreadsRefreshed { total: usize },
    RoomOpened { room: String },
    RoomClosed,
    MessagesRefreshed { room: String, total: usize },
    MessageSent { room: String },
    MessageDeleted { id: i64 },
    ThreadWiped { room: String },
    OperationFailed { op: ChatOp, message: String },
}

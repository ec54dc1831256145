use serde::{Deserialize, Serialize};

use super::Timestamp;

/// Coarse kind tag stored alongside an attachment reference, used to pick an
/// inline image renderer over a generic document link.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    Image,
    /// Anything the console does not render inline.
    Document,
}

impl<'de> serde::Deserialize<'de> for AttachmentKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Kind tags newer backends may introduce degrade to a download link.
        let value = String::deserialize(deserializer)?;
        Ok(match value.as_str() {
            "image" => Self::Image,
            _ => Self::Document,
        })
    }
}

/// One message in a room. Immutable once created; the only mutation the API
/// offers is a hard delete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    /// Numeric id, monotonically increasing in creation order within a room.
    pub id: i64,
    pub room: String,
    pub sender_id: String,
    #[serde(rename = "sender_nama")]
    pub sender_name: String,
    /// Role label the sender carried when posting, e.g. `admin` or `petugas`.
    pub role: String,
    #[serde(default)]
    pub message: Option<String>,
    pub created_at: Timestamp,
    /// Relative path under the shared storage prefix.
    #[serde(default)]
    pub attachment: Option<String>,
    #[serde(default)]
    pub attachment_type: Option<AttachmentKind>,
    #[serde(default)]
    pub reply_to: Option<String>,
    #[serde(default, rename = "reply_sender_nama")]
    pub reply_sender_name: Option<String>,
    #[serde(default)]
    pub reply_message: Option<String>,
}

impl ChatMessage {
    /// Trimmed body text, if the message carries any.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    #[must_use]
    pub fn has_attachment(&self) -> bool {
        self.attachment.is_some()
    }
}

/// Summary of an actor who has sent at least one message into a thread.
/// Recomputed server-side from message history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Participant {
    #[serde(default)]
    pub sender_id: String,
    #[serde(rename = "sender_nama")]
    pub name: String,
    #[serde(default, rename = "count")]
    pub message_count: i64,
    #[serde(default)]
    pub last_active_at: Option<Timestamp>,
}

/// Per-room counters shown in the thread header.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThreadStats {
    pub total_messages: i64,
    pub total_participants: i64,
    #[serde(default)]
    pub first_message_at: Option<Timestamp>,
    #[serde(default)]
    pub last_message_at: Option<Timestamp>,
}

/// Response envelope of `GET /chat-management/thread/{room}`. Messages arrive
/// most-recent-first; callers re-order before display.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThreadResponse {
    #[serde(default)]
    pub data: Vec<ChatMessage>,
    #[serde(default)]
    pub summary: Option<ThreadStats>,
    #[serde(default)]
    pub participants: Vec<Participant>,
}

use serde::{Deserialize, Serialize};

use super::Timestamp;

/// One row of the thread directory: a server-derived projection over the
/// messages of a room, including the preview of its most recent message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThreadSummary {
    /// Unique room key naming the conversation channel.
    pub room: String,
    pub total_messages: i64,
    pub total_participants: i64,
    #[serde(default)]
    pub last_message_id: Option<i64>,
    #[serde(default)]
    pub last_sender_id: Option<String>,
    #[serde(default)]
    pub last_sender_name: Option<String>,
    #[serde(default)]
    pub last_message_text: Option<String>,
    #[serde(default)]
    pub last_message_at: Option<Timestamp>,
}

/// Aggregate counters shown above the directory listing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DirectorySummary {
    pub total_messages: i64,
    pub total_threads: i64,
    pub total_senders: i64,
}

/// Paging metadata accompanying list responses.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListMeta {
    #[serde(default)]
    pub total: i64,
}

/// Response envelope of `GET /chat-management`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThreadListResponse {
    #[serde(default)]
    pub data: Vec<ThreadSummary>,
    #[serde(default)]
    pub summary: Option<DirectorySummary>,
    #[serde(default)]
    pub meta: Option<ListMeta>,
}

use serde::{Deserialize, Serialize};

/// Sender id reserved for console-originated messages. Messages carrying it
/// are always rendered as the operator's own, regardless of which operator
/// account posted them.
pub const CONSOLE_SENDER_ID: &str = "admin";

/// Identity of the operator driving the console. Resolved once at startup and
/// passed into the chat module explicitly; the module never reaches into
/// ambient state for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OperatorSession {
    pub id: String,
    pub name: String,
    /// Role label embedded into outgoing messages, e.g. `admin`.
    pub role: String,
}

impl OperatorSession {
    /// Whether a message from `sender_id` renders as the operator's own.
    #[must_use]
    pub fn owns(&self, sender_id: &str) -> bool {
        sender_id == self.id || sender_id == CONSOLE_SENDER_ID
    }
}

/// Moderation capabilities resolved once per session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Capabilities {
    pub can_delete: bool,
    pub can_moderate_thread: bool,
}

impl Capabilities {
    #[must_use]
    pub const fn full() -> Self {
        Self {
            can_delete: true,
            can_moderate_thread: true,
        }
    }

    #[must_use]
    pub const fn read_only() -> Self {
        Self {
            can_delete: false,
            can_moderate_thread: false,
        }
    }
}

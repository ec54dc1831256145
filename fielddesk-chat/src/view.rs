//! Render model: a pure, deterministic projection of the message list into
//! display records. No network, no clocks, no side effects.

use shared::models::{AttachmentKind, ChatMessage, OperatorSession};

/// How a message's attachment should be presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentRender {
    None,
    /// Rendered inline.
    Image { path: String },
    /// Rendered as a generic download link.
    Document { path: String },
}

/// Quoted-reply context shown above a message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyContext {
    pub sender_name: String,
    pub excerpt: String,
}

/// One display record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub id: i64,
    /// Whether the message renders on the operator's side of the view.
    pub own: bool,
    pub sender_name: String,
    pub role: String,
    pub body: Option<String>,
    pub attachment: AttachmentRender,
    pub time_label: String,
    pub reply: Option<ReplyContext>,
}

/// Projects `messages` into display order: deduplicated by id, ascending by
/// id, ownership derived from the session (with the reserved sentinel always
/// "own").
#[must_use]
pub fn render_messages(
    messages: &[ChatMessage],
    session: &OperatorSession,
) -> Vec<RenderedMessage> {
    let mut ordered: Vec<&ChatMessage> = messages.iter().collect();
    ordered.sort_by_key(|message| message.id);
    ordered.dedup_by_key(|message| message.id);
    ordered
        .into_iter()
        .map(|message| render_one(message, session))
        .collect()
}

fn render_one(message: &ChatMessage, session: &OperatorSession) -> RenderedMessage {
    let attachment = match (&message.attachment, message.attachment_type) {
        (Some(path), Some(AttachmentKind::Image)) => AttachmentRender::Image { path: path.clone() },
        // A missing or unknown kind tag still gets a usable download link.
        (Some(path), _) => AttachmentRender::Document { path: path.clone() },
        (None, _) => AttachmentRender::None,
    };

    let reply = message.reply_to.as_ref().map(|_| ReplyContext {
        sender_name: message
            .reply_sender_name
            .clone()
            .unwrap_or_else(|| "Deleted User".to_string()),
        excerpt: message
            .reply_message
            .clone()
            .unwrap_or_else(|| "Deleted Message".to_string()),
    });

    RenderedMessage {
        id: message.id,
        own: session.owns(&message.sender_id),
        sender_name: message.sender_name.clone(),
        role: message.role.clone(),
        body: message.body().map(str::to_string),
        attachment,
        time_label: message.created_at.time_label(),
        reply,
    }
}

/// Two-letter avatar initials, `??` when the name is empty.
#[must_use]
pub fn initials(name: &str) -> String {
    let letters: String = name.chars().take(2).collect();
    if letters.is_empty() {
        "??".to_string()
    } else {
        letters.to_uppercase()
    }
}

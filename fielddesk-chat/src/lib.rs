#![cfg_attr(not(test), forbid(unsafe_code))]
#![deny(warnings, clippy::pedantic)]
#![allow(clippy::multiple_crate_versions)]

//! Chat core of the FieldDesk operations console.
//!
//! The module is built around two polling loops (a coarse one over the
//! thread directory and a fine one over the currently open room) plus a
//! composer and a moderation surface that mutate server state and trigger
//! immediate refreshes. All state changes fan out to subscribers as
//! [`ChatEvent`]s, so a push-based transport could later replace the timers
//! without changing callers.

pub mod api;
pub mod composer;
pub mod console;
pub mod directory;
pub mod events;
pub mod moderation;
mod poll;
pub mod room;
pub mod state;
pub mod view;

pub use api::{AttachmentUpload, ChatApi, OutgoingMessage, TransportError};
pub use composer::{MessageComposer, SendOutcome};
pub use console::{ChatConsole, ChatSettings};
pub use directory::DirectoryPoller;
pub use events::{ChatEvent, ChatOp};
pub use moderation::{ModerationError, Moderator};
pub use room::RoomPoller;
pub use state::ChatStore;
pub use view::{AttachmentRender, RenderedMessage, ReplyContext, initials, render_messages};

#![allow(dead_code)]

//! In-process fake of the chat-management REST backend, plus console
//! construction helpers shared by the integration suites.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use url::Url;

use chat::{ChatApi, ChatConsole, ChatEvent, ChatSettings};
use shared::models::{Capabilities, OperatorSession};

/// Captured multipart payload of one send request.
#[derive(Debug, Clone, Default)]
pub struct CapturedSend {
    pub fields: HashMap<String, String>,
    pub file_name: Option<String>,
    pub file_len: usize,
}

/// Mutable backend fixture: rooms of message JSON, request counters, and
/// failure switches.
#[derive(Debug, Default)]
pub struct Backend {
    pub rooms: HashMap<String, Vec<Value>>,
    pub sends: Vec<CapturedSend>,
    pub fail_send: bool,
    pub fail_delete: bool,
    pub fail_directory: bool,
    pub fail_thread: bool,
    pub directory_hits: usize,
    pub thread_hits: HashMap<String, usize>,
    pub delete_hits: usize,
    pub next_id: i64,
}

impl Backend {
    pub fn seed_message(&mut self, room: &str, id: i64, sender_id: &str, name: &str, text: &str) {
        self.rooms
            .entry(room.to_string())
            .or_default()
            .push(message_json(id, room, sender_id, name, text));
        self.next_id = self.next_id.max(id + 1);
    }

    pub fn thread_hits(&self, room: &str) -> usize {
        self.thread_hits.get(room).copied().unwrap_or(0)
    }
}

pub type SharedBackend = Arc<Mutex<Backend>>;

pub fn message_json(id: i64, room: &str, sender_id: &str, name: &str, text: &str) -> Value {
    json!({
        "id": id,
        "room": room,
        "sender_id": sender_id,
        "sender_nama": name,
        "role": "petugas",
        "message": text,
        "created_at": format!("2026-08-03T10:{:02}:{:02}Z", (id / 60) % 60, id % 60),
        "reply_to": null,
        "attachment": null,
        "attachment_type": null
    })
}

async fn list_threads(State(state): State<SharedBackend>) -> (StatusCode, Json<Value>) {
    let mut backend = state.lock().unwrap();
    backend.directory_hits += 1;
    if backend.fail_directory {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "directory unavailable"})),
        );
    }

    let mut data: Vec<Value> = backend
        .rooms
        .iter()
        .map(|(room, messages)| {
            let last = messages
                .iter()
                .max_by_key(|message| message["id"].as_i64().unwrap_or(0));
            let senders: HashSet<&str> = messages
                .iter()
                .filter_map(|message| message["sender_id"].as_str())
                .collect();
            json!({
                "room": room,
                "total_messages": messages.len(),
                "total_participants": senders.len(),
                "last_message_id": last.map_or(Value::Null, |m| m["id"].clone()),
                "last_sender_id": last.map_or(Value::Null, |m| m["sender_id"].clone()),
                "last_sender_name": last.map_or(Value::Null, |m| m["sender_nama"].clone()),
                "last_message_text": last.map_or(Value::Null, |m| m["message"].clone()),
                "last_message_at": last.map_or(Value::Null, |m| m["created_at"].clone()),
            })
        })
        .collect();
    data.sort_by_key(|thread| -thread["last_message_id"].as_i64().unwrap_or(0));

    let total_messages: usize = backend.rooms.values().map(Vec::len).sum();
    let body = json!({
        "data": data,
        "summary": {
            "total_messages": total_messages,
            "total_threads": backend.rooms.len(),
            "total_senders": 0
        },
        "meta": {"total": backend.rooms.len()}
    });
    (StatusCode::OK, Json(body))
}

async fn fetch_thread(
    State(state): State<SharedBackend>,
    Path(room): Path<String>,
) -> (StatusCode, Json<Value>) {
    let mut backend = state.lock().unwrap();
    *backend.thread_hits.entry(room.clone()).or_default() += 1;
    if backend.fail_thread {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "thread unavailable"})),
        );
    }

    let messages = backend.rooms.get(&room).cloned().unwrap_or_default();
    // Server order is most-recent-first.
    let mut data = messages.clone();
    data.sort_by_key(|message| -message["id"].as_i64().unwrap_or(0));

    let mut counts: HashMap<String, (String, i64)> = HashMap::new();
    for message in &messages {
        let sender_id = message["sender_id"].as_str().unwrap_or_default().to_string();
        let name = message["sender_nama"].as_str().unwrap_or_default().to_string();
        let entry = counts.entry(sender_id).or_insert((name, 0));
        entry.1 += 1;
    }
    let participants: Vec<Value> = counts
        .into_iter()
        .map(|(sender_id, (name, count))| {
            json!({"sender_id": sender_id, "sender_nama": name, "count": count})
        })
        .collect();

    let summary = if messages.is_empty() {
        Value::Null
    } else {
        json!({
            "total_messages": messages.len(),
            "total_participants": participants.len(),
            "first_message_at": null,
            "last_message_at": null
        })
    };

    let body = json!({"data": data, "summary": summary, "participants": participants});
    (StatusCode::OK, Json(body))
}

async fn send_message(
    State(state): State<SharedBackend>,
    mut multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    let mut fields: HashMap<String, String> = HashMap::new();
    let mut file_name = None;
    let mut file_len = 0;
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            file_name = field.file_name().map(ToString::to_string);
            file_len = field.bytes().await.unwrap().len();
        } else {
            fields.insert(name, field.text().await.unwrap());
        }
    }

    let mut backend = state.lock().unwrap();
    let failed = backend.fail_send;
    if !failed {
        let id = if backend.next_id == 0 { 1 } else { backend.next_id };
        backend.next_id = id + 1;
        let room = fields.get("room").cloned().unwrap_or_default();
        let stored = json!({
            "id": id,
            "room": room,
            "sender_id": fields.get("sender_id"),
            "sender_nama": fields.get("sender_nama"),
            "role": fields.get("role"),
            "message": fields.get("message"),
            "created_at": "2026-08-03T12:00:00Z",
            "reply_to": null,
            "attachment": file_name.as_ref().map(|name| format!("chat/{name}")),
            "attachment_type": file_name.as_ref().map(|_| "document"),
        });
        backend.rooms.entry(room).or_default().push(stored);
    }
    backend.sends.push(CapturedSend {
        fields,
        file_name,
        file_len,
    });

    if failed {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "Gagal mengirim pesan."})),
        )
    } else {
        (StatusCode::OK, Json(json!({"message": "ok"})))
    }
}

async fn delete_message(
    State(state): State<SharedBackend>,
    Path(id): Path<i64>,
) -> (StatusCode, Json<Value>) {
    let mut backend = state.lock().unwrap();
    backend.delete_hits += 1;
    if backend.fail_delete {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "Gagal menghapus pesan."})),
        );
    }
    for messages in backend.rooms.values_mut() {
        messages.retain(|message| message["id"].as_i64() != Some(id));
    }
    (StatusCode::OK, Json(json!({"message": "deleted"})))
}

async fn delete_thread(
    State(state): State<SharedBackend>,
    Path(room): Path<String>,
) -> (StatusCode, Json<Value>) {
    let mut backend = state.lock().unwrap();
    backend.delete_hits += 1;
    backend.rooms.remove(&room);
    (StatusCode::OK, Json(json!({"message": "deleted"})))
}

/// Serves the fake backend on an ephemeral port and returns the API base URL.
pub async fn spawn_backend(state: SharedBackend) -> String {
    let app = Router::new()
        .route("/api/chat-management", get(list_threads))
        .route("/api/chat-management/send", post(send_message))
        .route(
            "/api/chat-management/thread/{room}",
            get(fetch_thread).delete(delete_thread),
        )
        .route("/api/chat-management/{id}", delete(delete_message))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api")
}

/// Sub-second cadence so the suites observe several ticks quickly.
pub fn test_settings() -> ChatSettings {
    ChatSettings {
        directory_interval: Duration::from_millis(60),
        room_interval: Duration::from_millis(40),
        directory_page_size: 50,
        room_page_size: 100,
    }
}

pub fn operator() -> OperatorSession {
    OperatorSession {
        id: "OPS-001".to_string(),
        name: "Operations Console".to_string(),
        role: "admin".to_string(),
    }
}

pub fn console_at(base_url: &str) -> ChatConsole {
    console_with(base_url, Capabilities::full())
}

pub fn console_with(base_url: &str, capabilities: Capabilities) -> ChatConsole {
    let api = ChatApi::new(
        Url::parse(base_url).unwrap(),
        "http://storage.local/storage",
        None,
    );
    ChatConsole::new(api, test_settings(), operator(), capabilities)
}

/// Collects every event currently queued on the receiver.
pub fn drain_events(rx: &mut tokio::sync::broadcast::Receiver<ChatEvent>) -> Vec<ChatEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

//! Integration tests for the thread directory poller.

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chat::{ChatEvent, ChatOp};
use common::{Backend, console_at, drain_events, spawn_backend};

#[tokio::test]
async fn eager_refresh_populates_directory_on_mount() {
    let state = Arc::new(Mutex::new(Backend::default()));
    {
        let mut backend = state.lock().unwrap();
        backend.seed_message("branch-07", 10, "EMP-0042", "Dewi", "patrol done");
        backend.seed_message("hq", 20, "EMP-0007", "Budi", "roger");
    }
    let base_url = spawn_backend(Arc::clone(&state)).await;
    let console = console_at(&base_url);

    console.mount();
    tokio::time::sleep(Duration::from_millis(80)).await;

    let threads = console.threads();
    assert_eq!(threads.len(), 2);
    // Recency order: the room with the newest message comes first.
    assert_eq!(threads[0].room, "hq");
    assert_eq!(threads[1].room, "branch-07");
    assert_eq!(console.directory_summary().unwrap().total_threads, 2);

    console.unmount();
}

#[tokio::test]
async fn background_ticks_pick_up_new_threads() {
    let state = Arc::new(Mutex::new(Backend::default()));
    state
        .lock()
        .unwrap()
        .seed_message("branch-07", 10, "EMP-0042", "Dewi", "patrol done");
    let base_url = spawn_backend(Arc::clone(&state)).await;
    let console = console_at(&base_url);

    console.mount();
    tokio::time::sleep(Duration::from_millis(80)).await;
    assert_eq!(console.threads().len(), 1);

    state
        .lock()
        .unwrap()
        .seed_message("gate-3", 30, "EMP-0011", "Sari", "all clear");
    tokio::time::sleep(Duration::from_millis(250)).await;

    assert_eq!(console.threads().len(), 2);
    console.unmount();
}

#[tokio::test]
async fn identical_responses_replace_without_duplicates() {
    let state = Arc::new(Mutex::new(Backend::default()));
    state
        .lock()
        .unwrap()
        .seed_message("branch-07", 10, "EMP-0042", "Dewi", "patrol done");
    let base_url = spawn_backend(Arc::clone(&state)).await;
    let console = console_at(&base_url);

    console.refresh_threads(false).await;
    let first = console.threads();
    console.refresh_threads(true).await;
    let second = console.threads();

    assert_eq!(first, second);
    assert_eq!(second.len(), 1);
}

#[tokio::test]
async fn failed_refresh_retains_last_known_good_list() {
    let state = Arc::new(Mutex::new(Backend::default()));
    state
        .lock()
        .unwrap()
        .seed_message("branch-07", 10, "EMP-0042", "Dewi", "patrol done");
    let base_url = spawn_backend(Arc::clone(&state)).await;
    let console = console_at(&base_url);
    let mut events = console.subscribe();

    console.refresh_threads(false).await;
    assert_eq!(console.threads().len(), 1);

    state.lock().unwrap().fail_directory = true;
    console.refresh_threads(true).await;

    assert_eq!(console.threads().len(), 1);
    let failures: Vec<ChatEvent> = drain_events(&mut events)
        .into_iter()
        .filter(|event| {
            matches!(
                event,
                ChatEvent::OperationFailed {
                    op: ChatOp::DirectoryRefresh,
                    ..
                }
            )
        })
        .collect();
    assert_eq!(failures.len(), 1);
}

#[tokio::test]
async fn unmount_stops_the_directory_timer() {
    let state = Arc::new(Mutex::new(Backend::default()));
    let base_url = spawn_backend(Arc::clone(&state)).await;
    let console = console_at(&base_url);

    console.mount();
    assert!(console.is_mounted());
    tokio::time::sleep(Duration::from_millis(150)).await;

    console.unmount();
    assert!(!console.is_mounted());
    tokio::time::sleep(Duration::from_millis(60)).await;
    let hits = state.lock().unwrap().directory_hits;
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(state.lock().unwrap().directory_hits, hits);
}

#[tokio::test]
async fn mount_is_idempotent() {
    let state = Arc::new(Mutex::new(Backend::default()));
    let base_url = spawn_backend(Arc::clone(&state)).await;
    let console = console_at(&base_url);

    console.mount();
    console.mount();
    tokio::time::sleep(Duration::from_millis(100)).await;
    console.unmount();

    // One eager refresh plus timer ticks; a doubled timer would roughly
    // double this count. With a 60 ms interval over ~100 ms, a single
    // timer cannot exceed four hits.
    assert!(state.lock().unwrap().directory_hits <= 4);
}

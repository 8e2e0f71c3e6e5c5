//! Shared test utilities.

#![allow(dead_code, unused_imports)]

pub mod mock_backend;
pub mod scripted_api;

use blog_client::blog::{BlogStore, Post};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

use scripted_api::ScriptedApi;

pub fn post(id: &str, title: &str) -> Post {
    Post::new(id).with("title", title)
}

/// Write `content` to a temporary `config.toml`.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}

/// Wait until `api` has received `count` calls.
pub async fn wait_for_calls(api: &ScriptedApi, count: usize) {
    let start = std::time::Instant::now();
    while api.calls().len() < count {
        assert!(
            start.elapsed() < Duration::from_secs(2),
            "expected {} api calls, saw {:?}",
            count,
            api.calls()
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

/// Wait until the store reports `loading == expected`.
pub async fn wait_for_loading(store: &BlogStore, expected: bool) {
    let start = std::time::Instant::now();
    while store.state().await.unwrap().loading != expected {
        assert!(
            start.elapsed() < Duration::from_secs(2),
            "loading never became {}",
            expected
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

//! Common test utilities for integration tests.
//!
//! This module provides reusable fixtures and helper functions for
//! integration testing the feed data core end to end.
//!
//! # Example
//!
//! ```ignore
//! mod common;
//! use common::{test_config, wait_until};
//!
//! let config = test_config(&mock_server.uri());
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use petal::api::ApiClient;
use petal::config::Config;
use petal::events::FeedEvent;
use petal::models::Post;
use petal::repository::FeedRepository;
use petal::store::PostStore;
use petal::traits::RemoteFeed;
use petal::viewmodel::FeedViewModel;

/// Installs an env-filtered subscriber so `RUST_LOG` controls test
/// output. Safe to call from every test; only the first call wins.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Creates a config pointing at the given server with fast timeouts.
pub fn test_config(base_url: &str) -> Config {
    Config::default()
        .with_base_url(base_url)
        .with_connect_timeout(Duration::from_millis(500))
        .with_request_timeout(Duration::from_secs(2))
        .with_load_more_delay(Duration::from_millis(10))
}

/// Polls until `check` holds, panicking after two seconds.
pub async fn wait_until(mut check: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !check() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("timed out waiting for condition");
}

/// Receives the next repository event, panicking after two seconds.
pub async fn next_event(rx: &mut broadcast::Receiver<FeedEvent>) -> FeedEvent {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed")
}

/// Builds a full stack over a real HTTP client against `base_url`,
/// seeding the in-memory store with `posts`.
pub fn http_stack(
    base_url: &str,
    posts: Vec<Post>,
) -> (Arc<PostStore>, Arc<FeedRepository>, FeedViewModel) {
    init_tracing();
    let config = test_config(base_url);
    let store = Arc::new(PostStore::in_memory());
    store.upsert_many(posts).expect("Failed to seed store");

    let client = ApiClient::new(&config).expect("Failed to build API client");
    let repository = Arc::new(FeedRepository::spawn(
        Arc::clone(&store),
        Arc::new(client) as Arc<dyn RemoteFeed>,
        &config,
    ));
    let view_model = FeedViewModel::new(Arc::clone(&repository), &config);

    (store, repository, view_model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_config_fast_timeouts() {
        let config = test_config("http://127.0.0.1:9");
        assert_eq!(config.base_url, "http://127.0.0.1:9");
        assert_eq!(config.request_timeout, Duration::from_secs(2));
        assert_eq!(config.load_more_delay, Duration::from_millis(10));
    }

    #[tokio::test]
    async fn test_wait_until_returns_once_true() {
        let mut count = 0;
        wait_until(|| {
            count += 1;
            count > 2
        })
        .await;
        assert!(count > 2);
    }
}

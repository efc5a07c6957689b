//! Mock remote feed for testing.
//!
//! Provides a configurable [`RemoteFeed`] implementation that serves
//! scripted data, records every call, and injects failures per
//! operation, so repository and view-model behavior can be tested
//! without network access.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::models::Post;
use crate::traits::RemoteFeed;

/// The operations a [`MockRemoteFeed`] can be scripted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteOp {
    FetchPosts,
    FetchPost,
    Like,
    Comment,
    Share,
    Publish,
}

/// A recorded remote call for verification in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    FetchPosts,
    FetchPost(String),
    Like(String),
    Comment { post_id: String, content: String },
    Share(String),
    Publish(String),
}

impl RecordedCall {
    fn op(&self) -> RemoteOp {
        match self {
            RecordedCall::FetchPosts => RemoteOp::FetchPosts,
            RecordedCall::FetchPost(_) => RemoteOp::FetchPost,
            RecordedCall::Like(_) => RemoteOp::Like,
            RecordedCall::Comment { .. } => RemoteOp::Comment,
            RecordedCall::Share(_) => RemoteOp::Share,
            RecordedCall::Publish(_) => RemoteOp::Publish,
        }
    }
}

/// Mock remote feed for testing.
///
/// # Example
///
/// ```ignore
/// use petal::adapters::mock::{MockRemoteFeed, RemoteOp};
/// use petal::error::ApiError;
/// use petal::sample;
///
/// let remote = MockRemoteFeed::with_posts(sample::sample_posts(3));
/// remote.set_failure(
///     RemoteOp::Like,
///     ApiError::Status { status: 500, message: "Internal".into() },
/// );
///
/// // like_post now fails while fetch_posts still serves the list
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockRemoteFeed {
    /// What fetch operations serve
    posts: Arc<Mutex<Vec<Post>>>,
    /// Failures injected per operation
    failures: Arc<Mutex<HashMap<RemoteOp, ApiError>>>,
    /// Recorded calls for verification
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    /// Optional simulated latency applied to every call
    latency: Arc<Mutex<Option<Duration>>>,
}

impl MockRemoteFeed {
    /// Create a mock with no posts and no scripted failures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock serving the given posts.
    pub fn with_posts(posts: Vec<Post>) -> Self {
        let mock = Self::new();
        mock.set_posts(posts);
        mock
    }

    /// Replace the posts served by fetch operations.
    pub fn set_posts(&self, posts: Vec<Post>) {
        *self.posts.lock().unwrap() = posts;
    }

    /// The posts currently served.
    pub fn posts(&self) -> Vec<Post> {
        self.posts.lock().unwrap().clone()
    }

    /// Make the given operation fail with `err` until cleared.
    pub fn set_failure(&self, op: RemoteOp, err: ApiError) {
        self.failures.lock().unwrap().insert(op, err);
    }

    /// Let the given operation succeed again.
    pub fn clear_failure(&self, op: RemoteOp) {
        self.failures.lock().unwrap().remove(&op);
    }

    /// Apply a simulated delay to every call.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = Some(latency);
    }

    /// Get all recorded calls.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// How many times the given operation was called.
    pub fn call_count(&self, op: RemoteOp) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.op() == op)
            .count()
    }

    /// Clear all recorded calls.
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    async fn begin(&self, call: RecordedCall) -> Result<(), ApiError> {
        let latency = *self.latency.lock().unwrap();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        let op = call.op();
        self.calls.lock().unwrap().push(call);
        match self.failures.lock().unwrap().get(&op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RemoteFeed for MockRemoteFeed {
    async fn fetch_posts(&self) -> Result<Vec<Post>, ApiError> {
        self.begin(RecordedCall::FetchPosts).await?;
        Ok(self.posts())
    }

    async fn fetch_post(&self, id: &str) -> Result<Post, ApiError> {
        self.begin(RecordedCall::FetchPost(id.to_string())).await?;
        self.posts
            .lock()
            .unwrap()
            .iter()
            .find(|post| post.id == id)
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: 404,
                message: "Not Found".to_string(),
            })
    }

    async fn like_post(&self, id: &str) -> Result<(), ApiError> {
        self.begin(RecordedCall::Like(id.to_string())).await
    }

    async fn comment_post(&self, id: &str, content: &str) -> Result<(), ApiError> {
        self.begin(RecordedCall::Comment {
            post_id: id.to_string(),
            content: content.to_string(),
        })
        .await
    }

    async fn share_post(&self, id: &str) -> Result<(), ApiError> {
        self.begin(RecordedCall::Share(id.to_string())).await
    }

    async fn publish_post(&self, post: &Post) -> Result<(), ApiError> {
        self.begin(RecordedCall::Publish(post.id.clone())).await
    }
}

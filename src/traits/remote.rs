//! Remote feed source trait abstraction.
//!
//! Provides a trait-based abstraction over the backend HTTP surface,
//! enabling dependency injection and mocking in tests.

use async_trait::async_trait;

use crate::error::ApiError;
use crate::models::Post;

/// The backend operations the repository depends on.
///
/// The production implementation is [`crate::api::ApiClient`]; tests use
/// [`crate::adapters::mock::MockRemoteFeed`].
#[async_trait]
pub trait RemoteFeed: Send + Sync {
    /// Fetch the full post list.
    async fn fetch_posts(&self) -> Result<Vec<Post>, ApiError>;

    /// Fetch a single post by id.
    async fn fetch_post(&self, id: &str) -> Result<Post, ApiError>;

    /// Register a like action on a post.
    ///
    /// The surface has no unlike endpoint; both toggle directions call
    /// this.
    async fn like_post(&self, id: &str) -> Result<(), ApiError>;

    /// Submit a comment on a post.
    async fn comment_post(&self, id: &str, content: &str) -> Result<(), ApiError>;

    /// Register a share action on a post.
    async fn share_post(&self, id: &str) -> Result<(), ApiError>;

    /// Publish a new post.
    async fn publish_post(&self, post: &Post) -> Result<(), ApiError>;
}

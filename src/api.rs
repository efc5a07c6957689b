//! Feed API client for backend communication.
//!
//! This module provides the HTTP client for the feed backend. Every
//! request carries the fixed header set (`Accept`, `Content-Type`, a
//! millisecond timestamp, and the device marker); non-2xx responses are
//! logged per status class and classified into [`ApiError`].

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response};
use tracing::{error, warn};

use crate::config::Config;
use crate::error::{classify_reqwest_error, ApiError};
use crate::models::Post;
use crate::traits::RemoteFeed;

/// Header carrying the request time in epoch milliseconds.
pub const HEADER_TIMESTAMP: &str = "X-Timestamp";

/// Header carrying the device marker.
pub const HEADER_DEVICE_TYPE: &str = "X-Device-Type";

/// Client for the feed backend API.
///
/// Holds one reusable `reqwest::Client` configured with the transport
/// timeouts and static headers from [`Config`].
pub struct ApiClient {
    /// Base URL for the backend, no trailing slash
    pub base_url: String,
    /// Reusable HTTP client
    http: Client,
}

impl ApiClient {
    /// Create a client from the given configuration.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let device = HeaderValue::from_str(&config.device_type).map_err(|e| {
            ApiError::Request {
                message: format!("invalid device type header: {}", e),
            }
        })?;
        headers.insert(HEADER_DEVICE_TYPE, device);

        let http = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Request {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Build a request with the per-call headers attached.
    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        // No Authorization header yet; the backend has no sign-in.
        self.http.request(method, url).header(
            HEADER_TIMESTAMP,
            Utc::now().timestamp_millis().to_string(),
        )
    }

    /// Turn a non-2xx response into an [`ApiError::Status`], logging it
    /// by status class.
    async fn check_status(url: &str, response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let status = status.as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        match status {
            500..=599 => error!("Server error {} from {}", status, url),
            401 | 403 => warn!("Request to {} rejected with status {}", url, status),
            404 => warn!("Resource not found at {}", url),
            _ => warn!("Unexpected status {} from {}", status, url),
        }

        Err(ApiError::Status { status, message })
    }

    /// Fetch the full post list.
    ///
    /// Sends `GET /posts`.
    pub async fn fetch_posts(&self) -> Result<Vec<Post>, ApiError> {
        let url = format!("{}/posts", self.base_url);

        let response = self
            .request(Method::GET, &url)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e, &url))?;
        let response = Self::check_status(&url, response).await?;

        response
            .json::<Vec<Post>>()
            .await
            .map_err(|e| classify_reqwest_error(&e, &url))
    }

    /// Fetch a single post by id.
    ///
    /// Sends `GET /posts/{id}`.
    pub async fn fetch_post(&self, id: &str) -> Result<Post, ApiError> {
        let url = format!("{}/posts/{}", self.base_url, id);

        let response = self
            .request(Method::GET, &url)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e, &url))?;
        let response = Self::check_status(&url, response).await?;

        response
            .json::<Post>()
            .await
            .map_err(|e| classify_reqwest_error(&e, &url))
    }

    /// Register a like action on a post.
    ///
    /// Sends `POST /posts/{id}/like` with an empty body. The surface has
    /// no unlike endpoint; both toggle directions land here.
    pub async fn like_post(&self, id: &str) -> Result<(), ApiError> {
        let url = format!("{}/posts/{}/like", self.base_url, id);

        let response = self
            .request(Method::POST, &url)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e, &url))?;
        Self::check_status(&url, response).await?;

        Ok(())
    }

    /// Submit a comment on a post.
    ///
    /// Sends `POST /posts/{id}/comment` with the comment text in the
    /// body.
    pub async fn comment_post(&self, id: &str, content: &str) -> Result<(), ApiError> {
        let url = format!("{}/posts/{}/comment", self.base_url, id);
        let body = serde_json::json!({ "content": content });

        let response = self
            .request(Method::POST, &url)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e, &url))?;
        Self::check_status(&url, response).await?;

        Ok(())
    }

    /// Register a share action on a post.
    ///
    /// Sends `POST /posts/{id}/share` with an empty body.
    pub async fn share_post(&self, id: &str) -> Result<(), ApiError> {
        let url = format!("{}/posts/{}/share", self.base_url, id);

        let response = self
            .request(Method::POST, &url)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e, &url))?;
        Self::check_status(&url, response).await?;

        Ok(())
    }

    /// Publish a new post.
    ///
    /// Sends `POST /posts` with the full post as the body.
    pub async fn publish_post(&self, post: &Post) -> Result<(), ApiError> {
        let url = format!("{}/posts", self.base_url);

        let response = self
            .request(Method::POST, &url)
            .json(post)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e, &url))?;
        Self::check_status(&url, response).await?;

        Ok(())
    }
}

#[async_trait]
impl RemoteFeed for ApiClient {
    async fn fetch_posts(&self) -> Result<Vec<Post>, ApiError> {
        ApiClient::fetch_posts(self).await
    }

    async fn fetch_post(&self, id: &str) -> Result<Post, ApiError> {
        ApiClient::fetch_post(self, id).await
    }

    async fn like_post(&self, id: &str) -> Result<(), ApiError> {
        ApiClient::like_post(self, id).await
    }

    async fn comment_post(&self, id: &str, content: &str) -> Result<(), ApiError> {
        ApiClient::comment_post(self, id, content).await
    }

    async fn share_post(&self, id: &str) -> Result<(), ApiError> {
        ApiClient::share_post(self, id).await
    }

    async fn publish_post(&self, post: &Post) -> Result<(), ApiError> {
        ApiClient::publish_post(self, post).await
    }
}

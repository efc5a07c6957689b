//! Client configuration.
//!
//! All defaults are compile-time constants; there is no environment or
//! file based configuration. Hosts construct one `Config`, adjust it
//! with the builder methods, and pass it to the collaborators they
//! build.

use std::path::PathBuf;
use std::time::Duration;

use crate::models::User;
use crate::sample;

/// Default backend base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.example.com";

/// Transport connect timeout in seconds.
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Transport request timeout in seconds, covering the full exchange.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Device marker attached to every request.
pub const DEFAULT_DEVICE_TYPE: &str = "Android";

/// Simulated delay before the feed reports it has no more pages.
pub const DEFAULT_LOAD_MORE_DELAY_MS: u64 = 2000;

/// Broadcast capacity for repository events.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Configuration for the feed client core.
///
/// # Example
///
/// ```ignore
/// use petal::config::Config;
///
/// let config = Config::default()
///     .with_base_url("https://staging.example.com")
///     .with_store_path(Config::default_store_path().unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL, no trailing slash
    pub base_url: String,
    /// Transport connect timeout
    pub connect_timeout: Duration,
    /// Transport timeout for the whole request
    pub request_timeout: Duration,
    /// Value of the device marker header
    pub device_type: String,
    /// Profile used as the author for compose and comment actions
    pub current_user: User,
    /// Where the local store persists posts; `None` keeps it in memory
    pub store_path: Option<PathBuf>,
    /// Simulated delay for the load-more flow
    pub load_more_delay: Duration,
    /// Capacity of the repository event channel
    pub event_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            device_type: DEFAULT_DEVICE_TYPE.to_string(),
            current_user: sample::current_user(),
            store_path: None,
            load_more_delay: Duration::from_millis(DEFAULT_LOAD_MORE_DELAY_MS),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl Config {
    /// Create a new Config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backend base URL. A trailing slash is stripped.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Set the transport connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the transport request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the device marker header value.
    pub fn with_device_type(mut self, device_type: impl Into<String>) -> Self {
        self.device_type = device_type.into();
        self
    }

    /// Set the profile used as the author for compose and comment actions.
    pub fn with_current_user(mut self, user: User) -> Self {
        self.current_user = user;
        self
    }

    /// Persist the local store at the given path.
    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = Some(path.into());
        self
    }

    /// Set the simulated load-more delay.
    pub fn with_load_more_delay(mut self, delay: Duration) -> Self {
        self.load_more_delay = delay;
        self
    }

    /// Set the repository event channel capacity.
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// The conventional on-disk location for the post store, under the
    /// platform data directory. `None` when the platform has no data dir.
    pub fn default_store_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("petal").join("posts.json"))
    }
}

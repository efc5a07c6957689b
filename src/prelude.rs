//! Prelude module for convenient imports.
//!
//! This module re-exports commonly used types from the petal library,
//! providing a convenient way to import the most frequently used items.
//!
//! # Usage
//!
//! ```ignore
//! use petal::prelude::*;
//! ```
//!
//! This will import:
//! - Model types (Post, User, Comment, PostDraft)
//! - Data layer (PostStore, ApiClient, FeedRepository)
//! - View-models (FeedViewModel, PostDetailViewModel)
//! - Error types (ApiError, ErrorCategory, StoreError)
//! - Event types (FeedAction, FeedEvent)

// Model types
pub use crate::models::{Comment, DraftError, Post, PostDraft, User};

// Configuration
pub use crate::config::Config;

// Data layer
pub use crate::api::ApiClient;
pub use crate::repository::FeedRepository;
pub use crate::store::PostStore;
pub use crate::traits::RemoteFeed;

// View-models
pub use crate::viewmodel::{FeedViewModel, PostDetailViewModel};

// Error types
pub use crate::error::{ApiError, ErrorCategory, StoreError};

// Event types
pub use crate::events::{FeedAction, FeedEvent};

//! Error handling for the feed client core.
//!
//! This module provides:
//!
//! - **Error Categories**: a closed classification of request failures,
//!   each with a fixed user-facing message
//! - **API Errors**: transport-level detail with classification into
//!   categories
//! - **Store Errors**: local persistence failures
//!
//! # Example
//!
//! ```ignore
//! use petal::error::{ApiError, ErrorCategory};
//!
//! match client.fetch_posts().await {
//!     Ok(posts) => render(posts),
//!     Err(err) => {
//!         tracing::warn!(code = err.error_code(), "{}", err);
//!         show_toast(err.user_message());
//!     }
//! }
//! ```
//!
//! # Categories
//!
//! | Category | Source | Retryable |
//! |----------|--------|-----------|
//! | network | connection failures | Yes |
//! | server | HTTP 5xx, unexpected statuses | Yes |
//! | unauthorized | HTTP 401 | No |
//! | forbidden | HTTP 403 | No |
//! | not-found | HTTP 404 | No |
//! | parse | body decode failures | No |
//! | timeout | transport timeout | Yes |
//! | unknown | everything else | No |

mod api;
mod category;
mod store;

pub use api::{classify_reqwest_error, ApiError};
pub use category::ErrorCategory;
pub use store::StoreError;

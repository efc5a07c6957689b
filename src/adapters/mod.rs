//! Implementations of the trait abstractions in `crate::traits`.
//!
//! The production [`RemoteFeed`](crate::traits::RemoteFeed) adapter is
//! [`ApiClient`](crate::api::ApiClient); this module carries the test
//! doubles.
//!
//! # Mock Implementations
//!
//! - [`mock::MockRemoteFeed`] - scripted responses, call recording, and
//!   per-operation failure injection

pub mod mock;

pub use mock::MockRemoteFeed;

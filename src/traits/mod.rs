//! Trait abstractions for dependency injection and testability.
//!
//! This module provides trait-based abstractions for core functionality,
//! enabling dependency injection, mocking, and better testability.
//!
//! # Traits
//!
//! - [`RemoteFeed`] - the backend HTTP surface the repository consumes

pub mod remote;

pub use remote::RemoteFeed;

//! Petal - Client data core for a social feed app
//!
//! Models, local post store, remote client, repository and view-models
//! for a feed frontend to build on.

pub mod adapters;
pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod prelude;
pub mod repository;
pub mod sample;
pub mod store;
pub mod traits;
pub mod viewmodel;

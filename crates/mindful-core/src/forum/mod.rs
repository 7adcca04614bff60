//! Forum channels, posts, and replies.
//!
//! This module defines the `ForumRepository` trait that the infrastructure
//! layer implements, and the `ForumService` that validates input and fills
//! in generated fields before anything reaches the store.

pub mod author;
pub mod repository;
pub mod service;

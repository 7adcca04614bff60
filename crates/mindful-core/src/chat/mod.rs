//! Chat relay and chat persistence abstractions for Mindful.
//!
//! This module defines the `ChatRepository` trait that the infrastructure
//! layer implements for message and crisis alert storage, and the
//! `ChatRelay` that forwards user messages to the model API.

pub mod prompt;
pub mod relay;
pub mod repository;

//! Shared domain types for Mindful.
//!
//! This crate contains the domain types used across the Mindful service:
//! chat messages and crisis alerts, forum posts and replies, LLM request
//! shapes, server configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod forum;
pub mod llm;

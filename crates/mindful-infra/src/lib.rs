//! Infrastructure layer for Mindful.
//!
//! Implements the repository and provider traits defined in `mindful-core`:
//! SQLite storage, the OpenAI-compatible model client, and configuration
//! loading.

pub mod config;
pub mod llm;
pub mod sqlite;

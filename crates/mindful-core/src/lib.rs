//! Business logic and repository trait definitions for Mindful.
//!
//! This crate defines the "ports" (repository and provider traits) that the
//! infrastructure layer implements, plus the services built on them: the
//! crisis keyword matcher, the chat relay, and the forum service. It depends
//! only on `mindful-types` -- never on `mindful-infra` or any database/IO
//! crate.

pub mod chat;
pub mod crisis;
pub mod forum;
pub mod llm;

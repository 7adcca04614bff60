//! OpenAI-compatible chat completions provider.
//!
//! [`OpenAiCompatibleProvider`] talks to any server exposing
//! `POST {base_url}/chat/completions` with bearer authentication: OpenAI
//! itself, or a gateway/proxy that mimics it.

pub mod client;
pub mod types;

pub use client::OpenAiCompatibleProvider;

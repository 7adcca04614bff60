//! HTTP/REST API layer for Mindful.
//!
//! Axum-based REST API under `/api/` with configurable CORS.

pub mod error;
pub mod handlers;
pub mod router;

//! Observability setup for Mindful: tracing subscriber and optional
//! OpenTelemetry span export.

pub mod tracing_setup;

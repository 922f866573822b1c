//! Observability setup for Scrollback: structured logging through
//! `tracing-subscriber`, optionally bridged to OpenTelemetry.

pub mod tracing_setup;

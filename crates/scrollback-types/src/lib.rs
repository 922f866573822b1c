//! Shared domain types for Scrollback.
//!
//! This crate contains the types used across the workspace: chat handles,
//! message shapes, search options, scroll measurements, configuration, and
//! their error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod message;
pub mod scroll;
pub mod search;

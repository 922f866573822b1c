//! Rendering surface abstractions for Scrollback.
//!
//! The rendering surface is the live, DOM-like UI of a messaging session.
//! The retriever only queries and commands it; implementations live in
//! scrollback-infra.

pub mod box_surface;
pub mod rendering;

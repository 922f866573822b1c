//! Infrastructure layer for Scrollback.
//!
//! Contains implementations of the ports defined in `scrollback-core`:
//! the snapshot-backed rendering surface, plus config loading and data
//! directory resolution.

pub mod config;
pub mod filesystem;
pub mod snapshot;

//! Snapshot-backed rendering surface.
//!
//! Replays a recorded session from a JSON file so the retriever can run
//! without a live browser. Scrolling a chat's container reveals one older
//! page of history at a time, which gives the convergence scroller the same
//! grow-then-settle behavior it sees on a real surface.

pub mod format;
pub mod surface;

pub use format::{ChatSnapshot, SessionSnapshot};
pub use surface::{ChatSummary, SnapshotError, SnapshotSurface};

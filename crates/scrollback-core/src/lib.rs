//! Message retrieval logic and rendering surface traits for Scrollback.
//!
//! This crate defines the "port" (`RenderingSurface`) that infrastructure
//! implements, plus the convergence scroller, the message extractor, and the
//! `MessageRetriever` that runs them in sequence. It depends only on
//! `scrollback-types` -- never on `scrollback-infra` or any browser/IO crate.

pub mod cache;
pub mod extract;
pub mod observer;
pub mod retriever;
pub mod scroll;
pub mod surface;

#[cfg(test)]
pub(crate) mod testing;

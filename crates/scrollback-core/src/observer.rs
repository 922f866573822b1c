//! Observability hooks for retrieval.
//!
//! The scroller and extractor report what they see through a
//! `RetrievalObserver`. Observers are purely observational: nothing they do
//! changes the outcome of a retrieval.

use std::sync::Arc;

use scrollback_types::chat::ChatHandle;
use scrollback_types::error::RecordError;
use scrollback_types::scroll::{ConvergenceReport, LookupStrategy, ScrollProbe};

/// Sink for diagnostic events emitted during a retrieval.
///
/// Every method has an empty default so implementations only override what
/// they care about.
pub trait RetrievalObserver: Send + Sync {
    /// A scroll attempt completed (`attempt` is 1-based).
    fn attempt(&self, _chat: &ChatHandle, _attempt: u32, _probe: &ScrollProbe) {}

    /// No lookup strategy matched a container.
    fn container_missing(&self, _chat: &ChatHandle, _tried: &[LookupStrategy]) {}

    /// The scroller stopped.
    fn converged(&self, _chat: &ChatHandle, _report: &ConvergenceReport) {}

    /// The surface exposes no in-memory message store.
    fn store_unavailable(&self, _chat: &ChatHandle) {}

    /// A record was dropped during serialization or normalization.
    fn record_dropped(&self, _chat: &ChatHandle, _error: &RecordError) {}

    /// A count limit was passed but left unapplied by the limit policy.
    fn limit_ignored(&self, _chat: &ChatHandle, _limit: usize, _returned: usize) {}
}

impl<T: RetrievalObserver + ?Sized> RetrievalObserver for Arc<T> {
    fn attempt(&self, chat: &ChatHandle, attempt: u32, probe: &ScrollProbe) {
        (**self).attempt(chat, attempt, probe);
    }

    fn container_missing(&self, chat: &ChatHandle, tried: &[LookupStrategy]) {
        (**self).container_missing(chat, tried);
    }

    fn converged(&self, chat: &ChatHandle, report: &ConvergenceReport) {
        (**self).converged(chat, report);
    }

    fn store_unavailable(&self, chat: &ChatHandle) {
        (**self).store_unavailable(chat);
    }

    fn record_dropped(&self, chat: &ChatHandle, error: &RecordError) {
        (**self).record_dropped(chat, error);
    }

    fn limit_ignored(&self, chat: &ChatHandle, limit: usize, returned: usize) {
        (**self).limit_ignored(chat, limit, returned);
    }
}

/// Observer that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RetrievalObserver for NoopObserver {}

/// Default observer: forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl RetrievalObserver for TracingObserver {
    fn attempt(&self, chat: &ChatHandle, attempt: u32, probe: &ScrollProbe) {
        tracing::trace!(
            chat = %chat,
            attempt,
            before_extent = probe.before_extent,
            after_extent = probe.after_extent,
            "Scroll attempt"
        );
    }

    fn container_missing(&self, chat: &ChatHandle, tried: &[LookupStrategy]) {
        let names: Vec<&str> = tried.iter().map(|s| s.name.as_str()).collect();
        tracing::debug!(
            chat = %chat,
            strategies = ?names,
            "No scrollable message container found; extracting materialized history"
        );
    }

    fn converged(&self, chat: &ChatHandle, report: &ConvergenceReport) {
        tracing::debug!(
            chat = %chat,
            outcome = %report.outcome,
            attempts = report.attempts,
            last_extent = report.last_extent,
            strategy = report.strategy.as_deref().unwrap_or("none"),
            "Scrolling finished"
        );
    }

    fn store_unavailable(&self, chat: &ChatHandle) {
        tracing::warn!(chat = %chat, "Message store unavailable; returning no messages");
    }

    fn record_dropped(&self, chat: &ChatHandle, error: &RecordError) {
        tracing::warn!(chat = %chat, key = error.key(), error = %error, "Dropping message record");
    }

    fn limit_ignored(&self, chat: &ChatHandle, limit: usize, returned: usize) {
        tracing::warn!(
            chat = %chat,
            limit,
            returned,
            "Limit accepted but not applied (limit_policy = ignore)"
        );
    }
}

//! Cross-call convergence memo keyed by chat handle.
//!
//! The retriever keeps no global scroll state. A caller that wants to skip
//! re-scrolling chats it has already fully loaded creates a
//! `ConvergenceCache` and hands it to the retriever explicitly.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use scrollback_types::chat::ChatHandle;
use scrollback_types::scroll::ConvergenceReport;

#[derive(Debug, Clone)]
struct CachedConvergence {
    report: ConvergenceReport,
    recorded_at: DateTime<Utc>,
}

/// Remembers which chats have reached a stable extent.
///
/// Only `Stable` reports backed by at least one scroll attempt are stored.
/// A missing container or an exhausted budget means more history may still
/// load, so those chats are scrolled again on the next call.
#[derive(Debug, Default)]
pub struct ConvergenceCache {
    entries: DashMap<ChatHandle, CachedConvergence>,
    max_age: Option<Duration>,
}

impl ConvergenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries older than `max_age` are treated as absent.
    pub fn with_max_age(max_age: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            max_age: Some(max_age),
        }
    }

    /// Cached report for the chat, evicting it if expired.
    pub fn get(&self, chat: &ChatHandle) -> Option<ConvergenceReport> {
        {
            let entry = self.entries.get(chat)?;
            let fresh = self
                .max_age
                .is_none_or(|max_age| Utc::now() - entry.recorded_at <= max_age);
            if fresh {
                return Some(entry.report.clone());
            }
        }
        // The read guard must be released before removing.
        self.entries.remove(chat);
        None
    }

    /// Store a report. Returns whether it was cached.
    pub fn record(&self, chat: &ChatHandle, report: &ConvergenceReport) -> bool {
        if !report.is_stable() || report.attempts == 0 {
            return false;
        }
        self.entries.insert(
            chat.clone(),
            CachedConvergence {
                report: report.clone(),
                recorded_at: Utc::now(),
            },
        );
        true
    }

    /// Forget a chat so the next retrieval scrolls it again.
    pub fn invalidate(&self, chat: &ChatHandle) -> bool {
        self.entries.remove(chat).is_some()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

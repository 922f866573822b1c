//! Message retriever: convergence scrolling followed by extraction.
//!
//! `fetch_messages` is the one operation exposed to callers. It scrolls the
//! chat until its history stops growing (or the scroller gives up), reads and
//! filters the store once, then applies the configured limit policy.
//!
//! The retriever does not serialize concurrent calls for the same chat.
//! Overlapping calls would interleave scroll loops on the shared surface, so
//! callers must serialize retrieval per chat.

use std::sync::Arc;

use serde::Serialize;

use scrollback_types::chat::ChatHandle;
use scrollback_types::config::{LimitPolicy, RetrieverConfig};
use scrollback_types::error::{ConfigError, SurfaceError};
use scrollback_types::message::ChatMessage;
use scrollback_types::scroll::ConvergenceReport;
use scrollback_types::search::SearchOptions;

use crate::cache::ConvergenceCache;
use crate::extract::extractor::{ExtractionStats, MessageExtractor};
use crate::observer::{RetrievalObserver, TracingObserver};
use crate::scroll::scroller::ConvergenceScroller;
use crate::surface::rendering::RenderingSurface;

/// Full result of one retrieval.
#[derive(Debug, Clone, Serialize)]
pub struct Retrieval {
    pub messages: Vec<ChatMessage>,
    pub convergence: ConvergenceReport,
    /// Whether `convergence` came from the convergence cache.
    pub from_cache: bool,
    pub stats: ExtractionStats,
}

/// Retrieves a chat's full message history from a rendering surface.
pub struct MessageRetriever<S, O = TracingObserver> {
    surface: S,
    observer: O,
    scroller: ConvergenceScroller,
    limit_policy: LimitPolicy,
    cache: Option<Arc<ConvergenceCache>>,
}

impl<S: RenderingSurface> MessageRetriever<S, TracingObserver> {
    /// Create a retriever that reports through `tracing`.
    pub fn new(surface: S, config: &RetrieverConfig) -> Result<Self, ConfigError> {
        Self::with_observer(surface, TracingObserver, config)
    }
}

impl<S: RenderingSurface, O: RetrievalObserver> MessageRetriever<S, O> {
    pub fn with_observer(
        surface: S,
        observer: O,
        config: &RetrieverConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            surface,
            observer,
            scroller: ConvergenceScroller::from_config(config),
            limit_policy: config.limit_policy,
            cache: None,
        })
    }

    /// Memoize stable convergence across calls.
    pub fn with_cache(mut self, cache: Arc<ConvergenceCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn cache(&self) -> Option<&Arc<ConvergenceCache>> {
        self.cache.as_ref()
    }

    /// Load as much of the chat's history as the surface yields, then return
    /// the filtered, normalized messages earliest first.
    pub async fn fetch_messages(
        &self,
        chat: &ChatHandle,
        options: &SearchOptions,
    ) -> Result<Vec<ChatMessage>, SurfaceError> {
        Ok(self.retrieve(chat, options).await?.messages)
    }

    /// Like [`fetch_messages`](Self::fetch_messages) but also returns the
    /// convergence report and extraction counters.
    #[tracing::instrument(
        name = "retrieve_messages",
        skip(self, chat, options),
        fields(
            chat = %chat,
            surface = self.surface.name(),
            from_me = ?options.from_me,
        )
    )]
    pub async fn retrieve(
        &self,
        chat: &ChatHandle,
        options: &SearchOptions,
    ) -> Result<Retrieval, SurfaceError> {
        let (convergence, from_cache) = self.converge(chat).await?;

        let outcome =
            MessageExtractor::extract(&self.surface, &self.observer, chat, options).await?;
        let messages = self.apply_limit(chat, options, outcome.messages);

        tracing::debug!(
            outcome = %convergence.outcome,
            returned = messages.len(),
            dropped = outcome.stats.dropped,
            "Retrieval complete"
        );

        Ok(Retrieval {
            messages,
            convergence,
            from_cache,
            stats: outcome.stats,
        })
    }

    /// Run only the convergence scroller, consulting the cache if present.
    pub async fn converge(
        &self,
        chat: &ChatHandle,
    ) -> Result<(ConvergenceReport, bool), SurfaceError> {
        if let Some(report) = self.cache.as_ref().and_then(|c| c.get(chat)) {
            tracing::debug!(chat = %chat, "Convergence cache hit; skipping scroll");
            return Ok((report, true));
        }

        let report = self.scroller.run(&self.surface, &self.observer, chat).await?;
        if let Some(cache) = &self.cache {
            cache.record(chat, &report);
        }
        Ok((report, false))
    }

    fn apply_limit(
        &self,
        chat: &ChatHandle,
        options: &SearchOptions,
        mut messages: Vec<ChatMessage>,
    ) -> Vec<ChatMessage> {
        let Some(limit) = options.limit.count() else {
            return messages;
        };
        if messages.len() <= limit {
            return messages;
        }

        match self.limit_policy {
            LimitPolicy::Ignore => {
                self.observer.limit_ignored(chat, limit, messages.len());
            }
            LimitPolicy::KeepLatest => {
                let excess = messages.len() - limit;
                messages.drain(..excess);
            }
        }
        messages
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

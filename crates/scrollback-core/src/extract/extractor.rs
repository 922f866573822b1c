//! Message extractor.
//!
//! Reads the chat's in-memory message store, applies the authorship filter,
//! serializes the survivors in one batch on the surface, and normalizes the
//! records into `ChatMessage` values.
//!
//! Failures of individual records are reported and dropped. An unavailable
//! store degrades to an empty result. Only command-channel failures escape.

use serde::Serialize;

use scrollback_types::chat::ChatHandle;
use scrollback_types::error::{RecordError, SurfaceError};
use scrollback_types::message::{ChatMessage, MessageModel};
use scrollback_types::search::SearchOptions;

use crate::observer::RetrievalObserver;
use crate::surface::rendering::RenderingSurface;

/// Counters describing what happened to the store's contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionStats {
    pub store_available: bool,
    /// Models in the store.
    pub total: usize,
    /// Models removed by the authorship filter.
    pub filtered_out: usize,
    /// Records dropped by serialization or normalization failures.
    pub dropped: usize,
}

/// Messages plus the counters that produced them.
#[derive(Debug, Clone, Default)]
pub struct ExtractionOutcome {
    pub messages: Vec<ChatMessage>,
    pub stats: ExtractionStats,
}

/// Stateless extractor; all inputs are passed per call.
pub struct MessageExtractor;

impl MessageExtractor {
    pub async fn extract<S, O>(
        surface: &S,
        observer: &O,
        chat: &ChatHandle,
        options: &SearchOptions,
    ) -> Result<ExtractionOutcome, SurfaceError>
    where
        S: RenderingSurface,
        O: RetrievalObserver,
    {
        let Some(models) = surface.message_models(chat).await? else {
            observer.store_unavailable(chat);
            return Ok(ExtractionOutcome::default());
        };

        let total = models.len();
        let retained: Vec<MessageModel> = models
            .into_iter()
            .filter(|m| options.accepts(m.from_me))
            .collect();

        let mut stats = ExtractionStats {
            store_available: true,
            total,
            filtered_out: total - retained.len(),
            dropped: 0,
        };

        if retained.is_empty() {
            return Ok(ExtractionOutcome {
                messages: Vec::new(),
                stats,
            });
        }

        let serialized = surface.serialize_models(chat, &retained).await?;
        if serialized.len() != retained.len() {
            tracing::warn!(
                chat = %chat,
                requested = retained.len(),
                returned = serialized.len(),
                "Surface returned a serialization batch of unexpected size"
            );
        }

        let session = surface.session();
        let mut messages = Vec::with_capacity(serialized.len());

        for result in serialized {
            let normalized: Result<ChatMessage, RecordError> =
                result.and_then(|record| ChatMessage::from_record(session, chat, record));
            match normalized {
                Ok(message) => messages.push(message),
                Err(error) => {
                    observer.record_dropped(chat, &error);
                    stats.dropped += 1;
                }
            }
        }

        Ok(ExtractionOutcome { messages, stats })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use serde_json::json;

    use super::*;
    use crate::testing::{Event, RecordingObserver, ScriptedSurface, chat, model};

    fn keys(messages: &[ChatMessage]) -> Vec<&str> {
        messages.iter().map(|m| m.id.serialized.as_str()).collect()
    }

    #[tokio::test]
    async fn test_no_filter_returns_everything_in_order() {
        let surface = ScriptedSurface::new().with_models(vec![
            model("a", false, 1),
            model("b", true, 2),
            model("c", false, 3),
        ]);
        let observer = RecordingObserver::default();

        let outcome = MessageExtractor::extract(&surface, &observer, &chat(), &SearchOptions::default())
            .await
            .unwrap();

        assert_eq!(keys(&outcome.messages), vec!["a", "b", "c"]);
        assert_eq!(outcome.stats.total, 3);
        assert_eq!(outcome.stats.filtered_out, 0);
        assert_eq!(outcome.stats.dropped, 0);
        assert!(observer.events().is_empty());
    }

    #[tokio::test]
    async fn test_from_me_filter_keeps_relative_order() {
        let surface = ScriptedSurface::new().with_models(vec![
            model("a", true, 1),
            model("b", false, 2),
            model("c", true, 3),
            model("d", false, 4),
            model("e", true, 5),
        ]);
        let observer = RecordingObserver::default();

        let mine = MessageExtractor::extract(&surface, &observer, &chat(), &SearchOptions::from_me(true))
            .await
            .unwrap();
        assert_eq!(keys(&mine.messages), vec!["a", "c", "e"]);
        assert!(mine.messages.iter().all(|m| m.from_me));
        assert_eq!(mine.stats.filtered_out, 2);

        let theirs =
            MessageExtractor::extract(&surface, &observer, &chat(), &SearchOptions::from_me(false))
                .await
                .unwrap();
        assert_eq!(keys(&theirs.messages), vec!["b", "d"]);
    }

    #[tokio::test]
    async fn test_authorship_comes_from_model_when_payload_omits_it() {
        let mut sent = model("a", true, 1);
        sent.payload = json!({"id": {"_serialized": "a"}, "t": 1});
        let mut received = model("b", false, 2);
        received.payload = json!({"id": {"_serialized": "b", "fromMe": true}, "t": 2});
        let surface = ScriptedSurface::new().with_models(vec![sent, received]);
        let observer = RecordingObserver::default();

        let mine = MessageExtractor::extract(&surface, &observer, &chat(), &SearchOptions::from_me(true))
            .await
            .unwrap();
        assert_eq!(keys(&mine.messages), vec!["a"]);
        assert!(mine.messages[0].from_me);
        assert!(mine.messages[0].id.from_me);

        let theirs =
            MessageExtractor::extract(&surface, &observer, &chat(), &SearchOptions::from_me(false))
                .await
                .unwrap();
        assert_eq!(keys(&theirs.messages), vec!["b"]);
        assert!(!theirs.messages[0].from_me);
    }

    #[tokio::test]
    async fn test_serialization_failure_is_isolated() {
        let surface = ScriptedSurface::new()
            .with_models(vec![model("a", false, 1), model("b", false, 2), model("c", false, 3)])
            .failing_on("b");
        let observer = RecordingObserver::default();

        let outcome = MessageExtractor::extract(&surface, &observer, &chat(), &SearchOptions::default())
            .await
            .unwrap();

        assert_eq!(keys(&outcome.messages), vec!["a", "c"]);
        assert_eq!(outcome.stats.dropped, 1);
        assert_eq!(observer.events(), vec![Event::RecordDropped("b".to_string())]);
    }

    #[tokio::test]
    async fn test_malformed_record_is_dropped() {
        let mut broken = model("b", false, 2);
        broken.payload = json!({"id": {"_serialized": "b"}, "body": "missing timestamp"});
        let surface = ScriptedSurface::new().with_models(vec![model("a", false, 1), broken]);
        let observer = RecordingObserver::default();

        let outcome = MessageExtractor::extract(&surface, &observer, &chat(), &SearchOptions::default())
            .await
            .unwrap();

        assert_eq!(keys(&outcome.messages), vec!["a"]);
        assert_eq!(outcome.stats.dropped, 1);
    }

    #[tokio::test]
    async fn test_filter_applies_before_serialization_failures() {
        // "b" would fail to serialize but is filtered out first, so nothing is dropped.
        let surface = ScriptedSurface::new()
            .with_models(vec![model("a", true, 1), model("b", false, 2), model("c", true, 3)])
            .failing_on("b");
        let observer = RecordingObserver::default();

        let outcome = MessageExtractor::extract(&surface, &observer, &chat(), &SearchOptions::from_me(true))
            .await
            .unwrap();

        assert_eq!(keys(&outcome.messages), vec!["a", "c"]);
        assert_eq!(outcome.stats.filtered_out, 1);
        assert_eq!(outcome.stats.dropped, 0);
        assert!(observer.events().is_empty());
    }

    #[tokio::test]
    async fn test_store_unavailable_yields_empty() {
        let surface = ScriptedSurface::new().without_store();
        let observer = RecordingObserver::default();

        let outcome = MessageExtractor::extract(&surface, &observer, &chat(), &SearchOptions::default())
            .await
            .unwrap();

        assert!(outcome.messages.is_empty());
        assert!(!outcome.stats.store_available);
        assert_eq!(observer.events(), vec![Event::StoreUnavailable]);
        assert_eq!(surface.serialize_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_everything_filtered_skips_serialization() {
        let surface = ScriptedSurface::new().with_models(vec![model("a", false, 1)]);

        let outcome = MessageExtractor::extract(
            &surface,
            &RecordingObserver::default(),
            &chat(),
            &SearchOptions::from_me(true),
        )
        .await
        .unwrap();

        assert!(outcome.messages.is_empty());
        assert!(outcome.stats.store_available);
        assert_eq!(surface.serialize_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_messages_bound_to_session() {
        let surface = ScriptedSurface::new().with_models(vec![model("a", true, 1_700_000_000)]);

        let outcome = MessageExtractor::extract(
            &surface,
            &RecordingObserver::default(),
            &chat(),
            &SearchOptions::default(),
        )
        .await
        .unwrap();

        let msg = &outcome.messages[0];
        assert_eq!(msg.session_id, surface.session().id);
        assert_eq!(msg.chat, chat());
        assert_eq!(msg.body, "body of a");
    }

    #[tokio::test]
    async fn test_disconnect_propagates() {
        let surface = ScriptedSurface::new().disconnected();
        let result = MessageExtractor::extract(
            &surface,
            &RecordingObserver::default(),
            &chat(),
            &SearchOptions::default(),
        )
        .await;
        assert!(result.is_err());
    }
}

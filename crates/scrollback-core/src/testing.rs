//! Scripted surface and recording observer shared by the unit tests.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use serde_json::json;

use scrollback_types::chat::{ChatHandle, SessionInfo};
use scrollback_types::error::{RecordError, SurfaceError};
use scrollback_types::message::{MessageModel, RawMessageRecord};
use scrollback_types::scroll::{
    ContainerRef, ConvergenceOutcome, ConvergenceReport, LookupStrategy, ScrollProbe,
};

use crate::observer::RetrievalObserver;
use crate::surface::rendering::RenderingSurface;

pub fn chat() -> ChatHandle {
    ChatHandle::new("12345@c.us").unwrap()
}

/// A store model whose payload serializes into a well-formed record.
pub fn model(key: &str, from_me: bool, t: i64) -> MessageModel {
    MessageModel {
        key: key.to_string(),
        from_me,
        payload: json!({
            "id": {"_serialized": key, "remote": "12345@c.us", "fromMe": from_me},
            "t": t,
            "type": "chat",
            "body": format!("body of {key}"),
        }),
    }
}

/// Surface whose extents, containers and store contents are fixed up front.
pub struct ScriptedSurface {
    session: SessionInfo,
    /// Selectors that resolve to a container.
    pub matching: Vec<String>,
    /// Selectors the surface rejects with an evaluation error.
    pub rejected: Vec<String>,
    /// Extent after each successive scroll command.
    after_extents: Mutex<VecDeque<u64>>,
    current_extent: Mutex<u64>,
    pub models: Option<Vec<MessageModel>>,
    /// Model keys whose serialization fails.
    pub failing: HashSet<String>,
    pub disconnected: bool,
    pub scroll_commands: AtomicU32,
    pub lookups: AtomicU32,
    pub serialize_calls: AtomicU32,
}

impl ScriptedSurface {
    pub fn new() -> Self {
        Self {
            session: SessionInfo::new("me@c.us"),
            matching: vec!["#panel".to_string()],
            rejected: Vec::new(),
            after_extents: Mutex::new(VecDeque::new()),
            current_extent: Mutex::new(0),
            models: Some(Vec::new()),
            failing: HashSet::new(),
            disconnected: false,
            scroll_commands: AtomicU32::new(0),
            lookups: AtomicU32::new(0),
            serialize_calls: AtomicU32::new(0),
        }
    }

    pub fn with_extents(self, extents: &[u64]) -> Self {
        *self.after_extents.lock().unwrap() = extents.iter().copied().collect();
        self
    }

    pub fn without_container(mut self) -> Self {
        self.matching.clear();
        self
    }

    pub fn with_models(mut self, models: Vec<MessageModel>) -> Self {
        self.models = Some(models);
        self
    }

    pub fn without_store(mut self) -> Self {
        self.models = None;
        self
    }

    pub fn failing_on(mut self, key: &str) -> Self {
        self.failing.insert(key.to_string());
        self
    }

    pub fn disconnected(mut self) -> Self {
        self.disconnected = true;
        self
    }

    pub fn scrolls(&self) -> u32 {
        self.scroll_commands.load(Ordering::SeqCst)
    }

    fn check_connected(&self) -> Result<(), SurfaceError> {
        if self.disconnected {
            Err(SurfaceError::Disconnected("session closed".to_string()))
        } else {
            Ok(())
        }
    }
}

impl RenderingSurface for ScriptedSurface {
    fn name(&self) -> &str {
        "scripted"
    }

    fn session(&self) -> &SessionInfo {
        &self.session
    }

    async fn find_container(
        &self,
        _chat: &ChatHandle,
        selector: &str,
    ) -> Result<Option<String>, SurfaceError> {
        self.check_connected()?;
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.rejected.iter().any(|s| s == selector) {
            return Err(SurfaceError::Evaluation(format!("invalid selector {selector}")));
        }
        Ok(self
            .matching
            .iter()
            .any(|s| s == selector)
            .then(|| format!("node:{selector}")))
    }

    async fn scroll_extent(&self, _container: &ContainerRef) -> Result<u64, SurfaceError> {
        self.check_connected()?;
        Ok(*self.current_extent.lock().unwrap())
    }

    async fn scroll_to_origin(&self, _container: &ContainerRef) -> Result<(), SurfaceError> {
        self.check_connected()?;
        self.scroll_commands.fetch_add(1, Ordering::SeqCst);
        if let Some(next) = self.after_extents.lock().unwrap().pop_front() {
            *self.current_extent.lock().unwrap() = next;
        }
        Ok(())
    }

    async fn message_models(
        &self,
        _chat: &ChatHandle,
    ) -> Result<Option<Vec<MessageModel>>, SurfaceError> {
        self.check_connected()?;
        Ok(self.models.clone())
    }

    async fn serialize_models(
        &self,
        _chat: &ChatHandle,
        models: &[MessageModel],
    ) -> Result<Vec<Result<RawMessageRecord, RecordError>>, SurfaceError> {
        self.check_connected()?;
        self.serialize_calls.fetch_add(1, Ordering::SeqCst);
        Ok(models
            .iter()
            .map(|m| {
                if self.failing.contains(&m.key) {
                    return Err(RecordError::Serialization {
                        key: m.key.clone(),
                        reason: "cyclic structure".to_string(),
                    });
                }
                match &m.payload {
                    serde_json::Value::Object(fields) => {
                        Ok(RawMessageRecord::for_model(m, fields.clone()))
                    }
                    _ => Err(RecordError::Serialization {
                        key: m.key.clone(),
                        reason: "payload is not an object".to_string(),
                    }),
                }
            })
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Attempt(u32),
    ContainerMissing,
    Converged(ConvergenceOutcome),
    StoreUnavailable,
    RecordDropped(String),
    LimitIgnored { limit: usize, returned: usize },
}

/// Observer that keeps every event for later assertions.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<Event>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl RetrievalObserver for RecordingObserver {
    fn attempt(&self, _chat: &ChatHandle, attempt: u32, _probe: &ScrollProbe) {
        self.push(Event::Attempt(attempt));
    }

    fn container_missing(&self, _chat: &ChatHandle, _tried: &[LookupStrategy]) {
        self.push(Event::ContainerMissing);
    }

    fn converged(&self, _chat: &ChatHandle, report: &ConvergenceReport) {
        self.push(Event::Converged(report.outcome));
    }

    fn store_unavailable(&self, _chat: &ChatHandle) {
        self.push(Event::StoreUnavailable);
    }

    fn record_dropped(&self, _chat: &ChatHandle, error: &RecordError) {
        self.push(Event::RecordDropped(error.key().to_string()));
    }

    fn limit_ignored(&self, _chat: &ChatHandle, limit: usize, returned: usize) {
        self.push(Event::LimitIgnored { limit, returned });
    }
}

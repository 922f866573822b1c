//! `RenderingSurface` implementation over a `SessionSnapshot`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use serde::Serialize;
use thiserror::Error;

use scrollback_core::surface::rendering::RenderingSurface;
use scrollback_types::chat::{ChatHandle, SessionInfo};
use scrollback_types::error::{RecordError, SurfaceError};
use scrollback_types::message::{MessageModel, RawMessageRecord};
use scrollback_types::scroll::ContainerRef;

use super::format::{ChatSnapshot, SessionSnapshot};

const NODE_PREFIX: &str = "snapshot-container:";

/// Errors from loading a snapshot file.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse snapshot {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("snapshot lists chat '{0}' more than once")]
    DuplicateChat(ChatHandle),

    #[error("chat '{0}' has a page height of zero")]
    ZeroPageHeight(ChatHandle),
}

/// Listing entry for one chat of the snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct ChatSummary {
    pub handle: ChatHandle,
    pub name: Option<String>,
    pub pages: usize,
    pub revealed_pages: usize,
    pub messages: usize,
    pub has_container: bool,
    pub store_available: bool,
}

/// Replays a recorded session as a rendering surface.
///
/// Every chat starts with its newest page materialized. Each
/// `scroll_to_origin` reveals one older page until the history is exhausted,
/// after which the extent stops growing.
pub struct SnapshotSurface {
    session: SessionInfo,
    chats: Vec<ChatSnapshot>,
    index: HashMap<ChatHandle, usize>,
    revealed: DashMap<ChatHandle, usize>,
    closed: AtomicBool,
}

impl SnapshotSurface {
    /// Read and validate a snapshot file.
    pub async fn load(path: &Path) -> Result<Self, SnapshotError> {
        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| SnapshotError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;

        let snapshot: SessionSnapshot =
            serde_json::from_str(&content).map_err(|source| SnapshotError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let surface = Self::from_snapshot(snapshot)?;
        tracing::info!(
            path = %path.display(),
            chats = surface.chats.len(),
            "Loaded session snapshot"
        );
        Ok(surface)
    }

    pub fn from_snapshot(snapshot: SessionSnapshot) -> Result<Self, SnapshotError> {
        let mut index = HashMap::with_capacity(snapshot.chats.len());
        for (position, chat) in snapshot.chats.iter().enumerate() {
            if chat.page_height == 0 {
                return Err(SnapshotError::ZeroPageHeight(chat.handle.clone()));
            }
            if index.insert(chat.handle.clone(), position).is_some() {
                return Err(SnapshotError::DuplicateChat(chat.handle.clone()));
            }
        }

        let mut session = SessionInfo::new(snapshot.own_id);
        session.label = snapshot.label;

        let revealed = snapshot
            .chats
            .iter()
            .map(|chat| (chat.handle.clone(), chat.pages.len().min(1)))
            .collect();

        Ok(Self {
            session,
            chats: snapshot.chats,
            index,
            revealed,
            closed: AtomicBool::new(false),
        })
    }

    pub fn contains(&self, chat: &ChatHandle) -> bool {
        self.index.contains_key(chat)
    }

    /// Summaries of every chat, in snapshot order.
    pub fn chats(&self) -> Vec<ChatSummary> {
        self.chats
            .iter()
            .map(|chat| ChatSummary {
                handle: chat.handle.clone(),
                name: chat.name.clone(),
                pages: chat.pages.len(),
                revealed_pages: self.revealed_pages(&chat.handle),
                messages: chat.message_count(),
                has_container: chat.container_selector.is_some(),
                store_available: chat.store_available,
            })
            .collect()
    }

    /// Collapse every chat back to its newest page.
    pub fn reset(&self) {
        for chat in &self.chats {
            self.revealed
                .insert(chat.handle.clone(), chat.pages.len().min(1));
        }
    }

    /// Sever the command channel. Every later command fails with
    /// `SurfaceError::Disconnected`.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<(), SurfaceError> {
        if self.is_closed() {
            return Err(SurfaceError::Disconnected(
                "snapshot surface closed".to_string(),
            ));
        }
        Ok(())
    }

    fn chat(&self, handle: &ChatHandle) -> Option<&ChatSnapshot> {
        self.index.get(handle).map(|&position| &self.chats[position])
    }

    fn revealed_pages(&self, handle: &ChatHandle) -> usize {
        self.revealed.get(handle).map(|r| *r).unwrap_or(0)
    }

    fn container_chat(&self, container: &ContainerRef) -> Result<&ChatSnapshot, SurfaceError> {
        container
            .node_id
            .strip_prefix(NODE_PREFIX)
            .and_then(|raw| ChatHandle::new(raw).ok())
            .and_then(|handle| self.chat(&handle))
            .ok_or_else(|| {
                SurfaceError::Evaluation(format!("unknown container node '{}'", container.node_id))
            })
    }
}

fn serialize_model(model: &MessageModel) -> Result<RawMessageRecord, RecordError> {
    match model.payload.as_object() {
        Some(fields) => Ok(RawMessageRecord::for_model(model, fields.clone())),
        None => Err(RecordError::Serialization {
            key: model.key.clone(),
            reason: format!("payload is not an object: {}", model.payload),
        }),
    }
}

impl RenderingSurface for SnapshotSurface {
    fn name(&self) -> &str {
        "snapshot"
    }

    fn session(&self) -> &SessionInfo {
        &self.session
    }

    async fn find_container(
        &self,
        chat: &ChatHandle,
        selector: &str,
    ) -> Result<Option<String>, SurfaceError> {
        self.ensure_open()?;
        let found = self
            .chat(chat)
            .and_then(|c| c.container_selector.as_deref())
            .is_some_and(|s| s == selector);
        Ok(found.then(|| format!("{NODE_PREFIX}{chat}")))
    }

    async fn scroll_extent(&self, container: &ContainerRef) -> Result<u64, SurfaceError> {
        self.ensure_open()?;
        let chat = self.container_chat(container)?;
        let pages = self.revealed_pages(&chat.handle) as u64;
        Ok(pages * chat.page_height)
    }

    async fn scroll_to_origin(&self, container: &ContainerRef) -> Result<(), SurfaceError> {
        self.ensure_open()?;
        let chat = self.container_chat(container)?;
        let total = chat.pages.len();
        let mut revealed = self.revealed.entry(chat.handle.clone()).or_insert(0);
        if *revealed < total {
            *revealed += 1;
            tracing::trace!(chat = %chat.handle, revealed = *revealed, total, "Revealed older page");
        }
        Ok(())
    }

    async fn message_models(
        &self,
        chat: &ChatHandle,
    ) -> Result<Option<Vec<MessageModel>>, SurfaceError> {
        self.ensure_open()?;
        let Some(snapshot) = self.chat(chat).filter(|c| c.store_available) else {
            return Ok(None);
        };

        let revealed = self.revealed_pages(chat).min(snapshot.pages.len());
        let models = snapshot.pages[..revealed]
            .iter()
            .rev()
            .flat_map(|page| page.iter().cloned())
            .collect();
        Ok(Some(models))
    }

    async fn serialize_models(
        &self,
        _chat: &ChatHandle,
        models: &[MessageModel],
    ) -> Result<Vec<Result<RawMessageRecord, RecordError>>, SurfaceError> {
        self.ensure_open()?;
        Ok(models.iter().map(serialize_model).collect())
    }
}

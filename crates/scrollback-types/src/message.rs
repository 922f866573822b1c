//! Message types for Scrollback.
//!
//! Three shapes a message passes through during one retrieval:
//! - [`MessageModel`]: the in-memory object held by the rendering surface's store
//! - [`RawMessageRecord`]: the untyped JSON object the surface serializes it into
//! - [`ChatMessage`]: the normalized domain message bound to the owning session

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chat::{ChatHandle, SessionInfo};
use crate::error::RecordError;

/// An in-memory message object as exposed by the rendering surface's store.
///
/// Only the authorship flag is read before serialization; the payload is
/// opaque to the retriever.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageModel {
    /// Store identifier of the model.
    pub key: String,
    /// Whether the session's own identity sent this message.
    pub from_me: bool,
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Untyped record produced by the surface's serialization step.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMessageRecord {
    /// Store key of the model this record was serialized from.
    pub key: String,
    /// Authorship flag of the source model. The serialized fields may omit it.
    pub from_me: bool,
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl RawMessageRecord {
    pub fn new(
        key: impl Into<String>,
        from_me: bool,
        fields: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        Self {
            key: key.into(),
            from_me,
            fields,
        }
    }

    /// Record carrying the model's key and authorship flag.
    pub fn for_model(model: &MessageModel, fields: serde_json::Map<String, serde_json::Value>) -> Self {
        Self::new(model.key.clone(), model.from_me, fields)
    }
}

/// Type of a chat message as reported by the surface (`type` field).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MessageKind {
    #[default]
    Chat,
    Image,
    Video,
    Audio,
    Ptt,
    Document,
    Sticker,
    Location,
    VCard,
    Revoked,
    /// Any type this crate does not model explicitly.
    Other(String),
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::Chat => write!(f, "chat"),
            MessageKind::Image => write!(f, "image"),
            MessageKind::Video => write!(f, "video"),
            MessageKind::Audio => write!(f, "audio"),
            MessageKind::Ptt => write!(f, "ptt"),
            MessageKind::Document => write!(f, "document"),
            MessageKind::Sticker => write!(f, "sticker"),
            MessageKind::Location => write!(f, "location"),
            MessageKind::VCard => write!(f, "vcard"),
            MessageKind::Revoked => write!(f, "revoked"),
            MessageKind::Other(name) => f.write_str(name),
        }
    }
}

impl FromStr for MessageKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "chat" => MessageKind::Chat,
            "image" => MessageKind::Image,
            "video" => MessageKind::Video,
            "audio" => MessageKind::Audio,
            "ptt" => MessageKind::Ptt,
            "document" => MessageKind::Document,
            "sticker" => MessageKind::Sticker,
            "location" => MessageKind::Location,
            "vcard" => MessageKind::VCard,
            "revoked" => MessageKind::Revoked,
            _ => MessageKind::Other(s.to_string()),
        })
    }
}

impl From<String> for MessageKind {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(kind) => kind,
            Err(never) => match never {},
        }
    }
}

impl From<MessageKind> for String {
    fn from(kind: MessageKind) -> Self {
        kind.to_string()
    }
}

/// Delivery acknowledgement level of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageAck {
    Error,
    Pending,
    Server,
    Device,
    Read,
    Played,
    Unknown,
}

impl MessageAck {
    /// Map the surface's numeric ack code (`-1..=4`).
    pub fn from_code(code: i64) -> Self {
        match code {
            -1 => MessageAck::Error,
            0 => MessageAck::Pending,
            1 => MessageAck::Server,
            2 => MessageAck::Device,
            3 => MessageAck::Read,
            4 => MessageAck::Played,
            _ => MessageAck::Unknown,
        }
    }
}

/// Identifier of a message as assigned by the messaging network.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId {
    /// Fully serialized id (`{fromMe}_{remote}_{id}`).
    pub serialized: String,
    /// Chat the id was issued in.
    pub remote: String,
    pub from_me: bool,
}

/// A normalized chat message bound to the session it was retrieved from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub session_id: Uuid,
    pub chat: ChatHandle,
    pub kind: MessageKind,
    pub body: String,
    pub timestamp: DateTime<Utc>,
    pub from: String,
    pub to: String,
    /// Sender inside a group chat.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub from_me: bool,
    pub ack: MessageAck,
    pub has_media: bool,
    pub has_quoted_msg: bool,
    pub is_forwarded: bool,
    pub forwarding_score: u32,
    pub is_starred: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mentioned_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct WireMessageId {
    #[serde(rename = "_serialized")]
    serialized: String,
    #[serde(default)]
    remote: String,
}

/// Record layout as emitted by the surface's serializer.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMessage {
    id: WireMessageId,
    t: i64,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    to: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    ack: Option<i64>,
    #[serde(default)]
    has_media: bool,
    #[serde(default)]
    has_quoted_msg: bool,
    #[serde(default)]
    is_forwarded: bool,
    #[serde(default)]
    forwarding_score: u32,
    #[serde(default)]
    is_starred: bool,
    #[serde(default)]
    mentioned_ids: Vec<String>,
}

impl ChatMessage {
    /// Build a domain message from a serialized record.
    ///
    /// Only `id._serialized` and `t` are required. A record that lacks them
    /// or carries wrongly-typed fields yields `RecordError::Malformed`.
    /// Authorship comes from the record's store flag, never from the fields.
    pub fn from_record(
        session: &SessionInfo,
        chat: &ChatHandle,
        record: RawMessageRecord,
    ) -> Result<Self, RecordError> {
        let RawMessageRecord {
            key,
            from_me,
            fields,
        } = record;

        let wire: WireMessage = serde_json::from_value(serde_json::Value::Object(fields))
            .map_err(|e| RecordError::Malformed {
                key: key.clone(),
                reason: e.to_string(),
            })?;

        let timestamp = DateTime::from_timestamp(wire.t, 0).ok_or_else(|| RecordError::Malformed {
            key: key.clone(),
            reason: format!("timestamp {} out of range", wire.t),
        })?;

        let remote = if wire.id.remote.is_empty() {
            chat.to_string()
        } else {
            wire.id.remote
        };

        Ok(Self {
            id: MessageId {
                serialized: wire.id.serialized,
                remote,
                from_me,
            },
            session_id: session.id,
            chat: chat.clone(),
            kind: wire.kind.map(MessageKind::from).unwrap_or_default(),
            body: wire.body.unwrap_or_default(),
            timestamp,
            from: wire.from.unwrap_or_default(),
            to: wire.to.unwrap_or_default(),
            author: wire.author.filter(|a| !a.is_empty()),
            from_me,
            ack: wire.ack.map_or(MessageAck::Unknown, MessageAck::from_code),
            has_media: wire.has_media,
            has_quoted_msg: wire.has_quoted_msg,
            is_forwarded: wire.is_forwarded,
            forwarding_score: wire.forwarding_score,
            is_starred: wire.is_starred,
            mentioned_ids: wire.mentioned_ids,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

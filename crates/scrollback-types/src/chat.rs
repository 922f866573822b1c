//! Chat handle and owning-session types.
//!
//! A `ChatHandle` addresses one conversation inside a live session. It is
//! supplied by the caller and never created by the retriever.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ConfigError;

/// Opaque identifier of a conversation within the session (e.g. `12345@c.us`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatHandle(String);

impl ChatHandle {
    /// Wrap a raw identifier. Returns an error for blank identifiers.
    pub fn new(raw: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::InvalidChatHandle(
                "chat handle must not be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChatHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ChatHandle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// The session that owns every message returned by a retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: Uuid,
    /// The session's own user identifier (the "me" in `from_me`).
    pub own_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl SessionInfo {
    pub fn new(own_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            own_id: own_id.into(),
            label: None,
        }
    }
}

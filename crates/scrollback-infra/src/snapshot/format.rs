//! On-disk format of a recorded session snapshot.

use serde::{Deserialize, Serialize};

use scrollback_types::chat::ChatHandle;
use scrollback_types::message::MessageModel;

/// A recorded messaging session: the owning identity plus every chat view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// The session's own user identifier.
    pub own_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub chats: Vec<ChatSnapshot>,
}

/// One chat view inside a snapshot.
///
/// `pages[0]` is the page materialized when the chat is first opened (the
/// most recent messages). Every later page is older than the one before it.
/// Messages inside a page are ordered earliest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSnapshot {
    pub handle: ChatHandle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Selector the chat's scroll container answers to. `None` means the
    /// container never renders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_selector: Option<String>,
    #[serde(default = "default_page_height")]
    pub page_height: u64,
    #[serde(default = "default_store_available")]
    pub store_available: bool,
    #[serde(default)]
    pub pages: Vec<Vec<MessageModel>>,
}

fn default_page_height() -> u64 {
    800
}

fn default_store_available() -> bool {
    true
}

impl ChatSnapshot {
    pub fn message_count(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }
}

use {anyhow::Result, async_trait::async_trait, serde::{Deserialize, Serialize}};

use crate::group::is_group_id;

/// A conversation visible to the session, fetched fresh each pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub kind: ConversationKind,
    /// Display name; absent for chats the backend has no name for.
    pub name: Option<String>,
}

/// Conversation class, derived from the identifier suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationKind {
    Group,
    Other,
}

impl ConversationKind {
    /// Classify an identifier by its suffix.
    pub fn of(id: &str) -> Self {
        if is_group_id(id) {
            Self::Group
        } else {
            Self::Other
        }
    }
}

impl Conversation {
    /// Build a conversation from raw backend data, deriving the kind.
    pub fn from_raw(id: String, name: Option<String>) -> Self {
        let kind = ConversationKind::of(&id);
        Self { id, kind, name }
    }
}

/// Session health snapshot.
#[derive(Debug, Clone)]
pub struct SessionHealth {
    pub connected: bool,
    pub detail: Option<String>,
}

/// An authenticated messaging session. One per process.
#[async_trait]
pub trait ChatSession: Send + Sync {
    /// Full conversation list visible to the session.
    async fn list_conversations(&self) -> Result<Vec<Conversation>>;

    /// Full metadata for a single conversation.
    async fn conversation_details(&self, id: &str) -> Result<Conversation>;

    /// Send a plain text message.
    async fn send_text(&self, to: &str, text: &str) -> Result<()>;

    /// Send a file with an optional caption (empty string for none).
    async fn send_file(&self, to: &str, data: &[u8], filename: &str, caption: &str) -> Result<()>;

    /// Probe session health. Never fails; an unreachable backend reports
    /// `connected: false` with a detail message.
    async fn probe(&self) -> SessionHealth;
}

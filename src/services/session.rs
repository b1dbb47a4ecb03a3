use crate::types::ChatHistory;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Handle to one session; held locked for the duration of a turn.
pub type SessionHandle = Arc<Mutex<ChatSession>>;

/// Transient in-memory chat sessions, one per open chat page.
///
/// Nothing is persisted; a restart starts every session from scratch.
pub struct SessionManager {
    sessions: HashMap<String, SessionHandle>,
}

pub struct ChatSession {
    pub id: String,
    pub history: ChatHistory,
}

impl ChatSession {
    fn new(id: String) -> Self {
        Self {
            id,
            history: ChatHistory::new(),
        }
    }
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }

    /// Fresh id for a new page; the session itself is created on its first turn
    pub fn new_id() -> String {
        Uuid::now_v7().to_string()
    }

    pub fn get(&self, id: &str) -> Option<SessionHandle> {
        self.sessions.get(id).cloned()
    }

    /// Look up a session, creating it under the given id if unknown
    pub fn get_or_create(&mut self, id: &str) -> SessionHandle {
        self.sessions
            .entry(id.to_string())
            .or_insert_with(|| {
                tracing::debug!("Created session {}", id);
                Arc::new(Mutex::new(ChatSession::new(id.to_string())))
            })
            .clone()
    }

    pub fn count(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

use std::{collections::HashMap, sync::Arc};

use teloxide::types::ChatId;
use tokio::sync::Mutex;

/// Per-chat conversation progress. A chat with no value is idle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Conversation {
    AwaitingUsername,
}

/// In-memory conversation state, keyed by chat id.
///
/// Never persisted: a restart drops it and the user resends `/start`.
#[derive(Clone, Default)]
pub(crate) struct StateStore {
    inner: Arc<Mutex<HashMap<ChatId, Conversation>>>,
}

impl StateStore {
    pub(crate) async fn get(&self, chat_id: ChatId) -> Option<Conversation> {
        let guard = self.inner.lock().await;
        guard.get(&chat_id).copied()
    }

    pub(crate) async fn set(&self, chat_id: ChatId, state: Conversation) {
        let mut guard = self.inner.lock().await;
        guard.insert(chat_id, state);
    }

    pub(crate) async fn clear(&self, chat_id: ChatId) {
        let mut guard = self.inner.lock().await;
        guard.remove(&chat_id);
    }
}

//! Deferred notifications for users the bot could not message yet.
//!
//! Entries live for the lifetime of the process. A user appears in the store
//! only while at least one message is waiting for them.

use async_trait::async_trait;
use std::collections::HashMap;
use teloxide::types::UserId;
use tokio::sync::Mutex;

/// Queue of messages waiting for users to open a private chat with the bot.
#[async_trait]
pub trait PendingStore: Send + Sync {
    /// Queue a message for a user, after any already queued.
    async fn append(&self, user: UserId, text: String);

    /// Remove and return everything queued for a user, oldest first.
    async fn take_all(&self, user: UserId) -> Vec<String>;
}

/// In-memory, mutex-guarded [`PendingStore`].
#[derive(Debug, Default)]
pub struct InMemoryPendingStore {
    inner: Mutex<HashMap<UserId, Vec<String>>>,
}

impl InMemoryPendingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users with queued messages.
    pub async fn user_count(&self) -> usize {
        self.inner.lock().await.len()
    }

    /// Number of messages queued for a user.
    pub async fn pending_count(&self, user: UserId) -> usize {
        self.inner.lock().await.get(&user).map_or(0, Vec::len)
    }
}

#[async_trait]
impl PendingStore for InMemoryPendingStore {
    async fn append(&self, user: UserId, text: String) {
        let mut map = self.inner.lock().await;
        map.entry(user).or_default().push(text);
    }

    async fn take_all(&self, user: UserId) -> Vec<String> {
        self.inner.lock().await.remove(&user).unwrap_or_default()
    }
}

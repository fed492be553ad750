use crate::types::{Topic, UserId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Committed topic lists per user. Lives for the lifetime of the process.
#[derive(Clone, Default)]
pub struct PreferenceStore {
    records: Arc<RwLock<HashMap<UserId, Vec<Topic>>>>,
}

impl PreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, user: UserId) -> Option<Vec<Topic>> {
        self.records.read().await.get(&user).cloned()
    }

    /// Overwrites the whole record.
    pub async fn set(&self, user: UserId, topics: Vec<Topic>) {
        info!("Stored {} topics for user {}", topics.len(), user);
        self.records.write().await.insert(user, topics);
    }

    /// Snapshot of every user with a record, in ascending id order.
    pub async fn users(&self) -> Vec<UserId> {
        let mut users: Vec<UserId> = self.records.read().await.keys().copied().collect();
        users.sort();
        users
    }
}

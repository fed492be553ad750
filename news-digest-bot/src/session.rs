use crate::preferences::PreferenceStore;
use crate::types::{Topic, UserId};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Outcome of trying to commit a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed(Vec<Topic>),
    /// Nothing selected, or no session at all. The session is left as it was.
    Rejected,
}

/// In-progress topic selections, keyed by user.
///
/// Each operation runs under one write lock, so concurrent toggles for the
/// same user are applied one after the other.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<UserId, BTreeSet<Topic>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or replaces the user's session, seeded with `seed`.
    pub async fn open(&self, user: UserId, seed: &[Topic]) {
        let selection: BTreeSet<Topic> = seed.iter().copied().collect();
        debug!("Opening session for user {} with {} topics", user, selection.len());
        self.sessions.write().await.insert(user, selection);
    }

    pub async fn is_open(&self, user: UserId) -> bool {
        self.sessions.read().await.contains_key(&user)
    }

    pub async fn current(&self, user: UserId) -> Option<BTreeSet<Topic>> {
        self.sessions.read().await.get(&user).cloned()
    }

    /// Flips membership of `topic`, starting from an empty selection when no
    /// session exists. Returns the resulting selection.
    pub async fn toggle(&self, user: UserId, topic: Topic) -> BTreeSet<Topic> {
        let mut sessions = self.sessions.write().await;
        let selection = sessions.entry(user).or_default();
        if !selection.remove(&topic) {
            selection.insert(topic);
        }
        selection.clone()
    }

    /// Moves the selection into `preferences` and closes the session.
    pub async fn commit(&self, user: UserId, preferences: &PreferenceStore) -> CommitOutcome {
        let mut sessions = self.sessions.write().await;
        let topics: Vec<Topic> = match sessions.get(&user) {
            Some(selection) if !selection.is_empty() => selection.iter().copied().collect(),
            _ => return CommitOutcome::Rejected,
        };

        preferences.set(user, topics.clone()).await;
        sessions.remove(&user);
        info!("User {} committed topics {:?}", user, topics);
        CommitOutcome::Committed(topics)
    }
}

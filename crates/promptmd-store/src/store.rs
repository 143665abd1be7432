//! Shared in-memory state and feed republication.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tracing::trace;

use promptmd_core::models::{Rating, SaveEdge, Tool, ToolStatus};

use crate::ratings::MemoryRatingStore;
use crate::saves::MemorySaveStore;
use crate::tools::MemoryToolStore;

/// In-memory record store.
///
/// Owns one repository per entity family, all sharing the same state. The
/// watch channels backing the snapshot feeds live inside the state so every
/// mutation republishes the feeds it affected before releasing the lock,
/// so a subscriber can never observe a snapshot older than a completed
/// write.
pub struct MemoryStore {
    pub tools: MemoryToolStore,
    pub saves: MemorySaveStore,
    pub ratings: MemoryRatingStore,
}

impl MemoryStore {
    pub fn new() -> Self {
        let inner = Arc::new(StoreInner::default());
        Self {
            tools: MemoryToolStore::new(inner.clone()),
            saves: MemorySaveStore::new(inner.clone()),
            ratings: MemoryRatingStore::new(inner),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// State shared by the three repositories.
#[derive(Default)]
pub(crate) struct StoreInner {
    state: Mutex<StoreState>,
}

#[derive(Default)]
pub(crate) struct StoreState {
    pub(crate) tools: HashMap<String, Tool>,
    /// user_id → tool_id → edge.
    pub(crate) edges: HashMap<String, HashMap<String, SaveEdge>>,
    /// rating id → rating.
    pub(crate) ratings: HashMap<String, Rating>,

    published_tx: Option<watch::Sender<Vec<Tool>>>,
    drafts_tx: HashMap<String, watch::Sender<Vec<Tool>>>,
    saved_tx: HashMap<String, watch::Sender<HashSet<String>>>,
}

impl StoreInner {
    /// Lock the state. A poisoned lock still holds consistent data (every
    /// mutation completes its map writes before publishing), so recover
    /// rather than propagate.
    pub(crate) fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StoreState {
    /// All published tools, feed order (`updated_at` desc, id asc).
    fn published_snapshot(&self) -> Vec<Tool> {
        let mut tools: Vec<Tool> = self
            .tools
            .values()
            .filter(|t| t.status == ToolStatus::Published)
            .cloned()
            .collect();
        sort_feed(&mut tools);
        tools
    }

    /// `author_id`'s drafts, feed order.
    fn drafts_snapshot(&self, author_id: &str) -> Vec<Tool> {
        let mut tools: Vec<Tool> = self
            .tools
            .values()
            .filter(|t| t.status == ToolStatus::Draft && t.author_id == author_id)
            .cloned()
            .collect();
        sort_feed(&mut tools);
        tools
    }

    /// `user_id`'s saved tool ids.
    fn saved_snapshot(&self, user_id: &str) -> HashSet<String> {
        self.edges
            .get(user_id)
            .map(|edges| edges.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Subscribe to the published feed, creating the channel on first use.
    pub(crate) fn subscribe_published(&mut self) -> watch::Receiver<Vec<Tool>> {
        if let Some(tx) = &self.published_tx {
            return tx.subscribe();
        }
        let (tx, rx) = watch::channel(self.published_snapshot());
        self.published_tx = Some(tx);
        rx
    }

    /// Subscribe to an author's drafts feed, creating the channel on first
    /// use.
    pub(crate) fn subscribe_drafts(&mut self, author_id: &str) -> watch::Receiver<Vec<Tool>> {
        if let Some(tx) = self.drafts_tx.get(author_id) {
            return tx.subscribe();
        }
        let (tx, rx) = watch::channel(self.drafts_snapshot(author_id));
        self.drafts_tx.insert(author_id.to_string(), tx);
        rx
    }

    /// Subscribe to a user's saved-id feed, creating the channel on first
    /// use.
    pub(crate) fn subscribe_saved(&mut self, user_id: &str) -> watch::Receiver<HashSet<String>> {
        if let Some(tx) = self.saved_tx.get(user_id) {
            return tx.subscribe();
        }
        let (tx, rx) = watch::channel(self.saved_snapshot(user_id));
        self.saved_tx.insert(user_id.to_string(), tx);
        rx
    }

    /// Republish the published feed and one author's drafts feed after a
    /// tool mutation.
    pub(crate) fn publish_tool_feeds(&mut self, author_id: &str) {
        if let Some(tx) = &self.published_tx {
            let snapshot = self.published_snapshot();
            trace!(feed = "published", snapshot_size = snapshot.len(), "feed push");
            tx.send_replace(snapshot);
        }
        if let Some(tx) = self.drafts_tx.get(author_id) {
            let snapshot = self.drafts_snapshot(author_id);
            trace!(feed = "drafts", snapshot_size = snapshot.len(), "feed push");
            tx.send_replace(snapshot);
        }
    }

    /// Republish one user's saved-id feed after an edge mutation.
    pub(crate) fn publish_saved_feed(&mut self, user_id: &str) {
        if let Some(tx) = self.saved_tx.get(user_id) {
            let snapshot = self.saved_snapshot(user_id);
            trace!(feed = "saved", snapshot_size = snapshot.len(), "feed push");
            tx.send_replace(snapshot);
        }
    }
}

/// Feed order: `updated_at` descending, id ascending as tiebreak.
fn sort_feed(tools: &mut [Tool]) {
    tools.sort_by(|a, b| {
        b.updated_at
            .cmp(&a.updated_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}

//! Save-edge repository implementation.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::watch;

use promptmd_core::{Result, SaveEdge, SaveEdgeStore};

use crate::store::StoreInner;

/// In-memory implementation of [`SaveEdgeStore`]. Clones share state.
#[derive(Clone)]
pub struct MemorySaveStore {
    inner: Arc<StoreInner>,
}

impl MemorySaveStore {
    pub(crate) fn new(inner: Arc<StoreInner>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl SaveEdgeStore for MemorySaveStore {
    async fn save(&self, user_id: &str, tool_id: &str) -> Result<bool> {
        let mut state = self.inner.lock();
        let edges = state.edges.entry(user_id.to_string()).or_default();
        if edges.contains_key(tool_id) {
            return Ok(false);
        }
        edges.insert(
            tool_id.to_string(),
            SaveEdge {
                user_id: user_id.to_string(),
                tool_id: tool_id.to_string(),
                saved_at: Utc::now(),
            },
        );
        state.publish_saved_feed(user_id);
        Ok(true)
    }

    async fn unsave(&self, user_id: &str, tool_id: &str) -> Result<bool> {
        let mut state = self.inner.lock();
        let removed = state
            .edges
            .get_mut(user_id)
            .map(|edges| edges.remove(tool_id).is_some())
            .unwrap_or(false);
        if removed {
            state.publish_saved_feed(user_id);
        }
        Ok(removed)
    }

    async fn saved_ids(&self, user_id: &str) -> Result<HashSet<String>> {
        let state = self.inner.lock();
        Ok(state
            .edges
            .get(user_id)
            .map(|edges| edges.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn watch_saved(&self, user_id: &str) -> watch::Receiver<HashSet<String>> {
        self.inner.lock().subscribe_saved(user_id)
    }
}

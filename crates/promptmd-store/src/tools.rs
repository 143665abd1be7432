//! Tool repository implementation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::watch;
use uuid::Uuid;

use promptmd_core::{Error, Result, Tool, ToolStore, UpdateToolRequest};

use crate::store::StoreInner;

/// In-memory implementation of [`ToolStore`]. Clones share state.
#[derive(Clone)]
pub struct MemoryToolStore {
    inner: Arc<StoreInner>,
}

impl MemoryToolStore {
    pub(crate) fn new(inner: Arc<StoreInner>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ToolStore for MemoryToolStore {
    async fn fetch(&self, id: &str) -> Result<Tool> {
        let state = self.inner.lock();
        state
            .tools
            .get(id)
            .cloned()
            .ok_or_else(|| Error::ToolNotFound(id.to_string()))
    }

    async fn insert(&self, mut tool: Tool) -> Result<Tool> {
        let mut state = self.inner.lock();
        tool.id = Uuid::new_v4().to_string();
        // is_saved is viewer-relative; the store persists it unset.
        tool.is_saved = false;
        let author_id = tool.author_id.clone();
        state.tools.insert(tool.id.clone(), tool.clone());
        state.publish_tool_feeds(&author_id);
        Ok(tool)
    }

    async fn apply_update(&self, id: &str, update: UpdateToolRequest) -> Result<Tool> {
        let mut state = self.inner.lock();
        let tool = state
            .tools
            .get_mut(id)
            .ok_or_else(|| Error::ToolNotFound(id.to_string()))?;
        tool.apply_update(update);
        tool.updated_at = Utc::now();
        let (tool, author_id) = (tool.clone(), tool.author_id.clone());
        state.publish_tool_feeds(&author_id);
        Ok(tool)
    }

    async fn remove(&self, id: &str) -> Result<()> {
        let mut state = self.inner.lock();
        let tool = state
            .tools
            .remove(id)
            .ok_or_else(|| Error::ToolNotFound(id.to_string()))?;
        state.publish_tool_feeds(&tool.author_id);
        Ok(())
    }

    async fn adjust_save_count(&self, id: &str, delta: i64) -> Result<i64> {
        let mut state = self.inner.lock();
        let tool = state
            .tools
            .get_mut(id)
            .ok_or_else(|| Error::ToolNotFound(id.to_string()))?;
        tool.save_count = (tool.save_count + delta).max(0);
        let (count, author_id) = (tool.save_count, tool.author_id.clone());
        state.publish_tool_feeds(&author_id);
        Ok(count)
    }

    async fn set_rating_stats(&self, id: &str, rating_avg: f64, rating_count: i64) -> Result<()> {
        let mut state = self.inner.lock();
        let tool = state
            .tools
            .get_mut(id)
            .ok_or_else(|| Error::ToolNotFound(id.to_string()))?;
        tool.rating_avg = rating_avg;
        tool.rating_count = rating_count;
        tool.updated_at = Utc::now();
        let author_id = tool.author_id.clone();
        state.publish_tool_feeds(&author_id);
        Ok(())
    }

    fn watch_published(&self) -> watch::Receiver<Vec<Tool>> {
        self.inner.lock().subscribe_published()
    }

    fn watch_drafts(&self, author_id: &str) -> watch::Receiver<Vec<Tool>> {
        self.inner.lock().subscribe_drafts(author_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use promptmd_core::{ToolKind, ToolStatus, ToolTags};

    fn draft(title: &str, author: &str) -> Tool {
        let now = Utc::now();
        Tool {
            id: String::new(),
            kind: ToolKind::Prompt,
            status: ToolStatus::Draft,
            title: title.to_string(),
            description: String::new(),
            content: "content".to_string(),
            example: None,
            sources: Vec::new(),
            tags: ToolTags::default(),
            author_id: author.to_string(),
            organization_id: None,
            version: 1,
            created_at: now,
            updated_at: now,
            save_count: 0,
            rating_avg: 0.0,
            rating_count: 0,
            is_saved: false,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_fetch_round_trips() {
        let store = MemoryStore::new();
        let tool = store.tools.insert(draft("Triage Note", "u1")).await.unwrap();
        assert!(!tool.id.is_empty());

        let fetched = store.tools.fetch(&tool.id).await.unwrap();
        assert_eq!(fetched, tool);
    }

    #[tokio::test]
    async fn test_fetch_unknown_id_is_tool_not_found() {
        let store = MemoryStore::new();
        match store.tools.fetch("missing").await {
            Err(Error::ToolNotFound(id)) => assert_eq!(id, "missing"),
            other => panic!("Expected ToolNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_apply_update_bumps_updated_at() {
        let store = MemoryStore::new();
        let tool = store.tools.insert(draft("Triage Note", "u1")).await.unwrap();

        let updated = store
            .tools
            .apply_update(
                &tool.id,
                UpdateToolRequest {
                    title: Some("Handoff Note".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Handoff Note");
        assert!(updated.updated_at >= tool.updated_at);
    }

    #[tokio::test]
    async fn test_adjust_save_count_clamps_at_zero() {
        let store = MemoryStore::new();
        let tool = store.tools.insert(draft("Triage Note", "u1")).await.unwrap();

        assert_eq!(store.tools.adjust_save_count(&tool.id, 1).await.unwrap(), 1);
        assert_eq!(store.tools.adjust_save_count(&tool.id, -1).await.unwrap(), 0);
        assert_eq!(store.tools.adjust_save_count(&tool.id, -1).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_watch_drafts_sees_inserts() {
        let store = MemoryStore::new();
        let rx = store.tools.watch_drafts("u1");
        assert!(rx.borrow().is_empty());

        store.tools.insert(draft("Triage Note", "u1")).await.unwrap();
        assert_eq!(rx.borrow().len(), 1);

        // Another author's drafts don't leak into u1's feed.
        store.tools.insert(draft("Other", "u2")).await.unwrap();
        assert_eq!(rx.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_watch_published_excludes_drafts() {
        let store = MemoryStore::new();
        let rx = store.tools.watch_published();

        let mut published = draft("Triage Note", "u1");
        published.status = ToolStatus::Published;
        store.tools.insert(published).await.unwrap();
        store.tools.insert(draft("Draft", "u1")).await.unwrap();

        let snapshot = rx.borrow();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].title, "Triage Note");
    }
}

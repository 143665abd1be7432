//! Rating repository implementation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use promptmd_core::{Error, Rating, RatingStore, Result};

use crate::store::StoreInner;

/// In-memory implementation of [`RatingStore`]. Clones share state.
#[derive(Clone)]
pub struct MemoryRatingStore {
    inner: Arc<StoreInner>,
}

impl MemoryRatingStore {
    pub(crate) fn new(inner: Arc<StoreInner>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl RatingStore for MemoryRatingStore {
    async fn find(&self, user_id: &str, tool_id: &str) -> Result<Option<Rating>> {
        let state = self.inner.lock();
        Ok(state
            .ratings
            .values()
            .find(|r| r.user_id == user_id && r.tool_id == tool_id)
            .cloned())
    }

    async fn insert(&self, mut rating: Rating) -> Result<Rating> {
        let mut state = self.inner.lock();
        rating.id = Uuid::new_v4().to_string();
        state.ratings.insert(rating.id.clone(), rating.clone());
        Ok(rating)
    }

    async fn update_value(&self, id: &str, value: i32, comment: Option<String>) -> Result<Rating> {
        let mut state = self.inner.lock();
        let rating = state
            .ratings
            .get_mut(id)
            .ok_or_else(|| Error::RatingNotFound(id.to_string()))?;
        rating.value = value;
        if comment.is_some() {
            rating.comment = comment;
        }
        rating.updated_at = Utc::now();
        Ok(rating.clone())
    }

    async fn remove(&self, id: &str) -> Result<()> {
        let mut state = self.inner.lock();
        state
            .ratings
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Error::RatingNotFound(id.to_string()))
    }

    async fn for_tool(&self, tool_id: &str) -> Result<Vec<Rating>> {
        let state = self.inner.lock();
        let mut ratings: Vec<Rating> = state
            .ratings
            .values()
            .filter(|r| r.tool_id == tool_id)
            .cloned()
            .collect();
        ratings.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(ratings)
    }
}

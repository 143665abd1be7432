//! Core traits for the catalog's external collaborators.
//!
//! The record store, save-edge store, rating store, and identity provider
//! are injected behind these narrow interfaces, enabling pluggable backends
//! and testability without a UI harness. `promptmd-store` ships the
//! in-memory reference implementation.
//!
//! Snapshot feeds are exposed as `tokio::sync::watch` receivers: each feed
//! pushes full-replacement snapshots, last write wins, and a slow consumer
//! observes only the latest state, which is exactly the contract the
//! catalog merge assumes.

use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::watch;

use crate::error::Result;
use crate::models::{Rating, Tool, UpdateToolRequest, User};

// =============================================================================
// TOOL STORE
// =============================================================================

/// Record store for tools.
#[async_trait]
pub trait ToolStore: Send + Sync {
    /// Fetch a tool by id.
    async fn fetch(&self, id: &str) -> Result<Tool>;

    /// Persist a new tool. The store assigns the id; any caller-supplied id
    /// is replaced. Returns the stored record.
    async fn insert(&self, tool: Tool) -> Result<Tool>;

    /// Merge a partial update into an existing tool and bump `updated_at`.
    async fn apply_update(&self, id: &str, update: UpdateToolRequest) -> Result<Tool>;

    /// Remove a tool.
    async fn remove(&self, id: &str) -> Result<()>;

    /// Atomically adjust `save_count` by `delta`, floor-clamped at 0.
    /// Returns the new count.
    async fn adjust_save_count(&self, id: &str, delta: i64) -> Result<i64>;

    /// Replace the rating aggregates and bump `updated_at`.
    async fn set_rating_stats(&self, id: &str, rating_avg: f64, rating_count: i64) -> Result<()>;

    /// Feed of all published tools.
    fn watch_published(&self) -> watch::Receiver<Vec<Tool>>;

    /// Feed of `author_id`'s draft tools.
    fn watch_drafts(&self, author_id: &str) -> watch::Receiver<Vec<Tool>>;
}

// =============================================================================
// SAVE EDGE STORE
// =============================================================================

/// Store for (user, tool) bookmark edges.
#[async_trait]
pub trait SaveEdgeStore: Send + Sync {
    /// Create the edge. Returns false (and changes nothing) when it already
    /// exists.
    async fn save(&self, user_id: &str, tool_id: &str) -> Result<bool>;

    /// Remove the edge. Returns false (and changes nothing) when it does
    /// not exist.
    async fn unsave(&self, user_id: &str, tool_id: &str) -> Result<bool>;

    /// All tool ids `user_id` has saved.
    async fn saved_ids(&self, user_id: &str) -> Result<HashSet<String>>;

    /// Feed of `user_id`'s saved-id set.
    fn watch_saved(&self, user_id: &str) -> watch::Receiver<HashSet<String>>;
}

// =============================================================================
// RATING STORE
// =============================================================================

/// Store for per-user tool ratings.
#[async_trait]
pub trait RatingStore: Send + Sync {
    /// The rating `user_id` gave `tool_id`, if any.
    async fn find(&self, user_id: &str, tool_id: &str) -> Result<Option<Rating>>;

    /// Persist a new rating. The store assigns the id.
    async fn insert(&self, rating: Rating) -> Result<Rating>;

    /// Update an existing rating's value (and comment) in place, bumping
    /// `updated_at`.
    async fn update_value(&self, id: &str, value: i32, comment: Option<String>) -> Result<Rating>;

    /// Remove a rating by id.
    async fn remove(&self, id: &str) -> Result<()>;

    /// All ratings for a tool.
    async fn for_tool(&self, tool_id: &str) -> Result<Vec<Rating>>;
}

// =============================================================================
// IDENTITY
// =============================================================================

/// Supplies the current viewer, or none when browsing anonymously.
///
/// Absence of a viewer means save/rate/create actions are unavailable.
/// It is never an error state.
pub trait IdentityProvider: Send + Sync {
    fn current_viewer(&self) -> Option<User>;

    fn viewer_id(&self) -> Option<String> {
        self.current_viewer().map(|user| user.id)
    }
}

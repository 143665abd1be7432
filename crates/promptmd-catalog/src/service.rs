//! Mutation operations over the injected stores.
//!
//! Every operation takes the viewer id explicitly, validates and checks
//! ownership in the core (never trusting the caller or backend rules),
//! then writes through the store. State visible in a [`crate::CatalogSession`]
//! changes only when the feeds re-push; the service returns the written
//! record so a host can overlay optimistically if it wants to.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use promptmd_core::defaults::{RATING_MAX, RATING_MIN};
use promptmd_core::models::round_rating_avg;
use promptmd_core::{
    CreateToolRequest, Error, EventBus, Rating, RatingStore, Result, SaveEdgeStore, StoreEvent,
    Tool, ToolStatus, ToolStore, UpdateToolRequest,
};

/// The catalog's write path.
pub struct ToolService {
    tools: Arc<dyn ToolStore>,
    saves: Arc<dyn SaveEdgeStore>,
    ratings: Arc<dyn RatingStore>,
    events: EventBus,
}

impl ToolService {
    pub fn new(
        tools: Arc<dyn ToolStore>,
        saves: Arc<dyn SaveEdgeStore>,
        ratings: Arc<dyn RatingStore>,
    ) -> Self {
        Self {
            tools,
            saves,
            ratings,
            events: EventBus::default(),
        }
    }

    /// Replace the event bus (e.g. to share one across services).
    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    /// The bus carrying post-mutation events.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    // =========================================================================
    // TOOL CRUD
    // =========================================================================

    /// Persist a new tool authored by `viewer_id`.
    ///
    /// Engagement counters start at zero and `version` at 1. Fails with
    /// [`Error::Validation`] when title or content is blank.
    pub async fn create(&self, viewer_id: &str, request: CreateToolRequest) -> Result<Tool> {
        if request.title.trim().is_empty() {
            return Err(Error::Validation("title must not be empty".to_string()));
        }
        if request.content.trim().is_empty() {
            return Err(Error::Validation("content must not be empty".to_string()));
        }

        let mut tags = request.tags;
        tags.dedup();
        let now = Utc::now();
        let tool = Tool {
            id: String::new(),
            kind: request.kind,
            status: request.status,
            title: request.title,
            description: request.description,
            content: request.content,
            example: request.example,
            sources: request.sources,
            tags,
            author_id: viewer_id.to_string(),
            organization_id: request.organization_id,
            version: 1,
            created_at: now,
            updated_at: now,
            save_count: 0,
            rating_avg: 0.0,
            rating_count: 0,
            is_saved: false,
        };

        let tool = self.tools.insert(tool).await?;
        info!(tool_id = %tool.id, viewer_id, op = "create", "tool created");
        self.events.emit(StoreEvent::ToolCreated {
            tool_id: tool.id.clone(),
        });
        Ok(tool)
    }

    /// Merge a partial update into a tool `viewer_id` owns.
    pub async fn update(
        &self,
        viewer_id: &str,
        id: &str,
        update: UpdateToolRequest,
    ) -> Result<Tool> {
        self.fetch_owned(viewer_id, id).await?;
        if let Some(title) = &update.title {
            if title.trim().is_empty() {
                return Err(Error::Validation("title must not be empty".to_string()));
            }
        }
        if let Some(content) = &update.content {
            if content.trim().is_empty() {
                return Err(Error::Validation("content must not be empty".to_string()));
            }
        }

        let tool = self.tools.apply_update(id, update).await?;
        info!(tool_id = id, viewer_id, op = "update", "tool updated");
        self.events.emit(StoreEvent::ToolUpdated {
            tool_id: id.to_string(),
        });
        Ok(tool)
    }

    /// Remove a tool `viewer_id` owns. Ratings and save edges are not
    /// cascaded; dangling references never rejoin the materialized set.
    pub async fn delete(&self, viewer_id: &str, id: &str) -> Result<()> {
        self.fetch_owned(viewer_id, id).await?;
        self.tools.remove(id).await?;
        info!(tool_id = id, viewer_id, op = "delete", "tool deleted");
        self.events.emit(StoreEvent::ToolDeleted {
            tool_id: id.to_string(),
        });
        Ok(())
    }

    /// Transition a draft to published in place. Publishing an
    /// already-published tool is a successful no-op.
    pub async fn publish(&self, viewer_id: &str, id: &str) -> Result<Tool> {
        let tool = self.fetch_owned(viewer_id, id).await?;
        if tool.status == ToolStatus::Published {
            return Ok(tool);
        }

        let tool = self
            .tools
            .apply_update(
                id,
                UpdateToolRequest {
                    status: Some(ToolStatus::Published),
                    ..Default::default()
                },
            )
            .await?;
        info!(tool_id = id, viewer_id, op = "publish", "tool published");
        self.events.emit(StoreEvent::ToolPublished {
            tool_id: id.to_string(),
        });
        Ok(tool)
    }

    // =========================================================================
    // SAVE / UNSAVE
    // =========================================================================

    /// Bookmark a tool for `viewer_id`. Saving an already-saved tool is a
    /// no-op; `save_count` moves only when the edge actually changed.
    pub async fn save(&self, viewer_id: &str, tool_id: &str) -> Result<()> {
        self.tools.fetch(tool_id).await?;
        if self.saves.save(viewer_id, tool_id).await? {
            self.tools.adjust_save_count(tool_id, 1).await?;
            info!(tool_id, viewer_id, op = "save", "tool saved");
            self.events.emit(StoreEvent::ToolSaved {
                tool_id: tool_id.to_string(),
                viewer_id: viewer_id.to_string(),
            });
        }
        Ok(())
    }

    /// Remove `viewer_id`'s bookmark. Unsaving an unsaved tool is a no-op,
    /// not an error; the counter decrement is floor-clamped by the store.
    pub async fn unsave(&self, viewer_id: &str, tool_id: &str) -> Result<()> {
        if self.saves.unsave(viewer_id, tool_id).await? {
            match self.tools.adjust_save_count(tool_id, -1).await {
                // The tool may have been deleted since the edge was made;
                // removing the stale edge alone is fine.
                Ok(_) | Err(Error::ToolNotFound(_)) => {}
                Err(e) => return Err(e),
            }
            info!(tool_id, viewer_id, op = "unsave", "tool unsaved");
            self.events.emit(StoreEvent::ToolUnsaved {
                tool_id: tool_id.to_string(),
                viewer_id: viewer_id.to_string(),
            });
        }
        Ok(())
    }

    // =========================================================================
    // RATINGS
    // =========================================================================

    /// Rate a tool 1-5 as `viewer_id`.
    ///
    /// The first rating for the (viewer, tool) pair creates; re-rating
    /// updates the existing rating in place, so the pair stays unique and
    /// `rating_count` does not grow. The tool's average is recomputed
    /// incrementally and rounded to 2 decimals.
    pub async fn rate(
        &self,
        viewer_id: &str,
        tool_id: &str,
        value: i32,
        comment: Option<String>,
    ) -> Result<Rating> {
        if !(RATING_MIN..=RATING_MAX).contains(&value) {
            return Err(Error::Validation(format!(
                "rating value must be between {} and {}",
                RATING_MIN, RATING_MAX
            )));
        }
        let tool = self.tools.fetch(tool_id).await?;

        let rating = match self.ratings.find(viewer_id, tool_id).await? {
            None => {
                let now = Utc::now();
                let rating = self
                    .ratings
                    .insert(Rating {
                        id: String::new(),
                        tool_id: tool_id.to_string(),
                        user_id: viewer_id.to_string(),
                        value,
                        comment,
                        created_at: now,
                        updated_at: now,
                    })
                    .await?;

                let new_count = tool.rating_count + 1;
                let new_avg = round_rating_avg(
                    (tool.rating_avg * tool.rating_count as f64 + value as f64) / new_count as f64,
                );
                self.tools
                    .set_rating_stats(tool_id, new_avg, new_count)
                    .await?;
                rating
            }
            Some(existing) => {
                let rating = self
                    .ratings
                    .update_value(&existing.id, value, comment)
                    .await?;

                if existing.value != value && tool.rating_count > 0 {
                    let total = tool.rating_avg * tool.rating_count as f64;
                    let new_avg = round_rating_avg(
                        (total - existing.value as f64 + value as f64) / tool.rating_count as f64,
                    );
                    self.tools
                        .set_rating_stats(tool_id, new_avg, tool.rating_count)
                        .await?;
                }
                rating
            }
        };

        info!(tool_id, viewer_id, value, op = "rate", "tool rated");
        self.events.emit(StoreEvent::ToolRated {
            tool_id: tool_id.to_string(),
            viewer_id: viewer_id.to_string(),
            value,
        });
        Ok(rating)
    }

    /// Remove `viewer_id`'s rating of a tool, restoring the aggregates.
    /// The average returns to 0 when the last rating goes away.
    pub async fn delete_rating(&self, viewer_id: &str, tool_id: &str) -> Result<()> {
        let rating = self
            .ratings
            .find(viewer_id, tool_id)
            .await?
            .ok_or_else(|| Error::RatingNotFound(tool_id.to_string()))?;
        self.ratings.remove(&rating.id).await?;

        let tool = self.tools.fetch(tool_id).await?;
        let new_count = (tool.rating_count - 1).max(0);
        let new_avg = if new_count == 0 {
            0.0
        } else {
            round_rating_avg(
                (tool.rating_avg * tool.rating_count as f64 - rating.value as f64)
                    / new_count as f64,
            )
        };
        self.tools
            .set_rating_stats(tool_id, new_avg, new_count)
            .await?;

        info!(tool_id, viewer_id, op = "delete_rating", "rating deleted");
        self.events.emit(StoreEvent::RatingDeleted {
            tool_id: tool_id.to_string(),
            viewer_id: viewer_id.to_string(),
        });
        Ok(())
    }

    /// The rating `viewer_id` gave a tool, if any.
    pub async fn user_rating(&self, viewer_id: &str, tool_id: &str) -> Result<Option<Rating>> {
        self.ratings.find(viewer_id, tool_id).await
    }

    /// Fetch a tool and require `viewer_id` to own it.
    async fn fetch_owned(&self, viewer_id: &str, id: &str) -> Result<Tool> {
        let tool = self.tools.fetch(id).await?;
        if !tool.is_owned_by(viewer_id) {
            return Err(Error::Permission(format!(
                "viewer {} does not own tool {}",
                viewer_id, id
            )));
        }
        Ok(tool)
    }
}

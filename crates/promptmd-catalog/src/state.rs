//! Catalog view state: latest feed snapshots, the materialized set, and
//! the query pipeline.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use promptmd_core::{FieldMatch, SearchConfig, Tool};

use crate::filter::{view_counts, ActiveView, TagSelection, ViewCounts};
use crate::merge::materialize;

// =============================================================================
// FEED EVENTS
// =============================================================================

/// A full-replacement snapshot pushed by one of the three feeds.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    Published(Vec<Tool>),
    Drafts(Vec<Tool>),
    SavedIds(HashSet<String>),
}

impl FeedEvent {
    /// Feed name for logging.
    pub fn feed_name(&self) -> &'static str {
        match self {
            Self::Published(_) => "published",
            Self::Drafts(_) => "drafts",
            Self::SavedIds(_) => "saved",
        }
    }
}

// =============================================================================
// CATALOG QUERY
// =============================================================================

/// What the viewer is currently asking to see.
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    /// Free-text search query; blank means no search constraint.
    pub query: String,
    pub view: ActiveView,
    pub tags: TagSelection,
}

/// One tool surviving the full pipeline, with its search annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub tool: Tool,
    /// Best weighted field score; 0.0 when no search query was active.
    pub score: f32,
    /// Match spans for highlighting; empty when no search query was active.
    pub matches: Vec<FieldMatch>,
}

// =============================================================================
// CATALOG STATE
// =============================================================================

/// The latest snapshot from each feed plus the materialized set derived
/// from them.
///
/// Feeds are independent and unordered relative to each other: a push from
/// any one triggers a full re-merge against the most recently received
/// snapshots of the other two (last write wins per feed, not per record).
#[derive(Debug, Default)]
pub struct CatalogState {
    viewer_id: Option<String>,
    search_config: SearchConfig,
    published: Vec<Tool>,
    drafts: Vec<Tool>,
    saved_ids: HashSet<String>,
    materialized: Vec<Tool>,
}

impl CatalogState {
    /// Empty state for a viewer (or an anonymous session).
    pub fn new(viewer_id: Option<String>) -> Self {
        Self {
            viewer_id,
            ..Default::default()
        }
    }

    /// Override the search policy.
    pub fn with_search_config(mut self, config: SearchConfig) -> Self {
        self.search_config = config;
        self
    }

    pub fn viewer_id(&self) -> Option<&str> {
        self.viewer_id.as_deref()
    }

    /// Replace one feed's snapshot and re-materialize.
    pub fn apply(&mut self, event: FeedEvent) {
        let feed = event.feed_name();
        match event {
            FeedEvent::Published(tools) => self.published = tools,
            FeedEvent::Drafts(tools) => self.drafts = tools,
            FeedEvent::SavedIds(ids) => self.saved_ids = ids,
        }
        self.materialized = materialize(&self.published, &self.drafts, &self.saved_ids);
        debug!(
            feed,
            result_count = self.materialized.len(),
            "feed snapshot applied"
        );
    }

    /// The merged, viewer-annotated record set, `updated_at` descending.
    pub fn materialized(&self) -> &[Tool] {
        &self.materialized
    }

    /// Badge counts over the full materialized set.
    pub fn counts(&self) -> ViewCounts {
        view_counts(&self.materialized, self.viewer_id())
    }

    /// Run the display pipeline: search first (pass-through when the query
    /// is blank), then the view filter, then the tag filter. A record must
    /// survive all three stages to appear.
    pub fn query(&self, query: &CatalogQuery) -> Vec<CatalogEntry> {
        let hits = promptmd_search::search(&self.materialized, &query.query, &self.search_config);

        let by_id: HashMap<&str, &Tool> = self
            .materialized
            .iter()
            .map(|tool| (tool.id.as_str(), tool))
            .collect();

        let entries: Vec<CatalogEntry> = hits
            .into_iter()
            .filter_map(|hit| by_id.get(hit.tool_id.as_str()).map(|tool| (*tool, hit)))
            .filter(|(tool, _)| query.view.admits(tool, self.viewer_id()))
            .filter(|(tool, _)| query.tags.matches(&tool.tags))
            .map(|(tool, hit)| CatalogEntry {
                tool: tool.clone(),
                score: hit.score,
                matches: hit.matches,
            })
            .collect();

        debug!(
            query = %query.query,
            view = %query.view,
            result_count = entries.len(),
            "catalog query complete"
        );

        entries
    }
}

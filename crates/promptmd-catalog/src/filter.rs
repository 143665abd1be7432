//! View and tag filter reducer.
//!
//! Narrows the (possibly search-filtered) record set to what the active UI
//! view and active tag selections permit, and derives the badge counts
//! shown on the view selector.

use serde::{Deserialize, Serialize};

use promptmd_core::tags::{normalize, TagCategory};
use promptmd_core::{Tool, ToolStatus, ToolTags};

// =============================================================================
// ACTIVE VIEW
// =============================================================================

/// The mutually-exclusive catalog view. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveView {
    /// Every published tool. Drafts are excluded, even the viewer's own.
    #[default]
    All,
    /// Tools the viewer has saved, regardless of status or authorship.
    Saved,
    /// Published tools the viewer authored.
    Created,
    /// Draft tools the viewer authored.
    Drafts,
}

impl ActiveView {
    /// Whether `tool` is eligible under this view for `viewer_id`.
    ///
    /// The viewer-scoped views admit nothing for an anonymous viewer.
    pub fn admits(&self, tool: &Tool, viewer_id: Option<&str>) -> bool {
        match self {
            Self::All => tool.status == ToolStatus::Published,
            Self::Saved => tool.is_saved,
            Self::Created => {
                viewer_id.is_some_and(|v| tool.author_id == v)
                    && tool.status == ToolStatus::Published
            }
            Self::Drafts => {
                viewer_id.is_some_and(|v| tool.author_id == v) && tool.status == ToolStatus::Draft
            }
        }
    }
}

impl std::fmt::Display for ActiveView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Saved => write!(f, "saved"),
            Self::Created => write!(f, "created"),
            Self::Drafts => write!(f, "drafts"),
        }
    }
}

impl std::str::FromStr for ActiveView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "saved" => Ok(Self::Saved),
            "created" => Ok(Self::Created),
            "drafts" => Ok(Self::Drafts),
            _ => Err(format!("Invalid view: {}", s)),
        }
    }
}

// =============================================================================
// TAG SELECTION
// =============================================================================

/// Zero or more selected filter tags per category.
///
/// A record passes iff, for every category with at least one selection,
/// its bucket contains **all** selected tags for that category (AND within
/// a category; categories are ANDed together; empty categories impose no
/// constraint).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagSelection {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub specialty: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub use_case: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub user_type: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub app_model: Vec<String>,
}

impl TagSelection {
    /// No selections in any category.
    pub fn new() -> Self {
        Self::default()
    }

    /// The selected tags for a category.
    pub fn selected(&self, category: TagCategory) -> &[String] {
        match category {
            TagCategory::Specialty => &self.specialty,
            TagCategory::UseCase => &self.use_case,
            TagCategory::UserType => &self.user_type,
            TagCategory::AppModel => &self.app_model,
        }
    }

    fn selected_mut(&mut self, category: TagCategory) -> &mut Vec<String> {
        match category {
            TagCategory::Specialty => &mut self.specialty,
            TagCategory::UseCase => &mut self.use_case,
            TagCategory::UserType => &mut self.user_type,
            TagCategory::AppModel => &mut self.app_model,
        }
    }

    /// Select the tag if absent, deselect it if present (the filter-chip
    /// interaction). Comparison is by normalized form.
    pub fn toggle(&mut self, category: TagCategory, tag: impl Into<String>) {
        let tag = tag.into();
        let normalized = normalize(&tag);
        let selected = self.selected_mut(category);
        if let Some(pos) = selected.iter().position(|t| normalize(t) == normalized) {
            selected.remove(pos);
        } else {
            selected.push(tag);
        }
    }

    /// Deselect a tag (normalized comparison). No-op when absent.
    pub fn remove(&mut self, category: TagCategory, tag: &str) {
        let normalized = normalize(tag);
        self.selected_mut(category)
            .retain(|t| normalize(t) != normalized);
    }

    /// Clear one category's selections.
    pub fn clear_category(&mut self, category: TagCategory) {
        self.selected_mut(category).clear();
    }

    /// Clear all selections.
    pub fn clear(&mut self) {
        for category in TagCategory::ALL {
            self.clear_category(category);
        }
    }

    /// Whether no category has a selection.
    pub fn is_empty(&self) -> bool {
        TagCategory::ALL
            .iter()
            .all(|c| self.selected(*c).is_empty())
    }

    /// Whether `tags` satisfies every constrained category.
    pub fn matches(&self, tags: &ToolTags) -> bool {
        TagCategory::ALL.iter().all(|category| {
            let selected = self.selected(*category);
            selected.is_empty() || tags.contains_all(*category, selected)
        })
    }
}

// =============================================================================
// VIEW COUNTS
// =============================================================================

/// Badge counts for the view selector, computed over the full materialized
/// set, independent of the active view, search query, and tag selections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewCounts {
    pub saved: usize,
    pub created: usize,
    pub drafts: usize,
}

/// Count saved / created / drafts over `tools` for `viewer_id`.
pub fn view_counts(tools: &[Tool], viewer_id: Option<&str>) -> ViewCounts {
    let mut counts = ViewCounts::default();
    for tool in tools {
        if tool.is_saved {
            counts.saved += 1;
        }
        if let Some(viewer) = viewer_id {
            if tool.author_id == viewer {
                match tool.status {
                    ToolStatus::Published => counts.created += 1,
                    ToolStatus::Draft => counts.drafts += 1,
                }
            }
        }
    }
    counts
}

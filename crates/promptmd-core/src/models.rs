//! Core data models for the PromptMD catalog.
//!
//! These types are shared across all promptmd crates and represent the
//! domain entities: tools (prompt templates), ratings, save edges, and
//! users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tags::ToolTags;

// =============================================================================
// TOOL ENUMS
// =============================================================================

/// What kind of tool a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    /// A prompt template.
    Prompt,
    /// An MCP server integration.
    Mcp,
    /// A custom GPT configuration.
    CustomGpt,
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Prompt => write!(f, "prompt"),
            Self::Mcp => write!(f, "mcp"),
            Self::CustomGpt => write!(f, "custom_gpt"),
        }
    }
}

impl std::str::FromStr for ToolKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "prompt" => Ok(Self::Prompt),
            "mcp" => Ok(Self::Mcp),
            "custom_gpt" => Ok(Self::CustomGpt),
            _ => Err(format!("Invalid tool kind: {}", s)),
        }
    }
}

/// Publication status of a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    /// Visible only to its author.
    Draft,
    /// Visible to every viewer.
    Published,
}

impl std::fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Published => write!(f, "published"),
        }
    }
}

impl std::str::FromStr for ToolStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            _ => Err(format!("Invalid tool status: {}", s)),
        }
    }
}

/// Kind of attribution source attached to a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// External link.
    Url,
    /// Another user of the platform.
    User,
    /// Free-text citation.
    Text,
}

// =============================================================================
// TOOL TYPES
// =============================================================================

/// An attribution source for a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSource {
    pub kind: SourceKind,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// A worked input/output example attached to a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolExample {
    pub input: String,
    pub output: String,
}

/// A prompt template record, the core unit of data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Opaque store-assigned identifier.
    pub id: String,
    pub kind: ToolKind,
    pub status: ToolStatus,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<ToolExample>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<ToolSource>,
    #[serde(default)]
    pub tags: ToolTags,
    pub author_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    /// Monotonic version counter, starts at 1.
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Maintained aggregate of save edges. Never negative.
    pub save_count: i64,
    /// Mean rating, 2-decimal precision. 0.0 whenever `rating_count` is 0.
    pub rating_avg: f64,
    pub rating_count: i64,
    /// Whether the current viewer has saved this tool. Derived at merge
    /// time from the viewer's saved-id set; the store never persists a
    /// meaningful value here.
    #[serde(default)]
    pub is_saved: bool,
}

impl Tool {
    /// Whether `viewer_id` authored this tool.
    pub fn is_owned_by(&self, viewer_id: &str) -> bool {
        self.author_id == viewer_id
    }

    /// Merge a partial update into this tool. Timestamps are the caller's
    /// responsibility; replacement tag buckets are re-deduped.
    pub fn apply_update(&mut self, update: UpdateToolRequest) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(content) = update.content {
            self.content = content;
        }
        if let Some(mut tags) = update.tags {
            tags.dedup();
            self.tags = tags;
        }
        if let Some(example) = update.example {
            self.example = Some(example);
        }
        if let Some(sources) = update.sources {
            self.sources = sources;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(organization_id) = update.organization_id {
            self.organization_id = Some(organization_id);
        }
    }
}

// =============================================================================
// REQUEST TYPES
// =============================================================================

/// Request for creating a new tool.
///
/// Counters, version, timestamps, and authorship are assigned by the
/// mutation layer, not the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateToolRequest {
    pub kind: ToolKind,
    pub status: ToolStatus,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub content: String,
    #[serde(default)]
    pub tags: ToolTags,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<ToolExample>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<ToolSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
}

impl Default for CreateToolRequest {
    fn default() -> Self {
        Self {
            kind: ToolKind::Prompt,
            status: ToolStatus::Draft,
            title: String::new(),
            description: String::new(),
            content: String::new(),
            tags: ToolTags::default(),
            example: None,
            sources: Vec::new(),
            organization_id: None,
        }
    }
}

/// Partial update for an existing tool. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateToolRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<ToolTags>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<ToolExample>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<ToolSource>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ToolStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
}

// =============================================================================
// RATING & SAVE TYPES
// =============================================================================

/// One user's rating of one tool. Unique per (user_id, tool_id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub id: String,
    pub tool_id: String,
    pub user_id: String,
    /// Star value in 1..=5.
    pub value: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A (user, tool) bookmark edge. Existence of the edge is the sole source
/// of truth for `Tool::is_saved`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveEdge {
    pub user_id: String,
    pub tool_id: String,
    pub saved_at: DateTime<Utc>,
}

/// A catalog user. Read-only from the core's perspective; profile writes
/// belong to the identity collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub display_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// Round a rating average to 2 decimal places, the precision persisted on
/// the tool aggregate.
pub fn round_rating_avg(avg: f64) -> f64 {
    (avg * 100.0).round() / 100.0
}

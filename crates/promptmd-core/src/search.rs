//! Search contract types shared between the catalog and the search engine.
//!
//! The algorithms live in `promptmd-search`; these types define what a
//! search produces: per-tool hits with per-field match spans used
//! downstream purely for highlighting, never for filtering logic.

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::tags::TagCategory;

// =============================================================================
// SEARCH CONFIG
// =============================================================================

/// Tunable search policy. `Default` mirrors the constants in
/// [`crate::defaults`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Weight applied to tag matches relative to title/description matches.
    pub tag_weight: f32,
    /// Minimum weighted field score for a match to survive.
    pub score_threshold: f32,
    /// Optional cap on returned hits (None = unbounded).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            tag_weight: defaults::TAG_WEIGHT,
            score_threshold: defaults::SCORE_THRESHOLD,
            limit: None,
        }
    }
}

// =============================================================================
// MATCH TYPES
// =============================================================================

/// A matched character range within a field, in char indices. `end` is
/// exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

impl MatchSpan {
    /// Span length in chars.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Which field of a tool a match landed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchField {
    Title,
    Description,
    /// A single tag string, addressed by category and position within its
    /// bucket.
    Tag { category: TagCategory, index: usize },
}

/// All match spans for one field of one tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMatch {
    pub field: MatchField,
    /// Contiguous matched runs, in ascending position order. Never empty.
    pub spans: Vec<MatchSpan>,
    /// Weighted match score for this field.
    pub score: f32,
}

impl FieldMatch {
    /// The span to highlight: the longest contiguous run (greatest
    /// `end - start`), first one on ties.
    pub fn primary_span(&self) -> Option<MatchSpan> {
        self.spans
            .iter()
            .copied()
            .max_by(|a, b| a.len().cmp(&b.len()).then(b.start.cmp(&a.start)))
    }
}

/// One surviving tool from a search, with its match annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub tool_id: String,
    /// Best weighted field score. 0.0 for blank-query pass-through.
    pub score: f32,
    /// Matched fields with spans. Empty for blank-query pass-through.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matches: Vec<FieldMatch>,
}

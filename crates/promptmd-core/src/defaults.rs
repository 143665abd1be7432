//! Centralized default constants for the PromptMD catalog.
//!
//! **This module is the single source of truth** for all shared default
//! values. Crates reference these constants instead of defining their own
//! magic numbers.

// =============================================================================
// SEARCH
// =============================================================================

/// Weight applied to title and description match scores.
pub const TEXT_WEIGHT: f32 = 1.0;

/// Weight applied to tag match scores, relative to text fields. Kept below
/// 1.0 so a tag-only match never outranks a text match of equal quality.
pub const TAG_WEIGHT: f32 = 0.7;

/// Minimum weighted field score for a match to survive. Matcher scores grow
/// with match length and contiguity; anything below this is noise.
pub const SCORE_THRESHOLD: f32 = 1.0;

// =============================================================================
// RATINGS
// =============================================================================

/// Lowest accepted star value.
pub const RATING_MIN: i32 = 1;

/// Highest accepted star value.
pub const RATING_MAX: i32 = 5;

// =============================================================================
// EVENTS
// =============================================================================

/// Default broadcast capacity for the store event bus. Lagging subscribers
/// drop oldest events past this depth.
pub const EVENT_BUS_CAPACITY: usize = 64;

//! # promptmd-search
//!
//! Fuzzy search engine for the PromptMD catalog.
//!
//! Pure, synchronous functions over an in-memory tool set: approximate
//! query matching across title, description, and all four tag categories,
//! weighted so text fields outrank tag-only matches, with contiguous
//! char-index spans for highlighting. Safe to re-run on every keystroke;
//! no state accumulates between calls.

pub mod fuzzy;
pub mod highlight;

pub use fuzzy::search;
pub use highlight::split_at_span;

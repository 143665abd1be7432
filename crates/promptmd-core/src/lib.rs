//! # promptmd-core
//!
//! Core types, traits, and abstractions for the PromptMD catalog.
//!
//! This crate provides the foundational data structures and trait
//! definitions that the other promptmd crates depend on: the tool/rating/
//! save-edge domain models, the four-axis tag taxonomy, the search
//! contract types, the store collaborator traits, the mutation event bus,
//! and the shared error and logging schema.

pub mod defaults;
pub mod error;
pub mod events;
pub mod logging;
pub mod models;
pub mod search;
pub mod tags;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use events::{EventBus, StoreEvent};
pub use models::*;
pub use search::{FieldMatch, MatchField, MatchSpan, SearchConfig, SearchHit};
pub use tags::{categorize, normalize, vocabulary, TagCategory, ToolTags};
pub use traits::{IdentityProvider, RatingStore, SaveEdgeStore, ToolStore};

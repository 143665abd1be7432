//! # promptmd-catalog
//!
//! Feed merge, view-state derivation, and the mutation layer for the
//! PromptMD catalog.
//!
//! This crate decides what a viewer sees: it consolidates the three live
//! snapshot feeds (published tools, own drafts, saved ids) into one
//! viewer-annotated materialized set, runs the display pipeline
//! (fuzzy search → active view → tag selections), derives the badge
//! counts, and exposes the write path (create / update / delete /
//! publish / save / rate) with uniform client-side validation and
//! ownership checks.
//!
//! Data flows one direction: feeds → merge → search → filter → rendered
//! list. Mutations write through the injected stores and rely on the
//! feeds to re-push updated snapshots.

pub mod filter;
pub mod merge;
pub mod service;
pub mod session;
pub mod state;

pub use filter::{view_counts, ActiveView, TagSelection, ViewCounts};
pub use merge::materialize;
pub use service::ToolService;
pub use session::CatalogSession;
pub use state::{CatalogEntry, CatalogQuery, CatalogState, FeedEvent};

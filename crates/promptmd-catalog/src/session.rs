//! A viewer's live catalog session.
//!
//! Wires the three snapshot feeds to a [`CatalogState`] and applies
//! whichever feed fires first. A feed whose sender has gone away is
//! treated as stale-but-usable: the session keeps serving the last
//! snapshot it received and keeps listening to the surviving feeds.
//! Dropping the session tears down every subscription.

use std::collections::HashSet;

use tokio::sync::watch;
use tracing::warn;

use promptmd_core::{IdentityProvider, SaveEdgeStore, SearchConfig, Tool, ToolStore};

use crate::filter::ViewCounts;
use crate::state::{CatalogEntry, CatalogQuery, CatalogState, FeedEvent};

/// A live catalog session for one viewer (or an anonymous browser).
pub struct CatalogSession {
    state: CatalogState,
    published_rx: Option<watch::Receiver<Vec<Tool>>>,
    drafts_rx: Option<watch::Receiver<Vec<Tool>>>,
    saved_rx: Option<watch::Receiver<HashSet<String>>>,
}

impl CatalogSession {
    /// Subscribe to the stores and seed the state from the current
    /// snapshots. Anonymous sessions subscribe only to the published feed.
    pub fn attach(
        tools: &dyn ToolStore,
        saves: &dyn SaveEdgeStore,
        viewer_id: Option<&str>,
    ) -> Self {
        let published_rx = tools.watch_published();
        let (drafts_rx, saved_rx) = match viewer_id {
            Some(viewer) => (
                Some(tools.watch_drafts(viewer)),
                Some(saves.watch_saved(viewer)),
            ),
            None => (None, None),
        };

        let mut state = CatalogState::new(viewer_id.map(String::from));
        state.apply(FeedEvent::Published(published_rx.borrow().clone()));
        if let Some(rx) = &drafts_rx {
            state.apply(FeedEvent::Drafts(rx.borrow().clone()));
        }
        if let Some(rx) = &saved_rx {
            state.apply(FeedEvent::SavedIds(rx.borrow().clone()));
        }

        Self {
            state,
            published_rx: Some(published_rx),
            drafts_rx,
            saved_rx,
        }
    }

    /// [`attach`](Self::attach) with the viewer resolved from an identity
    /// provider. No signed-in viewer means an anonymous, browse-only
    /// session.
    pub fn attach_as(
        tools: &dyn ToolStore,
        saves: &dyn SaveEdgeStore,
        identity: &dyn IdentityProvider,
    ) -> Self {
        Self::attach(tools, saves, identity.viewer_id().as_deref())
    }

    /// Override the search policy for this session.
    pub fn with_search_config(mut self, config: SearchConfig) -> Self {
        self.state = std::mem::take(&mut self.state).with_search_config(config);
        self
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    /// Badge counts over the full materialized set.
    pub fn counts(&self) -> ViewCounts {
        self.state.counts()
    }

    /// Run the display pipeline against the current state.
    pub fn query(&self, query: &CatalogQuery) -> Vec<CatalogEntry> {
        self.state.query(query)
    }

    /// Await the next feed push and apply it.
    ///
    /// Returns true after applying a snapshot. Returns false once every
    /// feed has closed. The state stays queryable, it just can't change
    /// anymore.
    pub async fn next_change(&mut self) -> bool {
        loop {
            if self.published_rx.is_none() && self.drafts_rx.is_none() && self.saved_rx.is_none() {
                return false;
            }

            tokio::select! {
                changed = feed_changed(&mut self.published_rx) => match changed {
                    Ok(()) => {
                        if let Some(rx) = &self.published_rx {
                            self.state.apply(FeedEvent::Published(rx.borrow().clone()));
                        }
                        return true;
                    }
                    Err(()) => {
                        warn!(feed = "published", "feed closed; serving last snapshot");
                        self.published_rx = None;
                    }
                },
                changed = feed_changed(&mut self.drafts_rx) => match changed {
                    Ok(()) => {
                        if let Some(rx) = &self.drafts_rx {
                            self.state.apply(FeedEvent::Drafts(rx.borrow().clone()));
                        }
                        return true;
                    }
                    Err(()) => {
                        warn!(feed = "drafts", "feed closed; serving last snapshot");
                        self.drafts_rx = None;
                    }
                },
                changed = feed_changed(&mut self.saved_rx) => match changed {
                    Ok(()) => {
                        if let Some(rx) = &self.saved_rx {
                            self.state.apply(FeedEvent::SavedIds(rx.borrow().clone()));
                        }
                        return true;
                    }
                    Err(()) => {
                        warn!(feed = "saved", "feed closed; serving last snapshot");
                        self.saved_rx = None;
                    }
                },
            }
        }
    }

    /// Drop every subscription. The state remains queryable but frozen.
    pub fn close(&mut self) {
        self.published_rx = None;
        self.drafts_rx = None;
        self.saved_rx = None;
    }
}

/// Await a change on an optional feed; a missing feed never fires.
async fn feed_changed<T>(rx: &mut Option<watch::Receiver<T>>) -> Result<(), ()> {
    match rx {
        Some(rx) => rx.changed().await.map_err(|_| ()),
        None => std::future::pending().await,
    }
}

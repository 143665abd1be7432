//! Feed merge and viewer annotation.
//!
//! Consolidates the three independently-arriving snapshots (published
//! tools, the viewer's drafts, the viewer's saved-id set) into one
//! de-duplicated record set annotated with viewer-relative state. Pure and
//! idempotent: re-running with unchanged inputs produces an identical set.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use promptmd_core::Tool;

/// Merge the three feed snapshots into the materialized set.
///
/// Published tools are inserted first, then drafts overlay by id: a tool
/// present as both a stale published copy and a fresher draft resolves to
/// the draft. Every record is annotated with
/// `is_saved = saved_ids.contains(id)`. The result is ordered `updated_at`
/// descending with id ascending as tiebreak, the default listing order.
pub fn materialize(
    published: &[Tool],
    drafts: &[Tool],
    saved_ids: &HashSet<String>,
) -> Vec<Tool> {
    let mut by_id: HashMap<String, Tool> = HashMap::with_capacity(published.len() + drafts.len());
    for tool in published {
        by_id.insert(tool.id.clone(), tool.clone());
    }
    for tool in drafts {
        by_id.insert(tool.id.clone(), tool.clone());
    }

    let mut tools: Vec<Tool> = by_id.into_values().collect();
    for tool in &mut tools {
        tool.is_saved = saved_ids.contains(&tool.id);
    }
    tools.sort_by(|a, b| {
        b.updated_at
            .cmp(&a.updated_at)
            .then_with(|| a.id.cmp(&b.id))
    });

    debug!(
        published = published.len(),
        drafts = drafts.len(),
        saved = saved_ids.len(),
        result_count = tools.len(),
        "materialized catalog set"
    );

    tools
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use promptmd_core::{ToolKind, ToolStatus, ToolTags};

    fn tool(id: &str, status: ToolStatus, title: &str) -> Tool {
        let now = Utc::now();
        Tool {
            id: id.to_string(),
            kind: ToolKind::Prompt,
            status,
            title: title.to_string(),
            description: String::new(),
            content: "content".to_string(),
            example: None,
            sources: Vec::new(),
            tags: ToolTags::default(),
            author_id: "u1".to_string(),
            organization_id: None,
            version: 1,
            created_at: now,
            updated_at: now,
            save_count: 0,
            rating_avg: 0.0,
            rating_count: 0,
            is_saved: false,
        }
    }

    #[test]
    fn test_merge_is_idempotent() {
        let published = vec![tool("a", ToolStatus::Published, "Triage Note")];
        let drafts = vec![tool("b", ToolStatus::Draft, "Discharge Summary")];
        let saved: HashSet<String> = ["a".to_string()].into();

        let first = materialize(&published, &drafts, &saved);
        let second = materialize(&published, &drafts, &saved);
        assert_eq!(first, second);
    }

    #[test]
    fn test_draft_takes_precedence_on_id_collision() {
        let stale = tool("a", ToolStatus::Published, "Old Title");
        let mut fresh = tool("a", ToolStatus::Draft, "New Title");
        fresh.updated_at = stale.updated_at + Duration::seconds(5);

        let merged = materialize(&[stale], &[fresh.clone()], &HashSet::new());
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].title, "New Title");
        assert_eq!(merged[0].status, ToolStatus::Draft);
    }

    #[test]
    fn test_is_saved_annotation_matches_id_set() {
        let published = vec![
            tool("a", ToolStatus::Published, "A"),
            tool("b", ToolStatus::Published, "B"),
        ];
        let saved: HashSet<String> = ["b".to_string(), "ghost".to_string()].into();

        let merged = materialize(&published, &[], &saved);
        for tool in &merged {
            assert_eq!(tool.is_saved, saved.contains(&tool.id));
        }
    }

    #[test]
    fn test_ordering_updated_at_desc_then_id() {
        let mut older = tool("z", ToolStatus::Published, "Older");
        older.updated_at = Utc::now() - Duration::minutes(10);
        let newer = tool("b", ToolStatus::Published, "Newer");
        let mut twin = tool("a", ToolStatus::Published, "Newer Twin");
        twin.updated_at = newer.updated_at;

        let merged = materialize(&[older, newer.clone(), twin], &[], &HashSet::new());
        assert_eq!(merged[0].id, "a");
        assert_eq!(merged[1].id, "b");
        assert_eq!(merged[2].id, "z");
    }

    #[test]
    fn test_empty_feeds_merge_to_empty_set() {
        assert!(materialize(&[], &[], &HashSet::new()).is_empty());
    }
}

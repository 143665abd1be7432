//! Approximate matching of a free-text query against tool fields.
//!
//! Title and description are matched at full weight; every tag string in
//! each of the four categories is matched at [`SearchConfig::tag_weight`],
//! so a tag-only match never outranks a text match of equal quality. Each
//! surviving field carries the contiguous char-index runs the matcher hit,
//! consumed downstream purely for highlighting.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use tracing::debug;

use promptmd_core::defaults::TEXT_WEIGHT;
use promptmd_core::tags::TagCategory;
use promptmd_core::{FieldMatch, MatchField, MatchSpan, SearchConfig, SearchHit, Tool};

/// Match a query against a tool set, producing ranked hits with per-field
/// match spans.
///
/// A blank or whitespace-only query passes every tool through in input
/// order with no annotations. Otherwise hits are sorted by best weighted
/// field score descending (ties: `updated_at` desc, then id) and capped at
/// `config.limit` when set.
pub fn search(tools: &[Tool], query: &str, config: &SearchConfig) -> Vec<SearchHit> {
    let query = query.trim();
    if query.is_empty() {
        return tools
            .iter()
            .map(|tool| SearchHit {
                tool_id: tool.id.clone(),
                score: 0.0,
                matches: Vec::new(),
            })
            .collect();
    }

    let matcher = SkimMatcherV2::default().ignore_case();
    let mut scored: Vec<(&Tool, SearchHit)> = Vec::new();

    for tool in tools {
        let matches = match_tool(&matcher, tool, query, config);
        if matches.is_empty() {
            continue;
        }
        let score = matches.iter().map(|m| m.score).fold(0.0_f32, f32::max);
        scored.push((
            tool,
            SearchHit {
                tool_id: tool.id.clone(),
                score,
                matches,
            },
        ));
    }

    scored.sort_by(|(a_tool, a), (b_tool, b)| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b_tool.updated_at.cmp(&a_tool.updated_at))
            .then_with(|| a_tool.id.cmp(&b_tool.id))
    });

    let mut hits: Vec<SearchHit> = scored.into_iter().map(|(_, hit)| hit).collect();
    if let Some(limit) = config.limit {
        hits.truncate(limit);
    }

    debug!(
        query,
        candidate_count = tools.len(),
        result_count = hits.len(),
        "fuzzy search complete"
    );

    hits
}

/// All surviving field matches for one tool.
fn match_tool(
    matcher: &SkimMatcherV2,
    tool: &Tool,
    query: &str,
    config: &SearchConfig,
) -> Vec<FieldMatch> {
    let mut matches = Vec::new();

    if let Some(m) = match_field(matcher, &tool.title, query, MatchField::Title, TEXT_WEIGHT, config)
    {
        matches.push(m);
    }
    if let Some(m) = match_field(
        matcher,
        &tool.description,
        query,
        MatchField::Description,
        TEXT_WEIGHT,
        config,
    ) {
        matches.push(m);
    }
    for category in TagCategory::ALL {
        for (index, tag) in tool.tags.bucket(category).iter().enumerate() {
            if let Some(m) = match_field(
                matcher,
                tag,
                query,
                MatchField::Tag { category, index },
                config.tag_weight,
                config,
            ) {
                matches.push(m);
            }
        }
    }

    matches
}

/// Match one field, returning its spans and weighted score when it clears
/// the threshold.
fn match_field(
    matcher: &SkimMatcherV2,
    text: &str,
    query: &str,
    field: MatchField,
    weight: f32,
    config: &SearchConfig,
) -> Option<FieldMatch> {
    if text.is_empty() {
        return None;
    }
    let (score, indices) = matcher.fuzzy_indices(text, query)?;
    let weighted = score as f32 * weight;
    if weighted < config.score_threshold {
        return None;
    }
    Some(FieldMatch {
        field,
        spans: spans_from_indices(&indices),
        score: weighted,
    })
}

/// Fold matched char indices into contiguous [start, end) runs.
fn spans_from_indices(indices: &[usize]) -> Vec<MatchSpan> {
    let mut indices = indices.to_vec();
    indices.sort_unstable();
    indices.dedup();

    let mut spans = Vec::new();
    let mut iter = indices.into_iter();
    let Some(first) = iter.next() else {
        return spans;
    };
    let mut start = first;
    let mut prev = first;
    for index in iter {
        if index != prev + 1 {
            spans.push(MatchSpan {
                start,
                end: prev + 1,
            });
            start = index;
        }
        prev = index;
    }
    spans.push(MatchSpan {
        start,
        end: prev + 1,
    });
    spans
}

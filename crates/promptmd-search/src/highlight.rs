//! Char-safe span extraction for match highlighting.
//!
//! Spans are char indices, so byte slicing would panic on multi-byte text.
//! Renderers split a field once around the primary span and style the
//! middle segment.

use promptmd_core::MatchSpan;

/// Split `text` into (before, matched, after) around a char-index span.
///
/// The span is clamped to the text length; an inverted span yields an
/// empty middle segment.
pub fn split_at_span(text: &str, span: MatchSpan) -> (String, String, String) {
    let char_count = text.chars().count();
    let start = span.start.min(char_count);
    let end = span.end.clamp(start, char_count);

    let before: String = text.chars().take(start).collect();
    let matched: String = text.chars().skip(start).take(end - start).collect();
    let after: String = text.chars().skip(end).collect();
    (before, matched, after)
}

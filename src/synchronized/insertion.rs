//! Insertion point for generated lock fields.
//!
//! The fields land after the previous class member and before whatever
//! annotations or Javadoc decorate the rewritten method, so the decoration
//! stays attached to its member.

use crate::synchronized::lexical::{is_in_comment, search_start_line};
use crate::synchronized::scanner::Occurrence;

/// Nearest `;`, `{` or `}` before `start` that is not inside a comment.
pub fn search_prev_delimiter(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    (0..start.min(bytes.len()))
        .rev()
        .find(|&i| matches!(bytes[i], b';' | b'{' | b'}') && !is_in_comment(text, i))
}

/// Line start of the first `@` in `(from, to]` that is not inside a comment.
pub fn search_prev_annotation(text: &str, from: usize, to: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let last = to.min(bytes.len().saturating_sub(1));
    (from + 1..=last)
        .find(|&i| bytes[i] == b'@' && !is_in_comment(text, i))
        .map(|i| search_start_line(text, i))
}

/// Offset at which the field declarations for `occurrence` are spliced in.
pub fn calc_insertion_offset(text: &str, occurrence: &Occurrence) -> usize {
    let prev_delimiter = search_prev_delimiter(text, occurrence.start).unwrap_or(0);
    let prev_annotation =
        search_prev_annotation(text, prev_delimiter, occurrence.start).unwrap_or(0);
    let start_of_line = search_start_line(text, occurrence.start);

    let pos = prev_delimiter.max(prev_annotation.min(start_of_line));
    if pos == 0 || pos == prev_annotation {
        pos
    } else {
        pos + 1
    }
}

//! Lexical context classification.
//!
//! These predicates decide whether a byte offset of Java source text sits
//! inside a comment or on a line that already opened a string literal. They
//! work on the raw text without tokenizing it, which keeps them cheap enough
//! to call for every candidate the scanner finds.

/// Offset of the line break (`\n` or `\r`) preceding `pos`, or 0 when `pos`
/// is on the first line.
pub fn search_start_line(text: &str, pos: usize) -> usize {
    let end = pos.min(text.len());
    text.as_bytes()[..end]
        .iter()
        .rposition(|&b| b == b'\n' || b == b'\r')
        .unwrap_or(0)
}

/// Start of the last occurrence of `needle` that begins at or before `from`.
pub(crate) fn last_index_of(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    let last_start = from.min(haystack.len().checked_sub(needle.len())?);
    (0..=last_start)
        .rev()
        .find(|&i| haystack[i..].starts_with(needle))
}

/// True when `pos` lies inside a comment of either kind.
pub fn is_in_comment(text: &str, pos: usize) -> bool {
    is_in_block_comment(text, pos) || is_in_line_comment(text, pos)
}

/// True when the nearest `/*` at or before `pos` is not closed by a `*/`
/// before `pos`.
pub fn is_in_block_comment(text: &str, pos: usize) -> bool {
    let bytes = text.as_bytes();
    match (
        last_index_of(bytes, b"/*", pos),
        last_index_of(bytes, b"*/", pos),
    ) {
        (Some(open), Some(close)) => open > close,
        (Some(_), None) => true,
        _ => false,
    }
}

/// True when a `//` appears between the start of the line and `pos`.
pub fn is_in_line_comment(text: &str, pos: usize) -> bool {
    let bytes = text.as_bytes();
    if bytes.is_empty() {
        return false;
    }
    let start = pos.min(bytes.len() - 1);
    for i in (0..=start).rev() {
        match bytes[i] {
            b'\n' | b'\r' => return false,
            b'/' if i > 0 && bytes[i - 1] == b'/' => return true,
            _ => {}
        }
    }
    false
}

/// True when a `"` appears on the current line before `pos`.
///
/// This is a heuristic for "inside a string literal or its initializer": it
/// does not pair quotes, honour escapes or understand text blocks.
pub fn is_in_variable(text: &str, pos: usize) -> bool {
    let line_start = search_start_line(text, pos);
    text[line_start..]
        .find('"')
        .is_some_and(|quote| line_start + quote < pos)
}

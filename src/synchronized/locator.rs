//! Method body boundaries for a `synchronized` modifier.
//!
//! Brace counting is purely lexical: braces inside string literals or
//! comments in the body are counted like any other.

use crate::core::{MigrationError, Result};
use crate::synchronized::scanner::Occurrence;

/// Offset of the first `{` after the occurrence.
pub fn find_open_brace(text: &str, occurrence: &Occurrence) -> Result<usize> {
    text.as_bytes()[occurrence.end..]
        .iter()
        .position(|&b| b == b'{')
        .map(|rel| occurrence.end + rel)
        .ok_or(MigrationError::OpenBraceNotFound {
            offset: occurrence.start,
        })
}

/// Offset of the `}` that brings the brace depth, counted from the end of the
/// occurrence, back to zero.
pub fn find_close_brace(text: &str, occurrence: &Occurrence) -> Result<usize> {
    let mut depth: i64 = 0;
    for (rel, &b) in text.as_bytes()[occurrence.end..].iter().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(occurrence.end + rel);
                }
            }
            _ => {}
        }
    }
    Err(MigrationError::CloseBraceNotFound {
        offset: occurrence.start,
    })
}

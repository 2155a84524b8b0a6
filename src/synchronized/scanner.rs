//! Occurrence scanner for the `synchronized` keyword.
//!
//! Every whitespace-delimited `synchronized` token is reported in document
//! order together with its role. Only `Method` occurrences are rewritten;
//! the other kinds exist so the driving loop can step over them.

use crate::core::{MigrationError, Result};
use crate::synchronized::lexical::{is_in_comment, is_in_variable};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

static SYNC_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+synchronized(\s+|\()").expect("valid synchronized pattern"));

const KEYWORD: &str = "synchronized";

/// Role of a `synchronized` token in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OccurrenceKind {
    /// Method modifier, rewritten into an explicit lock
    Method,
    /// `synchronized (expr) { ... }` monitor block, left as is
    Object,
    /// Inside a line or block comment
    Comment,
    /// On a line that already opened a string literal
    Variable,
}

impl fmt::Display for OccurrenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Method => write!(f, "method"),
            Self::Object => write!(f, "object"),
            Self::Comment => write!(f, "comment"),
            Self::Variable => write!(f, "variable"),
        }
    }
}

/// One scanner match. `start..end` covers the keyword together with the
/// whitespace around it (and the `(` of a monitor block written without a
/// space) in the buffer the scan ran on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    pub start: usize,
    pub end: usize,
    pub kind: OccurrenceKind,
}

impl Occurrence {
    pub fn new(start: usize, end: usize, kind: OccurrenceKind) -> Self {
        Self { start, end, kind }
    }

    /// Offset of the keyword itself, past the leading whitespace.
    pub fn keyword_offset(&self, text: &str) -> usize {
        text[self.start..self.end]
            .find(KEYWORD)
            .map_or(self.start, |rel| self.start + rel)
    }
}

/// Find occurrences whose start lies strictly after `after` (`None` scans the
/// whole text). With `only_first` the scan stops at the first hit.
pub fn positions(text: &str, after: Option<usize>, only_first: bool) -> Result<Vec<Occurrence>> {
    let mut found = Vec::new();
    let mut pos = 0;
    while let Some(m) = SYNC_PATTERN.find_at(text, pos) {
        // Resume at the end of the keyword: the whitespace after it may lead
        // into the next token.
        pos = m.start() + m.as_str().find(KEYWORD).unwrap_or(0) + KEYWORD.len();
        if after.is_some_and(|cursor| m.start() <= cursor) {
            continue;
        }
        let kind = classify(text, m.start(), m.end())?;
        found.push(Occurrence::new(m.start(), m.end(), kind));
        if only_first {
            break;
        }
    }
    Ok(found)
}

/// First occurrence strictly after `after`, if any.
pub fn first_position(text: &str, after: Option<usize>) -> Result<Option<Occurrence>> {
    Ok(positions(text, after, true)?.into_iter().next())
}

fn classify(text: &str, start: usize, end: usize) -> Result<OccurrenceKind> {
    if is_in_comment(text, start) {
        return Ok(OccurrenceKind::Comment);
    }
    if is_in_variable(text, start) {
        return Ok(OccurrenceKind::Variable);
    }
    if text[start..end].ends_with('(') {
        return Ok(OccurrenceKind::Object);
    }
    match text[end..].chars().find(|c| !c.is_whitespace()) {
        Some('(') => Ok(OccurrenceKind::Object),
        Some(_) => Ok(OccurrenceKind::Method),
        None => Err(MigrationError::UnclassifiableOccurrence { offset: start }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_positions_mixed_kinds() {
        let code = indoc! {"
            public synchronized boolean yes() {
                return true;
            }

            public boolean no() {
            synchronized(this)  {
                return false;
            }

            public Boolean maybe() {
            synchronized
            (this)  {
                return null;
            }
            }
        "};

        let found = positions(code, None, false).unwrap();
        assert_eq!(
            found,
            vec![
                Occurrence::new(6, 20, OccurrenceKind::Method),
                Occurrence::new(77, 91, OccurrenceKind::Object),
                Occurrence::new(145, 159, OccurrenceKind::Object),
            ]
        );
    }

    #[test]
    fn test_monitor_on_next_line() {
        let code = indoc! {"
            public Boolean maybe() {
            synchronized
            (this)  {
                return null;
            }
            }
        "};

        let found = positions(code, None, true).unwrap();
        assert_eq!(found, vec![Occurrence::new(24, 38, OccurrenceKind::Object)]);
    }

    #[test]
    fn test_identifier_prefix_is_not_a_match() {
        let code = indoc! {"
            public void some() {
                int i=0;
            }

            private final Set<SessionLocal> userSessions = Collections.synchronizedSet(new HashSet<>());

            public boolean yes() {
                return true;
            }
        "};

        assert!(positions(code, None, false).unwrap().is_empty());
    }

    #[test]
    fn test_javadoc_occurrence_is_comment() {
        let code = indoc! {"
            public void some() {
                int i=0;
            }

            /**
             * The stack of byte values. This class is not synchronized and should not be
             * used by multiple threads concurrently.
             */

            public boolean yes() {
                return true;
            }
        "};

        let found = positions(code, None, true).unwrap();
        assert_eq!(found[0].kind, OccurrenceKind::Comment);
    }

    #[test]
    fn test_line_comment_occurrence_is_comment() {
        let code = indoc! {"
            public void some() {
                int i=0;
            }

            // The stack of byte values. This class is not synchronized and should not be

            public boolean yes() {
                return true;
            }
        "};

        let found = positions(code, None, true).unwrap();
        assert_eq!(found[0].kind, OccurrenceKind::Comment);
    }

    #[test]
    fn test_comment_after_license_header() {
        let code = indoc! {"
            /*
             * First comment
             */
            package test;

            /**
             * stack is synchronized
             */

            public class Test {
                public boolean yes() {
                    return true;
                }
            }
        "};

        let found = positions(code, None, true).unwrap();
        assert_eq!(found[0].kind, OccurrenceKind::Comment);
    }

    #[test]
    fn test_string_literal_occurrence_is_variable() {
        let code = indoc! {r#"
            public class Test {
                public boolean yes() {
                    String message = " synchronized after ";
                    return true;
                }
            }
        "#};

        let found = positions(code, None, true).unwrap();
        assert_eq!(found[0].kind, OccurrenceKind::Variable);
    }

    #[test]
    fn test_cursor_excludes_earlier_matches() {
        let code = "a synchronized void x() {}\nb synchronized void y() {}\n";
        let all = positions(code, None, false).unwrap();
        assert_eq!(all.len(), 2);

        let after_first = positions(code, Some(all[0].start), false).unwrap();
        assert_eq!(after_first, vec![all[1]]);
        assert!(first_position(code, Some(all[1].start)).unwrap().is_none());
    }

    #[test]
    fn test_trailing_keyword_is_unclassifiable() {
        let code = "class A { public synchronized   ";
        let err = positions(code, None, false).unwrap_err();
        assert!(matches!(
            err,
            MigrationError::UnclassifiableOccurrence { offset: 16 }
        ));
    }

    #[test]
    fn test_keyword_offset_skips_whitespace() {
        let code = "public\n\t synchronized void x() {}";
        let occ = first_position(code, None).unwrap().unwrap();
        assert_eq!(occ.keyword_offset(code), code.find("synchronized").unwrap());
    }

    #[test]
    fn test_keyword_followed_by_keyword_on_next_line() {
        let code = "class A {\n    // must be synchronized\n    synchronized void f() {\n        g();\n    }\n}\n";
        let found = positions(code, None, false).unwrap();

        let kinds: Vec<_> = found.iter().map(|o| o.kind).collect();
        assert_eq!(kinds, vec![OccurrenceKind::Comment, OccurrenceKind::Method]);
        assert_eq!(found[0].start, code.find(" synchronized").unwrap());
        assert_eq!(found[1].start, code.find("\n    synchronized void").unwrap());
        assert_eq!(found[1].end, code.find("void").unwrap());
    }
}

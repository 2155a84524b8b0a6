//! Drives the scan, locate and splice loop over one file's content.
//!
//! Each rewrite shifts every later offset, so occurrences are recomputed from
//! the new buffer after every splice. Skipped occurrences only move the scan
//! cursor forward. The loop ends when nothing is found past the cursor; the
//! import line is added last, and only when at least one method changed.

use crate::core::{Content, MigrationError, Result};
use crate::synchronized::insertion::calc_insertion_offset;
use crate::synchronized::lexical::is_in_comment;
use crate::synchronized::locator::{find_close_brace, find_open_brace};
use crate::synchronized::locker::LockerKind;
use crate::synchronized::scanner::{first_position, Occurrence, OccurrenceKind};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

static PACKAGE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bpackage\s+").expect("valid package pattern"));

/// Index given to the first lock generated in a file.
pub const FIRST_LOCK_INDEX: usize = 1;

/// Rewrites every method-level `synchronized` modifier of a file into an
/// explicit lock of the configured kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynchronizedRewriter {
    locker: LockerKind,
    indent: usize,
}

impl SynchronizedRewriter {
    pub fn new(locker: LockerKind, indent: usize) -> Self {
        Self { locker, indent }
    }

    pub fn locker(&self) -> LockerKind {
        self.locker
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    pub fn rewrite(&self, source: &str) -> Result<Content> {
        let mut code = source.to_string();
        let mut cursor: Option<usize> = None;
        let mut next_index = FIRST_LOCK_INDEX;

        while let Some(occurrence) = first_position(&code, cursor)? {
            trace!(
                start = occurrence.start,
                end = occurrence.end,
                kind = %occurrence.kind,
                "synchronized occurrence"
            );
            match occurrence.kind {
                OccurrenceKind::Method => {
                    code = rewrite_method(self.locker, &code, &occurrence, next_index, self.indent)?;
                    next_index += 1;
                    cursor = None;
                }
                OccurrenceKind::Object | OccurrenceKind::Comment | OccurrenceKind::Variable => {
                    cursor = Some(occurrence.start);
                }
            }
        }

        let rewritten = next_index - FIRST_LOCK_INDEX;
        if rewritten == 0 {
            return Ok(Content::unchanged(code));
        }
        debug!(rewritten, locker = %self.locker, "rewrote synchronized methods");
        Ok(Content::changed(insert_import(self.locker, &code)?))
    }
}

/// Rewrite `source`, returning the new text and whether anything changed.
pub fn rewrite(source: &str, indent: usize, locker: LockerKind) -> Result<Content> {
    SynchronizedRewriter::new(locker, indent).rewrite(source)
}

/// Wrap the method body in a try/finally and declare its lock fields.
///
/// The body is spliced first: it lies after the occurrence, so the
/// occurrence offsets stay valid for the declaration splice.
pub fn rewrite_method(
    locker: LockerKind,
    text: &str,
    occurrence: &Occurrence,
    idx: usize,
    indent: usize,
) -> Result<String> {
    let open = find_open_brace(text, occurrence)?;
    let close = find_close_brace(text, occurrence)?;
    let code = insert_try(locker, text, open, close, idx, indent);
    Ok(insert_declarations(locker, &code, occurrence, idx, indent))
}

/// Splice the lock/try prologue after `open` and the finally epilogue before
/// `close`.
pub fn insert_try(
    locker: LockerKind,
    text: &str,
    open: usize,
    close: usize,
    idx: usize,
    indent: usize,
) -> String {
    let prologue = locker.open_try(idx, indent);
    let epilogue = locker.close_try(idx, indent);
    let mut out = String::with_capacity(text.len() + prologue.len() + epilogue.len());
    out.push_str(&text[..=open]);
    out.push_str(&prologue);
    out.push_str(&text[open + 1..close]);
    out.push_str(&epilogue);
    out.push_str(&text[close..]);
    out
}

/// Insert the field declarations at the resolved insertion point and drop the
/// `synchronized` token.
///
/// The token and its surrounding whitespace collapse into a single space,
/// except when the modifier started its line: then the leading line break and
/// indentation are kept so the signature stays where it was.
pub fn insert_declarations(
    locker: LockerKind,
    text: &str,
    occurrence: &Occurrence,
    idx: usize,
    indent: usize,
) -> String {
    let pos = calc_insertion_offset(text, occurrence);
    let declarations = locker.declarations(idx, indent);
    let leading = &text[occurrence.start..occurrence.keyword_offset(text)];

    let mut out = String::with_capacity(text.len() + declarations.len());
    out.push_str(&text[..pos]);
    out.push_str(&declarations);
    out.push_str(&text[pos..occurrence.start]);
    if leading.contains(['\n', '\r']) {
        out.push_str(leading);
    } else if leading.starts_with(char::is_whitespace) {
        out.push(' ');
    }
    out.push_str(&text[occurrence.end..]);
    out
}

/// Add the locker's import right after the package declaration, or at the
/// top of the file when there is none.
pub fn insert_import(locker: LockerKind, text: &str) -> Result<String> {
    let package = PACKAGE_PATTERN
        .find_iter(text)
        .find(|m| !is_in_comment(text, m.start()));

    match package {
        Some(m) => {
            let semicolon = text[m.start()..]
                .find(';')
                .map(|rel| m.start() + rel)
                .ok_or(MigrationError::PackageTerminatorMissing { offset: m.start() })?;
            Ok(format!(
                "{}\n\n{}{}",
                &text[..=semicolon],
                locker.import(),
                &text[semicolon + 1..]
            ))
        }
        None => Ok(format!("{}\n\n{}", locker.import(), text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synchronized::scanner::positions;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    const STAMPED: LockerKind = LockerKind::StampedLock;

    #[test]
    fn test_insert_try_wraps_body() {
        let code = indoc! {"
            class Text {
                public synchronized boolean yes() {
                    return true;
                }
            }
        "};
        let occ = first_position(code, None).unwrap().unwrap();
        let open = find_open_brace(code, &occ).unwrap();
        let close = find_close_brace(code, &occ).unwrap();
        assert_eq!((open, close), (51, 78));

        assert_eq!(
            insert_try(STAMPED, code, open, close, 1, 4),
            indoc! {"
                class Text {
                    public synchronized boolean yes() {
                        lock1.lock();
                        try {
                        return true;
                        } finally {
                            lock1.unlock();
                        }
                    }
                }
            "}
        );
    }

    #[test]
    fn test_insert_declarations_at_file_start() {
        let code = indoc! {"
            public synchronized boolean yes() {
                return true;
            }
        "};
        let occ = first_position(code, None).unwrap().unwrap();
        assert_eq!(occ, Occurrence::new(6, 20, OccurrenceKind::Method));

        assert_eq!(
            insert_declarations(STAMPED, code, &occ, 1, 4),
            "\n\n    private static final StampedLock lock1 = new StampedLock();\n\
             public boolean yes() {\n    return true;\n}\n"
        );
    }

    #[test]
    fn test_insert_declarations_before_annotation() {
        let code = indoc! {"
            class Text {

                @Override
                public synchronized boolean yes() {
                    return true;
                }
            }
        "};
        let occ = first_position(code, None).unwrap().unwrap();

        assert_eq!(
            insert_declarations(STAMPED, code, &occ, 1, 4),
            indoc! {"
                class Text {


                    private static final StampedLock lock1 = new StampedLock();

                    @Override
                    public boolean yes() {
                        return true;
                    }
                }
            "}
        );
    }

    #[test]
    fn test_leading_modifier_keeps_line_layout() {
        let code = "class A {\n    synchronized void f() {\n    }\n}\n";
        let occ = first_position(code, None).unwrap().unwrap();

        assert_eq!(
            rewrite_method(STAMPED, code, &occ, 1, 4).unwrap(),
            indoc! {"
                class A {

                    private static final StampedLock lock1 = new StampedLock();

                    void f() {
                        lock1.lock();
                        try {
                        } finally {
                            lock1.unlock();
                        }
                    }
                }
            "}
        );
    }

    #[test]
    fn test_rewrite_method_after_previous_member() {
        let code = indoc! {"
            class Text {
                public void some() {
                    int i=0;
                }

                public synchronized boolean yes() {
                    return true;
                }
            }
        "};
        let occ = first_position(code, None).unwrap().unwrap();

        assert_eq!(
            rewrite_method(STAMPED, code, &occ, 1, 4).unwrap(),
            indoc! {"
                class Text {
                    public void some() {
                        int i=0;
                    }

                    private static final StampedLock lock1 = new StampedLock();


                    public boolean yes() {
                        lock1.lock();
                        try {
                        return true;
                        } finally {
                            lock1.unlock();
                        }
                    }
                }
            "}
        );
    }

    #[test]
    fn test_rewrite_method_keeps_javadoc_with_method() {
        let code = indoc! {"
            class Text {
                public void some() {
                    int i=0;
                }

            /**
             * The stack of byte values. This class is not synchronized and should not be
             * used by multiple threads concurrently.
             */

                public synchronized boolean yes() {
                    return true;
                }
            }
        "};
        let found = positions(code, None, false).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].kind, OccurrenceKind::Comment);

        assert_eq!(
            rewrite_method(STAMPED, code, &found[1], 1, 4).unwrap(),
            indoc! {"
                class Text {
                    public void some() {
                        int i=0;
                    }

                    private static final StampedLock lock1 = new StampedLock();


                /**
                 * The stack of byte values. This class is not synchronized and should not be
                 * used by multiple threads concurrently.
                 */

                    public boolean yes() {
                        lock1.lock();
                        try {
                        return true;
                        } finally {
                            lock1.unlock();
                        }
                    }
                }
            "}
        );
    }

    #[test]
    fn test_insert_import_without_package() {
        let code = "class Text {\n}\n";
        assert_eq!(
            insert_import(STAMPED, code).unwrap(),
            "import java.util.concurrent.locks.StampedLock;\n\nclass Text {\n}\n"
        );
    }

    #[test]
    fn test_insert_import_after_package() {
        let code = indoc! {"
            package metaheuristic;

            public synchronized boolean yes() {
                return true;
            }
        "};
        assert_eq!(
            insert_import(STAMPED, code).unwrap(),
            indoc! {"
                package metaheuristic;

                import java.util.concurrent.locks.StampedLock;

                public synchronized boolean yes() {
                    return true;
                }
            "}
        );
    }

    #[test]
    fn test_insert_import_ignores_package_word_in_header_comment() {
        let code = "/* this package is licensed */\npackage a.b;\nclass A {}\n";
        assert_eq!(
            insert_import(LockerKind::ReentrantReadWriteLock, code).unwrap(),
            "/* this package is licensed */\npackage a.b;\n\n\
             import java.util.concurrent.locks.ReentrantReadWriteLock;\nclass A {}\n"
        );
    }

    #[test]
    fn test_insert_import_requires_package_terminator() {
        let err = insert_import(STAMPED, "package a.b\nclass A {}").unwrap_err();
        assert!(matches!(err, MigrationError::PackageTerminatorMissing { offset: 0 }));
    }

    #[test]
    fn test_rewrite_without_methods_is_unchanged() {
        let code = "class A {\n    void f() {\n        synchronized (this) {}\n    }\n}\n";
        let result = rewrite(code, 4, LockerKind::default()).unwrap();
        assert!(!result.changed);
        assert_eq!(result.content, code);
    }

    #[test]
    fn test_rewrite_propagates_structural_errors() {
        let code = "class A {\n    public synchronized void f() {\n";
        let err = rewrite(code, 4, LockerKind::default()).unwrap_err();
        assert!(err.is_structural());
    }
}

use serde::Serialize;

/// File content after a migration step, with a flag telling whether the
/// step altered it. Callers persist the content only when `changed` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Content {
    pub content: String,
    pub changed: bool,
}

impl Content {
    pub fn unchanged(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            changed: false,
        }
    }

    pub fn changed(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            changed: true,
        }
    }

    /// Merge the outcome of a later step into this one.
    pub fn then(self, next: Content) -> Self {
        Self {
            content: next.content,
            changed: self.changed || next.changed,
        }
    }
}

//! Open-parent stack used for level accounting.
//!
//! Only names from the level-accounting set ever land here. The stack size is
//! the current nesting level.

/// Length the stack shrinks to when `name` closes, or `None` when `name` is
/// not open (the close is ignored).
///
/// Pops down to and including the innermost open `name`, discarding any
/// unclosed entries above it.
#[must_use]
pub fn close_depth<S: AsRef<str>>(stack: &[S], name: &str) -> Option<usize> {
    stack.iter().rposition(|open| open.as_ref().eq_ignore_ascii_case(name))
}

/// Stack of lower-cased open element names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentStack {
    names: Vec<String>,
}

impl ParentStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current nesting level.
    #[must_use]
    pub fn level(&self) -> usize {
        self.names.len()
    }

    pub fn push(&mut self, name: &str) {
        self.names.push(name.to_ascii_lowercase());
    }

    /// Drop the innermost entry, if any.
    pub fn pop(&mut self) -> Option<String> {
        self.names.pop()
    }

    /// Apply a close tag. Returns whether the stack changed.
    pub fn close(&mut self, name: &str) -> bool {
        match close_depth(&self.names, name) {
            Some(depth) => {
                self.names.truncate(depth);
                true
            }
            None => false,
        }
    }

    /// Whether `name` is currently open.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n.eq_ignore_ascii_case(name))
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

//! Configuration for scanning and form extraction.
//!
//! The `Options` struct carries the curated name lists that drive nesting and
//! form recovery. Changing `level_accounting` changes the computed level of
//! every tag, so tests can run with alternate nesting rules.

/// Element names whose open/close events change nesting depth.
pub const DEFAULT_LEVEL_ACCOUNTING: [&str; 7] = ["html", "head", "body", "div", "table", "tr", "td"];

/// Tag names the forms scanner jumps to.
pub const DEFAULT_FORM_TAGS: [&str; 5] = ["form", "input", "select", "option", "textarea"];

/// Configuration options for scanning.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use rs_tagscrape::Options;
///
/// // Use defaults
/// let options = Options::default();
/// assert!(options.is_level_accounting("TD"));
///
/// // Only count divs
/// let options = Options::with_level_accounting(["div"]);
/// assert!(!options.is_level_accounting("table"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Element names that open and close nesting levels.
    ///
    /// Matched case-insensitively. Tags outside this list never change the
    /// level reported by the iterator.
    ///
    /// Default: `html, head, body, div, table, tr, td`
    pub level_accounting: Vec<String>,

    /// Tag names recognised by the forms extractor.
    ///
    /// Any name listed here must be handled by the forms state machine;
    /// extra names make extraction fail with `Error::UnexpectedTag`.
    ///
    /// Default: `form, input, select, option, textarea`
    pub form_tags: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            level_accounting: DEFAULT_LEVEL_ACCOUNTING.iter().map(|s| (*s).to_string()).collect(),
            form_tags: DEFAULT_FORM_TAGS.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl Options {
    /// Create options with a custom level-accounting set and default form tags.
    #[must_use]
    pub fn with_level_accounting<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            level_accounting: names.into_iter().map(|s| s.as_ref().to_ascii_lowercase()).collect(),
            ..Self::default()
        }
    }

    /// Whether `name` opens and closes nesting levels.
    #[must_use]
    pub fn is_level_accounting(&self, name: &str) -> bool {
        self.level_accounting.iter().any(|n| n.eq_ignore_ascii_case(name))
    }
}

//! Compiled regex patterns for light attribute sniffing and link scanning.
//!
//! All patterns are compiled once at startup using `LazyLock` for efficiency.
//! None of them try to understand structure: they match locally and greedily,
//! the same way the tag scanner does.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

use crate::options::DEFAULT_FORM_TAGS;

// =============================================================================
// Diagnostic Outline Patterns
// =============================================================================

/// First `class` value in an attribute span (unquoted token or up to the quote).
pub static ATTR_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)class\s*=\s*['"]?([\w\-]+)"#).expect("ATTR_CLASS regex")
});

/// First `id` value in an attribute span.
pub static ATTR_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)id\s*=\s*['"]?([\w\-]+)"#).expect("ATTR_ID regex")
});

/// First `href` value in an attribute span, quotes included.
pub static ATTR_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)href\s*=\s*('[^']*'|"[^"]*"|[^ >]*)"#).expect("ATTR_HREF regex")
});

// =============================================================================
// Link Patterns
// =============================================================================

/// A tag carrying an `href` or `src` attribute. Group 1 is the attribute name,
/// group 2 the raw value (quotes included). The prefix is greedy, so the last
/// matching attribute of a tag wins.
pub static HTML_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<[^<]+(href|src)\s*=\s*('[^']*'|"[^"]*"|[^ >]*)"#).expect("HTML_LINK regex")
});

// =============================================================================
// Form Patterns
// =============================================================================

/// Start of a form-related tag for the default form tag set.
pub static FORM_DATA: LazyLock<Regex> =
    LazyLock::new(|| form_tag_pattern(&DEFAULT_FORM_TAGS).expect("FORM_DATA regex"));

/// Build the form tag start pattern for a custom name set.
///
/// The name must end at a word boundary so `<optgroup>` or `<inputs>` are not
/// mistaken for `<option>` or `<input>`.
pub fn form_tag_pattern<S: AsRef<str>>(names: &[S]) -> Result<Regex, regex::Error> {
    let alternatives: Vec<String> = names.iter().map(|n| regex::escape(n.as_ref())).collect();
    Regex::new(&format!(r"(?i)<({})\b", alternatives.join("|")))
}

// =============================================================================
// Text Cleaning Patterns
// =============================================================================

/// Matches whitespace runs for normalization.
pub static WHITESPACE_NORMALIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE_NORMALIZE regex"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_and_id_capture_first_token() {
        let attrs = r#" id="main" class='wide  box' "#;
        assert_eq!(&ATTR_ID.captures(attrs).unwrap()[1], "main");
        assert_eq!(&ATTR_CLASS.captures(attrs).unwrap()[1], "wide");
    }

    #[test]
    fn href_keeps_quotes() {
        let attrs = r#" href="/a b" "#;
        assert_eq!(&ATTR_HREF.captures(attrs).unwrap()[1], "\"/a b\"");
        let attrs = " href=/plain>";
        assert_eq!(&ATTR_HREF.captures(attrs).unwrap()[1], "/plain");
    }

    #[test]
    fn form_pattern_respects_word_boundary() {
        assert!(FORM_DATA.is_match("<INPUT name=a>"));
        assert!(FORM_DATA.is_match("<option>"));
        assert!(!FORM_DATA.is_match("<optgroup label=x>"));
        assert!(!FORM_DATA.is_match("</form>"));
    }

    #[test]
    fn custom_form_pattern_escapes_names() {
        let re = form_tag_pattern(&["button"]).unwrap();
        assert!(re.is_match("<Button type=submit>"));
        assert!(!re.is_match("<input>"));
    }
}

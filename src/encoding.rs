//! Character encoding detection and decoding.
//!
//! Scanning works on `&str`, so raw page bytes are decoded first. Pages that
//! declare a charset are decoded with it; everything else is read as
//! ISO-8859-1, the fixed-width legacy encoding this toolkit assumes. Every
//! byte maps to one character under it, so undeclared input never fails.

use encoding_rs::{Encoding, WINDOWS_1252};
use regex::Regex;
use std::sync::LazyLock;

/// Match `<meta charset="...">` tag
#[allow(clippy::expect_used)]
static CHARSET_META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>/]+)"#).expect("valid regex")
});

/// Match `<meta http-equiv="Content-Type" content="...; charset=...">` tag
#[allow(clippy::expect_used)]
static CONTENT_TYPE_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>]+)"#).expect("valid regex")
});

/// Detect character encoding from HTML bytes.
///
/// Looks for charset declarations in the following order:
/// 1. `<meta charset="...">`
/// 2. `<meta http-equiv="Content-Type" content="...; charset=...">`
/// 3. Falls back to windows-1252, which `encoding_rs` (following WHATWG)
///    uses for the `iso-8859-1` label
///
/// Only examines the first 1024 bytes.
#[must_use]
pub fn detect_encoding(html: &[u8]) -> &'static Encoding {
    let head = &html[..html.len().min(1024)];
    let head_str = String::from_utf8_lossy(head);

    let declared = extract_charset(&head_str).or_else(|| extract_content_type_charset(&head_str));
    declared
        .and_then(|charset| Encoding::for_label(charset.as_bytes()))
        .unwrap_or(WINDOWS_1252)
}

fn extract_charset(html: &str) -> Option<String> {
    CHARSET_META_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn extract_content_type_charset(html: &str) -> Option<String> {
    CONTENT_TYPE_CHARSET_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Decode HTML bytes to a `String`.
///
/// Invalid sequences in a declared multi-byte encoding are replaced with
/// U+FFFD rather than causing errors.
///
/// # Examples
///
/// ```
/// use rs_tagscrape::encoding::decode;
///
/// assert_eq!(decode(b"<p>Caf\xE9</p>"), "<p>Café</p>");
/// assert_eq!(decode("<meta charset=utf-8><p>Café</p>".as_bytes()), "<meta charset=utf-8><p>Café</p>");
/// ```
#[must_use]
pub fn decode(html: &[u8]) -> String {
    let encoding = detect_encoding(html);
    let (decoded, used, had_errors) = encoding.decode(html);
    if had_errors {
        tracing::debug!(encoding = used.name(), "replaced undecodable bytes");
    }
    decoded.into_owned()
}

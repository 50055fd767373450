//! Text extraction, markup reassembly and link scanning.

use regex::Regex;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::patterns::{HTML_LINK, WHITESPACE_NORMALIZE};
use crate::scanner::{Item, TagIter};
use crate::Options;

/// Concatenated text of `html` with every tag removed.
///
/// Entities are left as written; pass the result through
/// `entities::expand` and `norm` for display text.
#[must_use]
pub fn text(html: &str, options: &Options) -> String {
    TagIter::new(html, options).filter_map(|item| item.as_text()).collect()
}

/// Concatenated text of an already scanned item sequence.
#[must_use]
pub fn text_items(items: &[Item<'_>]) -> String {
    items.iter().filter_map(Item::as_text).collect()
}

/// Rebuild markup from scanned items: text as is, tags as their
/// `start..end` slice of `html`.
///
/// The slice of a self-closing tag stops before its `>`, so `<br/>` comes
/// back as `<br/`.
#[must_use]
pub fn join(html: &str, items: &[Item<'_>]) -> String {
    let mut out = String::with_capacity(html.len());
    for item in items {
        match item {
            Item::Text(text) => out.push_str(text),
            Item::Tag(tag) => out.push_str(tag.markup(html)),
        }
    }
    out
}

/// Collapse whitespace runs to one space and trim.
#[must_use]
pub fn norm(text: &str) -> String {
    WHITESPACE_NORMALIZE.replace_all(text, " ").trim().to_string()
}

/// The part of `text` after the first `from` marker and before the following
/// `to` marker. A missing marker leaves that side uncut.
#[must_use]
pub fn text_cut<'t>(text: &'t str, from: Option<&str>, to: Option<&str>) -> &'t str {
    let start = from
        .and_then(|marker| text.find(marker).map(|i| i + marker.len()))
        .unwrap_or(0);
    let rest = &text[start..];
    let end = to.and_then(|marker| rest.find(marker)).unwrap_or(rest.len());
    &rest[..end]
}

/// Split `text` on newlines, trimming each line when `strip` is set and
/// dropping empty lines unless `keep_empty` is set.
#[must_use]
pub fn text_lines(text: &str, strip: bool, keep_empty: bool) -> Vec<&str> {
    text.split('\n')
        .map(|line| if strip { line.trim() } else { line })
        .filter(|line| keep_empty || !line.is_empty())
        .collect()
}

/// A link-carrying tag found by `links`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    /// Name of the tag as written (`a`, `img`, `script`, ...).
    pub tag: String,
    /// The `href` or `src` value with surrounding quotes removed.
    pub url: String,
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value.strip_prefix(quote).and_then(|v| v.strip_suffix(quote)) {
            return inner;
        }
    }
    value
}

/// Every `href`/`src` value in `html`, in document order.
///
/// With `like`, only URLs the pattern matches at their start are kept. When a
/// tag carries several link attributes, the last one is reported.
///
/// # Errors
///
/// `Error::EmptyInput` when `html` is empty.
///
/// # Example
///
/// ```rust
/// use rs_tagscrape::text::links;
///
/// let html = r#"<a href="/one">1</a><img src='/pic.png'><a href=/two>2</a>"#;
/// let found = links(html, None).unwrap();
/// let urls: Vec<_> = found.iter().map(|l| l.url.as_str()).collect();
/// assert_eq!(urls, ["/one", "/pic.png", "/two"]);
/// assert_eq!(found[1].tag, "img");
/// ```
pub fn links(html: &str, like: Option<&Regex>) -> Result<Vec<Link>> {
    if html.is_empty() {
        return Err(Error::EmptyInput);
    }

    let mut found = Vec::new();
    for caps in HTML_LINK.captures_iter(html) {
        let (Some(whole), Some(value)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        let tag = whole.as_str()[1..]
            .split(|c: char| c.is_ascii_whitespace())
            .next()
            .unwrap_or("");
        let url = unquote(value.as_str());
        let wanted = like.is_none_or(|re| re.find(url).is_some_and(|m| m.start() == 0));
        if wanted {
            found.push(Link { tag: tag.to_string(), url: url.to_string() });
        }
    }
    Ok(found)
}

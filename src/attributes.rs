//! Attribute string parsing.
//!
//! Turns the raw text between a tag name and its closing `>` into a
//! name → value mapping. The parser is forgiving: unbalanced quotes run to the
//! end of the text, valueless names become boolean attributes, and repeated
//! names keep the last value.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Attribute mapping with lower-cased names. `None` marks a valueless
/// (boolean) attribute such as `checked`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, Option<String>>);

impl Attributes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an attribute. The name is lower-cased.
    pub fn insert(&mut self, name: &str, value: Option<&str>) {
        self.0.insert(name.to_ascii_lowercase(), value.map(str::to_string));
    }

    pub fn remove(&mut self, name: &str) -> Option<Option<String>> {
        self.0.remove(&name.to_ascii_lowercase())
    }

    /// Raw entry: `Some(None)` for a boolean attribute, `None` when absent.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.0.get(&name.to_ascii_lowercase()).map(Option::as_deref)
    }

    /// Value of a valued attribute.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).flatten()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(&name.to_ascii_lowercase())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Serialize back to attribute markup.
    ///
    /// Values are double-quoted unless they contain `"`, in which case single
    /// quotes are used. A value holding both quote characters can only come
    /// from an unquoted source, so it is written unquoted. Boolean attributes
    /// are written bare.
    #[must_use]
    pub fn to_html(&self) -> String {
        self.iter()
            .map(|(name, value)| match value {
                None => name.to_string(),
                Some(v) if v.contains('"') && v.contains('\'') => format!("{name}={v}"),
                Some(v) if v.contains('"') => format!("{name}='{v}'"),
                Some(v) => format!("{name}=\"{v}\""),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = (&'a String, &'a Option<String>);
    type IntoIter = btree_map::Iter<'a, String, Option<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, Option<V>)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        let mut attrs = Self::new();
        for (k, v) in iter {
            attrs.insert(k.as_ref(), v.as_ref().map(|s| s.as_ref()));
        }
        attrs
    }
}

/// Split a value off the front of `text`: quoted up to the matching quote,
/// otherwise up to the next whitespace. Returns `(value, remainder)`.
fn split_value(text: &str) -> (&str, &str) {
    match text.chars().next() {
        Some(quote @ ('"' | '\'')) => {
            let body = &text[1..];
            match body.find(quote) {
                Some(end) => (&body[..end], &body[end + 1..]),
                None => (body, ""),
            }
        }
        Some(_) => {
            let end = text.find(|c: char| c.is_ascii_whitespace()).unwrap_or(text.len());
            (&text[..end], &text[end..])
        }
        None => ("", ""),
    }
}

/// Parse a raw attribute string.
///
/// Works left to right: find the next `=`. Without one, the rest is a list of
/// boolean names. With one, the last word before it is the name (earlier
/// words are boolean names) and the value follows, quoted or up to the next
/// whitespace.
///
/// # Example
///
/// ```rust
/// use rs_tagscrape::parse_attributes;
///
/// let attrs = parse_attributes(r#"ID=all type=radio name=meta value="" checked"#);
/// assert_eq!(attrs.value("id"), Some("all"));
/// assert_eq!(attrs.value("value"), Some(""));
/// assert_eq!(attrs.get("checked"), Some(None));
/// ```
#[must_use]
pub fn parse_attributes(text: &str) -> Attributes {
    let mut attrs = Attributes::new();
    let mut rest = text.trim();

    while !rest.is_empty() {
        let Some(eq) = rest.find('=') else {
            for name in rest.split_ascii_whitespace() {
                attrs.insert(name, None);
            }
            break;
        };

        let mut words: Vec<&str> = rest[..eq].split_ascii_whitespace().collect();
        let name = words.pop();
        for flag in words {
            attrs.insert(flag, None);
        }

        let (value, remainder) = split_value(rest[eq + 1..].trim_start());
        if let Some(name) = name {
            attrs.insert(name, Some(value));
        }
        rest = remainder.trim_start();
    }

    attrs
}

/// Parse a lone tag string such as `<input type="text" name=q/>` into its
/// name and attributes.
#[must_use]
pub fn parse_tag(text: &str) -> (String, Attributes) {
    let text = text.trim();
    let text = text
        .strip_prefix("</")
        .or_else(|| text.strip_prefix('<'))
        .unwrap_or(text);
    let text = text
        .strip_suffix("/>")
        .or_else(|| text.strip_suffix('>'))
        .unwrap_or(text);

    match text.find(|c: char| c.is_ascii_whitespace()) {
        Some(space) => (text[..space].to_string(), parse_attributes(&text[space..])),
        None => (text.trim().to_string(), Attributes::new()),
    }
}

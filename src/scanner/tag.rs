//! Single-tag scanning.
//!
//! `next_tag` finds one tag at a time with purely local, greedy matching: a tag
//! starts at `<` or `</` followed by a word character and ends at the nearest
//! `>`. Nothing inside attribute values is treated specially.

use memchr::memchr;
use serde::Serialize;

/// Kind of a scanned tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TagKind {
    /// `<name ...>`
    Open,
    /// `</name ...>`
    Close,
    /// `<name .../>`
    SelfClosing,
}

/// One scanned tag, borrowed from the source text.
///
/// Offsets are byte offsets into the scanned text. `end` is always
/// `attr_end + 1`: for `<br/>` it points at the `>`, not past it. Consumers
/// slicing `start..end` rely on that shape, so it is kept as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TagDescriptor<'a> {
    /// Nesting level computed by the iterator (always 0 straight from the scanner).
    pub level: usize,
    /// Open, close or self-closing.
    pub kind: TagKind,
    /// Tag name as written in the source.
    pub name: &'a str,
    /// Offset of the `<`.
    pub start: usize,
    /// `attr_end + 1`.
    pub end: usize,
    /// Offset just past the tag name.
    pub attr_start: usize,
    /// Offset of the closing `>`, or of the `/` in `/>`.
    pub attr_end: usize,
}

/// Tuple form `(level, kind, name, start, end, attr_start, attr_end)`.
pub type TagTuple<'a> = (usize, TagKind, &'a str, usize, usize, usize, usize);

impl<'a> TagDescriptor<'a> {
    /// The descriptor in tuple order.
    #[must_use]
    pub fn as_tuple(&self) -> TagTuple<'a> {
        (self.level, self.kind, self.name, self.start, self.end, self.attr_start, self.attr_end)
    }

    /// Raw attribute text (between the name and the closing marker).
    #[must_use]
    pub fn attributes_text<'h>(&self, html: &'h str) -> &'h str {
        html.get(self.attr_start..self.attr_end).unwrap_or("")
    }

    /// Markup slice `start..end`.
    #[must_use]
    pub fn markup<'h>(&self, html: &'h str) -> &'h str {
        html.get(self.start..self.end).unwrap_or("")
    }

    /// Whether the tag name equals `name`, ignoring ASCII case.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.kind == TagKind::Open
    }

    #[must_use]
    pub fn is_close(&self) -> bool {
        self.kind == TagKind::Close
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Locate `</?\w+` at or after `from`. Returns `(start, name_start, name_end)`.
fn find_tag_start(bytes: &[u8], mut from: usize) -> Option<(usize, usize, usize)> {
    while from < bytes.len() {
        let lt = from + memchr(b'<', &bytes[from..])?;
        let mut name_start = lt + 1;
        if bytes.get(name_start) == Some(&b'/') {
            name_start += 1;
        }
        let name_len = bytes[name_start.min(bytes.len())..]
            .iter()
            .take_while(|b| is_word_byte(**b))
            .count();
        if name_len > 0 {
            return Some((lt, name_start, name_start + name_len));
        }
        from = lt + 1;
    }
    None
}

/// Find the next tag at or after `offset`.
///
/// Returns the descriptor (level 0) and the offset just past the tag's `>`.
/// A tag whose `>` never comes is skipped; since no later tag could be
/// terminated either, scanning stops there.
#[must_use]
pub fn next_tag(html: &str, offset: usize) -> Option<(TagDescriptor<'_>, usize)> {
    let bytes = html.as_bytes();
    if offset >= bytes.len().saturating_sub(1) {
        return None;
    }

    let (start, name_start, name_end) = find_tag_start(bytes, offset)?;
    let Some(gt) = memchr(b'>', &bytes[name_end..]).map(|i| name_end + i) else {
        tracing::debug!(offset = start, "unterminated tag, nothing left to scan");
        return None;
    };

    let self_closing = gt > name_end && bytes[gt - 1] == b'/';
    let attr_end = if self_closing { gt - 1 } else { gt };
    let kind = if name_start == start + 2 {
        TagKind::Close
    } else if self_closing {
        TagKind::SelfClosing
    } else {
        TagKind::Open
    };

    let tag = TagDescriptor {
        level: 0,
        kind,
        name: &html[name_start..name_end],
        start,
        end: attr_end + 1,
        attr_start: name_end,
        attr_end,
    };
    Some((tag, gt + 1))
}

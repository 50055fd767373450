//! Level-tracking streaming iterator over tags and text.
//!
//! `TagIter` drives `next_tag` repeatedly and yields text chunks and tag
//! descriptors in source order. Only tags from `Options::level_accounting`
//! move the nesting level:
//!
//! - a close tag pops down to and including its open counterpart, and the
//!   descriptor carries the level after the pop;
//! - an open tag is pushed after it is yielded, so its descriptor carries its
//!   own depth rather than its children's.
//!
//! Close tags for names that are not open are ignored. The iterator never
//! fails on malformed input.

use std::collections::VecDeque;
use std::io::Write;

use super::stack::ParentStack;
use super::tag::{next_tag, TagDescriptor, TagKind};
use crate::patterns::{ATTR_CLASS, ATTR_HREF, ATTR_ID};
use crate::Options;

/// One item of the scanned stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item<'a> {
    /// Raw text between tags (never empty).
    Text(&'a str),
    /// A tag annotated with its nesting level.
    Tag(TagDescriptor<'a>),
}

impl<'a> Item<'a> {
    #[must_use]
    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            Item::Text(text) => Some(text),
            Item::Tag(_) => None,
        }
    }

    #[must_use]
    pub fn as_tag(&self) -> Option<&TagDescriptor<'a>> {
        match self {
            Item::Tag(tag) => Some(tag),
            Item::Text(_) => None,
        }
    }
}

/// Lazy, single-pass scan of one document or fragment.
///
/// # Example
///
/// ```rust
/// use rs_tagscrape::{iterate, Item, Options};
///
/// let options = Options::default();
/// let levels: Vec<usize> = iterate("<div><div>x</div></div>", &options)
///     .filter_map(|item| item.as_tag().map(|tag| tag.level))
///     .collect();
/// assert_eq!(levels, [0, 1, 1, 0]);
/// ```
pub struct TagIter<'a> {
    html: &'a str,
    options: &'a Options,
    offset: usize,
    parents: ParentStack,
    close_on: Vec<String>,
    recent: VecDeque<String>,
    pending: Option<TagDescriptor<'a>>,
    last: Option<TagDescriptor<'a>>,
    sink: Option<Box<dyn Write + 'a>>,
    finished: bool,
}

impl<'a> TagIter<'a> {
    #[must_use]
    pub fn new(html: &'a str, options: &'a Options) -> Self {
        Self {
            html,
            options,
            offset: 0,
            parents: ParentStack::new(),
            close_on: Vec::new(),
            recent: VecDeque::new(),
            pending: None,
            last: None,
            sink: None,
            finished: false,
        }
    }

    /// Pop one level whenever the trailing tag names seen equal `names`.
    ///
    /// Lets callers close elements the markup never closes, for instance a
    /// cell that ends when the next one starts.
    #[must_use]
    pub fn close_on<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.close_on = names.into_iter().map(|s| s.as_ref().to_ascii_lowercase()).collect();
        self
    }

    /// Write an indented outline line per tag to `sink` while scanning.
    #[must_use]
    pub fn with_diagnostics<W: Write + 'a>(mut self, sink: W) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Current nesting level.
    #[must_use]
    pub fn level(&self) -> usize {
        self.parents.level()
    }

    fn track_recent(&mut self, name: &str) {
        if self.close_on.is_empty() {
            return;
        }
        while self.recent.len() >= self.close_on.len() {
            self.recent.pop_front();
        }
        self.recent.push_back(name.to_ascii_lowercase());
    }

    fn recent_matches_close_on(&self) -> bool {
        !self.close_on.is_empty() && self.recent.iter().eq(self.close_on.iter())
    }

    fn write_outline(&mut self, tag: &TagDescriptor<'a>) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        if let Some(last) = &self.last {
            if last.kind == TagKind::Open
                && tag.kind == TagKind::Close
                && last.level == tag.level
                && last.name.eq_ignore_ascii_case(tag.name)
            {
                return;
            }
        }

        let attrs = tag.attributes_text(self.html);
        let mut meta = Vec::new();
        if let Some(id) = ATTR_ID.captures(attrs) {
            meta.push(format!("#{}", &id[1]));
        }
        if let Some(class) = ATTR_CLASS.captures(attrs) {
            meta.push(format!(".{}", &class[1]));
        }
        if let Some(href) = ATTR_HREF.captures(attrs) {
            meta.push(format!("<{}>", &href[1]));
        }
        let meta = if meta.is_empty() { String::new() } else { format!(": {}", meta.join(", ")) };

        let line = format!("{:<3} {}{}{}\n", tag.level, "| ".repeat(tag.level), tag.name, meta);
        if let Err(err) = sink.write_all(line.as_bytes()) {
            tracing::warn!(error = %err, "diagnostic sink failed, outline disabled");
            self.sink = None;
        }
    }

    /// Run the level bookkeeping for a freshly scanned tag and return it with
    /// its level set.
    fn account(&mut self, mut tag: TagDescriptor<'a>) -> TagDescriptor<'a> {
        self.track_recent(tag.name);
        let counted = self.options.is_level_accounting(tag.name);

        if counted && tag.kind == TagKind::Close && !self.parents.close(tag.name) {
            tracing::debug!(name = tag.name, offset = tag.start, "close tag without open parent ignored");
        }

        tag.level = self.parents.level();
        self.write_outline(&tag);
        self.last = Some(tag);

        if self.recent_matches_close_on() {
            self.parents.pop();
        }
        if counted && tag.kind == TagKind::Open {
            self.parents.push(tag.name);
        }
        tag
    }
}

impl<'a> Iterator for TagIter<'a> {
    type Item = Item<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(tag) = self.pending.take() {
            return Some(Item::Tag(tag));
        }
        if self.finished {
            return None;
        }

        let html = self.html;
        match next_tag(html, self.offset) {
            Some((tag, next_offset)) => {
                let text_start = self.offset;
                let tag = self.account(tag);
                self.offset = next_offset;
                if tag.start > text_start {
                    self.pending = Some(tag);
                    Some(Item::Text(&html[text_start..tag.start]))
                } else {
                    Some(Item::Tag(tag))
                }
            }
            None => {
                self.finished = true;
                let rest = &html[self.offset.min(html.len())..];
                (!rest.is_empty()).then_some(Item::Text(rest))
            }
        }
    }
}

//! Level-based filtering and splitting of a scanned document.
//!
//! Each operation runs its own `TagIter` pass and infers parents from the
//! reported levels, the same way the tree builder does, without building a
//! tree.

use std::cmp::Ordering;
use std::ops::BitOr;

use crate::scanner::{Item, TagIter, TagKind};
use crate::Options;

/// Which side of a target level to keep. Combine with `|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keep {
    above: bool,
    same: bool,
    below: bool,
}

impl Keep {
    /// Levels shallower than the target (`level < target`).
    pub const ABOVE: Keep = Keep { above: true, same: false, below: false };
    /// The target level itself.
    pub const SAME: Keep = Keep { above: false, same: true, below: false };
    /// Levels deeper than the target (`level > target`).
    pub const BELOW: Keep = Keep { above: false, same: false, below: true };

    /// Whether an item at `level` survives a cut at `target`.
    #[must_use]
    pub fn admits(self, level: usize, target: usize) -> bool {
        match level.cmp(&target) {
            Ordering::Less => self.above,
            Ordering::Equal => self.same,
            Ordering::Greater => self.below,
        }
    }
}

impl Default for Keep {
    fn default() -> Self {
        Self::ABOVE
    }
}

impl BitOr for Keep {
    type Output = Keep;

    fn bitor(self, rhs: Keep) -> Keep {
        Keep {
            above: self.above || rhs.above,
            same: self.same || rhs.same,
            below: self.below || rhs.below,
        }
    }
}

/// Settings for `cut`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutOptions {
    /// Target level. `None` keeps every level.
    pub level: Option<usize>,
    /// Keep only items with one of these names among their inferred parents
    /// (the item itself included). Empty keeps everything.
    pub tags: Vec<String>,
    /// Whether text items are emitted at all.
    pub text: bool,
    /// Which side of `level` to keep.
    pub keep: Keep,
}

impl Default for CutOptions {
    fn default() -> Self {
        Self { level: None, tags: Vec::new(), text: true, keep: Keep::ABOVE }
    }
}

/// Iterator returned by `cut`.
pub struct Cut<'a> {
    inner: TagIter<'a>,
    level: Option<usize>,
    tags: Vec<String>,
    text: bool,
    keep: Keep,
    parents: Vec<String>,
    last_level: usize,
}

impl Cut<'_> {
    fn admits(&self, level: usize) -> bool {
        self.level.is_none_or(|target| self.keep.admits(level, target))
    }

    fn under_wanted_parent(&self) -> bool {
        self.tags.is_empty() || self.tags.iter().any(|t| self.parents.contains(t))
    }
}

impl<'a> Iterator for Cut<'a> {
    type Item = Item<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let item = self.inner.next()?;
            match item {
                Item::Text(_) => {
                    // Text sits one level below the last tag seen.
                    if self.text && self.admits(self.last_level + 1) && self.under_wanted_parent() {
                        return Some(item);
                    }
                }
                Item::Tag(tag) => {
                    self.parents.truncate(tag.level);
                    if tag.kind != TagKind::Close {
                        self.parents.push(tag.name.to_ascii_lowercase());
                    }
                    self.last_level = tag.level;
                    if self.admits(tag.level) && self.under_wanted_parent() {
                        return Some(item);
                    }
                }
            }
        }
    }
}

/// Filter the item stream of `html` by level and parent names.
///
/// # Example
///
/// ```rust
/// use rs_tagscrape::cut::{cut, CutOptions, Keep};
/// use rs_tagscrape::Options;
///
/// let options = Options::default();
/// let html = "<div>a<div>b</div></div>";
/// let cut_options = CutOptions { level: Some(1), keep: Keep::SAME, ..CutOptions::default() };
/// let names: Vec<_> = cut(html, &options, cut_options)
///     .filter_map(|item| item.as_tag().map(|t| t.name))
///     .collect();
/// assert_eq!(names, ["div", "div"]);
/// ```
#[must_use]
pub fn cut<'a>(html: &'a str, options: &'a Options, cut_options: CutOptions) -> Cut<'a> {
    Cut {
        inner: TagIter::new(html, options),
        level: cut_options.level,
        tags: cut_options.tags.iter().map(|t| t.to_ascii_lowercase()).collect(),
        text: cut_options.text,
        keep: cut_options.keep,
        parents: Vec::new(),
        last_level: 0,
    }
}

/// What `split` emits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SplitMode {
    /// Blocks of text bounded by delimiters, delimiter markup included.
    #[default]
    Both,
    /// Only the markup of non-close delimiter tags.
    TagOnly,
    /// Cut on the inner side of each delimiter, so content blocks carry no
    /// delimiter markup and the markup lands in the blocks between them.
    ContentOnly,
}

/// Settings for `split`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitOptions {
    /// Level of the delimiting tags. `None` takes the level of the first
    /// qualifying tag.
    pub level: Option<usize>,
    /// Delimiting tag names. Empty accepts any tag at the level.
    pub tags: Vec<String>,
    /// Drop the block before each opening delimiter and the trailing rest.
    pub strip: bool,
    pub mode: SplitMode,
}

/// Iterator returned by `split`.
pub struct Split<'a> {
    html: &'a str,
    inner: TagIter<'a>,
    level: Option<usize>,
    tags: Vec<String>,
    strip: bool,
    mode: SplitMode,
    offset: usize,
    done: bool,
}

impl<'a> Iterator for Split<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        for item in self.inner.by_ref() {
            let Item::Tag(tag) = item else {
                continue;
            };
            if !self.tags.is_empty() && !self.tags.iter().any(|t| tag.is(t)) {
                continue;
            }
            match self.level {
                Some(level) if level != tag.level => continue,
                Some(_) => {}
                None => self.level = Some(tag.level),
            }

            let content_only = self.mode == SplitMode::ContentOnly;
            let cut_at = match (tag.kind, content_only) {
                (TagKind::Open, true) | (TagKind::Close | TagKind::SelfClosing, false) => tag.end,
                (TagKind::Open, false) | (TagKind::Close | TagKind::SelfClosing, true) => tag.start,
            };
            let block = if self.strip && tag.kind == TagKind::Open {
                None
            } else if self.mode == SplitMode::TagOnly {
                (tag.kind != TagKind::Close).then(|| tag.markup(self.html))
            } else {
                self.html.get(self.offset..cut_at)
            };
            self.offset = cut_at;
            if block.is_some() {
                return block;
            }
        }

        self.done = true;
        if self.strip || self.mode == SplitMode::TagOnly {
            return None;
        }
        self.html.get(self.offset..)
    }
}

/// Split `html` into consecutive blocks bounded by delimiter tags.
///
/// Opening delimiters start a block and closing ones end it, so with the
/// default mode the blocks alternate between "outside" and "inside" text and
/// concatenate back to the input.
///
/// # Example
///
/// ```rust
/// use rs_tagscrape::cut::{split, SplitOptions};
/// use rs_tagscrape::Options;
///
/// let options = Options::default();
/// let html = "a<div>b</div>c";
/// let split_options = SplitOptions { tags: vec!["div".into()], ..SplitOptions::default() };
/// let blocks: Vec<_> = split(html, &options, split_options).collect();
/// assert_eq!(blocks, ["a", "<div>b</div>", "c"]);
/// ```
#[must_use]
pub fn split<'a>(html: &'a str, options: &'a Options, split_options: SplitOptions) -> Split<'a> {
    Split {
        html,
        inner: TagIter::new(html, options),
        level: split_options.level,
        tags: split_options.tags,
        strip: split_options.strip,
        mode: split_options.mode,
        offset: 0,
        done: false,
    }
}

fn is_named<S: AsRef<str>>(names: &[S], name: &str) -> bool {
    names.iter().any(|n| n.as_ref().eq_ignore_ascii_case(name))
}

/// Distinct levels at which any of `names` occurs, ascending.
#[must_use]
pub fn levels<S: AsRef<str>>(html: &str, options: &Options, names: &[S]) -> Vec<usize> {
    let mut found: Vec<usize> = TagIter::new(html, options)
        .filter_map(|item| item.as_tag().filter(|t| is_named(names, t.name)).map(|t| t.level))
        .collect();
    found.sort_unstable();
    found.dedup();
    found
}

/// Level of the first tag named in `names`.
#[must_use]
pub fn level_of<S: AsRef<str>>(html: &str, options: &Options, names: &[S]) -> Option<usize> {
    TagIter::new(html, options)
        .find_map(|item| item.as_tag().filter(|t| is_named(names, t.name)).map(|t| t.level))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NESTED: &str = "<div>a<div>b<div>c</div></div></div>";

    fn tag_levels<'a>(items: impl Iterator<Item = Item<'a>>) -> Vec<usize> {
        items.filter_map(|i| i.as_tag().map(|t| t.level)).collect()
    }

    #[test]
    fn keep_combines_with_bitor() {
        let keep = Keep::ABOVE | Keep::SAME;
        assert!(keep.admits(0, 1));
        assert!(keep.admits(1, 1));
        assert!(!keep.admits(2, 1));
        assert_eq!(Keep::default(), Keep::ABOVE);
    }

    #[test]
    fn cut_without_level_keeps_everything() {
        let options = Options::default();
        assert_eq!(cut(NESTED, &options, CutOptions::default()).count(), 9);
    }

    #[test]
    fn cut_below_keeps_deeper_items() {
        let options = Options::default();
        let cut_options = CutOptions { level: Some(1), keep: Keep::BELOW, ..CutOptions::default() };
        let items: Vec<_> = cut(NESTED, &options, cut_options).collect();
        assert_eq!(tag_levels(items.iter().copied()), [2, 2]);
        let texts: Vec<_> = items.iter().filter_map(Item::as_text).collect();
        assert_eq!(texts, ["b", "c"]);
    }

    #[test]
    fn cut_can_drop_text() {
        let options = Options::default();
        let cut_options = CutOptions { text: false, ..CutOptions::default() };
        assert!(cut(NESTED, &options, cut_options).all(|i| i.as_tag().is_some()));
    }

    #[test]
    fn cut_by_parent_tag() {
        let options = Options::default();
        let html = "<div><table><tr><td>x</td></tr></table></div><div>y</div>";
        let cut_options = CutOptions { tags: vec!["TABLE".into()], ..CutOptions::default() };
        let texts: Vec<_> = cut(html, &options, cut_options).filter_map(|i| i.as_text()).collect();
        assert_eq!(texts, ["x"]);
    }

    #[test]
    fn split_content_only_cuts_inside_delimiters() {
        let options = Options::default();
        let html = "<td>1</td><td>2</td>";
        let split_options = SplitOptions { mode: SplitMode::ContentOnly, ..SplitOptions::default() };
        let blocks: Vec<_> = split(html, &options, split_options).collect();
        assert_eq!(blocks, ["<td>", "1", "</td><td>", "2", "</td>"]);
    }

    #[test]
    fn split_tag_only_yields_opening_markup() {
        let options = Options::default();
        let html = "<td a=1>1</td><td a=2>2</td>";
        let split_options = SplitOptions { mode: SplitMode::TagOnly, ..SplitOptions::default() };
        let blocks: Vec<_> = split(html, &options, split_options).collect();
        assert_eq!(blocks, ["<td a=1>", "<td a=2>"]);
    }

    #[test]
    fn split_strip_keeps_only_delimited_blocks() {
        let options = Options::default();
        let html = "head<div>a</div>mid<div>b</div>tail";
        let split_options = SplitOptions { strip: true, ..SplitOptions::default() };
        let blocks: Vec<_> = split(html, &options, split_options).collect();
        assert_eq!(blocks, ["<div>a</div>", "<div>b</div>"]);
    }

    #[test]
    fn split_auto_detects_level() {
        let options = Options::default();
        let html = "<div><div>a</div><div>b</div></div>";
        let split_options = SplitOptions { level: Some(1), ..SplitOptions::default() };
        let blocks: Vec<_> = split(html, &options, split_options).collect();
        assert_eq!(blocks, ["<div>", "<div>a</div>", "", "<div>b</div>", "</div>"]);

        let auto: Vec<_> = split(html, &options, SplitOptions::default()).collect();
        assert_eq!(auto, ["", html, ""]);
    }

    #[test]
    fn levels_and_level_of() {
        let options = Options::default();
        assert_eq!(levels(NESTED, &options, &["div"]), [0, 1, 2]);
        assert_eq!(levels(NESTED, &options, &["p"]), Vec::<usize>::new());
        assert_eq!(level_of("<table><tr><td>", &options, &["TD", "th"]), Some(2));
        assert_eq!(level_of(NESTED, &options, &["span"]), None);
    }
}

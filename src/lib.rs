//! # rs-tagscrape
//!
//! Tolerant tag scanning for HTML that nobody promised was well-formed.
//!
//! The crate never builds a conforming DOM. It finds tags one at a time with
//! local, greedy matching, tracks an approximate nesting level from a small set
//! of structural elements, and lets several independent consumers work from
//! that stream: a node tree, level-based cuts and splits, text and link
//! helpers. Forms are recovered by a separate, even simpler scan so their
//! inputs and default values survive markup the tree would mangle.
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_tagscrape::{build_tree, extract_forms, iterate, NodeQuery, Options};
//!
//! let html = r#"<html><body><div id=nav>menu</div>
//! <form name=search action="/find"><input name=q value="rust"></form></body></html>"#;
//! let options = Options::default();
//!
//! // Stream of text chunks and leveled tags
//! let tags = iterate(html, &options).filter(|item| item.as_tag().is_some()).count();
//! assert_eq!(tags, 9);
//!
//! // Approximate tree
//! let root = build_tree(html, &options);
//! let nav = root.find(&NodeQuery::name("div").with_attr("id", Some("nav")));
//! assert_eq!(nav.map(|n| n.text()).as_deref(), Some("menu"));
//!
//! // Forms with their defaults
//! let forms = extract_forms(html, &options)?;
//! assert_eq!(forms["search"].values["q"], "rust");
//! # Ok::<(), rs_tagscrape::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Tag Scanner**: one tag at a time, unterminated markup skipped
//! - **Streaming Iterator**: lazy items with nesting levels and an optional outline sink
//! - **Tree Builder**: owned node tree with queries and approximate serialization
//! - **Cut / Split**: filter or partition a document by level and tag name
//! - **Forms**: recovery, pre-filled values and submission parameters

mod error;
mod options;
mod patterns;

/// Tag scanner, parent stack and leveled streaming iterator.
pub mod scanner;

/// Attribute string parsing and serialization.
pub mod attributes;

/// Node tree built from the iterator stream.
pub mod tree;

/// Level-based cut, split and level lookups.
pub mod cut;

/// Form recovery and submission parameters.
pub mod forms;

/// Text extraction, markup reassembly and link scanning.
pub mod text;

/// HTML character entity expansion.
pub mod entities;

/// Character encoding detection and decoding.
pub mod encoding;

// Public API - re-exports
pub use attributes::{parse_attributes, parse_tag, Attributes};
pub use cut::{cut, level_of, levels, split, CutOptions, Keep, SplitMode, SplitOptions};
pub use error::{Error, Result};
pub use forms::{extract_forms, Form};
pub use options::{Options, DEFAULT_FORM_TAGS, DEFAULT_LEVEL_ACCOUNTING};
pub use scanner::{Item, TagDescriptor, TagIter, TagKind};
pub use text::Link;
pub use tree::{build_tree, Node, NodeKind, NodeQuery};

/// Scan `html` lazily, yielding text chunks and leveled tags.
///
/// # Example
///
/// ```rust
/// use rs_tagscrape::{iterate, Options};
///
/// let options = Options::default();
/// let names: Vec<_> = iterate("<p>a</p><br/>", &options)
///     .filter_map(|item| item.as_tag().map(|t| t.name))
///     .collect();
/// assert_eq!(names, ["p", "p", "br"]);
/// ```
#[must_use]
pub fn iterate<'a>(html: &'a str, options: &'a Options) -> TagIter<'a> {
    TagIter::new(html, options)
}

/// Decode raw page bytes and build the node tree with default options.
///
/// # Example
///
/// ```rust
/// use rs_tagscrape::tree_from_bytes;
///
/// let root = tree_from_bytes(b"<div>caf\xE9</div>");
/// assert_eq!(root.text(), "café");
/// ```
#[must_use]
pub fn tree_from_bytes(html: &[u8]) -> Node {
    let html = encoding::decode(html);
    build_tree(&html, &Options::default())
}

/// Decode raw page bytes and recover their forms with default options.
///
/// # Errors
///
/// Same as `extract_forms`.
pub fn forms_from_bytes(html: &[u8]) -> Result<std::collections::BTreeMap<String, Form>> {
    let html = encoding::decode(html);
    extract_forms(&html, &Options::default())
}

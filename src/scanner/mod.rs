//! Tag scanning and level tracking.
//!
//! # Module Structure
//!
//! - `tag`: single-tag scanner and the `TagDescriptor` it produces
//! - `stack`: open-parent stack and its pure popping rule
//! - `iter`: `TagIter`, the lazy text/tag stream every other consumer reads
//!
//! # Usage
//!
//! ```rust
//! use rs_tagscrape::scanner::{next_tag, TagIter, TagKind};
//! use rs_tagscrape::Options;
//!
//! let (tag, next) = next_tag("<br/>", 0).unwrap();
//! assert_eq!(tag.kind, TagKind::SelfClosing);
//! assert_eq!(next, 5);
//!
//! let options = Options::default();
//! let count = TagIter::new("<p>a</p>", &options).count();
//! assert_eq!(count, 3);
//! ```

pub mod iter;
pub mod stack;
pub mod tag;

pub use iter::{Item, TagIter};
pub use stack::{close_depth, ParentStack};
pub use tag::{next_tag, TagDescriptor, TagKind, TagTuple};

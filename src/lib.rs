//! The library code for `folio`, the content layer of a personal blog. It
//! turns a directory of articles into plain data records for a presentation
//! layer to render. The work breaks down into two steps:
//!
//! 1. Loading documents from the content directory ([`crate::loader`]). Each
//!    article is an `index.md` bundle or a single markup file that begins with
//!    YAML front-matter ([`crate::frontmatter`]). Loading is cheap: bodies are
//!    only compiled to HTML when asked for ([`crate::markdown`]), and a
//!    caller-owned [`crate::cache::Cache`] can sit in front of the disk.
//! 2. Selecting related articles for a document ([`crate::recommend`]),
//!    scored by shared category and keywords and topped up with the most
//!    recent articles.
//!
//! Index views order documents with [`crate::document::sort_by_date`].

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod cache;
pub mod config;
pub mod document;
pub mod error;
pub mod frontmatter;
pub mod loader;
pub mod markdown;
pub mod recommend;
pub mod thumbnail;
pub mod url;
mod util;

pub use crate::cache::Cache;
pub use crate::document::{sort_by_date, ContentDocument, Direction, Metadata};
pub use crate::error::{Error, Result};
pub use crate::loader::Loader;
pub use crate::recommend::{Selector, Weights};

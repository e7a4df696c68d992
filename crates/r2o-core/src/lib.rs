//! r2o core
//!
//! Converts a Roam Research JSON export into Obsidian-flavoured markdown
//! pages. This crate provides:
//! - Title normalization, including daily-note renaming to `YYYY-MM-DD`
//! - A document-wide uid index and reference discovery
//! - Resolution of block references, mentions and embeds into wikilinks
//! - Rendering of block trees into indented list lines
//!
//! Reading the export and writing files is left to the caller.

pub mod daylinks;
pub mod error;
pub mod index;
pub mod pipeline;
pub mod refs;
pub mod render;
pub mod resolve;
pub mod title;
pub mod types;

// Re-export main types for convenience
pub use daylinks::normalize_day_links;
pub use error::{ConvertError, ConvertResult};
pub use index::BlockIndex;
pub use pipeline::{convert, Conversion, Converter, Indexed, RenderedPage, Scanned};
pub use refs::{
    find_block_ref, scan_block_refs, scan_references, BlockRefMatch, RefKind, ReferenceSet,
};
pub use render::{RenderMode, RenderOptions, Renderer};
pub use resolve::{resolve_block_refs, sanitize_block_uid};
pub use title::{normalize_title, parse_long_date, sanitize_title, NormalizedTitle};
pub use types::{
    parse_export, parse_export_reader, Block, BlockId, Document, Page, PageId, RawBlock, RawPage,
};

//! Export records and the ingested document
//!
//! `RawPage`/`RawBlock` mirror the JSON export. `Document` is the ingested
//! form: titles normalized and every block moved into one arena so blocks can
//! refer to their page and children by index.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::ConvertResult;
use crate::title::normalize_title;

/// A page as it appears in the export
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPage {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub children: Vec<RawBlock>,
}

/// A block as it appears in the export
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBlock {
    #[serde(alias = "id")]
    pub uid: String,
    #[serde(default, alias = "text")]
    pub string: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RawBlock>,
}

impl RawBlock {
    pub fn new(uid: impl Into<String>, string: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            string: string.into(),
            heading: None,
            children: Vec::new(),
        }
    }

    pub fn with_heading(mut self, level: u8) -> Self {
        self.heading = Some(level);
        self
    }

    pub fn with_children(mut self, children: Vec<RawBlock>) -> Self {
        self.children = children;
        self
    }
}

/// Parse a JSON export from a string
pub fn parse_export(json: &str) -> ConvertResult<Vec<RawPage>> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a JSON export from a reader.
///
/// Read failures surface as `Io`. Bytes that are not valid UTF-8 are
/// replaced rather than rejected.
pub fn parse_export_reader<R: Read>(mut reader: R) -> ConvertResult<Vec<RawPage>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    parse_export(&String::from_utf8_lossy(&bytes))
}

/// Index of a page within a `Document`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub usize);

/// Index of a block within a `Document`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub usize);

/// A node of a page's block tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub uid: String,
    pub text: String,
    pub heading: Option<u8>,
    pub children: Vec<BlockId>,
    page: PageId,
}

impl Block {
    /// The page this block belongs to. Fixed at ingestion.
    pub fn page(&self) -> PageId {
        self.page
    }
}

/// A titled top-level unit with its root blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub is_daily: bool,
    pub roots: Vec<BlockId>,
}

/// The whole export, ingested
#[derive(Debug, Clone, Default)]
pub struct Document {
    pages: Vec<Page>,
    blocks: Vec<Block>,
}

impl Document {
    /// Ingest raw pages: normalize titles and move blocks into the arena.
    ///
    /// Children keep their order. Blocks are allocated parent before child
    /// using an explicit stack, so deeply nested exports do not recurse.
    pub fn ingest(raw_pages: Vec<RawPage>) -> Self {
        let mut document = Document::default();

        for raw_page in raw_pages {
            let normalized = normalize_title(&raw_page.title);
            let page_id = PageId(document.pages.len());
            document.pages.push(Page {
                title: normalized.title,
                is_daily: normalized.is_daily,
                roots: Vec::new(),
            });

            let roots = document.alloc_forest(raw_page.children, page_id);
            document.pages[page_id.0].roots = roots;
        }

        document
    }

    fn alloc_forest(&mut self, forest: Vec<RawBlock>, page: PageId) -> Vec<BlockId> {
        let mut roots = Vec::with_capacity(forest.len());

        // (parent, block still to allocate); roots have no parent
        let mut stack: Vec<(Option<BlockId>, RawBlock)> =
            forest.into_iter().rev().map(|raw| (None, raw)).collect();

        while let Some((parent, raw)) = stack.pop() {
            let id = BlockId(self.blocks.len());
            self.blocks.push(Block {
                uid: raw.uid,
                text: raw.string,
                heading: raw.heading,
                children: Vec::new(),
                page,
            });

            match parent {
                Some(parent) => self.blocks[parent.0].children.push(id),
                None => roots.push(id),
            }

            stack.extend(raw.children.into_iter().rev().map(|child| (Some(id), child)));
        }

        roots
    }

    pub fn page(&self, id: PageId) -> &Page {
        &self.pages[id.0]
    }

    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.0]
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Ids of every page, in export order
    pub fn page_ids(&self) -> impl Iterator<Item = PageId> {
        (0..self.pages.len()).map(PageId)
    }

    /// Number of blocks across all pages
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Title of the page owning `block`, used as the link target
    pub fn owning_title(&self, block: BlockId) -> &str {
        &self.page(self.block(block).page()).title
    }
}

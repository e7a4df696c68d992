//! The three-pass conversion
//!
//! 1. index every block uid (`Converter`)
//! 2. discover which uids are referenced (`Indexed`)
//! 3. render pages (`Scanned`)
//!
//! Any block can be referenced from any page, so each pass has to see every
//! page before the next one starts. The stages are separate types so a page
//! cannot be rendered against a partial index or reference set.

use tracing::debug;

use crate::error::{ConvertError, ConvertResult};
use crate::index::BlockIndex;
use crate::refs::{scan_page, ReferenceSet};
use crate::render::{RenderMode, RenderOptions, Renderer};
use crate::types::{Document, PageId, RawPage};

/// A page ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub title: String,
    pub is_daily: bool,
    pub lines: Vec<String>,
}

impl RenderedPage {
    /// File contents: lines joined with `\n`
    pub fn contents(&self) -> String {
        self.lines.join("\n")
    }
}

/// Pass 1: building the uid index
pub struct Converter {
    document: Document,
    index: BlockIndex,
    options: RenderOptions,
}

impl Converter {
    pub fn new(document: Document, options: RenderOptions) -> Self {
        Self {
            document,
            index: BlockIndex::new(),
            options,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn index_page(&mut self, page: PageId) {
        self.index.index_page(&self.document, page);
    }

    /// Close the indexing pass. Every page must have been indexed by now.
    pub fn finish_indexing(self) -> Indexed {
        debug!(
            uids = self.index.len(),
            duplicates = self.index.duplicate_uids().len(),
            "Indexing complete"
        );
        Indexed {
            document: self.document,
            index: self.index,
            refs: ReferenceSet::new(),
            options: self.options,
        }
    }
}

/// Pass 2: discovering referenced uids
pub struct Indexed {
    document: Document,
    index: BlockIndex,
    refs: ReferenceSet,
    options: RenderOptions,
}

impl Indexed {
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn index(&self) -> &BlockIndex {
        &self.index
    }

    pub fn scan_page(&mut self, page: PageId) {
        scan_page(&self.document, &self.index, page, &mut self.refs);
    }

    pub fn finish_scanning(self) -> Scanned {
        debug!(referenced = self.refs.len(), "Reference scan complete");
        Scanned {
            document: self.document,
            index: self.index,
            refs: self.refs,
            options: self.options,
        }
    }
}

/// Pass 3: rendering
pub struct Scanned {
    document: Document,
    index: BlockIndex,
    refs: ReferenceSet,
    options: RenderOptions,
}

impl Scanned {
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn index(&self) -> &BlockIndex {
        &self.index
    }

    pub fn references(&self) -> &ReferenceSet {
        &self.refs
    }

    /// Render one page.
    ///
    /// Fails with `EmptyTitle` when the page has nothing to be named after;
    /// callers skip such pages.
    pub fn render_page(&mut self, page: PageId) -> ConvertResult<RenderedPage> {
        let target = self.document.page(page);
        if target.title.is_empty() {
            debug!(page = page.0, "Skipping page with empty title");
            return Err(ConvertError::EmptyTitle);
        }

        let lines = Renderer::new(&self.document, &self.index, self.options).render_page(
            page,
            &mut self.refs,
            RenderMode::Render,
        );

        Ok(RenderedPage {
            title: target.title.clone(),
            is_daily: target.is_daily,
            lines,
        })
    }
}

/// Result of converting a whole export
#[derive(Debug, Clone)]
pub struct Conversion {
    pub pages: Vec<RenderedPage>,
    pub uid_count: usize,
    pub referenced_count: usize,
    pub duplicate_uids: Vec<String>,
    /// Pages skipped because their title was empty
    pub skipped: usize,
}

/// Run all three passes over an export
pub fn convert(raw_pages: Vec<RawPage>, options: RenderOptions) -> Conversion {
    let document = Document::ingest(raw_pages);
    let page_ids: Vec<PageId> = document.page_ids().collect();

    let mut converter = Converter::new(document, options);
    for page in &page_ids {
        converter.index_page(*page);
    }

    let mut indexed = converter.finish_indexing();
    for page in &page_ids {
        indexed.scan_page(*page);
    }

    let mut scanned = indexed.finish_scanning();
    let mut pages = Vec::with_capacity(page_ids.len());
    let mut skipped = 0;
    for page in &page_ids {
        match scanned.render_page(*page) {
            Ok(rendered) => pages.push(rendered),
            Err(_) => skipped += 1,
        }
    }

    Conversion {
        pages,
        uid_count: scanned.index().len(),
        referenced_count: scanned.references().len(),
        duplicate_uids: scanned.index().duplicate_uids().to_vec(),
        skipped,
    }
}

//! Global uid lookup
//!
//! Every block of every page is entered once, in pre-order. A block can be
//! referenced from any page, so the index must be complete before the
//! reference scan starts.

use std::collections::HashMap;

use tracing::debug;

use crate::types::{BlockId, Document, PageId};

/// Maps block uids to blocks across the whole document
#[derive(Debug, Clone, Default)]
pub struct BlockIndex {
    by_uid: HashMap<String, BlockId>,
    duplicates: Vec<String>,
}

impl BlockIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every page of the document, in export order
    pub fn build(document: &Document) -> Self {
        let mut index = Self::new();
        for page in document.page_ids() {
            index.index_page(document, page);
        }
        index
    }

    /// Index one page's block forest, pre-order and depth-first.
    ///
    /// A uid seen before is overwritten by the later block. The overwrite is
    /// recorded in `duplicate_uids` but otherwise silent.
    pub fn index_page(&mut self, document: &Document, page: PageId) {
        let mut stack: Vec<BlockId> = document.page(page).roots.iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            let block = document.block(id);
            if self.by_uid.insert(block.uid.clone(), id).is_some() {
                debug!(uid = %block.uid, "Duplicate block uid, later block wins");
                self.duplicates.push(block.uid.clone());
            }
            stack.extend(block.children.iter().rev().copied());
        }
    }

    pub fn get(&self, uid: &str) -> Option<BlockId> {
        self.by_uid.get(uid).copied()
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.by_uid.contains_key(uid)
    }

    /// Number of distinct uids
    pub fn len(&self) -> usize {
        self.by_uid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_uid.is_empty()
    }

    /// Uids that were inserted more than once, once per extra occurrence
    pub fn duplicate_uids(&self) -> &[String] {
        &self.duplicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RawBlock, RawPage};

    fn page(title: &str, children: Vec<RawBlock>) -> RawPage {
        RawPage {
            title: title.to_string(),
            children,
        }
    }

    #[test]
    fn test_every_block_is_indexed() {
        let document = Document::ingest(vec![
            page(
                "One",
                vec![RawBlock::new("a", "A").with_children(vec![
                    RawBlock::new("a1", "A1").with_children(vec![RawBlock::new("a11", "A11")]),
                ])],
            ),
            page("Two", vec![RawBlock::new("b", "B")]),
        ]);

        let index = BlockIndex::build(&document);
        assert_eq!(index.len(), 4);

        for uid in ["a", "a1", "a11", "b"] {
            let id = index.get(uid).expect("uid indexed");
            assert_eq!(document.block(id).uid, uid);
        }
        assert_eq!(document.owning_title(index.get("a11").unwrap()), "One");
        assert_eq!(document.owning_title(index.get("b").unwrap()), "Two");
        assert!(index.duplicate_uids().is_empty());
    }

    #[test]
    fn test_duplicate_uid_last_write_wins() {
        let document = Document::ingest(vec![
            page("First", vec![RawBlock::new("dup", "first copy")]),
            page(
                "Second",
                vec![RawBlock::new("x", "X").with_children(vec![RawBlock::new("dup", "second copy")])],
            ),
        ]);

        let index = BlockIndex::build(&document);
        let id = index.get("dup").unwrap();
        assert_eq!(document.block(id).text, "second copy");
        assert_eq!(document.owning_title(id), "Second");
        assert_eq!(index.duplicate_uids(), ["dup".to_string()]);
    }

    #[test]
    fn test_preorder_within_page_decides_duplicates() {
        // the nested block comes before its parent's next sibling in pre-order
        let document = Document::ingest(vec![page(
            "One",
            vec![
                RawBlock::new("p", "P").with_children(vec![RawBlock::new("dup", "nested")]),
                RawBlock::new("dup", "sibling"),
            ],
        )]);

        let index = BlockIndex::build(&document);
        assert_eq!(document.block(index.get("dup").unwrap()).text, "sibling");
    }

    #[test]
    fn test_missing_uid() {
        let index = BlockIndex::build(&Document::ingest(vec![page("Empty", Vec::new())]));
        assert!(index.is_empty());
        assert!(!index.contains("nothing"));
        assert_eq!(index.get("nothing"), None);
    }
}

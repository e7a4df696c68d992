//! Page rendering
//!
//! Flattens a page's block tree into markdown list lines:
//!
//! ```text
//! - root block
//! 	- child block ^childuid
//! 		- ## grandchild heading
//! ```
//!
//! The tree is expanded one level per pass over a worklist of finished lines
//! and pending sibling lists, so nesting depth never turns into call depth and
//! lines come out in document pre-order.

use serde::{Deserialize, Serialize};

use crate::index::BlockIndex;
use crate::refs::{scan_block_refs, ReferenceSet};
use crate::resolve::{resolve_block_refs, sanitize_block_uid};
use crate::types::{Block, BlockId, Document, PageId};

/// What a render pass is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Only record referenced uids; lines are empty placeholders
    Discover,
    /// Produce the final lines
    Render,
}

/// Rendering switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Write anchors as ` ^<sanitized uid>` (matching the link targets)
    /// instead of ` ^<uid>`
    #[serde(default)]
    pub sanitize_anchor_tokens: bool,
}

enum WorkItem {
    Line(String),
    Pending(Vec<BlockId>),
}

/// Renders pages of one document against a complete index
pub struct Renderer<'a> {
    document: &'a Document,
    index: &'a BlockIndex,
    options: RenderOptions,
}

impl<'a> Renderer<'a> {
    pub fn new(document: &'a Document, index: &'a BlockIndex, options: RenderOptions) -> Self {
        Self {
            document,
            index,
            options,
        }
    }

    /// Render one page's block forest
    pub fn render_page(&self, page: PageId, refs: &mut ReferenceSet, mode: RenderMode) -> Vec<String> {
        self.render_forest(&self.document.page(page).roots, refs, mode)
    }

    /// Render a block forest, one line per block in pre-order
    pub fn render_forest(
        &self,
        roots: &[BlockId],
        refs: &mut ReferenceSet,
        mode: RenderMode,
    ) -> Vec<String> {
        let mut items = vec![WorkItem::Pending(roots.to_vec())];
        let mut depth = 0;

        loop {
            let mut expanded = false;
            let mut next = Vec::with_capacity(items.len());

            for item in items {
                let blocks = match item {
                    WorkItem::Line(line) => {
                        next.push(WorkItem::Line(line));
                        continue;
                    }
                    WorkItem::Pending(blocks) => blocks,
                };

                for id in blocks {
                    let block = self.document.block(id);
                    let line = match mode {
                        RenderMode::Discover => {
                            scan_block_refs(&block.text, self.index, refs);
                            String::new()
                        }
                        RenderMode::Render => self.render_line(block, depth, refs),
                    };
                    next.push(WorkItem::Line(line));

                    if !block.children.is_empty() {
                        next.push(WorkItem::Pending(block.children.clone()));
                        expanded = true;
                    }
                }
            }

            items = next;
            depth += 1;

            if !expanded {
                break;
            }
        }

        items
            .into_iter()
            .filter_map(|item| match item {
                WorkItem::Line(line) => Some(line),
                WorkItem::Pending(_) => None,
            })
            .collect()
    }

    fn render_line(&self, block: &Block, depth: usize, refs: &mut ReferenceSet) -> String {
        let text = resolve_block_refs(&block.text, self.document, self.index, refs);

        let indent = "\t".repeat(depth);
        let mut line = format!("{}- ", indent);
        // heading 0 still emits the separating space
        if let Some(level) = block.heading {
            line.push_str(&"#".repeat(level as usize));
            line.push(' ');
        }
        line.push_str(&text);

        if refs.contains(&block.uid) {
            line.push_str(" ^");
            if self.options.sanitize_anchor_tokens {
                line.push_str(&sanitize_block_uid(&block.uid));
            } else {
                line.push_str(&block.uid);
            }
        }

        if line.contains('\n') {
            line = continue_paragraph(&line, &indent);
        }
        line
    }
}

/// Indent continuation lines under the list marker and end the item with a
/// newline so it stays a separate paragraph once lines are joined.
///
/// The final character is left untouched, so a trailing newline in the block
/// text is not indented.
fn continue_paragraph(line: &str, indent: &str) -> String {
    let continuation = format!("\n{}  ", indent);
    let last = line.char_indices().last().map_or(0, |(i, _)| i);
    let (body, tail) = line.split_at(last);

    let mut out = body.replace('\n', &continuation);
    out.push_str(tail);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refs::scan_references;
    use crate::types::{RawBlock, RawPage};

    fn render(pages: Vec<(&str, Vec<RawBlock>)>, page: usize, options: RenderOptions) -> Vec<String> {
        let document = Document::ingest(
            pages
                .into_iter()
                .map(|(title, children)| RawPage {
                    title: title.to_string(),
                    children,
                })
                .collect(),
        );
        let index = BlockIndex::build(&document);
        let mut refs = scan_references(&document, &index);

        Renderer::new(&document, &index, options).render_page(PageId(page), &mut refs, RenderMode::Render)
    }

    #[test]
    fn test_nested_blocks_are_indented_in_preorder() {
        let lines = render(
            vec![(
                "Tree",
                vec![
                    RawBlock::new("a", "A").with_children(vec![
                        RawBlock::new("a1", "A1").with_children(vec![RawBlock::new("a11", "A11")]),
                        RawBlock::new("a2", "A2"),
                    ]),
                    RawBlock::new("b", "B").with_children(vec![RawBlock::new("b1", "B1")]),
                ],
            )],
            0,
            RenderOptions::default(),
        );

        assert_eq!(
            lines,
            vec!["- A", "\t- A1", "\t\t- A11", "\t- A2", "- B", "\t- B1"]
        );
    }

    #[test]
    fn test_heading_prefix() {
        let lines = render(
            vec![(
                "Doc",
                vec![
                    RawBlock::new("h", "Intro").with_heading(2),
                    RawBlock::new("z", "Body").with_heading(0),
                    RawBlock::new("p", "Plain"),
                ],
            )],
            0,
            RenderOptions::default(),
        );
        assert_eq!(lines, vec!["- ## Intro", "-  Body", "- Plain"]);
    }

    #[test]
    fn test_referenced_block_gets_anchor() {
        let lines = render(
            vec![(
                "Notes",
                vec![
                    RawBlock::new("aaaaaaaaa", "See ((bbbbbbbbb))"),
                    RawBlock::new("bbbbbbbbb", "Target block"),
                ],
            )],
            0,
            RenderOptions::default(),
        );

        assert_eq!(
            lines,
            vec![
                "- See [[Notes#^bbbbbbbbb|Target block]]",
                "- Target block ^bbbbbbbbb",
            ]
        );
    }

    #[test]
    fn test_anchor_token_sanitization_is_optional() {
        let pages = vec![(
            "Notes",
            vec![
                RawBlock::new("aaaaaaaaa", "((bb_bb_bbb))"),
                RawBlock::new("bb_bb_bbb", "Target"),
            ],
        )];

        let plain = render(pages.clone(), 0, RenderOptions::default());
        assert_eq!(plain[1], "- Target ^bb_bb_bbb");

        let sanitized = render(
            pages,
            0,
            RenderOptions {
                sanitize_anchor_tokens: true,
            },
        );
        assert_eq!(sanitized[0], "- [[Notes#^bbbbbbb|Target]]");
        assert_eq!(sanitized[1], "- Target ^bbbbbbb");
    }

    #[test]
    fn test_multiline_text_is_continued_under_marker() {
        let lines = render(
            vec![(
                "Doc",
                vec![RawBlock::new("p", "Parent")
                    .with_children(vec![RawBlock::new("m", "first\nsecond\nthird")])],
            )],
            0,
            RenderOptions::default(),
        );

        assert_eq!(lines, vec!["- Parent", "\t- first\n\t  second\n\t  third\n"]);
    }

    #[test]
    fn test_multiline_heading_continuation_aligns_with_marker() {
        let lines = render(
            vec![("Doc", vec![RawBlock::new("h", "Title\nmore").with_heading(1)])],
            0,
            RenderOptions::default(),
        );
        assert_eq!(lines, vec!["- # Title\n  more\n"]);
    }

    #[test]
    fn test_trailing_newline_is_not_indented() {
        let lines = render(
            vec![("Doc", vec![RawBlock::new("t", "ends here\n")])],
            0,
            RenderOptions::default(),
        );
        assert_eq!(lines, vec!["- ends here\n\n"]);
    }

    #[test]
    fn test_multiline_referenced_block_keeps_anchor_on_last_line() {
        let lines = render(
            vec![(
                "Doc",
                vec![
                    RawBlock::new("aaaaaaaaa", "one\ntwo"),
                    RawBlock::new("bbbbbbbbb", "{{embed: ((aaaaaaaaa))}}"),
                ],
            )],
            0,
            RenderOptions::default(),
        );
        assert_eq!(
            lines,
            vec!["- one\n  two ^aaaaaaaaa\n", "- ![[Doc#^aaaaaaaaa]]"]
        );
    }

    #[test]
    fn test_discover_mode_only_collects_references() {
        let document = Document::ingest(vec![RawPage {
            title: "P".to_string(),
            children: vec![
                RawBlock::new("aaaaaaaaa", "A").with_children(vec![RawBlock::new("ccccccccc", "((bbbbbbbbb))")]),
                RawBlock::new("bbbbbbbbb", "B"),
            ],
        }]);
        let index = BlockIndex::build(&document);
        let mut refs = ReferenceSet::new();

        let lines = Renderer::new(&document, &index, RenderOptions::default()).render_page(
            PageId(0),
            &mut refs,
            RenderMode::Discover,
        );

        assert_eq!(lines, vec!["", "", ""]);
        assert!(refs.contains("bbbbbbbbb"));
        assert_eq!(refs.len(), 1);
    }

    #[test]
    fn test_empty_page() {
        let lines = render(vec![("Empty", Vec::new())], 0, RenderOptions::default());
        assert!(lines.is_empty());
    }
}

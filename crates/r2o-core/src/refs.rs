//! Block reference markup
//!
//! Roam names other blocks inline by uid in three forms:
//! - embeds: `{{embed: ((uid))}}`
//! - mentions: `{{mentions: ((uid))}}`
//! - plain references: `((uid))`
//!
//! Uids are exactly nine characters. This module finds the markup and runs
//! the discovery pass that decides which blocks need an anchor.

use std::collections::HashSet;
use std::ops::Range;

use regex::Regex;
use std::sync::LazyLock;

use crate::index::BlockIndex;
use crate::render::{RenderMode, RenderOptions, Renderer};
use crate::types::{Document, PageId};

static EMBED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{embed: \(\((.{9})\)\)\}\}").expect("embed regex"));

static MENTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{mentions: \(\((.{9})\)\)\}\}").expect("mention regex"));

static PLAIN_REF_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\((.{9})\)\)").expect("block ref regex"));

/// Which markup form named the block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Embed,
    Mention,
    Plain,
}

impl RefKind {
    /// Forms in the order they are searched for
    pub const PRIORITY: [RefKind; 3] = [RefKind::Embed, RefKind::Mention, RefKind::Plain];

    fn regex(self) -> &'static Regex {
        match self {
            RefKind::Embed => &*EMBED_REGEX,
            RefKind::Mention => &*MENTION_REGEX,
            RefKind::Plain => &*PLAIN_REF_REGEX,
        }
    }
}

/// One occurrence of reference markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRefMatch {
    pub kind: RefKind,
    /// Byte range of the whole markup
    pub span: Range<usize>,
    /// Byte range of the uid inside the markup
    pub uid: Range<usize>,
}

/// Find the next reference markup at or after `start`.
///
/// Priority is by form, not by position: an embed anywhere in the remainder
/// wins over an earlier mention or plain reference, and a mention wins over
/// an earlier plain reference.
pub fn find_block_ref(text: &str, start: usize) -> Option<BlockRefMatch> {
    find_block_ref_where(text, start, |_| true)
}

/// Like [`find_block_ref`], skipping occurrences `accept` rejects.
pub fn find_block_ref_where<F>(text: &str, start: usize, accept: F) -> Option<BlockRefMatch>
where
    F: Fn(&BlockRefMatch) -> bool,
{
    RefKind::PRIORITY
        .iter()
        .find_map(|kind| first_accepted(*kind, text, start, &accept))
}

fn first_accepted<F>(kind: RefKind, text: &str, start: usize, accept: &F) -> Option<BlockRefMatch>
where
    F: Fn(&BlockRefMatch) -> bool,
{
    let regex = kind.regex();
    let mut pos = start;

    while pos <= text.len() {
        let caps = regex.captures_at(text, pos)?;
        let whole = caps.get(0)?;
        let uid = caps.get(1)?;

        let found = BlockRefMatch {
            kind,
            span: whole.range(),
            uid: uid.range(),
        };
        if accept(&found) {
            return Some(found);
        }

        // retry one character further so overlapping candidates are not lost
        pos = whole.start() + text[whole.start()..].chars().next().map_or(1, char::len_utf8);
    }

    None
}

/// Uids that are the target of at least one reference anywhere in the document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceSet {
    uids: HashSet<String>,
}

impl ReferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the uid was not yet present
    pub fn insert(&mut self, uid: impl Into<String>) -> bool {
        self.uids.insert(uid.into())
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.uids.contains(uid)
    }

    pub fn len(&self) -> usize {
        self.uids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.uids.iter().map(String::as_str)
    }
}

/// Record every indexed uid that `text` references, in any form.
///
/// Unlike the resolver this does not stop at the form priority: each form is
/// searched over the whole text so no target is missed. Unknown uids are
/// ignored here and reported when the text is resolved.
pub fn scan_block_refs(text: &str, index: &BlockIndex, refs: &mut ReferenceSet) {
    for kind in RefKind::PRIORITY {
        for caps in kind.regex().captures_iter(text) {
            if let Some(uid) = caps.get(1) {
                if index.contains(uid.as_str()) {
                    refs.insert(uid.as_str());
                }
            }
        }
    }
}

/// Discovery pass over one page, driven by the renderer in discover mode
pub fn scan_page(document: &Document, index: &BlockIndex, page: PageId, refs: &mut ReferenceSet) {
    Renderer::new(document, index, RenderOptions::default()).render_page(page, refs, RenderMode::Discover);
}

/// Discovery pass over every page. The index must already be complete.
pub fn scan_references(document: &Document, index: &BlockIndex) -> ReferenceSet {
    let mut refs = ReferenceSet::new();
    for page in document.page_ids() {
        scan_page(document, index, page, &mut refs);
    }
    refs
}

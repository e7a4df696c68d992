//! Inline reference resolution
//!
//! Rewrites Roam reference markup inside one block's text into Obsidian
//! links:
//! - `{{embed: ((uid))}}` → `![[Page#^uid]]`
//! - `{{mentions: ((uid))}}` and `((uid))` → `[[Page#^uid|block text]]`

use std::ops::Range;

use tracing::warn;

use crate::daylinks::normalize_day_links;
use crate::error::ConvertError;
use crate::index::BlockIndex;
use crate::refs::{find_block_ref_where, RefKind, ReferenceSet};
use crate::types::{BlockId, Document};

/// Make a uid usable as an Obsidian block anchor (no underscores)
pub fn sanitize_block_uid(uid: &str) -> String {
    uid.replace('_', "")
}

/// Resolve every reference in `text`, then normalize day links.
///
/// Each iteration takes the next match by form priority (see
/// [`crate::refs::find_block_ref`]) starting at the cursor. Unknown uids are
/// logged and left as written, and the cursor moves past them. Text inserted
/// by a replacement is never searched again, so a block quoting itself cannot
/// loop. Markup inside an inserted alias label is therefore kept as written.
pub fn resolve_block_refs(
    text: &str,
    document: &Document,
    index: &BlockIndex,
    refs: &mut ReferenceSet,
) -> String {
    let mut resolved = text.to_string();
    let mut cursor = 0;
    let mut inserted: Vec<Range<usize>> = Vec::new();

    while let Some(found) = find_block_ref_where(&resolved, cursor, |m| {
        !inserted.iter().any(|r| overlaps(r, &m.span))
    }) {
        let uid = resolved[found.uid.clone()].to_string();

        let Some(target) = index.get(&uid) else {
            warn!("{}", ConvertError::UnresolvedReference { uid });
            cursor = found.uid.end;
            continue;
        };

        refs.insert(uid);
        let replacement = link_to(found.kind, document, target);

        let removed = found.span.len();
        resolved.replace_range(found.span.clone(), &replacement);

        for range in inserted.iter_mut().filter(|r| r.start >= found.span.end) {
            *range = range.start - removed + replacement.len()..range.end - removed + replacement.len();
        }
        inserted.push(found.span.start..found.span.start + replacement.len());
    }

    normalize_day_links(&resolved)
}

fn link_to(kind: RefKind, document: &Document, target: BlockId) -> String {
    let block = document.block(target);
    let title = document.owning_title(target);
    let anchor = sanitize_block_uid(&block.uid);

    match kind {
        RefKind::Embed => format!("![[{}#^{}]]", title, anchor),
        RefKind::Mention | RefKind::Plain => format!("[[{}#^{}|{}]]", title, anchor, block.text),
    }
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

use proptest::prelude::*;
use r2o_core::{
    normalize_day_links, normalize_title, resolve_block_refs, BlockIndex, Document, PageId,
    RawBlock, RawPage, ReferenceSet, RenderMode, RenderOptions, Renderer,
};

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

fn long_date() -> impl Strategy<Value = String> {
    (0usize..12, 1u32..29, 1900u32..2100, "(st|nd|rd|th)")
        .prop_map(|(month, day, year, suffix)| format!("{} {}{}, {}", MONTHS[month], day, suffix, year))
}

/// A small tree: each block gets a single-line text and up to three children
fn block_tree() -> impl Strategy<Value = RawBlock> {
    let leaf = "[a-z ]{0,12}".prop_map(|text| RawBlock::new("", text));
    leaf.prop_recursive(4, 32, 3, |inner| {
        ("[a-z ]{0,12}", prop::collection::vec(inner, 0..3))
            .prop_map(|(text, children)| RawBlock::new("", text).with_children(children))
    })
}

fn assign_uids(block: &mut RawBlock, next: &mut usize) {
    block.uid = format!("u{:08}", *next);
    *next += 1;
    for child in &mut block.children {
        assign_uids(child, next);
    }
}

fn depths(block: &RawBlock, depth: usize, out: &mut Vec<usize>) {
    out.push(depth);
    for child in &block.children {
        depths(child, depth + 1, out);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn title_normalization_is_idempotent(title in "[A-Za-z0-9 :\"^\\\\,-]{0,24}") {
        let once = normalize_title(&title);
        let twice = normalize_title(&once.title);
        prop_assert_eq!(&twice.title, &once.title);
    }

    #[test]
    fn daily_titles_normalize_to_iso(date in long_date()) {
        let normalized = normalize_title(&date);
        prop_assert!(normalized.is_daily);
        prop_assert_eq!(normalized.title.len(), 10);

        let again = normalize_title(&normalized.title);
        prop_assert_eq!(&again.title, &normalized.title);
    }

    #[test]
    fn day_link_normalization_is_idempotent(
        prefix in "[a-z ]{0,8}",
        date in long_date(),
        suffix in "[a-z ]{0,8}",
    ) {
        let text = format!("{}[[{}]]{}", prefix, date, suffix);
        let once = normalize_day_links(&text);
        prop_assert_eq!(normalize_day_links(&once), once.clone());
        prop_assert!(!once.contains(&date));
    }

    #[test]
    fn unknown_reference_is_stable(
        before in "[a-z ]{0,10}",
        uid in "[a-z0-9]{9}",
        after in "[a-z ]{0,10}",
    ) {
        let document = Document::ingest(vec![RawPage {
            title: "Only".to_string(),
            children: vec![RawBlock::new("known0001", "known")],
        }]);
        let index = BlockIndex::build(&document);
        prop_assume!(uid != "known0001");

        let markup = format!("(({}))", uid);
        let text = format!("{}{}{}", before, markup, after);
        let mut refs = ReferenceSet::new();
        let resolved = resolve_block_refs(&text, &document, &index, &mut refs);

        prop_assert!(resolved.contains(&markup));
        prop_assert!(refs.is_empty());
    }

    #[test]
    fn lines_are_indented_by_depth(mut roots in prop::collection::vec(block_tree(), 0..4)) {
        let mut next = 0;
        let mut expected = Vec::new();
        for root in &mut roots {
            assign_uids(root, &mut next);
            depths(root, 0, &mut expected);
        }

        let document = Document::ingest(vec![RawPage {
            title: "Tree".to_string(),
            children: roots,
        }]);
        let index = BlockIndex::build(&document);
        let mut refs = ReferenceSet::new();
        let lines = Renderer::new(&document, &index, RenderOptions::default())
            .render_page(PageId(0), &mut refs, RenderMode::Render);

        prop_assert_eq!(lines.len(), expected.len());
        for (line, depth) in lines.iter().zip(expected) {
            let marker = format!("{}- ", "\t".repeat(depth));
            prop_assert!(line.starts_with(&marker), "{:?} should start with {:?}", line, marker);
            prop_assert!(!line[marker.len()..].starts_with('\t'));
        }
    }
}

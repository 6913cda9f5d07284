// Copyright 2026 The richnote Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The normalization engine.
//!
//! Restores the document invariants after any raw mutation,
//! deterministically and to a fixed point. Each pass locates the first
//! violation in a bottom-up (post-order) walk and repairs it; passes
//! repeat until none is found. Every repair strictly changes the tree,
//! so the fixed point is reached in finitely many passes.
//!
//! Rules, in the order they are checked per node:
//!
//! 1. autoformat — a paragraph whose text starts with an ordered
//!    (`1. `) or bullet (`- `/`* `) marker becomes a list item wrapped
//!    in the matching list, and the marker text is deleted;
//! 2. child coercion — every direct child of a list becomes a
//!    `list-item`, kind changed in place;
//! 3. adjacent merge — a list whose previous sibling is a list of the
//!    same kind is merged into it;
//! 4. default fixups — loose root content is wrapped, empty blocks get
//!    an empty run, empty lists are dropped, orphan list items revert
//!    to paragraphs, mentions keep their single empty run and their
//!    boundary runs, redundant empty runs are dropped and same-mark
//!    neighbours merged, and a fully cleared document collapses to the
//!    canonical empty paragraph.
//!
//! The selection is carried through as a pair of flat offsets; only the
//! autoformat marker deletion moves content, so only it shifts them.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::dom::document::Document;
use crate::dom::location::Path;
use crate::dom::nodes::{BlockKind, BlockNode, DomNode, TextRun};

static ORDERED_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\s").expect("valid pattern"));
static BULLET_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[*-]\s").expect("valid pattern"));

/// Run the engine to its fixed point, adjusting the flat selection
/// offsets where a repair moves content.
pub(crate) fn normalize(
    doc: &mut Document,
    selection: &mut Option<(usize, usize)>,
) {
    while let Some(fix) = find_fix(doc) {
        apply_fix(doc, fix, selection);
    }
}

/// One concrete repair, addressed by path. Paths are only valid until
/// the repair is applied; each pass re-walks the tree.
#[derive(Debug)]
enum Fix {
    Autoformat {
        path: Path,
        list_kind: BlockKind,
        prefix_chars: usize,
    },
    CoerceToListItem {
        path: Path,
    },
    MergeIntoPrevious {
        path: Path,
    },
    WrapInBlock {
        path: Path,
        wrapper: BlockKind,
    },
    OrphanListItemToParagraph {
        path: Path,
    },
    ResetMentionChildren {
        path: Path,
    },
    GiveEmptyBlockARun {
        path: Path,
    },
    RemoveEmptyList {
        path: Path,
    },
    InsertBoundaryRun {
        path: Path,
    },
    RemoveRedundantEmptyRun {
        path: Path,
    },
    MergeRunIntoPrevious {
        path: Path,
    },
    CanonicalEmptyDocument,
}

fn find_fix(doc: &Document) -> Option<Fix> {
    if doc.children.is_empty() {
        return Some(Fix::CanonicalEmptyDocument);
    }
    find_fix_in(&doc.children, &Path::root(), None)
}

/// Post-order: descend into every block child first, then check the
/// child itself, then the container's own child list.
fn find_fix_in(
    children: &[DomNode],
    path: &Path,
    parent_kind: Option<&BlockKind>,
) -> Option<Fix> {
    for (index, child) in children.iter().enumerate() {
        if let DomNode::Block(block) = child {
            let child_path = path.child(index);
            if let Some(fix) =
                find_fix_in(&block.children, &child_path, Some(&block.kind))
            {
                return Some(fix);
            }
            if let Some(fix) =
                check_block(block, &child_path, index, children, parent_kind)
            {
                return Some(fix);
            }
        }
    }
    check_child_list(children, path, parent_kind)
}

fn check_block(
    block: &BlockNode,
    path: &Path,
    index: usize,
    siblings: &[DomNode],
    parent_kind: Option<&BlockKind>,
) -> Option<Fix> {
    // 1. autoformat recognition
    if block.kind == BlockKind::Paragraph && !block.children.is_empty() {
        let text = block.text();
        if let Some(m) = ORDERED_PREFIX.find(&text) {
            return Some(Fix::Autoformat {
                path: path.clone(),
                list_kind: BlockKind::OrderedList,
                prefix_chars: m.as_str().chars().count(),
            });
        }
        if let Some(m) = BULLET_PREFIX.find(&text) {
            return Some(Fix::Autoformat {
                path: path.clone(),
                list_kind: BlockKind::UnorderedList,
                prefix_chars: m.as_str().chars().count(),
            });
        }
    }

    // 2. child-kind coercion
    if block.kind.is_list() {
        for (i, child) in block.children.iter().enumerate() {
            match child {
                DomNode::Block(b) if b.kind != BlockKind::ListItem => {
                    return Some(Fix::CoerceToListItem {
                        path: path.child(i),
                    });
                }
                DomNode::Text(_) => {
                    return Some(Fix::WrapInBlock {
                        path: path.child(i),
                        wrapper: BlockKind::ListItem,
                    });
                }
                DomNode::Block(_) => {}
            }
        }
    }

    // 3. adjacent-list merge
    if block.kind.is_list() && index > 0 {
        if let DomNode::Block(prev) = &siblings[index - 1] {
            if prev.kind == block.kind {
                return Some(Fix::MergeIntoPrevious { path: path.clone() });
            }
        }
    }

    // 4. default fixups on the block itself
    if let BlockKind::Mention { .. } = block.kind {
        let is_single_empty_run = matches!(
            block.children.as_slice(),
            [DomNode::Text(run)] if run.text.is_empty()
        );
        if !is_single_empty_run {
            return Some(Fix::ResetMentionChildren { path: path.clone() });
        }
    } else if block.kind == BlockKind::ListItem
        && !parent_kind.map(BlockKind::is_list).unwrap_or(false)
    {
        return Some(Fix::OrphanListItemToParagraph { path: path.clone() });
    } else if block.children.is_empty() {
        if block.kind.is_list() {
            return Some(Fix::RemoveEmptyList { path: path.clone() });
        }
        return Some(Fix::GiveEmptyBlockARun { path: path.clone() });
    }

    None
}

fn check_child_list(
    children: &[DomNode],
    path: &Path,
    parent_kind: Option<&BlockKind>,
) -> Option<Fix> {
    let at_root = parent_kind.is_none();
    let in_list = parent_kind.map(BlockKind::is_list).unwrap_or(false);
    let in_mention = parent_kind.map(BlockKind::is_mention).unwrap_or(false);

    // The root holds blocks, never inline content.
    if at_root {
        for (i, child) in children.iter().enumerate() {
            if child.is_inline() {
                return Some(Fix::WrapInBlock {
                    path: path.child(i),
                    wrapper: BlockKind::Paragraph,
                });
            }
        }
    }

    if at_root || in_list || in_mention {
        return None;
    }

    // Inline sequence fixups inside a content block: boundary runs
    // around mentions, redundant empty runs, same-mark run merging.
    for (i, child) in children.iter().enumerate() {
        let is_mention = matches!(child, DomNode::Block(_));
        if is_mention {
            if i == 0 {
                return Some(Fix::InsertBoundaryRun { path: path.child(0) });
            }
            let next_is_run_or_end = match children.get(i + 1) {
                None => false,
                Some(DomNode::Text(_)) => true,
                Some(DomNode::Block(_)) => false,
            };
            if !next_is_run_or_end {
                return Some(Fix::InsertBoundaryRun {
                    path: path.child(i + 1),
                });
            }
        }
    }

    for (i, child) in children.iter().enumerate() {
        let DomNode::Text(run) = child else { continue };
        if run.is_empty() && children.len() > 1 {
            let prev_is_run =
                i > 0 && matches!(children[i - 1], DomNode::Text(_));
            let next_is_run =
                matches!(children.get(i + 1), Some(DomNode::Text(_)));
            if prev_is_run || next_is_run {
                return Some(Fix::RemoveRedundantEmptyRun {
                    path: path.child(i),
                });
            }
        }
        if i > 0 {
            if let DomNode::Text(prev) = &children[i - 1] {
                if prev.same_marks(run) {
                    return Some(Fix::MergeRunIntoPrevious {
                        path: path.child(i),
                    });
                }
            }
        }
    }

    None
}

fn apply_fix(
    doc: &mut Document,
    fix: Fix,
    selection: &mut Option<(usize, usize)>,
) {
    match fix {
        Fix::Autoformat {
            path,
            list_kind,
            prefix_chars,
        } => {
            let block_start = doc
                .leaf_spans()
                .iter()
                .find(|s| s.path == path)
                .map(|s| s.start);
            let Some(DomNode::Block(mut block)) = doc.remove_node(&path)
            else {
                return;
            };
            block.kind = BlockKind::ListItem;
            let list =
                BlockNode::new(list_kind, vec![DomNode::Block(block)]);
            doc.insert_node(&path, DomNode::Block(list));
            delete_leading_chars(doc, &path.child(0), prefix_chars);
            if let (Some(start), Some((anchor, focus))) =
                (block_start, selection.as_mut())
            {
                for offset in [anchor, focus] {
                    if *offset > start {
                        *offset =
                            offset.saturating_sub(prefix_chars).max(start);
                    }
                }
            }
        }
        Fix::CoerceToListItem { path } => {
            if let Some(block) = doc.block_at_path_mut(&path) {
                block.kind = BlockKind::ListItem;
            }
        }
        Fix::MergeIntoPrevious { path } => {
            merge_into_previous(doc, &path);
        }
        Fix::WrapInBlock { path, wrapper } => {
            if let Some(node) = doc.remove_node(&path) {
                let block = BlockNode::new(wrapper, vec![node]);
                doc.insert_node(&path, DomNode::Block(block));
            }
        }
        Fix::OrphanListItemToParagraph { path } => {
            if let Some(block) = doc.block_at_path_mut(&path) {
                block.kind = BlockKind::Paragraph;
            }
        }
        Fix::ResetMentionChildren { path } => {
            if let Some(block) = doc.block_at_path_mut(&path) {
                block.children = vec![DomNode::Text(TextRun::default())];
            }
        }
        Fix::GiveEmptyBlockARun { path } => {
            if let Some(block) = doc.block_at_path_mut(&path) {
                block.children.push(DomNode::Text(TextRun::default()));
            }
        }
        Fix::RemoveEmptyList { path } => {
            doc.remove_node(&path);
        }
        Fix::InsertBoundaryRun { path } => {
            doc.insert_node(&path, DomNode::Text(TextRun::default()));
        }
        Fix::RemoveRedundantEmptyRun { path } => {
            doc.remove_node(&path);
        }
        Fix::MergeRunIntoPrevious { path } => {
            let Some(DomNode::Text(run)) = doc.remove_node(&path) else {
                return;
            };
            let prev_path = path
                .parent()
                .zip(path.last())
                .and_then(|(p, i)| i.checked_sub(1).map(|i| p.child(i)));
            if let Some(prev_path) = prev_path {
                if let Some(prev) =
                    doc.node_at_mut(&prev_path).and_then(|n| n.as_text_mut())
                {
                    prev.text.push_str(&run.text);
                }
            }
        }
        Fix::CanonicalEmptyDocument => {
            doc.children
                .push(DomNode::Block(BlockNode::empty_paragraph()));
        }
    }
}

/// Merge the block at `path` into its previous sibling, concatenating
/// children. Shared by the adjacent-list rule and the explicit
/// `merge_nodes` command.
pub(crate) fn merge_into_previous(doc: &mut Document, path: &Path) -> bool {
    let Some(index) = path.last() else { return false };
    let Some(prev_index) = index.checked_sub(1) else {
        return false;
    };
    let Some(prev_path) = path.sibling(prev_index) else {
        return false;
    };
    let Some(DomNode::Block(block)) = doc.remove_node(path) else {
        return false;
    };
    match doc.block_at_path_mut(&prev_path) {
        Some(prev) => {
            prev.children.extend(block.children);
            true
        }
        None => {
            // Previous sibling is not a block; undo the removal.
            doc.insert_node(path, DomNode::Block(block));
            false
        }
    }
}

/// Delete the first `count` characters of a block's run text, front to
/// back. Mentions hold no text and are skipped.
fn delete_leading_chars(doc: &mut Document, path: &Path, count: usize) {
    let Some(block) = doc.block_at_path_mut(path) else {
        return;
    };
    let mut remaining = count;
    for child in block.children.iter_mut() {
        if remaining == 0 {
            break;
        }
        if let DomNode::Text(run) = child {
            let take = remaining.min(run.len());
            let cut = run.byte_index(take);
            run.text.drain(..cut);
            remaining -= take;
        }
    }
}

/// Re-check the document invariants. Compiled only for tests and the
/// `assert-invariants` feature.
#[cfg(any(test, feature = "assert-invariants"))]
pub(crate) fn assert_invariants(doc: &Document) {
    assert!(
        !doc.children.is_empty(),
        "document must keep at least one top-level block"
    );
    for child in &doc.children {
        let DomNode::Block(block) = child else {
            panic!("document root must not contain text runs");
        };
        assert_ne!(
            block.kind,
            BlockKind::ListItem,
            "list-item must not appear at top level"
        );
    }
    assert_no_adjacent_lists(&doc.children);
    for child in &doc.children {
        if let DomNode::Block(block) = child {
            assert_block_invariants(block);
        }
    }
}

#[cfg(any(test, feature = "assert-invariants"))]
fn assert_no_adjacent_lists(children: &[DomNode]) {
    for pair in children.windows(2) {
        if let (DomNode::Block(a), DomNode::Block(b)) = (&pair[0], &pair[1])
        {
            assert!(
                !(a.kind.is_list() && a.kind == b.kind),
                "adjacent sibling lists of kind {} must be merged",
                a.kind
            );
        }
    }
}

#[cfg(any(test, feature = "assert-invariants"))]
fn assert_block_invariants(block: &BlockNode) {
    assert!(
        !block.children.is_empty(),
        "block {} must keep at least one child",
        block.kind
    );
    if let BlockKind::Mention { .. } = block.kind {
        assert!(
            matches!(
                block.children.as_slice(),
                [DomNode::Text(run)] if run.text.is_empty()
            ),
            "mention must hold a single empty text run"
        );
        return;
    }
    if block.kind.is_list() {
        for child in &block.children {
            let item = child
                .as_block()
                .expect("list children must be blocks");
            assert_eq!(
                item.kind,
                BlockKind::ListItem,
                "list children must be list items"
            );
        }
    }
    assert_no_adjacent_lists(&block.children);
    for child in &block.children {
        if let DomNode::Block(b) = child {
            assert_block_invariants(b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(mut doc: Document) -> Document {
        let mut sel = None;
        normalize(&mut doc, &mut sel);
        assert_invariants(&doc);
        doc
    }

    fn list(kind: BlockKind, items: &[&str]) -> DomNode {
        DomNode::Block(BlockNode::new(
            kind,
            items
                .iter()
                .map(|t| {
                    DomNode::Block(BlockNode::new(
                        BlockKind::ListItem,
                        vec![DomNode::text(*t)],
                    ))
                })
                .collect(),
        ))
    }

    // ===================================================================
    // Fixed point / idempotence
    // ===================================================================

    #[test]
    fn normalizing_twice_equals_normalizing_once() {
        let doc = Document::from_value(vec![
            DomNode::paragraph(vec![DomNode::text("1. one")]),
            list(BlockKind::UnorderedList, &["a"]),
            list(BlockKind::UnorderedList, &["b"]),
        ]);
        let once = normalized(doc);
        let twice = normalized(once.clone());
        assert_eq!(once, twice);
    }

    // ===================================================================
    // Autoformat recognition
    // ===================================================================

    #[test]
    fn ordered_marker_converts_to_ordered_list() {
        let doc = normalized(Document::from_value(vec![DomNode::paragraph(
            vec![DomNode::text("1. buy milk")],
        )]));
        let block = doc.blocks()[0].as_block().unwrap();
        assert_eq!(block.kind, BlockKind::OrderedList);
        let item = block.children[0].as_block().unwrap();
        assert_eq!(item.kind, BlockKind::ListItem);
        assert_eq!(item.text(), "buy milk");
    }

    #[test]
    fn bullet_markers_convert_to_unordered_list() {
        for marker in ["- ", "* "] {
            let doc = normalized(Document::from_value(vec![
                DomNode::paragraph(vec![DomNode::text(format!(
                    "{marker}note"
                ))]),
            ]));
            let block = doc.blocks()[0].as_block().unwrap();
            assert_eq!(block.kind, BlockKind::UnorderedList);
            assert_eq!(block.text(), "note");
        }
    }

    #[test]
    fn marker_without_trailing_whitespace_does_not_fire() {
        let doc = normalized(Document::from_value(vec![DomNode::paragraph(
            vec![DomNode::text("1.fast")],
        )]));
        let block = doc.blocks()[0].as_block().unwrap();
        assert_eq!(block.kind, BlockKind::Paragraph);
        assert_eq!(block.text(), "1.fast");
    }

    #[test]
    fn marker_in_the_middle_does_not_fire() {
        let doc = normalized(Document::from_value(vec![DomNode::paragraph(
            vec![DomNode::text("see 1. below")],
        )]));
        assert_eq!(
            doc.blocks()[0].as_block().unwrap().kind,
            BlockKind::Paragraph
        );
    }

    #[test]
    fn autoformat_shifts_the_selection_back_over_the_marker() {
        let mut doc = Document::from_value(vec![DomNode::paragraph(vec![
            DomNode::text("1. a"),
        ])]);
        // cursor at the end of "1. a"
        let mut sel = Some((4, 4));
        normalize(&mut doc, &mut sel);
        assert_eq!(sel, Some((1, 1)));
        assert_eq!(doc.plain_text(), "a");
    }

    #[test]
    fn autoformatted_item_merges_into_a_preceding_list() {
        let doc = normalized(Document::from_value(vec![
            list(BlockKind::OrderedList, &["one"]),
            DomNode::paragraph(vec![DomNode::text("2. two")]),
        ]));
        assert_eq!(doc.blocks().len(), 1);
        let block = doc.blocks()[0].as_block().unwrap();
        assert_eq!(block.kind, BlockKind::OrderedList);
        assert_eq!(block.children.len(), 2);
        assert_eq!(doc.plain_text(), "one\ntwo");
    }

    // ===================================================================
    // Child-kind coercion
    // ===================================================================

    #[test]
    fn non_list_item_children_of_lists_are_coerced() {
        let doc = normalized(Document::from_value(vec![DomNode::Block(
            BlockNode::new(
                BlockKind::UnorderedList,
                vec![DomNode::paragraph(vec![DomNode::text("stray")])],
            ),
        )]));
        let block = doc.blocks()[0].as_block().unwrap();
        let item = block.children[0].as_block().unwrap();
        assert_eq!(item.kind, BlockKind::ListItem);
        assert_eq!(item.text(), "stray");
    }

    #[test]
    fn loose_text_inside_a_list_is_wrapped_in_an_item() {
        let doc = normalized(Document::from_value(vec![DomNode::Block(
            BlockNode::new(
                BlockKind::OrderedList,
                vec![DomNode::text("loose")],
            ),
        )]));
        let block = doc.blocks()[0].as_block().unwrap();
        let item = block.children[0].as_block().unwrap();
        assert_eq!(item.kind, BlockKind::ListItem);
        assert_eq!(item.text(), "loose");
    }

    // ===================================================================
    // Adjacent-list merge
    // ===================================================================

    #[test]
    fn adjacent_same_kind_lists_merge_into_one() {
        let doc = normalized(Document::from_value(vec![
            list(BlockKind::UnorderedList, &["A", "B"]),
            list(BlockKind::UnorderedList, &["C", "D"]),
        ]));
        assert_eq!(doc.blocks().len(), 1);
        let block = doc.blocks()[0].as_block().unwrap();
        assert_eq!(block.kind, BlockKind::UnorderedList);
        let items: Vec<String> = block
            .children
            .iter()
            .map(|c| c.as_block().unwrap().text())
            .collect();
        assert_eq!(items, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn different_kind_lists_stay_separate() {
        let doc = normalized(Document::from_value(vec![
            list(BlockKind::UnorderedList, &["a"]),
            list(BlockKind::OrderedList, &["b"]),
        ]));
        assert_eq!(doc.blocks().len(), 2);
    }

    #[test]
    fn a_paragraph_between_lists_prevents_the_merge() {
        let doc = normalized(Document::from_value(vec![
            list(BlockKind::UnorderedList, &["a"]),
            DomNode::paragraph(vec![DomNode::text("x")]),
            list(BlockKind::UnorderedList, &["b"]),
        ]));
        assert_eq!(doc.blocks().len(), 3);
    }

    // ===================================================================
    // Default fixups
    // ===================================================================

    #[test]
    fn empty_document_collapses_to_canonical_empty() {
        let mut doc = Document::from_value(vec![DomNode::paragraph(vec![
            DomNode::text("x"),
        ])]);
        doc.children.clear();
        let doc = normalized(doc);
        assert!(doc.is_canonical_empty());
    }

    #[test]
    fn loose_root_text_is_wrapped_in_a_paragraph() {
        let mut doc = Document::new();
        doc.children.push(DomNode::text("loose"));
        let doc = normalized(doc);
        for child in doc.blocks() {
            assert!(child.is_block());
        }
        assert!(doc.plain_text().contains("loose"));
    }

    #[test]
    fn childless_block_gets_an_empty_run() {
        let doc = normalized(Document::from_value(vec![DomNode::Block(
            BlockNode::new(BlockKind::Code, vec![]),
        )]));
        let block = doc.blocks()[0].as_block().unwrap();
        assert_eq!(block.children.len(), 1);
        assert!(block.children[0].is_text());
    }

    #[test]
    fn empty_lists_are_removed() {
        let doc = normalized(Document::from_value(vec![
            DomNode::paragraph(vec![DomNode::text("a")]),
            DomNode::Block(BlockNode::new(BlockKind::UnorderedList, vec![])),
        ]));
        assert_eq!(doc.blocks().len(), 1);
    }

    #[test]
    fn orphan_list_item_reverts_to_paragraph() {
        let doc = normalized(Document::from_value(vec![DomNode::Block(
            BlockNode::new(
                BlockKind::ListItem,
                vec![DomNode::text("stranded")],
            ),
        )]));
        let block = doc.blocks()[0].as_block().unwrap();
        assert_eq!(block.kind, BlockKind::Paragraph);
        assert_eq!(block.text(), "stranded");
    }

    #[test]
    fn mentions_get_boundary_runs() {
        use helpdesk_mentions::MentionKind;
        let doc = normalized(Document::from_value(vec![DomNode::Block(
            BlockNode::new(
                BlockKind::Paragraph,
                vec![DomNode::Block(BlockNode::mention(
                    MentionKind::User,
                    1,
                ))],
            ),
        )]));
        let block = doc.blocks()[0].as_block().unwrap();
        assert_eq!(block.children.len(), 3);
        assert!(block.children[0].is_text());
        assert!(block.children[1].is_block());
        assert!(block.children[2].is_text());
    }

    #[test]
    fn mention_children_are_reset_to_a_single_empty_run() {
        use helpdesk_mentions::MentionKind;
        let mut mention = BlockNode::mention(MentionKind::Machine, 2);
        mention.children = vec![DomNode::text("junk"), DomNode::text("x")];
        let doc = normalized(Document::from_value(vec![DomNode::Block(
            BlockNode::new(
                BlockKind::Paragraph,
                vec![
                    DomNode::text("a"),
                    DomNode::Block(mention),
                    DomNode::text("b"),
                ],
            ),
        )]));
        let block = doc.blocks()[0].as_block().unwrap();
        let m = block.children[1].as_block().unwrap();
        assert!(matches!(
            m.children.as_slice(),
            [DomNode::Text(run)] if run.text.is_empty()
        ));
    }

    #[test]
    fn same_mark_neighbour_runs_are_merged() {
        let doc = normalized(Document::from_value(vec![DomNode::Block(
            BlockNode::new(
                BlockKind::Paragraph,
                vec![DomNode::text("foo"), DomNode::text("bar")],
            ),
        )]));
        let block = doc.blocks()[0].as_block().unwrap();
        assert_eq!(block.children.len(), 1);
        assert_eq!(block.text(), "foobar");
    }

    #[test]
    fn differently_marked_runs_stay_split() {
        let mut bold = TextRun::new("foo");
        bold.bold = true;
        let doc = normalized(Document::from_value(vec![DomNode::Block(
            BlockNode::new(
                BlockKind::Paragraph,
                vec![DomNode::Text(bold), DomNode::text("bar")],
            ),
        )]));
        let block = doc.blocks()[0].as_block().unwrap();
        assert_eq!(block.children.len(), 2);
    }

    #[test]
    fn redundant_empty_runs_are_dropped() {
        let mut bold = TextRun::new("b");
        bold.bold = true;
        let doc = normalized(Document::from_value(vec![DomNode::Block(
            BlockNode::new(
                BlockKind::Paragraph,
                vec![
                    DomNode::text("a"),
                    DomNode::text(""),
                    DomNode::Text(bold),
                ],
            ),
        )]));
        let block = doc.blocks()[0].as_block().unwrap();
        assert_eq!(block.children.len(), 2);
        assert_eq!(block.text(), "ab");
    }
}

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

//! Text editing operations: insert_text, insert_break, delete,
//! delete_backward, delete_forward.
//!
//! All deletion is expressed over the flat offset projection, so one
//! backward step removes whatever the previous unit is: a grapheme
//! within a run, a whole mention, or the boundary between two blocks
//! (merging them).

use std::mem;

use unicode_segmentation::UnicodeSegmentation;

use crate::dom::document::Document;
use crate::dom::location::{Path, Range};
use crate::dom::nodes::{BlockNode, DomNode, InlineFormat};
use crate::{Editor, EditorUpdate};

impl Editor {
    /// Replace the current selection with `text`, applying any pending
    /// formats to the inserted characters.
    pub fn insert_text(&mut self, text: &str) -> EditorUpdate {
        let Some(sel) = self.selection.clone() else {
            return self.create_update_keep();
        };
        let Some((start, end)) = self.doc.flat_range(&sel) else {
            return self.create_update_keep();
        };
        if start != end {
            raw_delete_flat(&mut self.doc, start, end);
        }
        if !text.is_empty() {
            let pending: Vec<InlineFormat> =
                self.pending_formats.drain().collect();
            if !raw_insert_text(&mut self.doc, start, text, &pending) {
                return self.create_update_keep();
            }
        }
        let cursor = start + text.chars().count();
        self.selection = self.doc.range_between(cursor, cursor);
        self.commit()
    }

    /// Split the enclosing leaf block at the cursor into two blocks of
    /// the same kind (the Enter default path).
    pub fn insert_break(&mut self) -> EditorUpdate {
        let Some(sel) = self.selection.clone() else {
            return self.create_update_keep();
        };
        let Some((start, end)) = self.doc.flat_range(&sel) else {
            return self.create_update_keep();
        };
        if start != end {
            raw_delete_flat(&mut self.doc, start, end);
        }
        if !raw_split_leaf(&mut self.doc, start) {
            return self.create_update_keep();
        }
        let cursor = start + 1;
        self.selection = self.doc.range_between(cursor, cursor);
        self.commit()
    }

    /// Delete the content spanned by a range. A collapsed range spans
    /// nothing and leaves the document untouched.
    pub fn delete(&mut self, range: &Range) -> EditorUpdate {
        let Some((start, end)) = self.doc.flat_range(range) else {
            return self.create_update_keep();
        };
        if start == end {
            return self.create_update_keep();
        }
        raw_delete_flat(&mut self.doc, start, end);
        self.selection = self.doc.range_between(start, start);
        self.commit()
    }

    /// Delete one unit backwards from a collapsed cursor, or the
    /// selection if one is expanded.
    pub fn delete_backward(&mut self) -> EditorUpdate {
        let Some(sel) = self.selection.clone() else {
            return self.create_update_keep();
        };
        let Some((start, end)) = self.doc.flat_range(&sel) else {
            return self.create_update_keep();
        };
        if start != end {
            raw_delete_flat(&mut self.doc, start, end);
            self.selection = self.doc.range_between(start, start);
            return self.commit();
        }
        if start == 0 {
            return self.create_update_keep();
        }
        let from = match unit_before(&self.doc, start) {
            Some(from) => from,
            None => return self.create_update_keep(),
        };
        raw_delete_flat(&mut self.doc, from, start);
        self.selection = self.doc.range_between(from, from);
        self.commit()
    }

    /// Delete one unit forwards from a collapsed cursor, or the
    /// selection if one is expanded.
    pub fn delete_forward(&mut self) -> EditorUpdate {
        let Some(sel) = self.selection.clone() else {
            return self.create_update_keep();
        };
        let Some((start, end)) = self.doc.flat_range(&sel) else {
            return self.create_update_keep();
        };
        if start != end {
            raw_delete_flat(&mut self.doc, start, end);
            self.selection = self.doc.range_between(start, start);
            return self.commit();
        }
        if start >= self.doc.text_len() {
            return self.create_update_keep();
        }
        let to = match unit_after(&self.doc, start) {
            Some(to) => to,
            None => return self.create_update_keep(),
        };
        raw_delete_flat(&mut self.doc, start, to);
        self.selection = self.doc.range_between(start, start);
        self.commit()
    }
}

// ─── Flat-offset tree surgery ────────────────────────────────────────────────

/// Delete the flat span `[start, end)`. Within one leaf this removes
/// characters and fully covered mentions; across leaves it trims both
/// edge blocks, drops everything in between, and merges the remainders
/// into the start block. Emptied ancestors are left for normalization.
pub(crate) fn raw_delete_flat(
    doc: &mut Document,
    start: usize,
    end: usize,
) -> bool {
    if start >= end {
        return false;
    }
    let spans = doc.leaf_spans();
    let si = spans.iter().position(|s| start <= s.start + s.len);
    let ei = spans.iter().position(|s| end <= s.start + s.len);
    let (Some(si), Some(ei)) = (si, ei) else {
        return false;
    };

    if si == ei {
        let span = &spans[si];
        remove_units_in_leaf(
            doc,
            &span.path,
            start.saturating_sub(span.start),
            end.saturating_sub(span.start),
        );
        return true;
    }

    let start_span = &spans[si];
    let end_span = &spans[ei];
    let tail = leaf_children_after(
        doc,
        &end_span.path,
        end.saturating_sub(end_span.start),
    );
    truncate_leaf_children(
        doc,
        &start_span.path,
        start.saturating_sub(start_span.start),
    );
    for span in spans[si + 1..=ei].iter().rev() {
        doc.remove_node(&span.path);
    }
    if let Some(block) = doc.block_at_path_mut(&start_span.path) {
        block.children.extend(tail);
    }
    true
}

/// Remove the units in `[s, e)` (offsets local to the leaf's content)
/// from a single leaf block.
fn remove_units_in_leaf(doc: &mut Document, path: &Path, s: usize, e: usize) {
    let Some(block) = doc.block_at_path_mut(path) else {
        return;
    };
    let old = mem::take(&mut block.children);
    let mut new_children = Vec::with_capacity(old.len());
    let mut off = 0;
    for child in old {
        match child {
            DomNode::Text(mut run) => {
                let n = run.len();
                let a = s.max(off);
                let b = e.min(off + n);
                if a < b {
                    let from = run.byte_index(a - off);
                    let to = run.byte_index(b - off);
                    run.text.drain(from..to);
                }
                new_children.push(DomNode::Text(run));
                off += n;
            }
            DomNode::Block(b) => {
                let covered = s <= off && off + 1 <= e;
                if !covered {
                    new_children.push(DomNode::Block(b));
                }
                off += 1;
            }
        }
    }
    block.children = new_children;
}

/// Clone the inline content of a leaf that lies after local offset `e`.
fn leaf_children_after(doc: &Document, path: &Path, e: usize) -> Vec<DomNode> {
    let Some(block) = doc.block_at_path(path) else {
        return Vec::new();
    };
    let mut tail = Vec::new();
    let mut off = 0;
    for child in &block.children {
        match child {
            DomNode::Text(run) => {
                let n = run.len();
                if off >= e {
                    tail.push(child.clone());
                } else if off + n > e {
                    let cut = run.byte_index(e - off);
                    tail.push(DomNode::Text(
                        run.with_text(&run.text[cut..]),
                    ));
                }
                off += n;
            }
            DomNode::Block(_) => {
                if off >= e {
                    tail.push(child.clone());
                }
                off += 1;
            }
        }
    }
    tail
}

/// Truncate a leaf's inline content to everything before local offset
/// `s`.
fn truncate_leaf_children(doc: &mut Document, path: &Path, s: usize) {
    let Some(block) = doc.block_at_path_mut(path) else {
        return;
    };
    let old = mem::take(&mut block.children);
    let mut kept = Vec::new();
    let mut off = 0;
    for child in old {
        match child {
            DomNode::Text(run) => {
                let n = run.len();
                if off + n <= s {
                    kept.push(DomNode::Text(run));
                } else if off < s {
                    let cut = run.byte_index(s - off);
                    kept.push(DomNode::Text(
                        run.with_text(&run.text[..cut]),
                    ));
                }
                off += n;
            }
            DomNode::Block(b) => {
                if off + 1 <= s {
                    kept.push(DomNode::Block(b));
                }
                off += 1;
            }
        }
    }
    block.children = kept;
}

/// Insert text at a flat offset, splitting the host run when pending
/// formats give the inserted characters different marks.
fn raw_insert_text(
    doc: &mut Document,
    flat: usize,
    text: &str,
    pending: &[InlineFormat],
) -> bool {
    let Some(point) = doc.point_at(flat) else {
        return false;
    };
    let (Some(leaf), Some(index)) = (point.path.parent(), point.path.last())
    else {
        return false;
    };
    let Some(children) = doc.child_list_mut(&leaf) else {
        return false;
    };
    let Some(run) = children.get_mut(index).and_then(|n| n.as_text_mut())
    else {
        return false;
    };

    let mut marks = run.with_text("");
    for format in pending {
        let on = marks.mark(*format);
        marks.set_mark(*format, !on);
    }

    if marks.same_marks(run) {
        let at = run.byte_index(point.offset);
        run.text.insert_str(at, text);
        return true;
    }

    let cut = run.byte_index(point.offset);
    let before = run.with_text(&run.text[..cut]);
    let after = run.with_text(&run.text[cut..]);
    let inserted = DomNode::Text(marks.with_text(text));
    let _ = children.splice(
        index..=index,
        [DomNode::Text(before), inserted, DomNode::Text(after)],
    );
    true
}

/// Split the leaf block containing `flat` into two siblings of the
/// same kind, the cut falling at the cursor.
fn raw_split_leaf(doc: &mut Document, flat: usize) -> bool {
    let Some(point) = doc.point_at(flat) else {
        return false;
    };
    let (Some(leaf), Some(index)) = (point.path.parent(), point.path.last())
    else {
        return false;
    };
    let Some(block) = doc.block_at_path_mut(&leaf) else {
        return false;
    };
    let kind = block.kind.clone();
    let old = mem::take(&mut block.children);

    let mut before = Vec::new();
    let mut after = Vec::new();
    for (i, child) in old.into_iter().enumerate() {
        if i < index {
            before.push(child);
        } else if i > index {
            after.push(child);
        } else if let DomNode::Text(run) = child {
            let cut = run.byte_index(point.offset);
            before.push(DomNode::Text(run.with_text(&run.text[..cut])));
            after.push(DomNode::Text(run.with_text(&run.text[cut..])));
        } else {
            // Defensive: points always address runs.
            before.push(child);
        }
    }
    block.children = before;

    let second = BlockNode::new(kind, after);
    let Some(sibling) = leaf
        .last()
        .and_then(|i| leaf.sibling(i + 1))
    else {
        return false;
    };
    doc.insert_node(&sibling, DomNode::Block(second))
}

/// Insert inline nodes at a flat offset by splitting the host run.
pub(crate) fn raw_insert_inline(
    doc: &mut Document,
    flat: usize,
    nodes: Vec<DomNode>,
) -> bool {
    let Some(point) = doc.point_at(flat) else {
        return false;
    };
    let (Some(leaf), Some(index)) = (point.path.parent(), point.path.last())
    else {
        return false;
    };
    let Some(children) = doc.child_list_mut(&leaf) else {
        return false;
    };
    let Some(run) = children.get(index).and_then(|n| n.as_text()) else {
        return false;
    };
    let cut = run.byte_index(point.offset);
    let before = run.with_text(&run.text[..cut]);
    let after = run.with_text(&run.text[cut..]);
    let replacement: Vec<DomNode> = std::iter::once(DomNode::Text(before))
        .chain(nodes)
        .chain(std::iter::once(DomNode::Text(after)))
        .collect();
    let _ = children.splice(index..=index, replacement);
    true
}

// ─── Unit stepping ───────────────────────────────────────────────────────────

/// The flat offset at the start of the unit immediately before `flat`:
/// a grapheme, a mention, or the separator to the previous block.
fn unit_before(doc: &Document, flat: usize) -> Option<usize> {
    let span = doc.leaf_span_at(flat)?;
    if flat == span.start {
        return Some(flat - 1); // block boundary
    }
    let block = doc.block_at_path(&span.path)?;
    let mut off = span.start;
    for child in &block.children {
        match child {
            DomNode::Text(run) => {
                let n = run.len();
                if flat > off && flat <= off + n {
                    let prefix = &run.text[..run.byte_index(flat - off)];
                    let grapheme = prefix.graphemes(true).next_back()?;
                    return Some(flat - grapheme.chars().count());
                }
                off += n;
            }
            DomNode::Block(_) => {
                if flat == off + 1 {
                    return Some(off); // whole mention
                }
                off += 1;
            }
        }
    }
    None
}

/// The flat offset at the end of the unit immediately after `flat`.
fn unit_after(doc: &Document, flat: usize) -> Option<usize> {
    let span = doc.leaf_span_at(flat)?;
    if flat == span.start + span.len {
        return Some(flat + 1); // block boundary
    }
    let block = doc.block_at_path(&span.path)?;
    let mut off = span.start;
    for child in &block.children {
        match child {
            DomNode::Text(run) => {
                let n = run.len();
                if flat >= off && flat < off + n {
                    let suffix = &run.text[run.byte_index(flat - off)..];
                    let grapheme = suffix.graphemes(true).next()?;
                    return Some(flat + grapheme.chars().count());
                }
                off += n;
            }
            DomNode::Block(_) => {
                if flat == off {
                    return Some(off + 1); // whole mention
                }
                off += 1;
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use helpdesk_mentions::{MentionDirectory, MentionKind, Mentionable};

    use crate::dom::nodes::BlockNode;
    use crate::{BlockKind, DomNode, Editor};

    fn directory() -> MentionDirectory {
        MentionDirectory::new(
            vec![Mentionable::new(1, "Alice"), Mentionable::new(2, "Bob")],
            vec![Mentionable::new(1, "Machine 1")],
        )
    }

    fn new_editor() -> Editor {
        Editor::new(directory())
    }

    fn editor_with_text(text: &str) -> Editor {
        let mut e = new_editor();
        e.select_start();
        e.insert_text(text);
        e
    }

    fn plain(e: &Editor) -> String {
        e.plain_text()
    }

    // ===================================================================
    // Character insertion
    // ===================================================================

    #[test]
    fn typing_into_an_empty_document_appends() {
        let mut editor = new_editor();
        editor.select_start();
        editor.insert_text("v");
        assert_eq!(plain(&editor), "v");
    }

    #[test]
    fn typing_in_the_middle_inserts() {
        let mut editor = editor_with_text("ac");
        editor.select(1, 1);
        editor.insert_text("b");
        assert_eq!(plain(&editor), "abc");
    }

    #[test]
    fn typing_replaces_an_expanded_selection() {
        let mut editor = editor_with_text("abcdefghi");
        editor.select(3, 6);
        editor.insert_text("Z");
        assert_eq!(plain(&editor), "abcZghi");
    }

    #[test]
    fn typing_replaces_a_backward_selection() {
        let mut editor = editor_with_text("abcdefghi");
        editor.select(6, 3);
        editor.insert_text("Z");
        assert_eq!(plain(&editor), "abcZghi");
    }

    #[test]
    fn insert_text_without_a_selection_is_rejected() {
        let mut editor = new_editor();
        let update = editor.insert_text("x");
        assert!(update.is_keep());
        assert_eq!(plain(&editor), "");
    }

    // ===================================================================
    // Backspace
    // ===================================================================

    #[test]
    fn backspace_at_the_end_deletes_the_last_char() {
        let mut editor = editor_with_text("abc");
        editor.delete_backward();
        assert_eq!(plain(&editor), "ab");
    }

    #[test]
    fn backspace_at_the_start_does_nothing() {
        let mut editor = editor_with_text("abc");
        editor.select(0, 0);
        let update = editor.delete_backward();
        assert!(update.is_keep());
        assert_eq!(plain(&editor), "abc");
    }

    #[test]
    fn backspace_deletes_an_expanded_selection() {
        let mut editor = editor_with_text("abcdef");
        editor.select(1, 4);
        editor.delete_backward();
        assert_eq!(plain(&editor), "aef");
    }

    #[test]
    fn backspace_removes_a_whole_grapheme_cluster() {
        // Woman Astronaut is four scalar values joined by ZWJ.
        let emoji = "\u{1F469}\u{1F3FF}\u{200D}\u{1F680}";
        let mut editor = editor_with_text(&format!("a{emoji}"));
        editor.delete_backward();
        assert_eq!(plain(&editor), "a");
    }

    #[test]
    fn backspace_at_block_start_merges_into_the_previous_block() {
        let mut editor = editor_with_text("ab");
        editor.insert_break();
        editor.insert_text("cd");
        assert_eq!(plain(&editor), "ab\ncd");
        editor.select(3, 3);
        editor.delete_backward();
        assert_eq!(plain(&editor), "abcd");
    }

    #[test]
    fn backspace_right_after_a_mention_removes_the_whole_mention() {
        let mut editor = editor_with_text("hi ");
        editor.insert_mention(MentionKind::User, 1);
        assert_eq!(editor.text_len(), 4);
        editor.delete_backward();
        assert_eq!(editor.text_len(), 3);
        assert_eq!(plain(&editor), "hi ");
        assert!(editor.mention_refs().is_empty());
    }

    // ===================================================================
    // Delete forward
    // ===================================================================

    #[test]
    fn delete_at_the_end_does_nothing() {
        let mut editor = editor_with_text("abc");
        let update = editor.delete_forward();
        assert!(update.is_keep());
        assert_eq!(plain(&editor), "abc");
    }

    #[test]
    fn delete_at_the_start_deletes_forward() {
        let mut editor = editor_with_text("abc");
        editor.select(0, 0);
        editor.delete_forward();
        assert_eq!(plain(&editor), "bc");
    }

    #[test]
    fn delete_at_block_end_merges_the_next_block() {
        let mut editor = editor_with_text("ab");
        editor.insert_break();
        editor.insert_text("cd");
        editor.select(2, 2);
        editor.delete_forward();
        assert_eq!(plain(&editor), "abcd");
    }

    #[test]
    fn delete_before_a_mention_removes_the_whole_mention() {
        let mut editor = editor_with_text("x");
        editor.insert_mention(MentionKind::Machine, 1);
        editor.select(1, 1);
        editor.delete_forward();
        assert_eq!(editor.text_len(), 1);
        assert!(editor.mention_refs().is_empty());
    }

    // ===================================================================
    // delete(range)
    // ===================================================================

    #[test]
    fn delete_range_removes_the_spanned_text() {
        let mut editor = editor_with_text("abcdef");
        let range = editor
            .document()
            .range_between(1, 4)
            .unwrap();
        editor.delete(&range);
        assert_eq!(plain(&editor), "aef");
    }

    #[test]
    fn delete_collapsed_range_is_a_noop() {
        let mut editor = editor_with_text("abc");
        let range = editor.document().range_between(1, 1).unwrap();
        let update = editor.delete(&range);
        assert!(update.is_keep());
        assert_eq!(plain(&editor), "abc");
    }

    #[test]
    fn delete_range_across_blocks_merges_the_remainders() {
        let mut editor = editor_with_text("hello");
        editor.insert_break();
        editor.insert_text("world");
        let range = editor.document().range_between(3, 8).unwrap();
        editor.delete(&range);
        assert_eq!(plain(&editor), "helrld");
        assert_eq!(editor.value().len(), 1);
    }

    #[test]
    fn deleting_everything_leaves_the_canonical_empty_document() {
        let mut editor = editor_with_text("hello");
        editor.select_all();
        editor.delete_backward();
        assert!(editor.document().is_canonical_empty());
        assert_eq!(plain(&editor), "");
    }

    #[test]
    fn repeated_backspace_never_drops_the_last_block() {
        let mut editor = editor_with_text("ab");
        for _ in 0..10 {
            editor.delete_backward();
        }
        assert!(editor.document().is_canonical_empty());
        assert!(!editor.value().is_empty());
    }

    // ===================================================================
    // insert_break
    // ===================================================================

    #[test]
    fn break_splits_a_paragraph_in_two() {
        let mut editor = editor_with_text("abcd");
        editor.select(2, 2);
        editor.insert_break();
        assert_eq!(plain(&editor), "ab\ncd");
        assert_eq!(editor.value().len(), 2);
    }

    #[test]
    fn break_in_a_list_item_creates_a_sibling_item() {
        let mut editor = editor_with_text("- one");
        // autoformat turned the paragraph into a list item
        editor.insert_break();
        editor.insert_text("two");
        let block = editor.value()[0].as_block().unwrap();
        assert_eq!(block.kind, BlockKind::UnorderedList);
        assert_eq!(block.children.len(), 2);
        assert_eq!(plain(&editor), "one\ntwo");
    }

    #[test]
    fn break_with_an_expanded_selection_deletes_it_first() {
        let mut editor = editor_with_text("abcdef");
        editor.select(2, 4);
        editor.insert_break();
        assert_eq!(plain(&editor), "ab\nef");
    }

    // ===================================================================
    // Pending formats
    // ===================================================================

    #[test]
    fn pending_bold_applies_to_the_next_insert() {
        let mut editor = editor_with_text("aa");
        editor.toggle_mark(crate::InlineFormat::Bold);
        editor.insert_text("bb");
        let block = editor.value()[0].as_block().unwrap();
        let runs: Vec<_> = block
            .children
            .iter()
            .filter_map(|c| c.as_text())
            .collect();
        assert_eq!(runs.len(), 2);
        assert!(!runs[0].bold);
        assert!(runs[1].bold);
        assert_eq!(runs[1].text, "bb");
    }

    #[test]
    fn mention_survives_a_partial_block_deletion() {
        let mut editor = editor_with_text("start ");
        editor.insert_mention(MentionKind::User, 2);
        editor.insert_text(" end");
        // delete " end" only; the mention must stay
        let len = editor.text_len();
        let range = editor
            .document()
            .range_between(len - 4, len)
            .unwrap();
        editor.delete(&range);
        assert_eq!(editor.mention_refs(), vec![(MentionKind::User, 2)]);
    }

    #[test]
    fn delete_across_a_list_keeps_the_surviving_items() {
        let mut editor = Editor::with_value(
            vec![
                DomNode::paragraph(vec![DomNode::text("intro")]),
                DomNode::Block(BlockNode::new(
                    BlockKind::UnorderedList,
                    vec![
                        DomNode::Block(BlockNode::new(
                            BlockKind::ListItem,
                            vec![DomNode::text("one")],
                        )),
                        DomNode::Block(BlockNode::new(
                            BlockKind::ListItem,
                            vec![DomNode::text("two")],
                        )),
                    ],
                )),
            ],
            directory(),
        );
        // span from inside "intro" to inside "one"
        let range = editor.document().range_between(3, 8).unwrap();
        editor.delete(&range);
        assert_eq!(plain(&editor), "inte\ntwo");
    }
}

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

//! The editor session: state, value contract and the commit pipeline.
//!
//! Every mutating operation ends in [`Editor::commit`]: the raw tree
//! edit has already happened, normalization re-establishes the
//! invariants, the selection is carried across the restructuring via
//! the flat offset projection, the mention controller re-evaluates its
//! trigger window, and the change listener fires exactly once.

use std::collections::HashSet;

use helpdesk_mentions::MentionDirectory;
use strum::IntoEnumIterator;

use crate::dom::document::Document;
use crate::dom::location::{Path, Range};
use crate::dom::nodes::{BlockKind, DomNode, InlineFormat};
use crate::editor::normalize;
use crate::editor::suggestion::MentionSuggestion;
use crate::{EditorUpdate, TextUpdate};

/// Callback fired once per committed, normalized mutation with the new
/// document value.
pub type ChangeListener = Box<dyn FnMut(&[DomNode])>;

/// One rich-text editing session.
pub struct Editor {
    pub(crate) doc: Document,
    pub(crate) selection: Option<Range>,
    pub(crate) pending_formats: HashSet<InlineFormat>,
    pub(crate) directory: MentionDirectory,
    pub(crate) suggestion: Option<MentionSuggestion>,
    change_listener: Option<ChangeListener>,
}

impl Editor {
    /// A session over the canonical empty document.
    pub fn new(directory: MentionDirectory) -> Self {
        Self {
            doc: Document::new(),
            selection: None,
            pending_formats: HashSet::new(),
            directory,
            suggestion: None,
            change_listener: None,
        }
    }

    /// A session over an externally supplied initial value. The value
    /// is normalized before anything else observes it.
    pub fn with_value(
        value: Vec<DomNode>,
        directory: MentionDirectory,
    ) -> Self {
        let mut editor = Self::new(directory);
        editor.doc = Document::from_value(value);
        let mut no_selection = None;
        normalize::normalize(&mut editor.doc, &mut no_selection);
        editor
    }

    // ─── Value contract ─────────────────────────────────────────────────

    /// The current document value, same shape as the initial value.
    pub fn value(&self) -> &[DomNode] {
        self.doc.blocks()
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Replace the whole document with a new value.
    pub fn set_value(&mut self, value: Vec<DomNode>) -> EditorUpdate {
        self.doc = Document::from_value(value);
        self.selection = None;
        self.pending_formats.clear();
        self.suggestion = None;
        self.commit()
    }

    /// Reset to the canonical empty document with the cursor at its
    /// start.
    pub fn clear(&mut self) -> EditorUpdate {
        self.doc = Document::new();
        self.selection = self.doc.range_between(0, 0);
        self.pending_formats.clear();
        self.suggestion = None;
        self.commit()
    }

    /// Install the observer fired once per committed mutation.
    pub fn set_change_listener(&mut self, listener: ChangeListener) {
        self.change_listener = Some(listener);
    }

    /// The injected read-only entity feed for this session.
    pub fn directory(&self) -> &MentionDirectory {
        &self.directory
    }

    // ─── Introspection ──────────────────────────────────────────────────

    /// Flat document length: run characters, one unit per mention, one
    /// separator unit between leaf blocks.
    pub fn text_len(&self) -> usize {
        self.doc.text_len()
    }

    /// The run text of the document, one line per leaf block.
    pub fn plain_text(&self) -> String {
        self.doc.plain_text()
    }

    /// The kind of the leaf block containing a flat offset.
    pub fn block_kind_at(&self, offset: usize) -> Option<BlockKind> {
        let span = self.doc.leaf_span_at(offset)?;
        self.doc.block_at_path(&span.path).map(|b| b.kind.clone())
    }

    // ─── Commit pipeline ────────────────────────────────────────────────

    /// Normalize, restore the selection, re-evaluate the mention
    /// trigger window, notify, and build the full update.
    pub(crate) fn commit(&mut self) -> EditorUpdate {
        let mut flat = self.selection.as_ref().and_then(|r| {
            let anchor = self.doc.location_of(&r.anchor)?;
            let focus = self.doc.location_of(&r.focus)?;
            Some((anchor, focus))
        });

        normalize::normalize(&mut self.doc, &mut flat);

        self.selection = flat.and_then(|(anchor, focus)| {
            Some(Range::new(
                self.doc.point_at(anchor)?,
                self.doc.point_at(focus)?,
            ))
        });

        #[cfg(any(test, feature = "assert-invariants"))]
        normalize::assert_invariants(&self.doc);

        self.refresh_suggestion();

        if let Some(listener) = &mut self.change_listener {
            listener(&self.doc.children);
        }

        EditorUpdate::replace_all(
            self.doc.children.clone(),
            self.selection.clone(),
            self.suggestion_action(),
        )
    }

    /// Build a selection-only update from the current state.
    pub(crate) fn create_update_selection(&self) -> EditorUpdate {
        EditorUpdate::select(self.selection.clone(), self.suggestion_action())
    }

    /// A no-change update that still reports the current suggestion
    /// state.
    pub(crate) fn create_update_keep(&self) -> EditorUpdate {
        EditorUpdate {
            text_update: TextUpdate::Keep,
            suggestion: self.suggestion_action(),
        }
    }

    // ─── Debug output ───────────────────────────────────────────────────

    /// A readable tree dump with `|` (cursor) / `{`…`}` (range) markers
    /// inside run text.
    pub fn to_tree(&self) -> String {
        let mut out = String::new();
        let flat = self.selection.as_ref().and_then(|r| {
            let anchor = self.doc.location_of(&r.anchor)?;
            let focus = self.doc.location_of(&r.focus)?;
            Some((anchor, focus))
        });
        match flat {
            Some((a, f)) => out.push_str(&format!("sel: ({a},{f})\n")),
            None => out.push_str("sel: none\n"),
        }

        // Flat start of every run, so selection markers can be placed.
        let mut run_starts: Vec<(Path, usize)> = Vec::new();
        for span in self.doc.leaf_spans() {
            if let Some(block) = self.doc.block_at_path(&span.path) {
                let mut off = span.start;
                for (i, child) in block.children.iter().enumerate() {
                    match child {
                        DomNode::Text(run) => {
                            run_starts.push((span.path.child(i), off));
                            off += run.len();
                        }
                        DomNode::Block(_) => off += 1,
                    }
                }
            }
        }

        let sel = flat.map(|(a, f)| (a.min(f), a.max(f)));
        self.dump_children(
            self.doc.blocks(),
            &Path::root(),
            0,
            &run_starts,
            sel,
            &mut out,
        );
        out
    }

    fn dump_children(
        &self,
        children: &[DomNode],
        path: &Path,
        depth: usize,
        run_starts: &[(Path, usize)],
        sel: Option<(usize, usize)>,
        out: &mut String,
    ) {
        let indent = "  ".repeat(depth);
        for (i, child) in children.iter().enumerate() {
            let child_path = path.child(i);
            match child {
                DomNode::Block(b) => {
                    if let BlockKind::Mention { mention_type, id } = &b.kind
                    {
                        out.push_str(&format!(
                            "{indent}├─ mention({mention_type:?}:{id})\n"
                        ));
                    } else {
                        out.push_str(&format!("{indent}├─ {}\n", b.kind));
                        self.dump_children(
                            &b.children,
                            &child_path,
                            depth + 1,
                            run_starts,
                            sel,
                            out,
                        );
                    }
                }
                DomNode::Text(run) => {
                    let start = run_starts
                        .iter()
                        .find(|(p, _)| *p == child_path)
                        .map(|(_, s)| *s);
                    let display = match (start, sel) {
                        (Some(start), Some((s, e))) => {
                            annotate_selection(&run.text, start, s, e)
                        }
                        _ => run.text.clone(),
                    };
                    let marks: Vec<String> = InlineFormat::iter()
                        .filter(|f| run.mark(*f))
                        .map(|f| f.to_string())
                        .collect();
                    let marks_str = if marks.is_empty() {
                        String::new()
                    } else {
                        format!(" [{}]", marks.join(", "))
                    };
                    out.push_str(&format!(
                        "{indent}│  \"{display}\"{marks_str}\n"
                    ));
                }
            }
        }
    }
}

/// Insert `|` (cursor) or `{`…`}` (range) markers into a run's text.
/// `span_offset` is the flat offset at which the run starts;
/// `sel_start`/`sel_end` are ordered flat selection bounds.
fn annotate_selection(
    text: &str,
    span_offset: usize,
    sel_start: usize,
    sel_end: usize,
) -> String {
    let len = text.chars().count();
    let span_end = span_offset + len;

    if sel_end < span_offset || sel_start > span_end {
        return text.to_string();
    }

    let mut result = String::new();
    for (i, ch) in text.chars().enumerate() {
        let doc_pos = span_offset + i;
        if doc_pos == sel_start {
            result.push(if sel_start == sel_end { '|' } else { '{' });
        }
        result.push(ch);
        if doc_pos + 1 == sel_end && sel_start != sel_end {
            result.push('}');
        }
    }
    if sel_start == span_end && sel_start == sel_end {
        result.push('|');
    }
    result
}

#[cfg(test)]
mod tests {
    use helpdesk_mentions::{MentionDirectory, Mentionable};

    use crate::dom::nodes::DomNode;
    use crate::{BlockKind, Editor, TextUpdate};

    fn directory() -> MentionDirectory {
        MentionDirectory::new(
            vec![
                Mentionable::new(1, "Alice"),
                Mentionable::new(2, "Bob"),
                Mentionable::new(3, "Charlie"),
                Mentionable::new(4, "Diana"),
            ],
            vec![
                Mentionable::new(1, "Machine 1"),
                Mentionable::new(2, "Machine 2"),
                Mentionable::new(3, "Machine 3"),
                Mentionable::new(4, "Machine 4"),
            ],
        )
    }

    fn new_editor() -> Editor {
        Editor::new(directory())
    }

    // ===================================================================
    // Value contract
    // ===================================================================

    #[test]
    fn new_editor_holds_the_canonical_empty_document() {
        let editor = new_editor();
        assert!(editor.document().is_canonical_empty());
        assert_eq!(editor.plain_text(), "");
    }

    #[test]
    fn with_value_normalizes_the_initial_value() {
        // Two adjacent same-kind lists must arrive merged.
        let value: Vec<DomNode> = serde_json::from_str(
            r#"[
                {"type":"unordered-list","children":[
                    {"type":"list-item","children":[{"text":"a"}]}]},
                {"type":"unordered-list","children":[
                    {"type":"list-item","children":[{"text":"b"}]}]}
            ]"#,
        )
        .unwrap();
        let editor = Editor::with_value(value, directory());
        assert_eq!(editor.value().len(), 1);
        assert_eq!(editor.plain_text(), "a\nb");
    }

    #[test]
    fn with_empty_value_defaults_to_canonical_empty() {
        let editor = Editor::with_value(Vec::new(), directory());
        assert!(editor.document().is_canonical_empty());
    }

    #[test]
    fn clear_resets_to_canonical_empty_with_cursor() {
        let mut editor = new_editor();
        editor.select_all();
        editor.insert_text("some text");
        editor.clear();
        assert!(editor.document().is_canonical_empty());
        assert!(editor
            .selection()
            .map(|r| r.is_collapsed())
            .unwrap_or(false));
    }

    #[test]
    fn change_listener_fires_once_per_commit() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let mut editor = new_editor();
        let count = Rc::new(RefCell::new(0));
        let count2 = Rc::clone(&count);
        editor.set_change_listener(Box::new(move |_| {
            *count2.borrow_mut() += 1;
        }));
        editor.select_start();
        editor.insert_text("a");
        editor.insert_text("b");
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn listener_receives_the_normalized_value() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let mut editor = new_editor();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen2 = Rc::clone(&seen);
        editor.set_change_listener(Box::new(move |value| {
            *seen2.borrow_mut() = value.to_vec();
        }));
        editor.select_start();
        editor.insert_text("1. milk");
        let value = seen.borrow();
        let block = value[0].as_block().unwrap();
        assert_eq!(block.kind, BlockKind::OrderedList);
    }

    // ===================================================================
    // Introspection
    // ===================================================================

    #[test]
    fn block_kind_at_resolves_the_leaf_block() {
        let mut editor = new_editor();
        editor.select_start();
        editor.insert_text("hello");
        assert_eq!(editor.block_kind_at(2), Some(BlockKind::Paragraph));
        assert_eq!(editor.block_kind_at(5), Some(BlockKind::Paragraph));
        assert_eq!(editor.block_kind_at(99), None);
    }

    #[test]
    fn to_tree_marks_the_cursor() {
        let mut editor = new_editor();
        editor.select_start();
        editor.insert_text("ab");
        let tree = editor.to_tree();
        assert!(tree.contains("sel: (2,2)"), "got: {tree}");
        assert!(tree.contains("\"ab|\""), "got: {tree}");
        assert!(tree.contains("paragraph"), "got: {tree}");
    }

    #[test]
    fn commit_returns_replace_all_with_value() {
        let mut editor = new_editor();
        editor.select_start();
        let update = editor.insert_text("x");
        let TextUpdate::ReplaceAll(r) = update.text_update else {
            panic!("expected ReplaceAll");
        };
        assert_eq!(r.value.len(), 1);
        assert!(r.selection.is_some());
    }
}

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

//! Mention insertion and extraction.
//!
//! A mention is inserted as an atomic inline node: one flat unit, a
//! single empty text run child, boundary runs restored by
//! normalization. The document stores only `(kind, id)`; display names
//! are resolved by the rendering adapter.

use helpdesk_mentions::MentionKind;

use crate::dom::nodes::{BlockNode, DomNode};
use crate::editor::text_ops::{raw_delete_flat, raw_insert_inline};
use crate::{Editor, EditorUpdate};

impl Editor {
    /// Insert a mention at the cursor, replacing any expanded
    /// selection. The cursor lands directly after the mention.
    pub fn insert_mention(
        &mut self,
        kind: MentionKind,
        id: i64,
    ) -> EditorUpdate {
        let Some(sel) = self.selection.clone() else {
            return self.create_update_keep();
        };
        let Some((start, end)) = self.doc.flat_range(&sel) else {
            return self.create_update_keep();
        };
        if start != end {
            raw_delete_flat(&mut self.doc, start, end);
        }
        let node = DomNode::Block(BlockNode::mention(kind, id));
        if !raw_insert_inline(&mut self.doc, start, vec![node]) {
            return self.create_update_keep();
        }
        self.selection = self.doc.range_between(start + 1, start + 1);
        self.commit()
    }

    /// Insert a mention of the active suggestion's kind, replacing the
    /// trigger text, and clear the target.
    pub fn insert_mention_at_suggestion(&mut self, id: i64) -> EditorUpdate {
        let Some(suggestion) = self.suggestion.clone() else {
            return self.create_update_keep();
        };
        let Some((start, end)) = self.doc.flat_range(&suggestion.target)
        else {
            return self.create_update_keep();
        };
        if start != end {
            raw_delete_flat(&mut self.doc, start, end);
        }
        let node =
            DomNode::Block(BlockNode::mention(suggestion.kind, id));
        if !raw_insert_inline(&mut self.doc, start, vec![node]) {
            return self.create_update_keep();
        }
        self.selection = self.doc.range_between(start + 1, start + 1);
        self.suggestion = None;
        self.commit()
    }

    /// Every mention reference in the document, in document order —
    /// the persistence payload for linking notes to entities.
    pub fn mention_refs(&self) -> Vec<(MentionKind, i64)> {
        fn walk(children: &[DomNode], out: &mut Vec<(MentionKind, i64)>) {
            for child in children {
                if let DomNode::Block(block) = child {
                    if let crate::BlockKind::Mention { mention_type, id } =
                        &block.kind
                    {
                        out.push((*mention_type, *id));
                    } else {
                        walk(&block.children, out);
                    }
                }
            }
        }
        let mut out = Vec::new();
        walk(self.doc.blocks(), &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use helpdesk_mentions::{MentionDirectory, MentionKind, Mentionable};

    use crate::{DomNode, Editor};

    fn directory() -> MentionDirectory {
        MentionDirectory::new(
            vec![
                Mentionable::new(1, "Alice"),
                Mentionable::new(2, "Bob"),
                Mentionable::new(3, "Charlie"),
            ],
            vec![
                Mentionable::new(1, "Machine 1"),
                Mentionable::new(2, "Machine 2"),
            ],
        )
    }

    fn editor_with_text(text: &str) -> Editor {
        let mut e = Editor::new(directory());
        e.select_start();
        e.insert_text(text);
        e
    }

    // ===================================================================
    // insert_mention
    // ===================================================================

    #[test]
    fn insert_mention_at_the_cursor() {
        let mut editor = editor_with_text("hello ");
        editor.insert_mention(MentionKind::User, 1);
        assert_eq!(editor.mention_refs(), vec![(MentionKind::User, 1)]);
        assert_eq!(editor.text_len(), 7);
    }

    #[test]
    fn insert_mention_replaces_the_selection() {
        let mut editor = editor_with_text("replace_me");
        editor.select_all();
        editor.insert_mention(MentionKind::Machine, 2);
        assert_eq!(editor.plain_text(), "");
        assert_eq!(
            editor.mention_refs(),
            vec![(MentionKind::Machine, 2)]
        );
    }

    #[test]
    fn insert_mention_in_the_middle_keeps_both_sides() {
        let mut editor = editor_with_text("ab");
        editor.select(1, 1);
        editor.insert_mention(MentionKind::User, 3);
        assert_eq!(editor.plain_text(), "ab");
        assert_eq!(editor.text_len(), 3);
        let block = editor.value()[0].as_block().unwrap();
        assert!(block.children.iter().any(|c| c.is_block()));
    }

    #[test]
    fn cursor_lands_after_the_inserted_mention() {
        let mut editor = editor_with_text("x");
        editor.insert_mention(MentionKind::User, 1);
        let sel = editor.selection().unwrap().clone();
        assert!(sel.is_collapsed());
        assert_eq!(editor.document().location_of(&sel.anchor), Some(2));
    }

    #[test]
    fn insert_mention_without_a_selection_is_rejected() {
        let mut editor = Editor::new(directory());
        let update = editor.insert_mention(MentionKind::User, 1);
        assert!(update.is_keep());
        assert!(editor.mention_refs().is_empty());
    }

    #[test]
    fn inserted_mention_node_has_its_empty_run_child() {
        let mut editor = editor_with_text("x");
        editor.insert_mention(MentionKind::User, 2);
        let block = editor.value()[0].as_block().unwrap();
        let mention = block
            .children
            .iter()
            .find_map(|c| c.as_block())
            .unwrap();
        assert!(matches!(
            mention.children.as_slice(),
            [DomNode::Text(run)] if run.text.is_empty()
        ));
    }

    // ===================================================================
    // insert_mention_at_suggestion
    // ===================================================================

    #[test]
    fn suggestion_insertion_replaces_the_trigger_text() {
        let mut editor = editor_with_text("ping @ali now");
        editor.select(9, 9);
        assert!(editor.suggestion().is_some());
        editor.insert_mention_at_suggestion(1);
        assert_eq!(editor.plain_text(), "ping  now");
        assert_eq!(editor.mention_refs(), vec![(MentionKind::User, 1)]);
        assert!(editor.suggestion().is_none());
    }

    #[test]
    fn suggestion_insertion_without_a_target_is_rejected() {
        let mut editor = editor_with_text("no trigger here");
        let update = editor.insert_mention_at_suggestion(1);
        assert!(update.is_keep());
    }

    // ===================================================================
    // mention_refs
    // ===================================================================

    #[test]
    fn mention_refs_collects_in_document_order() {
        let mut editor = editor_with_text("a ");
        editor.insert_mention(MentionKind::User, 2);
        editor.insert_text(" b ");
        editor.insert_mention(MentionKind::Machine, 1);
        assert_eq!(
            editor.mention_refs(),
            vec![(MentionKind::User, 2), (MentionKind::Machine, 1)]
        );
    }

    #[test]
    fn mention_refs_sees_into_list_items() {
        let mut editor = editor_with_text("- item ");
        editor.insert_mention(MentionKind::Machine, 2);
        assert_eq!(
            editor.mention_refs(),
            vec![(MentionKind::Machine, 2)]
        );
    }
}

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

//! Inline formatting: bold, italic, underline.
//!
//! Toggling on an expanded selection is majority-off-wins: any
//! unmarked character in the selection means the whole selection gets
//! the mark; only a uniformly marked selection is cleared. On a
//! collapsed cursor the format becomes pending and applies to the next
//! insertion.

use std::mem;

use crate::dom::nodes::{DomNode, InlineFormat};
use crate::{Editor, EditorUpdate};

impl Editor {
    /// Toggle an inline format on the current selection. Rejected on
    /// entry when there is no selection.
    pub fn toggle_mark(&mut self, format: InlineFormat) -> EditorUpdate {
        let Some(sel) = self.selection.clone() else {
            return EditorUpdate::keep();
        };
        let Some((start, end)) = self.doc.flat_range(&sel) else {
            return EditorUpdate::keep();
        };

        if start == end {
            if !self.pending_formats.remove(&format) {
                self.pending_formats.insert(format);
            }
            return self.create_update_selection();
        }

        let uniformly_active = self.range_has_mark(start, end, format);
        self.apply_mark(start, end, format, !uniformly_active);
        self.commit()
    }

    /// Whether the format is active at the current selection: pending
    /// or present at a collapsed cursor, uniformly present across an
    /// expanded selection.
    pub fn is_mark_active(&self, format: InlineFormat) -> bool {
        let Some(sel) = &self.selection else {
            return false;
        };
        let Some((start, end)) = self.doc.flat_range(sel) else {
            return false;
        };
        if start == end {
            if self.pending_formats.contains(&format) {
                return true;
            }
            return self
                .doc
                .point_at(start)
                .and_then(|p| self.doc.node_at(&p.path)?.as_text().cloned())
                .map(|run| run.mark(format))
                .unwrap_or(false);
        }
        self.range_has_mark(start, end, format)
    }

    /// Whether every character covered by `[start, end)` carries the
    /// mark. A span with no characters (only mentions or boundaries)
    /// counts as marked, so toggling it is a no-op rather than an
    /// activation.
    fn range_has_mark(
        &self,
        start: usize,
        end: usize,
        format: InlineFormat,
    ) -> bool {
        for span in self.doc.leaf_spans() {
            if end <= span.start || span.start + span.len <= start {
                continue;
            }
            let Some(block) = self.doc.block_at_path(&span.path) else {
                continue;
            };
            let mut off = span.start;
            for child in &block.children {
                match child {
                    DomNode::Text(run) => {
                        let n = run.len();
                        let a = start.max(off);
                        let b = end.min(off + n);
                        if a < b && !run.mark(format) {
                            return false;
                        }
                        off += n;
                    }
                    DomNode::Block(_) => off += 1,
                }
            }
        }
        true
    }

    /// Set or clear the mark on every character covered by
    /// `[start, end)`, splitting runs at the edges. Normalization
    /// re-merges what ends up identical.
    fn apply_mark(
        &mut self,
        start: usize,
        end: usize,
        format: InlineFormat,
        on: bool,
    ) {
        let spans = self.doc.leaf_spans();
        for span in &spans {
            if end <= span.start || span.start + span.len <= start {
                continue;
            }
            let Some(block) = self.doc.block_at_path_mut(&span.path) else {
                continue;
            };
            let old = mem::take(&mut block.children);
            let mut new_children = Vec::with_capacity(old.len());
            let mut off = span.start;
            for child in old {
                match child {
                    DomNode::Text(run) => {
                        let n = run.len();
                        let a = start.max(off);
                        let b = end.min(off + n);
                        if a >= b || run.mark(format) == on {
                            new_children.push(DomNode::Text(run));
                        } else {
                            let ca = run.byte_index(a - off);
                            let cb = run.byte_index(b - off);
                            if ca > 0 {
                                new_children.push(DomNode::Text(
                                    run.with_text(&run.text[..ca]),
                                ));
                            }
                            let mut marked =
                                run.with_text(&run.text[ca..cb]);
                            marked.set_mark(format, on);
                            new_children.push(DomNode::Text(marked));
                            if cb < run.text.len() {
                                new_children.push(DomNode::Text(
                                    run.with_text(&run.text[cb..]),
                                ));
                            }
                        }
                        off += n;
                    }
                    DomNode::Block(b) => {
                        new_children.push(DomNode::Block(b));
                        off += 1;
                    }
                }
            }
            block.children = new_children;
        }
    }
}

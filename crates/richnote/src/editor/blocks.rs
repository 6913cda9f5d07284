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

//! Block-level commands: toggling paragraph/code/list structure.
//!
//! `toggle_block` always exits any list wrapping the selection first,
//! splitting the list at the selection boundary, then either reverts
//! the block to a paragraph (when the format was already active) or
//! applies the new kind — wrapping in a fresh list container for list
//! formats.

use crate::dom::location::Path;
use crate::dom::nodes::{BlockKind, BlockNode, DomNode};
use crate::{Editor, EditorUpdate};

impl Editor {
    /// Toggle a block format at the current selection.
    pub fn toggle_block(&mut self, format: BlockKind) -> EditorUpdate {
        let Some(sel) = self.selection.clone() else {
            return EditorUpdate::keep();
        };
        let Some((start, end)) = self.doc.flat_range(&sel) else {
            return EditorUpdate::keep();
        };

        let active = self.is_block_active(&format);

        self.raw_unwrap_matching(BlockKind::is_list, start, end);

        let target = if active {
            BlockKind::Paragraph
        } else if format.is_list() {
            BlockKind::ListItem
        } else {
            format.clone()
        };
        for path in self.covered_leaf_paths(start, end) {
            if let Some(block) = self.doc.block_at_path_mut(&path) {
                block.kind = target.clone();
            }
        }

        if !active && format.is_list() {
            self.raw_wrap_covered(format, start, end);
        }

        self.commit()
    }

    /// Whether any block touching the selection — a covered leaf or one
    /// of its ancestors — already has this kind.
    pub fn is_block_active(&self, format: &BlockKind) -> bool {
        let Some(sel) = &self.selection else {
            return false;
        };
        let Some((start, end)) = self.doc.flat_range(sel) else {
            return false;
        };
        for path in self.covered_leaf_paths(start, end) {
            let mut current = Some(path);
            while let Some(p) = current {
                if let Some(block) = self.doc.block_at_path(&p) {
                    if block.kind == *format {
                        return true;
                    }
                }
                current = p.parent().filter(|p| !p.is_root());
            }
        }
        false
    }

    /// Paths of the leaf blocks whose flat extent touches
    /// `[start, end]`.
    pub(crate) fn covered_leaf_paths(
        &self,
        start: usize,
        end: usize,
    ) -> Vec<Path> {
        self.doc
            .leaf_spans()
            .into_iter()
            .filter(|s| s.start <= end && start <= s.start + s.len)
            .map(|s| s.path)
            .collect()
    }

    /// Remove every ancestor block matching `predicate` that wraps the
    /// selection, splitting its siblings at the selection boundary so
    /// only the selected span is lifted out.
    pub(crate) fn raw_unwrap_matching(
        &mut self,
        predicate: fn(&BlockKind) -> bool,
        start: usize,
        end: usize,
    ) {
        loop {
            let spans = self.doc.leaf_spans();
            let Some(start_span) =
                spans.iter().find(|s| start <= s.start + s.len)
            else {
                return;
            };
            let end_span = spans
                .iter()
                .find(|s| end <= s.start + s.len)
                .unwrap_or(start_span);

            // Nearest matching ancestor of the start leaf.
            let mut wrapper: Option<Path> = None;
            let mut current = start_span.path.parent();
            while let Some(p) = current {
                if p.is_root() {
                    break;
                }
                if let Some(block) = self.doc.block_at_path(&p) {
                    if predicate(&block.kind) {
                        wrapper = Some(p.clone());
                        break;
                    }
                }
                current = p.parent();
            }
            let Some(wrapper) = wrapper else {
                return;
            };

            let first = start_span.path.indices()[wrapper.depth()];
            let last = if end_span.path.starts_with(&wrapper) {
                end_span.path.indices()[wrapper.depth()]
            } else {
                match self.doc.block_at_path(&wrapper) {
                    Some(b) => b.children.len().saturating_sub(1),
                    None => return,
                }
            };

            let Some(DomNode::Block(list)) = self.doc.remove_node(&wrapper)
            else {
                return;
            };
            let kind = list.kind;
            let mut children = list.children;
            let after = children.split_off((last + 1).min(children.len()));
            let selected = children.split_off(first.min(children.len()));
            let before = children;

            let mut replacement: Vec<DomNode> = Vec::new();
            if !before.is_empty() {
                replacement
                    .push(DomNode::Block(BlockNode::new(kind.clone(), before)));
            }
            replacement.extend(selected);
            if !after.is_empty() {
                replacement.push(DomNode::Block(BlockNode::new(kind, after)));
            }

            let (Some(parent), Some(index)) =
                (wrapper.parent(), wrapper.last())
            else {
                return;
            };
            let Some(siblings) = self.doc.child_list_mut(&parent) else {
                return;
            };
            for (k, node) in replacement.into_iter().enumerate() {
                siblings.insert(index + k, node);
            }
        }
    }

    /// Wrap the covered leaf blocks in one new ancestor of `kind`.
    pub(crate) fn raw_wrap_covered(
        &mut self,
        kind: BlockKind,
        start: usize,
        end: usize,
    ) {
        let covered = self.covered_leaf_paths(start, end);
        let (Some(first), Some(last)) = (covered.first(), covered.last())
        else {
            return;
        };
        let (Some(parent), Some(i)) = (first.parent(), first.last()) else {
            return;
        };
        // Only wrap a contiguous sibling span; bail out when the
        // selection straddles levels.
        let j = match (last.parent(), last.last()) {
            (Some(p), Some(j)) if p == parent => j,
            _ => i,
        };
        let Some(siblings) = self.doc.child_list_mut(&parent) else {
            return;
        };
        if j >= siblings.len() {
            return;
        }
        let taken: Vec<DomNode> = siblings.drain(i..=j).collect();
        siblings.insert(i, DomNode::Block(BlockNode::new(kind, taken)));
    }
}

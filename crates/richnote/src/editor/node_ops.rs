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

//! The path-level mutation API.
//!
//! Atomic structural operations over paths and points. Every operation
//! is a defensive no-op on a path or selection that no longer resolves
//! — the document stays in its last valid, normalized state — and
//! every applied operation commits (normalize, notify) exactly once.
//!
//! Paths are invalidated by any structural mutation; callers re-resolve
//! after each call.

use crate::dom::location::{Path, Point, Range};
use crate::dom::nodes::{BlockKind, DomNode};
use crate::editor::text_ops::{raw_delete_flat, raw_insert_inline};
use crate::{Editor, EditorUpdate};

impl Editor {
    /// Change a block's kind in place, preserving children. Silent
    /// no-op when `path` does not resolve to a block.
    pub fn set_node_type(
        &mut self,
        path: &Path,
        kind: BlockKind,
    ) -> EditorUpdate {
        let Some(block) = self.doc.block_at_path_mut(path) else {
            return self.create_update_keep();
        };
        block.kind = kind;
        self.commit()
    }

    /// Wrap the node(s) touching the current selection in a new
    /// ancestor block of `kind`.
    pub fn wrap_nodes(&mut self, kind: BlockKind) -> EditorUpdate {
        let Some(sel) = self.selection.clone() else {
            return self.create_update_keep();
        };
        let Some((start, end)) = self.doc.flat_range(&sel) else {
            return self.create_update_keep();
        };
        self.raw_wrap_covered(kind, start, end);
        self.commit()
    }

    /// Remove the nearest ancestor block matching `predicate` around
    /// the selection, splitting its sibling content at the selection
    /// boundaries so only the selected span is lifted out.
    pub fn unwrap_nodes(
        &mut self,
        predicate: fn(&BlockKind) -> bool,
    ) -> EditorUpdate {
        let Some(sel) = self.selection.clone() else {
            return self.create_update_keep();
        };
        let Some((start, end)) = self.doc.flat_range(&sel) else {
            return self.create_update_keep();
        };
        self.raw_unwrap_matching(predicate, start, end);
        self.commit()
    }

    /// Merge the block at `path` into its immediately preceding sibling
    /// of matching kind, concatenating children.
    pub fn merge_nodes(&mut self, path: &Path) -> EditorUpdate {
        let Some(block) = self.doc.block_at_path(path) else {
            return self.create_update_keep();
        };
        let kind = block.kind.clone();
        let prev = path
            .last()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| path.sibling(i));
        let matches = prev
            .as_ref()
            .and_then(|p| self.doc.block_at_path(p))
            .map(|b| b.kind == kind)
            .unwrap_or(false);
        if !matches {
            return self.create_update_keep();
        }
        if !crate::editor::normalize::merge_into_previous(&mut self.doc, path)
        {
            return self.create_update_keep();
        }
        self.commit()
    }

    /// Insert nodes at the current selection or an explicit point.
    /// Inline nodes split the host run; block nodes split the enclosing
    /// leaf block and land between the halves.
    pub fn insert_nodes(
        &mut self,
        nodes: Vec<DomNode>,
        at: Option<Point>,
    ) -> EditorUpdate {
        if nodes.is_empty() {
            return self.create_update_keep();
        }
        let flat = match at {
            Some(point) => self.doc.location_of(&point),
            None => {
                let sel = self.selection.clone();
                match sel.and_then(|s| self.doc.flat_range(&s)) {
                    Some((start, end)) => {
                        if start != end {
                            raw_delete_flat(&mut self.doc, start, end);
                            self.selection =
                                self.doc.range_between(start, start);
                        }
                        Some(start)
                    }
                    None => None,
                }
            }
        };
        let Some(flat) = flat else {
            return self.create_update_keep();
        };

        if nodes.iter().all(|n| n.is_inline()) {
            let units: usize = nodes
                .iter()
                .map(|n| match n {
                    DomNode::Text(run) => run.len(),
                    DomNode::Block(_) => 1,
                })
                .sum();
            if !raw_insert_inline(&mut self.doc, flat, nodes) {
                return self.create_update_keep();
            }
            let cursor = flat + units;
            self.selection = self.doc.range_between(cursor, cursor);
            return self.commit();
        }

        // Block-level insertion: place the nodes as siblings after the
        // enclosing leaf block.
        let Some(span) = self.doc.leaf_span_at(flat) else {
            return self.create_update_keep();
        };
        let (Some(parent), Some(index)) = (span.path.parent(), span.path.last())
        else {
            return self.create_update_keep();
        };
        let Some(siblings) = self.doc.child_list_mut(&parent) else {
            return self.create_update_keep();
        };
        for (k, node) in nodes.into_iter().enumerate() {
            siblings.insert(index + 1 + k, node);
        }
        self.commit()
    }

    /// Remove the leaf blocks covered by a range; a collapsed range
    /// removes its enclosing block.
    pub fn remove_nodes(&mut self, at: &Range) -> EditorUpdate {
        let Some((start, end)) = self.doc.flat_range(at) else {
            return self.create_update_keep();
        };
        let covered = self.covered_leaf_paths(start, end);
        if covered.is_empty() {
            return self.create_update_keep();
        }
        for path in covered.iter().rev() {
            self.doc.remove_node(path);
        }
        self.selection = self.doc.range_between(start, start);
        self.commit()
    }
}

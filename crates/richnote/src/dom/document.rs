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

//! Document storage: the top-level block sequence, raw tree access by
//! path, and the flat offset projection.
//!
//! The flat projection maps the tree onto a single run of offsets: each
//! text run contributes its character count, a mention contributes
//! exactly 1 unit, and consecutive leaf blocks are separated by 1 unit.
//! It is the device that carries the selection across structural edits
//! (paths shift, flat offsets mostly don't) and that lets deletion
//! treat characters, mentions and block boundaries uniformly.

use crate::dom::location::{Path, Point, Range};
use crate::dom::nodes::{BlockKind, BlockNode, DomNode, TextRun};

/// The document: an ordered sequence of top-level block nodes. Never
/// structurally empty — a fully cleared document collapses to one empty
/// paragraph.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub(crate) children: Vec<DomNode>,
}

/// The flat extent of one leaf block: `[start, start + len]` are valid
/// cursor offsets inside it.
#[derive(Clone, Debug)]
pub(crate) struct LeafSpan {
    pub path: Path,
    pub start: usize,
    pub len: usize,
}

impl Document {
    /// The canonical empty document: one paragraph holding one empty
    /// text run.
    pub fn new() -> Self {
        Self {
            children: vec![DomNode::Block(BlockNode::empty_paragraph())],
        }
    }

    /// Build a document from an externally supplied value. An empty
    /// value yields the canonical empty document; the caller is
    /// expected to normalize afterwards.
    pub fn from_value(value: Vec<DomNode>) -> Self {
        if value.is_empty() {
            Self::new()
        } else {
            Self { children: value }
        }
    }

    /// The top-level block sequence — the persisted note value.
    pub fn blocks(&self) -> &[DomNode] {
        &self.children
    }

    /// Whether this is exactly the canonical empty document.
    pub fn is_canonical_empty(&self) -> bool {
        match self.children.as_slice() {
            [DomNode::Block(b)] => {
                b.kind == BlockKind::Paragraph && b.is_empty()
            }
            _ => false,
        }
    }

    // ─── Raw tree access ────────────────────────────────────────────────

    /// The child list of the container at `path` (the root for the
    /// empty path, a block node otherwise).
    pub(crate) fn child_list(&self, container: &Path) -> Option<&Vec<DomNode>> {
        if container.is_root() {
            return Some(&self.children);
        }
        self.node_at(container)?.as_block().map(|b| &b.children)
    }

    pub(crate) fn child_list_mut(
        &mut self,
        container: &Path,
    ) -> Option<&mut Vec<DomNode>> {
        if container.is_root() {
            return Some(&mut self.children);
        }
        self.node_at_mut(container)?
            .as_block_mut()
            .map(|b| &mut b.children)
    }

    pub fn node_at(&self, path: &Path) -> Option<&DomNode> {
        let indices = path.indices();
        if indices.is_empty() {
            return None;
        }
        let mut children = &self.children;
        for &index in &indices[..indices.len() - 1] {
            children = match children.get(index)? {
                DomNode::Block(b) => &b.children,
                DomNode::Text(_) => return None,
            };
        }
        children.get(indices[indices.len() - 1])
    }

    pub(crate) fn node_at_mut(&mut self, path: &Path) -> Option<&mut DomNode> {
        let indices = path.indices();
        if indices.is_empty() {
            return None;
        }
        let mut children = &mut self.children;
        for &index in &indices[..indices.len() - 1] {
            children = match children.get_mut(index)? {
                DomNode::Block(b) => &mut b.children,
                DomNode::Text(_) => return None,
            };
        }
        children.get_mut(indices[indices.len() - 1])
    }

    pub fn block_at_path(&self, path: &Path) -> Option<&BlockNode> {
        self.node_at(path)?.as_block()
    }

    pub(crate) fn block_at_path_mut(
        &mut self,
        path: &Path,
    ) -> Option<&mut BlockNode> {
        self.node_at_mut(path)?.as_block_mut()
    }

    /// Insert `node` so that it ends up at `path`. Fails (returns
    /// false) when the parent does not resolve or the index is out of
    /// bounds.
    pub(crate) fn insert_node(&mut self, path: &Path, node: DomNode) -> bool {
        let Some(parent) = path.parent() else {
            return false;
        };
        let Some(index) = path.last() else {
            return false;
        };
        match self.child_list_mut(&parent) {
            Some(list) if index <= list.len() => {
                list.insert(index, node);
                true
            }
            _ => false,
        }
    }

    /// Remove and return the node at `path`.
    pub(crate) fn remove_node(&mut self, path: &Path) -> Option<DomNode> {
        let parent = path.parent()?;
        let index = path.last()?;
        let list = self.child_list_mut(&parent)?;
        if index < list.len() {
            Some(list.remove(index))
        } else {
            None
        }
    }

    // ─── Flat offset projection ─────────────────────────────────────────

    /// A leaf block holds inline content directly: runs and mentions,
    /// no structural children. Lists and mentions are never leaves.
    pub(crate) fn is_leaf_block(block: &BlockNode) -> bool {
        !block.kind.is_list()
            && !block.kind.is_mention()
            && block.children.iter().all(|c| c.is_inline())
    }

    /// Flat content length of a leaf block: run characters plus one
    /// unit per mention.
    pub(crate) fn leaf_len(block: &BlockNode) -> usize {
        block
            .children
            .iter()
            .map(|c| match c {
                DomNode::Text(run) => run.len(),
                DomNode::Block(_) => 1,
            })
            .sum()
    }

    /// All leaf blocks in document order with their flat extents.
    pub(crate) fn leaf_spans(&self) -> Vec<LeafSpan> {
        fn walk(
            children: &[DomNode],
            path: &Path,
            cursor: &mut usize,
            out: &mut Vec<LeafSpan>,
        ) {
            for (i, child) in children.iter().enumerate() {
                let DomNode::Block(block) = child else {
                    continue;
                };
                let child_path = path.child(i);
                if Document::is_leaf_block(block) {
                    if !out.is_empty() {
                        *cursor += 1; // inter-block separator unit
                    }
                    let len = Document::leaf_len(block);
                    out.push(LeafSpan {
                        path: child_path,
                        start: *cursor,
                        len,
                    });
                    *cursor += len;
                } else if !block.kind.is_mention() {
                    walk(&block.children, &child_path, cursor, out);
                }
            }
        }

        let mut out = Vec::new();
        let mut cursor = 0;
        walk(&self.children, &Path::root(), &mut cursor, &mut out);
        out
    }

    /// Total flat length of the document.
    pub fn text_len(&self) -> usize {
        self.leaf_spans()
            .last()
            .map(|s| s.start + s.len)
            .unwrap_or(0)
    }

    /// The flat offset of a point, or `None` if the point's path no
    /// longer resolves to inline content.
    pub fn location_of(&self, point: &Point) -> Option<usize> {
        let parent = point.path.parent()?;
        let index = point.path.last()?;
        let spans = self.leaf_spans();
        let span = spans.iter().find(|s| s.path == parent)?;
        let block = self.block_at_path(&span.path)?;
        let mut off = span.start;
        for (i, child) in block.children.iter().enumerate() {
            if i == index {
                return match child {
                    DomNode::Text(run) => {
                        Some(off + point.offset.min(run.len()))
                    }
                    // A point addressing a mention maps to its leading
                    // boundary.
                    DomNode::Block(_) => Some(off),
                };
            }
            off += match child {
                DomNode::Text(run) => run.len(),
                DomNode::Block(_) => 1,
            };
        }
        None
    }

    /// The point at a flat offset (clamped to the document end), or
    /// `None` when no text run can host it.
    pub fn point_at(&self, offset: usize) -> Option<Point> {
        let spans = self.leaf_spans();
        let total = spans.last().map(|s| s.start + s.len).unwrap_or(0);
        let offset = offset.min(total);
        let span = spans.iter().find(|s| offset <= s.start + s.len)?;
        let block = self.block_at_path(&span.path)?;
        let mut off = span.start;
        let mut last_run: Option<(usize, usize)> = None;
        for (i, child) in block.children.iter().enumerate() {
            match child {
                DomNode::Text(run) => {
                    let n = run.len();
                    if offset <= off + n {
                        return Some(Point::new(
                            span.path.child(i),
                            offset - off,
                        ));
                    }
                    off += n;
                    last_run = Some((i, n));
                }
                DomNode::Block(_) => off += 1,
            }
        }
        // Trailing mention without a boundary run yet (transient,
        // pre-normalization): settle for the nearest run end.
        last_run.map(|(i, n)| Point::new(span.path.child(i), n))
    }

    /// Both edges of a range as ordered flat offsets.
    pub(crate) fn flat_range(&self, range: &Range) -> Option<(usize, usize)> {
        let a = self.location_of(&range.anchor)?;
        let b = self.location_of(&range.focus)?;
        Some((a.min(b), a.max(b)))
    }

    /// A forward range between two flat offsets.
    pub(crate) fn range_between(
        &self,
        start: usize,
        end: usize,
    ) -> Option<Range> {
        Some(Range::new(self.point_at(start)?, self.point_at(end)?))
    }

    /// The leaf span containing a flat offset.
    pub(crate) fn leaf_span_at(&self, offset: usize) -> Option<LeafSpan> {
        self.leaf_spans()
            .into_iter()
            .find(|s| offset <= s.start + s.len)
    }

    /// The run text of all leaf blocks, one line per leaf. Mentions
    /// contribute nothing.
    pub fn plain_text(&self) -> String {
        let spans = self.leaf_spans();
        let mut out = String::new();
        for (i, span) in spans.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            if let Some(block) = self.block_at_path(&span.path) {
                out.push_str(&block.text());
            }
        }
        out
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

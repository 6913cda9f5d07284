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

//! The keyboard input state machine.
//!
//! Translates one raw key event into at most one mutation and decides
//! whether the event is intercepted (`Some(update)` — the host must
//! suppress native handling) or left to native text editing (`None`).
//!
//! Dispatch priority: command hotkeys, then suggestion-list keys while
//! a mention target is active, then the structural Enter / Backspace /
//! Delete branches. Enter with an active target inserts the highlighted
//! mention exactly like Tab does — the two keys share that branch.

use crate::dom::location::Path;
use crate::dom::nodes::{BlockKind, InlineFormat};
use crate::editor::normalize;
use crate::{Editor, EditorUpdate};

/// A key as delivered by the host surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    ArrowUp,
    ArrowDown,
}

/// A key event: the key plus whether the command modifier was held.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub command: bool,
}

impl KeyEvent {
    pub fn key(key: Key) -> Self {
        Self {
            key,
            command: false,
        }
    }

    pub fn command(key: Key) -> Self {
        Self { key, command: true }
    }
}

impl Editor {
    /// Process one key event. Returns `Some(update)` when the event was
    /// intercepted and `None` when native handling should proceed
    /// (typically followed by `insert_text` / `insert_break` /
    /// `delete_backward` from the host). Events without a selection are
    /// ignored.
    pub fn key_down(&mut self, event: KeyEvent) -> Option<EditorUpdate> {
        let sel = self.selection.clone()?;

        if event.command {
            return match event.key {
                Key::Char('b') => {
                    Some(self.toggle_mark(InlineFormat::Bold))
                }
                Key::Char('i') => {
                    Some(self.toggle_mark(InlineFormat::Italic))
                }
                Key::Char('u') => {
                    Some(self.toggle_mark(InlineFormat::Underline))
                }
                Key::Char('/') => Some(self.toggle_block(BlockKind::Code)),
                _ => None,
            };
        }

        if self.suggestion.is_some() {
            let candidates = self.suggestion_candidates().len();
            match event.key {
                Key::Tab | Key::Enter if candidates > 0 => {
                    let index = self
                        .suggestion
                        .as_ref()
                        .map(|s| s.index)
                        .unwrap_or(0)
                        .min(candidates - 1);
                    let suggestion = self.suggestion.clone()?;
                    let id = self
                        .directory
                        .filter(suggestion.kind, &suggestion.search)
                        .get(index)
                        .map(|e| e.id)?;
                    return Some(self.insert_mention_at_suggestion(id));
                }
                Key::ArrowDown if candidates > 0 => {
                    if let Some(s) = self.suggestion.as_mut() {
                        s.index = (s.index + 1) % candidates;
                    }
                    return Some(self.create_update_keep());
                }
                Key::ArrowUp if candidates > 0 => {
                    if let Some(s) = self.suggestion.as_mut() {
                        s.index = (s.index + candidates - 1) % candidates;
                    }
                    return Some(self.create_update_keep());
                }
                Key::Escape => {
                    self.suggestion = None;
                    return Some(self.create_update_keep());
                }
                _ => {}
            }
        }

        let (start, end) = self.doc.flat_range(&sel)?;

        match event.key {
            Key::Enter => {
                if let Some((_, kind, empty)) = self.enclosing_leaf(start) {
                    if matches!(
                        kind,
                        BlockKind::ListItem | BlockKind::Code
                    ) && empty
                    {
                        return Some(
                            self.toggle_block(BlockKind::Paragraph),
                        );
                    }
                }
                None
            }
            Key::Backspace if start == end => {
                if self.doc.is_canonical_empty() {
                    return None;
                }
                let (path, kind, empty) = self.enclosing_leaf(start)?;
                let at_block_start = self
                    .doc
                    .leaf_span_at(start)
                    .map(|s| s.start == start)
                    .unwrap_or(false);
                if matches!(kind, BlockKind::ListItem | BlockKind::Code)
                    && at_block_start
                {
                    return Some(self.toggle_block(BlockKind::Paragraph));
                }
                if empty {
                    return Some(self.remove_empty_block_backward(path, start));
                }
                None
            }
            Key::Delete => {
                if self.doc.blocks().len() > 1 {
                    let (path, _, empty) = self.enclosing_leaf(start)?;
                    if empty {
                        return Some(
                            self.remove_empty_block_forward(path, start),
                        );
                    }
                }
                None
            }
            _ => None,
        }
    }

    /// The leaf block enclosing a flat offset: its path, kind and
    /// whether it is empty.
    fn enclosing_leaf(
        &self,
        offset: usize,
    ) -> Option<(Path, BlockKind, bool)> {
        let span = self.doc.leaf_span_at(offset)?;
        let block = self.doc.block_at_path(&span.path)?;
        Some((span.path, block.kind.clone(), block.is_empty()))
    }

    /// Backspace inside an empty block: remove the block, move the
    /// cursor to the end of the preceding one, and re-close the gap if
    /// the removal left two same-kind siblings adjacent.
    fn remove_empty_block_backward(
        &mut self,
        path: Path,
        start: usize,
    ) -> EditorUpdate {
        let index = path.last().unwrap_or(0);
        self.doc.remove_node(&path);

        let cursor = if index > 0 { start.saturating_sub(1) } else { start };
        self.selection = self.doc.range_between(cursor, cursor);

        if index > 0 {
            if let Some(parent) = path.parent() {
                let prev = parent.child(index - 1);
                let next = parent.child(index);
                let same_kind = match (
                    self.doc.block_at_path(&prev),
                    self.doc.block_at_path(&next),
                ) {
                    (Some(a), Some(b)) => a.kind == b.kind,
                    _ => false,
                };
                if same_kind {
                    normalize::merge_into_previous(&mut self.doc, &next);
                }
            }
        }
        self.commit()
    }

    /// Delete inside an empty block when others remain: just drop it.
    fn remove_empty_block_forward(
        &mut self,
        path: Path,
        start: usize,
    ) -> EditorUpdate {
        self.doc.remove_node(&path);
        self.selection = self.doc.range_between(start, start);
        self.commit()
    }
}

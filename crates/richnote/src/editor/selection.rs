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

//! Selection management.
//!
//! Changing the selection clears pending formats and re-runs the
//! mention trigger recognizer — the suggestion window depends on live
//! cursor state, not just on document changes.

use crate::dom::location::Range;
use crate::{Editor, EditorUpdate};

impl Editor {
    /// Set the selection by flat offsets. Offsets are clamped to the
    /// document end.
    pub fn select(&mut self, anchor: usize, focus: usize) -> EditorUpdate {
        let range = {
            let doc = &self.doc;
            doc.point_at(anchor).and_then(|a| {
                doc.point_at(focus).map(|f| Range::new(a, f))
            })
        };
        let Some(range) = range else {
            return self.create_update_keep();
        };
        self.apply_selection(Some(range))
    }

    /// Set the selection by path-addressed range. Defensive no-op when
    /// either point no longer resolves.
    pub fn select_range(&mut self, range: Range) -> EditorUpdate {
        if self.doc.location_of(&range.anchor).is_none()
            || self.doc.location_of(&range.focus).is_none()
        {
            return self.create_update_keep();
        }
        self.apply_selection(Some(range))
    }

    /// Collapse the cursor at the document start.
    pub fn select_start(&mut self) -> EditorUpdate {
        self.select(0, 0)
    }

    /// Collapse the cursor at the document end.
    pub fn select_end(&mut self) -> EditorUpdate {
        let end = self.doc.text_len();
        self.select(end, end)
    }

    /// Select the whole document.
    pub fn select_all(&mut self) -> EditorUpdate {
        self.select(0, self.doc.text_len())
    }

    /// Drop the selection (the canvas lost focus).
    pub fn clear_selection(&mut self) -> EditorUpdate {
        self.apply_selection(None)
    }

    pub fn selection(&self) -> Option<&Range> {
        self.selection.as_ref()
    }

    fn apply_selection(&mut self, selection: Option<Range>) -> EditorUpdate {
        self.selection = selection;
        self.pending_formats.clear();
        self.refresh_suggestion();
        self.create_update_selection()
    }
}

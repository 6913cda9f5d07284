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

//! The mention autocomplete controller.
//!
//! After every committed change (and every selection move) the
//! recognizer looks at the word directly before a collapsed cursor. A
//! `@word` / `#word` shape with a whitespace-or-end boundary after the
//! cursor activates a target: the matched range, the search string
//! without its trigger, the entity kind, and a highlighted index reset
//! to 0. Anything else clears the target.
//!
//! The highlighted index always indexes the *currently filtered*
//! candidate set, re-derived from the live search string — it is not an
//! entity id, so the apparent selection can change identity as
//! filtering narrows.

use helpdesk_mentions::{MentionKind, Mentionable};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::dom::location::Range;
use crate::dom::nodes::DomNode;
use crate::{Editor, SuggestionAction};

static TRIGGER_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([@#])(\w+)$").expect("valid pattern"));

/// Placeholder for a mention when flattening a leaf block to text:
/// keeps offsets aligned and breaks word scanning.
const OBJECT_REPLACEMENT: char = '\u{FFFC}';

/// An active mention autocomplete target.
#[derive(Clone, Debug, PartialEq)]
pub struct MentionSuggestion {
    /// The range covering the trigger and the partial word, replaced on
    /// insertion.
    pub target: Range,
    pub kind: MentionKind,
    /// The typed word without its trigger symbol.
    pub search: String,
    /// Index into the currently filtered candidate set.
    pub index: usize,
}

impl Editor {
    /// The active suggestion target, if any.
    pub fn suggestion(&self) -> Option<&MentionSuggestion> {
        self.suggestion.as_ref()
    }

    /// The entities of the active kind whose names match the live
    /// search string. Empty when no target is active.
    pub fn suggestion_candidates(&self) -> Vec<&Mentionable> {
        match &self.suggestion {
            Some(s) => self.directory.filter(s.kind, &s.search),
            None => Vec::new(),
        }
    }

    /// The suggestion half of an update: only a target with a non-empty
    /// candidate set is worth showing.
    pub(crate) fn suggestion_action(&self) -> SuggestionAction {
        match &self.suggestion {
            Some(s) if !self.suggestion_candidates().is_empty() => {
                SuggestionAction::Suggest(s.clone())
            }
            _ => SuggestionAction::None,
        }
    }

    /// Re-evaluate the trigger window from the current document and
    /// selection.
    pub(crate) fn refresh_suggestion(&mut self) {
        self.suggestion = self.compute_suggestion();
    }

    fn compute_suggestion(&self) -> Option<MentionSuggestion> {
        let sel = self.selection.as_ref()?;
        if !sel.is_collapsed() {
            return None;
        }
        let flat = self.doc.location_of(&sel.anchor)?;
        let span = self.doc.leaf_span_at(flat)?;
        let block = self.doc.block_at_path(&span.path)?;

        let mut leaf_text = String::new();
        for child in &block.children {
            match child {
                DomNode::Text(run) => leaf_text.push_str(&run.text),
                DomNode::Block(_) => leaf_text.push(OBJECT_REPLACEMENT),
            }
        }
        let cursor = flat - span.start;

        // Boundary after the cursor: end of block, whitespace, or an
        // atomic mention. A word character means the match would be
        // embedded.
        let after_ok = match leaf_text.chars().nth(cursor) {
            None => true,
            Some(OBJECT_REPLACEMENT) => true,
            Some(c) => c.is_whitespace(),
        };
        if !after_ok {
            return None;
        }

        let before: String = leaf_text.chars().take(cursor).collect();
        let caps = TRIGGER_WORD.captures(&before)?;
        let trigger = caps.get(1)?.as_str().chars().next()?;
        let word = caps.get(2)?.as_str();
        let kind = MentionKind::from_trigger(trigger)?;

        let match_chars = 1 + word.chars().count();
        let target =
            self.doc.range_between(flat - match_chars, flat)?;

        Some(MentionSuggestion {
            target,
            kind,
            search: word.to_string(),
            index: 0,
        })
    }
}

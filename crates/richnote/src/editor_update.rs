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

//! Update objects returned by every editor operation.
//!
//! The host surface re-renders from these instead of poking at editor
//! internals: a [`TextUpdate`] says what happened to the document and
//! selection, a [`SuggestionAction`] says whether a mention suggestion
//! surface should be shown.

use crate::dom::location::Range;
use crate::dom::nodes::DomNode;
use crate::editor::MentionSuggestion;

/// The outcome of one editor operation.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorUpdate {
    pub text_update: TextUpdate,
    pub suggestion: SuggestionAction,
}

/// What the host should do with its rendered content.
#[derive(Clone, Debug, PartialEq)]
pub enum TextUpdate {
    /// Nothing changed — the operation was rejected or had no effect.
    Keep,
    /// The document changed; re-render from `value`.
    ReplaceAll(ReplaceAll),
    /// Only the selection changed.
    Select(SelectionUpdate),
}

/// A committed, normalized document value plus the selection after the
/// operation.
#[derive(Clone, Debug, PartialEq)]
pub struct ReplaceAll {
    pub value: Vec<DomNode>,
    pub selection: Option<Range>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectionUpdate {
    pub selection: Option<Range>,
}

/// Whether a mention suggestion surface applies after the operation.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum SuggestionAction {
    /// No active target, or the filtered candidate set is empty.
    #[default]
    None,
    /// Show the suggestion list for this state.
    Suggest(MentionSuggestion),
}

impl EditorUpdate {
    pub fn keep() -> Self {
        Self {
            text_update: TextUpdate::Keep,
            suggestion: SuggestionAction::None,
        }
    }

    pub fn replace_all(
        value: Vec<DomNode>,
        selection: Option<Range>,
        suggestion: SuggestionAction,
    ) -> Self {
        Self {
            text_update: TextUpdate::ReplaceAll(ReplaceAll {
                value,
                selection,
            }),
            suggestion,
        }
    }

    pub fn select(
        selection: Option<Range>,
        suggestion: SuggestionAction,
    ) -> Self {
        Self {
            text_update: TextUpdate::Select(SelectionUpdate { selection }),
            suggestion,
        }
    }

    /// Whether this update left the document untouched.
    pub fn is_keep(&self) -> bool {
        matches!(self.text_update, TextUpdate::Keep)
    }
}

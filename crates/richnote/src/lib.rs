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

//! Model code to power the rich-text note editor of a helpdesk
//! application.
//!
//! The engine owns a structured document (paragraphs, code blocks,
//! lists, atomic user/machine mentions), a selection, and the
//! trigger-driven mention autocomplete state for one editing session.
//! A host surface feeds it key events and native text edits; every
//! mutation is normalized before it becomes observable and returns an
//! [`EditorUpdate`] the host re-renders from.
//!
//! ```
//! use helpdesk_mentions::{MentionDirectory, Mentionable};
//! use richnote::{Editor, Key, KeyEvent};
//!
//! let directory = MentionDirectory::new(
//!     vec![Mentionable::new(1, "Alice")],
//!     vec![Mentionable::new(1, "Machine 1")],
//! );
//! let mut editor = Editor::new(directory);
//! editor.select_start();
//! editor.insert_text("@ali");
//! assert!(editor.suggestion().is_some());
//! editor.key_down(KeyEvent::key(Key::Tab));
//! assert_eq!(editor.mention_refs().len(), 1);
//! ```

pub mod dom;
mod editor;
mod editor_update;
pub mod render;

pub use dom::document::Document;
pub use dom::location::{Path, Point, Range};
pub use dom::nodes::{BlockKind, BlockNode, DomNode, InlineFormat, TextRun};
pub use editor::{ChangeListener, Editor, Key, KeyEvent, MentionSuggestion};
pub use editor_update::{
    EditorUpdate, ReplaceAll, SelectionUpdate, SuggestionAction, TextUpdate,
};

pub use helpdesk_mentions::{MentionDirectory, MentionKind, Mentionable};

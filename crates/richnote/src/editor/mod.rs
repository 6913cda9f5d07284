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

//! The editing engine.
//!
//! [`Editor`] owns the document, the selection, the pending inline
//! formats and the mention autocomplete state for one editing session.
//! Every mutation goes through the command API here, runs the
//! normalization engine before it becomes observable, and returns an
//! [`EditorUpdate`](crate::EditorUpdate) for the host surface.

mod base;
mod blocks;
mod formatting;
mod keyboard;
mod mentions;
mod node_ops;
pub(crate) mod normalize;
mod selection;
mod suggestion;
mod text_ops;

pub use base::{ChangeListener, Editor};
pub use keyboard::{Key, KeyEvent};
pub use suggestion::MentionSuggestion;

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

//! Node types of the document tree.
//!
//! A document is an ordered sequence of block nodes. Block nodes carry a
//! [`BlockKind`] and an ordered child list of further blocks or
//! [`TextRun`] leaves. Mentions are block nodes too, but behave as
//! atomic inline units: one flat offset unit, a single always-empty text
//! run child, never entered by the cursor.
//!
//! The serde shape of the tree is the persisted note value:
//!
//! ```json
//! [
//!   {"type": "paragraph", "children": [
//!     {"text": "ping "},
//!     {"type": "mention", "mentionType": "user", "id": 3,
//!      "children": [{"text": ""}]},
//!     {"text": " about this", "bold": true}
//!   ]}
//! ]
//! ```
//!
//! Marks serialize as optional booleans; the transient `placeholder`
//! decoration flag is never persisted.

use helpdesk_mentions::MentionKind;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// A boolean text mark.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum InlineFormat {
    Bold,
    Italic,
    Underline,
}

/// A leaf of literal characters carrying formatting marks.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,
    /// Transient decoration flag for the empty-block hint overlay.
    /// Never persisted.
    #[serde(skip)]
    pub placeholder: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl TextRun {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Length in characters (Unicode scalar values).
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn mark(&self, format: InlineFormat) -> bool {
        match format {
            InlineFormat::Bold => self.bold,
            InlineFormat::Italic => self.italic,
            InlineFormat::Underline => self.underline,
        }
    }

    pub fn set_mark(&mut self, format: InlineFormat, on: bool) {
        match format {
            InlineFormat::Bold => self.bold = on,
            InlineFormat::Italic => self.italic = on,
            InlineFormat::Underline => self.underline = on,
        }
    }

    /// Whether two runs carry the same marks, ignoring text and the
    /// transient placeholder flag.
    pub fn same_marks(&self, other: &TextRun) -> bool {
        self.bold == other.bold
            && self.italic == other.italic
            && self.underline == other.underline
    }

    /// A copy of this run with different text and the same marks.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: self.bold,
            italic: self.italic,
            underline: self.underline,
            placeholder: false,
        }
    }

    /// Byte index of the `char_idx`-th character.
    pub(crate) fn byte_index(&self, char_idx: usize) -> usize {
        byte_index(&self.text, char_idx)
    }
}

pub(crate) fn byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// The semantic kind of a block node. Closed set: adding a kind is a
/// compile-time exhaustiveness failure in the mutation API, the
/// normalization engine and the render mapping.
#[derive(Clone, Debug, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum BlockKind {
    Paragraph,
    Code,
    OrderedList,
    UnorderedList,
    ListItem,
    Mention { mention_type: MentionKind, id: i64 },
}

impl BlockKind {
    /// Whether this is a list container (`ordered-list`/`unordered-list`).
    pub fn is_list(&self) -> bool {
        matches!(self, BlockKind::OrderedList | BlockKind::UnorderedList)
    }

    pub fn is_mention(&self) -> bool {
        matches!(self, BlockKind::Mention { .. })
    }
}

/// A block node: a kind plus an ordered child list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "BlockRepr", into = "BlockRepr")]
pub struct BlockNode {
    pub kind: BlockKind,
    pub children: Vec<DomNode>,
}

impl BlockNode {
    pub fn new(kind: BlockKind, children: Vec<DomNode>) -> Self {
        Self { kind, children }
    }

    /// A paragraph holding a single empty text run — the canonical
    /// empty block.
    pub fn empty_paragraph() -> Self {
        Self::new(
            BlockKind::Paragraph,
            vec![DomNode::Text(TextRun::default())],
        )
    }

    /// An atomic mention node with its single empty text run child.
    pub fn mention(mention_type: MentionKind, id: i64) -> Self {
        Self::new(
            BlockKind::Mention { mention_type, id },
            vec![DomNode::Text(TextRun::default())],
        )
    }

    /// The concatenated text of all descendant runs. Mentions
    /// contribute nothing.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Whether the block holds no text and no mentions.
    pub fn is_empty(&self) -> bool {
        self.text().is_empty() && !self.has_mentions()
    }

    pub fn has_mentions(&self) -> bool {
        self.children.iter().any(|c| match c {
            DomNode::Text(_) => false,
            DomNode::Block(b) => b.kind.is_mention() || b.has_mentions(),
        })
    }
}

fn collect_text(children: &[DomNode], out: &mut String) {
    for child in children {
        match child {
            DomNode::Text(run) => out.push_str(&run.text),
            DomNode::Block(b) if b.kind.is_mention() => {}
            DomNode::Block(b) => collect_text(&b.children, out),
        }
    }
}

/// A node of the document tree: a block or a text run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DomNode {
    Block(BlockNode),
    Text(TextRun),
}

impl DomNode {
    pub fn paragraph(children: Vec<DomNode>) -> Self {
        DomNode::Block(BlockNode::new(BlockKind::Paragraph, children))
    }

    pub fn text(text: impl Into<String>) -> Self {
        DomNode::Text(TextRun::new(text))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, DomNode::Text(_))
    }

    pub fn is_block(&self) -> bool {
        matches!(self, DomNode::Block(_))
    }

    /// Whether the node flows inline inside a leaf block: a text run or
    /// an atomic mention.
    pub fn is_inline(&self) -> bool {
        match self {
            DomNode::Text(_) => true,
            DomNode::Block(b) => b.kind.is_mention(),
        }
    }

    pub fn as_block(&self) -> Option<&BlockNode> {
        match self {
            DomNode::Block(b) => Some(b),
            DomNode::Text(_) => None,
        }
    }

    pub fn as_block_mut(&mut self) -> Option<&mut BlockNode> {
        match self {
            DomNode::Block(b) => Some(b),
            DomNode::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextRun> {
        match self {
            DomNode::Text(t) => Some(t),
            DomNode::Block(_) => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextRun> {
        match self {
            DomNode::Text(t) => Some(t),
            DomNode::Block(_) => None,
        }
    }
}

/// Persisted shape of a block node, tagged by `"type"`.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum BlockRepr {
    Paragraph {
        children: Vec<DomNode>,
    },
    Code {
        children: Vec<DomNode>,
    },
    OrderedList {
        children: Vec<DomNode>,
    },
    UnorderedList {
        children: Vec<DomNode>,
    },
    ListItem {
        children: Vec<DomNode>,
    },
    Mention {
        #[serde(rename = "mentionType")]
        mention_type: MentionKind,
        id: i64,
        children: Vec<DomNode>,
    },
}

impl From<BlockRepr> for BlockNode {
    fn from(repr: BlockRepr) -> Self {
        match repr {
            BlockRepr::Paragraph { children } => {
                BlockNode::new(BlockKind::Paragraph, children)
            }
            BlockRepr::Code { children } => {
                BlockNode::new(BlockKind::Code, children)
            }
            BlockRepr::OrderedList { children } => {
                BlockNode::new(BlockKind::OrderedList, children)
            }
            BlockRepr::UnorderedList { children } => {
                BlockNode::new(BlockKind::UnorderedList, children)
            }
            BlockRepr::ListItem { children } => {
                BlockNode::new(BlockKind::ListItem, children)
            }
            BlockRepr::Mention {
                mention_type,
                id,
                children,
            } => BlockNode::new(
                BlockKind::Mention { mention_type, id },
                children,
            ),
        }
    }
}

impl From<BlockNode> for BlockRepr {
    fn from(node: BlockNode) -> Self {
        let children = node.children;
        match node.kind {
            BlockKind::Paragraph => BlockRepr::Paragraph { children },
            BlockKind::Code => BlockRepr::Code { children },
            BlockKind::OrderedList => BlockRepr::OrderedList { children },
            BlockKind::UnorderedList => {
                BlockRepr::UnorderedList { children }
            }
            BlockKind::ListItem => BlockRepr::ListItem { children },
            BlockKind::Mention { mention_type, id } => BlockRepr::Mention {
                mention_type,
                id,
                children,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_kind_displays_kebab_case() {
        assert_eq!(BlockKind::Paragraph.to_string(), "paragraph");
        assert_eq!(BlockKind::OrderedList.to_string(), "ordered-list");
        assert_eq!(BlockKind::UnorderedList.to_string(), "unordered-list");
        assert_eq!(BlockKind::ListItem.to_string(), "list-item");
        assert_eq!(
            BlockKind::Mention {
                mention_type: MentionKind::User,
                id: 1
            }
            .to_string(),
            "mention"
        );
    }

    #[test]
    fn run_serializes_marks_as_optional_bools() {
        let run = TextRun {
            text: "hi".into(),
            bold: true,
            ..TextRun::default()
        };
        let json = serde_json::to_string(&run).unwrap();
        assert_eq!(json, r#"{"text":"hi","bold":true}"#);
    }

    #[test]
    fn placeholder_flag_is_never_serialized() {
        let run = TextRun {
            text: "hint".into(),
            placeholder: true,
            ..TextRun::default()
        };
        let json = serde_json::to_string(&run).unwrap();
        assert!(!json.contains("placeholder"), "got: {json}");
    }

    #[test]
    fn paragraph_round_trips_through_json() {
        let node = DomNode::paragraph(vec![DomNode::text("hello")]);
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(
            json,
            r#"{"type":"paragraph","children":[{"text":"hello"}]}"#
        );
        let back: DomNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn mention_round_trips_through_json() {
        let node =
            DomNode::Block(BlockNode::mention(MentionKind::Machine, 7));
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(
            json,
            r#"{"type":"mention","mentionType":"machine","id":7,"children":[{"text":""}]}"#
        );
        let back: DomNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn block_text_skips_mentions() {
        let block = BlockNode::new(
            BlockKind::Paragraph,
            vec![
                DomNode::text("a"),
                DomNode::Block(BlockNode::mention(MentionKind::User, 1)),
                DomNode::text("b"),
            ],
        );
        assert_eq!(block.text(), "ab");
        assert!(!block.is_empty());
        assert!(block.has_mentions());
    }

    #[test]
    fn empty_block_has_no_text_and_no_mentions() {
        let block = BlockNode::empty_paragraph();
        assert!(block.is_empty());
    }

    #[test]
    fn run_len_counts_chars_not_bytes() {
        let run = TextRun::new("héllo");
        assert_eq!(run.len(), 5);
        assert_eq!(run.byte_index(2), 3);
    }
}

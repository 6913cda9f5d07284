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

//! The rendering adapter: block kind → HTML, plus the empty-block
//! placeholder decoration.
//!
//! The document stores only `(kind, id)` for a mention; the adapter
//! resolves display names through the injected directory at render
//! time, falling back to "Unknown" for entities that left the feed.

use helpdesk_mentions::{MentionDirectory, MentionKind};

use crate::dom::location::{Path, Range};
use crate::dom::nodes::{BlockKind, BlockNode, DomNode, TextRun};
use crate::Editor;

/// A mark overlay produced by the decoration pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Decoration {
    pub range: Range,
    /// Render the empty-block hint ("type @ or # to tag…") over this
    /// range.
    pub placeholder: bool,
}

/// Render a document value to HTML.
pub fn to_html(value: &[DomNode], directory: &MentionDirectory) -> String {
    let mut out = String::new();
    for node in value {
        render_node(node, directory, &mut out);
    }
    out
}

/// The decoration function of the rendering contract: for the node at
/// `path`, the placeholder overlay applies when the selection is
/// collapsed inside that node and the node is an empty block.
pub fn decorations(editor: &Editor, path: &Path) -> Vec<Decoration> {
    let Some(sel) = editor.selection() else {
        return Vec::new();
    };
    if !sel.is_collapsed() {
        return Vec::new();
    }
    let Some(block) = editor.document().block_at_path(path) else {
        return Vec::new();
    };
    if !block.is_empty() || !sel.anchor.path.starts_with(path) {
        return Vec::new();
    }
    vec![Decoration {
        range: sel.clone(),
        placeholder: true,
    }]
}

fn render_node(node: &DomNode, directory: &MentionDirectory, out: &mut String) {
    match node {
        DomNode::Text(run) => render_run(run, out),
        DomNode::Block(block) => render_block(block, directory, out),
    }
}

fn render_block(
    block: &BlockNode,
    directory: &MentionDirectory,
    out: &mut String,
) {
    match &block.kind {
        BlockKind::Paragraph => {
            render_wrapped(block, directory, "p", out);
        }
        BlockKind::Code => {
            out.push_str("<pre><code>");
            render_children(block, directory, out);
            out.push_str("</code></pre>");
        }
        BlockKind::OrderedList => {
            render_wrapped(block, directory, "ol", out);
        }
        BlockKind::UnorderedList => {
            render_wrapped(block, directory, "ul", out);
        }
        BlockKind::ListItem => {
            render_wrapped(block, directory, "li", out);
        }
        BlockKind::Mention { mention_type, id } => {
            render_mention(*mention_type, *id, directory, out);
        }
    }
}

fn render_wrapped(
    block: &BlockNode,
    directory: &MentionDirectory,
    tag: &str,
    out: &mut String,
) {
    out.push('<');
    out.push_str(tag);
    out.push('>');
    render_children(block, directory, out);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn render_children(
    block: &BlockNode,
    directory: &MentionDirectory,
    out: &mut String,
) {
    for child in &block.children {
        render_node(child, directory, out);
    }
}

fn render_mention(
    kind: MentionKind,
    id: i64,
    directory: &MentionDirectory,
    out: &mut String,
) {
    let name = directory
        .find(kind, id)
        .map(|e| e.name.as_str())
        .unwrap_or("Unknown");
    let kind_attr = match kind {
        MentionKind::User => "user",
        MentionKind::Machine => "machine",
    };
    out.push_str(&format!(
        "<span class=\"mention\" data-mention-type=\"{kind_attr}\" \
         data-id=\"{id}\" contenteditable=\"false\">{}<strong>{}</strong></span>",
        kind.trigger(),
        html_escape::encode_text(name),
    ));
}

fn render_run(run: &TextRun, out: &mut String) {
    if run.text.is_empty() {
        return;
    }
    let mut tags: Vec<&str> = Vec::new();
    if run.bold {
        tags.push("strong");
    }
    if run.italic {
        tags.push("em");
    }
    if run.underline {
        tags.push("u");
    }
    for tag in &tags {
        out.push('<');
        out.push_str(tag);
        out.push('>');
    }
    out.push_str(&html_escape::encode_text(&run.text));
    for tag in tags.iter().rev() {
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
}

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

//! Mentionable entity primitives for the helpdesk rich-text editor.
//!
//! The editor can tag two kinds of entities inline: users (`@`) and
//! machines (`#`). The entity lists themselves come from the host
//! application; this crate only defines the records and the read-only
//! per-session directory the autocomplete controller filters against.

use serde::{Deserialize, Serialize};

/// The kind of entity a mention refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentionKind {
    User,
    Machine,
}

impl MentionKind {
    /// The character that triggers autocomplete for this kind.
    pub fn trigger(&self) -> char {
        match self {
            MentionKind::User => '@',
            MentionKind::Machine => '#',
        }
    }

    /// Map a trigger character back to its mention kind.
    pub fn from_trigger(ch: char) -> Option<MentionKind> {
        match ch {
            '@' => Some(MentionKind::User),
            '#' => Some(MentionKind::Machine),
            _ => None,
        }
    }
}

/// An entity that can be mentioned: a user or a machine record supplied
/// by the host application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mentionable {
    pub id: i64,
    pub name: String,
}

impl Mentionable {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// The read-only entity feed for one editing session.
///
/// Supplied once at editor construction; the editor never mutates it and
/// caches nothing beyond the session.
#[derive(Clone, Debug, Default)]
pub struct MentionDirectory {
    users: Vec<Mentionable>,
    machines: Vec<Mentionable>,
}

impl MentionDirectory {
    pub fn new(users: Vec<Mentionable>, machines: Vec<Mentionable>) -> Self {
        Self { users, machines }
    }

    /// All entities of the given kind, in feed order.
    pub fn entities(&self, kind: MentionKind) -> &[Mentionable] {
        match kind {
            MentionKind::User => &self.users,
            MentionKind::Machine => &self.machines,
        }
    }

    /// Entities of `kind` whose display name contains `search`,
    /// case-insensitively. An empty search matches everything.
    pub fn filter(&self, kind: MentionKind, search: &str) -> Vec<&Mentionable> {
        let needle = search.to_lowercase();
        self.entities(kind)
            .iter()
            .filter(|e| e.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Look an entity up by id.
    pub fn find(&self, kind: MentionKind, id: i64) -> Option<&Mentionable> {
        self.entities(kind).iter().find(|e| e.id == id)
    }
}

//! Game-object templates — the static catalog entry behind each transport.

use std::collections::HashMap;

use crate::{EntryId, PathId};

/// The template type, reduced to what the transport subsystem distinguishes.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TemplateKind {
    /// A massive moving transport: ship, zeppelin, tram.
    MoTransport {
        /// Index into the taxi-path node table.
        taxi_path: PathId,
        /// Cruising speed in world units per second.
        move_speed: f32,
    },
    /// Any other game-object type.  Skipped by the route registry.
    Other,
}

/// Static catalog data for one game-object entry.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameObjectTemplate {
    pub entry: EntryId,
    pub name: String,
    pub kind: TemplateKind,
    /// Object scale.
    pub size: f32,
    pub faction: u32,
    pub display_id: u32,
}

impl GameObjectTemplate {
    /// Convenience constructor for a transport template.
    pub fn transport(entry: EntryId, name: &str, taxi_path: PathId, move_speed: f32) -> Self {
        Self {
            entry,
            name: name.to_owned(),
            kind: TemplateKind::MoTransport { taxi_path, move_speed },
            size:       1.0,
            faction:    0,
            display_id: 0,
        }
    }
}

// ── TemplateCatalog ───────────────────────────────────────────────────────────

/// All game-object templates by entry.
///
/// Read-only after server startup, like the taxi-path table.
#[derive(Default)]
pub struct TemplateCatalog {
    by_entry: HashMap<EntryId, GameObjectTemplate>,
}

impl TemplateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a template, replacing any previous one for the same entry.
    pub fn insert(&mut self, template: GameObjectTemplate) {
        self.by_entry.insert(template.entry, template);
    }

    pub fn get(&self, entry: EntryId) -> Option<&GameObjectTemplate> {
        self.by_entry.get(&entry)
    }

    /// Iterate all templates in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &GameObjectTemplate> {
        self.by_entry.values()
    }

    pub fn len(&self) -> usize {
        self.by_entry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_entry.is_empty()
    }
}

//! `mot-core` — foundational types for the `rust_mot` transport subsystem.
//!
//! This crate is a dependency of every other `mot-*` crate.  It intentionally
//! has no `mot-*` dependencies and minimal external ones (only optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                                 |
//! |--------------|----------------------------------------------------------|
//! | [`ids`]      | `EntryId`, `MapId`, `PathId`, `EventId`, `ObjectId`      |
//! | [`pos`]      | `Vec3`, `Position`, orientation normalisation            |
//! | [`path`]     | `TaxiPathNode`, `NodeAction`, `TaxiPathTable`            |
//! | [`template`] | `GameObjectTemplate`, `TemplateKind`, `TemplateCatalog`  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                    |
//! |---------|-----------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.       |

pub mod ids;
pub mod path;
pub mod pos;
pub mod template;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use ids::{EntryId, EventId, MapId, ObjectId, PathId};
pub use path::{NodeAction, TaxiPathNode, TaxiPathTable};
pub use pos::{normalize_orientation, Position, Vec3};
pub use template::{GameObjectTemplate, TemplateCatalog, TemplateKind};

//! The static transport registry, populated once at server startup.

use std::collections::BTreeMap;

use tracing::{error, info, warn};

use mot_core::{EntryId, MapId, TaxiPathTable, TemplateCatalog, TemplateKind};
use mot_spline::Spline;

use crate::{compile_route, CompiledRoute, RouteError, RouteResult};

/// Compiled routes by game-object entry.
///
/// Built by [`RouteRegistry::load`]; read-only afterwards.  `BTreeMap` keeps
/// iteration (and therefore carrier spawn order) deterministic across runs.
#[derive(Default)]
pub struct RouteRegistry {
    routes: BTreeMap<EntryId, CompiledRoute>,
}

impl RouteRegistry {
    /// Compile a route for every transport template in `catalog`.
    ///
    /// A template that fails to compile is logged and skipped; startup
    /// continues with the remaining transports.
    pub fn load(catalog: &TemplateCatalog, paths: &TaxiPathTable) -> Self {
        let mut registry = Self::default();

        for template in catalog.iter() {
            if !matches!(template.kind, TemplateKind::MoTransport { .. }) {
                continue;
            }
            match compile_for_entry(catalog, paths, template.entry) {
                Ok(route) => {
                    registry.routes.insert(template.entry, route);
                }
                Err(e) => {
                    warn!(entry = template.entry.0, name = %template.name, error = %e,
                          "transport will not be loaded");
                }
            }
        }

        info!(count = registry.routes.len(), "loaded transport routes");
        registry
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    pub fn get_route(&self, entry: EntryId) -> Option<&CompiledRoute> {
        self.routes.get(&entry)
    }

    /// The compiled spline of `entry` on `map`, if that transport visits it.
    pub fn get_spline(&self, entry: EntryId, map: MapId) -> Option<&Spline> {
        self.routes.get(&entry).and_then(|r| r.spline_for(map))
    }

    /// Ordered maps visited by `entry`.
    pub fn get_map_ids(&self, entry: EntryId) -> Option<&[MapId]> {
        self.routes.get(&entry).map(|r| r.map_ids.as_slice())
    }

    /// Registered entries in ascending order.
    pub fn entries(&self) -> impl Iterator<Item = EntryId> + '_ {
        self.routes.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    // ── Legacy data check ─────────────────────────────────────────────────

    /// Flag raw gameobject spawn rows that reference transport entries.
    ///
    /// Transports are spawned by this subsystem, never by the generic spawn
    /// table; any such row is a data error that produces duplicate or
    /// misbehaving carriers.  Returns how many offending rows were seen.
    pub fn report_misplaced_spawns(&self, rows: &[(u32, EntryId)]) -> usize {
        let mut offending = 0;
        for &(spawn_guid, entry) in rows {
            if self.routes.contains_key(&entry) {
                error!(spawn_guid, entry = entry.0,
                       "transport entry has a gameobject spawn row; remove it");
                offending += 1;
            }
        }
        offending
    }
}

/// Compile the route for a single catalog entry, with full template
/// validation.
pub fn compile_for_entry(
    catalog: &TemplateCatalog,
    paths: &TaxiPathTable,
    entry: EntryId,
) -> RouteResult<CompiledRoute> {
    let template = catalog.get(entry).ok_or(RouteError::MissingTemplate(entry))?;

    let TemplateKind::MoTransport { taxi_path, move_speed } = template.kind else {
        return Err(RouteError::WrongTemplateType(entry));
    };

    let nodes = paths.get(taxi_path).ok_or(RouteError::BadPathId(taxi_path))?;
    compile_route(taxi_path, nodes, move_speed)
}

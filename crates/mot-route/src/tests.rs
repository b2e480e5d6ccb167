//! Unit tests for mot-route.

use mot_core::{EntryId, EventId, MapId, NodeAction, PathId, TaxiPathNode, TaxiPathTable, Vec3};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn node(map: u32, x: f32, y: f32) -> TaxiPathNode {
    TaxiPathNode::waypoint(MapId(map), Vec3::new(x, y, 0.0))
}

fn node_with_delay(map: u32, x: f32, y: f32, delay_secs: u32) -> TaxiPathNode {
    TaxiPathNode {
        delay_secs,
        action: NodeAction::Stop,
        ..TaxiPathNode::waypoint(MapId(map), Vec3::new(x, y, 0.0))
    }
}

/// Four nodes on map 1 forming a square-ish loop.
fn single_map_path() -> Vec<TaxiPathNode> {
    vec![
        node(1, 0.0, 0.0),
        node(1, 100.0, 0.0),
        node(1, 100.0, 100.0),
        node(1, 0.0, 100.0),
    ]
}

/// Three nodes on map 0, then three on map 1.
fn two_map_path() -> Vec<TaxiPathNode> {
    vec![
        node(0, 0.0, 0.0),
        node(0, 50.0, 0.0),
        node_with_delay(0, 100.0, 0.0, 5),
        node(1, 0.0, 0.0),
        node(1, 50.0, 0.0),
        node(1, 100.0, 0.0),
    ]
}

#[cfg(test)]
mod compiler {
    use super::*;
    use crate::{compile_route, RouteError};

    #[test]
    fn single_map_is_one_cyclic_segment() {
        let route = compile_route(PathId(0), &single_map_path(), 10.0).unwrap();
        assert_eq!(route.segments.len(), 1);
        assert!(route.is_cyclic);
        assert_eq!(route.map_ids, vec![MapId(1)]);
        assert_eq!(route.segments[0].nodes.len(), 4);
    }

    #[test]
    fn two_maps_split_at_the_boundary() {
        let route = compile_route(PathId(0), &two_map_path(), 20.0).unwrap();
        assert_eq!(route.segments.len(), 2);
        assert!(!route.is_cyclic);
        assert_eq!(route.map_ids, vec![MapId(0), MapId(1)]);
        // adjacent segments lie on different maps
        for pair in route.segments.windows(2) {
            assert_ne!(pair[0].map_id, pair[1].map_id);
        }
    }

    #[test]
    fn period_sums_traversal_and_dwell() {
        let nodes = two_map_path();
        let route = compile_route(PathId(0), &nodes, 20.0).unwrap();
        let traversal: i64 = route.segments.iter().map(|s| s.total_length_ms() as i64).sum();
        let dwell: i64 = nodes.iter().map(|n| n.delay_secs as i64 * 1000).sum();
        assert_eq!(route.period_ms as i64, traversal + dwell);
        assert_eq!(dwell, 5000);
    }

    #[test]
    fn every_segment_takes_time() {
        let route = compile_route(PathId(0), &two_map_path(), 20.0).unwrap();
        for segment in &route.segments {
            assert!(segment.total_length_ms() >= 1);
        }
        assert!(route.period_ms >= 1);
    }

    #[test]
    fn node_metadata_is_carried() {
        let route = compile_route(PathId(0), &two_map_path(), 20.0).unwrap();
        let dock = route.segments[0].node(2);
        assert_eq!(dock.delay_ms, 5000);
        assert!(route.segments[1].node(0).delay_ms == 0);
    }

    #[test]
    fn event_ids_are_carried() {
        let mut nodes = single_map_path();
        nodes[1].arrival_event = Some(EventId(77));
        nodes[1].departure_event = Some(EventId(78));
        let route = compile_route(PathId(0), &nodes, 10.0).unwrap();
        assert_eq!(route.segments[0].node(1).arrival_event, Some(EventId(77)));
        assert_eq!(route.segments[0].node(1).departure_event, Some(EventId(78)));
    }

    #[test]
    fn empty_path_is_rejected() {
        assert!(matches!(
            compile_route(PathId(3), &[], 10.0),
            Err(RouteError::EmptyPath(PathId(3)))
        ));
    }

    #[test]
    fn lone_node_run_is_rejected() {
        // Map 1 contributes a single node: not enough to interpolate.
        let nodes = vec![node(0, 0.0, 0.0), node(0, 50.0, 0.0), node(1, 0.0, 0.0)];
        assert!(matches!(
            compile_route(PathId(0), &nodes, 10.0),
            Err(RouteError::EmptyPath(_))
        ));
    }

    #[test]
    fn coincident_nodes_are_degenerate() {
        let nodes = vec![node(0, 5.0, 5.0), node(0, 5.0, 5.0), node(0, 5.0, 5.0)];
        assert!(matches!(
            compile_route(PathId(0), &nodes, 10.0),
            Err(RouteError::DegenerateSegment { segment: 0, .. })
        ));
    }

    #[test]
    fn segment_start_is_first_knot() {
        let route = compile_route(PathId(0), &two_map_path(), 20.0).unwrap();
        assert!(route.segments[1].start().distance(Vec3::new(0.0, 0.0, 0.0)) < 1e-4);
    }

    #[test]
    fn next_segment_wraps() {
        let route = compile_route(PathId(0), &two_map_path(), 20.0).unwrap();
        assert_eq!(route.next_segment(0), 1);
        assert_eq!(route.next_segment(1), 0);
    }
}

#[cfg(test)]
mod registry {
    use super::*;
    use crate::registry::compile_for_entry;
    use crate::{RouteError, RouteRegistry};
    use mot_core::{GameObjectTemplate, TemplateCatalog, TemplateKind};

    fn fixture() -> (TemplateCatalog, TaxiPathTable) {
        let mut catalog = TemplateCatalog::new();
        catalog.insert(GameObjectTemplate::transport(EntryId(10), "ferry", PathId(0), 20.0));
        catalog.insert(GameObjectTemplate::transport(EntryId(11), "tram", PathId(1), 10.0));
        // not a transport; the registry must ignore it
        catalog.insert(GameObjectTemplate {
            entry:      EntryId(12),
            name:       "mailbox".into(),
            kind:       TemplateKind::Other,
            size:       1.0,
            faction:    0,
            display_id: 0,
        });
        // transport with an out-of-range path; must be skipped, not fatal
        catalog.insert(GameObjectTemplate::transport(EntryId(13), "broken", PathId(9), 20.0));

        let paths = TaxiPathTable::new(vec![two_map_path(), single_map_path()]);
        (catalog, paths)
    }

    #[test]
    fn load_skips_bad_entries() {
        let (catalog, paths) = fixture();
        let registry = RouteRegistry::load(&catalog, &paths);
        assert_eq!(registry.len(), 2);
        assert!(registry.get_route(EntryId(10)).is_some());
        assert!(registry.get_route(EntryId(11)).is_some());
        assert!(registry.get_route(EntryId(13)).is_none());
    }

    #[test]
    fn spline_lookup_by_map() {
        let (catalog, paths) = fixture();
        let registry = RouteRegistry::load(&catalog, &paths);
        assert!(registry.get_spline(EntryId(10), MapId(0)).is_some());
        assert!(registry.get_spline(EntryId(10), MapId(1)).is_some());
        assert!(registry.get_spline(EntryId(10), MapId(9)).is_none());
        assert_eq!(registry.get_map_ids(EntryId(11)).unwrap(), &[MapId(1)]);
    }

    #[test]
    fn entries_are_ordered() {
        let (catalog, paths) = fixture();
        let registry = RouteRegistry::load(&catalog, &paths);
        let entries: Vec<_> = registry.entries().collect();
        assert_eq!(entries, vec![EntryId(10), EntryId(11)]);
    }

    #[test]
    fn template_validation() {
        let (catalog, paths) = fixture();
        assert!(matches!(
            compile_for_entry(&catalog, &paths, EntryId(99)),
            Err(RouteError::MissingTemplate(EntryId(99)))
        ));
        assert!(matches!(
            compile_for_entry(&catalog, &paths, EntryId(12)),
            Err(RouteError::WrongTemplateType(EntryId(12)))
        ));
        assert!(matches!(
            compile_for_entry(&catalog, &paths, EntryId(13)),
            Err(RouteError::BadPathId(PathId(9)))
        ));
    }

    #[test]
    fn misplaced_spawn_rows_are_counted() {
        let (catalog, paths) = fixture();
        let registry = RouteRegistry::load(&catalog, &paths);
        let rows = [(5001, EntryId(10)), (5002, EntryId(500))];
        assert_eq!(registry.report_misplaced_spawns(&rows), 1);
    }
}

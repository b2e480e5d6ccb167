//! Unit tests for mot-carrier.

use mot_core::{MapId, NodeAction, ObjectId, PathId, Position, TaxiPathNode, Vec3};
use mot_route::{compile_route, CompiledRoute};

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

/// Four collinear nodes on map 1, 100 units apart, speed 10: each span is
/// close to 10 s.  Single segment, so the route is cyclic.
fn straight_cyclic() -> CompiledRoute {
    let nodes = vec![
        node(1, 0.0, 0.0),
        node(1, 100.0, 0.0),
        node(1, 200.0, 0.0),
        node(1, 300.0, 0.0),
    ];
    compile_route(PathId(0), &nodes, 10.0).unwrap()
}

/// Like `straight_cyclic` but node 1 docks for `delay_secs`.
fn cyclic_with_dock(delay_secs: u32) -> CompiledRoute {
    let nodes = vec![
        node(1, 0.0, 0.0),
        node_with_delay(1, 100.0, 0.0, delay_secs),
        node(1, 200.0, 0.0),
        node(1, 300.0, 0.0),
    ];
    compile_route(PathId(0), &nodes, 10.0).unwrap()
}

/// Three nodes on map 0 (last one docks 5 s), three on map 1.
fn two_map_route() -> CompiledRoute {
    let nodes = vec![
        node(0, 0.0, 0.0),
        node(0, 50.0, 0.0),
        node_with_delay(0, 100.0, 0.0, 5),
        node(1, 500.0, 0.0),
        node(1, 550.0, 0.0),
        node(1, 600.0, 0.0),
    ];
    compile_route(PathId(0), &nodes, 20.0).unwrap()
}

/// Milliseconds from segment start to local node `n`.
fn ms_to_node(route: &CompiledRoute, segment: usize, n: usize) -> u32 {
    let spline = &route.segment(segment).spline;
    spline.length_ms(spline.first() + n) as u32
}

#[cfg(test)]
mod motion {
    use super::*;
    use crate::{MotionController, MotionEvent};

    #[test]
    fn zero_diff_changes_nothing() {
        let route = straight_cyclic();
        let mut m = MotionController::new(&route, 0);
        let before = (m.time_passed_ms(), m.current_node(), m.is_dwelling(), m.arrived());
        let events = m.tick(&route, 0);
        assert!(events.is_empty());
        assert_eq!(before, (m.time_passed_ms(), m.current_node(), m.is_dwelling(), m.arrived()));
    }

    #[test]
    fn subdivided_ticks_match_one_big_tick() {
        // Inside the first span, no events fire, so subdivision is exact.
        let route = straight_cyclic();
        let mut whole = MotionController::new(&route, 0);
        let mut pieces = MotionController::new(&route, 0);

        whole.tick(&route, 300);
        pieces.tick(&route, 100);
        pieces.tick(&route, 100);
        pieces.tick(&route, 100);

        assert_eq!(whole.time_passed_ms(), pieces.time_passed_ms());
        assert_eq!(whole.current_node(), pieces.current_node());
        let d = whole.position(&route).distance(pieces.position(&route));
        assert!(d < 1e-4);
    }

    #[test]
    fn arrivals_fire_in_node_order() {
        let route = straight_cyclic();
        let mut m = MotionController::new(&route, 0);
        // Jump past nodes 1 and 2 in a single tick.
        let t = ms_to_node(&route, 0, 2) + 10;
        let events = m.tick(&route, t);

        let arrivals: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                MotionEvent::Arrival { node, .. } => Some(*node),
                _ => None,
            })
            .collect();
        assert_eq!(arrivals, vec![1, 2]);
        assert_eq!(m.current_node(), 2);
    }

    #[test]
    fn relocations_are_throttled() {
        let route = straight_cyclic();
        let mut m = MotionController::new(&route, 0);

        let events = m.tick(&route, 100);
        assert!(events.is_empty(), "100 ms: below the relocation interval");

        let events = m.tick(&route, 300);
        assert!(events
            .iter()
            .any(|e| matches!(e, MotionEvent::Relocate { .. })));
    }

    #[test]
    fn relocation_tracks_the_spline() {
        let route = straight_cyclic();
        let mut m = MotionController::new(&route, 0);
        let events = m.tick(&route, 1000);
        let Some(MotionEvent::Relocate { pos, yaw }) = events
            .iter()
            .find(|e| matches!(e, MotionEvent::Relocate { .. }))
        else {
            panic!("expected a relocation");
        };
        // The event must agree with direct evaluation at the same spline
        // time, stay on the +x line, and face along it.
        assert!(pos.distance(m.position(&route)) < 1e-4);
        assert!(pos.x > 0.0 && pos.x < 100.0);
        assert!(pos.y.abs() < 1e-4);
        assert!(yaw.abs() < 0.05, "yaw = {yaw}");
    }

    #[test]
    fn dock_fires_one_arrival_and_one_departure() {
        let route = cyclic_with_dock(2);
        let mut m = MotionController::new(&route, 0);

        let events = m.tick(&route, ms_to_node(&route, 0, 1));
        let arrivals = events
            .iter()
            .filter(|e| matches!(e, MotionEvent::Arrival { node: 1, .. }))
            .count();
        assert_eq!(arrivals, 1);
        assert!(m.is_dwelling());

        // 1999 ms into a 2000 ms dwell: still parked, no departure yet.
        let events = m.tick(&route, 1999);
        assert!(events.is_empty());
        assert!(m.is_dwelling());

        let events = m.tick(&route, 1);
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, MotionEvent::Departure { node: 1, .. }))
                .count(),
            1
        );
        assert!(!m.is_dwelling());
    }

    #[test]
    fn dwell_holds_spline_time_still() {
        let route = cyclic_with_dock(3);
        let mut m = MotionController::new(&route, 0);
        m.tick(&route, ms_to_node(&route, 0, 1));
        let parked_at = m.time_passed_ms();

        m.tick(&route, 1000);
        assert_eq!(m.time_passed_ms(), parked_at);
    }

    #[test]
    fn cyclic_route_wraps_at_exact_total() {
        let route = straight_cyclic();
        let total = route.segment(0).total_length_ms() as u32;
        let mut m = MotionController::new(&route, 0);

        let start = m.position(&route);
        m.tick(&route, total);
        assert!(!m.arrived());
        assert_eq!(m.current_node(), 0);
        assert_eq!(m.time_passed_ms(), 0);
        assert!(m.position(&route).distance(start) < 0.1);
    }

    #[test]
    fn cyclic_period_matches_arc_length_times_speed() {
        // moveSpeed 10 ⇒ 100 ms per world unit.
        let route = straight_cyclic();
        let arc = route.segment(0).spline.total_length();
        assert!((route.period_ms as f32 - arc * 100.0).abs() < 10.0);
    }

    #[test]
    fn non_cyclic_segment_arrives_at_exact_total() {
        let route = two_map_route();
        // Start on segment 1, which has no terminal dock.
        let total = route.segment(1).total_length_ms() as u32;
        let mut m = MotionController::new(&route, 1);

        let events = m.tick(&route, total);
        assert!(m.arrived());
        assert!(events.contains(&MotionEvent::SegmentComplete));
        // Terminal position is the segment's last knot.
        let last = route.segment(1).spline.knot(route.segment(1).spline.last());
        assert!(m.position(&route).distance(last) < 0.1);
    }

    #[test]
    fn terminal_dock_defers_completion() {
        let route = two_map_route();
        let total = route.segment(0).total_length_ms() as u32;
        let mut m = MotionController::new(&route, 0);

        let events = m.tick(&route, total);
        assert!(m.arrived());
        assert!(m.is_dwelling(), "terminal dock must hold the carrier");
        assert!(!events.contains(&MotionEvent::SegmentComplete));
        assert!(events
            .iter()
            .any(|e| matches!(e, MotionEvent::Arrival { node: 2, .. })));

        let events = m.tick(&route, 5000);
        assert!(events
            .iter()
            .any(|e| matches!(e, MotionEvent::Departure { node: 2, .. })));
        assert_eq!(events.last(), Some(&MotionEvent::SegmentComplete));
    }

    #[test]
    fn oversized_tick_runs_through_a_terminal_dock() {
        // One tick covering the whole segment plus the full dwell.
        let route = two_map_route();
        let total = route.segment(0).total_length_ms() as u32;
        let mut m = MotionController::new(&route, 0);

        let events = m.tick(&route, total + 5000);
        assert!(matches!(events.first(), Some(MotionEvent::Arrival { node: 1, .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e, MotionEvent::Arrival { node: 2, .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e, MotionEvent::Departure { node: 2, .. })));
        assert_eq!(events.last(), Some(&MotionEvent::SegmentComplete));
    }

    #[test]
    fn completed_controller_goes_quiet() {
        let route = two_map_route();
        let total = route.segment(1).total_length_ms() as u32;
        let mut m = MotionController::new(&route, 1);
        m.tick(&route, total);
        assert!(m.arrived());
        assert!(m.tick(&route, 10_000).is_empty());
    }

    #[test]
    fn path_progress_wraps_at_period() {
        let route = straight_cyclic();
        let mut m = MotionController::new(&route, 0);
        m.tick(&route, route.period_ms + 123);
        assert_eq!(m.path_progress_ms(), 123);
    }
}

#[cfg(test)]
mod frame {
    use std::f32::consts::FRAC_PI_2;

    use super::*;
    use crate::{BoardError, PassengerFrame, PassengerKind};

    fn origin() -> Position {
        Position::new(0.0, 0.0, 0.0, 0.0)
    }

    #[test]
    fn board_rejects_out_of_bounds() {
        let mut f = PassengerFrame::new(origin());
        let err = f.board(ObjectId(1), PassengerKind::Player, Position::new(51.0, 0.0, 0.0, 0.0));
        assert!(matches!(err, Err(BoardError::OutOfBounds { .. })));
        assert!(f.is_empty());
    }

    #[test]
    fn unboard_is_idempotent() {
        let mut f = PassengerFrame::new(origin());
        f.board(ObjectId(1), PassengerKind::Player, origin()).unwrap();
        assert!(f.unboard(ObjectId(1)));
        assert!(!f.unboard(ObjectId(1)));
        assert!(!f.contains(ObjectId(1)));
    }

    #[test]
    fn global_position_applies_rotation_and_translation() {
        let mut f = PassengerFrame::new(origin());
        f.board(ObjectId(1), PassengerKind::Player, Position::new(1.0, 2.0, 3.0, 0.0))
            .unwrap();

        let moves = f.refresh(Position::new(100.0, 200.0, 0.0, FRAC_PI_2));
        assert_eq!(moves.len(), 1);
        let g = moves[0].global;
        assert!((g.x - 98.0).abs() < 1e-4, "x = {}", g.x);
        assert!((g.y - 201.0).abs() < 1e-4, "y = {}", g.y);
        assert!((g.z - 3.0).abs() < 1e-4);
        assert!((g.o - FRAC_PI_2).abs() < 1e-4);

        f.clear();
    }

    #[test]
    fn rotate_unrotate_roundtrip() {
        let f = PassengerFrame::new(Position::new(0.0, 0.0, 0.0, 1.234));
        let (rx, ry) = f.rotate_local(3.5, -7.25);
        let (lx, ly) = f.unrotate(rx, ry);
        assert!((lx - 3.5).abs() < 1e-4);
        assert!((ly + 7.25).abs() < 1e-4);
    }

    #[test]
    fn small_moves_do_not_refresh_early() {
        let mut f = PassengerFrame::new(origin());
        f.board(ObjectId(1), PassengerKind::Creature, origin()).unwrap();

        // 0.5 units of drift, timer not yet elapsed: nothing happens.
        let moves = f.update(100, Position::new(0.5, 0.0, 0.0, 0.0));
        assert!(moves.is_empty());

        f.clear();
    }

    #[test]
    fn large_move_refreshes_before_the_timer() {
        let mut f = PassengerFrame::new(origin());
        f.board(ObjectId(1), PassengerKind::Player, Position::new(1.0, 0.0, 0.0, 0.0))
            .unwrap();

        let moves = f.update(100, Position::new(10.0, 0.0, 0.0, 0.0));
        assert_eq!(moves.len(), 1);
        assert!((moves[0].global.x - 11.0).abs() < 1e-4);

        f.clear();
    }

    #[test]
    fn timer_expiry_without_movement_is_quiet() {
        let mut f = PassengerFrame::new(origin());
        f.board(ObjectId(1), PassengerKind::Player, origin()).unwrap();
        let moves = f.update(600, origin());
        assert!(moves.is_empty());
        f.clear();
    }

    #[test]
    fn set_local_moves_immediately() {
        let mut f = PassengerFrame::new(origin());
        f.board(ObjectId(1), PassengerKind::Player, origin()).unwrap();

        let mv = f.set_local(ObjectId(1), Position::new(4.0, 0.0, 1.0, 0.0)).unwrap();
        let mv = mv.expect("passenger is aboard");
        assert!((mv.global.x - 4.0).abs() < 1e-4);
        assert!((mv.global.z - 1.0).abs() < 1e-4);

        // Not aboard: no move, no error.
        assert!(f.set_local(ObjectId(9), origin()).unwrap().is_none());
        // Out of bounds: rejected, slot untouched.
        assert!(f
            .set_local(ObjectId(1), Position::new(0.0, 99.0, 0.0, 0.0))
            .is_err());
        assert!((f.slot(ObjectId(1)).unwrap().local.x - 4.0).abs() < 1e-4);

        f.clear();
    }
}

#[cfg(test)]
mod carrier {
    use super::*;
    use crate::{Carrier, PassengerKind};

    #[test]
    fn spawns_at_segment_start_facing_east() {
        let route = two_map_route();
        let c = Carrier::spawn(ObjectId(1), mot_core::EntryId(10), &route, 1);
        assert_eq!(c.map_id, MapId(1));
        assert_eq!(c.period_ms, route.period_ms);
        assert!((c.position.x - 500.0).abs() < 1e-4);
        assert_eq!(c.position.o, 0.0);
    }

    #[test]
    fn tick_moves_carrier_then_passengers() {
        let route = straight_cyclic();
        let mut c = Carrier::spawn(ObjectId(1), mot_core::EntryId(10), &route, 0);
        c.frame_mut()
            .board(ObjectId(2), PassengerKind::Player, Position::new(0.0, 2.0, 0.0, 0.0))
            .unwrap();

        // 1 s is past both the relocation and frame throttles, and moves the
        // carrier several units along +x.
        let out = c.tick(&route, 1000);
        assert!(c.position.x > 1.0, "carrier x = {}", c.position.x);
        assert_eq!(out.passenger_moves.len(), 1);
        let g = out.passenger_moves[0].global;
        assert!((g.x - c.position.x).abs() < 0.1);
        assert!((g.y - 2.0).abs() < 0.1);

        c.frame_mut().clear();
    }

    #[test]
    fn stationary_carrier_leaves_passengers_alone() {
        let route = cyclic_with_dock(10);
        let mut c = Carrier::spawn(ObjectId(1), mot_core::EntryId(10), &route, 0);
        c.frame_mut()
            .board(ObjectId(2), PassengerKind::Creature, Position::new(1.0, 0.0, 0.0, 0.0))
            .unwrap();

        // Drive to the dock, then park there.
        let to_dock = ms_to_node(&route, 0, 1);
        c.tick(&route, to_dock);
        let parked = c.position;
        let out = c.tick(&route, 2000);
        assert_eq!(c.position, parked);
        assert!(out.passenger_moves.is_empty());

        c.frame_mut().clear();
    }
}

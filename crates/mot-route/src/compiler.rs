//! The taxi-path compiler: raw node list → [`CompiledRoute`].

use mot_core::{PathId, TaxiPathNode, Vec3};
use mot_spline::Spline;

use crate::{CompiledRoute, MapSegment, RouteError, RouteNode, RouteResult};

/// A compiled spline shorter than this is a data error: either a duplicated
/// node or a path that never leaves its dock.
const MIN_SEGMENT_LENGTH: f32 = 1.0;

/// Compile `nodes` (the taxi path `path`) into a route for a carrier moving
/// at `move_speed` world units per second.
///
/// The node list is split into contiguous same-map runs, each of which
/// becomes one timed segment.  Node dwell delays and event ids are carried
/// into a per-segment side table so the motion controller can dispatch them
/// without consulting the raw path again.
pub fn compile_route(
    path: PathId,
    nodes: &[TaxiPathNode],
    move_speed: f32,
) -> RouteResult<CompiledRoute> {
    let mut segments = Vec::new();

    for run in split_map_runs(nodes) {
        if run.len() < 2 {
            return Err(RouteError::EmptyPath(path));
        }

        let controls: Vec<Vec3> = run.iter().map(|n| n.pos).collect();
        let mut spline = Spline::new(&controls);
        if spline.total_length() <= MIN_SEGMENT_LENGTH {
            return Err(RouteError::DegenerateSegment { path, segment: segments.len() });
        }
        spline.init_lengths(move_speed);
        // A segment must take measurable time, or the motion controller
        // would spin through it without consuming the tick.
        if spline.total_length_ms() < 1 {
            return Err(RouteError::DegenerateSegment { path, segment: segments.len() });
        }

        let meta = run
            .iter()
            .map(|n| RouteNode {
                delay_ms:        n.delay_secs * 1000,
                arrival_event:   n.arrival_event,
                departure_event: n.departure_event,
            })
            .collect();

        segments.push(MapSegment { map_id: run[0].map_id, spline, nodes: meta });
    }

    if segments.is_empty() {
        return Err(RouteError::EmptyPath(path));
    }

    let traversal_ms: i64 = segments.iter().map(|s| s.total_length_ms() as i64).sum();
    let dwell_ms: i64 = nodes.iter().map(|n| n.delay_secs as i64 * 1000).sum();

    Ok(CompiledRoute {
        map_ids:   segments.iter().map(|s| s.map_id).collect(),
        is_cyclic: segments.len() == 1,
        period_ms: (traversal_ms + dwell_ms) as u32,
        segments,
    })
}

/// Split the node list into maximal runs sharing one `map_id`, preserving
/// order.
fn split_map_runs(nodes: &[TaxiPathNode]) -> Vec<&[TaxiPathNode]> {
    let mut runs = Vec::new();
    let mut start = 0;
    for i in 1..=nodes.len() {
        if i == nodes.len() || nodes[i].map_id != nodes[start].map_id {
            runs.push(&nodes[start..i]);
            start = i;
        }
    }
    runs
}

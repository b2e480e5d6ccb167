//! Compiled route types: per-map segments and their node metadata.

use mot_core::{EventId, MapId, Vec3};
use mot_spline::Spline;

// ── RouteNode ─────────────────────────────────────────────────────────────────

/// Dwell and event metadata for one node of a segment.
///
/// `nodes[i]` describes the spline knot `spline.first() + i`; index 0 is the
/// knot the carrier occupies when the segment starts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RouteNode {
    /// Pause at this node, in milliseconds (0 = pass through).
    pub delay_ms: u32,
    pub arrival_event: Option<EventId>,
    pub departure_event: Option<EventId>,
}

impl RouteNode {
    #[inline]
    pub fn has_delay(&self) -> bool {
        self.delay_ms > 0
    }
}

// ── MapSegment ────────────────────────────────────────────────────────────────

/// The contiguous part of a route that stays on one map.
#[derive(Clone, Debug)]
pub struct MapSegment {
    pub map_id: MapId,

    /// Interpolating spline through this segment's control points, with its
    /// timing table already initialised.
    pub spline: Spline,

    /// Per-node metadata, aligned with the spline's interior knots.
    pub nodes: Vec<RouteNode>,
}

impl MapSegment {
    /// Milliseconds to traverse this segment at cruising speed (dwell
    /// excluded).
    #[inline]
    pub fn total_length_ms(&self) -> i32 {
        self.spline.total_length_ms()
    }

    /// Where a carrier entering this segment materialises.
    #[inline]
    pub fn start(&self) -> Vec3 {
        self.spline.knot(self.spline.first())
    }

    /// Metadata for local node `idx` (0-based within the segment).
    #[inline]
    pub fn node(&self, idx: usize) -> &RouteNode {
        &self.nodes[idx]
    }

    /// Index of the last local node.
    #[inline]
    pub fn last_node(&self) -> usize {
        self.nodes.len() - 1
    }
}

// ── CompiledRoute ─────────────────────────────────────────────────────────────

/// A fully compiled transport route, owned by the static registry.
#[derive(Clone, Debug)]
pub struct CompiledRoute {
    /// At least one segment; adjacent segments lie on different maps.
    pub segments: Vec<MapSegment>,

    /// Ordered maps the route visits, one per segment.
    pub map_ids: Vec<MapId>,

    /// One full circuit in milliseconds: traversal of every segment plus
    /// every node dwell.
    pub period_ms: u32,

    /// `true` for single-segment routes, which wrap in place instead of
    /// handing off across maps.
    pub is_cyclic: bool,
}

impl CompiledRoute {
    #[inline]
    pub fn segment(&self, idx: usize) -> &MapSegment {
        &self.segments[idx]
    }

    /// The segment a carrier moves to after finishing `idx`, wrapping at the
    /// route level.
    #[inline]
    pub fn next_segment(&self, idx: usize) -> usize {
        (idx + 1) % self.segments.len()
    }

    /// The spline of the first segment on `map`, if the route visits it.
    pub fn spline_for(&self, map: MapId) -> Option<&Spline> {
        self.segments
            .iter()
            .find(|s| s.map_id == map)
            .map(|s| &s.spline)
    }
}

//! The motion controller: advances a carrier along its compiled route.

use mot_core::{EventId, Vec3};
use mot_route::{CompiledRoute, MapSegment};

/// How often a moving carrier emits a relocation, in milliseconds.
///
/// Between relocations the carrier's stored position is stale by design;
/// clients interpolate, and server-side checks tolerate sub-tick error.
pub const RELOCATE_INTERVAL_MS: u32 = 400;

// ── Events ────────────────────────────────────────────────────────────────────

/// One observable outcome of a motion tick, emitted in spline order.
#[derive(Clone, Debug, PartialEq)]
pub enum MotionEvent {
    /// The carrier reached node `node` of its active segment.
    Arrival { node: usize, event: Option<EventId> },

    /// A dwell at `node` finished and the carrier is leaving.
    Departure { node: usize, event: Option<EventId> },

    /// The carrier's interpolated position and facing.  Throttled to
    /// [`RELOCATE_INTERVAL_MS`]; always emitted on segment completion.
    Relocate { pos: Vec3, yaw: f32 },

    /// A non-cyclic segment is exhausted (including any terminal dwell).
    /// The service must hand the carrier off to the next map.
    SegmentComplete,
}

// ── MotionController ──────────────────────────────────────────────────────────

/// Spline-time state for one carrier.
///
/// All fields refer to the active segment of the compiled route, which is
/// passed into [`tick`](MotionController::tick) by the caller — the route
/// itself is owned by the static registry.
#[derive(Clone, Debug)]
pub struct MotionController {
    /// Index of the active segment within the route.
    active_segment: usize,

    /// Milliseconds travelled into the active segment's spline (dwell
    /// excluded).  Never exceeds the spline's total.
    time_passed_ms: u32,

    /// The spline knot most recently reached or passed.
    path_point_idx: usize,

    /// Local node index for event dispatch; trails `path_point_idx` only
    /// transiently inside a tick.
    current_node: usize,

    /// Remaining dwell at `current_node`; the carrier is stationary while
    /// this is non-zero.
    dwell_remaining_ms: u32,

    /// Set when a non-cyclic segment is exhausted.  Terminal.
    arrived: bool,

    /// Accumulated route time modulo the period; exposed for the
    /// client-visible progress field.
    path_progress_ms: u32,

    /// Accumulator for the relocation throttle.
    relocate_timer_ms: u32,
}

impl MotionController {
    /// A controller parked at the start of `segment_idx` of `route`.
    pub fn new(route: &CompiledRoute, segment_idx: usize) -> Self {
        let segment = route.segment(segment_idx);
        Self {
            active_segment:     segment_idx,
            time_passed_ms:     0,
            path_point_idx:     segment.spline.first(),
            current_node:       0,
            dwell_remaining_ms: 0,
            arrived:            false,
            path_progress_ms:   0,
            relocate_timer_ms:  0,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn active_segment(&self) -> usize {
        self.active_segment
    }

    #[inline]
    pub fn current_node(&self) -> usize {
        self.current_node
    }

    #[inline]
    pub fn time_passed_ms(&self) -> u32 {
        self.time_passed_ms
    }

    #[inline]
    pub fn is_dwelling(&self) -> bool {
        self.dwell_remaining_ms > 0
    }

    #[inline]
    pub fn arrived(&self) -> bool {
        self.arrived
    }

    /// Accumulated route time modulo the period.
    #[inline]
    pub fn path_progress_ms(&self) -> u32 {
        self.path_progress_ms
    }

    /// Interpolated position on the active segment.
    pub fn position(&self, route: &CompiledRoute) -> Vec3 {
        let segment = route.segment(self.active_segment);
        segment.spline.evaluate_percent(self.path_point_idx, self.span_fraction(segment))
    }

    /// Facing derived from the spline tangent.
    pub fn yaw(&self, route: &CompiledRoute) -> f32 {
        let segment = route.segment(self.active_segment);
        let d = segment
            .spline
            .evaluate_derivative(self.path_point_idx, self.span_fraction(segment));
        d.y.atan2(d.x)
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Consume `diff_ms` of simulated time.
    ///
    /// Events come back in spline order: arrivals and departures as the
    /// carrier walks its knots, then at most one `Relocate` at the final
    /// position, then `SegmentComplete` if the segment ended.  A tick of 0 ms
    /// changes nothing.
    pub fn tick(&mut self, route: &CompiledRoute, diff_ms: u32) -> Vec<MotionEvent> {
        // Terminal: the service tears this carrier down.
        if self.arrived && self.dwell_remaining_ms == 0 {
            return Vec::new();
        }

        let mut events = Vec::new();
        if route.period_ms > 0 {
            self.path_progress_ms = (self.path_progress_ms + diff_ms) % route.period_ms;
        }
        self.relocate_timer_ms += diff_ms;

        let segment = route.segment(self.active_segment);
        let mut remaining = diff_ms;
        let mut moved = false;
        let mut completed = false;

        loop {
            // ── Dwelling ──────────────────────────────────────────────────
            if self.dwell_remaining_ms > 0 {
                let step = self.dwell_remaining_ms.min(remaining);
                self.dwell_remaining_ms -= step;
                remaining -= step;
                if self.dwell_remaining_ms > 0 {
                    break;
                }
                let node = segment.node(self.current_node);
                events.push(MotionEvent::Departure {
                    node:  self.current_node,
                    event: node.departure_event,
                });
                if self.arrived {
                    completed = true;
                    break;
                }
                if remaining == 0 {
                    break;
                }
            }

            // ── Moving ────────────────────────────────────────────────────
            let knot_time = segment.spline.length_ms(self.path_point_idx + 1) as u32;
            let to_next = knot_time.saturating_sub(self.time_passed_ms);
            if remaining < to_next {
                self.time_passed_ms += remaining;
                moved |= remaining > 0;
                break;
            }
            remaining -= to_next;
            moved |= to_next > 0;
            self.time_passed_ms = knot_time;
            self.path_point_idx += 1;

            if self.path_point_idx >= segment.spline.last() {
                if route.is_cyclic {
                    // Wrap in place: back to the first knot, node counter reset.
                    self.current_node = 0;
                    self.path_point_idx = segment.spline.first();
                    self.time_passed_ms = 0;
                    continue;
                }
                self.arrived = true;
                self.path_point_idx = segment.spline.last() - 1;
                self.time_passed_ms = segment.total_length_ms() as u32;
                self.current_node += 1;
                let node = segment.node(self.current_node);
                events.push(MotionEvent::Arrival {
                    node:  self.current_node,
                    event: node.arrival_event,
                });
                if node.has_delay() {
                    // Terminal dock: dwell before the handoff.
                    self.dwell_remaining_ms = node.delay_ms;
                    continue;
                }
                completed = true;
                break;
            }

            self.current_node += 1;
            let node = segment.node(self.current_node);
            events.push(MotionEvent::Arrival {
                node:  self.current_node,
                event: node.arrival_event,
            });
            if node.has_delay() {
                self.dwell_remaining_ms = node.delay_ms;
                continue;
            }
            if remaining == 0 {
                break;
            }
        }

        if (moved && self.relocate_timer_ms >= RELOCATE_INTERVAL_MS) || completed {
            self.relocate_timer_ms %= RELOCATE_INTERVAL_MS;
            events.push(MotionEvent::Relocate {
                pos: self.position(route),
                yaw: self.yaw(route),
            });
        }
        if completed {
            events.push(MotionEvent::SegmentComplete);
        }

        events
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Fraction of the current span covered, in `[0, 1]`.
    fn span_fraction(&self, segment: &MapSegment) -> f32 {
        let start = segment.spline.length_ms(self.path_point_idx);
        let end = segment.spline.length_ms(self.path_point_idx + 1);
        if end <= start {
            return 0.0;
        }
        ((self.time_passed_ms as i32 - start) as f32 / (end - start) as f32).clamp(0.0, 1.0)
    }
}

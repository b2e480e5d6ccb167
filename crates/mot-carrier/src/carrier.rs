//! A live carrier: motion controller plus passenger frame.

use tracing::trace;

use mot_core::{EntryId, MapId, ObjectId, Position};
use mot_route::CompiledRoute;

use crate::frame::{PassengerFrame, PassengerMove};
use crate::motion::{MotionController, MotionEvent};

/// Everything one motion tick produced, ready for the service to apply to
/// the world.  Passenger moves come after the carrier's own relocation, so
/// applying the struct in field order preserves the required observation
/// order.
#[derive(Debug, Default)]
pub struct CarrierTick {
    /// Ordered motion events (arrivals, departures, relocation, completion).
    pub events: Vec<MotionEvent>,

    /// Derived passenger relocations, if the frame refreshed this tick.
    pub passenger_moves: Vec<PassengerMove>,
}

/// One live transport instance on one map.
///
/// For a single-map route there is exactly one carrier for the transport's
/// whole life; a multi-map route gets a fresh carrier per visited map, built
/// by the handoff.
#[derive(Debug)]
pub struct Carrier {
    pub guid: ObjectId,
    pub entry: EntryId,
    pub map_id: MapId,

    /// Current placement; updated by throttled `Relocate` events.
    pub position: Position,

    /// Full-circuit time of the route, mirrored into the client-visible
    /// level field by the enclosing layer.
    pub period_ms: u32,

    motion: MotionController,
    frame: PassengerFrame,
}

impl Carrier {
    /// Materialise a carrier at the start of `segment_idx` of `route`,
    /// facing east (orientation 0) until the first relocation.
    pub fn spawn(
        guid: ObjectId,
        entry: EntryId,
        route: &CompiledRoute,
        segment_idx: usize,
    ) -> Self {
        let segment = route.segment(segment_idx);
        let start = segment.start();
        let position = Position::new(start.x, start.y, start.z, 0.0);
        Self {
            guid,
            entry,
            map_id: segment.map_id,
            position,
            period_ms: route.period_ms,
            motion: MotionController::new(route, segment_idx),
            frame: PassengerFrame::new(position),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn motion(&self) -> &MotionController {
        &self.motion
    }

    #[inline]
    pub fn frame(&self) -> &PassengerFrame {
        &self.frame
    }

    #[inline]
    pub fn frame_mut(&mut self) -> &mut PassengerFrame {
        &mut self.frame
    }

    /// Re-park the carrier at the start of `segment_idx`, keeping its
    /// passengers.  Used when a route cycles back onto the map the carrier
    /// already occupies.
    pub fn reset_to_segment(&mut self, route: &CompiledRoute, segment_idx: usize) {
        let segment = route.segment(segment_idx);
        let start = segment.start();
        self.map_id = segment.map_id;
        self.position = Position::new(start.x, start.y, start.z, 0.0);
        self.motion = MotionController::new(route, segment_idx);
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Advance the carrier by `diff_ms`.
    ///
    /// Applies `Relocate` events to the carrier's own position and runs the
    /// passenger-frame refresh against the result.
    pub fn tick(&mut self, route: &CompiledRoute, diff_ms: u32) -> CarrierTick {
        let events = self.motion.tick(route, diff_ms);

        for event in &events {
            if let MotionEvent::Relocate { pos, yaw } = event {
                self.position = Position::new(pos.x, pos.y, pos.z, *yaw);
                trace!(guid = self.guid.0, entry = self.entry.0, pos = %self.position,
                       "carrier moved");
            }
        }

        let passenger_moves = self.frame.update(diff_ms, self.position);
        CarrierTick { events, passenger_moves }
    }
}

//! The passenger frame: local coordinates, cached rotation, global updates.

use std::collections::BTreeMap;

use mot_core::{normalize_orientation, ObjectId, Position};

use crate::error::BoardError;

/// How often passenger global positions are refreshed at most, in
/// milliseconds.  Global positions only feed server-side range checks, so
/// they may lag the carrier slightly.
pub const FRAME_REFRESH_MS: u32 = 500;

/// Largest local offset a passenger may occupy on any axis, in world units.
/// Matches the footprint of the biggest transport models.
pub const MAX_LOCAL_OFFSET: f32 = 50.0;

/// Seat sentinel for massive transports, which have no seat layout.
pub const NO_SEAT: u8 = 255;

/// Carrier movement below this manhattan distance does not force a refresh.
const MOVE_EPSILON: f32 = 1.0;

/// Carrier turn below this angle (radians) keeps the cached sin/cos.
const TURN_EPSILON: f32 = 0.01;

// ── Passenger types ───────────────────────────────────────────────────────────

/// What kind of world object a passenger is; decides which relocation
/// callback the world receives.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PassengerKind {
    Player,
    Creature,
    GameObject,
    /// A passenger that carries passengers of its own; its relocation
    /// recursively updates them on the world side.
    Vehicle,
}

/// Per-passenger attachment state, owned by the carrier.
#[derive(Clone, Debug)]
pub struct PassengerSlot {
    pub kind: PassengerKind,
    /// Position and facing in the carrier's local frame.
    pub local: Position,
    /// Seat index; [`NO_SEAT`] on massive transports.
    pub seat: u8,
}

/// A derived global placement for one passenger, ready for the map's
/// relocation callback.
#[derive(Clone, Debug, PartialEq)]
pub struct PassengerMove {
    pub id: ObjectId,
    pub kind: PassengerKind,
    pub global: Position,
}

// ── PassengerFrame ────────────────────────────────────────────────────────────

/// The passenger set of one carrier plus the cached transform of its local
/// frame into world space.
///
/// The frame only stores slots; the passenger entities themselves belong to
/// the map.  Callers must empty the frame before dropping the carrier — the
/// drop asserts it.
#[derive(Debug)]
pub struct PassengerFrame {
    /// Slots by passenger id; `BTreeMap` keeps relocation order stable.
    passengers: BTreeMap<ObjectId, PassengerSlot>,

    /// Carrier placement at the last refresh.
    last_pos: Position,

    sin_o: f32,
    cos_o: f32,

    /// Counts down to the next allowed refresh.
    update_timer_ms: u32,
}

impl PassengerFrame {
    pub fn new(origin: Position) -> Self {
        Self {
            passengers:      BTreeMap::new(),
            last_pos:        origin,
            sin_o:           origin.o.sin(),
            cos_o:           origin.o.cos(),
            update_timer_ms: FRAME_REFRESH_MS,
        }
    }

    // ── Slot management ───────────────────────────────────────────────────

    /// Attach `id` at `local`.  The caller has already ruled out double
    /// boarding across carriers.
    pub fn board(
        &mut self,
        id: ObjectId,
        kind: PassengerKind,
        local: Position,
    ) -> Result<(), BoardError> {
        check_bounds(local)?;
        self.passengers.insert(id, PassengerSlot { kind, local, seat: NO_SEAT });
        Ok(())
    }

    /// Detach `id`.  Returns `false` (and does nothing) if it was not
    /// aboard.
    pub fn unboard(&mut self, id: ObjectId) -> bool {
        self.passengers.remove(&id).is_some()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.passengers.contains_key(&id)
    }

    pub fn slot(&self, id: ObjectId) -> Option<&PassengerSlot> {
        self.passengers.get(&id)
    }

    pub fn len(&self) -> usize {
        self.passengers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passengers.is_empty()
    }

    /// Iterate `(id, slot)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &PassengerSlot)> {
        self.passengers.iter().map(|(id, slot)| (*id, slot))
    }

    /// Drop every slot at once.  Teardown paths use this after the
    /// per-passenger bookkeeping is done.
    pub fn clear(&mut self) {
        self.passengers.clear();
    }

    /// Ids of all passengers, id-ordered.  Allocates; used on the teardown
    /// paths where the frame is mutated while walking.
    pub fn passenger_ids(&self) -> Vec<ObjectId> {
        self.passengers.keys().copied().collect()
    }

    /// Move a boarded passenger within the local frame, returning its new
    /// global placement for immediate dispatch.
    ///
    /// Returns `None` if `id` is not aboard.
    pub fn set_local(
        &mut self,
        id: ObjectId,
        local: Position,
    ) -> Result<Option<PassengerMove>, BoardError> {
        check_bounds(local)?;
        let Some(slot) = self.passengers.get_mut(&id) else {
            return Ok(None);
        };
        slot.local = local;
        let kind = slot.kind;
        Ok(Some(PassengerMove { id, kind, global: self.global_of(local) }))
    }

    // ── Frame refresh ─────────────────────────────────────────────────────

    /// Throttled refresh: recompute global positions when the refresh timer
    /// elapses, or sooner if the carrier moved more than [`MOVE_EPSILON`]
    /// (manhattan) or turned more than [`TURN_EPSILON`] since the last
    /// refresh.  Returns the relocations to dispatch, empty if nothing was
    /// due.
    pub fn update(&mut self, diff_ms: u32, carrier: Position) -> Vec<PassengerMove> {
        let moved = carrier.vec3().manhattan(self.last_pos.vec3()) > MOVE_EPSILON
            || angle_delta(carrier.o, self.last_pos.o) > TURN_EPSILON;

        if self.update_timer_ms > diff_ms && !moved {
            self.update_timer_ms -= diff_ms;
            return Vec::new();
        }
        self.update_timer_ms = FRAME_REFRESH_MS;
        if !moved {
            return Vec::new();
        }
        self.refresh(carrier)
    }

    /// Unconditional refresh against `carrier`; used after boarding changes
    /// and at handoff.
    pub fn refresh(&mut self, carrier: Position) -> Vec<PassengerMove> {
        if angle_delta(carrier.o, self.last_pos.o) > TURN_EPSILON {
            self.sin_o = carrier.o.sin();
            self.cos_o = carrier.o.cos();
        }
        self.last_pos = carrier;

        self.passengers
            .iter()
            .map(|(&id, slot)| PassengerMove {
                id,
                kind:   slot.kind,
                global: self.global_of(slot.local),
            })
            .collect()
    }

    // ── Transforms ────────────────────────────────────────────────────────

    /// Rotate a local `(lx, ly)` offset by the cached carrier yaw.
    #[inline]
    pub fn rotate_local(&self, lx: f32, ly: f32) -> (f32, f32) {
        (lx * self.cos_o - ly * self.sin_o, lx * self.sin_o + ly * self.cos_o)
    }

    /// Inverse of [`rotate_local`](Self::rotate_local): recover the local
    /// offset from a rotated one.
    #[inline]
    pub fn unrotate(&self, rx: f32, ry: f32) -> (f32, f32) {
        (rx * self.cos_o + ry * self.sin_o, -rx * self.sin_o + ry * self.cos_o)
    }

    /// Global placement of a local position against the last refreshed
    /// carrier placement.
    pub fn global_of(&self, local: Position) -> Position {
        let (rx, ry) = self.rotate_local(local.x, local.y);
        Position::new(
            self.last_pos.x + rx,
            self.last_pos.y + ry,
            self.last_pos.z + local.z,
            self.last_pos.o + local.o,
        )
    }
}

impl Drop for PassengerFrame {
    fn drop(&mut self) {
        // Passengers hold back-references into this frame; dropping it with
        // slots still present means the teardown path skipped unboarding.
        debug_assert!(
            self.passengers.is_empty(),
            "carrier frame dropped with {} passengers aboard",
            self.passengers.len()
        );
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn check_bounds(local: Position) -> Result<(), BoardError> {
    if local.x.abs() > MAX_LOCAL_OFFSET
        || local.y.abs() > MAX_LOCAL_OFFSET
        || local.z.abs() > MAX_LOCAL_OFFSET
    {
        return Err(BoardError::OutOfBounds { x: local.x, y: local.y, z: local.z });
    }
    Ok(())
}

/// Smallest absolute difference between two normalised angles.
fn angle_delta(a: f32, b: f32) -> f32 {
    let d = normalize_orientation(a - b);
    d.min(std::f32::consts::TAU - d)
}

//! `mot-carrier` — the live side of a transport: spline motion and the
//! passenger frame.
//!
//! # Tick model
//!
//! A [`Carrier`] is ticked by the map it lives on.  Each tick consumes
//! `diff_ms` of simulated time and yields an ordered [`MotionEvent`] list:
//! node arrivals, dwell departures, throttled relocations, and finally
//! `SegmentComplete` when a multi-map segment is exhausted.  The caller (the
//! transport service) turns those events into world side effects; nothing in
//! this crate touches a map directly, which is what keeps the controller
//! deterministic and unit-testable.
//!
//! # State machine
//!
//! ```text
//!            knot with delay           dwell expired
//!   Moving ───────────────▶ Dwelling ───────────────▶ Moving
//!     │                                                  (departure event)
//!     │ spline exhausted, non-cyclic segment
//!     ▼
//!   Arrived  (terminal; the service rebuilds the carrier on the next map)
//! ```
//!
//! Single-segment routes never arrive: the controller wraps in place.
//!
//! # Passenger frame
//!
//! Passengers live in the carrier's local frame (origin at the carrier,
//! rotated by its yaw).  Global positions are derived by rigid-body
//! transform using cached `sin`/`cos` of the carrier's orientation and
//! refreshed at most every 500 ms unless the carrier jumped or turned.

pub mod carrier;
pub mod error;
pub mod frame;
pub mod motion;

#[cfg(test)]
mod tests;

pub use carrier::{Carrier, CarrierTick};
pub use error::BoardError;
pub use frame::{
    PassengerFrame, PassengerKind, PassengerMove, PassengerSlot, FRAME_REFRESH_MS,
    MAX_LOCAL_OFFSET, NO_SEAT,
};
pub use motion::{MotionController, MotionEvent, RELOCATE_INTERVAL_MS};

//! `mot-spline` — Catmull-Rom interpolation over transport waypoints.
//!
//! # Parameterisation
//!
//! A [`Spline`] is built from the control points of one route segment.  The
//! first and last controls are repeated once so that every interior knot has
//! the four neighbours the Catmull-Rom basis needs; the curve passes through
//! every control and is C¹ at the joins.
//!
//! Indices exposed by the API are **knot indices into the padded array**:
//!
//! ```text
//! padded:   [c0] c0 c1 c2 … c(n-1) [c(n-1)]
//! index:     0   1  2  3      n        n+1
//! valid:         ^first()          ^last()
//! ```
//!
//! The curve spans knots `first() ..= last()`; span `i` runs from knot `i`
//! to knot `i + 1` for `i` in `first() .. last()`.
//!
//! # Timing
//!
//! Motion code works in milliseconds, not arc length.  After construction,
//! [`Spline::init_lengths`] walks every span, measures its world-space arc
//! length by subdivision and accumulates `length * 1000 / speed` into a
//! per-knot prefix table: `length_ms(k)` is the time at which a carrier
//! moving at constant speed reaches knot `k`.

pub mod spline;


pub use spline::Spline;

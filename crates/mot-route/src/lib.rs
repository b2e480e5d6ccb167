//! `mot-route` — compiles taxi paths into timed splines and holds the static
//! per-transport route registry.
//!
//! # Compilation model
//!
//! A taxi path is an ordered node list that may hop between maps.  The
//! compiler splits it into contiguous same-map runs; each run becomes a
//! [`MapSegment`] carrying its own [`Spline`](mot_spline::Spline), a
//! millisecond timing table, and per-node dwell/event metadata.  The segment
//! list plus the total `period` forms a [`CompiledRoute`]:
//!
//! ```text
//! nodes: A A A B B B     →  segments: [A: spline(3), B: spline(3)]
//! period = Σ segment traversal ms + 1000 · Σ node delays
//! ```
//!
//! A route with a single segment is **cyclic**: the carrier wraps in place.
//! A multi-segment route cycles at the route level — the carrier finishes a
//! segment, is torn down, and is rebuilt on the next segment's map.
//!
//! # Registry
//!
//! [`RouteRegistry::load`] walks the game-object catalog at startup and
//! compiles a route for every transport template.  A template that fails to
//! compile is logged and skipped; one bad transport never blocks the rest.
//! The registry is immutable afterwards and safe to read from every map
//! thread without locks.

pub mod compiler;
pub mod error;
pub mod registry;
pub mod route;

#[cfg(test)]
mod tests;

pub use compiler::compile_route;
pub use error::{RouteError, RouteResult};
pub use registry::{compile_for_entry, RouteRegistry};
pub use route::{CompiledRoute, MapSegment, RouteNode};

//! `mot-world` — the transport service and its world-facing seam.
//!
//! # Tick flow
//!
//! ```text
//! map loop                      TransportService                 World
//! ────────                      ────────────────                 ─────
//! tick_map(map, diff) ───────▶  ① tick every carrier on map
//!                               ② apply events in order:
//!                                    Relocate        ───────▶  relocate_carrier
//!                                    passenger moves ───────▶  relocate_{player,creature,…}
//!                                    Arrival/Departure ─────▶  dispatch_event (scripts)
//!                                    SegmentComplete ───────▶  handoff (below)
//! ```
//!
//! # Cross-map handoff
//!
//! When a multi-map carrier exhausts its segment, the service materialises
//! the next map, spawns a fresh carrier at the next segment's spline start,
//! teleports player passengers into the new carrier's frame (resurrecting
//! dead-but-not-ghost players first, falling back to the graveyard when the
//! teleport is refused), drops non-player passengers through an explicit
//! hook, and tears the old carrier down.  The dynamic registry always names
//! the live carrier and map for each transport entry.
//!
//! # Threading
//!
//! The service is a plain value constructed at server init and driven from
//! map loops.  All mutation happens inside `tick_map`, `board`/`unboard`
//! and the spawn/teardown calls, which the embedding server must issue from
//! the owning map's thread.  The compiled routes inside are never mutated
//! after [`TransportService::new`].

pub mod service;
pub mod world;


pub use service::{ActiveTransport, TransportService};
pub use world::World;

//! Taxi-path nodes: the raw waypoint input the route compiler consumes.
//!
//! The node table originates in client data shared with flight paths.  The
//! embedding server loads it however it likes (DBC, SQL, literals in tests)
//! and hands it to this subsystem as an indexed, immutable array.

use crate::{EventId, MapId, Vec3};

/// What the carrier does when it reaches a node.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeAction {
    /// Pass through.
    #[default]
    Normal,
    /// Entry point of a new map; the carrier is teleported here.
    Teleport,
    /// Docking point; the carrier halts for the node's delay.
    Stop,
}

impl NodeAction {
    /// Decode the raw `actionFlag` byte from the node table.
    ///
    /// Unknown values decode to `Normal`, matching how the client treats
    /// flags it does not understand.
    pub fn from_raw(flag: u8) -> Self {
        match flag {
            1 => NodeAction::Teleport,
            2 => NodeAction::Stop,
            _ => NodeAction::Normal,
        }
    }
}

/// One waypoint of a taxi path.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaxiPathNode {
    /// Map this node lies on.  Runs of equal `map_id` become route segments.
    pub map_id: MapId,

    /// World position of the waypoint.
    pub pos: Vec3,

    /// Dwell at this node, in whole seconds (0 = no stop).
    pub delay_secs: u32,

    /// Arrival/stop/teleport marker from the node table.
    pub action: NodeAction,

    /// Scripted event fired when the carrier arrives at this node.
    pub arrival_event: Option<EventId>,

    /// Scripted event fired when the carrier departs after its dwell.
    pub departure_event: Option<EventId>,
}

impl TaxiPathNode {
    /// A plain pass-through node with no delay and no events.
    pub fn waypoint(map_id: MapId, pos: Vec3) -> Self {
        Self {
            map_id,
            pos,
            delay_secs:      0,
            action:          NodeAction::Normal,
            arrival_event:   None,
            departure_event: None,
        }
    }
}

// ── TaxiPathTable ─────────────────────────────────────────────────────────────

/// All taxi paths, indexed by [`PathId`](crate::PathId).
///
/// Read-only after construction; shared freely across map threads.
#[derive(Default)]
pub struct TaxiPathTable {
    paths: Vec<Vec<TaxiPathNode>>,
}

impl TaxiPathTable {
    pub fn new(paths: Vec<Vec<TaxiPathNode>>) -> Self {
        Self { paths }
    }

    /// Nodes of `path`, or `None` if the id is out of range.
    pub fn get(&self, path: crate::PathId) -> Option<&[TaxiPathNode]> {
        self.paths.get(path.index()).map(Vec::as_slice)
    }

    /// Number of path slots (some may be empty).
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

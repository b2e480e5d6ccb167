//! The capability trait the embedding game server implements.

use mot_carrier::PassengerKind;
use mot_core::{EntryId, EventId, MapId, ObjectId, Position};

/// Everything the transport service needs from the surrounding world.
///
/// Relocation and teleport calls are the load-bearing surface; the `on_*`
/// notification hooks default to no-ops so lightweight embedders (and unit
/// tests) only implement what they observe.
pub trait World {
    // ── Map lifecycle ─────────────────────────────────────────────────────

    /// Fetch or materialise `map`.  Returns `false` only if the map cannot
    /// exist at all — the service treats that as fatal during a handoff.
    fn ensure_map(&mut self, map: MapId) -> bool;

    /// `true` for maps that are instantiated per group (dungeons, raids).
    fn is_instanceable(&self, map: MapId) -> bool;

    // ── Relocation callbacks ──────────────────────────────────────────────

    fn relocate_carrier(&mut self, map: MapId, guid: ObjectId, pos: Position);

    fn relocate_player(&mut self, map: MapId, id: ObjectId, pos: Position);

    fn relocate_creature(&mut self, map: MapId, id: ObjectId, pos: Position);

    fn relocate_gameobject(&mut self, map: MapId, id: ObjectId, pos: Position);

    /// Relocate a passenger that is itself a carrier of passengers; the
    /// implementation recursively updates whatever rides on it.
    fn relocate_vehicle(&mut self, map: MapId, id: ObjectId, pos: Position);

    // ── Player capabilities ───────────────────────────────────────────────

    fn is_player_dead(&self, id: ObjectId) -> bool;

    fn is_player_ghost(&self, id: ObjectId) -> bool;

    /// Restore a dead player to life at `ratio` of full health.
    fn resurrect_player(&mut self, id: ObjectId, ratio: f32);

    /// Cross-map teleport keeping the player attached to transport `entry`.
    /// Returns `false` if the destination refused the player.
    fn teleport_player(
        &mut self,
        id: ObjectId,
        map: MapId,
        pos: Position,
        entry: EntryId,
    ) -> bool;

    /// Standard fallback when a teleport fails: repop at the nearest
    /// graveyard.
    fn repop_at_graveyard(&mut self, id: ObjectId);

    // ── Event scripts ─────────────────────────────────────────────────────

    /// Run the scripted handler for `event`.  Returning `false` sends the
    /// event to the legacy scripted-event table instead.
    fn dispatch_event(&mut self, _event: EventId, _source: ObjectId, _departure: bool) -> bool {
        false
    }

    /// Fallback dispatch through the map's scripted-event table.
    fn start_event_script(&mut self, _map: MapId, _event: EventId, _source: ObjectId) {}

    // ── Notification hooks ────────────────────────────────────────────────

    /// A carrier appeared on `map`; build create-update packets for players
    /// there.
    fn on_carrier_created(&mut self, _map: MapId, _guid: ObjectId, _entry: EntryId, _pos: Position) {
    }

    /// A carrier left `map`; build out-of-range updates for players there.
    fn on_carrier_removed(&mut self, _map: MapId, _guid: ObjectId) {}

    /// A passenger boarded (`true`) or left (`false`) a carrier; the unit
    /// movement-flag bookkeeping hangs off this.
    fn on_transport_flag(&mut self, _id: ObjectId, _kind: PassengerKind, _boarded: bool) {}

    /// A non-player passenger could not be migrated across a map boundary
    /// and was released.  The embedder decides whether to despawn or
    /// respawn it.
    fn on_passenger_dropped(&mut self, _map: MapId, _id: ObjectId, _kind: PassengerKind) {}
}

//! The transport service: carrier lifecycle, boarding ledger, handoff.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info, warn};

use mot_carrier::{BoardError, Carrier, CarrierTick, MotionEvent, PassengerKind, PassengerMove};
use mot_core::{EntryId, EventId, MapId, ObjectId, Position};
use mot_route::RouteRegistry;

use crate::World;

/// High-guid prefix for carrier objects, keeping them disjoint from the
/// entity guids the embedding server allocates.
const CARRIER_GUID_HIGH: u64 = 0x1FC0 << 48;

/// Which live carrier currently represents a transport entry, and where.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ActiveTransport {
    pub guid: ObjectId,
    pub map_id: MapId,
}

/// The transport subsystem's service value.
///
/// Owns the static route registry, every live [`Carrier`], the dynamic
/// entry → carrier registry, and the boarding ledger (the back-reference
/// each passenger holds to its carrier).
pub struct TransportService {
    registry: RouteRegistry,

    /// Live carriers by guid, across all maps.
    carriers: BTreeMap<ObjectId, Carrier>,

    /// Dynamic registry: the live carrier and map per transport entry.
    active: BTreeMap<EntryId, ActiveTransport>,

    /// Passenger → carrier guid.  One entry per boarded passenger; this is
    /// the O(1) unboard handle and the `has_on_board` chain.
    boardings: HashMap<ObjectId, ObjectId>,

    next_guid: u64,
}

impl TransportService {
    pub fn new(registry: RouteRegistry) -> Self {
        Self {
            registry,
            carriers:  BTreeMap::new(),
            active:    BTreeMap::new(),
            boardings: HashMap::new(),
            next_guid: 1,
        }
    }

    // ── Startup ───────────────────────────────────────────────────────────

    /// Start every registered transport whose first map is a continent.
    ///
    /// Transports that begin on instanceable maps are deferred to
    /// [`spawn_for_map`](Self::spawn_for_map), which runs when such a map is
    /// created.  Returns the number of carriers started.
    pub fn spawn_continents<W: World>(&mut self, world: &mut W) -> usize {
        let entries: Vec<EntryId> = self.registry.entries().collect();
        let mut count = 0;

        for entry in entries {
            if self.active.contains_key(&entry) {
                continue;
            }
            let Some(route) = self.registry.get_route(entry) else { continue };
            let first_map = route.map_ids[0];
            if world.is_instanceable(first_map) {
                debug!(%entry, map = first_map.0,
                       "transport starts on an instanceable map; deferred");
                continue;
            }
            assert!(
                world.ensure_map(first_map),
                "map {first_map} unavailable for transport {entry} at startup"
            );

            let guid = ObjectId(CARRIER_GUID_HIGH | self.next_guid);
            self.next_guid += 1;
            let carrier = Carrier::spawn(guid, entry, route, 0);
            world.on_carrier_created(first_map, guid, entry, carrier.position);
            self.active.insert(entry, ActiveTransport { guid, map_id: first_map });
            self.carriers.insert(guid, carrier);
            count += 1;
        }

        info!(count, "transports started on continents");
        count
    }

    /// Start the transports that belong on a freshly created map.
    ///
    /// Only single-map (cyclic) routes run on instanceable maps; a
    /// multi-map route crossing one is a data error and is skipped.
    pub fn spawn_for_map<W: World>(&mut self, world: &mut W, map: MapId) -> usize {
        let entries: Vec<EntryId> = self.registry.entries().collect();
        let mut count = 0;

        for entry in entries {
            if self.active.contains_key(&entry) {
                continue;
            }
            let Some(route) = self.registry.get_route(entry) else { continue };
            if !route.map_ids.contains(&map) {
                continue;
            }
            if !route.is_cyclic {
                warn!(%entry, map = map.0,
                      "multi-map transport cannot run on an instanceable map; skipped");
                continue;
            }

            let guid = ObjectId(CARRIER_GUID_HIGH | self.next_guid);
            self.next_guid += 1;
            let carrier = Carrier::spawn(guid, entry, route, 0);
            world.on_carrier_created(map, guid, entry, carrier.position);
            self.active.insert(entry, ActiveTransport { guid, map_id: map });
            self.carriers.insert(guid, carrier);
            count += 1;
        }

        count
    }

    // ── Ticking ───────────────────────────────────────────────────────────

    /// Advance every carrier on `map` by `diff_ms` and apply the resulting
    /// side effects to `world`.
    ///
    /// Must be called from the map's own tick loop; each carrier's events
    /// are applied in emission order, and its passenger relocations after
    /// its own.
    pub fn tick_map<W: World>(&mut self, world: &mut W, map: MapId, diff_ms: u32) {
        let registry = &self.registry;
        let mut outcomes: Vec<(ObjectId, CarrierTick)> = Vec::new();
        for (guid, carrier) in self.carriers.iter_mut() {
            if carrier.map_id != map {
                continue;
            }
            let Some(route) = registry.get_route(carrier.entry) else { continue };
            outcomes.push((*guid, carrier.tick(route, diff_ms)));
        }

        for (guid, outcome) in outcomes {
            self.apply_tick(world, map, guid, outcome);
        }
    }

    fn apply_tick<W: World>(
        &mut self,
        world: &mut W,
        map: MapId,
        guid: ObjectId,
        outcome: CarrierTick,
    ) {
        let mut completed = false;

        for event in outcome.events {
            match event {
                MotionEvent::Relocate { .. } => {
                    if let Some(carrier) = self.carriers.get(&guid) {
                        world.relocate_carrier(map, guid, carrier.position);
                    }
                }
                MotionEvent::Arrival { node, event } => {
                    debug!(%guid, node, "carrier arrived at node");
                    if let Some(event) = event {
                        fire_event(world, map, guid, event, false);
                    }
                }
                MotionEvent::Departure { node, event } => {
                    debug!(%guid, node, "carrier departing node");
                    if let Some(event) = event {
                        fire_event(world, map, guid, event, true);
                    }
                }
                MotionEvent::SegmentComplete => completed = true,
            }
        }

        for mv in &outcome.passenger_moves {
            dispatch_passenger_move(world, map, mv);
        }

        if completed {
            self.complete_segment(world, guid);
        }
    }

    // ── Handoff ───────────────────────────────────────────────────────────

    /// A carrier exhausted its segment: either reset it in place (the route
    /// cycled back onto the same map) or rebuild it on the next map.
    fn complete_segment<W: World>(&mut self, world: &mut W, old_guid: ObjectId) {
        let Some(old) = self.carriers.get(&old_guid) else { return };
        let entry = old.entry;
        let old_map = old.map_id;
        let seg_idx = old.motion().active_segment();

        let Some(route) = self.registry.get_route(entry) else { return };
        let next_idx = route.next_segment(seg_idx);
        let next_map = route.segment(next_idx).map_id;

        if next_map == old_map {
            // The cycle's last and first segments share a map: no handoff,
            // just re-park at the next segment's start.
            let carrier = match self.carriers.get_mut(&old_guid) {
                Some(c) => c,
                None => return,
            };
            carrier.reset_to_segment(route, next_idx);
            let pos = carrier.position;
            world.relocate_carrier(old_map, old_guid, pos);
            for mv in carrier.frame_mut().refresh(pos) {
                dispatch_passenger_move(world, old_map, &mv);
            }
            return;
        }

        // A transport that cannot reach its next map cannot continue to
        // exist; the map manager upstream is broken.
        assert!(
            world.ensure_map(next_map),
            "map {next_map} unavailable during handoff of transport {entry}"
        );

        let new_guid = ObjectId(CARRIER_GUID_HIGH | self.next_guid);
        self.next_guid += 1;
        let mut fresh = Carrier::spawn(new_guid, entry, route, next_idx);

        // Migrate or release every passenger of the old carrier.
        let old = match self.carriers.get_mut(&old_guid) {
            Some(c) => c,
            None => return,
        };
        for pid in old.frame().passenger_ids() {
            let Some(slot) = old.frame().slot(pid).cloned() else { continue };
            old.frame_mut().unboard(pid);
            self.boardings.remove(&pid);

            match slot.kind {
                PassengerKind::Player => {
                    if world.is_player_dead(pid) && !world.is_player_ghost(pid) {
                        world.resurrect_player(pid, 1.0);
                    }
                    let target = fresh.frame().global_of(slot.local);
                    if world.teleport_player(pid, next_map, target, entry) {
                        // Same local offset, new global origin.
                        let _ = fresh.frame_mut().board(pid, slot.kind, slot.local);
                        self.boardings.insert(pid, new_guid);
                    } else {
                        warn!(passenger = %pid, map = next_map.0,
                              "teleport refused; repopping passenger at graveyard");
                        world.repop_at_graveyard(pid);
                        world.on_transport_flag(pid, slot.kind, false);
                    }
                }
                kind => {
                    warn!(passenger = %pid, ?kind,
                          "non-player passenger released at map boundary");
                    world.on_transport_flag(pid, kind, false);
                    world.on_passenger_dropped(old_map, pid, kind);
                }
            }
        }
        debug_assert!(old.frame().is_empty());

        world.on_carrier_removed(old_map, old_guid);
        self.carriers.remove(&old_guid);

        debug!(%entry, from = old_map.0, to = next_map.0, "transport handed off");
        world.on_carrier_created(next_map, new_guid, entry, fresh.position);
        self.active.insert(entry, ActiveTransport { guid: new_guid, map_id: next_map });
        self.carriers.insert(new_guid, fresh);
    }

    // ── Boarding ──────────────────────────────────────────────────────────

    /// Attach `passenger` to the carrier `carrier_guid` at `local`
    /// coordinates in its frame.
    pub fn board<W: World>(
        &mut self,
        world: &mut W,
        carrier_guid: ObjectId,
        passenger: ObjectId,
        kind: PassengerKind,
        local: Position,
    ) -> Result<(), BoardError> {
        if self.boardings.contains_key(&passenger) {
            return Err(BoardError::AlreadyBoarded(passenger));
        }
        let Some(carrier) = self.carriers.get_mut(&carrier_guid) else {
            return Err(BoardError::NoSuchCarrier(carrier_guid));
        };
        carrier.frame_mut().board(passenger, kind, local)?;
        self.boardings.insert(passenger, carrier_guid);
        world.on_transport_flag(passenger, kind, true);
        debug!(%passenger, carrier = %carrier_guid, "passenger boarded");
        Ok(())
    }

    /// Detach `passenger` from whatever carrier it rides.  A no-op returning
    /// `false` if it is not boarded.
    pub fn unboard<W: World>(&mut self, world: &mut W, passenger: ObjectId) -> bool {
        let Some(carrier_guid) = self.boardings.remove(&passenger) else {
            return false;
        };
        if let Some(carrier) = self.carriers.get_mut(&carrier_guid) {
            if let Some(slot) = carrier.frame().slot(passenger) {
                let kind = slot.kind;
                carrier.frame_mut().unboard(passenger);
                world.on_transport_flag(passenger, kind, false);
                debug!(%passenger, carrier = %carrier_guid, "passenger unboarded");
            }
        }
        true
    }

    /// Walk `passenger`'s boarding chain; `true` if any ancestor is the
    /// carrier `carrier_guid`.
    pub fn has_on_board(&self, carrier_guid: ObjectId, passenger: ObjectId) -> bool {
        let mut current = passenger;
        while let Some(&carrier) = self.boardings.get(&current) {
            if carrier == carrier_guid {
                return true;
            }
            current = carrier;
        }
        false
    }

    /// Move a boarded passenger within its carrier's frame, dispatching the
    /// derived global relocation immediately.
    ///
    /// Returns `Ok(false)` if the passenger is not boarded.
    pub fn set_local_position<W: World>(
        &mut self,
        world: &mut W,
        passenger: ObjectId,
        local: Position,
    ) -> Result<bool, BoardError> {
        let Some(&carrier_guid) = self.boardings.get(&passenger) else {
            return Ok(false);
        };
        let Some(carrier) = self.carriers.get_mut(&carrier_guid) else {
            return Ok(false);
        };
        let map = carrier.map_id;
        match carrier.frame_mut().set_local(passenger, local)? {
            Some(mv) => {
                dispatch_passenger_move(world, map, &mv);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // ── Map teardown ──────────────────────────────────────────────────────

    /// The world is destroying `map`: release every passenger and carrier
    /// on it.
    pub fn remove_map<W: World>(&mut self, world: &mut W, map: MapId) {
        let guids: Vec<ObjectId> = self
            .carriers
            .iter()
            .filter(|(_, c)| c.map_id == map)
            .map(|(g, _)| *g)
            .collect();

        for guid in guids {
            let Some(mut carrier) = self.carriers.remove(&guid) else { continue };
            for pid in carrier.frame().passenger_ids() {
                let kind = carrier.frame().slot(pid).map(|s| s.kind);
                carrier.frame_mut().unboard(pid);
                self.boardings.remove(&pid);
                if let Some(kind) = kind {
                    world.on_transport_flag(pid, kind, false);
                }
            }
            world.on_carrier_removed(map, guid);
            self.active.retain(|_, a| a.guid != guid);
            debug!(%guid, map = map.0, "carrier destroyed with its map");
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    pub fn carrier(&self, guid: ObjectId) -> Option<&Carrier> {
        self.carriers.get(&guid)
    }

    /// Guid of the live carrier representing `entry`.
    pub fn carrier_guid(&self, entry: EntryId) -> Option<ObjectId> {
        self.active.get(&entry).map(|a| a.guid)
    }

    /// Map the transport `entry` is currently on.
    pub fn current_map(&self, entry: EntryId) -> Option<MapId> {
        self.active.get(&entry).map(|a| a.map_id)
    }

    pub fn carrier_count(&self) -> usize {
        self.carriers.len()
    }

    /// Live carriers on `map`, guid-ordered.
    pub fn carriers_on(&self, map: MapId) -> impl Iterator<Item = &Carrier> {
        self.carriers.values().filter(move |c| c.map_id == map)
    }
}

// ── Free helpers ──────────────────────────────────────────────────────────────

fn dispatch_passenger_move<W: World>(world: &mut W, map: MapId, mv: &PassengerMove) {
    match mv.kind {
        PassengerKind::Player => world.relocate_player(map, mv.id, mv.global),
        PassengerKind::Creature => world.relocate_creature(map, mv.id, mv.global),
        PassengerKind::GameObject => world.relocate_gameobject(map, mv.id, mv.global),
        PassengerKind::Vehicle => world.relocate_vehicle(map, mv.id, mv.global),
    }
}

fn fire_event<W: World>(
    world: &mut W,
    map: MapId,
    source: ObjectId,
    event: EventId,
    departure: bool,
) {
    debug!(%event, %source, departure, "taxi path event");
    if !world.dispatch_event(event, source, departure) {
        world.start_event_script(map, event, source);
    }
}

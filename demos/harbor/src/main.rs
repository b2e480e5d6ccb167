//! harbor — smallest example for the rust_mot transport subsystem.
//!
//! Two maps: a mainland (map 0) and an island (map 1).  A ferry crosses
//! between them with a 10 s dock on each shore; a tram circles the mainland
//! plaza.  One player rides the ferry across and one deckhand NPC is lost at
//! the boundary, exercising the whole handoff path.

use std::collections::HashSet;

use anyhow::Result;

use mot_carrier::PassengerKind;
use mot_core::{
    EntryId, EventId, GameObjectTemplate, MapId, NodeAction, ObjectId, PathId, Position,
    TaxiPathNode, TaxiPathTable, TemplateCatalog, Vec3,
};
use mot_route::RouteRegistry;
use mot_world::{TransportService, World};

// ── Constants ─────────────────────────────────────────────────────────────────

const FERRY: EntryId = EntryId(176495);
const TRAM: EntryId = EntryId(176080);
const MAINLAND: MapId = MapId(0);
const ISLAND: MapId = MapId(1);

const PLAYER: ObjectId = ObjectId(1);
const DECKHAND: ObjectId = ObjectId(2);

const TICK_MS: u32 = 100;
const SIM_SECS: u32 = 240;

// ── A small in-memory world ───────────────────────────────────────────────────

/// Tracks just enough world state to show the subsystem working: which maps
/// exist and where each entity last ended up.
#[derive(Default)]
struct HarborWorld {
    maps: HashSet<MapId>,
    player_map: MapId,
    player_pos: Position,
    teleports: u32,
    dropped_npcs: u32,
    events_seen: u32,
}

impl World for HarborWorld {
    fn ensure_map(&mut self, map: MapId) -> bool {
        self.maps.insert(map);
        true
    }

    fn is_instanceable(&self, _map: MapId) -> bool {
        false
    }

    fn relocate_carrier(&mut self, _map: MapId, _guid: ObjectId, _pos: Position) {}

    fn relocate_player(&mut self, map: MapId, id: ObjectId, pos: Position) {
        if id == PLAYER {
            self.player_map = map;
            self.player_pos = pos;
        }
    }

    fn relocate_creature(&mut self, _map: MapId, _id: ObjectId, _pos: Position) {}

    fn relocate_gameobject(&mut self, _map: MapId, _id: ObjectId, _pos: Position) {}

    fn relocate_vehicle(&mut self, _map: MapId, _id: ObjectId, _pos: Position) {}

    fn is_player_dead(&self, _id: ObjectId) -> bool {
        false
    }

    fn is_player_ghost(&self, _id: ObjectId) -> bool {
        false
    }

    fn resurrect_player(&mut self, _id: ObjectId, _ratio: f32) {}

    fn teleport_player(&mut self, id: ObjectId, map: MapId, pos: Position, _entry: EntryId) -> bool {
        self.teleports += 1;
        self.relocate_player(map, id, pos);
        true
    }

    fn repop_at_graveyard(&mut self, _id: ObjectId) {}

    fn dispatch_event(&mut self, _event: EventId, _source: ObjectId, _departure: bool) -> bool {
        self.events_seen += 1;
        true
    }

    fn on_passenger_dropped(&mut self, _map: MapId, _id: ObjectId, _kind: PassengerKind) {
        self.dropped_npcs += 1;
    }
}

// ── Route data ────────────────────────────────────────────────────────────────

fn dock(map: MapId, x: f32, y: f32, delay_secs: u32, event: u32) -> TaxiPathNode {
    TaxiPathNode {
        delay_secs,
        action: NodeAction::Stop,
        arrival_event: Some(EventId(event)),
        departure_event: Some(EventId(event + 1)),
        ..TaxiPathNode::waypoint(map, Vec3::new(x, y, 0.0))
    }
}

fn build_paths() -> TaxiPathTable {
    // Path 0 — the ferry: mainland pier → open water → island pier, docking
    // 10 s at each end.
    let ferry = vec![
        dock(MAINLAND, 0.0, 0.0, 10, 100),
        TaxiPathNode::waypoint(MAINLAND, Vec3::new(80.0, 20.0, 0.0)),
        TaxiPathNode::waypoint(MAINLAND, Vec3::new(160.0, 40.0, 0.0)),
        dock(MAINLAND, 240.0, 40.0, 10, 102),
        dock(ISLAND, 1000.0, 0.0, 10, 104),
        TaxiPathNode::waypoint(ISLAND, Vec3::new(1080.0, -20.0, 0.0)),
        dock(ISLAND, 1160.0, -20.0, 10, 106),
    ];

    // Path 1 — the tram: a closed square around the plaza.
    let tram = vec![
        TaxiPathNode::waypoint(MAINLAND, Vec3::new(-200.0, -200.0, 5.0)),
        TaxiPathNode::waypoint(MAINLAND, Vec3::new(-100.0, -200.0, 5.0)),
        TaxiPathNode::waypoint(MAINLAND, Vec3::new(-100.0, -100.0, 5.0)),
        TaxiPathNode::waypoint(MAINLAND, Vec3::new(-200.0, -100.0, 5.0)),
    ];

    TaxiPathTable::new(vec![ferry, tram])
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    println!("=== harbor — rust_mot transport subsystem ===");
    println!("Maps: mainland + island  |  Transports: ferry (2-map), tram (1-map)");
    println!();

    // 1. Static data: templates and taxi paths.
    let mut catalog = TemplateCatalog::new();
    catalog.insert(GameObjectTemplate::transport(FERRY, "Harbor Ferry", PathId(0), 16.0));
    catalog.insert(GameObjectTemplate::transport(TRAM, "Plaza Tram", PathId(1), 8.0));
    let paths = build_paths();

    // 2. Compile routes and start the carriers.
    let registry = RouteRegistry::load(&catalog, &paths);
    for entry in [FERRY, TRAM] {
        let route = registry.get_route(entry).unwrap();
        println!(
            "{}: {} segment(s), period {:.1} s, cyclic: {}",
            catalog.get(entry).unwrap().name,
            route.segments.len(),
            route.period_ms as f32 / 1000.0,
            route.is_cyclic,
        );
    }
    println!();

    let mut world = HarborWorld::default();
    world.maps.insert(MAINLAND);
    let mut service = TransportService::new(registry);
    let started = service.spawn_continents(&mut world);
    println!("Started {started} carriers");

    // 3. Board the ferry: a player near the bow, a deckhand NPC at the
    //    stern.  The deckhand will be released at the map boundary.
    let ferry_guid = service.carrier_guid(FERRY).unwrap();
    service.board(&mut world, ferry_guid, PLAYER, PassengerKind::Player, Position::new(2.0, 1.0, 1.0, 0.0))?;
    service.board(&mut world, ferry_guid, DECKHAND, PassengerKind::Creature, Position::new(-4.0, 0.0, 1.0, 0.0))?;
    println!("Boarded player {PLAYER} and deckhand {DECKHAND}");
    println!();

    // 4. Run both map loops for a few minutes of simulated time.
    let mut crossings = 0;
    let mut last_map = service.current_map(FERRY).unwrap();
    for _ in 0..(SIM_SECS * 1000 / TICK_MS) {
        service.tick_map(&mut world, MAINLAND, TICK_MS);
        service.tick_map(&mut world, ISLAND, TICK_MS);

        let now = service.current_map(FERRY).unwrap();
        if now != last_map {
            crossings += 1;
            println!(
                "Ferry crossed to map {} (player now on map {} at {})",
                now.0, world.player_map.0, world.player_pos
            );
            last_map = now;
        }
    }
    println!();

    // 5. Summary.
    let ferry_now = service.carrier(service.carrier_guid(FERRY).unwrap()).unwrap();
    let tram_now = service.carrier(service.carrier_guid(TRAM).unwrap()).unwrap();
    println!("Simulated {SIM_SECS} s in {TICK_MS} ms ticks");
    println!("  ferry crossings      : {crossings}");
    println!("  player teleports     : {}", world.teleports);
    println!("  deckhands released   : {}", world.dropped_npcs);
    println!("  node events observed : {}", world.events_seen);
    println!("  ferry position       : map {} {}", ferry_now.map_id.0, ferry_now.position);
    println!("  tram position        : map {} {}", tram_now.map_id.0, tram_now.position);

    // 6. Disembark before shutdown; carriers must be empty when dropped.
    service.unboard(&mut world, PLAYER);
    service.unboard(&mut world, DECKHAND);

    Ok(())
}

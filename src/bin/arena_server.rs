//! Minimal arena driver: seeds an in-memory schedule, ticks the arena on
//! an interval, and logs phase transitions. Stands in for the full
//! field-management deployment while developing against real driver
//! stations.

use std::time::Instant;

use tokio::time::{interval, Duration};
use tracing::info;

use field_arena::{
    Arena, EventSettings, EventStore, FieldNetwork, Match, MatchType, MemoryStore, StationId, Team,
};

const TICK_PERIOD_MS: u64 = 10;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut store = MemoryStore::new();
    for id in [254, 1114, 118, 33, 971, 148] {
        store.create_team(Team::with_id(id)).expect("seed team");
    }
    let practice = store
        .create_match(Match {
            match_type: MatchType::Practice,
            display_name: "1".to_string(),
            red1: 254,
            red2: 1114,
            red3: 118,
            blue1: 33,
            blue2: 971,
            blue3: 148,
            ..Match::default()
        })
        .expect("seed match");

    let settings = EventSettings::default();
    let network = FieldNetwork::new(&settings);
    let mut arena = Arena::with_network(store, settings, Box::new(network));
    arena.load_match(&practice).expect("load practice match");

    // Operatorless demo: bypass every station so the match can start.
    for id in StationId::ALL {
        arena.station_mut(id).bypass = true;
    }

    let epoch = Instant::now();
    let now_ms = || epoch.elapsed().as_millis() as u64;

    arena.start_match(now_ms()).expect("start match");
    info!(match_id = arena.current_match().id, "match running");

    let mut ticker = interval(Duration::from_millis(TICK_PERIOD_MS));
    let mut last_phase = arena.state();
    loop {
        ticker.tick().await;
        let now = now_ms();
        arena.update(now);

        let phase = arena.state();
        if phase != last_phase {
            info!(
                phase = phase.as_str(),
                t_sec = arena.match_time_sec(now).unwrap_or(0),
                "phase"
            );
            last_phase = phase;
        }
        if phase == field_arena::MatchPhase::PostMatch {
            info!("match complete");
            break;
        }
    }
}

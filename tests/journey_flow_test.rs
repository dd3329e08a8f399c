//! End-to-end journey scenarios through the full engine.
//!
//! Each test wires a real `JourneyManager` over in-memory fakes and
//! walks a complete user scenario: itinerary arrival/departure with
//! hysteresis, starting inside a zone, and recovery of offline events
//! over both reconnect and restart.

mod helpers;

use beacon_core::geofence::{Geofence, RegionSignal, TransitionKind};
use beacon_core::journey::{JourneyConfig, JourneyStatus};
use beacon_core::location::LocationFix;

use helpers::{engine_with_zones, lat_offset, zone};

fn itinerary(ids: &[&str]) -> JourneyConfig {
    let mut config = JourneyConfig::new("Walk home", "Home");
    config.waypoint_geofence_ids = ids.iter().map(|s| (*s).to_string()).collect();
    config
}

#[tokio::test]
async fn full_walk_with_arrival_and_departure() {
    let pharmacy = zone("geofence_1_pharmacy", "Pharmacy", 41.0, 29.0);
    let engine = engine_with_zones(vec![pharmacy], 41.1, 29.1);

    let journey = engine
        .manager
        .create(itinerary(&["geofence_1_pharmacy"]))
        .await
        .unwrap();
    engine.manager.start(&journey.id).await.unwrap();
    assert_eq!(
        *engine.monitor.registered.lock().unwrap(),
        vec!["geofence_1_pharmacy".to_string()]
    );

    // Approach: the OS fires Enter at the nominal radius; 85 m is
    // still outside the 80 m trigger band, so nothing commits.
    let marginal = LocationFix::new(41.0 + lat_offset(85.0), 29.0).unwrap();
    assert!(engine
        .manager
        .handle_region_signal(
            &journey.id,
            "geofence_1_pharmacy",
            RegionSignal::Enter,
            &marginal,
        )
        .await
        .unwrap()
        .is_none());

    // 70 m in: arrival commits, the contact alert fires, the event
    // reaches the remote store.
    let inside = LocationFix::new(41.0 + lat_offset(70.0), 29.0).unwrap();
    let arrival = engine
        .manager
        .handle_region_signal(
            &journey.id,
            "geofence_1_pharmacy",
            RegionSignal::Enter,
            &inside,
        )
        .await
        .unwrap()
        .expect("arrival commits");
    assert_eq!(arrival.kind, TransitionKind::Arrival);
    assert!(arrival.synced);
    assert_eq!(engine.remote.event_count(), 1);
    assert_eq!(engine.sink.alerts.lock().unwrap().len(), 1);

    // Leaving: 110 m is within the 120 m departure band, suppressed;
    // 130 m commits.
    let near_edge = LocationFix::new(41.0 + lat_offset(110.0), 29.0).unwrap();
    assert!(engine
        .manager
        .handle_region_signal(
            &journey.id,
            "geofence_1_pharmacy",
            RegionSignal::Exit,
            &near_edge,
        )
        .await
        .unwrap()
        .is_none());

    let away = LocationFix::new(41.0 + lat_offset(130.0), 29.0).unwrap();
    let departure = engine
        .manager
        .handle_region_signal(
            &journey.id,
            "geofence_1_pharmacy",
            RegionSignal::Exit,
            &away,
        )
        .await
        .unwrap()
        .expect("departure commits");
    assert_eq!(departure.kind, TransitionKind::Departure);

    let done = engine.manager.stop(&journey.id, true).await.unwrap();
    assert_eq!(done.status, JourneyStatus::Completed);
    let waypoint = &done.waypoints[0];
    assert!(waypoint.arrived && waypoint.departed);
    assert!(waypoint.arrival_time.unwrap() <= waypoint.departure_time.unwrap());
    assert_eq!(done.events.len(), 2);

    // The final summary mirror carries the terminal status.
    let journeys = engine.remote.journeys.lock().unwrap();
    assert_eq!(journeys.last().unwrap().1.status, JourneyStatus::Completed);
}

#[tokio::test]
async fn journey_started_inside_a_zone_only_departs() {
    // A 500 m home zone; the walk starts 300 m from its center.
    let home = Geofence {
        radius_m: 500.0,
        ..zone("geofence_1_home", "Home", 41.0, 29.0)
    };
    let engine = engine_with_zones(vec![home], 41.0 + lat_offset(300.0), 29.0);

    let journey = engine
        .manager
        .create(itinerary(&["geofence_1_home"]))
        .await
        .unwrap();
    engine.manager.start(&journey.id).await.unwrap();

    // The OS reports Enter for the zone the user already occupies;
    // the seeded state swallows it.
    let here = engine.provider.current();
    assert!(engine
        .manager
        .handle_region_signal(&journey.id, "geofence_1_home", RegionSignal::Enter, &here)
        .await
        .unwrap()
        .is_none());

    // Walking 600 m out clears the 1.2 * 500 m departure band.
    let away = LocationFix::new(41.0 + lat_offset(650.0), 29.0).unwrap();
    let departure = engine
        .manager
        .handle_region_signal(&journey.id, "geofence_1_home", RegionSignal::Exit, &away)
        .await
        .unwrap()
        .expect("departure commits");
    assert_eq!(departure.kind, TransitionKind::Departure);

    let journey = engine.manager.journey(&journey.id).unwrap();
    assert!(!journey.waypoints[0].arrived);
    assert!(journey.waypoints[0].departed);
}

#[tokio::test]
async fn ordered_itinerary_tracks_each_waypoint_independently() {
    let pharmacy = zone("geofence_1_pharmacy", "Pharmacy", 41.0, 29.0);
    let park = zone("geofence_2_park", "Park", 41.1, 29.0);
    let engine = engine_with_zones(vec![pharmacy, park], 40.9, 29.0);

    let journey = engine
        .manager
        .create(itinerary(&["geofence_1_pharmacy", "geofence_2_park"]))
        .await
        .unwrap();
    assert_eq!(journey.waypoints[0].order, 0);
    assert_eq!(journey.waypoints[1].order, 1);
    engine.manager.start(&journey.id).await.unwrap();

    let at_pharmacy = LocationFix::new(41.0 + lat_offset(50.0), 29.0).unwrap();
    engine
        .manager
        .handle_region_signal(
            &journey.id,
            "geofence_1_pharmacy",
            RegionSignal::Enter,
            &at_pharmacy,
        )
        .await
        .unwrap()
        .expect("pharmacy arrival");

    let journey = engine.manager.journey(&journey.id).unwrap();
    assert!(journey.waypoints[0].arrived);
    assert!(!journey.waypoints[1].arrived, "park is untouched");
}

#[tokio::test]
async fn reconnect_flush_delivers_events_recorded_offline() {
    let pharmacy = zone("geofence_1_pharmacy", "Pharmacy", 41.0, 29.0);
    let engine = engine_with_zones(vec![pharmacy], 41.1, 29.1);

    let journey = engine
        .manager
        .create(itinerary(&["geofence_1_pharmacy"]))
        .await
        .unwrap();
    engine.manager.start(&journey.id).await.unwrap();

    // The network drops out entirely; an arrival still commits locally
    // and the failed push lands in the delivery queue.
    engine.connectivity.set_online(false);
    engine.remote.set_failing(true);
    let inside = LocationFix::new(41.0 + lat_offset(70.0), 29.0).unwrap();
    let arrival = engine
        .manager
        .handle_region_signal(
            &journey.id,
            "geofence_1_pharmacy",
            RegionSignal::Enter,
            &inside,
        )
        .await
        .unwrap()
        .expect("arrival commits locally");
    assert!(!arrival.synced);
    assert_eq!(engine.remote.event_count(), 0);
    assert_eq!(engine.manager.queue().len().unwrap(), 1);

    // Connectivity returns mid-session; the reconnect flush pushes the
    // queued event without a restart.
    engine.remote.set_failing(false);
    engine.connectivity.set_online(true);
    let outcome = engine.manager.queue().flush().await.unwrap();
    assert_eq!(outcome.processed, 1);
    assert!(engine.manager.queue().is_empty().unwrap());
    assert_eq!(engine.remote.event_count(), 1);

    // Delivery marked the journal copy synced, so nothing replays later.
    let events = engine.manager.journal().events(&journey.id).unwrap();
    assert!(events.iter().all(|e| e.synced));
}

#[tokio::test]
async fn restart_replays_events_recorded_offline() {
    let pharmacy = zone("geofence_1_pharmacy", "Pharmacy", 41.0, 29.0);
    let engine = engine_with_zones(vec![pharmacy.clone()], 41.1, 29.1);

    let journey = engine
        .manager
        .create(itinerary(&["geofence_1_pharmacy"]))
        .await
        .unwrap();
    engine.manager.start(&journey.id).await.unwrap();

    // The remote goes dark; an arrival still commits locally.
    engine.remote.set_failing(true);
    let inside = LocationFix::new(41.0 + lat_offset(70.0), 29.0).unwrap();
    let arrival = engine
        .manager
        .handle_region_signal(
            &journey.id,
            "geofence_1_pharmacy",
            RegionSignal::Enter,
            &inside,
        )
        .await
        .unwrap()
        .expect("arrival commits locally");
    assert!(!arrival.synced);
    assert_eq!(engine.remote.event_count(), 0);

    // Process restart with the network back: a fresh manager over the
    // same store resumes the journey and delivers the pending event.
    engine.remote.set_failing(false);
    let reborn = helpers::restart(&engine, vec![pharmacy]);

    let restored = reborn
        .manager
        .resume()
        .await
        .unwrap()
        .expect("active journey restored");
    assert_eq!(restored.id, journey.id);
    assert_eq!(engine.remote.event_count(), 1);

    // The recovered event is marked synced in the journal.
    let events = reborn.manager.journal().events(&journey.id).unwrap();
    assert!(events.iter().all(|e| e.synced));

    // A committed arrival is not re-fired after restart.
    let event = reborn
        .manager
        .handle_region_signal(
            &journey.id,
            "geofence_1_pharmacy",
            RegionSignal::Enter,
            &inside,
        )
        .await
        .unwrap();
    assert!(event.is_none());
}

use albion_transit::{
    config::Config,
    pathfinder::RoutePreferences,
    route::{RouteService, RouteType, validate_route},
};
use std::path::PathBuf;

fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/dataset")
}

fn load_service() -> RouteService {
    let (service, errors) = RouteService::load(&fixture_root(), Config::default());
    assert!(errors.is_empty(), "fixture dataset should load cleanly: {errors:?}");
    service
}

#[test]
fn loads_stations_and_lines_from_the_fixture_dataset() {
    let service = load_service();
    let repo = service.repository();
    assert_eq!(repo.line_count(), 5);
    assert_eq!(repo.station_count(), 16);
    assert!(repo.station("Reading").unwrap().is_interchange());
}

#[test]
fn finds_a_direct_route_along_a_single_line() {
    let service = load_service();
    let preferences = RoutePreferences::default();
    let route = service
        .calculate_route("London Paddington", "Bristol Temple Meads", None, &preferences)
        .expect("a route should exist between these stations");

    assert_eq!(route.route_type, RouteType::Direct);
    assert_eq!(route.changes_required(), 0);
    assert!(validate_route(&route).is_empty());
}

#[test]
fn finds_an_interchange_route_across_two_lines() {
    let service = load_service();
    let preferences = RoutePreferences::default();
    let route = service
        .calculate_route("London Paddington", "Redhill", None, &preferences)
        .expect("a route should exist via Reading");

    assert_eq!(route.changes_required(), 1);
    assert!(route.segments.iter().any(|s| s.line_name.as_ref() == "North Downs Line"));

    let segment_time: f64 = route.segments.iter().filter_map(|s| s.time_min).sum();
    assert_eq!(route.total_time_min, Some(segment_time));
    assert!(validate_route(&route).is_empty());
}

#[test]
fn rejects_routes_needing_more_changes_than_allowed() {
    let service = load_service();
    let preferences = RoutePreferences::default();
    let route = service.calculate_route("London Paddington", "Redhill", Some(0), &preferences);
    assert!(route.is_none());
}

#[test]
fn finds_possible_destinations_within_a_change_budget() {
    let service = load_service();
    let destinations = service.get_possible_destinations("Reading", 0);
    let names: Vec<&str> = destinations.iter().map(|s| s.as_ref()).collect();
    assert!(names.contains(&"London Paddington"));
    assert!(names.contains(&"Bristol Temple Meads"));
}

#[test]
fn avoiding_a_station_forces_a_different_path() {
    let service = load_service();
    let preferences = RoutePreferences::default();
    let route = service
        .find_routes_avoiding_station("London Paddington", "Bristol Temple Meads", "Reading", &preferences);
    assert!(route.is_none(), "Reading is the only link to Bristol in this fixture");
}

#[test]
fn direct_routes_are_reported_per_shared_line() {
    let service = load_service();
    let routes = service.find_direct_routes("Reading", "Guildford");
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].segments[0].line_name.as_ref(), "North Downs Line");
}

#[test]
fn direct_route_along_the_south_western_main_line() {
    let service = load_service();
    let preferences = RoutePreferences::default();
    let route = service
        .calculate_route("Fleet", "London Waterloo", None, &preferences)
        .expect("Fleet and Waterloo share the South Western Main Line");

    assert_eq!(route.changes_required(), 0);
    assert!(route.total_time_min.is_some());
    assert!(route.total_distance_km.is_some());
    let full_path = route.full_path.as_ref().expect("direct routes report a full path");
    assert!(full_path.iter().any(|s| s.as_ref() == "Clapham Junction"));
    assert!(route.segments.iter().all(|s| s.line_name.as_ref() != "WALKING"));
}

#[test]
fn waterloo_and_clapham_junction_never_get_a_walking_edge_despite_proximity() {
    let service = load_service();
    let preferences = RoutePreferences::default();
    let route = service
        .calculate_route("London Waterloo", "Clapham Junction", None, &preferences)
        .expect("they share the South Western Main Line");

    assert_eq!(route.segments.len(), 1);
    assert_ne!(route.segments[0].line_name.as_ref(), "WALKING");
}

#[test]
fn reload_clears_the_route_cache() {
    let service = load_service();
    let preferences = RoutePreferences::default();
    let first = service.calculate_route("London Paddington", "Reading", None, &preferences);
    assert!(first.is_some());
    service.clear_caches();
    let second = service.calculate_route("London Paddington", "Reading", None, &preferences);
    assert_eq!(first.unwrap().total_time_min, second.unwrap().total_time_min);
}

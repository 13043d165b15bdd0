use albion_transit::{
    repository::Repository,
    route::model::{RouteType, ServicePattern},
    underground::{blackbox, System},
    walking,
};
use std::path::PathBuf;

fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/dataset")
}

fn load_repo() -> Repository {
    let (repo, errors) = Repository::load(&fixture_root());
    assert!(errors.is_empty(), "fixture dataset should load cleanly: {errors:?}");
    repo
}

#[test]
fn should_use_black_box_for_two_stations_on_the_same_underground_system() {
    let repo = load_repo();
    assert!(blackbox::should_use_black_box(
        &repo.underground,
        &repo,
        "Covent Garden",
        "King's Cross St Pancras"
    ));
}

#[test]
fn should_use_black_box_when_the_target_is_underground_only() {
    let repo = load_repo();
    assert!(blackbox::should_use_black_box(
        &repo.underground,
        &repo,
        "London Waterloo",
        "Covent Garden"
    ));
}

#[test]
fn should_not_use_black_box_between_two_unrelated_national_rail_stations() {
    let repo = load_repo();
    assert!(!blackbox::should_use_black_box(
        &repo.underground,
        &repo,
        "Fleet",
        "Southampton Central"
    ));
}

#[test]
fn black_box_route_covent_garden_to_kings_cross_is_a_single_underground_segment() {
    let repo = load_repo();
    let from_coord = repo.station("Covent Garden").and_then(|s| s.coordinate);
    let to_coord = repo.station("King's Cross St Pancras").and_then(|s| s.coordinate);

    let route = blackbox::create_black_box_route(
        &repo.underground,
        System::London,
        "Covent Garden",
        "King's Cross St Pancras",
        from_coord,
        to_coord,
    );

    assert_eq!(route.segments.len(), 1);
    assert_eq!(route.route_type, RouteType::Direct);
    assert_eq!(route.changes_required(), 0);
    assert_eq!(route.segments[0].service_pattern, Some(ServicePattern::Underground));
    let time = route.total_time_min.expect("black box routes always report a duration");
    assert!((10.0..=40.0).contains(&time), "London tube time {time} out of range");
}

#[test]
fn cross_country_route_stitches_hillhead_to_southampton_via_two_london_termini() {
    let repo = load_repo();
    assert!(blackbox::is_cross_country(
        "Hillhead",
        "Southampton Central",
        None,
        repo.station("Southampton Central").and_then(|s| s.coordinate),
    ));

    let route = blackbox::create_cross_country_route(&repo.underground, &repo, "Hillhead", "Southampton Central");

    // Stitched as: Hillhead -(Glasgow Subway)-> Glasgow Central -(trunk)->
    // London King's Cross -(Underground bridge)-> London Waterloo -(trunk)->
    // Southampton Central. Southampton Central has no underground system of
    // its own, so unlike the London/Glasgow end this closing segment is
    // National Rail, not `UNDERGROUND` -- the route still crosses London
    // by tube in the middle, just not at both physical ends.
    assert!(route.segments.len() >= 4);
    assert!(route.changes_required() >= 3);

    let underground_segments = route
        .segments
        .iter()
        .filter(|s| s.service_pattern == Some(ServicePattern::Underground))
        .count();
    assert!(underground_segments >= 1);

    let full_path = route.full_path.expect("cross-country routes report a full path");
    assert!(full_path.iter().any(|s| s.as_ref() == "Glasgow Central"));
    assert!(full_path.iter().any(|s| s.as_ref() == "London Waterloo"));
    assert_eq!(full_path.first().unwrap().as_ref(), "Hillhead");
    assert_eq!(full_path.last().unwrap().as_ref(), "Southampton Central");
}

#[test]
fn enhance_route_with_black_box_collapses_underground_only_legs() {
    let repo = load_repo();
    let route = blackbox::create_cross_country_route(&repo.underground, &repo, "Hillhead", "Southampton Central");
    let segments_before = route.segments.len();

    let enhanced = blackbox::enhance_route_with_black_box(&repo.underground, &repo, route);

    // The cross-country builder already emits a single merged `UNDERGROUND`
    // segment per tube leg, so enhancement shouldn't need to merge further,
    // but it must still recompute `route_type` from the (possibly reduced)
    // segment count and keep the endpoints in `full_path`.
    assert!(enhanced.segments.len() <= segments_before);
    assert_eq!(enhanced.route_type, RouteType::classify(enhanced.segments.len()));
    let full_path = enhanced.full_path.expect("full path survives enhancement");
    assert_eq!(full_path.first().unwrap().as_ref(), "Hillhead");
    assert_eq!(full_path.last().unwrap().as_ref(), "Southampton Central");
}

#[test]
fn admits_walking_edge_allows_a_close_unconnected_pair() {
    let repo = load_repo();
    assert!(walking::admits_walking_edge(
        &repo,
        &repo.underground,
        "Farnborough North",
        "Farnborough (Main)",
        1000.0,
    ));
}

#[test]
fn admits_walking_edge_rejects_a_non_terminal_london_station() {
    let repo = load_repo();
    assert!(!walking::admits_walking_edge(
        &repo,
        &repo.underground,
        "London Blackfriars",
        "Clapham Junction",
        1000.0,
    ));
}

#[test]
fn admits_walking_edge_rejects_two_london_terminals() {
    let repo = load_repo();
    assert!(!walking::admits_walking_edge(
        &repo,
        &repo.underground,
        "London Waterloo",
        "London Victoria",
        1000.0,
    ));
}

#[test]
fn admits_walking_edge_rejects_a_pair_outside_the_distance_bound() {
    let repo = load_repo();
    assert!(!walking::admits_walking_edge(
        &repo,
        &repo.underground,
        "Farnborough (Main)",
        "Southampton Central",
        1000.0,
    ));
}

#[test]
fn admits_walking_edge_rejects_a_pair_already_sharing_a_line() {
    let repo = load_repo();
    assert!(!walking::admits_walking_edge(
        &repo,
        &repo.underground,
        "Farnborough (Main)",
        "Fleet",
        10_000.0,
    ));
}

#[test]
fn admits_walking_edge_rejects_a_declared_zero_distance_direct_connection() {
    let repo = load_repo();
    assert!(!walking::admits_walking_edge(
        &repo,
        &repo.underground,
        "Farnborough North",
        "Woking",
        20_000.0,
    ));
}

#[test]
fn admits_walking_edge_rejects_a_through_service_pair() {
    let repo = load_repo();
    assert!(!walking::admits_walking_edge(
        &repo,
        &repo.underground,
        "Ash Vale",
        "Bentley",
        5_000.0,
    ));
}

#[test]
fn admits_walking_edge_rejects_a_same_physical_train_pair() {
    let repo = load_repo();
    // Woking and Waterloo are both in the hard-coded same-physical-train
    // list and already share the South Western Main Line, so rule 3 (no
    // shared line) fires before rule 6 ever gets consulted -- the outcome
    // is still the one rule 6 exists to guarantee.
    assert!(!walking::admits_walking_edge(
        &repo,
        &repo.underground,
        "Woking",
        "London Waterloo",
        50_000.0,
    ));
}

//! Black-box underground routing and the cross-country stitching strategy,
//! per SPEC_FULL.md §4.3. The underground network is treated as opaque by
//! design (§9 Design Notes) -- individual lines are never modelled.

use super::{Classification, System, UndergroundSystems};
use crate::{
    repository::Repository,
    route::model::{Route, RouteSegment, RouteType, ServicePattern},
    shared::Coordinate,
};
use std::sync::Arc;

/// Fallback distance (km) used when neither endpoint has a known
/// coordinate -- a coarse system-characteristic journey length.
fn fallback_distance_km(system: System) -> f64 {
    match system {
        System::London => 8.0,
        System::Glasgow => 5.0,
        System::TyneAndWear => 10.0,
    }
}

pub fn classify(systems: &UndergroundSystems, repo: &Repository, name: &str) -> Classification {
    systems.classify(name, |n| repo.station(n).is_some())
}

/// `should_use_black_box(from, to)`, SPEC_FULL.md §4.3.
pub fn should_use_black_box(systems: &UndergroundSystems, repo: &Repository, from: &str, to: &str) -> bool {
    let from_class = classify(systems, repo, from);
    let to_class = classify(systems, repo, to);

    let from_national_rail = repo.station(from).is_some();
    let to_national_rail = repo.station(to).is_some();

    if let Some(to_system) = to_class.system() {
        if matches!(to_class, Classification::Mixed(_))
            && systems.is_terminal(to_system, to)
            && from_national_rail
            && to_national_rail
        {
            return false;
        }
    }

    match (from_class, to_class) {
        (a, b) if a.system().is_some() && a.system() == b.system() => true,
        (_, b) if b.is_underground_only() => true,
        (a, Classification::Neither) if a.is_underground() => {
            a.is_underground_only() || to_national_rail
        }
        _ => false,
    }
}

/// `create_black_box_route`, SPEC_FULL.md §4.3.
pub fn create_black_box_route(
    systems: &UndergroundSystems,
    system: System,
    from: &str,
    to: &str,
    from_coord: Option<Coordinate>,
    to_coord: Option<Coordinate>,
) -> Route {
    let distance_km = match (from_coord, to_coord) {
        (Some(a), Some(b)) => a.haversine_distance(&b).as_kilometers(),
        _ => fallback_distance_km(system),
    };
    let (min_minutes, max_minutes) = system.time_range_min();
    let raw_minutes = distance_km / system.mean_speed_kmh() * 60.0;
    let time_min = raw_minutes.clamp(min_minutes, max_minutes);

    let line_name: Arc<str> = systems
        .system_name(system)
        .unwrap_or("Underground")
        .into();

    let segment = RouteSegment {
        from_station: from.into(),
        to_station: to.into(),
        line_name,
        distance_km: Some(distance_km),
        time_min: Some(time_min),
        service_pattern: Some(ServicePattern::Underground),
    };

    Route {
        from_station: from.into(),
        to_station: to.into(),
        total_distance_km: segment.distance_km,
        total_time_min: segment.time_min,
        route_type: RouteType::Direct,
        full_path: Some(vec![from.into(), to.into()]),
        segments: vec![segment],
    }
}

const SCOTLAND_KEYWORDS: &[&str] = &[
    "glasgow",
    "edinburgh",
    "aberdeen",
    "dundee",
    "inverness",
    "stirling",
    "hillhead",
];
const SOUTH_ENGLAND_KEYWORDS: &[&str] = &[
    "southampton",
    "portsmouth",
    "brighton",
    "bournemouth",
    "exeter",
    "plymouth",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Scotland,
    SouthEngland,
    Other,
}

fn region_of(name: &str, coord: Option<Coordinate>) -> Region {
    let lower = name.to_lowercase();
    if SCOTLAND_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return Region::Scotland;
    }
    if SOUTH_ENGLAND_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return Region::SouthEngland;
    }
    match coord {
        Some(c) if c.lat > 55.0 => Region::Scotland,
        Some(c) if c.lat < 51.5 => Region::SouthEngland,
        _ => Region::Other,
    }
}

/// Main National Rail terminals for a coarse region, ported from
/// `_get_region_terminals`.
fn region_terminals(region: Region) -> &'static [&'static str] {
    match region {
        Region::SouthEngland => &[
            "London Waterloo",
            "London Paddington",
            "London Victoria",
            "London Liverpool Street",
            "London Bridge",
            "London Euston",
            "London King's Cross",
            "London St Pancras International",
        ],
        Region::Scotland => &[
            "Glasgow Central",
            "Edinburgh Waverley",
            "Glasgow Queen Street",
            "Aberdeen",
            "Inverness",
        ],
        Region::Other => &["London Waterloo"],
    }
}

/// Picks the terminal from `terminals` best suited to reach `station`:
/// `station` itself if it already is one, else the first terminal sharing a
/// line with it, else the region's first terminal. Ported from
/// `_find_best_terminus_for_station`.
fn find_best_terminus_for_station<'a>(repo: &Repository, station: &str, terminals: &'a [&'a str]) -> &'a str {
    if let Some(&terminus) = terminals.iter().find(|t| t.eq_ignore_ascii_case(station)) {
        return terminus;
    }
    for &terminus in terminals {
        if !repo.common_lines(station, terminus).is_empty() {
            return terminus;
        }
    }
    terminals.first().copied().unwrap_or("London Waterloo")
}

/// Whether `from`/`to` sit in disjoint coarse regions, warranting the
/// stitched cross-country strategy rather than a plain black-box route.
pub fn is_cross_country(from: &str, to: &str, from_coord: Option<Coordinate>, to_coord: Option<Coordinate>) -> bool {
    matches!(
        (region_of(from, from_coord), region_of(to, to_coord)),
        (Region::Scotland, Region::SouthEngland) | (Region::SouthEngland, Region::Scotland)
    )
}

fn trunk_line_for(from: &str, to: &str) -> &'static str {
    let lower = format!("{from} {to}").to_lowercase();
    if lower.contains("cambridge") || lower.contains("norwich") || lower.contains("king's cross") {
        "East Coast Main Line"
    } else if lower.contains("bristol") || lower.contains("cardiff") || lower.contains("paddington") {
        "Great Western Main Line"
    } else if lower.contains("southampton") || lower.contains("waterloo") {
        "South Western Main Line"
    } else {
        "West Coast Main Line"
    }
}

const TRUNK_SPEED_KMH: f64 = 110.0;

/// Stitches **origin-underground -> origin-terminus -> National-Rail-trunk
/// -> London-terminus -> London-Underground -> London-terminus ->
/// National-Rail-trunk -> destination-terminus -> destination-underground**,
/// omitting any segment whose endpoints coincide (SPEC_FULL.md §4.3).
pub fn create_cross_country_route(
    systems: &UndergroundSystems,
    repo: &Repository,
    from: &str,
    to: &str,
) -> Route {
    let from_class = classify(systems, repo, from);
    let to_class = classify(systems, repo, to);
    let from_coord = repo.station(from).and_then(|s| s.coordinate);
    let to_coord = repo.station(to).and_then(|s| s.coordinate);

    let origin_terminus = find_best_terminus_for_station(repo, from, region_terminals(region_of(from, from_coord)));
    let destination_terminus = find_best_terminus_for_station(repo, to, region_terminals(region_of(to, to_coord)));
    let london_terminus_out = "London King's Cross";
    let london_terminus_in = "London Waterloo";

    let mut segments = Vec::new();

    if from != origin_terminus {
        match from_class.system() {
            Some(system) => {
                let r = create_black_box_route(systems, system, from, origin_terminus, from_coord, None);
                segments.extend(r.segments);
            }
            None => segments.push(trunk_segment(from, origin_terminus)),
        }
    }

    if origin_terminus != london_terminus_out {
        segments.push(trunk_segment(origin_terminus, london_terminus_out));
    }

    if london_terminus_out != london_terminus_in {
        segments.push(RouteSegment {
            from_station: london_terminus_out.into(),
            to_station: london_terminus_in.into(),
            line_name: "London Underground".into(),
            distance_km: Some(5.0),
            time_min: Some(20.0),
            service_pattern: Some(ServicePattern::Underground),
        });
    }

    if london_terminus_in != destination_terminus {
        segments.push(trunk_segment(london_terminus_in, destination_terminus));
    }

    if destination_terminus != to {
        match to_class.system() {
            Some(system) => {
                let r = create_black_box_route(systems, system, destination_terminus, to, None, to_coord);
                segments.extend(r.segments);
            }
            None => segments.push(trunk_segment(destination_terminus, to)),
        }
    }

    let total_distance_km = segments.iter().filter_map(|s| s.distance_km).sum::<f64>();
    let total_time_min = segments.iter().filter_map(|s| s.time_min).sum::<f64>();
    let route_type = RouteType::classify(segments.len());
    let full_path = segments
        .first()
        .map(|first| {
            let mut path = vec![first.from_station.clone()];
            path.extend(segments.iter().map(|s| s.to_station.clone()));
            path
        });

    Route {
        from_station: from.into(),
        to_station: to.into(),
        total_distance_km: Some(total_distance_km),
        total_time_min: Some(total_time_min),
        route_type,
        full_path,
        segments,
    }
}

fn trunk_segment(from: &str, to: &str) -> RouteSegment {
    let line_name = trunk_line_for(from, to);
    RouteSegment {
        from_station: from.into(),
        to_station: to.into(),
        line_name: line_name.into(),
        distance_km: None,
        time_min: None,
        service_pattern: None,
    }
}

/// `enhance_route_with_black_box`, SPEC_FULL.md §4.3: any segment whose
/// endpoints involve an underground-only station collapses to a single
/// `UNDERGROUND` segment, then underground-only interior stations are
/// stripped from `full_path`.
pub fn enhance_route_with_black_box(systems: &UndergroundSystems, repo: &Repository, mut route: Route) -> Route {
    let is_underground_only = |name: &str| classify(systems, repo, name).is_underground_only();

    let mut enhanced: Vec<RouteSegment> = Vec::with_capacity(route.segments.len());
    for segment in route.segments.drain(..) {
        let touches_underground_only =
            is_underground_only(&segment.from_station) || is_underground_only(&segment.to_station);
        if !touches_underground_only {
            enhanced.push(segment);
            continue;
        }
        let merges_with_last = enhanced
            .last()
            .is_some_and(|last| matches!(last.service_pattern, Some(ServicePattern::Underground)));
        if merges_with_last {
            let last = enhanced.last_mut().expect("checked above");
            last.to_station = segment.to_station;
            last.distance_km = add_opt(last.distance_km, segment.distance_km);
            last.time_min = add_opt(last.time_min, segment.time_min);
        } else {
            enhanced.push(RouteSegment {
                service_pattern: Some(ServicePattern::Underground),
                ..segment
            });
        }
    }
    route.segments = enhanced;

    if let Some(path) = route.full_path.take() {
        route.full_path = Some(
            path.into_iter()
                .filter(|s| !is_underground_only(s) || s.as_ref() == route.from_station.as_ref() || s.as_ref() == route.to_station.as_ref())
                .collect(),
        );
    }
    route.route_type = RouteType::classify(route.segments.len());
    route
}

fn add_opt(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a + b),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

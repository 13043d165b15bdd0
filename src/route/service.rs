//! `RouteService`: the top-level orchestrator, per SPEC_FULL.md §4.8. Single-
//! threaded by design (§5) -- caches are plain `RefCell` cells behind one
//! owning value, not `Arc<Mutex<_>>>`; `RouteService` is simply not `Sync`.

use super::{
    converter,
    model::{Route, RouteSegment, RouteType, ServicePattern},
};
use crate::{
    config::Config,
    error::DatasetLoadError,
    graph::{self, Edge, EdgeKind, NetworkGraph},
    normalizer::StationNameNormalizer,
    pathfinder::{self, RoutePreferences, WeightMode},
    repository::{RailwayLine, Repository},
    underground::blackbox,
};
use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    path::Path,
    sync::Arc,
    time::Instant,
};
use tracing::{debug, warn};

type CacheKey = (Arc<str>, Arc<str>, u8, bool, bool, bool, u64, u64);

fn mode_key(mode: WeightMode) -> u8 {
    match mode {
        WeightMode::Time => 0,
        WeightMode::Distance => 1,
        WeightMode::Changes => 2,
    }
}

pub struct RouteService {
    repo: Repository,
    config: Config,
    normalizer: StationNameNormalizer,
    graph: RefCell<Option<NetworkGraph>>,
    route_cache: RefCell<HashMap<CacheKey, Option<Route>>>,
}

impl RouteService {
    pub fn new(repo: Repository, config: Config) -> Self {
        Self {
            repo,
            config,
            normalizer: StationNameNormalizer::new(),
            graph: RefCell::new(None),
            route_cache: RefCell::new(HashMap::new()),
        }
    }

    /// Loads a repository rooted at `root` and wraps it in a fresh service.
    pub fn load(root: &Path, config: Config) -> (Self, Vec<DatasetLoadError>) {
        let (repo, errors) = Repository::load(root);
        (Self::new(repo, config), errors)
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    fn ensure_graph(&self) {
        if self.graph.borrow().is_some() {
            return;
        }
        debug!("building network graph (first request)...");
        let now = Instant::now();
        let built = graph::build(&self.repo, &self.config, &self.normalizer);
        debug!("network graph built in {:?}", now.elapsed());
        *self.graph.borrow_mut() = Some(built);
    }

    /// Drops the graph and route caches. The next request rebuilds lazily.
    /// There is no TTL; invalidation is always explicit (SPEC_FULL.md §5).
    pub fn clear_caches(&self) {
        self.route_cache.borrow_mut().clear();
        *self.graph.borrow_mut() = None;
    }

    /// `calculate_route(from, to, max_changes?, preferences?)`, SPEC_FULL.md
    /// §4.8. `None` means no route exists, not an error.
    pub fn calculate_route(
        &self,
        from: &str,
        to: &str,
        max_changes: Option<u32>,
        preferences: &RoutePreferences,
    ) -> Option<Route> {
        self.calculate_route_mode(from, to, WeightMode::Time, max_changes, preferences)
    }

    /// Applies `Config::walking_penalty` as the actual tunable used by the
    /// search, overriding whatever a caller passed in -- SPEC_FULL.md §6
    /// makes this a `Config`-backed value, not a per-call one.
    fn effective_preferences(&self, preferences: &RoutePreferences) -> RoutePreferences {
        RoutePreferences {
            walking_penalty: self.config.walking_penalty,
            ..*preferences
        }
    }

    fn calculate_route_mode(
        &self,
        from: &str,
        to: &str,
        mode: WeightMode,
        max_changes: Option<u32>,
        preferences: &RoutePreferences,
    ) -> Option<Route> {
        let from = self.normalizer.resolve(&self.repo, from);
        let to = self.normalizer.resolve(&self.repo, to);
        if from.as_ref() == to.as_ref() {
            return None;
        }

        let preferences = self.effective_preferences(preferences);
        let (avoid_walking, prefer_direct, avoid_london, max_walk_bits, walking_penalty_bits) =
            preferences.fingerprint();
        let key: CacheKey = (
            from.clone(),
            to.clone(),
            mode_key(mode),
            avoid_walking,
            prefer_direct,
            avoid_london,
            max_walk_bits,
            walking_penalty_bits,
        );
        if let Some(cached) = self.route_cache.borrow().get(&key) {
            return cached.clone();
        }

        let route = self.compute_route(&from, &to, mode, max_changes, &preferences);
        self.route_cache.borrow_mut().insert(key, route.clone());
        route
    }

    fn compute_route(
        &self,
        from: &str,
        to: &str,
        mode: WeightMode,
        max_changes: Option<u32>,
        preferences: &RoutePreferences,
    ) -> Option<Route> {
        if blackbox::should_use_black_box(&self.repo.underground, &self.repo, from, to) {
            return self.compute_black_box_route(from, to);
        }

        self.ensure_graph();
        let graph_ref = self.graph.borrow();
        let graph = graph_ref.as_ref().expect("ensure_graph populated it");
        let path = pathfinder::find_path(&self.repo, graph, from, to, mode, preferences)?;

        let allowed_changes = max_changes.unwrap_or(self.config.max_changes_default);
        if path.changes as u32 > allowed_changes {
            return None;
        }

        let route = converter::convert(&path)
            .inspect_err(|e| warn!(%e, "path failed to convert to a route"))
            .ok()?;
        Some(blackbox::enhance_route_with_black_box(&self.repo.underground, &self.repo, route))
    }

    fn compute_black_box_route(&self, from: &str, to: &str) -> Option<Route> {
        let from_coord = self.repo.station(from).and_then(|s| s.coordinate);
        let to_coord = self.repo.station(to).and_then(|s| s.coordinate);

        if blackbox::is_cross_country(from, to, from_coord, to_coord) {
            return Some(blackbox::create_cross_country_route(
                &self.repo.underground,
                &self.repo,
                from,
                to,
            ));
        }

        let system = blackbox::classify(&self.repo.underground, &self.repo, from)
            .system()
            .or_else(|| blackbox::classify(&self.repo.underground, &self.repo, to).system())?;
        Some(blackbox::create_black_box_route(
            &self.repo.underground,
            system,
            from,
            to,
            from_coord,
            to_coord,
        ))
    }

    /// One route per optimisation mode, deduplicated by Jaccard similarity
    /// of `full_path` stations >= 0.8, per SPEC_FULL.md §4.8.
    pub fn calculate_multiple_routes(&self, from: &str, to: &str, preferences: &RoutePreferences) -> Vec<Route> {
        let mut routes: Vec<Route> = Vec::new();
        for mode in [WeightMode::Time, WeightMode::Distance, WeightMode::Changes] {
            let Some(candidate) = self.calculate_route_mode(from, to, mode, None, preferences) else {
                continue;
            };
            let is_duplicate = routes.iter().any(|existing| path_similarity(existing, &candidate) >= 0.8);
            if !is_duplicate {
                routes.push(candidate);
            }
        }
        routes
    }

    pub fn get_fastest_route(&self, from: &str, to: &str, preferences: &RoutePreferences) -> Option<Route> {
        self.calculate_route_mode(from, to, WeightMode::Time, None, preferences)
    }

    pub fn get_shortest_route(&self, from: &str, to: &str, preferences: &RoutePreferences) -> Option<Route> {
        self.calculate_route_mode(from, to, WeightMode::Distance, None, preferences)
    }

    pub fn get_fewest_changes_route(&self, from: &str, to: &str, preferences: &RoutePreferences) -> Option<Route> {
        self.calculate_route_mode(from, to, WeightMode::Changes, None, preferences)
    }

    /// Routes that stay on a single shared line between `from` and `to`.
    pub fn find_direct_routes(&self, from: &str, to: &str) -> Vec<Route> {
        self.repo
            .common_lines(from, to)
            .into_iter()
            .filter_map(|line| direct_route_on_line(line, from, to))
            .collect()
    }

    pub fn find_interchange_routes(&self, from: &str, to: &str, preferences: &RoutePreferences) -> Vec<Route> {
        self.calculate_route(from, to, None, preferences)
            .into_iter()
            .filter(|r| matches!(r.route_type, RouteType::Interchange))
            .collect()
    }

    /// Every station reachable from `from` within `max_changes` line
    /// changes, per SPEC_FULL.md §4.8.
    pub fn get_possible_destinations(&self, from: &str, max_changes: u32) -> Vec<Arc<str>> {
        self.ensure_graph();
        let graph_ref = self.graph.borrow();
        let graph = graph_ref.as_ref().expect("ensure_graph populated it");
        if !graph.contains_station(from) {
            return Vec::new();
        }

        let mut best_changes: HashMap<Arc<str>, u32> = HashMap::new();
        let start: Arc<str> = from.into();
        best_changes.insert(start.clone(), 0);
        let mut frontier = vec![(start, None::<Arc<str>>)];

        while let Some((station, last_line)) = frontier.pop() {
            let changes_so_far = best_changes[&station];
            for (neighbor, edge) in graph.neighbors(&station) {
                let continues_line =
                    last_line.is_none() || last_line.as_deref() == Some(edge.line_label()) || edge.is_direct;
                let next_changes = if continues_line { changes_so_far } else { changes_so_far + 1 };
                if next_changes > max_changes {
                    continue;
                }
                if best_changes.get(neighbor).is_some_and(|&c| c <= next_changes) {
                    continue;
                }
                best_changes.insert(neighbor.clone(), next_changes);
                frontier.push((neighbor.clone(), Some(edge.line_label().into())));
            }
        }

        best_changes.into_keys().filter(|s| s.as_ref() != from).collect()
    }

    pub fn find_routes_via_station(
        &self,
        from: &str,
        to: &str,
        via: &str,
        preferences: &RoutePreferences,
    ) -> Option<Route> {
        let first = self.calculate_route(from, via, None, preferences)?;
        let second = self.calculate_route(via, to, None, preferences)?;
        Some(join_routes(first, second))
    }

    pub fn find_routes_avoiding_station(
        &self,
        from: &str,
        to: &str,
        avoid: &str,
        preferences: &RoutePreferences,
    ) -> Option<Route> {
        self.ensure_graph();
        let graph_ref = self.graph.borrow();
        let graph = graph_ref.as_ref().expect("ensure_graph populated it");
        let preferences = self.effective_preferences(preferences);
        let path = pathfinder::find_path_avoiding(&self.repo, graph, from, to, WeightMode::Time, &preferences, avoid)?;
        let route = converter::convert(&path).ok()?;
        Some(blackbox::enhance_route_with_black_box(&self.repo.underground, &self.repo, route))
    }

    /// Circular routes out of `from` and back by a different edge, never
    /// repeating the outbound edge, per SPEC_FULL.md §4.8.
    pub fn find_circular_routes(&self, from: &str, max_distance_km: f64) -> Vec<Route> {
        self.ensure_graph();
        let graph_ref = self.graph.borrow();
        let graph = graph_ref.as_ref().expect("ensure_graph populated it");

        let mut circuits = Vec::new();
        let mut seen_neighbors: HashSet<Arc<str>> = HashSet::new();
        for (neighbor, out_edge) in graph.neighbors(from) {
            if !seen_neighbors.insert(neighbor.clone()) {
                continue;
            }
            if out_edge.distance_km > max_distance_km {
                continue;
            }
            for (back_to, back_edge) in graph.neighbors(neighbor) {
                if back_to.as_ref() != from {
                    continue;
                }
                if back_edge.line_label() == out_edge.line_label() {
                    continue;
                }
                let total_distance = out_edge.distance_km + back_edge.distance_km;
                if total_distance > max_distance_km {
                    continue;
                }
                circuits.push(Route {
                    from_station: from.into(),
                    to_station: from.into(),
                    total_distance_km: Some(total_distance),
                    total_time_min: Some(out_edge.time_min + back_edge.time_min),
                    route_type: RouteType::Interchange,
                    full_path: Some(vec![from.into(), neighbor.clone(), from.into()]),
                    segments: vec![
                        segment_from_edge(from, neighbor, out_edge),
                        segment_from_edge(neighbor, from, back_edge),
                    ],
                });
            }
        }
        circuits
    }

    pub fn find_routes_on_line(&self, line_name: &str) -> Vec<Route> {
        let Some(line) = self.repo.line(line_name) else {
            return Vec::new();
        };
        line.stations
            .windows(2)
            .filter_map(|pair| {
                let [a, b] = pair else { return None };
                direct_route_on_line(line, a, b)
            })
            .collect()
    }

    pub fn get_journey_time(&self, from: &str, to: &str) -> Option<f64> {
        self.repo
            .common_lines(from, to)
            .into_iter()
            .find_map(|line| line.journey_time(from, to))
    }

    pub fn get_distance(&self, from: &str, to: &str) -> Option<f64> {
        if let Some(distance) = self
            .repo
            .common_lines(from, to)
            .into_iter()
            .find_map(|line| line.distance(from, to))
        {
            return Some(distance);
        }
        let coord_a = self.repo.station(from)?.coordinate?;
        let coord_b = self.repo.station(to)?.coordinate?;
        Some(coord_a.haversine_distance(&coord_b).as_kilometers())
    }
}

fn direct_route_on_line(line: &RailwayLine, from: &str, to: &str) -> Option<Route> {
    let full_path = line.station_run(from, to)?;
    let distance_km = line.distance(from, to);
    let time_min = line.journey_time(from, to);
    Some(Route {
        from_station: from.into(),
        to_station: to.into(),
        total_distance_km: distance_km,
        total_time_min: time_min,
        route_type: RouteType::Direct,
        full_path: Some(full_path),
        segments: vec![RouteSegment {
            from_station: from.into(),
            to_station: to.into(),
            line_name: line.name.clone(),
            distance_km,
            time_min,
            service_pattern: None,
        }],
    })
}

fn segment_from_edge(from: &str, to: &str, edge: &Edge) -> RouteSegment {
    let service_pattern = match edge.kind {
        EdgeKind::Walking => Some(ServicePattern::Walking),
        EdgeKind::Underground => Some(ServicePattern::Underground),
        _ => None,
    };
    RouteSegment {
        from_station: from.into(),
        to_station: to.into(),
        line_name: edge.line_label().into(),
        distance_km: Some(edge.distance_km),
        time_min: Some(edge.time_min),
        service_pattern,
    }
}

fn join_routes(mut first: Route, second: Route) -> Route {
    first.segments.extend(second.segments);
    first.to_station = second.to_station;
    first.total_distance_km = match (first.total_distance_km, second.total_distance_km) {
        (Some(a), Some(b)) => Some(a + b),
        _ => None,
    };
    first.total_time_min = match (first.total_time_min, second.total_time_min) {
        (Some(a), Some(b)) => Some(a + b),
        _ => None,
    };
    if let (Some(mut a), Some(b)) = (first.full_path.take(), second.full_path) {
        a.extend(b.into_iter().skip(1));
        first.full_path = Some(a);
    }
    first.route_type = RouteType::classify(first.segments.len());
    first
}

/// Jaccard similarity of two routes' `full_path` station sets.
fn path_similarity(a: &Route, b: &Route) -> f64 {
    let (Some(pa), Some(pb)) = (&a.full_path, &b.full_path) else {
        return 0.0;
    };
    let set_a: HashSet<&str> = pa.iter().map(|s| s.as_ref()).collect();
    let set_b: HashSet<&str> = pb.iter().map(|s| s.as_ref()).collect();
    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count().max(1);
    intersection as f64 / union as f64
}

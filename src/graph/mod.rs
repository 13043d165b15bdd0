pub mod edge;
mod speed;

pub use edge::{Edge, EdgeKind};

use crate::{
    config::Config,
    normalizer::StationNameNormalizer,
    repository::Repository,
    shared::Coordinate,
    walking,
};
use std::{collections::HashMap, sync::Arc, time::Instant};
use tracing::debug;

/// A weighted, directed multigraph `station -> station -> [Edge]`, per
/// SPEC_FULL.md §3.
#[derive(Debug, Clone, Default)]
pub struct NetworkGraph {
    adjacency: HashMap<Arc<str>, Vec<(Arc<str>, Edge)>>,
    coordinates: HashMap<Arc<str>, Coordinate>,
}

impl NetworkGraph {
    pub fn neighbors(&self, station: &str) -> &[(Arc<str>, Edge)] {
        self.adjacency.get(station).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn coordinate(&self, station: &str) -> Option<Coordinate> {
        self.coordinates.get(station).copied()
    }

    pub fn contains_station(&self, station: &str) -> bool {
        self.adjacency.contains_key(station)
    }

    fn add_edge(&mut self, from: &Arc<str>, to: &Arc<str>, edge: Edge) {
        self.adjacency.entry(from.clone()).or_default().push((to.clone(), edge));
        self.adjacency.entry(to.clone()).or_default();
    }

    /// Drops the edge unless both a time and a distance are known, per the
    /// invariant of SPEC_FULL.md §3.
    fn try_add_edge(&mut self, from: &Arc<str>, to: &Arc<str>, edge: Edge) {
        if edge.time_min > 0.0 && edge.distance_km > 0.0 {
            self.add_edge(from, to, edge);
        }
    }
}

/// Single entry point, idempotent given the same repository + config. Runs
/// phases A-E of SPEC_FULL.md §4.2 in order. Process-wide memoisation is
/// the caller's responsibility (`route::RouteService`), per §5.
pub fn build(repo: &Repository, config: &Config, normalizer: &StationNameNormalizer) -> NetworkGraph {
    let mut graph = NetworkGraph::default();

    phase_a_coordinates(repo, &mut graph);
    phase_b_line_edges(repo, &mut graph);
    phase_c_interchange_edges(repo, &mut graph);
    if repo.auto_walking.enabled && config.auto_walking_enabled {
        phase_d_automatic_walking(repo, &mut graph);
    }
    phase_e_same_station_interchanges(repo, &mut graph, normalizer);

    graph
}

fn phase_a_coordinates(repo: &Repository, graph: &mut NetworkGraph) {
    debug!("graph phase A: coordinate harvest...");
    let now = Instant::now();
    for station in repo.stations() {
        if let Some(coord) = station.coordinate {
            graph.coordinates.insert(station.name.clone(), coord);
        }
    }
    debug!(
        "graph phase A: harvested {} coordinates in {:?}",
        graph.coordinates.len(),
        now.elapsed()
    );
}

fn phase_b_line_edges(repo: &Repository, graph: &mut NetworkGraph) {
    debug!("graph phase B: line edges...");
    let now = Instant::now();
    let mut count = 0;
    for line in repo.lines() {
        for pair in line.stations.windows(2) {
            let [a, b] = pair else { continue };
            if walking::is_non_terminal_london(a) || walking::is_non_terminal_london(b) {
                continue;
            }
            let (Some(coord_a), Some(coord_b)) = (graph.coordinates.get(a), graph.coordinates.get(b))
            else {
                continue;
            };
            let distance_km = coord_a.haversine_distance(coord_b).as_kilometers();
            let time_min = line
                .journey_time(a, b)
                .unwrap_or_else(|| speed::estimate_minutes(&line.name, distance_km));

            let forward = Edge {
                kind: EdgeKind::Rail { line: line.name.clone() },
                time_min,
                distance_km,
                walking_distance_m: None,
                is_direct: false,
                is_walking_connection: false,
            };
            let backward = Edge {
                kind: EdgeKind::Rail { line: line.name.clone() },
                time_min,
                distance_km,
                walking_distance_m: None,
                is_direct: false,
                is_walking_connection: false,
            };
            graph.try_add_edge(a, b, forward);
            graph.try_add_edge(b, a, backward);
            count += 2;
        }
    }
    debug!("graph phase B: emitted {} edges in {:?}", count, now.elapsed());
}

fn phase_c_interchange_edges(repo: &Repository, graph: &mut NetworkGraph) {
    debug!("graph phase C: interchange edges...");
    let now = Instant::now();
    let mut count = 0;
    for conn in &repo.interchange_connections {
        let a = &conn.from_station;
        let b = &conn.to_station;
        match conn.connection_type.as_ref() {
            "WALKING" => {
                let same_line = !repo.common_lines(a, b).is_empty();
                if same_line || walking::is_non_terminal_london(a) || walking::is_non_terminal_london(b) {
                    continue;
                }
                if let Some(edge) = interchange_edge(
                    graph,
                    EdgeKind::Walking,
                    conn.time_minutes,
                    conn.walking_distance_m,
                    a,
                    b,
                    false,
                    true,
                ) {
                    graph.try_add_edge(a, b, edge.clone());
                    graph.try_add_edge(b, a, edge);
                    count += 2;
                }
            }
            "UNDERGROUND" => {
                if !walking::is_london_terminal(a) && !walking::is_london_terminal(b) {
                    continue;
                }
                if let Some(edge) = interchange_edge(
                    graph,
                    EdgeKind::Underground,
                    conn.time_minutes,
                    conn.walking_distance_m,
                    a,
                    b,
                    false,
                    false,
                ) {
                    graph.try_add_edge(a, b, edge.clone());
                    graph.try_add_edge(b, a, edge);
                    count += 2;
                }
            }
            _ => {
                if let Some(edge) = interchange_edge(
                    graph,
                    EdgeKind::Direct,
                    conn.time_minutes,
                    conn.walking_distance_m,
                    a,
                    b,
                    true,
                    false,
                ) {
                    graph.try_add_edge(a, b, edge.clone());
                    graph.try_add_edge(b, a, edge);
                    count += 2;
                }
            }
        }
    }
    debug!("graph phase C: emitted {} edges in {:?}", count, now.elapsed());
}

#[allow(clippy::too_many_arguments)]
fn interchange_edge(
    graph: &NetworkGraph,
    kind: EdgeKind,
    time_minutes: Option<f64>,
    walking_distance_m: Option<u32>,
    a: &str,
    b: &str,
    is_direct: bool,
    is_walking_connection: bool,
) -> Option<Edge> {
    let distance_km = walking_distance_m
        .map(|m| m as f64 / 1000.0)
        .or_else(|| {
            let ca = graph.coordinates.get(a)?;
            let cb = graph.coordinates.get(b)?;
            Some(ca.haversine_distance(cb).as_kilometers())
        })?;
    let time_min = time_minutes?;
    Some(Edge {
        kind,
        time_min,
        distance_km,
        walking_distance_m,
        is_direct,
        is_walking_connection,
    })
}

fn phase_d_automatic_walking(repo: &Repository, graph: &mut NetworkGraph) {
    debug!("graph phase D: automatic walking edges...");
    let now = Instant::now();
    let max_distance_m = repo.auto_walking.max_distance_m as f64;
    let speed_mps = repo.auto_walking.walking_speed_mps;
    let stations: Vec<_> = repo
        .stations()
        .iter()
        .filter(|s| s.coordinate.is_some())
        .collect();
    let mut count = 0;
    for i in 0..stations.len() {
        for j in (i + 1)..stations.len() {
            let a = &stations[i];
            let b = &stations[j];
            let (Some(coord_a), Some(coord_b)) = (a.coordinate, b.coordinate) else {
                continue;
            };
            let distance_m = coord_a.haversine_distance(&coord_b).as_meters();
            if distance_m > max_distance_m {
                continue;
            }
            if !walking::admits_walking_edge(repo, &repo.underground, &a.name, &b.name, max_distance_m) {
                continue;
            }
            let time_min = (distance_m / speed_mps / 60.0).max(1.0);
            let edge_forward = Edge {
                kind: EdgeKind::Walking,
                time_min,
                distance_km: distance_m / 1000.0,
                walking_distance_m: Some(distance_m.round() as u32),
                is_direct: false,
                is_walking_connection: true,
            };
            let edge_backward = edge_forward.clone();
            graph.try_add_edge(&a.name, &b.name, edge_forward);
            graph.try_add_edge(&b.name, &a.name, edge_backward);
            count += 2;
        }
    }
    debug!("graph phase D: emitted {} edges in {:?}", count, now.elapsed());
}

fn phase_e_same_station_interchanges(
    repo: &Repository,
    graph: &mut NetworkGraph,
    normalizer: &StationNameNormalizer,
) {
    debug!("graph phase E: same-station interchanges...");
    let now = Instant::now();
    let stations = repo.stations();
    let mut count = 0;
    for i in 0..stations.len() {
        for j in (i + 1)..stations.len() {
            let a = &stations[i];
            let b = &stations[j];
            if a.name == b.name || !normalizer.are_equivalent(&a.name, &b.name) {
                continue;
            }
            let edge_forward = Edge {
                kind: EdgeKind::Interchange,
                time_min: 2.0,
                distance_km: 0.1,
                walking_distance_m: Some(50),
                is_direct: false,
                is_walking_connection: false,
            };
            let edge_backward = edge_forward.clone();
            graph.add_edge(&a.name, &b.name, edge_forward);
            graph.add_edge(&b.name, &a.name, edge_backward);
            count += 2;
        }
    }
    debug!("graph phase E: emitted {} edges in {:?}", count, now.elapsed());
}

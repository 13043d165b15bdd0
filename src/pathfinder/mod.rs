mod priority;

use crate::{
    graph::{Edge, NetworkGraph},
    repository::Repository,
    walking,
};
use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap, HashSet},
    sync::Arc,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightMode {
    Time,
    Distance,
    Changes,
}

/// Caller-facing routing preferences, per SPEC_FULL.md §6.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutePreferences {
    pub avoid_walking: bool,
    pub prefer_direct: bool,
    pub avoid_london: bool,
    pub max_walking_distance_km: f64,
    /// Multiplier applied to walking edges' weight. `RouteService` overrides
    /// this from `Config::walking_penalty` before every search (SPEC_FULL.md
    /// §6); the `Default` below only matters for callers that build
    /// preferences without going through `RouteService`.
    pub walking_penalty: f64,
}

impl Default for RoutePreferences {
    fn default() -> Self {
        Self {
            avoid_walking: false,
            prefer_direct: false,
            avoid_london: false,
            max_walking_distance_km: 1.0,
            walking_penalty: 2.0,
        }
    }
}

impl RoutePreferences {
    /// The hashable subset that affects routing, used as part of the route
    /// cache key (SPEC_FULL.md §4.8).
    pub fn fingerprint(&self) -> (bool, bool, bool, u64, u64) {
        (
            self.avoid_walking,
            self.prefer_direct,
            self.avoid_london,
            self.max_walking_distance_km.to_bits(),
            self.walking_penalty.to_bits(),
        )
    }
}

/// The settled path from start to goal: station sequence plus the edge
/// walked on each hop, and accumulated real (unpenalised) totals.
#[derive(Debug, Clone)]
pub struct PathResult {
    pub path: Vec<Arc<str>>,
    pub hops: Vec<Edge>,
    pub total_time_min: f64,
    pub total_distance_km: f64,
    pub changes: usize,
}

#[derive(Debug, Clone)]
struct NodeState {
    station: Arc<str>,
    distance_km: f64,
    time_min: f64,
    changes: usize,
    path: Vec<Arc<str>>,
    hops: Vec<Edge>,
    last_line: Option<Arc<str>>,
}

struct HeapEntry {
    weight: f64,
    changes: usize,
    distance_km: f64,
    state: NodeState,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.changes == other.changes && self.distance_km == other.distance_km
    }
}
impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    /// Reversed so `BinaryHeap` (a max-heap) behaves as a min-heap ordered
    /// by (weight, changes, distance), per SPEC_FULL.md §4.6.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .total_cmp(&self.weight)
            .then_with(|| other.changes.cmp(&self.changes))
            .then_with(|| other.distance_km.total_cmp(&self.distance_km))
    }
}

const LONG_CROSS_LONDON_DISTANCE_KM: f64 = 30.0;

/// Preference-aware Dijkstra, per SPEC_FULL.md §4.6. Returns `None` if the
/// graph has no path from `start` to `goal` under the given mode and
/// preferences.
pub fn find_path(
    repo: &Repository,
    graph: &NetworkGraph,
    start: &str,
    goal: &str,
    mode: WeightMode,
    preferences: &RoutePreferences,
) -> Option<PathResult> {
    find_path_internal(repo, graph, start, goal, mode, preferences, None)
}

/// As [`find_path`], but treats `avoid` as absent from the network
/// entirely -- used by `RouteService::find_routes_avoiding_station`.
pub fn find_path_avoiding(
    repo: &Repository,
    graph: &NetworkGraph,
    start: &str,
    goal: &str,
    mode: WeightMode,
    preferences: &RoutePreferences,
    avoid: &str,
) -> Option<PathResult> {
    find_path_internal(repo, graph, start, goal, mode, preferences, Some(avoid))
}

fn find_path_internal(
    repo: &Repository,
    graph: &NetworkGraph,
    start: &str,
    goal: &str,
    mode: WeightMode,
    preferences: &RoutePreferences,
    avoid: Option<&str>,
) -> Option<PathResult> {
    if !graph.contains_station(start) || !graph.contains_station(goal) {
        return None;
    }
    if avoid.is_some_and(|a| a == start || a == goal) {
        return None;
    }

    let common_lines: HashSet<Arc<str>> = repo
        .common_lines(start, goal)
        .into_iter()
        .map(|l| l.name.clone())
        .collect();

    let start_outside_london = !start.to_lowercase().starts_with("london");
    let goal_outside_london = !goal.to_lowercase().starts_with("london");

    let mut heap = BinaryHeap::new();
    let mut best_weight: HashMap<Arc<str>, f64> = HashMap::new();
    let mut settled: HashSet<Arc<str>> = HashSet::new();

    let start_arc: Arc<str> = start.into();
    heap.push(HeapEntry {
        weight: 0.0,
        changes: 0,
        distance_km: 0.0,
        state: NodeState {
            station: start_arc.clone(),
            distance_km: 0.0,
            time_min: 0.0,
            changes: 0,
            path: vec![start_arc.clone()],
            hops: Vec::new(),
            last_line: None,
        },
    });
    best_weight.insert(start_arc, 0.0);

    while let Some(HeapEntry { state, .. }) = heap.pop() {
        if settled.contains(&state.station) {
            continue;
        }
        if state.station.as_ref() == goal {
            return Some(PathResult {
                path: state.path,
                hops: state.hops,
                total_time_min: state.time_min,
                total_distance_km: state.distance_km,
                changes: state.changes,
            });
        }
        settled.insert(state.station.clone());

        let mut by_neighbor: HashMap<Arc<str>, Vec<&Edge>> = HashMap::new();
        for (neighbor, edge) in graph.neighbors(&state.station) {
            by_neighbor.entry(neighbor.clone()).or_default().push(edge);
        }

        for (neighbor, edges) in by_neighbor {
            if settled.contains(&neighbor) {
                continue;
            }
            if avoid.is_some_and(|a| a == neighbor.as_ref()) {
                continue;
            }
            if walking::is_non_terminal_london(&neighbor) {
                let long_cross_london = start_outside_london
                    && goal_outside_london
                    && state.distance_km > LONG_CROSS_LONDON_DISTANCE_KM;
                if !long_cross_london {
                    continue;
                }
            }

            let candidate_edges: Vec<&&Edge> = if common_lines.is_empty() {
                edges.iter().collect()
            } else {
                let on_common: Vec<&&Edge> = edges
                    .iter()
                    .filter(|e| common_lines.contains(e.line_label()))
                    .collect();
                if on_common.is_empty() {
                    continue;
                }
                on_common
            };

            let Some(edge) = priority::select_best_edge(
                start,
                &candidate_edges,
                &common_lines,
                state.last_line.as_deref(),
                preferences,
            ) else {
                continue;
            };

            let is_change = state
                .last_line
                .as_deref()
                .is_some_and(|prev| prev != edge.line_label())
                && !edge.is_direct;

            let new_time = state.time_min + edge.time_min;
            let new_distance = state.distance_km + edge.distance_km;
            let mut new_changes = state.changes;
            if is_change {
                new_changes += 1;
            }
            // The per-change penalty biases the search away from routes with
            // more interchanges but is never folded into `new_time` itself --
            // `PathResult::total_time_min` must stay the sum of real edge
            // times so it agrees with `RouteSegment::time_min` totals
            // (SPEC_FULL.md §7 totals-consistency invariant).
            let penalised_time = new_time + new_changes as f64 * 5.0;

            let mut weight = match mode {
                WeightMode::Time => penalised_time,
                WeightMode::Distance => new_distance,
                WeightMode::Changes => {
                    new_changes as f64 * 1000.0 + penalised_time + if edge.is_direct { 0.0 } else { 1000.0 }
                }
            };

            weight *= priority::underground_bonus_factor(
                start,
                goal,
                &neighbor,
                edge,
                state.distance_km,
                start_outside_london && goal_outside_london,
            );

            if edge.is_walking_connection || edge.line_label() == "WALKING" {
                weight *= preferences.walking_penalty;
            }

            if weight.is_infinite() {
                continue;
            }

            if best_weight.get(&neighbor).is_some_and(|&w| w <= weight) {
                continue;
            }
            best_weight.insert(neighbor.clone(), weight);

            let mut path = state.path.clone();
            path.push(neighbor.clone());
            let mut hops = state.hops.clone();
            hops.push((*edge).clone());

            heap.push(HeapEntry {
                weight,
                changes: new_changes,
                distance_km: new_distance,
                state: NodeState {
                    station: neighbor,
                    distance_km: new_distance,
                    time_min: new_time,
                    changes: new_changes,
                    path,
                    hops,
                    last_line: Some(edge.line_label().into()),
                },
            });
        }
    }

    None
}

//! Edge-selection scoring and underground bonus factors for the Dijkstra
//! search in `pathfinder::find_path`, per SPEC_FULL.md §4.6.

use super::RoutePreferences;
use crate::{graph::Edge, walking};
use std::collections::HashSet;
use std::sync::Arc;

const SOUTH_WEST_KEYWORDS: &[&str] = &["exeter", "plymouth", "bristol", "bath", "truro", "penzance", "taunton"];
const EAST_KEYWORDS: &[&str] = &["norwich", "ipswich", "cambridge", "peterborough", "colchester"];
const WEST_KEYWORDS: &[&str] = &["cardiff", "swansea", "hereford", "shrewsbury", "gloucester"];

/// Picks the single best edge among parallel edges to the same neighbour.
/// Lower score wins; ties broken by the order edges were discovered (first
/// wins), matching the graph builder's own deterministic ordering.
pub(super) fn select_best_edge<'a>(
    origin: &str,
    candidates: &[&&'a Edge],
    common_lines: &HashSet<Arc<str>>,
    prev_line: Option<&str>,
    preferences: &RoutePreferences,
) -> Option<&'a Edge> {
    let non_walking: Vec<&&Edge> = candidates
        .iter()
        .filter(|e| !e.is_walking_connection)
        .copied()
        .collect();
    let pool: &[&&Edge] = if preferences.avoid_walking && !non_walking.is_empty() {
        &non_walking
    } else {
        candidates
    };

    pool.iter()
        .copied()
        .min_by(|a, b| {
            priority_score(origin, a, common_lines, prev_line, preferences)
                .total_cmp(&priority_score(origin, b, common_lines, prev_line, preferences))
        })
        .copied()
}

fn priority_score(
    origin: &str,
    edge: &Edge,
    common_lines: &HashSet<Arc<str>>,
    prev_line: Option<&str>,
    preferences: &RoutePreferences,
) -> f64 {
    let mut score = 0.0;

    if common_lines.contains(edge.line_label()) {
        score -= 10000.0;
    }
    if prev_line.is_some_and(|prev| prev == edge.line_label()) {
        score -= 1000.0;
    }
    if edge.is_direct || preferences.prefer_direct && edge.is_direct {
        score -= 100.0;
    }
    score += regional_bias(origin, edge);

    score
}

/// Penalises edges that pull a journey away from the region its origin
/// keyword-matches to, discouraging routes that wander cross-region for a
/// marginally shorter hop. Resolved constants per SPEC_FULL.md §4.6.
fn regional_bias(origin: &str, edge: &Edge) -> f64 {
    let origin_lower = origin.to_lowercase();
    let line_lower = edge.line_label().to_lowercase();

    let origin_region_matches = |keywords: &[&str]| keywords.iter().any(|k| origin_lower.contains(k));
    let line_region_matches =
        |trunk: &str| line_lower.contains(trunk) || edge.line_label() == trunk.to_uppercase();

    if origin_region_matches(SOUTH_WEST_KEYWORDS) && line_region_matches("south western main line") {
        return -5000.0;
    }
    if origin_region_matches(EAST_KEYWORDS) && line_region_matches("east coast main line") {
        return -5000.0;
    }
    if origin_region_matches(WEST_KEYWORDS) && line_region_matches("great western main line") {
        return -5000.0;
    }
    0.0
}

/// Multiplicative bonus applied to an underground-tagged edge's weight
/// contribution: the tube is cheap to "link through" on a long,
/// overground-dominated journey that lands on a major National Rail
/// terminal, and progressively less of a bargain the further the edge is
/// from doing that real work. Resolved per SPEC_FULL.md §4.6, grounded on
/// `_apply_underground_routing_bonus`'s `major_terminals` check.
pub(super) fn underground_bonus_factor(
    _start: &str,
    _goal: &str,
    neighbor: &str,
    edge: &Edge,
    traveled_distance_km: f64,
    both_endpoints_outside_london: bool,
) -> f64 {
    if edge.line_label() != "UNDERGROUND" {
        return 1.0;
    }

    let connects_to_major_terminal = walking::is_london_terminal(neighbor);
    let is_cross_london_journey = both_endpoints_outside_london && traveled_distance_km > 20.0;

    if connects_to_major_terminal {
        if is_cross_london_journey {
            0.4
        } else if traveled_distance_km > 15.0 {
            0.6
        } else {
            0.8
        }
    } else if is_cross_london_journey {
        0.7
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeKind;

    fn rail_edge(line: &str) -> Edge {
        Edge {
            kind: EdgeKind::Rail { line: line.into() },
            time_min: 10.0,
            distance_km: 10.0,
            walking_distance_m: None,
            is_direct: false,
            is_walking_connection: false,
        }
    }

    fn underground_edge(is_direct: bool) -> Edge {
        Edge {
            kind: EdgeKind::Underground,
            time_min: 5.0,
            distance_km: 2.0,
            walking_distance_m: None,
            is_direct,
            is_walking_connection: false,
        }
    }

    #[test]
    fn regional_bias_penalises_leaving_a_matching_trunk_line() {
        let edge = rail_edge("South Western Main Line");
        assert_eq!(regional_bias("Exeter St Davids", &edge), -5000.0);
        assert_eq!(regional_bias("Norwich", &edge), 0.0);
    }

    #[test]
    fn select_best_edge_prefers_the_common_line() {
        let common = rail_edge("Great Western Main Line");
        let other = rail_edge("Night Riviera");
        let candidates = vec![&common, &other];
        let refs: Vec<&&Edge> = candidates.iter().collect();
        let mut common_lines = HashSet::new();
        common_lines.insert(Arc::<str>::from("Great Western Main Line"));
        let preferences = RoutePreferences::default();

        let chosen =
            select_best_edge("Reading", &refs, &common_lines, None, &preferences).unwrap();
        assert_eq!(chosen.line_label(), "Great Western Main Line");
    }

    #[test]
    fn select_best_edge_drops_walking_when_avoiding_it_and_an_alternative_exists() {
        let walking = Edge {
            is_walking_connection: true,
            ..rail_edge("WALKING")
        };
        let rail = rail_edge("Great Western Main Line");
        let candidates = vec![&walking, &rail];
        let refs: Vec<&&Edge> = candidates.iter().collect();
        let preferences = RoutePreferences {
            avoid_walking: true,
            ..RoutePreferences::default()
        };

        let chosen = select_best_edge("Reading", &refs, &HashSet::new(), None, &preferences).unwrap();
        assert!(!chosen.is_walking_connection);
    }

    #[test]
    fn underground_bonus_is_strongest_for_long_cross_london_journeys_via_a_terminal() {
        let edge = underground_edge(false);
        assert_eq!(
            underground_bonus_factor("a", "b", "London Waterloo", &edge, 25.0, true),
            0.4
        );
    }

    #[test]
    fn underground_bonus_to_a_terminal_tapers_with_distance_when_not_cross_london() {
        let edge = underground_edge(false);
        assert_eq!(
            underground_bonus_factor("a", "b", "London Waterloo", &edge, 18.0, false),
            0.6
        );
        assert_eq!(
            underground_bonus_factor("a", "b", "London Waterloo", &edge, 5.0, false),
            0.8
        );
    }

    #[test]
    fn underground_bonus_without_a_terminal_only_helps_long_cross_london_hops() {
        let edge = underground_edge(false);
        assert_eq!(
            underground_bonus_factor("a", "b", "Covent Garden", &edge, 25.0, true),
            0.7
        );
        assert_eq!(
            underground_bonus_factor("a", "b", "Covent Garden", &edge, 5.0, false),
            1.0
        );
    }

    #[test]
    fn underground_bonus_is_one_for_non_underground_edges() {
        let edge = rail_edge("Great Western Main Line");
        assert_eq!(
            underground_bonus_factor("a", "b", "London Waterloo", &edge, 20.0, true),
            1.0
        );
    }
}

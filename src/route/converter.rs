//! Converts a settled [`crate::pathfinder::PathResult`] into a materialised
//! [`Route`], grouping consecutive same-line hops into segments. Per
//! SPEC_FULL.md §4.7.

use super::model::{Route, RouteSegment, RouteType, ServicePattern};
use crate::{
    error::RailError,
    graph::EdgeKind,
    pathfinder::PathResult,
};

/// Converts a path into a route. The only failure mode is a programmer
/// error -- a path shorter than two stations should never reach here,
/// per SPEC_FULL.md §7.
pub fn convert(result: &PathResult) -> Result<Route, RailError> {
    if result.path.len() < 2 || result.hops.is_empty() {
        return Err(RailError::PathTooShort);
    }

    let mut segments = Vec::new();
    let mut idx = 0;
    while idx < result.hops.len() {
        let label = result.hops[idx].line_label().to_string();
        let from_station = result.path[idx].clone();

        let mut end = idx;
        let mut distance_km = 0.0;
        let mut time_min = 0.0;
        while end < result.hops.len() && result.hops[end].line_label() == label {
            distance_km += result.hops[end].distance_km;
            time_min += result.hops[end].time_min;
            end += 1;
        }
        let to_station = result.path[end].clone();

        let service_pattern = match result.hops[idx].kind {
            EdgeKind::Walking => Some(ServicePattern::Walking),
            EdgeKind::Underground => Some(ServicePattern::Underground),
            _ => None,
        };

        segments.push(RouteSegment {
            from_station,
            to_station,
            line_name: result.hops[idx].line_label().into(),
            distance_km: Some(distance_km),
            time_min: Some(time_min),
            service_pattern,
        });
        idx = end;
    }

    let route_type = RouteType::classify(segments.len());
    Ok(Route {
        from_station: result.path[0].clone(),
        to_station: result.path[result.path.len() - 1].clone(),
        total_distance_km: Some(result.total_distance_km),
        total_time_min: Some(result.total_time_min),
        route_type,
        full_path: Some(result.path.clone()),
        segments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Edge;

    fn rail_edge(line: &str, distance_km: f64, time_min: f64) -> Edge {
        Edge {
            kind: EdgeKind::Rail { line: line.into() },
            time_min,
            distance_km,
            walking_distance_m: None,
            is_direct: false,
            is_walking_connection: false,
        }
    }

    #[test]
    fn groups_consecutive_same_line_hops_into_one_segment() {
        let result = PathResult {
            path: vec!["A".into(), "B".into(), "C".into()],
            hops: vec![rail_edge("Line 1", 3.0, 6.0), rail_edge("Line 1", 4.0, 7.0)],
            total_time_min: 13.0,
            total_distance_km: 7.0,
            changes: 0,
        };
        let route = convert(&result).unwrap();
        assert_eq!(route.segments.len(), 1);
        assert_eq!(route.segments[0].from_station.as_ref(), "A");
        assert_eq!(route.segments[0].to_station.as_ref(), "C");
        assert_eq!(route.segments[0].distance_km, Some(7.0));
    }

    #[test]
    fn a_line_change_starts_a_new_segment() {
        let result = PathResult {
            path: vec!["A".into(), "B".into(), "C".into()],
            hops: vec![rail_edge("Line 1", 3.0, 6.0), rail_edge("Line 2", 4.0, 7.0)],
            total_time_min: 13.0,
            total_distance_km: 7.0,
            changes: 1,
        };
        let route = convert(&result).unwrap();
        assert_eq!(route.segments.len(), 2);
        assert_eq!(route.route_type, RouteType::Interchange);
    }

    #[test]
    fn rejects_a_path_shorter_than_two_stations() {
        let result = PathResult {
            path: vec!["A".into()],
            hops: vec![],
            total_time_min: 0.0,
            total_distance_km: 0.0,
            changes: 0,
        };
        assert!(matches!(convert(&result), Err(RailError::PathTooShort)));
    }
}

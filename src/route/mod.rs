pub mod converter;
pub mod model;
pub mod service;

pub use model::{Route, RouteSegment, RouteType, ServicePattern};
pub use service::RouteService;

use crate::error::RouteValidationReason;

const TOTALS_EPSILON_KM: f64 = 0.01;
const TOTALS_EPSILON_MIN: f64 = 0.01;

/// Structural validation of a materialised route, per SPEC_FULL.md §7.
/// Returns every reason the route fails, not just the first.
pub fn validate_route(route: &Route) -> Vec<RouteValidationReason> {
    let mut reasons = Vec::new();

    if route.segments.is_empty() {
        reasons.push(RouteValidationReason::Empty);
        return reasons;
    }

    for i in 0..route.segments.len() - 1 {
        if route.segments[i].to_station != route.segments[i + 1].from_station {
            reasons.push(RouteValidationReason::BrokenChain(i, i + 1));
        }
    }

    let expected_changes = route.segments.len().saturating_sub(1);
    if route.changes_required() != expected_changes {
        reasons.push(RouteValidationReason::ChangesMismatch);
    }

    let segment_distance: Option<f64> = route
        .segments
        .iter()
        .map(|s| s.distance_km)
        .sum::<Option<f64>>();
    let segment_time: Option<f64> = route.segments.iter().map(|s| s.time_min).sum::<Option<f64>>();

    let distance_mismatch = match (segment_distance, route.total_distance_km) {
        (Some(sum), Some(total)) => (sum - total).abs() > TOTALS_EPSILON_KM,
        _ => false,
    };
    let time_mismatch = match (segment_time, route.total_time_min) {
        (Some(sum), Some(total)) => (sum - total).abs() > TOTALS_EPSILON_MIN,
        _ => false,
    };
    if distance_mismatch || time_mismatch {
        reasons.push(RouteValidationReason::TotalsMismatch);
    }

    reasons
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(from: &str, to: &str, distance_km: f64, time_min: f64) -> RouteSegment {
        RouteSegment {
            from_station: from.into(),
            to_station: to.into(),
            line_name: "Line 1".into(),
            distance_km: Some(distance_km),
            time_min: Some(time_min),
            service_pattern: None,
        }
    }

    #[test]
    fn a_well_formed_route_validates_clean() {
        let route = Route {
            from_station: "A".into(),
            to_station: "C".into(),
            segments: vec![segment("A", "B", 3.0, 6.0), segment("B", "C", 4.0, 7.0)],
            total_distance_km: Some(7.0),
            total_time_min: Some(13.0),
            route_type: RouteType::Interchange,
            full_path: Some(vec!["A".into(), "B".into(), "C".into()]),
        };
        assert!(validate_route(&route).is_empty());
    }

    #[test]
    fn a_broken_chain_is_flagged() {
        let route = Route {
            from_station: "A".into(),
            to_station: "C".into(),
            segments: vec![segment("A", "B", 3.0, 6.0), segment("X", "C", 4.0, 7.0)],
            total_distance_km: Some(7.0),
            total_time_min: Some(13.0),
            route_type: RouteType::Interchange,
            full_path: None,
        };
        assert_eq!(validate_route(&route), vec![RouteValidationReason::BrokenChain(0, 1)]);
    }
}

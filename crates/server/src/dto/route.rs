use albion_transit::route::{Route, RouteSegment, RouteType, ServicePattern};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct RouteSegmentDto {
    pub from: String,
    pub to: String,
    pub line: String,
    pub distance_km: Option<f64>,
    pub time_min: Option<f64>,
    pub service_pattern: Option<&'static str>,
}

impl From<&RouteSegment> for RouteSegmentDto {
    fn from(segment: &RouteSegment) -> Self {
        Self {
            from: segment.from_station.to_string(),
            to: segment.to_station.to_string(),
            line: segment.line_name.to_string(),
            distance_km: segment.distance_km,
            time_min: segment.time_min,
            service_pattern: segment.service_pattern.map(|p| match p {
                ServicePattern::Underground => "underground",
                ServicePattern::Walking => "walking",
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteDto {
    pub from: String,
    pub to: String,
    pub route_type: &'static str,
    pub changes: usize,
    pub total_distance_km: Option<f64>,
    pub total_time_min: Option<f64>,
    pub segments: Vec<RouteSegmentDto>,
    pub full_path: Option<Vec<String>>,
}

impl From<&Route> for RouteDto {
    fn from(route: &Route) -> Self {
        Self {
            from: route.from_station.to_string(),
            to: route.to_station.to_string(),
            route_type: match route.route_type {
                RouteType::Direct => "direct",
                RouteType::Interchange => "interchange",
                RouteType::Complex => "complex",
            },
            changes: route.changes_required(),
            total_distance_km: route.total_distance_km,
            total_time_min: route.total_time_min,
            segments: route.segments.iter().map(RouteSegmentDto::from).collect(),
            full_path: route
                .full_path
                .as_ref()
                .map(|path| path.iter().map(|s| s.to_string()).collect()),
        }
    }
}

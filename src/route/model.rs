use std::sync::Arc;

/// Qualifier attached to a segment that changes UI presentation
/// (SPEC_FULL.md §3, GLOSSARY).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServicePattern {
    Underground,
    Walking,
}

/// One leg of a materialised route.
#[derive(Debug, Clone)]
pub struct RouteSegment {
    pub from_station: Arc<str>,
    pub to_station: Arc<str>,
    pub line_name: Arc<str>,
    pub distance_km: Option<f64>,
    pub time_min: Option<f64>,
    pub service_pattern: Option<ServicePattern>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteType {
    Direct,
    Interchange,
    Complex,
}

impl RouteType {
    pub fn classify(segment_count: usize) -> Self {
        match segment_count {
            0 | 1 => Self::Direct,
            2 | 3 => Self::Interchange,
            _ => Self::Complex,
        }
    }
}

/// A fully materialised journey, per SPEC_FULL.md §3.
#[derive(Debug, Clone)]
pub struct Route {
    pub from_station: Arc<str>,
    pub to_station: Arc<str>,
    pub segments: Vec<RouteSegment>,
    pub total_distance_km: Option<f64>,
    pub total_time_min: Option<f64>,
    pub route_type: RouteType,
    pub full_path: Option<Vec<Arc<str>>>,
}

impl Route {
    pub fn changes_required(&self) -> usize {
        self.segments.len().saturating_sub(1)
    }

    /// Whether `self` only contains rail segments on a single direct line
    /// (used by the route type and direct-route queries).
    pub fn is_direct(&self) -> bool {
        self.segments.len() == 1
            && !matches!(self.segments[0].service_pattern, Some(ServicePattern::Walking))
    }
}

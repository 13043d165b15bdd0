use std::sync::Arc;

/// Tagged edge kind, per SPEC_FULL.md §9 Design Notes: a single record
/// with an enum `kind` field rather than four separate edge structs, since
/// every consumer branches on the shared `time_min`/`distance_km` shape far
/// more often than on kind-specific payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeKind {
    Rail { line: Arc<str> },
    Walking,
    Underground,
    Interchange,
    Direct,
}

impl EdgeKind {
    /// The label used by the pathfinder/route converter to decide "same
    /// line" continuity (`WALKING`, `INTERCHANGE`, `UNDERGROUND`, `DIRECT`,
    /// or the rail line's own name).
    pub fn label(&self) -> &str {
        match self {
            Self::Rail { line } => line,
            Self::Walking => "WALKING",
            Self::Underground => "UNDERGROUND",
            Self::Interchange => "INTERCHANGE",
            Self::Direct => "DIRECT",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub kind: EdgeKind,
    pub time_min: f64,
    pub distance_km: f64,
    pub walking_distance_m: Option<u32>,
    pub is_direct: bool,
    pub is_walking_connection: bool,
}

impl Edge {
    pub fn line_label(&self) -> &str {
        self.kind.label()
    }
}

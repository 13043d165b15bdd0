//! The small set of types most callers need, re-exported for a single
//! `use albion_transit::prelude::*;`.

pub use crate::{
    config::Config,
    error::{DatasetLoadError, RailError, RouteValidationReason},
    graph::{Edge, EdgeKind, NetworkGraph},
    normalizer::StationNameNormalizer,
    pathfinder::{RoutePreferences, WeightMode},
    repository::{LineStatus, LineType, RailwayLine, Repository, Station},
    route::{Route, RouteSegment, RouteService, RouteType, ServicePattern},
    underground::{Classification, System, UndergroundSystems},
};

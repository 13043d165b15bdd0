use std::{collections::HashMap, sync::Arc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineType {
    #[default]
    Mainline,
    Branch,
    Suburban,
    Metro,
    Heritage,
    Freight,
}

impl LineType {
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "branch" => Self::Branch,
            "suburban" => Self::Suburban,
            "metro" => Self::Metro,
            "heritage" => Self::Heritage,
            "freight" => Self::Freight,
            _ => Self::Mainline,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStatus {
    #[default]
    Active,
    Suspended,
    Closed,
    Seasonal,
}

impl LineStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "suspended" => Self::Suspended,
            "closed" => Self::Closed,
            "seasonal" => Self::Seasonal,
            _ => Self::Active,
        }
    }
}

/// A railway line: an ordered station sequence plus sparse per-pair journey
/// time and distance tables, per SPEC_FULL.md §3.
#[derive(Debug, Clone)]
pub struct RailwayLine {
    pub name: Arc<str>,
    /// Ordered, unique, length >= 2.
    pub stations: Vec<Arc<str>>,
    pub line_type: LineType,
    pub status: LineStatus,
    pub operator: Option<Arc<str>>,
    /// Keyed by `(from, to)`, minutes. Declared journey times win over the
    /// graph builder's speed-heuristic estimate.
    pub journey_times: HashMap<(Arc<str>, Arc<str>), f64>,
    /// Keyed by `(from, to)`, kilometres.
    pub distances: HashMap<(Arc<str>, Arc<str>), f64>,
}

impl RailwayLine {
    pub fn position_of(&self, station: &str) -> Option<usize> {
        self.stations.iter().position(|s| s.as_ref() == station)
    }

    /// Ordered run of stations strictly between (and including) `from` and
    /// `to`, reversed if the line is traversed backwards. Used by the route
    /// converter's intermediate-station enrichment (SPEC_FULL.md §4.7).
    pub fn station_run(&self, from: &str, to: &str) -> Option<Vec<Arc<str>>> {
        let i = self.position_of(from)?;
        let j = self.position_of(to)?;
        if i <= j {
            Some(self.stations[i..=j].to_vec())
        } else {
            let mut run = self.stations[j..=i].to_vec();
            run.reverse();
            Some(run)
        }
    }

    pub fn journey_time(&self, from: &str, to: &str) -> Option<f64> {
        self.journey_times
            .get(&(from.into(), to.into()))
            .or_else(|| self.journey_times.get(&(to.into(), from.into())))
            .copied()
    }

    pub fn distance(&self, from: &str, to: &str) -> Option<f64> {
        self.distances
            .get(&(from.into(), to.into()))
            .or_else(|| self.distances.get(&(to.into(), from.into())))
            .copied()
    }
}

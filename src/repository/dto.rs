//! Dataset-file DTOs. One struct per file shape, each with a `From` impl
//! onto the domain types in `station.rs`/`line.rs`, in the teacher's
//! `gtfs/models.rs` convention. Unlike the teacher's GTFS DTOs this format
//! is explicitly open-ended (SPEC_FULL.md §6: "unknown keys are ignored"),
//! so none of these derive `deny_unknown_fields`.

use crate::shared::Coordinate;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize, Default)]
pub struct IndexManifest {
    #[serde(default)]
    pub lines: Vec<IndexEntry>,
}

#[derive(Debug, Deserialize)]
pub struct IndexEntry {
    pub name: String,
    pub file: String,
    #[serde(default)]
    pub operator: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LineFile {
    pub metadata: LineMetadata,
    #[serde(default)]
    pub stations: Vec<StationEntry>,
    #[serde(default)]
    pub typical_journey_times: HashMap<String, f64>,
    #[serde(default)]
    pub service_patterns: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct LineMetadata {
    pub line_name: String,
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(default)]
    pub line_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StationEntry {
    pub name: String,
    #[serde(default)]
    pub coordinates: Option<Coordinate>,
    #[serde(default)]
    pub times: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub facilities: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct InterchangeConnectionsFile {
    #[serde(default)]
    pub connections: Vec<ConnectionEntry>,
    #[serde(default)]
    pub direct_connections: Vec<DirectConnectionEntry>,
    #[serde(default)]
    pub auto_walking_connections: AutoWalkingConfig,
    #[serde(default)]
    pub line_interchanges: Vec<LineInterchangeEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ConnectionEntry {
    pub from_station: String,
    pub to_station: String,
    /// One of `WALKING`, `UNDERGROUND`, or another dataset-defined tag
    /// (`DIRECT`, `BUS`, ...). Kept as a raw string since the set is open.
    pub connection_type: String,
    #[serde(default)]
    pub time_minutes: Option<f64>,
    #[serde(default)]
    pub walking_distance_m: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinate>,
}

#[derive(Debug, Deserialize)]
pub struct DirectConnectionEntry {
    pub from_station: String,
    pub to_station: String,
    pub connection_type: String,
    #[serde(default)]
    pub time_minutes: Option<f64>,
    #[serde(default)]
    pub walking_distance_m: Option<u32>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct AutoWalkingConfig {
    #[serde(default = "AutoWalkingConfig::default_enabled")]
    pub enabled: bool,
    #[serde(default = "AutoWalkingConfig::default_max_distance_m")]
    pub max_distance_m: u32,
    #[serde(default = "AutoWalkingConfig::default_walking_speed_mps")]
    pub walking_speed_mps: f64,
}

impl AutoWalkingConfig {
    const fn default_enabled() -> bool {
        true
    }
    const fn default_max_distance_m() -> u32 {
        1000
    }
    const fn default_walking_speed_mps() -> f64 {
        1.4
    }
}

impl Default for AutoWalkingConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            max_distance_m: Self::default_max_distance_m(),
            walking_speed_mps: Self::default_walking_speed_mps(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LineInterchangeEntry {
    pub station: String,
    #[serde(default)]
    pub connections: Vec<LineInterchangeConnection>,
}

#[derive(Debug, Deserialize)]
pub struct LineInterchangeConnection {
    pub from_line: String,
    pub to_line: String,
    #[serde(default)]
    pub requires_change: bool,
}

#[derive(Debug, Deserialize, Default)]
pub struct UndergroundStationsFile(pub HashMap<String, UndergroundSystemEntry>);

#[derive(Debug, Deserialize)]
pub struct UndergroundSystemEntry {
    pub system_name: String,
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(default)]
    pub stations: Vec<String>,
    #[serde(default)]
    pub terminals: Vec<String>,
}

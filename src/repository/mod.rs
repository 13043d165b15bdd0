pub mod dto;
pub mod line;
pub mod station;

pub use line::{LineStatus, LineType, RailwayLine};
pub use station::Station;

use crate::{
    error::DatasetLoadError,
    shared::{self},
    underground::UndergroundSystems,
};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
    time::Instant,
};
use tracing::{debug, warn};

/// A declared interchange connection between two stations (walking,
/// underground, direct, ...), read from `interchange_connections.json`.
/// SPEC_FULL.md §6.
#[derive(Debug, Clone)]
pub struct InterchangeConnection {
    pub from_station: Arc<str>,
    pub to_station: Arc<str>,
    pub connection_type: Arc<str>,
    pub time_minutes: Option<f64>,
    pub walking_distance_m: Option<u32>,
}

/// A declared direct connection (e.g. a through train not modelled as a
/// shared line), also read from `interchange_connections.json`.
#[derive(Debug, Clone)]
pub struct DirectConnection {
    pub from_station: Arc<str>,
    pub to_station: Arc<str>,
    pub connection_type: Arc<str>,
    pub time_minutes: Option<f64>,
    pub walking_distance_m: Option<u32>,
}

/// A station-local declaration of which line-to-line transitions are
/// "through services" (no change required). Used by the walking service's
/// through-service exclusion rule (SPEC_FULL.md §4.4 rule 5).
#[derive(Debug, Clone)]
pub struct LineInterchange {
    pub station: Arc<str>,
    pub from_line: Arc<str>,
    pub to_line: Arc<str>,
    pub requires_change: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct AutoWalkingConfig {
    pub enabled: bool,
    pub max_distance_m: u32,
    pub walking_speed_mps: f64,
}

impl From<dto::AutoWalkingConfig> for AutoWalkingConfig {
    fn from(value: dto::AutoWalkingConfig) -> Self {
        Self {
            enabled: value.enabled,
            max_distance_m: value.max_distance_m,
            walking_speed_mps: value.walking_speed_mps,
        }
    }
}

/// Loaded, deduplicated view over the four dataset files of SPEC_FULL.md
/// §6. Construction never fails outright: a malformed file is logged and
/// its contribution dropped (§4.1, §7).
#[derive(Debug, Clone)]
pub struct Repository {
    stations: Vec<Station>,
    station_index: HashMap<Arc<str>, u32>,
    lines: Vec<RailwayLine>,
    line_index: HashMap<Arc<str>, usize>,
    pub interchange_connections: Vec<InterchangeConnection>,
    pub direct_connections: Vec<DirectConnection>,
    pub auto_walking: AutoWalkingConfig,
    pub line_interchanges: Vec<LineInterchange>,
    pub underground: UndergroundSystems,
}

impl Repository {
    /// Loads the dataset rooted at `root` (see SPEC_FULL.md §6 for the
    /// expected layout). Returns the repository together with every soft
    /// failure encountered; a fully empty dataset is a valid terminal
    /// state.
    pub fn load(root: &Path) -> (Self, Vec<DatasetLoadError>) {
        let mut errors = Vec::new();

        let (lines, coordinates) = load_lines(root, &mut errors);
        let (stations, station_index) = dedup_stations(&lines, &coordinates);
        let mut line_index = HashMap::with_capacity(lines.len());
        for (i, line) in lines.iter().enumerate() {
            line_index.insert(line.name.clone(), i);
        }

        let (interchange_connections, direct_connections, auto_walking, line_interchanges) =
            load_interchange_connections(root, &mut errors);

        let underground = load_underground_systems(root, &mut errors);

        let repo = Self {
            stations,
            station_index,
            lines,
            line_index,
            interchange_connections,
            direct_connections,
            auto_walking,
            line_interchanges,
            underground,
        };
        (repo, errors)
    }

    pub fn station(&self, name: &str) -> Option<&Station> {
        self.station_index
            .get(name)
            .and_then(|&i| self.stations.get(i as usize))
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn line(&self, name: &str) -> Option<&RailwayLine> {
        self.line_index.get(name).map(|&i| &self.lines[i])
    }

    pub fn lines(&self) -> &[RailwayLine] {
        &self.lines
    }

    pub fn lines_serving(&self, station: &str) -> Vec<&RailwayLine> {
        self.lines
            .iter()
            .filter(|l| l.stations.iter().any(|s| s.as_ref() == station))
            .collect()
    }

    /// Lines that include both `a` and `b` in their station sequence.
    pub fn common_lines(&self, a: &str, b: &str) -> Vec<&RailwayLine> {
        self.lines
            .iter()
            .filter(|l| {
                l.stations.iter().any(|s| s.as_ref() == a)
                    && l.stations.iter().any(|s| s.as_ref() == b)
            })
            .collect()
    }

    pub fn journey_time(&self, a: &str, b: &str, line: &str) -> Option<f64> {
        self.line(line)?.journey_time(a, b)
    }

    pub fn distance(&self, a: &str, b: &str, line: &str) -> Option<f64> {
        self.line(line)?.distance(a, b)
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn interchange_count(&self) -> usize {
        self.stations.iter().filter(|s| s.is_interchange()).count()
    }

    /// Tiered fuzzy search over station names (SPEC_FULL.md §4.1).
    pub fn search_stations(&self, needle: &str, limit: usize) -> Vec<&Station> {
        let mut results = shared::search(needle, &self.stations);
        results.truncate(limit);
        results
    }
}

fn load_lines(
    root: &Path,
    errors: &mut Vec<DatasetLoadError>,
) -> (Vec<RailwayLine>, HashMap<Arc<str>, crate::shared::Coordinate>) {
    debug!("loading line index...");
    let now = Instant::now();
    let index_path = root.join("railway_lines_index_comprehensive.json");
    let files: Vec<PathBuf> = match std::fs::read_to_string(&index_path) {
        Ok(raw) => match serde_json::from_str::<dto::IndexManifest>(&raw) {
            Ok(manifest) => manifest
                .lines
                .into_iter()
                .map(|entry| root.join("lines").join(entry.file))
                .collect(),
            Err(source) => {
                errors.push(DatasetLoadError::Malformed {
                    path: index_path,
                    source,
                });
                list_line_files(root)
            }
        },
        Err(_) => list_line_files(root),
    };
    debug!("loading line index took {:?}", now.elapsed());

    debug!("loading {} line files...", files.len());
    let now = Instant::now();
    let mut lines = Vec::with_capacity(files.len());
    let mut coordinates = HashMap::new();
    for path in files {
        match load_line_file(&path) {
            Ok((line, coords)) => {
                coordinates.extend(coords);
                lines.push(line);
            }
            Err(e) => {
                warn!(?e, "skipping malformed line file");
                errors.push(e);
            }
        }
    }
    debug!("loading {} lines took {:?}", lines.len(), now.elapsed());
    (lines, coordinates)
}

fn list_line_files(root: &Path) -> Vec<PathBuf> {
    let dir = root.join("lines");
    std::fs::read_dir(&dir)
        .into_iter()
        .flatten()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect()
}

fn load_line_file(
    path: &Path,
) -> Result<(RailwayLine, HashMap<Arc<str>, crate::shared::Coordinate>), DatasetLoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| DatasetLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: dto::LineFile =
        serde_json::from_str(&raw).map_err(|source| DatasetLoadError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

    let name: Arc<str> = file.metadata.line_name.into();
    let mut stations = Vec::with_capacity(file.stations.len());
    let mut coordinates = HashMap::new();
    for entry in &file.stations {
        let station_name: Arc<str> = entry.name.clone().into();
        if !stations.contains(&station_name) {
            stations.push(station_name.clone());
        }
        if let Some(coord) = entry.coordinates {
            coordinates.insert(station_name, coord);
        }
    }

    let mut journey_times = HashMap::new();
    for (key, minutes) in file.typical_journey_times {
        if let Some((a, b)) = key.split_once('-') {
            journey_times.insert((a.trim().into(), b.trim().into()), minutes);
        }
    }

    let line = RailwayLine {
        name,
        stations,
        line_type: file
            .metadata
            .line_type
            .as_deref()
            .map(LineType::parse)
            .unwrap_or_default(),
        status: file
            .metadata
            .status
            .as_deref()
            .map(LineStatus::parse)
            .unwrap_or_default(),
        operator: file.metadata.operator.map(Into::into),
        journey_times,
        distances: HashMap::new(),
    };
    Ok((line, coordinates))
}

fn dedup_stations(
    lines: &[RailwayLine],
    coordinates: &HashMap<Arc<str>, crate::shared::Coordinate>,
) -> (Vec<Station>, HashMap<Arc<str>, u32>) {
    debug!("deduplicating stations across {} lines...", lines.len());
    let now = Instant::now();
    let mut by_name: HashMap<Arc<str>, Station> = HashMap::new();
    for line in lines {
        for station_name in &line.stations {
            let entry = by_name.entry(station_name.clone()).or_insert_with(|| Station {
                index: 0,
                name: station_name.clone(),
                normalized_name: station::normalize_for_search(station_name),
                coordinate: coordinates.get(station_name).copied(),
                lines: Vec::new(),
                operator: line.operator.clone(),
                zone: None,
                facilities: Vec::new(),
            });
            if !entry.lines.contains(&line.name) {
                entry.lines.push(line.name.clone());
            }
        }
    }

    let mut stations: Vec<Station> = by_name.into_values().collect();
    stations.sort_by(|a, b| a.name.cmp(&b.name));
    let mut index = HashMap::with_capacity(stations.len());
    for (i, station) in stations.iter_mut().enumerate() {
        station.index = i as u32;
        index.insert(station.name.clone(), i as u32);
    }
    debug!(
        "deduplicated into {} stations ({} interchanges) in {:?}",
        stations.len(),
        stations.iter().filter(|s| s.is_interchange()).count(),
        now.elapsed()
    );
    (stations, index)
}

fn load_interchange_connections(
    root: &Path,
    errors: &mut Vec<DatasetLoadError>,
) -> (
    Vec<InterchangeConnection>,
    Vec<DirectConnection>,
    AutoWalkingConfig,
    Vec<LineInterchange>,
) {
    debug!("loading interchange connections...");
    let now = Instant::now();
    let path = root.join("interchange_connections.json");
    let file = match std::fs::read_to_string(&path) {
        Ok(raw) => match serde_json::from_str::<dto::InterchangeConnectionsFile>(&raw) {
            Ok(file) => file,
            Err(source) => {
                errors.push(DatasetLoadError::Malformed { path, source });
                dto::InterchangeConnectionsFile::default()
            }
        },
        Err(_) => dto::InterchangeConnectionsFile::default(),
    };

    let connections = file
        .connections
        .into_iter()
        .map(|c| InterchangeConnection {
            from_station: c.from_station.into(),
            to_station: c.to_station.into(),
            connection_type: c.connection_type.into(),
            time_minutes: c.time_minutes,
            walking_distance_m: c.walking_distance_m,
        })
        .collect();

    let direct_connections = file
        .direct_connections
        .into_iter()
        .map(|c| DirectConnection {
            from_station: c.from_station.into(),
            to_station: c.to_station.into(),
            connection_type: c.connection_type.into(),
            time_minutes: c.time_minutes,
            walking_distance_m: c.walking_distance_m,
        })
        .collect();

    let line_interchanges = file
        .line_interchanges
        .into_iter()
        .flat_map(|entry| {
            let station: Arc<str> = entry.station.into();
            entry
                .connections
                .into_iter()
                .map(move |c| LineInterchange {
                    station: station.clone(),
                    from_line: c.from_line.into(),
                    to_line: c.to_line.into(),
                    requires_change: c.requires_change,
                })
                .collect::<Vec<_>>()
        })
        .collect();

    debug!("loading interchange connections took {:?}", now.elapsed());
    (
        connections,
        direct_connections,
        file.auto_walking_connections.into(),
        line_interchanges,
    )
}

fn load_underground_systems(
    root: &Path,
    errors: &mut Vec<DatasetLoadError>,
) -> UndergroundSystems {
    debug!("loading underground systems...");
    let now = Instant::now();
    let path = root.join("uk_underground_stations.json");
    let systems = match std::fs::read_to_string(&path) {
        Ok(raw) => match serde_json::from_str::<dto::UndergroundStationsFile>(&raw) {
            Ok(file) => UndergroundSystems::from_dto(file),
            Err(source) => {
                errors.push(DatasetLoadError::Malformed { path, source });
                UndergroundSystems::empty()
            }
        },
        Err(_) => UndergroundSystems::empty(),
    };
    debug!("loading underground systems took {:?}", now.elapsed());
    systems
}

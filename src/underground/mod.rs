pub mod blackbox;

use crate::repository::dto::UndergroundStationsFile;
use std::{collections::HashSet, sync::Arc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum System {
    London,
    Glasgow,
    TyneAndWear,
}

impl System {
    fn from_key(key: &str) -> Self {
        let lower = key.to_lowercase();
        if lower.contains("glasgow") {
            Self::Glasgow
        } else if lower.contains("tyne") {
            Self::TyneAndWear
        } else {
            Self::London
        }
    }

    /// Characteristic mean speed in km/h, used by `create_black_box_route`.
    pub fn mean_speed_kmh(&self) -> f64 {
        match self {
            Self::London => 22.0,
            Self::Glasgow => 18.0,
            Self::TyneAndWear => 27.0,
        }
    }

    /// Plausible journey-time range in minutes, used to clamp the estimate.
    pub fn time_range_min(&self) -> (f64, f64) {
        match self {
            Self::London => (10.0, 40.0),
            Self::Glasgow => (5.0, 20.0),
            Self::TyneAndWear => (8.0, 35.0),
        }
    }
}

#[derive(Debug, Clone)]
struct SystemData {
    system: System,
    name: Arc<str>,
    stations: HashSet<Arc<str>>,
    terminals: HashSet<Arc<str>>,
}

/// Classification of a station with respect to the three underground
/// systems, per SPEC_FULL.md §4.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Belongs to a system and is not a National Rail station.
    UndergroundOnly(System),
    /// Belongs to a system and is also a National Rail station.
    Mixed(System),
    Neither,
}

impl Classification {
    pub fn system(&self) -> Option<System> {
        match self {
            Self::UndergroundOnly(s) | Self::Mixed(s) => Some(*s),
            Self::Neither => None,
        }
    }

    pub fn is_underground_only(&self) -> bool {
        matches!(self, Self::UndergroundOnly(_))
    }

    pub fn is_underground(&self) -> bool {
        !matches!(self, Self::Neither)
    }
}

/// Knows the three underground systems and classifies stations against
/// them. Deliberately stateless with respect to any routing service --
/// `Station` carries no back-reference here, breaking the cyclic import
/// the source exhibited (SPEC_FULL.md §9).
#[derive(Debug, Clone, Default)]
pub struct UndergroundSystems {
    systems: Vec<SystemData>,
    /// Hard-coded mainline <-> subway aliases (e.g. "Glasgow Central" <->
    /// "St Enoch"), consulted by both this classifier and the normalizer.
    aliases: Vec<(Arc<str>, Arc<str>)>,
}

fn fold_name(name: &str) -> String {
    name.to_lowercase()
        .trim_start_matches("london ")
        .replace(['\'', '.'], "")
        .trim()
        .to_string()
}

impl UndergroundSystems {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_dto(file: UndergroundStationsFile) -> Self {
        let mut systems = Vec::with_capacity(file.0.len());
        for (key, entry) in file.0 {
            systems.push(SystemData {
                system: System::from_key(&key),
                name: entry.system_name.into(),
                stations: entry.stations.iter().map(|s| fold_name(s).into()).collect(),
                terminals: entry.terminals.iter().map(|s| fold_name(s).into()).collect(),
            });
        }
        Self {
            systems,
            aliases: default_aliases(),
        }
    }

    fn resolve_alias(&self, folded: &str) -> String {
        for (a, b) in &self.aliases {
            if a.as_ref() == folded {
                return fold_name(b);
            }
            if b.as_ref() == folded {
                return fold_name(a);
            }
        }
        folded.to_string()
    }

    fn system_data(&self, system: System) -> Option<&SystemData> {
        self.systems.iter().find(|s| s.system == system)
    }

    pub fn system_name(&self, system: System) -> Option<&str> {
        self.system_data(system).map(|s| s.name.as_ref())
    }

    fn membership(&self, name: &str) -> Option<(System, bool)> {
        let folded = fold_name(name);
        let aliased = self.resolve_alias(&folded);
        for data in &self.systems {
            let is_member = data.stations.contains(folded.as_str())
                || data.stations.contains(aliased.as_str());
            if is_member {
                let is_terminal = data.terminals.contains(folded.as_str())
                    || data.terminals.contains(aliased.as_str());
                return Some((data.system, is_terminal));
            }
        }
        None
    }

    pub fn is_terminal(&self, system: System, name: &str) -> bool {
        matches!(self.membership(name), Some((s, true)) if s == system)
    }

    /// Classifies `name` against the underground systems and the National
    /// Rail station set (`is_national_rail`).
    pub fn classify(&self, name: &str, is_national_rail: impl FnOnce(&str) -> bool) -> Classification {
        match self.membership(name) {
            Some((system, _)) if is_national_rail(name) => Classification::Mixed(system),
            Some((system, _)) => Classification::UndergroundOnly(system),
            None => Classification::Neither,
        }
    }
}

fn default_aliases() -> Vec<(Arc<str>, Arc<str>)> {
    vec![
        (fold_name("Glasgow Central").into(), fold_name("St Enoch").into()),
        (
            fold_name("Newcastle").into(),
            fold_name("Newcastle Monument").into(),
        ),
    ]
}

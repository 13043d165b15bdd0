use serde::Deserialize;
use std::path::PathBuf;

/// Dataset root + routing tunables, per SPEC_FULL.md §6. Mirrors the
/// teacher's `GTFS_DATA_PATH`-driven startup in `crates/server/src/main.rs`,
/// but only the dataset root is meant to be environment-driven -- the
/// routing tunables below are configuration defaults, not deployment facts,
/// and are more commonly overridden per-call via `RoutePreferences`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub dataset_root: PathBuf,
    #[serde(default = "Config::default_auto_walking_enabled")]
    pub auto_walking_enabled: bool,
    #[serde(default = "Config::default_max_walking_distance_m")]
    pub max_walking_distance_m: u32,
    #[serde(default = "Config::default_walking_penalty")]
    pub walking_penalty: f64,
    #[serde(default = "Config::default_max_changes")]
    pub max_changes_default: u32,
}

impl Config {
    const fn default_auto_walking_enabled() -> bool {
        true
    }

    const fn default_max_walking_distance_m() -> u32 {
        1000
    }

    const fn default_walking_penalty() -> f64 {
        2.0
    }

    const fn default_max_changes() -> u32 {
        8
    }

    /// Reads `RAIL_DATA_PATH` for the dataset root; every other field takes
    /// its default. Analogous to the teacher's `env::var("GTFS_DATA_PATH")`.
    pub fn from_env() -> Result<Self, std::env::VarError> {
        let dataset_root = std::env::var("RAIL_DATA_PATH")?.into();
        Ok(Self {
            dataset_root,
            auto_walking_enabled: Self::default_auto_walking_enabled(),
            max_walking_distance_m: Self::default_max_walking_distance_m(),
            walking_penalty: Self::default_walking_penalty(),
            max_changes_default: Self::default_max_changes(),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_root: PathBuf::from("."),
            auto_walking_enabled: Self::default_auto_walking_enabled(),
            max_walking_distance_m: Self::default_max_walking_distance_m(),
            walking_penalty: Self::default_walking_penalty(),
            max_changes_default: Self::default_max_changes(),
        }
    }
}

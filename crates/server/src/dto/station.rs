use albion_transit::repository::Station;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct StationDto {
    pub name: String,
    pub lines: Vec<String>,
    pub is_interchange: bool,
}

impl From<&Station> for StationDto {
    fn from(station: &Station) -> Self {
        Self {
            name: station.name.to_string(),
            lines: station.lines.iter().map(|l| l.to_string()).collect(),
            is_interchange: station.is_interchange(),
        }
    }
}

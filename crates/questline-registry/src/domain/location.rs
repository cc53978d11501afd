//! Locations: named, fixed-size groups of stations.

use super::ids::StationId;
use super::station::Station;

/// A named group of stations. Membership is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    name: String,
    stations: Vec<Station>,
}

impl Location {
    /// Creates a location with stations `name-1 … name-N`.
    #[must_use]
    pub fn new(name: impl Into<String>, station_count: u32) -> Self {
        let name = name.into();
        let stations = (1..=station_count)
            .map(|index| Station::new(StationId::new(name.clone(), index)))
            .collect();
        Self { name, stations }
    }

    /// Rebuilds a location from already-restored stations.
    pub(crate) fn from_stations(name: String, stations: Vec<Station>) -> Self {
        Self { name, stations }
    }

    /// The location name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stations in creation order.
    #[must_use]
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub(crate) fn stations_mut(&mut self) -> &mut [Station] {
        &mut self.stations
    }

    /// First empty station in creation order.
    #[must_use]
    pub fn first_empty_station(&self) -> Option<&Station> {
        self.stations.iter().find(|station| station.is_empty())
    }
}

use super::sim_error::SimError;
use super::station::Station;
use super::train::Train;

/// In-memory reference data: the known stations and the timetabled trains.
///
/// The registry is immutable during normal operation; trains keep their
/// insertion order and `search` preserves it.
pub struct Registry {
    stations: Vec<Station>,
    trains: Vec<Train>,
}

impl Registry {
    pub fn new() -> Self {
        Registry {
            stations: Vec::new(),
            trains: Vec::new(),
        }
    }

    /// Loads the built-in demo network: ten major Indian stations and ten
    /// trains between them.
    pub fn with_demo_data() -> Result<Self, SimError> {
        let mut registry = Registry::new();

        let station_data = [
            ("sta_1", "New Delhi Railway Station", "NDLS", 28.6419, 77.2194),
            ("sta_2", "Mumbai Central", "MMCT", 18.9712, 72.8246),
            ("sta_3", "Chennai Central", "MAS", 13.0827, 80.2707),
            ("sta_4", "Howrah Junction", "HWH", 22.5986, 88.3425),
            ("sta_5", "Bangalore City Junction", "SBC", 12.9784, 77.5731),
            ("sta_6", "Jaipur Junction", "JP", 26.9172, 75.8152),
            ("sta_7", "Ahmedabad Junction", "ADI", 23.0330, 72.5678),
            ("sta_8", "Hyderabad Deccan", "HYB", 17.3845, 78.4799),
            ("sta_9", "Pune Junction", "PUNE", 18.5285, 73.8740),
            ("sta_10", "Lucknow Charbagh", "LKO", 26.8333, 80.9167),
        ];

        for (id, name, code, latitude, longitude) in station_data {
            registry.add_station(Station::new(id, name, code, latitude, longitude));
        }

        let train_data: [(&str, &str, &str, &str, &str, &[&str], &str, &str, &str); 10] = [
            (
                "trn_1",
                "12301",
                "Rajdhani Express",
                "NDLS",
                "MMCT",
                &["ADI", "PUNE"],
                "16:25",
                "08:15",
                "15h 50m",
            ),
            (
                "trn_2",
                "12259",
                "Shatabdi Express",
                "NDLS",
                "JP",
                &[],
                "06:05",
                "10:35",
                "4h 30m",
            ),
            (
                "trn_3",
                "12622",
                "Tamil Nadu Express",
                "NDLS",
                "MAS",
                &["HYB", "SBC"],
                "22:30",
                "06:45",
                "32h 15m",
            ),
            (
                "trn_4",
                "12802",
                "Purushottam Express",
                "NDLS",
                "LKO",
                &[],
                "21:25",
                "06:45",
                "9h 20m",
            ),
            (
                "trn_5",
                "12314",
                "Sealdah Rajdhani",
                "NDLS",
                "HWH",
                &["LKO"],
                "16:30",
                "10:10",
                "17h 40m",
            ),
            (
                "trn_6",
                "12951",
                "Mumbai Rajdhani",
                "MMCT",
                "NDLS",
                &["ADI", "JP"],
                "17:00",
                "08:35",
                "15h 35m",
            ),
            (
                "trn_7",
                "12028",
                "Shatabdi Express",
                "MMCT",
                "PUNE",
                &[],
                "05:50",
                "08:40",
                "2h 50m",
            ),
            (
                "trn_8",
                "12657",
                "Chennai Mail",
                "MAS",
                "HYB",
                &[],
                "23:00",
                "13:15",
                "14h 15m",
            ),
            (
                "trn_9",
                "12246",
                "Duronto Express",
                "HWH",
                "NDLS",
                &[],
                "20:05",
                "13:30",
                "17h 25m",
            ),
            (
                "trn_10",
                "22691",
                "Rajdhani Express",
                "SBC",
                "HYB",
                &[],
                "20:30",
                "07:10",
                "10h 40m",
            ),
        ];

        for (id, number, name, source, destination, intermediates, departure, arrival, duration) in
            train_data
        {
            let source = registry.station_clone_by_code(source)?;
            let destination = registry.station_clone_by_code(destination)?;
            let intermediate_stations = intermediates
                .iter()
                .map(|code| registry.station_clone_by_code(code))
                .collect::<Result<Vec<Station>, SimError>>()?;

            let train = Train::new(
                id,
                number,
                name,
                source,
                destination,
                intermediate_stations,
                departure,
                arrival,
                duration,
            )?;
            registry.add_train(train);
        }

        Ok(registry)
    }

    /// Adds a station to the registry.
    pub fn add_station(&mut self, station: Station) {
        self.stations.push(station);
    }

    /// Adds a train to the registry.
    pub fn add_train(&mut self, train: Train) {
        self.trains.push(train);
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn trains(&self) -> &[Train] {
        &self.trains
    }

    /// Looks up a train by its exact human-facing number.
    pub fn train_by_number(&self, number: &str) -> Option<&Train> {
        self.trains.iter().find(|train| train.number == number)
    }

    pub fn station_by_id(&self, id: &str) -> Option<&Station> {
        self.stations.iter().find(|station| station.id == id)
    }

    pub fn station_by_code(&self, code: &str) -> Option<&Station> {
        self.stations.iter().find(|station| station.code == code)
    }

    fn station_clone_by_code(&self, code: &str) -> Result<Station, SimError> {
        self.station_by_code(code)
            .cloned()
            .ok_or_else(|| SimError::StationNotFound(code.to_string()))
    }

    /// Filters the train list with the supplied queries.
    ///
    /// Each non-empty query is matched case-insensitively as a substring:
    /// source/destination against both the station name and code, name and
    /// number against the train fields directly. Filters compose with AND;
    /// empty or omitted queries impose no constraint. Result order is the
    /// registry's natural order.
    pub fn search(
        &self,
        source: Option<&str>,
        destination: Option<&str>,
        name: Option<&str>,
        number: Option<&str>,
    ) -> Vec<&Train> {
        let source_query = normalize_query(source);
        let destination_query = normalize_query(destination);
        let name_query = normalize_query(name);
        let number_query = normalize_query(number);

        self.trains
            .iter()
            .filter(|train| {
                source_query
                    .as_deref()
                    .map_or(true, |q| station_matches(&train.source, q))
                    && destination_query
                        .as_deref()
                        .map_or(true, |q| station_matches(&train.destination, q))
                    && name_query
                        .as_deref()
                        .map_or(true, |q| train.name.to_lowercase().contains(q))
                    && number_query
                        .as_deref()
                        .map_or(true, |q| train.number.to_lowercase().contains(q))
            })
            .collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new()
    }
}

fn normalize_query(query: Option<&str>) -> Option<String> {
    query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase)
}

fn station_matches(station: &Station, query: &str) -> bool {
    station.name.to_lowercase().contains(query) || station.code.to_lowercase().contains(query)
}

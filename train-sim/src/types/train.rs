use chrono::NaiveTime;

use super::sim_error::SimError;
use super::station::Station;

/// Represents a scheduled train service: source and destination stations, the
/// ordered intermediate stops between them, and timetable metadata.
///
/// The intermediate order is trusted to follow the physical path; the
/// simulator does not validate or reorder it.
#[derive(Clone, Debug)]
pub struct Train {
    pub id: String,
    pub number: String,
    pub name: String,
    pub source: Station,
    pub destination: Station,
    pub intermediate_stations: Vec<Station>,
    pub departure_time: NaiveTime,
    pub arrival_time: NaiveTime,
    pub duration: String,
}

impl Train {
    /// Creates a new train, parsing and validating the timetable strings.
    pub fn new(
        id: &str,
        number: &str,
        name: &str,
        source: Station,
        destination: Station,
        intermediate_stations: Vec<Station>,
        departure_time_str: &str,
        arrival_time_str: &str,
        duration: &str,
    ) -> Result<Self, SimError> {
        if number.trim().is_empty() || name.trim().is_empty() {
            return Err(SimError::InvalidInput);
        }

        let departure_time = parse_time(departure_time_str)?;
        let arrival_time = parse_time(arrival_time_str)?;

        Ok(Train {
            id: id.to_string(),
            number: number.to_string(),
            name: name.to_string(),
            source,
            destination,
            intermediate_stations,
            departure_time,
            arrival_time,
            duration: duration.to_string(),
        })
    }

    /// The full ordered stop sequence: source, intermediates, destination.
    pub fn route_stations(&self) -> Vec<&Station> {
        let mut stations = Vec::with_capacity(self.intermediate_stations.len() + 2);
        stations.push(&self.source);
        stations.extend(self.intermediate_stations.iter());
        stations.push(&self.destination);
        stations
    }

    /// Every station an alert can target: the intermediates plus the destination.
    pub fn alert_stations(&self) -> Vec<&Station> {
        let mut stations: Vec<&Station> = self.intermediate_stations.iter().collect();
        stations.push(&self.destination);
        stations
    }
}

fn parse_time(time_str: &str) -> Result<NaiveTime, SimError> {
    let format = "%H:%M"; // The expected format for timetable input
    NaiveTime::parse_from_str(time_str, format)
        .map_err(|_| SimError::InvalidTimeFormat(time_str.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(id: &str, code: &str) -> Station {
        Station::new(id, &format!("{} Station", code), code, 20.0, 75.0)
    }

    #[test]
    fn test_route_stations_keeps_order() {
        let train = Train::new(
            "trn_t1",
            "11111",
            "Test Express",
            station("sta_a", "AAA"),
            station("sta_d", "DDD"),
            vec![station("sta_b", "BBB"), station("sta_c", "CCC")],
            "10:00",
            "16:00",
            "6h 0m",
        )
        .expect("Train should be valid");

        let codes: Vec<&str> = train
            .route_stations()
            .iter()
            .map(|s| s.code.as_str())
            .collect();
        assert_eq!(codes, vec!["AAA", "BBB", "CCC", "DDD"]);
    }

    #[test]
    fn test_invalid_time_is_rejected() {
        let result = Train::new(
            "trn_t2",
            "22222",
            "Test Express",
            station("sta_a", "AAA"),
            station("sta_b", "BBB"),
            Vec::new(),
            "25:99",
            "10:00",
            "1h 0m",
        );
        assert!(matches!(result, Err(SimError::InvalidTimeFormat(_))));
    }

    #[test]
    fn test_blank_number_is_rejected() {
        let result = Train::new(
            "trn_t3",
            "  ",
            "Test Express",
            station("sta_a", "AAA"),
            station("sta_b", "BBB"),
            Vec::new(),
            "10:00",
            "11:00",
            "1h 0m",
        );
        assert!(matches!(result, Err(SimError::InvalidInput)));
    }
}

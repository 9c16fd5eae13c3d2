/// Represents a railway station with its name, short code, and geographic position.

#[derive(Clone, Debug, PartialEq)]
pub struct Station {
    pub id: String,
    pub name: String,
    pub code: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Station {
    pub fn new(id: &str, name: &str, code: &str, latitude: f64, longitude: f64) -> Self {
        Station {
            id: id.to_string(),
            name: name.to_string(),
            code: code.to_string(),
            latitude,
            longitude,
        }
    }
}

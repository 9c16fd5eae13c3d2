use super::train::Train;

/// Interpolated points emitted between each pair of consecutive stations.
pub const POINTS_PER_SEGMENT: usize = 5;

/// A coordinate sample along a train's route. Has no identity, only position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoutePoint {
    pub lat: f64,
    pub lng: f64,
}

impl RoutePoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        RoutePoint { lat, lng }
    }
}

/// Builds the dense coordinate sequence used to animate a train across a map.
///
/// For each consecutive station pair (A, B) this emits A followed by
/// `POINTS_PER_SEGMENT` evenly spaced points `A + (B - A) * k / 6`, and
/// appends the destination once at the end. Interpolation is linear in
/// latitude/longitude, not geodesic; at this precision that is an acceptable
/// approximation for a simulation.
///
/// The result always starts at the source coordinate, ends at the
/// destination coordinate, and has length `6 * station_pairs + 1`.
pub fn generate_route(train: &Train) -> Vec<RoutePoint> {
    let stops: Vec<RoutePoint> = train
        .route_stations()
        .iter()
        .map(|station| RoutePoint::new(station.latitude, station.longitude))
        .collect();

    let segments = stops.len().saturating_sub(1);
    let mut detailed = Vec::with_capacity(segments * (POINTS_PER_SEGMENT + 1) + 1);

    for pair in stops.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        detailed.push(start);

        for k in 1..=POINTS_PER_SEGMENT {
            let fraction = k as f64 / (POINTS_PER_SEGMENT + 1) as f64;
            detailed.push(RoutePoint::new(
                start.lat + (end.lat - start.lat) * fraction,
                start.lng + (end.lng - start.lng) * fraction,
            ));
        }
    }

    if let Some(destination) = stops.last() {
        detailed.push(*destination);
    }

    detailed
}

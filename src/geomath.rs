//! Distance and walking-time primitives
//!
//! Distances are great-circle, computed with the haversine formula over the
//! coordinate pair. Candidate radii get compared against provider-reported
//! results, so a flat-Earth approximation is not acceptable here.

use haversine::{Location as HaversineLocation, Units, distance};

use crate::models::Coordinate;

/// Average walking speed used to derive walking times
pub const WALKING_SPEED_M_PER_MIN: u32 = 80;

fn to_haversine(position: Coordinate) -> HaversineLocation {
    HaversineLocation {
        latitude: position.lat,
        longitude: position.lng,
    }
}

/// Great-circle distance between two positions in kilometers
#[must_use]
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    distance(to_haversine(a), to_haversine(b), Units::Kilometers)
}

/// Great-circle distance between two positions, rounded to the nearest meter
#[must_use]
pub fn distance_meters(a: Coordinate, b: Coordinate) -> u32 {
    (distance_km(a, b) * 1000.0).round() as u32
}

/// Walking time for a distance, floor-truncated to whole minutes.
/// A distance of 79m yields 0 minutes; this is intentional truncation.
#[must_use]
pub fn walking_minutes(distance_m: u32) -> u32 {
    distance_m / WALKING_SPEED_M_PER_MIN
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(159, 1)]
    #[case(80, 1)]
    #[case(79, 0)]
    #[case(0, 0)]
    #[case(400, 5)]
    fn test_walking_minutes_floor(#[case] distance_m: u32, #[case] expected_min: u32) {
        assert_eq!(walking_minutes(distance_m), expected_min);
    }

    #[test]
    fn test_distance_zero_for_same_point() {
        let downtown = Coordinate::new(49.2827, -123.1207);
        assert_eq!(distance_meters(downtown, downtown), 0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Coordinate::new(49.2827, -123.1207);
        let b = Coordinate::new(49.2488, -123.1002);
        assert_eq!(distance_meters(a, b), distance_meters(b, a));
    }

    #[test]
    fn test_known_distance_downtown_to_city_hall() {
        // Vancouver Art Gallery to Vancouver City Hall, roughly 3.9km
        let gallery = Coordinate::new(49.2829, -123.1207);
        let city_hall = Coordinate::new(49.2609, -123.1139);
        let d = distance_meters(gallery, city_hall);
        assert!((2000..6000).contains(&d), "unexpected distance: {d}m");
    }

    #[test]
    fn test_km_and_meters_agree() {
        let a = Coordinate::new(49.2827, -123.1207);
        let b = Coordinate::new(49.3, -123.0);
        let km = distance_km(a, b);
        let m = distance_meters(a, b);
        assert!((km * 1000.0 - f64::from(m)).abs() <= 0.5);
    }
}

//! Candidate aggregation: filter, dedup, distance, rank
//!
//! Pure function of its inputs; no side effects. Used identically across the
//! schools, transit, and parks lookups.

use std::collections::HashSet;

use crate::geomath;
use crate::models::{Coordinate, PlaceCandidate, PlaceType, RankedPlace};

/// Maximum number of ranked places returned per result set
pub const MAX_RESULTS: usize = 5;

/// Decimal places kept on result coordinates
const COORDINATE_PRECISION: u32 = 4;

const NO_ADDRESS: &str = "No address available";

/// Aggregate raw place candidates into a ranked, presentable result set.
///
/// - Candidates survive only when their category set intersects
///   `allowed_categories`.
/// - The first occurrence of each distinct name wins; later candidates with
///   the same name are discarded regardless of distance.
/// - `category_labels` is an ordered (category, label) mapping; the first
///   entry whose category appears on the candidate decides the display type,
///   with `fallback_type` applying when none match.
/// - Output is sorted ascending by distance (stable, ties keep filter order),
///   truncated to [`MAX_RESULTS`], and ranked 1..=k.
#[must_use]
pub fn aggregate(
    candidates: &[PlaceCandidate],
    origin: Coordinate,
    allowed_categories: &[&str],
    category_labels: &[(&str, PlaceType)],
    fallback_type: PlaceType,
) -> Vec<RankedPlace> {
    let mut seen_names: HashSet<&str> = HashSet::new();
    let mut ranked: Vec<RankedPlace> = Vec::new();

    for candidate in candidates {
        let allowed = candidate
            .categories
            .iter()
            .any(|category| allowed_categories.contains(&category.as_str()));
        if !allowed {
            continue;
        }

        if !seen_names.insert(candidate.name.as_str()) {
            continue;
        }

        let distance_m = geomath::distance_meters(origin, candidate.location);
        let place_type = category_labels
            .iter()
            .find(|(category, _)| candidate.categories.iter().any(|c| c == category))
            .map_or(fallback_type, |(_, label)| *label);

        ranked.push(RankedPlace {
            name: candidate.name.clone(),
            place_type,
            address: candidate
                .address
                .clone()
                .unwrap_or_else(|| NO_ADDRESS.to_string()),
            location: candidate.location.rounded(COORDINATE_PRECISION),
            distance_m,
            walking_time_min: geomath::walking_minutes(distance_m),
            maps_url: candidate.location.maps_url(),
            rank: 0,
        });
    }

    ranked.sort_by_key(|place| place.distance_m);
    ranked.truncate(MAX_RESULTS);
    for (index, place) in ranked.iter_mut().enumerate() {
        place.rank = index as u32 + 1;
    }

    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, categories: &[&str], lat: f64, lng: f64) -> PlaceCandidate {
        PlaceCandidate {
            name: name.to_string(),
            categories: categories.iter().map(ToString::to_string).collect(),
            location: Coordinate::new(lat, lng),
            address: Some(format!("{name} address")),
        }
    }

    fn origin() -> Coordinate {
        Coordinate::new(49.2827, -123.1207)
    }

    const PARK_CATEGORIES: [&str; 4] = ["park", "playground", "trail", "dog_park"];

    #[test]
    fn test_filter_by_allowed_category() {
        let candidates = vec![
            candidate("Stanley Park", &["park"], 49.3017, -123.1417),
            candidate("Some Cafe", &["cafe", "food"], 49.2830, -123.1210),
        ];

        let ranked = aggregate(&candidates, origin(), &PARK_CATEGORIES, &[], PlaceType::Park);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].name, "Stanley Park");
    }

    #[test]
    fn test_dedup_first_occurrence_wins() {
        // The second "Riley Park" is closer but still dropped
        let candidates = vec![
            candidate("Riley Park", &["park"], 49.3, -123.2),
            candidate("Riley Park", &["park"], 49.2828, -123.1208),
        ];

        let ranked = aggregate(&candidates, origin(), &PARK_CATEGORIES, &[], PlaceType::Park);
        assert_eq!(ranked.len(), 1);
        assert!(ranked[0].distance_m > 1000);
    }

    #[test]
    fn test_sorted_truncated_and_ranked() {
        let candidates: Vec<PlaceCandidate> = (0..8)
            .map(|i| {
                candidate(
                    &format!("Park {i}"),
                    &["park"],
                    // Reverse order: candidate 0 is the farthest
                    49.2827 + 0.01 * f64::from(8 - i),
                    -123.1207,
                )
            })
            .collect();

        let ranked = aggregate(&candidates, origin(), &PARK_CATEGORIES, &[], PlaceType::Park);

        assert_eq!(ranked.len(), MAX_RESULTS);
        assert_eq!(ranked[0].name, "Park 7");
        for (index, place) in ranked.iter().enumerate() {
            assert_eq!(place.rank, index as u32 + 1);
        }
        for pair in ranked.windows(2) {
            assert!(pair[0].distance_m <= pair[1].distance_m);
            assert!(pair[0].rank < pair[1].rank);
        }
    }

    #[test]
    fn test_names_unique_in_output() {
        let candidates = vec![
            candidate("A", &["park"], 49.29, -123.12),
            candidate("B", &["park"], 49.30, -123.12),
            candidate("A", &["park"], 49.31, -123.12),
        ];

        let ranked = aggregate(&candidates, origin(), &PARK_CATEGORIES, &[], PlaceType::Park);
        let names: Vec<&str> = ranked.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"A") && names.contains(&"B"));
    }

    #[test]
    fn test_category_label_first_match_wins() {
        let candidates = vec![candidate(
            "Hillcrest Centre",
            &["community_center", "establishment"],
            49.2440,
            -123.1089,
        )];

        let labels = [("community_center", PlaceType::CommunityCentre)];
        let ranked = aggregate(
            &candidates,
            origin(),
            &["community_center", "recreation_center"],
            &labels,
            PlaceType::Park,
        );
        assert_eq!(ranked[0].place_type, PlaceType::CommunityCentre);
    }

    #[test]
    fn test_fallback_label() {
        let candidates = vec![candidate("Trout Lake", &["park"], 49.2550, -123.0620)];
        let labels = [("community_center", PlaceType::CommunityCentre)];

        let ranked = aggregate(&candidates, origin(), &PARK_CATEGORIES, &labels, PlaceType::Park);
        assert_eq!(ranked[0].place_type, PlaceType::Park);
    }

    #[test]
    fn test_missing_address_placeholder() {
        let mut no_address = candidate("Unnamed Trail", &["trail"], 49.29, -123.13);
        no_address.address = None;

        let ranked = aggregate(
            &[no_address],
            origin(),
            &PARK_CATEGORIES,
            &[],
            PlaceType::Park,
        );
        assert_eq!(ranked[0].address, "No address available");
    }

    #[test]
    fn test_walking_time_and_maps_url() {
        let candidates = vec![candidate("Nearby Park", &["park"], 49.2830, -123.1210)];

        let ranked = aggregate(&candidates, origin(), &PARK_CATEGORIES, &[], PlaceType::Park);
        let place = &ranked[0];
        assert_eq!(place.walking_time_min, place.distance_m / 80);
        assert_eq!(
            place.maps_url,
            format!("https://maps.google.com/?q={},{}", 49.2830, -123.1210)
        );
    }

    #[test]
    fn test_empty_input() {
        let ranked = aggregate(&[], origin(), &PARK_CATEGORIES, &[], PlaceType::Park);
        assert!(ranked.is_empty());
    }
}

//! Nearest-match search over the school catchment reference dataset

use tracing::debug;

use crate::geomath;
use crate::models::{CatchmentReferenceRecord, Coordinate, NearestMatch};

/// Linear scan for the single closest reference record.
///
/// Ties keep the first-encountered record, so callers must supply records in
/// a fixed order for reproducible results. Returns `None` for an empty set.
#[must_use]
pub fn find_nearest(
    origin: Coordinate,
    records: &[CatchmentReferenceRecord],
) -> Option<NearestMatch> {
    let mut nearest: Option<NearestMatch> = None;

    for record in records {
        let distance_km = geomath::distance_km(origin, record.location);
        let closer = nearest
            .as_ref()
            .is_none_or(|current| distance_km < current.distance_km);
        if closer {
            nearest = Some(NearestMatch {
                record: record.clone(),
                distance_km,
            });
        }
    }

    if let Some(found) = &nearest {
        debug!(
            "Nearest catchment record '{}' at {:.2}km",
            found.record.name, found.distance_km
        );
    }
    nearest
}

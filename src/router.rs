//! Query routing: classify, extract, geocode, dispatch, wrap
//!
//! Every step is a potential failure point with its own policy: extraction
//! and geocoding failures are terminal for the query and surface as "not
//! found" envelopes; unavailable place-search or open-data collaborators
//! degrade to empty result lists instead of failing the whole query.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future;
use tracing::{info, warn};

use crate::aggregator;
use crate::catchment;
use crate::config::{EstateAiConfig, SearchConfig};
use crate::error::EstateAiError;
use crate::extractor::AddressExtractor;
use crate::intent::IntentClassifier;
use crate::models::{
    AssessmentData, AssessmentEnvelope, CatchmentEnvelope, CatchmentMatch, Coordinate,
    GeocodedPlace, Intent, NotFoundEnvelope, ParkResults, ParksEnvelope, PlaceCandidate,
    PlaceType, PlacesEnvelope, Query, ResponseEnvelope, UnsupportedEnvelope,
};
use crate::services::{
    GeocodingService, LanguageModelService, OpenDataService, PlaceSearchService,
};
use crate::Result;

const PARKS_KEYWORD: &str = "park|playground|trail|dog_park";
const CENTRES_KEYWORD: &str = "community center|recreation center";

const PARK_CATEGORIES: [&str; 4] = ["park", "playground", "trail", "dog_park"];
const CENTRE_CATEGORIES: [&str; 2] = ["community_center", "recreation_center"];

/// Single entry point for resolving a natural-language query into a
/// presentable response envelope
pub struct QueryRouter {
    classifier: IntentClassifier,
    extractor: AddressExtractor,
    geocoding: Arc<dyn GeocodingService>,
    places: Arc<dyn PlaceSearchService>,
    open_data: Arc<dyn OpenDataService>,
    search: SearchConfig,
}

impl QueryRouter {
    #[must_use]
    pub fn new(
        geocoding: Arc<dyn GeocodingService>,
        places: Arc<dyn PlaceSearchService>,
        open_data: Arc<dyn OpenDataService>,
        llm: Arc<dyn LanguageModelService>,
        config: &EstateAiConfig,
    ) -> Self {
        Self {
            classifier: IntentClassifier::new(llm.clone()),
            extractor: AddressExtractor::new(llm),
            geocoding,
            places,
            open_data,
            search: config.search.clone(),
        }
    }

    /// Resolve one query end to end
    pub async fn route(&self, query: &Query) -> Result<ResponseEnvelope> {
        let intent = self.classifier.classify(&query.text).await;
        info!("Routing query as intent '{}'", intent.as_str());

        let address = match self.extractor.extract(&query.text).await {
            Ok(Some(address)) => address,
            Ok(None) => {
                return Ok(ResponseEnvelope::address_not_found(&query.text, intent));
            }
            Err(e @ EstateAiError::Extraction { .. }) => {
                warn!("Address extraction failed: {e}");
                return Ok(ResponseEnvelope::address_not_found(&query.text, intent));
            }
            Err(e) => return Err(e),
        };
        info!(
            "Extracted address '{}' via {:?}",
            address.value, address.method
        );

        // Unsupported queries are answered from the extracted address alone
        if intent == Intent::Unsupported {
            return Ok(Self::unsupported_envelope(&query.text, Some(address.value)));
        }

        let Some(geocoded) = self.geocoding.geocode(&address.value).await? else {
            return Ok(ResponseEnvelope::location_not_found(&query.text, intent));
        };
        let origin = geocoded.coordinate;

        let envelope = match intent {
            Intent::Schools => self.lookup_schools(origin).await,
            Intent::Transit => self.lookup_transit(origin).await,
            Intent::Parks => self.lookup_parks(&address.value, origin).await,
            Intent::SchoolCatchment => self.lookup_catchment(origin).await,
            Intent::Assessment => self.lookup_assessment(&geocoded).await,
            Intent::Unsupported => Self::unsupported_envelope(&query.text, Some(address.value)),
        };
        Ok(envelope)
    }

    /// Fetch candidates of one category, degrading an unavailable upstream to
    /// an empty candidate list
    async fn fetch_candidates(
        &self,
        origin: Coordinate,
        category: &str,
        radius_m: u32,
        keyword: Option<&str>,
    ) -> Vec<PlaceCandidate> {
        match self
            .places
            .search_nearby(origin, category, radius_m, keyword)
            .await
        {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("Place search for '{category}' degraded to empty results: {e}");
                Vec::new()
            }
        }
    }

    async fn lookup_schools(&self, origin: Coordinate) -> ResponseEnvelope {
        let candidates = self
            .fetch_candidates(origin, "school", self.search.school_radius_m, None)
            .await;
        let data = aggregator::aggregate(&candidates, origin, &["school"], &[], PlaceType::School);

        ResponseEnvelope::Places(PlacesEnvelope {
            query: "Nearby Schools".to_string(),
            intent: Intent::Schools,
            data,
        })
    }

    async fn lookup_transit(&self, origin: Coordinate) -> ResponseEnvelope {
        let candidates = self
            .fetch_candidates(
                origin,
                "transit_station",
                self.search.transit_radius_m,
                None,
            )
            .await;
        let data = aggregator::aggregate(
            &candidates,
            origin,
            &["transit_station"],
            &[],
            PlaceType::TransitStation,
        );

        ResponseEnvelope::Places(PlacesEnvelope {
            query: "Nearest Transit Stations".to_string(),
            intent: Intent::Transit,
            data,
        })
    }

    async fn lookup_parks(&self, address: &str, origin: Coordinate) -> ResponseEnvelope {
        let radius_m = self.search.parks_radius_m;
        let budget = Duration::from_secs(u64::from(self.search.parks_budget_seconds));

        // The two category fetches are independent; run them together under
        // one time budget
        let parks_fetch = self.fetch_candidates(origin, "park", radius_m, Some(PARKS_KEYWORD));
        let centres_fetch =
            self.fetch_candidates(origin, "establishment", radius_m, Some(CENTRES_KEYWORD));

        let (park_candidates, centre_candidates) =
            match tokio::time::timeout(budget, future::join(parks_fetch, centres_fetch)).await {
                Ok(candidates) => candidates,
                Err(_) => {
                    warn!("Parks lookup exceeded its {}s time budget", budget.as_secs());
                    (Vec::new(), Vec::new())
                }
            };

        let labels = [("community_center", PlaceType::CommunityCentre)];
        let parks = aggregator::aggregate(
            &park_candidates,
            origin,
            &PARK_CATEGORIES,
            &labels,
            PlaceType::Park,
        );
        let communities = aggregator::aggregate(
            &centre_candidates,
            origin,
            &CENTRE_CATEGORIES,
            &labels,
            PlaceType::Park,
        );

        ResponseEnvelope::Parks(ParksEnvelope {
            query: "Nearby Parks and Community Centres".to_string(),
            intent: Intent::Parks,
            address: address.to_string(),
            radius_m,
            results: ParkResults { parks, communities },
            source: "Google Places".to_string(),
            last_updated: Utc::now().date_naive(),
        })
    }

    async fn lookup_catchment(&self, origin: Coordinate) -> ResponseEnvelope {
        let records = match self.open_data.fetch_school_catchment_records().await {
            Ok(records) => records,
            Err(e) => {
                warn!("Catchment dataset unavailable, degrading to no match: {e}");
                Vec::new()
            }
        };

        let data = catchment::find_nearest(origin, &records).map(|nearest| CatchmentMatch {
            school_name: nearest.record.name,
            category: nearest.record.category,
            address: nearest.record.address,
            geo_local_area: nearest.record.locality,
            distance_km: nearest.distance_km,
        });
        let message = data
            .is_none()
            .then(|| "No nearby school catchment found.".to_string());

        ResponseEnvelope::Catchment(CatchmentEnvelope {
            query: "School Catchment".to_string(),
            intent: Intent::SchoolCatchment,
            data,
            message,
        })
    }

    async fn lookup_assessment(&self, geocoded: &GeocodedPlace) -> ResponseEnvelope {
        match self.places.place_details(&geocoded.place_id).await {
            Ok(Some(_details)) => {
                // Assessment provider integration is stubbed with fixed demo
                // figures attached to the confirmed property
                ResponseEnvelope::Assessment(AssessmentEnvelope {
                    query: "BC Assessment Value".to_string(),
                    intent: Intent::Assessment,
                    data: AssessmentData {
                        property_address: geocoded.formatted_address.clone(),
                        assessed_value: "$2,450,000".to_string(),
                        land_value: "$1,700,000".to_string(),
                        improvement_value: "$750,000".to_string(),
                        assessment_year: 2024,
                        lat: geocoded.coordinate.lat,
                        lng: geocoded.coordinate.lng,
                    },
                })
            }
            Ok(None) => ResponseEnvelope::NotFound(NotFoundEnvelope {
                query: geocoded.formatted_address.clone(),
                intent: Intent::Assessment,
                message: "Unable to retrieve assessment data for this property.".to_string(),
            }),
            Err(e) => {
                warn!("Place details unavailable for assessment lookup: {e}");
                ResponseEnvelope::NotFound(NotFoundEnvelope {
                    query: geocoded.formatted_address.clone(),
                    intent: Intent::Assessment,
                    message: "Unable to retrieve assessment data for this property.".to_string(),
                })
            }
        }
    }

    fn unsupported_envelope(query_text: &str, address: Option<String>) -> ResponseEnvelope {
        ResponseEnvelope::Unsupported(UnsupportedEnvelope {
            message: "Query type not supported yet. Currently available: schools, transit, \
                      parks, assessment value."
                .to_string(),
            query: query_text.to_string(),
            action_determined: Intent::Unsupported,
            address_extracted: address,
            hint: "Try asking about nearby schools, transit stations, parks, or property \
                   assessment value."
                .to_string(),
        })
    }
}

// src/services/google_places_client.rs
// DOCUMENTATION: Google Places API client
// PURPOSE: Natural-language place search scoped to the visible region

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::errors::NearbyError;
use crate::models::{Coordinate, PlaceResult, Region, SearchRequest};
use crate::services::PlaceSearchService;

/// Google Places API client
/// DOCUMENTATION: Handles authentication, pacing, and Text Search calls
pub struct GooglePlacesClient {
    /// HTTP client for making requests
    client: Client,
    /// Google Places API key
    api_key: String,
    /// Base URL for Google Places API
    base_url: String,
    /// Client-side pacing of outgoing requests
    limiter: Arc<DefaultDirectRateLimiter>,
}

/// Response from Google Places Text Search
/// DOCUMENTATION: Parsed response from Google Places API
#[derive(Debug, Deserialize, Serialize)]
pub struct GooglePlacesResponse {
    /// Results array from API
    #[serde(default)]
    pub results: Vec<GooglePlace>,
    /// Status of the API call
    pub status: String,
    /// Error message (if status is not OK)
    pub error_message: Option<String>,
}

/// Individual place from Google Places API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GooglePlace {
    /// Place name
    pub name: String,
    /// Geographic location
    pub geometry: GoogleGeometry,
    /// Formatted address (Text Search)
    pub formatted_address: Option<String>,
    /// Vicinity (short address, Nearby Search)
    pub vicinity: Option<String>,
}

/// Geographic location from Google
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GoogleGeometry {
    /// Location coordinates
    pub location: GoogleLocation,
}

/// Coordinates from Google
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GoogleLocation {
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lng: f64,
}

/// Address component from Google APIs (Places and Geocoding share the shape)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GoogleAddressComponent {
    /// Long name (e.g., "Salt Lake City", "84111")
    pub long_name: String,
    /// Short name (e.g., "SLC", "84111")
    pub short_name: String,
    /// Types of this component (e.g., ["locality", "political"])
    pub types: Vec<String>,
}

/// Find the first component carrying one of the given types
/// DOCUMENTATION: `kinds` is in priority order
pub fn extract_component(components: &[GoogleAddressComponent], kinds: &[&str]) -> Option<String> {
    kinds.iter().find_map(|kind| {
        components
            .iter()
            .find(|component| component.types.iter().any(|t| t == kind))
            .map(|component| component.long_name.clone())
    })
}

/// Build a request rate limiter
pub(crate) fn rate_limiter(requests_per_second: u32) -> Arc<DefaultDirectRateLimiter> {
    let per_second = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
    Arc::new(RateLimiter::direct(Quota::per_second(per_second)))
}

/// Build an HTTP client honoring the configured timeout
pub(crate) fn http_client(timeout_secs: u64) -> Result<Client, NearbyError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| NearbyError::Configuration(format!("HTTP client: {}", e)))
}

impl GooglePlacesClient {
    /// Create new Google Places API client
    /// DOCUMENTATION: Initializes client with API key and default settings
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: "https://maps.googleapis.com/maps/api/place".to_string(),
            limiter: rate_limiter(5),
        }
    }

    /// Create client from application configuration
    pub fn from_config(config: &Config) -> Result<Self, NearbyError> {
        Ok(Self {
            client: http_client(config.http_timeout_secs)?,
            api_key: config.google_places_api_key.clone(),
            base_url: config.google_places_base_url.trim_end_matches('/').to_string(),
            limiter: rate_limiter(config.search_requests_per_second),
        })
    }

    /// Perform text search for places
    /// DOCUMENTATION: Searches for places matching a query, biased to a region
    ///
    /// # Arguments
    /// * `request` - Validated query and region
    ///
    /// # Returns
    /// Places in the order Google ranked them
    pub async fn text_search(&self, request: &SearchRequest) -> Result<Vec<PlaceResult>, NearbyError> {
        if self.api_key.is_empty() {
            return Err(NearbyError::SearchServiceError(
                "Google Places API key not configured".to_string(),
            ));
        }

        let url = format!("{}/textsearch/json", self.base_url);
        let center = request.region.center;

        let params = [
            ("query", request.query.clone()),
            ("location", format!("{},{}", center.latitude, center.longitude)),
            ("radius", (request.region.radius_m.round() as u32).to_string()),
            ("key", self.api_key.clone()),
        ];

        self.limiter.until_ready().await;

        log::debug!(
            "Google Places text search: query={:?}, lat={}, lng={}, radius={}",
            request.query,
            center.latitude,
            center.longitude,
            request.region.radius_m
        );

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                log::error!("Google Places API request failed: {}", e);
                NearbyError::SearchServiceError(format!("Request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::error!("Google Places API error {}: {}", status, body);
            return Err(NearbyError::SearchServiceError(format!(
                "API error {}: {}",
                status, body
            )));
        }

        let api_response: GooglePlacesResponse = response.json().await.map_err(|e| {
            log::error!("Failed to parse Google Places response: {}", e);
            NearbyError::SearchServiceError(format!("Parse error: {}", e))
        })?;

        Self::into_results(api_response)
    }

    /// Check API status and convert places to search hits
    fn into_results(api_response: GooglePlacesResponse) -> Result<Vec<PlaceResult>, NearbyError> {
        match api_response.status.as_str() {
            "OK" | "ZERO_RESULTS" => {
                log::info!(
                    "Google Places search returned {} results",
                    api_response.results.len()
                );
                Ok(api_response
                    .results
                    .into_iter()
                    .filter_map(Self::to_place_result)
                    .collect())
            }
            "OVER_QUERY_LIMIT" => {
                log::error!("Google Places API quota exceeded");
                Err(NearbyError::RateLimitExceeded)
            }
            "REQUEST_DENIED" | "INVALID_REQUEST" => {
                let msg = api_response
                    .error_message
                    .unwrap_or_else(|| "Unknown error".to_string());
                log::error!("Google Places API request denied: {}", msg);
                Err(NearbyError::SearchServiceError(msg))
            }
            other => {
                let msg = api_response
                    .error_message
                    .unwrap_or_else(|| format!("Unknown status: {}", other));
                log::error!("Google Places API unexpected status: {}", msg);
                Err(NearbyError::SearchServiceError(msg))
            }
        }
    }

    /// Convert GooglePlace to a search hit
    /// Places with out-of-range coordinates are dropped.
    fn to_place_result(google_place: GooglePlace) -> Option<PlaceResult> {
        let location = &google_place.geometry.location;
        let coordinate = match Coordinate::new(location.lat, location.lng) {
            Ok(coordinate) => coordinate,
            Err(e) => {
                log::warn!("Skipping {}: {}", google_place.name, e);
                return None;
            }
        };

        let place = PlaceResult::new(google_place.name, coordinate);
        // Prefer formatted_address over vicinity (more detailed)
        Some(match google_place.formatted_address.or(google_place.vicinity) {
            Some(address) => place.with_address(address),
            None => place,
        })
    }
}

#[async_trait]
impl PlaceSearchService for GooglePlacesClient {
    async fn search(&self, query: &str, region: &Region) -> Result<Vec<PlaceResult>, NearbyError> {
        let request = SearchRequest::new(query, *region)?;
        self.text_search(&request).await
    }
}

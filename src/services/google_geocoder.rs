// src/services/google_geocoder.rs
// DOCUMENTATION: Google Geocoding API client
// PURPOSE: Resolve the device fix to a locality and postal code

use async_trait::async_trait;
use governor::DefaultDirectRateLimiter;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::Config;
use crate::errors::NearbyError;
use crate::models::{Coordinate, Placemark};
use crate::services::google_places_client::{
    extract_component, http_client, rate_limiter, GoogleAddressComponent,
};
use crate::services::ReverseGeocoder;

/// Reverse geocoder backed by Google Geocoding
pub struct GoogleGeocoder {
    client: Client,
    api_key: String,
    base_url: String,
    /// Shares the search pacing budget
    limiter: Arc<DefaultDirectRateLimiter>,
}

/// Response from the Geocoding API
#[derive(Debug, Deserialize, Serialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    pub status: String,
    pub error_message: Option<String>,
}

/// One candidate address for a coordinate
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeocodeResult {
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub address_components: Vec<GoogleAddressComponent>,
}

impl GoogleGeocoder {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: "https://maps.googleapis.com/maps/api/geocode".to_string(),
            limiter: rate_limiter(5),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, NearbyError> {
        Ok(Self {
            client: http_client(config.http_timeout_secs)?,
            api_key: config.google_places_api_key.clone(),
            base_url: config.google_geocode_base_url.trim_end_matches('/').to_string(),
            limiter: rate_limiter(config.search_requests_per_second),
        })
    }

    /// Turn the API response into the best placemark
    /// Google orders results from most to least specific; the first one wins.
    fn into_placemark(api_response: GeocodeResponse) -> Result<Placemark, NearbyError> {
        match api_response.status.as_str() {
            "OK" => {
                let first = api_response
                    .results
                    .into_iter()
                    .next()
                    .ok_or_else(|| NearbyError::GeocodeFailed("no placemarks".to_string()))?;

                let components = &first.address_components;
                Ok(Placemark {
                    locality: extract_component(components, &["locality", "postal_town"]),
                    postal_code: extract_component(components, &["postal_code"]),
                    administrative_area: extract_component(
                        components,
                        &["administrative_area_level_1"],
                    ),
                    country: extract_component(components, &["country"]),
                })
            }
            "ZERO_RESULTS" => Err(NearbyError::GeocodeFailed("no placemarks".to_string())),
            other => Err(NearbyError::GeocodeFailed(
                api_response
                    .error_message
                    .unwrap_or_else(|| format!("Unknown status: {}", other)),
            )),
        }
    }
}

#[async_trait]
impl ReverseGeocoder for GoogleGeocoder {
    async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<Placemark, NearbyError> {
        if self.api_key.is_empty() {
            return Err(NearbyError::GeocodeFailed(
                "Google API key not configured".to_string(),
            ));
        }

        let url = format!("{}/json", self.base_url);
        let params = [
            (
                "latlng",
                format!("{},{}", coordinate.latitude, coordinate.longitude),
            ),
            ("key", self.api_key.clone()),
        ];

        self.limiter.until_ready().await;

        log::debug!(
            "Google reverse geocode: lat={}, lng={}",
            coordinate.latitude,
            coordinate.longitude
        );

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| NearbyError::GeocodeFailed(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(NearbyError::GeocodeFailed(format!(
                "API error {}",
                response.status()
            )));
        }

        let api_response: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| NearbyError::GeocodeFailed(format!("Parse error: {}", e)))?;

        Self::into_placemark(api_response)
    }
}

// src/config/env.rs
// DOCUMENTATION: Environment variable management
// PURPOSE: Load and validate configuration from .env files

use crate::models::{Coordinate, Region};
use dotenv::dotenv;
use std::env;
use std::str::FromStr;

/// Default map center when the device cannot be located (Salt Lake City)
pub const DEFAULT_LATITUDE: f64 = 40.761766;
pub const DEFAULT_LONGITUDE: f64 = -111.890274;

/// Default region radius in meters
pub const DEFAULT_REGION_RADIUS_M: f64 = 1000.0;

/// How the terminal map renders annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapFormat {
    /// One line per annotation
    Text,
    /// GeoJSON FeatureCollection
    GeoJson,
}

impl FromStr for MapFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(MapFormat::Text),
            "geojson" => Ok(MapFormat::GeoJson),
            other => Err(format!("Unknown map format: {}", other)),
        }
    }
}

/// Application configuration loaded from environment variables
/// DOCUMENTATION: Centralizes all configuration in one struct
/// Load with Config::from_env() at application startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development, staging, production
    pub environment: String,

    /// Log level: debug, info, warn, error
    pub log_level: String,

    /// Google Places API Key (also used for reverse geocoding)
    pub google_places_api_key: String,

    /// Base URL for Google Places API
    pub google_places_base_url: String,

    /// Base URL for Google Geocoding API
    pub google_geocode_base_url: String,

    /// Fallback map center latitude
    pub default_latitude: f64,

    /// Fallback map center longitude
    pub default_longitude: f64,

    /// Radius in meters used to frame the map and scope searches
    pub region_radius_m: f64,

    /// Device position reported by the configured location source
    /// Both must be set for the device to produce a fix
    pub device_latitude: Option<f64>,
    pub device_longitude: Option<f64>,

    /// Whether location access is authorized
    pub location_enabled: bool,

    /// Maximum outgoing search requests per second
    pub search_requests_per_second: u32,

    /// HTTP timeout in seconds for external APIs
    pub http_timeout_secs: u64,

    /// Map rendering format: text or geojson
    pub map_format: MapFormat,
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring unparsable {}={:?}", key, raw);
            default
        }),
        Err(_) => default,
    }
}

fn parse_optional<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|raw| raw.trim().parse().ok())
}

impl Config {
    /// Load configuration from environment variables
    /// DOCUMENTATION: Reads from .env or process environment
    /// Called once at application startup
    pub fn from_env() -> Self {
        // Load .env file if it exists
        dotenv().ok();

        Config {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            google_places_api_key: env::var("GOOGLE_PLACES_API_KEY")
                .unwrap_or_else(|_| String::new()),

            google_places_base_url: env::var("GOOGLE_PLACES_BASE_URL")
                .unwrap_or_else(|_| "https://maps.googleapis.com/maps/api/place".to_string()),

            google_geocode_base_url: env::var("GOOGLE_GEOCODE_BASE_URL")
                .unwrap_or_else(|_| "https://maps.googleapis.com/maps/api/geocode".to_string()),

            default_latitude: parse_or("DEFAULT_LATITUDE", DEFAULT_LATITUDE),

            default_longitude: parse_or("DEFAULT_LONGITUDE", DEFAULT_LONGITUDE),

            region_radius_m: parse_or("REGION_RADIUS_M", DEFAULT_REGION_RADIUS_M),

            device_latitude: parse_optional("DEVICE_LATITUDE"),

            device_longitude: parse_optional("DEVICE_LONGITUDE"),

            location_enabled: parse_or("LOCATION_ENABLED", true),

            search_requests_per_second: parse_or("SEARCH_REQUESTS_PER_SECOND", 5),

            http_timeout_secs: parse_or("HTTP_TIMEOUT_SECS", 15),

            map_format: parse_or("MAP_FORMAT", MapFormat::Text),
        }
    }

    /// Validate critical configuration
    /// DOCUMENTATION: Ensures application can start safely
    pub fn validate(&self) -> Result<(), String> {
        self.default_region()
            .map_err(|e| format!("DEFAULT_LATITUDE/DEFAULT_LONGITUDE: {}", e))?;

        if self.device_latitude.is_some() != self.device_longitude.is_some() {
            return Err("DEVICE_LATITUDE and DEVICE_LONGITUDE must be set together".to_string());
        }

        if let Some((lat, lon)) = self.device_coordinate() {
            Coordinate::new(lat, lon)
                .map_err(|e| format!("DEVICE_LATITUDE/DEVICE_LONGITUDE: {}", e))?;
        }

        if self.search_requests_per_second == 0 {
            return Err("SEARCH_REQUESTS_PER_SECOND must be at least 1".to_string());
        }

        if self.google_places_api_key.is_empty() {
            log::warn!("GOOGLE_PLACES_API_KEY not configured - search and geocoding will fail");
        }

        Ok(())
    }

    /// Region used when the device location is unknown
    pub fn default_region(&self) -> Result<Region, crate::errors::NearbyError> {
        let center = Coordinate::new(self.default_latitude, self.default_longitude)?;
        Region::new(center, self.region_radius_m)
    }

    /// Configured device fix, if any
    pub fn device_coordinate(&self) -> Option<(f64, f64)> {
        self.device_latitude.zip(self.device_longitude)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            environment: "development".to_string(),
            log_level: "info".to_string(),
            google_places_api_key: String::new(),
            google_places_base_url: "https://maps.googleapis.com/maps/api/place".to_string(),
            google_geocode_base_url: "https://maps.googleapis.com/maps/api/geocode".to_string(),
            default_latitude: DEFAULT_LATITUDE,
            default_longitude: DEFAULT_LONGITUDE,
            region_radius_m: DEFAULT_REGION_RADIUS_M,
            device_latitude: None,
            device_longitude: None,
            location_enabled: true,
            search_requests_per_second: 5,
            http_timeout_secs: 15,
            map_format: MapFormat::Text,
        }
    }
}

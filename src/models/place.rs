// src/models/place.rs
// DOCUMENTATION: Search hits and reverse-geocoding results
// PURPOSE: Values produced by the place search and geocoding services

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Coordinate;

/// One search hit
/// DOCUMENTATION: Ephemeral, replaced wholesale by the next search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceResult {
    /// Display name (row text and annotation title)
    pub name: String,

    /// Where the place is
    pub coordinate: Coordinate,

    /// Short address line, when the service provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl PlaceResult {
    pub fn new(name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            name: name.into(),
            coordinate,
            address: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

impl fmt::Display for PlaceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Reverse-geocoding result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Placemark {
    /// City or town
    pub locality: Option<String>,

    /// Postal code
    pub postal_code: Option<String>,

    /// State or province
    pub administrative_area: Option<String>,

    /// Country name
    pub country: Option<String>,
}

/// Title shown above the results ("Salt Lake City - 84111")
pub fn display_title(locality: Option<&str>, postal_code: Option<&str>) -> Option<String> {
    match (locality, postal_code) {
        (Some(city), Some(code)) => Some(format!("{} - {}", city, code)),
        (Some(city), None) => Some(city.to_string()),
        (None, Some(code)) => Some(code.to_string()),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_title() {
        assert_eq!(
            display_title(Some("Salt Lake City"), Some("84111")),
            Some("Salt Lake City - 84111".to_string())
        );

        assert_eq!(display_title(Some("Ogden"), None), Some("Ogden".to_string()));
        assert_eq!(display_title(None, Some("84401")), Some("84401".to_string()));
        assert_eq!(display_title(None, None), None);
    }

    #[test]
    fn test_place_result_serialization_skips_missing_address() {
        let place = PlaceResult::new("Pie Hole", Coordinate::new(40.76, -111.89).unwrap());
        let json = serde_json::to_value(&place).unwrap();
        assert!(json.get("address").is_none());

        let place = place.with_address("344 S State St");
        let json = serde_json::to_value(&place).unwrap();
        assert_eq!(json["address"], "344 S State St");
    }
}

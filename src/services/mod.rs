// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod google_geocoder;
pub mod google_places_client;
pub mod location;
pub mod results_store;
pub mod search;

pub use google_geocoder::*;
pub use google_places_client::*;
pub use location::*;
pub use results_store::*;
pub use search::*;

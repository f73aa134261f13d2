// src/services/search.rs
// DOCUMENTATION: Place search port
// PURPOSE: Seam between the controller and whichever search backend is wired in

use async_trait::async_trait;

use crate::errors::NearbyError;
use crate::models::{PlaceResult, Region};

/// Natural-language place search scoped to a region
///
/// Implementations reject blank queries with `EmptyQuery` before issuing any
/// request. An empty list is a successful "no results" answer, never an error.
/// Results keep the order the backend returned them in.
#[async_trait]
pub trait PlaceSearchService: Send + Sync {
    async fn search(&self, query: &str, region: &Region) -> Result<Vec<PlaceResult>, NearbyError>;
}

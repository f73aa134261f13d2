// src/models/session.rs
// DOCUMENTATION: Search request and session bookkeeping
// PURPOSE: Validate user queries and tag each submission with a generation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::Region;
use crate::errors::NearbyError;

/// A validated natural-language query scoped to a region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SearchRequest {
    /// Trimmed query text, at most 256 characters
    #[validate(length(min = 1, max = 256))]
    pub query: String,

    #[validate]
    pub region: Region,
}

impl SearchRequest {
    /// Trim and validate user input
    /// Blank input yields `EmptyQuery` so callers can ignore it quietly.
    pub fn new(raw_query: &str, region: Region) -> Result<Self, NearbyError> {
        let query = raw_query.trim();
        if query.is_empty() {
            return Err(NearbyError::EmptyQuery);
        }

        let request = SearchRequest {
            query: query.to_string(),
            region,
        };
        request.validate()?;
        Ok(request)
    }
}

/// One search submission
/// DOCUMENTATION: Superseded entirely by the next submission.
/// Only the session holding the latest generation may update the results.
#[derive(Debug, Clone, Serialize)]
pub struct SearchSession {
    /// Correlates log lines for one submission
    pub id: Uuid,

    /// Monotonic counter; higher generations supersede lower ones
    pub generation: u64,

    pub request: SearchRequest,

    pub started_at: DateTime<Utc>,
}

impl SearchSession {
    pub fn new(generation: u64, request: SearchRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            generation,
            request,
            started_at: Utc::now(),
        }
    }

    /// Milliseconds since the session started
    pub fn elapsed_ms(&self) -> i64 {
        (Utc::now() - self.started_at).num_milliseconds()
    }
}

// src/controller/events.rs
// DOCUMENTATION: Controller states and the events that drive them
// PURPOSE: Everything the event loop reacts to arrives as a UiEvent

use std::fmt;
use uuid::Uuid;

use crate::errors::NearbyError;
use crate::models::PlaceResult;
use crate::services::LocationEvent;

/// Screen state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Not yet activated
    Idle,
    /// Waiting for the one-shot device fix
    LocatingDevice,
    /// Map framed, waiting for a query
    Ready,
    /// Latest search in flight
    Searching,
    /// Latest search produced results on the map and in the list
    ResultsShown,
    /// Latest search failed or found nothing; passes straight back to Ready
    SearchFailed,
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ControllerState::Idle => "idle",
            ControllerState::LocatingDevice => "locating_device",
            ControllerState::Ready => "ready",
            ControllerState::Searching => "searching",
            ControllerState::ResultsShown => "results_shown",
            ControllerState::SearchFailed => "search_failed",
        };
        f.write_str(name)
    }
}

/// Input to the controller's event loop
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Raw text from the search field
    SearchSubmitted(String),

    /// Result of the one-shot location lookup
    Location(LocationEvent),

    /// A search task finished; only applied if `generation` is the latest
    SearchCompleted {
        generation: u64,
        session_id: Uuid,
        result: Result<Vec<PlaceResult>, NearbyError>,
    },

    /// Tear down and leave the loop
    Shutdown,
}

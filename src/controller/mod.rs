// src/controller/mod.rs
// DOCUMENTATION: Search screen controller
// PURPOSE: Coordinate location, search, results store, map, and list

pub mod events;

pub use events::{ControllerState, UiEvent};

use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;
use uuid::Uuid;

use crate::errors::NearbyError;
use crate::models::{display_title, PlaceResult, Region, SearchRequest, SearchSession};
use crate::services::{
    DeviceLocation, LocationEvent, LocationProvider, PlaceSearchService, ResultsSnapshot,
    ResultsStore, ReverseGeocoder,
};
use crate::ui::{MapPresenter, ResultsView};

/// Everything the controller talks to
pub struct Collaborators {
    pub device: Arc<dyn DeviceLocation>,
    pub geocoder: Arc<dyn ReverseGeocoder>,
    pub search: Arc<dyn PlaceSearchService>,
    pub map: Box<dyn MapPresenter>,
    pub list: Box<dyn ResultsView>,
}

/// Search screen controller
/// DOCUMENTATION: Owns all screen state. Events are handled one at a time on
/// the loop in `run`; location and search work happen on spawned tasks that
/// report back through the event channel.
///
/// Every search bumps `generation`. A completion carrying an older generation
/// is dropped, so a slow response can never overwrite a newer search.
pub struct SearchController {
    state: ControllerState,
    device: Arc<dyn DeviceLocation>,
    geocoder: Arc<dyn ReverseGeocoder>,
    search: Arc<dyn PlaceSearchService>,
    map: Box<dyn MapPresenter>,
    list: Box<dyn ResultsView>,
    store: ResultsStore,
    default_region: Region,
    region: Region,
    title: Option<String>,
    generation: u64,
    session: Option<SearchSession>,
    pending_query: Option<String>,
    location: Option<LocationProvider>,
    events: UnboundedSender<UiEvent>,
}

impl SearchController {
    /// Build an idle controller and the receiving end of its event channel
    pub fn new(
        default_region: Region,
        collaborators: Collaborators,
    ) -> (Self, UnboundedReceiver<UiEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();

        let controller = Self {
            state: ControllerState::Idle,
            device: collaborators.device,
            geocoder: collaborators.geocoder,
            search: collaborators.search,
            map: collaborators.map,
            list: collaborators.list,
            store: ResultsStore::new(),
            default_region,
            region: default_region,
            title: None,
            generation: 0,
            session: None,
            pending_query: None,
            location: None,
            events,
        };

        (controller, receiver)
    }

    /// Handle for feeding events (search input, shutdown) into the loop
    pub fn sender(&self) -> UnboundedSender<UiEvent> {
        self.events.clone()
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Region used to scope the next search
    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn results(&self) -> ResultsSnapshot {
        self.store.current()
    }

    pub fn subscribe_results(&self) -> watch::Receiver<ResultsSnapshot> {
        self.store.subscribe()
    }

    /// Activate the screen and run the event loop until shutdown
    pub async fn run(mut self, mut events: UnboundedReceiver<UiEvent>) {
        self.activate();

        while let Some(event) = events.recv().await {
            if !self.handle(event) {
                break;
            }
        }
    }

    /// Idle -> LocatingDevice
    pub fn activate(&mut self) {
        if self.state != ControllerState::Idle {
            log::debug!("Controller already active ({})", self.state);
            return;
        }

        self.state = ControllerState::LocatingDevice;

        let mut provider = LocationProvider::new(self.device.clone(), self.geocoder.clone());
        let events = self.events.clone();
        provider.start(move |event| {
            let _ = events.send(UiEvent::Location(event));
        });
        self.location = Some(provider);

        log::info!("Locating device...");
    }

    /// Apply one event; returns false once the controller has shut down
    pub fn handle(&mut self, event: UiEvent) -> bool {
        match event {
            UiEvent::SearchSubmitted(text) => self.submit(&text),
            UiEvent::Location(event) => self.on_location(event),
            UiEvent::SearchCompleted {
                generation,
                session_id,
                result,
            } => self.on_search_completed(generation, session_id, result),
            UiEvent::Shutdown => {
                self.shutdown();
                return false;
            }
        }
        true
    }

    fn on_location(&mut self, event: LocationEvent) {
        if self.state != ControllerState::LocatingDevice {
            log::debug!("Ignoring location event in state {}", self.state);
            return;
        }

        // The provider reports once and has already stopped updates
        if let Some(provider) = self.location.take() {
            provider.release();
        }

        match event {
            LocationEvent::LocationAvailable {
                coordinate,
                locality,
                postal_code,
            } => {
                match Region::new(coordinate, self.default_region.radius_m) {
                    Ok(region) => self.region = region,
                    Err(e) => log::warn!("Keeping default region: {}", e),
                }
                self.map.center_on(&self.region);
                self.map.show_user_location(coordinate);

                if let Some(title) = display_title(locality.as_deref(), postal_code.as_deref()) {
                    log::info!("Current location: {}", title);
                    self.list.set_title(&title);
                    self.title = Some(title);
                }
            }
            LocationEvent::LocationFailed { reason } => {
                log::warn!("Using default region: {}", reason.diagnostic());
                self.region = self.default_region;
                self.map.center_on(&self.region);
            }
        }

        self.become_ready();
    }

    fn become_ready(&mut self) {
        self.state = ControllerState::Ready;

        if let Some(query) = self.pending_query.take() {
            self.submit(&query);
        }
    }

    /// Start a new search cycle for user input
    fn submit(&mut self, text: &str) {
        let request = match SearchRequest::new(text, self.region) {
            Ok(request) => request,
            Err(NearbyError::EmptyQuery) => {
                log::debug!("Ignoring blank search submission");
                return;
            }
            Err(e) => {
                log::warn!("Rejected search submission: {}", e.diagnostic());
                return;
            }
        };

        if matches!(
            self.state,
            ControllerState::Idle | ControllerState::LocatingDevice
        ) {
            log::info!("Holding search ({}) until the map is ready", request.query);
            self.pending_query = Some(request.query);
            return;
        }

        self.generation += 1;
        let session = SearchSession::new(self.generation, request);

        log::info!(
            "New search ({}) session={} generation={}",
            session.request.query,
            session.id,
            session.generation
        );

        // Old results disappear from both surfaces before the request goes out
        let cleared = self.store.replace(Vec::new());
        self.map.clear_annotations();
        self.list.reload(&cleared);
        self.state = ControllerState::Searching;

        let search = self.search.clone();
        let events = self.events.clone();
        let generation = session.generation;
        let session_id = session.id;
        let query = session.request.query.clone();
        let region = session.request.region;

        tokio::spawn(async move {
            let result = search.search(&query, &region).await;
            let _ = events.send(UiEvent::SearchCompleted {
                generation,
                session_id,
                result,
            });
        });

        self.session = Some(session);
    }

    fn on_search_completed(
        &mut self,
        generation: u64,
        session_id: Uuid,
        result: Result<Vec<PlaceResult>, NearbyError>,
    ) {
        if generation != self.generation {
            log::info!(
                "Discarding stale search response session={} generation={} (latest {})",
                session_id,
                generation,
                self.generation
            );
            return;
        }

        let elapsed_ms = self
            .session
            .take()
            .map(|session| session.elapsed_ms())
            .unwrap_or_default();

        match result {
            Ok(results) if !results.is_empty() => {
                let snapshot = self.store.replace(results);
                self.map.show_results(&snapshot.results);
                self.list.reload(&snapshot);
                self.state = ControllerState::ResultsShown;

                let outside = snapshot
                    .results
                    .iter()
                    .filter(|place| !self.region.contains(&place.coordinate))
                    .count();
                if outside > 0 {
                    log::debug!("{} result(s) fall outside the visible map", outside);
                }

                log::info!(
                    "Search session={} found {} places in {} ms",
                    session_id,
                    snapshot.len(),
                    elapsed_ms
                );
            }
            Ok(_) => {
                log::info!("No items found (session={})", session_id);
                self.fail_search();
            }
            Err(e) => {
                log::error!(
                    "Problem occurred in search (session={}): {}",
                    session_id,
                    e.diagnostic()
                );
                self.fail_search();
            }
        }
    }

    /// Searching -> SearchFailed -> Ready with an empty list on screen
    fn fail_search(&mut self) {
        self.state = ControllerState::SearchFailed;
        let snapshot = self.store.current();
        self.list.reload(&snapshot);
        self.state = ControllerState::Ready;
    }

    /// Stop location work and drop interest in any search in flight
    pub fn shutdown(&mut self) {
        if let Some(mut provider) = self.location.take() {
            provider.stop();
        }

        self.generation += 1;
        self.session = None;
        self.pending_query = None;
        self.state = ControllerState::Idle;

        log::info!("Search screen closed");
    }
}

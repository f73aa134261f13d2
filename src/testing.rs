// src/testing.rs
// DOCUMENTATION: Test doubles for every controller collaborator
// PURPOSE: Deterministic stand-ins for device, geocoder, search, map, and list

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

use crate::errors::NearbyError;
use crate::models::{Coordinate, PlaceResult, Placemark, Region};
use crate::services::{DeviceLocation, PlaceSearchService, ResultsSnapshot, ReverseGeocoder};
use crate::ui::{Annotation, MapPresenter, ResultsView};

pub fn coordinate(latitude: f64, longitude: f64) -> Coordinate {
    Coordinate::new(latitude, longitude).unwrap()
}

pub fn place(name: &str, latitude: f64, longitude: f64) -> PlaceResult {
    PlaceResult::new(name, coordinate(latitude, longitude))
}

/// Answer one HTTP request on a local port with a canned JSON response
/// Returns the base URL to point a client at.
pub async fn serve_once(status_line: &'static str, body: &'static str) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await;

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    });

    format!("http://{}", addr)
}

enum DeviceBehavior {
    Fix(Coordinate),
    Denied,
    Unavailable,
    Silent,
}

/// Device location with a scripted outcome
pub struct StubDevice {
    behavior: DeviceBehavior,
    stops: AtomicUsize,
    // Keeps a silent update stream open
    held: Mutex<Option<mpsc::UnboundedSender<Result<Coordinate, NearbyError>>>>,
}

impl StubDevice {
    fn with(behavior: DeviceBehavior) -> Self {
        Self {
            behavior,
            stops: AtomicUsize::new(0),
            held: Mutex::new(None),
        }
    }

    pub fn fix(coordinate: Coordinate) -> Self {
        Self::with(DeviceBehavior::Fix(coordinate))
    }

    pub fn denied() -> Self {
        Self::with(DeviceBehavior::Denied)
    }

    pub fn unavailable() -> Self {
        Self::with(DeviceBehavior::Unavailable)
    }

    /// Authorizes but never produces a fix
    pub fn silent() -> Self {
        Self::with(DeviceBehavior::Silent)
    }

    pub fn stop_calls(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeviceLocation for StubDevice {
    async fn request_authorization(&self) -> Result<(), NearbyError> {
        match self.behavior {
            DeviceBehavior::Denied => Err(NearbyError::AuthorizationDenied),
            _ => Ok(()),
        }
    }

    fn start_updates(&self) -> mpsc::UnboundedReceiver<Result<Coordinate, NearbyError>> {
        let (sender, receiver) = mpsc::unbounded_channel();
        match self.behavior {
            DeviceBehavior::Fix(coordinate) => {
                let _ = sender.send(Ok(coordinate));
            }
            DeviceBehavior::Unavailable => {
                let _ = sender.send(Err(NearbyError::LocationUnavailable(
                    "no satellites".to_string(),
                )));
            }
            DeviceBehavior::Silent => {
                *self.held.lock().unwrap() = Some(sender);
            }
            DeviceBehavior::Denied => {}
        }
        receiver
    }

    fn stop_updates(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}

/// Reverse geocoder with a fixed answer
pub struct StubGeocoder {
    result: Result<Placemark, NearbyError>,
    calls: AtomicUsize,
}

impl StubGeocoder {
    pub fn placemark(locality: &str, postal_code: &str) -> Self {
        Self {
            result: Ok(Placemark {
                locality: Some(locality.to_string()),
                postal_code: Some(postal_code.to_string()),
                administrative_area: Some("Utah".to_string()),
                country: Some("United States".to_string()),
            }),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            result: Err(NearbyError::GeocodeFailed("network down".to_string())),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReverseGeocoder for StubGeocoder {
    async fn reverse_geocode(&self, _coordinate: Coordinate) -> Result<Placemark, NearbyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

/// Search service answering from a table; unknown queries find nothing
#[derive(Default)]
pub struct ScriptedSearch {
    responses: Mutex<HashMap<String, Result<Vec<PlaceResult>, NearbyError>>>,
    calls: Mutex<Vec<(String, Region)>>,
}

impl ScriptedSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, query: &str, response: Result<Vec<PlaceResult>, NearbyError>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(query.to_string(), response);
        self
    }

    pub fn calls(&self) -> Vec<(String, Region)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlaceSearchService for ScriptedSearch {
    async fn search(&self, query: &str, region: &Region) -> Result<Vec<PlaceResult>, NearbyError> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), *region));
        self.responses
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

type Gate = oneshot::Receiver<Result<Vec<PlaceResult>, NearbyError>>;

/// Search service whose answers are released by the test
#[derive(Default)]
pub struct GatedSearch {
    gates: Mutex<HashMap<String, Gate>>,
}

impl GatedSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a query; its search resolves when the returned sender fires
    pub fn gate(
        &self,
        query: &str,
    ) -> oneshot::Sender<Result<Vec<PlaceResult>, NearbyError>> {
        let (sender, receiver) = oneshot::channel();
        self.gates
            .lock()
            .unwrap()
            .insert(query.to_string(), receiver);
        sender
    }
}

#[async_trait]
impl PlaceSearchService for GatedSearch {
    async fn search(&self, query: &str, _region: &Region) -> Result<Vec<PlaceResult>, NearbyError> {
        let gate = self.gates.lock().unwrap().remove(query);
        match gate {
            Some(receiver) => receiver
                .await
                .unwrap_or_else(|_| Err(NearbyError::SearchServiceError("gate dropped".to_string()))),
            None => Ok(Vec::new()),
        }
    }
}

/// What the controller asked the map to do
#[derive(Debug, Clone, PartialEq)]
pub enum MapCall {
    CenterOn(Region),
    ShowUserLocation(Coordinate),
    Clear,
    Show(usize),
}

#[derive(Default)]
struct MapLog {
    calls: Vec<MapCall>,
    annotations: Vec<Annotation>,
}

/// Map presenter that records every call
#[derive(Clone, Default)]
pub struct RecordingMap {
    log: Arc<Mutex<MapLog>>,
}

impl RecordingMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<MapCall> {
        self.log.lock().unwrap().calls.clone()
    }

    pub fn annotations(&self) -> Vec<Annotation> {
        self.log.lock().unwrap().annotations.clone()
    }

    pub fn last_region(&self) -> Option<Region> {
        self.calls().into_iter().rev().find_map(|call| match call {
            MapCall::CenterOn(region) => Some(region),
            _ => None,
        })
    }
}

impl MapPresenter for RecordingMap {
    fn center_on(&mut self, region: &Region) {
        self.log.lock().unwrap().calls.push(MapCall::CenterOn(*region));
    }

    fn show_user_location(&mut self, coordinate: Coordinate) {
        self.log
            .lock()
            .unwrap()
            .calls
            .push(MapCall::ShowUserLocation(coordinate));
    }

    fn clear_annotations(&mut self) {
        let mut log = self.log.lock().unwrap();
        log.calls.push(MapCall::Clear);
        log.annotations.clear();
    }

    fn show_results(&mut self, results: &[PlaceResult]) {
        let mut log = self.log.lock().unwrap();
        log.calls.push(MapCall::Show(results.len()));
        log.annotations.extend(results.iter().map(Annotation::from));
    }
}

#[derive(Default)]
struct ListLog {
    title: Option<String>,
    rows: Vec<String>,
    revisions: Vec<u64>,
}

/// Results list that records what it was told to show
#[derive(Clone, Default)]
pub struct RecordingList {
    log: Arc<Mutex<ListLog>>,
}

impl RecordingList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> Option<String> {
        self.log.lock().unwrap().title.clone()
    }

    pub fn rows(&self) -> Vec<String> {
        self.log.lock().unwrap().rows.clone()
    }

    /// Snapshot revisions passed to reload, in order
    pub fn revisions(&self) -> Vec<u64> {
        self.log.lock().unwrap().revisions.clone()
    }
}

impl ResultsView for RecordingList {
    fn set_title(&mut self, title: &str) {
        self.log.lock().unwrap().title = Some(title.to_string());
    }

    fn reload(&mut self, snapshot: &ResultsSnapshot) {
        let mut log = self.log.lock().unwrap();
        log.rows = snapshot.names();
        log.revisions.push(snapshot.revision);
    }
}

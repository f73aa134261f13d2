// src/services/location.rs
// DOCUMENTATION: One-shot device location with reverse geocoding
// PURPOSE: Produce a single location event for the controller, then stop

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::errors::NearbyError;
use crate::models::{Coordinate, Placemark};

/// Device location subsystem
#[async_trait]
pub trait DeviceLocation: Send + Sync {
    /// Ask the user (or the platform) for permission to read the location
    async fn request_authorization(&self) -> Result<(), NearbyError>;

    /// Begin streaming fixes; the stream ends when updates stop
    fn start_updates(&self) -> mpsc::UnboundedReceiver<Result<Coordinate, NearbyError>>;

    fn stop_updates(&self);
}

/// Reverse-geocoding service
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<Placemark, NearbyError>;
}

/// Outcome of a location attempt, reported exactly once
#[derive(Debug, Clone, PartialEq)]
pub enum LocationEvent {
    LocationAvailable {
        coordinate: Coordinate,
        locality: Option<String>,
        postal_code: Option<String>,
    },
    LocationFailed {
        reason: NearbyError,
    },
}

/// Take one fix, stop updates, and resolve the locality
///
/// A geocoding failure still yields `LocationAvailable`, just without a
/// locality or postal code.
pub async fn locate(device: &dyn DeviceLocation, geocoder: &dyn ReverseGeocoder) -> LocationEvent {
    if let Err(reason) = device.request_authorization().await {
        log::warn!("Location authorization failed: {}", reason);
        return LocationEvent::LocationFailed { reason };
    }

    let mut updates = device.start_updates();
    let first = updates.recv().await;
    device.stop_updates();
    drop(updates);

    let coordinate = match first {
        Some(Ok(coordinate)) => coordinate,
        Some(Err(reason)) => {
            log::warn!("Location update failed: {}", reason);
            return LocationEvent::LocationFailed { reason };
        }
        None => {
            let reason = NearbyError::LocationUnavailable(
                "location updates ended before a fix".to_string(),
            );
            log::warn!("{}", reason);
            return LocationEvent::LocationFailed { reason };
        }
    };

    log::info!(
        "Device located at ({}, {})",
        coordinate.latitude,
        coordinate.longitude
    );

    match geocoder.reverse_geocode(coordinate).await {
        Ok(placemark) => {
            log::debug!("placemark.locality = {:?}", placemark.locality);
            log::debug!("placemark.postal_code = {:?}", placemark.postal_code);
            log::debug!(
                "placemark.administrative_area = {:?}",
                placemark.administrative_area
            );
            log::debug!("placemark.country = {:?}", placemark.country);

            LocationEvent::LocationAvailable {
                coordinate,
                locality: placemark.locality,
                postal_code: placemark.postal_code,
            }
        }
        Err(e) => {
            log::warn!("{}", e.diagnostic());
            LocationEvent::LocationAvailable {
                coordinate,
                locality: None,
                postal_code: None,
            }
        }
    }
}

/// Owned location provider
/// DOCUMENTATION: Created by the controller when the screen activates and
/// torn down with it. Runs `locate` on a background task and hands the single
/// resulting event to a callback.
pub struct LocationProvider {
    device: Arc<dyn DeviceLocation>,
    geocoder: Arc<dyn ReverseGeocoder>,
    task: Option<JoinHandle<()>>,
}

impl LocationProvider {
    pub fn new(device: Arc<dyn DeviceLocation>, geocoder: Arc<dyn ReverseGeocoder>) -> Self {
        Self {
            device,
            geocoder,
            task: None,
        }
    }

    /// Request authorization and start looking for a fix
    /// Calling start again while a lookup is running is a no-op.
    pub fn start<F>(&mut self, on_event: F)
    where
        F: FnOnce(LocationEvent) + Send + 'static,
    {
        if self.is_running() {
            log::debug!("Location provider already running");
            return;
        }

        let device = self.device.clone();
        let geocoder = self.geocoder.clone();

        self.task = Some(tokio::spawn(async move {
            let event = locate(device.as_ref(), geocoder.as_ref()).await;
            on_event(event);
        }));
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().map_or(false, |task| !task.is_finished())
    }

    /// Let go of a provider whose event has been delivered, without aborting
    pub fn release(mut self) {
        self.task.take();
    }

    /// Abort any lookup in flight and stop device updates
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            if !task.is_finished() {
                task.abort();
                self.device.stop_updates();
                log::debug!("Location provider stopped before a fix");
            }
        }
    }
}

impl Drop for LocationProvider {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Device location backed by configuration
/// DOCUMENTATION: Stand-in for a platform location service on hosts without
/// one. Reports the configured fix, or fails the way a real device would.
pub struct ConfiguredDeviceLocation {
    enabled: bool,
    fix: Option<Coordinate>,
    updating: AtomicBool,
}

impl ConfiguredDeviceLocation {
    pub fn new(enabled: bool, fix: Option<Coordinate>) -> Self {
        Self {
            enabled,
            fix,
            updating: AtomicBool::new(false),
        }
    }

    pub fn is_updating(&self) -> bool {
        self.updating.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeviceLocation for ConfiguredDeviceLocation {
    async fn request_authorization(&self) -> Result<(), NearbyError> {
        if self.enabled {
            Ok(())
        } else {
            Err(NearbyError::AuthorizationDenied)
        }
    }

    fn start_updates(&self) -> mpsc::UnboundedReceiver<Result<Coordinate, NearbyError>> {
        self.updating.store(true, Ordering::SeqCst);

        let (sender, receiver) = mpsc::unbounded_channel();
        let update = self.fix.ok_or_else(|| {
            NearbyError::LocationUnavailable("no device position configured".to_string())
        });
        // Receiver is still alive here
        let _ = sender.send(update);
        receiver
    }

    fn stop_updates(&self) {
        self.updating.store(false, Ordering::SeqCst);
    }
}

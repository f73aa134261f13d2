// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config and logging, wire collaborators, run the search screen

use anyhow::Context;
use dotenv::dotenv;
use nearby_places::config::Config;
use nearby_places::controller::{Collaborators, SearchController, UiEvent};
use nearby_places::models::Coordinate;
use nearby_places::services::{ConfiguredDeviceLocation, GoogleGeocoder, GooglePlacesClient};
use nearby_places::ui::{read_queries, TerminalList, TerminalMap};
use std::sync::Arc;
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        // Use configured log level or default
        let log_level = if !config.log_level.is_empty() {
            config.log_level.as_str()
        } else {
            "info,reqwest=warn"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        anyhow::bail!("Configuration error: {}", e);
    }

    log::info!("Starting nearby-places...");
    log::info!("Environment: {}", config.environment);

    // 4. Build collaborators
    let default_region = config
        .default_region()
        .context("invalid default region")?;

    let device_fix = match config.device_coordinate() {
        Some((lat, lon)) => Some(Coordinate::new(lat, lon).context("invalid device position")?),
        None => None,
    };

    let search = GooglePlacesClient::from_config(&config).context("building search client")?;
    let geocoder = GoogleGeocoder::from_config(&config).context("building geocoder")?;

    let (controller, events) = SearchController::new(
        default_region,
        Collaborators {
            device: Arc::new(ConfiguredDeviceLocation::new(
                config.location_enabled,
                device_fix,
            )),
            geocoder: Arc::new(geocoder),
            search: Arc::new(search),
            map: Box::new(TerminalMap::new(std::io::stdout(), config.map_format)),
            list: Box::new(TerminalList::new(std::io::stdout())),
        },
    );

    // 5. Search field and Ctrl-C both feed the controller's event loop
    let input_events = controller.sender();
    tokio::spawn(async move {
        read_queries(BufReader::new(tokio::io::stdin()), input_events).await;
    });

    let signal_events = controller.sender();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = signal_events.send(UiEvent::Shutdown);
        }
    });

    println!("Type a search and press Enter (Ctrl-D to quit).");

    // 6. Run until input ends
    controller.run(events).await;

    // A blocked stdin read would otherwise hold the runtime open
    std::process::exit(0)
}

// src/ui/map.rs
// DOCUMENTATION: Map presentation
// PURPOSE: Turn the viewport and the current results into annotations

use geo_types::Point;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, Value};
use serde::Serialize;
use serde_json::json;
use std::io::{self, Write};

use crate::config::MapFormat;
use crate::models::{Coordinate, PlaceResult, Region};

/// A map marker with a display title
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub coordinate: Coordinate,
    pub title: String,
}

impl From<&PlaceResult> for Annotation {
    fn from(place: &PlaceResult) -> Self {
        Self {
            coordinate: place.coordinate,
            title: place.name.clone(),
        }
    }
}

/// Map surface driven by the controller
///
/// `show_results` adds to whatever is on the map; the controller clears
/// annotations before each new search so they never pile up.
pub trait MapPresenter: Send {
    /// Set the visible viewport
    fn center_on(&mut self, region: &Region);

    /// Mark where the device is
    fn show_user_location(&mut self, coordinate: Coordinate);

    /// Remove every result annotation
    fn clear_annotations(&mut self);

    /// Add one annotation per result, titled with its name
    fn show_results(&mut self, results: &[PlaceResult]);
}

/// Map rendered to a terminal or any other writer
pub struct TerminalMap<W: Write + Send> {
    out: W,
    format: MapFormat,
    region: Option<Region>,
    user_location: Option<Coordinate>,
    annotations: Vec<Annotation>,
}

impl<W: Write + Send> TerminalMap<W> {
    pub fn new(out: W, format: MapFormat) -> Self {
        Self {
            out,
            format,
            region: None,
            user_location: None,
            annotations: Vec::new(),
        }
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render(&mut self) {
        let rendered = match self.format {
            MapFormat::Text => self.render_text(),
            MapFormat::GeoJson => self.render_geojson(),
        };
        if let Err(e) = rendered {
            log::warn!("Failed to render map: {}", e);
        }
    }

    fn render_text(&mut self) -> io::Result<()> {
        match &self.region {
            Some(region) => writeln!(
                self.out,
                "Map: ({:.5}, {:.5}) ±{} m, {} pin(s)",
                region.center.latitude,
                region.center.longitude,
                region.radius_m,
                self.annotations.len()
            )?,
            None => writeln!(self.out, "Map: {} pin(s)", self.annotations.len())?,
        }

        for annotation in &self.annotations {
            match &self.region {
                Some(region) => writeln!(
                    self.out,
                    "  * {} ({:.0} m)",
                    annotation.title,
                    region.center.distance_m(&annotation.coordinate)
                )?,
                None => writeln!(self.out, "  * {}", annotation.title)?,
            }
        }
        self.out.flush()
    }

    fn render_geojson(&mut self) -> io::Result<()> {
        let geojson = GeoJson::from(self.feature_collection());
        writeln!(self.out, "{}", geojson)?;
        self.out.flush()
    }

    /// Current map contents as GeoJSON
    /// DOCUMENTATION: Result pins plus the user location, with the viewport as bbox
    pub fn feature_collection(&self) -> FeatureCollection {
        let mut features: Vec<Feature> = self
            .annotations
            .iter()
            .map(|annotation| {
                let mut properties = JsonObject::new();
                properties.insert("kind".to_string(), json!("result"));
                properties.insert("title".to_string(), json!(annotation.title));
                if let Some(region) = &self.region {
                    properties.insert(
                        "distance_m".to_string(),
                        json!(region.center.distance_m(&annotation.coordinate).round()),
                    );
                }
                point_feature(annotation.coordinate, properties)
            })
            .collect();

        if let Some(coordinate) = self.user_location {
            let mut properties = JsonObject::new();
            properties.insert("kind".to_string(), json!("user_location"));
            features.push(point_feature(coordinate, properties));
        }

        let bbox = self.region.map(|region| {
            let rect = region.bounding_rect();
            vec![rect.min().x, rect.min().y, rect.max().x, rect.max().y]
        });

        FeatureCollection {
            bbox,
            features,
            foreign_members: None,
        }
    }
}

fn point_feature(coordinate: Coordinate, properties: JsonObject) -> Feature {
    let point = Point::from(coordinate);
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![point.x(), point.y()]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

impl<W: Write + Send> MapPresenter for TerminalMap<W> {
    fn center_on(&mut self, region: &Region) {
        log::info!(
            "Centering map on ({}, {}) radius {} m",
            region.center.latitude,
            region.center.longitude,
            region.radius_m
        );
        self.region = Some(*region);
        self.render();
    }

    fn show_user_location(&mut self, coordinate: Coordinate) {
        self.user_location = Some(coordinate);
    }

    fn clear_annotations(&mut self) {
        log::debug!("Clearing {} annotations", self.annotations.len());
        self.annotations.clear();
    }

    fn show_results(&mut self, results: &[PlaceResult]) {
        self.annotations.extend(results.iter().map(Annotation::from));
        self.render();
    }
}

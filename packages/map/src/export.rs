//! `GeoJSON` export layer.
//!
//! [`GeoJsonLayer`] plays the mapping library: it keeps the current marker
//! set and overlay in memory and can write them out as a single
//! `FeatureCollection` for a web map to draw. Cluster settings, legend,
//! count, boundary, and notifications travel as foreign members.

use std::path::Path;

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::json;

use crate::{ClusterOptions, LegendEntry, MapLayer, Marker};

/// Errors that can occur while writing an export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// I/O error (file write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A [`MapLayer`] that renders to a `GeoJSON` document.
#[derive(Debug, Default)]
pub struct GeoJsonLayer {
    markers: Vec<Marker>,
    count: usize,
    clusters: ClusterOptions,
    legend: Vec<LegendEntry>,
    boundary: Option<FeatureCollection>,
    errors: Vec<String>,
}

impl GeoJsonLayer {
    /// Creates an empty layer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Markers currently displayed.
    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Last published count.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Notifications raised so far.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Builds the output document.
    #[must_use]
    pub fn to_feature_collection(&self) -> FeatureCollection {
        let features = self.markers.iter().map(marker_feature).collect();

        let mut members = JsonObject::new();
        members.insert("count".to_owned(), json!(self.count));
        members.insert("clusterOptions".to_owned(), json!(self.clusters));
        members.insert("legend".to_owned(), json!(self.legend));
        if let Some(boundary) = &self.boundary {
            members.insert("boundary".to_owned(), json!(boundary));
        }
        if !self.errors.is_empty() {
            members.insert("errors".to_owned(), json!(self.errors));
        }

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: Some(members),
        }
    }

    /// Writes the document to `path` as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] if serialization or the file write fails.
    pub fn write_to(&self, path: &Path) -> Result<(), ExportError> {
        let body = serde_json::to_string_pretty(&self.to_feature_collection())?;
        std::fs::write(path, body)?;
        log::info!("Wrote {} markers to {}", self.markers.len(), path.display());
        Ok(())
    }
}

fn marker_feature(marker: &Marker) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("color".to_owned(), json!(marker.color()));
    properties.insert("kind".to_owned(), json!(marker.kind.as_ref()));
    properties.insert("type".to_owned(), json!(marker.popup.claim_type));
    properties.insert("date".to_owned(), json!(marker.popup.date));
    properties.insert("location".to_owned(), json!(marker.popup.location));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![
            marker.longitude,
            marker.latitude,
        ]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

impl MapLayer for GeoJsonLayer {
    fn clear_markers(&mut self) {
        self.markers.clear();
    }

    fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    fn set_count(&mut self, count: usize) {
        self.count = count;
    }

    fn notify_error(&mut self, message: &str) {
        log::error!("{message}");
        self.errors.push(message.to_owned());
    }

    fn configure_clusters(&mut self, options: &ClusterOptions) {
        self.clusters = *options;
    }

    fn show_boundary(&mut self, boundary: &FeatureCollection) {
        self.boundary = Some(boundary.clone());
    }

    fn show_legend(&mut self, entries: &[LegendEntry]) {
        self.legend = entries.to_vec();
    }
}

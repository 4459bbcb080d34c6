#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Marker reconciliation for the claims map.
//!
//! The actual drawing is delegated to whatever implements [`MapLayer`].
//! [`render`] does a full replace of the displayed markers from a filtered
//! record set, dropping records whose coordinates aren't finite numbers,
//! and publishes the resulting count.
//!
//! Two layers ship with the crate: [`export::GeoJsonLayer`] collects
//! markers into a `GeoJSON` document for a web frontend, and
//! [`terminal::TerminalLayer`] prints them.

pub mod boundary;
pub mod export;
pub mod terminal;

use claims_map_claim_models::{ClaimKind, ClaimRecord};
use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};

/// Popup content bound to a marker. Missing fields read `"N/A"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Popup {
    /// Claim type, original casing.
    pub claim_type: String,
    /// Claim date as written in the source.
    pub date: String,
    /// Location description.
    pub location: String,
}

impl Popup {
    /// Builds the popup for `record`.
    #[must_use]
    pub fn for_record(record: &ClaimRecord) -> Self {
        Self {
            claim_type: record.display_type().to_owned(),
            date: record.display_date().to_owned(),
            location: record.display_location().to_owned(),
        }
    }
}

/// A point marker ready to be drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Color bucket.
    pub kind: ClaimKind,
    /// Popup content.
    pub popup: Popup,
}

impl Marker {
    /// Builds a marker, or `None` if the record's coordinates aren't both
    /// finite numbers.
    #[must_use]
    pub fn from_record(record: &ClaimRecord) -> Option<Self> {
        let (latitude, longitude) = record.coordinates()?;
        Some(Self {
            latitude,
            longitude,
            kind: record.claim_type.kind(),
            popup: Popup::for_record(record),
        })
    }

    /// Marker fill color.
    #[must_use]
    pub const fn color(&self) -> &'static str {
        self.kind.color()
    }
}

/// Marker clustering settings handed to the mapping layer.
///
/// The radius is deliberately tiny: clustering only exists to pull apart
/// markers that sit on (nearly) the same spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"), default)]
pub struct ClusterOptions {
    /// Maximum screen distance, in pixels, for two markers to cluster.
    pub max_cluster_radius_px: u32,
    /// Spread a cluster's members apart when it is expanded.
    pub spiderfy_on_max_zoom: bool,
    /// Outline a cluster's coverage on hover.
    pub show_coverage_on_hover: bool,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            max_cluster_radius_px: 1,
            spiderfy_on_max_zoom: true,
            show_coverage_on_hover: false,
        }
    }
}

/// One legend row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    /// Display label.
    pub label: &'static str,
    /// Swatch color.
    pub color: &'static str,
}

/// Returns the legend rows, one per color bucket.
#[must_use]
pub fn legend_entries() -> Vec<LegendEntry> {
    ClaimKind::all()
        .iter()
        .map(|kind| LegendEntry {
            label: kind.label(),
            color: kind.color(),
        })
        .collect()
}

/// The drawing capabilities the claims map needs from a mapping library.
pub trait MapLayer {
    /// Removes every displayed marker.
    fn clear_markers(&mut self);

    /// Adds a marker to the clustering container.
    fn add_marker(&mut self, marker: Marker);

    /// Writes the visible claim count.
    fn set_count(&mut self, count: usize);

    /// Shows a user-visible error notification.
    fn notify_error(&mut self, message: &str);

    /// Applies marker clustering settings. Called once at startup.
    fn configure_clusters(&mut self, options: &ClusterOptions);

    /// Draws the municipal boundary overlay.
    fn show_boundary(&mut self, boundary: &FeatureCollection);

    /// Draws the color legend.
    fn show_legend(&mut self, entries: &[LegendEntry]);
}

/// Replaces the displayed markers with one per record that has finite
/// coordinates, then publishes and returns the displayed count.
pub fn render<'a, L>(records: impl IntoIterator<Item = &'a ClaimRecord>, layer: &mut L) -> usize
where
    L: MapLayer + ?Sized,
{
    layer.clear_markers();

    let mut count = 0;
    let mut skipped = 0;
    for record in records {
        if let Some(marker) = Marker::from_record(record) {
            layer.add_marker(marker);
            count += 1;
        } else {
            skipped += 1;
        }
    }

    if skipped > 0 {
        log::debug!("Skipped {skipped} claims with non-numeric coordinates");
    }

    layer.set_count(count);
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        markers: Vec<Marker>,
        count: Option<usize>,
        clears: usize,
    }

    impl MapLayer for Recorder {
        fn clear_markers(&mut self) {
            self.markers.clear();
            self.clears += 1;
        }
        fn add_marker(&mut self, marker: Marker) {
            self.markers.push(marker);
        }
        fn set_count(&mut self, count: usize) {
            self.count = Some(count);
        }
        fn notify_error(&mut self, _message: &str) {}
        fn configure_clusters(&mut self, _options: &ClusterOptions) {}
        fn show_boundary(&mut self, _boundary: &FeatureCollection) {}
        fn show_legend(&mut self, _entries: &[LegendEntry]) {}
    }

    fn claim(kind: Option<&str>, lat: &str, lng: &str) -> ClaimRecord {
        ClaimRecord::new(
            kind.map(str::to_string),
            None,
            lat.to_string(),
            lng.to_string(),
            Some("Simcoe St N".to_string()),
        )
    }

    #[test]
    fn render_drops_non_finite_coordinates() {
        let records = vec![
            claim(Some("Pothole"), "43.9", "-78.86"),
            claim(Some("Pothole"), "N/A", "-78.86"),
            claim(Some("Pothole"), "43.9", "Infinity"),
            claim(Some("Bogus"), "43.91", "-78.85"),
        ];

        let mut layer = Recorder::default();
        let count = render(&records, &mut layer);

        assert_eq!(count, 2);
        assert_eq!(layer.count, Some(2));
        assert_eq!(layer.markers.len(), 2);
        assert!(layer.markers.iter().all(|m| m.latitude.is_finite()));
    }

    #[test]
    fn render_replaces_previous_markers() {
        let mut layer = Recorder::default();
        render(&[claim(Some("Pothole"), "1", "1")], &mut layer);
        render(&[] as &[ClaimRecord], &mut layer);

        assert_eq!(layer.clears, 2);
        assert!(layer.markers.is_empty());
        assert_eq!(layer.count, Some(0));
    }

    #[test]
    fn unrecognized_and_missing_types_use_other_color() {
        let records = vec![
            claim(Some("Graffiti"), "1", "1"),
            claim(None, "1", "1"),
            claim(Some(" slip and fall "), "1", "1"),
        ];
        let mut layer = Recorder::default();
        render(&records, &mut layer);

        assert_eq!(layer.markers[0].color(), ClaimKind::Other.color());
        assert_eq!(layer.markers[1].color(), ClaimKind::Other.color());
        assert_eq!(layer.markers[2].color(), ClaimKind::SlipAndFall.color());
    }

    #[test]
    fn popup_falls_back_to_not_available() {
        let marker = Marker::from_record(&ClaimRecord::new(
            None,
            None,
            "1".into(),
            "2".into(),
            None,
        ))
        .unwrap();
        assert_eq!(marker.popup.claim_type, "N/A");
        assert_eq!(marker.popup.date, "N/A");
        assert_eq!(marker.popup.location, "N/A");
    }

    #[test]
    fn legend_has_one_row_per_color() {
        let legend = legend_entries();
        assert_eq!(legend.len(), 5);
        assert_eq!(legend[4].label, "Other");
    }
}

//! Plain-text map layer for the command line.
//!
//! Markers are kept in memory and printed on demand. Markers that share a
//! position (to six decimal places, roughly 10 cm) are printed as one
//! cluster with its members listed beneath it, which is the text version
//! of spiderfying a cluster.

use std::collections::BTreeMap;
use std::io::Write;

use geojson::FeatureCollection;

use crate::{ClusterOptions, LegendEntry, MapLayer, Marker};

/// Scale used to bucket coordinates when grouping coincident markers.
const POSITION_SCALE: f64 = 1_000_000.0;

#[allow(clippy::cast_possible_truncation)]
fn position_key(marker: &Marker) -> (i64, i64) {
    (
        (marker.latitude * POSITION_SCALE).round() as i64,
        (marker.longitude * POSITION_SCALE).round() as i64,
    )
}

/// Groups markers that share a position, keeping first-seen order.
#[must_use]
pub fn group_coincident(markers: &[Marker]) -> Vec<Vec<&Marker>> {
    let mut slots: BTreeMap<(i64, i64), usize> = BTreeMap::new();
    let mut groups: Vec<Vec<&Marker>> = Vec::new();

    for marker in markers {
        let slot = *slots.entry(position_key(marker)).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(marker);
    }

    groups
}

/// A [`MapLayer`] that prints to a writer (stdout by default).
pub struct TerminalLayer<W: Write = std::io::Stdout> {
    out: W,
    markers: Vec<Marker>,
    count: usize,
    spiderfy: bool,
}

impl TerminalLayer {
    /// Creates a layer that prints to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalLayer<W> {
    /// Creates a layer that prints to `out`.
    pub const fn new(out: W) -> Self {
        Self {
            out,
            markers: Vec::new(),
            count: 0,
            spiderfy: true,
        }
    }

    /// Last published count.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Consumes the layer, returning its writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Prints the count and every displayed marker, grouping coincident
    /// ones.
    pub fn print_markers(&mut self) {
        let mut text = format!("Claims shown: {}\n", self.count);
        for group in group_coincident(&self.markers) {
            if let [marker] = group.as_slice() {
                text.push_str(&format_marker("", marker));
                continue;
            }

            let first = group[0];
            text.push_str(&format!(
                "({:.6}, {:.6}) cluster of {}\n",
                first.latitude,
                first.longitude,
                group.len()
            ));
            if self.spiderfy {
                for marker in group {
                    text.push_str(&format_marker("    ", marker));
                }
            }
        }
        self.write(&text);
    }

    fn write(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()) {
            log::warn!("Failed to write map output: {e}");
        }
    }
}

fn format_marker(indent: &str, marker: &Marker) -> String {
    format!(
        "{indent}({:.6}, {:.6}) [{}] {} | {} | {}\n",
        marker.latitude,
        marker.longitude,
        marker.kind.label(),
        marker.popup.claim_type,
        marker.popup.date,
        marker.popup.location,
    )
}

impl<W: Write> MapLayer for TerminalLayer<W> {
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
        self.write(&format!("Error: {message}\n"));
    }

    fn configure_clusters(&mut self, options: &ClusterOptions) {
        self.spiderfy = options.spiderfy_on_max_zoom;
    }

    fn show_boundary(&mut self, boundary: &FeatureCollection) {
        self.write(&format!(
            "Boundary overlay: {} feature(s)\n",
            boundary.features.len()
        ));
    }

    fn show_legend(&mut self, entries: &[LegendEntry]) {
        let mut text = String::from("Legend:\n");
        for entry in entries {
            text.push_str(&format!("  {} {}\n", entry.color, entry.label));
        }
        self.write(&text);
    }
}

#[cfg(test)]
mod tests {
    use claims_map_claim_models::ClaimRecord;

    use super::*;
    use crate::render;

    fn claim(kind: &str, lat: &str, lng: &str) -> ClaimRecord {
        ClaimRecord::new(Some(kind.into()), None, lat.into(), lng.into(), None)
    }

    #[test]
    fn groups_exactly_coincident_markers() {
        let records = vec![
            claim("Pothole", "43.9", "-78.86"),
            claim("Bogus", "43.91", "-78.85"),
            claim("Trip and Fall", "43.9000000001", "-78.86"),
        ];
        let markers: Vec<Marker> = records.iter().filter_map(Marker::from_record).collect();

        let groups = group_coincident(&markers);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[1].len(), 1);
        assert_eq!(groups[0][1].popup.claim_type, "Trip and Fall");
    }

    #[test]
    fn prints_count_and_clusters() {
        let records = vec![
            claim("Pothole", "43.9", "-78.86"),
            claim("Pothole", "43.9", "-78.86"),
        ];

        let mut layer = TerminalLayer::new(Vec::new());
        render(&records, &mut layer);
        layer.print_markers();

        let text = String::from_utf8(layer.into_inner()).unwrap();
        assert!(text.contains("Claims shown: 2"));
        assert!(text.contains("cluster of 2"));
        assert_eq!(text.matches("[Pothole]").count(), 2);
    }

    #[test]
    fn prints_positions_at_grouping_precision() {
        let records = vec![
            claim("Pothole", "43.900001", "-78.86"),
            claim("Pothole", "43.900002", "-78.86"),
        ];

        let mut layer = TerminalLayer::new(Vec::new());
        render(&records, &mut layer);
        layer.print_markers();

        let text = String::from_utf8(layer.into_inner()).unwrap();
        assert!(!text.contains("cluster of"));
        assert!(text.contains("(43.900001, -78.860000)"));
        assert!(text.contains("(43.900002, -78.860000)"));
    }
}

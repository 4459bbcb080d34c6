//! Municipal boundary overlay selection.

use geojson::{Feature, FeatureCollection};

/// Property holding a boundary feature's place name.
pub const NAME_PROPERTY: &str = "name";

fn has_name(feature: &Feature, name: &str) -> bool {
    feature
        .property(NAME_PROPERTY)
        .and_then(serde_json::Value::as_str)
        == Some(name)
}

/// Keeps only the features whose `name` property is exactly `name`.
///
/// The comparison is case-sensitive and untrimmed.
#[must_use]
pub fn select_municipality(collection: FeatureCollection, name: &str) -> FeatureCollection {
    let total = collection.features.len();
    let features: Vec<Feature> = collection
        .features
        .into_iter()
        .filter(|feature| has_name(feature, name))
        .collect();

    log::debug!(
        "Selected {} of {total} boundary features named '{name}'",
        features.len()
    );

    FeatureCollection {
        bbox: collection.bbox,
        features,
        foreign_members: collection.foreign_members,
    }
}

#[cfg(test)]
mod tests {
    use geojson::GeoJson;

    use super::*;

    const BOUNDARIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"name": "Oshawa"},
             "geometry": {"type": "Point", "coordinates": [-78.86, 43.9]}},
            {"type": "Feature", "properties": {"name": "Whitby"},
             "geometry": {"type": "Point", "coordinates": [-78.94, 43.88]}},
            {"type": "Feature", "properties": {"name": "oshawa"},
             "geometry": {"type": "Point", "coordinates": [-78.86, 43.9]}},
            {"type": "Feature", "properties": null,
             "geometry": {"type": "Point", "coordinates": [0.0, 0.0]}}
        ]
    }"#;

    fn collection() -> FeatureCollection {
        match BOUNDARIES.parse::<GeoJson>().unwrap() {
            GeoJson::FeatureCollection(fc) => fc,
            other => panic!("unexpected GeoJSON: {other:?}"),
        }
    }

    #[test]
    fn keeps_exact_name_matches_only() {
        let selected = select_municipality(collection(), "Oshawa");
        assert_eq!(selected.features.len(), 1);
        assert!(has_name(&selected.features[0], "Oshawa"));
    }

    #[test]
    fn unknown_name_selects_nothing() {
        assert!(select_municipality(collection(), "Ajax").features.is_empty());
    }
}

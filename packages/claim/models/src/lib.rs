#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Claim type taxonomy, display colors, and the in-memory claim record.
//!
//! Every loaded row is classified once into a [`ClaimType`]. The four
//! standard categories get their own variant; anything else is kept as
//! [`ClaimType::Other`] with its normalized text so that exact-match
//! filtering on free-text types still works.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Fallback text shown in popups when a field is missing or blank.
pub const NOT_AVAILABLE: &str = "N/A";

/// The five legend/color buckets a claim can fall into.
///
/// This is the key of the type-to-color map: four standard types plus a
/// catch-all [`ClaimKind::Other`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimKind {
    /// Road surface pothole
    #[strum(serialize = "pothole")]
    Pothole,
    /// Damage to vehicles or private property
    #[strum(serialize = "property damage")]
    PropertyDamage,
    /// Slip-and-fall injury
    #[strum(serialize = "slip and fall")]
    SlipAndFall,
    /// Trip-and-fall injury
    #[strum(serialize = "trip and fall")]
    TripAndFall,
    /// Any claim type outside the four standard ones
    #[strum(serialize = "other")]
    Other,
}

impl ClaimKind {
    /// Returns the marker/legend color for this kind.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Pothole => "#e74c3c",
            Self::PropertyDamage => "#f39c12",
            Self::SlipAndFall => "#3498db",
            Self::TripAndFall => "#9b59b6",
            Self::Other => "#7f8c8d",
        }
    }

    /// Returns the human-readable legend label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pothole => "Pothole",
            Self::PropertyDamage => "Property Damage",
            Self::SlipAndFall => "Slip and Fall",
            Self::TripAndFall => "Trip and Fall",
            Self::Other => "Other",
        }
    }

    /// Returns all variants of this enum, in legend order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Pothole,
            Self::PropertyDamage,
            Self::SlipAndFall,
            Self::TripAndFall,
            Self::Other,
        ]
    }

    /// Returns only the four standard kinds.
    #[must_use]
    pub const fn standard() -> &'static [Self] {
        &[
            Self::Pothole,
            Self::PropertyDamage,
            Self::SlipAndFall,
            Self::TripAndFall,
        ]
    }
}

/// A claim's type, classified once at load time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClaimType {
    /// Normalized `"pothole"`
    Pothole,
    /// Normalized `"property damage"`
    PropertyDamage,
    /// Normalized `"slip and fall"`
    SlipAndFall,
    /// Normalized `"trip and fall"`
    TripAndFall,
    /// Any other value, holding its normalized (trimmed, lowercased) text.
    /// A blank type is `Other("")`.
    Other(String),
}

impl ClaimType {
    /// Classifies a raw type string from the dataset or a UI control.
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        let normalized = normalize_type(raw);
        match normalized.parse::<ClaimKind>() {
            Ok(ClaimKind::Pothole) => Self::Pothole,
            Ok(ClaimKind::PropertyDamage) => Self::PropertyDamage,
            Ok(ClaimKind::SlipAndFall) => Self::SlipAndFall,
            Ok(ClaimKind::TripAndFall) => Self::TripAndFall,
            Ok(ClaimKind::Other) | Err(_) => Self::Other(normalized),
        }
    }

    /// Returns the color/legend bucket for this type.
    #[must_use]
    pub const fn kind(&self) -> ClaimKind {
        match self {
            Self::Pothole => ClaimKind::Pothole,
            Self::PropertyDamage => ClaimKind::PropertyDamage,
            Self::SlipAndFall => ClaimKind::SlipAndFall,
            Self::TripAndFall => ClaimKind::TripAndFall,
            Self::Other(_) => ClaimKind::Other,
        }
    }

    /// Whether this is one of the four standard types.
    #[must_use]
    pub const fn is_standard(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

/// Trims and lowercases a claim type for comparison.
#[must_use]
pub fn normalize_type(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Parses a dataset or control date into a comparable calendar date.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, `MM/DD/YYYY`, RFC 3339 timestamps,
/// and `YYYY-MM-DDTHH:MM[:SS]` (the time part is dropped). Returns `None`
/// for blank or unrecognized input.
#[must_use]
pub fn parse_claim_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    // chrono's `%Y` takes any digit count, so "12/31/24" would land in year 24
    let year_first = is_four_digit_year(s.split(['-', '/']).next());
    let year_last = is_four_digit_year(s.split('/').nth(2));

    for (fmt, full_year) in [
        ("%Y-%m-%d", year_first),
        ("%Y/%m/%d", year_first),
        ("%m/%d/%Y", year_last),
    ] {
        if !full_year {
            continue;
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    if year_first {
        for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(dt.date());
            }
        }
    }

    None
}

fn is_four_digit_year(segment: Option<&str>) -> bool {
    segment.is_some_and(|y| y.len() == 4 && y.bytes().all(|b| b.is_ascii_digit()))
}

/// One reported incident, as held in the in-memory dataset.
///
/// Raw strings are kept for display; `claim_type` and `date` are derived
/// from them once when the record is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRecord {
    /// Type text exactly as it appeared in the source (original casing).
    pub type_label: Option<String>,
    /// Classified type.
    pub claim_type: ClaimType,
    /// Date text exactly as it appeared in the source.
    pub date_raw: Option<String>,
    /// Parsed date, `None` when missing or unparseable.
    pub date: Option<NaiveDate>,
    /// Latitude cell text. Always present, not necessarily numeric.
    pub latitude: String,
    /// Longitude cell text. Always present, not necessarily numeric.
    pub longitude: String,
    /// Free-text location description.
    pub location_desc: Option<String>,
}

impl ClaimRecord {
    /// Builds a record from raw cell values, deriving the type and date.
    #[must_use]
    pub fn new(
        type_label: Option<String>,
        date_raw: Option<String>,
        latitude: String,
        longitude: String,
        location_desc: Option<String>,
    ) -> Self {
        let claim_type = ClaimType::from_raw(type_label.as_deref().unwrap_or(""));
        let date = date_raw.as_deref().and_then(parse_claim_date);
        Self {
            type_label,
            claim_type,
            date_raw,
            date,
            latitude,
            longitude,
            location_desc,
        }
    }

    /// Parses both coordinates, returning `(latitude, longitude)` only when
    /// both are finite numbers.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lat: f64 = self.latitude.trim().parse().ok()?;
        let lng: f64 = self.longitude.trim().parse().ok()?;
        (lat.is_finite() && lng.is_finite()).then_some((lat, lng))
    }

    /// Display text for the type, falling back to [`NOT_AVAILABLE`].
    #[must_use]
    pub fn display_type(&self) -> &str {
        display_or_na(self.type_label.as_deref())
    }

    /// Display text for the date, falling back to [`NOT_AVAILABLE`].
    #[must_use]
    pub fn display_date(&self) -> &str {
        display_or_na(self.date_raw.as_deref())
    }

    /// Display text for the location, falling back to [`NOT_AVAILABLE`].
    #[must_use]
    pub fn display_location(&self) -> &str {
        display_or_na(self.location_desc.as_deref())
    }
}

fn display_or_na(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => NOT_AVAILABLE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: &str, lat: &str, lng: &str) -> ClaimRecord {
        ClaimRecord::new(
            Some(kind.to_string()),
            Some("2025-03-01".to_string()),
            lat.to_string(),
            lng.to_string(),
            None,
        )
    }

    #[test]
    fn classifies_standard_types_case_insensitively() {
        assert_eq!(ClaimType::from_raw("Pothole"), ClaimType::Pothole);
        assert_eq!(
            ClaimType::from_raw("Property Damage "),
            ClaimType::PropertyDamage
        );
        assert_eq!(ClaimType::from_raw(" SLIP AND FALL"), ClaimType::SlipAndFall);
        assert_eq!(ClaimType::from_raw("trip and fall"), ClaimType::TripAndFall);
    }

    #[test]
    fn non_standard_types_fall_into_other() {
        assert_eq!(
            ClaimType::from_raw("Graffiti"),
            ClaimType::Other("graffiti".to_string())
        );
        assert_eq!(
            ClaimType::from_raw("other"),
            ClaimType::Other("other".to_string())
        );
        assert_eq!(ClaimType::from_raw("  "), ClaimType::Other(String::new()));
        assert_eq!(ClaimType::from_raw("Bogus").kind(), ClaimKind::Other);
    }

    #[test]
    fn color_map_has_five_distinct_entries() {
        let mut colors: Vec<&str> = ClaimKind::all().iter().map(|k| k.color()).collect();
        colors.sort_unstable();
        colors.dedup();
        assert_eq!(colors.len(), 5);
        assert_eq!(ClaimKind::standard().len(), 4);
    }

    #[test]
    fn parses_supported_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 1);
        assert_eq!(parse_claim_date("2025-03-01"), expected);
        assert_eq!(parse_claim_date("2025/03/01"), expected);
        assert_eq!(parse_claim_date("03/01/2025"), expected);
        assert_eq!(parse_claim_date("2025-03-01T14:30:00Z"), expected);
        assert_eq!(parse_claim_date("2025-03-01T14:30"), expected);
        assert_eq!(parse_claim_date("not a date"), None);
        assert_eq!(parse_claim_date(""), None);
    }

    #[test]
    fn rejects_two_digit_years() {
        assert_eq!(parse_claim_date("12/31/24"), None);
        assert_eq!(parse_claim_date("01/02/03"), None);
        assert_eq!(parse_claim_date("24-12-31"), None);
        assert_eq!(parse_claim_date("24-12-31T10:00"), None);
        assert_eq!(
            parse_claim_date("12/31/2024"),
            NaiveDate::from_ymd_opt(2024, 12, 31)
        );
    }

    #[test]
    fn coordinates_require_finite_numbers() {
        assert_eq!(
            record("Pothole", "43.9", "-78.86").coordinates(),
            Some((43.9, -78.86))
        );
        assert_eq!(record("Pothole", "N/A", "-78.86").coordinates(), None);
        assert_eq!(record("Pothole", "43.9", "inf").coordinates(), None);
        assert_eq!(record("Pothole", "NaN", "1").coordinates(), None);
    }

    #[test]
    fn display_fields_fall_back_to_not_available() {
        let rec = ClaimRecord::new(None, Some("  ".to_string()), "1".into(), "2".into(), None);
        assert_eq!(rec.display_type(), NOT_AVAILABLE);
        assert_eq!(rec.display_date(), NOT_AVAILABLE);
        assert_eq!(rec.display_location(), NOT_AVAILABLE);

        let rec = record("Property Damage ", "1", "2");
        assert_eq!(rec.display_type(), "Property Damage ");
    }
}

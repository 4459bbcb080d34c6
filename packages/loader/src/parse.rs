//! Header-delimited claim dataset parsing.
//!
//! The first row names the columns; each later row is one claim. Column
//! names are matched case-insensitively after trimming, and columns the
//! file doesn't have are treated as absent for every row.

use claims_map_claim_models::ClaimRecord;

use crate::LoadError;

/// Column indices of the fields a claim record is built from.
#[derive(Debug, Default)]
struct ColumnIndex {
    claim_type: Option<usize>,
    date: Option<usize>,
    latitude: Option<usize>,
    longitude: Option<usize>,
    location_desc: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let mut index = Self::default();
        for (i, header) in headers.iter().enumerate() {
            let slot = match header.trim().to_lowercase().as_str() {
                "type" => &mut index.claim_type,
                "date" => &mut index.date,
                "latitude" => &mut index.latitude,
                "longitude" => &mut index.longitude,
                "location_desc" => &mut index.location_desc,
                _ => continue,
            };
            // First occurrence wins for duplicated headers
            slot.get_or_insert(i);
        }
        index
    }
}

/// Returns the cell text at `column` as written, or `None` when the column
/// is missing, the row is short, or the cell is blank.
fn cell(record: &csv::StringRecord, column: Option<usize>) -> Option<String> {
    let value = record.get(column?)?;
    (!value.trim().is_empty()).then(|| value.to_owned())
}

/// Parses claim CSV text into records, preserving row order.
///
/// Rows without a latitude or longitude value are dropped. Only presence
/// is checked here; numeric validity is left to marker rendering.
///
/// # Errors
///
/// Returns [`LoadError::Csv`] if the text is not valid CSV.
pub fn parse_claims_csv(text: &str) -> Result<Vec<ClaimRecord>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let columns = ColumnIndex::from_headers(reader.headers()?);
    if columns.latitude.is_none() || columns.longitude.is_none() {
        log::warn!("Dataset has no latitude/longitude columns; every row will be dropped");
    }

    let mut records = Vec::new();
    let mut dropped: u64 = 0;

    for result in reader.records() {
        let row = result?;

        let (Some(latitude), Some(longitude)) =
            (cell(&row, columns.latitude), cell(&row, columns.longitude))
        else {
            dropped += 1;
            continue;
        };

        records.push(ClaimRecord::new(
            cell(&row, columns.claim_type),
            cell(&row, columns.date),
            latitude,
            longitude,
            cell(&row, columns.location_desc),
        ));
    }

    if dropped > 0 {
        log::debug!("Dropped {dropped} rows without coordinates");
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use claims_map_claim_models::ClaimType;

    use super::*;

    #[test]
    fn parses_rows_in_order() {
        let text = "type,date,latitude,longitude,location_desc\n\
                    Pothole,2025-03-01,43.9,-78.86,King St\n\
                    Bogus,2025-06-01,43.91,-78.85,\n";

        let records = parse_claims_csv(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].claim_type, ClaimType::Pothole);
        assert_eq!(records[0].location_desc.as_deref(), Some("King St"));
        assert_eq!(records[1].claim_type, ClaimType::Other("bogus".into()));
        assert_eq!(records[1].location_desc, None);
    }

    #[test]
    fn drops_rows_missing_coordinates_but_keeps_non_numeric_ones() {
        let text = "type,date,latitude,longitude\n\
                    Pothole,2025-03-01,,-78.86\n\
                    Pothole,2025-03-02,43.9\n\
                    Pothole,2025-03-03,N/A,-78.86\n";

        let records = parse_claims_csv(text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].latitude, "N/A");
        assert_eq!(records[0].coordinates(), None);
    }

    #[test]
    fn matches_headers_case_insensitively_in_any_order() {
        let text = " Longitude ,LATITUDE,Location_Desc,Type\n-78.86,43.9,Park,Trip and Fall\n";

        let records = parse_claims_csv(text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].coordinates(), Some((43.9, -78.86)));
        assert_eq!(records[0].claim_type, ClaimType::TripAndFall);
        assert_eq!(records[0].date, None);
        assert_eq!(records[0].display_date(), "N/A");
    }

    #[test]
    fn keeps_cell_text_as_written() {
        let text = "type,date,latitude,longitude,location_desc\n\
                    Property Damage , 2025-03-01,43.9,-78.86,  \n";

        let records = parse_claims_csv(text).unwrap();
        assert_eq!(records[0].type_label.as_deref(), Some("Property Damage "));
        assert_eq!(records[0].display_type(), "Property Damage ");
        assert_eq!(records[0].claim_type, ClaimType::PropertyDamage);
        assert_eq!(records[0].date_raw.as_deref(), Some(" 2025-03-01"));
        assert!(records[0].date.is_some());
        assert_eq!(records[0].location_desc, None);
    }

    #[test]
    fn missing_coordinate_columns_yield_empty_dataset() {
        let text = "type,date\nPothole,2025-03-01\n";
        assert!(parse_claims_csv(text).unwrap().is_empty());
    }

    #[test]
    fn empty_input_yields_empty_dataset() {
        assert!(parse_claims_csv("").unwrap().is_empty());
    }
}

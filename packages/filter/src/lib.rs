#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Date-range and claim type filtering.
//!
//! [`FilterInputs`] holds the raw text of the three filter controls. Each
//! time filtering runs, a fresh [`FilterSpec`] is built from them and
//! handed to [`apply_filters`], which is a pure, order-preserving filter
//! over the loaded dataset.

use chrono::NaiveDate;
use claims_map_claim_models::{ClaimKind, ClaimRecord, ClaimType, normalize_type, parse_claim_date};
use serde::{Deserialize, Serialize};

/// Raw values of the filter controls. Empty strings mean "unconstrained".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterInputs {
    /// Start date control text.
    pub start_date: String,
    /// End date control text.
    pub end_date: String,
    /// Type selector text.
    pub claim_type: String,
}

impl FilterInputs {
    /// Whether every control is blank.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.start_date.trim().is_empty()
            && self.end_date.trim().is_empty()
            && self.claim_type.trim().is_empty()
    }
}

/// Which claim types pass the filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TypeFilter {
    /// No type constraint.
    #[default]
    Any,
    /// Any type that isn't one of the four standard ones.
    Other,
    /// Exactly this normalized type.
    Exact(ClaimType),
}

impl TypeFilter {
    /// Interprets a type selector value.
    #[must_use]
    pub fn from_selection(selection: &str) -> Self {
        let normalized = normalize_type(selection);
        if normalized.is_empty() {
            Self::Any
        } else if normalized == ClaimKind::Other.as_ref() {
            Self::Other
        } else {
            Self::Exact(ClaimType::from_raw(&normalized))
        }
    }

    /// Whether `claim_type` passes this filter.
    #[must_use]
    pub fn matches(&self, claim_type: &ClaimType) -> bool {
        match self {
            Self::Any => true,
            Self::Other => !claim_type.is_standard(),
            Self::Exact(wanted) => wanted == claim_type,
        }
    }
}

/// A date-range and type constraint, built fresh for each filter run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    /// Inclusive lower bound.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound.
    pub end_date: Option<NaiveDate>,
    /// Type constraint.
    pub claim_type: TypeFilter,
}

impl FilterSpec {
    /// Builds a spec from raw control values.
    ///
    /// Unparseable date text is logged and treated as no bound.
    #[must_use]
    pub fn from_inputs(inputs: &FilterInputs) -> Self {
        Self {
            start_date: parse_bound("start", &inputs.start_date),
            end_date: parse_bound("end", &inputs.end_date),
            claim_type: TypeFilter::from_selection(&inputs.claim_type),
        }
    }

    /// Whether any date bound is active.
    #[must_use]
    pub const fn has_date_bound(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }

    /// Whether `record` passes both the date range and the type filter.
    ///
    /// A record with no usable date never satisfies an active bound but
    /// passes when no bound is set.
    #[must_use]
    pub fn matches(&self, record: &ClaimRecord) -> bool {
        self.claim_type.matches(&record.claim_type) && self.matches_date(record.date)
    }

    fn matches_date(&self, date: Option<NaiveDate>) -> bool {
        if !self.has_date_bound() {
            return true;
        }
        let Some(date) = date else {
            return false;
        };
        self.start_date.is_none_or(|start| date >= start)
            && self.end_date.is_none_or(|end| date <= end)
    }
}

fn parse_bound(which: &str, raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parsed = parse_claim_date(trimmed);
    if parsed.is_none() {
        log::warn!("Ignoring unparseable {which} date filter '{trimmed}'");
    }
    parsed
}

/// Returns the records that pass `spec`, in dataset order.
#[must_use]
pub fn apply_filters<'a>(dataset: &'a [ClaimRecord], spec: &FilterSpec) -> Vec<&'a ClaimRecord> {
    dataset.iter().filter(|record| spec.matches(record)).collect()
}

//! Column classification: role columns, time-point columns and the rest.

use std::collections::BTreeMap;

use regions_model::TimeIndex;
use serde::Serialize;

use crate::overrides::ColumnOverrides;
use crate::roles::ColumnRole;

/// Region type used when no column hints at another one.
pub const DEFAULT_REGION_TYPE: &str = "country";

/// A column whose label is a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeColumn {
    pub label: String,
    pub index: TimeIndex,
}

/// Result of running the heuristics over a table's labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DetectedColumns {
    /// Role to the label chosen for it. Roles without a match are absent.
    pub roles: BTreeMap<ColumnRole, String>,
    /// Time-point columns in table order.
    pub time_columns: Vec<TimeColumn>,
    /// Every label that is not a time point, in table order.
    pub metadata_columns: Vec<String>,
    pub region_type: String,
}

impl DetectedColumns {
    pub fn label(&self, role: ColumnRole) -> Option<&str> {
        self.roles.get(&role).map(String::as_str)
    }
}

/// Parses a label as a time point: an integer year, an integral numeric
/// string or an ISO date.
pub fn classify_label(label: &str) -> Option<TimeIndex> {
    TimeIndex::parse_label(label)
}

/// Picks the column for `role`.
///
/// An explicit override wins even when the table lacks it; otherwise the
/// first candidate literally present in `labels` is used.
pub fn find_column(role: ColumnRole, labels: &[String], overrides: &ColumnOverrides) -> Option<String> {
    if let Some(label) = overrides.column(role) {
        return Some(label.to_string());
    }
    role.candidates()
        .iter()
        .find(|candidate| labels.iter().any(|label| label == *candidate))
        .map(|candidate| (*candidate).to_string())
}

/// Region type implied by a region column label, if any.
fn type_hint(label: &str) -> Option<&'static str> {
    match label {
        "stateCode" | "state" => Some("state"),
        "fipsCode" | "countyName" => Some("county"),
        "cityName" => Some("city"),
        "countryCode" | "countryName" | "Country" | "isoCode" | "ISO" => Some("country"),
        _ => None,
    }
}

/// Runs every heuristic over a table's labels.
pub fn detect_columns(labels: &[String], overrides: &ColumnOverrides) -> DetectedColumns {
    let mut roles = BTreeMap::new();
    for role in ColumnRole::ALL {
        if let Some(label) = find_column(role, labels, overrides) {
            roles.insert(role, label);
        }
    }

    let mut time_columns = Vec::new();
    let mut metadata_columns = Vec::new();
    for label in labels {
        match classify_label(label) {
            Some(index) => time_columns.push(TimeColumn {
                label: label.clone(),
                index,
            }),
            None => metadata_columns.push(label.clone()),
        }
    }

    let region_type = [ColumnRole::RegionCode, ColumnRole::RegionName]
        .iter()
        .filter_map(|role| roles.get(role))
        .find_map(|label| type_hint(label))
        .unwrap_or(DEFAULT_REGION_TYPE)
        .to_string();

    DetectedColumns {
        roles,
        time_columns,
        metadata_columns,
        region_type,
    }
}

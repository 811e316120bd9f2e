//! Caller-supplied column choices that take precedence over the heuristics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::roles::ColumnRole;

/// Where a role's values come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataSource {
    /// A column of the table.
    Column(String),
    /// A lookup map. Metadata maps are keyed by `region_code|series_code` or
    /// `series_code`; the region code map is keyed by region name.
    Map(BTreeMap<String, String>),
}

impl MetadataSource {
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::Column(label) => Some(label),
            Self::Map(_) => None,
        }
    }
}

/// Explicit column labels and lookup maps per role.
///
/// A map always wins over a column for the same role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnOverrides {
    columns: BTreeMap<ColumnRole, String>,
    maps: BTreeMap<ColumnRole, BTreeMap<String, String>>,
}

impl ColumnOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_column(mut self, role: ColumnRole, label: impl Into<String>) -> Self {
        self.set_column(role, label);
        self
    }

    /// Supplies a lookup map for a role. Roles that do not accept maps keep
    /// using their column.
    #[must_use]
    pub fn with_map(mut self, role: ColumnRole, map: BTreeMap<String, String>) -> Self {
        self.set_map(role, map);
        self
    }

    pub fn set_column(&mut self, role: ColumnRole, label: impl Into<String>) {
        self.columns.insert(role, label.into());
    }

    pub fn set_map(&mut self, role: ColumnRole, map: BTreeMap<String, String>) {
        if role.accepts_map() {
            self.maps.insert(role, map);
        }
    }

    pub fn column(&self, role: ColumnRole) -> Option<&str> {
        self.columns.get(&role).map(String::as_str)
    }

    pub fn map(&self, role: ColumnRole) -> Option<&BTreeMap<String, String>> {
        self.maps.get(&role)
    }

    /// The explicit source for a role, if any.
    pub fn source(&self, role: ColumnRole) -> Option<MetadataSource> {
        if let Some(map) = self.map(role) {
            return Some(MetadataSource::Map(map.clone()));
        }
        self.column(role)
            .map(|label| MetadataSource::Column(label.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.maps.is_empty()
    }

    /// Layout of the IMF World Economic Outlook country tables.
    pub fn weo() -> Self {
        Self::new()
            .with_column(ColumnRole::RegionCode, "ISO")
            .with_column(ColumnRole::RegionName, "Country")
            .with_column(ColumnRole::SeriesCode, "WEO Subject Code")
            .with_column(ColumnRole::SeriesName, "Subject Descriptor")
            .with_column(ColumnRole::Notes, "Country/Series-specific Notes")
            .with_column(ColumnRole::Scale, "Scale")
            .with_column(ColumnRole::Units, "Units")
            .with_column(ColumnRole::Description, "Subject Notes")
    }
}

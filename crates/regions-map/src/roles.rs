//! Semantic roles a table column can play.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A semantic role in the standard series layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    RegionCode,
    RegionName,
    SeriesCode,
    SeriesName,
    Notes,
    Scale,
    Units,
    Description,
    Tags,
}

impl ColumnRole {
    pub const ALL: [ColumnRole; 9] = [
        ColumnRole::RegionCode,
        ColumnRole::RegionName,
        ColumnRole::SeriesCode,
        ColumnRole::SeriesName,
        ColumnRole::Notes,
        ColumnRole::Scale,
        ColumnRole::Units,
        ColumnRole::Description,
        ColumnRole::Tags,
    ];

    /// Label spellings recognised for this role, highest priority first.
    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            Self::RegionCode => &[
                "regionCode",
                "countryCode",
                "isoCode",
                "ISO",
                "fipsCode",
                "stateCode",
            ],
            Self::RegionName => &[
                "regionName",
                "countryName",
                "Country",
                "state",
                "countyName",
                "cityName",
            ],
            Self::SeriesCode => &[
                "seriesCode",
                "subjectCode",
                "variable",
                "subjectCodeColumn",
                "seriesCodeColumn",
            ],
            Self::SeriesName => &[
                "seriesName",
                "subjectName",
                "subjectNameColumn",
                "seriesNameColumn",
            ],
            Self::Notes => &["seriesNotes", "notes", "subjectNotes"],
            Self::Scale => &["seriesScale", "scale", "Scale", "multiplier"],
            Self::Units => &[
                "seriesUnits",
                "units",
                "unit",
                "Unit",
                "Units",
                "seriesUnit",
                "subjectUnits",
                "subjectUnit",
            ],
            Self::Description => &["seriesDescription", "subjectDescription", "description"],
            Self::Tags => &["seriesTags", "subjectTags", "tags"],
        }
    }

    /// Roles a table may lack without failing the import.
    pub fn is_optional(self) -> bool {
        matches!(self, Self::Notes | Self::Tags)
    }

    /// Roles that may be supplied as a lookup map instead of a column.
    pub fn accepts_map(self) -> bool {
        matches!(
            self,
            Self::RegionCode
                | Self::Notes
                | Self::Scale
                | Self::Units
                | Self::Description
                | Self::Tags
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::RegionCode => "region_code",
            Self::RegionName => "region_name",
            Self::SeriesCode => "series_code",
            Self::SeriesName => "series_name",
            Self::Notes => "notes",
            Self::Scale => "scale",
            Self::Units => "units",
            Self::Description => "description",
            Self::Tags => "tags",
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

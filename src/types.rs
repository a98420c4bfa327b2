use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tabled::Tabled;

use crate::error::DashboardError;

/// One CSV record as read from disk, before any parsing.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "Specialisation")]
    pub specialisation: Option<String>,
    #[serde(rename = "Female")]
    pub female: Option<String>,
    #[serde(rename = "Male")]
    pub male: Option<String>,
    #[serde(rename = "Diverse")]
    pub diverse: Option<String>,
    #[serde(rename = "Total_headcount")]
    pub total_headcount: Option<String>,
}

/// One typed row of the data source: headcounts for a (year, specialisation)
/// cell. The source is expected to satisfy
/// `female + male + diverse == total_headcount`; the pipeline does not
/// enforce it and a violation shows up as shares that do not sum to 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub year: i32,
    pub specialisation: String,
    pub female: u64,
    pub male: u64,
    pub diverse: u64,
    pub total_headcount: u64,
}

impl Row {
    pub fn new(
        year: i32,
        specialisation: &str,
        female: u64,
        male: u64,
        diverse: u64,
        total_headcount: u64,
    ) -> Self {
        Self {
            year,
            specialisation: specialisation.to_string(),
            female,
            male,
            diverse,
            total_headcount,
        }
    }

    pub fn count(&self, gender: Gender) -> u64 {
        match gender {
            Gender::Female => self.female,
            Gender::Male => self.male,
            Gender::Diverse => self.diverse,
        }
    }
}

/// The fixed three-element gender domain. `ALL` fixes the enumeration order
/// used for melting and for chart stacking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Gender {
    Female,
    Male,
    Diverse,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Female, Gender::Male, Gender::Diverse];

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
            Gender::Diverse => "Diverse",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Flavor of the "Stacked gender counts" chart region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    BySpecialisation,
    YearSummary,
}

impl ViewMode {
    pub const ALL: [ViewMode; 2] = [ViewMode::BySpecialisation, ViewMode::YearSummary];

    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::BySpecialisation => "By specialisation",
            ViewMode::YearSummary => "Year summary",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ViewMode {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "by-specialisation" | "by specialisation" | "specialisation" => {
                Ok(ViewMode::BySpecialisation)
            }
            "year-summary" | "year summary" | "year" => Ok(ViewMode::YearSummary),
            _ => Err(DashboardError::UnknownViewMode {
                name: s.trim().to_string(),
            }),
        }
    }
}

/// A row of the filtered table with its per-gender share columns attached.
/// Shares are `None` when `total_headcount` is 0: an undefined ratio, not 0%.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedRow {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Specialisation")]
    pub specialisation: String,
    #[serde(rename = "Female")]
    pub female: u64,
    #[serde(rename = "Male")]
    pub male: u64,
    #[serde(rename = "Diverse")]
    pub diverse: u64,
    #[serde(rename = "Total_headcount")]
    pub total_headcount: u64,
    #[serde(rename = "Female_pct")]
    pub female_pct: Option<f64>,
    #[serde(rename = "Male_pct")]
    pub male_pct: Option<f64>,
    #[serde(rename = "Diverse_pct")]
    pub diverse_pct: Option<f64>,
}

impl DerivedRow {
    pub fn share(&self, gender: Gender) -> Option<f64> {
        match gender {
            Gender::Female => self.female_pct,
            Gender::Male => self.male_pct,
            Gender::Diverse => self.diverse_pct,
        }
    }
}

/// Column sums over the filtered table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SummaryTotals {
    pub total_headcount: u64,
    pub total_female: u64,
    pub total_male: u64,
    pub total_diverse: u64,
}

impl SummaryTotals {
    pub fn count(&self, gender: Gender) -> u64 {
        match gender {
            Gender::Female => self.total_female,
            Gender::Male => self.total_male,
            Gender::Diverse => self.total_diverse,
        }
    }

    pub fn share(&self, gender: Gender) -> Option<f64> {
        if self.total_headcount == 0 {
            None
        } else {
            Some(self.count(gender) as f64 / self.total_headcount as f64)
        }
    }

    pub fn female_share(&self) -> Option<f64> {
        self.share(Gender::Female)
    }

    pub fn male_share(&self) -> Option<f64> {
        self.share(Gender::Male)
    }

    pub fn diverse_share(&self) -> Option<f64> {
        self.share(Gender::Diverse)
    }
}

/// Long-form triple of the by-year aggregate: one record per (year, gender),
/// with the year's total carried so consumers can sort or normalize without
/// recomputing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearGenderCount {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Gender")]
    pub gender: Gender,
    #[serde(rename = "Count")]
    pub count: u64,
    #[serde(rename = "YearTotal")]
    pub year_total: u64,
}

/// Long-form triple of the by-specialisation aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecGenderCount {
    #[serde(rename = "Specialisation")]
    pub specialisation: String,
    #[serde(rename = "Gender")]
    pub gender: Gender,
    #[serde(rename = "Count")]
    pub count: u64,
    #[serde(rename = "GroupTotal")]
    pub group_total: u64,
}

/// Percentage-normalized variant of [`SpecGenderCount`]. `share` is `None`
/// for every gender of a specialisation whose summed total is 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecGenderShare {
    #[serde(rename = "Specialisation")]
    pub specialisation: String,
    #[serde(rename = "Gender")]
    pub gender: Gender,
    #[serde(rename = "Percentage")]
    pub share: Option<f64>,
    #[serde(rename = "GroupTotal")]
    pub group_total: u64,
}

/// Per-row melt of the filtered table, keyed by (year, specialisation):
/// feeds the faceted chart region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowGenderCount {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Specialisation")]
    pub specialisation: String,
    #[serde(rename = "Gender")]
    pub gender: Gender,
    #[serde(rename = "Count")]
    pub count: u64,
}

/// Terminal preview of one derived row. Counts arrive pre-formatted with
/// thousands separators and shares as fixed-point fractions, so the table
/// renders exactly what was computed.
#[derive(Debug, Tabled, Clone)]
pub struct RawTableRow {
    #[tabled(rename = "Year")]
    pub year: i32,
    #[tabled(rename = "Specialisation")]
    pub specialisation: String,
    #[tabled(rename = "Female")]
    pub female: String,
    #[tabled(rename = "Male")]
    pub male: String,
    #[tabled(rename = "Diverse")]
    pub diverse: String,
    #[tabled(rename = "Total_headcount")]
    pub total_headcount: String,
    #[tabled(rename = "Female_pct")]
    pub female_pct: String,
    #[tabled(rename = "Male_pct")]
    pub male_pct: String,
    #[tabled(rename = "Diverse_pct")]
    pub diverse_pct: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct YearBreakdownRow {
    #[tabled(rename = "Year")]
    pub year: i32,
    #[tabled(rename = "Gender")]
    pub gender: String,
    #[tabled(rename = "Count")]
    pub count: String,
    #[tabled(rename = "YearTotal")]
    pub year_total: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct SpecialisationBreakdownRow {
    #[tabled(rename = "Specialisation")]
    pub specialisation: String,
    #[tabled(rename = "Gender")]
    pub gender: String,
    #[tabled(rename = "Count")]
    pub count: String,
    #[tabled(rename = "GroupTotal")]
    pub group_total: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct MeltedCountRow {
    #[tabled(rename = "Year")]
    pub year: i32,
    #[tabled(rename = "Specialisation")]
    pub specialisation: String,
    #[tabled(rename = "Gender")]
    pub gender: String,
    #[tabled(rename = "Count")]
    pub count: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct SpecialisationShareRow {
    #[tabled(rename = "Specialisation")]
    pub specialisation: String,
    #[tabled(rename = "Gender")]
    pub gender: String,
    #[tabled(rename = "Percentage")]
    pub percentage: String,
    #[tabled(rename = "GroupTotal")]
    pub group_total: String,
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::QueryError;

// ---------------------------------------------------------------------------
// NumericColumn – the optional numeric columns of the panel
// ---------------------------------------------------------------------------

/// One of the optional numeric columns of the panel file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NumericColumn {
    /// Final energy consumption in thousand tonnes of oil equivalent.
    FinalConsKtoe,
    /// Consumption relative to 2012 (2012 = 100).
    Index2012,
    /// Year-over-year change in percent.
    GrowthPct,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 3] = [
        NumericColumn::FinalConsKtoe,
        NumericColumn::Index2012,
        NumericColumn::GrowthPct,
    ];

    /// Header name as it appears in the source file.
    pub fn name(self) -> &'static str {
        match self {
            NumericColumn::FinalConsKtoe => "final_cons_ktoe",
            NumericColumn::Index2012 => "index_2012",
            NumericColumn::GrowthPct => "growth_pct",
        }
    }

    /// Human-readable axis label.
    pub fn label(self) -> &'static str {
        match self {
            NumericColumn::FinalConsKtoe => "Final consumption (ktoe)",
            NumericColumn::Index2012 => "Index (2012 = 100)",
            NumericColumn::GrowthPct => "Growth (%)",
        }
    }
}

impl fmt::Display for NumericColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NumericColumn {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NumericColumn::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| QueryError::UnknownColumn(s.to_string()))
    }
}

// Stored in config files by header name.
impl Serialize for NumericColumn {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for NumericColumn {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.trim().parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the panel
// ---------------------------------------------------------------------------

/// One `(country, year)` observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Trimmed, never empty.
    pub country: String,
    pub year: i32,
    pub final_cons_ktoe: Option<f64>,
    pub index_2012: Option<f64>,
    pub growth_pct: Option<f64>,
}

impl Record {
    /// Value of a numeric column, `None` when the cell was null.
    pub fn value(&self, column: NumericColumn) -> Option<f64> {
        match column {
            NumericColumn::FinalConsKtoe => self.final_cons_ktoe,
            NumericColumn::Index2012 => self.index_2012,
            NumericColumn::GrowthPct => self.growth_pct,
        }
    }
}

// ---------------------------------------------------------------------------
// Relation – the complete loaded panel
// ---------------------------------------------------------------------------

/// Ordered rows of the panel. `(country, year)` is the intended key but
/// duplicates are kept as they appear in the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Relation {
    pub records: Vec<Record>,
}

impl Relation {
    pub fn new(records: Vec<Record>) -> Self {
        Relation { records }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the relation has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Smallest and largest year present, `None` for an empty relation.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        self.records.iter().fold(None, |acc, r| match acc {
            None => Some((r.year, r.year)),
            Some((lo, hi)) => Some((lo.min(r.year), hi.max(r.year))),
        })
    }
}

impl FromIterator<Record> for Relation {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Relation::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Relation {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

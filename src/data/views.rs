use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::error::QueryError;
use super::filter::FilterState;
use super::model::{NumericColumn, Record, Relation};
use super::query::{drop_nulls_in, series_by_country, snapshot_by_year, top_n_by_year};

/// Which numeric column each chart reads. Set from the config file by
/// header name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartColumns {
    pub trend: NumericColumn,
    pub ranking: NumericColumn,
    pub map: NumericColumn,
    pub scatter_x: NumericColumn,
    pub scatter_y: NumericColumn,
}

impl Default for ChartColumns {
    fn default() -> Self {
        Self {
            trend: NumericColumn::Index2012,
            ranking: NumericColumn::FinalConsKtoe,
            map: NumericColumn::Index2012,
            scatter_x: NumericColumn::Index2012,
            scatter_y: NumericColumn::GrowthPct,
        }
    }
}

/// Every sub-table the dashboard renders, derived in one pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardViews {
    /// Year range, aggregate and country filters applied. Backs the trend
    /// chart and the raw-data table.
    pub filtered: Relation,
    /// Choices for the country selection control.
    pub country_options: BTreeSet<String>,
    pub trend: BTreeMap<String, Vec<[f64; 2]>>,
    pub top_n: Vec<Record>,
    pub map: Relation,
    pub scatter: Relation,
}

/// Derive all views from the loaded relation and the current controls.
///
/// The ranking, map and scatter views read the whole relation for their own
/// pick year; only the trend chart and raw table honour the year range and
/// country selection.
pub fn derive_views(
    rel: &Relation,
    filters: &FilterState,
    sentinel: &str,
) -> Result<DashboardViews, QueryError> {
    let columns = filters.columns;
    let filtered = filters.apply(rel, sentinel)?;
    let country_options = filters.country_options(rel, sentinel)?;
    let trend = series_by_country(&filtered, columns.trend);

    let top_n = top_n_by_year(rel, filters.top_year, columns.ranking, filters.top_n, sentinel);
    let map = snapshot_by_year(rel, filters.map_year, sentinel);
    let scatter = drop_nulls_in(
        &snapshot_by_year(rel, filters.scatter_year, sentinel),
        &[columns.scatter_y, columns.scatter_x],
    );

    Ok(DashboardViews {
        filtered,
        country_options,
        trend,
        top_n,
        map,
        scatter,
    })
}

use std::collections::BTreeSet;

use crate::config::DashboardConfig;

use super::error::QueryError;
use super::model::Relation;
use super::query::{distinct_countries, exclude_aggregate, filter_countries, filter_year_range};
use super::views::ChartColumns;

// ---------------------------------------------------------------------------
// Filter state: what the controls currently select
// ---------------------------------------------------------------------------

/// Per-session control values. An empty `countries` set means "no country
/// filter" (show all), not "show nothing".
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    /// Inclusive `(start, end)`, kept with `start <= end`.
    pub year_range: (i32, i32),
    pub countries: BTreeSet<String>,
    pub show_raw: bool,
    /// Year of the ranking chart.
    pub top_year: i32,
    /// Year of the map view.
    pub map_year: i32,
    /// Year of the scatter view.
    pub scatter_year: i32,
    pub top_n: usize,
    /// Numeric column behind each chart.
    pub columns: ChartColumns,
}

impl FilterState {
    /// Initial selection for a freshly loaded relation.
    pub fn init(rel: &Relation, config: &DashboardConfig) -> Self {
        let (pref_start, pref_end) = ordered(config.preferred_year_range);
        let bounds = rel.year_bounds().unwrap_or((pref_start, pref_end));
        let year_range = (pref_start.max(bounds.0), pref_end.min(bounds.1));

        let mut state = FilterState {
            year_range,
            countries: BTreeSet::new(),
            show_raw: false,
            top_year: year_range.1,
            map_year: year_range.1,
            scatter_year: year_range.1,
            top_n: config.top_n,
            columns: config.chart_columns,
        };
        state.clamp(bounds);
        state.top_year = state.year_range.1;
        state.map_year = state.year_range.1;
        state.scatter_year = state.year_range.1;

        let available = state
            .country_options(rel, &config.aggregate_sentinel)
            .unwrap_or_default();
        state.countries = config
            .default_countries
            .iter()
            .filter(|c| available.contains(*c))
            .cloned()
            .collect();
        state
    }

    /// Keep the year range inside `bounds` with `start <= end`, and every
    /// pick year inside the year range. Reversed bounds are read as
    /// `(min, max)`.
    pub fn clamp(&mut self, bounds: (i32, i32)) {
        let (lo, hi) = ordered(bounds);
        let start = self.year_range.0.clamp(lo, hi);
        let end = self.year_range.1.clamp(lo, hi).max(start);
        self.year_range = (start, end);

        for year in [&mut self.top_year, &mut self.map_year, &mut self.scatter_year] {
            *year = (*year).clamp(start, end);
        }
    }

    /// Move the year range and re-clamp the pick years.
    pub fn set_year_range(&mut self, start: i32, end: i32, bounds: (i32, i32)) {
        self.year_range = (start, end.max(start));
        self.clamp(bounds);
    }

    /// Toggle a single country in the selection.
    pub fn toggle_country(&mut self, country: &str) {
        if !self.countries.remove(country) {
            self.countries.insert(country.to_string());
        }
    }

    /// Drop selected countries that are no longer offered.
    pub fn retain_available(&mut self, available: &BTreeSet<String>) {
        self.countries.retain(|c| available.contains(c));
    }

    /// Countries offered by the selection control: those present in the
    /// year range, aggregate excluded.
    pub fn country_options(
        &self,
        rel: &Relation,
        sentinel: &str,
    ) -> Result<BTreeSet<String>, QueryError> {
        let in_range = filter_year_range(rel, self.year_range.0, self.year_range.1)?;
        Ok(distinct_countries(&exclude_aggregate(&in_range, sentinel)))
    }

    /// Year range, then aggregate removal, then country selection.
    pub fn apply(&self, rel: &Relation, sentinel: &str) -> Result<Relation, QueryError> {
        let in_range = filter_year_range(rel, self.year_range.0, self.year_range.1)?;
        let countries_only = exclude_aggregate(&in_range, sentinel);
        Ok(filter_countries(&countries_only, &self.countries))
    }
}

fn ordered((a, b): (i32, i32)) -> (i32, i32) {
    (a.min(b), a.max(b))
}

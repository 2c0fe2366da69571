use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use super::error::QueryError;
use super::model::{NumericColumn, Record, Relation};

// ---------------------------------------------------------------------------
// Row filters – each returns a fresh relation, the input is never touched
// ---------------------------------------------------------------------------

/// Keep rows with `start <= year <= end`. An inverted range is rejected.
pub fn filter_year_range(rel: &Relation, start: i32, end: i32) -> Result<Relation, QueryError> {
    if start > end {
        return Err(QueryError::InvertedYearRange { start, end });
    }
    Ok(rel
        .iter()
        .filter(|r| (start..=end).contains(&r.year))
        .cloned()
        .collect())
}

/// Drop the rows of the aggregate pseudo-country.
pub fn exclude_aggregate(rel: &Relation, sentinel: &str) -> Relation {
    rel.iter()
        .filter(|r| r.country != sentinel)
        .cloned()
        .collect()
}

/// Keep rows whose country is selected. An empty selection means no filter.
pub fn filter_countries(rel: &Relation, countries: &BTreeSet<String>) -> Relation {
    if countries.is_empty() {
        return rel.clone();
    }
    rel.iter()
        .filter(|r| countries.contains(&r.country))
        .cloned()
        .collect()
}

/// Sorted unique country names.
pub fn distinct_countries(rel: &Relation) -> BTreeSet<String> {
    rel.iter().map(|r| r.country.clone()).collect()
}

/// Rows of one year without the aggregate; feeds the map and scatter views.
pub fn snapshot_by_year(rel: &Relation, year: i32, sentinel: &str) -> Relation {
    rel.iter()
        .filter(|r| r.year == year && r.country != sentinel)
        .cloned()
        .collect()
}

/// Remove rows where any of `columns` is null.
pub fn drop_nulls_in(rel: &Relation, columns: &[NumericColumn]) -> Relation {
    rel.iter()
        .filter(|r| columns.iter().all(|&c| r.value(c).is_some()))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Rankings and series
// ---------------------------------------------------------------------------

/// The `n` largest rows of `column` in `year`, aggregate excluded.
///
/// Nulls sort last. The sort is stable, so ties keep file order.
pub fn top_n_by_year(
    rel: &Relation,
    year: i32,
    column: NumericColumn,
    n: usize,
    sentinel: &str,
) -> Vec<Record> {
    let mut rows = snapshot_by_year(rel, year, sentinel).records;
    rows.sort_by(|a, b| descending_nulls_last(a.value(column), b.value(column)));
    rows.truncate(n);
    rows
}

fn descending_nulls_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// `[year, value]` points per country in row order; null values are skipped.
pub fn series_by_country(
    rel: &Relation,
    column: NumericColumn,
) -> BTreeMap<String, Vec<[f64; 2]>> {
    let mut series: BTreeMap<String, Vec<[f64; 2]>> = BTreeMap::new();
    for r in rel {
        if let Some(v) = r.value(column) {
            series
                .entry(r.country.clone())
                .or_default()
                .push([r.year as f64, v]);
        }
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;

    const EU: &str = "EU";

    fn rec(
        country: &str,
        year: i32,
        cons: Option<f64>,
        index: Option<f64>,
        growth: Option<f64>,
    ) -> Record {
        Record {
            country: country.to_string(),
            year,
            final_cons_ktoe: cons,
            index_2012: index,
            growth_pct: growth,
        }
    }

    fn ireland_scenario() -> Relation {
        Relation::new(vec![
            rec("Ireland", 2012, Some(1000.0), Some(100.0), None),
            rec("Ireland", 2013, Some(1050.0), Some(105.0), Some(5.0)),
            rec(EU, 2013, Some(99999.0), Some(100.0), Some(0.0)),
        ])
    }

    fn panel() -> Relation {
        Relation::new(vec![
            rec("Ireland", 2012, Some(1000.0), Some(100.0), None),
            rec("France", 2012, Some(9000.0), Some(100.0), None),
            rec("Spain", 2012, None, Some(100.0), None),
            rec("Ireland", 2013, Some(1050.0), Some(105.0), Some(5.0)),
            rec("France", 2013, Some(8800.0), None, Some(-2.2)),
            rec("Spain", 2013, Some(8800.0), Some(97.0), Some(-3.0)),
            rec("Malta", 2013, None, Some(101.0), Some(1.0)),
            rec(EU, 2013, Some(99999.0), Some(100.0), Some(0.0)),
            rec("Ireland", 2014, Some(1100.0), Some(110.0), Some(4.8)),
        ])
    }

    #[test]
    fn year_range_is_inclusive() {
        let rel = filter_year_range(&panel(), 2013, 2014).unwrap();
        assert_eq!(rel.len(), 6);
        assert!(rel.iter().all(|r| (2013..=2014).contains(&r.year)));
    }

    #[test]
    fn full_year_range_is_identity() {
        let rel = panel();
        let (lo, hi) = rel.year_bounds().unwrap();
        assert_eq!(filter_year_range(&rel, lo, hi).unwrap(), rel);
    }

    #[test]
    fn inverted_year_range_is_rejected() {
        assert_eq!(
            filter_year_range(&panel(), 2014, 2012),
            Err(QueryError::InvertedYearRange {
                start: 2014,
                end: 2012
            })
        );
    }

    #[test]
    fn empty_year_yields_empty_relation() {
        assert!(filter_year_range(&panel(), 1990, 1995).unwrap().is_empty());
        assert!(snapshot_by_year(&panel(), 1990, EU).is_empty());
    }

    #[test]
    fn exclude_aggregate_is_idempotent() {
        let once = exclude_aggregate(&panel(), EU);
        let twice = exclude_aggregate(&once, EU);
        assert_eq!(once, twice);
        assert!(once.iter().all(|r| r.country != EU));
        assert_eq!(once.len(), panel().len() - 1);
    }

    #[test]
    fn empty_country_selection_is_identity() {
        let rel = panel();
        assert_eq!(filter_countries(&rel, &BTreeSet::new()), rel);
    }

    #[test]
    fn country_selection_filters_rows() {
        let selected: BTreeSet<String> = ["Spain".to_string()].into();
        let rel = filter_countries(&panel(), &selected);
        assert_eq!(rel.len(), 2);
        assert!(rel.iter().all(|r| r.country == "Spain"));

        let nobody: BTreeSet<String> = ["Atlantis".to_string()].into();
        assert!(filter_countries(&panel(), &nobody).is_empty());
    }

    #[test]
    fn distinct_countries_are_sorted() {
        let names: Vec<String> = distinct_countries(&panel()).into_iter().collect();
        assert_eq!(names, vec!["EU", "France", "Ireland", "Malta", "Spain"]);
    }

    #[test]
    fn snapshot_scenario() {
        let snap = snapshot_by_year(&ireland_scenario(), 2013, EU);
        assert_eq!(
            snap.records,
            vec![rec("Ireland", 2013, Some(1050.0), Some(105.0), Some(5.0))]
        );
    }

    #[test]
    fn top_one_scenario() {
        let top = top_n_by_year(&ireland_scenario(), 2013, NumericColumn::FinalConsKtoe, 1, EU);
        assert_eq!(
            top,
            vec![rec("Ireland", 2013, Some(1050.0), Some(105.0), Some(5.0))]
        );
    }

    #[test]
    fn top_n_orders_descending_nulls_last_and_stable() {
        let top = top_n_by_year(&panel(), 2013, NumericColumn::FinalConsKtoe, 10, EU);
        let names: Vec<&str> = top.iter().map(|r| r.country.as_str()).collect();
        // France and Spain tie at 8800; file order decides.
        assert_eq!(names, vec!["France", "Spain", "Ireland", "Malta"]);

        let values: Vec<Option<f64>> = top.iter().map(|r| r.final_cons_ktoe).collect();
        for pair in values.windows(2) {
            match (pair[0], pair[1]) {
                (Some(a), Some(b)) => assert!(a >= b),
                (None, Some(_)) => panic!("null sorted before a value"),
                _ => {}
            }
        }
    }

    #[test]
    fn top_n_never_exceeds_n() {
        for n in 0..6 {
            let top = top_n_by_year(&panel(), 2013, NumericColumn::Index2012, n, EU);
            assert!(top.len() <= n);
        }
    }

    #[test]
    fn drop_nulls_removes_incomplete_rows() {
        let snap = snapshot_by_year(&panel(), 2013, EU);
        let plotted = drop_nulls_in(
            &snap,
            &[NumericColumn::GrowthPct, NumericColumn::Index2012],
        );
        let names: Vec<&str> = plotted.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(names, vec!["Ireland", "Spain", "Malta"]);
    }

    #[test]
    fn series_skip_null_values() {
        let series = series_by_country(&panel(), NumericColumn::Index2012);
        assert_eq!(
            series["Ireland"],
            vec![[2012.0, 100.0], [2013.0, 105.0], [2014.0, 110.0]]
        );
        assert_eq!(series["France"], vec![[2012.0, 100.0]]);
    }
}

use std::collections::BTreeSet;
use std::io::Write;

use energy_panel::config::DashboardConfig;
use energy_panel::data::filter::FilterState;
use energy_panel::data::loader;
use energy_panel::data::model::{NumericColumn, Record};
use energy_panel::data::query::{exclude_aggregate, filter_countries, snapshot_by_year, top_n_by_year};
use energy_panel::data::views::derive_views;

const EU: &str = "European Union - 27 countries (from 2020)";

fn write_panel(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn ireland_2013() -> Record {
    Record {
        country: "Ireland".to_string(),
        year: 2013,
        final_cons_ktoe: Some(1050.0),
        index_2012: Some(105.0),
        growth_pct: Some(5.0),
    }
}

#[test]
fn scenario_rows_survive_loading_and_queries() {
    let file = write_panel(&format!(
        "country,year,final_cons_ktoe,index_2012,growth_pct,source\n\
         Ireland,2012,1000,100.0,,eurostat\n\
         Ireland,2013,1050,105.0,5.0,eurostat\n\
         {EU},2013,99999,100.0,0.0,eurostat\n\
         Ireland,not_a_year,1,1,1,eurostat\n\
         France,2013,N/A,98.0,-2.0,eurostat\n"
    ));

    let rel = loader::load(file.path()).unwrap();
    assert_eq!(rel.len(), 4);
    assert!(rel
        .iter()
        .all(|r| !r.country.is_empty() && r.country == r.country.trim()));

    let france = rel.iter().find(|r| r.country == "France").unwrap();
    assert_eq!(france.final_cons_ktoe, None);
    assert_eq!(france.index_2012, Some(98.0));

    let snapshot = snapshot_by_year(&rel, 2013, EU);
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.records[0], ireland_2013());

    let top = top_n_by_year(&rel, 2013, NumericColumn::FinalConsKtoe, 1, EU);
    assert_eq!(top, vec![ireland_2013()]);

    // France's null consumption sorts after Ireland.
    let top = top_n_by_year(&rel, 2013, NumericColumn::FinalConsKtoe, 5, EU);
    let names: Vec<&str> = top.iter().map(|r| r.country.as_str()).collect();
    assert_eq!(names, vec!["Ireland", "France"]);

    let once = exclude_aggregate(&rel, EU);
    assert_eq!(exclude_aggregate(&once, EU), once);
    assert_eq!(filter_countries(&rel, &BTreeSet::new()), rel);
}

#[test]
fn default_dashboard_views_from_file() {
    let file = write_panel(&format!(
        "country,year,final_cons_ktoe,index_2012,growth_pct\n\
         Ireland,2012,1000,100.0,\n\
         Ireland,2013,1050,105.0,5.0\n\
         Spain,2012,80000,100.0,\n\
         Spain,2013,79000,98.75,-1.25\n\
         {EU},2012,99999,100.0,\n\
         {EU},2013,99000,99.0,-1.0\n"
    ));
    let rel = loader::load(file.path()).unwrap();
    let config = DashboardConfig::default();

    let filters = FilterState::init(&rel, &config);
    assert_eq!(filters.year_range, (2012, 2013));
    assert_eq!(filters.countries, BTreeSet::from(["Ireland".to_string()]));

    let views = derive_views(&rel, &filters, &config.aggregate_sentinel).unwrap();
    assert_eq!(views.filtered.len(), 2);
    assert_eq!(
        views.country_options,
        BTreeSet::from(["Ireland".to_string(), "Spain".to_string()])
    );
    assert_eq!(views.top_n[0].country, "Spain");
    assert_eq!(views.map.len(), 2);
    assert_eq!(views.scatter.len(), 2);
    assert_eq!(views.trend["Ireland"], vec![[2012.0, 100.0], [2013.0, 105.0]]);
}

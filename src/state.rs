use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::cache::DatasetCache;
use crate::data::error::LoadError;
use crate::data::filter::FilterState;
use crate::data::model::Relation;
use crate::data::query::distinct_countries;
use crate::data::views::{derive_views, DashboardViews};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Dashboard tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    Map,
    Change,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded relations, reused across File → Open of the same file.
    cache: DatasetCache,

    /// Active dataset and the file it came from.
    pub dataset: Arc<Relation>,
    pub source: PathBuf,

    /// Current control values.
    pub filters: FilterState,

    /// Sub-tables derived from `dataset` and `filters` (cached).
    pub views: DashboardViews,

    /// Colour per country, stable across filter changes.
    pub color_map: ColorMap,

    pub tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Load the configured dataset. Fails when it cannot be loaded, so the
    /// dashboard never starts without data.
    pub fn open(config: DashboardConfig) -> Result<Self, LoadError> {
        let mut cache = DatasetCache::new();
        let source = config.data_path.clone();
        let dataset = cache.get_or_load(&source)?;

        let filters = FilterState::init(&dataset, &config);
        let mut state = Self {
            color_map: ColorMap::new(&distinct_countries(&dataset)),
            config,
            cache,
            dataset,
            source,
            filters,
            views: DashboardViews::default(),
            tab: Tab::default(),
            status_message: None,
        };
        state.refresh();
        Ok(state)
    }

    /// Swap in a newly loaded dataset and reset the controls.
    pub fn set_dataset(&mut self, dataset: Arc<Relation>, source: PathBuf) {
        self.filters = FilterState::init(&dataset, &self.config);
        self.color_map = ColorMap::new(&distinct_countries(&dataset));
        self.dataset = dataset;
        self.source = source;
        self.status_message = None;
        self.refresh();
    }

    /// Load `path` through the cache. On failure the current dataset stays.
    pub fn load_path(&mut self, path: &Path) {
        match self.cache.get_or_load(path) {
            Ok(dataset) => {
                log::info!("Showing {} rows from {}", dataset.len(), path.display());
                self.set_dataset(dataset, path.to_path_buf());
            }
            Err(e) => {
                log::error!("Failed to load file: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Drop the cached copy of the current file and load it again.
    pub fn reload(&mut self) {
        let source = self.source.clone();
        self.cache.invalidate(&source);
        self.load_path(&source);
    }

    /// Observed year bounds of the dataset.
    pub fn year_bounds(&self) -> (i32, i32) {
        self.dataset
            .year_bounds()
            .unwrap_or(self.config.preferred_year_range)
    }

    /// Recompute `views` after any control change.
    pub fn refresh(&mut self) {
        let bounds = self.year_bounds();
        self.filters.clamp(bounds);

        let sentinel = &self.config.aggregate_sentinel;
        let derived = self
            .filters
            .country_options(&self.dataset, sentinel)
            .and_then(|options| {
                self.filters.retain_available(&options);
                derive_views(&self.dataset, &self.filters, sentinel)
            });

        match derived {
            Ok(views) => self.views = views,
            Err(e) => {
                log::error!("Failed to derive views: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    pub fn set_year_range(&mut self, start: i32, end: i32) {
        let bounds = self.year_bounds();
        self.filters.set_year_range(start, end, bounds);
        self.refresh();
    }

    /// Toggle a single country in the selection.
    pub fn toggle_country(&mut self, country: &str) {
        self.filters.toggle_country(country);
        self.refresh();
    }

    /// Clear the country selection, which shows every country.
    pub fn select_all_countries(&mut self) {
        self.filters.countries.clear();
        self.refresh();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::io::Write;

    use super::*;

    const PANEL: &str = "country,year,final_cons_ktoe,index_2012,growth_pct\n\
        Ireland,2012,1000,100,\n\
        Ireland,2013,1050,105,5\n\
        France,2012,9000,100,\n\
        France,2013,8800,97.8,-2.2\n\
        European Union - 27 countries (from 2020),2013,99999,100,0\n";

    fn panel_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn open(file: &tempfile::NamedTempFile) -> AppState {
        AppState::open(DashboardConfig {
            data_path: file.path().to_path_buf(),
            ..DashboardConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn open_fails_without_dataset() {
        let err = AppState::open(DashboardConfig {
            data_path: PathBuf::from("/nonexistent/panel.csv"),
            ..DashboardConfig::default()
        });
        assert!(matches!(err, Err(LoadError::FileAccess { .. })));
    }

    #[test]
    fn open_derives_initial_views() {
        let file = panel_file(PANEL);
        let state = open(&file);
        assert_eq!(state.filters.year_range, (2012, 2013));
        assert!(state.views.filtered.iter().all(|r| r.country == "Ireland"));
        assert_eq!(state.views.top_n.len(), 2);
        assert_eq!(state.views.country_options.len(), 2);
    }

    #[test]
    fn toggling_countries_refreshes_views() {
        let file = panel_file(PANEL);
        let mut state = open(&file);

        state.toggle_country("France");
        assert_eq!(state.views.filtered.len(), 4);

        state.select_all_countries();
        assert!(state.filters.countries.is_empty());
        assert_eq!(state.views.filtered.len(), 4);

        state.toggle_country("France");
        assert_eq!(state.views.filtered.len(), 2);
    }

    #[test]
    fn narrowing_years_drops_unavailable_countries() {
        let file = panel_file(
            "country,year\nIreland,2012\nIreland,2013\nMalta,2013\n",
        );
        let mut state = open(&file);
        state.toggle_country("Malta");
        state.set_year_range(2012, 2012);
        assert_eq!(
            state.filters.countries,
            BTreeSet::from(["Ireland".to_string()])
        );
    }

    #[test]
    fn failed_load_keeps_current_dataset() {
        let file = panel_file(PANEL);
        let mut state = open(&file);
        let before = Arc::clone(&state.dataset);

        state.load_path(Path::new("/nonexistent/other.csv"));
        assert!(Arc::ptr_eq(&before, &state.dataset));
        assert!(state.status_message.is_some());
    }

    #[test]
    fn header_only_file_with_reversed_preferred_range() {
        let file = panel_file("country,year\n");
        let mut state = AppState::open(DashboardConfig {
            data_path: file.path().to_path_buf(),
            preferred_year_range: (2023, 2012),
            ..DashboardConfig::default()
        })
        .unwrap();
        assert!(state.dataset.is_empty());
        assert_eq!(state.filters.year_range, (2012, 2023));

        state.set_year_range(2020, 2015);
        assert!(state.views.filtered.is_empty());
        assert!(state.status_message.is_none());
    }
}

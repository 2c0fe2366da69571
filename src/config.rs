use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::views::ChartColumns;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "ENERGY_PANEL_CONFIG";
/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "energy-panel.json";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Startup settings. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Panel file loaded at startup.
    pub data_path: PathBuf,
    /// Country value holding the EU-wide aggregate.
    pub aggregate_sentinel: String,
    /// Countries pre-selected when present in the data.
    pub default_countries: Vec<String>,
    /// Initial year range, narrowed to the years actually present.
    pub preferred_year_range: (i32, i32),
    /// Rows shown in the ranking chart.
    pub top_n: usize,
    /// Numeric column per chart, by header name.
    pub chart_columns: ChartColumns,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("final_panel_features.csv"),
            aggregate_sentinel: "European Union - 27 countries (from 2020)".to_string(),
            default_countries: vec!["Ireland".to_string()],
            preferred_year_range: (2012, 2023),
            top_n: 10,
            chart_columns: ChartColumns::default(),
        }
    }
}

impl DashboardConfig {
    /// Parse and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Reject values the dashboard cannot start from.
    pub fn validate(&self) -> Result<()> {
        let (start, end) = self.preferred_year_range;
        if start > end {
            bail!("preferred_year_range starts after it ends ({start} > {end})");
        }
        Ok(())
    }

    /// Resolve the config: `$ENERGY_PANEL_CONFIG`, then `energy-panel.json`
    /// in the working directory, then built-in defaults.
    pub fn resolve() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::from_file(Path::new(&path));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::from_file(local);
        }
        log::debug!("no config file found, using defaults");
        Ok(Self::default())
    }
}

//! Data layer: core types, loading, caching, querying.
//!
//! Architecture:
//! ```text
//!  .csv / .tsv / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse + coerce → Relation   (cache: one Arc per file)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ Relation  │  Vec<Record>, read-only for the session
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐     ┌──────────┐
//!   │  filter   │ ──▶ │  views    │  FilterState → DashboardViews
//!   └──────────┘     └──────────┘
//!        ▲                 │
//!        └──── query ──────┘  pure row filters, rankings, series
//! ```

pub mod cache;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod query;
pub mod views;

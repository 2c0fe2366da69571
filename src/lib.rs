//! Energy consumption dashboard for Ireland and selected EU countries.
//!
//! The [`data`] layer loads a cleaned country/year panel and derives the
//! tables each chart needs; [`app`] and [`ui`] draw them with egui.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;

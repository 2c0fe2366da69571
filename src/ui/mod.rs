//! egui rendering of the dashboard. Everything here reads `AppState` and
//! reports control changes back through its setters.

pub mod panels;
pub mod plot;
pub mod table;

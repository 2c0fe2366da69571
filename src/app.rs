use eframe::egui;

use crate::state::{AppState, Tab};
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct EnergyPanelApp {
    pub state: AppState,
}

impl EnergyPanelApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for EnergyPanelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: controls ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: raw data preview ----
        if self.state.filters.show_raw {
            egui::TopBottomPanel::bottom("raw_data")
                .resizable(true)
                .default_height(220.0)
                .show(ctx, |ui| {
                    ui.strong("Filtered data preview");
                    table::raw_table(ui, &self.state.views.filtered);
                });
        }

        // ---- Central panel: tabs ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::tab_bar(ui, &mut self.state);
            ui.separator();
            match self.state.tab {
                Tab::Overview => {
                    ui.columns(2, |columns| {
                        plot::trend_chart(&mut columns[0], &self.state);
                        plot::ranking_chart(&mut columns[1], &mut self.state);
                    });
                }
                Tab::Map => plot::map_view(ui, &mut self.state),
                Tab::Change => plot::scatter_chart(ui, &mut self.state),
            }
        });
    }
}

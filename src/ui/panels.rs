use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Left side panel – control widgets
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.separator();

    // ---- Year range ----
    ui.strong("Year range");
    let (lo, hi) = state.year_bounds();
    let (mut start, mut end) = state.filters.year_range;
    let from = ui.add(egui::Slider::new(&mut start, lo..=hi).text("from"));
    let to = ui.add(egui::Slider::new(&mut end, lo..=hi).text("to"));
    if from.changed() || to.changed() {
        // Dragging one handle past the other moves both.
        if from.changed() && start > end {
            end = start;
        } else if to.changed() && end < start {
            start = end;
        }
        state.set_year_range(start, end);
    }
    ui.separator();

    // ---- Country selection ----
    let options = state.views.country_options.clone();
    let n_selected = state.filters.countries.len();
    let header_text = if n_selected == 0 {
        format!("Countries  (all {})", options.len())
    } else {
        format!("Countries  ({n_selected}/{})", options.len())
    };

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt("countries")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            if ui
                .small_button("All")
                .on_hover_text("Clear the selection and show every country")
                .clicked()
            {
                state.select_all_countries();
            }

            ScrollArea::vertical()
                .max_height(360.0)
                .auto_shrink([false, true])
                .show(ui, |ui: &mut Ui| {
                    for country in &options {
                        let mut checked = state.filters.countries.contains(country);
                        let text = RichText::new(country).color(state.color_map.color_for(country));
                        if ui.checkbox(&mut checked, text).changed() {
                            state.toggle_country(country);
                        }
                    }
                });
        });
    ui.separator();

    ui.checkbox(&mut state.filters.show_raw, "Show raw data");
}

// ---------------------------------------------------------------------------
// Tab selector
// ---------------------------------------------------------------------------

pub fn tab_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut state.tab, Tab::Overview, "Overview");
        ui.selectable_value(&mut state.tab, Tab::Map, "Europe map");
        ui.selectable_value(&mut state.tab, Tab::Change, "Change");
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{}: {} rows loaded, {} shown",
            state
                .source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            state.dataset.len(),
            state.views.filtered.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open energy panel")
        .add_filter("Supported files", &["csv", "tsv", "parquet", "pq"])
        .add_filter("CSV", &["csv", "tsv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

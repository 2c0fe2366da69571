use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::{NumericColumn, Relation};

const ROW_HEIGHT: f32 = 18.0;

fn cell(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_default()
}

/// Scrollable preview of the filtered rows.
pub fn raw_table(ui: &mut Ui, rel: &Relation) {
    if rel.is_empty() {
        ui.label("No rows match the current filters.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(180.0))
        .column(Column::auto().at_least(60.0))
        .columns(Column::auto().at_least(110.0), NumericColumn::ALL.len())
        .header(ROW_HEIGHT + 2.0, |mut header| {
            header.col(|ui| {
                ui.strong("country");
            });
            header.col(|ui| {
                ui.strong("year");
            });
            for column in NumericColumn::ALL {
                header.col(|ui| {
                    ui.strong(column.name());
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, rel.len(), |mut row| {
                let record = &rel.records[row.index()];
                row.col(|ui| {
                    ui.label(record.country.as_str());
                });
                row.col(|ui| {
                    ui.label(record.year.to_string());
                });
                for column in NumericColumn::ALL {
                    row.col(|ui| {
                        ui.label(cell(record.value(column)));
                    });
                }
            });
        });
}

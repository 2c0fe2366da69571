use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points};

use crate::color::{contrasting_text, SequentialScale};
use crate::data::views::ChartColumns;
use crate::state::AppState;

const CHART_HEIGHT: f32 = 420.0;

fn placeholder(ui: &mut Ui, message: &str) {
    ui.add_space(CHART_HEIGHT / 3.0);
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(message).italics().weak());
    });
}

/// Slider for a per-view year, limited to the selected year range.
/// Refreshes the views when moved.
fn pick_year(ui: &mut Ui, state: &mut AppState, label: &str, select: fn(&mut AppState) -> &mut i32) {
    let (start, end) = state.filters.year_range;
    let changed = ui
        .add(egui::Slider::new(select(state), start..=end).text(label))
        .changed();
    if changed {
        state.refresh();
    }
}

// ---------------------------------------------------------------------------
// Overview: trend line chart
// ---------------------------------------------------------------------------

/// The trend column over time, one line per country.
pub fn trend_chart(ui: &mut Ui, state: &AppState) {
    let column = state.filters.columns.trend;
    ui.heading(format!("Trend: {}", column.label()));

    if state.views.trend.is_empty() {
        placeholder(ui, "No data for the current selection");
        return;
    }

    Plot::new("trend_plot")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label(column.label())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (country, points) in &state.views.trend {
                let color = state.color_map.color_for(country);

                let line = Line::new(PlotPoints::from(points.clone()))
                    .name(country)
                    .color(color)
                    .width(2.0);
                plot_ui.line(line);

                let markers = Points::new(PlotPoints::from(points.clone()))
                    .name(country)
                    .color(color)
                    .radius(3.0);
                plot_ui.points(markers);
            }
        });
}

// ---------------------------------------------------------------------------
// Overview: top-N bar chart
// ---------------------------------------------------------------------------

/// Largest consumers in the picked year, biggest on top.
pub fn ranking_chart(ui: &mut Ui, state: &mut AppState) {
    ui.heading(format!("Top {} in selected year", state.filters.top_n));
    pick_year(ui, state, "Pick a year", |s| &mut s.filters.top_year);

    let column = state.filters.columns.ranking;
    let rows = &state.views.top_n;
    if rows.is_empty() {
        placeholder(ui, "No countries reported for this year");
        return;
    }

    // Row i sits at y = n - 1 - i so the largest bar is drawn at the top.
    let n = rows.len();
    let labels: Vec<String> = rows.iter().rev().map(|r| r.country.clone()).collect();

    Plot::new("ranking_plot")
        .height(CHART_HEIGHT)
        .x_axis_label(column.label())
        .y_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .show_grid([true, false])
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, row) in rows.iter().enumerate() {
                let color = state.color_map.color_for(&row.country);
                let value = row.value(column).unwrap_or(0.0);
                let bar = Bar::new((n - 1 - i) as f64, value)
                    .name(&row.country)
                    .fill(color)
                    .width(0.7);
                let chart = BarChart::new(vec![bar])
                    .horizontal()
                    .color(color)
                    .name(&row.country);
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Europe map: country tiles on a sequential scale
// ---------------------------------------------------------------------------

/// Countries of the picked year coloured by the map column.
pub fn map_view(ui: &mut Ui, state: &mut AppState) {
    let column = state.filters.columns.map;
    ui.heading(format!("Europe map: {}", column.label()));
    pick_year(ui, state, "Map year", |s| &mut s.filters.map_year);

    let rows = &state.views.map;
    if rows.is_empty() {
        placeholder(ui, "No countries reported for this year");
        return;
    }

    let scale = SequentialScale::spanning(rows.iter().filter_map(|r| r.value(column)));

    ui.add_space(8.0);
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);
        for row in rows {
            let value = row.value(column);
            let fill = match (value, scale) {
                (Some(v), Some(scale)) => scale.color_at(v),
                _ => Color32::DARK_GRAY,
            };
            let hover = match value {
                Some(v) => format!("{}: {v:.1}", row.country),
                None => format!("{}: no data", row.country),
            };
            ui.label(
                RichText::new(format!(" {} ", row.country))
                    .size(15.0)
                    .background_color(fill)
                    .color(contrasting_text(fill)),
            )
            .on_hover_text(hover);
        }
    });

    if let Some(scale) = scale {
        ui.add_space(12.0);
        ui.horizontal(|ui: &mut Ui| {
            ui.spacing_mut().item_spacing.x = 0.0;
            ui.label(format!("{:.1}  ", scale.min));
            for step in 0..=20 {
                let t = step as f64 / 20.0;
                let color = scale.color_at(scale.min + t * (scale.max - scale.min));
                ui.label(RichText::new("  ").background_color(color));
            }
            ui.label(format!("  {:.1}", scale.max));
        });
    }
}

// ---------------------------------------------------------------------------
// Change: index vs growth scatter
// ---------------------------------------------------------------------------

/// Two numeric columns against each other for the picked year.
pub fn scatter_chart(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Change view");
    pick_year(ui, state, "Scatter year", |s| &mut s.filters.scatter_year);

    let rows = &state.views.scatter;
    if rows.is_empty() {
        placeholder(ui, "No countries with both index and growth for this year");
        return;
    }

    let ChartColumns {
        scatter_x: x_col,
        scatter_y: y_col,
        ..
    } = state.filters.columns;
    Plot::new("scatter_plot")
        .height(CHART_HEIGHT + 100.0)
        .x_axis_label(x_col.label())
        .y_axis_label(y_col.label())
        .label_formatter(move |name, value| {
            if name.is_empty() {
                String::new()
            } else {
                format!("{name}\n{x_col} {:.2}\n{y_col} {:.2}", value.x, value.y)
            }
        })
        .show(ui, |plot_ui| {
            for row in rows {
                // Both columns are non-null after the scatter view's null drop.
                let (Some(x), Some(y)) = (row.value(x_col), row.value(y_col)) else {
                    continue;
                };
                let point = Points::new(PlotPoints::from(vec![[x, y]]))
                    .name(&row.country)
                    .color(state.color_map.color_for(&row.country))
                    .radius(5.0);
                plot_ui.points(point);
            }
        });
}

use eframe::egui::{self, Color32, Ui};

use crate::data::filter::{self, MissingColumn, ValueRange, CATEGORY_COLUMN, VALUE_COLUMN};
use crate::state::AppState;
use crate::ui::{plot, table};
use crate::views::map::{self, MapModel};
use crate::views::Dashboard;

fn info(ui: &mut Ui, text: &str) {
    ui.label(egui::RichText::new(format!("ℹ {text}")).color(Color32::LIGHT_BLUE));
}

fn warning(ui: &mut Ui, text: impl Into<String>) {
    ui.colored_label(Color32::YELLOW, format!("⚠ {}", text.into()));
}

fn error(ui: &mut Ui, text: impl Into<String>) {
    ui.colored_label(Color32::RED, text.into());
}

// ---------------------------------------------------------------------------
// Data analysis tab
// ---------------------------------------------------------------------------

pub fn data_analysis(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = &state.dataset else {
        example_data(ui, state);
        return;
    };

    ui.heading("Data Overview");
    if dataset.is_empty() {
        info(ui, "The uploaded file has a header but no rows.");
    }
    ui.label(format!("Showing {} rows:", dataset.len()));
    table::data_table(ui, "overview_table", &dataset.full_view(), 260.0);

    ui.separator();
    ui.heading("Interactive Analysis");
    let missing = filter::missing_columns(dataset);
    let missing_for = |column: &str| missing.iter().find(|w| w.column == column);
    ui.columns(2, |cols| {
        category_filter(&mut cols[0], state, missing_for(CATEGORY_COLUMN));
        value_filter(&mut cols[1], state, missing_for(VALUE_COLUMN));
    });

    let Some(dataset) = &state.dataset else {
        return;
    };
    let dash = Dashboard::build(dataset, &state.filters);
    ui.label(format!("Filtered results: {} rows", dash.filtered.len()));
    plot::bar_chart(ui, &dash.chart);
}

/// Multiselect over the categories of the full dataset.
fn category_filter(ui: &mut Ui, state: &mut AppState, missing: Option<&MissingColumn>) {
    if let Some(w) = missing {
        warning(ui, w.to_string());
        return;
    }
    let Some(options) = state.dataset.as_ref().and_then(filter::category_options) else {
        return;
    };

    let n_selected = state.filters.categories.as_ref().map_or(0, |s| s.len());
    ui.strong(format!("Filter by Category  ({n_selected}/{})", options.len()));
    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all_categories();
        }
        if ui.small_button("None").clicked() {
            state.select_no_categories();
        }
    });

    egui::ScrollArea::vertical()
        .id_salt("category_filter")
        .max_height(160.0)
        .show(ui, |ui: &mut Ui| {
            for value in &options {
                let mut checked = state
                    .filters
                    .categories
                    .as_ref()
                    .is_some_and(|s| s.contains(value));
                if ui.checkbox(&mut checked, value.to_string()).changed() {
                    state.toggle_category(value);
                }
            }
        });
}

/// Pair of sliders bounded by the integer min/max of `Value`.
fn value_filter(ui: &mut Ui, state: &mut AppState, missing: Option<&MissingColumn>) {
    if let Some(w) = missing {
        warning(ui, w.to_string());
        return;
    }
    let Some(dataset) = &state.dataset else {
        return;
    };
    let Some(bounds) = filter::value_bounds(dataset) else {
        ui.label("No numeric values to filter.");
        return;
    };

    ui.strong("Filter by Value Range");
    let range = state.filters.value_range.get_or_insert(bounds);
    let ValueRange { mut lo, mut hi } = *range;
    ui.add(egui::Slider::new(&mut lo, bounds.lo..=bounds.hi).text("min"));
    ui.add(egui::Slider::new(&mut hi, bounds.lo..=bounds.hi).text("max"));
    // Keep the handles ordered, like a two-handle range slider.
    if lo > range.lo {
        hi = hi.max(lo);
    } else if hi < range.hi {
        lo = lo.min(hi);
    }
    *range = ValueRange::new(lo, hi);
    ui.label(format!("Selected: {range}"));
}

fn example_data(ui: &mut Ui, state: &mut AppState) {
    info(
        ui,
        "Please upload a file to get started. You can find sample data in the `sample_data` folder.",
    );

    let mut visible = state.example.visible;
    if ui.checkbox(&mut visible, "Show Example Data").changed() {
        state.set_example_visible(visible);
    }
    if !state.example.visible {
        return;
    }

    match &state.example.loaded {
        Some(Ok(example)) => {
            ui.label("This is what `example.csv` looks like:");
            let head = example.full_view().head(state.config.preview_rows);
            table::data_table(ui, "example_table", &head, 200.0);
            match map::map_points(&example.full_view()) {
                MapModel::Guidance(_) => {
                    warning(ui, "No 'Latitude' or 'Longitude' columns found for mapping.")
                }
                model => plot::points_map(ui, "example_map", &model),
            }
        }
        Some(Err(msg)) => error(ui, msg.as_str()),
        None => {}
    }
}

// ---------------------------------------------------------------------------
// Santa map tab
// ---------------------------------------------------------------------------

pub fn santa_map(ui: &mut Ui, state: &AppState) {
    ui.heading("🎅 Santa's Journey Across America");
    plot::santa_map(ui);

    let Some(dataset) = &state.dataset else {
        return;
    };
    let dash = Dashboard::build(dataset, &state.filters);
    ui.separator();
    ui.heading("Your Data Points");
    plot::points_map(ui, "data_points_map", &dash.map);
}

// ---------------------------------------------------------------------------
// Statistics tab
// ---------------------------------------------------------------------------

pub fn statistics(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        info(ui, "Upload a file to see statistics here.");
        return;
    };
    let dash = Dashboard::build(dataset, &state.filters);
    ui.label("Summary Statistics:");
    table::stats_table(ui, &dash.stats);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AccessGate;
    use crate::config::AppConfig;
    use crate::data::loader::Upload;
    use crate::views::map::MAP_GUIDANCE;

    fn state_with(csv: &str) -> AppState {
        let mut state = AppState::new(AppConfig::default(), AccessGate::new(None));
        state.ingest(&Upload::new("data.csv", csv.as_bytes())).unwrap();
        state
    }

    /// Run one frame and return every piece of text that was painted.
    fn painted_text(mut add_contents: impl FnMut(&mut Ui)) -> String {
        let ctx = egui::Context::default();
        let input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(1280.0, 2400.0),
            )),
            ..Default::default()
        };
        let output = ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| add_contents(ui));
        });

        let mut text = String::new();
        for clipped in &output.shapes {
            collect_text(&clipped.shape, &mut text);
        }
        text
    }

    fn collect_text(shape: &egui::Shape, out: &mut String) {
        match shape {
            egui::Shape::Text(t) => {
                out.push_str(t.galley.text());
                out.push('\n');
            }
            egui::Shape::Vec(shapes) => {
                for s in shapes {
                    collect_text(s, out);
                }
            }
            _ => {}
        }
    }

    #[test]
    fn santa_map_explains_missing_coordinates() {
        let state = state_with("Category,Value\nA,1\n");
        let text = painted_text(|ui| santa_map(ui, &state));
        assert!(text.contains(MAP_GUIDANCE), "painted: {text}");
    }

    #[test]
    fn santa_map_plots_rows_with_coordinates() {
        let state = state_with("Category,Value,Latitude,Longitude\nA,1,40.7,-74.0\n");
        let text = painted_text(|ui| santa_map(ui, &state));
        assert!(text.contains("Your Data Points"));
        assert!(!text.contains(MAP_GUIDANCE));
    }

    #[test]
    fn missing_value_column_is_reported_only_by_the_filters() {
        let mut state = state_with("Category,Other\nA,1\nB,2\n");

        let analysis = painted_text(|ui| data_analysis(ui, &mut state));
        assert!(analysis.contains("No 'Value' column found for range filtering."));

        let stats = painted_text(|ui| statistics(ui, &state));
        assert!(stats.contains("Summary Statistics:"));
        assert!(!stats.contains("No 'Value' column"), "painted: {stats}");
    }
}

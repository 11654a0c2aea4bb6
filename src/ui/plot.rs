use std::collections::BTreeMap;

use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

use crate::color::ColorMap;
use crate::data::filter::VALUE_COLUMN;
use crate::data::model::CellValue;
use crate::decor;
use crate::views::chart::{BarSpec, ChartModel, DATE_COLUMN};
use crate::views::map::MapModel;

const POINT_COLOR: Color32 = Color32::from_rgb(255, 75, 75);

// ---------------------------------------------------------------------------
// Bar chart (data analysis tab)
// ---------------------------------------------------------------------------

/// One bar per filtered row, coloured by `Date`.
pub fn bar_chart(ui: &mut Ui, model: &ChartModel) {
    let bars = match model {
        ChartModel::Bars(bars) => bars,
        ChartModel::Placeholder(text) => {
            ui.label(*text);
            return;
        }
        ChartModel::MissingValueColumn => {
            ui.colored_label(
                Color32::YELLOW,
                format!("No '{VALUE_COLUMN}' column found for charting."),
            );
            return;
        }
    };

    let color_map = ColorMap::new(DATE_COLUMN, bars.iter().map(|b| &b.group));

    // One chart per colour group so each date gets its own legend entry.
    let mut groups: BTreeMap<&CellValue, Vec<&BarSpec>> = BTreeMap::new();
    for bar in bars {
        groups.entry(&bar.group).or_default().push(bar);
    }

    ui.strong("Values by Category");
    ui.label(
        RichText::new(format!(
            "Coloured by {} ({} groups)",
            color_map.column,
            color_map.len()
        ))
        .weak(),
    );
    Plot::new("value_bar_chart")
        .legend(Legend::default())
        .height(360.0)
        .x_axis_label("index")
        .y_axis_label(VALUE_COLUMN)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (group, members) in groups {
                let color = color_map.color_for(group);
                let name = match group {
                    CellValue::Null => "no date".to_string(),
                    other => other.to_string(),
                };
                let bars: Vec<Bar> = members
                    .iter()
                    .map(|b| Bar::new(b.x, b.y).width(0.8).fill(color))
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name(name).color(color));
            }
        });
}

// ---------------------------------------------------------------------------
// Point map
// ---------------------------------------------------------------------------

/// Scatter rows on a longitude/latitude plane, or explain what is missing.
pub fn points_map(ui: &mut Ui, id: &str, model: &MapModel) {
    let coords = match model {
        MapModel::Points(coords) => coords,
        MapModel::Guidance(text) => {
            ui.colored_label(Color32::YELLOW, *text);
            return;
        }
    };

    Plot::new(id)
        .height(360.0)
        .data_aspect(1.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .show(ui, |plot_ui| {
            let points: PlotPoints = coords.iter().copied().collect();
            plot_ui.points(
                Points::new(points)
                    .radius(4.0)
                    .color(POINT_COLOR)
                    .name("rows"),
            );
        });
}

// ---------------------------------------------------------------------------
// Decorative map
// ---------------------------------------------------------------------------

/// Static continental-US base map with the flyer looping across it.
pub fn santa_map(ui: &mut Ui) {
    let time = ui.input(|i| i.time);
    let [lon, lat] = decor::flyer_position(time);

    Plot::new("santa_map")
        .height(600.0)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_x(decor::LON_RANGE[0])
        .include_x(decor::LON_RANGE[1])
        .include_y(decor::LAT_RANGE[0])
        .include_y(decor::LAT_RANGE[1])
        .show(ui, |plot_ui| {
            let outline: PlotPoints = decor::base_outline().into_iter().collect();
            plot_ui.polygon(
                Polygon::new(outline)
                    .fill_color(Color32::from_rgb(245, 245, 245))
                    .stroke((1.0, Color32::LIGHT_GRAY)),
            );
            plot_ui.text(Text::new(
                PlotPoint::new(lon, lat),
                RichText::new(decor::FLYER).size(48.0),
            ));
        });

    ui.ctx().request_repaint();
}

use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{CellValue, DatasetView};
use crate::views::stats::{ColumnSummary, Summary, CATEGORICAL_ROWS, NUMERIC_ROWS};

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Data table
// ---------------------------------------------------------------------------

/// Render every row and column of a view, with the dataset row index first.
pub fn data_table(ui: &mut Ui, id: &str, view: &DatasetView<'_>, max_height: f32) {
    let ds = view.dataset;
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(max_height)
            .column(Column::auto().at_least(40.0))
            .columns(Column::auto().at_least(70.0).clip(true), ds.columns.len())
            .header(ROW_HEIGHT + 2.0, |mut header| {
                header.col(|ui| {
                    ui.strong("#");
                });
                for (c, name) in ds.columns.iter().enumerate() {
                    header.col(|ui| {
                        ui.strong(name)
                            .on_hover_text(ds.column_type(ds.column_ref(c)).to_string());
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, view.len(), |mut row| {
                    let idx = view.indices[row.index()];
                    row.col(|ui| {
                        ui.label(RichText::new(idx.to_string()).weak());
                    });
                    for cell in &ds.rows[idx] {
                        row.col(|ui| {
                            cell_label(ui, cell);
                        });
                    }
                });
            });
    });
}

fn cell_label(ui: &mut Ui, cell: &CellValue) {
    match cell {
        CellValue::Null => {
            ui.label(RichText::new("None").weak().italics());
        }
        other => {
            ui.label(other.to_string());
        }
    }
}

// ---------------------------------------------------------------------------
// Statistics table
// ---------------------------------------------------------------------------

/// Statistic names down the side, one column per summarised data column.
pub fn stats_table(ui: &mut Ui, stats: &[ColumnSummary]) {
    let numeric = stats
        .first()
        .is_some_and(|s| matches!(s.summary, Summary::Numeric(_)));
    let labels: &[&str] = if numeric { &NUMERIC_ROWS } else { &CATEGORICAL_ROWS };

    ui.push_id("stats_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(50.0))
            .columns(Column::auto().at_least(90.0), stats.len())
            .header(ROW_HEIGHT + 2.0, |mut header| {
                header.col(|_ui| {});
                for s in stats {
                    header.col(|ui| {
                        ui.strong(&s.column);
                    });
                }
            })
            .body(|mut body| {
                for (r, label) in labels.iter().enumerate() {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui| {
                            ui.strong(*label);
                        });
                        for s in stats {
                            row.col(|ui| {
                                ui.label(stat_cell(&s.summary, r));
                            });
                        }
                    });
                }
            });
    });
}

/// Text for row `r` of a summary, matching the order of the row labels.
fn stat_cell(summary: &Summary, r: usize) -> String {
    fn num(v: Option<f64>) -> String {
        v.map_or_else(|| "NaN".to_string(), |v| format!("{v:.6}"))
    }
    if r == 0 {
        return match summary {
            Summary::Numeric(_) => format!("{:.1}", summary.count() as f64),
            Summary::Categorical(_) => summary.count().to_string(),
        };
    }
    match summary {
        Summary::Numeric(s) => match r {
            1 => num(s.mean),
            2 => num(s.std),
            3 => num(s.min),
            4 => num(s.q25),
            5 => num(s.median),
            6 => num(s.q75),
            7 => num(s.max),
            _ => String::new(),
        },
        Summary::Categorical(s) => match r {
            1 => s.unique.to_string(),
            2 => s.top.as_ref().map_or_else(|| "NaN".to_string(), |v| v.to_string()),
            3 => s.freq.to_string(),
            _ => String::new(),
        },
    }
}

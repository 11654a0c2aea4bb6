use crate::data::filter::VALUE_COLUMN;
use crate::data::model::{CellValue, DatasetView};

/// Column used as the colour channel of the bar chart.
pub const DATE_COLUMN: &str = "Date";

/// Text shown instead of an empty chart.
pub const EMPTY_PLACEHOLDER: &str = "No data available for the current filters.";

/// One bar: ordinal position, height, colour group.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSpec {
    pub x: f64,
    pub y: f64,
    pub group: CellValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartModel {
    Bars(Vec<BarSpec>),
    /// The filtered view has no rows.
    Placeholder(&'static str),
    /// There is no `Value` column to plot.
    MissingValueColumn,
}

/// One bar per row of the view: x is the row's index in the uploaded
/// dataset, y its `Value`, grouped by `Date`. Non-numeric values plot as 0.
pub fn bar_chart(view: &DatasetView<'_>) -> ChartModel {
    if view.is_empty() {
        return ChartModel::Placeholder(EMPTY_PLACEHOLDER);
    }
    let Some(value_col) = view.dataset.column(VALUE_COLUMN) else {
        return ChartModel::MissingValueColumn;
    };
    let date_col = view.dataset.column(DATE_COLUMN);

    let bars = view
        .rows()
        .map(|(idx, row)| BarSpec {
            x: idx as f64,
            y: row[value_col.index()].as_f64().unwrap_or(0.0),
            group: date_col
                .map(|c| row[c.index()].clone())
                .unwrap_or(CellValue::Null),
        })
        .collect();

    ChartModel::Bars(bars)
}

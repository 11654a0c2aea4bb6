use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

use super::model::{CellValue, Dataset, DatasetView};

/// Column driving the membership filter.
pub const CATEGORY_COLUMN: &str = "Category";
/// Column driving the numeric range filter.
pub const VALUE_COLUMN: &str = "Value";

// ---------------------------------------------------------------------------
// Selections
// ---------------------------------------------------------------------------

/// Closed integer interval chosen on the value slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueRange {
    pub lo: i64,
    pub hi: i64,
}

impl ValueRange {
    pub fn new(lo: i64, hi: i64) -> Self {
        Self { lo, hi }
    }

    pub fn contains(&self, v: f64) -> bool {
        self.lo as f64 <= v && v <= self.hi as f64
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}

/// The two user-chosen predicates. `None` means the predicate is inactive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSelection {
    pub categories: Option<BTreeSet<CellValue>>,
    pub value_range: Option<ValueRange>,
}

impl FilterSelection {
    /// Pass-through selection: every category, the full value interval.
    pub fn defaults(dataset: &Dataset) -> Self {
        Self {
            categories: category_options(dataset).map(|opts| opts.into_iter().collect()),
            value_range: value_bounds(dataset),
        }
    }
}

/// An expected column is absent, so the feature depending on it is disabled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("No '{column}' column found for {purpose}.")]
pub struct MissingColumn {
    pub column: &'static str,
    pub purpose: &'static str,
}

/// Result of running the pipeline: the filtered view plus non-fatal warnings.
#[derive(Debug, Clone)]
pub struct FilterOutcome<'a> {
    pub view: DatasetView<'a>,
    pub warnings: Vec<MissingColumn>,
}

// ---------------------------------------------------------------------------
// Options exposed to the widgets
// ---------------------------------------------------------------------------

/// Distinct `Category` values of the full dataset, in order of first appearance.
pub fn category_options(dataset: &Dataset) -> Option<Vec<CellValue>> {
    let col = dataset.column(CATEGORY_COLUMN)?;
    let mut seen = BTreeSet::new();
    let options = dataset
        .rows
        .iter()
        .map(|row| &row[col.index()])
        .filter(|v| seen.insert((*v).clone()))
        .cloned()
        .collect();
    Some(options)
}

/// Global integer bounds of `Value`, each truncated toward zero.
///
/// `None` when the column is absent, the dataset has no rows, or no cell
/// holds a number; the numeric step is skipped in all three cases.
pub fn value_bounds(dataset: &Dataset) -> Option<ValueRange> {
    let col = dataset.column(VALUE_COLUMN)?;
    let (min, max) = dataset
        .full_view()
        .column_values(col)
        .filter_map(CellValue::as_f64)
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;
    Some(ValueRange::new(min.trunc() as i64, max.trunc() as i64))
}

// ---------------------------------------------------------------------------
// Filter steps
// ---------------------------------------------------------------------------

/// Keep the rows whose `Category` is in `selected`. Without the column, every
/// row passes.
pub fn filter_by_category(
    dataset: &Dataset,
    rows: &[usize],
    selected: &BTreeSet<CellValue>,
) -> Vec<usize> {
    let Some(col) = dataset.column(CATEGORY_COLUMN) else {
        return rows.to_vec();
    };
    rows.iter()
        .copied()
        .filter(|&i| selected.contains(dataset.value(i, col)))
        .collect()
}

/// Keep the rows whose `Value` lies in `range` (inclusive). Without the
/// column, every row passes. Non-numeric cells never match.
pub fn filter_by_value_range(dataset: &Dataset, rows: &[usize], range: ValueRange) -> Vec<usize> {
    let Some(col) = dataset.column(VALUE_COLUMN) else {
        return rows.to_vec();
    };
    rows.iter()
        .copied()
        .filter(|&i| {
            dataset
                .value(i, col)
                .as_f64()
                .is_some_and(|v| range.contains(v))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// The filter columns this dataset lacks, one warning per skipped step.
pub fn missing_columns(dataset: &Dataset) -> Vec<MissingColumn> {
    let mut missing = Vec::new();
    if dataset.column(CATEGORY_COLUMN).is_none() {
        missing.push(MissingColumn {
            column: CATEGORY_COLUMN,
            purpose: "filtering",
        });
    }
    if dataset.column(VALUE_COLUMN).is_none() {
        missing.push(MissingColumn {
            column: VALUE_COLUMN,
            purpose: "range filtering",
        });
    }
    missing
}

/// Apply the categorical then the numeric step, intersecting their results.
///
/// A step is skipped (with a warning) when its column is missing. The numeric
/// step is also skipped for empty datasets, and when the selected range still
/// spans the full bounds, so the default selection never drops rows.
pub fn apply<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> FilterOutcome<'a> {
    let mut rows: Vec<usize> = (0..dataset.len()).collect();
    let warnings = missing_columns(dataset);

    if dataset.column(CATEGORY_COLUMN).is_some() {
        if let Some(selected) = &selection.categories {
            rows = filter_by_category(dataset, &rows, selected);
        }
    }

    if dataset.column(VALUE_COLUMN).is_some() {
        let bounds = value_bounds(dataset);
        match (selection.value_range, bounds) {
            (Some(range), Some(bounds)) if range != bounds => {
                rows = filter_by_value_range(dataset, &rows, range);
            }
            _ => {}
        }
    }

    log::debug!(
        "filter pipeline kept {} of {} rows ({} warnings)",
        rows.len(),
        dataset.len(),
        warnings.len()
    );

    FilterOutcome {
        view: DatasetView::new(dataset, rows),
        warnings,
    }
}

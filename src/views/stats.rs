use std::collections::BTreeMap;

use crate::data::model::{CellValue, ColumnRef, DatasetView};

/// Descriptive statistics for one numeric column.
///
/// Every field other than `count` is `None` when it is undefined for the
/// data (no values, or a single value for `std`).
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Frequency summary for a non-numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalSummary {
    pub count: usize,
    pub unique: usize,
    pub top: Option<CellValue>,
    pub freq: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Summary {
    Numeric(NumericSummary),
    Categorical(CategoricalSummary),
}

impl Summary {
    pub fn count(&self) -> usize {
        match self {
            Summary::Numeric(s) => s.count,
            Summary::Categorical(s) => s.count,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub column: String,
    pub summary: Summary,
}

/// Row labels of the numeric statistics table, in display order.
pub const NUMERIC_ROWS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];
/// Row labels of the categorical statistics table.
pub const CATEGORICAL_ROWS: [&str; 4] = ["count", "unique", "top", "freq"];

/// Summarise a view the way `DataFrame.describe()` does: numeric columns
/// only, or every column with frequency statistics when none is numeric.
pub fn describe(view: &DatasetView<'_>) -> Vec<ColumnSummary> {
    let ds = view.dataset;
    let numeric: Vec<usize> = (0..ds.columns.len())
        .filter(|&c| ds.types[c].is_numeric())
        .collect();

    if numeric.is_empty() {
        return (0..ds.columns.len())
            .map(|c| ColumnSummary {
                column: ds.columns[c].clone(),
                summary: Summary::Categorical(categorical(view, ds.column_ref(c))),
            })
            .collect();
    }

    numeric
        .into_iter()
        .map(|c| {
            let values: Vec<f64> = view
                .column_values(ds.column_ref(c))
                .filter_map(CellValue::as_f64)
                .collect();
            ColumnSummary {
                column: ds.columns[c].clone(),
                summary: Summary::Numeric(numeric_summary(values)),
            }
        })
        .collect()
}

fn numeric_summary(mut values: Vec<f64>) -> NumericSummary {
    let count = values.len();
    if count == 0 {
        return NumericSummary {
            count,
            mean: None,
            std: None,
            min: None,
            q25: None,
            median: None,
            q75: None,
            max: None,
        };
    }

    values.sort_by(f64::total_cmp);
    let n = count as f64;
    let mean = values.iter().sum::<f64>() / n;
    let std = (count > 1).then(|| {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1.0)).sqrt()
    });

    NumericSummary {
        count,
        mean: Some(mean),
        std,
        min: values.first().copied(),
        q25: Some(quantile(&values, 0.25)),
        median: Some(quantile(&values, 0.5)),
        q75: Some(quantile(&values, 0.75)),
        max: values.last().copied(),
    }
}

/// Linear-interpolation quantile of sorted, non-empty data.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = (sorted.len() - 1) as f64 * q;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

fn categorical(view: &DatasetView<'_>, col: ColumnRef) -> CategoricalSummary {
    // value -> (frequency, first position)
    let mut counts: BTreeMap<&CellValue, (usize, usize)> = BTreeMap::new();
    let mut count = 0;
    for (pos, v) in view.column_values(col).enumerate() {
        if v.is_null() {
            continue;
        }
        count += 1;
        counts.entry(v).or_insert((0, pos)).0 += 1;
    }

    // Ties go to the value seen first.
    let top = counts
        .iter()
        .max_by(|a, b| a.1 .0.cmp(&b.1 .0).then(b.1 .1.cmp(&a.1 .1)))
        .map(|(v, (freq, _))| ((*v).clone(), *freq));

    CategoricalSummary {
        count,
        unique: counts.len(),
        freq: top.as_ref().map_or(0, |t| t.1),
        top: top.map(|t| t.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Dataset;

    fn numeric_ds(values: &[f64]) -> Dataset {
        Dataset::from_rows(
            vec!["Category".into(), "Value".into()],
            values
                .iter()
                .map(|v| vec![CellValue::Text("A".into()), CellValue::Float(*v)])
                .collect(),
        )
    }

    fn assert_close(a: Option<f64>, b: f64) {
        let a = a.expect("statistic should be defined");
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn numeric_columns_only_when_present() {
        let ds = numeric_ds(&[1.0, 2.0, 3.0, 4.0]);
        let stats = describe(&ds.full_view());
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].column, "Value");

        let Summary::Numeric(s) = &stats[0].summary else {
            panic!("expected numeric summary");
        };
        assert_eq!(s.count, 4);
        assert_close(s.mean, 2.5);
        assert_close(s.std, 1.2909944487358056);
        assert_close(s.min, 1.0);
        assert_close(s.q25, 1.75);
        assert_close(s.median, 2.5);
        assert_close(s.q75, 3.25);
        assert_close(s.max, 4.0);
    }

    #[test]
    fn single_value_has_no_std() {
        let ds = numeric_ds(&[7.0]);
        let Summary::Numeric(s) = &describe(&ds.full_view())[0].summary else {
            panic!("expected numeric summary");
        };
        assert_eq!(s.std, None);
        assert_close(s.median, 7.0);
    }

    #[test]
    fn statistics_follow_the_view() {
        let ds = numeric_ds(&[1.0, 100.0, 3.0]);
        let view = DatasetView::new(&ds, vec![0, 2]);
        let Summary::Numeric(s) = &describe(&view)[0].summary else {
            panic!("expected numeric summary");
        };
        assert_eq!(s.count, 2);
        assert_close(s.max, 3.0);
    }

    #[test]
    fn empty_dataset_reports_zero_counts_for_every_column() {
        let ds = Dataset::from_rows(
            vec!["Category".into(), "Value".into(), "Date".into()],
            Vec::new(),
        );
        let stats = describe(&ds.full_view());
        assert_eq!(stats.len(), 3);
        assert!(stats.iter().all(|s| s.summary.count() == 0));
    }

    #[test]
    fn empty_filtered_view_of_numeric_data() {
        let ds = numeric_ds(&[1.0, 2.0]);
        let stats = describe(&DatasetView::new(&ds, Vec::new()));
        let Summary::Numeric(s) = &stats[0].summary else {
            panic!("expected numeric summary");
        };
        assert_eq!(s.count, 0);
        assert_eq!(s.mean, None);
    }

    #[test]
    fn text_only_data_gets_frequency_summary() {
        let ds = Dataset::from_rows(
            vec!["Category".into()],
            ["B", "A", "B", "A", "C"]
                .iter()
                .map(|s| vec![CellValue::Text(s.to_string())])
                .chain(std::iter::once(vec![CellValue::Null]))
                .collect(),
        );
        let Summary::Categorical(s) = &describe(&ds.full_view())[0].summary else {
            panic!("expected categorical summary");
        };
        assert_eq!(s.count, 5);
        assert_eq!(s.unique, 3);
        assert_eq!(s.top, Some(CellValue::Text("B".into())));
        assert_eq!(s.freq, 2);
    }
}

use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the uploaded table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common Pandas dtypes.
/// Used as a `BTreeSet` key downstream, so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.4}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64`; NaN counts as missing.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if !v.is_nan() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// ColumnType – the dtype inferred for a whole column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Float,
    Bool,
    Text,
    /// Every cell is null (or the table has no rows).
    Empty,
}

impl ColumnType {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }

    /// Infer the dtype from the non-null cells of a column.
    fn infer<'a>(cells: impl Iterator<Item = &'a CellValue>) -> Self {
        let mut seen: Option<ColumnType> = None;
        for cell in cells {
            let t = match cell {
                CellValue::Null => continue,
                CellValue::Integer(_) => ColumnType::Integer,
                CellValue::Float(_) => ColumnType::Float,
                CellValue::Bool(_) => ColumnType::Bool,
                CellValue::Text(_) => ColumnType::Text,
            };
            seen = Some(match (seen, t) {
                (None, t) => t,
                (Some(a), b) if a == b => a,
                (Some(ColumnType::Integer), ColumnType::Float)
                | (Some(ColumnType::Float), ColumnType::Integer) => ColumnType::Float,
                _ => ColumnType::Text,
            });
        }
        seen.unwrap_or(ColumnType::Empty)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Integer => "int64",
            ColumnType::Float => "float64",
            ColumnType::Bool => "bool",
            ColumnType::Text => "object",
            ColumnType::Empty => "empty",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete uploaded table
// ---------------------------------------------------------------------------

/// Handle to a column that is known to exist in a particular [`Dataset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRef(usize);

impl ColumnRef {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The full parsed table: ordered columns, ordered rows, one dtype per column.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub types: Vec<ColumnType>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Dataset {
    /// Build a dataset and infer column dtypes.
    ///
    /// Rows shorter than the header are padded with nulls. Columns mixing
    /// integers and floats are promoted to floats, the way Pandas does.
    pub fn from_rows(columns: Vec<String>, mut rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        for row in &mut rows {
            row.resize(width, CellValue::Null);
        }

        let types: Vec<ColumnType> = (0..width)
            .map(|c| ColumnType::infer(rows.iter().map(|r| &r[c])))
            .collect();

        for (c, ty) in types.iter().enumerate() {
            if *ty == ColumnType::Float {
                for row in &mut rows {
                    if let CellValue::Integer(i) = row[c] {
                        row[c] = CellValue::Float(i as f64);
                    }
                }
            }
        }

        Dataset {
            columns,
            types,
            rows,
        }
    }

    /// Probe the schema for a column by exact name.
    pub fn column(&self, name: &str) -> Option<ColumnRef> {
        self.columns.iter().position(|c| c == name).map(ColumnRef)
    }

    /// Handle for the column at `index`.
    pub fn column_ref(&self, index: usize) -> ColumnRef {
        debug_assert!(index < self.columns.len());
        ColumnRef(index)
    }

    pub fn column_type(&self, col: ColumnRef) -> ColumnType {
        self.types[col.0]
    }

    pub fn value(&self, row: usize, col: ColumnRef) -> &CellValue {
        &self.rows[row][col.0]
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// A view over every row.
    pub fn full_view(&self) -> DatasetView<'_> {
        DatasetView::new(self, (0..self.len()).collect())
    }
}

// ---------------------------------------------------------------------------
// DatasetView – a row subset of a dataset (the filtered view)
// ---------------------------------------------------------------------------

/// Rows of a [`Dataset`] selected by index; columns are never altered.
#[derive(Debug, Clone)]
pub struct DatasetView<'a> {
    pub dataset: &'a Dataset,
    pub indices: Vec<usize>,
}

impl<'a> DatasetView<'a> {
    pub fn new(dataset: &'a Dataset, indices: Vec<usize>) -> Self {
        Self { dataset, indices }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate `(original_index, row)` pairs in view order.
    pub fn rows(&self) -> impl Iterator<Item = (usize, &'a [CellValue])> + '_ {
        let ds = self.dataset;
        self.indices.iter().map(move |&i| (i, ds.rows[i].as_slice()))
    }

    /// The first `n` rows of the view.
    pub fn head(&self, n: usize) -> DatasetView<'a> {
        DatasetView::new(self.dataset, self.indices.iter().take(n).copied().collect())
    }

    /// Values of one column in view order.
    pub fn column_values(&self, col: ColumnRef) -> impl Iterator<Item = &'a CellValue> + '_ {
        let ds = self.dataset;
        self.indices.iter().map(move |&i| &ds.rows[i][col.0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn mixed_int_float_column_is_promoted() {
        let ds = Dataset::from_rows(
            cols(&["Value"]),
            vec![vec![CellValue::Integer(1)], vec![CellValue::Float(2.5)]],
        );
        assert_eq!(ds.types, vec![ColumnType::Float]);
        assert_eq!(ds.rows[0][0], CellValue::Float(1.0));
    }

    #[test]
    fn all_null_column_is_empty_typed() {
        let ds = Dataset::from_rows(cols(&["A"]), vec![vec![CellValue::Null]]);
        assert_eq!(ds.types, vec![ColumnType::Empty]);

        let no_rows = Dataset::from_rows(cols(&["A", "B"]), Vec::new());
        assert_eq!(no_rows.types, vec![ColumnType::Empty, ColumnType::Empty]);
    }

    #[test]
    fn short_rows_are_padded_with_null() {
        let ds = Dataset::from_rows(cols(&["A", "B"]), vec![vec![CellValue::Integer(1)]]);
        assert_eq!(ds.rows[0], vec![CellValue::Integer(1), CellValue::Null]);
    }

    #[test]
    fn column_probe_is_exact() {
        let ds = Dataset::from_rows(cols(&["Category", "Value"]), Vec::new());
        assert_eq!(ds.column("Value").map(ColumnRef::index), Some(1));
        assert!(ds.column("value").is_none());
    }

    #[test]
    fn view_head_keeps_order() {
        let ds = Dataset::from_rows(
            cols(&["n"]),
            (0..10).map(|i| vec![CellValue::Integer(i)]).collect(),
        );
        let view = DatasetView::new(&ds, vec![7, 3, 5]);
        let head: Vec<usize> = view.head(2).rows().map(|(i, _)| i).collect();
        assert_eq!(head, vec![7, 3]);
    }

    #[test]
    fn nan_is_not_numeric() {
        assert_eq!(CellValue::Float(f64::NAN).as_f64(), None);
        assert_eq!(CellValue::Integer(3).as_f64(), Some(3.0));
        assert_eq!(CellValue::Text("3".into()).as_f64(), None);
    }
}

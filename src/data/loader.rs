use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use super::model::{CellValue, ColumnType, Dataset, DatasetView};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// The uploaded bytes do not conform to the format chosen by the file suffix.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported JSON layout: {0}")]
    Layout(String),
}

/// Failure to produce a dataset from a file on disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {}", .0.display())]
    MissingAsset(PathBuf),
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
}

// ---------------------------------------------------------------------------
// Upload – a named byte stream
// ---------------------------------------------------------------------------

/// A file handed to the application: its name decides the parser.
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let bytes = std::fs::read(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                LoadError::MissingAsset(path.to_path_buf())
            } else {
                LoadError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { name, bytes })
    }

    fn is_csv(&self) -> bool {
        self.name.to_ascii_lowercase().ends_with(".csv")
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Parse an upload. Dispatch by suffix: `.csv` → CSV, anything else → JSON.
pub fn load_upload(upload: &Upload) -> Result<Dataset, ParseError> {
    if upload.is_csv() {
        load_csv(&upload.bytes)
    } else {
        load_json(&upload.bytes)
    }
}

/// Load the bundled example file (or any file on disk).
pub fn load_example(path: &Path) -> Result<Dataset, LoadError> {
    let upload = Upload::from_path(path)?;
    Ok(load_upload(&upload)?)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: a header row with column names, then one record per row.
/// Cells are read as text and typed per column afterwards.
fn load_csv(bytes: &[u8]) -> Result<Dataset, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut raw: Vec<Vec<String>> = Vec::new();
    for result in reader.records() {
        let record = result?;
        raw.push(record.iter().map(|s| s.to_string()).collect());
    }

    let types: Vec<ColumnType> = (0..headers.len())
        .map(|c| infer_text_column(raw.iter().map(|r| r[c].as_str())))
        .collect();

    let rows = raw
        .into_iter()
        .map(|record| {
            record
                .iter()
                .zip(&types)
                .map(|(cell, ty)| parse_cell(cell, *ty))
                .collect()
        })
        .collect();

    Ok(Dataset::from_rows(headers, rows))
}

/// Pick the narrowest dtype every non-empty cell of a column fits.
fn infer_text_column<'a>(cells: impl Iterator<Item = &'a str>) -> ColumnType {
    let mut int_ok = true;
    let mut float_ok = true;
    let mut bool_ok = true;
    let mut any = false;

    for cell in cells.filter(|c| !is_missing(c)) {
        any = true;
        int_ok &= cell.parse::<i64>().is_ok();
        float_ok &= cell.parse::<f64>().is_ok();
        bool_ok &= parse_bool(cell).is_some();
    }

    if !any {
        ColumnType::Empty
    } else if int_ok {
        ColumnType::Integer
    } else if float_ok {
        ColumnType::Float
    } else if bool_ok {
        ColumnType::Bool
    } else {
        ColumnType::Text
    }
}

/// Empty cells and `NaN` spellings are missing values.
fn is_missing(s: &str) -> bool {
    s.is_empty() || s.eq_ignore_ascii_case("nan")
}

fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_cell(s: &str, ty: ColumnType) -> CellValue {
    if is_missing(s) {
        return CellValue::Null;
    }
    let parsed = match ty {
        ColumnType::Integer => s.parse().ok().map(CellValue::Integer),
        ColumnType::Float => s.parse().ok().map(CellValue::Float),
        ColumnType::Bool => parse_bool(s).map(CellValue::Bool),
        ColumnType::Text | ColumnType::Empty => None,
    };
    parsed.unwrap_or_else(|| CellValue::Text(s.to_string()))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Accepted JSON layouts (the common `df.to_json()` orientations):
///
/// ```json
/// [{"Category": "A", "Value": 10}, ...]            // records
/// {"Category": {"0": "A", "1": "B"}, ...}          // columns
/// {"Category": ["A", "B"], "Value": [10, 20]}      // column arrays
/// ```
fn load_json(bytes: &[u8]) -> Result<Dataset, ParseError> {
    let root: JsonValue = serde_json::from_slice(bytes)?;

    match root {
        JsonValue::Array(records) => load_json_records(&records),
        JsonValue::Object(columns) => load_json_columns(&columns),
        other => Err(ParseError::Layout(format!(
            "expected an array or object at the top level, found {}",
            json_kind(&other)
        ))),
    }
}

fn load_json_records(records: &[JsonValue]) -> Result<Dataset, ParseError> {
    let mut columns: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| ParseError::Layout(format!("row {i} is not a JSON object")))?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(JsonValue::as_object)
        .map(|obj| {
            columns
                .iter()
                .map(|c| obj.get(c).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect()
        })
        .collect();

    Ok(Dataset::from_rows(columns, rows))
}

/// Column layouts are joined on their index labels: an object column keys
/// rows by label, an array column by position (`"0"`, `"1"`, ...). Rows come
/// out in first-seen label order; a label a column lacks is null there.
fn load_json_columns(map: &Map<String, JsonValue>) -> Result<Dataset, ParseError> {
    let columns: Vec<String> = map.keys().cloned().collect();
    let mut row_of: HashMap<String, usize> = HashMap::new();
    let mut rows: Vec<Vec<CellValue>> = Vec::new();

    for (c, (name, col)) in map.iter().enumerate() {
        let entries: Vec<(String, &JsonValue)> = match col {
            JsonValue::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
            JsonValue::Object(index) => index.iter().map(|(k, v)| (k.clone(), v)).collect(),
            other => {
                return Err(ParseError::Layout(format!(
                    "column '{name}' must be an array or object, found {}",
                    json_kind(other)
                )))
            }
        };

        for (label, value) in entries {
            let r = *row_of.entry(label).or_insert_with(|| {
                rows.push(vec![CellValue::Null; columns.len()]);
                rows.len() - 1
            });
            rows[r][c] = json_to_cell(value);
        }
    }

    Ok(Dataset::from_rows(columns, rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

fn json_kind(val: &JsonValue) -> &'static str {
    match val {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// CSV writer
// ---------------------------------------------------------------------------

/// Serialise a view as CSV. Floats always keep a decimal point so the
/// column reloads as float; nulls become empty cells.
pub fn write_csv<W: Write>(view: &DatasetView<'_>, writer: W) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(&view.dataset.columns)?;
    for (_, row) in view.rows() {
        out.write_record(row.iter().map(cell_to_csv))?;
    }
    out.flush()?;
    Ok(())
}

fn cell_to_csv(cell: &CellValue) -> String {
    match cell {
        CellValue::Integer(i) => i.to_string(),
        CellValue::Float(f) if f.is_nan() => String::new(),
        CellValue::Float(f) => format!("{f:?}"),
        CellValue::Bool(b) => b.to_string(),
        CellValue::Text(s) => s.clone(),
        CellValue::Null => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_upload(body: &str) -> Upload {
        Upload::new("data.csv", body.as_bytes())
    }

    #[test]
    fn csv_types_are_inferred_per_column() {
        let ds = load_upload(&csv_upload(
            "Category,Value,Date,Ratio,Flag\nA,10,2025-01-01,0.5,true\nB,20,2025-01-02,1,False\n",
        ))
        .unwrap();

        assert_eq!(ds.columns, vec!["Category", "Value", "Date", "Ratio", "Flag"]);
        assert_eq!(
            ds.types,
            vec![
                ColumnType::Text,
                ColumnType::Integer,
                ColumnType::Text,
                ColumnType::Float,
                ColumnType::Bool
            ]
        );
        assert_eq!(ds.rows[1][3], CellValue::Float(1.0));
        assert_eq!(ds.rows[1][4], CellValue::Bool(false));
    }

    #[test]
    fn csv_empty_cells_are_null() {
        let ds = load_upload(&csv_upload("A,B\n1,\n,x\n")).unwrap();
        assert_eq!(ds.rows[0][1], CellValue::Null);
        assert_eq!(ds.rows[1][0], CellValue::Null);
        assert_eq!(ds.types[0], ColumnType::Integer);
    }

    #[test]
    fn csv_nan_cells_are_null() {
        let ds = load_upload(&csv_upload("A,B,C
1.5,x,NaN
NaN,nan,NaN
")).unwrap();
        assert_eq!(ds.types[0], ColumnType::Float);
        assert_eq!(ds.rows[1][0], CellValue::Null);
        assert_eq!(ds.types[1], ColumnType::Text);
        assert_eq!(ds.rows[1][1], CellValue::Null);
        assert_eq!(ds.types[2], ColumnType::Empty);

        let mut buf = Vec::new();
        write_csv(&ds.full_view(), &mut buf).unwrap();
        let reloaded = load_upload(&Upload::new("again.csv", buf)).unwrap();
        assert_eq!(reloaded, ds);
    }

    #[test]
    fn csv_header_only_gives_empty_dataset() {
        let ds = load_upload(&csv_upload("Category,Value\n")).unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.columns.len(), 2);
    }

    #[test]
    fn ragged_csv_is_a_parse_error() {
        let err = load_upload(&csv_upload("A,B\n1,2,3\n")).unwrap_err();
        assert!(matches!(err, ParseError::Csv(_)));
    }

    #[test]
    fn suffix_dispatch_is_case_insensitive_and_defaults_to_json() {
        let csv = Upload::new("DATA.CSV", "A\n1\n".as_bytes());
        assert_eq!(load_upload(&csv).unwrap().len(), 1);

        // A CSV body under a non-csv name goes to the JSON parser and fails.
        let txt = Upload::new("data.txt", "A\n1\n".as_bytes());
        assert!(matches!(load_upload(&txt), Err(ParseError::Json(_))));
    }

    #[test]
    fn json_records_keep_first_seen_column_order() {
        let body = r#"[{"Value": 1, "Category": "A"}, {"Category": "B", "Extra": true}]"#;
        let ds = load_upload(&Upload::new("d.json", body.as_bytes())).unwrap();
        assert_eq!(ds.columns, vec!["Value", "Category", "Extra"]);
        assert_eq!(ds.rows[1][0], CellValue::Null);
        assert_eq!(ds.rows[0][2], CellValue::Null);
    }

    #[test]
    fn json_column_orientations() {
        let by_index = r#"{"Category": {"0": "A", "1": "B"}, "Value": {"0": 1, "1": 2.5}}"#;
        let ds = load_upload(&Upload::new("d.json", by_index.as_bytes())).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.types[1], ColumnType::Float);
        assert_eq!(ds.rows[0][1], CellValue::Float(1.0));

        let arrays = r#"{"Category": ["A", "B", "C"], "Value": [1, 2]}"#;
        let ds = load_upload(&Upload::new("d.json", arrays.as_bytes())).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.rows[2][1], CellValue::Null);
    }

    #[test]
    fn json_columns_join_on_index_labels() {
        let uneven = r#"{"A": {"0": 1, "1": 2}, "B": {"1": 5}}"#;
        let ds = load_upload(&Upload::new("d.json", uneven.as_bytes())).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows[0][1], CellValue::Null);
        assert_eq!(ds.rows[1][1], CellValue::Integer(5));

        let reordered = r#"{"A": {"0": "x", "1": "y"}, "B": {"1": 20, "0": 10, "2": 30}}"#;
        let ds = load_upload(&Upload::new("d.json", reordered.as_bytes())).unwrap();
        assert_eq!(
            ds.rows,
            vec![
                vec![CellValue::Text("x".into()), CellValue::Integer(10)],
                vec![CellValue::Text("y".into()), CellValue::Integer(20)],
                vec![CellValue::Null, CellValue::Integer(30)],
            ]
        );
    }

    #[test]
    fn json_scalar_root_is_rejected() {
        let err = load_upload(&Upload::new("d.json", "42".as_bytes())).unwrap_err();
        assert!(matches!(err, ParseError::Layout(_)));
    }

    #[test]
    fn csv_round_trip_preserves_names_order_and_types() {
        let original = load_upload(&csv_upload(
            "Category,Value,Date,Latitude,Flag,Note\n\
             A,10,2025-01-01,40.0,true,\n\
             B,20,2025-01-02,41.5,false,hello\n\
             A,-3,2025-01-03,39.25,true,\"a, b\"\n",
        ))
        .unwrap();

        let mut buf = Vec::new();
        write_csv(&original.full_view(), &mut buf).unwrap();
        let reloaded = load_upload(&Upload::new("again.csv", buf)).unwrap();

        assert_eq!(reloaded, original);
    }

    #[test]
    fn write_csv_only_emits_view_rows() {
        let ds = load_upload(&csv_upload("A\n1\n2\n3\n")).unwrap();
        let view = DatasetView::new(&ds, vec![2, 0]);
        let mut buf = Vec::new();
        write_csv(&view, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "A\n3\n1\n");
    }

    #[test]
    fn bundled_sample_has_every_expected_column() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("sample_data/example.csv");
        let ds = load_example(&path).unwrap();
        for col in ["Category", "Value", "Date", "Latitude", "Longitude"] {
            assert!(ds.column(col).is_some(), "missing {col}");
        }
        assert_eq!(ds.types[1], ColumnType::Integer);
        assert_eq!(ds.types[3], ColumnType::Float);
        assert!(!ds.is_empty());
    }

    #[test]
    fn missing_example_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("example.csv");
        assert!(matches!(load_example(&path), Err(LoadError::MissingAsset(_))));

        std::fs::write(&path, "Category,Value\nA,1\n").unwrap();
        assert_eq!(load_example(&path).unwrap().len(), 1);
    }
}

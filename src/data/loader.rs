use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::{CellValue, RawTable, Workbook};

// ---------------------------------------------------------------------------
// Source identity
// ---------------------------------------------------------------------------

/// Which sheet of a workbook to read: by position or by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum SheetSelector {
    Index(usize),
    Name(String),
}

impl Default for SheetSelector {
    fn default() -> Self {
        SheetSelector::Index(0)
    }
}

impl fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetSelector::Index(i) => write!(f, "#{i}"),
            SheetSelector::Name(n) => write!(f, "'{n}'"),
        }
    }
}

/// A tabular source: a file plus the sheet to take from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct SourceSpec {
    pub path: PathBuf,
    #[serde(default)]
    pub sheet: SheetSelector,
}

impl SourceSpec {
    pub fn new(path: impl Into<PathBuf>, sheet: SheetSelector) -> Self {
        Self {
            path: path.into(),
            sheet,
        }
    }

    /// Resolve a relative path against `base`.
    pub fn resolved(&self, base: &Path) -> Self {
        if self.path.is_absolute() {
            return self.clone();
        }
        Self {
            path: base.join(&self.path),
            sheet: self.sheet.clone(),
        }
    }
}

impl fmt::Display for SourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (sheet {})", self.path.display(), self.sheet)
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read every sheet of a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json`    – a records array (one sheet) or
///   `{ "sheets": [ { "name": ..., "rows": [ {...}, ... ] }, ... ] }`
/// * `.csv`     – header row plus records (one sheet)
/// * `.parquet` – flat scalar columns (one sheet)
pub fn read_workbook(path: &Path) -> Result<Workbook, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let result = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => {
            return Err(LoadError::UnsupportedFormat {
                path: path.display().to_string(),
                extension: other.to_string(),
            });
        }
    };

    result.map_err(|e| LoadError::Read {
        path: path.display().to_string(),
        message: format!("{e:#}"),
    })
}

/// Pick the sheet a [`SourceSpec`] points at.
pub fn select_sheet<'a>(workbook: &'a Workbook, spec: &SourceSpec) -> Result<&'a RawTable, LoadError> {
    let found = match &spec.sheet {
        SheetSelector::Index(i) => workbook.sheets.get(*i),
        SheetSelector::Name(n) => workbook.sheets.iter().find(|s| &s.name == n),
    };
    found.ok_or_else(|| LoadError::SheetNotFound {
        path: spec.path.display().to_string(),
        sheet: spec.sheet.to_string(),
    })
}

fn sheet_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Sheet1")
        .to_string()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`), either bare or wrapped in a workbook:
///
/// ```json
/// { "sheets": [
///     { "name": "Terminals",
///       "rows": [ { "TerminalName": "Gate", "Latitude": 51.9, ... } ] },
///     { "name": "Definitions", "rows": [ ... ] }
/// ] }
/// ```
///
/// Column order follows first appearance across the records.
fn load_json(path: &Path) -> Result<Workbook> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    match &root {
        JsonValue::Array(records) => {
            let sheet = json_records_to_table(sheet_name(path), records)?;
            Ok(Workbook {
                sheets: vec![sheet],
            })
        }
        JsonValue::Object(obj) => {
            let sheets = obj
                .get("sheets")
                .and_then(|s| s.as_array())
                .context("Expected a records array or an object with a 'sheets' array")?;

            let mut out = Vec::with_capacity(sheets.len());
            for (i, sheet) in sheets.iter().enumerate() {
                let name = sheet
                    .get("name")
                    .and_then(|n| n.as_str())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Sheet{}", i + 1));
                let rows = sheet
                    .get("rows")
                    .and_then(|r| r.as_array())
                    .with_context(|| format!("Sheet {i} has no 'rows' array"))?;
                out.push(json_records_to_table(name, rows)?);
            }
            Ok(Workbook { sheets: out })
        }
        _ => bail!("Expected top-level JSON array or object"),
    }
}

fn json_records_to_table(name: String, records: &[JsonValue]) -> Result<RawTable> {
    let mut columns: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            columns
                .iter()
                .map(|col| obj.get(col).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect()
        })
        .collect();

    Ok(RawTable {
        name,
        columns,
        rows,
    })
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per line.
/// Short records are padded with nulls. Cells stay text; numeric columns are
/// coerced by the schema, so codes like `007` survive in text columns.
fn load_csv(path: &Path) -> Result<Workbook> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let row: Vec<CellValue> = (0..columns.len())
            .map(|i| record.get(i).map(csv_cell).unwrap_or(CellValue::Null))
            .collect();
        rows.push(row);
    }

    Ok(Workbook {
        sheets: vec![RawTable {
            name: sheet_name(path),
            columns,
            rows,
        }],
    })
}

fn csv_cell(s: &str) -> CellValue {
    if s.trim().is_empty() {
        CellValue::Null
    } else {
        CellValue::String(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file as a single sheet.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Column types other than strings,
/// integers, floats and booleans are rendered to text (dates keep their
/// ISO form).
fn load_parquet(path: &Path) -> Result<Workbook> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| extract_cell(col, row))
                .collect::<Result<Vec<_>>>()
                .with_context(|| format!("Row {row}"))?;
            rows.push(cells);
        }
    }

    Ok(Workbook {
        sheets: vec![RawTable {
            name: sheet_name(path),
            columns,
            rows,
        }],
    })
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> Result<CellValue> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let cell = match col.data_type() {
        DataType::Utf8 => col
            .as_string_opt::<i32>()
            .map(|s| CellValue::String(s.value(row).to_string())),
        DataType::LargeUtf8 => col
            .as_string_opt::<i64>()
            .map(|s| CellValue::String(s.value(row).to_string())),
        DataType::Int32 => col
            .as_primitive_opt::<Int32Type>()
            .map(|a| CellValue::Integer(a.value(row) as i64)),
        DataType::Int64 => col
            .as_primitive_opt::<Int64Type>()
            .map(|a| CellValue::Integer(a.value(row))),
        DataType::Float32 => col
            .as_primitive_opt::<Float32Type>()
            .map(|a| CellValue::Float(a.value(row) as f64)),
        DataType::Float64 => col
            .as_primitive_opt::<Float64Type>()
            .map(|a| CellValue::Float(a.value(row))),
        DataType::Boolean => col.as_boolean_opt().map(|a| CellValue::Bool(a.value(row))),
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => {
            Some(CellValue::Date(array_value_to_string(col, row)?))
        }
        _ => Some(CellValue::String(array_value_to_string(col, row)?)),
    };
    cell.with_context(|| format!("column type {:?} did not match its array", col.data_type()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_file(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn csv_reads_header_and_keeps_cells_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "t.csv", "Name,Latitude,Note\nGate,51.9,\nZeebrugge,51,x\n");

        let wb = read_workbook(&path).unwrap();
        let sheet = &wb.sheets[0];
        assert_eq!(sheet.columns, vec!["Name", "Latitude", "Note"]);
        assert_eq!(sheet.rows[0][1], CellValue::String("51.9".into()));
        assert_eq!(sheet.rows[0][1].to_f64(), Some(51.9));
        assert_eq!(sheet.rows[0][2], CellValue::Null);
        assert_eq!(sheet.rows[1][1].to_f64(), Some(51.0));
    }

    #[test]
    fn csv_text_columns_are_not_reformatted() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "terminals.csv",
            "TerminalName,FacilityType,Status,Owner,State/Province,Latitude,Longitude\n\
             1.50,Import,Operating,007,08,10,10\n",
        );

        let wb = read_workbook(&path).unwrap();
        let table = crate::data::schema::terminals_from_table(&wb.sheets[0], "terminals.csv").unwrap();
        let t = &table.terminals[0];
        assert_eq!(t.name, "1.50");
        assert_eq!(t.owner, "007");
        assert_eq!(t.state_province, "08");
        assert_eq!((t.latitude, t.longitude), (10.0, 10.0));
    }

    #[test]
    fn csv_pads_short_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "t.csv", "A,B,C\n1\n");

        let wb = read_workbook(&path).unwrap();
        assert_eq!(wb.sheets[0].rows[0].len(), 3);
        assert_eq!(wb.sheets[0].rows[0][2], CellValue::Null);
    }

    #[test]
    fn json_workbook_keeps_sheet_and_column_order() {
        let dir = tempfile::tempdir().unwrap();
        let body = r#"{"sheets": [
            {"name": "Terminals", "rows": [{"Zeta": 1, "Alpha": "a"}]},
            {"name": "Definitions", "rows": [{"Term": "FSRU", "Definition": "Floating"}]}
        ]}"#;
        let path = write_file(&dir, "wb.json", body);

        let wb = read_workbook(&path).unwrap();
        assert_eq!(wb.sheets.len(), 2);
        assert_eq!(wb.sheets[0].columns, vec!["Zeta", "Alpha"]);

        let spec = SourceSpec::new(&path, SheetSelector::Name("Definitions".into()));
        let defs = select_sheet(&wb, &spec).unwrap();
        assert_eq!(defs.columns, vec!["Term", "Definition"]);
    }

    #[test]
    fn json_records_array_is_single_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "deals.json", r#"[{"A": 1}, {"B": true}]"#);

        let wb = read_workbook(&path).unwrap();
        let sheet = &wb.sheets[0];
        assert_eq!(sheet.name, "deals");
        assert_eq!(sheet.columns, vec!["A", "B"]);
        assert_eq!(sheet.rows[1], vec![CellValue::Null, CellValue::Bool(true)]);
    }

    #[test]
    fn missing_sheet_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "t.csv", "A\n1\n");
        let wb = read_workbook(&path).unwrap();

        let spec = SourceSpec::new(&path, SheetSelector::Index(1));
        assert!(matches!(
            select_sheet(&wb, &spec),
            Err(LoadError::SheetNotFound { .. })
        ));
    }

    #[test]
    fn unreadable_sources_are_descriptive_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("nope.csv");
        let err = read_workbook(&missing).unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
        assert!(err.to_string().contains("nope.csv"));

        let xlsx = write_file(&dir, "book.xlsx", "");
        assert!(matches!(
            read_workbook(&xlsx),
            Err(LoadError::UnsupportedFormat { .. })
        ));

        let corrupt = write_file(&dir, "bad.json", "{not json");
        assert!(matches!(read_workbook(&corrupt), Err(LoadError::Read { .. })));
    }

    #[test]
    fn parquet_scalar_columns_become_cells() {
        use std::sync::Arc;

        use arrow::array::{Float64Array, StringArray};
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("TerminalName", DataType::Utf8, false),
            Field::new("Latitude", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Gate", "Ghost"])),
                Arc::new(Float64Array::from(vec![Some(51.9), None])),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let wb = read_workbook(&path).unwrap();
        let sheet = &wb.sheets[0];
        assert_eq!(sheet.columns, vec!["TerminalName", "Latitude"]);
        assert_eq!(sheet.rows[0][0], CellValue::String("Gate".into()));
        assert_eq!(sheet.rows[0][1], CellValue::Float(51.9));
        assert_eq!(sheet.rows[1][1], CellValue::Null);
    }
}

use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a source sheet
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the dtypes a spreadsheet export
/// produces.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// ISO-8601 date string kept as text for simplicity.
    Date(String),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Coerce the cell to `f64`.
    ///
    /// Text is parsed after trimming; anything that does not parse, and
    /// booleans, dates and nulls, become `None` rather than an error.
    /// Only finite values count: `NaN` and infinities are missing too.
    pub fn to_f64(&self) -> Option<f64> {
        let value = match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        value.filter(|v| v.is_finite())
    }

    /// Text form of the cell, `None` for nulls and blank strings.
    pub fn to_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::String(s) if s.trim().is_empty() => None,
            other => Some(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// RawTable – one sheet as read from disk, before schema conversion
// ---------------------------------------------------------------------------

/// A sheet of cells with ordered column names.
///
/// Every row has exactly `columns.len()` cells; readers pad short rows with
/// [`CellValue::Null`].
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// All sheets of one source file, in file order.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub sheets: Vec<RawTable>,
}

// ---------------------------------------------------------------------------
// Terminals
// ---------------------------------------------------------------------------

/// One LNG facility with validated coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Terminal {
    pub name: String,
    pub facility_type: String,
    /// Operating, Proposed, Construction, Cancelled, Idle… carried verbatim.
    pub status: String,
    pub owner: String,
    pub parent: String,
    pub country: String,
    pub state_province: String,
    pub capacity: Option<f64>,
    pub capacity_units: String,
    pub capacity_mtpa: Option<f64>,
    pub capacity_bcm_per_year: Option<f64>,
    pub latitude: f64,
    pub longitude: f64,
}

/// The loaded terminals sheet.
#[derive(Debug, Clone, Default)]
pub struct TerminalTable {
    pub terminals: Vec<Terminal>,
    /// Rows excluded for missing or out-of-range coordinates.
    pub dropped: usize,
}

impl TerminalTable {
    pub fn len(&self) -> usize {
        self.terminals.len()
    }
}

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// A glossary term and its explanation.
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub term: String,
    pub text: String,
}

impl Definition {
    pub fn fields(&self) -> [&str; 2] {
        [&self.term, &self.text]
    }
}

// ---------------------------------------------------------------------------
// Deals
// ---------------------------------------------------------------------------

/// Country value used when a deal row leaves a country blank.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// A long-term LNG supply agreement.
#[derive(Debug, Clone, PartialEq)]
pub struct Deal {
    pub buyer: String,
    pub buyer_country: String,
    pub seller: String,
    pub seller_country: String,
    /// Contracted volume in bcf/day.
    pub volume: Option<f64>,
    /// Contract duration in years.
    pub duration: Option<f64>,
    pub start_date: String,
    pub end_date: String,
}

// ---------------------------------------------------------------------------
// Trends
// ---------------------------------------------------------------------------

/// A wide import/export table: one identifier per row, one value per year.
#[derive(Debug, Clone, Default)]
pub struct TrendTable {
    pub identifier_column: String,
    pub years: Vec<i32>,
    pub rows: Vec<TrendRow>,
}

/// One row of a [`TrendTable`]; `values` is parallel to `TrendTable::years`.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendRow {
    pub identifier: String,
    pub values: Vec<Option<f64>>,
}

/// A long-form trend observation.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub identifier: String,
    pub year: i32,
    pub value: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_coercion_never_fails() {
        assert_eq!(CellValue::String(" 45.5 ".into()).to_f64(), Some(45.5));
        assert_eq!(CellValue::Integer(7).to_f64(), Some(7.0));
        assert_eq!(CellValue::String("n/a".into()).to_f64(), None);
        assert_eq!(CellValue::Bool(true).to_f64(), None);
        assert_eq!(CellValue::Null.to_f64(), None);
    }

    #[test]
    fn non_finite_numbers_are_missing() {
        assert_eq!(CellValue::String("NaN".into()).to_f64(), None);
        assert_eq!(CellValue::String("nan".into()).to_f64(), None);
        assert_eq!(CellValue::String("-inf".into()).to_f64(), None);
        assert_eq!(CellValue::Float(f64::INFINITY).to_f64(), None);
        assert_eq!(CellValue::Float(f64::NAN).to_f64(), None);
    }

    #[test]
    fn blank_text_is_missing() {
        assert_eq!(CellValue::String("   ".into()).to_text(), None);
        assert_eq!(CellValue::Null.to_text(), None);
        assert_eq!(CellValue::Integer(3).to_text().as_deref(), Some("3"));
    }
}

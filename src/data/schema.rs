//! Column names of each dataset and conversion from [`RawTable`] to typed rows.

use super::error::LoadError;
use super::model::{
    CellValue, Deal, Definition, RawTable, Terminal, TerminalTable, TrendRow, TrendTable,
    UNKNOWN_COUNTRY,
};

pub mod terminals {
    pub const NAME: &str = "TerminalName";
    pub const FACILITY_TYPE: &str = "FacilityType";
    pub const STATUS: &str = "Status";
    pub const OWNER: &str = "Owner";
    pub const PARENT: &str = "Parent";
    pub const COUNTRY: &str = "Country";
    pub const STATE_PROVINCE: &str = "State/Province";
    pub const CAPACITY: &str = "Capacity";
    pub const CAPACITY_UNITS: &str = "CapacityUnits";
    pub const CAPACITY_MTPA: &str = "CapacityInMtpa";
    pub const CAPACITY_BCM: &str = "CapacityInBcm/y";
    pub const LATITUDE: &str = "Latitude";
    pub const LONGITUDE: &str = "Longitude";

    pub const REQUIRED: &[&str] = &[NAME, FACILITY_TYPE, STATUS, OWNER, LATITUDE, LONGITUDE];
}

pub mod deals {
    pub const BUYER: &str = "Buyer";
    pub const BUYER_COUNTRY: &str = "BuyerCountry";
    pub const SELLER: &str = "Seller";
    pub const SELLER_COUNTRY: &str = "SellerCountry";
    pub const VOLUME: &str = "Volume";
    pub const DURATION: &str = "Duration";
    pub const START_DATE: &str = "StartDate";
    pub const END_DATE: &str = "EndDate";

    pub const REQUIRED: &[&str] = &[BUYER_COUNTRY, SELLER_COUNTRY];
}

/// Default identifier column of import/export trend sheets.
pub const DEFAULT_TREND_IDENTIFIER: &str = "Country";

// ---------------------------------------------------------------------------
// Column access
// ---------------------------------------------------------------------------

/// Column lookup over one sheet.
struct Columns<'a> {
    table: &'a RawTable,
}

impl<'a> Columns<'a> {
    fn require(table: &'a RawTable, origin: &str, required: &[&str]) -> Result<Self, LoadError> {
        if let Some(missing) = required.iter().find(|c| table.column_index(c).is_none()) {
            return Err(LoadError::MissingColumn {
                path: origin.to_string(),
                column: missing.to_string(),
            });
        }
        Ok(Self { table })
    }

    fn cell<'r>(&self, row: &'r [CellValue], name: &str) -> Option<&'r CellValue> {
        self.table.column_index(name).and_then(|i| row.get(i))
    }

    fn text(&self, row: &[CellValue], name: &str) -> String {
        self.cell(row, name)
            .and_then(CellValue::to_text)
            .unwrap_or_default()
    }

    fn number(&self, row: &[CellValue], name: &str) -> Option<f64> {
        self.cell(row, name).and_then(CellValue::to_f64)
    }
}

fn valid_position(lat: f64, lon: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// Build the terminals table, dropping rows whose coordinates are missing,
/// unparseable or out of range.
pub fn terminals_from_table(table: &RawTable, origin: &str) -> Result<TerminalTable, LoadError> {
    use terminals::*;

    let cols = Columns::require(table, origin, REQUIRED)?;
    let mut out = TerminalTable::default();

    for row in &table.rows {
        let position = cols
            .number(row, LATITUDE)
            .zip(cols.number(row, LONGITUDE))
            .filter(|&(lat, lon)| valid_position(lat, lon));
        let Some((latitude, longitude)) = position else {
            out.dropped += 1;
            continue;
        };

        out.terminals.push(Terminal {
            name: cols.text(row, NAME),
            facility_type: cols.text(row, FACILITY_TYPE),
            status: cols.text(row, STATUS),
            owner: cols.text(row, OWNER),
            parent: cols.text(row, PARENT),
            country: cols.text(row, COUNTRY),
            state_province: cols.text(row, STATE_PROVINCE),
            capacity: cols.number(row, CAPACITY),
            capacity_units: cols.text(row, CAPACITY_UNITS),
            capacity_mtpa: cols.number(row, CAPACITY_MTPA),
            capacity_bcm_per_year: cols.number(row, CAPACITY_BCM),
            latitude,
            longitude,
        });
    }

    if out.dropped > 0 {
        log::info!(
            "{origin}: dropped {} of {} terminal rows without a valid position",
            out.dropped,
            table.len()
        );
    }
    Ok(out)
}

/// Definitions are taken positionally: first column is the term, second the
/// explanation.
pub fn definitions_from_table(table: &RawTable, origin: &str) -> Result<Vec<Definition>, LoadError> {
    if table.columns.len() < 2 {
        return Err(LoadError::TooFewColumns {
            path: origin.to_string(),
            expected: 2,
            found: table.columns.len(),
        });
    }

    Ok(table
        .rows
        .iter()
        .map(|row| Definition {
            term: row[0].to_string(),
            text: row[1].to_string(),
        })
        .collect())
}

/// Build deal rows. Blank countries become [`UNKNOWN_COUNTRY`].
pub fn deals_from_table(table: &RawTable, origin: &str) -> Result<Vec<Deal>, LoadError> {
    use deals::*;

    let cols = Columns::require(table, origin, REQUIRED)?;
    let country = |row: &[CellValue], name: &str| {
        let text = cols.text(row, name);
        if text.trim().is_empty() {
            UNKNOWN_COUNTRY.to_string()
        } else {
            text
        }
    };

    Ok(table
        .rows
        .iter()
        .map(|row| Deal {
            buyer: cols.text(row, BUYER),
            buyer_country: country(row, BUYER_COUNTRY),
            seller: cols.text(row, SELLER),
            seller_country: country(row, SELLER_COUNTRY),
            volume: cols.number(row, VOLUME),
            duration: cols.number(row, DURATION),
            start_date: cols.text(row, START_DATE),
            end_date: cols.text(row, END_DATE),
        })
        .collect())
}

/// Build a wide trend table. Every column other than `identifier` whose
/// header is an integer year becomes a year column; other columns are
/// ignored.
pub fn trends_from_table(
    table: &RawTable,
    origin: &str,
    identifier: &str,
) -> Result<TrendTable, LoadError> {
    let id_idx = table
        .column_index(identifier)
        .ok_or_else(|| LoadError::MissingColumn {
            path: origin.to_string(),
            column: identifier.to_string(),
        })?;

    let year_columns: Vec<(usize, i32)> = table
        .columns
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != id_idx)
        .filter_map(|(i, name)| match name.trim().parse::<i32>() {
            Ok(year) => Some((i, year)),
            Err(_) => {
                log::debug!("{origin}: ignoring non-year column '{name}'");
                None
            }
        })
        .collect();

    let rows = table
        .rows
        .iter()
        .map(|row| TrendRow {
            identifier: row[id_idx].to_string(),
            values: year_columns.iter().map(|(i, _)| row[*i].to_f64()).collect(),
        })
        .collect();

    Ok(TrendTable {
        identifier_column: identifier.to_string(),
        years: year_columns.into_iter().map(|(_, y)| y).collect(),
        rows,
    })
}

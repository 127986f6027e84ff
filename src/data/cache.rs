use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::error::LoadError;
use super::loader::{SourceSpec, read_workbook, select_sheet};
use super::model::{Deal, Definition, TerminalTable, TrendTable, Workbook};
use super::schema;

/// Parsed source files keyed by path, filled on first access and never
/// invalidated: sources are static for the lifetime of the process.
///
/// Failures are cached as well so a broken file is read (and reported) once.
#[derive(Debug, Default)]
pub struct DatasetCache {
    workbooks: HashMap<PathBuf, Result<Arc<Workbook>, LoadError>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct source files read so far.
    pub fn len(&self) -> usize {
        self.workbooks.len()
    }

    /// The workbook at `path`, reading it on first access.
    pub fn workbook(&mut self, path: &Path) -> Result<Arc<Workbook>, LoadError> {
        self.workbooks
            .entry(path.to_path_buf())
            .or_insert_with(|| {
                let loaded = read_workbook(path).map(Arc::new);
                match &loaded {
                    Ok(wb) => log::info!(
                        "Loaded {} with {} sheet(s)",
                        path.display(),
                        wb.sheets.len()
                    ),
                    Err(e) => log::error!("Failed to load {}: {e}", path.display()),
                }
                loaded
            })
            .clone()
    }

    pub fn terminals(&mut self, spec: &SourceSpec) -> Result<TerminalTable, LoadError> {
        let wb = self.workbook(&spec.path)?;
        let sheet = select_sheet(&wb, spec)?;
        schema::terminals_from_table(sheet, &spec.to_string())
    }

    pub fn definitions(&mut self, spec: &SourceSpec) -> Result<Vec<Definition>, LoadError> {
        let wb = self.workbook(&spec.path)?;
        let sheet = select_sheet(&wb, spec)?;
        schema::definitions_from_table(sheet, &spec.to_string())
    }

    pub fn deals(&mut self, spec: &SourceSpec) -> Result<Vec<Deal>, LoadError> {
        let wb = self.workbook(&spec.path)?;
        let sheet = select_sheet(&wb, spec)?;
        schema::deals_from_table(sheet, &spec.to_string())
    }

    pub fn trends(&mut self, spec: &SourceSpec, identifier: &str) -> Result<TrendTable, LoadError> {
        let wb = self.workbook(&spec.path)?;
        let sheet = select_sheet(&wb, spec)?;
        schema::trends_from_table(sheet, &spec.to_string(), identifier)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::loader::SheetSelector;

    const WORKBOOK: &str = r#"{"sheets": [
        {"name": "Terminals", "rows": [
            {"TerminalName": "Gate", "FacilityType": "Import", "Status": "Operating",
             "Owner": "Gasunie", "Latitude": 51.95, "Longitude": 4.03},
            {"TerminalName": "Nowhere", "FacilityType": "Import", "Status": "Proposed",
             "Owner": "X", "Latitude": 95, "Longitude": 4.0}
        ]},
        {"name": "Definitions", "rows": [
            {"Term": "FSRU", "Definition": "Floating storage and regasification unit"}
        ]}
    ]}"#;

    fn write_workbook(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("lng.json");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(WORKBOOK.as_bytes()).unwrap();
        path
    }

    #[test]
    fn both_sheets_come_from_one_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_workbook(&dir);
        let mut cache = DatasetCache::new();

        let terminals = cache
            .terminals(&SourceSpec::new(&path, SheetSelector::Index(0)))
            .unwrap();
        let defs = cache
            .definitions(&SourceSpec::new(&path, SheetSelector::Index(1)))
            .unwrap();

        assert_eq!(terminals.len(), 1);
        assert_eq!(terminals.dropped, 1);
        assert_eq!(defs[0].term, "FSRU");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn workbook_is_not_reread_after_first_access() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_workbook(&dir);
        let mut cache = DatasetCache::new();

        let first = cache.workbook(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        let second = cache.workbook(&path).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn failures_are_cached_and_replayed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.json");
        let mut cache = DatasetCache::new();

        let first = cache.workbook(&path).unwrap_err();
        std::fs::write(&path, WORKBOOK).unwrap();
        let second = cache.workbook(&path).unwrap_err();

        assert_eq!(first, second);
    }
}

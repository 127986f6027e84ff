use thiserror::Error;

/// Why a dataset could not be produced from its source.
///
/// Cloneable so a cached failure can be handed out again without re-reading
/// the file.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error("Error loading data from {path}: {message}")]
    Read { path: String, message: String },

    #[error("Unsupported file extension for {path}: .{extension}")]
    UnsupportedFormat { path: String, extension: String },

    #[error("Sheet {sheet} not found in {path}")]
    SheetNotFound { path: String, sheet: String },

    #[error("Missing column '{column}' in {path}")]
    MissingColumn { path: String, column: String },

    #[error("Expected at least {expected} columns in {path}, found {found}")]
    TooFewColumns {
        path: String,
        expected: usize,
        found: usize,
    },
}

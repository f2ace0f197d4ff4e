use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("failed to open spreadsheet {}: {reason}", path.display())]
    Open { path: PathBuf, reason: String },
    #[error("spreadsheet has no worksheets")]
    EmptyWorkbook,
    #[error("unknown sheet: {0}")]
    UnknownSheet(String),
    #[error("failed to read sheet {sheet}: {reason}")]
    Read { sheet: String, reason: String },
    #[error("missing columns: {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },
}

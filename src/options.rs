use std::path::PathBuf;

use docmerge_docx::PlaceholderPattern;
use docmerge_sheet::ColumnSelection;

use crate::naming::CollisionPolicy;

/// Directory generated documents land in unless told otherwise.
pub const DEFAULT_OUTPUT_DIR: &str = "AutomaticDocEditor";

/// Settings for one merge run.
#[derive(Debug, Clone)]
pub struct MergeOptions {
    pub output_dir: PathBuf,
    /// Worker threads; `None` uses the host's available parallelism.
    pub workers: Option<usize>,
    /// Worksheet to read; `None` reads the first sheet.
    pub sheet: Option<String>,
    pub columns: ColumnSelection,
    pub pattern: PlaceholderPattern,
    pub collisions: CollisionPolicy,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            workers: None,
            sheet: None,
            columns: ColumnSelection::default(),
            pattern: PlaceholderPattern::default(),
            collisions: CollisionPolicy::default(),
        }
    }
}

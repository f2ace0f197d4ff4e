use std::path::PathBuf;

use docmerge_docx::DocxError;
use docmerge_sheet::SheetError;
use thiserror::Error;

/// Fatal errors: raised before any document is generated.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error(transparent)]
    Sheet(#[from] SheetError),
    #[error("failed to load template {}: {source}", path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: DocxError,
    },
    #[error("failed to create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to start worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Failure of a single document job. Captured in the run report; never
/// aborts other jobs.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("failed to parse template: {0}")]
    Template(#[source] DocxError),
    #[error("failed to fill document: {0}")]
    Fill(#[source] DocxError),
    #[error("failed to save {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: DocxError,
    },
}

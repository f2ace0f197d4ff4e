//! docmerge: fill a Word template once per spreadsheet row.
//!
//! The row source lives in [`docmerge_sheet`], the document filler in
//! [`docmerge_docx`]. This crate ties them together: it names the output
//! files, runs one job per record on a bounded worker pool and reports how
//! each job went.

mod dispatch;
mod error;
mod naming;
mod options;

pub use dispatch::{generate_document, merge, run_merge, Job, JobOutcome, JobStatus, MergeReport};
pub use error::{JobError, MergeError};
pub use naming::{output_stem, CollisionPolicy, OutputNamer};
pub use options::{MergeOptions, DEFAULT_OUTPUT_DIR};

pub use docmerge_docx as docx;
pub use docmerge_sheet as sheet;

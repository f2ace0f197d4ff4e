//! Row-to-document dispatch over a bounded worker pool.

use std::fs;
use std::path::{Path, PathBuf};

use docmerge_docx::{FillStats, PlaceholderPattern, Template};
use docmerge_sheet::{Record, SheetReader};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::Serialize;

use crate::error::{JobError, MergeError};
use crate::naming::{output_stem, OutputNamer};
use crate::options::MergeOptions;

/// One record bound to the path its document will be written to.
#[derive(Debug, Clone)]
pub struct Job {
    pub record: Record,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobOutcome {
    /// 1-based spreadsheet row.
    pub row: u32,
    /// Rendered first field of the record.
    pub key: String,
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: JobStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobStatus {
    Created { tokens: usize, substituted: usize },
    Failed { error: String },
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.status, JobStatus::Created { .. })
    }
}

/// Every job's outcome, in submission order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeReport {
    pub outcomes: Vec<JobOutcome>,
    /// Rows passed over because all their fields were empty.
    pub skipped: usize,
}

impl MergeReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &JobOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }
}

/// Build one document: fresh copy of the template, fill, save to `path`.
pub fn generate_document(
    template: &Template,
    record: &Record,
    pattern: &PlaceholderPattern,
    path: &Path,
) -> Result<FillStats, JobError> {
    let mut doc = template.instantiate().map_err(JobError::Template)?;
    let stats = doc.fill(pattern, &record.texts()).map_err(JobError::Fill)?;
    doc.save(path).map_err(|source| JobError::Save {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(stats)
}

fn run_job(template: &Template, pattern: &PlaceholderPattern, job: &Job) -> JobOutcome {
    let row = job.record.row();
    let key = job.record.key();
    let status = match generate_document(template, &job.record, pattern, &job.path) {
        Ok(stats) => {
            tracing::info!(row, path = %job.path.display(), "created document");
            if stats.unfilled() > 0 {
                tracing::debug!(row, unfilled = stats.unfilled(), "template has more placeholders than fields");
            }
            JobStatus::Created {
                tokens: stats.tokens,
                substituted: stats.substituted,
            }
        }
        Err(err) => {
            tracing::error!(row, key = %key, error = %err, "document generation failed");
            JobStatus::Failed {
                error: err.to_string(),
            }
        }
    };
    JobOutcome {
        row,
        key,
        path: job.path.clone(),
        status,
    }
}

/// Generate one document per non-blank record.
///
/// Output paths are assigned up front, in record order, then every job is
/// submitted to a pool of `options.workers` threads. A failing job is logged
/// and recorded in the report; the remaining jobs still run.
pub fn run_merge<I>(template: &Template, records: I, options: &MergeOptions) -> Result<MergeReport, MergeError>
where
    I: IntoIterator<Item = Record>,
{
    fs::create_dir_all(&options.output_dir).map_err(|source| MergeError::OutputDir {
        path: options.output_dir.clone(),
        source,
    })?;

    let mut namer = OutputNamer::new(&options.output_dir, options.collisions);
    let mut skipped = 0;
    let jobs: Vec<Job> = records
        .into_iter()
        .filter(|record| {
            let blank = record.is_blank();
            if blank {
                skipped += 1;
            }
            !blank
        })
        .map(|record| {
            let path = namer.assign(&output_stem(&record));
            Job { record, path }
        })
        .collect();

    let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("docmerge-worker-{i}"));
    if let Some(workers) = options.workers {
        builder = builder.num_threads(workers);
    }
    let pool = builder.build()?;
    tracing::debug!(jobs = jobs.len(), workers = pool.current_num_threads(), "dispatching");

    let pattern = &options.pattern;
    let outcomes: Vec<JobOutcome> = pool.install(|| jobs.par_iter().map(|job| run_job(template, pattern, job)).collect());

    let report = MergeReport { outcomes, skipped };
    tracing::info!(
        created = report.succeeded(),
        failed = report.failed(),
        skipped = report.skipped,
        "merge finished"
    );
    Ok(report)
}

/// Full run: load the template, read the spreadsheet, generate documents.
///
/// Template, spreadsheet and column errors are returned before any output
/// directory or document is created.
pub fn merge(spreadsheet: &Path, template: &Path, options: &MergeOptions) -> Result<MergeReport, MergeError> {
    let template = Template::open(template).map_err(|source| MergeError::Template {
        path: template.to_path_buf(),
        source,
    })?;

    let mut reader = SheetReader::open(spreadsheet)?;
    let mut rows = reader.rows(options.sheet.as_deref(), &options.columns)?;
    let records: Vec<Record> = rows.by_ref().collect();
    let blank_rows = rows.skipped();

    let mut report = run_merge(&template, records, options)?;
    report.skipped += blank_rows;
    Ok(report)
}

//! Output file names derived from a record's first field.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use docmerge_docx::DOCX_EXTENSION;
use docmerge_sheet::Record;

/// What happens when two records map to the same file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Later records get `-2`, `-3`, ... appended to the stem.
    #[default]
    Suffix,
    /// Later records replace earlier output.
    Overwrite,
}

/// File stem for `record`: its first field as rendered for merging.
///
/// Path separators are replaced with `_` so every output stays inside the
/// output directory. A blank first field falls back to `row-<N>`.
pub fn output_stem(record: &Record) -> String {
    let key = record.key();
    if key.trim().is_empty() {
        return format!("row-{}", record.row());
    }
    key.replace(['/', '\\'], "_")
}

/// Hands out output paths in submission order.
///
/// Names are compared case-insensitively so that outputs stay distinct on
/// case-folding filesystems.
#[derive(Debug)]
pub struct OutputNamer {
    dir: PathBuf,
    policy: CollisionPolicy,
    taken: HashSet<String>,
}

impl OutputNamer {
    pub fn new(dir: impl AsRef<Path>, policy: CollisionPolicy) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            policy,
            taken: HashSet::new(),
        }
    }

    pub fn assign(&mut self, stem: &str) -> PathBuf {
        let mut file_name = format!("{stem}.{DOCX_EXTENSION}");
        if self.policy == CollisionPolicy::Suffix {
            let mut n = 1;
            while self.taken.contains(&file_name.to_lowercase()) {
                n += 1;
                file_name = format!("{stem}-{n}.{DOCX_EXTENSION}");
            }
            self.taken.insert(file_name.to_lowercase());
        }
        self.dir.join(file_name)
    }
}

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine_styles::{Data, Range, Reader, Xlsx};

use crate::columns::{resolve_headers, ColumnSelection, ResolvedColumns};
use crate::error::SheetError;
use crate::record::Record;
use crate::value::{format_value, CellValue};

type XlsxReader = Xlsx<BufReader<File>>;

/// An opened workbook.
pub struct SheetReader {
    workbook: XlsxReader,
    sheet_names: Vec<String>,
    path: PathBuf,
}

impl SheetReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SheetError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| SheetError::Open {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        let workbook: XlsxReader = Xlsx::new(BufReader::new(file)).map_err(|e| SheetError::Open {
            path: path.clone(),
            reason: format!("failed to parse xlsx: {e}"),
        })?;
        let sheet_names = workbook.sheet_names().to_vec();
        Ok(Self {
            workbook,
            sheet_names,
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    /// Resolve `selection` against `sheet` (the first sheet when `None`) and
    /// return the qualifying rows.
    ///
    /// Header resolution happens here, so a [`SheetError::MissingColumns`]
    /// surfaces before a single record is produced.
    pub fn rows(&mut self, sheet: Option<&str>, selection: &ColumnSelection) -> Result<RowSource, SheetError> {
        let sheet = match sheet {
            Some(name) => {
                if !self.sheet_names.iter().any(|s| s == name) {
                    return Err(SheetError::UnknownSheet(name.to_string()));
                }
                name.to_string()
            }
            None => self
                .sheet_names
                .first()
                .cloned()
                .ok_or(SheetError::EmptyWorkbook)?,
        };

        let range = self.workbook.worksheet_range(&sheet).map_err(|e| SheetError::Read {
            sheet: sheet.clone(),
            reason: e.to_string(),
        })?;

        let resolved = match selection {
            ColumnSelection::Positional { count } => ResolvedColumns {
                columns: (0..*count as u32).collect(),
                data_start_row: 1,
            },
            ColumnSelection::Headers { names, scan } => {
                resolve_headers(header_candidates(&range), names, *scan)?
            }
        };
        tracing::debug!(
            sheet = %sheet,
            columns = ?resolved.columns,
            first_data_row = resolved.data_start_row + 1,
            "columns resolved"
        );

        Ok(RowSource::new(range, resolved))
    }
}

/// Sheet rows from row 1 as `(row, [(column, trimmed text)])`, skipping
/// empty cells. Leading rows outside `range` yield no cells.
fn header_candidates(range: &Range<Data>) -> impl Iterator<Item = (u32, Vec<(u32, String)>)> + '_ {
    let bounds = range.start().zip(range.end());
    let rows = bounds.map_or(1..=0, |(_, end)| 0..=end.0);
    rows.map(move |row| {
        let mut cells = Vec::new();
        if let Some((start, end)) = bounds {
            for col in start.1..=end.1 {
                if let Some(v) = range.get_value((row, col)) {
                    let text = format_value(&CellValue::from_data(v));
                    let text = text.trim();
                    if !text.is_empty() {
                        cells.push((col, text.to_string()));
                    }
                }
            }
        }
        (row, cells)
    })
}

/// Lazy, single-pass sequence of non-blank records.
pub struct RowSource {
    range: Range<Data>,
    columns: Vec<u32>,
    next_row: u32,
    end_row: Option<u32>,
    skipped: usize,
}

impl RowSource {
    fn new(range: Range<Data>, resolved: ResolvedColumns) -> Self {
        let end_row = range.end().map(|(row, _)| row);
        let first = range.start().map_or(0, |(row, _)| row);
        Self {
            range,
            columns: resolved.columns,
            next_row: resolved.data_start_row.max(first),
            end_row,
            skipped: 0,
        }
    }

    /// Absolute 0-based column indices, in record field order.
    pub fn columns(&self) -> &[u32] {
        &self.columns
    }

    /// Blank rows passed over so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn record_at(&self, row: u32) -> Record {
        let values = self
            .columns
            .iter()
            .map(|&col| {
                self.range
                    .get_value((row, col))
                    .map_or(CellValue::Empty, CellValue::from_data)
            })
            .collect();
        Record::new(row + 1, values)
    }
}

impl Iterator for RowSource {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        let end = self.end_row?;
        while self.next_row <= end {
            let row = self.next_row;
            self.next_row += 1;
            let record = self.record_at(row);
            if record.is_blank() {
                self.skipped += 1;
                tracing::debug!(row = row + 1, "skipping blank row");
                continue;
            }
            return Some(record);
        }
        None
    }
}

//! Which worksheet columns make up a record, and how they are found.

use crate::error::SheetError;

/// Number of leading columns used when no header names are given.
pub const DEFAULT_FIELD_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelection {
    /// The first `count` columns of every row; row 1 is a header and skipped.
    Positional { count: usize },
    /// Columns located by header name. Record fields follow `names` order.
    Headers { names: Vec<String>, scan: HeaderScan },
}

impl Default for ColumnSelection {
    fn default() -> Self {
        ColumnSelection::Positional {
            count: DEFAULT_FIELD_COUNT,
        }
    }
}

/// Where header names are looked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderScan {
    /// Only the first row of the sheet.
    #[default]
    FirstRow,
    /// Each row in turn until one holds every required name.
    Forward,
}

/// Column positions resolved once per run. Indices are absolute and 0-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub columns: Vec<u32>,
    pub data_start_row: u32,
}

/// Match `names` against one row of `(column, text)` cells.
///
/// Header text is trimmed before an exact comparison; the leftmost match wins
/// for duplicated headers. On failure the unmatched names are returned in
/// `names` order.
pub fn match_header_row(cells: &[(u32, String)], names: &[String]) -> Result<Vec<u32>, Vec<String>> {
    let mut columns = Vec::with_capacity(names.len());
    let mut missing = Vec::new();
    for name in names {
        let wanted = name.trim();
        match cells.iter().find(|(_, text)| text.trim() == wanted) {
            Some((col, _)) => columns.push(*col),
            None => missing.push(name.clone()),
        }
    }
    if missing.is_empty() {
        Ok(columns)
    } else {
        Err(missing)
    }
}

/// Locate the header row among `rows` (in sheet order) and resolve `names`.
///
/// With [`HeaderScan::FirstRow`] only the first yielded row is considered.
/// When no row qualifies, the error names what is missing from the closest
/// candidate: the row matching the most names, earliest on ties.
pub fn resolve_headers<I>(rows: I, names: &[String], scan: HeaderScan) -> Result<ResolvedColumns, SheetError>
where
    I: IntoIterator<Item = (u32, Vec<(u32, String)>)>,
{
    let mut best: Option<Vec<String>> = None;
    for (row, cells) in rows {
        match match_header_row(&cells, names) {
            Ok(columns) => {
                tracing::debug!(header_row = row + 1, ?columns, "resolved header columns");
                return Ok(ResolvedColumns {
                    columns,
                    data_start_row: row + 1,
                });
            }
            Err(missing) => {
                if best.as_ref().map_or(true, |b| missing.len() < b.len()) {
                    best = Some(missing);
                }
            }
        }
        if scan == HeaderScan::FirstRow {
            break;
        }
    }
    Err(SheetError::MissingColumns {
        missing: best.unwrap_or_else(|| names.to_vec()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(texts: &[&str]) -> Vec<(u32, String)> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| (i as u32, t.to_string()))
            .collect()
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn headers_resolve_independent_of_position() {
        let header = row(&["City", "Amount", "Name", "Years"]);
        let cols = match_header_row(&header, &names(&["Name", "Amount"])).unwrap();
        assert_eq!(cols, vec![2, 1]);
    }

    #[test]
    fn header_text_is_trimmed() {
        let header = row(&["  Name ", "Amount\t"]);
        let cols = match_header_row(&header, &names(&["Name", "Amount"])).unwrap();
        assert_eq!(cols, vec![0, 1]);
    }

    #[test]
    fn header_match_is_case_sensitive() {
        let header = row(&["name"]);
        let missing = match_header_row(&header, &names(&["Name"])).unwrap_err();
        assert_eq!(missing, names(&["Name"]));
    }

    #[test]
    fn first_row_policy_does_not_look_further() {
        let rows = vec![(0, row(&["Title"])), (1, row(&["Name", "Amount"]))];
        let err = resolve_headers(rows, &names(&["Name", "Amount"]), HeaderScan::FirstRow).unwrap_err();
        match err {
            SheetError::MissingColumns { missing } => assert_eq!(missing, names(&["Name", "Amount"])),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn forward_scan_finds_later_header_row() {
        let rows = vec![
            (0, row(&["Quarterly report"])),
            (1, row(&[])),
            (2, row(&["Amount", "Name"])),
        ];
        let resolved = resolve_headers(rows, &names(&["Name", "Amount"]), HeaderScan::Forward).unwrap();
        assert_eq!(resolved.columns, vec![1, 0]);
        assert_eq!(resolved.data_start_row, 3);
    }

    #[test]
    fn missing_headers_are_named_from_closest_row() {
        let rows = vec![
            (0, row(&["Other"])),
            (1, row(&["Name", "City"])),
            (2, row(&["Amount"])),
        ];
        let err = resolve_headers(rows, &names(&["Name", "Amount", "Years"]), HeaderScan::Forward).unwrap_err();
        assert_eq!(err.to_string(), "missing columns: Amount, Years");
    }

    #[test]
    fn empty_sheet_reports_every_name() {
        let err = resolve_headers(Vec::new(), &names(&["Name"]), HeaderScan::Forward).unwrap_err();
        assert_eq!(err.to_string(), "missing columns: Name");
    }
}

//! Row source for docmerge.
//!
//! Opens an xlsx workbook, resolves the columns that make up a record (by
//! position or by header name) and yields one [`Record`] per non-blank row.
//!
//! ```no_run
//! use docmerge_sheet::{ColumnSelection, HeaderScan, SheetReader};
//!
//! let mut reader = SheetReader::open("clients.xlsx")?;
//! let selection = ColumnSelection::Headers {
//!     names: vec!["Name".into(), "Amount".into()],
//!     scan: HeaderScan::FirstRow,
//! };
//! for record in reader.rows(None, &selection)? {
//!     println!("row {}: {:?}", record.row(), record.texts());
//! }
//! # Ok::<(), docmerge_sheet::SheetError>(())
//! ```

mod columns;
mod error;
mod reader;
mod record;
mod value;

pub use columns::{
    match_header_row, resolve_headers, ColumnSelection, HeaderScan, ResolvedColumns, DEFAULT_FIELD_COUNT,
};
pub use error::SheetError;
pub use reader::{RowSource, SheetReader};
pub use record::Record;
pub use value::{format_float, format_value, CellValue};

//! Cell values as read from the workbook and their merge-text rendering.

use std::fmt;

use calamine_styles::Data;
use chrono::{NaiveDate, NaiveDateTime, Timelike};

/// Raw scalar taken from one worksheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    String(String),
    Float(f64),
    Int(i64),
    Bool(bool),
    /// Already rendered as `YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS`.
    DateTime(String),
    /// Normalized Excel error literal, e.g. `#DIV/0!`.
    Error(&'static str),
}

impl CellValue {
    /// Absent cells and strings that are blank after trimming count as empty.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    pub fn from_data(value: &Data) -> Self {
        match value {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::String(s.clone()),
            Data::Float(f) => CellValue::Float(*f),
            Data::Int(i) => CellValue::Int(*i),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(ndt) => CellValue::DateTime(render_datetime(&ndt)),
                None => CellValue::Float(dt.as_f64()),
            },
            Data::DateTimeIso(s) => {
                let raw = s.trim_end_matches('Z');
                if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                    CellValue::DateTime(d.format("%Y-%m-%d").to_string())
                } else if let Ok(ndt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
                    CellValue::DateTime(render_datetime(&ndt))
                } else {
                    CellValue::String(s.clone())
                }
            }
            Data::DurationIso(s) => CellValue::String(s.clone()),
            Data::RichText(rt) => CellValue::String(rt.plain_text().to_string()),
            Data::Error(e) => CellValue::Error(map_error_value(&format!("{e:?}"))),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::String(s) => f.write_str(s),
            CellValue::Float(v) => f.write_str(&format_float(*v)),
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Bool(true) => f.write_str("TRUE"),
            CellValue::Bool(false) => f.write_str("FALSE"),
            CellValue::DateTime(s) => f.write_str(s),
            CellValue::Error(e) => f.write_str(e),
        }
    }
}

/// Text substituted into a document for `value`.
pub fn format_value(value: &CellValue) -> String {
    value.to_string()
}

/// Integral floats lose their fractional part (`2024.0` -> `2024`); all other
/// floats use the shortest representation that round-trips.
pub fn format_float(v: f64) -> String {
    // 2^53: beyond this every f64 is integral and i64 casts stop being exact.
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 9_007_199_254_740_992.0 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}

fn render_datetime(ndt: &NaiveDateTime) -> String {
    let t = ndt.time();
    if t.hour() == 0 && t.minute() == 0 && t.second() == 0 && t.nanosecond() == 0 {
        ndt.date().format("%Y-%m-%d").to_string()
    } else {
        ndt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

fn map_error_value(err_str: &str) -> &'static str {
    let e = err_str.to_ascii_uppercase();
    match e.as_str() {
        "DIV0" | "DIV/0" | "#DIV/0!" => "#DIV/0!",
        "NA" | "#N/A" => "#N/A",
        "VALUE" | "#VALUE!" => "#VALUE!",
        "REF" | "#REF!" => "#REF!",
        "NAME" | "#NAME?" => "#NAME?",
        "NUM" | "#NUM!" => "#NUM!",
        "NULL" | "#NULL!" => "#NULL!",
        _ => "#ERROR!",
    }
}
